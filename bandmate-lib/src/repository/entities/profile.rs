use std::{collections::HashSet, fmt::Debug, str::FromStr};

use agdb::{Comparison, DbId, DbValue, QueryBuilder};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::repository::{
    Cfg, auth,
    db::{Db, models::ProfileModel},
    entities::{
        EntityId, Error, Result, Uid,
        attrs::{
            self, Genre, Location, LookingFor, MusicLinks, Skill, SkillName, SocialLinks,
        },
        decision::{self, MatchSummary, Outcome, Verdict},
        get_field, set_field,
    },
};

/// Represents a musician profile in the Bandmate system.
///
/// Provides methods to inspect and modify this profile's data, including
/// recording swipe decisions and reading the relationship sets derived from
/// them. Always reflects the current database state.
#[derive(Debug, Clone)]
pub struct Profile {
    pub(crate) id: EntityId,
    pub(crate) db: Db,
    pub(crate) cfg: Cfg,
}

/// Everything required to register a new profile.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: u8,
    pub bio: String,
    pub location: Location,
    pub skills: Vec<Skill>,
    pub genres: Vec<Genre>,
    pub looking_for: Vec<LookingFor>,
}

impl ProfileDraft {
    /// Check every attribute constraint and return the normalized email.
    fn validate(&self) -> Result<String> {
        attrs::validate_name(&self.name)?;
        attrs::validate_password(&self.password)?;
        attrs::validate_age(self.age)?;
        attrs::validate_bio(&self.bio)?;
        attrs::validate_location(&self.location)?;
        attrs::validate_skills(&self.skills)?;

        attrs::validate_email(&self.email)
    }
}

/// A partial profile edit. `None` fields are left untouched; link structs
/// merge per field rather than replacing the whole set.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub bio: Option<String>,
    pub location: Option<Location>,
    pub skills: Option<Vec<Skill>>,
    pub genres: Option<Vec<Genre>>,
    pub looking_for: Option<Vec<LookingFor>>,
    pub pictures: Option<Vec<String>>,
    pub social_links: Option<SocialLinks>,
    pub music_links: Option<MusicLinks>,
}

/// The fields of a profile that are safe to show to other users. No email,
/// no password hash, no relationship sets.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: Uid,
    pub name: String,
    pub age: u8,
    pub bio: String,
    pub location: Location,
    pub skills: Vec<Skill>,
    pub genres: Vec<Genre>,
    pub looking_for: Vec<LookingFor>,
    pub pictures: Vec<String>,
    pub social_links: SocialLinks,
    pub music_links: MusicLinks,
    pub last_seen: i64,
}

/// Optional narrowing for discovery queries.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Keep only candidates offering at least one of these skills.
    pub required_skills: Vec<SkillName>,
    /// Keep only candidates in the actor's city and state.
    pub local_only: bool,
}

impl Profile {
    /// Load some existing [`Profile`] from the database
    pub(crate) fn load(db_id: DbId, db: Db, cfg: Cfg) -> Result<Self> {
        let id = EntityId::load(&db, db_id)?;
        Ok(Self { id, db, cfg })
    }

    /// The stable public identifier of this profile.
    pub fn uid(&self) -> Uid {
        self.id.uid()
    }

    // Fields

    pub fn name(&self) -> Result<String> {
        self.get_field("name")
    }

    pub fn set_name(&self, new_name: &str) -> Result<()> {
        attrs::validate_name(new_name)?;
        self.set_field("name", new_name.trim())
    }

    pub(crate) fn email(&self) -> Result<String> {
        self.get_field("email")
    }

    pub(crate) fn password_hash(&self) -> Result<String> {
        self.get_field("password_hash")
    }

    pub fn age(&self) -> Result<u8> {
        let age: u64 = self.get_field("age")?;
        Ok(u8::try_from(age).expect("stored ages fit in a u8 by validation"))
    }

    pub fn set_age(&self, new_age: u8) -> Result<()> {
        attrs::validate_age(new_age)?;
        self.set_field("age", u64::from(new_age))
    }

    pub fn bio(&self) -> Result<String> {
        self.get_field("bio")
    }

    pub fn set_bio(&self, new_bio: &str) -> Result<()> {
        attrs::validate_bio(new_bio)?;
        self.set_field("bio", new_bio)
    }

    pub fn location(&self) -> Result<Location> {
        Ok(Location {
            city: self.get_field("city")?,
            state: self.get_field("state")?,
            country: self.get_field("country")?,
        })
    }

    pub fn set_location(&self, new_location: &Location) -> Result<()> {
        attrs::validate_location(new_location)?;
        self.set_field("city", new_location.city.as_str())?;
        self.set_field("state", new_location.state.as_str())?;
        self.set_field("country", new_location.country.as_str())
    }

    pub fn skills(&self) -> Result<Vec<Skill>> {
        let raw: Vec<String> = self.get_field("skills")?;
        Ok(raw
            .iter()
            .map(|entry| Skill::from_str(entry).expect("stored skills use the closed vocabulary"))
            .collect())
    }

    pub fn set_skills(&self, new_skills: &[Skill]) -> Result<()> {
        attrs::validate_skills(new_skills)?;
        let encoded: Vec<String> = new_skills.iter().map(ToString::to_string).collect();
        self.set_field("skills", encoded)
    }

    pub fn genres(&self) -> Result<Vec<Genre>> {
        let raw: Vec<String> = self.get_field("genres")?;
        Ok(raw
            .iter()
            .map(|entry| Genre::from_str(entry).expect("stored genres use the closed vocabulary"))
            .collect())
    }

    pub fn set_genres(&self, new_genres: &[Genre]) -> Result<()> {
        let encoded: Vec<String> = new_genres.iter().map(ToString::to_string).collect();
        self.set_field("genres", encoded)
    }

    pub fn looking_for(&self) -> Result<Vec<LookingFor>> {
        let raw: Vec<String> = self.get_field("looking_for")?;
        Ok(raw
            .iter()
            .map(|entry| {
                LookingFor::from_str(entry).expect("stored tags use the closed vocabulary")
            })
            .collect())
    }

    pub fn set_looking_for(&self, new_tags: &[LookingFor]) -> Result<()> {
        let encoded: Vec<String> = new_tags.iter().map(ToString::to_string).collect();
        self.set_field("looking_for", encoded)
    }

    pub fn pictures(&self) -> Result<Vec<String>> {
        self.get_field("pictures")
    }

    pub fn set_pictures(&self, new_pictures: &[String]) -> Result<()> {
        attrs::validate_pictures(new_pictures)?;
        self.set_field("pictures", new_pictures.to_vec())
    }

    pub fn social_links(&self) -> Result<SocialLinks> {
        Ok(SocialLinks {
            spotify: optional(self.get_field("spotify")?),
            soundcloud: optional(self.get_field("soundcloud")?),
            youtube: optional(self.get_field("youtube")?),
            instagram: optional(self.get_field("instagram")?),
        })
    }

    /// Overwrite only the links that are set in `new_links`.
    pub fn merge_social_links(&self, new_links: &SocialLinks) -> Result<()> {
        let fields = [
            ("spotify", &new_links.spotify),
            ("soundcloud", &new_links.soundcloud),
            ("youtube", &new_links.youtube),
            ("instagram", &new_links.instagram),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                self.set_field(field, value.as_str())?;
            }
        }

        Ok(())
    }

    pub fn music_links(&self) -> Result<MusicLinks> {
        Ok(MusicLinks {
            spotify_track: optional(self.get_field("spotify_track")?),
            soundcloud_track: optional(self.get_field("soundcloud_track")?),
            youtube_video: optional(self.get_field("youtube_video")?),
        })
    }

    /// Overwrite only the links that are set in `new_links`.
    pub fn merge_music_links(&self, new_links: &MusicLinks) -> Result<()> {
        let fields = [
            ("spotify_track", &new_links.spotify_track),
            ("soundcloud_track", &new_links.soundcloud_track),
            ("youtube_video", &new_links.youtube_video),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                self.set_field(field, value.as_str())?;
            }
        }

        Ok(())
    }

    pub fn is_active(&self) -> Result<bool> {
        self.get_field("active")
    }

    /// Activate or deactivate this profile. Inactive profiles never appear in
    /// discovery; their existing matches and decisions are untouched.
    pub fn set_active(&self, active: bool) -> Result<()> {
        self.set_field("active", active)
    }

    pub fn last_seen(&self) -> Result<i64> {
        self.get_field("last_seen")
    }

    pub(crate) fn touch_last_seen(&self) -> Result<()> {
        self.set_field("last_seen", Utc::now().timestamp_millis())
    }

    /// Apply a partial edit.
    pub fn apply_update(&self, update: &ProfileUpdate) -> Result<()> {
        if let Some(name) = &update.name {
            self.set_name(name)?;
        }
        if let Some(age) = update.age {
            self.set_age(age)?;
        }
        if let Some(bio) = &update.bio {
            self.set_bio(bio)?;
        }
        if let Some(location) = &update.location {
            self.set_location(location)?;
        }
        if let Some(skills) = &update.skills {
            self.set_skills(skills)?;
        }
        if let Some(genres) = &update.genres {
            self.set_genres(genres)?;
        }
        if let Some(looking_for) = &update.looking_for {
            self.set_looking_for(looking_for)?;
        }
        if let Some(pictures) = &update.pictures {
            self.set_pictures(pictures)?;
        }
        if let Some(links) = &update.social_links {
            self.merge_social_links(links)?;
        }
        if let Some(links) = &update.music_links {
            self.merge_music_links(links)?;
        }

        Ok(())
    }

    // Relationship sets, all derived from decision edges

    /// Record the actor's verdict on `target`. See [`decision`] for the
    /// reconciliation rules.
    pub fn decide(&self, target: &Profile, verdict: Verdict) -> Result<Outcome> {
        decision::record(&self.db, self, target, verdict)
    }

    /// UIDs this profile has liked.
    pub fn liked(&self) -> Result<Vec<Uid>> {
        let db_id = self.id.db_id(&self.db)?;
        decision::outgoing(&self.db, db_id)?
            .into_iter()
            .filter(|(_, verdict)| *verdict == Verdict::Like)
            .map(|(target, _)| Uid::load(&self.db, target))
            .collect()
    }

    /// UIDs this profile has passed on.
    pub fn passed(&self) -> Result<Vec<Uid>> {
        let db_id = self.id.db_id(&self.db)?;
        decision::outgoing(&self.db, db_id)?
            .into_iter()
            .filter(|(_, verdict)| *verdict == Verdict::Pass)
            .map(|(target, _)| Uid::load(&self.db, target))
            .collect()
    }

    /// Profiles this one has a confirmed mutual like with: a like edge exists
    /// in both directions.
    pub fn matches(&self) -> Result<Vec<Profile>> {
        let db_id = self.id.db_id(&self.db)?;
        let liked: HashSet<DbId> = decision::outgoing(&self.db, db_id)?
            .into_iter()
            .filter(|(_, verdict)| *verdict == Verdict::Like)
            .map(|(target, _)| target)
            .collect();

        decision::incoming(&self.db, db_id)?
            .into_iter()
            .filter(|(origin, verdict)| *verdict == Verdict::Like && liked.contains(origin))
            .map(|(origin, _)| Profile::load(origin, self.db.clone(), self.cfg.clone()))
            .collect()
    }

    /// Profiles that liked this one and have not been decided on in return.
    /// A like or pass back resolves the entry; a pass resolves it silently.
    pub fn pending_likes(&self) -> Result<Vec<Profile>> {
        let db_id = self.id.db_id(&self.db)?;
        let decided: HashSet<DbId> = decision::outgoing(&self.db, db_id)?
            .into_iter()
            .map(|(target, _)| target)
            .collect();

        decision::incoming(&self.db, db_id)?
            .into_iter()
            .filter(|(origin, verdict)| *verdict == Verdict::Like && !decided.contains(origin))
            .map(|(origin, _)| Profile::load(origin, self.db.clone(), self.cfg.clone()))
            .collect()
    }

    // Views

    pub fn public(&self) -> Result<PublicProfile> {
        Ok(PublicProfile {
            id: self.uid(),
            name: self.name()?,
            age: self.age()?,
            bio: self.bio()?,
            location: self.location()?,
            skills: self.skills()?,
            genres: self.genres()?,
            looking_for: self.looking_for()?,
            pictures: self.pictures()?,
            social_links: self.social_links()?,
            music_links: self.music_links()?,
            last_seen: self.last_seen()?,
        })
    }

    pub(crate) fn summary(&self) -> Result<MatchSummary> {
        Ok(MatchSummary {
            id: self.uid(),
            name: self.name()?,
            pictures: self.pictures()?,
            skills: self.skills()?,
        })
    }

    // Operations

    /// Insert a new [`Profile`]. The email must not be registered yet.
    pub(crate) fn add(db: &Db, cfg: &Cfg, draft: &ProfileDraft) -> Result<Self> {
        let email = draft.validate()?;
        let password_hash = auth::hash_password(&draft.password)?;
        let model = ProfileModel::new(
            Uid::new(db)?,
            draft,
            &email,
            password_hash,
            Utc::now().timestamp_millis(),
        );

        let db_id = db.write().transaction_mut(|t| -> Result<DbId> {
            let taken = t
                .exec(
                    QueryBuilder::select()
                        .search()
                        .from("profiles")
                        .where_()
                        .key("email")
                        .value(Comparison::Equal(email.as_str().into()))
                        .query(),
                )?
                .result
                > 0;
            if taken {
                return Err(Error::EmailTaken);
            }

            let profile_id = t
                .exec_mut(QueryBuilder::insert().element(model).query())?
                .elements
                .first()
                .expect("ProfileModel insertion should return the ID as the first element")
                .id;

            t.exec_mut(
                QueryBuilder::insert()
                    .edges()
                    .from("profiles")
                    .to(profile_id)
                    .query(),
            )?;

            Ok(profile_id)
        })?;

        let profile = Profile::load(db_id, db.clone(), cfg.clone())?;

        debug!("Registered profile: {}", profile.name()?);

        Ok(profile)
    }

    pub(crate) fn list(db: &Db, cfg: &Cfg) -> Result<Vec<Self>> {
        db.read()
            .exec(
                QueryBuilder::select()
                    .elements::<ProfileModel>()
                    .search()
                    .from("profiles")
                    .where_()
                    .node()
                    .and()
                    .neighbor()
                    .query(),
            )?
            .elements
            .iter()
            .map(|e| Profile::load(e.id, db.clone(), cfg.clone()))
            .collect()
    }

    /// Look a profile up by its public UID.
    pub(crate) fn find_by_uid(db: &Db, cfg: &Cfg, uid: Uid) -> Result<Option<Self>> {
        db.read()
            .exec(
                QueryBuilder::select()
                    .search()
                    .from("profiles")
                    .where_()
                    .key("uid")
                    .value(Comparison::Equal(uid.into()))
                    .query(),
            )?
            .elements
            .first()
            .map(|e| Profile::load(e.id, db.clone(), cfg.clone()))
            .transpose()
    }

    /// Look a profile up by its normalized email.
    pub(crate) fn find_by_email(db: &Db, cfg: &Cfg, email: &str) -> Result<Option<Self>> {
        db.read()
            .exec(
                QueryBuilder::select()
                    .search()
                    .from("profiles")
                    .where_()
                    .key("email")
                    .value(Comparison::Equal(email.into()))
                    .query(),
            )?
            .elements
            .first()
            .map(|e| Profile::load(e.id, db.clone(), cfg.clone()))
            .transpose()
    }

    /// Candidate profiles for `actor` to swipe on: active, not the actor,
    /// not yet decided on, matching the filters. Capped at the configured
    /// discovery limit; a short result means exhaustion, not an error.
    pub(crate) fn discover(
        db: &Db,
        cfg: &Cfg,
        actor: &Profile,
        filters: &Filters,
    ) -> Result<Vec<Self>> {
        let actor_id = actor.id.db_id(db)?;
        let mut excluded: HashSet<DbId> = decision::outgoing(db, actor_id)?
            .into_iter()
            .map(|(target, _)| target)
            .collect();
        excluded.insert(actor_id);

        let home = if filters.local_only {
            Some(actor.location()?)
        } else {
            None
        };
        let limit = cfg.read().discover_limit();

        let mut candidates = Vec::new();
        for profile in Self::list(db, cfg)? {
            if candidates.len() == limit {
                break;
            }
            if excluded.contains(&profile.id.db_id(db)?) || !profile.is_active()? {
                continue;
            }
            if !filters.required_skills.is_empty() {
                let offered: Vec<SkillName> =
                    profile.skills()?.iter().map(|skill| skill.name).collect();
                if !filters.required_skills.iter().any(|s| offered.contains(s)) {
                    continue;
                }
            }
            if let Some(home) = &home {
                let there = profile.location()?;
                if there.city != home.city || there.state != home.state {
                    continue;
                }
            }

            candidates.push(profile);
        }

        Ok(candidates)
    }

    fn get_field<T>(&self, field: &str) -> Result<T>
    where
        T: TryFrom<DbValue>,
        T::Error: Debug,
    {
        get_field(&self.db, self.id, field)
    }

    pub(crate) fn set_field<T>(&self, field: &str, value: T) -> Result<()>
    where
        T: Into<DbValue>,
    {
        set_field(&self.db, self.id, field, value)
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::{
        Repository,
        entities::{Session, attrs::SkillLevel, testing},
    };

    fn register(repo: &Repository, name: &str) -> (Profile, Session) {
        repo.register(&testing::draft(name, &format!("{name}@example.com")))
            .unwrap()
    }

    #[test]
    fn test_register() {
        let repo = Repository::mock();

        let (profile, _) = repo.register(&testing::draft("Alice", "alice@example.com")).unwrap();

        assert_eq!(profile.name().unwrap(), "Alice");
        assert_eq!(profile.email().unwrap(), "alice@example.com");
        assert_eq!(profile.age().unwrap(), 27);
        assert!(profile.is_active().unwrap());
        assert!(profile.liked().unwrap().is_empty());
        assert!(profile.passed().unwrap().is_empty());
        assert!(profile.matches().unwrap().is_empty());
        assert!(profile.pending_likes().unwrap().is_empty());
    }

    #[test]
    fn test_register_normalizes_email() {
        let repo = Repository::mock();

        let (profile, _) = repo
            .register(&testing::draft("Alice", "  Alice@Example.COM "))
            .unwrap();

        assert_eq!(profile.email().unwrap(), "alice@example.com");
    }

    #[test]
    fn test_register_duplicate_email() {
        let repo = Repository::mock();

        repo.register(&testing::draft("Alice", "alice@example.com"))
            .unwrap();

        assert!(matches!(
            repo.register(&testing::draft("Alice Again", "alice@example.com")),
            Err(Error::EmailTaken)
        ));
    }

    #[test]
    fn test_register_validates_draft() {
        let repo = Repository::mock();

        let mut underage = testing::draft("Kid", "kid@example.com");
        underage.age = 17;
        assert!(matches!(
            repo.register(&underage),
            Err(Error::Validation { field: "age", .. })
        ));

        let mut unskilled = testing::draft("Nobody", "nobody@example.com");
        unskilled.skills.clear();
        assert!(matches!(
            repo.register(&unskilled),
            Err(Error::Validation { field: "skills", .. })
        ));
    }

    #[test]
    fn test_apply_update() {
        let repo = Repository::mock();
        let (profile, _) = repo.register(&testing::draft("Alice", "alice@example.com")).unwrap();

        profile
            .apply_update(&ProfileUpdate {
                bio: Some("Looking for a drummer".to_string()),
                genres: Some(vec![Genre::Jazz, Genre::RnB]),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(profile.bio().unwrap(), "Looking for a drummer");
        assert_eq!(profile.genres().unwrap(), vec![Genre::Jazz, Genre::RnB]);
        // Untouched fields keep their values
        assert_eq!(profile.name().unwrap(), "Alice");
    }

    #[test]
    fn test_update_rejects_invalid_values() {
        let repo = Repository::mock();
        let (profile, _) = repo.register(&testing::draft("Alice", "alice@example.com")).unwrap();

        let oversized = "x".repeat(501);
        assert!(matches!(
            profile.set_bio(&oversized),
            Err(Error::Validation { field: "bio", .. })
        ));
        assert_eq!(profile.bio().unwrap(), "");
    }

    #[test]
    fn test_merge_social_links_is_partial() {
        let repo = Repository::mock();
        let (profile, _) = repo.register(&testing::draft("Alice", "alice@example.com")).unwrap();

        profile
            .merge_social_links(&SocialLinks {
                spotify: Some("https://open.spotify.com/artist/alice".to_string()),
                ..Default::default()
            })
            .unwrap();
        profile
            .merge_social_links(&SocialLinks {
                instagram: Some("https://instagram.com/alice".to_string()),
                ..Default::default()
            })
            .unwrap();

        let links = profile.social_links().unwrap();
        assert_eq!(
            links.spotify.as_deref(),
            Some("https://open.spotify.com/artist/alice")
        );
        assert_eq!(links.instagram.as_deref(), Some("https://instagram.com/alice"));
        assert_eq!(links.youtube, None);
    }

    #[test]
    fn test_public_view() {
        let repo = Repository::mock();
        let (profile, _) = repo.register(&testing::draft("Alice", "alice@example.com")).unwrap();

        let public = profile.public().unwrap();

        assert_eq!(public.id, profile.uid());
        assert_eq!(public.name, "Alice");
        assert_eq!(public.skills.len(), 1);
    }

    #[test]
    fn test_discover_excludes_self_and_decided() {
        let repo = Repository::mock();
        let (alice, token) = register(&repo, "alice");
        let (bob, _) = register(&repo, "bob");
        let (carol, _) = register(&repo, "carol");
        let (dave, _) = register(&repo, "dave");

        repo.decide(token.token(), bob.uid(), Verdict::Like).unwrap();
        repo.decide(token.token(), carol.uid(), Verdict::Pass).unwrap();

        let candidates = repo.discover(token.token(), &Filters::default()).unwrap();
        let ids: Vec<Uid> = candidates.iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![dave.uid()]);
        assert!(!ids.contains(&alice.uid()));
    }

    #[test]
    fn test_discover_hides_inactive() {
        let repo = Repository::mock();
        let (_, token) = register(&repo, "alice");
        let (bob, _) = register(&repo, "bob");

        bob.set_active(false).unwrap();

        assert!(repo.discover(token.token(), &Filters::default()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_skill_filter() {
        let repo = Repository::mock();
        let (_, token) = register(&repo, "alice");
        let (bob, _) = register(&repo, "bob");
        let (carol, _) = register(&repo, "carol");

        bob.set_skills(&[Skill {
            name: SkillName::Drummer,
            level: SkillLevel::Intermediate,
            years: 3,
        }])
        .unwrap();

        let filters = Filters {
            required_skills: vec![SkillName::Drummer],
            local_only: false,
        };
        let candidates = repo.discover(token.token(), &filters).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates.first().unwrap().id, bob.uid());
        assert_ne!(candidates.first().unwrap().id, carol.uid());
    }

    #[test]
    fn test_discover_local_filter() {
        let repo = Repository::mock();
        let (_, token) = register(&repo, "alice");
        let (bob, _) = register(&repo, "bob");
        let (_carol, _) = register(&repo, "carol");

        bob.set_location(&Location {
            city: "Portland".to_string(),
            state: "OR".to_string(),
            country: "USA".to_string(),
        })
        .unwrap();

        let filters = Filters {
            required_skills: Vec::new(),
            local_only: true,
        };
        let candidates = repo.discover(token.token(), &filters).unwrap();

        // Everyone but Bob shares the mock draft's city and state
        assert!(candidates.iter().all(|c| c.id != bob.uid()));
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_discover_caps_results() {
        let repo = Repository::mock();
        repo.cfg.write().set_discover_limit(3);

        let (_, token) = register(&repo, "alice");
        for name in ["bob", "carol", "dave", "erin", "frank"] {
            register(&repo, name);
        }

        let candidates = repo.discover(token.token(), &Filters::default()).unwrap();

        assert_eq!(candidates.len(), 3);
    }
}
