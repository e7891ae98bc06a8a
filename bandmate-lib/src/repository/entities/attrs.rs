//! Profile attribute vocabulary and validation.
//!
//! Skill names, genres, and "looking for" tags are closed sets; anything
//! outside them is rejected rather than stored free-form. The bounds here
//! mirror what the rest of the system assumes (an age under 18 or a sixth
//! picture never reaches the database).

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Serialize, Serializer};
use strum::EnumString;

use crate::repository::entities::{Error, Result};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_BIO_LEN: usize = 500;
pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 100;
pub const MIN_SKILLS: usize = 1;
pub const MAX_SKILLS: usize = 5;
pub const MAX_SKILL_YEARS: u8 = 50;
pub const MAX_PICTURES: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 6;

/// What a musician plays or does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, EnumString)]
#[strum(serialize_all = "title_case")]
pub enum SkillName {
    Singer,
    Guitarist,
    Bassist,
    Drummer,
    Pianist,
    Keyboardist,
    Producer,
    #[strum(serialize = "DJ")]
    Dj,
    Songwriter,
    Composer,
    SoundEngineer,
    Violinist,
    Saxophonist,
    Trumpeter,
    Flutist,
    Cellist,
    Rapper,
    Beatboxer,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display, EnumString)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, EnumString)]
#[strum(serialize_all = "title_case")]
pub enum Genre {
    Rock,
    Pop,
    HipHop,
    #[strum(serialize = "R&B")]
    RnB,
    Jazz,
    Classical,
    Electronic,
    Country,
    Folk,
    Blues,
    Reggae,
    Punk,
    Metal,
    Indie,
    Alternative,
    Soul,
    Funk,
    Gospel,
    Latin,
    World,
    Other,
}

/// What a musician is on the app to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, EnumString)]
#[strum(serialize_all = "title_case")]
pub enum LookingFor {
    BandMembers,
    CollaborationPartners,
    SessionMusicians,
    Producers,
    SongwritingPartners,
    PerformancePartners,
    RecordingPartners,
    JamSessions,
    MusicLessons,
    Mentorship,
}

// The vocabulary enums serialize as their display strings ("Sound Engineer",
// "R&B"), not their variant identifiers.
macro_rules! serialize_as_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )+
    };
}

serialize_as_display!(SkillName, SkillLevel, Genre, LookingFor);

/// One skill entry: what, how well, for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub name: SkillName,
    pub level: SkillLevel,
    pub years: u8,
}

impl Display for Skill {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.level, self.years)
    }
}

impl FromStr for Skill {
    type Err = Error;

    /// Parses `name:level:years`, e.g. `Guitarist:Advanced:3`. Years may be
    /// omitted and default to 0.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');

        let name = parts
            .next()
            .filter(|part| !part.is_empty())
            .ok_or_else(|| invalid("skill", format!("{s:?} is missing a name")))?;
        let name = SkillName::from_str(name.trim())
            .map_err(|_| invalid("skill", format!("unknown skill name {name:?}")))?;

        let level = match parts.next() {
            Some(level) => SkillLevel::from_str(level.trim())
                .map_err(|_| invalid("skill", format!("unknown skill level {level:?}")))?,
            None => return Err(invalid("skill", format!("{s:?} is missing a level"))),
        };

        let years = match parts.next() {
            Some(years) => years
                .trim()
                .parse()
                .map_err(|_| invalid("skill", format!("unparsable years of experience in {s:?}")))?,
            None => 0,
        };

        Ok(Self { name, level, years })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Profile links of a musician. `None` means not set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub spotify: Option<String>,
    pub soundcloud: Option<String>,
    pub youtube: Option<String>,
    pub instagram: Option<String>,
}

/// Embeddable track/video links shown on a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MusicLinks {
    pub spotify_track: Option<String>,
    pub soundcloud_track: Option<String>,
    pub youtube_video: Option<String>,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
    Error::Validation {
        field,
        reason: reason.into(),
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("name", "must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }

    Ok(())
}

/// Check an email address and return it normalized (trimmed, lowercased).
pub(crate) fn validate_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };
    if !well_formed || email.contains(char::is_whitespace) {
        return Err(invalid("email", format!("{email:?} is not an email address")));
    }

    Ok(email)
}

pub(crate) fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(invalid(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    Ok(())
}

pub(crate) fn validate_age(age: u8) -> Result<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(invalid("age", format!("must be between {MIN_AGE} and {MAX_AGE}")));
    }

    Ok(())
}

pub(crate) fn validate_bio(bio: &str) -> Result<()> {
    if bio.len() > MAX_BIO_LEN {
        return Err(invalid(
            "bio",
            format!("must be at most {MAX_BIO_LEN} characters"),
        ));
    }

    Ok(())
}

pub(crate) fn validate_location(location: &Location) -> Result<()> {
    if location.city.trim().is_empty()
        || location.state.trim().is_empty()
        || location.country.trim().is_empty()
    {
        return Err(invalid("location", "city, state, and country are required"));
    }

    Ok(())
}

pub(crate) fn validate_skills(skills: &[Skill]) -> Result<()> {
    if !(MIN_SKILLS..=MAX_SKILLS).contains(&skills.len()) {
        return Err(invalid(
            "skills",
            format!("must have between {MIN_SKILLS} and {MAX_SKILLS} entries"),
        ));
    }
    for skill in skills {
        if skill.years > MAX_SKILL_YEARS {
            return Err(invalid(
                "skills",
                format!("years of experience must be at most {MAX_SKILL_YEARS}"),
            ));
        }
    }

    Ok(())
}

pub(crate) fn validate_pictures(pictures: &[String]) -> Result<()> {
    if pictures.len() > MAX_PICTURES {
        return Err(invalid(
            "pictures",
            format!("at most {MAX_PICTURES} pictures allowed"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_vocabulary_strings() {
        assert_eq!(SkillName::SoundEngineer.to_string(), "Sound Engineer");
        assert_eq!(SkillName::Dj.to_string(), "DJ");
        assert_eq!(Genre::HipHop.to_string(), "Hip Hop");
        assert_eq!(Genre::RnB.to_string(), "R&B");
        assert_eq!(LookingFor::BandMembers.to_string(), "Band Members");

        assert_eq!(Genre::from_str("R&B").unwrap(), Genre::RnB);
        assert_eq!(
            LookingFor::from_str("Jam Sessions").unwrap(),
            LookingFor::JamSessions
        );
        assert!(Genre::from_str("Vaporwave").is_err());
    }

    #[test]
    fn test_skill_roundtrip() {
        let skill = Skill {
            name: SkillName::SoundEngineer,
            level: SkillLevel::Professional,
            years: 12,
        };

        assert_eq!(skill.to_string(), "Sound Engineer:Professional:12");
        assert_eq!(Skill::from_str(&skill.to_string()).unwrap(), skill);
    }

    #[test]
    fn test_skill_years_default_to_zero() {
        let skill = Skill::from_str("Drummer:Beginner").unwrap();

        assert_eq!(skill.years, 0);
    }

    #[test]
    fn test_skill_rejects_unknown_name() {
        assert!(matches!(
            Skill::from_str("Triangle Virtuoso:Advanced:2"),
            Err(Error::Validation { field: "skill", .. })
        ));
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(
            validate_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_age_bounds() {
        assert!(validate_age(17).is_err());
        assert!(validate_age(18).is_ok());
        assert!(validate_age(100).is_ok());
        assert!(validate_age(101).is_err());
    }

    #[test]
    fn test_skill_count_bounds() {
        let skill = Skill {
            name: SkillName::Singer,
            level: SkillLevel::Beginner,
            years: 1,
        };

        assert!(validate_skills(&[]).is_err());
        assert!(validate_skills(&vec![skill; 5]).is_ok());
        assert!(validate_skills(&vec![skill; 6]).is_err());
    }

    #[test]
    fn test_picture_count_bounds() {
        let six: Vec<String> = (0..6).map(|i| format!("pic{i}.jpg")).collect();
        let seven: Vec<String> = (0..7).map(|i| format!("pic{i}.jpg")).collect();

        assert!(validate_pictures(&six).is_ok());
        assert!(validate_pictures(&seven).is_err());
    }
}
