use std::sync::Arc;

use parking_lot::RwLock;

use crate::repository::{config::CoreConfig, db::Db};

mod auth;
mod db;

pub mod config;
pub mod entities;

pub(crate) use config::Cfg;
pub use entities::{
    Error, Filters, MatchSummary, Outcome, Profile, ProfileDraft, ProfileUpdate, PublicProfile,
    Result, Session, Uid, Verdict,
    attrs::{Genre, Location, LookingFor, MusicLinks, Skill, SkillLevel, SkillName, SocialLinks},
};

/// Central access point for all persistent data.
///
/// The [`Repository`] owns the graph database and the configuration and
/// exposes every operation of the service: registration and sessions, swipe
/// decisions, the derived relationship queries, and discovery. Every
/// operation except registration and login takes the caller's bearer token
/// and runs as the profile it resolves to.
#[derive(Clone, Debug)]
pub struct Repository {
    db: Db,
    cfg: Cfg,
}

impl Repository {
    pub fn new() -> Self {
        Self {
            db: Db::new(),
            cfg: Arc::new(RwLock::new(CoreConfig::load())),
        }
    }

    /// Create an account and sign it in.
    pub fn register(&self, draft: &ProfileDraft) -> Result<(Profile, Session)> {
        let profile = Profile::add(&self.db, &self.cfg, draft)?;
        let session = Session::issue(&self.db, &profile)?;

        Ok((profile, session))
    }

    /// Verify credentials and issue a fresh session.
    pub fn login(&self, email: &str, password: &str) -> Result<(Profile, Session)> {
        let email = email.trim().to_lowercase();
        let Some(profile) = Profile::find_by_email(&self.db, &self.cfg, &email)? else {
            return Err(Error::InvalidCredentials);
        };
        if !auth::verify_password(password, &profile.password_hash()?) {
            return Err(Error::InvalidCredentials);
        }

        profile.touch_last_seen()?;
        let session = Session::issue(&self.db, &profile)?;

        Ok((profile, session))
    }

    pub fn logout(&self, token: &str) -> Result<()> {
        Session::revoke(&self.db, token)
    }

    /// Resolve a bearer token to the acting profile.
    pub fn resolve_actor(&self, token: &str) -> Result<Profile> {
        Session::resolve(&self.db, &self.cfg, token)
    }

    /// Look up a profile by its public id.
    pub fn profile(&self, uid: Uid) -> Result<Profile> {
        Profile::find_by_uid(&self.db, &self.cfg, uid)?.ok_or(Error::TargetNotFound)
    }

    /// Record the actor's swipe on `target`. A decision that loses an
    /// internal race is retried once before the conflict is surfaced; an
    /// [`Error::AlreadyDecided`] outcome never is.
    pub fn decide(&self, token: &str, target: Uid, verdict: Verdict) -> Result<Outcome> {
        let actor = self.resolve_actor(token)?;
        let target = self.profile(target)?;

        match actor.decide(&target, verdict) {
            Err(Error::StorageConflict) => {
                let actor = self.resolve_actor(token)?;
                actor.decide(&target, verdict)
            }
            outcome => outcome,
        }
    }

    /// All of the actor's matches, most recently seen first.
    pub fn matches(&self, token: &str) -> Result<Vec<PublicProfile>> {
        let actor = self.resolve_actor(token)?;
        let mut matches = actor
            .matches()?
            .iter()
            .map(Profile::public)
            .collect::<Result<Vec<_>>>()?;
        matches.sort_by_key(|profile| std::cmp::Reverse(profile.last_seen));

        Ok(matches)
    }

    /// Profiles that liked the actor and await a response, with their count.
    pub fn pending_likes(&self, token: &str) -> Result<(Vec<PublicProfile>, usize)> {
        let actor = self.resolve_actor(token)?;
        let pending = actor
            .pending_likes()?
            .iter()
            .map(Profile::public)
            .collect::<Result<Vec<_>>>()?;
        let count = pending.len();

        Ok((pending, count))
    }

    /// Active, undecided candidates for the actor to swipe on.
    pub fn discover(&self, token: &str, filters: &Filters) -> Result<Vec<PublicProfile>> {
        let actor = self.resolve_actor(token)?;

        Profile::discover(&self.db, &self.cfg, &actor, filters)?
            .iter()
            .map(Profile::public)
            .collect()
    }

    /// Public view of a single profile.
    pub fn view_profile(&self, token: &str, uid: Uid) -> Result<PublicProfile> {
        self.resolve_actor(token)?;

        self.profile(uid)?.public()
    }

    /// Apply a partial edit to the actor's own profile.
    pub fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<Profile> {
        let actor = self.resolve_actor(token)?;
        actor.apply_update(update)?;

        Ok(actor)
    }

    /// Hide the actor from discovery. Existing matches are untouched.
    pub fn deactivate(&self, token: &str) -> Result<()> {
        self.resolve_actor(token)?.set_active(false)
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] with an in-memory database and default
    /// configuration.
    pub(crate) fn mock() -> Self {
        Self {
            db: Db::in_memory(),
            cfg: Arc::new(RwLock::new(CoreConfig::mock())),
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
