//! Bearer sessions.
//!
//! A session is a node linked from the `"sessions"` root with one outgoing
//! edge to its profile. The token is an opaque UUID. Every resolution failure
//! (unknown, revoked, expired) is the same `Unauthenticated` error, so
//! callers learn nothing about why a credential stopped working.

use agdb::{Comparison, QueryBuilder};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::repository::{
    Cfg,
    db::{
        Db,
        models::{ProfileModel, SessionModel},
    },
    entities::{Error, Profile, Result},
};

/// An issued bearer credential.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
}

impl Session {
    /// The opaque token the client presents on every call.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Issue a fresh session for `profile`.
    pub(crate) fn issue(db: &Db, profile: &Profile) -> Result<Self> {
        let token = Uuid::new_v4().to_string();
        let model = SessionModel::new(&token, Utc::now().timestamp_millis());
        let profile_id = profile.id.db_id(db)?;

        db.write().transaction_mut(|t| -> Result<()> {
            let session_id = t
                .exec_mut(QueryBuilder::insert().element(model).query())?
                .elements
                .first()
                .expect("SessionModel insertion should return the ID as the first element")
                .id;

            t.exec_mut(
                QueryBuilder::insert()
                    .edges()
                    .from("sessions")
                    .to(session_id)
                    .query(),
            )?;
            t.exec_mut(
                QueryBuilder::insert()
                    .edges()
                    .from(session_id)
                    .to(profile_id)
                    .query(),
            )?;

            Ok(())
        })?;

        debug!("Issued session for profile {}", profile.uid());

        Ok(Self { token })
    }

    /// Resolve a bearer token to its profile, removing it if it has expired.
    pub(crate) fn resolve(db: &Db, cfg: &Cfg, token: &str) -> Result<Profile> {
        let elements = db
            .read()
            .exec(
                QueryBuilder::select()
                    .search()
                    .from("sessions")
                    .where_()
                    .key("token")
                    .value(Comparison::Equal(token.into()))
                    .query(),
            )?
            .elements;
        let Some(session) = elements.first() else {
            return Err(Error::Unauthenticated);
        };

        let issued_at = session
            .values
            .iter()
            .find(|kv| kv.key == "issued_at".into())
            .expect("session nodes carry an issue timestamp")
            .value
            .to_i64()?;
        let ttl_ms = cfg.read().session_ttl_days() * 24 * 60 * 60 * 1000;
        if Utc::now().timestamp_millis() - issued_at > ttl_ms {
            db.write()
                .exec_mut(QueryBuilder::remove().ids(session.id).query())?;
            debug!("Removed expired session");
            return Err(Error::Unauthenticated);
        }

        // The session's only outgoing edge points at its profile
        let profile_id = db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<ProfileModel>()
                    .search()
                    .from(session.id)
                    .where_()
                    .node()
                    .and()
                    .neighbor()
                    .query(),
            )?
            .elements
            .first()
            .map(|e| e.id)
            .ok_or(Error::Unauthenticated)?;

        Profile::load(profile_id, db.clone(), cfg.clone())
    }

    /// Drop a session. Unknown tokens are a no-op: revoking twice is fine.
    pub(crate) fn revoke(db: &Db, token: &str) -> Result<()> {
        let elements = db
            .read()
            .exec(
                QueryBuilder::select()
                    .search()
                    .from("sessions")
                    .where_()
                    .key("token")
                    .value(Comparison::Equal(token.into()))
                    .query(),
            )?
            .elements;

        if let Some(session) = elements.first() {
            db.write()
                .exec_mut(QueryBuilder::remove().ids(session.id).query())?;
            debug!("Revoked session");
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use agdb::QueryBuilder;

    use super::*;
    use crate::repository::{Repository, entities::testing};

    #[test]
    fn test_login_roundtrip() {
        let repo = Repository::mock();
        repo.register(&testing::draft("Alice", "alice@example.com"))
            .unwrap();

        let (profile, session) = repo.login("alice@example.com", "hunter22").unwrap();

        assert_eq!(profile.name().unwrap(), "Alice");
        assert_eq!(
            repo.resolve_actor(session.token()).unwrap().uid(),
            profile.uid()
        );
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let repo = Repository::mock();
        repo.register(&testing::draft("Alice", "alice@example.com"))
            .unwrap();

        assert!(matches!(
            repo.login("alice@example.com", "wrong-password"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            repo.login("nobody@example.com", "hunter22"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_touches_last_seen() {
        let repo = Repository::mock();
        let (profile, _) = repo
            .register(&testing::draft("Alice", "alice@example.com"))
            .unwrap();

        // Backdate, then log in again
        profile.set_field("last_seen", 0_i64).unwrap();
        repo.login("alice@example.com", "hunter22").unwrap();

        assert!(profile.last_seen().unwrap() > 0);
    }

    #[test]
    fn test_unknown_token_is_unauthenticated() {
        let repo = Repository::mock();

        assert!(matches!(
            repo.resolve_actor("no-such-token"),
            Err(Error::Unauthenticated)
        ));
    }

    #[test]
    fn test_logout_revokes() {
        let repo = Repository::mock();
        let (_, session) = repo
            .register(&testing::draft("Alice", "alice@example.com"))
            .unwrap();

        repo.logout(session.token()).unwrap();

        assert!(matches!(
            repo.resolve_actor(session.token()),
            Err(Error::Unauthenticated)
        ));
        // Logging out again is harmless
        repo.logout(session.token()).unwrap();
    }

    #[test]
    fn test_expired_session_stops_resolving() {
        let repo = Repository::mock();
        let (_, session) = repo
            .register(&testing::draft("Alice", "alice@example.com"))
            .unwrap();

        // Backdate the session past the TTL
        let node = repo
            .db
            .read()
            .exec(
                QueryBuilder::select()
                    .search()
                    .from("sessions")
                    .where_()
                    .key("token")
                    .value(Comparison::Equal(session.token().into()))
                    .query(),
            )
            .unwrap()
            .elements
            .first()
            .unwrap()
            .id;
        repo.db
            .write()
            .exec_mut(
                QueryBuilder::insert()
                    .values([[("issued_at", 0_i64).into()]])
                    .ids(node)
                    .query(),
            )
            .unwrap();

        assert!(matches!(
            repo.resolve_actor(session.token()),
            Err(Error::Unauthenticated)
        ));
    }
}
