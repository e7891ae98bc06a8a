//! Core domain entities for Bandmate.
//!
//! These types represent profiles, swipe decisions, and sessions. They
//! provide a unified interface for inspecting and mutating these elements,
//! handling all necessary database operations behind the scenes.

use std::fmt::Debug;

use agdb::{DbId, DbValue, QueryBuilder};
use derive_more::{Display, From};
use serde::Serialize;
use thiserror::Error;

use crate::repository::db::Db;

pub mod attrs;

mod decision;
mod entity_id;
mod profile;
mod session;

pub use decision::{MatchSummary, Outcome, Verdict};
pub use profile::{Filters, Profile, ProfileDraft, ProfileUpdate, PublicProfile};
pub use session::Session;

pub(crate) use entity_id::EntityId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Internal database error {0}")]
    Internal(#[from] agdb::DbError),
    #[error("This handle refers to a profile that no longer exists")]
    RemovedEntity,
    #[error("No profile exists with the requested id")]
    TargetNotFound,
    #[error("A decision on this profile has already been recorded")]
    AlreadyDecided,
    #[error("A profile cannot swipe on itself")]
    SelfDecision,
    #[error("Unknown swipe action {0:?}, expected \"like\" or \"pass\"")]
    InvalidAction(String),
    #[error("A profile with this email already exists")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Missing or expired session token")]
    Unauthenticated,
    #[error("Failed to hash the supplied password")]
    PasswordHash,
    #[error("Invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
    #[error("A concurrent update to the same profiles won the race")]
    StorageConflict,
}

/// A stable identifier for a profile, allocated from the `next_uid` counter
/// node and never reused. This is the id clients see; the underlying graph
/// node id may be recycled after removals, a UID may not.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize,
)]
pub struct Uid(pub(crate) u64);

impl Uid {
    /// Allocate the next UID, bumping the counter node.
    pub(crate) fn new(db: &Db) -> Result<Self> {
        let uid = db.write().transaction_mut(|t| -> Result<u64> {
            let uid = t
                .exec(
                    QueryBuilder::select()
                        .values("next_uid")
                        .ids("next_uid")
                        .query(),
                )?
                .elements
                .pop()
                .expect("successful queries should not be empty")
                .values
                .pop()
                .expect("successful queries should not be empty")
                .value
                .to_u64()?;

            t.exec_mut(
                QueryBuilder::insert()
                    .values([[("next_uid", uid + 1).into()]])
                    .ids("next_uid")
                    .query(),
            )?;

            Ok(uid)
        })?;

        Ok(Self(uid))
    }

    /// Read the UID stored on an existing element.
    pub(crate) fn load(db: &Db, db_id: DbId) -> Result<Self> {
        let uid = db
            .read()
            .exec(QueryBuilder::select().values("uid").ids(db_id).query())?
            .elements
            .pop()
            .expect("successful queries should not be empty")
            .values
            .pop()
            .expect("successful queries should not be empty")
            .value
            .to_u64()?;

        Ok(Self(uid))
    }
}

impl From<Uid> for DbValue {
    fn from(uid: Uid) -> Self {
        uid.0.into()
    }
}

pub(crate) fn get_field<T>(db: &Db, id: EntityId, field: &str) -> Result<T>
where
    T: TryFrom<DbValue>,
    T::Error: Debug,
{
    let db_id = id.db_id(db)?;
    let value = db
        .read()
        .exec(QueryBuilder::select().values(field).ids(db_id).query())?
        .elements
        .pop()
        .expect("successful queries should not be empty")
        .values
        .pop()
        .expect("successful queries should not be empty")
        .value;

    Ok(T::try_from(value).expect("conversion from a `DbValue` must succeed"))
}

pub(crate) fn set_field<T>(db: &Db, id: EntityId, field: &str, value: T) -> Result<()>
where
    T: Into<DbValue>,
{
    let db_id = id.db_id(db)?;
    db.write().exec_mut(
        QueryBuilder::insert()
            .values([[(field, value).into()]])
            .ids(db_id)
            .query(),
    )?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{
        attrs::{Location, Skill, SkillLevel, SkillName},
        profile::ProfileDraft,
    };

    /// A valid registration draft with a distinguishable name and email.
    pub fn draft(name: &str, email: &str) -> ProfileDraft {
        ProfileDraft {
            name: name.to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
            age: 27,
            bio: String::new(),
            location: Location {
                city: "Austin".to_string(),
                state: "TX".to_string(),
                country: "USA".to_string(),
            },
            skills: vec![Skill {
                name: SkillName::Guitarist,
                level: SkillLevel::Advanced,
                years: 8,
            }],
            genres: Vec::new(),
            looking_for: Vec::new(),
        }
    }
}
