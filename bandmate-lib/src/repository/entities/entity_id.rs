use agdb::DbId;
use derive_more::PartialEq;

use crate::repository::{
    db::Db,
    entities::{Error, Result, Uid},
};

/// Pins a graph element together with the UID it carried when the handle was
/// created, so a recycled node id can be told apart from the entity it used
/// to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EntityId {
    #[partial_eq(ignore)]
    db_id: DbId,
    uid: Uid,
}

impl EntityId {
    /// Load an [`EntityId`] from an existing element.
    pub fn load(db: &Db, db_id: DbId) -> Result<Self> {
        Ok(Self {
            db_id,
            uid: Uid::load(db, db_id)?,
        })
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Get the underlying [`DbId`]. This will check to make sure it isn't stale before returning.
    pub fn db_id(&self, db: &Db) -> Result<DbId> {
        let uid = Uid::load(db, self.db_id).map_err(|err| {
            match err {
                Error::Internal(e) => {
                    // agdb reports missing ids only through the error description
                    let not_found = format!("Id '{}' not found", self.db_id.as_index());
                    if e.description == not_found {
                        Error::RemovedEntity
                    } else {
                        Error::Internal(e)
                    }
                }
                other => other,
            }
        })?;

        // If the UID changed, that means this DbId now refers to a different or deleted entity
        if uid != self.uid {
            return Err(Error::RemovedEntity);
        }

        Ok(self.db_id)
    }
}
