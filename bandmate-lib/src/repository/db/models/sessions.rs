use agdb::{DbElement, DbId};

#[derive(Debug, Clone, DbElement, PartialEq, PartialOrd)]
pub(crate) struct SessionModel {
    db_id: Option<DbId>,
    token: String,
    issued_at: i64,
}

impl SessionModel {
    pub fn new(token: &str, issued_at: i64) -> Self {
        Self {
            db_id: None,
            token: token.to_string(),
            issued_at,
        }
    }
}
