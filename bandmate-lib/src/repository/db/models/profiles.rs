use agdb::{DbElement, DbId};

use crate::repository::entities::{ProfileDraft, Uid};

/// Flat storage layout of a musician profile. Skill entries are stored in
/// their `name:level:years` string form; link fields use the empty string for
/// "not set", mirroring their defaults at registration.
#[derive(Debug, Clone, DbElement, PartialEq, PartialOrd)]
pub(crate) struct ProfileModel {
    db_id: Option<DbId>,
    uid: u64,
    name: String,
    email: String,
    password_hash: String,
    age: u64,
    bio: String,
    city: String,
    state: String,
    country: String,
    pictures: Vec<String>,
    skills: Vec<String>,
    genres: Vec<String>,
    looking_for: Vec<String>,
    spotify: String,
    soundcloud: String,
    youtube: String,
    instagram: String,
    spotify_track: String,
    soundcloud_track: String,
    youtube_video: String,
    active: bool,
    last_seen: i64,
    created_at: i64,
}

impl ProfileModel {
    pub fn new(uid: Uid, draft: &ProfileDraft, email: &str, password_hash: String, now: i64) -> Self {
        Self {
            db_id: None,
            uid: uid.0,
            name: draft.name.trim().to_string(),
            email: email.to_string(),
            password_hash,
            age: u64::from(draft.age),
            bio: draft.bio.clone(),
            city: draft.location.city.clone(),
            state: draft.location.state.clone(),
            country: draft.location.country.clone(),
            pictures: Vec::new(),
            skills: draft.skills.iter().map(ToString::to_string).collect(),
            genres: draft.genres.iter().map(ToString::to_string).collect(),
            looking_for: draft.looking_for.iter().map(ToString::to_string).collect(),
            spotify: String::new(),
            soundcloud: String::new(),
            youtube: String::new(),
            instagram: String::new(),
            spotify_track: String::new(),
            soundcloud_track: String::new(),
            youtube_video: String::new(),
            active: true,
            last_seen: now,
            created_at: now,
        }
    }
}
