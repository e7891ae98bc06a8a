//! Where the CLI keeps the current session token between invocations.

use std::{fs, path::PathBuf};

use bandmate_lib::{Error, Result, fs::state_dir};

fn token_path() -> PathBuf {
    state_dir().join("session-token")
}

pub fn store(token: &str) {
    fs::write(token_path(), token).unwrap();
}

/// The token of the signed-in account, or `Unauthenticated` if nobody is.
pub fn load() -> Result<String> {
    fs::read_to_string(token_path())
        .map(|token| token.trim().to_string())
        .map_err(|_| Error::Unauthenticated)
}

pub fn clear() {
    let _ = fs::remove_file(token_path());
}
