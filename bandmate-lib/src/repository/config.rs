use std::{fs, path::Path, sync::Arc};

use getset::CopyGetters;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fs::config_dir;

pub(crate) type Cfg = Arc<RwLock<CoreConfig>>;

/// User-tunable settings, read from `config.toml` in the Bandmate
/// configuration directory. Missing or malformed files fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, CopyGetters)]
pub struct CoreConfig {
    /// Maximum number of candidates a single discovery query returns.
    #[serde(default = "defaults::discover_limit")]
    #[getset(get_copy = "pub")]
    discover_limit: usize,
    /// Sessions older than this many days stop resolving.
    #[serde(default = "defaults::session_ttl_days")]
    #[getset(get_copy = "pub")]
    session_ttl_days: i64,
}

impl CoreConfig {
    pub(crate) fn load() -> Self {
        Self::load_from(&config_dir().join("config.toml"))
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_else(|err| {
                warn!("Ignoring malformed {}: {err}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn set_discover_limit(&mut self, limit: usize) {
        self.discover_limit = limit;
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            discover_limit: defaults::discover_limit(),
            session_ttl_days: defaults::session_ttl_days(),
        }
    }
}

mod defaults {
    pub fn discover_limit() -> usize {
        20
    }

    pub fn session_ttl_days() -> i64 {
        7
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let config = CoreConfig::load_from(Path::new("/nonexistent/config.toml"));

        assert_eq!(config.discover_limit(), 20);
        assert_eq!(config.session_ttl_days(), 7);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "discover_limit = 5").unwrap();

        let config = CoreConfig::load_from(file.path());

        assert_eq!(config.discover_limit(), 5);
        // Unspecified keys keep their defaults
        assert_eq!(config.session_ttl_days(), 7);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "discover_limit = \"twenty\"").unwrap();

        let config = CoreConfig::load_from(file.path());

        assert_eq!(config.discover_limit(), 20);
    }
}
