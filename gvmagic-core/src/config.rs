//! Optional user configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.gvmagic/
//!   config.yaml
//! ```
//!
//! # API pattern
//!
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Contents of `config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GvConfig {
    /// Path to the `dot` executable; skips the discovery heuristic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,

    /// Kill the layout engine after this many seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl GvConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// `<home>/.gvmagic/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".gvmagic").join("config.yaml")
}

/// Load the config under `home`; a missing file yields [`GvConfig::default`].
pub fn load_at(home: &Path) -> Result<GvConfig, ConfigError> {
    let path = config_path_at(home);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(GvConfig::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    if raw.trim().is_empty() {
        return Ok(GvConfig::default());
    }

    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}

/// Load the config from the current user's home directory.
pub fn load() -> Result<GvConfig, ConfigError> {
    load_at(&home()?)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let home = tempfile::TempDir::new().unwrap();
        let path = config_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "\n").unwrap();

        assert_eq!(load_at(home.path()).unwrap(), GvConfig::default());
    }

    #[test]
    fn timeout_converts_seconds() {
        let cfg = GvConfig {
            executable: None,
            timeout_secs: Some(3),
        };
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(3)));
    }
}
