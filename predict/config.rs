//! Server settings, read from an optional TOML file and overridden by flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Looked up in the working directory when no file is named explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "multidx.toml";

pub const DEFAULT_PORT: u16 = 8501;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the three `*_model.toml` artifacts.
    pub model_dir: PathBuf,
    pub bind: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An explicit path must exist. Without one, `multidx.toml` is used when
    /// present and the defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    log::info!("Using configuration from {DEFAULT_CONFIG_FILE}");
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Flag values win over file values.
    pub fn with_overrides(mut self, model_dir: Option<PathBuf>, bind: Option<SocketAddr>) -> Self {
        if let Some(dir) = model_dir {
            self.model_dir = dir;
        }
        if let Some(addr) = bind {
            self.bind = addr;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("multidx.toml");
        fs::write(&path, "model_dir = \"/srv/models\"\n").expect("write config");

        let settings = Settings::load(&path).expect("load config");
        assert_eq!(settings.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(settings.bind, Settings::default().bind);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("multidx.toml");
        fs::write(&path, "port = 80\n").expect("write config");

        assert!(matches!(
            Settings::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().expect("temporary directory");
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Settings::resolve(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn flags_override_file_values() {
        let addr: SocketAddr = "0.0.0.0:9000".parse().expect("socket address");
        let settings = Settings::default().with_overrides(Some(PathBuf::from("m")), Some(addr));
        assert_eq!(settings.model_dir, PathBuf::from("m"));
        assert_eq!(settings.bind, addr);

        let untouched = Settings::default().with_overrides(None, None);
        assert_eq!(untouched, Settings::default());
    }
}
