//! TOML configuration with per-section defaults.

use crate::animation::AnimationTuning;
use crate::background::BackgroundConfig;
use crate::contact::RelayConfig;
use crate::page::Profile;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_SERVICE_ID: &str = "FOLIO3D_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "FOLIO3D_TEMPLATE_ID";
pub const ENV_PUBLIC_KEY: &str = "FOLIO3D_PUBLIC_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub fps: u32,
    /// Optional rig asset; the built-in figure is used when unset
    pub rig: Option<PathBuf>,
    pub light_position: [f64; 3],
    pub zoom: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            fps: 60,
            rig: None,
            light_position: [4.0, 4.0, 6.0],
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub profile: Profile,
    pub animation: AnimationTuning,
    pub background: BackgroundConfig,
    pub relay: RelayConfig,
    pub display: DisplayConfig,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "folio3d", "folio3d").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "folio3d", "folio3d").map(|dirs| dirs.data_dir().to_path_buf())
    }

    pub fn from_toml(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An explicit path must exist; a missing file at the default location yields defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Config::default()),
            },
        };

        match fs::read_to_string(&path) {
            Ok(raw) => {
                tracing::debug!("loading config from {}", path.display());
                Self::from_toml(&raw, &path)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Config::default())
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    /// Relay tokens from the environment take precedence over the file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let slots = [
            (ENV_SERVICE_ID, &mut self.relay.service_id),
            (ENV_TEMPLATE_ID, &mut self.relay.template_id),
            (ENV_PUBLIC_KEY, &mut self.relay.public_key),
        ];
        for (key, slot) in slots {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = Some(value);
            }
        }
    }
}
