//! Global configuration management
//!
//! Reads settings from `config.toml` in the stackpack home directory.
//! A missing file means defaults; a malformed one is an error.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::infra::dirs::StackpackDirs;

/// Global configuration for stackpack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default build options
    #[serde(default)]
    pub build: BuildConfig,
}

/// Default build options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Container runtime used for builds (`docker` or `podman`)
    pub runtime: Option<String>,
}

impl GlobalConfig {
    /// Load global configuration from the home directory
    pub fn load(dirs: &StackpackDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No global config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}
