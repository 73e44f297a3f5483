//! Home directory management
//!
//! All state stackpack writes lives under a single home directory:
//!
//! ```text
//! <home>/
//!   config.toml          global settings
//!   extract/<project>/   build context produced by extraction
//! ```
//!
//! The home directory is resolved from, in order:
//! - the `--home` flag (which clap also fills from `STACKPACK_HOME`)
//! - `~/.stackpack`
//! - `./.stackpack` when no user home can be determined

use std::path::{Path, PathBuf};

use crate::config::defaults::{DESCRIPTOR_FILE, EXTRACT_SUBDIR, GLOBAL_CONFIG_FILE};

/// Environment variable that overrides the home directory
pub const ENV_HOME: &str = "STACKPACK_HOME";

/// Directory name used under the user's home
const HOME_DIR_NAME: &str = ".stackpack";

/// Directory provider for stackpack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackpackDirs {
    home: PathBuf,
}

impl StackpackDirs {
    /// Resolve the home directory, preferring an explicit override
    #[must_use]
    pub fn resolve(home_override: Option<&Path>) -> Self {
        match home_override {
            Some(path) if !path.as_os_str().is_empty() => Self::with_home(path),
            _ => Self::with_home(Self::platform_home()),
        }
    }

    /// Use a fixed home directory
    #[must_use]
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Get the home directory path
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory holding every extracted build context
    #[must_use]
    pub fn extract_root(&self) -> PathBuf {
        self.home.join(EXTRACT_SUBDIR)
    }

    /// Build context directory for a project: `<home>/extract/<project>`
    #[must_use]
    pub fn extract_dir(&self, project_name: &str) -> PathBuf {
        self.extract_root().join(project_name)
    }

    /// Dockerfile inside a project's build context
    #[must_use]
    pub fn dockerfile(&self, project_name: &str) -> PathBuf {
        self.extract_dir(project_name).join(DESCRIPTOR_FILE)
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.home.join(GLOBAL_CONFIG_FILE)
    }

    fn platform_home() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(HOME_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".").join(HOME_DIR_NAME))
    }
}

impl Default for StackpackDirs {
    fn default() -> Self {
        Self::resolve(None)
    }
}
