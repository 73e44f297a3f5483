//! Project configuration and name resolution
//!
//! A stackpack project is any directory with a `stackpack.toml` at its root.
//! The project name doubles as the default image tag and the name of the
//! build context directory, so it is normalized to something a container
//! engine accepts as a repository name.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::defaults::{DESCRIPTOR_FILE, PROJECT_CONFIG_FILE, PROJECT_NAME_PREFIX};
use crate::core::builder::ProjectResolver;
use crate::error::ProjectError;
use crate::infra::filesystem;

/// Contents of `stackpack.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project settings
    #[serde(default)]
    pub project: ProjectSection,

    /// Extraction settings
    #[serde(default)]
    pub extract: ExtractSection,
}

/// `[project]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Explicit project name
    pub name: Option<String>,

    /// Dockerfile to use, relative to the project root
    pub dockerfile: Option<PathBuf>,
}

/// `[extract]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractSection {
    /// Extra top-level entries to leave out of the build context
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ProjectConfig {
    /// Parse a project config from TOML
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Source Dockerfile path relative to the project root
    pub fn dockerfile(&self) -> &Path {
        self.project
            .dockerfile
            .as_deref()
            .unwrap_or_else(|| Path::new(DESCRIPTOR_FILE))
    }
}

/// A loaded project
#[derive(Debug, Clone)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,
    /// Parsed `stackpack.toml`
    pub config: ProjectConfig,
}

impl Project {
    /// Load the project rooted at `root`
    pub fn load(root: &Path) -> Result<Self, ProjectError> {
        let config_path = root.join(PROJECT_CONFIG_FILE);
        if !config_path.is_file() {
            return Err(ProjectError::NotAProject {
                path: root.to_path_buf(),
                file: PROJECT_CONFIG_FILE.to_string(),
            });
        }

        let content = filesystem::read_file(&config_path)?;
        let config = ProjectConfig::from_toml(&content).map_err(|e| ProjectError::ParseError {
            path: config_path,
            error: e.to_string(),
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Resolve the normalized project name
    ///
    /// Uses `[project].name` when set, otherwise the root directory's name.
    pub fn name(&self) -> Result<String, ProjectError> {
        let raw = match self.config.project.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => dir_name(&self.root).ok_or_else(|| ProjectError::NoName {
                path: self.root.clone(),
            })?,
        };

        Ok(normalize_name(&raw))
    }

    /// Absolute path of the project's source Dockerfile
    pub fn dockerfile_path(&self) -> PathBuf {
        self.root.join(self.config.dockerfile())
    }
}

/// Resolves the name of the project rooted at a directory
#[derive(Debug, Clone)]
pub struct ProjectLocator {
    root: PathBuf,
}

impl ProjectLocator {
    /// Locate the project at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ProjectResolver for ProjectLocator {
    fn project_name(&self) -> Result<String, ProjectError> {
        Project::load(&self.root)?.name()
    }
}

fn dir_name(path: &Path) -> Option<String> {
    let canonical = path.canonicalize().ok();
    canonical
        .as_deref()
        .unwrap_or(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9._-]").expect("name character pattern is valid"))
}

/// Turn an arbitrary name into a valid image repository name
///
/// Lower-cases, replaces anything outside `[a-z0-9._-]` with `-`, and
/// prefixes `stackpack-` when the result would not start with `[a-z0-9]`.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let name = invalid_chars().replace_all(&lowered, "-").into_owned();

    match name.chars().next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => name,
        _ => format!("{PROJECT_NAME_PREFIX}{name}"),
    }
}
