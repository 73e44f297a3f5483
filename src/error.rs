//! Error types for stackpack
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Passthrough option validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// Option overrides a flag the build command sets itself
    #[error("{option} is not allowed in --docker-options")]
    NotAllowed { option: String },
}

/// Project resolution errors
#[derive(Error, Debug)]
pub enum ProjectError {
    /// No project config in the directory
    #[error("No {file} found in {path}. Is this a stackpack project?")]
    NotAProject { path: PathBuf, file: String },

    /// Failed to parse the project config
    #[error("Failed to parse '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// Name could not be derived
    #[error("Could not derive a project name from '{path}'")]
    NoName { path: PathBuf },

    /// Filesystem error while reading the project
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Build context extraction errors
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Source descriptor file missing from the project
    #[error("Dockerfile not found at '{path}'")]
    MissingDockerfile { path: PathBuf },

    /// Failed to copy a project entry into the build context
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to walk the project tree
    #[error("Failed to read project tree under '{path}': {error}")]
    WalkFailed { path: PathBuf, error: String },

    /// Project could not be loaded
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Container runtime errors
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Runtime binary not found in PATH
    #[error("'{command}' not found in PATH. Install it or choose another runtime with --runtime")]
    NotFound { command: String },

    /// Unknown runtime name
    #[error("Unknown container runtime '{name}': expected 'docker' or 'podman'")]
    Unknown { name: String },

    /// Failed to launch the runtime
    #[error("Failed to run '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Build exited with a failure status
    #[error("{command} build failed with exit code {code}")]
    BuildFailed { command: String, code: i32 },

    /// Build was terminated by a signal
    #[error("{command} build was terminated by a signal")]
    Terminated { command: String },
}

/// Global configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to copy file
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Errors surfaced by the build pipeline
///
/// Extraction and execution errors are carried through unchanged; project
/// resolution gets a line of context.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Extraction failed
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Project name could not be resolved
    #[error("Failed to resolve project name: {0}")]
    Project(#[from] ProjectError),

    /// Disallowed passthrough option
    #[error(transparent)]
    Option(#[from] OptionError),

    /// Container build failed
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
