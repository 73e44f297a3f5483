//! Default configuration values

/// Project config file expected at the project root
pub const PROJECT_CONFIG_FILE: &str = "stackpack.toml";

/// Global config file under the home directory
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Subdirectory of the home directory that holds build contexts
pub const EXTRACT_SUBDIR: &str = "extract";

/// Descriptor file name inside every build context
pub const DESCRIPTOR_FILE: &str = "Dockerfile";

/// Top-level entries never copied into a build context
pub const ALWAYS_EXCLUDED: &[&str] = &[".git", ".stackpack"];

/// Prefix for project names that would otherwise start with a symbol
pub const PROJECT_NAME_PREFIX: &str = "stackpack-";

/// Prefix for lines streamed from the container runtime
pub const RUNTIME_LOG_PREFIX: &str = "[Docker]";
