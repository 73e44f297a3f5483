//! Core business logic module
//!
//! # Submodules
//!
//! - [`builder`] - Build pipeline and argument assembly
//! - [`options`] - Passthrough option splitting and validation
//! - [`project`] - Project config and name resolution
//! - [`global_config`] - Global configuration management

pub mod builder;
pub mod global_config;
pub mod options;
pub mod project;
