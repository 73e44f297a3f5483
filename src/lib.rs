//! Stackpack - package a project into a container image
//!
//! This library extracts a build context from a project directory and
//! delegates the image build to docker or podman.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Build pipeline, option validation, project and config handling
//! - [`infra`] - Infrastructure layer (filesystem, extraction, container runtime)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
