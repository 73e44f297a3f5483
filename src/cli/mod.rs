//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use commands::Commands;
use output::OutputConfig;

use crate::infra::dirs::{StackpackDirs, ENV_HOME};

/// Stackpack - package a project into a container image
///
/// Extracts a build context from the current project and builds it with
/// docker or podman.
#[derive(Parser, Debug)]
#[command(name = "stackpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show what would be done without touching disk or running the build
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Stackpack home directory (default: ~/.stackpack)
    #[arg(long, global = true, env = ENV_HOME, value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Resolved home directory
    pub dirs: StackpackDirs,
    /// Output preferences
    pub output: OutputConfig,
    /// Dry-run mode
    pub dry_run: bool,
    /// Project root (the working directory)
    pub project_dir: PathBuf,
}

impl Cli {
    /// Tracing filter directive matching the verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let Some(cmd) = self.command else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            return Ok(());
        };

        let globals = GlobalOptions {
            dirs: StackpackDirs::resolve(self.home.as_deref()),
            output: OutputConfig::new(self.quiet, self.verbose),
            dry_run: self.dry_run,
            project_dir: std::env::current_dir()?,
        };
        tracing::debug!("Using home directory {}", globals.dirs.home().display());

        cmd.run(&globals).await
    }
}
