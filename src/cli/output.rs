//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying spinners and
//! formatted status messages to the user.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// User-facing output settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress everything except errors
    pub quiet: bool,
    /// Verbosity level from `-v` flags
    pub verbose: u8,
}

impl OutputConfig {
    /// Create output settings from CLI flags
    pub fn new(quiet: bool, verbose: u8) -> Self {
        Self { quiet, verbose }
    }

    /// Whether verbose output was requested
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Spinners only make sense when nothing else is writing to the terminal
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.verbose == 0
    }

    /// Print a success line
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {message}", status::SUCCESS);
        }
    }

    /// Print an informational line
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {message}", status::INFO);
        }
    }
}

/// Print an error and its cause chain to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}
