//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary project directory plus a separate stackpack home so
/// tests never touch the real `~/.stackpack`.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary stackpack home
    pub home: TempDir,
}

impl TestProject {
    /// Create an empty test project (no `stackpack.toml`)
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            home: TempDir::new().expect("Failed to create temp home"),
        }
    }

    /// Create a project named `name` with a minimal Dockerfile
    pub fn with_name(name: &str) -> Self {
        let project = Self::new();
        project.create_file("stackpack.toml", &format!("[project]\nname = \"{name}\"\n"));
        project.create_file("Dockerfile", SAMPLE_DOCKERFILE);
        project
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Get the path to the stackpack home
    pub fn home_path(&self) -> PathBuf {
        self.home.path().to_path_buf()
    }

    /// Build context directory for a project name
    pub fn context_dir(&self, name: &str) -> PathBuf {
        self.home.path().join("extract").join(name)
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Write the global `config.toml` in the test home
    pub fn write_global_config(&self, content: &str) {
        std::fs::write(self.home.path().join("config.toml"), content)
            .expect("Failed to write config.toml");
    }

    /// Run stackpack in the project with a clean environment
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_path(args, None)
    }

    /// Run stackpack with extra directories prepended to PATH
    pub fn run_with_path(&self, args: &[&str], extra_path: Option<&Path>) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_stackpack"));
        cmd.current_dir(self.path());
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("STACKPACK_RUNTIME");
        cmd.env("STACKPACK_HOME", self.home.path());
        if let Some(dir) = extra_path {
            let path = std::env::var_os("PATH").unwrap_or_default();
            let mut paths = vec![dir.to_path_buf()];
            paths.extend(std::env::split_paths(&path));
            cmd.env("PATH", std::env::join_paths(paths).expect("Failed to join PATH"));
        }
        cmd.args(args);
        cmd.output().expect("Failed to execute stackpack")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Get stdout as a string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as a string
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Install a fake container runtime script that prints its arguments
///
/// The script echoes each argument on its own line, prefixed with `arg:`,
/// and exits with `exit_code`.
#[cfg(unix)]
pub fn fake_runtime(dir: &Path, name: &str, exit_code: i32) {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        "#!/bin/sh\n\
         for a in \"$@\"; do echo \"arg:$a\"; done\n\
         echo \"fake build log\" >&2\n\
         exit {exit_code}\n"
    );
    let path = dir.join(name);
    std::fs::write(&path, script).expect("Failed to write fake runtime");
    let mut perms = std::fs::metadata(&path)
        .expect("Failed to stat fake runtime")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to chmod fake runtime");
}

/// Minimal Dockerfile for test projects
pub const SAMPLE_DOCKERFILE: &str = "FROM scratch\nCOPY . /app\n";
