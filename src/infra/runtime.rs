//! Container runtime invocation
//!
//! Runs `docker build` or `podman build` with a prepared argument list,
//! streaming the tool's output line by line. In dry-run mode the command is
//! never spawned.

use std::fmt;
use std::process::Stdio;
use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::config::defaults::RUNTIME_LOG_PREFIX;
use crate::core::builder::BuildRunner;
use crate::error::RuntimeError;

/// Container runtime type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerRuntime {
    /// Docker container runtime
    #[default]
    Docker,
    /// Podman container runtime
    Podman,
}

impl ContainerRuntime {
    /// Get the command name for this runtime
    pub fn command(&self) -> &'static str {
        match self {
            ContainerRuntime::Docker => "docker",
            ContainerRuntime::Podman => "podman",
        }
    }

    /// Check if this runtime's binary is on PATH
    pub fn is_available(&self) -> bool {
        which::which(self.command()).is_ok()
    }

    /// Pick the runtime from CLI flag, then global config, then the default
    pub fn resolve(cli: Option<&str>, config: Option<&str>) -> Result<Self, RuntimeError> {
        match cli.or(config) {
            Some(name) => name.parse(),
            None => Ok(Self::default()),
        }
    }
}

impl FromStr for ContainerRuntime {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "podman" => Ok(Self::Podman),
            _ => Err(RuntimeError::Unknown {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Where streamed runtime output goes
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink {
    /// Suppress runtime output on the terminal
    pub quiet: bool,
    /// Also trace each line at debug level
    pub verbose: bool,
}

impl LogSink {
    /// Whether lines are printed to stdout
    pub fn prints(&self) -> bool {
        !self.quiet
    }

    /// Whether lines are traced; quiet mode keeps them reachable through `RUST_LOG`
    pub fn traces(&self) -> bool {
        self.verbose || self.quiet
    }

    /// Forward one line of runtime output
    pub fn line(&self, line: &str) {
        if self.prints() {
            println!("{RUNTIME_LOG_PREFIX} {line}");
        }
        if self.traces() {
            tracing::debug!(target: "stackpack::runtime", "{line}");
        }
    }
}

/// Runs builds with a container runtime
#[derive(Debug, Clone)]
pub struct RuntimeRunner {
    runtime: ContainerRuntime,
    sink: LogSink,
}

impl RuntimeRunner {
    /// Create a runner for the given runtime
    pub fn new(runtime: ContainerRuntime, sink: LogSink) -> Self {
        Self { runtime, sink }
    }

    /// Full command line for display, e.g. `docker build -t app ...`
    pub fn command_line(&self, args: &[String]) -> String {
        let mut parts = vec![self.runtime.command().to_string(), "build".to_string()];
        parts.extend(args.iter().cloned());
        parts.join(" ")
    }

    async fn run(&self, args: &[String], verbose: bool) -> Result<(), RuntimeError> {
        let command = self.runtime.command();
        if !self.runtime.is_available() {
            return Err(RuntimeError::NotFound {
                command: command.to_string(),
            });
        }

        if verbose {
            tracing::info!("Running: {}", self.command_line(args));
        }

        let mut child = Command::new(command)
            .arg("build")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RuntimeError::Spawn {
                command: command.to_string(),
                error: e.to_string(),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| RuntimeError::Spawn {
            command: command.to_string(),
            error: "failed to capture stdout".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| RuntimeError::Spawn {
            command: command.to_string(),
            error: "failed to capture stderr".to_string(),
        })?;

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();
        let mut stdout_closed = false;
        let mut stderr_closed = false;

        while !(stdout_closed && stderr_closed) {
            tokio::select! {
                line = stdout_lines.next_line(), if !stdout_closed => match line {
                    Ok(Some(line)) => self.sink.line(&line),
                    Ok(None) => stdout_closed = true,
                    Err(e) => {
                        tracing::warn!("Failed to read {command} stdout: {e}");
                        stdout_closed = true;
                    }
                },
                line = stderr_lines.next_line(), if !stderr_closed => match line {
                    Ok(Some(line)) => self.sink.line(&line),
                    Ok(None) => stderr_closed = true,
                    Err(e) => {
                        tracing::warn!("Failed to read {command} stderr: {e}");
                        stderr_closed = true;
                    }
                },
            }
        }

        let status = child.wait().await.map_err(|e| RuntimeError::Spawn {
            command: command.to_string(),
            error: e.to_string(),
        })?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(RuntimeError::BuildFailed {
                command: command.to_string(),
                code,
            }),
            None => Err(RuntimeError::Terminated {
                command: command.to_string(),
            }),
        }
    }
}

impl BuildRunner for RuntimeRunner {
    async fn run_build(
        &self,
        args: &[String],
        verbose: bool,
        dry_run: bool,
    ) -> Result<(), RuntimeError> {
        // The caller reports the skipped command
        if dry_run {
            return Ok(());
        }
        self.run(args, verbose).await
    }
}
