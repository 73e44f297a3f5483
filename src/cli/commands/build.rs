//! Build command implementation
//!
//! Implements `stackpack build`: extract the project, then build the
//! extracted context into an image.

use anyhow::{Context, Result};

use crate::cli::GlobalOptions;
use crate::core::builder::{BuildOrchestrator, BuildRequest};
use crate::core::global_config::GlobalConfig;
use crate::core::project::ProjectLocator;
use crate::infra::extract::LocalExtractor;
use crate::infra::runtime::{ContainerRuntime, LogSink, RuntimeRunner};

/// Build options
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Image name and optional tag
    pub tag: Option<String>,
    /// Raw passthrough options for the build tool
    pub docker_options: Option<String>,
    /// Container runtime override
    pub runtime: Option<String>,
}

/// Execute the build command
pub async fn execute(globals: &GlobalOptions, options: BuildOptions) -> Result<()> {
    let config = GlobalConfig::load(&globals.dirs).context("Failed to load global config")?;
    let runtime = ContainerRuntime::resolve(
        options.runtime.as_deref(),
        config.build.runtime.as_deref(),
    )?;
    tracing::debug!("Using container runtime {runtime}");

    let runner = RuntimeRunner::new(
        runtime,
        LogSink {
            quiet: globals.output.quiet,
            verbose: globals.output.is_verbose(),
        },
    );
    let extractor =
        LocalExtractor::new(globals.dirs.clone(), &globals.project_dir, globals.dry_run);
    let resolver = ProjectLocator::new(&globals.project_dir);
    let orchestrator =
        BuildOrchestrator::new(globals.dirs.clone(), extractor, resolver, runner.clone());

    let request = BuildRequest {
        tag: options.tag,
        docker_options: options.docker_options,
        verbose: globals.output.is_verbose(),
        dry_run: globals.dry_run,
    };

    let outcome = orchestrator.build(&request).await?;

    if outcome.dry_run {
        globals.output.info(&format!(
            "Dry run - skipping command: {}",
            runner.command_line(&outcome.args)
        ));
    }
    if let Some(message) = outcome.confirmation() {
        globals.output.success(&message);
    }

    Ok(())
}
