//! Build orchestration logic
//!
//! Runs the image build pipeline for one invocation:
//!
//! 1. extract the build context
//! 2. resolve the project name
//! 3. derive `<home>/extract/<project>` and its `Dockerfile`
//! 4. pick the image tag (user tag, else project name)
//! 5. assemble `-t <tag> [options...] -f <dockerfile> <context>`
//! 6. hand the arguments to the container runtime
//!
//! Every step is fail-fast. The collaborators sit behind traits so the
//! pipeline can run without a container engine or a project on disk.

use std::path::PathBuf;

use crate::core::options;
use crate::error::{BuildError, ExtractError, OptionError, ProjectError, RuntimeError};
use crate::infra::dirs::StackpackDirs;

/// Materializes the build context on disk
pub trait Extractor {
    /// Run extraction for the current project
    fn extract(&self) -> Result<(), ExtractError>;
}

/// Derives the project name
pub trait ProjectResolver {
    /// Resolve the normalized project name
    fn project_name(&self) -> Result<String, ProjectError>;
}

/// Executes the container build tool
#[allow(async_fn_in_trait)]
pub trait BuildRunner {
    /// Run `<tool> build <args>`, or only log it when `dry_run` is set
    async fn run_build(
        &self,
        args: &[String],
        verbose: bool,
        dry_run: bool,
    ) -> Result<(), RuntimeError>;
}

/// Options for one build invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequest {
    /// Image name and optional tag (`name:tag`)
    pub tag: Option<String>,
    /// Raw `--docker-options` string
    pub docker_options: Option<String>,
    /// Verbose output
    pub verbose: bool,
    /// Log the build command instead of running it
    pub dry_run: bool,
}

/// Location of a project's build context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Context directory passed as the final build argument
    pub directory: PathBuf,
    /// Dockerfile passed with `-f`
    pub dockerfile: PathBuf,
}

impl BuildContext {
    /// Build context for a project under the home directory
    pub fn for_project(dirs: &StackpackDirs, project_name: &str) -> Self {
        Self {
            directory: dirs.extract_dir(project_name),
            dockerfile: dirs.dockerfile(project_name),
        }
    }
}

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Image tag that was built
    pub image: String,
    /// Arguments passed to `<tool> build`
    pub args: Vec<String>,
    /// Build context used
    pub context: BuildContext,
    /// Whether the build only ran in dry-run mode
    pub dry_run: bool,
}

impl BuildOutcome {
    /// Confirmation line for the user, absent in dry-run mode
    pub fn confirmation(&self) -> Option<String> {
        (!self.dry_run).then(|| format!("Built docker image {}", self.image))
    }
}

/// Pick the image tag: a non-empty user tag, else the project name
pub fn resolve_tag(tag: Option<&str>, project_name: &str) -> String {
    match tag {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => project_name.to_string(),
    }
}

/// Assemble the argument list for `<tool> build`
///
/// The result always holds one `-t` pair and one `-f` pair, with passthrough
/// options between them and the context directory last.
pub fn assemble_args(
    image: &str,
    docker_options: Option<&str>,
    context: &BuildContext,
) -> Result<Vec<String>, OptionError> {
    let mut args = vec!["-t".to_string(), image.to_string()];

    if let Some(raw) = docker_options.filter(|s| !s.is_empty()) {
        args.extend(options::parse_options(raw)?);
    }

    args.push("-f".to_string());
    args.push(context.dockerfile.display().to_string());
    args.push(context.directory.display().to_string());

    Ok(args)
}

/// Build orchestrator
#[derive(Debug)]
pub struct BuildOrchestrator<E, P, R> {
    dirs: StackpackDirs,
    extractor: E,
    resolver: P,
    runner: R,
}

impl<E, P, R> BuildOrchestrator<E, P, R>
where
    E: Extractor,
    P: ProjectResolver,
    R: BuildRunner,
{
    /// Create a new build orchestrator
    pub fn new(dirs: StackpackDirs, extractor: E, resolver: P, runner: R) -> Self {
        Self {
            dirs,
            extractor,
            resolver,
            runner,
        }
    }

    /// Run the build pipeline once
    pub async fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
        self.extractor.extract()?;

        let project_name = self.resolver.project_name()?;
        let context = BuildContext::for_project(&self.dirs, &project_name);
        let image = resolve_tag(request.tag.as_deref(), &project_name);

        let args = assemble_args(&image, request.docker_options.as_deref(), &context)?;
        tracing::debug!("final cmd args {args:?}");

        self.runner
            .run_build(&args, request.verbose, request.dry_run)
            .await?;

        Ok(BuildOutcome {
            image,
            args,
            context,
            dry_run: request.dry_run,
        })
    }
}
