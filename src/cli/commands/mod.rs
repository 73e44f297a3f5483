//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod extract;

use anyhow::Result;
use clap::Subcommand;

use super::GlobalOptions;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a container image of the project
    ///
    /// Extracts the project into a build context first, then runs
    /// `docker build` (or `podman build`) against it.
    Build {
        /// Image name and optionally a tag in the 'name:tag' format
        #[arg(short, long)]
        tag: Option<String>,

        /// Extra options for the build tool, quoted as one string
        #[arg(long, value_name = "OPTIONS", allow_hyphen_values = true)]
        docker_options: Option<String>,

        /// Container runtime to build with (docker or podman)
        #[arg(long, env = "STACKPACK_RUNTIME")]
        runtime: Option<String>,
    },

    /// Extract the project into its build context directory
    Extract,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, globals: &GlobalOptions) -> Result<()> {
        match self {
            Self::Build {
                tag,
                docker_options,
                runtime,
            } => {
                let options = build::BuildOptions {
                    tag,
                    docker_options,
                    runtime,
                };
                build::execute(globals, options).await
            }
            Self::Extract => extract::execute(globals).await,
        }
    }
}
