//! Build context extraction
//!
//! Materializes `<home>/extract/<project>` from a project directory: the
//! project tree is copied in and the project's Dockerfile is placed at the
//! context root as `Dockerfile`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::defaults::{ALWAYS_EXCLUDED, DESCRIPTOR_FILE};
use crate::core::builder::Extractor;
use crate::core::project::Project;
use crate::error::ExtractError;
use crate::infra::dirs::StackpackDirs;
use crate::infra::filesystem;

/// Summary of an extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractResult {
    /// Build context directory
    pub target: PathBuf,
    /// Number of files copied (zero in dry-run mode)
    pub files_copied: usize,
}

/// Copies a project into its build context directory
#[derive(Debug, Clone)]
pub struct LocalExtractor {
    dirs: StackpackDirs,
    root: PathBuf,
    dry_run: bool,
}

impl LocalExtractor {
    /// Create an extractor for the project at `root`, writing under `dirs`
    pub fn new(dirs: StackpackDirs, root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            dirs,
            root: root.into(),
            dry_run,
        }
    }

    /// Load the project at the extractor's root and extract it
    pub fn extract_project(&self) -> Result<ExtractResult, ExtractError> {
        let project = Project::load(&self.root)?;
        let name = project.name()?;
        self.extract_into(&project, &name)
    }

    /// Extract `project` into the build context named `project_name`
    pub fn extract_into(
        &self,
        project: &Project,
        project_name: &str,
    ) -> Result<ExtractResult, ExtractError> {
        let target = self.dirs.extract_dir(project_name);
        let dockerfile = project.dockerfile_path();

        if !dockerfile.is_file() {
            return Err(ExtractError::MissingDockerfile { path: dockerfile });
        }

        if self.dry_run {
            tracing::info!(
                "Dry run - skipping extraction of {} to {}",
                project.root.display(),
                target.display()
            );
            return Ok(ExtractResult {
                target,
                files_copied: 0,
            });
        }

        tracing::info!("Extracting {} to {}", project.root.display(), target.display());

        filesystem::remove_dir_all(&target)?;
        filesystem::create_dir_all(&target)?;

        let root = canonical(&project.root);
        let home = canonical(self.dirs.home());
        let excluded = excluded_names(project);
        let mut files_copied = copy_tree(&root, &target, &excluded, &home)?;

        // A configured descriptor replaces any root Dockerfile copied with the tree
        let context_dockerfile = target.join(DESCRIPTOR_FILE);
        let already_placed = context_dockerfile.is_file();
        if !already_placed || canonical(&dockerfile) != canonical(&root.join(DESCRIPTOR_FILE)) {
            filesystem::copy_file(&dockerfile, &context_dockerfile)?;
            if !already_placed {
                files_copied += 1;
            }
        }

        tracing::debug!("Copied {files_copied} files into {}", target.display());

        Ok(ExtractResult {
            target,
            files_copied,
        })
    }
}

impl Extractor for LocalExtractor {
    fn extract(&self) -> Result<(), ExtractError> {
        self.extract_project().map(|_| ())
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn excluded_names(project: &Project) -> Vec<String> {
    ALWAYS_EXCLUDED
        .iter()
        .map(|s| (*s).to_string())
        .chain(project.config.extract.exclude.iter().cloned())
        .collect()
}

/// Copy `from` into `to`, skipping excluded top-level entries and the home directory
fn copy_tree(
    from: &Path,
    to: &Path,
    excluded: &[String],
    home: &Path,
) -> Result<usize, ExtractError> {
    let mut copied = 0;

    let walker = WalkDir::new(from)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if entry.path() == home {
                return false;
            }
            entry.depth() != 1
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| excluded.iter().any(|e| e == name))
        });

    for entry in walker {
        let entry = entry.map_err(|e| ExtractError::WalkFailed {
            path: from.to_path_buf(),
            error: e.to_string(),
        })?;

        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| ExtractError::WalkFailed {
                path: entry.path().to_path_buf(),
                error: e.to_string(),
            })?;
        let dest = to.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            filesystem::create_dir_all(&dest)?;
        } else if file_type.is_file() {
            std::fs::copy(entry.path(), &dest).map_err(|e| ExtractError::CopyFailed {
                from: entry.path().to_path_buf(),
                to: dest.clone(),
                error: e.to_string(),
            })?;
            copied += 1;
        } else if file_type.is_symlink() {
            copy_link(entry.path(), &dest)?;
            copied += 1;
        } else {
            tracing::warn!("Skipping special file {}", entry.path().display());
        }
    }

    Ok(copied)
}

/// Recreate the symlink at `from` as `to`, keeping its target as written
#[cfg(unix)]
fn copy_link(from: &Path, to: &Path) -> Result<(), ExtractError> {
    let copy_failed = |e: std::io::Error| ExtractError::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error: e.to_string(),
    };
    let link_target = std::fs::read_link(from).map_err(copy_failed)?;
    std::os::unix::fs::symlink(&link_target, to).map_err(copy_failed)
}

/// Copy what the symlink at `from` points to
#[cfg(not(unix))]
fn copy_link(from: &Path, to: &Path) -> Result<(), ExtractError> {
    if from.is_dir() {
        tracing::warn!("Skipping directory symlink {}", from.display());
        return Ok(());
    }
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| ExtractError::CopyFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            error: e.to_string(),
        })
}
