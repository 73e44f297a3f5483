//! Extract command implementation
//!
//! Implements `stackpack extract`, which materializes the build context
//! without building an image.

use anyhow::Result;

use crate::cli::output::create_spinner;
use crate::cli::GlobalOptions;
use crate::infra::extract::LocalExtractor;

/// Execute the extract command
pub async fn execute(globals: &GlobalOptions) -> Result<()> {
    let extractor =
        LocalExtractor::new(globals.dirs.clone(), &globals.project_dir, globals.dry_run);

    let spinner = globals
        .output
        .show_progress()
        .then(|| create_spinner("Extracting project..."));
    let result = extractor.extract_project();
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let result = result?;

    if globals.dry_run {
        globals.output.info(&format!(
            "Dry run - would extract {} to {}",
            globals.project_dir.display(),
            result.target.display()
        ));
    } else {
        globals.output.success(&format!(
            "Extracted {} files to {}",
            result.files_copied,
            result.target.display()
        ));
    }

    Ok(())
}
