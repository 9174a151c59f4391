use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::CatalogResult;

/// Temporary media directory owned by one pipeline run.
///
/// Every render gets its own sub-directory, so intermediate files of different scenes never
/// mix. The directory is removed by [`MediaWorkspace::finish`] when the run succeeded and kept
/// for inspection when any scene failed.
#[derive(Debug)]
pub struct MediaWorkspace {
    root: PathBuf,
}

impl MediaWorkspace {
    /// Name of the directory created inside the output folder.
    pub const DIR_NAME: &'static str = ".manim-tmp";

    /// Create a fresh workspace under `out_dir`, discarding leftovers of an earlier run.
    pub fn create(out_dir: &Path) -> CatalogResult<Self> {
        let root = out_dir.join(Self::DIR_NAME);
        if root.exists() {
            std::fs::remove_dir_all(&root)
                .with_context(|| format!("clear temp media dir '{}'", root.display()))?;
        }
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create temp media dir '{}'", root.display()))?;
        Ok(Self { root })
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Empty directory reserved for the render named `output_name`.
    pub fn job_dir(&self, output_name: &str) -> CatalogResult<PathBuf> {
        let dir = self.root.join(output_name);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("clear job media dir '{}'", dir.display()))?;
        }
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create job media dir '{}'", dir.display()))?;
        Ok(dir)
    }

    /// Remove the workspace unless the run had failures.
    pub fn finish(self, had_errors: bool) {
        if had_errors {
            tracing::warn!(path = %self.root.display(), "keeping temp media for diagnostics");
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            tracing::warn!(path = %self.root.display(), error = %e, "failed to remove temp media");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/workspace.rs"]
mod tests;
