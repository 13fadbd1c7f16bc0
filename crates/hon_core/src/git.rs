//! Git operations for project management.
//!
//! Only what project creation needs: initializing a repository and staging
//! the files that were generated into it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hon_runner::{Invocation, ToolRunner};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

/// Git operations manager.
#[derive(Clone)]
pub struct GitOps {
    repo_path: PathBuf,
    executable: String,
    runner: Arc<dyn ToolRunner>,
}

impl GitOps {
    /// Create a new Git operations manager for a repository.
    pub fn new(
        repo_path: impl AsRef<Path>,
        executable: impl Into<String>,
        runner: Arc<dyn ToolRunner>,
    ) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            executable: executable.into(),
            runner,
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Check if the repository is initialized.
    pub fn is_initialized(&self) -> bool {
        self.repo_path.join(".git").exists()
    }

    fn command(&self) -> Invocation {
        Invocation::new(&self.executable).cwd(&self.repo_path)
    }

    /// Initialize a Git repository.
    pub fn init(&self) -> CoreResult<()> {
        if self.is_initialized() {
            debug!("Repository already initialized");
            return Ok(());
        }

        info!("Initializing Git repository at {}", self.repo_path.display());
        self.runner.run(&self.command().arg("init").capture())?;
        Ok(())
    }

    /// Untracked files that are not ignored, relative to the repository root.
    pub fn untracked_files(&self) -> CoreResult<Vec<String>> {
        self.require_initialized()?;

        let stdout = self
            .runner
            .output(&self.command().args(["ls-files", "--others", "--exclude-standard"]))?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    /// Stage files.
    pub fn add(&self, paths: &[String]) -> CoreResult<()> {
        self.require_initialized()?;
        if paths.is_empty() {
            return Ok(());
        }

        debug!("Staging {} file(s)", paths.len());
        self.runner
            .run(&self.command().arg("add").arg("--").args(paths).capture())?;
        Ok(())
    }

    /// Stage every untracked file and return what was staged.
    pub fn add_all_untracked(&self) -> CoreResult<Vec<String>> {
        let files = self.untracked_files()?;
        self.add(&files)?;
        info!("Staged {} untracked file(s)", files.len());
        Ok(files)
    }

    fn require_initialized(&self) -> CoreResult<()> {
        if !self.is_initialized() {
            return Err(CoreError::GitError(format!(
                "Repository not initialized at {}",
                self.repo_path.display()
            )));
        }
        Ok(())
    }
}
