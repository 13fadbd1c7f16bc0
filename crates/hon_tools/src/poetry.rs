//! Poetry package manager wrapper.

use std::path::Path;
use std::sync::Arc;

use hon_runner::{Invocation, ToolRunner};
use tracing::info;

use crate::error::ToolResult;

/// Drives the `poetry` executable.
///
/// Every command forwards its output to the terminal and fails on a
/// non-zero exit.
#[derive(Clone)]
pub struct Poetry {
    executable: String,
    runner: Arc<dyn ToolRunner>,
}

impl Poetry {
    pub fn new(executable: impl Into<String>, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            executable: executable.into(),
            runner,
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    fn command(&self, project_dir: &Path) -> Invocation {
        Invocation::new(&self.executable).cwd(project_dir)
    }

    fn run(&self, invocation: Invocation) -> ToolResult<()> {
        self.runner.run(&invocation)?;
        Ok(())
    }

    /// Create `pyproject.toml` in `project_dir`.
    pub fn init(&self, name: &str, project_dir: &Path, interactive: bool) -> ToolResult<()> {
        info!("Initializing poetry project {} in {:?}", name, project_dir);
        let mut cmd = self.command(project_dir).args(["init", "--name", name]);
        if !interactive {
            cmd = cmd.arg("--no-interaction");
        }
        self.run(cmd)
    }

    /// Build sdist and wheel packages.
    pub fn build(&self, project_dir: &Path, verbose: bool) -> ToolResult<()> {
        let mut cmd = self.command(project_dir);
        if verbose {
            cmd = cmd.arg("-vvv");
        }
        self.run(cmd.arg("build"))
    }

    /// Install the project and its dependencies.
    pub fn install(&self, project_dir: &Path, no_dev: bool) -> ToolResult<()> {
        let mut cmd = self.command(project_dir).arg("install");
        if no_dev {
            cmd = cmd.arg("--no-dev");
        }
        self.run(cmd)
    }

    /// Add dependencies to the manifest and install them.
    pub fn add(
        &self,
        project_dir: &Path,
        packages: &[String],
        dev: bool,
        optional: bool,
    ) -> ToolResult<()> {
        let mut cmd = self.command(project_dir).arg("add");
        if dev {
            cmd = cmd.arg("--dev");
        }
        if optional {
            cmd = cmd.arg("--optional");
        }
        self.run(cmd.args(packages))
    }

    /// Remove dependencies from the manifest.
    pub fn remove(&self, project_dir: &Path, packages: &[String], dev: bool) -> ToolResult<()> {
        let mut cmd = self.command(project_dir).arg("remove");
        if dev {
            cmd = cmd.arg("--dev");
        }
        self.run(cmd.args(packages))
    }

    /// Update all dependencies, or only `packages` when given.
    pub fn update(&self, project_dir: &Path, packages: &[String], lock_only: bool) -> ToolResult<()> {
        let mut cmd = self.command(project_dir).arg("update");
        if lock_only {
            cmd = cmd.arg("--lock");
        }
        self.run(cmd.args(packages))
    }

    /// Resolve dependencies into the lock file without installing.
    pub fn lock(&self, project_dir: &Path) -> ToolResult<()> {
        self.run(self.command(project_dir).arg("lock"))
    }
}
