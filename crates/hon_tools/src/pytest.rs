//! pytest test runner wrapper.

use std::path::Path;
use std::sync::Arc;

use hon_runner::{Invocation, ToolRunner};
use tracing::info;

use crate::error::ToolResult;

/// Runs the project's test suite with coverage.
#[derive(Clone)]
pub struct Pytest {
    executable: String,
    runner: Arc<dyn ToolRunner>,
}

impl Pytest {
    pub fn new(executable: impl Into<String>, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            executable: executable.into(),
            runner,
        }
    }

    /// Build the pytest invocation for `tests` (all tests when empty).
    pub fn command(&self, project_dir: &Path, tests: &[String], debug: bool) -> Invocation {
        let mut cmd = Invocation::new(&self.executable)
            .cwd(project_dir)
            .args(["--cov", "--cov-report", "term-missing"]);
        if debug {
            cmd = cmd.args(["-s", "-vv", "--full-trace"]);
        } else {
            cmd = cmd.arg("--show-capture=all");
        }
        cmd.args(tests)
    }

    pub fn run(&self, project_dir: &Path, tests: &[String], debug: bool) -> ToolResult<()> {
        info!("Running tests in {:?}", project_dir);
        self.runner.run(&self.command(project_dir, tests, debug))?;
        Ok(())
    }
}
