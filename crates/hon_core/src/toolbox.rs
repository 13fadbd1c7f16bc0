//! Tool wrappers built from configuration and a shared runner.

use std::path::Path;
use std::sync::Arc;

use hon_runner::ToolRunner;
use hon_tools::{Poetry, Pyenv, Pytest};

use crate::config::{Config, GIT, POETRY, PYENV, PYTEST};
use crate::error::CoreResult;
use crate::git::GitOps;
use crate::project::Project;

/// Builds tool wrappers that all share one runner.
#[derive(Clone)]
pub struct Toolbox {
    config: Config,
    runner: Arc<dyn ToolRunner>,
}

impl Toolbox {
    pub fn new(config: Config, runner: Arc<dyn ToolRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> Arc<dyn ToolRunner> {
        self.runner.clone()
    }

    pub fn git(&self, repo_path: &Path) -> GitOps {
        GitOps::new(repo_path, self.config.tool(GIT), self.runner.clone())
    }

    pub fn poetry(&self) -> Poetry {
        Poetry::new(self.config.tool(POETRY), self.runner.clone())
    }

    pub fn pytest(&self) -> Pytest {
        Pytest::new(self.config.tool(PYTEST), self.runner.clone())
    }

    pub fn pyenv(&self, working_dir: &Path) -> Pyenv {
        Pyenv::new(
            self.config.tool(PYENV),
            Pyenv::default_root(),
            working_dir,
            self.runner.clone(),
        )
    }

    /// Open the project rooted at `root_dir`.
    pub fn open_project(&self, root_dir: &Path) -> CoreResult<Project> {
        Project::open(root_dir, self.git(root_dir), self.poetry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use hon_runner::MockRunner;
    use std::collections::HashMap;

    #[test]
    fn test_configured_executables() {
        let file = ConfigFile {
            tools: HashMap::from([(POETRY.to_string(), "poetry1.8".to_string())]),
            templates: None,
        };
        let toolbox = Toolbox::new(Config::from_file(None, file), Arc::new(MockRunner::new()));

        assert_eq!(toolbox.poetry().executable(), "poetry1.8");
        assert_eq!(
            toolbox.pytest().command(Path::new("."), &[], false).program,
            "pytest"
        );
    }
}
