//! Shared setup for commands: configuration, runner and project.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::debug;

use hon_core::{Config, Project, Toolbox};
use hon_runner::SystemRunner;

/// Global options every command runs with.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub project_dir: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
}

impl AppContext {
    pub fn new(project_dir: Option<PathBuf>, config_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            config_dir,
        }
    }

    /// The project directory, defaulting to the current directory.
    pub fn project_dir(&self) -> Result<PathBuf> {
        match &self.project_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to determine the current directory"),
        }
    }

    pub fn config(&self) -> Result<Config> {
        Ok(Config::load(self.config_dir.clone())?)
    }

    /// Tool wrappers backed by real processes.
    pub fn toolbox(&self) -> Result<Toolbox> {
        let config = self.config()?;
        debug!("Using config from {:?}", config.dir());
        Ok(Toolbox::new(config, Arc::new(SystemRunner::default())))
    }

    pub fn open_project(&self, toolbox: &Toolbox) -> Result<Project> {
        let dir = self.project_dir()?;
        Ok(toolbox.open_project(&dir)?)
    }
}
