//! Error types for the core module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur during core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Directory {0} already exists")]
    DirectoryAlreadyExists(PathBuf),

    #[error("Invalid project name: {0:?}")]
    InvalidProjectName(String),

    #[error("hon requires a pyproject.toml file in the root of project directory {0}")]
    MissingManifest(PathBuf),

    #[error("Project directory {0} is not a git repository")]
    NotAVersionControlDirectory(PathBuf),

    #[error("Path {0} not found in pyproject.toml")]
    AttributeNotFound(String),

    #[error("Attribute {path} is not a {expected}")]
    AttributeType { path: String, expected: &'static str },

    #[error("License {0} not found in the SPDX repository")]
    UnknownLicense(String),

    #[error("Config directory {0} does not exist")]
    ConfigNotFound(PathBuf),

    #[error("Invalid TOML in {path}: {source}")]
    InvalidToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Git error: {0}")]
    GitError(String),

    #[error(transparent)]
    Template(#[from] hon_templates::TemplateError),

    #[error(transparent)]
    Tool(#[from] hon_tools::ToolError),

    #[error(transparent)]
    Runner(#[from] hon_runner::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// The runner error behind this one, however it was wrapped.
    pub fn runner_error(&self) -> Option<&hon_runner::RunnerError> {
        match self {
            Self::Runner(e) | Self::Tool(hon_tools::ToolError::Runner(e)) => Some(e),
            _ => None,
        }
    }
}
