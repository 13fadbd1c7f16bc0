//! Error types for tool wrappers.

use thiserror::Error;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur while driving wrapped tools.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid version constraint: {0}")]
    InvalidConstraint(String),

    #[error("Invalid operator '{operator}' in constraint {constraint}")]
    InvalidOperator { operator: String, constraint: String },

    #[error("No Python version matches constraint {0}")]
    NoMatchingPython(String),

    #[error("Unexpected output from {tool}: {message}")]
    UnexpectedOutput { tool: String, message: String },

    #[error(transparent)]
    Runner(#[from] hon_runner::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
