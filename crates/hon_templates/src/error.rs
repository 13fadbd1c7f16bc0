//! Error types for templates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Missing substitution key '{key}' in template {template}")]
    MissingSubstitutionKey { key: String, template: String },

    #[error("Target already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Invalid rendered name '{name}' for template {template}")]
    InvalidName { name: String, template: String },

    #[error("Invalid template {path}: {message}")]
    InvalidTemplate { path: String, message: String },

    #[error("Templates directory not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
