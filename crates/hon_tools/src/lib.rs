//! # hon_tools
//!
//! Wrappers around the external tools hon orchestrates:
//!
//! - [`Poetry`]: project init, build, install and dependency management
//! - [`Pyenv`]: Python version selection, installation and virtualenvs
//! - [`Pytest`]: running the test suite with coverage
//!
//! Each wrapper owns an executable name (from configuration) and a shared
//! [`hon_runner::ToolRunner`], so tests can swap in a mock runner.

pub mod error;
pub mod poetry;
pub mod pyenv;
pub mod pytest;
pub mod version;

pub use error::{ToolError, ToolResult};
pub use poetry::Poetry;
pub use pyenv::{Pyenv, VERSION_FILE};
pub use pytest::Pytest;
pub use version::{Bump, Constraint, Operator, PythonVersion, VersionConstraints};
