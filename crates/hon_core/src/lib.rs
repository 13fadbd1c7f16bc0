//! # hon_core
//!
//! Project model and project creation for hon.
//!
//! # Architecture
//!
//! - **Manifest**: `pyproject.toml` with cached dotted-path lookups
//! - **Project**: a manifest plus git, with build and dependency operations
//!   delegated to poetry
//! - **Creator**: the `hon create` flow from an empty directory to a staged
//!   project
//! - **Config**: executables and template overrides from `~/.hon/config.toml`
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hon_core::{Config, CreateOptions, ProjectCreator, SpdxLicenseSource, Toolbox};
//! use hon_runner::SystemRunner;
//!
//! let toolbox = Toolbox::new(Config::load(None)?, Arc::new(SystemRunner::default()));
//! let creator = ProjectCreator::new(toolbox, Arc::new(SpdxLicenseSource::new()));
//! let project = creator.create(&parent, "widget", &CreateOptions::default()).await?;
//! ```

pub mod config;
pub mod creator;
pub mod error;
pub mod git;
pub mod license;
pub mod manifest;
pub mod project;
pub mod toolbox;

pub use config::{Config, ConfigFile};
pub use creator::{CreateOptions, ProjectCreator};
pub use error::{CoreError, CoreResult};
pub use git::GitOps;
pub use license::{LicenseSource, SpdxLicenseSource, LICENSE_URL};
pub use manifest::{Manifest, MANIFEST_FILE};
pub use project::{module_name, Project};
pub use toolbox::Toolbox;
