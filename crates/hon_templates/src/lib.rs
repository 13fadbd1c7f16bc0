//! # hon_templates
//!
//! Project template tree and renderer for hon.
//!
//! A [`TemplateDir`] mirrors a directory of text templates. File names,
//! directory names and contents may contain `{key}` placeholders which are
//! substituted from a flat map of values. `{{` and `}}` escape literal braces.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hon_templates::TemplateDir;
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let templates = TemplateDir::from_embedded().unwrap();
//! let values = HashMap::from([
//!     ("project.name".to_string(), "widget".to_string()),
//!     ("project.module".to_string(), "widget".to_string()),
//! ]);
//!
//! templates.create(Path::new("./widget"), &values).unwrap();
//! ```

pub mod error;
pub mod loader;
pub mod renderer;
pub mod tree;

pub use error::{TemplateError, TemplateResult};
pub use renderer::TemplateRenderer;
pub use tree::{PlannedEntry, RenderPlan, TemplateDir};
