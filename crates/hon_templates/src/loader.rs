//! Template loading from embedded data and from disk.

use std::path::{Component, Path};

use rust_embed::RustEmbed;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};
use crate::tree::TemplateDir;

/// Project templates compiled into the binary.
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Suffix that keeps template Python sources from being picked up as code.
const PYTHON_TEMPLATE_SUFFIX: &str = ".py_";

impl TemplateDir {
    /// Load the default project templates shipped with hon.
    pub fn from_embedded() -> TemplateResult<Self> {
        let entries = EmbeddedTemplates::iter().map(|path| {
            let data = EmbeddedTemplates::get(&path)
                .map(|file| file.data.into_owned())
                .unwrap_or_default();
            (path.into_owned(), data)
        });
        Self::from_entries(entries)
    }

    /// Build a tree from `/`-separated relative paths and raw file contents.
    pub fn from_entries<I>(entries: I) -> TemplateResult<Self>
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let mut root = TemplateDir::new();
        for (path, data) in entries {
            let contents = String::from_utf8(data).map_err(|_| TemplateError::InvalidTemplate {
                path: path.clone(),
                message: "not valid UTF-8".to_string(),
            })?;

            let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
            let Some(filename) = parts.pop() else {
                continue;
            };

            let mut dir = &mut root;
            for part in parts {
                dir = dir.subdir_mut(part);
            }
            debug!("Loaded template {}", path);
            dir.add_template(template_filename(filename), contents);
        }
        Ok(root)
    }

    /// Load a template tree from a directory on disk.
    ///
    /// Empty directories are kept as empty subtrees.
    pub fn from_path(path: &Path) -> TemplateResult<Self> {
        if !path.is_dir() {
            return Err(TemplateError::NotFound(path.to_path_buf()));
        }

        let mut root = TemplateDir::new();
        for entry in WalkDir::new(path).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(path)
                .map_err(|_| TemplateError::InvalidTemplate {
                    path: entry.path().display().to_string(),
                    message: "outside of the templates directory".to_string(),
                })?;

            let parts = relative
                .components()
                .map(|c| match c {
                    Component::Normal(name) => name.to_str().ok_or_else(|| {
                        TemplateError::InvalidTemplate {
                            path: relative.display().to_string(),
                            message: "file name is not valid UTF-8".to_string(),
                        }
                    }),
                    _ => Err(TemplateError::InvalidTemplate {
                        path: relative.display().to_string(),
                        message: "unexpected path component".to_string(),
                    }),
                })
                .collect::<TemplateResult<Vec<&str>>>()?;

            let Some((name, parents)) = parts.split_last() else {
                continue;
            };
            let mut dir = &mut root;
            for part in parents {
                dir = dir.subdir_mut(part);
            }

            if entry.file_type().is_dir() {
                dir.subdir_mut(name);
            } else {
                let contents = std::fs::read_to_string(entry.path())?;
                dir.add_template(template_filename(name), contents);
            }
        }

        debug!(
            "Loaded {} templates from {:?}",
            root.file_count(),
            path
        );
        Ok(root)
    }
}

fn template_filename(name: &str) -> String {
    match name.strip_suffix(PYTHON_TEMPLATE_SUFFIX) {
        Some(stem) => format!("{}.py", stem),
        None => name.to_string(),
    }
}
