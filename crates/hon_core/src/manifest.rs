//! `pyproject.toml` loading and dotted-path attribute lookup.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Name of the manifest file at the project root.
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// A parsed project manifest with a lookup cache.
///
/// Resolved values are cached by their full dotted path for as long as the
/// parsed document lives; [`Manifest::reload`] drops the whole cache.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    document: Table,
    cache: HashMap<String, Value>,
    traversals: usize,
}

impl Manifest {
    /// Load the manifest at `path`.
    pub fn load(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let document = read_document(&path)?;
        Ok(Self::new(path, document))
    }

    /// Parse a manifest from a string; `path` is only used for reloads and messages.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> CoreResult<Self> {
        let path = path.into();
        let document = text.parse::<Table>().map_err(|source| CoreError::InvalidToml {
            path: path.clone(),
            source,
        })?;
        Ok(Self::new(path, document))
    }

    fn new(path: PathBuf, document: Table) -> Self {
        Self {
            path,
            document,
            cache: HashMap::new(),
            traversals: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Table {
        &self.document
    }

    /// Re-read the file and clear every cached value.
    pub fn reload(&mut self) -> CoreResult<()> {
        self.document = read_document(&self.path)?;
        self.cache.clear();
        debug!("Reloaded {:?}", self.path);
        Ok(())
    }

    /// Resolve `key` (dotted), optionally prefixed by a dotted `section`.
    ///
    /// A missing path is an [`CoreError::AttributeNotFound`] when `required`,
    /// and `Ok(None)` otherwise. Walking into a value that is not a table is
    /// always an error.
    pub fn get(
        &mut self,
        key: &str,
        required: bool,
        section: Option<&str>,
    ) -> CoreResult<Option<Value>> {
        let full_path = match section {
            Some(section) if !section.is_empty() => format!("{}.{}", section, key),
            _ => key.to_string(),
        };

        if let Some(value) = self.cache.get(&full_path) {
            return Ok(Some(value.clone()));
        }

        self.traversals += 1;
        let resolved = resolve(&self.document, &full_path, required)?;
        if let Some(value) = &resolved {
            self.cache.insert(full_path, value.clone());
        }
        Ok(resolved)
    }

    /// Resolve a string value; non-string values are an error.
    pub fn get_str(
        &mut self,
        key: &str,
        required: bool,
        section: Option<&str>,
    ) -> CoreResult<Option<String>> {
        match self.get(key, required, section)? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(CoreError::AttributeType {
                path: join(section, key),
                expected: "string",
            }),
        }
    }

    /// Number of uncached lookups that walked the document.
    pub fn traversal_count(&self) -> usize {
        self.traversals
    }

    /// Number of cached values.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

fn join(section: Option<&str>, key: &str) -> String {
    match section {
        Some(section) if !section.is_empty() => format!("{}.{}", section, key),
        _ => key.to_string(),
    }
}

fn read_document(path: &Path) -> CoreResult<Table> {
    if !path.is_file() {
        let root = path.parent().unwrap_or(path).to_path_buf();
        return Err(CoreError::MissingManifest(root));
    }
    let text = fs::read_to_string(path)?;
    text.parse::<Table>().map_err(|source| CoreError::InvalidToml {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(document: &Table, full_path: &str, required: bool) -> CoreResult<Option<Value>> {
    let not_found = || CoreError::AttributeNotFound(full_path.to_string());
    let mut segments = full_path.split('.').peekable();
    let mut table = document;

    while let Some(segment) = segments.next() {
        let is_last = segments.peek().is_none();
        match table.get(segment) {
            Some(value) if is_last => return Ok(Some(value.clone())),
            Some(Value::Table(inner)) => table = inner,
            Some(_) => return Err(not_found()),
            None if required => return Err(not_found()),
            None => return Ok(None),
        }
    }

    Err(not_found())
}
