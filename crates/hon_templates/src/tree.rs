//! The template tree and its materialization.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{TemplateError, TemplateResult};
use crate::renderer::TemplateRenderer;

/// A directory of templates.
///
/// Leaves map a file-name pattern to a template string; children map a
/// directory-name pattern to a nested `TemplateDir`. Both names and contents
/// may contain `{key}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDir {
    templates: BTreeMap<String, String>,
    subdirs: BTreeMap<String, TemplateDir>,
}

/// One filesystem operation produced by planning a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedEntry {
    Dir(PathBuf),
    File { path: PathBuf, contents: String },
}

impl PlannedEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::Dir(path) => path,
            Self::File { path, .. } => path,
        }
    }
}

/// A fully resolved render, ready to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    entries: Vec<PlannedEntry>,
}

impl RenderPlan {
    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e {
            PlannedEntry::File { path, .. } => Some(path.as_path()),
            PlannedEntry::Dir(_) => None,
        })
    }

    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e {
            PlannedEntry::Dir(path) => Some(path.as_path()),
            PlannedEntry::File { .. } => None,
        })
    }

    /// Write every entry in order.
    ///
    /// Never overwrites: directories use `create_dir` and files `create_new`.
    /// Entries written before an I/O failure are left in place.
    pub fn apply(&self) -> TemplateResult<()> {
        for entry in &self.entries {
            match entry {
                PlannedEntry::Dir(path) => {
                    fs::create_dir(path).map_err(|e| collision_or_io(path, e))?;
                    debug!("Created directory: {:?}", path);
                }
                PlannedEntry::File { path, contents } => {
                    let mut file = OpenOptions::new()
                        .write(true)
                        .create_new(true)
                        .open(path)
                        .map_err(|e| collision_or_io(path, e))?;
                    file.write_all(contents.as_bytes())?;
                    debug!("Rendered: {:?}", path);
                }
            }
        }
        Ok(())
    }
}

fn collision_or_io(path: &Path, err: std::io::Error) -> TemplateError {
    if err.kind() == std::io::ErrorKind::AlreadyExists {
        TemplateError::AlreadyExists(path.to_path_buf())
    } else {
        TemplateError::Io(err)
    }
}

impl TemplateDir {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_template(&mut self, filename: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(filename.into(), template.into());
    }

    pub fn add_subdir(&mut self, dirname: impl Into<String>, subdir: TemplateDir) {
        self.subdirs.insert(dirname.into(), subdir);
    }

    /// Get or insert the child directory named `dirname`.
    pub fn subdir_mut(&mut self, dirname: &str) -> &mut TemplateDir {
        self.subdirs.entry(dirname.to_string()).or_default()
    }

    pub fn templates(&self) -> &BTreeMap<String, String> {
        &self.templates
    }

    pub fn subdirs(&self) -> &BTreeMap<String, TemplateDir> {
        &self.subdirs
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.subdirs.is_empty()
    }

    /// Number of leaf templates in the whole tree.
    pub fn file_count(&self) -> usize {
        self.templates.len() + self.subdirs.values().map(TemplateDir::file_count).sum::<usize>()
    }

    /// Number of subtree nodes in the whole tree (the root is not counted).
    pub fn dir_count(&self) -> usize {
        self.subdirs.len() + self.subdirs.values().map(TemplateDir::dir_count).sum::<usize>()
    }

    /// All placeholder keys referenced by names and contents in the tree.
    pub fn placeholders(&self) -> Vec<String> {
        let renderer = TemplateRenderer::new();
        let mut keys = Vec::new();
        self.collect_placeholders(&renderer, &mut keys);
        keys.sort();
        keys.dedup();
        keys
    }

    fn collect_placeholders(&self, renderer: &TemplateRenderer, keys: &mut Vec<String>) {
        for (filename, template) in &self.templates {
            keys.extend(renderer.placeholders(filename));
            keys.extend(renderer.placeholders(template));
        }
        for (dirname, subdir) in &self.subdirs {
            keys.extend(renderer.placeholders(dirname));
            subdir.collect_placeholders(renderer, keys);
        }
    }

    /// Resolve every name and content under `root` without touching the disk.
    ///
    /// Fails on the first missing key, on a rendered name that is not a single
    /// path component, or when a target already exists.
    pub fn plan(&self, root: &Path, values: &HashMap<String, String>) -> TemplateResult<RenderPlan> {
        let renderer = TemplateRenderer::new();
        let mut plan = RenderPlan::default();
        let mut seen = HashSet::new();
        self.plan_into(&renderer, root, "", values, &mut plan, &mut seen)?;
        Ok(plan)
    }

    fn plan_into(
        &self,
        renderer: &TemplateRenderer,
        dir: &Path,
        origin: &str,
        values: &HashMap<String, String>,
        plan: &mut RenderPlan,
        seen: &mut HashSet<PathBuf>,
    ) -> TemplateResult<()> {
        for (filename, template) in &self.templates {
            let origin = join_origin(origin, filename);
            let path = dir.join(resolve_name(renderer, filename, values, &origin)?);
            let contents = renderer.render(template, values, &origin)?;
            claim(&path, seen)?;
            plan.entries.push(PlannedEntry::File { path, contents });
        }

        for (dirname, subdir) in &self.subdirs {
            let origin = join_origin(origin, dirname);
            let path = dir.join(resolve_name(renderer, dirname, values, &origin)?);
            claim(&path, seen)?;
            plan.entries.push(PlannedEntry::Dir(path.clone()));
            subdir.plan_into(renderer, &path, &origin, values, plan, seen)?;
        }

        Ok(())
    }

    /// Render the tree into `root`, which must already exist.
    ///
    /// The whole tree is planned before anything is written, so a missing
    /// substitution key or a colliding path leaves the disk untouched.
    pub fn create(&self, root: &Path, values: &HashMap<String, String>) -> TemplateResult<RenderPlan> {
        let plan = self.plan(root, values)?;
        info!(
            "Rendering {} files and {} directories into {:?}",
            plan.files().count(),
            plan.dirs().count(),
            root
        );
        plan.apply()?;
        Ok(plan)
    }
}

fn join_origin(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

fn resolve_name(
    renderer: &TemplateRenderer,
    pattern: &str,
    values: &HashMap<String, String>,
    origin: &str,
) -> TemplateResult<String> {
    let name = renderer.render(pattern, values, origin)?;
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(TemplateError::InvalidName {
            name,
            template: origin.to_string(),
        });
    }
    Ok(name)
}

fn claim(path: &Path, seen: &mut HashSet<PathBuf>) -> TemplateResult<()> {
    if fs::symlink_metadata(path).is_ok() || !seen.insert(path.to_path_buf()) {
        return Err(TemplateError::AlreadyExists(path.to_path_buf()));
    }
    Ok(())
}
