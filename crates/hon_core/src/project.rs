//! The project model: a directory with a `pyproject.toml` under git.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use hon_templates::{RenderPlan, TemplateDir};
use hon_tools::Poetry;
use toml::Value;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::git::GitOps;
use crate::license::LicenseSource;
use crate::manifest::{Manifest, MANIFEST_FILE};

/// Section of the manifest that holds the project metadata.
pub const POETRY_SECTION: &str = "tool.poetry";

/// License file at the project root.
pub const LICENSE_FILE: &str = "LICENSE";

/// An existing project on disk.
pub struct Project {
    root_dir: PathBuf,
    manifest: Manifest,
    git: GitOps,
    poetry: Poetry,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("root_dir", &self.root_dir)
            .finish_non_exhaustive()
    }
}

impl Project {
    /// Open the project at `root_dir`.
    pub fn open(root_dir: impl Into<PathBuf>, git: GitOps, poetry: Poetry) -> CoreResult<Self> {
        let root_dir = root_dir.into();

        let manifest_path = root_dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(CoreError::MissingManifest(root_dir));
        }
        if !git.is_initialized() {
            return Err(CoreError::NotAVersionControlDirectory(root_dir));
        }

        let manifest = Manifest::load(manifest_path)?;
        debug!("Opened project at {:?}", root_dir);

        Ok(Self {
            root_dir,
            manifest,
            git,
            poetry,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn git(&self) -> &GitOps {
        &self.git
    }

    /// Re-read `pyproject.toml`.
    pub fn reload(&mut self) -> CoreResult<()> {
        self.manifest.reload()
    }

    /// Generic lookup, see [`Manifest::get`].
    pub fn get_attribute(
        &mut self,
        key: &str,
        required: bool,
        section: Option<&str>,
    ) -> CoreResult<Option<Value>> {
        self.manifest.get(key, required, section)
    }

    /// Optional lookup under `tool.poetry`.
    pub fn attribute(&mut self, key: &str) -> CoreResult<Option<Value>> {
        self.manifest.get(key, false, Some(POETRY_SECTION))
    }

    pub fn required_str(&mut self, key: &str) -> CoreResult<String> {
        self.manifest
            .get_str(key, true, Some(POETRY_SECTION))?
            .ok_or_else(|| CoreError::AttributeNotFound(format!("{}.{}", POETRY_SECTION, key)))
    }

    pub fn optional_str(&mut self, key: &str) -> CoreResult<Option<String>> {
        self.manifest.get_str(key, false, Some(POETRY_SECTION))
    }

    pub fn name(&mut self) -> CoreResult<String> {
        self.required_str("name")
    }

    /// Importable package name derived from the project name.
    pub fn module_name(&mut self) -> CoreResult<String> {
        Ok(module_name(&self.name()?))
    }

    /// Authors joined with `, `.
    pub fn authors(&mut self) -> CoreResult<String> {
        match self.attribute("authors")? {
            None => Ok(String::new()),
            Some(Value::Array(authors)) => authors
                .iter()
                .map(|a| {
                    a.as_str().map(String::from).ok_or(CoreError::AttributeType {
                        path: format!("{}.authors", POETRY_SECTION),
                        expected: "list of strings",
                    })
                })
                .collect::<CoreResult<Vec<_>>>()
                .map(|authors| authors.join(", ")),
            Some(_) => Err(CoreError::AttributeType {
                path: format!("{}.authors", POETRY_SECTION),
                expected: "list of strings",
            }),
        }
    }

    /// Full license text.
    ///
    /// An existing `LICENSE` file wins; otherwise `tool.poetry.license` is
    /// required and its SPDX text is fetched from `source`.
    pub async fn license_text(&mut self, source: &dyn LicenseSource) -> CoreResult<String> {
        let path = self.root_dir.join(LICENSE_FILE);
        if path.is_file() {
            debug!("Using license text from {:?}", path);
            return Ok(fs::read_to_string(path)?);
        }

        let license = self.required_str("license")?;
        source.fetch(&license).await
    }

    /// Substitution values for the project templates.
    pub fn template_values(&mut self, license_text: &str) -> CoreResult<HashMap<String, String>> {
        let name = self.name()?;
        let mut values = HashMap::new();
        values.insert("project.module".to_string(), module_name(&name));
        values.insert("project.name".to_string(), name);
        values.insert(
            "project.version".to_string(),
            self.optional_str("version")?.unwrap_or_default(),
        );
        values.insert(
            "project.description".to_string(),
            self.optional_str("description")?.unwrap_or_default(),
        );
        values.insert("project.authors".to_string(), self.authors()?);
        values.insert(
            "project.license".to_string(),
            self.optional_str("license")?.unwrap_or_default(),
        );
        values.insert("project.license_text".to_string(), license_text.to_string());
        values.insert("project.year".to_string(), Utc::now().year().to_string());
        Ok(values)
    }

    /// Render `templates` into the project root.
    pub fn create_from_templates(
        &self,
        templates: &TemplateDir,
        values: &HashMap<String, String>,
    ) -> CoreResult<RenderPlan> {
        Ok(templates.create(&self.root_dir, values)?)
    }

    pub fn add_all_untracked(&self) -> CoreResult<Vec<String>> {
        self.git.add_all_untracked()
    }

    pub fn build(&self, verbose: bool) -> CoreResult<()> {
        info!("Building {:?}", self.root_dir);
        Ok(self.poetry.build(&self.root_dir, verbose)?)
    }

    pub fn install(&self, no_dev: bool) -> CoreResult<()> {
        Ok(self.poetry.install(&self.root_dir, no_dev)?)
    }

    pub fn add_dependencies(&self, packages: &[String], dev: bool, optional: bool) -> CoreResult<()> {
        Ok(self.poetry.add(&self.root_dir, packages, dev, optional)?)
    }

    pub fn remove_dependencies(&self, packages: &[String], dev: bool) -> CoreResult<()> {
        Ok(self.poetry.remove(&self.root_dir, packages, dev)?)
    }

    pub fn update_dependencies(&self, packages: &[String], lock_only: bool) -> CoreResult<()> {
        Ok(self.poetry.update(&self.root_dir, packages, lock_only)?)
    }

    pub fn lock(&self) -> CoreResult<()> {
        Ok(self.poetry.lock(&self.root_dir)?)
    }
}

/// Lowercase `name` with `-` and spaces turned into `_`.
pub fn module_name(name: &str) -> String {
    name.to_lowercase().replace(['-', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hon_runner::MockRunner;
    use std::sync::Arc;
    use tempfile::TempDir;

    const PYPROJECT: &str = r#"
[tool.poetry]
name = "My-Widget"
version = "0.3.0"
description = "Widgets for everyone"
authors = ["Ada <ada@example.com>", "Grace <grace@example.com>"]
license = "MIT"
"#;

    struct StaticLicense;

    #[async_trait]
    impl LicenseSource for StaticLicense {
        async fn fetch(&self, license: &str) -> CoreResult<String> {
            match license {
                "MIT" => Ok("MIT License text".to_string()),
                other => Err(CoreError::UnknownLicense(other.to_string())),
            }
        }
    }

    fn project_dir(pyproject: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MANIFEST_FILE), pyproject).unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        temp
    }

    fn open(dir: &Path, runner: &MockRunner) -> CoreResult<Project> {
        let runner: Arc<dyn hon_runner::ToolRunner> = Arc::new(runner.clone());
        Project::open(
            dir,
            GitOps::new(dir, "git", runner.clone()),
            Poetry::new("poetry", runner),
        )
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("My-Widget"), "my_widget");
        assert_eq!(module_name("two words"), "two_words");
        assert_eq!(module_name("plain"), "plain");
    }

    #[test]
    fn test_open_requires_manifest() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let err = open(temp.path(), &MockRunner::new()).unwrap_err();
        assert!(matches!(err, CoreError::MissingManifest(_)));
    }

    #[test]
    fn test_open_requires_git() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MANIFEST_FILE), PYPROJECT).unwrap();
        let err = open(temp.path(), &MockRunner::new()).unwrap_err();
        assert!(matches!(err, CoreError::NotAVersionControlDirectory(_)));
    }

    #[test]
    fn test_attributes() {
        let temp = project_dir(PYPROJECT);
        let mut project = open(temp.path(), &MockRunner::new()).unwrap();

        assert_eq!(project.name().unwrap(), "My-Widget");
        assert_eq!(project.module_name().unwrap(), "my_widget");
        assert_eq!(
            project.attribute("version").unwrap(),
            Some(Value::String("0.3.0".to_string()))
        );
        assert_eq!(project.attribute("homepage").unwrap(), None);
        assert!(matches!(
            project.required_str("homepage"),
            Err(CoreError::AttributeNotFound(_))
        ));
        assert_eq!(
            project.authors().unwrap(),
            "Ada <ada@example.com>, Grace <grace@example.com>"
        );
    }

    #[test]
    fn test_template_values() {
        let temp = project_dir(PYPROJECT);
        let mut project = open(temp.path(), &MockRunner::new()).unwrap();
        let values = project.template_values("TEXT").unwrap();

        assert_eq!(values["project.name"], "My-Widget");
        assert_eq!(values["project.module"], "my_widget");
        assert_eq!(values["project.version"], "0.3.0");
        assert_eq!(values["project.description"], "Widgets for everyone");
        assert_eq!(values["project.license"], "MIT");
        assert_eq!(values["project.license_text"], "TEXT");
        assert_eq!(values["project.year"], Utc::now().year().to_string());
        assert_eq!(values.len(), 8);
    }

    #[tokio::test]
    async fn test_license_text_from_source() {
        let temp = project_dir(PYPROJECT);
        let mut project = open(temp.path(), &MockRunner::new()).unwrap();
        assert_eq!(
            project.license_text(&StaticLicense).await.unwrap(),
            "MIT License text"
        );
    }

    #[tokio::test]
    async fn test_license_file_wins() {
        let temp = project_dir(PYPROJECT);
        fs::write(temp.path().join(LICENSE_FILE), "Custom terms\n").unwrap();
        let mut project = open(temp.path(), &MockRunner::new()).unwrap();
        assert_eq!(
            project.license_text(&StaticLicense).await.unwrap(),
            "Custom terms\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_license() {
        let temp = project_dir("[tool.poetry]\nname = \"w\"\nlicense = \"Nope-1.0\"\n");
        let mut project = open(temp.path(), &MockRunner::new()).unwrap();
        let err = project.license_text(&StaticLicense).await.unwrap_err();
        assert!(matches!(err, CoreError::UnknownLicense(id) if id == "Nope-1.0"));
    }

    #[test]
    fn test_poetry_operations_run_in_root() {
        let temp = project_dir(PYPROJECT);
        let runner = MockRunner::new();
        let project = open(temp.path(), &runner).unwrap();

        project.build(true).unwrap();
        project
            .add_dependencies(&["requests".to_string()], false, false)
            .unwrap();
        project.lock().unwrap();

        let calls = runner.get_calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.cwd.as_deref() == Some(temp.path())));
        assert_eq!(calls[0].argv(), vec!["poetry", "-vvv", "build"]);
        assert_eq!(calls[1].argv(), vec!["poetry", "add", "requests"]);
        assert_eq!(calls[2].argv(), vec!["poetry", "lock"]);
    }
}
