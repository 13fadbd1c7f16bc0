//! Creating a new project from scratch.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hon_templates::TemplateDir;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::license::LicenseSource;
use crate::project::Project;
use crate::toolbox::Toolbox;

/// Options for [`ProjectCreator::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Python version constraint to install and pin with pyenv.
    pub python: Option<String>,
    /// Let poetry prompt for project metadata.
    pub interactive: bool,
    /// Consider `-dev` Python versions when resolving `python`.
    pub allow_prerelease: bool,
}

/// Creates projects: directory, git repository, manifest and rendered templates.
pub struct ProjectCreator {
    toolbox: Toolbox,
    license_source: Arc<dyn LicenseSource>,
}

impl ProjectCreator {
    pub fn new(toolbox: Toolbox, license_source: Arc<dyn LicenseSource>) -> Self {
        Self {
            toolbox,
            license_source,
        }
    }

    /// Template tree from the configured directory, or the embedded one.
    pub fn templates(&self) -> CoreResult<TemplateDir> {
        match self.toolbox.config().templates_dir() {
            Some(dir) => {
                debug!("Loading templates from {:?}", dir);
                Ok(TemplateDir::from_path(&dir)?)
            }
            None => Ok(TemplateDir::from_embedded()?),
        }
    }

    /// Create project `name` under `parent`.
    ///
    /// Nothing runs when the target directory already exists. A failure
    /// after the directory was made leaves it in place.
    pub async fn create(
        &self,
        parent: &Path,
        name: &str,
        options: &CreateOptions,
    ) -> CoreResult<Project> {
        validate_name(name)?;
        let root_dir = parent.join(name);
        // Dangling symlinks count as taken.
        if fs::symlink_metadata(&root_dir).is_ok() {
            return Err(CoreError::DirectoryAlreadyExists(root_dir));
        }

        let templates = self.templates()?;

        info!("Creating project {} in {:?}", name, root_dir);
        fs::create_dir_all(&root_dir)?;

        let git = self.toolbox.git(&root_dir);
        git.init()?;

        if let Some(constraint) = &options.python {
            let mut pyenv = self.toolbox.pyenv(&root_dir);
            let version = pyenv.ensure_python(constraint, options.allow_prerelease)?;
            pyenv.local(&version)?;
            info!("Using Python {}", version);
        }

        let poetry = self.toolbox.poetry();
        poetry.init(name, &root_dir, options.interactive)?;

        let mut project = Project::open(&root_dir, git, poetry)?;

        let license_text = match project.license_text(self.license_source.as_ref()).await {
            Ok(text) => text,
            Err(CoreError::AttributeNotFound(path)) => {
                warn!("{} is not set, LICENSE will be empty", path);
                String::new()
            }
            Err(e) => return Err(e),
        };

        let values = project.template_values(&license_text)?;
        let plan = project.create_from_templates(&templates, &values)?;
        debug!("Rendered {} file(s)", plan.files().count());

        project.add_all_untracked()?;
        info!("Created project {}", name);
        Ok(project)
    }
}

fn validate_name(name: &str) -> CoreResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || name.contains(['/', '\\'])
    {
        return Err(CoreError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}
