//! Create command - Create a new project.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use hon_core::{CreateOptions, ProjectCreator, SpdxLicenseSource};

use super::context::AppContext;

#[derive(Args)]
pub struct CreateArgs {
    /// Name of the project to create
    pub name: String,

    /// Directory to create the project in (defaults to the current directory)
    #[arg(long)]
    pub parent: Option<PathBuf>,

    /// Python version constraint to install and pin with pyenv (e.g. "~3.9")
    #[arg(long)]
    pub python: Option<String>,

    /// Consider development Python versions for --python
    #[arg(long, requires = "python")]
    pub allow_prerelease: bool,

    /// Do not let poetry prompt for project metadata
    #[arg(long)]
    pub no_interaction: bool,
}

impl CreateArgs {
    fn options(&self) -> CreateOptions {
        CreateOptions {
            python: self.python.clone(),
            interactive: !self.no_interaction,
            allow_prerelease: self.allow_prerelease,
        }
    }
}

pub async fn execute(args: CreateArgs, ctx: &AppContext) -> Result<()> {
    let parent = match &args.parent {
        Some(parent) => parent.clone(),
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    info!("Creating project: {}", args.name);

    let creator = ProjectCreator::new(ctx.toolbox()?, Arc::new(SpdxLicenseSource::new()));
    let project = creator
        .create(&parent, &args.name, &args.options())
        .await
        .with_context(|| format!("Failed to create project {}", args.name))?;

    println!("✅ Project '{}' created", args.name);
    println!();
    println!("  📁 {}", project.root_dir().display());
    println!();
    println!("Next steps:");
    println!("  cd {}", project.root_dir().display());
    println!("  hon install");
    println!("  hon test");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options() {
        let args = CreateArgs {
            name: "widget".to_string(),
            parent: None,
            python: Some("^3.8".to_string()),
            allow_prerelease: false,
            no_interaction: true,
        };
        let options = args.options();
        assert_eq!(options.python.as_deref(), Some("^3.8"));
        assert!(!options.interactive);
        assert!(!options.allow_prerelease);
    }
}
