//! Dep commands - Manage project dependencies.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::context::AppContext;

#[derive(Subcommand)]
pub enum DepCommand {
    /// Add dependencies
    Add(AddArgs),

    /// Remove dependencies
    Remove(RemoveArgs),

    /// Update dependencies to their latest allowed versions
    Update(UpdateArgs),

    /// Lock dependencies without installing them
    Lock,
}

#[derive(Args)]
pub struct AddArgs {
    /// Add as development dependencies
    #[arg(long)]
    pub dev: bool,

    /// Add as optional dependencies
    #[arg(long)]
    pub optional: bool,

    /// Packages to add, with optional constraints (e.g. "requests@^2.25")
    #[arg(required = true)]
    pub packages: Vec<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Remove from development dependencies
    #[arg(long)]
    pub dev: bool,

    /// Packages to remove
    #[arg(required = true)]
    pub packages: Vec<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Only update the lock file
    #[arg(long)]
    pub lock: bool,

    /// Packages to update (all by default)
    pub packages: Vec<String>,
}

pub async fn execute(command: DepCommand, ctx: &AppContext) -> Result<()> {
    let toolbox = ctx.toolbox()?;
    let project = ctx.open_project(&toolbox)?;

    match command {
        DepCommand::Add(args) => {
            project
                .add_dependencies(&args.packages, args.dev, args.optional)
                .context("Failed to add dependencies")?;
            println!("✅ Added {}", args.packages.join(", "));
        }
        DepCommand::Remove(args) => {
            project
                .remove_dependencies(&args.packages, args.dev)
                .context("Failed to remove dependencies")?;
            println!("✅ Removed {}", args.packages.join(", "));
        }
        DepCommand::Update(args) => {
            project
                .update_dependencies(&args.packages, args.lock)
                .context("Failed to update dependencies")?;
            println!("✅ Dependencies updated");
        }
        DepCommand::Lock => {
            project.lock().context("Failed to lock dependencies")?;
            println!("✅ Dependencies locked");
        }
    }

    Ok(())
}
