//! Install command - Install the project and its dependencies.

use anyhow::{Context, Result};
use clap::Args;

use super::context::AppContext;

#[derive(Args)]
pub struct InstallArgs {
    /// Skip development dependencies
    #[arg(long)]
    pub no_dev: bool,
}

pub async fn execute(args: InstallArgs, ctx: &AppContext) -> Result<()> {
    let toolbox = ctx.toolbox()?;
    let project = ctx.open_project(&toolbox)?;

    project
        .install(args.no_dev)
        .context("Failed to install dependencies")?;

    println!("✅ Dependencies installed");
    Ok(())
}
