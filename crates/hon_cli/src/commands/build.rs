//! Build command - Build sdist and wheel packages.

use anyhow::{Context, Result};
use clap::Args;

use super::context::AppContext;

#[derive(Args)]
pub struct BuildArgs {
    /// Let poetry print debug output
    #[arg(long)]
    pub debug: bool,
}

pub async fn execute(args: BuildArgs, ctx: &AppContext) -> Result<()> {
    let toolbox = ctx.toolbox()?;
    let mut project = ctx.open_project(&toolbox)?;
    let name = project.name()?;

    project
        .build(args.debug)
        .with_context(|| format!("Failed to build {}", name))?;

    println!("✅ Built {}", name);
    Ok(())
}
