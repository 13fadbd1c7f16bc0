//! hon CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Project error
//! - 4: Template error
//! - 5: External tool failed

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hon_core::{CoreError, MANIFEST_FILE};
use hon_runner::RunnerError;
use hon_templates::TemplateError;
use hon_tools::ToolError;

mod commands;

use commands::context::AppContext;
use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const PROJECT_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const TOOL_FAILED: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "hon=debug"
    } else if cli.quiet {
        "hon=warn"
    } else {
        "hon=info"
    };

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive(level.parse().expect("static log directive"))
                .add_directive("warn".parse().expect("static log directive")),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let ctx = AppContext::new(cli.project, cli.config);

    let result = match cli.command {
        Commands::Create(args) => commands::create::execute(args, &ctx).await,
        Commands::Build(args) => commands::build::execute(args, &ctx).await,
        Commands::Install(args) => commands::install::execute(args, &ctx).await,
        Commands::Test(args) => commands::test::execute(args, &ctx).await,
        Commands::Dep(command) => commands::dep::execute(command, &ctx).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<CoreError>() {
            return core_exit_code(err);
        }
        if let Some(err) = cause.downcast_ref::<ToolError>() {
            return tool_exit_code(err);
        }
        if let Some(err) = cause.downcast_ref::<RunnerError>() {
            return runner_exit_code(err);
        }
        if cause.downcast_ref::<TemplateError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}

fn core_exit_code(err: &CoreError) -> u8 {
    match err {
        CoreError::DirectoryAlreadyExists(_)
        | CoreError::MissingManifest(_)
        | CoreError::NotAVersionControlDirectory(_)
        | CoreError::AttributeNotFound(_)
        | CoreError::AttributeType { .. }
        | CoreError::UnknownLicense(_)
        | CoreError::GitError(_) => ExitCodes::PROJECT_ERROR,
        CoreError::InvalidToml { path, .. } if path.ends_with(MANIFEST_FILE) => {
            ExitCodes::PROJECT_ERROR
        }
        CoreError::InvalidProjectName(_)
        | CoreError::ConfigNotFound(_)
        | CoreError::InvalidToml { .. } => ExitCodes::INVALID_ARGS,
        CoreError::Template(_) => ExitCodes::TEMPLATE_ERROR,
        CoreError::Tool(e) => tool_exit_code(e),
        CoreError::Runner(e) => runner_exit_code(e),
        CoreError::Io(_) => ExitCodes::GENERAL_ERROR,
    }
}

fn tool_exit_code(err: &ToolError) -> u8 {
    match err {
        ToolError::InvalidConstraint(_) | ToolError::InvalidOperator { .. } => {
            ExitCodes::INVALID_ARGS
        }
        ToolError::NoMatchingPython(_) | ToolError::UnexpectedOutput { .. } => {
            ExitCodes::TOOL_FAILED
        }
        ToolError::Runner(e) => runner_exit_code(e),
        ToolError::Io(_) => ExitCodes::GENERAL_ERROR,
    }
}

fn runner_exit_code(err: &RunnerError) -> u8 {
    match err {
        RunnerError::Spawn { .. } | RunnerError::CommandFailed { .. } => ExitCodes::TOOL_FAILED,
        RunnerError::Io(_) => ExitCodes::GENERAL_ERROR,
    }
}
