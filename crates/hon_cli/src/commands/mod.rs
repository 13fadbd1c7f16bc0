//! CLI command definitions.
//!
//! Each subcommand maps to one project lifecycle operation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod build;
pub mod context;
pub mod create;
pub mod dep;
pub mod install;

/// hon - Python project lifecycle manager
#[derive(Parser)]
#[command(name = "hon")]
#[command(version, about = "hon - Python project lifecycle manager")]
#[command(long_about = r#"
hon creates and manages Python projects by driving poetry, pyenv, git and
pytest behind one set of commands.

COMMANDS:
  create   → Create a project: git repository, pyproject.toml, templates
  build    → Build sdist and wheel packages
  install  → Install the project and its dependencies
  test     → Run the test suite with coverage
  dep      → Add, remove, update or lock dependencies

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Project error
  4 - Template error
  5 - External tool failed
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, env = "HON_PROJECT_DIR")]
    pub project: Option<PathBuf>,

    /// Configuration directory (defaults to ~/.hon)
    #[arg(long, global = true, env = "HON_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project
    Create(create::CreateArgs),

    /// Build the project packages
    Build(build::BuildArgs),

    /// Install the project and its dependencies
    Install(install::InstallArgs),

    /// Run the test suite
    Test(test::TestArgs),

    /// Manage dependencies
    #[command(subcommand)]
    Dep(dep::DepCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "hon",
            "create",
            "widget",
            "--parent",
            "/tmp/work",
            "--python",
            ">=3.8,<3.10",
            "--no-interaction",
        ])
        .unwrap();

        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.name, "widget");
                assert_eq!(args.parent, Some(PathBuf::from("/tmp/work")));
                assert_eq!(args.python.as_deref(), Some(">=3.8,<3.10"));
                assert!(args.no_interaction);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["hon", "build", "--debug", "-v", "--project", "/src/widget"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.project, Some(PathBuf::from("/src/widget")));
        assert!(matches!(cli.command, Commands::Build(ref a) if a.debug));
    }

    #[test]
    fn test_directories_from_environment() {
        let project = tempfile::tempdir().unwrap();
        let config = tempfile::tempdir().unwrap();
        std::fs::write(
            config.path().join("config.toml"),
            "[tools]\npoetry = \"/opt/poetry/bin/poetry\"\n",
        )
        .unwrap();

        std::env::set_var("HON_PROJECT_DIR", project.path());
        std::env::set_var("HON_CONFIG_DIR", config.path());
        let from_env = Cli::try_parse_from(["hon", "install"]);
        let overridden = Cli::try_parse_from(["hon", "install", "--project", "/elsewhere"]);
        std::env::remove_var("HON_PROJECT_DIR");
        std::env::remove_var("HON_CONFIG_DIR");

        let cli = from_env.unwrap();
        assert_eq!(cli.project.as_deref(), Some(project.path()));
        assert_eq!(cli.config.as_deref(), Some(config.path()));

        let ctx = context::AppContext::new(cli.project, cli.config);
        assert_eq!(ctx.project_dir().unwrap(), project.path());
        assert_eq!(ctx.config().unwrap().tool("poetry"), "/opt/poetry/bin/poetry");

        let cli = overridden.unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/elsewhere")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["hon", "-v", "-q", "install"]).is_err());
    }

    #[test]
    fn test_parse_test_selection() {
        let cli = Cli::try_parse_from(["hon", "test", "tests/test_api.py", "-k", "slow"]);
        // Unknown flags are not forwarded; selections are positional.
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["hon", "test", "--debug", "tests/test_api.py"]).unwrap();
        match cli.command {
            Commands::Test(args) => {
                assert!(args.debug);
                assert_eq!(args.tests, vec!["tests/test_api.py"]);
            }
            _ => panic!("expected test"),
        }
    }

    #[test]
    fn test_parse_dep_commands() {
        let cli = Cli::try_parse_from(["hon", "dep", "add", "--dev", "pytest", "black"]).unwrap();
        match cli.command {
            Commands::Dep(dep::DepCommand::Add(args)) => {
                assert!(args.dev);
                assert!(!args.optional);
                assert_eq!(args.packages, vec!["pytest", "black"]);
            }
            _ => panic!("expected dep add"),
        }

        assert!(Cli::try_parse_from(["hon", "dep", "add"]).is_err());
        assert!(Cli::try_parse_from(["hon", "dep", "remove", "requests"]).is_ok());
        assert!(Cli::try_parse_from(["hon", "dep", "update", "--lock"]).is_ok());
        assert!(Cli::try_parse_from(["hon", "dep", "lock"]).is_ok());
    }
}
