//! # hon_runner
//!
//! External process invocation for hon.
//!
//! Every wrapped tool (poetry, pyenv, git, pytest) is driven through the
//! [`ToolRunner`] trait, which runs one [`Invocation`] synchronously and
//! returns its [`ExecutionResult`].
//!
//! # Features
//!
//! - **Output modes**: forward to the terminal, capture, or discard
//! - **Strict mode**: non-zero exits become [`RunnerError::CommandFailed`]
//! - **Dry-Run Mode**: log commands without executing
//! - **Mock Runner**: record invocations in tests without real tools
//!
//! # Example
//!
//! ```rust,no_run
//! use hon_runner::{Invocation, SystemRunner, ToolRunner};
//!
//! let runner = SystemRunner::default();
//! let version = runner.output(&Invocation::new("poetry").arg("--version"))?;
//! println!("{}", version.trim());
//! # Ok::<(), hon_runner::RunnerError>(())
//! ```

pub mod error;
pub mod invocation;
pub mod mock;
pub mod runner;
pub mod system;

pub use error::{RunnerError, RunnerResult};
pub use invocation::{Invocation, OutputMode};
pub use mock::{MockHook, MockResponse, MockRunner};
pub use runner::{ExecutionResult, ToolRunner};
pub use system::{SystemRunner, SystemRunnerOptions};
