//! Tool runner trait and types.

use chrono::{DateTime, Utc};

use crate::error::{RunnerError, RunnerResult};
use crate::invocation::Invocation;

/// Result of running an external command.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code (-1 when terminated by a signal)
    pub exit_code: i32,
    /// Captured stdout (empty unless captured)
    pub stdout: String,
    /// Captured stderr (empty unless captured)
    pub stderr: String,
    /// Execution start time
    pub started_at: DateTime<Utc>,
    /// Execution end time
    pub finished_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Check if execution was successful (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Get combined output (stdout + stderr).
    pub fn combined_output(&self) -> String {
        if self.stdout.is_empty() {
            self.stderr.clone()
        } else if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// Apply the invocation's strict mode to this result.
    pub fn check(self, invocation: &Invocation) -> RunnerResult<Self> {
        if invocation.strict && !self.success() {
            return Err(RunnerError::CommandFailed {
                command: invocation.to_string(),
                code: self.exit_code,
                stderr: self.stderr,
            });
        }
        Ok(self)
    }
}

/// Runs external commands synchronously.
pub trait ToolRunner: Send + Sync {
    /// Run the invocation to completion.
    ///
    /// Fails with [`RunnerError::CommandFailed`] when the invocation is strict
    /// and the process exits non-zero.
    fn run(&self, invocation: &Invocation) -> RunnerResult<ExecutionResult>;

    /// Run with captured output and return stdout.
    fn output(&self, invocation: &Invocation) -> RunnerResult<String> {
        let invocation = invocation.clone().capture();
        Ok(self.run(&invocation)?.stdout)
    }
}
