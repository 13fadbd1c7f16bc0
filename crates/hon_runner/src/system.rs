//! Runner backed by real child processes.

use std::process::{Command, Stdio};

use chrono::Utc;
use tracing::{debug, error, info};

use crate::error::{RunnerError, RunnerResult};
use crate::invocation::{Invocation, OutputMode};
use crate::runner::{ExecutionResult, ToolRunner};

/// System runner options.
#[derive(Debug, Clone, Default)]
pub struct SystemRunnerOptions {
    /// Dry-run mode (log commands without executing)
    pub dry_run: bool,
}

impl SystemRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// Runs invocations with `std::process::Command`, waiting for each to exit.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    options: SystemRunnerOptions,
}

impl SystemRunner {
    pub fn new(options: SystemRunnerOptions) -> Self {
        Self { options }
    }

    /// Check if dry-run mode is enabled.
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Check whether a program can be started at all.
    pub fn is_available(program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn build_command(&self, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        cmd.envs(&invocation.env);

        match invocation.output {
            OutputMode::Forward => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
            OutputMode::Discard => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
        }
        cmd
    }

    fn spawn_error(invocation: &Invocation, source: std::io::Error) -> RunnerError {
        RunnerError::Spawn {
            program: invocation.program.clone(),
            source,
        }
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> RunnerResult<ExecutionResult> {
        let started_at = Utc::now();

        if self.options.dry_run {
            info!("[DRY-RUN] Would execute: {}", invocation);
            return Ok(ExecutionResult {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                started_at,
                finished_at: started_at,
                duration_ms: 0,
            });
        }

        debug!(
            cwd = ?invocation.cwd,
            "Executing: {}",
            invocation
        );

        let mut cmd = self.build_command(invocation);
        let (exit_code, stdout, stderr) = match invocation.output {
            OutputMode::Capture => {
                let output = cmd
                    .output()
                    .map_err(|e| Self::spawn_error(invocation, e))?;
                (
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stdout).to_string(),
                    String::from_utf8_lossy(&output.stderr).to_string(),
                )
            }
            OutputMode::Forward | OutputMode::Discard => {
                let status = cmd
                    .status()
                    .map_err(|e| Self::spawn_error(invocation, e))?;
                (status.code().unwrap_or(-1), String::new(), String::new())
            }
        };

        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;

        if exit_code == 0 {
            debug!("{} completed in {}ms", invocation.program, duration_ms);
        } else {
            error!(
                "{} exited with code {} after {}ms",
                invocation.program, exit_code, duration_ms
            );
        }

        ExecutionResult {
            exit_code,
            stdout,
            stderr,
            started_at,
            finished_at,
            duration_ms,
        }
        .check(invocation)
    }
}
