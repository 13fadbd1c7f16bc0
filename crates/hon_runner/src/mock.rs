//! Mock tool runner for testing.
//!
//! Provides a configurable mock implementation of the ToolRunner trait
//! for use in unit tests without requiring poetry, pyenv or git.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::{RunnerError, RunnerResult};
use crate::invocation::Invocation;
use crate::runner::{ExecutionResult, ToolRunner};

/// Predefined mock response for an invocation.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            duration_ms: 10,
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration_ms: 10,
        }
    }

    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }
}

/// Side effect run for every recorded invocation.
pub type MockHook = Arc<dyn Fn(&Invocation) + Send + Sync>;

/// Mock tool runner for testing.
///
/// Every invocation is recorded. Responses are picked from the first rule
/// whose argv prefix matches, then from the queue in order (cycling), and
/// default to an empty success.
#[derive(Clone, Default)]
pub struct MockRunner {
    rules: Arc<RwLock<Vec<(Vec<String>, MockResponse)>>>,
    responses: Arc<RwLock<Vec<MockResponse>>>,
    response_index: Arc<AtomicUsize>,
    captured_calls: Arc<RwLock<Vec<Invocation>>>,
    simulate_failure: Arc<RwLock<Option<String>>>,
    hook: Arc<RwLock<Option<MockHook>>>,
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock response for the next unmatched call.
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.write().push(response);
        self
    }

    /// Set multiple responses.
    pub fn with_responses(self, responses: Vec<MockResponse>) -> Self {
        *self.responses.write() = responses;
        self
    }

    /// Respond to every call whose argv starts with `prefix`.
    pub fn on<I, S>(self, prefix: I, response: MockResponse) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefix = prefix.into_iter().map(Into::into).collect();
        self.rules.write().push((prefix, response));
        self
    }

    /// Make every call fail to spawn.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    /// Run `hook` for each call before the response is produced.
    pub fn with_hook(self, hook: impl Fn(&Invocation) + Send + Sync + 'static) -> Self {
        *self.hook.write() = Some(Arc::new(hook));
        self
    }

    /// Clear all captured calls.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<Invocation> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Check if a program was invoked.
    pub fn was_called(&self, program: &str) -> bool {
        self.captured_calls
            .read()
            .iter()
            .any(|c| c.program == program)
    }

    /// Get calls to a specific program.
    pub fn get_program_calls(&self, program: &str) -> Vec<Invocation> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.program == program)
            .cloned()
            .collect()
    }

    /// Argument vectors of all calls, in order.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.captured_calls
            .read()
            .iter()
            .map(|c| c.argv().into_iter().map(String::from).collect())
            .collect()
    }

    fn next_response(&self, invocation: &Invocation) -> MockResponse {
        let argv = invocation.argv();
        if let Some((_, response)) = self.rules.read().iter().find(|(prefix, _)| {
            prefix.len() <= argv.len() && prefix.iter().zip(&argv).all(|(p, a)| p == a)
        }) {
            return response.clone();
        }

        let responses = self.responses.read();
        if responses.is_empty() {
            return MockResponse::success("");
        }
        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        responses
            .get(index % responses.len())
            .cloned()
            .unwrap_or_else(|| MockResponse::success(""))
    }
}

impl ToolRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> RunnerResult<ExecutionResult> {
        self.captured_calls.write().push(invocation.clone());

        if let Some(msg) = self.simulate_failure.read().clone() {
            return Err(RunnerError::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, msg),
            });
        }

        let hook = self.hook.read().clone();
        if let Some(hook) = hook {
            hook(invocation);
        }

        let response = self.next_response(invocation);
        let started_at = Utc::now();
        let finished_at = started_at + chrono::Duration::milliseconds(response.duration_ms as i64);

        ExecutionResult {
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            started_at,
            finished_at,
            duration_ms: response.duration_ms,
        }
        .check(invocation)
    }
}
