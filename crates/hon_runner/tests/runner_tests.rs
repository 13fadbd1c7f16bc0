//! Integration tests for process invocation.
//!
//! The mock runner covers the shared contract; the system runner tests use
//! only `sh` and are limited to Unix.

use std::sync::Arc;

use hon_runner::{
    Invocation, MockResponse, MockRunner, OutputMode, RunnerError, SystemRunner,
    SystemRunnerOptions, ToolRunner,
};

/// Test sequential execution with multiple responses.
#[test]
fn test_mock_runner_sequential_responses() {
    let runner = MockRunner::new().with_responses(vec![
        MockResponse::success("step 1 output"),
        MockResponse::failure(2, "warning\nstep 2 failed\n"),
        MockResponse::failure(4, ""),
    ]);

    let r1 = runner.run(&Invocation::new("poetry").arg("lock")).unwrap();
    assert!(r1.success());
    assert_eq!(r1.stdout, "step 1 output");

    let err = runner
        .run(&Invocation::new("poetry").arg("install"))
        .unwrap_err();
    assert_eq!(err.exit_code(), Some(2));
    assert_eq!(
        err.to_string(),
        "External command failed with exit code 2: poetry install (step 2 failed)"
    );

    // Non-strict invocations report the exit code instead of failing.
    let r3 = runner
        .run(&Invocation::new("poetry").arg("check").strict(false))
        .unwrap();
    assert_eq!(r3.exit_code, 4);
    assert!(!r3.success());
    assert_eq!(runner.call_count(), 3);
}

/// Clones share recorded calls, as used when a runner is handed to several tools.
#[test]
fn test_mock_runner_shared_through_trait_object() {
    let mock = MockRunner::new();
    let shared: Arc<dyn ToolRunner> = Arc::new(mock.clone());

    shared.run(&Invocation::new("git").arg("init")).unwrap();
    let stdout = shared
        .output(&Invocation::new("git").args(["ls-files", "--others"]))
        .unwrap();
    assert_eq!(stdout, "");

    let calls = mock.get_program_calls("git");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].output, OutputMode::Forward);
    assert_eq!(calls[1].output, OutputMode::Capture);
}

#[test]
fn test_dry_run_executes_nothing() {
    let runner = SystemRunner::new(SystemRunnerOptions::new().dry_run());
    assert!(runner.is_dry_run());

    let result = runner
        .run(&Invocation::new("definitely-not-a-real-program-hon").arg("--help"))
        .unwrap();
    assert!(result.success());
    assert_eq!(result.duration_ms, 0);
}

#[test]
fn test_missing_program_is_spawn_error() {
    let runner = SystemRunner::default();
    let err = runner
        .run(&Invocation::new("definitely-not-a-real-program-hon").discard())
        .unwrap_err();
    assert!(matches!(err, RunnerError::Spawn { ref program, .. } if program == "definitely-not-a-real-program-hon"));
    assert_eq!(err.exit_code(), None);
}

#[cfg(unix)]
#[test]
fn test_system_runner_captures_and_fails_strictly() {
    let runner = SystemRunner::default();

    let out = runner
        .output(&Invocation::new("sh").args(["-c", "echo $GREETING"]).env("GREETING", "hello"))
        .unwrap();
    assert_eq!(out.trim(), "hello");

    let err = runner
        .run(
            &Invocation::new("sh")
                .args(["-c", "echo broken >&2; exit 3"])
                .capture(),
        )
        .unwrap_err();
    match err {
        RunnerError::CommandFailed { code, stderr, .. } => {
            assert_eq!(code, 3);
            assert_eq!(stderr.trim(), "broken");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
