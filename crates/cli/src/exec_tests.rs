//! Unit tests for the process executor.
//!
//! Uses `sh -c` as the configured interpreter: everything the executor
//! appends after the script (system properties, classpath, runner selector,
//! target) lands in the script's positional parameters and stays inert, so
//! real child processes exercise capture, stdin, env, and timeout handling
//! without a JVM.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::PathBuf;
use std::time::Duration;

use super::*;
use crate::descriptor::TestDescriptor;
use crate::protocol::{FORK_RUNNER_MAIN, JUNIT_RUNNER_MAIN};

fn executor() -> Executor {
    Executor {
        classpath: "/tmp/classes".to_string(),
        env: Vec::new(),
        system_properties: Vec::new(),
        only_native: false,
    }
}

fn shell_test(script: &str) -> TestDescriptor {
    let base = TestDescriptor::global(
        "/bin/sh",
        vec!["-c".to_string(), script.to_string()],
        "",
        false,
        0,
    );
    let mut d = TestDescriptor::derive(&base, PathBuf::from("T.class"), "some.T", "testX");
    d.fork_test = true;
    d
}

#[test]
fn command_line_layout_follows_the_argv_contract() {
    let exec = Executor {
        classpath: "a.jar:b".to_string(),
        env: Vec::new(),
        system_properties: vec![("key".to_string(), "value".to_string())],
        only_native: false,
    };
    let base = TestDescriptor::global("java", vec!["-Xmx32m".to_string()], "", false, 0);
    let mut d = TestDescriptor::derive(&base, PathBuf::from("T.class"), "some.T", "testX");
    d.junit_test = true;

    let argv = exec.command_line(&d);
    assert_eq!(
        argv,
        vec![
            "java",
            "-Xmx32m",
            "-Dkey=value",
            "-classpath",
            "a.jar:b",
            JUNIT_RUNNER_MAIN,
            "some.T#testX",
        ]
    );
}

#[test]
fn native_tests_select_the_fork_runner_main() {
    let exec = executor();
    let d = shell_test("exit 0");
    let argv = exec.command_line(&d);
    assert!(argv.contains(&FORK_RUNNER_MAIN.to_string()));
}

#[test]
fn skipped_descriptor_never_spawns() {
    let exec = executor();
    // An unspawnable interpreter proves the short-circuit: any spawn
    // attempt would surface as an ERROR outcome.
    let base = TestDescriptor::global("/no/such/interpreter", Vec::new(), "", false, 0);
    let mut d = TestDescriptor::derive(&base, PathBuf::from("T.class"), "some.T", "testX");
    d.fork_test = true;
    d.skip = true;

    let outcome = exec.execute(&d);
    assert_eq!(outcome.status, TestStatus::Skipped);
    assert_eq!(outcome.duration, None);
    assert!(outcome.stdout.is_empty());
}

#[test]
fn only_native_mode_skips_framework_only_tests() {
    let mut exec = executor();
    exec.only_native = true;
    let mut d = shell_test("exit 0");
    d.fork_test = false;
    d.junit_test = true;

    let outcome = exec.execute(&d);
    assert_eq!(outcome.status, TestStatus::Skipped);
}

#[cfg(unix)]
#[test]
fn only_native_mode_runs_native_tests_despite_framework_ignore() {
    let mut exec = executor();
    exec.only_native = true;
    let mut d = shell_test("printf ran");
    d.junit_test = true;
    d.junit_ignore = true;

    let outcome = exec.execute(&d);
    assert_eq!(outcome.status, TestStatus::Ok);
    assert_eq!(outcome.stdout, "ran");
}

#[cfg(unix)]
#[test]
fn zero_exit_classifies_ok_and_captures_stdout() {
    let outcome = executor().execute(&shell_test("printf hello"));
    assert_eq!(outcome.status, TestStatus::Ok);
    assert_eq!(outcome.stdout, "hello");
    assert!(outcome.duration.is_some());
}

#[cfg(unix)]
#[test]
fn nonzero_exit_classifies_error_and_captures_stderr() {
    let outcome = executor().execute(&shell_test("echo oops >&2; exit 3"));
    assert_eq!(outcome.status, TestStatus::Error);
    assert!(outcome.stderr.contains("oops"));
}

#[cfg(unix)]
#[test]
fn expired_timeout_classifies_timeout_and_keeps_captured_output() {
    let mut d = shell_test("echo started; sleep 5");
    d.timeout_ms = 300;

    let outcome = executor().execute(&d);
    assert_eq!(outcome.status, TestStatus::Timeout);
    assert!(outcome.stdout.contains("started"));
    let duration = outcome.duration.unwrap();
    assert!(duration < Duration::from_secs(4), "child was terminated early");
}

#[cfg(unix)]
#[test]
fn nonpositive_timeout_waits_unbounded() {
    let mut d = shell_test("sleep 0.2; printf done");
    d.timeout_ms = 0;

    let outcome = executor().execute(&d);
    assert_eq!(outcome.status, TestStatus::Ok);
    assert_eq!(outcome.stdout, "done");
}

#[cfg(unix)]
#[test]
fn stdin_text_is_fed_to_the_child() {
    let mut d = shell_test("cat");
    d.stdin_text = "ping-pong".to_string();

    let outcome = executor().execute(&d);
    assert_eq!(outcome.status, TestStatus::Ok);
    assert_eq!(outcome.stdout, "ping-pong");
}

#[cfg(unix)]
#[test]
fn environment_overrides_reach_the_child() {
    let mut exec = executor();
    exec.env = vec![("FORKTEST_TEST_ENV".to_string(), "propagated".to_string())];
    let outcome = exec.execute(&shell_test("printf \"$FORKTEST_TEST_ENV\""));
    assert_eq!(outcome.stdout, "propagated");
}

#[test]
fn spawn_failure_folds_into_an_error_outcome() {
    let base = TestDescriptor::global("/no/such/interpreter", Vec::new(), "", false, 0);
    let mut d = TestDescriptor::derive(&base, PathBuf::from("T.class"), "some.T", "testX");
    d.fork_test = true;

    let outcome = executor().execute(&d);
    assert_eq!(outcome.status, TestStatus::Error);
    assert!(outcome.stderr.contains("failed to spawn"));
}

#[test]
fn error_statuses_count_toward_the_error_tally() {
    assert!(TestStatus::Error.is_error());
    assert!(TestStatus::Timeout.is_error());
    assert!(!TestStatus::Ok.is_error());
    assert!(!TestStatus::Skipped.is_error());
}
