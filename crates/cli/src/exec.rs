// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-test process execution.
//!
//! One OS process per non-skipped descriptor: the executor assembles the
//! child command line, feeds configured stdin text, captures stdout and
//! stderr into separate buffers, enforces the descriptor's timeout, and
//! classifies the exit. Executor invocations share no mutable state, so the
//! members of a concurrent batch can run through it independently.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::descriptor::TestDescriptor;
use crate::protocol::RunnerKind;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Terminal state of one descriptor execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Skipped,
    Ok,
    Timeout,
    Error,
}

impl TestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Skipped => "SKIPPED",
            TestStatus::Ok => "OK",
            TestStatus::Timeout => "TIMEOUT",
            TestStatus::Error => "ERROR",
        }
    }

    /// TIMEOUT and ERROR both count toward the run's error tally.
    pub fn is_error(self) -> bool {
        matches!(self, TestStatus::Timeout | TestStatus::Error)
    }
}

/// Result of executing (or short-circuiting) one descriptor.
#[derive(Debug)]
pub struct ExecOutcome {
    pub status: TestStatus,
    /// None for skipped tests: nothing ran, nothing to time.
    pub duration: Option<Duration>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutcome {
    fn skipped() -> Self {
        Self {
            status: TestStatus::Skipped,
            duration: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Run-wide execution context shared (immutably) by all executor calls.
#[derive(Debug)]
pub struct Executor {
    /// Resolved child classpath, already joined with the platform separator.
    pub classpath: String,
    /// Environment overrides applied on top of the inherited environment.
    pub env: Vec<(String, String)>,
    /// Global system properties, passed as `-Dkey=value` options.
    pub system_properties: Vec<(String, String)>,
    pub only_native: bool,
}

impl Executor {
    /// Assemble the full child argv for a descriptor.
    pub fn command_line(&self, descriptor: &TestDescriptor) -> Vec<String> {
        let mut argv = Vec::with_capacity(descriptor.jvm_options.len() + 6);
        argv.push(descriptor.jvm.clone());
        argv.extend(descriptor.jvm_options.iter().cloned());
        for (key, value) in &self.system_properties {
            argv.push(format!("-D{key}={value}"));
        }
        argv.push("-classpath".to_string());
        argv.push(self.classpath.clone());
        argv.push(RunnerKind::select(descriptor).main_class().to_string());
        argv.push(descriptor.target());
        argv
    }

    /// Execute one descriptor to a terminal outcome.
    ///
    /// Infrastructure failures (spawn or stream errors) are folded into an
    /// ERROR outcome with the failure text on the captured stderr; they must
    /// not take down sibling workers.
    pub fn execute(&self, descriptor: &TestDescriptor) -> ExecOutcome {
        if descriptor.is_skipped(self.only_native) {
            tracing::debug!("{descriptor}: skipped, no process spawned");
            return ExecOutcome::skipped();
        }

        let argv = self.command_line(descriptor);
        tracing::debug!("{descriptor}: spawning {}", argv.join(" "));

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if descriptor.stdin_text.is_empty() {
                Stdio::null()
            } else {
                Stdio::piped()
            });

        let start = Instant::now();
        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!("{descriptor}: failed to spawn '{}': {e}", argv[0]);
                return ExecOutcome {
                    status: TestStatus::Error,
                    duration: Some(start.elapsed()),
                    stdout: String::new(),
                    stderr: format!("failed to spawn '{}': {e}", argv[0]),
                };
            }
        };

        self.supervise(descriptor, child, start)
    }

    fn supervise(&self, descriptor: &TestDescriptor, mut child: Child, start: Instant) -> ExecOutcome {
        // Feed stdin from its own thread so a child that never reads cannot
        // block the supervisor.
        if let Some(mut stdin) = child.stdin.take() {
            let text = descriptor.stdin_text.clone();
            thread::spawn(move || {
                let _ = stdin.write_all(text.as_bytes());
            });
        }

        // Dedicated readers keep the pipes drained; whatever was written
        // before a forced termination stays captured.
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let timeout = (descriptor.timeout_ms > 0)
            .then(|| Duration::from_millis(descriptor.timeout_ms as u64));
        let (status, exit_code) = wait_child(&mut child, timeout);
        let duration = start.elapsed();

        let stdout = collect_reader(stdout_reader);
        let stderr = collect_reader(stderr_reader);

        let status = match status {
            WaitResult::TimedOut => TestStatus::Timeout,
            WaitResult::Exited if exit_code == Some(0) => TestStatus::Ok,
            _ => TestStatus::Error,
        };
        tracing::debug!(
            "{descriptor}: {} after {:?} (exit {:?})",
            status.as_str(),
            duration,
            exit_code
        );

        ExecOutcome {
            status,
            duration: Some(duration),
            stdout,
            stderr,
        }
    }
}

enum WaitResult {
    Exited,
    TimedOut,
    Failed,
}

/// Wait for the child, enforcing an optional deadline. On expiry the child
/// is killed and reaped; no process is ever left running.
fn wait_child(child: &mut Child, timeout: Option<Duration>) -> (WaitResult, Option<i32>) {
    let Some(timeout) = timeout else {
        return match child.wait() {
            Ok(status) => (WaitResult::Exited, status.code()),
            Err(_) => (WaitResult::Failed, None),
        };
    };

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return (WaitResult::Exited, status.code()),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return (WaitResult::TimedOut, None);
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return (WaitResult::Failed, None);
            }
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = source.read_to_end(&mut buffer);
        buffer
    })
}

fn collect_reader(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    let bytes = handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
