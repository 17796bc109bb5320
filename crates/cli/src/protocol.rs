// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Child runner protocol: the argv and exit-code contract between the
//! parent executor and the spawned test process.
//!
//! The child is invoked as
//! `<jvm> <options..> -classpath <cp> <runner-main> <Class>#<Method>` and
//! reports through its exit code. The single target argument joins the
//! class and method name with `#`, both halves non-empty; it is produced by
//! [`TestDescriptor::target`] and decoded on the child side. The two runner
//! entry points are Java main classes shipped in the runner jar that the
//! executor appends to the child classpath; their native-runner lifecycle
//! semantics are mirrored in [`crate::lifecycle`].

use crate::descriptor::TestDescriptor;

/// Main class delegating to the ambient framework's single-method API.
pub const JUNIT_RUNNER_MAIN: &str = "com.forktest.runner.JUnitMethodRunner";
/// Main class implementing the native lifecycle runner.
pub const FORK_RUNNER_MAIN: &str = "com.forktest.runner.ForkMethodRunner";

/// Child exit: test ran and passed.
pub const EXIT_SUCCESS: i32 = 0;
/// Child exit: a hook or the test method failed.
pub const EXIT_FAILURE: i32 = 1;
/// Child exit: the framework classes could not be resolved at all.
pub const EXIT_INFRASTRUCTURE: i32 = 2;
/// Child exit: runner invoked without a target argument. Reserved.
pub const EXIT_BAD_INVOCATION: i32 = 999;

/// Which child runner entry point executes a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerKind {
    /// Framework-style runner for plain framework tests.
    Junit,
    /// Native runner: re-implements the lifecycle chain so execution does
    /// not depend on which framework is resolvable in the child.
    Fork,
}

impl RunnerKind {
    /// The framework runner handles non-ignored framework tests; everything
    /// else (native tests, ignorable framework tests forced to run) goes
    /// through the native runner.
    pub fn select(descriptor: &TestDescriptor) -> Self {
        if descriptor.junit_test && !descriptor.junit_ignore {
            RunnerKind::Junit
        } else {
            RunnerKind::Fork
        }
    }

    pub fn main_class(self) -> &'static str {
        match self {
            RunnerKind::Junit => JUNIT_RUNNER_MAIN,
            RunnerKind::Fork => FORK_RUNNER_MAIN,
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
