// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Native runner lifecycle: the fixed stage pipeline the spawned process
//! executes around a single test method.
//!
//! Stage rules:
//! - before-class hooks run first; a failure aborts everything except the
//!   after-class hooks.
//! - before-each hooks run next; a failure skips the test method but the
//!   after-each hooks still run.
//! - after-each and after-class hooks run unconditionally; a failing member
//!   never stops the remaining members of its stage.
//! - every failure is reported before execution continues, and any failure
//!   anywhere turns the final exit code into a failure.
//!
//! Hooks are ordered callables; collecting them in inheritance order
//! (ancestor hooks ahead of descendant hooks of the same kind) is the
//! caller's contract.

use std::io::Write;

use crate::protocol::{EXIT_FAILURE, EXIT_SUCCESS};

/// One lifecycle hook or the test method itself.
pub struct Hook {
    name: String,
    run: Box<dyn FnMut() -> Result<(), String>>,
}

impl Hook {
    pub fn new(name: impl Into<String>, run: impl FnMut() -> Result<(), String> + 'static) -> Self {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The complete per-test execution plan inside one spawned process.
pub struct LifecyclePlan {
    pub before_class: Vec<Hook>,
    pub before_each: Vec<Hook>,
    pub test: Hook,
    pub after_each: Vec<Hook>,
    pub after_class: Vec<Hook>,
}

/// Execute the plan and produce the child process exit code.
///
/// Failure details go to `err` (the child's standard error) as they occur.
pub fn execute(mut plan: LifecyclePlan, err: &mut dyn Write) -> i32 {
    let mut failed = false;

    if !run_stage(&mut plan.before_class, true, err) {
        failed = true;
    }

    if !failed {
        if run_stage(&mut plan.before_each, true, err) {
            if let Err(message) = (plan.test.run)() {
                report(err, plan.test.name(), &message);
                failed = true;
            }
        } else {
            failed = true;
        }
        // After-each hooks run even when setup or the test failed.
        if !run_stage(&mut plan.after_each, false, err) {
            failed = true;
        }
    }

    // After-class hooks always run, whatever happened above.
    if !run_stage(&mut plan.after_class, false, err) {
        failed = true;
    }

    if failed { EXIT_FAILURE } else { EXIT_SUCCESS }
}

/// Run one stage. Returns false if any member failed. `break_on_error`
/// stops the stage at the first failure (setup stages); teardown stages
/// keep going regardless.
fn run_stage(hooks: &mut [Hook], break_on_error: bool, err: &mut dyn Write) -> bool {
    let mut clean = true;
    for hook in hooks {
        if let Err(message) = (hook.run)() {
            clean = false;
            report(err, &hook.name, &message);
            if break_on_error {
                break;
            }
        }
    }
    clean
}

fn report(err: &mut dyn Write, hook_name: &str, message: &str) {
    // Mirror of the child printing a throwable's trace before continuing.
    let _ = writeln!(err, "{hook_name}: {message}");
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
