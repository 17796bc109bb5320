// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The run loop: classes in discovery order, batches in schedule order,
//! batch members sequentially or fanned out over scoped threads.
//!
//! Records arrive in completion order. Within a sequential batch that is
//! the schedule order; within a concurrent batch it is whatever order the
//! children finish in. A class is rendered only once all of its batches
//! are done, so concurrent output never interleaves across classes.

use std::thread;

use crossbeam_channel::unbounded;

use crate::descriptor::TestDescriptor;
use crate::error::{Error, Result};
use crate::exec::Executor;
use crate::report::{ClassReport, Renderer, RunTotals, TestRecord};
use crate::scan::ScannedClass;
use crate::schedule::{self, Batch};

/// Execute every test of one class and collect its records.
pub fn run_class(
    executor: &Executor,
    class: ScannedClass,
    totals: &RunTotals,
) -> ClassReport {
    let mut records = Vec::with_capacity(class.tests.len());
    for batch in schedule::schedule(class.tests) {
        run_batch(executor, batch, totals, &mut records);
    }
    ClassReport {
        class_name: class.class_name,
        records,
    }
}

/// Execute the classes in order, rendering each as it finishes.
pub fn run_classes(
    executor: &Executor,
    classes: Vec<ScannedClass>,
    totals: &RunTotals,
    renderer: &mut Renderer<'_>,
) -> Result<()> {
    for class in classes {
        if class.tests.is_empty() {
            tracing::debug!("{}: no eligible tests", class.class_name);
            continue;
        }
        let report = run_class(executor, class, totals);
        renderer
            .render_class(&report)
            .map_err(|e| Error::Internal(format!("cannot write report: {e}")))?;
    }
    Ok(())
}

/// One batch, start to finish. Every member terminates before this
/// returns; a concurrent batch is a full barrier.
fn run_batch(
    executor: &Executor,
    batch: Batch,
    totals: &RunTotals,
    records: &mut Vec<TestRecord>,
) {
    if batch.concurrent() {
        tracing::debug!("running batch of {} tests concurrently", batch.len());
        let (sender, receiver) = unbounded();
        thread::scope(|scope| {
            for descriptor in &batch.tests {
                let sender = sender.clone();
                scope.spawn(move || {
                    let record = run_one(executor, descriptor, true, totals);
                    let _ = sender.send(record);
                });
            }
            drop(sender);
            records.extend(receiver.iter());
        });
    } else {
        for descriptor in &batch.tests {
            records.push(run_one(executor, descriptor, false, totals));
        }
    }
}

fn run_one(
    executor: &Executor,
    descriptor: &TestDescriptor,
    concurrent: bool,
    totals: &RunTotals,
) -> TestRecord {
    if !descriptor.is_skipped(executor.only_native) {
        totals.record_started();
    }
    let outcome = executor.execute(descriptor);
    totals.record_status(outcome.status);
    TestRecord {
        method_name: descriptor.method_name.clone(),
        status: outcome.status,
        duration: outcome.duration,
        stdout: outcome.stdout,
        stderr: outcome.stderr,
        concurrent,
        print_console: descriptor.print_console,
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
