// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Batch scheduling: sorting descriptors and partitioning them into
//! sequential or concurrent execution batches.
//!
//! Sorting is by ascending explicit order with the method name as tie-break;
//! the sort is stable, so descriptors tied on both keys keep their discovery
//! order. The unordered sentinel (-1) sorts first and is never grouped.
//!
//! A batch runs concurrently only for order values strictly greater than
//! zero: order 0 groups tests into one batch but keeps them sequential.

use crate::descriptor::TestDescriptor;

/// A maximal run of consecutive sorted descriptors sharing one order value.
#[derive(Debug)]
pub struct Batch {
    pub order: i32,
    pub tests: Vec<TestDescriptor>,
}

impl Batch {
    /// Whether the batch's members fan out concurrently. Singleton batches
    /// and order <= 0 always run sequentially.
    pub fn concurrent(&self) -> bool {
        self.order > 0 && self.tests.len() > 1
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// Sort one class's descriptors into execution order.
pub fn sort_descriptors(tests: &mut [TestDescriptor]) {
    tests.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.method_name.cmp(&b.method_name))
    });
}

/// Partition sorted descriptors into batches by forward scan.
///
/// An unordered descriptor always forms a singleton batch; an explicitly
/// ordered descriptor absorbs every immediately following descriptor with
/// the same order value.
pub fn partition(tests: Vec<TestDescriptor>) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    for descriptor in tests {
        match batches.last_mut() {
            Some(last) if descriptor.order >= 0 && last.order == descriptor.order => {
                last.tests.push(descriptor);
            }
            _ => batches.push(Batch {
                order: descriptor.order,
                tests: vec![descriptor],
            }),
        }
    }
    batches
}

/// Sort and partition in one step.
pub fn schedule(mut tests: Vec<TestDescriptor>) -> Vec<Batch> {
    sort_descriptors(&mut tests);
    partition(tests)
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
