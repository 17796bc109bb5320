// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test descriptors: the schedulable unit of work.
//!
//! A descriptor is built in three layers: global defaults from the run
//! configuration, a class-level template from class annotations, and finally
//! the method's own annotation values. Later layers overwrite scalar fields
//! only when the annotation actually sets them and always append to list
//! fields; nothing set earlier is ever removed.

use std::fmt;
use std::path::PathBuf;

use crate::classfile::ElementValue;

/// Order sentinel: not explicitly ordered. Sorts first, never batched with
/// anything else.
pub const UNORDERED: i32 = -1;

/// Closed set of annotation element names the merge recognizes.
const KNOWN_ELEMENTS: &[&str] = &[
    "jvm",
    "jvmOpts",
    "in",
    "order",
    "enforceOut",
    "skip",
    "timeout",
];

/// One scheduled test method, or a class-level override template when
/// `method_name` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TestDescriptor {
    /// Path of the class file the descriptor was scanned from.
    pub class_file: PathBuf,
    /// Fully qualified class name in dotted form.
    pub class_name: String,
    pub method_name: String,

    /// Interpreter command or path for the child process.
    pub jvm: String,
    /// Cumulative interpreter options: global, then class-level, then
    /// method-level appends.
    pub jvm_options: Vec<String>,
    /// Text piped to the child's stdin; empty means no input.
    pub stdin_text: String,
    pub order: i32,
    /// Print captured console output even on success.
    pub print_console: bool,
    pub skip: bool,
    /// Non-positive means unbounded.
    pub timeout_ms: i64,

    /// Discovered via the ambient framework's `@Test`.
    pub junit_test: bool,
    /// Carries the framework's `@Ignore`.
    pub junit_ignore: bool,
    /// Discovered via this tool's own `@ForkTest` annotation.
    pub fork_test: bool,
}

impl TestDescriptor {
    /// Global defaults layer, before any class is scanned.
    pub fn global(
        jvm: impl Into<String>,
        jvm_options: Vec<String>,
        stdin_text: impl Into<String>,
        print_console: bool,
        timeout_ms: i64,
    ) -> Self {
        Self {
            class_file: PathBuf::new(),
            class_name: String::new(),
            method_name: String::new(),
            jvm: jvm.into(),
            jvm_options,
            stdin_text: stdin_text.into(),
            order: UNORDERED,
            print_console,
            skip: false,
            timeout_ms,
            junit_test: false,
            junit_ignore: false,
            fork_test: false,
        }
    }

    /// Derive the next inheritance layer for a concrete class or method.
    ///
    /// Framework-test detection is per-method and deliberately not
    /// inherited; the ignore marker and the native-test marker are.
    pub fn derive(
        base: &TestDescriptor,
        class_file: PathBuf,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            class_file,
            class_name: class_name.into(),
            method_name: method_name.into(),
            junit_test: false,
            ..base.clone()
        }
    }

    /// Merge annotation element values into this descriptor.
    ///
    /// Scalars are assigned, `jvmOpts` appends. Element names outside the
    /// known set and type mismatches are ignored so newer annotation
    /// revisions stay scannable.
    pub fn apply_annotation_values(&mut self, values: &[(String, ElementValue)]) {
        for (name, value) in values {
            match (name.as_str(), value) {
                ("jvm", ElementValue::Str(s)) => self.jvm = s.clone(),
                ("in", ElementValue::Str(s)) => self.stdin_text = s.clone(),
                ("order", ElementValue::Int(v)) => self.order = *v as i32,
                ("enforceOut", ElementValue::Boolean(v)) => self.print_console = *v,
                ("skip", ElementValue::Boolean(v)) => self.skip = *v,
                ("timeout", ElementValue::Int(v)) => self.timeout_ms = *v,
                ("jvmOpts", ElementValue::Array(items)) => {
                    for item in items {
                        if let ElementValue::Str(s) = item {
                            self.jvm_options.push(s.clone());
                        }
                    }
                }
                _ => {
                    if KNOWN_ELEMENTS.contains(&name.as_str()) {
                        tracing::debug!(
                            "ignoring annotation element '{}' with unexpected value kind",
                            name
                        );
                    }
                }
            }
        }
    }

    /// A descriptor enters scheduling only when it was recognized as a test
    /// at all; only-native mode additionally requires the native marker.
    pub fn is_runnable(&self, only_native: bool) -> bool {
        if only_native {
            self.fork_test
        } else {
            self.junit_test || self.fork_test
        }
    }

    /// Short-circuit decision made by the executor before spawning anything.
    ///
    /// In only-native mode the native runner drives the test, so framework
    /// ignore markers do not apply there; only the explicit skip flag does.
    pub fn is_skipped(&self, only_native: bool) -> bool {
        if only_native {
            return !self.fork_test || self.skip;
        }
        self.skip || (self.junit_test && self.junit_ignore)
    }

    /// The single child-process argument: `ClassName#MethodName`.
    pub fn target(&self) -> String {
        format!("{}#{}", self.class_name, self.method_name)
    }
}

impl fmt::Display for TestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class_name, self.method_name)
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
