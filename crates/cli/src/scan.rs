// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Metadata scanner: compiled class bytes in, test descriptors out.
//!
//! Scanning is purely structural (see [`crate::classfile`]); no test code is
//! loaded or executed in this process. An unreadable or corrupt class file is
//! fatal to the discovery phase.

use std::path::{Path, PathBuf};

use crate::classfile::{self, Annotation};
use crate::descriptor::TestDescriptor;
use crate::error::{Error, Result};
use crate::pattern::{MethodFilter, TestFilter};

/// Type descriptor of the ambient framework's test marker.
pub const ANNO_TEST: &str = "Lorg/junit/Test;";
/// Type descriptor of the ambient framework's ignore marker.
pub const ANNO_IGNORE: &str = "Lorg/junit/Ignore;";
/// Type descriptor of this tool's own test annotation.
pub const ANNO_FORK: &str = "Lcom/forktest/annotations/ForkTest;";

/// Scan output for one class: eligible descriptors in discovery order.
#[derive(Debug)]
pub struct ScannedClass {
    pub class_file: PathBuf,
    pub class_name: String,
    pub tests: Vec<TestDescriptor>,
}

/// Scanner configuration shared across all class files of one run.
pub struct Scanner<'a> {
    /// Global defaults layer for descriptor inheritance.
    pub base: &'a TestDescriptor,
    /// Restrict scheduling to natively annotated tests.
    pub only_native: bool,
    pub method_filter: &'a MethodFilter,
    /// Optional single-test focus filter.
    pub test_filter: Option<&'a TestFilter>,
}

impl Scanner<'_> {
    /// Read and scan one class file from disk.
    pub fn scan_file(&self, path: &Path) -> Result<Option<ScannedClass>> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.scan_bytes(path, &bytes)
    }

    /// Scan one compiled class from raw bytes.
    ///
    /// Returns `None` for classes that can never host tests (interfaces,
    /// abstract classes, annotations, enums). Deterministic: identical bytes
    /// always yield identical descriptors.
    pub fn scan_bytes(&self, path: &Path, bytes: &[u8]) -> Result<Option<ScannedClass>> {
        let class = classfile::parse(bytes).map_err(|e| Error::ClassFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if !class.is_instantiable_class() {
            tracing::debug!("{}: not an instantiable class, skipped", class.class_name);
            return Ok(None);
        }

        let template = self.class_template(path, &class.class_name, &class.annotations);
        let effective_base = template.as_ref().unwrap_or(self.base);

        let mut tests = Vec::new();
        for method in &class.methods {
            if !method.is_test_candidate() {
                continue;
            }
            if !self.method_filter.accepts(&method.name) {
                tracing::debug!(
                    "{}#{}: rejected by method include/exclude patterns",
                    class.class_name,
                    method.name
                );
                continue;
            }

            let mut descriptor = TestDescriptor::derive(
                effective_base,
                path.to_path_buf(),
                class.class_name.clone(),
                method.name.clone(),
            );
            apply_method_annotations(&mut descriptor, &method.annotations);

            if !descriptor.is_runnable(self.only_native) {
                continue;
            }
            if let Some(filter) = self.test_filter
                && !filter.matches(&descriptor.class_name, &descriptor.method_name)
            {
                tracing::debug!("{}: rejected by focus filter", descriptor);
                continue;
            }
            tests.push(descriptor);
        }

        Ok(Some(ScannedClass {
            class_file: path.to_path_buf(),
            class_name: class.class_name,
            tests,
        }))
    }

    /// Build the class-level override template, if the class carries any
    /// marker worth inheriting.
    fn class_template(
        &self,
        path: &Path,
        class_name: &str,
        annotations: &[Annotation],
    ) -> Option<TestDescriptor> {
        let mut template: Option<TestDescriptor> = None;
        for anno in annotations {
            let t = match anno.type_descriptor.as_str() {
                ANNO_IGNORE | ANNO_FORK => template.get_or_insert_with(|| {
                    TestDescriptor::derive(self.base, path.to_path_buf(), class_name, "")
                }),
                _ => continue,
            };
            if anno.type_descriptor == ANNO_IGNORE {
                t.junit_ignore = true;
            } else {
                t.fork_test = true;
                t.apply_annotation_values(&anno.values);
            }
        }
        template
    }
}

/// Merge the method's own annotations onto the inherited descriptor. Flags
/// only ever turn on here; the inheritance layers never lose information.
fn apply_method_annotations(descriptor: &mut TestDescriptor, annotations: &[Annotation]) {
    for anno in annotations {
        match anno.type_descriptor.as_str() {
            ANNO_TEST => descriptor.junit_test = true,
            ANNO_IGNORE => descriptor.junit_ignore = true,
            ANNO_FORK => {
                descriptor.fork_test = true;
                descriptor.apply_annotation_values(&anno.values);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
