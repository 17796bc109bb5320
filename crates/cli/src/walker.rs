// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery of candidate class files under the test-classes directory.
//!
//! Collects every `*.class` file, filtered by include/exclude glob patterns
//! matched against the path relative to the scan root. Output is sorted so
//! discovery order is stable across runs.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::{Error, Result};

/// Compiled include/exclude filter for class-file paths.
#[derive(Debug)]
pub struct ClassFileFilter {
    includes: GlobSet,
    include_count: usize,
    excludes: GlobSet,
}

impl ClassFileFilter {
    /// Compile path patterns. As a convenience, a trailing `.java` in a
    /// pattern is rewritten to `.class` so source-style patterns keep
    /// working against compiled output.
    pub fn compile(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: build_set(includes)?,
            include_count: includes.len(),
            excludes: build_set(excludes)?,
        })
    }

    pub fn accepts(&self, relative_path: &str) -> bool {
        if self.include_count != 0 && !self.includes.is_match(relative_path) {
            return false;
        }
        !self.excludes.is_match(relative_path)
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let normalized = normalize_pattern(pattern);
        let glob = Glob::new(&normalized).map_err(|e| Error::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| Error::Pattern {
        pattern: patterns.join(","),
        message: e.to_string(),
    })
}

fn normalize_pattern(pattern: &str) -> String {
    match pattern.strip_suffix(".java") {
        Some(stem) => format!("{stem}.class"),
        None => pattern.to_string(),
    }
}

/// Walk `root` and return every accepted class file, sorted.
///
/// An empty result is a warning, not an error: a project without test
/// classes simply runs zero tests.
pub fn collect_class_files(root: &Path, filter: &ClassFileFilter) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkBuilder::new(root).standard_filters(false).build() {
        let entry = entry.map_err(|e| Error::Walk {
            message: e.to_string(),
        })?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "class") {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative = relative.to_string_lossy().replace('\\', "/");
        if filter.accepts(&relative) {
            tracing::debug!("found potential test class: {}", path.display());
            found.push(path.to_path_buf());
        } else {
            tracing::debug!("class file excluded by patterns: {}", path.display());
        }
    }

    found.sort();
    if found.is_empty() {
        tracing::warn!("no test class files found in {}", root.display());
    }
    Ok(found)
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
