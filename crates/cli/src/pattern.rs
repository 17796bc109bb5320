// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wildcard matching for test names.
//!
//! Method include/exclude lists and the single-test focus filter use plain
//! `*`/`?` wildcards, compiled through globset. Class and method names never
//! contain path separators, so glob semantics reduce to simple wildcards.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{Error, Result};

fn compile_glob(pattern: &str) -> Result<Glob> {
    Glob::new(pattern).map_err(|e| Error::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// A compiled set of name wildcards. An empty set matches nothing.
#[derive(Debug)]
pub struct NameSet {
    set: GlobSet,
    len: usize,
}

impl NameSet {
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(compile_glob(pattern)?);
        }
        let set = builder.build().map_err(|e| Error::Pattern {
            pattern: patterns.join(","),
            message: e.to_string(),
        })?;
        Ok(Self {
            set,
            len: patterns.len(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn matches(&self, name: &str) -> bool {
        self.set.is_match(name)
    }
}

/// Include/exclude wildcard filter over method names.
///
/// No include patterns means include everything; any matching exclude
/// pattern wins over an include.
#[derive(Debug)]
pub struct MethodFilter {
    includes: NameSet,
    excludes: NameSet,
}

impl MethodFilter {
    pub fn compile(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: NameSet::compile(includes)?,
            excludes: NameSet::compile(excludes)?,
        })
    }

    pub fn accepts(&self, method_name: &str) -> bool {
        if !self.includes.is_empty() && !self.includes.matches(method_name) {
            return false;
        }
        !self.excludes.matches(method_name)
    }
}

/// Single-test focus filter: `ClassPattern#MethodPattern`.
///
/// Both halves allow wildcards; a missing `#` means "any method".
#[derive(Debug)]
pub struct TestFilter {
    class_glob: globset::GlobMatcher,
    method_glob: globset::GlobMatcher,
}

impl TestFilter {
    pub fn parse(spec: &str) -> Result<Self> {
        let (class_part, method_part) = match spec.split_once('#') {
            Some((class, method)) => (class, method),
            None => (spec, "*"),
        };
        if class_part.is_empty() || method_part.is_empty() {
            return Err(Error::Pattern {
                pattern: spec.to_string(),
                message: "expected ClassPattern or ClassPattern#MethodPattern".to_string(),
            });
        }
        Ok(Self {
            class_glob: compile_glob(class_part)?.compile_matcher(),
            method_glob: compile_glob(method_part)?.compile_matcher(),
        })
    }

    pub fn matches(&self, class_name: &str, method_name: &str) -> bool {
        self.class_glob.is_match(class_name) && self.method_glob.is_match(method_name)
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
