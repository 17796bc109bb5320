// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing, discovery, and merging with CLI flags.
//!
//! Settings live in forktest.toml, discovered from the current directory
//! up to the git root. Command-line flags win over file values; list
//! settings are appended rather than replaced.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

/// Default per-test timeout: unbounded.
pub const NO_TIMEOUT: i64 = 0;

const DEFAULT_CLASSES_DIR: &str = "target/test-classes";

/// Raw forktest.toml contents.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    /// Directory holding the compiled test classes.
    pub classes_dir: Option<PathBuf>,

    /// Classpath entries for the child processes.
    #[serde(default)]
    pub classpath: Vec<String>,

    /// Jar with the child runner main classes.
    pub runner_jar: Option<PathBuf>,

    /// Java interpreter command or path.
    pub java: Option<String>,

    /// Extra JVM options for every test.
    #[serde(default)]
    pub jvm_options: Vec<String>,

    /// Environment variable overrides for the children.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Java system properties passed as -Dkey=value.
    #[serde(default)]
    pub system_properties: BTreeMap<String, String>,

    /// Text piped to every child's standard input.
    pub stdin_text: Option<String>,

    /// Per-test timeout in milliseconds (0 = unbounded).
    pub timeout: Option<i64>,

    /// Class-file include globs, relative to the classes directory.
    #[serde(default)]
    pub includes: Vec<String>,

    /// Class-file exclude globs.
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Method name include wildcards.
    #[serde(default)]
    pub include_tests: Vec<String>,

    /// Method name exclude wildcards.
    #[serde(default)]
    pub exclude_tests: Vec<String>,

    /// Run only tests carrying the fork annotation.
    pub only_annotated: Option<bool>,

    /// Skip test execution entirely.
    pub skip: Option<bool>,

    /// Print captured console output even for passing tests.
    pub print_console: Option<bool>,
}

/// Load a forktest.toml file.
pub fn load(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("cannot read config: {e}"),
        path: Some(path.to_path_buf()),
    })?;
    toml::from_str(&text).map_err(|e| Error::Config {
        message: e.to_string(),
        path: Some(path.to_path_buf()),
    })
}

/// Find forktest.toml starting from `start_dir` and walking up to git root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join("forktest.toml");
        if config_path.exists() {
            return Some(config_path);
        }

        // Stop at git root
        if current.join(".git").exists() {
            return None;
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Resolve config path from CLI arg, env var, or discovery.
///
/// Priority:
/// 1. CLI flag `-C`/`--config` (handled by clap with env = "FORKTEST_CONFIG")
/// 2. Discovery from current directory up to git root
/// 3. None (use defaults)
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            if path.exists() {
                Ok(Some(path.to_path_buf()))
            } else {
                Err(Error::Config {
                    message: format!("config file not found: {}", path.display()),
                    path: Some(path.to_path_buf()),
                })
            }
        }
        None => Ok(find_config(cwd)),
    }
}

/// Fully merged settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub classes_dir: PathBuf,
    pub classpath: Vec<String>,
    pub runner_jar: Option<PathBuf>,
    pub java: String,
    pub jvm_options: Vec<String>,
    pub env: Vec<(String, String)>,
    pub system_properties: Vec<(String, String)>,
    pub stdin_text: String,
    pub timeout_ms: i64,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub include_tests: Vec<String>,
    pub exclude_tests: Vec<String>,
    pub test_filter: Option<String>,
    pub only_annotated: bool,
    pub skip: bool,
    pub print_console: bool,
}

impl RunConfig {
    /// Merge file settings with CLI flags. Scalars from the command line
    /// win; lists and maps from both sources are combined, command line
    /// last.
    pub fn merge(file: FileConfig, cli: &Cli) -> Result<Self> {
        let mut env = map_to_pairs(file.env);
        for entry in &cli.env {
            upsert(&mut env, parse_key_value(entry)?);
        }
        let mut system_properties = map_to_pairs(file.system_properties);
        for entry in &cli.system_properties {
            upsert(&mut system_properties, parse_key_value(entry)?);
        }

        let timeout_ms = cli.timeout.or(file.timeout).unwrap_or(NO_TIMEOUT);
        if timeout_ms < 0 {
            return Err(Error::Argument(format!(
                "timeout must be >= 0, got {timeout_ms}"
            )));
        }

        Ok(Self {
            classes_dir: cli
                .classes_dir
                .clone()
                .or(file.classes_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CLASSES_DIR)),
            classpath: combine(file.classpath, &cli.classpath),
            runner_jar: cli.runner_jar.clone().or(file.runner_jar),
            java: cli
                .java
                .clone()
                .or(file.java)
                .unwrap_or_else(default_java),
            jvm_options: combine(file.jvm_options, &cli.jvm_options),
            env,
            system_properties,
            stdin_text: cli
                .stdin_text
                .clone()
                .or(file.stdin_text)
                .unwrap_or_default(),
            timeout_ms,
            includes: combine(file.includes, &cli.includes),
            excludes: combine(file.excludes, &cli.excludes),
            include_tests: combine(file.include_tests, &cli.include_tests),
            exclude_tests: combine(file.exclude_tests, &cli.exclude_tests),
            test_filter: cli.test_filter.clone(),
            only_annotated: cli.only_annotated || file.only_annotated.unwrap_or(false),
            skip: cli.skip || file.skip.unwrap_or(false),
            print_console: cli.print_console || file.print_console.unwrap_or(false),
        })
    }

    /// Build the child classpath string: the classes directory itself,
    /// then configured entries, then the runner jar.
    pub fn assemble_classpath(&self) -> String {
        let mut entries = Vec::with_capacity(self.classpath.len() + 2);
        entries.push(self.classes_dir.to_string_lossy().into_owned());
        entries.extend(self.classpath.iter().cloned());
        if let Some(jar) = &self.runner_jar {
            entries.push(jar.to_string_lossy().into_owned());
        }
        entries.join(CLASSPATH_SEPARATOR)
    }
}

#[cfg(windows)]
const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: &str = ":";

/// `JAVA_HOME/bin/java` when set, otherwise rely on PATH lookup.
fn default_java() -> String {
    match std::env::var("JAVA_HOME") {
        Ok(home) if !home.is_empty() => Path::new(&home)
            .join("bin")
            .join("java")
            .to_string_lossy()
            .into_owned(),
        _ => "java".to_string(),
    }
}

fn parse_key_value(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(Error::Argument(format!("expected KEY=VALUE, got {entry:?}"))),
    }
}

fn map_to_pairs(map: BTreeMap<String, String>) -> Vec<(String, String)> {
    map.into_iter().collect()
}

fn upsert(pairs: &mut Vec<(String, String)>, entry: (String, String)) {
    match pairs.iter_mut().find(|(key, _)| *key == entry.0) {
        Some(existing) => existing.1 = entry.1,
        None => pairs.push(entry),
    }
}

fn combine(mut base: Vec<String>, extra: &[String]) -> Vec<String> {
    base.extend(extra.iter().cloned());
    base
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
