// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use termcolor::ColorChoice;

/// Runs each JVM test method in its own freshly forked java process
#[derive(Parser)]
#[command(name = "forktest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", env = "FORKTEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the compiled test classes
    #[arg(value_name = "CLASS_DIR")]
    pub classes_dir: Option<PathBuf>,

    /// Classpath entry for the child processes (repeatable)
    #[arg(long = "classpath", value_name = "ENTRY")]
    pub classpath: Vec<String>,

    /// Jar with the child runner main classes, appended to the classpath
    #[arg(long = "runner-jar", value_name = "PATH")]
    pub runner_jar: Option<PathBuf>,

    /// Java interpreter command or path (default: JAVA_HOME/bin/java)
    #[arg(long, value_name = "CMD")]
    pub java: Option<String>,

    /// Extra JVM option for every test (repeatable)
    #[arg(long = "jvm-option", value_name = "OPT", allow_hyphen_values = true)]
    pub jvm_options: Vec<String>,

    /// Environment variable override for the children (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Java system property passed as -Dkey=value (repeatable)
    #[arg(long = "prop", value_name = "KEY=VALUE")]
    pub system_properties: Vec<String>,

    /// Text piped to every child's standard input
    #[arg(long = "stdin", value_name = "TEXT")]
    pub stdin_text: Option<String>,

    /// Per-test timeout in milliseconds (0 = unbounded)
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Class-file include glob, relative to CLASS_DIR (repeatable)
    #[arg(long = "include", value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Class-file exclude glob (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Method name include wildcard (repeatable)
    #[arg(long = "include-test", value_name = "PATTERN")]
    pub include_tests: Vec<String>,

    /// Method name exclude wildcard (repeatable)
    #[arg(long = "exclude-test", value_name = "PATTERN")]
    pub exclude_tests: Vec<String>,

    /// Run only tests matching Class#Method (wildcards allowed)
    #[arg(long = "test", value_name = "CLASS#METHOD")]
    pub test_filter: Option<String>,

    /// Run only tests carrying the @ForkTest annotation
    #[arg(long)]
    pub only_annotated: bool,

    /// Skip test execution entirely
    #[arg(long, env = "FORKTEST_SKIP")]
    pub skip: bool,

    /// Print captured console output even for passing tests
    #[arg(long = "print-console")]
    pub print_console: bool,

    /// Force color output
    #[arg(long)]
    pub color: bool,

    /// Disable color output
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Resolve the color mode from flags, NO_COLOR, and the stream.
pub fn resolve_color(force: bool, disable: bool) -> ColorChoice {
    if disable || std::env::var_os("NO_COLOR").is_some() {
        ColorChoice::Never
    } else if force {
        ColorChoice::Always
    } else if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
