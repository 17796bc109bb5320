// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The one command forktest has: discover, scan, execute, report.

use std::time::Instant;

use termcolor::StandardStream;

use forktest::cli::{Cli, resolve_color};
use forktest::config::{self, FileConfig, RunConfig};
use forktest::descriptor::TestDescriptor;
use forktest::error::ExitCode;
use forktest::exec::Executor;
use forktest::pattern::{MethodFilter, TestFilter};
use forktest::report::{Renderer, RunTotals};
use forktest::runner;
use forktest::scan::{ScannedClass, Scanner};
use forktest::walker::{ClassFileFilter, collect_class_files};

pub fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let file = match config::resolve_config(cli.config.as_deref(), &cwd)? {
        Some(path) => {
            tracing::debug!("using config file {}", path.display());
            config::load(&path)?
        }
        None => FileConfig::default(),
    };
    let config = RunConfig::merge(file, cli)?;

    if config.skip {
        println!("Tests are skipped.");
        return Ok(ExitCode::Success);
    }

    let start = Instant::now();
    let classes = discover(&config)?;
    let test_count: usize = classes.iter().map(|c| c.tests.len()).sum();
    tracing::info!(
        "discovered {} tests in {} classes under {}",
        test_count,
        classes.len(),
        config.classes_dir.display()
    );

    let name_column = classes
        .iter()
        .flat_map(|c| c.tests.iter())
        .map(|t| t.method_name.len())
        .max()
        .unwrap_or(0);

    let executor = Executor {
        classpath: config.assemble_classpath(),
        env: config.env.clone(),
        system_properties: config.system_properties.clone(),
        only_native: config.only_annotated,
    };
    let totals = RunTotals::default();

    let mut stdout = StandardStream::stdout(resolve_color(cli.color, cli.no_color));
    let mut renderer = Renderer::new(&mut stdout, name_column);
    runner::run_classes(&executor, classes, &totals, &mut renderer)?;
    renderer.render_summary(&totals, start.elapsed())?;

    if totals.errors() > 0 {
        Ok(ExitCode::TestsFailed)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Walk the classes directory and scan every accepted class file.
fn discover(config: &RunConfig) -> anyhow::Result<Vec<ScannedClass>> {
    let filter = ClassFileFilter::compile(&config.includes, &config.excludes)?;
    let files = collect_class_files(&config.classes_dir, &filter)?;

    let base = TestDescriptor::global(
        config.java.clone(),
        config.jvm_options.clone(),
        config.stdin_text.clone(),
        config.print_console,
        config.timeout_ms,
    );
    let method_filter = MethodFilter::compile(&config.include_tests, &config.exclude_tests)?;
    let test_filter = config
        .test_filter
        .as_deref()
        .map(TestFilter::parse)
        .transpose()?;
    let scanner = Scanner {
        base: &base,
        only_native: config.only_annotated,
        method_filter: &method_filter,
        test_filter: test_filter.as_ref(),
    };

    let mut classes = Vec::new();
    for file in &files {
        if let Some(scanned) = scanner.scan_file(file)? {
            classes.push(scanned);
        }
    }
    Ok(classes)
}
