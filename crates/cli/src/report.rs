// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Result aggregation and tree-style rendering of the execution log.
//!
//! One header per class, one connector-prefixed line per test in completion
//! order, framed console blocks for failures (or forced capture), and a
//! final one-line summary. Workers never write to the renderer directly:
//! they append records to a per-class buffer and the runner renders the
//! finished class.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use termcolor::{Color, ColorSpec, WriteColor};

use crate::exec::TestStatus;

const FRAME_WIDTH: usize = 79;
/// Dot padding beyond the longest method name of the run.
const NAME_PAD: usize = 5;

/// One rendered line's worth of data: a finished test.
#[derive(Debug)]
pub struct TestRecord {
    pub method_name: String,
    pub status: TestStatus,
    pub duration: Option<Duration>,
    pub stdout: String,
    pub stderr: String,
    /// Whether the test ran as part of a concurrent batch.
    pub concurrent: bool,
    /// Force the console block even on success.
    pub print_console: bool,
}

/// Completion-ordered records for one class.
#[derive(Debug)]
pub struct ClassReport {
    pub class_name: String,
    pub records: Vec<TestRecord>,
}

/// Run-wide counters, updated by atomic increment from any worker.
#[derive(Debug, Default)]
pub struct RunTotals {
    started: AtomicUsize,
    errors: AtomicUsize,
    skipped: AtomicUsize,
}

impl RunTotals {
    pub fn record_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_status(&self, status: TestStatus) {
        if status == TestStatus::Skipped {
            self.skipped.fetch_add(1, Ordering::Relaxed);
        } else if status.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }
}

/// Zero-padded `HH:MM:SS.mmm`.
pub fn format_elapsed(duration: Duration) -> String {
    let ms = duration.as_millis();
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1000) % 60;
    let millis = ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

fn status_color(status: TestStatus) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match status {
        TestStatus::Ok => spec.set_fg(Some(Color::Green)),
        TestStatus::Skipped => spec.set_fg(Some(Color::Yellow)),
        TestStatus::Timeout | TestStatus::Error => {
            spec.set_fg(Some(Color::Red)).set_bold(true)
        }
    };
    spec
}

/// Tree renderer over a color-capable stream.
pub struct Renderer<'a> {
    out: &'a mut dyn WriteColor,
    /// Common column every status keyword is dot-padded to, derived from
    /// the longest method name across the whole run.
    name_column: usize,
}

impl<'a> Renderer<'a> {
    pub fn new(out: &'a mut dyn WriteColor, max_method_name_len: usize) -> Self {
        Self {
            out,
            name_column: max_method_name_len + NAME_PAD,
        }
    }

    /// Render one finished class subtree.
    pub fn render_class(&mut self, report: &ClassReport) -> io::Result<()> {
        writeln!(self.out, "{}", report.class_name)?;
        writeln!(self.out, " \u{2502}")?;

        let last_index = report.records.len().saturating_sub(1);
        for (index, record) in report.records.iter().enumerate() {
            self.render_record(record, index == last_index)?;
        }
        writeln!(self.out)
    }

    fn render_record(&mut self, record: &TestRecord, last: bool) -> io::Result<()> {
        let connector = if last { '\u{2514}' } else { '\u{251C}' };
        let rail = if record.concurrent { '\u{2550}' } else { '\u{2500}' };
        let dots = self.name_column.saturating_sub(record.method_name.len());

        write!(
            self.out,
            " {connector}{rail}{}{}",
            record.method_name,
            ".".repeat(dots)
        )?;
        self.out.set_color(&status_color(record.status))?;
        write!(self.out, "{}", record.status.as_str())?;
        self.out.reset()?;
        match record.duration {
            Some(duration) if record.status != TestStatus::Skipped => {
                writeln!(self.out, " ({})", format_elapsed(duration))?;
            }
            _ => writeln!(self.out)?,
        }

        if self.wants_console_block(record) {
            self.render_console_block(record)?;
        }
        Ok(())
    }

    /// Failures always show their console; successful tests only on
    /// request. Skipped tests never ran, so there is nothing to show.
    fn wants_console_block(&self, record: &TestRecord) -> bool {
        record.status.is_error()
            || (record.print_console && record.status != TestStatus::Skipped)
    }

    fn render_console_block(&mut self, record: &TestRecord) -> io::Result<()> {
        writeln!(self.out, ">{}<", "-".repeat(FRAME_WIDTH))?;
        writeln!(self.out, " >>>Console")?;
        for line in record.stdout.lines() {
            writeln!(self.out, " {}", line.replace('\t', "    "))?;
        }
        if !record.stderr.is_empty() {
            writeln!(self.out, " >>>Errors")?;
            for line in record.stderr.lines() {
                writeln!(self.out, " {}", line.replace('\t', "    "))?;
            }
        }
        writeln!(self.out, "<{}>", "-".repeat(FRAME_WIDTH))
    }

    /// Final summary line. The run fails iff the error count is nonzero.
    pub fn render_summary(&mut self, totals: &RunTotals, elapsed: Duration) -> io::Result<()> {
        writeln!(
            self.out,
            "Tests run: {}, Errors: {}, Skipped: {}, Total time: {}",
            totals.started(),
            totals.errors(),
            totals.skipped(),
            format_elapsed(elapsed)
        )
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
