pub mod classfile;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod exec;
pub mod lifecycle;
pub mod pattern;
pub mod protocol;
pub mod report;
pub mod runner;
pub mod scan;
pub mod schedule;
pub mod walker;

pub use cli::Cli;
pub use config::{FileConfig, RunConfig};
pub use descriptor::TestDescriptor;
pub use error::{Error, ExitCode, Result};
pub use exec::{ExecOutcome, Executor, TestStatus};
pub use report::{ClassReport, Renderer, RunTotals, TestRecord};
pub use scan::{ScannedClass, Scanner};

#[cfg(test)]
pub mod test_utils;
