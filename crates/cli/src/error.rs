use std::path::PathBuf;

/// Forktest error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found or invalid
    #[error("config error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid command-line arguments
    #[error("argument error: {0}")]
    Argument(String),

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Corrupt or truncated class file. Fatal: aborts the discovery phase.
    #[error("class format error: {path}: {message}")]
    ClassFormat { path: PathBuf, message: String },

    /// Invalid include/exclude/filter pattern
    #[error("pattern error: {pattern}: {message}")]
    Pattern { pattern: String, message: String },

    /// Walker error.
    #[error("walk error: {message}")]
    Walk { message: String },

    /// Internal error (bug)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type using forktest Error
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes of the host invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every executed test finished without error
    Success = 0,
    /// One or more tests ended as ERROR or TIMEOUT
    TestsFailed = 1,
    /// Configuration or argument error
    ConfigError = 2,
    /// Internal error
    InternalError = 3,
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config { .. } | Error::Argument(_) | Error::Pattern { .. } => {
                ExitCode::ConfigError
            }
            Error::Io { .. } => ExitCode::InternalError,
            Error::ClassFormat { .. } => ExitCode::InternalError,
            Error::Walk { .. } => ExitCode::InternalError,
            Error::Internal(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
