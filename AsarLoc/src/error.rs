//! Error types for `AsarLoc`

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// The error type for `AsarLoc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error tied to a specific path.
    #[error("{action} {}: {source}", .path.display())]
    IoAt {
        /// What was being done ("copy", "create", ...)
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    // ==================== Input Errors ====================
    /// A required input file or directory does not exist.
    #[error("Missing {what} at {}", .path.display())]
    MissingInput {
        /// Human-readable name of the input.
        what: &'static str,
        /// The expected path.
        path: PathBuf,
    },

    /// The version argument is unusable.
    #[error("invalid version identifier: {0:?}")]
    InvalidVersion(String),

    // ==================== Archive Tool Errors ====================
    /// The archive tool could not be started.
    #[error("failed to run `{program}`: {source}")]
    ToolSpawn {
        /// The program that was spawned.
        program: String,
        /// The spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The archive tool exited unsuccessfully.
    #[error("`{command}` failed ({status})")]
    ToolFailed {
        /// The full command line.
        command: String,
        /// The exit status.
        status: ExitStatus,
    },

    /// The archive tool reported success without writing its output.
    #[error("`{command}` exited successfully but wrote no archive at {}", .path.display())]
    ToolOutputMissing {
        /// The full command line.
        command: String,
        /// Where the archive was expected.
        path: PathBuf,
    },

    // ==================== Discovery Errors ====================
    /// Preload discovery did not find exactly one file.
    #[error("Expected exactly one {file_name}, found {count}{}", format_paths(.paths))]
    Discovery {
        /// The file name searched for.
        file_name: String,
        /// How many matches were found.
        count: usize,
        /// The matched paths.
        paths: Vec<PathBuf>,
    },

    // ==================== Translation Errors ====================
    /// Translation merge failed.
    #[error("translation merge failed: {0}")]
    Merge(#[from] litmerge::Error),

    // ==================== Config Errors ====================
    /// The config file could not be parsed.
    #[error("invalid config {}: {message}", .path.display())]
    Config {
        /// The config file.
        path: PathBuf,
        /// The parse error.
        message: String,
    },
}

impl Error {
    pub(crate) fn io_at(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::IoAt {
            action,
            path,
            source,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return String::new();
    }
    let joined = paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(": {joined}")
}

/// A specialized Result type for `AsarLoc` operations.
pub type Result<T> = std::result::Result<T, Error>;
