//! Error types for `LitMerge`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `LitMerge` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Block Location Errors ====================
    /// No `const <identifier> = {` declaration was found in the text.
    #[error("unable to locate translation block `{identifier}`")]
    BlockNotFound {
        /// The identifier that was searched for.
        identifier: String,
    },

    /// The declaration was found but its braces never balance.
    #[error("translation block `{identifier}` starting on line {line} is never closed")]
    UnterminatedBlock {
        /// The identifier of the block.
        identifier: String,
        /// 1-based line of the declaration.
        line: usize,
    },

    // ==================== Literal Parsing Errors ====================
    /// The block body is not a valid object literal.
    #[error("malformed translation block at {line}:{column}: {message}")]
    MalformedBlock {
        /// 1-based line inside the block body.
        line: usize,
        /// 1-based column inside the block body.
        column: usize,
        /// What the parser expected or rejected.
        message: String,
    },

    // ==================== Serialization Errors ====================
    /// JSON serialization error (while escaping new entries).
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== Context ====================
    /// An error tied to a specific file (base or overlay).
    #[error("{}: {source}", .path.display())]
    InFile {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the path of the file being processed.
    #[must_use]
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any file context stripped.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A specialized Result type for `LitMerge` operations.
pub type Result<T> = std::result::Result<T, Error>;
