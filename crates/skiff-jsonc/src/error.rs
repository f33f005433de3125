//! Error types for skiff-jsonc.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for JSONC operations.
pub type Result<T> = std::result::Result<T, JsoncError>;

/// Errors produced while reading, stripping or parsing JSONC.
#[derive(Error, Debug)]
pub enum JsoncError {
    /// The JSON text (after comment stripping) failed to parse.
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    /// A `/*` comment was opened but never closed.
    #[error("unterminated block comment at line {line}, column {column}")]
    UnterminatedComment {
        /// 1-based line of the `/*` opener.
        line: usize,
        /// 1-based column of the `/*` opener.
        column: usize,
    },

    /// A file could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}

impl JsoncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
