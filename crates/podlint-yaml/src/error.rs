//! Error types for YAML parsing.

use thiserror::Error;

/// Result type alias for podlint-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that prevent a document from becoming a node tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner.
    #[error("{message} at line {line} column {column}")]
    Scan {
        message: String,
        line: usize,
        column: usize,
    },

    /// The stream contained no document at all.
    #[error("no YAML document found")]
    EmptyDocument,

    /// The event stream could not be assembled into a tree.
    #[error("malformed YAML structure: {0}")]
    Malformed(String),
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        let marker = err.marker();
        Error::Scan {
            message: err.info().to_string(),
            line: marker.line(),
            column: marker.col() + 1,
        }
    }
}
