//! Error types for radtex-io

use thiserror::Error;

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum IoError {
    /// File could not be read
    #[error("I/O error reading '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON or lacks the required structure
    #[error("configuration format error: {0}")]
    ConfigFormat(String),
}

/// Result type for settings I/O
pub type IoResult<T> = Result<T, IoError>;
