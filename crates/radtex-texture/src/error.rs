//! Error types for radtex-texture

use radtex_filter::FilterError;
use radtex_io::IoError;
use thiserror::Error;

/// Errors that can occur while generating texture maps
#[derive(Debug, Error)]
pub enum TextureError {
    /// Settings document lacks required structure
    #[error("configuration format error: {0}")]
    ConfigFormat(String),

    /// Required key absent from a filter parameter block
    #[error("filter '{filter}': missing required parameter '{key}'")]
    MissingParameter { filter: String, key: String },

    /// Parameter present with an unusable value
    #[error("filter '{filter}': invalid parameter '{key}': {reason}")]
    Parameter {
        filter: String,
        key: String,
        reason: String,
    },

    /// Filter type not in the dispatch table
    #[error("unknown filter type '{0}'")]
    UnknownFilter(String),

    /// Inconsistent array, mask or grid geometry
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Scan store lookup or registration failure
    #[error("scan store error: {0}")]
    Store(String),

    /// Preprocessing failure
    #[error("preprocessing error: {0}")]
    Preprocess(String),

    /// Settings file could not be read
    #[error("settings error: {0}")]
    Io(#[source] IoError),

    /// Kernel failure
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] radtex_core::Error),
}

impl From<IoError> for TextureError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::ConfigFormat(message) => TextureError::ConfigFormat(message),
            other => TextureError::Io(other),
        }
    }
}

/// Result type for texture-map operations
pub type TextureResult<T> = Result<T, TextureError>;
