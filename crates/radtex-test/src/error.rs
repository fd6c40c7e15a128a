//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to load a settings fixture
    #[error("failed to load settings '{path}': {message}")]
    SettingsLoad { path: String, message: String },

    /// Failed to build a synthetic volume
    #[error("failed to build phantom '{name}': {message}")]
    Phantom {
        name: &'static str,
        message: String,
    },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
