//! # Error Types
//!
//! Custom error types for the input layer using `thiserror`.

use thiserror::Error;

/// Main error type for the input layer
#[derive(Debug, Error)]
pub enum InputError {
    /// No device backend has been selected
    #[error("no input backend selected")]
    NoBackend,

    /// An operation required a started engine
    #[error("input backend not initialised")]
    NotInitialized,

    /// The backend failed to initialise
    #[error("backend initialisation failed: {0}")]
    BackendInit(String),

    /// An optional backend capability is not available
    #[error("backend does not support this operation")]
    Unsupported,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the input layer
pub type Result<T> = std::result::Result<T, InputError>;
