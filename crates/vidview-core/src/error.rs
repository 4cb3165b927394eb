//! Error types for vidview core

use thiserror::Error;

/// Result type alias for component operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced synchronously to the host.
///
/// Playback failures are never returned through this type; they travel as
/// `error` events. License failures are reported back to the native layer.
#[derive(Error, Debug)]
pub enum Error {
    // Host contract errors
    #[error("Specified time is not a number")]
    InvalidSeekTime,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Native layer errors
    #[error("Native surface error: {0}")]
    Native(String),

    // Encoding errors
    #[error("Invalid license payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a native surface error
    pub fn native(msg: impl Into<String>) -> Self {
        Error::Native(msg.into())
    }

    /// Returns true if the error indicates host misuse rather than an
    /// environment condition
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::InvalidSeekTime | Error::InvalidConfig(_))
    }

    /// Returns a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidSeekTime => "INVALID_SEEK_TIME",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Native(_) => "NATIVE",
            Error::InvalidPayload(_) => "INVALID_PAYLOAD",
            Error::Serialization(_) => "SERIALIZATION",
        }
    }
}
