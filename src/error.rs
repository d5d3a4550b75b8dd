//! Error types for sanitize operations

use std::fmt;

/// Errors that can occur while sanitizing markup
///
/// Unknown tags and attributes without a matching rule are policy decisions,
/// not errors; they never surface here.
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    /// The token source reported a failure other than end of input
    #[error("Tokenize error: {0}")]
    Tokenize(String),
    /// Character encoding error in byte input
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// The output sink refused further bytes
    #[error("Write error: output sink rejected data")]
    Write(#[from] fmt::Error),
    /// Input exceeds the configured size cap
    #[error("Input of {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Policy or configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),
}

impl SanitizeError {
    /// Get numeric error code for FFI
    pub fn code(&self) -> u32 {
        match self {
            SanitizeError::Tokenize(_) => 1,
            SanitizeError::Encoding(_) => 2,
            SanitizeError::Write(_) => 3,
            SanitizeError::InputTooLarge { .. } => 4,
            SanitizeError::InvalidInput(_) => 5,
            SanitizeError::Config(_) => 6,
        }
    }
}
