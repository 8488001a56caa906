//! PII detector error types

use thiserror::Error;

/// Errors that can occur during PII detection
#[derive(Error, Debug)]
pub enum PiiError {
    /// Input exceeds the configured size limit
    #[error("Input too long: {0} chars (max: {1})")]
    InputTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
