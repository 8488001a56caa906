//! Error types for the pipeline

use thiserror::Error;

/// Errors that abort a pipeline operation
///
/// Extraction failures are not in here: they are reported inside a failed
/// `ProcessingResult`, not as an `Err`.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The summary was rejected before any collaborator ran
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lead store error (listing, stats, clear)
    #[error("Store error: {0}")]
    Store(String),
}

/// Structured failure of the extraction step
///
/// Malformed model output is an expected outcome, so it is a value the
/// pipeline inspects rather than a fault it propagates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The response was not a JSON object
    #[error("Invalid JSON response: {detail}")]
    MalformedJson {
        /// Parser message
        detail: String,
        /// The response exactly as received
        raw: String,
    },

    /// The extraction collaborator itself failed
    #[error("Extraction failed: {detail}")]
    Upstream {
        /// Collaborator error message
        detail: String,
    },

    /// The extraction call did not finish in time
    #[error("Extraction timed out after {secs}s")]
    Timeout {
        /// Configured limit
        secs: u64,
    },
}

impl ExtractionError {
    /// The raw response text, when one was received
    pub fn raw(&self) -> Option<&str> {
        match self {
            ExtractionError::MalformedJson { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
