//! Error types for the domain layer

use thiserror::Error;

/// Errors raised while constructing or decoding domain values
#[derive(Error, Debug)]
pub enum DomainError {
    /// Span end precedes its start
    #[error("Invalid span: start {start} > end {end}")]
    InvalidSpan {
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
    },

    /// Malformed update payload
    #[error("Payload decode error: {0}")]
    PayloadDecode(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::PayloadDecode(e.to_string())
    }
}
