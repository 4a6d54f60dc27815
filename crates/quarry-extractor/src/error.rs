//! Error types for entity extraction

use quarry_ner::NerError;
use thiserror::Error;

/// Errors that can occur during entity extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// The cancellation token fired before or during extraction
    #[error("Extraction cancelled")]
    Cancelled,

    /// The remote extractor is disabled by configuration
    #[error("Extractor disabled")]
    Disabled,

    /// The remote extractor could not be reached
    #[error("Extractor unavailable: {0}")]
    Unavailable(String),

    /// Neither the primary nor the fallback strategy could serve the request
    #[error("No extractor available")]
    NoExtractorAvailable,

    /// Any other remote failure
    #[error("Remote extraction error: {0}")]
    Remote(String),
}

impl ExtractorError {
    /// True for the conditions a fallback strategy should absorb
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(self, ExtractorError::Disabled | ExtractorError::Unavailable(_))
    }
}

impl From<NerError> for ExtractorError {
    fn from(e: NerError) -> Self {
        match e {
            NerError::Disabled => ExtractorError::Disabled,
            NerError::Unavailable(msg) => ExtractorError::Unavailable(msg),
            other => ExtractorError::Remote(other.to_string()),
        }
    }
}
