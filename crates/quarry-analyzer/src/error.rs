//! Error types for analysis

use quarry_ner::NerError;
use thiserror::Error;

/// Errors that can occur while configuring analysis
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<NerError> for AnalyzerError {
    fn from(e: NerError) -> Self {
        AnalyzerError::Config(e.to_string())
    }
}

impl From<toml::de::Error> for AnalyzerError {
    fn from(e: toml::de::Error) -> Self {
        AnalyzerError::Config(format!("Failed to parse TOML: {}", e))
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(e: std::io::Error) -> Self {
        AnalyzerError::Config(format!("Failed to read config: {}", e))
    }
}
