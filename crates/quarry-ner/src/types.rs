//! Wire types for the NER service

use serde::{Deserialize, Serialize};

/// An entity returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NerEntity {
    /// Entity text
    pub text: String,

    /// Raw label (e.g. "person", "company")
    pub label: String,

    /// Start character index
    pub start: usize,

    /// End character index
    pub end: usize,

    /// Confidence score (0.0-1.0)
    #[serde(default)]
    pub score: f64,
}

impl NerEntity {
    /// Create an entity with a perfect score
    pub fn new(text: impl Into<String>, label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
            score: 1.0,
        }
    }
}

/// Body of `POST /extract`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// Text to analyze
    pub text: String,

    /// Labels to extract
    pub entity_types: Vec<String>,

    /// Confidence threshold
    pub threshold: f64,
}

/// Response of `POST /extract`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Extracted entities
    pub entities: Vec<NerEntity>,

    /// Number of entities found
    #[serde(default)]
    pub entity_count: usize,

    /// Length of the input text
    #[serde(default)]
    pub text_length: usize,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status ("healthy")
    pub status: String,

    /// Whether the model is loaded
    pub model_loaded: bool,

    /// Model identifier
    pub model_name: String,
}

/// Response of `GET /model_info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier
    pub model_name: String,

    /// Whether the model is loaded
    pub loaded: bool,

    /// Model architecture
    pub model_type: String,

    /// Model size (e.g. "340M")
    pub parameters: String,

    /// Model license
    pub license: String,
}
