//! Quarry NER Service Layer
//!
//! Client side of the remote named-entity-recognition service.
//!
//! # Architecture
//!
//! The service is an opaque HTTP/JSON collaborator exposing `/health`,
//! `/model_info` and `/extract`. This crate provides:
//!
//! - `NerClient`: reqwest-based client with retries and backoff
//! - `NerConfig`: service settings loaded from TOML with env overrides
//! - `NerBackend`: async trait the extraction layer is written against
//! - `MockNer`: deterministic backend for testing
//!
//! # Examples
//!
//! ```
//! use quarry_ner::{MockNer, NerBackend, NerEntity};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let backend = MockNer::new(vec![NerEntity::new("Alice", "person", 0, 5)]);
//! let labels = vec!["person".to_string()];
//! let entities = backend.extract_entities("Alice", &labels, 0.3).await.unwrap();
//! assert_eq!(entities[0].label, "person");
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod types;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub use client::NerClient;
pub use config::{EntityTypesConfig, NerConfig};
pub use types::{ExtractRequest, ExtractResponse, HealthResponse, ModelInfo, NerEntity};

/// Errors that can occur talking to the NER service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NerError {
    /// Service disabled in configuration
    #[error("NER service disabled")]
    Disabled,

    /// Service not reachable
    #[error("NER service unavailable: {0}")]
    Unavailable(String),

    /// Malformed request (empty text, no labels)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Service answered with a failure status
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NerError {
    /// True if the service is disabled by configuration
    pub fn is_disabled(&self) -> bool {
        matches!(self, NerError::Disabled)
    }

    /// True if the service could not be reached
    pub fn is_unavailable(&self) -> bool {
        matches!(self, NerError::Unavailable(_))
    }
}

/// An entity-recognition backend
///
/// Implemented by [`NerClient`] for the real service and by [`MockNer`]
/// for tests.
#[async_trait]
pub trait NerBackend: Send + Sync {
    /// Whether the backend is enabled by configuration
    fn is_enabled(&self) -> bool;

    /// Extract entities of the given labels scoring at least `threshold`
    async fn extract_entities(
        &self,
        text: &str,
        entity_types: &[String],
        threshold: f64,
    ) -> Result<Vec<NerEntity>, NerError>;

    /// Probe the backend; `Ok` means ready to extract
    async fn check_availability(&self) -> Result<(), NerError>;
}

/// Mock NER backend for deterministic testing
///
/// Returns pre-configured entities without making any network calls.
#[derive(Debug, Clone)]
pub struct MockNer {
    entities: Vec<NerEntity>,
    enabled: bool,
    available: bool,
    failure: Option<NerError>,
    call_count: Arc<AtomicUsize>,
}

impl MockNer {
    /// Create an enabled, available mock returning `entities`
    pub fn new(entities: Vec<NerEntity>) -> Self {
        Self {
            entities,
            enabled: true,
            available: true,
            failure: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that reports itself disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Vec::new())
        }
    }

    /// Mock whose health probe fails
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    /// Make every extraction fail with `error`
    pub fn with_failure(mut self, error: NerError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of extraction calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockNer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl NerBackend for MockNer {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn extract_entities(
        &self,
        _text: &str,
        _entity_types: &[String],
        _threshold: f64,
    ) -> Result<Vec<NerEntity>, NerError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(NerError::Disabled);
        }
        if !self.available {
            return Err(NerError::Unavailable("mock offline".to_string()));
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(self.entities.clone())
    }

    async fn check_availability(&self) -> Result<(), NerError> {
        if !self.enabled {
            return Err(NerError::Disabled);
        }
        if !self.available {
            return Err(NerError::Unavailable("mock offline".to_string()));
        }
        Ok(())
    }
}
