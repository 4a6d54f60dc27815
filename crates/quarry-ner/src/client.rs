//! HTTP client for the NER service
//!
//! # Features
//!
//! - Async HTTP communication with the service's REST API
//! - Retry logic with exponential backoff on extraction
//! - Disabled and unavailable conditions surfaced as distinct errors
//!
//! # Examples
//!
//! ```no_run
//! use quarry_ner::{NerClient, NerConfig};
//!
//! # async fn example() -> Result<(), quarry_ner::NerError> {
//! let client = NerClient::new(NerConfig::default())?;
//! let labels = vec!["person".to_string(), "organization".to_string()];
//! let entities = client.extract_entities("Alice joined Acme Corp", &labels, 0.3).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::{NerConfig, DEFAULT_SCORE_THRESHOLD};
use crate::types::{ExtractRequest, ExtractResponse, HealthResponse, ModelInfo, NerEntity};
use crate::{NerBackend, NerError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Base delay for extraction retries (doubles each attempt)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Client for the NER service
pub struct NerClient {
    config: NerConfig,
    client: reqwest::Client,
}

impl NerClient {
    /// Create a new client from configuration
    pub fn new(config: NerConfig) -> Result<Self, NerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| NerError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Client configuration
    pub fn config(&self) -> &NerConfig {
        &self.config
    }

    /// Check service health
    pub async fn health_check(&self) -> Result<HealthResponse, NerError> {
        self.get_json("health").await
    }

    /// Retrieve metadata about the loaded model
    pub async fn model_info(&self) -> Result<ModelInfo, NerError> {
        self.get_json("model_info").await
    }

    /// Extract named entities from text
    ///
    /// A zero `threshold` means the default (0.3).
    ///
    /// # Errors
    ///
    /// - `Disabled` when the client is disabled by configuration
    /// - `InvalidRequest` for empty text or an empty label list
    /// - `Unavailable` when the service cannot be reached after all retries
    /// - `ExtractionFailed` when the final attempt returned a non-200 status
    /// - `InvalidResponse` when the body cannot be decoded
    pub async fn extract_entities(
        &self,
        text: &str,
        entity_types: &[String],
        threshold: f64,
    ) -> Result<Vec<NerEntity>, NerError> {
        if !self.config.enabled {
            return Err(NerError::Disabled);
        }
        if text.is_empty() {
            return Err(NerError::InvalidRequest("empty text".to_string()));
        }
        if entity_types.is_empty() {
            return Err(NerError::InvalidRequest("no entity types specified".to_string()));
        }

        let threshold = if threshold == 0.0 {
            DEFAULT_SCORE_THRESHOLD
        } else {
            threshold
        };

        let request_body = ExtractRequest {
            text: text.to_string(),
            entity_types: entity_types.to_vec(),
            threshold,
        };
        let url = self.url("extract");

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) if response.status() == reqwest::StatusCode::OK => {
                    let body: ExtractResponse = response.json().await.map_err(|e| {
                        NerError::InvalidResponse(format!("Failed to parse response: {}", e))
                    })?;
                    debug!("NER service returned {} entities", body.entities.len());
                    return Ok(body.entities);
                }
                Ok(response) => {
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(NerError::ExtractionFailed(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
                Err(e) => {
                    last_error = Some(NerError::Unavailable(format!("Request failed: {}", e)));
                }
            }

            if attempt < self.config.max_retries {
                let delay = Duration::from_millis(RETRY_BASE_DELAY_MS << attempt);
                warn!(
                    "NER extraction attempt {}/{} failed, retrying in {:?}",
                    attempt + 1,
                    self.config.max_retries + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| NerError::Unavailable("Max retries exceeded".to_string())))
    }

    /// Check availability; `Ok` means ready to extract
    pub async fn check_availability(&self) -> Result<(), NerError> {
        self.health_check().await.map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.service_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, NerError> {
        if !self.config.enabled {
            return Err(NerError::Disabled);
        }

        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| NerError::Unavailable(format!("Request failed: {}", e)))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(NerError::ExtractionFailed(format!(
                "unexpected status: {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| NerError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl NerBackend for NerClient {
    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn extract_entities(
        &self,
        text: &str,
        entity_types: &[String],
        threshold: f64,
    ) -> Result<Vec<NerEntity>, NerError> {
        NerClient::extract_entities(self, text, entity_types, threshold).await
    }

    async fn check_availability(&self) -> Result<(), NerError> {
        NerClient::check_availability(self).await
    }
}
