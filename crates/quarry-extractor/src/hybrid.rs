//! Primary-with-fallback extraction strategy

use crate::error::ExtractorError;
use crate::strategy::EntityExtractor;
use async_trait::async_trait;
use quarry_domain::Entity;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Tries a primary strategy and falls back to a secondary one
///
/// Any primary failure falls through to the fallback when it is enabled.
/// When neither side can serve the request the result is
/// [`ExtractorError::NoExtractorAvailable`].
pub struct HybridExtractor {
    primary: Arc<dyn EntityExtractor>,
    fallback: Arc<dyn EntityExtractor>,
    use_fallback: bool,
}

impl HybridExtractor {
    /// Combine `primary` and `fallback`; fallback starts enabled
    pub fn new(primary: Arc<dyn EntityExtractor>, fallback: Arc<dyn EntityExtractor>) -> Self {
        Self {
            primary,
            fallback,
            use_fallback: true,
        }
    }

    /// Enable or disable the fallback path
    pub fn with_fallback_enabled(mut self, enabled: bool) -> Self {
        self.use_fallback = enabled;
        self
    }

    /// Replace the primary strategy
    pub fn set_primary(&mut self, primary: Arc<dyn EntityExtractor>) {
        self.primary = primary;
    }

    /// Replace the fallback strategy
    pub fn set_fallback(&mut self, fallback: Arc<dyn EntityExtractor>) {
        self.fallback = fallback;
    }

    /// Enable or disable the fallback path
    pub fn enable_fallback(&mut self, enabled: bool) {
        self.use_fallback = enabled;
    }

    /// Whether the fallback path is enabled
    pub fn fallback_enabled(&self) -> bool {
        self.use_fallback
    }
}

#[async_trait]
impl EntityExtractor for HybridExtractor {
    async fn extract(
        &self,
        cancel: &CancellationToken,
        text: &str,
        categories: &[String],
    ) -> Result<Vec<Entity>, ExtractorError> {
        if self.primary.is_available(cancel).await {
            match self.primary.extract(cancel, text, categories).await {
                Ok(entities) => return Ok(entities),
                Err(e) => warn!("Primary extractor failed, trying fallback: {}", e),
            }
        } else {
            debug!("Primary extractor unavailable");
        }

        if self.use_fallback && self.fallback.is_available(cancel).await {
            debug!("Using fallback extractor {}", self.fallback.name().await);
            return self.fallback.extract(cancel, text, categories).await;
        }

        Err(ExtractorError::NoExtractorAvailable)
    }

    async fn name(&self) -> String {
        let cancel = CancellationToken::new();

        if self.primary.is_available(&cancel).await {
            return self.primary.name().await;
        }

        if self.use_fallback {
            return format!("{} (Fallback)", self.fallback.name().await);
        }

        "Hybrid".to_string()
    }

    async fn is_available(&self, cancel: &CancellationToken) -> bool {
        self.primary.is_available(cancel).await || self.fallback.is_available(cancel).await
    }
}
