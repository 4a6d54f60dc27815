//! The extraction strategy seam

use crate::error::ExtractorError;
use async_trait::async_trait;
use quarry_domain::Entity;
use tokio_util::sync::CancellationToken;

/// A pluggable way of pulling entities out of text
///
/// `categories` restricts the result to the named categories; an empty slice
/// means no restriction. Implementations must return
/// [`ExtractorError::Cancelled`] when `cancel` has already fired on entry.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    /// Extract entities from `text`
    async fn extract(
        &self,
        cancel: &CancellationToken,
        text: &str,
        categories: &[String],
    ) -> Result<Vec<Entity>, ExtractorError>;

    /// Human-readable strategy name
    async fn name(&self) -> String;

    /// Whether the strategy can currently serve requests
    async fn is_available(&self, cancel: &CancellationToken) -> bool;
}
