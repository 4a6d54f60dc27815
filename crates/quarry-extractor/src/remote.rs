//! Extraction strategy backed by the NER service

use crate::error::ExtractorError;
use crate::strategy::EntityExtractor;
use async_trait::async_trait;
use quarry_domain::{Entity, EntityCategory, Span};
use quarry_ner::{NerBackend, NerConfig, NerEntity};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const DEFAULT_THRESHOLD: f64 = 0.3;

/// Labels requested when the caller names no categories
pub const DEFAULT_ENTITY_TYPES: &[&str] = &[
    "person",
    "organization",
    "location",
    "technology",
    "concept",
    "product",
];

/// Map a raw service label onto an [`EntityCategory`]
///
/// Matching is case-insensitive and ignores surrounding whitespace.
/// Unrecognized labels become [`EntityCategory::Concept`].
pub fn map_label(label: &str) -> EntityCategory {
    match label.trim().to_lowercase().as_str() {
        "person" | "people" | "individual" => EntityCategory::Person,
        "organization" | "org" | "company" | "corporation" => EntityCategory::Organization,
        "location" | "place" | "city" | "country" | "region" => EntityCategory::Place,
        "technology" | "tech" | "software" | "hardware" | "tool" => EntityCategory::Technology,
        "concept" | "idea" | "notion" | "principle" => EntityCategory::Concept,
        "thing" | "object" | "item" | "product" => EntityCategory::Thing,
        _ => EntityCategory::Concept,
    }
}

/// Delegates extraction to a [`NerBackend`]
pub struct RemoteExtractor<B: NerBackend> {
    backend: B,
    default_types: Vec<String>,
    score_threshold: f64,
}

impl<B: NerBackend> RemoteExtractor<B> {
    /// Create an extractor using the built-in default labels
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            default_types: DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()).collect(),
            score_threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Create an extractor taking labels and threshold from `config`
    pub fn from_config(backend: B, config: &NerConfig) -> Self {
        let mut extractor = Self::new(backend);
        extractor.set_default_types(config.entity_types.all());
        extractor.set_score_threshold(config.score_threshold);
        extractor
    }

    /// Labels requested when the caller names none; an empty list keeps the
    /// current labels
    pub fn set_default_types(&mut self, types: Vec<String>) {
        if !types.is_empty() {
            self.default_types = types;
        }
    }

    /// Minimum confidence; values outside `(0, 1]` are ignored
    pub fn set_score_threshold(&mut self, threshold: f64) {
        if threshold > 0.0 && threshold <= 1.0 {
            self.score_threshold = threshold;
        }
    }

    /// Current minimum confidence
    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    /// Wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: NerBackend> EntityExtractor for RemoteExtractor<B> {
    async fn extract(
        &self,
        cancel: &CancellationToken,
        text: &str,
        categories: &[String],
    ) -> Result<Vec<Entity>, ExtractorError> {
        if cancel.is_cancelled() {
            return Err(ExtractorError::Cancelled);
        }

        if !self.backend.is_enabled() {
            return Err(ExtractorError::Disabled);
        }

        let labels = if categories.is_empty() {
            &self.default_types[..]
        } else {
            categories
        };

        let raw = tokio::select! {
            _ = cancel.cancelled() => return Err(ExtractorError::Cancelled),
            result = self.backend.extract_entities(text, labels, self.score_threshold) => result,
        };

        let raw = raw.map_err(|e| {
            warn!("Remote entity extraction failed: {}", e);
            ExtractorError::from(e)
        })?;

        let entities = convert(text, raw);
        debug!("Remote extraction returned {} unique entities", entities.len());

        Ok(entities)
    }

    async fn name(&self) -> String {
        "NER".to_string()
    }

    async fn is_available(&self, cancel: &CancellationToken) -> bool {
        if !self.backend.is_enabled() {
            return false;
        }

        tokio::select! {
            _ = cancel.cancelled() => false,
            result = self.backend.check_availability() => result.is_ok(),
        }
    }
}

/// Map labels and deduplicate by lowercase text, keeping the first span
fn convert(text: &str, raw: Vec<NerEntity>) -> Vec<Entity> {
    let mut entities: Vec<Entity> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in raw {
        let key = item.text.to_lowercase();
        if let Some(&i) = index.get(&key) {
            entities[i].count += 1;
            continue;
        }

        let span = char_span(text, item.start, item.end);
        index.insert(key, entities.len());
        entities.push(Entity::new(item.text, map_label(&item.label), span));
    }

    entities
}

/// Convert character indices from the service into a byte span
fn char_span(text: &str, start: usize, end: usize) -> Span {
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };

    let start_byte = byte_at(start);
    let end_byte = byte_at(end).max(start_byte);
    let line = text[..start_byte].matches('\n').count();

    Span {
        start: start_byte,
        end: end_byte,
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_ner::{MockNer, NerError};

    #[test]
    fn test_label_mapping() {
        assert_eq!(map_label("PERSON"), EntityCategory::Person);
        assert_eq!(map_label(" company "), EntityCategory::Organization);
        assert_eq!(map_label("city"), EntityCategory::Place);
        assert_eq!(map_label("software"), EntityCategory::Technology);
        assert_eq!(map_label("principle"), EntityCategory::Concept);
        assert_eq!(map_label("product"), EntityCategory::Thing);
        assert_eq!(map_label("galaxy"), EntityCategory::Concept);
    }

    #[test]
    fn test_char_span_handles_multibyte() {
        let text = "é\nAlice";
        let span = char_span(text, 2, 7);
        assert_eq!(span.slice(text), Some("Alice"));
        assert_eq!(span.line, 1);
    }

    #[test]
    fn test_threshold_bounds() {
        let mut extractor = RemoteExtractor::new(MockNer::default());
        extractor.set_score_threshold(0.0);
        assert_eq!(extractor.score_threshold(), 0.3);
        extractor.set_score_threshold(1.5);
        assert_eq!(extractor.score_threshold(), 0.3);
        extractor.set_score_threshold(0.75);
        assert_eq!(extractor.score_threshold(), 0.75);
    }

    #[tokio::test]
    async fn test_dedup_keeps_first_span() {
        let text = "Alice met alice";
        let backend = MockNer::new(vec![
            NerEntity::new("Alice", "person", 0, 5),
            NerEntity::new("alice", "person", 10, 15),
        ]);
        let extractor = RemoteExtractor::new(backend);

        let entities = extractor
            .extract(&CancellationToken::new(), text, &[])
            .await
            .unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Alice");
        assert_eq!(entities[0].count, 2);
        assert_eq!(entities[0].span.start, 0);
        assert_eq!(entities[0].category, EntityCategory::Person);
    }

    #[tokio::test]
    async fn test_disabled_and_unavailable_are_distinct() {
        let cancel = CancellationToken::new();

        let disabled = RemoteExtractor::new(MockNer::disabled());
        assert_eq!(
            disabled.extract(&cancel, "x", &[]).await,
            Err(ExtractorError::Disabled)
        );
        assert_eq!(disabled.backend().call_count(), 0);
        assert!(!disabled.is_available(&cancel).await);

        let offline = RemoteExtractor::new(MockNer::unavailable());
        assert!(matches!(
            offline.extract(&cancel, "x", &[]).await,
            Err(ExtractorError::Unavailable(_))
        ));
        assert!(!offline.is_available(&cancel).await);
    }

    #[tokio::test]
    async fn test_other_failures_are_remote_errors() {
        let backend =
            MockNer::default().with_failure(NerError::ExtractionFailed("boom".to_string()));
        let extractor = RemoteExtractor::new(backend);
        let result = extractor.extract(&CancellationToken::new(), "x", &[]).await;
        assert!(matches!(result, Err(ExtractorError::Remote(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_call() {
        let backend = MockNer::default();
        let extractor = RemoteExtractor::new(backend);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = extractor.extract(&cancel, "x", &[]).await;
        assert_eq!(result, Err(ExtractorError::Cancelled));
        assert_eq!(extractor.backend().call_count(), 0);
    }
}
