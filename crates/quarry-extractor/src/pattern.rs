//! Rule-based extraction strategy

use crate::classifier::{ClassificationContext, Classifier};
use crate::error::ExtractorError;
use crate::multiword::detect_multiword;
use crate::scanner::scan;
use crate::strategy::EntityExtractor;
use async_trait::async_trait;
use quarry_domain::{Entity, EntityCategory};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default multi-word window size
pub const DEFAULT_MAX_SPAN: usize = 3;

/// Extracts entities with the scanner, classifier and multi-word detector
///
/// Always available. Single-word entities come first in document order,
/// followed by multi-word entities in document order.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    classifier: Classifier,
    max_span: usize,
}

impl PatternExtractor {
    /// Create an extractor with the default window size
    pub fn new() -> Self {
        Self {
            classifier: Classifier::new(),
            max_span: DEFAULT_MAX_SPAN,
        }
    }

    /// Use a different multi-word window size (clamped to `[2, 5]` on use)
    pub fn with_max_span(mut self, max_span: usize) -> Self {
        self.max_span = max_span;
        self
    }

    /// Synchronous core of [`EntityExtractor::extract`]
    pub fn extract_sync(&self, text: &str, categories: &[String]) -> Vec<Entity> {
        let tokens = scan(text);
        let mut entities: Vec<Entity> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (i, token) in tokens.iter().enumerate() {
            if !token.is_word_like() {
                continue;
            }

            let context = ClassificationContext::around(&tokens, i);
            let category = self.classifier.classify(&token.text, Some(&context));
            if !accepts(category, categories) {
                continue;
            }

            merge(
                &mut entities,
                &mut index,
                Entity::new(token.text.clone(), category, token.span),
            );
        }

        for found in detect_multiword(&tokens, self.max_span, &self.classifier) {
            if !accepts(found.category, categories) {
                continue;
            }
            merge(&mut entities, &mut index, found.into());
        }

        debug!(
            "Pattern extraction found {} entities in {} tokens",
            entities.len(),
            tokens.len()
        );

        entities
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityExtractor for PatternExtractor {
    async fn extract(
        &self,
        cancel: &CancellationToken,
        text: &str,
        categories: &[String],
    ) -> Result<Vec<Entity>, ExtractorError> {
        if cancel.is_cancelled() {
            return Err(ExtractorError::Cancelled);
        }
        Ok(self.extract_sync(text, categories))
    }

    async fn name(&self) -> String {
        "Pattern".to_string()
    }

    async fn is_available(&self, _cancel: &CancellationToken) -> bool {
        true
    }
}

/// Add `entity` or bump the count of the entity sharing its key
fn merge(entities: &mut Vec<Entity>, index: &mut HashMap<String, usize>, entity: Entity) {
    let key = entity.key();
    match index.get(&key) {
        Some(&i) => entities[i].count += entity.count,
        None => {
            index.insert(key, entities.len());
            entities.push(entity);
        }
    }
}

/// Category filter: unknown needs an explicit request, otherwise an empty
/// request accepts everything and names match case-insensitively as
/// substrings in either direction
fn accepts(category: EntityCategory, requested: &[String]) -> bool {
    if category == EntityCategory::Unknown
        && !requested.iter().any(|c| c.eq_ignore_ascii_case("unknown"))
    {
        return false;
    }

    if requested.is_empty() {
        return true;
    }

    let name = category.as_str().to_lowercase();
    requested.iter().any(|c| {
        let c = c.to_lowercase();
        c == name || c.contains(&name) || name.contains(&c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accepts() {
        assert!(accepts(EntityCategory::Technology, &[]));
        assert!(!accepts(EntityCategory::Unknown, &[]));
        assert!(accepts(EntityCategory::Unknown, &categories(&["Unknown"])));
        assert!(accepts(EntityCategory::Technology, &categories(&["tech"])));
        assert!(accepts(EntityCategory::Person, &categories(&["PERSONS"])));
        assert!(!accepts(EntityCategory::Place, &categories(&["person"])));
    }

    #[test]
    fn test_single_words_before_multiword() {
        let extractor = PatternExtractor::new();
        let entities = extractor.extract_sync("Billing Ledger", &[]);
        let texts: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Billing", "Ledger", "Billing Ledger"]);
    }

    #[test]
    fn test_duplicate_words_accumulate() {
        let extractor = PatternExtractor::new();
        let entities = extractor.extract_sync("HTTP then HTTP", &categories(&["technology"]));
        // one merged word plus the windows "HTTP then", "then HTTP" and "HTTP then HTTP"
        assert_eq!(entities.len(), 4);

        let words: Vec<_> = entities.iter().filter(|e| !e.text.contains(' ')).collect();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "HTTP");
        assert_eq!(words[0].count, 2);
        assert_eq!(words[0].span.start, 0);
    }

    #[test]
    fn test_unknown_words_dropped() {
        let extractor = PatternExtractor::new();
        let entities = extractor.extract_sync("some plain words", &[]);
        assert!(entities.is_empty());

        let entities = extractor.extract_sync("some plain words", &categories(&["unknown"]));
        assert_eq!(entities.len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_on_entry() {
        let extractor = PatternExtractor::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = extractor.extract(&cancel, "User creates Document", &[]).await;
        assert_eq!(result, Err(ExtractorError::Cancelled));
    }

    #[tokio::test]
    async fn test_always_available() {
        let extractor = PatternExtractor::new();
        assert!(extractor.is_available(&CancellationToken::new()).await);
        assert_eq!(extractor.name().await, "Pattern");
    }
}
