//! Strategy composition through the public API

use quarry_domain::EntityCategory;
use quarry_extractor::{
    EntityExtractor, ExtractorError, HybridExtractor, PatternExtractor, RemoteExtractor,
};
use quarry_ner::{MockNer, NerConfig, NerEntity};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn hybrid(backend: MockNer, fallback: bool) -> HybridExtractor {
    let remote = RemoteExtractor::from_config(backend, &NerConfig::default());
    HybridExtractor::new(Arc::new(remote), Arc::new(PatternExtractor::new()))
        .with_fallback_enabled(fallback)
}

#[tokio::test]
async fn test_offline_service_degrades_to_patterns() {
    let text = "The Platform Team deploys Docker on the Build Server";
    let cancel = CancellationToken::new();

    let entities = hybrid(MockNer::unavailable(), true)
        .extract(&cancel, text, &[])
        .await
        .unwrap();

    let docker = entities.iter().find(|e| e.text == "Docker").unwrap();
    assert_eq!(docker.category, EntityCategory::Technology);
    assert!(entities
        .iter()
        .any(|e| e.text == "Platform Team" && e.category == EntityCategory::Organization));
}

#[tokio::test]
async fn test_offline_service_without_fallback() {
    let result = hybrid(MockNer::unavailable(), false)
        .extract(&CancellationToken::new(), "Docker", &[])
        .await;
    assert_eq!(result, Err(ExtractorError::NoExtractorAvailable));
}

#[tokio::test]
async fn test_requested_categories_reach_pattern_fallback() {
    let entities = hybrid(MockNer::disabled(), true)
        .extract(
            &CancellationToken::new(),
            "Dr Watson uses Python",
            &["technology".to_string()],
        )
        .await
        .unwrap();

    assert!(!entities.is_empty());
    assert!(entities
        .iter()
        .all(|e| e.category == EntityCategory::Technology));
}

#[tokio::test]
async fn test_remote_labels_are_mapped() {
    let backend = MockNer::new(vec![
        NerEntity::new("Acme", "company", 0, 4),
        NerEntity::new("Berlin", "city", 9, 15),
    ]);
    let entities = hybrid(backend, true)
        .extract(&CancellationToken::new(), "Acme has Berlin office", &[])
        .await
        .unwrap();

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].category, EntityCategory::Organization);
    assert_eq!(entities[1].category, EntityCategory::Place);
}
