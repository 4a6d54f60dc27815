//! End-to-end tests for the streaming pipeline

use async_trait::async_trait;
use quarry_analyzer::{AnalyzerConfig, HolePlan, HolePrioritizer, RunState, StreamingAnalyzer};
use quarry_domain::{AnalysisUpdate, Entity, UpdateKind, UpdatePayload};
use quarry_extractor::{
    EntityExtractor, ExtractorError, HybridExtractor, PatternExtractor, RemoteExtractor,
};
use quarry_ner::MockNer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

async fn drain(mut rx: mpsc::Receiver<AnalysisUpdate>) -> Vec<AnalysisUpdate> {
    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }
    updates
}

/// Always fails with a non-fallback error
struct BrokenExtractor;

#[async_trait]
impl EntityExtractor for BrokenExtractor {
    async fn extract(
        &self,
        _cancel: &CancellationToken,
        _text: &str,
        _categories: &[String],
    ) -> Result<Vec<Entity>, ExtractorError> {
        Err(ExtractorError::NoExtractorAvailable)
    }

    async fn name(&self) -> String {
        "Broken".to_string()
    }

    async fn is_available(&self, _cancel: &CancellationToken) -> bool {
        false
    }
}

#[tokio::test]
async fn test_user_creates_document() {
    let analyzer = StreamingAnalyzer::new();
    drain(analyzer.analyze("User creates Document").await).await;

    let analysis = analyzer.results().await;
    assert!(analysis.relationships.iter().any(|r| {
        r.subject == "User" && r.predicate == "creates" && r.object == "Document"
    }));
    assert_eq!(analysis.triples.len(), 1);
    assert_eq!(analysis.triples[0].subject, "User");
    assert_eq!(analysis.token_count, 5);

    let stats = analysis.statistics();
    assert_eq!(stats.total_relationships, 1);
    assert_eq!(stats.total_triples, 1);
}

#[tokio::test]
async fn test_progress_is_monotonic_and_ends_at_one() {
    let analyzer = StreamingAnalyzer::new();
    let text = "Client uses Server\nimport \"net/http\"\n??Router requires ??Codec !!pure";
    let updates = drain(analyzer.analyze(text).await).await;

    let progress: Vec<f32> = updates.iter().map(|u| u.progress).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last().copied(), Some(1.0));
    assert_eq!(
        updates.iter().filter(|u| u.kind == UpdateKind::Complete).count(),
        1
    );
}

#[tokio::test]
async fn test_superseded_run_never_completes() {
    let analyzer = StreamingAnalyzer::new();
    let first = analyzer.analyze("User creates Document").await;
    let second = analyzer.analyze("Server runs Database").await;

    let first_updates = drain(first).await;
    assert!(first_updates.iter().all(|u| u.progress < 1.0));

    let second_updates = drain(second).await;
    assert_eq!(second_updates.last().map(|u| u.progress), Some(1.0));

    let analysis = analyzer.results().await;
    assert_eq!(analysis.content, "Server runs Database");
    assert_eq!(analyzer.state().await, RunState::Completed);
}

#[tokio::test]
async fn test_items_follow_document_order() {
    let config = AnalyzerConfig {
        update_capacity: 64,
        ..AnalyzerConfig::default()
    };
    let analyzer = StreamingAnalyzer::with_config(config);
    let updates = drain(analyzer.analyze("??Alpha then ??Beta then ??Gamma").await).await;

    let holes: Vec<String> = updates
        .iter()
        .filter_map(|u| match &u.payload {
            Some(UpdatePayload::TypedHole(h)) => Some(h.type_name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(holes, vec!["Alpha", "Beta", "Gamma"]);
}

#[tokio::test]
async fn test_failing_extractor_downgrades_to_empty_entities() {
    let analyzer = StreamingAnalyzer::with_extractor(Arc::new(BrokenExtractor));
    let updates = drain(analyzer.analyze("User creates Document").await).await;

    assert!(updates.iter().any(|u| u.kind == UpdateKind::Error));
    assert_eq!(updates.last().map(|u| u.kind), Some(UpdateKind::Complete));

    let analysis = analyzer.results().await;
    assert!(analysis.entities.is_empty());
    assert_eq!(analysis.triples.len(), 1);
}

#[tokio::test]
async fn test_hybrid_extractor_in_pipeline() {
    let remote = RemoteExtractor::new(MockNer::unavailable());
    let hybrid = HybridExtractor::new(Arc::new(remote), Arc::new(PatternExtractor::new()));
    let analyzer = StreamingAnalyzer::with_extractor(Arc::new(hybrid));

    drain(analyzer.analyze("The API speaks JSON").await).await;

    let analysis = analyzer.results().await;
    assert!(analysis.entities.iter().any(|e| e.text == "JSON"));
}

#[tokio::test]
async fn test_holes_from_analysis() {
    let analyzer = StreamingAnalyzer::new();
    let text = "??Service requires ??Store\n??Store implements ??Codec\n!!thread-safe";
    drain(analyzer.analyze(text).await).await;

    let analysis = analyzer.results().await;
    assert_eq!(analysis.typed_holes.len(), 5);

    let plan = HolePlan::build(&analysis.typed_holes, &analysis.relationships);
    assert_eq!(plan.holes.len(), 5);
    assert_eq!(plan.implementation_order.len(), 5);
}

#[tokio::test]
async fn test_hole_plan_from_named_relationships() {
    let analyzer = StreamingAnalyzer::new();
    let text = "??Store ??Codec ??Handler !!pure\nStore implements Codec\nHandler uses Store";
    drain(analyzer.analyze(text).await).await;

    let analysis = analyzer.results().await;
    let predicates: Vec<&str> = analysis
        .relationships
        .iter()
        .map(|r| r.predicate.as_str())
        .collect();
    assert_eq!(predicates, vec!["implements", "uses"]);

    let prioritizer = HolePrioritizer::from_holes(&analysis.typed_holes, &analysis.relationships);
    let priorities: Vec<(&str, u8)> = prioritizer
        .holes()
        .iter()
        .map(|h| (h.id.as_str(), h.priority))
        .collect();
    // the constraint hole's empty type name appears in both relationships
    assert_eq!(
        priorities,
        vec![("Store_0", 7), ("Codec_1", 6), ("Handler_2", 6), ("_3", 9)]
    );
    assert_eq!(prioritizer.holes()[0].related_holes, vec!["Codec_1", "_3", "Handler_2"]);
    assert_eq!(prioritizer.holes()[2].related_holes, vec!["Store_0", "_3"]);

    let plan = HolePlan::build(&analysis.typed_holes, &analysis.relationships);
    assert_eq!(plan.implementation_order, vec!["Codec_1", "Handler_2", "_3", "Store_0"]);
    assert_eq!(
        plan.hole("Store_0").map(|h| h.dependencies.clone()),
        Some(vec!["Codec_1".to_string(), "_3".to_string()])
    );
    assert_eq!(plan.critical_path, vec!["Codec_1", "_3", "Store_0"]);
    assert_eq!(plan.depths.get("Store_0"), Some(&2));
    assert!(!plan.has_cycles());
}
