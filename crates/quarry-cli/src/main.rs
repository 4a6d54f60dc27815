//! Quarry CLI - analyze a document read from stdin.
//!
//! Configuration comes from `$QUARRY_CONFIG` (default `quarry.toml`) with
//! `QUARRY_NER_*` environment overrides. Logs go to stderr, filtered by
//! `RUST_LOG`; the JSON report goes to stdout.

use anyhow::Context;
use quarry_analyzer::{
    cluster_patterns, entity_frequency, mine_patterns_with, pattern_stats, HolePlan,
    HolePrioritizer, QuarryConfig, StreamingAnalyzer,
};
use quarry_domain::UpdateKind;
use quarry_extractor::{HybridExtractor, PatternExtractor, RemoteExtractor};
use quarry_ner::NerClient;
use std::io::Read;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "quarry.toml";
const TOP_ENTITIES: usize = 10;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config_path =
        std::env::var("QUARRY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = QuarryConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path))?;

    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("reading document from stdin")?;

    let client = NerClient::new(config.ner.clone()).context("building NER client")?;
    let remote = RemoteExtractor::from_config(client, &config.ner);
    let pattern = PatternExtractor::new().with_max_span(config.analyzer.max_multiword_span);
    let extractor = HybridExtractor::new(Arc::new(remote), Arc::new(pattern))
        .with_fallback_enabled(config.ner.fallback_to_pattern);

    let analyzer =
        StreamingAnalyzer::with_extractor_and_config(Arc::new(extractor), config.analyzer.clone());

    let mut updates = analyzer.analyze(content).await;
    while let Some(update) = updates.recv().await {
        match update.kind {
            UpdateKind::Error => warn!("{}", update.error.unwrap_or_default()),
            UpdateKind::Complete => info!("Analysis complete"),
            UpdateKind::Incremental => {}
        }
    }

    let analysis = analyzer.results().await;
    let prioritizer = HolePrioritizer::from_holes(&analysis.typed_holes, &analysis.relationships);
    let plan = HolePlan::build(&analysis.typed_holes, &analysis.relationships);
    let frequencies = entity_frequency(&analysis.entities);
    let patterns =
        mine_patterns_with(&analysis.entities, &analysis.relationships, &config.mining);
    let clusters = cluster_patterns(&patterns, config.mining.cluster_threshold);
    let stats = pattern_stats(&patterns);
    let critical_complexity = plan.critical_complexity();

    let report = serde_json::json!({
        "statistics": analysis.statistics(),
        "entities": analysis.entities,
        "top_entities": frequencies.top_n(TOP_ENTITIES),
        "category_frequencies": frequencies.category_frequencies(),
        "triples": analysis.triples,
        "dependencies": analysis.dependencies,
        "relationship_patterns": patterns,
        "pattern_clusters": clusters,
        "pattern_stats": stats,
        "recommended_holes": prioritizer.recommended(),
        "implementation_order": plan.implementation_order,
        "critical_path": plan.critical_path,
        "critical_complexity": critical_complexity,
        "depths": plan.depths,
        "cycles": plan.cycles,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
