//! Quarry Analyzer
//!
//! The streaming analysis pipeline plus the typed-hole engine.
//!
//! # Architecture
//!
//! ```text
//! StreamingAnalyzer::analyze(text)
//!     │  (background task, bounded update stream)
//!     ├─ scan → EntityExtractor → relationships → typed holes
//!     └─ dependencies → triples → complete
//!
//! HolePrioritizer / HolePlan (on demand)
//!     └─ typed holes + relationships → enhanced holes, ordering, build plan,
//!        depths, critical path
//!
//! entity_frequency / mine_patterns (on demand)
//!     └─ entities + relationships → importance, patterns, clusters
//! ```
//!
//! # Example Usage
//!
//! ```
//! use quarry_analyzer::{HolePrioritizer, StreamingAnalyzer};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let analyzer = StreamingAnalyzer::new();
//! let mut updates = analyzer.analyze("??Cache stores data. Handler uses Cache !!thread-safe").await;
//! while updates.recv().await.is_some() {}
//!
//! let analysis = analyzer.results().await;
//! let prioritizer = HolePrioritizer::from_holes(&analysis.typed_holes, &analysis.relationships);
//! assert_eq!(prioritizer.recommended().len(), 2);
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod frequency;
mod holes;
mod mining;
mod patterns;
mod planning;

pub use analyzer::{RunState, StreamingAnalyzer};
pub use config::{AnalyzerConfig, QuarryConfig, DEFAULT_MAX_MULTIWORD_SPAN, DEFAULT_UPDATE_CAPACITY};
pub use error::AnalyzerError;
pub use frequency::{entity_frequency, importance, EntityFrequency, FrequencyList};
pub use holes::{
    complexity, enhance_holes, find_related, parse_constraint, parse_constraints, priority,
    suggest_implementation, HolePrioritizer,
};
pub use mining::{extract_relationships, generate_triples};
pub use patterns::{
    cluster_patterns, mine_patterns, mine_patterns_with, pattern_stats, predicate_similarity,
    MiningOptions, PatternCluster, PatternExample, PatternStats, RelationshipPattern,
    DEFAULT_CONFIDENCE,
};
pub use planning::{DependencyKind, HoleDependency, HolePlan};
