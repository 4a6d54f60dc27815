//! Relationship pattern mining
//!
//! Relationships are grouped by `(subject category, predicate, object
//! category)`. A group becomes a pattern when it occurs often enough; similar
//! predicates are then clustered by edit distance.

use crate::error::AnalyzerError;
use quarry_domain::{Entity, EntityCategory, Relationship};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confidence assigned to every mined relationship instance
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Similarity of two predicates where one contains the other
const SUBSTRING_SIMILARITY: f64 = 0.85;

/// Number of predicates reported by [`PatternStats::top_predicates`]
const TOP_PREDICATES: usize = 5;

/// Thresholds for [`mine_patterns`] and [`cluster_patterns`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningOptions {
    /// Occurrences a group needs to become a pattern
    pub min_occurrences: usize,

    /// Minimum average confidence of a pattern
    pub min_confidence: f64,

    /// Examples kept per pattern
    pub max_examples: usize,

    /// Predicate similarity needed to share a cluster
    pub cluster_threshold: f64,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self {
            min_occurrences: 2,
            min_confidence: 0.5,
            max_examples: 3,
            cluster_threshold: 0.7,
        }
    }
}

impl MiningOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.max_examples == 0 {
            return Err(AnalyzerError::Config(
                "max_examples must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(AnalyzerError::Config(format!(
                "min_confidence {} out of range [0, 1]",
                self.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.cluster_threshold) {
            return Err(AnalyzerError::Config(format!(
                "cluster_threshold {} out of range [0, 1]",
                self.cluster_threshold
            )));
        }
        Ok(())
    }
}

/// One concrete relationship behind a pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternExample {
    /// Subject text
    pub subject: String,
    /// Predicate as written
    pub predicate: String,
    /// Object text
    pub object: String,
    /// Instance confidence
    pub confidence: f64,
}

/// A recurring `(subject category, predicate, object category)` shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipPattern {
    /// Category of the subjects
    pub subject_category: EntityCategory,

    /// Normalized predicate: lowercase, spaces replaced by `_`
    pub predicate: String,

    /// Category of the objects
    pub object_category: EntityCategory,

    /// Matching relationships
    pub occurrences: usize,

    /// Mean confidence of the kept examples
    pub avg_confidence: f64,

    /// Up to `max_examples` instances in document order
    pub examples: Vec<PatternExample>,

    /// `occurrences * avg_confidence * (1 + diversity) / total`, where
    /// diversity is the share of example slots filled
    pub strength: f64,
}

/// Patterns whose predicates are alike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCluster {
    /// Shortest predicate in the cluster
    pub label: String,

    /// Member predicates, seed first
    pub predicates: Vec<String>,

    /// Patterns using any member predicate
    pub patterns: Vec<RelationshipPattern>,

    /// Mean strength of the member patterns
    pub strength: f64,
}

/// Summary over a pattern list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternStats {
    /// Number of patterns
    pub total_patterns: usize,

    /// Mean occurrences per pattern
    pub avg_occurrences: f64,

    /// Mean of the patterns' average confidences
    pub avg_confidence: f64,

    /// Predicates used by the most patterns, at most five
    pub top_predicates: Vec<String>,

    /// Number of distinct predicates
    pub unique_predicates: usize,
}

fn normalize_predicate(predicate: &str) -> String {
    predicate.trim().to_lowercase().replace(' ', "_")
}

/// Mine patterns with [`MiningOptions::default`]
pub fn mine_patterns(entities: &[Entity], relationships: &[Relationship]) -> Vec<RelationshipPattern> {
    mine_patterns_with(entities, relationships, &MiningOptions::default())
}

/// Mine patterns, strongest first
///
/// Subjects and objects take the category of the entity with the same text
/// (the last one listed wins); unmatched text is [`EntityCategory::Unknown`].
pub fn mine_patterns_with(
    entities: &[Entity],
    relationships: &[Relationship],
    options: &MiningOptions,
) -> Vec<RelationshipPattern> {
    if relationships.is_empty() {
        return Vec::new();
    }

    let categories: HashMap<&str, EntityCategory> = entities
        .iter()
        .map(|e| (e.text.as_str(), e.category))
        .collect();
    let category_of = |text: &str| categories.get(text).copied().unwrap_or_default();

    let mut patterns: Vec<RelationshipPattern> = Vec::new();
    let mut index: HashMap<(EntityCategory, String, EntityCategory), usize> = HashMap::new();

    for rel in relationships {
        let predicate = normalize_predicate(&rel.predicate);
        let key = (category_of(&rel.subject), predicate.clone(), category_of(&rel.object));

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            patterns.push(RelationshipPattern {
                subject_category: key.0,
                predicate,
                object_category: key.2,
                occurrences: 0,
                avg_confidence: DEFAULT_CONFIDENCE,
                examples: Vec::new(),
                strength: 0.0,
            });
            patterns.len() - 1
        });

        let pattern = &mut patterns[slot];
        pattern.occurrences += 1;
        if pattern.examples.len() < options.max_examples {
            pattern.examples.push(PatternExample {
                subject: rel.subject.clone(),
                predicate: rel.predicate.clone(),
                object: rel.object.clone(),
                confidence: DEFAULT_CONFIDENCE,
            });
        }
    }

    let total = relationships.len() as f64;
    let slots = options.max_examples.max(1) as f64;
    for pattern in &mut patterns {
        if !pattern.examples.is_empty() {
            let sum: f64 = pattern.examples.iter().map(|e| e.confidence).sum();
            pattern.avg_confidence = sum / pattern.examples.len() as f64;
        }
        let diversity = (pattern.examples.len() as f64 / slots).min(1.0);
        pattern.strength =
            pattern.occurrences as f64 * pattern.avg_confidence * (1.0 + diversity) / total;
    }

    patterns.retain(|p| {
        p.occurrences >= options.min_occurrences && p.avg_confidence >= options.min_confidence
    });
    patterns.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    patterns
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Similarity of two predicates in `[0, 1]`
///
/// Case-insensitive equality scores 1.0 and containment 0.85; otherwise
/// `1 - distance / longer length`.
pub fn predicate_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return SUBSTRING_SIMILARITY;
    }

    let longest = a.chars().count().max(b.chars().count());
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

/// Group patterns whose predicates reach `threshold` similarity
///
/// Each unclaimed predicate seeds a cluster and claims every later
/// unclaimed predicate similar to it. Clusters come back strongest first.
pub fn cluster_patterns(patterns: &[RelationshipPattern], threshold: f64) -> Vec<PatternCluster> {
    let mut predicates: Vec<&str> = Vec::new();
    for pattern in patterns {
        if !predicates.contains(&pattern.predicate.as_str()) {
            predicates.push(pattern.predicate.as_str());
        }
    }

    let mut claimed = vec![false; predicates.len()];
    let mut clusters = Vec::new();

    for seed in 0..predicates.len() {
        if claimed[seed] {
            continue;
        }
        claimed[seed] = true;

        let mut group = vec![predicates[seed].to_string()];
        for other in seed + 1..predicates.len() {
            if !claimed[other] && predicate_similarity(predicates[seed], predicates[other]) >= threshold {
                claimed[other] = true;
                group.push(predicates[other].to_string());
            }
        }

        let members: Vec<RelationshipPattern> = patterns
            .iter()
            .filter(|p| group.contains(&p.predicate))
            .cloned()
            .collect();
        let strength = members.iter().map(|p| p.strength).sum::<f64>() / members.len() as f64;
        let label = group
            .iter()
            .fold(&group[0], |shortest, p| if p.len() < shortest.len() { p } else { shortest })
            .clone();

        clusters.push(PatternCluster {
            label,
            predicates: group,
            patterns: members,
            strength,
        });
    }

    clusters.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    clusters
}

/// Summary statistics for `patterns`
pub fn pattern_stats(patterns: &[RelationshipPattern]) -> PatternStats {
    if patterns.is_empty() {
        return PatternStats::default();
    }

    let mut per_predicate: Vec<(&str, usize)> = Vec::new();
    for pattern in patterns {
        match per_predicate.iter_mut().find(|(p, _)| *p == pattern.predicate) {
            Some((_, count)) => *count += 1,
            None => per_predicate.push((pattern.predicate.as_str(), 1)),
        }
    }
    let unique_predicates = per_predicate.len();
    per_predicate.sort_by(|a, b| b.1.cmp(&a.1));

    let n = patterns.len() as f64;
    PatternStats {
        total_patterns: patterns.len(),
        avg_occurrences: patterns.iter().map(|p| p.occurrences as f64).sum::<f64>() / n,
        avg_confidence: patterns.iter().map(|p| p.avg_confidence).sum::<f64>() / n,
        top_predicates: per_predicate
            .into_iter()
            .take(TOP_PREDICATES)
            .map(|(p, _)| p.to_string())
            .collect(),
        unique_predicates,
    }
}
