//! Entity frequency and importance
//!
//! Importance blends a logarithmic frequency score with a category bonus:
//! `floor(3 * log10(count))`, plus 2 for people and organizations or 1 for
//! technologies and concepts, clamped to `[0, 10]`.

use quarry_domain::{Entity, EntityCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_IMPORTANCE: u8 = 10;

/// Aggregated occurrences of one entity text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFrequency {
    /// Entity text
    pub text: String,

    /// Category of the first entity seen with this text
    pub category: EntityCategory,

    /// Total occurrences
    pub count: usize,

    /// Importance score in `[0, 10]`
    pub importance: u8,
}

/// Importance of an entity seen `count` times
pub fn importance(count: usize, category: EntityCategory) -> u8 {
    let frequency = if count > 0 {
        ((count as f64).log10() * 3.0) as u8
    } else {
        0
    };

    let bonus = match category {
        EntityCategory::Person | EntityCategory::Organization => 2,
        EntityCategory::Technology | EntityCategory::Concept => 1,
        _ => 0,
    };

    frequency.saturating_add(bonus).min(MAX_IMPORTANCE)
}

/// Aggregate `entities` by exact text, most frequent first
///
/// Importance is scored from the first entity's own count, so later
/// entities with the same text raise `count` but not `importance`.
pub fn entity_frequency(entities: &[Entity]) -> FrequencyList {
    let mut list: Vec<EntityFrequency> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for entity in entities {
        match index.get(entity.text.as_str()) {
            Some(&i) => list[i].count += entity.count,
            None => {
                index.insert(entity.text.as_str(), list.len());
                list.push(EntityFrequency {
                    text: entity.text.clone(),
                    category: entity.category,
                    count: entity.count,
                    importance: importance(entity.count, entity.category),
                });
            }
        }
    }

    list.sort_by(|a, b| b.count.cmp(&a.count));
    FrequencyList(list)
}

/// A list of entity frequencies with sorting and filtering views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyList(pub Vec<EntityFrequency>);

impl FrequencyList {
    /// Entries in current order
    pub fn entries(&self) -> &[EntityFrequency] {
        &self.0
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count descending, then text ascending
    pub fn sort_by_frequency(&mut self) {
        self.0
            .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    }

    /// Category, then count descending, then text ascending
    pub fn sort_by_category(&mut self) {
        self.0.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.text.cmp(&b.text))
        });
    }

    /// Text ascending
    pub fn sort_alphabetical(&mut self) {
        self.0.sort_by(|a, b| a.text.cmp(&b.text));
    }

    /// Entries of one category
    pub fn filter_by_category(&self, category: EntityCategory) -> FrequencyList {
        FrequencyList(
            self.0
                .iter()
                .filter(|e| e.category == category)
                .cloned()
                .collect(),
        )
    }

    /// Entries seen at least `min_count` times
    pub fn filter_by_min_count(&self, min_count: usize) -> FrequencyList {
        FrequencyList(
            self.0
                .iter()
                .filter(|e| e.count >= min_count)
                .cloned()
                .collect(),
        )
    }

    /// The first `n` entries
    pub fn top_n(&self, n: usize) -> FrequencyList {
        FrequencyList(self.0.iter().take(n).cloned().collect())
    }

    /// Number of distinct entities per category
    pub fn category_counts(&self) -> BTreeMap<EntityCategory, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.0 {
            *counts.entry(entry.category).or_insert(0) += 1;
        }
        counts
    }

    /// Total occurrences per category
    pub fn category_frequencies(&self) -> BTreeMap<EntityCategory, usize> {
        let mut sums = BTreeMap::new();
        for entry in &self.0 {
            *sums.entry(entry.category).or_insert(0) += entry.count;
        }
        sums
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_domain::Span;

    fn entity(text: &str, category: EntityCategory, count: usize) -> Entity {
        Entity {
            count,
            ..Entity::new(text, category, Span::default())
        }
    }

    fn texts(list: &FrequencyList) -> Vec<&str> {
        list.entries().iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_importance_scale() {
        assert_eq!(importance(0, EntityCategory::Place), 0);
        assert_eq!(importance(1, EntityCategory::Place), 0);
        assert_eq!(importance(1, EntityCategory::Person), 2);
        assert_eq!(importance(10, EntityCategory::Technology), 4);
        assert_eq!(importance(100, EntityCategory::Organization), 8);
        assert_eq!(importance(1_000_000, EntityCategory::Person), 10);
    }

    #[test]
    fn test_aggregates_by_text() {
        let entities = vec![
            entity("Rust", EntityCategory::Technology, 2),
            entity("Alice", EntityCategory::Person, 5),
            entity("Rust", EntityCategory::Concept, 4),
        ];

        let list = entity_frequency(&entities);

        assert_eq!(texts(&list), vec!["Rust", "Alice"]);
        assert_eq!(list.entries()[0].count, 6);
        assert_eq!(list.entries()[0].category, EntityCategory::Technology);
        // scored from the first entity's count of 2
        assert_eq!(list.entries()[0].importance, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(entity_frequency(&[]).is_empty());
    }

    #[test]
    fn test_sorting_views() {
        let entities = vec![
            entity("beta", EntityCategory::Technology, 2),
            entity("alpha", EntityCategory::Technology, 2),
            entity("gamma", EntityCategory::Person, 1),
        ];
        let mut list = entity_frequency(&entities);

        list.sort_by_frequency();
        assert_eq!(texts(&list), vec!["alpha", "beta", "gamma"]);

        list.sort_by_category();
        assert_eq!(texts(&list), vec!["gamma", "alpha", "beta"]);

        list.sort_alphabetical();
        assert_eq!(texts(&list), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_filters_and_top_n() {
        let entities = vec![
            entity("HTTP", EntityCategory::Technology, 3),
            entity("JSON", EntityCategory::Technology, 1),
            entity("Bob", EntityCategory::Person, 2),
        ];
        let list = entity_frequency(&entities);

        assert_eq!(texts(&list.filter_by_category(EntityCategory::Technology)), vec!["HTTP", "JSON"]);
        assert_eq!(texts(&list.filter_by_min_count(2)), vec!["HTTP", "Bob"]);
        assert_eq!(texts(&list.top_n(1)), vec!["HTTP"]);
        assert_eq!(list.top_n(10).len(), 3);
        assert!(list.top_n(0).is_empty());
    }

    #[test]
    fn test_category_totals() {
        let entities = vec![
            entity("HTTP", EntityCategory::Technology, 3),
            entity("JSON", EntityCategory::Technology, 1),
            entity("Bob", EntityCategory::Person, 2),
        ];
        let list = entity_frequency(&entities);

        let counts = list.category_counts();
        assert_eq!(counts.get(&EntityCategory::Technology), Some(&2));
        assert_eq!(counts.get(&EntityCategory::Person), Some(&1));

        let sums = list.category_frequencies();
        assert_eq!(sums.get(&EntityCategory::Technology), Some(&4));
        assert_eq!(sums.get(&EntityCategory::Person), Some(&2));
    }
}
