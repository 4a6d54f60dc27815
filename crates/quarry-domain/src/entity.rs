//! Entities - classified spans of text

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of an entity
///
/// Ordering follows declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum EntityCategory {
    /// No rule matched
    #[default]
    Unknown,
    /// A person, title or role
    Person,
    /// A geographic or location-like noun
    Place,
    /// A generic thing or product
    Thing,
    /// An abstract concept or unclassified proper noun
    Concept,
    /// A company, team or institution
    Organization,
    /// A protocol, format, language, framework or acronym
    Technology,
}

impl EntityCategory {
    /// All categories, in declaration order
    pub const ALL: [EntityCategory; 7] = [
        EntityCategory::Unknown,
        EntityCategory::Person,
        EntityCategory::Place,
        EntityCategory::Thing,
        EntityCategory::Concept,
        EntityCategory::Organization,
        EntityCategory::Technology,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Unknown => "Unknown",
            EntityCategory::Person => "Person",
            EntityCategory::Place => "Place",
            EntityCategory::Thing => "Thing",
            EntityCategory::Concept => "Concept",
            EntityCategory::Organization => "Organization",
            EntityCategory::Technology => "Technology",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected entity
///
/// Identity for deduplication is the lowercase text; `count` accumulates
/// across duplicate mentions while `span` keeps the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity text as first seen
    pub text: String,

    /// Assigned category
    pub category: EntityCategory,

    /// Location of the first occurrence
    pub span: Span,

    /// Number of occurrences
    pub count: usize,
}

impl Entity {
    /// Create a single-occurrence entity
    pub fn new(text: impl Into<String>, category: EntityCategory, span: Span) -> Self {
        Self {
            text: text.into(),
            category,
            span,
            count: 1,
        }
    }

    /// Deduplication key
    pub fn key(&self) -> String {
        self.text.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(EntityCategory::Technology.to_string(), "Technology");
        assert_eq!(EntityCategory::default(), EntityCategory::Unknown);
    }

    #[test]
    fn test_entity_key_is_lowercase() {
        let entity = Entity::new("PostgreSQL", EntityCategory::Technology, Span::default());
        assert_eq!(entity.key(), "postgresql");
        assert_eq!(entity.count, 1);
    }
}
