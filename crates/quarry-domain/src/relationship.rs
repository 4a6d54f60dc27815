//! Relationships and triples
//!
//! A relationship is a surface-level candidate drawn from an adjacent
//! entity-verb-entity run; a triple is the same fact re-expressed with a
//! source span. Neither is normalized or deduplicated.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A subject-predicate-object candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Subject text
    pub subject: String,

    /// Predicate (verb) text
    pub predicate: String,

    /// Object text
    pub object: String,

    /// From the subject's start to the object's end
    pub span: Span,
}

impl Relationship {
    /// Create a new relationship
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            span,
        }
    }

    /// True if subject, predicate or object contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.subject.contains(needle)
            || self.predicate.contains(needle)
            || self.object.contains(needle)
    }
}

/// A subject-predicate-object fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    /// Subject
    pub subject: String,

    /// Predicate
    pub predicate: String,

    /// Object
    pub object: String,

    /// Where the fact was found
    pub source: Span,
}

impl From<&Relationship> for Triple {
    fn from(rel: &Relationship) -> Self {
        Self {
            subject: rel.subject.clone(),
            predicate: rel.predicate.clone(),
            object: rel.object.clone(),
            source: rel.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_from_relationship() {
        let span = Span::new(0, 4, 0).unwrap();
        let rel = Relationship::new("User", "creates", "Document", span);
        let triple = Triple::from(&rel);

        assert_eq!(triple.subject, "User");
        assert_eq!(triple.predicate, "creates");
        assert_eq!(triple.object, "Document");
        assert_eq!(triple.source, span);
    }

    #[test]
    fn test_mentions_checks_all_parts() {
        let rel = Relationship::new("ParserService", "calls", "Lexer", Span::default());
        assert!(rel.mentions("Parser"));
        assert!(rel.mentions("call"));
        assert!(rel.mentions("Lex"));
        assert!(!rel.mentions("Cache"));
    }
}
