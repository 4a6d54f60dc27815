//! Multi-word entity detection
//!
//! Slides windows of two or more consecutive word-like tokens over the token
//! stream. A window becomes a candidate when any of its words starts with an
//! uppercase letter; candidates are deduplicated by lowercase text.

use crate::classifier::Classifier;
use crate::scanner::starts_uppercase;
use quarry_domain::{Entity, EntityCategory, Span, Token};
use std::collections::HashMap;

/// Smallest accepted window size
pub const MIN_SPAN: usize = 2;

/// Largest accepted window size
pub const MAX_SPAN: usize = 5;

/// A deduplicated multi-word candidate
#[derive(Debug, Clone, PartialEq)]
pub struct MultiWordEntity {
    /// Words in the window
    pub words: Vec<String>,

    /// Words joined with single spaces
    pub text: String,

    /// Assigned category
    pub category: EntityCategory,

    /// From the start of the first word to the end of the last, first occurrence
    pub span: Span,

    /// Number of occurrences
    pub count: usize,
}

impl From<MultiWordEntity> for Entity {
    fn from(m: MultiWordEntity) -> Self {
        Entity {
            text: m.text,
            category: m.category,
            span: m.span,
            count: m.count,
        }
    }
}

/// Detect multi-word entities; `max_span` is clamped to `[2, 5]`
///
/// Results are in order of first appearance, shorter windows first at each
/// starting position.
pub fn detect_multiword(
    tokens: &[Token],
    max_span: usize,
    classifier: &Classifier,
) -> Vec<MultiWordEntity> {
    let max_span = max_span.clamp(MIN_SPAN, MAX_SPAN);
    let words: Vec<&Token> = tokens.iter().filter(|t| t.is_word_like()).collect();

    let mut found: Vec<MultiWordEntity> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for start in 0..words.len() {
        for size in MIN_SPAN..=max_span {
            let Some(window) = words.get(start..start + size) else {
                break;
            };

            if !window.iter().any(|t| starts_uppercase(&t.text)) {
                continue;
            }

            let texts: Vec<String> = window.iter().map(|t| t.text.clone()).collect();
            let text = texts.join(" ");
            let key = text.to_lowercase();

            if let Some(&existing) = index.get(&key) {
                found[existing].count += 1;
                continue;
            }

            let first = window[0].span;
            let last = window[window.len() - 1].span;
            let category = classify_window(&texts, classifier);

            index.insert(key, found.len());
            found.push(MultiWordEntity {
                words: texts,
                text,
                category,
                span: Span {
                    start: first.start,
                    end: last.end,
                    line: first.line,
                },
                count: 1,
            });
        }
    }

    found
}

fn classify_window(words: &[String], classifier: &Classifier) -> EntityCategory {
    let lexicon = classifier.lexicon();

    if words.iter().any(|w| lexicon.is_technology(w)) {
        return EntityCategory::Technology;
    }

    if let Some(last) = words.last() {
        if lexicon.is_person_indicator(last) {
            return EntityCategory::Person;
        }
        if lexicon.is_place_indicator(last) {
            return EntityCategory::Place;
        }
        if lexicon.has_organization_suffix(last) {
            return EntityCategory::Organization;
        }
    }

    if words.first().is_some_and(|w| lexicon.is_person_indicator(w)) {
        return EntityCategory::Person;
    }

    EntityCategory::Concept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn detect(text: &str, max_span: usize) -> Vec<MultiWordEntity> {
        detect_multiword(&scan(text), max_span, &Classifier::new())
    }

    #[test]
    fn test_repeated_phrase_is_counted_once() {
        let found = detect("User Account and User Account", 3);
        let matches: Vec<_> = found.iter().filter(|m| m.text == "User Account").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].count, 2);
        assert_eq!(matches[0].span.start, 0);
        assert_eq!(matches[0].span.end, 12);
    }

    #[test]
    fn test_lowercase_windows_are_skipped() {
        let found = detect("plain lower words only", 3);
        assert!(found.is_empty());
    }

    #[test]
    fn test_span_is_clamped() {
        let text = "Alpha Beta Gamma Delta Epsilon Zeta Eta";
        let small = detect(text, 0);
        assert!(small.iter().all(|m| m.words.len() == 2));

        let large = detect(text, 50);
        assert!(large.iter().all(|m| m.words.len() <= MAX_SPAN));
        assert!(large.iter().any(|m| m.words.len() == MAX_SPAN));
    }

    #[test]
    fn test_punctuation_does_not_break_windows() {
        // word-like filtering drops punctuation before windowing
        let found = detect("Acme, Widgets", 2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Acme Widgets");
    }

    #[test]
    fn test_window_classification() {
        let found = detect("Cloud API Gateway", 2);
        assert_eq!(found[0].text, "Cloud API");
        assert_eq!(found[0].category, EntityCategory::Technology);

        let found = detect("Senior Engineer", 2);
        assert_eq!(found[0].category, EntityCategory::Person);

        let found = detect("Main Street", 2);
        assert_eq!(found[0].category, EntityCategory::Place);

        let found = detect("Platform Team", 2);
        assert_eq!(found[0].category, EntityCategory::Organization);

        let found = detect("Dr Watson", 2);
        assert_eq!(found[0].category, EntityCategory::Person);

        let found = detect("Billing Ledger", 2);
        assert_eq!(found[0].category, EntityCategory::Concept);
    }
}
