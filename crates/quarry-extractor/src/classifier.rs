//! Single-word entity classification

use crate::lexicon::Lexicon;
use crate::scanner::{is_all_upper, is_title_case, starts_uppercase};
use quarry_domain::{EntityCategory, Token};

/// Number of neighbouring words considered on each side
pub const CONTEXT_WINDOW: usize = 3;

/// Neighbouring words around a candidate, nearest last in `preceding` and
/// nearest first in `following`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationContext {
    /// Up to [`CONTEXT_WINDOW`] word-like tokens before the candidate
    pub preceding: Vec<String>,

    /// Up to [`CONTEXT_WINDOW`] word-like tokens after the candidate
    pub following: Vec<String>,
}

impl ClassificationContext {
    /// Build the context for the token at `index`, looking only at word-like
    /// tokens on either side
    pub fn around(tokens: &[Token], index: usize) -> Self {
        let mut preceding: Vec<String> = tokens[..index.min(tokens.len())]
            .iter()
            .rev()
            .filter(|t| t.is_word_like())
            .take(CONTEXT_WINDOW)
            .map(|t| t.text.clone())
            .collect();
        preceding.reverse();

        let following = tokens
            .iter()
            .skip(index + 1)
            .filter(|t| t.is_word_like())
            .take(CONTEXT_WINDOW)
            .map(|t| t.text.clone())
            .collect();

        Self {
            preceding,
            following,
        }
    }
}

/// Assigns an [`EntityCategory`] to a word using dictionaries, context and
/// capitalization
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    lexicon: Lexicon,
}

impl Classifier {
    /// Create a classifier backed by the built-in dictionaries
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::new(),
        }
    }

    /// Dictionaries in use
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify `text`; the first matching rule wins
    pub fn classify(&self, text: &str, context: Option<&ClassificationContext>) -> EntityCategory {
        if self.lexicon.is_technology(text) {
            return EntityCategory::Technology;
        }

        if self.lexicon.has_organization_suffix(text) {
            return EntityCategory::Organization;
        }

        if self.lexicon.is_person_indicator(text) {
            return EntityCategory::Person;
        }

        if self.lexicon.is_place_indicator(text) {
            return EntityCategory::Place;
        }

        if let Some(category) = context.and_then(|ctx| self.classify_by_context(ctx)) {
            return category;
        }

        if is_all_upper(text) && text.chars().any(char::is_alphabetic) {
            return EntityCategory::Technology;
        }

        if is_title_case(text) || starts_uppercase(text) {
            return EntityCategory::Concept;
        }

        EntityCategory::Unknown
    }

    fn classify_by_context(&self, context: &ClassificationContext) -> Option<EntityCategory> {
        if let Some(prev) = context.preceding.last() {
            if self.lexicon.is_person_indicator(prev) {
                return Some(EntityCategory::Person);
            }
            if self.lexicon.is_place_indicator(prev) {
                return Some(EntityCategory::Place);
            }
        }

        if let Some(next) = context.following.first() {
            if self.lexicon.is_place_indicator(next) || self.lexicon.is_technology(next) {
                return Some(EntityCategory::Place);
            }
        }

        None
    }
}
