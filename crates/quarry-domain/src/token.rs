//! Lexical tokens produced by the scanner

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Unclassified
    Unknown,
    /// Lowercase word
    Word,
    /// Digit run (may contain `.`)
    Number,
    /// Single punctuation character
    Punctuation,
    /// Run of non-newline whitespace
    Whitespace,
    /// Line break between two lines
    Newline,
    /// Word starting with a capital that is neither title case nor all caps
    CapitalizedWord,
    /// All caps (length > 1) or title case word
    ProperNoun,
    /// Word found in the common-verb dictionary
    Verb,
    /// `??Name` marker
    TypeHole,
    /// `!!constraint` marker
    ConstraintHole,
}

impl TokenKind {
    /// True for tokens that participate in entity detection
    ///
    /// Word, capitalized word and proper noun. Verbs, numbers, punctuation and
    /// hole markers are excluded.
    pub fn is_word_like(&self) -> bool {
        matches!(
            self,
            TokenKind::Word | TokenKind::CapitalizedWord | TokenKind::ProperNoun
        )
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Unknown => "Unknown",
            TokenKind::Word => "Word",
            TokenKind::Number => "Number",
            TokenKind::Punctuation => "Punctuation",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Newline => "Newline",
            TokenKind::CapitalizedWord => "CapitalizedWord",
            TokenKind::ProperNoun => "ProperNoun",
            TokenKind::Verb => "Verb",
            TokenKind::TypeHole => "TypeHole",
            TokenKind::ConstraintHole => "ConstraintHole",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexical token
///
/// Tokens are produced once per scan, never mutated, and ordered by
/// document position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,

    /// Raw text as it appears in the content
    pub text: String,

    /// Normalized value: lowercase for words, marker body for holes, empty otherwise
    pub value: String,

    /// Location in content
    pub span: Span,
}

impl Token {
    /// Create a token with an empty normalized value
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            value: String::new(),
            span,
        }
    }

    /// Attach a normalized value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Shorthand for `self.kind.is_word_like()`
    pub fn is_word_like(&self) -> bool {
        self.kind.is_word_like()
    }
}
