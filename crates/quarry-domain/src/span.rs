//! Source spans for traceability

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` plus the 0-indexed line it begins on
///
/// Offsets are absolute over the whole document, not relative to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start offset in content
    pub start: usize,

    /// End offset in content (exclusive)
    pub end: usize,

    /// Line number (0-indexed)
    pub line: usize,
}

impl Span {
    /// Create a new span
    ///
    /// # Examples
    ///
    /// ```
    /// use quarry_domain::Span;
    ///
    /// let span = Span::new(4, 9, 0).unwrap();
    /// assert_eq!(span.len(), 5);
    /// assert!(Span::new(9, 4, 0).is_err());
    /// ```
    pub fn new(start: usize, end: usize, line: usize) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidSpan { start, end });
        }
        Ok(Self { start, end, line })
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice the covered text out of `content`, if the range is valid for it
    pub fn slice<'a>(&self, content: &'a str) -> Option<&'a str> {
        content.get(self.start..self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_rejects_inverted_range() {
        let err = Span::new(10, 3, 0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidSpan { start: 10, end: 3 }));
    }

    #[test]
    fn test_span_slice() {
        let span = Span::new(5, 10, 0).unwrap();
        assert_eq!(span.slice("User Alice creates"), Some("Alice"));
        assert_eq!(span.slice("tiny"), None);
    }

    #[test]
    fn test_empty_span() {
        let span = Span::new(3, 3, 1).unwrap();
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
    }
}
