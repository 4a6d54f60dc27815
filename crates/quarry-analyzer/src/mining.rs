//! Relationship and triple mining over scanned tokens

use quarry_domain::{Relationship, Span, Token, TokenKind, Triple};

/// Find `[entity-like, verb, entity-like]` runs among the non-space,
/// non-punctuation tokens
///
/// Overlapping windows are each accepted.
pub fn extract_relationships(tokens: &[Token]) -> Vec<Relationship> {
    let content: Vec<&Token> = tokens
        .iter()
        .filter(|t| {
            !matches!(
                t.kind,
                TokenKind::Whitespace | TokenKind::Newline | TokenKind::Punctuation
            )
        })
        .collect();

    content
        .windows(3)
        .filter_map(|w| {
            let (subject, verb, object) = (w[0], w[1], w[2]);
            if !subject.is_word_like() || verb.kind != TokenKind::Verb || !object.is_word_like() {
                return None;
            }

            Some(Relationship::new(
                subject.text.clone(),
                verb.text.clone(),
                object.text.clone(),
                Span {
                    start: subject.span.start,
                    end: object.span.end,
                    line: subject.span.line,
                },
            ))
        })
        .collect()
}

/// One triple per relationship, in the same order
pub fn generate_triples(relationships: &[Relationship]) -> Vec<Triple> {
    relationships.iter().map(Triple::from).collect()
}
