//! Lexical scanning
//!
//! Splits text into [`Token`]s line by line. Every byte of the input is
//! covered by exactly one token: whitespace, punctuation and newlines are
//! kept so spans tile the input without gaps.
//!
//! Recognized forms, tried in this order at each position:
//!
//! | Form                               | Kind                      |
//! |------------------------------------|---------------------------|
//! | run of non-newline whitespace      | `Whitespace`              |
//! | `??` followed by alphanumerics     | `TypeHole`                |
//! | `!!` followed by non-whitespace    | `ConstraintHole`          |
//! | ASCII digit, then digits or `.`    | `Number`                  |
//! | letter, then letters `-` or `_`    | per [`classify_word`]     |
//! | any other single character         | `Punctuation`             |

use quarry_domain::{Span, Token, TokenKind, TypedHole};

const TYPE_HOLE_MARKER: &str = "??";
const CONSTRAINT_HOLE_MARKER: &str = "!!";

/// Common verbs recognized case-insensitively
const COMMON_VERBS: &[&str] = &[
    "is", "are", "was", "were", "has", "have", "had", "does", "do", "did", "can", "could",
    "will", "would", "should", "may", "might", "must", "gets", "get", "got", "makes", "make",
    "made", "takes", "take", "took", "gives", "give", "gave", "uses", "use", "used", "creates",
    "create", "created", "provides", "provide", "provided", "implements", "implement",
    "implemented", "returns", "return", "returned", "calls", "call", "called", "runs", "run",
    "ran", "executes", "execute", "executed", "validates", "validate", "validated",
    "processes", "process", "processed", "handles", "handle", "handled", "manages", "manage",
    "managed",
];

/// Scan `content` into an ordered token sequence
pub fn scan(content: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let lines: Vec<&str> = content.split('\n').collect();
    let last = lines.len().saturating_sub(1);
    let mut offset = 0;

    for (line_no, line) in lines.iter().enumerate() {
        scan_line(line, offset, line_no, &mut tokens);

        if line_no < last {
            let start = offset + line.len();
            tokens.push(Token::new(
                TokenKind::Newline,
                "\n",
                Span {
                    start,
                    end: start + 1,
                    line: line_no,
                },
            ));
        }

        offset += line.len() + 1;
    }

    tokens
}

fn scan_line(line: &str, offset: usize, line_no: usize, tokens: &mut Vec<Token>) {
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        let (kind, len, value) = if c.is_whitespace() {
            (TokenKind::Whitespace, run_len(rest, char::is_whitespace), None)
        } else if let Some(name) = rest.strip_prefix(TYPE_HOLE_MARKER) {
            let name_len = run_len(name, char::is_alphanumeric);
            (
                TokenKind::TypeHole,
                TYPE_HOLE_MARKER.len() + name_len,
                Some(name[..name_len].to_string()),
            )
        } else if let Some(body) = rest.strip_prefix(CONSTRAINT_HOLE_MARKER) {
            let body_len = run_len(body, |ch| !ch.is_whitespace());
            (
                TokenKind::ConstraintHole,
                CONSTRAINT_HOLE_MARKER.len() + body_len,
                Some(body[..body_len].to_string()),
            )
        } else if c.is_ascii_digit() {
            let len = run_len(rest, |ch| ch.is_ascii_digit() || ch == '.');
            (TokenKind::Number, len, Some(rest[..len].to_string()))
        } else if c.is_alphabetic() {
            let len = run_len(rest, |ch| ch.is_alphabetic() || ch == '-' || ch == '_');
            let word = &rest[..len];
            (classify_word(word), len, Some(word.to_lowercase()))
        } else {
            (TokenKind::Punctuation, c.len_utf8(), None)
        };

        let span = Span {
            start: offset + pos,
            end: offset + pos + len,
            line: line_no,
        };
        let mut token = Token::new(kind, &rest[..len], span);
        if let Some(value) = value {
            token = token.with_value(value);
        }
        tokens.push(token);

        pos += len;
    }
}

/// Byte length of the leading run of characters matching `pred`
fn run_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, c)| !pred(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Classify a single alphabetic word
///
/// - all letters uppercase and longer than one character: `ProperNoun`
/// - title case (leading capital, no other capitals): `ProperNoun`
/// - any other leading capital: `CapitalizedWord`
/// - a common verb (case-insensitive): `Verb`
/// - otherwise: `Word`
pub fn classify_word(word: &str) -> TokenKind {
    if word.chars().count() > 1 && is_all_upper(word) {
        return TokenKind::ProperNoun;
    }

    if starts_uppercase(word) {
        if is_title_case(word) {
            return TokenKind::ProperNoun;
        }
        return TokenKind::CapitalizedWord;
    }

    if is_common_verb(word) {
        return TokenKind::Verb;
    }

    TokenKind::Word
}

fn is_common_verb(word: &str) -> bool {
    let lower = word.to_lowercase();
    COMMON_VERBS.contains(&lower.as_str())
}

/// True when every letter in `word` is uppercase
pub(crate) fn is_all_upper(word: &str) -> bool {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .all(char::is_uppercase)
}

/// Leading capital followed by no other capitals, at least two characters
pub(crate) fn is_title_case(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let rest: Vec<char> = chars.collect();
            !rest.is_empty() && !rest.iter().any(|c| c.is_uppercase())
        }
        _ => false,
    }
}

pub(crate) fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Texts of all word-like tokens, in order
pub fn extract_words(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| t.is_word_like())
        .map(|t| t.text.clone())
        .collect()
}

/// One hole per `??Name` token and one constraint-only hole per `!!body` token
pub fn extract_typed_holes(tokens: &[Token]) -> Vec<TypedHole> {
    tokens
        .iter()
        .filter_map(|t| match t.kind {
            TokenKind::TypeHole => Some(TypedHole::typed(t.value.clone(), t.span)),
            TokenKind::ConstraintHole => Some(TypedHole::constrained(t.value.clone(), t.span)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_scan_simple_sentence() {
        let tokens = scan("User creates Document");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::ProperNoun,
                TokenKind::Whitespace,
                TokenKind::Verb,
                TokenKind::Whitespace,
                TokenKind::ProperNoun,
            ]
        );
        assert_eq!(tokens[2].text, "creates");
        assert_eq!(tokens[2].value, "creates");
    }

    #[test]
    fn test_scan_type_hole() {
        let tokens = scan("need ??UserService here");
        let hole = tokens
            .iter()
            .find(|t| t.kind == TokenKind::TypeHole)
            .expect("hole token");
        assert_eq!(hole.text, "??UserService");
        assert_eq!(hole.value, "UserService");
        assert_eq!(hole.span.start, 5);
        assert_eq!(hole.span.end, 18);
    }

    #[test]
    fn test_scan_constraint_hole() {
        let tokens = scan("x !!thread-safe y");
        let hole = tokens
            .iter()
            .find(|t| t.kind == TokenKind::ConstraintHole)
            .expect("constraint token");
        assert_eq!(hole.text, "!!thread-safe");
        assert_eq!(hole.value, "thread-safe");
    }

    #[test]
    fn test_scan_numbers_and_punctuation() {
        let tokens = scan("v1.2, ok");
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, "v");
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].text, "1.2");
        assert_eq!(tokens[2].kind, TokenKind::Punctuation);
        assert_eq!(tokens[2].text, ",");
    }

    #[test]
    fn test_scan_multiline_lines_and_offsets() {
        let text = "alpha\nBeta";
        let tokens = scan(text);
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Word, TokenKind::Newline, TokenKind::ProperNoun]
        );
        assert_eq!(tokens[1].span.start, 5);
        assert_eq!(tokens[2].span.line, 1);
        assert_eq!(tokens[2].span.start, 6);
        assert_eq!(tokens[2].span.slice(text), Some("Beta"));
    }

    #[test]
    fn test_scan_empty() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_scan_multibyte_characters() {
        let text = "café → Zürich";
        let tokens = scan(text);
        for token in &tokens {
            assert_eq!(token.span.slice(text), Some(token.text.as_str()));
        }
        assert_eq!(tokens[0].text, "café");
        assert_eq!(tokens.last().map(|t| t.text.as_str()), Some("Zürich"));
    }

    #[test]
    fn test_classify_word() {
        assert_eq!(classify_word("HTTP"), TokenKind::ProperNoun);
        assert_eq!(classify_word("Document"), TokenKind::ProperNoun);
        assert_eq!(classify_word("GraphQL"), TokenKind::CapitalizedWord);
        assert_eq!(classify_word("A"), TokenKind::CapitalizedWord);
        assert_eq!(classify_word("Creates"), TokenKind::ProperNoun);
        assert_eq!(classify_word("CREATES"), TokenKind::ProperNoun);
        assert_eq!(classify_word("returns"), TokenKind::Verb);
        assert_eq!(classify_word("document"), TokenKind::Word);
    }

    #[test]
    fn test_extract_words() {
        let tokens = scan("User creates a Document.");
        assert_eq!(extract_words(&tokens), vec!["User", "a", "Document"]);
    }

    #[test]
    fn test_extract_typed_holes() {
        let tokens = scan("??Repo stores data !!idempotent");
        let holes = extract_typed_holes(&tokens);
        assert_eq!(holes.len(), 2);
        assert_eq!(holes[0].type_name, "Repo");
        assert_eq!(holes[0].constraint_text(), None);
        assert_eq!(holes[1].type_name, "");
        assert_eq!(holes[1].constraint_text(), Some("idempotent"));
    }
}
