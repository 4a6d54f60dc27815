//! Import-statement dependency extraction

use quarry_domain::{Dependency, Span};
use regex::Regex;
use std::sync::LazyLock;

const IMPORT_KIND: &str = "import";

/// Import patterns; the first capture group is the target
const IMPORT_PATTERNS: &[&str] = &[
    r#"import\s+"([^"]+)""#,
    r"import\s+(\S+)",
    r#"require\s+['"]([^'"]+)"#,
    r#"from\s+['"]([^'"]+)"#,
    r"#include\s+<([^>]+)>",
    r"use\s+(\S+);",
];

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    IMPORT_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

/// Find dependency references in `content`
///
/// Every pattern is applied on its own, so one statement can match more than
/// once: `import "fmt"` yields both `fmt` and `"fmt"`. Results are sorted by
/// offset; matches at the same offset keep pattern order.
pub fn extract_dependencies(content: &str) -> Vec<Dependency> {
    let mut found: Vec<Dependency> = Vec::new();

    for pattern in PATTERNS.iter() {
        for caps in pattern.captures_iter(content) {
            let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            found.push(Dependency {
                kind: IMPORT_KIND.to_string(),
                target: target.as_str().to_string(),
                span: Span {
                    start: whole.start(),
                    end: whole.end(),
                    line: line_at(content, whole.start()),
                },
            });
        }
    }

    found.sort_by_key(|d| d.span.start);
    found
}

fn line_at(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(PATTERNS.len(), IMPORT_PATTERNS.len());
    }

    #[test]
    fn test_quoted_import_matches_both_import_patterns() {
        let deps = extract_dependencies(r#"import "fmt""#);
        let targets: Vec<&str> = deps.iter().map(|d| d.target.as_str()).collect();
        assert_eq!(targets, vec!["fmt", "\"fmt\""]);
        assert!(deps.iter().all(|d| d.kind == "import" && d.span.start == 0));
    }

    #[test]
    fn test_mixed_languages_in_document_order() {
        let text = "#include <stdio.h>\nrequire 'lodash'\nuse std::fmt;\nimport os";
        let deps = extract_dependencies(text);
        let targets: Vec<&str> = deps.iter().map(|d| d.target.as_str()).collect();
        assert_eq!(targets, vec!["stdio.h", "lodash", "std::fmt", "os"]);

        let lines: Vec<usize> = deps.iter().map(|d| d.span.line).collect();
        assert_eq!(lines, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_from_clause() {
        let deps = extract_dependencies("import React from 'react'");
        let targets: Vec<&str> = deps.iter().map(|d| d.target.as_str()).collect();
        assert_eq!(targets, vec!["React", "react"]);
    }

    #[test]
    fn test_no_dependencies() {
        assert!(extract_dependencies("User creates Document").is_empty());
    }
}
