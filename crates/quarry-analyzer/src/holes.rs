//! Typed-hole enrichment: constraints, scoring, hints and relations
//!
//! Holes that carry only a constraint (`!!text`) have an empty type name.
//! An empty name is contained in every string, so such a hole counts every
//! relationship as a mention and relates to every named hole.

use quarry_domain::{ConstraintKind, EnhancedTypedHole, HoleConstraint, Relationship, TypedHole};
use std::collections::HashMap;

const BASE_PRIORITY: u8 = 5;
const MAX_MENTION_BONUS: usize = 3;
const CONSTRAINT_BONUS: u8 = 2;
const MAX_SCORE: u8 = 10;
const BASE_COMPLEXITY: usize = 3;

/// Parse one raw constraint string
///
/// The first keyword from [`ConstraintKind::MATCH_ORDER`] contained in the
/// lowercased text wins; otherwise the constraint is
/// [`ConstraintKind::Generic`], described by its own text.
pub fn parse_constraint(raw: &str) -> HoleConstraint {
    let value = raw.trim();
    let lower = value.to_lowercase();

    let kind = ConstraintKind::MATCH_ORDER
        .iter()
        .copied()
        .find(|kind| lower.contains(kind.keyword()))
        .unwrap_or(ConstraintKind::Generic);

    HoleConstraint {
        kind,
        value: value.to_string(),
        description: kind.description().unwrap_or(value).to_string(),
        satisfied: false,
    }
}

/// Constraints attached to `hole`
pub fn parse_constraints(hole: &TypedHole) -> Vec<HoleConstraint> {
    hole.constraint_text()
        .map(parse_constraint)
        .into_iter()
        .collect()
}

fn mention_count(hole: &TypedHole, relationships: &[Relationship]) -> usize {
    relationships
        .iter()
        .filter(|r| r.mentions(&hole.type_name))
        .count()
}

/// Implementation priority in `[0, 10]`
///
/// Base 5, plus up to 3 for relationship mentions, plus 2 for a constraint.
pub fn priority(hole: &TypedHole, relationships: &[Relationship]) -> u8 {
    let mentions = mention_count(hole, relationships).min(MAX_MENTION_BONUS) as u8;
    let mut score = BASE_PRIORITY + mentions;
    if hole.constraint_text().is_some() {
        score += CONSTRAINT_BONUS;
    }
    score.min(MAX_SCORE)
}

/// Estimated complexity in `[1, 10]`
pub fn complexity(constraints: &[HoleConstraint]) -> u8 {
    let bonus: usize = constraints
        .iter()
        .map(|c| match c.kind {
            ConstraintKind::Thread | ConstraintKind::Concurrent | ConstraintKind::Atomic => 2,
            ConstraintKind::Pure | ConstraintKind::Idempotent => 1,
            ConstraintKind::Async => 1,
            _ => 0,
        })
        .sum();

    let score = BASE_COMPLEXITY + constraints.len() + bonus;
    score.clamp(1, usize::from(MAX_SCORE)) as u8
}

fn type_hint(type_name: &str) -> String {
    let hint = match type_name {
        "Function" => "Implement as a pure function with clear input/output",
        "Method" => "Add method to the appropriate struct or trait",
        "Interface" => "Define trait contract with key methods",
        "Struct" => "Define struct with necessary fields",
        "Type" => "Create type alias or newtype definition",
        "Handler" => "Implement handler function with error handling",
        "Service" => "Create service with dependency injection",
        "Manager" => "Implement manager pattern with lifecycle methods",
        "Factory" => "Create factory function for object construction",
        "Builder" => "Implement builder pattern for complex objects",
        other => {
            return format!(
                "Implement {} with appropriate error handling and tests",
                other
            )
        }
    };
    hint.to_string()
}

fn constraint_hint(kind: ConstraintKind) -> Option<&'static str> {
    match kind {
        ConstraintKind::Thread | ConstraintKind::Concurrent => {
            Some("Guard shared state with Mutex or RwLock")
        }
        ConstraintKind::Async => Some("Run work in async tasks and communicate over channels"),
        ConstraintKind::Pure => Some("Avoid side effects, use immutable data"),
        ConstraintKind::Atomic => Some("Use std::sync::atomic types for lock-free updates"),
        _ => None,
    }
}

/// Canned implementation hints joined with `"; "`
pub fn suggest_implementation(hole: &TypedHole, constraints: &[HoleConstraint]) -> String {
    std::iter::once(type_hint(&hole.type_name))
        .chain(
            constraints
                .iter()
                .filter_map(|c| constraint_hint(c.kind))
                .map(str::to_string),
        )
        .collect::<Vec<_>>()
        .join("; ")
}

/// Symmetric relations between holes named on either side of a relationship
///
/// Keys and values are hole ids (`type_index`). Only holes that take part in
/// a relation appear as keys.
pub fn find_related(
    holes: &[TypedHole],
    relationships: &[Relationship],
) -> HashMap<String, Vec<String>> {
    let mut related: HashMap<String, Vec<String>> = HashMap::new();

    for (a, b) in related_pairs(holes, relationships) {
        let id_a = holes[a].id(a);
        let id_b = holes[b].id(b);

        link(&mut related, &id_a, &id_b);
        link(&mut related, &id_b, &id_a);
    }

    related
}

/// Index pairs `(a, b)` where some relationship's subject names hole `a`
/// and its object names hole `b` of a different type, with the relationship
pub(crate) fn related_pairs_with<'r>(
    holes: &[TypedHole],
    relationships: &'r [Relationship],
) -> Vec<(usize, usize, &'r Relationship)> {
    let mut pairs = Vec::new();

    for rel in relationships {
        for (a, hole_a) in holes.iter().enumerate() {
            if !rel.subject.contains(&hole_a.type_name) {
                continue;
            }
            for (b, hole_b) in holes.iter().enumerate() {
                if hole_a.type_name == hole_b.type_name || !rel.object.contains(&hole_b.type_name) {
                    continue;
                }
                pairs.push((a, b, rel));
            }
        }
    }

    pairs
}

fn related_pairs(holes: &[TypedHole], relationships: &[Relationship]) -> Vec<(usize, usize)> {
    related_pairs_with(holes, relationships)
        .into_iter()
        .map(|(a, b, _)| (a, b))
        .collect()
}

fn link(related: &mut HashMap<String, Vec<String>>, from: &str, to: &str) {
    let entry = related.entry(from.to_string()).or_default();
    if !entry.iter().any(|id| id == to) {
        entry.push(to.to_string());
    }
}

/// Enrich every hole with constraints, scores, hints and relations
pub fn enhance_holes(holes: &[TypedHole], relationships: &[Relationship]) -> Vec<EnhancedTypedHole> {
    let mut related = find_related(holes, relationships);

    holes
        .iter()
        .enumerate()
        .map(|(index, hole)| {
            let id = hole.id(index);
            let constraints = parse_constraints(hole);

            EnhancedTypedHole {
                priority: priority(hole, relationships),
                complexity: complexity(&constraints),
                suggested_impl: suggest_implementation(hole, &constraints),
                related_holes: related.remove(&id).unwrap_or_default(),
                dependencies: Vec::new(),
                hole: hole.clone(),
                constraints,
                id,
            }
        })
        .collect()
}

/// Ordering views over a set of enhanced holes
///
/// All sorts are stable; ties keep input order.
#[derive(Debug, Clone, Default)]
pub struct HolePrioritizer {
    holes: Vec<EnhancedTypedHole>,
}

impl HolePrioritizer {
    /// Wrap an enhanced hole set
    pub fn new(holes: Vec<EnhancedTypedHole>) -> Self {
        Self { holes }
    }

    /// Enhance `holes` against `relationships` and wrap the result
    pub fn from_holes(holes: &[TypedHole], relationships: &[Relationship]) -> Self {
        Self::new(enhance_holes(holes, relationships))
    }

    /// Holes in input order
    pub fn holes(&self) -> &[EnhancedTypedHole] {
        &self.holes
    }

    /// Highest priority first
    pub fn by_priority(&self) -> Vec<EnhancedTypedHole> {
        let mut sorted = self.holes.clone();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted
    }

    /// Lowest complexity first
    pub fn by_complexity(&self) -> Vec<EnhancedTypedHole> {
        let mut sorted = self.holes.clone();
        sorted.sort_by(|a, b| a.complexity.cmp(&b.complexity));
        sorted
    }

    /// Highest `priority / complexity` first; the default display order
    pub fn recommended(&self) -> Vec<EnhancedTypedHole> {
        let mut sorted = self.holes.clone();
        sorted.sort_by(|a, b| b.value_score().total_cmp(&a.value_score()));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_domain::Span;

    fn rel(subject: &str, predicate: &str, object: &str) -> Relationship {
        Relationship::new(subject, predicate, object, Span::default())
    }

    fn constraint(kind: ConstraintKind) -> HoleConstraint {
        parse_constraint(kind.keyword())
    }

    fn scored(id: &str, priority: u8, complexity: u8) -> EnhancedTypedHole {
        EnhancedTypedHole {
            id: id.to_string(),
            hole: TypedHole::typed(id, Span::default()),
            constraints: Vec::new(),
            priority,
            complexity,
            suggested_impl: String::new(),
            related_holes: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    #[test]
    fn test_parse_constraint_order() {
        assert_eq!(parse_constraint("  Thread-Safe ").kind, ConstraintKind::Thread);
        assert_eq!(parse_constraint("thread-safe").value, "thread-safe");
        // "async" contains "sync"; async is tested first
        assert_eq!(parse_constraint("async").kind, ConstraintKind::Async);
        // "implements" precedes "immutable"
        assert_eq!(
            parse_constraint("implements immutable view").kind,
            ConstraintKind::Implements
        );
    }

    #[test]
    fn test_parse_generic_constraint() {
        let c = parse_constraint("fast");
        assert_eq!(c.kind, ConstraintKind::Generic);
        assert_eq!(c.value, "fast");
        assert_eq!(c.description, "fast");
        assert!(!c.satisfied);
    }

    #[test]
    fn test_base_priority() {
        let hole = TypedHole::typed("Cache", Span::default());
        assert_eq!(priority(&hole, &[]), 5);
    }

    #[test]
    fn test_priority_is_monotonic() {
        let hole = TypedHole::typed("Cache", Span::default());
        let rels: Vec<Relationship> = (0..5).map(|_| rel("Cache", "uses", "Disk")).collect();

        let mut last = 0;
        for n in 0..=rels.len() {
            let p = priority(&hole, &rels[..n]);
            assert!(p >= last);
            last = p;
        }
        assert_eq!(last, 8);

        let constrained = TypedHole {
            constraint: Some("pure".to_string()),
            ..hole
        };
        assert_eq!(priority(&constrained, &rels), 10);
    }

    #[test]
    fn test_constraint_only_hole_counts_every_mention() {
        let hole = TypedHole::constrained("async", Span::default());
        // 5 base + 1 mention + 2 constraint
        assert_eq!(priority(&hole, &[rel("A", "uses", "B")]), 8);
    }

    #[test]
    fn test_complexity_bonuses() {
        assert_eq!(complexity(&[]), 3);
        assert_eq!(complexity(&[constraint(ConstraintKind::Pure)]), 5);
        assert_eq!(complexity(&[constraint(ConstraintKind::Async)]), 5);
        assert_eq!(complexity(&[constraint(ConstraintKind::Mutable)]), 4);

        let heavy = [
            constraint(ConstraintKind::Thread),
            constraint(ConstraintKind::Concurrent),
            constraint(ConstraintKind::Atomic),
        ];
        assert!(complexity(&heavy) >= 7);
        assert_eq!(complexity(&heavy), 10);
    }

    #[test]
    fn test_suggestions() {
        let hole = TypedHole::typed("Service", Span::default());
        assert_eq!(
            suggest_implementation(&hole, &[]),
            "Create service with dependency injection"
        );

        let hole = TypedHole::typed("Cache", Span::default());
        let hint = suggest_implementation(
            &hole,
            &[constraint(ConstraintKind::Thread), constraint(ConstraintKind::Async)],
        );
        let parts: Vec<&str> = hint.split("; ").collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].starts_with("Implement Cache"));
        assert!(parts[1].contains("Mutex"));
        assert!(parts[2].contains("async"));
    }

    #[test]
    fn test_find_related_is_symmetric_and_deduplicated() {
        let holes = vec![
            TypedHole::typed("Parser", Span::default()),
            TypedHole::typed("Lexer", Span::default()),
            TypedHole::constrained("pure", Span::default()),
        ];
        let rels = vec![
            rel("Parser", "uses", "Lexer"),
            rel("Parser", "calls", "Lexer"),
        ];

        let related = find_related(&holes, &rels);
        assert_eq!(
            related.get("Parser_0"),
            Some(&vec!["Lexer_1".to_string(), "_2".to_string()])
        );
        assert_eq!(
            related.get("Lexer_1"),
            Some(&vec!["Parser_0".to_string(), "_2".to_string()])
        );
        assert_eq!(
            related.get("_2"),
            Some(&vec!["Parser_0".to_string(), "Lexer_1".to_string()])
        );
    }

    #[test]
    fn test_same_type_holes_are_not_related() {
        let holes = vec![
            TypedHole::typed("Cache", Span::default()),
            TypedHole::typed("Cache", Span::default()),
        ];
        let related = find_related(&holes, &[rel("Cache", "uses", "Cache")]);
        assert!(related.is_empty());
    }

    #[test]
    fn test_enhance_assigns_ids_and_relations() {
        let holes = vec![
            TypedHole::typed("Parser", Span::default()),
            TypedHole::typed("Lexer", Span::default()),
        ];
        let enhanced = enhance_holes(&holes, &[rel("Parser", "uses", "Lexer")]);

        assert_eq!(enhanced[0].id, "Parser_0");
        assert_eq!(enhanced[0].priority, 6);
        assert_eq!(enhanced[0].complexity, 3);
        assert_eq!(enhanced[1].related_holes, vec!["Parser_0"]);
    }

    #[test]
    fn test_recommended_order() {
        let prioritizer = HolePrioritizer::new(vec![
            scored("a", 8, 8),
            scored("b", 9, 3),
            scored("c", 4, 8),
        ]);

        let ids: Vec<String> = prioritizer.recommended().into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_priority_and_complexity_views() {
        let prioritizer = HolePrioritizer::new(vec![
            scored("a", 8, 8),
            scored("b", 9, 3),
            scored("c", 4, 5),
        ]);

        let by_priority: Vec<u8> = prioritizer.by_priority().iter().map(|h| h.priority).collect();
        assert_eq!(by_priority, vec![9, 8, 4]);

        let by_complexity: Vec<u8> = prioritizer
            .by_complexity()
            .iter()
            .map(|h| h.complexity)
            .collect();
        assert_eq!(by_complexity, vec![3, 5, 8]);
    }
}
