//! Typed holes - placeholders awaiting implementation
//!
//! A `??Type` marker yields a hole naming the type to implement; a
//! `!!constraint` marker yields a hole carrying only the constraint text.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A placeholder found in the content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedHole {
    /// Hole type (e.g. "Function", "Interface"); empty for constraint markers
    pub type_name: String,

    /// Constraint text, if any
    pub constraint: Option<String>,

    /// Location in content
    pub span: Span,
}

impl TypedHole {
    /// Create a `??Type` hole
    pub fn typed(type_name: impl Into<String>, span: Span) -> Self {
        Self {
            type_name: type_name.into(),
            constraint: None,
            span,
        }
    }

    /// Create a `!!constraint` hole
    pub fn constrained(constraint: impl Into<String>, span: Span) -> Self {
        Self {
            type_name: String::new(),
            constraint: Some(constraint.into()),
            span,
        }
    }

    /// The constraint text if present and non-empty
    pub fn constraint_text(&self) -> Option<&str> {
        self.constraint.as_deref().filter(|c| !c.is_empty())
    }

    /// Stable identifier for the hole at `index` within its list
    pub fn id(&self, index: usize) -> String {
        format!("{}_{}", self.type_name, index)
    }
}

/// Kind of a parsed hole constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    /// Interface implementation
    Implements,
    /// Idempotent operation
    Idempotent,
    /// Immutability
    Immutable,
    /// Concurrent execution support
    Concurrent,
    /// Asynchronous execution
    Async,
    /// Type extension
    Extends,
    /// External dependency
    Requires,
    /// Thread safety
    Thread,
    /// Synchronous execution
    Sync,
    /// Mutability allowed
    Mutable,
    /// No side effects
    Pure,
    /// Atomic operation
    Atomic,
    /// Unrecognized constraint, raw text preserved
    Generic,
}

impl ConstraintKind {
    /// Keyword-matched kinds in match priority order
    ///
    /// Longer or more specific keywords come before the ones they contain
    /// (`async` before `sync`, `immutable` before `mutable`).
    pub const MATCH_ORDER: [ConstraintKind; 12] = [
        ConstraintKind::Implements,
        ConstraintKind::Idempotent,
        ConstraintKind::Immutable,
        ConstraintKind::Concurrent,
        ConstraintKind::Async,
        ConstraintKind::Extends,
        ConstraintKind::Requires,
        ConstraintKind::Thread,
        ConstraintKind::Sync,
        ConstraintKind::Mutable,
        ConstraintKind::Pure,
        ConstraintKind::Atomic,
    ];

    /// Keyword searched for in the constraint text
    pub fn keyword(&self) -> &'static str {
        match self {
            ConstraintKind::Implements => "implements",
            ConstraintKind::Idempotent => "idempotent",
            ConstraintKind::Immutable => "immutable",
            ConstraintKind::Concurrent => "concurrent",
            ConstraintKind::Async => "async",
            ConstraintKind::Extends => "extends",
            ConstraintKind::Requires => "requires",
            ConstraintKind::Thread => "thread",
            ConstraintKind::Sync => "sync",
            ConstraintKind::Mutable => "mutable",
            ConstraintKind::Pure => "pure",
            ConstraintKind::Atomic => "atomic",
            ConstraintKind::Generic => "generic",
        }
    }

    /// Canned human-readable description; `None` for [`ConstraintKind::Generic`],
    /// whose description is the raw constraint text
    pub fn description(&self) -> Option<&'static str> {
        let text = match self {
            ConstraintKind::Implements => "Interface implementation required",
            ConstraintKind::Idempotent => "Idempotent operation required",
            ConstraintKind::Immutable => "Immutability required",
            ConstraintKind::Concurrent => "Concurrent execution support required",
            ConstraintKind::Async => "Asynchronous execution required",
            ConstraintKind::Extends => "Type extension required",
            ConstraintKind::Requires => "Dependency required",
            ConstraintKind::Thread => "Thread-safety requirement",
            ConstraintKind::Sync => "Synchronous execution required",
            ConstraintKind::Mutable => "Mutability allowed",
            ConstraintKind::Pure => "Pure function required (no side effects)",
            ConstraintKind::Atomic => "Atomic operation required",
            ConstraintKind::Generic => return None,
        };
        Some(text)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A structured constraint on a typed hole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleConstraint {
    /// Constraint kind
    pub kind: ConstraintKind,

    /// Trimmed raw constraint text
    pub value: String,

    /// Human-readable description
    pub description: String,

    /// Whether the constraint is known to be satisfied
    pub satisfied: bool,
}

/// A typed hole enriched with planning metadata
///
/// Derived on demand from a hole list and a relationship list; never
/// stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedTypedHole {
    /// Identifier of the form `type_index`
    pub id: String,

    /// Underlying hole
    #[serde(flatten)]
    pub hole: TypedHole,

    /// Parsed constraints
    pub constraints: Vec<HoleConstraint>,

    /// Implementation priority (0-10)
    pub priority: u8,

    /// Estimated complexity (1-10)
    pub complexity: u8,

    /// Suggested implementation approach
    pub suggested_impl: String,

    /// IDs of related holes
    pub related_holes: Vec<String>,

    /// IDs of holes this one depends on
    pub dependencies: Vec<String>,
}

impl EnhancedTypedHole {
    /// Effort-adjusted value score: `priority / max(complexity, 1)`
    pub fn value_score(&self) -> f64 {
        f64::from(self.priority) / f64::from(self.complexity.max(1))
    }
}
