//! External dependency references

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A reference to an external resource found via an import-statement pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency kind (currently always `import`)
    pub kind: String,

    /// Imported target
    pub target: String,

    /// Span of the whole matched statement
    pub span: Span,
}
