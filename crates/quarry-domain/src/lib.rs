//! Quarry Domain Layer
//!
//! Core value types shared by every Quarry crate. Nothing in here performs
//! I/O; scanning, classification and analysis live in the crates above.
//!
//! ## Key Concepts
//!
//! - **Span**: half-open byte range plus 0-indexed line, attached to every fact
//! - **Token**: a typed lexical unit produced by the scanner
//! - **Entity**: a classified span of text, deduplicated by lowercase text
//! - **Relationship / Triple**: subject-predicate-object facts
//! - **Typed hole**: a `??Type` or `!!constraint` placeholder awaiting implementation
//! - **Analysis**: the aggregate result of one pipeline run
//! - **AnalysisUpdate**: one unit of the progress stream

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod dependency;
pub mod entity;
pub mod error;
pub mod hole;
pub mod relationship;
pub mod span;
pub mod token;

// Re-exports for convenience
pub use analysis::{Analysis, AnalysisUpdate, Statistics, UpdateKind, UpdatePayload};
pub use dependency::Dependency;
pub use entity::{Entity, EntityCategory};
pub use error::DomainError;
pub use hole::{ConstraintKind, EnhancedTypedHole, HoleConstraint, TypedHole};
pub use relationship::{Relationship, Triple};
pub use span::Span;
pub use token::{Token, TokenKind};
