//! Analysis results and the progress stream

use crate::dependency::Dependency;
use crate::entity::Entity;
use crate::error::DomainError;
use crate::hole::TypedHole;
use crate::relationship::{Relationship, Triple};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, SystemTime};

/// Aggregate result of one pipeline run
///
/// Created at the start of a run and filled stage by stage. A new run
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Original content
    pub content: String,

    /// Extracted entities
    pub entities: Vec<Entity>,

    /// Detected relationships
    pub relationships: Vec<Relationship>,

    /// Typed holes
    pub typed_holes: Vec<TypedHole>,

    /// Import-style dependencies
    pub dependencies: Vec<Dependency>,

    /// Triples derived from relationships
    pub triples: Vec<Triple>,

    /// Number of tokens the scanner produced
    pub token_count: usize,

    /// When the run started
    pub started_at: SystemTime,

    /// Elapsed time of the run
    pub duration: Duration,
}

impl Analysis {
    /// Start a fresh analysis of `content`
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            started_at: SystemTime::now(),
            ..Self::default()
        }
    }

    /// Compute summary statistics
    ///
    /// Unique entities are counted by exact text.
    pub fn statistics(&self) -> Statistics {
        let unique: HashSet<&str> = self.entities.iter().map(|e| e.text.as_str()).collect();

        Statistics {
            total_tokens: self.token_count,
            unique_entities: unique.len(),
            total_relationships: self.relationships.len(),
            total_typed_holes: self.typed_holes.len(),
            total_dependencies: self.dependencies.len(),
            total_triples: self.triples.len(),
            duration: self.duration,
        }
    }
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            content: String::new(),
            entities: Vec::new(),
            relationships: Vec::new(),
            typed_holes: Vec::new(),
            dependencies: Vec::new(),
            triples: Vec::new(),
            token_count: 0,
            started_at: SystemTime::UNIX_EPOCH,
            duration: Duration::ZERO,
        }
    }
}

/// Summary counts for an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Tokens produced by the scanner
    pub total_tokens: usize,
    /// Distinct entity texts
    pub unique_entities: usize,
    /// Relationship count
    pub total_relationships: usize,
    /// Typed hole count
    pub total_typed_holes: usize,
    /// Dependency count
    pub total_dependencies: usize,
    /// Triple count
    pub total_triples: usize,
    /// Run duration
    pub duration: Duration,
}

/// Kind of a streamed update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    /// Progress within a run
    Incremental,
    /// The run finished
    Complete,
    /// Something went wrong
    Error,
}

/// An item discovered by a pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum UpdatePayload {
    /// An extracted entity
    Entity(Entity),
    /// A detected relationship
    Relationship(Relationship),
    /// A typed hole
    TypedHole(TypedHole),
    /// A dependency
    Dependency(Dependency),
}

/// One unit of the progress stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisUpdate {
    /// Update kind
    pub kind: UpdateKind,

    /// Progress in `[0.0, 1.0]`
    pub progress: f32,

    /// Discovered item, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<UpdatePayload>,

    /// Error message for `UpdateKind::Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisUpdate {
    /// Stage-boundary progress update
    pub fn progress(progress: f32) -> Self {
        Self {
            kind: UpdateKind::Incremental,
            progress,
            payload: None,
            error: None,
        }
    }

    /// Per-item update
    pub fn item(progress: f32, payload: UpdatePayload) -> Self {
        Self {
            payload: Some(payload),
            ..Self::progress(progress)
        }
    }

    /// Completion update
    pub fn complete() -> Self {
        Self {
            kind: UpdateKind::Complete,
            progress: 1.0,
            payload: None,
            error: None,
        }
    }

    /// Error update
    pub fn error(progress: f32, message: impl Into<String>) -> Self {
        Self {
            kind: UpdateKind::Error,
            progress,
            payload: None,
            error: Some(message.into()),
        }
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON
    ///
    /// Malformed input is reported as [`DomainError::PayloadDecode`].
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(json)?)
    }
}
