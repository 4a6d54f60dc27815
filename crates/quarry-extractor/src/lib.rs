//! Quarry Extractor
//!
//! Turns free-form text into tokens and classified entities.
//!
//! # Overview
//!
//! ```text
//! Text → scanner → tokens ─┬→ classifier (single words) ─┐
//!                          └→ multi-word detector ────────┴→ entities
//! ```
//!
//! Entity extraction is pluggable through the [`EntityExtractor`] trait:
//!
//! - [`PatternExtractor`]: dictionaries, context and capitalization rules; always available
//! - [`RemoteExtractor`]: delegates to the NER service through a [`quarry_ner::NerBackend`]
//! - [`HybridExtractor`]: tries a primary strategy and falls back to a secondary one
//!
//! Scanning and classification are total: they never fail.
//!
//! # Example Usage
//!
//! ```
//! use quarry_domain::EntityCategory;
//! use quarry_extractor::{EntityExtractor, PatternExtractor};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), quarry_extractor::ExtractorError> {
//! let extractor = PatternExtractor::new();
//! let cancel = CancellationToken::new();
//!
//! let entities = extractor
//!     .extract(&cancel, "The API speaks HTTP and JSON", &["technology".to_string()])
//!     .await?;
//!
//! assert!(entities.iter().all(|e| e.category == EntityCategory::Technology));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classifier;
mod dependencies;
mod error;
mod hybrid;
mod lexicon;
mod multiword;
mod pattern;
mod remote;
mod scanner;
mod strategy;


pub use classifier::{ClassificationContext, Classifier};
pub use dependencies::extract_dependencies;
pub use error::ExtractorError;
pub use hybrid::HybridExtractor;
pub use lexicon::Lexicon;
pub use multiword::{detect_multiword, MultiWordEntity};
pub use pattern::PatternExtractor;
pub use remote::{map_label, RemoteExtractor};
pub use scanner::{classify_word, extract_typed_holes, extract_words, scan};
pub use strategy::EntityExtractor;
