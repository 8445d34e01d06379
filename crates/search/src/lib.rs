//! Search index over the triage complaint catalogue
//!
//! This crate provides:
//! - normalizer: accent/case folding, tokenization and n-grams
//! - IndexBuilder: one pass over a catalogue into an immutable SearchIndex
//! - IndexCache: lazily built, atomically replaceable current index
//! - QueryEngine: exact-term, n-gram, synonym, title and related lookups
//! - ComplaintFilter: attribute filters over complaint summaries
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use triage_core::{
//!     Catalogue, ComplaintId, ComplaintRecord, IndexConfig, RiskLevel, StaticCatalogue,
//! };
//! use triage_search::IndexCache;
//!
//! let catalogue = Catalogue::new(
//!     "v1",
//!     vec![ComplaintRecord::new("RC_COUGH", "RESP", "Tosse", RiskLevel::Low)
//!         .with_search_terms(["tosse"])],
//! );
//! let cache = IndexCache::new(Arc::new(StaticCatalogue::new(catalogue)), IndexConfig::default());
//!
//! let index = cache.get_index().unwrap();
//! assert_eq!(
//!     index.query().complaints_by_exact_term("tosse"),
//!     vec![ComplaintId::from("RC_COUGH")]
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod cache;
pub mod filter;
pub mod index;
pub mod normalizer;
pub mod query;

// Re-export commonly used types
pub use builder::IndexBuilder;
pub use cache::IndexCache;
pub use filter::ComplaintFilter;
pub use index::{BuildStats, ComplaintSummary, PostingMap, SearchIndex};
pub use normalizer::{
    generate_ngrams, ngrams_for_text, normalize, tokenize, tokenize_unique, DEFAULT_NGRAM_SIZE,
};
pub use query::{ComplaintMatch, MatchKind, QueryEngine, SearchStatistics};
