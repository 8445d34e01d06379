//! Core types for the triage complaint index
//!
//! This crate defines the foundational types used throughout the system:
//! - ComplaintId: Unique identifier of a catalogue entry
//! - ComplaintRecord: One reason-for-visit with its search metadata
//! - RiskLevel: Triage risk classification
//! - Catalogue: Versioned collection of complaint records
//! - CatalogueSource: Seam through which the index obtains its dataset
//! - Timestamp: Microsecond-precision build timestamps
//! - IndexConfig: `triage-index.toml` configuration
//! - Limits: Field size limits enforced while indexing
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalogue;
pub mod complaint;
pub mod config;
pub mod error;
pub mod limits;
pub mod timestamp;

// Re-export commonly used types
pub use catalogue::{Catalogue, CatalogueSource, SharedCatalogue, StaticCatalogue};
pub use complaint::{ComplaintId, ComplaintRecord, RiskLevel, SearchableField};
pub use config::{DuplicatePolicy, IndexConfig, CONFIG_FILE_NAME};
pub use error::{TriageError, TriageResult};
pub use limits::{FieldLimitError, MAX_FIELD_BYTES};
pub use timestamp::Timestamp;
