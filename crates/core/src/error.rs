//! Error types for the triage index
//!
//! Absence is not an error here: unknown complaint IDs, terms, n-grams and
//! synonyms resolve to empty results. Errors cover what a caller must react
//! to: unreadable configuration or catalogues, and builds that cannot
//! produce a consistent index.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::complaint::{ComplaintId, SearchableField};
use crate::limits::FieldLimitError;
use std::io;
use thiserror::Error;

/// Result type alias for triage index operations
pub type TriageResult<T> = std::result::Result<T, TriageError>;

/// Error types for the triage index
#[derive(Debug, Error)]
pub enum TriageError {
    /// I/O error reading a config or catalogue file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Catalogue could not be parsed
    #[error("Invalid catalogue: {0}")]
    Catalogue(String),

    /// The same complaint ID appears more than once in one build
    #[error("Duplicate complaint ID in catalogue: {id}")]
    DuplicateComplaintId {
        /// The repeated ID
        id: ComplaintId,
    },

    /// A searchable field of a record cannot be indexed
    #[error("Invalid {field} field on complaint {id}: {reason}")]
    InvalidField {
        /// Complaint that owns the field
        id: ComplaintId,
        /// Which field failed
        field: SearchableField,
        /// Why it failed
        reason: FieldLimitError,
    },
}

impl TriageError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        TriageError::Config(msg.into())
    }

    /// Create a catalogue error
    pub fn catalogue(msg: impl Into<String>) -> Self {
        TriageError::Catalogue(msg.into())
    }

    /// Whether this error aborts a whole index build
    ///
    /// Field errors are recovered locally by the builder.
    pub fn is_fatal_for_build(&self) -> bool {
        !matches!(self, TriageError::InvalidField { .. })
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(e: serde_json::Error) -> Self {
        TriageError::Catalogue(e.to_string())
    }
}

impl From<toml::de::Error> for TriageError {
    fn from(e: toml::de::Error) -> Self {
        TriageError::Config(e.to_string())
    }
}
