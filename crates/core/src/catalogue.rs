//! The complaint catalogue and the seam the index reads it through
//!
//! The catalogue is supplied by an external data-loading collaborator. The
//! index never mutates it; it asks a [`CatalogueSource`] for the current
//! dataset whenever it (re)builds.

use crate::complaint::ComplaintRecord;
use crate::error::TriageResult;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Versioned collection of complaint records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    /// Dataset version tag, stamped onto every index built from it
    pub version: String,
    /// Locale of the catalogue text (e.g. `"pt-BR"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Complaint records, in catalogue order
    #[serde(default)]
    pub complaints: Vec<ComplaintRecord>,
}

impl Catalogue {
    /// Create a catalogue from records
    pub fn new(version: impl Into<String>, complaints: Vec<ComplaintRecord>) -> Self {
        Catalogue {
            version: version.into(),
            locale: None,
            complaints,
        }
    }

    /// Parse a catalogue from JSON text
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Catalogue` when the JSON is malformed or a
    /// record lacks a required field.
    pub fn from_json_str(json: &str) -> TriageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a catalogue JSON file
    pub fn from_json_file(path: &Path) -> TriageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    /// Whether the catalogue has no records
    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty()
    }
}

// ============================================================================
// CatalogueSource
// ============================================================================

/// Supplies the dataset an index is built from
///
/// Implementations hand out a shared snapshot; the index cache calls this
/// once per build and never holds on to the snapshot afterwards.
pub trait CatalogueSource: Send + Sync {
    /// The current catalogue
    fn catalogue(&self) -> Arc<Catalogue>;
}

/// A catalogue that never changes
#[derive(Debug, Clone)]
pub struct StaticCatalogue {
    catalogue: Arc<Catalogue>,
}

impl StaticCatalogue {
    /// Wrap a fixed catalogue
    pub fn new(catalogue: Catalogue) -> Self {
        StaticCatalogue {
            catalogue: Arc::new(catalogue),
        }
    }
}

impl CatalogueSource for StaticCatalogue {
    fn catalogue(&self) -> Arc<Catalogue> {
        Arc::clone(&self.catalogue)
    }
}

/// A catalogue that can be replaced while indexes are in use
///
/// Replacing the catalogue does not touch any built index; the new data is
/// picked up by the next rebuild.
#[derive(Debug)]
pub struct SharedCatalogue {
    current: RwLock<Arc<Catalogue>>,
}

impl SharedCatalogue {
    /// Start from an initial catalogue
    pub fn new(catalogue: Catalogue) -> Self {
        SharedCatalogue {
            current: RwLock::new(Arc::new(catalogue)),
        }
    }

    /// Install a new catalogue, returning the previous one
    pub fn replace(&self, catalogue: Catalogue) -> Arc<Catalogue> {
        std::mem::replace(&mut *self.current.write(), Arc::new(catalogue))
    }
}

impl CatalogueSource for SharedCatalogue {
    fn catalogue(&self) -> Arc<Catalogue> {
        Arc::clone(&self.current.read())
    }
}

impl<T: CatalogueSource + ?Sized> CatalogueSource for Arc<T> {
    fn catalogue(&self) -> Arc<Catalogue> {
        (**self).catalogue()
    }
}
