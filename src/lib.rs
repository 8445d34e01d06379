//! Triage index - in-memory search over the triage complaint catalogue
//!
//! Makes a catalogue of clinical complaints searchable by exact token,
//! partial word (character n-grams), declared synonym and exact title, and
//! suggests related complaints by group and body system.
//!
//! # Quick Start
//!
//! ```no_run
//! use triage_index::open;
//!
//! // Reads catalogue.json and triage-index.toml from the directory
//! let cache = open("/path/to/data")?;
//!
//! let index = cache.get_index()?;
//! let coughs = index.query().complaints_by_exact_term("tosse");
//! # Ok::<(), triage_index::TriageError>(())
//! ```
//!
//! # Architecture
//!
//! Foundational types live in `triage-core`; normalization, indexing,
//! caching and queries live in `triage-search`. Both are re-exported here.

use std::path::Path;
use std::sync::Arc;

// Re-export the public API of the member crates
pub use triage_core::*;
pub use triage_search::*;

/// Name of the catalogue file read by [`open`]
pub const CATALOGUE_FILE_NAME: &str = "catalogue.json";

/// Open the catalogue stored in a data directory
///
/// Reads `catalogue.json` and `triage-index.toml` from `dir`. If the config
/// file does not exist it is created with the default settings, so it can
/// be edited before the next start.
///
/// The returned cache has not built anything yet; the first
/// [`IndexCache::get_index`] call does.
///
/// # Errors
///
/// Returns an error if the config file cannot be written or is invalid, or
/// if the catalogue is missing or malformed.
pub fn open<P: AsRef<Path>>(dir: P) -> TriageResult<IndexCache> {
    let config_path = dir.as_ref().join(CONFIG_FILE_NAME);
    IndexConfig::write_default_if_missing(&config_path)?;
    let config = IndexConfig::from_file(&config_path)?;

    open_with_config(dir, config)
}

/// Open the catalogue stored in a data directory with an explicit
/// configuration
///
/// The supplied config is validated but not written to disk.
pub fn open_with_config<P: AsRef<Path>>(dir: P, config: IndexConfig) -> TriageResult<IndexCache> {
    config.validate()?;
    let catalogue = Catalogue::from_json_file(&dir.as_ref().join(CATALOGUE_FILE_NAME))?;
    tracing::info!(
        target: "triage::index",
        version = %catalogue.version,
        complaints = catalogue.len(),
        "Loaded complaint catalogue"
    );

    Ok(IndexCache::new(
        Arc::new(StaticCatalogue::new(catalogue)),
        config,
    ))
}
