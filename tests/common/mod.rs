//! Shared test utilities for the root integration suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use triage_index::{Catalogue, CATALOGUE_FILE_NAME};

// ============================================================================
// Initialization
// ============================================================================

/// Route `tracing` output to the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ============================================================================
// Fixtures
// ============================================================================

/// Path of the bundled catalogue fixture
pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("catalogue.json")
}

/// The bundled catalogue fixture, parsed
pub fn fixture_catalogue() -> Catalogue {
    Catalogue::from_json_file(&fixture_path()).unwrap()
}

/// A temporary data directory holding a copy of the fixture catalogue
pub fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::copy(fixture_path(), dir.path().join(CATALOGUE_FILE_NAME)).unwrap();
    dir
}
