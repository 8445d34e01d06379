//! Index configuration via `triage-index.toml`
//!
//! The host application owns the file; a commented default can be written
//! with [`IndexConfig::write_default_if_missing`]. Every key is optional and
//! falls back to the defaults documented on [`IndexConfig`].

use crate::error::{TriageError, TriageResult};
use crate::limits::MAX_FIELD_BYTES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally placed next to the catalogue.
pub const CONFIG_FILE_NAME: &str = "triage-index.toml";

/// How the builder treats a complaint ID that appears more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the build; the previously cached index stays current
    #[default]
    Reject,
    /// The later record's summary wins; postings of both records are kept
    LastWins,
}

/// Search index configuration loaded from `triage-index.toml`.
///
/// # Example
///
/// ```toml
/// ngram_size = 3
/// duplicate_ids = "reject"
/// related_limit = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Length of the n-grams used for partial matching (default: 3)
    pub ngram_size: usize,
    /// Duplicate complaint ID handling (default: reject)
    pub duplicate_ids: DuplicatePolicy,
    /// Default cap for related-complaint queries (default: 5)
    pub related_limit: usize,
    /// Shortest prefix that produces suggestions (default: 2)
    pub suggestion_min_chars: usize,
    /// Default cap for suggestion queries (default: 10)
    pub suggestion_limit: usize,
    /// Longest searchable field that is indexed, in bytes (default: 16KB)
    pub max_field_bytes: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            ngram_size: 3,
            duplicate_ids: DuplicatePolicy::Reject,
            related_limit: 5,
            suggestion_min_chars: 2,
            suggestion_limit: 10,
            max_field_bytes: MAX_FIELD_BYTES,
        }
    }
}

impl IndexConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Config` for a zero n-gram size or field limit.
    pub fn validate(&self) -> TriageResult<()> {
        if self.ngram_size == 0 {
            return Err(TriageError::config("ngram_size must be at least 1"));
        }
        if self.max_field_bytes == 0 {
            return Err(TriageError::config("max_field_bytes must be at least 1"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Triage index configuration
#
# Length of the character n-grams used for partial matching (default: 3)
ngram_size = 3

# Duplicate complaint IDs in one catalogue: "reject" (default) or "last_wins"
#   "reject"    = the build fails and the previous index stays in use
#   "last_wins" = the later record's summary wins, postings of both are kept
duplicate_ids = "reject"

# Default number of related complaints returned (default: 5)
related_limit = 5

# Autocomplete: shortest prefix and default number of suggestions
suggestion_min_chars = 2
suggestion_limit = 10

# Searchable fields longer than this many bytes are skipped (default: 16384)
max_field_bytes = 16384
"#
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml_str(content: &str) -> TriageResult<Self> {
        let config: IndexConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> TriageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            TriageError::Config(msg) => TriageError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> TriageResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> TriageResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TriageError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
