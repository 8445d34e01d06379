//! The immutable search index snapshot
//!
//! This module provides:
//! - ComplaintSummary: denormalized view of one complaint
//! - PostingMap: key → set of complaint IDs, deduplicated on insert
//! - SearchIndex: summaries plus the inverted, n-gram, synonym and title maps
//! - BuildStats: what the builder did while producing an index
//!
//! A `SearchIndex` is only ever produced by
//! [`IndexBuilder`](crate::builder::IndexBuilder) and is never mutated after
//! construction. Rebuilding produces a new instance.

use crate::query::QueryEngine;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use triage_core::{ComplaintId, ComplaintRecord, IndexConfig, RiskLevel, Timestamp};

// ============================================================================
// ComplaintSummary
// ============================================================================

/// Denormalized view of one complaint as stored in the index
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintSummary {
    /// Unique ID
    pub id: ComplaintId,
    /// Group/category code
    pub group: String,
    /// Display title
    pub title: String,
    /// Normalized title, as used by the exact-title index
    pub normalized_title: String,
    /// Display subtitle
    pub subtitle: String,
    /// Every searchable string: title, subtitle, search terms, chips,
    /// synonyms, misconceptions
    pub searchable_text: Vec<String>,
    /// Search terms
    pub search_terms: Vec<String>,
    /// Synonyms
    pub synonyms: Vec<String>,
    /// Chip labels
    pub chips: Vec<String>,
    /// Common misconceptions
    pub common_misconceptions: Vec<String>,
    /// Body-system tags
    pub body_system: Vec<String>,
    /// Severity
    pub severity: u8,
    /// Risk classification
    pub risk_level: RiskLevel,
    /// Fast-track eligibility
    pub is_fast_track: bool,
    /// ICD-10 codes
    pub icd10_codes: Vec<String>,
    /// Search weight
    pub search_weight: f64,
}

impl ComplaintSummary {
    /// Build the summary of a record
    pub fn from_record(record: &ComplaintRecord, normalized_title: String) -> Self {
        ComplaintSummary {
            id: record.id.clone(),
            group: record.group.clone(),
            title: record.title.clone(),
            normalized_title,
            subtitle: record.subtitle.clone(),
            searchable_text: record
                .searchable_fields()
                .map(|(_, text)| text.to_string())
                .collect(),
            search_terms: record.search_terms.clone(),
            synonyms: record.synonyms.clone(),
            chips: record.chips.clone(),
            common_misconceptions: record.common_misconceptions.clone(),
            body_system: record.body_system.clone(),
            severity: record.severity,
            risk_level: record.risk_level,
            is_fast_track: record.is_fast_track,
            icd10_codes: record.icd10_codes.clone(),
            search_weight: record.search_weight,
        }
    }

    /// Whether the two complaints share at least one body-system tag
    pub fn shares_body_system(&self, other: &ComplaintSummary) -> bool {
        self.body_system
            .iter()
            .any(|tag| other.body_system.contains(tag))
    }
}

// ============================================================================
// PostingMap
// ============================================================================

/// Map from an index key to the set of complaint IDs filed under it
///
/// Insertion creates the entry on first use and never stores the same ID
/// twice under one key. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingMap {
    entries: FxHashMap<String, FxHashSet<ComplaintId>>,
}

impl PostingMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// File `id` under `key`
    ///
    /// Returns `true` if the ID was not already present for that key.
    pub fn insert(&mut self, key: &str, id: &ComplaintId) -> bool {
        match self.entries.get_mut(key) {
            Some(ids) => {
                if ids.contains(id) {
                    false
                } else {
                    ids.insert(id.clone())
                }
            }
            None => {
                let mut ids = FxHashSet::default();
                ids.insert(id.clone());
                self.entries.insert(key.to_string(), ids);
                true
            }
        }
    }

    /// IDs filed under `key`, if any
    pub fn get(&self, key: &str) -> Option<&FxHashSet<ComplaintId>> {
        self.entries.get(key)
    }

    /// Whether `key` has any postings
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, in unspecified order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All entries, in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FxHashSet<ComplaintId>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ============================================================================
// BuildStats
// ============================================================================

/// Counters recorded while building an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records that produced a summary
    pub records_indexed: usize,
    /// Records indexed under an empty or whitespace-only ID
    pub blank_ids: usize,
    /// Searchable fields skipped because they failed validation
    pub fields_skipped: usize,
    /// Records whose ID had already been seen in the same build
    pub duplicate_ids: usize,
}

// ============================================================================
// SearchIndex
// ============================================================================

/// Immutable search index over one catalogue snapshot
#[derive(Debug, Clone)]
pub struct SearchIndex {
    pub(crate) built_at: Timestamp,
    pub(crate) version: String,
    pub(crate) config: IndexConfig,
    pub(crate) complaints: BTreeMap<ComplaintId, ComplaintSummary>,
    pub(crate) inverted: PostingMap,
    pub(crate) ngrams: PostingMap,
    pub(crate) synonyms: PostingMap,
    pub(crate) titles: PostingMap,
    pub(crate) stats: BuildStats,
}

impl SearchIndex {
    /// When this index was built
    pub fn built_at(&self) -> Timestamp {
        self.built_at
    }

    /// Version tag of the catalogue it was built from
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Configuration the index was built with
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// N-gram length used by the n-gram index
    pub fn ngram_size(&self) -> usize {
        self.config.ngram_size
    }

    /// Builder counters
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Number of complaints in the index
    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    /// Whether the index has no complaints
    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty()
    }

    /// Token → complaint IDs
    pub fn inverted_index(&self) -> &PostingMap {
        &self.inverted
    }

    /// N-gram → complaint IDs
    pub fn ngram_index(&self) -> &PostingMap {
        &self.ngrams
    }

    /// Normalized synonym → complaint IDs
    pub fn synonym_index(&self) -> &PostingMap {
        &self.synonyms
    }

    /// Normalized title → complaint IDs
    pub fn title_index(&self) -> &PostingMap {
        &self.titles
    }

    /// Whether two indexes hold the same content, ignoring build time
    pub fn same_content(&self, other: &SearchIndex) -> bool {
        self.version == other.version
            && self.config == other.config
            && self.complaints == other.complaints
            && self.inverted == other.inverted
            && self.ngrams == other.ngrams
            && self.synonyms == other.synonyms
            && self.titles == other.titles
    }

    /// Borrow this snapshot for queries
    pub fn query(&self) -> QueryEngine<'_> {
        QueryEngine::new(self)
    }
}
