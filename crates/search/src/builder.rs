//! Index construction
//!
//! One synchronous pass over the catalogue. Each record is processed to
//! completion before the next begins:
//!
//! 1. Validate and normalize every searchable field
//! 2. Tokenize; file each token the record has not produced yet under the
//!    inverted index, and its n-grams under the n-gram index
//! 3. File each synonym, normalized as a whole, under the synonym index
//! 4. File the normalized title under the title index
//! 5. Record the summary
//!
//! A field that fails validation is skipped and the rest of the record is
//! still indexed. Only a duplicate ID under [`DuplicatePolicy::Reject`]
//! aborts the build. Blank IDs are indexed like any other, with a warning.

use crate::index::{BuildStats, ComplaintSummary, PostingMap, SearchIndex};
use crate::normalizer::{generate_ngrams, normalize, tokenize};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::time::Instant;
use triage_core::limits::validate_field;
use triage_core::{
    Catalogue, ComplaintId, ComplaintRecord, DuplicatePolicy, IndexConfig, SearchableField,
    Timestamp, TriageError, TriageResult,
};

/// Builds [`SearchIndex`] snapshots from catalogues
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    config: IndexConfig,
}

impl IndexBuilder {
    /// Create a builder with the given configuration
    pub fn new(config: IndexConfig) -> Self {
        IndexBuilder { config }
    }

    /// The builder's configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Build an index over every record of `catalogue`
    ///
    /// # Errors
    ///
    /// - `TriageError::Config` if the configuration is invalid
    /// - `TriageError::DuplicateComplaintId` if an ID repeats and the
    ///   duplicate policy is `Reject`
    pub fn build(&self, catalogue: &Catalogue) -> TriageResult<SearchIndex> {
        self.config.validate()?;
        let started = Instant::now();

        let mut index = SearchIndex {
            built_at: Timestamp::now(),
            version: catalogue.version.clone(),
            config: self.config.clone(),
            complaints: BTreeMap::new(),
            inverted: PostingMap::new(),
            ngrams: PostingMap::new(),
            synonyms: PostingMap::new(),
            titles: PostingMap::new(),
            stats: BuildStats::default(),
        };

        let mut seen: FxHashSet<ComplaintId> = FxHashSet::default();
        for record in &catalogue.complaints {
            if record.id.is_blank() {
                tracing::warn!(
                    target: "triage::index",
                    title = %record.title,
                    "Indexing complaint with blank ID"
                );
                index.stats.blank_ids += 1;
            }

            if !seen.insert(record.id.clone()) {
                match self.config.duplicate_ids {
                    DuplicatePolicy::Reject => {
                        tracing::warn!(
                            target: "triage::index",
                            complaint = %record.id,
                            "Duplicate complaint ID, aborting build"
                        );
                        return Err(TriageError::DuplicateComplaintId {
                            id: record.id.clone(),
                        });
                    }
                    DuplicatePolicy::LastWins => {
                        tracing::warn!(
                            target: "triage::index",
                            complaint = %record.id,
                            "Duplicate complaint ID, later summary replaces earlier"
                        );
                        index.stats.duplicate_ids += 1;
                    }
                }
            }

            self.index_record(&mut index, record)?;
        }

        tracing::info!(
            target: "triage::index",
            version = %index.version,
            complaints = index.complaints.len(),
            terms = index.inverted.len(),
            ngrams = index.ngrams.len(),
            synonyms = index.synonyms.len(),
            fields_skipped = index.stats.fields_skipped,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Search index built"
        );

        Ok(index)
    }

    fn index_record(
        &self,
        index: &mut SearchIndex,
        record: &ComplaintRecord,
    ) -> TriageResult<()> {
        let id = &record.id;
        let mut processed: FxHashSet<String> = FxHashSet::default();
        let mut normalized_title = String::new();

        for (field, text) in record.searchable_fields() {
            let normalized = match self.normalize_field(id, field, text) {
                Ok(normalized) => normalized,
                Err(e) if e.is_fatal_for_build() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        target: "triage::index",
                        complaint = %id,
                        field = %field,
                        error = %e,
                        "Skipping unindexable field"
                    );
                    index.stats.fields_skipped += 1;
                    continue;
                }
            };

            for token in tokenize(&normalized) {
                if processed.contains(&token) {
                    continue;
                }
                index.inverted.insert(&token, id);
                for gram in generate_ngrams(&token, index.config.ngram_size) {
                    index.ngrams.insert(&gram, id);
                }
                processed.insert(token);
            }

            match field {
                SearchableField::Synonym if !normalized.is_empty() => {
                    index.synonyms.insert(&normalized, id);
                }
                SearchableField::Title => normalized_title = normalized,
                _ => {}
            }
        }

        if !normalized_title.is_empty() {
            index.titles.insert(&normalized_title, id);
        }

        index.complaints.insert(
            id.clone(),
            ComplaintSummary::from_record(record, normalized_title),
        );
        index.stats.records_indexed += 1;
        Ok(())
    }

    fn normalize_field(
        &self,
        id: &ComplaintId,
        field: SearchableField,
        text: &str,
    ) -> TriageResult<String> {
        validate_field(text, self.config.max_field_bytes).map_err(|reason| {
            TriageError::InvalidField {
                id: id.clone(),
                field,
                reason,
            }
        })?;
        Ok(normalize(text))
    }
}
