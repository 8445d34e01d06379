//! Read-only lookups against one index snapshot
//!
//! A [`QueryEngine`] borrows a [`SearchIndex`] for the duration of a query,
//! so every lookup in that query sees the same snapshot even if the cache
//! swaps in a rebuilt index meanwhile.
//!
//! Absence is never an error: unknown terms, n-grams, synonyms and IDs all
//! produce empty results. ID lists never contain duplicates and are sorted
//! by ID.

use crate::filter::ComplaintFilter;
use crate::index::{ComplaintSummary, PostingMap, SearchIndex};
use crate::normalizer::{generate_ngrams, normalize, ngrams_for_text, tokenize_unique};
use std::collections::{BTreeMap, BTreeSet};
use triage_core::{ComplaintId, RiskLevel};

/// Which lookup first matched a complaint in [`QueryEngine::search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKind {
    /// The whole query equals the normalized title
    Title,
    /// The normalized title starts with the whole query
    Prefix,
    /// The whole query or one of its tokens is a declared synonym
    Synonym,
    /// A query token appears in the complaint's searchable text
    Term,
    /// A query token shares an n-gram with the complaint's text
    NGram,
}

/// One complaint matched by [`QueryEngine::search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintMatch {
    /// Matched complaint
    pub id: ComplaintId,
    /// First strategy that produced it
    pub kind: MatchKind,
}

/// Aggregate counts over a set of [`ComplaintMatch`]es
///
/// Matches whose ID is unknown to the index count toward `total` and
/// `by_match_kind` only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Number of matches
    pub total: usize,
    /// Matches per risk level
    pub by_risk_level: BTreeMap<RiskLevel, usize>,
    /// Matches per first matching strategy
    pub by_match_kind: BTreeMap<MatchKind, usize>,
    /// Matches eligible for the fast-track flow
    pub fast_track: usize,
    /// Mean severity of the matched complaints, 0.0 when there are none
    pub average_severity: f64,
}

/// Lookups over a borrowed index snapshot
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a SearchIndex,
}

impl<'a> QueryEngine<'a> {
    /// Borrow `index` for querying
    pub fn new(index: &'a SearchIndex) -> Self {
        QueryEngine { index }
    }

    /// The snapshot being queried
    pub fn index(&self) -> &'a SearchIndex {
        self.index
    }

    // ========================================================================
    // Summaries
    // ========================================================================

    /// Every complaint summary, in ID order
    pub fn all_complaint_summaries(&self) -> Vec<&'a ComplaintSummary> {
        self.index.complaints.values().collect()
    }

    /// Summary of one complaint, `None` if the ID is unknown
    pub fn complaint_summary(&self, id: &str) -> Option<&'a ComplaintSummary> {
        self.index.complaints.get(id)
    }

    // ========================================================================
    // Match strategies
    // ========================================================================

    /// Complaints whose searchable text contains `normalized_term` as a token
    pub fn complaints_by_exact_term(&self, normalized_term: &str) -> Vec<ComplaintId> {
        sorted_ids(&self.index.inverted, normalized_term)
    }

    /// Union of the complaints filed under any of `ngrams`
    pub fn complaints_by_ngrams<S: AsRef<str>>(&self, ngrams: &[S]) -> Vec<ComplaintId> {
        let mut found = BTreeSet::new();
        for gram in ngrams {
            if let Some(ids) = self.index.ngrams.get(gram.as_ref()) {
                found.extend(ids.iter().cloned());
            }
        }
        found.into_iter().collect()
    }

    /// Partial match on raw user input
    ///
    /// Normalizes and tokenizes `text` the way indexed text is processed,
    /// then looks up the n-grams of every token.
    pub fn complaints_by_partial_text(&self, text: &str) -> Vec<ComplaintId> {
        self.complaints_by_ngrams(&ngrams_for_text(text, self.index.ngram_size()))
    }

    /// Complaints declaring `normalized_synonym`
    pub fn complaints_by_synonym(&self, normalized_synonym: &str) -> Vec<ComplaintId> {
        sorted_ids(&self.index.synonyms, normalized_synonym)
    }

    /// Complaints whose normalized title is exactly `normalized_title`
    pub fn complaints_by_title(&self, normalized_title: &str) -> Vec<ComplaintId> {
        sorted_ids(&self.index.titles, normalized_title)
    }

    /// Complaints whose normalized title starts with `normalized_prefix`
    ///
    /// An empty prefix matches nothing.
    pub fn complaints_by_title_prefix(&self, normalized_prefix: &str) -> Vec<ComplaintId> {
        if normalized_prefix.is_empty() {
            return Vec::new();
        }
        self.index
            .complaints
            .iter()
            .filter(|(_, summary)| summary.normalized_title.starts_with(normalized_prefix))
            .map(|(id, _)| id.clone())
            .collect()
    }

    // ========================================================================
    // Related complaints
    // ========================================================================

    /// "See also" suggestions for a complaint
    ///
    /// Collects every other complaint in the same group, then every other
    /// complaint sharing a body-system tag, each in ID order, and keeps the
    /// first `limit`. The complaint itself is never included; an unknown ID
    /// yields an empty list.
    pub fn related_complaints(&self, id: &str, limit: usize) -> Vec<ComplaintId> {
        let target = match self.index.complaints.get(id) {
            Some(target) => target,
            None => return Vec::new(),
        };
        if limit == 0 {
            return Vec::new();
        }

        let mut same_group = Vec::new();
        let mut same_system = Vec::new();
        for (other_id, other) in &self.index.complaints {
            if other_id.as_str() == id {
                continue;
            }
            if other.group == target.group {
                same_group.push(other_id);
                if same_group.len() == limit {
                    break;
                }
            } else if target.shares_body_system(other) {
                same_system.push(other_id);
            }
        }

        same_group
            .into_iter()
            .chain(same_system)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Related complaints capped at the configured `related_limit`
    pub fn related_complaints_default(&self, id: &str) -> Vec<ComplaintId> {
        self.related_complaints(id, self.index.config.related_limit)
    }

    // ========================================================================
    // Suggestions
    // ========================================================================

    /// Autocomplete strings for a partial query
    ///
    /// Returns titles, search terms and synonyms, in their original casing,
    /// whose normalized form starts with the normalized `prefix`. Prefixes
    /// shorter than `suggestion_min_chars` produce nothing. Duplicates are
    /// dropped; candidates are visited complaint by complaint in ID order.
    pub fn suggestions(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = normalize(prefix);
        if prefix.chars().count() < self.index.config.suggestion_min_chars.max(1) {
            return Vec::new();
        }

        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for summary in self.index.complaints.values() {
            let candidates = std::iter::once(&summary.title)
                .chain(&summary.search_terms)
                .chain(&summary.synonyms);
            for candidate in candidates {
                if out.len() == limit {
                    return out;
                }
                if normalize(candidate).starts_with(&prefix) && seen.insert(candidate.as_str()) {
                    out.push(candidate.clone());
                }
            }
        }
        out
    }

    /// Suggestions capped at the configured `suggestion_limit`
    pub fn suggestions_default(&self, prefix: &str) -> Vec<String> {
        self.suggestions(prefix, self.index.config.suggestion_limit)
    }

    // ========================================================================
    // Combined search
    // ========================================================================

    /// Union of every match strategy for a free-text query
    ///
    /// The query is normalized once. Strategies are tried in order (exact
    /// title, title prefix, synonym, token, n-gram) and each complaint is
    /// tagged with the first one that found it. No scoring is applied;
    /// results are sorted by ID and optionally narrowed by `filter`.
    pub fn search(&self, query: &str, filter: Option<&ComplaintFilter>) -> Vec<ComplaintMatch> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Vec::new();
        }
        let tokens = tokenize_unique(&normalized);

        let mut hits: BTreeMap<ComplaintId, MatchKind> = BTreeMap::new();
        let mut record = |ids: Vec<ComplaintId>, kind: MatchKind| {
            for id in ids {
                hits.entry(id).or_insert(kind);
            }
        };

        record(self.complaints_by_title(&normalized), MatchKind::Title);
        record(self.complaints_by_title_prefix(&normalized), MatchKind::Prefix);

        record(self.complaints_by_synonym(&normalized), MatchKind::Synonym);
        for token in &tokens {
            record(self.complaints_by_synonym(token), MatchKind::Synonym);
        }

        for token in &tokens {
            record(self.complaints_by_exact_term(token), MatchKind::Term);
        }

        let n = self.index.ngram_size();
        let grams: Vec<String> = tokens
            .iter()
            .flat_map(|token| generate_ngrams(token, n))
            .collect();
        record(self.complaints_by_ngrams(&grams), MatchKind::NGram);

        hits.into_iter()
            .filter(|(id, _)| match filter {
                Some(filter) => self
                    .complaint_summary(id.as_str())
                    .map_or(false, |summary| filter.matches(summary)),
                None => true,
            })
            .map(|(id, kind)| ComplaintMatch { id, kind })
            .collect()
    }

    /// Counts by risk level and match kind, fast-track count and mean
    /// severity of a result set
    pub fn statistics(&self, matches: &[ComplaintMatch]) -> SearchStatistics {
        let mut stats = SearchStatistics {
            total: matches.len(),
            ..SearchStatistics::default()
        };
        let mut severity_sum = 0u64;
        let mut known = 0usize;

        for m in matches {
            *stats.by_match_kind.entry(m.kind).or_insert(0) += 1;
            if let Some(summary) = self.complaint_summary(m.id.as_str()) {
                *stats.by_risk_level.entry(summary.risk_level).or_insert(0) += 1;
                if summary.is_fast_track {
                    stats.fast_track += 1;
                }
                severity_sum += u64::from(summary.severity);
                known += 1;
            }
        }

        if known > 0 {
            stats.average_severity = severity_sum as f64 / known as f64;
        }
        stats
    }
}

/// IDs under `key`, sorted; empty when the key is unknown
fn sorted_ids(map: &PostingMap, key: &str) -> Vec<ComplaintId> {
    let mut ids: Vec<ComplaintId> = map
        .get(key)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::IndexBuilder;
    use triage_core::{Catalogue, ComplaintRecord, RiskLevel};

    fn ids(values: &[&str]) -> Vec<ComplaintId> {
        values.iter().map(|v| ComplaintId::from(*v)).collect()
    }

    fn sample_index() -> SearchIndex {
        let records = vec![
            ComplaintRecord::new("CV_CHEST_PAIN", "CV", "Dor no peito", RiskLevel::High)
                .with_search_terms(["aperto no peito", "dor precordial"])
                .with_synonyms(["dor torácica", "angina"])
                .with_body_system(["cardiovascular"]),
            ComplaintRecord::new("CV_PALPITATIONS", "CV", "Palpitações", RiskLevel::Medium)
                .with_search_terms(["coração acelerado"])
                .with_body_system(["cardiovascular"]),
            ComplaintRecord::new("RC_DYSPNEA", "RESP", "Falta de ar", RiskLevel::High)
                .with_search_terms(["dispneia", "cansaço para respirar"])
                .with_synonyms(["dispnéia"])
                .with_body_system(["respiratory", "cardiovascular"]),
            ComplaintRecord::new("RC_COUGH", "RESP", "Tosse", RiskLevel::Low)
                .with_search_terms(["tosse"])
                .with_synonyms(["tussis"])
                .with_body_system(["respiratory"]),
            ComplaintRecord::new("DERM_RASH", "DERM", "Manchas na pele", RiskLevel::Low)
                .with_body_system(["skin"]),
        ];
        IndexBuilder::default()
            .build(&Catalogue::new("test", records))
            .unwrap()
    }

    #[test]
    fn test_exact_term() {
        let index = sample_index();
        let q = index.query();
        assert_eq!(q.complaints_by_exact_term("peito"), ids(&["CV_CHEST_PAIN"]));
        assert_eq!(
            q.complaints_by_exact_term("dor"),
            ids(&["CV_CHEST_PAIN"])
        );
        assert_eq!(
            q.complaints_by_exact_term("coracao"),
            ids(&["CV_PALPITATIONS"])
        );
    }

    #[test]
    fn test_exact_term_unknown() {
        let index = sample_index();
        assert!(index.query().complaints_by_exact_term("xyzzy").is_empty());
        assert!(index.query().complaints_by_exact_term("").is_empty());
    }

    #[test]
    fn test_ngrams_union_dedup() {
        let index = sample_index();
        let q = index.query();
        // "dor" hits the chest pain record through several strings
        let found = q.complaints_by_ngrams(&["dor", "pei", "tos", "dor"]);
        assert_eq!(found, ids(&["CV_CHEST_PAIN", "RC_COUGH"]));
    }

    #[test]
    fn test_ngrams_empty_input() {
        let index = sample_index();
        let none: [&str; 0] = [];
        assert!(index.query().complaints_by_ngrams(&none).is_empty());
        assert!(index.query().complaints_by_ngrams(&["zzz"]).is_empty());
    }

    #[test]
    fn test_partial_text_typo() {
        let index = sample_index();
        // Misspelled "dispneia" still shares n-grams
        let found = index.query().complaints_by_partial_text("Dispinéia");
        assert!(found.contains(&ComplaintId::from("RC_DYSPNEA")));
    }

    #[test]
    fn test_synonym() {
        let index = sample_index();
        let q = index.query();
        assert_eq!(q.complaints_by_synonym("dor toracica"), ids(&["CV_CHEST_PAIN"]));
        assert_eq!(q.complaints_by_synonym("dispneia"), ids(&["RC_DYSPNEA"]));
        assert!(q.complaints_by_synonym("toracica").is_empty());
    }

    #[test]
    fn test_title() {
        let index = sample_index();
        let q = index.query();
        assert_eq!(q.complaints_by_title("falta de ar"), ids(&["RC_DYSPNEA"]));
        assert!(q.complaints_by_title("falta").is_empty());
    }

    #[test]
    fn test_summaries() {
        let index = sample_index();
        let q = index.query();
        let all = q.all_complaint_summaries();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].id, "CV_CHEST_PAIN");

        let cough = q.complaint_summary("RC_COUGH").unwrap();
        assert_eq!(cough.title, "Tosse");
        assert!(q.complaint_summary("NOPE").is_none());
    }

    #[test]
    fn test_related_group_first() {
        let index = sample_index();
        let related = index.query().related_complaints("CV_PALPITATIONS", 5);
        // Same group first, then body system
        assert_eq!(related, ids(&["CV_CHEST_PAIN", "RC_DYSPNEA"]));
    }

    #[test]
    fn test_related_body_system() {
        let index = sample_index();
        let related = index.query().related_complaints("RC_DYSPNEA", 10);
        assert_eq!(
            related,
            ids(&["RC_COUGH", "CV_CHEST_PAIN", "CV_PALPITATIONS"])
        );
    }

    #[test]
    fn test_related_excludes_self_and_caps() {
        let index = sample_index();
        let q = index.query();
        for summary in q.all_complaint_summaries() {
            for limit in 0..4 {
                let related = q.related_complaints(summary.id.as_str(), limit);
                assert!(related.len() <= limit);
                assert!(!related.contains(&summary.id));
            }
        }
        assert_eq!(q.related_complaints("RC_DYSPNEA", 1), ids(&["RC_COUGH"]));
    }

    #[test]
    fn test_related_unknown_and_isolated() {
        let index = sample_index();
        assert!(index.query().related_complaints("NOPE", 5).is_empty());
        assert!(index.query().related_complaints("DERM_RASH", 5).is_empty());
    }

    #[test]
    fn test_related_default_limit() {
        let index = sample_index();
        let related = index.query().related_complaints_default("RC_DYSPNEA");
        assert_eq!(related.len(), 3);
    }

    #[test]
    fn test_suggestions() {
        let index = sample_index();
        let q = index.query();
        assert_eq!(
            q.suggestions("Dor", 10),
            vec!["Dor no peito", "dor precordial", "dor torácica"]
        );
        assert_eq!(q.suggestions("disp", 10), vec!["dispneia", "dispnéia"]);
        assert_eq!(q.suggestions("dor", 1), vec!["Dor no peito"]);
    }

    #[test]
    fn test_suggestions_default_limit() {
        let index = sample_index();
        assert_eq!(index.config().suggestion_limit, 10);
        assert_eq!(index.query().suggestions_default("dor").len(), 3);
    }

    #[test]
    fn test_suggestions_short_prefix() {
        let index = sample_index();
        assert!(index.query().suggestions("d", 10).is_empty());
        assert!(index.query().suggestions("  ", 10).is_empty());
    }

    #[test]
    fn test_search_union() {
        let index = sample_index();
        let matches = index.query().search("Falta de ar", None);
        assert_eq!(
            matches,
            vec![ComplaintMatch {
                id: ComplaintId::from("RC_DYSPNEA"),
                kind: MatchKind::Title,
            }]
        );
    }

    #[test]
    fn test_search_kinds() {
        let index = sample_index();
        let q = index.query();

        let synonym = q.search("angina", None);
        assert_eq!(synonym[0].kind, MatchKind::Synonym);

        let term = q.search("precordial", None);
        assert_eq!(term[0].id, "CV_CHEST_PAIN");
        assert_eq!(term[0].kind, MatchKind::Term);

        let prefix = q.search("tos", None);
        assert_eq!(prefix[0].id, "RC_COUGH");
        assert_eq!(prefix[0].kind, MatchKind::Prefix);

        let partial = q.search("oss", None);
        assert_eq!(
            partial,
            vec![ComplaintMatch {
                id: ComplaintId::from("RC_COUGH"),
                kind: MatchKind::NGram,
            }]
        );
    }

    #[test]
    fn test_title_prefix() {
        let index = sample_index();
        let q = index.query();
        assert_eq!(q.complaints_by_title_prefix("dor no"), ids(&["CV_CHEST_PAIN"]));
        assert_eq!(
            q.complaints_by_title_prefix("falta de ar"),
            ids(&["RC_DYSPNEA"])
        );
        assert!(q.complaints_by_title_prefix("peito").is_empty());
        assert!(q.complaints_by_title_prefix("").is_empty());
    }

    #[test]
    fn test_search_prefix_after_title() {
        let index = sample_index();
        let matches = index.query().search("Dor no", None);
        assert_eq!(
            matches,
            vec![ComplaintMatch {
                id: ComplaintId::from("CV_CHEST_PAIN"),
                kind: MatchKind::Prefix,
            }]
        );
    }

    #[test]
    fn test_statistics() {
        let index = sample_index();
        let q = index.query();
        let matches = vec![
            ComplaintMatch {
                id: ComplaintId::from("CV_CHEST_PAIN"),
                kind: MatchKind::Prefix,
            },
            ComplaintMatch {
                id: ComplaintId::from("RC_COUGH"),
                kind: MatchKind::Term,
            },
            ComplaintMatch {
                id: ComplaintId::from("RC_DYSPNEA"),
                kind: MatchKind::Term,
            },
            ComplaintMatch {
                id: ComplaintId::from("GHOST"),
                kind: MatchKind::NGram,
            },
        ];

        let stats = q.statistics(&matches);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_risk_level.get(&RiskLevel::High), Some(&2));
        assert_eq!(stats.by_risk_level.get(&RiskLevel::Low), Some(&1));
        assert_eq!(stats.by_risk_level.get(&RiskLevel::Medium), None);
        assert_eq!(stats.by_match_kind.get(&MatchKind::Term), Some(&2));
        assert_eq!(stats.by_match_kind.get(&MatchKind::Prefix), Some(&1));
        assert_eq!(stats.by_match_kind.get(&MatchKind::NGram), Some(&1));
        assert_eq!(stats.fast_track, 0);
        assert_eq!(stats.average_severity, 3.0);
    }

    #[test]
    fn test_statistics_empty() {
        let index = sample_index();
        let stats = index.query().statistics(&[]);
        assert_eq!(stats, SearchStatistics::default());
        assert_eq!(stats.average_severity, 0.0);
    }

    #[test]
    fn test_search_with_filter() {
        let index = sample_index();
        let filter = ComplaintFilter::new().with_risk_levels([RiskLevel::High]);
        let matches = index.query().search("ar peito", Some(&filter));
        let found: Vec<_> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(found, vec!["CV_CHEST_PAIN", "RC_DYSPNEA"]);
    }

    #[test]
    fn test_search_empty_query() {
        let index = sample_index();
        assert!(index.query().search("", None).is_empty());
        assert!(index.query().search("?!", None).is_empty());
    }
}
