//! Property-based tests for the search index
//!
//! Tests invariants:
//! - Every token of every searchable string is found by exact-term search
//! - N-gram search over a token's n-grams finds at least the exact matches
//! - Synonym lookup ignores case and accents
//! - Related complaints never include the queried complaint or exceed the limit
//! - Rebuilding the same catalogue yields the same content
//! - Every catalogue ID has a summary

use proptest::prelude::*;
use triage_core::{Catalogue, ComplaintRecord, DuplicatePolicy, IndexConfig, RiskLevel};
use triage_search::{generate_ngrams, normalize, tokenize, IndexBuilder};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

// ============================================================================
// Strategies
// ============================================================================

/// `text` with every diacritic removed, case untouched
fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Words with a sprinkling of Portuguese accents and mixed case
fn arb_word() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "dor", "Peito", "cabeça", "FEBRE", "tosse", "náusea", "vômito", "falta", "ar", "pele",
        "coração", "olho", "ouvido", "garganta", "cãibra", "x",
    ])
    .prop_map(String::from)
}

fn arb_phrase() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_word(), 1..4).prop_map(|words| words.join(" "))
}

fn arb_risk() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![
        Just(RiskLevel::Low),
        Just(RiskLevel::Medium),
        Just(RiskLevel::High)
    ]
}

fn arb_record(id: usize) -> impl Strategy<Value = ComplaintRecord> {
    (
        prop::sample::select(vec!["CV", "RESP", "NEURO", "DERM"]),
        arb_phrase(),
        prop::collection::vec(arb_phrase(), 0..3),
        prop::collection::vec(arb_phrase(), 0..3),
        prop::collection::vec(
            prop::sample::select(vec!["cardiovascular", "respiratory", "skin", "ent"]),
            0..3,
        ),
        arb_risk(),
    )
        .prop_map(move |(group, title, terms, synonyms, systems, risk)| {
            ComplaintRecord::new(format!("C{:03}", id), group, title, risk)
                .with_search_terms(terms)
                .with_synonyms(synonyms)
                .with_body_system(systems)
        })
}

fn arb_catalogue() -> impl Strategy<Value = Catalogue> {
    (1usize..12)
        .prop_flat_map(|n| (0..n).map(arb_record).collect::<Vec<_>>())
        .prop_map(|records| Catalogue::new("prop", records))
}

fn build(catalogue: &Catalogue) -> triage_search::SearchIndex {
    IndexBuilder::new(IndexConfig {
        duplicate_ids: DuplicatePolicy::Reject,
        ..IndexConfig::default()
    })
    .build(catalogue)
    .unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_token_is_found(catalogue in arb_catalogue()) {
        let index = build(&catalogue);
        let q = index.query();
        for record in &catalogue.complaints {
            for (_, text) in record.searchable_fields() {
                for token in tokenize(&normalize(text)) {
                    let found = q.complaints_by_exact_term(&token);
                    prop_assert!(found.contains(&record.id), "{} missing for {}", token, record.id);
                }
            }
        }
    }

    #[test]
    fn prop_ngram_superset_of_exact(catalogue in arb_catalogue(), word in arb_word()) {
        let index = build(&catalogue);
        let q = index.query();
        for token in tokenize(&normalize(&word)) {
            let exact = q.complaints_by_exact_term(&token);
            let partial = q.complaints_by_ngrams(&generate_ngrams(&token, index.ngram_size()));
            for id in &exact {
                prop_assert!(partial.contains(id));
            }
        }
    }

    #[test]
    fn prop_synonym_case_and_accent_invariant(catalogue in arb_catalogue()) {
        let index = build(&catalogue);
        let q = index.query();
        for record in &catalogue.complaints {
            for synonym in &record.synonyms {
                let lower = q.complaints_by_synonym(&normalize(&synonym.to_lowercase()));
                let upper = q.complaints_by_synonym(&normalize(&synonym.to_uppercase()));
                let bare = q.complaints_by_synonym(&normalize(&strip_accents(synonym)));
                let bare_upper =
                    q.complaints_by_synonym(&normalize(&strip_accents(&synonym.to_uppercase())));
                prop_assert!(lower.contains(&record.id));
                prop_assert_eq!(&lower, &upper);
                prop_assert_eq!(&lower, &bare);
                prop_assert_eq!(&lower, &bare_upper);
            }
        }
    }

    #[test]
    fn prop_related_bounds(catalogue in arb_catalogue(), limit in 0usize..6) {
        let index = build(&catalogue);
        let q = index.query();
        for record in &catalogue.complaints {
            let related = q.related_complaints(record.id.as_str(), limit);
            prop_assert!(related.len() <= limit);
            prop_assert!(!related.contains(&record.id));

            let mut unique = related.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), related.len());
        }
    }

    #[test]
    fn prop_rebuild_idempotent(catalogue in arb_catalogue()) {
        let first = build(&catalogue);
        let second = build(&catalogue);
        prop_assert!(first.same_content(&second));
    }

    #[test]
    fn prop_every_id_has_summary(catalogue in arb_catalogue()) {
        let index = build(&catalogue);
        let q = index.query();
        prop_assert_eq!(q.all_complaint_summaries().len(), catalogue.len());
        for record in &catalogue.complaints {
            let summary = q.complaint_summary(record.id.as_str());
            prop_assert!(summary.is_some());
            prop_assert_eq!(&summary.unwrap().title, &record.title);
        }
    }

    #[test]
    fn prop_normalize_idempotent(text in "[a-zA-ZÀ-ÿ0-9 .,!?_-]{0,40}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }
}
