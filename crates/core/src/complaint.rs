//! Complaint records as supplied by the catalogue
//!
//! A complaint is one reason-for-visit in the triage catalogue. Records are
//! read-only to the index: the builder copies what it needs into summaries
//! and never mutates the catalogue.
//!
//! ## Wire shape
//!
//! Records deserialize from the catalogue JSON with camelCase keys. List
//! fields may be omitted, `severity` defaults to 3 and `searchWeight` to 1.0.
//! Keys the index has no use for (`ageTargets`, `isTopForAdult`, ...) are
//! ignored.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ============================================================================
// ComplaintId
// ============================================================================

/// Unique identifier of a complaint (e.g. `"CV_CHEST_PAIN_TYPICAL"`)
///
/// Borrows as `str` so index maps can be queried with plain string slices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(String);

impl ComplaintId {
    /// Create an ID from any string
    pub fn new(id: impl Into<String>) -> Self {
        ComplaintId(id.into())
    }

    /// The ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the ID is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ComplaintId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ComplaintId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComplaintId {
    fn from(s: &str) -> Self {
        ComplaintId(s.to_string())
    }
}

impl From<String> for ComplaintId {
    fn from(s: String) -> Self {
        ComplaintId(s)
    }
}

impl PartialEq<str> for ComplaintId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ComplaintId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// RiskLevel
// ============================================================================

/// Triage risk classification of a complaint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk, candidate for immediate attention
    High,
}

impl RiskLevel {
    /// Lowercase name as used in catalogue files
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SearchableField
// ============================================================================

/// The record fields whose text is indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchableField {
    /// `title`
    Title,
    /// `subtitle`
    Subtitle,
    /// One entry of `searchTerms`
    SearchTerm,
    /// One entry of `chips`
    Chip,
    /// One entry of `synonyms`
    Synonym,
    /// One entry of `commonMisconceptions`
    Misconception,
}

impl SearchableField {
    /// Field name used in log messages and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchableField::Title => "title",
            SearchableField::Subtitle => "subtitle",
            SearchableField::SearchTerm => "search term",
            SearchableField::Chip => "chip",
            SearchableField::Synonym => "synonym",
            SearchableField::Misconception => "misconception",
        }
    }
}

impl fmt::Display for SearchableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ComplaintRecord
// ============================================================================

fn default_severity() -> u8 {
    3
}

fn default_search_weight() -> f64 {
    1.0
}

/// One entry of the complaint catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    /// Unique ID
    pub id: ComplaintId,
    /// Group/category code (e.g. `"CV"`)
    pub group: String,
    /// Display title
    pub title: String,
    /// Display subtitle
    #[serde(default)]
    pub subtitle: String,
    /// Free-text search terms, in catalogue order
    #[serde(default)]
    pub search_terms: Vec<String>,
    /// Alternate names for the complaint
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Short UI chip labels
    #[serde(default)]
    pub chips: Vec<String>,
    /// Phrasings patients commonly use for the wrong concept
    #[serde(default)]
    pub common_misconceptions: Vec<String>,
    /// Body-system tags
    #[serde(default)]
    pub body_system: Vec<String>,
    /// Severity, higher is more severe
    #[serde(default = "default_severity")]
    pub severity: u8,
    /// Risk classification
    pub risk_level: RiskLevel,
    /// Eligible for the fast-track flow
    #[serde(default)]
    pub is_fast_track: bool,
    /// ICD-10 classification codes
    #[serde(default)]
    pub icd10_codes: Vec<String>,
    /// Search weight multiplier
    #[serde(default = "default_search_weight")]
    pub search_weight: f64,
}

impl ComplaintRecord {
    /// Create a record with the required fields and defaults elsewhere
    pub fn new(
        id: impl Into<ComplaintId>,
        group: impl Into<String>,
        title: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        ComplaintRecord {
            id: id.into(),
            group: group.into(),
            title: title.into(),
            subtitle: String::new(),
            search_terms: Vec::new(),
            synonyms: Vec::new(),
            chips: Vec::new(),
            common_misconceptions: Vec::new(),
            body_system: Vec::new(),
            severity: default_severity(),
            risk_level,
            is_fast_track: false,
            icd10_codes: Vec::new(),
            search_weight: default_search_weight(),
        }
    }

    /// Set the subtitle
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Set the search terms
    pub fn with_search_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Set the synonyms
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    /// Set the chip labels
    pub fn with_chips<I, S>(mut self, chips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chips = chips.into_iter().map(Into::into).collect();
        self
    }

    /// Set the common misconceptions
    pub fn with_misconceptions<I, S>(mut self, misconceptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_misconceptions = misconceptions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the body-system tags
    pub fn with_body_system<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body_system = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ICD-10 codes
    pub fn with_icd10_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.icd10_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: u8) -> Self {
        self.severity = severity;
        self
    }

    /// Mark as fast-track eligible
    pub fn fast_track(mut self, is_fast_track: bool) -> Self {
        self.is_fast_track = is_fast_track;
        self
    }

    /// Set the search weight
    pub fn with_search_weight(mut self, weight: f64) -> Self {
        self.search_weight = weight;
        self
    }

    /// Every searchable string with the field it came from
    ///
    /// Order: title, subtitle, search terms, chips, synonyms, misconceptions.
    pub fn searchable_fields(&self) -> impl Iterator<Item = (SearchableField, &str)> {
        let single = [
            (SearchableField::Title, self.title.as_str()),
            (SearchableField::Subtitle, self.subtitle.as_str()),
        ];
        single
            .into_iter()
            .chain(tagged(SearchableField::SearchTerm, &self.search_terms))
            .chain(tagged(SearchableField::Chip, &self.chips))
            .chain(tagged(SearchableField::Synonym, &self.synonyms))
            .chain(tagged(
                SearchableField::Misconception,
                &self.common_misconceptions,
            ))
    }
}

fn tagged(
    field: SearchableField,
    values: &[String],
) -> impl Iterator<Item = (SearchableField, &str)> {
    values.iter().map(move |v| (field, v.as_str()))
}
