//! Attribute filters over complaint summaries
//!
//! Every criterion left empty (or `None`) matches everything, so
//! `ComplaintFilter::default()` keeps all complaints.

use crate::index::ComplaintSummary;
use crate::query::QueryEngine;
use triage_core::{ComplaintId, RiskLevel};

/// Conjunction of optional criteria on a complaint's attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Accepted risk levels
    pub risk_levels: Vec<RiskLevel>,
    /// Accepted body systems; a complaint matches if it has any of them
    pub body_systems: Vec<String>,
    /// Accepted group codes
    pub group_codes: Vec<String>,
    /// Minimum severity, inclusive
    pub min_severity: Option<u8>,
    /// Keep only fast-track complaints
    pub only_fast_track: bool,
}

impl ComplaintFilter {
    /// A filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given risk levels
    pub fn with_risk_levels(mut self, levels: impl IntoIterator<Item = RiskLevel>) -> Self {
        self.risk_levels = levels.into_iter().collect();
        self
    }

    /// Restrict to complaints tagged with any of the given body systems
    pub fn with_body_systems<I, S>(mut self, systems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body_systems = systems.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to the given group codes
    pub fn with_group_codes<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_codes = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Require at least this severity
    pub fn with_min_severity(mut self, severity: u8) -> Self {
        self.min_severity = Some(severity);
        self
    }

    /// Keep only fast-track complaints
    pub fn fast_track_only(mut self) -> Self {
        self.only_fast_track = true;
        self
    }

    /// Whether no criterion is set
    pub fn is_empty(&self) -> bool {
        self == &ComplaintFilter::default()
    }

    /// Whether `summary` satisfies every criterion
    pub fn matches(&self, summary: &ComplaintSummary) -> bool {
        if !self.risk_levels.is_empty() && !self.risk_levels.contains(&summary.risk_level) {
            return false;
        }
        if !self.group_codes.is_empty() && !self.group_codes.contains(&summary.group) {
            return false;
        }
        if !self.body_systems.is_empty()
            && !summary
                .body_system
                .iter()
                .any(|tag| self.body_systems.contains(tag))
        {
            return false;
        }
        if let Some(min) = self.min_severity {
            if summary.severity < min {
                return false;
            }
        }
        !self.only_fast_track || summary.is_fast_track
    }

    /// Keep the IDs whose summaries match, preserving order
    ///
    /// IDs unknown to the engine's index are dropped.
    pub fn apply(&self, engine: &QueryEngine<'_>, ids: &[ComplaintId]) -> Vec<ComplaintId> {
        ids.iter()
            .filter(|id| {
                engine
                    .complaint_summary(id.as_str())
                    .map_or(false, |summary| self.matches(summary))
            })
            .cloned()
            .collect()
    }
}
