//! Redaction pass statistics and reports

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{DocumentFormat, Span};

/// Counters accumulated while walking one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionStats {
    /// Non-blank paragraphs handed to the detector
    pub paragraphs_scanned: usize,
    /// Paragraphs with at least one redacted run
    pub paragraphs_redacted: usize,
    pub redacted_runs: usize,
    /// Paragraphs left untouched because detection or redaction failed
    pub skipped_paragraphs: usize,
    /// Detected span count per category
    pub categories: BTreeMap<String, usize>,
}

impl RedactionStats {
    pub fn record_spans(&mut self, spans: &[Span]) {
        for span in spans {
            *self.categories.entry(span.category.clone()).or_default() += 1;
        }
    }

    pub fn merge(&mut self, other: RedactionStats) {
        self.paragraphs_scanned += other.paragraphs_scanned;
        self.paragraphs_redacted += other.paragraphs_redacted;
        self.redacted_runs += other.redacted_runs;
        self.skipped_paragraphs += other.skipped_paragraphs;
        for (category, count) in other.categories {
            *self.categories.entry(category).or_default() += count;
        }
    }

    pub fn span_count(&self) -> usize {
        self.categories.values().sum()
    }
}

/// Summary of one redacted document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionReport {
    pub format: DocumentFormat,
    pub input_name: String,
    pub output_name: String,
    #[serde(flatten)]
    pub stats: RedactionStats,
    pub input_hash: String,
    pub output_hash: String,
}
