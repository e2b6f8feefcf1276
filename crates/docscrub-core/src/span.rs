//! Span domain model

use serde::{Deserialize, Serialize};

/// A sensitive region of a paragraph, in char offsets of the paragraph text.
///
/// `start..end` is half-open. A span with `start >= end` is malformed; the
/// mapper consumes it without marking anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub category: String,
}

impl Span {
    pub fn new(start: usize, end: usize, category: impl Into<String>) -> Self {
        Self {
            start,
            end,
            category: category.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of chars shared with the half-open interval `start..end`
    pub fn intersection(&self, start: usize, end: usize) -> usize {
        let lo = self.start.max(start);
        let hi = self.end.min(end);
        hi.saturating_sub(lo)
    }
}
