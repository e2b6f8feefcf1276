//! Detector adapter: turns raw detections into mapper-ready spans

use docscrub_core::Span;
use std::sync::Arc;

use crate::{Detector, Result};

/// Filters applied to raw detections
#[derive(Debug, Clone, Default)]
pub struct AdapterOptions {
    /// Detections scoring below this are dropped
    pub score_threshold: f64,
    /// Categories to keep; empty keeps everything
    pub entities: Vec<String>,
}

/// Wraps a [`Detector`] and normalizes its output.
///
/// `analyze` returns spans sorted by start, non-overlapping and clamped to the
/// text, which is what `docscrub_core::map_runs` expects.
#[derive(Clone)]
pub struct DetectorAdapter {
    detector: Arc<dyn Detector>,
    options: AdapterOptions,
}

impl DetectorAdapter {
    pub fn new(detector: Arc<dyn Detector>) -> Self {
        Self::with_options(detector, AdapterOptions::default())
    }

    pub fn with_options(detector: Arc<dyn Detector>, options: AdapterOptions) -> Self {
        Self { detector, options }
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Sensitive spans of `text`, in char offsets.
    ///
    /// Blank text short-circuits to no spans without calling the detector.
    pub fn analyze(&self, text: &str) -> Result<Vec<Span>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let char_len = text.chars().count();
        let detections = self.detector.detect(text)?;
        let raw_count = detections.len();

        let mut spans: Vec<Span> = detections
            .into_iter()
            .filter(|d| d.score >= self.options.score_threshold)
            .filter(|d| self.accepts(&d.category))
            .filter_map(|d| {
                let end = d.end.min(char_len);
                (d.start < end).then(|| Span::new(d.start, end, d.category))
            })
            .collect();

        // Longest first on equal starts so merges keep the widest category.
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        let spans = merge_overlapping(spans);

        tracing::trace!(
            detector = self.detector.name(),
            raw = raw_count,
            kept = spans.len(),
            "analyzed paragraph"
        );

        Ok(spans)
    }

    fn accepts(&self, category: &str) -> bool {
        self.options.entities.is_empty()
            || self
                .options
                .entities
                .iter()
                .any(|entity| entity.eq_ignore_ascii_case(category))
    }
}

/// Merge spans that share at least one char. Input must be sorted by start.
fn merge_overlapping(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start < last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}
