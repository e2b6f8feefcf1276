//! Detector trait

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Detector backend error: {0}")]
    Backend(String),

    #[error("Detector timed out: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid detector response: {0}")]
    InvalidResponse(String),

    #[error("Invalid pattern '{name}': {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, DetectError>;

/// One raw finding from a backend, in char offsets of the analyzed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub start: usize,
    pub end: usize,
    pub category: String,
    pub score: f64,
}

impl Detection {
    pub fn new(start: usize, end: usize, category: impl Into<String>, score: f64) -> Self {
        Self {
            start,
            end,
            category: category.into(),
            score,
        }
    }
}

/// A PII detection backend.
///
/// Implementations are shared across concurrent requests, hence `Send + Sync`.
/// Backends that are not reentrant go through [`crate::Serialized`].
pub trait Detector: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Find sensitive regions in `text`. Order and overlap are unconstrained.
    fn detect(&self, text: &str) -> Result<Vec<Detection>>;
}
