//! Built-in regex recognizers
//!
//! A local, dependency-free backend. Category names follow the entity names
//! used by Presidio so configs and reports are portable between backends.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{DetectError, Detection, Detector, Result};

lazy_static! {
    // Order matters only for readability; overlaps are merged by the adapter.
    static ref BUILTIN_RECOGNIZERS: Vec<Recognizer> = vec![
        Recognizer::builtin(
            "EMAIL_ADDRESS",
            r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b",
            1.0,
        ),
        Recognizer::builtin("US_SSN", r"\b\d{3}-\d{2}-\d{4}\b", 0.85),
        Recognizer::builtin(
            "CREDIT_CARD",
            r"\b(?:4\d{3}|5[1-5]\d{2}|3[47]\d{2}|6(?:011|5\d{2}))[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{3,4}\b",
            1.0,
        ),
        Recognizer::builtin(
            "PHONE_NUMBER",
            r"(?:\+\d{1,3}[-.\s]?)?(?:\(\d{3}\)\s?|\b\d{3}[-.\s]?)\d{3}[-.\s]?\d{4}\b",
            0.75,
        ),
        Recognizer::builtin(
            "IP_ADDRESS",
            r"\b(?:(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\b",
            0.95,
        ),
        Recognizer::builtin(
            "IBAN_CODE",
            r"\b[A-Z]{2}\d{2}[A-Z0-9]{4}\d{7}(?:[A-Z0-9]?\d{0,16})\b",
            1.0,
        ),
        Recognizer::builtin(
            "DATE_TIME",
            r"\b(?:0[1-9]|1[0-2])[/\-](?:0[1-9]|[12]\d|3[01])[/\-](?:19|20)\d{2}\b",
            0.6,
        ),
        Recognizer::builtin(
            "PERSON",
            r"\b(?:Mr|Mrs|Ms|Miss|Dr|Prof)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?",
            0.85,
        ),
    ];
}

/// User-supplied recognizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Category reported for matches
    pub name: String,
    pub pattern: String,
    #[serde(default = "default_score")]
    pub score: f64,
}

fn default_score() -> f64 {
    0.85
}

#[derive(Debug, Clone)]
struct Recognizer {
    category: String,
    regex: Regex,
    score: f64,
}

impl Recognizer {
    fn builtin(category: &str, pattern: &str, score: f64) -> Self {
        Self {
            category: category.to_string(),
            regex: Regex::new(pattern).expect("builtin recognizer pattern"),
            score,
        }
    }
}

/// Regex-based detector
pub struct PatternDetector {
    recognizers: Vec<Recognizer>,
}

impl PatternDetector {
    /// Detector with the built-in recognizers only
    pub fn new() -> Self {
        Self {
            recognizers: BUILTIN_RECOGNIZERS.clone(),
        }
    }

    /// Built-in recognizers plus `custom` ones
    pub fn with_custom(custom: &[CustomPattern]) -> Result<Self> {
        let mut detector = Self::new();
        for pattern in custom {
            let regex = Regex::new(&pattern.pattern).map_err(|source| DetectError::Pattern {
                name: pattern.name.clone(),
                source,
            })?;
            detector.recognizers.push(Recognizer {
                category: pattern.name.clone(),
                regex,
                score: pattern.score,
            });
        }
        Ok(detector)
    }

    /// Distinct categories this detector can report, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .recognizers
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PatternDetector {
    fn name(&self) -> &str {
        "patterns"
    }

    fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();
        for recognizer in &self.recognizers {
            for m in recognizer.regex.find_iter(text) {
                detections.push(Detection::new(
                    char_offset(text, m.start()),
                    char_offset(text, m.end()),
                    recognizer.category.clone(),
                    recognizer.score,
                ));
            }
        }
        Ok(detections)
    }
}

/// Char index of byte offset `byte` (a char boundary) in `text`
fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}
