//! Supported document container formats

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::{Error, Result};

const REDACTED_PREFIX: &str = "redacted_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Word document (`.docx`)
    Docx,
    /// PowerPoint presentation (`.pptx`)
    Pptx,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Docx, DocumentFormat::Pptx];

    /// Resolve the format from a file name's extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| Error::UnsupportedFormat(filename.to_string()))?;

        Self::from_extension(&extension)
            .ok_or_else(|| Error::UnsupportedFormat(filename.to_string()))
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pptx => "pptx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Suggested name for the redacted copy of `filename`.
///
/// Directory components are dropped, accented letters are transliterated
/// through NFKD (`é` -> `e`), other non-ASCII characters are removed and any
/// remaining character outside `[A-Za-z0-9._-]` becomes `_`, so the result is
/// safe to join onto an output directory.
pub fn redacted_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = base
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches(['.', '_']);

    if sanitized.is_empty() {
        format!("{}document", REDACTED_PREFIX)
    } else {
        format!("{}{}", REDACTED_PREFIX, sanitized)
    }
}
