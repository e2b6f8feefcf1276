use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Input too large: {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Failed to parse document: {0}")]
    DocumentParse(String),

    #[error("Failed to serialize document: {0}")]
    Serialization(String),

    #[error("Detection failed: {0}")]
    Detection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`] for callers that report failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedFormat,
    InputTooLarge,
    DocumentParse,
    Serialization,
    Detection,
    Io,
    Other,
}

/// Structured failure surfaced instead of an output document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Error::InputTooLarge { .. } => ErrorKind::InputTooLarge,
            Error::DocumentParse(_) => ErrorKind::DocumentParse,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Detection(_) => ErrorKind::Detection,
            Error::Io(_) => ErrorKind::Io,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    pub fn failure(&self) -> Failure {
        Failure {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}
