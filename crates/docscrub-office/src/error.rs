//! Error types for docscrub-office

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OfficeError>;

#[derive(Error, Debug)]
pub enum OfficeError {
    #[error("Invalid zip package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing part: {0}")]
    MissingPart(String),

    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Malformed part {part}: {message}")]
    Malformed { part: String, message: String },

    #[error("Run {index} out of range ({len} runs)")]
    RunOutOfRange { index: usize, len: usize },
}
