//! Core domain models and logic for docscrub
//!
//! This crate contains:
//! - Domain models (Span, RedactionDecision, DocumentFormat)
//! - Span-to-run mapper (paragraph offsets to per-run decisions)
//! - Redaction statistics and the error taxonomy shared by all crates

pub mod error;
pub mod format;
pub mod mapper;
pub mod report;
pub mod span;

pub use error::{Error, ErrorKind, Failure, Result};
pub use format::DocumentFormat;
pub use mapper::{RedactionDecision, RunAction, map_runs};
pub use report::{RedactionReport, RedactionStats};
pub use span::Span;
