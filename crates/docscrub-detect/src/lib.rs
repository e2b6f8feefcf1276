//! PII detection for paragraph text
//!
//! Detection backends implement [`Detector`]; the [`DetectorAdapter`] wraps one
//! and guarantees the span contract the mapper relies on (sorted,
//! non-overlapping, in char offsets).
//!
//! The built-in backends are safe to call concurrently. A third-party
//! recognizer that needs `&mut self` (a stateful model, a single-session
//! client) implements [`ExclusiveDetector`] instead and is shared through
//! [`Serialized`], which turns it into a [`Detector`] by taking a mutex around
//! each call.

pub mod adapter;
pub mod detector;
pub mod patterns;
pub mod presidio;
pub mod serialized;

pub use adapter::{AdapterOptions, DetectorAdapter};
pub use detector::{DetectError, Detection, Detector, Result};
pub use patterns::{CustomPattern, PatternDetector};
pub use presidio::{PresidioDetector, PresidioOptions};
pub use serialized::{ExclusiveDetector, Serialized};
