//! Mutex wrapper for detectors that cannot be called concurrently

use std::sync::Mutex;

use crate::{DetectError, Detection, Detector, Result};

/// A detector that needs exclusive access while analyzing
pub trait ExclusiveDetector: Send {
    fn name(&self) -> &str;

    fn detect(&mut self, text: &str) -> Result<Vec<Detection>>;
}

/// Shares one [`ExclusiveDetector`] between concurrent requests by
/// serializing calls behind a mutex.
pub struct Serialized<D> {
    name: String,
    inner: Mutex<D>,
}

impl<D: ExclusiveDetector> Serialized<D> {
    pub fn new(detector: D) -> Self {
        Self {
            name: detector.name().to_string(),
            inner: Mutex::new(detector),
        }
    }

    pub fn into_inner(self) -> Result<D> {
        self.inner
            .into_inner()
            .map_err(|_| DetectError::Backend(format!("{} lock poisoned", self.name)))
    }
}

impl<D: ExclusiveDetector> Detector for Serialized<D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let mut detector = self
            .inner
            .lock()
            .map_err(|_| DetectError::Backend(format!("{} lock poisoned", self.name)))?;
        detector.detect(text)
    }
}
