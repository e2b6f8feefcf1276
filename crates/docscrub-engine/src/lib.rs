use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use docscrub_config::{Config, DetectorBackend, DetectorConfig, RedactionConfig, WordStyle};
use docscrub_core::format::redacted_filename;
use docscrub_core::{DocumentFormat, Error, RedactionReport, Result};
use docscrub_detect::{
    AdapterOptions, CustomPattern, Detector, DetectorAdapter, PatternDetector, PresidioDetector,
    PresidioOptions,
};
use docscrub_office::{
    DocumentContainer, OfficeError, OfficeOptions, SlideOptions, WordOptions, WordRedaction,
    open_container, redact_container,
};

/// A redacted document ready to hand back to the caller
#[derive(Debug, Clone)]
pub struct RedactedDocument {
    pub bytes: Vec<u8>,
    /// Suggested file name, `redacted_<sanitized input name>`
    pub filename: String,
    pub content_type: &'static str,
    pub report: RedactionReport,
}

/// Request-scoped redaction pipeline.
///
/// Holds the shared detector and the redaction settings; each call to
/// [`redact`](Self::redact) processes one document start to finish.
#[derive(Clone)]
pub struct Redactor {
    adapter: DetectorAdapter,
    options: OfficeOptions,
    max_input_bytes: usize,
}

impl Redactor {
    pub fn new(detector: Arc<dyn Detector>, config: &Config) -> Self {
        let adapter = DetectorAdapter::with_options(
            detector,
            AdapterOptions {
                score_threshold: config.detector.score_threshold,
                entities: config.detector.entities.clone(),
            },
        );

        Self {
            adapter,
            options: office_options(&config.redaction),
            max_input_bytes: config.max_input_bytes,
        }
    }

    /// Build the configured detector backend and wrap it
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let detector = build_detector(&config.detector)?;
        Ok(Self::new(detector, config))
    }

    pub fn adapter(&self) -> &DetectorAdapter {
        &self.adapter
    }

    /// Redact one document held in memory.
    ///
    /// The format comes from `filename`'s extension. Detection failures are
    /// absorbed per paragraph and show up in the report; parse and
    /// serialization failures abort with no output.
    pub fn redact(&self, filename: &str, bytes: &[u8]) -> Result<RedactedDocument> {
        let format = DocumentFormat::from_filename(filename)?;
        if bytes.len() > self.max_input_bytes {
            return Err(Error::InputTooLarge {
                size: bytes.len(),
                limit: self.max_input_bytes,
            });
        }

        let mut container = open_container(format, bytes, &self.options)
            .map_err(|e| Error::DocumentParse(e.to_string()))?;

        self.redact_opened(filename, bytes, container.as_mut())
    }

    /// Walk an opened container, serialize it and build the report
    fn redact_opened(
        &self,
        filename: &str,
        bytes: &[u8],
        container: &mut dyn DocumentContainer,
    ) -> Result<RedactedDocument> {
        let format = container.format();
        let stats = redact_container(container, &self.adapter);

        let output = container.serialize().map_err(serialize_error)?;

        let report = RedactionReport {
            format,
            input_name: filename.to_string(),
            output_name: redacted_filename(filename),
            stats,
            input_hash: blake3::hash(bytes).to_hex().to_string(),
            output_hash: blake3::hash(&output).to_hex().to_string(),
        };

        tracing::info!(
            format = %format,
            detector = self.adapter.detector_name(),
            paragraphs = report.stats.paragraphs_scanned,
            redacted_runs = report.stats.redacted_runs,
            skipped = report.stats.skipped_paragraphs,
            spans = report.stats.span_count(),
            "Redacted document"
        );

        Ok(RedactedDocument {
            bytes: output,
            filename: report.output_name.clone(),
            content_type: format.content_type(),
            report,
        })
    }

    /// Read `path`, redact it on the blocking pool and return the result
    pub async fn redact_file(&self, path: &Path) -> Result<RedactedDocument> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?
            .to_string();
        DocumentFormat::from_filename(&filename)?;

        let size = tokio::fs::metadata(path).await?.len();
        if size > self.max_input_bytes as u64 {
            return Err(Error::InputTooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                limit: self.max_input_bytes,
            });
        }

        let bytes = tokio::fs::read(path).await?;
        let redactor = self.clone();
        tokio::task::spawn_blocking(move || redactor.redact(&filename, &bytes))
            .await
            .map_err(|e| Error::Other(anyhow::Error::new(e)))?
    }
}

/// Instantiate the detector backend named in `config`
pub fn build_detector(config: &DetectorConfig) -> anyhow::Result<Arc<dyn Detector>> {
    let detector: Arc<dyn Detector> = match config.backend {
        DetectorBackend::Patterns => {
            let custom: Vec<CustomPattern> = config
                .patterns
                .iter()
                .map(|p| CustomPattern {
                    name: p.name.clone(),
                    pattern: p.pattern.clone(),
                    score: p.score,
                })
                .collect();
            Arc::new(PatternDetector::with_custom(&custom)?)
        }
        DetectorBackend::Presidio => Arc::new(PresidioDetector::new(PresidioOptions {
            endpoint: config.presidio.endpoint.clone(),
            language: config.language.clone(),
            timeout: Duration::from_secs(config.presidio.timeout_secs),
            score_threshold: (config.score_threshold > 0.0).then_some(config.score_threshold),
            entities: config.entities.clone(),
        })?),
    };

    tracing::debug!(backend = detector.name(), "Built detector");
    Ok(detector)
}

fn office_options(config: &RedactionConfig) -> OfficeOptions {
    let style = match config.word_style {
        WordStyle::Overlay => WordRedaction::Overlay,
        WordStyle::Substitute => WordRedaction::Substitute,
    };

    OfficeOptions {
        word: WordOptions {
            style,
            mask_char: config.mask_char,
            fallback_half_points: (config.fallback_font_size_pt * 2.0).round() as u32,
        },
        slides: SlideOptions {
            mask_char: config.mask_char,
            fallback_size: (config.fallback_font_size_pt * 100.0).round() as u32,
        },
    }
}

fn serialize_error(err: OfficeError) -> Error {
    Error::Serialization(err.to_string())
}
