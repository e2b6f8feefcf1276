//! Presidio analyzer backend
//!
//! Talks to a running `presidio-analyzer` service over its REST API. Offsets in
//! its responses are Python string indices, i.e. chars.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{DetectError, Detection, Detector, Result};

#[derive(Debug, Clone)]
pub struct PresidioOptions {
    /// Base URL, e.g. `http://127.0.0.1:5002`
    pub endpoint: String,
    pub language: String,
    pub timeout: Duration,
    /// Forwarded as `score_threshold` when set
    pub score_threshold: Option<f64>,
    /// Forwarded as `entities` when non-empty
    pub entities: Vec<String>,
}

impl Default for PresidioOptions {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5002".to_string(),
            language: "en".to_string(),
            timeout: Duration::from_secs(30),
            score_threshold: None,
            entities: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score_threshold: Option<f64>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    entities: &'a [String],
}

#[derive(Debug, Deserialize)]
struct RecognizerResult {
    entity_type: String,
    start: usize,
    end: usize,
    #[serde(default)]
    score: f64,
}

/// Blocking HTTP client for `POST {endpoint}/analyze`
pub struct PresidioDetector {
    client: reqwest::blocking::Client,
    analyze_url: String,
    options: PresidioOptions,
}

impl PresidioDetector {
    pub fn new(options: PresidioOptions) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .build()?;
        let analyze_url = format!("{}/analyze", options.endpoint.trim_end_matches('/'));

        Ok(Self {
            client,
            analyze_url,
            options,
        })
    }
}

impl Detector for PresidioDetector {
    fn name(&self) -> &str {
        "presidio"
    }

    fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let request = AnalyzeRequest {
            text,
            language: &self.options.language,
            score_threshold: self.options.score_threshold,
            entities: &self.options.entities,
        };

        let response = self
            .client
            .post(&self.analyze_url)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    DetectError::Timeout(self.analyze_url.clone())
                } else {
                    DetectError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DetectError::Backend(format!(
                "analyzer returned {}: {}",
                status,
                body.trim()
            )));
        }

        let body = response.text()?;
        parse_results(&body)
    }
}

fn parse_results(body: &str) -> Result<Vec<Detection>> {
    let results: Vec<RecognizerResult> =
        serde_json::from_str(body).map_err(|e| DetectError::InvalidResponse(e.to_string()))?;

    Ok(results
        .into_iter()
        .map(|r| Detection::new(r.start, r.end, r.entity_type, r.score))
        .collect())
}
