use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for docscrub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inputs larger than this are rejected before parsing
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    #[serde(default)]
    pub redaction: RedactionConfig,

    #[serde(default)]
    pub detector: DetectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Glyph repeated over substituted text
    #[serde(default = "default_mask_char")]
    pub mask_char: char,

    /// Size forced onto substituted runs that inherit theirs
    #[serde(default = "default_font_size_pt")]
    pub fallback_font_size_pt: f32,

    #[serde(default)]
    pub word_style: WordStyle,
}

/// How Word runs are obliterated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStyle {
    /// Black highlight and black text over the original characters
    #[default]
    Overlay,
    /// Replace the characters with the mask glyph
    Substitute,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorBackend {
    /// Built-in regex recognizers
    #[default]
    Patterns,
    /// Remote presidio-analyzer service
    Presidio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default)]
    pub backend: DetectorBackend,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub score_threshold: f64,

    /// Entity categories to redact; empty redacts every category
    #[serde(default)]
    pub entities: Vec<String>,

    /// Extra recognizers for the patterns backend
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,

    #[serde(default)]
    pub presidio: PresidioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    pub name: String,
    pub pattern: String,
    #[serde(default = "default_pattern_score")]
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresidioConfig {
    #[serde(default = "default_presidio_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            redaction: RedactionConfig::default(),
            detector: DetectorConfig::default(),
        }
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            mask_char: default_mask_char(),
            fallback_font_size_pt: default_font_size_pt(),
            word_style: WordStyle::default(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            backend: DetectorBackend::default(),
            language: default_language(),
            score_threshold: 0.0,
            entities: Vec::new(),
            patterns: Vec::new(),
            presidio: PresidioConfig::default(),
        }
    }
}

impl Default for PresidioConfig {
    fn default() -> Self {
        Self {
            endpoint: default_presidio_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_input_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_mask_char() -> char {
    '█'
}

fn default_font_size_pt() -> f32 {
    11.0
}

fn default_language() -> String {
    "en".to_string()
}

fn default_pattern_score() -> f64 {
    0.85
}

fn default_presidio_endpoint() -> String {
    "http://127.0.0.1:5002".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file; it must exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "docscrub", "docscrub") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.docscrub/config.toml")
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.redaction.mask_char.is_control() || self.redaction.mask_char.is_whitespace() {
            anyhow::bail!(
                "redaction.mask_char must be a visible character, got {:?}",
                self.redaction.mask_char
            );
        }
        if !(self.redaction.fallback_font_size_pt > 0.0) {
            anyhow::bail!("redaction.fallback_font_size_pt must be positive");
        }
        if !(0.0..=1.0).contains(&self.detector.score_threshold) {
            anyhow::bail!("detector.score_threshold must be between 0 and 1");
        }
        if self.max_input_bytes == 0 {
            anyhow::bail!("max_input_bytes must be positive");
        }
        Ok(())
    }
}
