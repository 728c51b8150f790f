//! Configuration loading and management.
//!
//! The extraction core only ever receives an [`ExtractionConfig`] value. The
//! file loaders and [`ExtractionConfig::discover`] exist for the command-line
//! front end.

use crate::{HwpTextError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bytes inspected when deciding whether a buffer is wide-byte-likely.
pub const DEFAULT_SAMPLE_SIZE: usize = 4096;
/// Zero-byte share of the sample above which a buffer is wide-byte-likely.
pub const DEFAULT_WIDE_BYTE_ZERO_RATIO: f64 = 0.2;
/// Weight of the Hangul ratio in the candidate score.
pub const DEFAULT_HANGUL_WEIGHT: f64 = 0.4;
/// A candidate scoring above this is accepted without trying the rest.
pub const DEFAULT_STRONG_CONFIDENCE: f64 = 1.2;
/// Best score under which a wide-byte buffer is narrowed and re-decoded.
pub const DEFAULT_NARROWING_THRESHOLD: f64 = 0.9;
/// Shortest buffer eligible for narrowing.
pub const DEFAULT_MIN_NARROWING_LEN: usize = 4;
/// Minimum Hangul share of alphanumerics for a span without Latin letters.
pub const DEFAULT_MIN_HANGUL_RATIO: f64 = 0.2;

/// Main extraction configuration.
///
/// Every field has a default, so an empty TOML file is a valid config.
///
/// ```rust
/// use hwptext::core::config::ExtractionConfig;
///
/// let config = ExtractionConfig::default();
/// assert_eq!(config.detector.sample_size, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Encoding detector thresholds.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Normalizer quality gate.
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Lowercase stream-name prefixes holding body text in compound files.
    #[serde(default = "default_body_stream_prefixes")]
    pub body_stream_prefixes: Vec<String>,

    /// Lowercase path prefix of section entries inside an HWPX container.
    #[serde(default = "default_section_entry_prefix")]
    pub section_entry_prefix: String,

    /// Lowercase path suffix of section entries inside an HWPX container.
    #[serde(default = "default_section_entry_suffix")]
    pub section_entry_suffix: String,
}

/// Encoding detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    #[serde(default = "default_wide_byte_zero_ratio")]
    pub wide_byte_zero_ratio: f64,

    #[serde(default = "default_hangul_weight")]
    pub hangul_weight: f64,

    #[serde(default = "default_strong_confidence")]
    pub strong_confidence: f64,

    #[serde(default = "default_narrowing_threshold")]
    pub narrowing_threshold: f64,

    #[serde(default = "default_min_narrowing_len")]
    pub min_narrowing_len: usize,
}

/// Normalizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default = "default_min_hangul_ratio")]
    pub min_hangul_ratio: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            normalizer: NormalizerConfig::default(),
            body_stream_prefixes: default_body_stream_prefixes(),
            section_entry_prefix: default_section_entry_prefix(),
            section_entry_suffix: default_section_entry_suffix(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            wide_byte_zero_ratio: DEFAULT_WIDE_BYTE_ZERO_RATIO,
            hangul_weight: DEFAULT_HANGUL_WEIGHT,
            strong_confidence: DEFAULT_STRONG_CONFIDENCE,
            narrowing_threshold: DEFAULT_NARROWING_THRESHOLD,
            min_narrowing_len: DEFAULT_MIN_NARROWING_LEN,
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_hangul_ratio: DEFAULT_MIN_HANGUL_RATIO,
        }
    }
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_wide_byte_zero_ratio() -> f64 {
    DEFAULT_WIDE_BYTE_ZERO_RATIO
}

fn default_hangul_weight() -> f64 {
    DEFAULT_HANGUL_WEIGHT
}

fn default_strong_confidence() -> f64 {
    DEFAULT_STRONG_CONFIDENCE
}

fn default_narrowing_threshold() -> f64 {
    DEFAULT_NARROWING_THRESHOLD
}

fn default_min_narrowing_len() -> usize {
    DEFAULT_MIN_NARROWING_LEN
}

fn default_min_hangul_ratio() -> f64 {
    DEFAULT_MIN_HANGUL_RATIO
}

fn default_body_stream_prefixes() -> Vec<String> {
    vec!["bodytext/".to_string(), "viewtext/".to_string()]
}

fn default_section_entry_prefix() -> String {
    "contents/section".to_string()
}

fn default_section_entry_suffix() -> String {
    ".xml".to_string()
}

impl ExtractionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            HwpTextError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| HwpTextError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            HwpTextError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| HwpTextError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, picking the parser from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Discover `hwptext.toml` in the current directory or one of its parents.
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(HwpTextError::Io)?;

        loop {
            let candidate = current.join("hwptext.toml");
            if candidate.exists() {
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Reject values that would make the heuristics meaningless.
    pub fn validate(&self) -> Result<()> {
        let detector = &self.detector;
        if detector.sample_size == 0 {
            return Err(HwpTextError::validation("detector.sample_size must be > 0"));
        }
        if !(0.0..=1.0).contains(&detector.wide_byte_zero_ratio) {
            return Err(HwpTextError::validation(format!(
                "detector.wide_byte_zero_ratio must be within [0, 1], got {}",
                detector.wide_byte_zero_ratio
            )));
        }
        if detector.hangul_weight < 0.0 {
            return Err(HwpTextError::validation("detector.hangul_weight must be >= 0"));
        }
        if detector.narrowing_threshold > detector.strong_confidence {
            return Err(HwpTextError::validation(
                "detector.narrowing_threshold must not exceed detector.strong_confidence",
            ));
        }
        if !(0.0..=1.0).contains(&self.normalizer.min_hangul_ratio) {
            return Err(HwpTextError::validation(format!(
                "normalizer.min_hangul_ratio must be within [0, 1], got {}",
                self.normalizer.min_hangul_ratio
            )));
        }
        if self.body_stream_prefixes.is_empty() {
            return Err(HwpTextError::validation("body_stream_prefixes must not be empty"));
        }
        // Entry and stream names are lowercased before matching.
        let patterns = self
            .body_stream_prefixes
            .iter()
            .map(|prefix| ("body_stream_prefixes", prefix))
            .chain([
                ("section_entry_prefix", &self.section_entry_prefix),
                ("section_entry_suffix", &self.section_entry_suffix),
            ]);
        for (field, pattern) in patterns {
            if pattern.chars().any(char::is_uppercase) {
                return Err(HwpTextError::validation(format!(
                    "{field} must be lowercase, got {pattern:?}"
                )));
            }
        }
        Ok(())
    }
}
