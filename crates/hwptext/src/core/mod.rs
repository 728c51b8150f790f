//! Core extraction orchestration.
//!
//! - [`config`] - tunable thresholds and the loaders for config files
//! - [`extractor`] - the strategy pipeline and the `extract_file` entry point

pub mod config;
pub mod extractor;

pub use config::{DetectorConfig, ExtractionConfig, NormalizerConfig};
pub use extractor::{Extractor, extract_file};
