//! hwptext - readable text out of HWP and HWPX documents
//!
//! Three strategies are tried in order until one yields normalized text:
//! the HWPX zip container, a structured parser for the binary format (when
//! one is installed), and a last-resort decode of the raw body streams with
//! encoding detection.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hwptext::extract_file;
//!
//! # fn main() -> hwptext::Result<()> {
//! let result = extract_file("report.hwp")?;
//! eprintln!("Decoded using {} path.", result.label);
//! println!("{}", result.content);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): orchestration and configuration
//! - **Strategies** (`strategies`): one module per extraction method
//! - **Extraction** (`extraction`): zip, HTML, structured parser and compound-file adapters
//! - **Text** (`text`): encoding detection and normalization

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extraction;
pub mod strategies;
pub mod text;
pub mod types;

pub use error::{HwpTextError, Result};
pub use types::{ExtractionResult, StrategyKind, StrategyOutcome};

pub use core::config::{DetectorConfig, ExtractionConfig, NormalizerConfig};
pub use core::extractor::{Extractor, extract_file};

pub use extraction::{CompoundStreamExtractor, Hwp5Command, StreamSource, StructuredParser, StructuredParserError};
pub use text::{EncodingDetector, Normalizer, normalize_text, smart_decode};
