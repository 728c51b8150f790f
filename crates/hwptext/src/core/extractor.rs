//! Main extraction entry points.
//!
//! [`Extractor`] tries the strategies strictly in order: the HWPX container,
//! the structured parser (only when one was injected), then the raw stream
//! decoder. The first non-empty normalized text wins.
//!
//! Strategy failures stay inside the extractor. Only two conditions reach the
//! caller: [`HwpTextError::Exhausted`] when no strategy produced text, and
//! [`HwpTextError::PasswordRequired`] for encrypted documents.

use crate::core::config::ExtractionConfig;
use crate::extraction::streams::{CompoundStreamExtractor, StreamSource};
use crate::extraction::structured::{Hwp5Command, StructuredParser};
use crate::strategies::{ExtractionStrategy, HwpxStrategy, StreamDecodeStrategy, StructuredStrategy};
use crate::text::{EncodingDetector, Normalizer};
use crate::types::{ExtractionResult, StrategyKind, StrategyOutcome};
use crate::{HwpTextError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Appended to the stream-decode label when no structured parser was available.
pub const STRUCTURED_MISSING_NOTE: &str = "structured parser missing";

/// Multi-strategy text extractor.
///
/// # Example
///
/// ```rust,no_run
/// use hwptext::core::config::ExtractionConfig;
/// use hwptext::core::extractor::Extractor;
///
/// # fn main() -> hwptext::Result<()> {
/// let extractor = Extractor::with_detected_capabilities(ExtractionConfig::default());
/// let result = extractor.extract_file("report.hwp")?;
/// eprintln!("Decoded using {} path.", result.label);
/// println!("{}", result.content);
/// # Ok(())
/// # }
/// ```
pub struct Extractor {
    config: ExtractionConfig,
    normalizer: Normalizer,
    detector: EncodingDetector,
    structured: Option<Box<dyn StructuredParser>>,
    streams: Box<dyn StreamSource>,
}

impl Extractor {
    /// Extractor without a structured parser, reading streams with
    /// [`CompoundStreamExtractor`].
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            normalizer: Normalizer::new(&config.normalizer),
            detector: EncodingDetector::new(config.detector.clone()),
            config,
            structured: None,
            streams: Box::new(CompoundStreamExtractor::new()),
        }
    }

    /// Extractor with a structured parser if `hwp5txt` can be found.
    pub fn with_detected_capabilities(config: ExtractionConfig) -> Self {
        let extractor = Self::new(config);
        match Hwp5Command::detect() {
            Some(command) => extractor.with_structured_parser(command),
            None => {
                debug!("No structured parser available, binary documents will be stream-decoded");
                extractor
            }
        }
    }

    pub fn with_structured_parser(mut self, parser: impl StructuredParser + 'static) -> Self {
        self.structured = Some(Box::new(parser));
        self
    }

    pub fn with_stream_source(mut self, source: impl StreamSource + 'static) -> Self {
        self.streams = Box::new(source);
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract normalized text from the document at `path`.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<ExtractionResult> {
        let path = path.as_ref();

        let hwpx = HwpxStrategy::new(&self.config.section_entry_prefix, &self.config.section_entry_suffix);
        let structured = self.structured.as_deref().map(|parser| StructuredStrategy::new(parser));
        let stream_decode =
            StreamDecodeStrategy::new(self.streams.as_ref(), &self.detector, &self.config.body_stream_prefixes);

        let mut pipeline: Vec<&dyn ExtractionStrategy> = vec![&hwpx];
        if let Some(structured) = &structured {
            pipeline.push(structured);
        }
        pipeline.push(&stream_decode);

        let mut diagnostic: Option<String> = None;
        let last = pipeline.len() - 1;

        for (index, strategy) in pipeline.iter().enumerate() {
            let kind = strategy.kind();
            debug!(strategy = %kind, path = %path.display(), "Trying extraction strategy");

            match strategy.attempt(path, &self.normalizer) {
                StrategyOutcome::Success(content) => {
                    let label = self.label_for(kind);
                    info!(strategy = %kind, chars = content.chars().count(), "Extraction succeeded");
                    return Ok(ExtractionResult {
                        content,
                        strategy: kind,
                        label,
                    });
                }
                StrategyOutcome::Empty if index == last => {
                    return Err(HwpTextError::no_textual_content(diagnostic));
                }
                StrategyOutcome::Empty => {
                    debug!(strategy = %kind, "Strategy produced no text");
                }
                StrategyOutcome::Failed(err) if index == last => {
                    return Err(err.into_terminal(diagnostic));
                }
                StrategyOutcome::Failed(err) => {
                    warn!(strategy = %kind, error = %err, "Extraction strategy failed, falling back");
                    diagnostic = Some(err.to_string());
                }
            }
        }

        Err(HwpTextError::no_textual_content(diagnostic))
    }

    fn label_for(&self, kind: StrategyKind) -> String {
        match kind {
            StrategyKind::StreamDecode if self.structured.is_none() => {
                format!("{} ({})", kind, STRUCTURED_MISSING_NOTE)
            }
            other => other.to_string(),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

/// Extract text with the default configuration and whatever structured
/// parser is installed.
pub fn extract_file(path: impl AsRef<Path>) -> Result<ExtractionResult> {
    Extractor::with_detected_capabilities(ExtractionConfig::default()).extract_file(path)
}
