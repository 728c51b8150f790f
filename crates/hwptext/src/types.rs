use crate::error::HwpTextError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which extraction strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Section XML read out of a zip container (HWPX).
    Hwpx,
    /// Plain text or HTML rendered by the structured binary-format parser.
    Structured,
    /// Body streams of the compound file run through the encoding detector.
    StreamDecode,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Hwpx => "hwpx",
            StrategyKind::Structured => "structured",
            StrategyKind::StreamDecode => "smart_decode",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful extraction.
///
/// `label` is meant for diagnostics only. It names the winning strategy and,
/// for the stream fallback, notes when the structured parser was unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub content: String,
    pub strategy: StrategyKind,
    pub label: String,
}

/// What a single strategy reports back to the orchestrator.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// Non-empty normalized text.
    Success(String),
    /// Not applicable to this file, or ran cleanly without usable text.
    Empty,
    /// The strategy raised an error while processing.
    Failed(HwpTextError),
}

impl StrategyOutcome {
    /// Wrap normalized text, mapping the empty string to `Empty`.
    pub fn from_text(text: String) -> Self {
        if text.is_empty() {
            StrategyOutcome::Empty
        } else {
            StrategyOutcome::Success(text)
        }
    }
}
