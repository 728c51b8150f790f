//! Extraction strategies.
//!
//! Each strategy turns a document path into a [`StrategyOutcome`]. None of
//! them propagate errors; the orchestrator in [`crate::core::extractor`]
//! decides what a failure means.

pub mod hwpx;
pub mod stream_decode;
pub mod structured;

use crate::text::Normalizer;
use crate::types::{StrategyKind, StrategyOutcome};
use std::path::Path;

pub use hwpx::HwpxStrategy;
pub use stream_decode::StreamDecodeStrategy;
pub use structured::StructuredStrategy;

/// One self-contained way of obtaining text from a document.
pub trait ExtractionStrategy {
    fn kind(&self) -> StrategyKind;

    /// Run the strategy and normalize whatever it produced.
    fn attempt(&self, path: &Path, normalizer: &Normalizer) -> StrategyOutcome;
}
