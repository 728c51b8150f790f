//! Whole-document rendering through a [`StructuredParser`].

use super::ExtractionStrategy;
use crate::extraction::html::html_text_content;
use crate::extraction::structured::{StructuredParser, StructuredParserError};
use crate::text::Normalizer;
use crate::types::{StrategyKind, StrategyOutcome};
use std::path::Path;
use tracing::debug;

/// Plain-text rendering first, HTML rendering when that comes back blank.
pub struct StructuredStrategy<'a> {
    parser: &'a dyn StructuredParser,
}

impl<'a> StructuredStrategy<'a> {
    pub fn new(parser: &'a dyn StructuredParser) -> Self {
        Self { parser }
    }

    fn raw_text(&self, path: &Path) -> Result<String, StructuredParserError> {
        let text = self.parser.to_text(path)?;
        if !text.trim_ascii().is_empty() {
            return Ok(String::from_utf8_lossy(&text).into_owned());
        }

        debug!(parser = self.parser.name(), "Text rendering was blank, trying HTML");
        let html = self.parser.to_html(path)?;
        if html.trim_ascii().is_empty() {
            return Err(StructuredParserError::NoOutput);
        }
        Ok(html_text_content(&String::from_utf8_lossy(&html)))
    }
}

impl ExtractionStrategy for StructuredStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Structured
    }

    fn attempt(&self, path: &Path, normalizer: &Normalizer) -> StrategyOutcome {
        match self.raw_text(path) {
            Ok(text) => {
                let normalized = normalizer.normalize(&text);
                if normalized.is_empty() {
                    StrategyOutcome::Failed(StructuredParserError::EmptyAfterNormalization.into())
                } else {
                    StrategyOutcome::Success(normalized)
                }
            }
            Err(err) => StrategyOutcome::Failed(err.into()),
        }
    }
}
