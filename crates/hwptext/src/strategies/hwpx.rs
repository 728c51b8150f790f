//! Section XML of an HWPX zip container.

use super::ExtractionStrategy;
use crate::Result;
use crate::extraction::container::{has_zip_signature, read_section_entries, strip_markup};
use crate::text::Normalizer;
use crate::types::{StrategyKind, StrategyOutcome};
use std::path::Path;
use tracing::debug;

/// Reads `Contents/section*.xml` and strips the markup.
///
/// Never fails: a missing signature, a malformed archive or an I/O error all
/// count as "not applicable".
#[derive(Debug, Clone)]
pub struct HwpxStrategy {
    entry_prefix: String,
    entry_suffix: String,
}

impl HwpxStrategy {
    pub fn new(entry_prefix: impl Into<String>, entry_suffix: impl Into<String>) -> Self {
        Self {
            entry_prefix: entry_prefix.into(),
            entry_suffix: entry_suffix.into(),
        }
    }

    fn raw_text(&self, path: &Path) -> Result<Option<String>> {
        if !has_zip_signature(path)? {
            return Ok(None);
        }

        let sections = read_section_entries(path, &self.entry_prefix, &self.entry_suffix)?;
        if sections.is_empty() {
            debug!(path = %path.display(), "Zip container has no section entries");
            return Ok(None);
        }

        let text = sections
            .iter()
            .map(|section| strip_markup(&section.xml))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Some(text))
    }
}

impl ExtractionStrategy for HwpxStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Hwpx
    }

    fn attempt(&self, path: &Path, normalizer: &Normalizer) -> StrategyOutcome {
        match self.raw_text(path) {
            Ok(Some(text)) => StrategyOutcome::from_text(normalizer.normalize(&text)),
            Ok(None) => StrategyOutcome::Empty,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "HWPX container unreadable, skipping");
                StrategyOutcome::Empty
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zip::write::SimpleFileOptions;

    fn strategy() -> HwpxStrategy {
        HwpxStrategy::new("contents/section", ".xml")
    }

    #[test]
    fn test_reads_sections_in_order() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        writer.start_file("Contents/section1.xml", SimpleFileOptions::default()).unwrap();
        writer.write_all("<hp:p><hp:t>둘째 문단</hp:t></hp:p>".as_bytes()).unwrap();
        writer.start_file("Contents/section0.xml", SimpleFileOptions::default()).unwrap();
        writer.write_all("<hp:p><hp:t>첫째 문단</hp:t></hp:p>".as_bytes()).unwrap();
        writer.finish().unwrap();

        match strategy().attempt(file.path(), &Normalizer::default()) {
            StrategyOutcome::Success(text) => assert_eq!(text, "첫째 문단\n둘째 문단"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_non_zip_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"HWP Document File").unwrap();
        assert!(matches!(
            strategy().attempt(file.path(), &Normalizer::default()),
            StrategyOutcome::Empty
        ));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let outcome = strategy().attempt(Path::new("/nonexistent/doc.hwpx"), &Normalizer::default());
        assert!(matches!(outcome, StrategyOutcome::Empty));
    }

    #[test]
    fn test_corrupt_zip_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"PK\x03\x04garbage that is not an archive").unwrap();
        assert!(matches!(
            strategy().attempt(file.path(), &Normalizer::default()),
            StrategyOutcome::Empty
        ));
    }

    #[test]
    fn test_markup_only_sections_are_empty() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        writer.start_file("Contents/section0.xml", SimpleFileOptions::default()).unwrap();
        writer.write_all(b"<hp:p><hp:t></hp:t></hp:p>").unwrap();
        writer.finish().unwrap();

        assert!(matches!(
            strategy().attempt(file.path(), &Normalizer::default()),
            StrategyOutcome::Empty
        ));
    }
}
