//! Last-resort decoding of raw body streams.

use super::ExtractionStrategy;
use crate::HwpTextError;
use crate::extraction::streams::StreamSource;
use crate::text::{EncodingDetector, Normalizer};
use crate::types::{StrategyKind, StrategyOutcome};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Runs each body stream through the encoding detector and keeps what
/// survives normalization.
///
/// Unlike the other strategies an empty result is a failure here, since
/// nothing comes after it.
pub struct StreamDecodeStrategy<'a> {
    source: &'a dyn StreamSource,
    detector: &'a EncodingDetector,
    body_prefixes: &'a [String],
}

impl<'a> StreamDecodeStrategy<'a> {
    pub fn new(source: &'a dyn StreamSource, detector: &'a EncodingDetector, body_prefixes: &'a [String]) -> Self {
        Self {
            source,
            detector,
            body_prefixes,
        }
    }

    fn is_body_stream(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.body_prefixes.iter().any(|prefix| lower.starts_with(prefix.as_str()))
    }

    fn extract(&self, path: &Path, normalizer: &Normalizer) -> crate::Result<String> {
        let data = fs::read(path)?;
        let listing = self.source.streams(&data)?;

        let mut fragments = Vec::new();
        for stream in &listing.streams {
            if !self.is_body_stream(&stream.name) {
                continue;
            }

            let detection = self.detector.detect(&stream.data);
            let decoded = detection.text.trim();
            if decoded.is_empty() {
                debug!(stream = %stream.name, "Stream decoded to nothing");
                continue;
            }

            let normalized = normalizer.normalize(decoded);
            debug!(
                stream = %stream.name,
                candidate = ?detection.candidate,
                score = detection.score,
                kept = !normalized.is_empty(),
                "Decoded body stream"
            );
            if !normalized.is_empty() {
                fragments.push(normalized);
            }
        }

        if fragments.is_empty() {
            if listing.encrypted {
                return Err(HwpTextError::PasswordRequired);
            }
            return Err(HwpTextError::no_textual_content(None));
        }
        Ok(fragments.join("\n\n"))
    }
}

impl ExtractionStrategy for StreamDecodeStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StreamDecode
    }

    fn attempt(&self, path: &Path, normalizer: &Normalizer) -> StrategyOutcome {
        match self.extract(path, normalizer) {
            Ok(text) => StrategyOutcome::Success(text),
            Err(err) => StrategyOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::streams::{NamedStream, StreamListing};
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct FixedSource(StreamListing);

    impl StreamSource for FixedSource {
        fn streams(&self, _data: &[u8]) -> crate::Result<StreamListing> {
            Ok(self.0.clone())
        }
    }

    fn stream(name: &str, data: Vec<u8>) -> NamedStream {
        NamedStream {
            name: name.to_string(),
            data,
        }
    }

    // Enough ASCII that the zero bytes mark the buffer as wide.
    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn prefixes() -> Vec<String> {
        vec!["bodytext/".to_string(), "viewtext/".to_string()]
    }

    fn run(listing: StreamListing) -> StrategyOutcome {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"compound bytes").unwrap();
        let source = FixedSource(listing);
        let detector = EncodingDetector::default();
        let prefixes = prefixes();
        StreamDecodeStrategy::new(&source, &detector, &prefixes).attempt(file.path(), &Normalizer::default())
    }

    #[test]
    fn test_joins_body_fragments() {
        let outcome = run(StreamListing {
            encrypted: false,
            streams: vec![
                stream("FileHeader", b"HWP Document File".to_vec()),
                stream("BodyText/Section0", utf16le("1. 첫 번째 구역 (A)")),
                stream("DocInfo", utf16le("문서 정보")),
                stream("BodyText/Section1", utf16le("2. 두 번째 구역 (B)")),
            ],
        });
        match outcome {
            StrategyOutcome::Success(text) => assert_eq!(text, "1. 첫 번째 구역 (A)\n\n2. 두 번째 구역 (B)"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let outcome = run(StreamListing {
            encrypted: false,
            streams: vec![stream("VIEWTEXT/Section0", utf16le("3. 배포용 본문 (C)"))],
        });
        assert!(matches!(outcome, StrategyOutcome::Success(_)));
    }

    #[test]
    fn test_no_body_streams_is_no_textual_content() {
        let outcome = run(StreamListing {
            encrypted: false,
            streams: vec![stream("PrvText", utf16le("미리보기"))],
        });
        match outcome {
            StrategyOutcome::Failed(err) => assert_eq!(err.to_string(), "No textual content found in HWP file."),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_encrypted_without_body_is_password_required() {
        let outcome = run(StreamListing {
            encrypted: true,
            streams: vec![stream("FileHeader", b"HWP Document File".to_vec())],
        });
        match outcome {
            StrategyOutcome::Failed(err) => assert!(err.is_password_required()),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let source = FixedSource(StreamListing::default());
        let detector = EncodingDetector::default();
        let prefixes = prefixes();
        let outcome = StreamDecodeStrategy::new(&source, &detector, &prefixes)
            .attempt(Path::new("/nonexistent/doc.hwp"), &Normalizer::default());
        assert!(matches!(outcome, StrategyOutcome::Failed(HwpTextError::Io(_))));
    }
}
