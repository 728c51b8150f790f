//! Heuristic byte-to-text decoding.
//!
//! Body streams of legacy documents carry no charset declaration. The
//! detector decodes the buffer with an ordered list of candidate codecs,
//! scores every result and keeps the best one. A candidate scoring above the
//! strong-confidence threshold wins immediately.
//!
//! Buffers with many zero bytes are treated as wide-byte-likely: the UTF-16
//! candidates go first, and when nothing scores well the buffer is narrowed
//! to every other byte and the 8-bit candidates are tried again.

use crate::core::config::DetectorConfig;
use crate::text::category::{is_letter, is_printable};
use encoding_rs::{EUC_KR, Encoding, UTF_8, UTF_16BE, UTF_16LE};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// A codec the detector knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Codec {
    Utf16Le,
    Utf16Be,
    /// UTF-16 with BOM sniffing, little-endian when no BOM is present.
    Utf16,
    /// Unified Hangul Code (Windows code page 949).
    Cp949,
    /// Plain EUC-KR restricted to the KS X 1001 double-byte range.
    EucKr,
    Utf8,
}

impl Codec {
    pub fn label(&self) -> &'static str {
        match self {
            Codec::Utf16Le => "utf-16-le",
            Codec::Utf16Be => "utf-16-be",
            Codec::Utf16 => "utf-16",
            Codec::Cp949 => "cp949",
            Codec::EucKr => "euc-kr",
            Codec::Utf8 => "utf-8",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How malformed input is handled while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leniency {
    /// Any malformed sequence fails the whole decode.
    Strict,
    /// Malformed sequences become U+FFFD.
    Replace,
}

/// One (codec, leniency) pair in the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    pub codec: Codec,
    pub leniency: Leniency,
}

impl Candidate {
    pub const fn strict(codec: Codec) -> Self {
        Self {
            codec,
            leniency: Leniency::Strict,
        }
    }

    pub const fn lenient(codec: Codec) -> Self {
        Self {
            codec,
            leniency: Leniency::Replace,
        }
    }

    /// Decode `bytes`. Returns `None` only for strict candidates that hit a
    /// malformed sequence.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let strict = self.leniency == Leniency::Strict;
        match self.codec {
            Codec::Utf16Le => decode_with(UTF_16LE, bytes, strict),
            Codec::Utf16Be => decode_with(UTF_16BE, bytes, strict),
            Codec::Utf16 => {
                if strict {
                    decode_with(UTF_16LE, bytes, true)
                } else {
                    Some(decode_utf16_sniffed(bytes))
                }
            }
            Codec::Cp949 => decode_with(EUC_KR, bytes, strict),
            Codec::EucKr => decode_ks_x_1001(bytes, strict),
            Codec::Utf8 => decode_with(UTF_8, bytes, strict),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.leniency {
            Leniency::Strict => write!(f, "{}", self.codec),
            Leniency::Replace => write!(f, "{} (replace)", self.codec),
        }
    }
}

/// Candidates tried for wide-byte-likely buffers, before the 8-bit ones.
pub const WIDE_CANDIDATES: [Candidate; 3] = [
    Candidate::strict(Codec::Utf16Le),
    Candidate::strict(Codec::Utf16Be),
    Candidate::lenient(Codec::Utf16),
];

/// Candidates tried for every buffer, and again for the narrowed buffer.
pub const LEGACY_CANDIDATES: [Candidate; 3] = [
    Candidate::lenient(Codec::Cp949),
    Candidate::lenient(Codec::EucKr),
    Candidate::lenient(Codec::Utf8),
];

fn decode_with(encoding: &'static Encoding, bytes: &[u8], strict: bool) -> Option<String> {
    if strict {
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned)
    } else {
        let (text, _) = encoding.decode_without_bom_handling(bytes);
        Some(text.into_owned())
    }
}

/// Lenient UTF-16 that honours a UTF-16 byte order mark only.
fn decode_utf16_sniffed(bytes: &[u8]) -> String {
    let (encoding, body) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (UTF_16LE, rest),
        [0xFE, 0xFF, rest @ ..] => (UTF_16BE, rest),
        _ => (UTF_16LE, bytes),
    };
    let (text, _) = encoding.decode_without_bom_handling(body);
    text.into_owned()
}

fn is_ks_x_1001_byte(byte: u8) -> bool {
    (0xA1..=0xFE).contains(&byte)
}

/// EUC-KR without the UHC extensions that `EUC_KR` in `encoding_rs` accepts.
///
/// Conforming runs are decoded in one go; every non-conforming byte becomes a
/// single U+FFFD (or fails the decode when strict).
fn decode_ks_x_1001(bytes: &[u8], strict: bool) -> Option<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if byte < 0x80 {
            i += 1;
            continue;
        }
        if is_ks_x_1001_byte(byte) && bytes.get(i + 1).copied().is_some_and(is_ks_x_1001_byte) {
            i += 2;
            continue;
        }

        if strict {
            return None;
        }
        let (run, _) = EUC_KR.decode_without_bom_handling(&bytes[run_start..i]);
        out.push_str(&run);
        out.push(char::REPLACEMENT_CHARACTER);
        i += 1;
        run_start = i;
    }

    let (run, _) = EUC_KR.decode_without_bom_handling(&bytes[run_start..]);
    out.push_str(&run);
    Some(out)
}

/// Whether `ch` is in the precomposed Hangul syllable block.
#[inline]
pub fn is_hangul_syllable(ch: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&ch)
}

/// Fraction of characters that are printable, newline or tab.
pub fn printable_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut printable = 0usize;
    for ch in text.chars() {
        total += 1;
        if ch == '\n' || ch == '\t' || is_printable(ch) {
            printable += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    printable as f64 / total as f64
}

/// Fraction of alphabetic characters that are Hangul syllables.
pub fn hangul_ratio(text: &str) -> f64 {
    let mut letters = 0usize;
    let mut hangul = 0usize;
    for ch in text.chars() {
        if is_letter(ch) {
            letters += 1;
        }
        if is_hangul_syllable(ch) {
            hangul += 1;
        }
    }
    if letters == 0 {
        return 0.0;
    }
    hangul as f64 / letters as f64
}

/// Scores a decoded candidate; higher is more plausible.
pub trait Scorer {
    fn score(&self, text: &str) -> f64;
}

impl<F> Scorer for F
where
    F: Fn(&str) -> f64,
{
    fn score(&self, text: &str) -> f64 {
        self(text)
    }
}

/// `printable_ratio + weight * hangul_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HangulScorer {
    pub hangul_weight: f64,
}

impl Default for HangulScorer {
    fn default() -> Self {
        Self {
            hangul_weight: crate::core::config::DEFAULT_HANGUL_WEIGHT,
        }
    }
}

impl Scorer for HangulScorer {
    fn score(&self, text: &str) -> f64 {
        printable_ratio(text) + self.hangul_weight * hangul_ratio(text)
    }
}

/// Whether the first `sample_size` bytes contain more than `zero_ratio` zeros.
pub fn looks_wide_byte(raw: &[u8], sample_size: usize, zero_ratio: f64) -> bool {
    let sample = &raw[..raw.len().min(sample_size)];
    let zeros = sample.iter().filter(|&&b| b == 0).count();
    zeros as f64 > sample.len() as f64 * zero_ratio
}

/// Every other byte, starting with the first.
pub fn narrow(raw: &[u8]) -> Vec<u8> {
    raw.iter().step_by(2).copied().collect()
}

/// One decode attempt, in the order it was made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    pub candidate: Candidate,
    pub narrowed: bool,
    /// `None` when the decode itself failed.
    pub score: Option<f64>,
}

/// The detector's verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub text: String,
    /// Winning candidate, `None` when nothing decoded.
    pub candidate: Option<Candidate>,
    pub score: f64,
    /// Whether the winner came from the narrowed buffer.
    pub narrowed: bool,
    pub wide_byte_likely: bool,
    pub attempts: Vec<Attempt>,
}

impl Detection {
    fn empty(wide_byte_likely: bool) -> Self {
        Self {
            text: String::new(),
            candidate: None,
            score: -1.0,
            narrowed: false,
            wide_byte_likely,
            attempts: Vec::new(),
        }
    }
}

/// Candidate-list encoding detector with a pluggable scorer.
#[derive(Debug, Clone)]
pub struct EncodingDetector<S = HangulScorer> {
    config: DetectorConfig,
    scorer: S,
}

impl EncodingDetector<HangulScorer> {
    pub fn new(config: DetectorConfig) -> Self {
        let scorer = HangulScorer {
            hangul_weight: config.hangul_weight,
        };
        Self { config, scorer }
    }
}

impl Default for EncodingDetector<HangulScorer> {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl<S: Scorer> EncodingDetector<S> {
    pub fn with_scorer(config: DetectorConfig, scorer: S) -> Self {
        Self { config, scorer }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The ordered candidate list for the first pass.
    pub fn candidates(&self, wide_byte_likely: bool) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(WIDE_CANDIDATES.len() + LEGACY_CANDIDATES.len());
        if wide_byte_likely {
            candidates.extend_from_slice(&WIDE_CANDIDATES);
        }
        candidates.extend_from_slice(&LEGACY_CANDIDATES);
        candidates
    }

    /// Decode `raw` with the best-scoring candidate.
    pub fn detect(&self, raw: &[u8]) -> Detection {
        let wide = looks_wide_byte(raw, self.config.sample_size, self.config.wide_byte_zero_ratio);
        let mut best = Detection::empty(wide);
        if raw.is_empty() {
            return best;
        }

        if self.run_pass(raw, &self.candidates(wide), false, &mut best) {
            return best;
        }

        if wide && best.score < self.config.narrowing_threshold && raw.len() >= self.config.min_narrowing_len {
            let narrowed = narrow(raw);
            debug!(
                best_score = best.score,
                narrowed_len = narrowed.len(),
                "Wide-byte buffer scored poorly, retrying on every other byte"
            );
            self.run_pass(&narrowed, &LEGACY_CANDIDATES, true, &mut best);
        }

        best
    }

    /// Score each candidate against `bytes`, updating `best`. Returns `true`
    /// when a candidate cleared the strong-confidence threshold.
    fn run_pass(&self, bytes: &[u8], candidates: &[Candidate], narrowed: bool, best: &mut Detection) -> bool {
        for candidate in candidates {
            let Some(text) = candidate.decode(bytes) else {
                debug!(candidate = %candidate, narrowed, "Candidate failed to decode");
                best.attempts.push(Attempt {
                    candidate: *candidate,
                    narrowed,
                    score: None,
                });
                continue;
            };

            let score = self.scorer.score(&text);
            debug!(candidate = %candidate, narrowed, score, "Scored candidate");
            best.attempts.push(Attempt {
                candidate: *candidate,
                narrowed,
                score: Some(score),
            });

            let strong = score > self.config.strong_confidence;
            if score > best.score || strong {
                best.text = text;
                best.candidate = Some(*candidate);
                best.score = score;
                best.narrowed = narrowed;
            }
            if strong {
                return true;
            }
        }
        false
    }
}

/// Decode `raw` with the default detector and return only the text.
pub fn smart_decode(raw: &[u8]) -> String {
    EncodingDetector::default().detect(raw).text
}
