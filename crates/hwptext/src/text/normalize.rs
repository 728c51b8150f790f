//! Text normalization.
//!
//! Reduces decoded text to newline-separated spans of plausible Korean or
//! Latin prose. Every stage drops material rather than repairing it, so the
//! output is lossy by construction and may be empty.

use crate::core::config::NormalizerConfig;
use crate::text::category::is_letter_or_number;
use crate::text::encoding::is_hangul_syllable;
use once_cell::sync::Lazy;
use regex::Regex;

static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").expect("Control chars regex pattern is valid and should compile")
});
static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Excess newlines regex pattern is valid and should compile"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Whitespace regex pattern is valid and should compile"));
static CANDIDATE_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[가-힣A-Za-z0-9][가-힣A-Za-z0-9\s.,!?…()\-]*")
        .expect("Candidate span regex pattern is valid and should compile")
});

/// Punctuation kept by the character filter.
pub const ALLOWED_PUNCTUATION: &str = ".,!?;:'\"()[]{}<>-–—…%&/+•|#";

/// Whether `ch` survives the per-line character filter.
pub fn is_allowed_char(ch: char) -> bool {
    if ch.is_whitespace() || ALLOWED_PUNCTUATION.contains(ch) {
        return true;
    }
    match ch {
        '0'..='9' | 'A'..='Z' | 'a'..='z' => true,
        '\u{AC00}'..='\u{D7A3}' => true,
        // Hangul Jamo, Hangul Compatibility Jamo
        '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}' => true,
        // CJK Unified Ideographs and Extension A
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' => true,
        // CJK Symbols and Punctuation
        '\u{3000}'..='\u{303F}' => true,
        // General Punctuation
        '\u{2010}'..='\u{205E}' => true,
        _ => is_letter_or_number(ch),
    }
}

/// Line-oriented text sanitizer.
#[derive(Debug, Clone)]
pub struct Normalizer {
    min_hangul_ratio: f64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            min_hangul_ratio: config.min_hangul_ratio,
        }
    }

    /// Normalize `raw` into clean, newline-joined spans.
    ///
    /// Returns an empty string when no line passes every gate.
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned = raw.replace("\r\n", "\n").replace('\r', "\n");
        let cleaned = CONTROL_CHARS.replace_all(&cleaned, "");
        let cleaned = EXCESS_NEWLINES.replace_all(&cleaned, "\n\n");

        cleaned
            .split('\n')
            .filter_map(|line| self.sanitize_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sanitize_line(&self, raw_line: &str) -> Option<String> {
        let filtered: String = raw_line.chars().filter(|&ch| is_allowed_char(ch)).collect();
        let collapsed = WHITESPACE_RUN.replace_all(&filtered, " ");
        let line = collapsed.trim();
        if line.is_empty() {
            return None;
        }

        let span = longest_span(line)?.trim();
        if span.is_empty() {
            return None;
        }

        self.passes_quality_gate(span).then(|| span.to_string())
    }

    fn passes_quality_gate(&self, span: &str) -> bool {
        let mut hangul = 0usize;
        let mut alnum = 0usize;
        let mut has_latin = false;
        for ch in span.chars() {
            if is_hangul_syllable(ch) {
                hangul += 1;
            }
            if is_letter_or_number(ch) {
                alnum += 1;
            }
            if ch.is_ascii_alphabetic() {
                has_latin = true;
            }
        }

        if alnum == 0 {
            return false;
        }
        if (hangul as f64 / alnum as f64) < self.min_hangul_ratio && !has_latin {
            return false;
        }
        true
    }
}

/// The first of the longest anchored spans in `line`, by character count.
fn longest_span(line: &str) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for m in CANDIDATE_SPAN.find_iter(line) {
        let len = m.as_str().chars().count();
        if best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((m.as_str(), len));
        }
    }
    best.map(|(span, _)| span)
}

/// Normalize `raw` with the default thresholds.
pub fn normalize_text(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}
