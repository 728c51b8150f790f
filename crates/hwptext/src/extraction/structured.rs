//! Structured binary-format parser interface.
//!
//! The HWP 5 record structure is not parsed here. A [`StructuredParser`]
//! renders the whole document either as plain text or as HTML, and the
//! orchestrator only sees the resulting bytes.
//!
//! [`Hwp5Command`] drives the `hwp5txt` and `hwp5html` tools shipped with
//! pyhwp. Whether they are installed is probed once, up front, by
//! [`Hwp5Command::detect`].

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;
use tracing::debug;

/// Failures reported by a structured parser.
#[derive(Debug, Error)]
pub enum StructuredParserError {
    /// The document's internal structure could not be parsed.
    #[error("invalid document structure: {0}")]
    InvalidStructure(String),

    /// Neither the text nor the HTML rendering produced anything.
    #[error("parser produced no output")]
    NoOutput,

    /// The rendering was non-empty but nothing survived normalization.
    #[error("output was empty after normalization")]
    EmptyAfterNormalization,

    #[error("{0}")]
    Unexpected(String),
}

/// A whole-document renderer for the proprietary binary format.
pub trait StructuredParser: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Render the document as plain text (UTF-8 bytes).
    fn to_text(&self, path: &Path) -> Result<Vec<u8>, StructuredParserError>;

    /// Render the document as HTML (UTF-8 bytes).
    fn to_html(&self, path: &Path) -> Result<Vec<u8>, StructuredParserError>;
}

/// Environment variable overriding the `hwp5txt` executable.
pub const HWP5TXT_ENV: &str = "HWPTEXT_HWP5TXT";
/// Environment variable overriding the `hwp5html` executable.
pub const HWP5HTML_ENV: &str = "HWPTEXT_HWP5HTML";

/// Markers pyhwp prints when the document structure is broken.
const STRUCTURE_ERROR_MARKERS: [&str; 3] = ["ParseError", "InvalidHwp5File", "InvalidOleStorage"];

/// pyhwp command-line tools as a [`StructuredParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hwp5Command {
    txt_program: PathBuf,
    html_program: PathBuf,
}

impl Hwp5Command {
    pub fn new(txt_program: impl Into<PathBuf>, html_program: impl Into<PathBuf>) -> Self {
        Self {
            txt_program: txt_program.into(),
            html_program: html_program.into(),
        }
    }

    /// Program paths from the environment, falling back to `PATH` lookup.
    pub fn from_env() -> Self {
        let txt = env::var_os(HWP5TXT_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("hwp5txt"));
        let html = env::var_os(HWP5HTML_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("hwp5html"));
        Self::new(txt, html)
    }

    /// `Some` when `hwp5txt --version` runs successfully.
    pub fn detect() -> Option<Self> {
        let command = Self::from_env();
        match Command::new(&command.txt_program).arg("--version").output() {
            Ok(output) if output.status.success() => {
                debug!(program = %command.txt_program.display(), "Structured parser available");
                Some(command)
            }
            Ok(output) => {
                debug!(
                    program = %command.txt_program.display(),
                    status = %output.status,
                    "Structured parser probe exited unsuccessfully"
                );
                None
            }
            Err(err) => {
                debug!(program = %command.txt_program.display(), error = %err, "Structured parser not found");
                None
            }
        }
    }

    fn run(&self, program: &Path, args: &[&str], path: &Path) -> Result<Vec<u8>, StructuredParserError> {
        let output = Command::new(program).args(args).arg(path).output().map_err(|e| {
            StructuredParserError::Unexpected(format!("failed to execute {}: {}", program.display(), e))
        })?;
        classify_output(program, output)
    }
}

fn classify_output(program: &Path, output: Output) -> Result<Vec<u8>, StructuredParserError> {
    if output.status.success() {
        return Ok(output.stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let summary = stderr.lines().rev().find(|line| !line.trim().is_empty()).unwrap_or("").trim();
    if STRUCTURE_ERROR_MARKERS.iter().any(|marker| stderr.contains(marker)) {
        return Err(StructuredParserError::InvalidStructure(summary.to_string()));
    }
    Err(StructuredParserError::Unexpected(format!(
        "{} exited with {}: {}",
        program.display(),
        output.status,
        summary
    )))
}

impl StructuredParser for Hwp5Command {
    fn name(&self) -> &str {
        "pyhwp"
    }

    fn to_text(&self, path: &Path) -> Result<Vec<u8>, StructuredParserError> {
        self.run(&self.txt_program, &[], path)
    }

    fn to_html(&self, path: &Path) -> Result<Vec<u8>, StructuredParserError> {
        self.run(&self.html_program, &["--html"], path)
    }
}
