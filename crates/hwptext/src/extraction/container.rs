//! HWPX container access.
//!
//! HWPX documents are zip archives whose body lives in
//! `Contents/section0.xml`, `Contents/section1.xml`, and so on.

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Local file header signature every zip archive starts with.
pub const ZIP_SIGNATURE: [u8; 4] = *b"PK\x03\x04";

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("Markup tag regex pattern is valid and should compile"));

/// A section entry read out of the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    pub name: String,
    pub xml: String,
}

/// Whether the file at `path` starts with the zip local file header.
///
/// Files shorter than four bytes are not zip containers.
pub fn has_zip_signature(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut signature = [0u8; 4];
    let mut filled = 0;
    while filled < signature.len() {
        let read = file.read(&mut signature[filled..])?;
        if read == 0 {
            return Ok(false);
        }
        filled += read;
    }
    Ok(signature == ZIP_SIGNATURE)
}

/// Whether `name` looks like a section entry, compared case-insensitively.
pub fn is_section_entry(name: &str, prefix: &str, suffix: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with(prefix) && lower.ends_with(suffix)
}

/// Read every section entry of the zip container at `path`, sorted by name.
///
/// Entries that are not valid UTF-8 are decoded lossily. Returns an empty
/// vector when the archive has no section entries.
pub fn read_section_entries(path: &Path, prefix: &str, suffix: &str) -> Result<Vec<SectionEntry>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| is_section_entry(name, prefix, suffix))
        .map(str::to_string)
        .collect();
    names.sort();

    let mut sections = Vec::with_capacity(names.len());
    for name in names {
        let mut entry = archive.by_name(&name)?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;

        let xml = match String::from_utf8(bytes) {
            Ok(xml) => xml,
            Err(err) => {
                debug!(entry = %name, "Section entry is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        sections.push(SectionEntry { name, xml });
    }

    Ok(sections)
}

/// Replace every markup tag with a single space.
pub fn strip_markup(xml: &str) -> String {
    MARKUP_TAG.replace_all(xml, " ").into_owned()
}
