//! Fixture builders shared by the integration tests.
//!
//! Documents are assembled on the fly instead of being committed as binaries.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::DeflateEncoder;
use hwptext::extraction::structured::{StructuredParser, StructuredParserError};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;

pub const FLAG_COMPRESSED: u32 = 1 << 0;
pub const FLAG_PASSWORD: u32 = 1 << 1;
pub const FLAG_DISTRIBUTION: u32 = 1 << 2;

/// A zip container with the given entries, in the given order.
pub fn hwpx_file(entries: &[(&str, &str)]) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
    writer.start_file("mimetype", SimpleFileOptions::default()).unwrap();
    writer.write_all(b"application/hwp+zip").unwrap();
    for (name, xml) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    file
}

/// Section XML wrapping each paragraph the way HWPX writers do.
pub fn section_xml(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<hp:p><hp:run><hp:t>{p}</hp:t></hp:run></hp:p>"))
        .collect();
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><hs:sec>{body}</hs:sec>"#)
}

/// A `FileHeader` stream with the given property flags.
pub fn file_header(flags: u32) -> Vec<u8> {
    let mut header = vec![0u8; 256];
    let signature = b"HWP Document File";
    header[..signature.len()].copy_from_slice(signature);
    header[32..36].copy_from_slice(&[0, 0, 5, 5]);
    header[36..40].copy_from_slice(&flags.to_le_bytes());
    header
}

pub fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// An OLE compound file holding `FileHeader` plus the given streams.
///
/// Stream paths are absolute (`/BodyText/Section0`); parent storages are
/// created as needed. Data is written as given, so compress it beforehand
/// when the flags say so.
pub fn compound_file(flags: u32, streams: &[(&str, Vec<u8>)]) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    {
        let mut compound = cfb::CompoundFile::create(file.reopen().unwrap()).unwrap();
        compound.create_stream("/FileHeader").unwrap().write_all(&file_header(flags)).unwrap();

        for (path, data) in streams {
            if let Some((parent, _)) = path.rsplit_once('/')
                && !parent.is_empty()
                && !compound.exists(parent)
            {
                compound.create_storage_all(parent).unwrap();
            }
            compound.create_stream(path).unwrap().write_all(data).unwrap();
        }
        compound.flush().unwrap();
    }
    file
}

/// A compressed HWP 5 document whose sections hold the given UTF-16LE text.
pub fn hwp5_file(sections: &[&str]) -> NamedTempFile {
    let streams: Vec<(String, Vec<u8>)> = sections
        .iter()
        .enumerate()
        .map(|(i, text)| (format!("/BodyText/Section{i}"), deflate(&utf16le(text))))
        .collect();
    let borrowed: Vec<(&str, Vec<u8>)> = streams.iter().map(|(n, d)| (n.as_str(), d.clone())).collect();
    compound_file(FLAG_COMPRESSED, &borrowed)
}

/// Structured parser returning canned renderings and counting calls.
#[derive(Clone)]
pub struct StubParser {
    text: Result<String, String>,
    html: String,
    pub calls: Arc<AtomicUsize>,
}

impl StubParser {
    pub fn text(text: &str) -> Self {
        Self {
            text: Ok(text.to_string()),
            html: String::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn html(html: &str) -> Self {
        Self {
            text: Ok(String::new()),
            html: html.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn invalid(message: &str) -> Self {
        Self {
            text: Err(message.to_string()),
            html: String::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StructuredParser for StubParser {
    fn name(&self) -> &str {
        "stub"
    }

    fn to_text(&self, _path: &Path) -> Result<Vec<u8>, StructuredParserError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Ok(text) => Ok(text.as_bytes().to_vec()),
            Err(message) => Err(StructuredParserError::InvalidStructure(message.clone())),
        }
    }

    fn to_html(&self, _path: &Path) -> Result<Vec<u8>, StructuredParserError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.html.as_bytes().to_vec())
    }
}
