//! Raw stream enumeration for HWP 5 compound files.
//!
//! An HWP 5 document is an OLE compound file. The `FileHeader` stream carries
//! a property bitfield saying whether the other streams are deflated and
//! whether the body is password-encrypted. This module hands back every stream
//! as a named byte segment, inflated when the header says so. Record-level
//! parsing is left to the consumers.

use crate::error::{HwpTextError, Result};
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Name of the stream holding the document signature and flags.
pub const FILE_HEADER_STREAM: &str = "FileHeader";
/// Signature at the start of the `FileHeader` stream.
pub const HWP_SIGNATURE: &[u8] = b"HWP Document File";

const PROPERTIES_OFFSET: usize = 36;
const FLAG_COMPRESSED: u32 = 1 << 0;
const FLAG_PASSWORD: u32 = 1 << 1;
const FLAG_DISTRIBUTION: u32 = 1 << 2;

/// Streams that are never deflated even in compressed documents.
const UNCOMPRESSED_STREAMS: [&str; 3] = [FILE_HEADER_STREAM, "\u{5}HwpSummaryInformation", "PrvImage"];
/// Password protection encrypts these stream families.
const ENCRYPTED_PREFIXES: [&str; 2] = ["bodytext/", "docinfo"];

/// A named byte segment from the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedStream {
    pub name: String,
    pub data: Vec<u8>,
}

/// Everything a [`StreamSource`] found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamListing {
    /// The document is password protected and its body was withheld.
    pub encrypted: bool,
    pub streams: Vec<NamedStream>,
}

/// Enumerates named byte segments of a document held in memory.
pub trait StreamSource: Send + Sync {
    fn streams(&self, data: &[u8]) -> Result<StreamListing>;
}

/// Property flags from the `FileHeader` stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFlags {
    pub compressed: bool,
    pub password: bool,
    pub distribution: bool,
}

impl HeaderFlags {
    /// Parse the flags out of a `FileHeader` stream.
    pub fn parse(header: &[u8]) -> Result<Self> {
        if !header.starts_with(HWP_SIGNATURE) {
            return Err(HwpTextError::parsing("FileHeader does not carry the HWP signature"));
        }
        let Some(raw) = header.get(PROPERTIES_OFFSET..PROPERTIES_OFFSET + 4) else {
            return Err(HwpTextError::parsing(format!(
                "FileHeader is truncated ({} bytes)",
                header.len()
            )));
        };
        let bits = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        Ok(Self {
            compressed: bits & FLAG_COMPRESSED != 0,
            password: bits & FLAG_PASSWORD != 0,
            distribution: bits & FLAG_DISTRIBUTION != 0,
        })
    }
}

/// [`StreamSource`] backed by the `cfb` compound file reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompoundStreamExtractor {
    raise_on_password: bool,
}

impl CompoundStreamExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `PasswordRequired` as soon as an encrypted document is seen,
    /// instead of withholding its body streams.
    pub fn raise_on_password(mut self, raise: bool) -> Self {
        self.raise_on_password = raise;
        self
    }
}

fn stream_name(path: &std::path::Path) -> String {
    path.to_string_lossy().trim_start_matches(['/', '\\']).replace('\\', "/")
}

fn inflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut out = Vec::with_capacity(data.len() * 4);
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

impl StreamSource for CompoundStreamExtractor {
    fn streams(&self, data: &[u8]) -> Result<StreamListing> {
        let mut compound = cfb::CompoundFile::open(Cursor::new(data))
            .map_err(|e| HwpTextError::parsing_with_source("Not an OLE compound document", e))?;

        let paths: Vec<PathBuf> = compound
            .walk()
            .filter(|entry| entry.is_stream())
            .map(|entry| entry.path().to_path_buf())
            .collect();

        let mut raw_streams = Vec::with_capacity(paths.len());
        for path in paths {
            let mut stream = compound.open_stream(&path)?;
            let mut bytes = Vec::new();
            stream.read_to_end(&mut bytes)?;
            raw_streams.push(NamedStream {
                name: stream_name(&path),
                data: bytes,
            });
        }

        let flags = match raw_streams.iter().find(|s| s.name == FILE_HEADER_STREAM) {
            Some(header) => HeaderFlags::parse(&header.data)?,
            None => {
                warn!("Compound document has no FileHeader stream, assuming uncompressed");
                HeaderFlags::default()
            }
        };
        debug!(?flags, streams = raw_streams.len(), "Enumerated compound document streams");

        if flags.password && self.raise_on_password {
            return Err(HwpTextError::PasswordRequired);
        }

        let mut listing = StreamListing {
            encrypted: flags.password,
            streams: Vec::with_capacity(raw_streams.len()),
        };

        for mut stream in raw_streams {
            let lower = stream.name.to_lowercase();
            if flags.password && ENCRYPTED_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                debug!(stream = %stream.name, "Withholding password-encrypted stream");
                continue;
            }

            // Distribution documents encrypt ViewText before deflating it; those bytes pass through as stored.
            let encrypted_view = flags.distribution && lower.starts_with("viewtext/");
            if flags.compressed && !encrypted_view && !UNCOMPRESSED_STREAMS.contains(&stream.name.as_str()) {
                match inflate(&stream.data) {
                    Ok(inflated) => stream.data = inflated,
                    Err(err) => {
                        debug!(stream = %stream.name, error = %err, "Stream did not inflate, keeping stored bytes");
                    }
                }
            }
            listing.streams.push(stream);
        }

        Ok(listing)
    }
}
