//! Collaborators the strategies draw raw text or bytes from.
//!
//! - [`container`] - HWPX zip container access
//! - [`structured`] - whole-document renderer for the binary format
//! - [`html`] - visible text of an HTML rendering
//! - [`streams`] - named byte segments of an OLE compound file

pub mod container;
pub mod html;
pub mod streams;
pub mod structured;

pub use container::{SectionEntry, has_zip_signature, read_section_entries, strip_markup};
pub use html::html_text_content;
pub use streams::{CompoundStreamExtractor, HeaderFlags, NamedStream, StreamListing, StreamSource};
pub use structured::{Hwp5Command, StructuredParser, StructuredParserError};
