//! Metadata extraction from the PDF object graph.
//!
//! Reads the two metadata sources a PDF can carry: the document info
//! dictionary referenced from the trailer, and the XMP metadata stream
//! referenced from the catalog. Keys are opaque; values are always
//! normalized to text.

use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use lopdf::{Document as LopdfDocument, Object};
use serde::{Deserialize, Serialize};

use crate::detect;
use crate::error::Result;

/// Reserved key for the raw embedded XMP metadata stream.
///
/// At most one entry of [`DocumentMetadata::fields`] carries the raw XML,
/// always under this key.
pub const XML_METADATA_KEY: &str = "XML Metadata";

/// Reference resolution cap when rendering indirect info values.
const MAX_RESOLVE_DEPTH: u8 = 8;

/// Which metadata sources were present in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataSource {
    /// Embedded XMP metadata stream (catalog `Metadata` entry).
    Xmp,
    /// Document info dictionary (trailer `Info` entry).
    Info,
}

/// Extracted document metadata.
///
/// `fields` preserves insertion order: the XMP entry (if any) first, then
/// the info dictionary pairs in dictionary order. A key repeated within
/// the info dictionary keeps its first position but takes the last value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Field name to text value.
    pub fields: IndexMap<String, String>,

    /// Sources found, in extraction order.
    pub sources: Vec<MetadataSource>,
}

impl DocumentMetadata {
    /// True when no metadata source contributed any field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of extracted fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// True when the given source was present in the document.
    pub fn has_source(&self, source: MetadataSource) -> bool {
        self.sources.contains(&source)
    }
}

/// Parser for a single PDF document's metadata.
///
/// Construction fails with [`crate::Error::PdfParse`] when the trailer or
/// catalog is unreadable, and with [`crate::Error::Encrypted`] for
/// encrypted documents. A document with no metadata at all is not an
/// error: [`MetadataParser::extract`] returns an empty mapping.
#[derive(Debug)]
pub struct MetadataParser {
    doc: LopdfDocument,
}

impl MetadataParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Reject non-PDF input before lopdf walks the object graph.
        detect::sniff_file(path)?;

        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Extract all metadata the document carries.
    pub fn extract(&self) -> DocumentMetadata {
        let mut metadata = DocumentMetadata::default();

        // Embedded XMP stream, stored raw under the reserved key.
        if let Some(xml) = self.xmp_metadata() {
            metadata
                .fields
                .insert(XML_METADATA_KEY.to_string(), xml);
            metadata.sources.push(MetadataSource::Xmp);
        }

        // Document info dictionary: every pair, keys opaque.
        if let Some(info) = self.info_dictionary() {
            metadata.sources.push(MetadataSource::Info);
            for (key, value) in info.iter() {
                let key = String::from_utf8_lossy(key).to_string();
                let value = self.render_value(value, 0);
                metadata.fields.insert(key, value);
            }
        }

        log::debug!(
            "extracted {} metadata field(s) from {} source(s)",
            metadata.fields.len(),
            metadata.sources.len()
        );

        metadata
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.clone()
    }

    /// Locate and decode the catalog's XMP metadata stream.
    fn xmp_metadata(&self) -> Option<String> {
        let catalog = self.doc.catalog().ok()?;
        let obj = catalog.get(b"Metadata").ok()?;

        let stream = match obj {
            Object::Reference(id) => match self.doc.get_object(*id) {
                Ok(Object::Stream(s)) => Some(s),
                _ => None,
            },
            Object::Stream(s) => Some(s),
            _ => None,
        }?;

        let bytes = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Locate the trailer's info dictionary.
    fn info_dictionary(&self) -> Option<&lopdf::Dictionary> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        match info {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Render an info value as text.
    ///
    /// Byte strings go through the decode ladder; references are resolved
    /// up to `MAX_RESOLVE_DEPTH` indirections; everything else gets a
    /// literal rendering.
    fn render_value(&self, obj: &Object, depth: u8) -> String {
        match obj {
            Object::String(bytes, _) => decode_text_bytes(bytes),
            Object::Name(name) => String::from_utf8_lossy(name).to_string(),
            Object::Integer(i) => i.to_string(),
            Object::Real(r) => r.to_string(),
            Object::Boolean(b) => b.to_string(),
            Object::Null => String::new(),
            Object::Reference(id) => {
                if depth >= MAX_RESOLVE_DEPTH {
                    return String::new();
                }
                match self.doc.get_object(*id) {
                    Ok(resolved) => self.render_value(resolved, depth + 1),
                    Err(_) => String::new(),
                }
            }
            Object::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| self.render_value(item, depth + 1))
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            Object::Dictionary(dict) => {
                let parts: Vec<String> = dict
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "/{} {}",
                            String::from_utf8_lossy(k),
                            self.render_value(v, depth + 1)
                        )
                    })
                    .collect();
                format!("<< {} >>", parts.join(" "))
            }
            Object::Stream(_) => "<stream>".to_string(),
        }
    }
}

/// Decode a PDF text string to UTF-8.
///
/// UTF-16BE with BOM first (the PDF convention for Unicode text), then
/// strict UTF-8, then a Latin-1 fallback so decoding never fails.
pub(crate) fn decode_text_bytes(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        if let Ok(s) = String::from_utf16(&utf16) {
            return s;
        }
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
///
/// Raw date values stay untouched in [`DocumentMetadata::fields`]; this
/// helper is for display.
pub fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:")?;

    // At minimum we need YYYY
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
