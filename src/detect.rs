//! PDF header sniffing.
//!
//! A cheap check that runs before lopdf sees the file, so obviously
//! non-PDF input is rejected with [`Error::UnknownFormat`] instead of a
//! parser error deep in the object graph.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the header version from a byte slice (e.g., `"1.7"` from `%PDF-1.7`).
///
/// Returns [`Error::UnknownFormat`] when the data does not start with the
/// PDF magic or the version does not look like `digit.digit`.
pub fn sniff_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    let chars: Vec<char> = version.chars().collect();
    if !(chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()) {
        return Err(Error::UnknownFormat);
    }

    Ok(version)
}

/// Sniff the header of a file on disk.
pub fn sniff_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let n = reader.read(&mut header)?;
    sniff_version(&header[..n])
}

/// Check whether bytes carry a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff_version(data).is_ok()
}
