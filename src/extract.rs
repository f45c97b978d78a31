//! Fail-soft plain-text extraction.
//!
//! Independent of the metadata parser: opens its own document and walks
//! the page tree. Extraction never returns an error to the caller; a
//! document that cannot be read yields [`TextExtraction::Failed`], which
//! renders as a short placeholder message so the aggregation flow is
//! never interrupted.

use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Outcome of text extraction for one document.
///
/// Carrying the failure as data (instead of an error string in the text)
/// lets callers tell "no text" from "extraction failed" without string
/// matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum TextExtraction {
    /// Concatenated text of all pages, in document order, pages separated
    /// by a blank line.
    Extracted(String),

    /// Extraction failed; carries the failure reason.
    Failed(String),
}

impl TextExtraction {
    /// The extracted text, if extraction succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            TextExtraction::Extracted(text) => Some(text),
            TextExtraction::Failed(_) => None,
        }
    }

    /// True when extraction failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, TextExtraction::Failed(_))
    }

    /// Displayable text: the content itself, or a placeholder message
    /// describing the failure.
    pub fn display_text(&self) -> String {
        match self {
            TextExtraction::Extracted(text) => text.clone(),
            TextExtraction::Failed(reason) => {
                format!("Error extracting PDF content: {}", reason)
            }
        }
    }

    /// Consuming variant of [`TextExtraction::display_text`].
    pub fn into_display_text(self) -> String {
        match self {
            TextExtraction::Extracted(text) => text,
            TextExtraction::Failed(reason) => {
                format!("Error extracting PDF content: {}", reason)
            }
        }
    }
}

/// Extract the plain text of a PDF file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> TextExtraction {
    match LopdfDocument::load(path.as_ref()) {
        Ok(doc) => extract_from_document(&doc),
        Err(e) => TextExtraction::Failed(e.to_string()),
    }
}

/// Extract the plain text of a PDF held in memory.
pub fn extract_text_from_bytes(data: &[u8]) -> TextExtraction {
    match LopdfDocument::load_mem(data) {
        Ok(doc) => extract_from_document(&doc),
        Err(e) => TextExtraction::Failed(e.to_string()),
    }
}

/// Extract the plain text of a PDF from a reader.
pub fn extract_text_from_reader<R: Read>(mut reader: R) -> TextExtraction {
    let mut data = Vec::new();
    if let Err(e) = reader.read_to_end(&mut data) {
        return TextExtraction::Failed(e.to_string());
    }
    extract_text_from_bytes(&data)
}

/// Walk the page tree and concatenate page text in document order.
///
/// A page whose content stream cannot be decoded is skipped; only when
/// every page is unreadable does the whole extraction fail.
fn extract_from_document(doc: &LopdfDocument) -> TextExtraction {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return TextExtraction::Extracted(String::new());
    }

    let mut texts = Vec::with_capacity(pages.len());
    let mut failures = 0usize;
    let mut last_error = String::new();

    for (&page_num, _) in pages.iter() {
        match extract_page_text(doc, page_num) {
            Ok(text) => texts.push(text),
            Err(e) => {
                failures += 1;
                last_error = e.to_string();
                log::warn!("{}", e);
            }
        }
    }

    if failures == pages.len() {
        return TextExtraction::Failed(format!(
            "all {} page(s) unreadable: {}",
            failures, last_error
        ));
    }

    TextExtraction::Extracted(texts.join("\n\n"))
}

/// Extract text from a single page.
fn extract_page_text(doc: &LopdfDocument, page_num: u32) -> Result<String> {
    doc.extract_text(&[page_num])
        .map_err(|e| Error::TextExtract(format!("page {}: {}", page_num, e)))
}
