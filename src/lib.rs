//! # pdfsift
//!
//! Extract metadata and plain text from PDF documents and consolidate a
//! batch of files into a single exportable table.
//!
//! Metadata comes from both sources a PDF can carry — the document info
//! dictionary and the embedded XMP stream — with every value normalized
//! to text. Text extraction is fail-soft: an unreadable document yields a
//! placeholder message instead of an error, so batch processing never
//! stops. The aggregator deduplicates by filename (first wins) and
//! flattens the batch into a rectangular CSV/JSON table whose columns
//! are the union of metadata keys across all documents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::{process_batch, ResultAggregator};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let data = std::fs::read("document.pdf")?;
//!
//!     let mut aggregator = ResultAggregator::new();
//!     let report = process_batch(
//!         &mut aggregator,
//!         vec![("document.pdf".to_string(), data)],
//!     );
//!     for warning in &report.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!
//!     let csv = aggregator.to_table(true).to_csv()?;
//!     println!("{}", csv);
//!     Ok(())
//! }
//! ```
//!
//! ## Per-document API
//!
//! ```no_run
//! use pdfsift::{extract_metadata, extract_text};
//!
//! let metadata = extract_metadata("document.pdf").unwrap();
//! for (key, value) in &metadata.fields {
//!     println!("{}: {}", key, value);
//! }
//!
//! let text = extract_text("document.pdf");
//! println!("{}", text.display_text());
//! ```

pub mod aggregate;
pub mod batch;
pub mod detect;
pub mod error;
pub mod extract;
pub mod parser;

// Re-export commonly used types
pub use aggregate::{
    DocumentRecord, ExportTable, ResultAggregator, TableRow, FILENAME_COLUMN, TEXT_COLUMN,
    XML_FLAG_COLUMN,
};
pub use batch::{process_batch, BatchReport, BatchWarning};
pub use detect::is_pdf_bytes;
pub use error::{Error, Result};
pub use extract::{
    extract_text, extract_text_from_bytes, extract_text_from_reader, TextExtraction,
};
pub use parser::{
    parse_pdf_date, DocumentMetadata, MetadataParser, MetadataSource, XML_METADATA_KEY,
};

use std::io::Read;
use std::path::Path;

/// Extract metadata from a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfsift::extract_metadata;
///
/// let metadata = extract_metadata("document.pdf").unwrap();
/// println!("{} field(s)", metadata.len());
/// ```
pub fn extract_metadata<P: AsRef<Path>>(path: P) -> Result<DocumentMetadata> {
    let parser = MetadataParser::open(path)?;
    Ok(parser.extract())
}

/// Extract metadata from a PDF held in memory.
pub fn extract_metadata_from_bytes(data: &[u8]) -> Result<DocumentMetadata> {
    let parser = MetadataParser::from_bytes(data)?;
    Ok(parser.extract())
}

/// Extract metadata from a PDF read from any reader.
pub fn extract_metadata_from_reader<R: Read>(reader: R) -> Result<DocumentMetadata> {
    let parser = MetadataParser::from_reader(reader)?;
    Ok(parser.extract())
}
