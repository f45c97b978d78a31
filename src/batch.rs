//! Sequential per-document pipeline.
//!
//! Drives extraction over an ordered collection of named binary blobs:
//! text first (fail-soft), then metadata, then registration. Failures are
//! contained per document; the batch always runs to completion and the
//! aggregator is owned by the caller.

use std::fmt;

use crate::aggregate::ResultAggregator;
use crate::extract::{extract_text_from_bytes, TextExtraction};
use crate::parser::MetadataParser;

/// Non-fatal, per-document condition raised while processing a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchWarning {
    /// The PDF structure was unreadable; the document was not registered.
    ParseFailed { filename: String, reason: String },

    /// The document carried no metadata at all; it was not registered.
    NoMetadata { filename: String },

    /// Text extraction failed; the placeholder message was registered as
    /// the document's content.
    TextFailed { filename: String, reason: String },

    /// The filename was already registered; first registration kept.
    DuplicateSkipped { filename: String },
}

impl BatchWarning {
    /// Filename the warning applies to.
    pub fn filename(&self) -> &str {
        match self {
            BatchWarning::ParseFailed { filename, .. }
            | BatchWarning::NoMetadata { filename }
            | BatchWarning::TextFailed { filename, .. }
            | BatchWarning::DuplicateSkipped { filename } => filename,
        }
    }
}

impl fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchWarning::ParseFailed { filename, reason } => {
                write!(f, "{}: error extracting metadata: {}", filename, reason)
            }
            BatchWarning::NoMetadata { filename } => {
                write!(f, "{}: no metadata found in this PDF", filename)
            }
            BatchWarning::TextFailed { filename, reason } => {
                write!(f, "{}: text extraction failed: {}", filename, reason)
            }
            BatchWarning::DuplicateSkipped { filename } => {
                write!(f, "{}: already processed, keeping the first upload", filename)
            }
        }
    }
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Documents handed to the pipeline.
    pub processed: usize,

    /// Documents registered with the aggregator.
    pub registered: usize,

    /// Per-document warnings, in processing order.
    pub warnings: Vec<BatchWarning>,
}

impl BatchReport {
    /// True when every document registered without a warning.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Process an ordered collection of `(filename, bytes)` documents.
///
/// Each document is parsed, text-extracted, and registered sequentially;
/// its byte buffer is dropped before the next document starts, on every
/// exit path. Nothing raised here aborts the batch.
pub fn process_batch<I>(aggregator: &mut ResultAggregator, inputs: I) -> BatchReport
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    let mut report = BatchReport::default();

    for (filename, data) in inputs {
        report.processed += 1;
        process_one(aggregator, &mut report, filename, &data);
    }

    report
}

fn process_one(
    aggregator: &mut ResultAggregator,
    report: &mut BatchReport,
    filename: String,
    data: &[u8],
) {
    // Content first, the fail-soft leg.
    let extraction = extract_text_from_bytes(data);
    if let TextExtraction::Failed(reason) = &extraction {
        report.warnings.push(BatchWarning::TextFailed {
            filename: filename.clone(),
            reason: reason.clone(),
        });
    }

    let parser = match MetadataParser::from_bytes(data) {
        Ok(parser) => parser,
        Err(e) => {
            log::warn!("{}: unreadable PDF structure: {}", filename, e);
            report.warnings.push(BatchWarning::ParseFailed {
                filename,
                reason: e.to_string(),
            });
            return;
        }
    };

    let metadata = parser.extract();
    if metadata.is_empty() {
        report.warnings.push(BatchWarning::NoMetadata { filename });
        return;
    }

    if aggregator.register(
        filename.clone(),
        metadata.fields,
        extraction.into_display_text(),
    ) {
        report.registered += 1;
    } else {
        report.warnings.push(BatchWarning::DuplicateSkipped { filename });
    }
}
