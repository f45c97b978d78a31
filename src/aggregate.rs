//! Batch aggregation and table export.
//!
//! Collects (filename, metadata, content) triples across documents and
//! flattens them into a rectangular table whose columns are the union of
//! metadata keys seen across the whole set. The table is the direct input
//! to CSV/JSON serialization; its only contract toward that step is
//! "sparse-safe and rectangular".

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};

/// Fixed first column.
pub const FILENAME_COLUMN: &str = "Filename";

/// Derived column flagging documents that carried raw XML metadata.
pub const XML_FLAG_COLUMN: &str = "Contains_XML_Metadata";

/// Column holding extracted text when content export is requested.
pub const TEXT_COLUMN: &str = "PDF_Text_Data";

/// One document's extraction result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    /// Name the document was registered under; unique within a set.
    pub filename: String,

    /// Metadata field name to text value, in extraction order.
    pub metadata: IndexMap<String, String>,

    /// Extracted text, or the extraction placeholder message.
    pub content: String,
}

/// Insertion-ordered, filename-deduplicated collection of extraction
/// results.
///
/// Owned explicitly by the caller: create one per batch, drop it (or
/// [`clear`](ResultAggregator::clear) it) when the batch ends.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    documents: Vec<DocumentRecord>,
    seen: HashSet<String>,
}

impl ResultAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document's extraction results.
    ///
    /// First registration wins: a filename already present leaves the set
    /// untouched and returns `false`.
    pub fn register(
        &mut self,
        filename: impl Into<String>,
        metadata: IndexMap<String, String>,
        content: impl Into<String>,
    ) -> bool {
        let filename = filename.into();
        if !self.seen.insert(filename.clone()) {
            log::debug!("duplicate filename dropped: {}", filename);
            return false;
        }

        self.documents.push(DocumentRecord {
            filename,
            metadata,
            content: content.into(),
        });
        true
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Registered documents in registration order.
    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    /// Look up a registered document by filename.
    pub fn get(&self, filename: &str) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| d.filename == filename)
    }

    /// Drop all registered documents.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.seen.clear();
    }

    /// Flatten the set into a rectangular table.
    ///
    /// Built fresh on every call; registered documents are never mutated.
    /// Columns are the union of row values in first-seen order:
    /// [`FILENAME_COLUMN`] first, then metadata columns as documents
    /// introduce them. A key containing `XML` never becomes a column; the
    /// row gets `Contains_XML_Metadata = "Yes"` instead, and
    /// [`XML_FLAG_COLUMN`] takes its place in the order (so it exists
    /// only when some document carried an XML key). [`TEXT_COLUMN`] is
    /// appended last, only when `include_content`.
    pub fn to_table(&self, include_content: bool) -> ExportTable {
        let mut columns: Vec<String> = vec![FILENAME_COLUMN.to_string()];
        let mut seen_columns: HashSet<String> = HashSet::new();
        seen_columns.insert(FILENAME_COLUMN.to_string());

        let mut rows = Vec::with_capacity(self.documents.len());

        for doc in &self.documents {
            let mut values: HashMap<String, String> = HashMap::new();

            for (key, value) in doc.metadata.iter() {
                // Raw XML is unfit for a delimited table; flag it instead.
                let column = if key.contains("XML") {
                    XML_FLAG_COLUMN
                } else {
                    key.as_str()
                };

                if seen_columns.insert(column.to_string()) {
                    columns.push(column.to_string());
                }

                if column == XML_FLAG_COLUMN {
                    values.insert(XML_FLAG_COLUMN.to_string(), "Yes".to_string());
                } else {
                    values.insert(key.clone(), value.clone());
                }
            }

            if include_content {
                values.insert(TEXT_COLUMN.to_string(), doc.content.clone());
            }

            rows.push(TableRow {
                filename: doc.filename.clone(),
                values,
            });
        }

        if include_content && seen_columns.insert(TEXT_COLUMN.to_string()) {
            columns.push(TEXT_COLUMN.to_string());
        }

        ExportTable { columns, rows }
    }
}

/// One table row: a filename plus a sparse column-to-value mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    filename: String,
    values: HashMap<String, String>,
}

impl TableRow {
    /// The document's filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Value for a column; empty for columns this row does not carry.
    pub fn get(&self, column: &str) -> &str {
        if column == FILENAME_COLUMN {
            return &self.filename;
        }
        self.values.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Rectangular export table: ordered columns, one row per document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTable {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl ExportTable {
    /// Column names in serialization order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in registration order.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Look up a row by filename.
    pub fn row(&self, filename: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.filename == filename)
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize to CSV with a header record.
    ///
    /// Fields containing delimiters, quotes, or newlines are quoted by
    /// the writer. Failures surface as [`Error::Export`] and leave the
    /// table (and the aggregator it came from) untouched.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;

        for row in &self.rows {
            let record: Vec<&str> = self.columns.iter().map(|c| row.get(c)).collect();
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Serialize to JSON: an array of objects, one per row, every column
    /// present (rectangular).
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| (c.clone(), serde_json::Value::String(row.get(c).to_string())))
                    .collect()
            })
            .collect();

        let out = if pretty {
            serde_json::to_string_pretty(&rows)
        } else {
            serde_json::to_string(&rows)
        };
        out.map_err(|e| Error::Export(e.to_string()))
    }
}
