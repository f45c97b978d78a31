//! PDF metadata parsing.

mod metadata;

pub use metadata::{
    parse_pdf_date, DocumentMetadata, MetadataParser, MetadataSource, XML_METADATA_KEY,
};
