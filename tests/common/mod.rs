//! Shared helpers for integration tests: build real PDFs in memory with
//! lopdf instead of shipping binary fixtures.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Builder for small but structurally valid PDF documents.
pub struct PdfBuilder {
    pages: Vec<String>,
    info: Vec<(String, Object)>,
    xmp: Option<Vec<u8>>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            info: Vec::new(),
            xmp: None,
        }
    }

    /// Add a page carrying the given text.
    pub fn page(mut self, text: &str) -> Self {
        self.pages.push(text.to_string());
        self
    }

    /// Add an info dictionary entry with a text value.
    pub fn info_text(self, key: &str, value: &str) -> Self {
        self.info_entry(key, Object::string_literal(value))
    }

    /// Add an info dictionary entry with an arbitrary object value.
    pub fn info_entry(mut self, key: &str, value: Object) -> Self {
        self.info.push((key.to_string(), value));
        self
    }

    /// Attach an XMP metadata stream to the catalog.
    pub fn xmp(mut self, xml: &str) -> Self {
        self.xmp = Some(xml.as_bytes().to_vec());
        self
    }

    /// Serialize the document to bytes.
    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in &self.pages {
            let resources_id = doc.add_object(dictionary! {
                "Font" => dictionary! {
                    "F1" => font_id,
                },
            });

            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if let Some(xml) = self.xmp {
            let metadata_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "Metadata",
                    "Subtype" => "XML",
                },
                xml,
            ));
            catalog.set("Metadata", metadata_id);
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        if !self.info.is_empty() {
            let mut info_dict = lopdf::Dictionary::new();
            for (key, value) in self.info {
                info_dict.set(key.into_bytes(), value);
            }
            let info_id = doc.add_object(info_dict);
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("failed to serialize test PDF");
        bytes
    }
}

/// A single-page PDF with the usual Title/Author info entries.
pub fn simple_pdf(title: &str, author: &str, text: &str) -> Vec<u8> {
    PdfBuilder::new()
        .page(text)
        .info_text("Title", title)
        .info_text("Author", author)
        .build()
}
