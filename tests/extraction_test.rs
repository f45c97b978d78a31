//! Integration tests for metadata parsing and text extraction.

mod common;

use common::{simple_pdf, PdfBuilder};
use lopdf::{Object, StringFormat};
use pdfsift::{
    extract_metadata_from_bytes, extract_text_from_bytes, Error, MetadataParser, MetadataSource,
    XML_METADATA_KEY,
};

const XMP_SAMPLE: &str =
    r#"<?xpacket begin=""?><x:xmpmeta xmlns:x="adobe:ns:meta/"></x:xmpmeta><?xpacket end="w"?>"#;

#[test]
fn test_info_dictionary_fields() {
    let data = simple_pdf("Quarterly Report", "Alice", "hello from page one");

    let metadata = extract_metadata_from_bytes(&data).unwrap();

    assert_eq!(metadata.get("Title"), Some("Quarterly Report"));
    assert_eq!(metadata.get("Author"), Some("Alice"));
    assert!(metadata.has_source(MetadataSource::Info));
    assert!(!metadata.has_source(MetadataSource::Xmp));
}

#[test]
fn test_xmp_and_info_together() {
    let data = PdfBuilder::new()
        .page("body")
        .info_text("Title", "T")
        .info_text("Author", "A")
        .xmp(XMP_SAMPLE)
        .build();

    let metadata = extract_metadata_from_bytes(&data).unwrap();

    // Exactly one raw-XML entry plus one entry per info key.
    let xml_keys = metadata
        .fields
        .keys()
        .filter(|k| k.as_str() == XML_METADATA_KEY)
        .count();
    assert_eq!(xml_keys, 1);
    assert_eq!(metadata.len(), 3);

    assert!(metadata.get(XML_METADATA_KEY).unwrap().contains("x:xmpmeta"));
    assert!(metadata.has_source(MetadataSource::Xmp));
    assert!(metadata.has_source(MetadataSource::Info));
}

#[test]
fn test_no_metadata_is_not_an_error() {
    let data = PdfBuilder::new().page("just text").build();

    let metadata = extract_metadata_from_bytes(&data).unwrap();
    assert!(metadata.is_empty());
    assert!(metadata.sources.is_empty());
}

#[test]
fn test_corrupt_stream_yields_parse_error() {
    let result = MetadataParser::from_bytes(b"%PDF-1.5\nthis is not a real object graph");
    assert!(result.is_err());
}

#[test]
fn test_non_string_values_rendered_as_text() {
    let data = PdfBuilder::new()
        .page("body")
        .info_entry("PageTotal", Object::Integer(42))
        .info_entry("Trapped", Object::Name(b"False".to_vec()))
        .info_entry("Draft", Object::Boolean(true))
        .info_entry(
            "Parts",
            Object::Array(vec![
                Object::string_literal("one"),
                Object::string_literal("two"),
            ]),
        )
        .build();

    let metadata = extract_metadata_from_bytes(&data).unwrap();

    assert_eq!(metadata.get("PageTotal"), Some("42"));
    assert_eq!(metadata.get("Trapped"), Some("False"));
    assert_eq!(metadata.get("Draft"), Some("true"));
    assert_eq!(metadata.get("Parts"), Some("[one, two]"));
}

#[test]
fn test_utf16_title_decoded() {
    // UTF-16BE with BOM: "Hi"
    let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
    let data = PdfBuilder::new()
        .page("body")
        .info_entry("Title", Object::String(bytes, StringFormat::Hexadecimal))
        .build();

    let metadata = extract_metadata_from_bytes(&data).unwrap();
    assert_eq!(metadata.get("Title"), Some("Hi"));
}

#[test]
fn test_text_extraction_single_page() {
    let data = simple_pdf("T", "A", "hello from page one");

    let extraction = extract_text_from_bytes(&data);
    let text = extraction.text().expect("extraction should succeed");
    assert!(text.contains("hello from page one"));
}

#[test]
fn test_text_extraction_page_order() {
    let data = PdfBuilder::new()
        .page("first page text")
        .page("second page text")
        .build();

    let extraction = extract_text_from_bytes(&data);
    let text = extraction.text().expect("extraction should succeed");

    let first = text.find("first page text").unwrap();
    let second = text.find("second page text").unwrap();
    assert!(first < second);

    // Page boundary keeps at least a line break between pages.
    assert!(text[first..second].contains('\n'));
}

#[test]
fn test_text_extraction_fail_soft() {
    let extraction = extract_text_from_bytes(b"not a pdf");
    assert!(extraction.is_failed());
    assert!(extraction
        .display_text()
        .starts_with("Error extracting PDF content:"));
}

#[test]
fn test_open_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.pdf");
    std::fs::write(&path, simple_pdf("T", "A", "on disk")).unwrap();

    let parser = MetadataParser::open(&path).unwrap();
    let metadata = parser.extract();
    assert_eq!(metadata.get("Title"), Some("T"));
    assert_eq!(parser.page_count(), 1);
    assert!(!parser.is_encrypted());
    assert_eq!(parser.version(), "1.5");

    let extraction = pdfsift::extract_text(&path);
    assert!(extraction.text().unwrap().contains("on disk"));
}

#[test]
fn test_open_rejects_non_pdf_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.txt");
    std::fs::write(&path, "plain text, no PDF header").unwrap();

    let err = MetadataParser::open(&path).unwrap_err();
    assert!(matches!(err, Error::UnknownFormat));
}
