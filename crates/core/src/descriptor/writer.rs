use encoding_rs::{Encoding, UTF_8};
use log::warn;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quire_types::{DocumentAuthor, DocumentModel, DocumentTocItem};
use std::io::{self, Write};

/// Serializes `model` as a document descriptor, two-space indented.
///
/// The bytes are encoded with `model.model_encoding` when it names a known
/// encoding, UTF-8 otherwise, and the prolog declares the encoding used.
/// Characters the encoding cannot represent become character references.
/// The output reads back into an equal model.
pub fn write_model<W: Write>(model: &DocumentModel, mut out: W) -> io::Result<()> {
    let encoding = output_encoding(model.model_encoding.as_deref());
    if encoding == UTF_8 {
        return write_xml(model, UTF_8, out);
    }

    let mut utf8 = Vec::new();
    write_xml(model, encoding, &mut utf8)?;
    let text = String::from_utf8(utf8).map_err(io::Error::other)?;
    let (bytes, _, _) = encoding.encode(&text);
    out.write_all(&bytes)
}

/// [`write_model`] into a string. The prolog always declares UTF-8.
pub fn model_to_string(model: &DocumentModel) -> io::Result<String> {
    let mut out = Vec::new();
    write_xml(model, UTF_8, &mut out)?;
    String::from_utf8(out).map_err(io::Error::other)
}

fn output_encoding(label: Option<&str>) -> &'static Encoding {
    let Some(label) = label.filter(|l| !l.trim().is_empty()) else {
        return UTF_8;
    };
    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) => encoding.output_encoding(),
        None => {
            warn!("Unknown model encoding '{}', writing UTF-8.", label);
            UTF_8
        }
    }
}

fn write_xml<W: Write>(model: &DocumentModel, encoding: &'static Encoding, out: W) -> io::Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(XmlEvent::Decl(BytesDecl::new("1.0", Some(encoding.name()), None)))?;

    let mut document = BytesStart::new("document");
    if let Some(name) = &model.output_name {
        document.push_attribute(("outputName", name.as_str()));
    }
    if let Some(encoding) = &model.model_encoding {
        document.push_attribute(("modelEncoding", encoding.as_str()));
    }
    writer.write_event(XmlEvent::Start(document))?;

    let meta = &model.meta;
    open(&mut writer, "meta")?;
    for (name, value) in [
        ("title", &meta.title),
        ("subject", &meta.subject),
        ("description", &meta.description),
        ("keywords", &meta.keywords),
        ("language", &meta.language),
        ("generator", &meta.generator),
        ("creator", &meta.creator),
        ("pageSize", &meta.page_size),
        ("creationDate", &meta.creation_date),
        ("date", &meta.date),
    ] {
        text_element(&mut writer, name, value.as_deref())?;
    }
    authors(&mut writer, &meta.authors)?;
    close(&mut writer, "meta")?;

    let mut toc = BytesStart::new("toc");
    if let Some(name) = &model.toc.name {
        toc.push_attribute(("name", name.as_str()));
    }
    if let Some(depth) = model.toc.depth {
        toc.push_attribute(("depth", depth.to_string().as_str()));
    }
    if model.toc.items.is_empty() {
        writer.write_event(XmlEvent::Empty(toc))?;
    } else {
        writer.write_event(XmlEvent::Start(toc))?;
        for item in &model.toc.items {
            toc_item(&mut writer, item)?;
        }
        close(&mut writer, "toc")?;
    }

    let cover = &model.cover;
    open(&mut writer, "cover")?;
    for (name, value) in [
        ("coverTitle", &cover.cover_title),
        ("coverSubTitle", &cover.cover_sub_title),
        ("coverVersion", &cover.cover_version),
        ("coverType", &cover.cover_type),
        ("coverdate", &cover.cover_date),
        ("projectName", &cover.project_name),
        ("projectLogo", &cover.project_logo),
        ("companyName", &cover.company_name),
        ("companyLogo", &cover.company_logo),
        ("author", &cover.author),
    ] {
        text_element(&mut writer, name, value.as_deref())?;
    }
    authors(&mut writer, &cover.authors)?;
    close(&mut writer, "cover")?;

    if !model.properties.is_empty() {
        open(&mut writer, "properties")?;
        for (name, value) in &model.properties {
            let mut property = BytesStart::new("property");
            property.push_attribute(("name", name.as_str()));
            property.push_attribute(("value", value.as_str()));
            writer.write_event(XmlEvent::Empty(property))?;
        }
        close(&mut writer, "properties")?;
    }

    close(&mut writer, "document")?;
    writer.into_inner().write_all(b"\n")
}

fn open<W: Write>(writer: &mut Writer<W>, name: &str) -> io::Result<()> {
    writer.write_event(XmlEvent::Start(BytesStart::new(name)))
}

fn close<W: Write>(writer: &mut Writer<W>, name: &str) -> io::Result<()> {
    writer.write_event(XmlEvent::End(BytesEnd::new(name)))
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, value: Option<&str>) -> io::Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    open(writer, name)?;
    writer.write_event(XmlEvent::Text(BytesText::new(value)))?;
    close(writer, name)
}

fn authors<W: Write>(writer: &mut Writer<W>, authors: &[DocumentAuthor]) -> io::Result<()> {
    if authors.is_empty() {
        return Ok(());
    }
    open(writer, "authors")?;
    for author in authors {
        open(writer, "author")?;
        text_element(writer, "name", author.name.as_deref())?;
        text_element(writer, "email", author.email.as_deref())?;
        text_element(writer, "companyName", author.company_name.as_deref())?;
        text_element(writer, "position", author.position.as_deref())?;
        close(writer, "author")?;
    }
    close(writer, "authors")
}

fn toc_item<W: Write>(writer: &mut Writer<W>, item: &DocumentTocItem) -> io::Result<()> {
    let mut start = BytesStart::new("item");
    if let Some(name) = &item.name {
        start.push_attribute(("name", name.as_str()));
    }
    if let Some(reference) = &item.reference {
        start.push_attribute(("ref", reference.as_str()));
    }

    if item.items.is_empty() {
        return writer.write_event(XmlEvent::Empty(start));
    }
    writer.write_event(XmlEvent::Start(start))?;
    for child in &item.items {
        toc_item(writer, child)?;
    }
    close(writer, "item")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parser::parse_document;
    use crate::xml::decode_xml;
    use quire_types::DocumentToc;

    fn sample() -> DocumentModel {
        let mut guide = DocumentTocItem::new("Guide", "guide");
        guide.add_item(DocumentTocItem::new("Install & run", "install"));

        let mut model = DocumentModel {
            output_name: Some("core".to_string()),
            toc: DocumentToc {
                name: Some("Contents".to_string()),
                depth: Some(2),
                items: vec![guide, DocumentTocItem::new("FAQ", "faq")],
            },
            ..Default::default()
        };
        model.meta.title = Some("Core <manual>".to_string());
        model.meta.authors.push(DocumentAuthor {
            name: Some("Ada".to_string()),
            ..Default::default()
        });
        model.cover.cover_sub_title = Some("v. 1.0".to_string());
        model.cover.cover_date = Some("2024-01-01".to_string());
        model.properties.insert("paper".to_string(), "a4".to_string());
        model
    }

    #[test]
    fn test_written_model_reads_back() {
        let model = sample();
        let xml = model_to_string(&model).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<title>Core &lt;manual&gt;</title>"));
        assert!(xml.ends_with("</document>\n"));
        assert_eq!(parse_document(&xml).unwrap(), model);
    }

    #[test]
    fn test_declared_encoding_matches_the_bytes() {
        let mut model = sample();
        model.model_encoding = Some("ISO-8859-1".to_string());
        model.meta.title = Some("Caf\u{e9} \u{2603}".to_string());

        let mut bytes = Vec::new();
        write_model(&model, &mut bytes).unwrap();
        // windows-1252 is the WHATWG name for the ISO-8859-1 label.
        assert!(bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"windows-1252\"?>"));
        assert!(bytes.windows(4).any(|w| w == b"Caf\xe9"));

        let read_back = parse_document(&decode_xml(&bytes)).unwrap();
        assert_eq!(read_back.meta.title.as_deref(), Some("Caf\u{e9} \u{2603}"));
        assert_eq!(read_back, model);
    }

    #[test]
    fn test_unknown_encoding_writes_utf8() {
        let model = DocumentModel {
            model_encoding: Some("klingon".to_string()),
            ..Default::default()
        };
        let mut bytes = Vec::new();
        write_model(&model, &mut bytes).unwrap();
        assert!(bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    }

    #[test]
    fn test_empty_model() {
        let xml = model_to_string(&DocumentModel::default()).unwrap();
        assert!(xml.contains("<toc/>"));
        assert_eq!(parse_document(&xml).unwrap(), DocumentModel::default());
    }
}
