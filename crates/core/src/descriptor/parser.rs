//! Event-driven reader for document descriptors.
//!
//! The reader is lenient: elements and attributes it does not know are
//! skipped, wherever they appear. Only malformed XML is an error.

use crate::xml::{XmlFailure, attribute, attributes, local_name, resolve_entity};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quire_types::{DocumentAuthor, DocumentModel, DocumentTocItem};

pub(crate) fn parse_document(source: &str) -> Result<DocumentModel, XmlFailure> {
    let mut reader = Reader::from_str(source);
    let mut builder = ModelBuilder::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(XmlEvent::Start(e)) => {
                let attributes = attributes(&e, &reader)?;
                builder.start_element(&e, &attributes);
            }
            Ok(XmlEvent::Empty(e)) => {
                let attributes = attributes(&e, &reader)?;
                builder.start_element(&e, &attributes);
                builder.end_element();
            }
            Ok(XmlEvent::End(_)) => builder.end_element(),
            Ok(XmlEvent::Text(e)) => {
                builder.text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(XmlEvent::CData(e)) => {
                builder.text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(XmlEvent::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match resolve_entity(&entity) {
                    Some(resolved) => builder.text.push_str(&resolved),
                    None => {
                        return Err(XmlFailure::at(
                            &reader,
                            format!("unknown entity '&{entity};'"),
                        ));
                    }
                }
            }
            Ok(XmlEvent::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(XmlFailure::at(&reader, e)),
        }
        buf.clear();
    }

    if !builder.path.is_empty() {
        return Err(XmlFailure::at(
            &reader,
            format!("unclosed element <{}>", builder.path.join("/")),
        ));
    }
    if !builder.seen_root {
        return Err(XmlFailure::at(&reader, "no root element"));
    }
    Ok(builder.model)
}

/// Which author list an `<author>` element under `<authors>` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthorOwner {
    Meta,
    Cover,
}

#[derive(Default)]
struct ModelBuilder {
    model: DocumentModel,
    path: Vec<String>,
    text: String,
    seen_root: bool,
    /// `<item>`s of the TOC currently open, innermost last.
    open_items: Vec<DocumentTocItem>,
    author: Option<DocumentAuthor>,
    keywords: Vec<String>,
}

impl ModelBuilder {
    /// True when the open elements are `document/toc/item(/item)*`.
    fn at_toc_item(&self) -> bool {
        match self.path.as_slice() {
            [document, toc, items @ ..] if document == "document" && toc == "toc" => {
                !items.is_empty() && items.iter().all(|n| n == "item")
            }
            _ => false,
        }
    }

    fn author_owner(&self) -> Option<AuthorOwner> {
        match self.path.as_slice() {
            [document, section, authors, author, ..]
                if document == "document" && authors == "authors" && author == "author" =>
            {
                match section.as_str() {
                    "meta" => Some(AuthorOwner::Meta),
                    "cover" => Some(AuthorOwner::Cover),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn start_element(&mut self, e: &BytesStart<'_>, attributes: &[(String, String)]) {
        let name = local_name(e);
        self.path.push(name);
        self.text.clear();

        if self.path.len() == 1 {
            self.seen_root = true;
        }

        match self.path.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            ["document"] => {
                self.model.output_name = attribute(attributes, "outputName").map(str::to_string);
                self.model.model_encoding =
                    attribute(attributes, "modelEncoding").map(str::to_string);
            }
            ["document", "toc"] => {
                self.model.toc.name = attribute(attributes, "name").map(str::to_string);
                self.model.toc.depth =
                    attribute(attributes, "depth").and_then(|d| d.trim().parse().ok());
            }
            ["document", "properties", "property"] => {
                if let Some(key) = attribute(attributes, "name") {
                    let value = attribute(attributes, "value").unwrap_or_default();
                    self.model.properties.insert(key.to_string(), value.to_string());
                }
            }
            _ => {}
        }

        if self.at_toc_item() {
            self.open_items.push(DocumentTocItem {
                name: attribute(attributes, "name").map(str::to_string),
                reference: attribute(attributes, "ref").map(str::to_string),
                items: Vec::new(),
            });
        }

        if self.author_owner().is_some() && self.path.len() == 4 {
            self.author = Some(DocumentAuthor::default());
        }
    }

    fn end_element(&mut self) {
        let text = std::mem::take(&mut self.text);
        let value = Some(text.trim().to_string()).filter(|t| !t.is_empty());

        let owner = self.author_owner();
        let owned_path = self.path.clone();
        let path: Vec<&str> = owned_path.iter().map(String::as_str).collect();

        match path.as_slice() {
            ["document", "meta", field] => self.set_meta(field, value),
            ["document", "meta", "keywords", "keyword"] => {
                if let Some(keyword) = value {
                    self.keywords.push(keyword);
                }
            }
            ["document", "cover", field] => self.set_cover(field, value),
            ["document", _, "authors", "author", field] => {
                if let Some(author) = self.author.as_mut() {
                    match *field {
                        "name" => author.name = value,
                        "email" => author.email = value,
                        "companyName" => author.company_name = value,
                        "position" => author.position = value,
                        _ => {}
                    }
                }
            }
            ["document", _, "authors", "author"] => {
                if let (Some(author), Some(owner)) = (self.author.take(), owner) {
                    match owner {
                        AuthorOwner::Meta => self.model.meta.authors.push(author),
                        AuthorOwner::Cover => self.model.cover.authors.push(author),
                    }
                }
            }
            _ => {}
        }

        if self.at_toc_item() {
            if let Some(item) = self.open_items.pop() {
                match self.open_items.last_mut() {
                    Some(parent) => parent.add_item(item),
                    None => self.model.toc.add_item(item),
                }
            }
        }

        self.path.pop();
    }

    fn set_meta(&mut self, field: &str, value: Option<String>) {
        let meta = &mut self.model.meta;
        match field {
            "title" => meta.title = value,
            "subject" => meta.subject = value,
            "description" => meta.description = value,
            "keywords" => {
                meta.keywords = if self.keywords.is_empty() {
                    value
                } else {
                    Some(std::mem::take(&mut self.keywords).join(", "))
                };
            }
            "language" => meta.language = value,
            "generator" => meta.generator = value,
            "creator" => meta.creator = value,
            "pageSize" => meta.page_size = value,
            "creationDate" => meta.creation_date = value,
            "date" => meta.date = value,
            _ => {}
        }
    }

    fn set_cover(&mut self, field: &str, value: Option<String>) {
        let cover = &mut self.model.cover;
        match field {
            "coverTitle" => cover.cover_title = value,
            "coverSubTitle" => cover.cover_sub_title = value,
            "coverVersion" => cover.cover_version = value,
            "coverType" => cover.cover_type = value,
            "coverDate" | "coverdate" => cover.cover_date = value,
            "projectName" => cover.project_name = value,
            "projectLogo" => cover.project_logo = value,
            "companyName" => cover.company_name = value,
            "companyLogo" => cover.company_logo = value,
            "author" => cover.author = value,
            _ => {}
        }
    }
}
