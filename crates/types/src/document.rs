use std::collections::BTreeMap;

/// The root of one rendered document: front matter, cover page and table of
/// contents.
///
/// A model is built once per locale and handed to the renderer; it is never
/// shared between locales.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentModel {
    /// Base name of the rendered file, without extension.
    pub output_name: Option<String>,
    pub model_encoding: Option<String>,
    pub meta: DocumentMeta,
    pub cover: DocumentCover,
    pub toc: DocumentToc,
    /// Renderer-specific properties, passed through untouched.
    pub properties: BTreeMap<String, String>,
}

impl DocumentModel {
    /// `output_name` trimmed, with `.<extension>` appended unless already
    /// present. `None` when there is no usable output name.
    pub fn output_file_name(&self, extension: &str) -> Option<String> {
        let name = self.output_name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        let suffix = format!(".{extension}");
        if name.ends_with(&suffix) {
            Some(name.to_string())
        } else {
            Some(format!("{name}{suffix}"))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub language: Option<String>,
    pub generator: Option<String>,
    pub creator: Option<String>,
    pub page_size: Option<String>,
    pub creation_date: Option<String>,
    pub date: Option<String>,
    pub authors: Vec<DocumentAuthor>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentCover {
    pub cover_title: Option<String>,
    pub cover_sub_title: Option<String>,
    pub cover_version: Option<String>,
    pub cover_type: Option<String>,
    pub cover_date: Option<String>,
    pub project_name: Option<String>,
    pub project_logo: Option<String>,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    pub author: Option<String>,
    pub authors: Vec<DocumentAuthor>,
}

/// The table of contents: an ordered forest of [`DocumentTocItem`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentToc {
    pub name: Option<String>,
    pub depth: Option<u32>,
    pub items: Vec<DocumentTocItem>,
}

impl DocumentToc {
    pub fn add_item(&mut self, item: DocumentTocItem) {
        self.items.push(item);
    }
}

/// One entry of the table of contents. Each item owns its children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTocItem {
    pub name: Option<String>,
    /// Addressable path or slug the renderer resolves to a source document.
    pub reference: Option<String>,
    pub items: Vec<DocumentTocItem>,
}

impl DocumentTocItem {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            reference: Some(reference.into()),
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: DocumentTocItem) {
        self.items.push(item);
    }
}
