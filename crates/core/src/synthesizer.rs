//! Builds a document model from project metadata when the project has no
//! document descriptor.

use chrono::{DateTime, Utc};
use quire_traits::i18n::{TOC_TITLE, TOC_TYPE};
use quire_traits::{DecorationModel, MenuItem, MessageCatalog};
use quire_types::{
    DocumentAuthor, DocumentCover, DocumentMeta, DocumentModel, DocumentToc, DocumentTocItem,
    Locale, ProjectDescriptor,
};

pub struct DefaultModelSynthesizer<'a> {
    project: &'a ProjectDescriptor,
    decoration: Option<&'a DecorationModel>,
    catalog: &'a dyn MessageCatalog,
    generator: String,
    build_date: DateTime<Utc>,
}

impl<'a> DefaultModelSynthesizer<'a> {
    pub fn new(
        project: &'a ProjectDescriptor,
        decoration: Option<&'a DecorationModel>,
        catalog: &'a dyn MessageCatalog,
        generator: impl Into<String>,
        build_date: DateTime<Utc>,
    ) -> Self {
        Self {
            project,
            decoration,
            catalog,
            generator: generator.into(),
            build_date,
        }
    }

    /// The model for `locale`.
    ///
    /// Cover type and TOC title come from `default_locale`'s messages,
    /// whatever `locale` is.
    pub fn synthesize(&self, locale: &Locale, default_locale: &Locale) -> DocumentModel {
        let mut model = self.project_model();
        model.meta.generator = Some(self.generator.clone());
        model.meta.language = Some(locale.language().to_string());
        model.cover.cover_type = Some(self.catalog.message(default_locale, TOC_TYPE));
        model.toc.name = Some(self.catalog.message(default_locale, TOC_TITLE));
        model
    }

    fn project_model(&self) -> DocumentModel {
        let project = self.project;
        let name = project.display_name().to_string();
        let authors = self.authors();
        let date = self.build_date.format("%Y-%m-%d").to_string();
        let company = project.organization.as_ref().and_then(|o| o.name.clone());

        DocumentModel {
            output_name: Some(project.artifact_id.trim().to_string()),
            model_encoding: Some("UTF-8".to_string()),
            meta: DocumentMeta {
                title: Some(name.clone()),
                subject: Some(name.clone()),
                description: project.description.clone(),
                creator: company.clone(),
                creation_date: Some(date.clone()),
                date: Some(date.clone()),
                authors: authors.clone(),
                ..Default::default()
            },
            cover: DocumentCover {
                cover_title: Some(name.clone()),
                cover_sub_title: project.version.as_ref().map(|v| format!("v. {v}")),
                cover_version: project.version.clone(),
                cover_date: Some(date),
                project_name: Some(name),
                company_name: company,
                authors,
                ..Default::default()
            },
            toc: self.toc(),
            properties: Default::default(),
        }
    }

    fn authors(&self) -> Vec<DocumentAuthor> {
        self.project
            .developers
            .iter()
            .map(|developer| DocumentAuthor {
                name: developer.name.clone().or_else(|| developer.id.clone()),
                email: developer.email.clone(),
                company_name: developer.organization.clone(),
                position: Some(developer.roles.join(", ")).filter(|r| !r.is_empty()),
            })
            .collect()
    }

    fn toc(&self) -> DocumentToc {
        let mut toc = DocumentToc::default();
        let Some(decoration) = self.decoration else {
            return toc;
        };
        for menu in &decoration.menus {
            for item in &menu.items {
                if let Some(item) = toc_item(item) {
                    toc.add_item(item);
                }
            }
        }
        toc
    }
}

fn toc_item(item: &MenuItem) -> Option<DocumentTocItem> {
    let href = item.href.as_deref().map(str::trim).unwrap_or_default();
    if is_external(href) {
        return None;
    }
    Some(DocumentTocItem {
        name: item.name.clone(),
        reference: Some(document_reference(href)).filter(|r| !r.is_empty()),
        items: item.items.iter().filter_map(toc_item).collect(),
    })
}

fn is_external(href: &str) -> bool {
    href.contains("://") || href.starts_with("mailto:")
}

/// `/guides/install.html` becomes `guides/install`.
fn document_reference(href: &str) -> String {
    let href = href.trim_start_matches('/');
    let file_start = href.rfind('/').map_or(0, |i| i + 1);
    match href[file_start..].rfind('.') {
        Some(dot) if dot > 0 => href[..file_start + dot].to_string(),
        _ => href.to_string(),
    }
}
