//! Localized chrome strings (cover type, TOC title, report bucket name).

use quire_types::Locale;
use std::collections::HashMap;
use std::fmt::Debug;

pub const TOC_TITLE: &str = "toc.title";
pub const TOC_TYPE: &str = "toc.type";
pub const TOC_PROJECT_INFO_ITEM: &str = "toc.project-info.item";

pub trait MessageCatalog: Debug {
    /// Looks up `key` for `locale`, falling back to the catalog's base
    /// language and finally to the key itself.
    fn message(&self, locale: &Locale, key: &str) -> String;
}

/// The catalog shipped with the tool, with optional per-locale overrides.
#[derive(Debug, Clone, Default)]
pub struct BundledMessages {
    overrides: HashMap<(Locale, String), String>,
}

impl BundledMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, locale: Locale, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert((locale, key.into()), value.into());
        self
    }

    fn bundled(language: &str, key: &str) -> Option<&'static str> {
        let value = match (language, key) {
            ("en", TOC_TITLE) => "Table of Contents",
            ("en", TOC_TYPE) => "User Guide",
            ("en", TOC_PROJECT_INFO_ITEM) => "Project Reports",
            ("fr", TOC_TITLE) => "Table des matières",
            ("fr", TOC_TYPE) => "Guide de l'utilisateur",
            ("fr", TOC_PROJECT_INFO_ITEM) => "Rapports du projet",
            ("de", TOC_TITLE) => "Inhaltsverzeichnis",
            ("de", TOC_TYPE) => "Benutzerhandbuch",
            ("de", TOC_PROJECT_INFO_ITEM) => "Projektberichte",
            _ => return None,
        };
        Some(value)
    }
}

impl MessageCatalog for BundledMessages {
    fn message(&self, locale: &Locale, key: &str) -> String {
        if let Some(value) = self.overrides.get(&(locale.clone(), key.to_string())) {
            return value.clone();
        }
        Self::bundled(locale.language(), key)
            .or_else(|| Self::bundled("en", key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }
}
