use log::debug;
use quire_traits::SiteTool;
use quire_types::Locale;
use std::path::{Path, PathBuf};

/// The locales one build produces documents for.
///
/// `ordered` is never empty and its first element is the default locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    ordered: Vec<Locale>,
}

impl Locales {
    /// Returns `None` for an empty list.
    pub fn new(ordered: Vec<Locale>) -> Option<Self> {
        if ordered.is_empty() {
            None
        } else {
            Some(Self { ordered })
        }
    }

    pub fn default_locale(&self) -> &Locale {
        &self.ordered[0]
    }

    pub fn ordered(&self) -> &[Locale] {
        &self.ordered
    }

    pub fn is_default(&self, locale: &Locale) -> bool {
        self.default_locale() == locale
    }

    /// `base` for the default locale, `base/<lang>` for any other.
    pub fn locale_directory(&self, base: &Path, locale: &Locale) -> PathBuf {
        if self.is_default(locale) {
            base.to_path_buf()
        } else {
            base.join(locale.language())
        }
    }
}

/// Resolves the configured locale list once per build through a [`SiteTool`].
#[derive(Debug)]
pub struct LocaleResolver<'a> {
    site_tool: &'a dyn SiteTool,
    resolved: Option<Locales>,
}

impl<'a> LocaleResolver<'a> {
    pub fn new(site_tool: &'a dyn SiteTool) -> Self {
        Self {
            site_tool,
            resolved: None,
        }
    }

    /// The first call asks the site tool; later calls return the same pair.
    pub fn resolve(&mut self, configured: Option<&str>) -> &Locales {
        let site_tool = self.site_tool;
        self.resolved.get_or_insert_with(|| {
            let mut ordered = site_tool.site_locales(configured);
            if ordered.is_empty() {
                ordered.push(Locale::english());
            }
            debug!(
                "Resolved locales: {}",
                ordered.iter().map(Locale::to_string).collect::<Vec<_>>().join(", ")
            );
            Locales { ordered }
        })
    }
}
