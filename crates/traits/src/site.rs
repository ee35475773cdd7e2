//! Site tooling seams: locale enumeration and the decoration (site skin) model.

use crate::error::CollaboratorError;
use log::warn;
use quire_types::Locale;
use std::fmt::Debug;

/// Enumerates and validates the locales a build produces documents for.
pub trait SiteTool: Debug {
    /// Turns the configured comma-separated locale codes into an ordered,
    /// de-duplicated, validated list. The list is never empty.
    fn site_locales(&self, configured: Option<&str>) -> Vec<Locale>;
}

/// Validates locale codes syntactically.
///
/// The token `default` stands for the tool's own default locale, which is
/// also the result when nothing valid was configured.
#[derive(Debug, Clone)]
pub struct DefaultSiteTool {
    default_locale: Locale,
}

impl DefaultSiteTool {
    pub fn new(default_locale: Locale) -> Self {
        Self { default_locale }
    }

    fn is_valid_language(language: &str) -> bool {
        (2..=3).contains(&language.len()) && language.chars().all(|c| c.is_ascii_alphabetic())
    }
}

impl Default for DefaultSiteTool {
    fn default() -> Self {
        Self::new(Locale::english())
    }
}

impl SiteTool for DefaultSiteTool {
    fn site_locales(&self, configured: Option<&str>) -> Vec<Locale> {
        let mut locales: Vec<Locale> = Vec::new();

        for token in configured.unwrap_or_default().split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            let locale = if token.eq_ignore_ascii_case("default") {
                self.default_locale.clone()
            } else {
                let locale = Locale::new(token);
                if !Self::is_valid_language(locale.language()) {
                    warn!("The locale defined by '{}' is not valid: ignored.", token);
                    continue;
                }
                locale
            };

            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }

        if locales.is_empty() {
            locales.push(self.default_locale.clone());
        }
        locales
    }
}

/// A navigation menu declared by the site descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Menu {
    pub name: Option<String>,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItem {
    pub name: Option<String>,
    pub href: Option<String>,
    pub items: Vec<MenuItem>,
}

/// The subset of the site decoration the document build consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationModel {
    pub name: Option<String>,
    /// Skin coordinates (`groupId:artifactId:version`), if declared.
    pub skin: Option<String>,
    pub menus: Vec<Menu>,
}

/// Supplies the decoration model for a locale.
pub trait DecorationLoader: Debug {
    /// Returns `Ok(None)` when the project declares no site decoration.
    fn load(&self, locale: &Locale) -> Result<Option<DecorationModel>, CollaboratorError>;
}

/// A loader returning a fixed model, whatever the locale.
#[derive(Debug, Clone, Default)]
pub struct StaticDecorationLoader {
    model: Option<DecorationModel>,
}

impl StaticDecorationLoader {
    pub fn new(model: Option<DecorationModel>) -> Self {
        Self { model }
    }
}

impl DecorationLoader for StaticDecorationLoader {
    fn load(&self, _locale: &Locale) -> Result<Option<DecorationModel>, CollaboratorError> {
        Ok(self.model.clone())
    }
}
