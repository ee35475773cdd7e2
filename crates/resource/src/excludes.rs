//! Exclusion rules for staged site content.

use quire_types::Locale;
use std::path::{Component, Path};

/// SCM metadata and editor droppings never copied into a staged site.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".gitignore",
    ".gitattributes",
    ".svn",
    "CVS",
    ".cvsignore",
    ".hg",
    ".hgignore",
    ".hgtags",
    ".bzr",
    ".bzrignore",
    "_darcs",
    "SCCS",
    "vssver.scc",
    ".DS_Store",
];

/// Decides which relative paths are skipped when listing or copying site
/// content: default excludes anywhere in the path, plus the sub-directories
/// holding content for non-default locales.
#[derive(Debug, Clone, Default)]
pub struct Excludes {
    locale_dirs: Vec<String>,
}

impl Excludes {
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Default excludes plus one `<lang>/` directory per non-default locale.
    pub fn with_locales(locales: &[Locale], default_locale: &Locale) -> Self {
        let locale_dirs = locales
            .iter()
            .filter(|l| *l != default_locale)
            .map(|l| l.language().to_string())
            .collect();
        Self { locale_dirs }
    }

    pub fn is_default_excluded(name: &str) -> bool {
        DEFAULT_EXCLUDES.contains(&name) || name.ends_with('~') || name.starts_with(".#")
    }

    /// `relative` is matched component by component. A locale directory only
    /// excludes what lies below it, not the directory entry itself.
    pub fn matches(&self, relative: &Path) -> bool {
        let names: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();

        if names.iter().any(|n| Self::is_default_excluded(n)) {
            return true;
        }

        let parents = names.len().saturating_sub(1);
        names[..parents]
            .iter()
            .any(|n| self.locale_dirs.iter().any(|l| l == n))
    }
}
