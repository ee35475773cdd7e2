//! Newtype wrappers for locale codes and staged module identifiers.
//!
//! Both are cheap to clone (`Arc<str>`) and compare by their normalized
//! string form, so a `Locale` parsed from `fr_FR` equals one parsed from `fr`.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A locale, reduced to its lowercase language code.
///
/// Region and variant are dropped on construction: every locale-aware path
/// or catalog lookup in the build only ever looks at the language.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Locale(Arc<str>);

impl Locale {
    /// Creates a locale from a tag such as `en`, `fr_FR` or `pt-BR`.
    pub fn new(tag: &str) -> Self {
        let language = tag
            .trim()
            .split(['_', '-'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self(language.into())
    }

    pub fn english() -> Self {
        Self("en".into())
    }

    /// Returns the language code (`en`, `fr`, ...).
    pub fn language(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Locale {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Locale {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The root-to-leaf, `/`-joined path of module short names identifying one
/// module of a multi-module build, e.g. `root/sub-a/sub-a-1`.
///
/// Used both as a directory sub-path for staged content and as the prefix of
/// aggregated TOC references.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct StagedId(Arc<str>);

impl StagedId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Joins module names given root first.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefixes a TOC reference with this id: `<id>/<reference>`.
    pub fn qualify(&self, reference: &str) -> String {
        format!("{}/{}", self.0, reference)
    }
}

impl From<String> for StagedId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for StagedId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for StagedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StagedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
