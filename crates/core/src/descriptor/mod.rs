//! Document descriptors: reading them into a [`DocumentModel`] and writing a
//! model back out.
//!
//! A descriptor is an XML file whose text may contain `${…}` placeholders.
//! Loading one means picking the locale-specific variant when it exists,
//! decoding it with the encoding its prolog declares, resolving placeholders
//! and finally parsing the resolved text.

mod parser;
mod writer;

pub use writer::{model_to_string, write_model};

use crate::error::DescriptorError;
use crate::xml::decode_xml;
use log::debug;
use quire_source::Interpolator;
use quire_types::{DocumentModel, Locale};
use std::fs;
use std::path::{Path, PathBuf};

/// The sibling `<stem>_<lang>.<ext>` of `path`.
pub fn localized_path(path: &Path, locale: &Locale) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, locale.language(), ext.to_string_lossy()),
        None => format!("{}_{}", stem, locale.language()),
    };
    path.with_file_name(name)
}

/// Reads descriptors with a fixed interpolator, so that loading the same file
/// twice yields equal models.
pub struct DescriptorLoader {
    interpolator: Interpolator,
    generator: String,
}

impl DescriptorLoader {
    /// `generator` fills `meta.generator` when the descriptor leaves it empty.
    pub fn new(interpolator: Interpolator, generator: impl Into<String>) -> Self {
        Self {
            interpolator,
            generator: generator.into(),
        }
    }

    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    /// The file actually read for `locale`: the localized sibling if it
    /// exists, `path` otherwise.
    pub fn effective_path(path: &Path, locale: Option<&Locale>) -> PathBuf {
        if let Some(locale) = locale {
            let localized = localized_path(path, locale);
            if localized.is_file() {
                return localized;
            }
        }
        path.to_path_buf()
    }

    /// Reads, decodes and interpolates the descriptor without parsing it.
    pub fn read_resolved(&self, path: &Path) -> Result<String, DescriptorError> {
        let bytes = fs::read(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = decode_xml(&bytes);

        let resolved = self
            .interpolator
            .interpolate(&raw)
            .map_err(|source| DescriptorError::Interpolation {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "Interpolated document descriptor ({})\n{}",
            path.display(),
            resolved
        );
        Ok(resolved)
    }

    /// Loads the descriptor at `path` (or its `locale` variant) into a model.
    pub fn load(&self, path: &Path, locale: &Locale) -> Result<DocumentModel, DescriptorError> {
        let path = Self::effective_path(path, Some(locale));
        let resolved = self.read_resolved(&path)?;

        let mut model = parser::parse_document(&resolved).map_err(|failure| {
            DescriptorError::Parse {
                path: path.clone(),
                position: failure.position,
                message: failure.message,
            }
        })?;

        if is_blank(model.meta.language.as_deref()) {
            model.meta.language = Some(locale.language().to_string());
        }
        if is_blank(model.meta.generator.as_deref()) {
            model.meta.generator = Some(self.generator.clone());
        }
        Ok(model)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use quire_source::{InterpolationError, MapValueSource};
    use quire_types::ProjectDescriptor;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn loader_for(project: &ProjectDescriptor) -> DescriptorLoader {
        let instant = DateTime::from_timestamp(0, 0).unwrap();
        DescriptorLoader::new(
            Interpolator::for_project(&BTreeMap::new(), Some(project), instant),
            "quire v. test",
        )
    }

    #[test]
    fn test_localized_path() {
        let fr = Locale::new("fr");
        assert_eq!(
            localized_path(Path::new("src/site/pdf.xml"), &fr),
            PathBuf::from("src/site/pdf_fr.xml")
        );
        assert_eq!(localized_path(Path::new("pdf"), &fr), PathBuf::from("pdf_fr"));
    }

    #[test]
    fn test_load_resolves_and_post_processes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pdf.xml");
        fs::write(
            &path,
            r#"<document outputName="${project.artifactId}"><meta><title>v${project.version} (${year})</title></meta></document>"#,
        )
        .unwrap();

        let mut project = ProjectDescriptor::new("core");
        project.version = Some("2.3.1".to_string());
        let model = loader_for(&project).load(&path, &Locale::new("de")).unwrap();

        assert_eq!(model.output_name.as_deref(), Some("core"));
        assert_eq!(model.meta.title.as_deref(), Some("v2.3.1 (1970)"));
        assert_eq!(model.meta.language.as_deref(), Some("de"));
        assert_eq!(model.meta.generator.as_deref(), Some("quire v. test"));
    }

    #[test]
    fn test_declared_language_is_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pdf.xml");
        fs::write(&path, "<document><meta><language>it</language></meta></document>").unwrap();

        let model = loader_for(&ProjectDescriptor::new("core"))
            .load(&path, &Locale::new("de"))
            .unwrap();
        assert_eq!(model.meta.language.as_deref(), Some("it"));
    }

    #[test]
    fn test_cycle_keeps_its_cause() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pdf.xml");
        fs::write(&path, "<document outputName=\"${a}\"/>").unwrap();

        let loader = DescriptorLoader::new(
            Interpolator::new().with_source(MapValueSource::from_pairs([("a", "${b}"), ("b", "${a}")])),
            "g",
        );
        let err = loader.load(&path, &Locale::english()).unwrap_err();
        assert!(err.to_string().starts_with("Error interpolating document descriptor"));
        let cause = std::error::Error::source(&err)
            .and_then(|e| e.downcast_ref::<InterpolationError>());
        assert!(matches!(cause, Some(InterpolationError::RecursiveExpression { .. })));
    }

    #[test]
    fn test_missing_and_malformed() {
        let dir = tempdir().unwrap();
        let loader = loader_for(&ProjectDescriptor::new("core"));

        let missing = loader.load(&dir.path().join("nope.xml"), &Locale::english());
        match missing {
            Err(DescriptorError::Io { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io, got {other:?}"),
        }

        let path = dir.path().join("bad.xml");
        fs::write(&path, "<document><meta></document>").unwrap();
        let malformed = loader.load(&path, &Locale::english());
        assert!(matches!(malformed, Err(DescriptorError::Parse { .. })));
    }
}
