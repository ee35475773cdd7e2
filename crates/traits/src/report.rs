//! The report generator seam.

use crate::error::CollaboratorError;
use quire_types::Locale;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// A report the generator can produce for a locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDescriptor {
    /// Localized display name, used as the TOC entry name.
    pub name: String,
    /// Base name of the generated source document, used as the TOC reference.
    pub output_name: String,
    /// External reports produce their own output and cannot be embedded.
    pub external: bool,
    pub can_generate: bool,
}

impl ReportDescriptor {
    pub fn new(name: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output_name: output_name.into(),
            external: false,
            can_generate: true,
        }
    }
}

pub trait ReportGenerator: Debug {
    /// Lists the reports configured for the project, named for `locale`.
    fn reports(&self, locale: &Locale) -> Result<Vec<ReportDescriptor>, CollaboratorError>;

    /// Generates `report` as a source document inside `out_dir` and returns
    /// the written file.
    fn generate(
        &self,
        report: &ReportDescriptor,
        locale: &Locale,
        out_dir: &Path,
    ) -> Result<PathBuf, CollaboratorError>;
}

/// A generator for projects without reporting.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReports;

impl ReportGenerator for NoReports {
    fn reports(&self, _locale: &Locale) -> Result<Vec<ReportDescriptor>, CollaboratorError> {
        Ok(Vec::new())
    }

    fn generate(
        &self,
        report: &ReportDescriptor,
        _locale: &Locale,
        _out_dir: &Path,
    ) -> Result<PathBuf, CollaboratorError> {
        Err(CollaboratorError::Report {
            report: report.name.clone(),
            message: "no report generator configured".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reports() {
        let generator = NoReports;
        assert!(generator.reports(&Locale::english()).unwrap().is_empty());

        let report = ReportDescriptor::new("Licenses", "license");
        let result = generator.generate(&report, &Locale::english(), Path::new("."));
        assert!(matches!(result, Err(CollaboratorError::Report { .. })));
    }

    #[test]
    fn test_descriptor_defaults() {
        let report = ReportDescriptor::new("Team", "team-list");
        assert!(report.can_generate);
        assert!(!report.external);
    }
}
