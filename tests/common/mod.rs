#![allow(dead_code)]

use chrono::{DateTime, Utc};
use quire::ProjectDescriptor;
use quire_traits::{
    CollaboratorError, DocumentRenderer, RenderContext, ReportDescriptor, ReportGenerator,
};
use quire_types::{DocumentModel, Locale, Reporting};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 2024-03-01T12:00:00Z
pub fn build_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(1_709_294_400, 0).unwrap_or_default()
}

/// A project rooted at `<base>/<artifact_id>`.
pub fn project(base: &Path, artifact_id: &str) -> ProjectDescriptor {
    let mut project = ProjectDescriptor::new(artifact_id);
    project.basedir = base.join(artifact_id);
    project
}

/// A module of `parent`, rooted under the parent's base directory.
pub fn module(parent: &ProjectDescriptor, artifact_id: &str) -> ProjectDescriptor {
    let mut module = project(&parent.basedir, artifact_id);
    module.parent = Some(Box::new(parent.clone()));
    module.reporting = Some(Reporting::default());
    module
}

pub fn write(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// A descriptor with one TOC entry per `(name, ref)` pair.
pub fn descriptor(output_name: &str, items: &[(&str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(name, reference)| format!("    <item name=\"{name}\" ref=\"{reference}\"/>\n"))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <document outputName=\"{output_name}\">\n\
         <meta><title>{output_name}</title></meta>\n\
         <toc name=\"Contents\">\n{items}</toc>\n\
         </document>\n"
    )
}

#[derive(Debug, Clone)]
pub struct RenderCall {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub model: Option<DocumentModel>,
    pub context: RenderContext,
}

/// Records every call and writes an empty `<output_name>.pdf`.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<RenderCall>>>,
    failing_language: Option<String>,
    silent_language: Option<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when asked to render into a directory of `language`.
    pub fn failing_for(mut self, language: &str) -> Self {
        self.failing_language = Some(language.to_string());
        self
    }

    /// Reports success without writing anything for `language`.
    pub fn silent_for(mut self, language: &str) -> Self {
        self.silent_language = Some(language.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn is_for(language: &Option<String>, model: Option<&DocumentModel>) -> bool {
        let model_language = model.and_then(|m| m.meta.language.as_deref());
        language.is_some() && language.as_deref() == model_language
    }
}

impl DocumentRenderer for RecordingRenderer {
    fn render(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        model: Option<&DocumentModel>,
        context: &RenderContext,
    ) -> Result<(), CollaboratorError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RenderCall {
                source_dir: source_dir.to_path_buf(),
                output_dir: output_dir.to_path_buf(),
                model: model.cloned(),
                context: context.clone(),
            });
        }

        if Self::is_for(&self.failing_language, model) {
            return Err(CollaboratorError::Render {
                renderer: self.name().to_string(),
                message: "no fonts available".to_string(),
            });
        }
        if Self::is_for(&self.silent_language, model) {
            return Ok(());
        }

        if let Some(file_name) = model.and_then(|m| m.output_file_name("pdf")) {
            fs::create_dir_all(output_dir)?;
            fs::write(output_dir.join(file_name), b"%PDF-1.4\n")?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Lists a fixed set of reports and writes `<output_name>.xml` for each.
#[derive(Debug, Clone, Default)]
pub struct StubReports {
    reports: Vec<ReportDescriptor>,
    failing: Option<String>,
}

impl StubReports {
    pub fn new(reports: Vec<ReportDescriptor>) -> Self {
        Self {
            reports,
            failing: None,
        }
    }

    pub fn failing_on(mut self, output_name: &str) -> Self {
        self.failing = Some(output_name.to_string());
        self
    }
}

impl ReportGenerator for StubReports {
    fn reports(&self, _locale: &Locale) -> Result<Vec<ReportDescriptor>, CollaboratorError> {
        Ok(self.reports.clone())
    }

    fn generate(
        &self,
        report: &ReportDescriptor,
        locale: &Locale,
        out_dir: &Path,
    ) -> Result<PathBuf, CollaboratorError> {
        if self.failing.as_deref() == Some(report.output_name.as_str()) {
            return Err(CollaboratorError::Report {
                report: report.name.clone(),
                message: "plugin crashed".to_string(),
            });
        }
        let path = out_dir.join(format!("{}.xml", report.output_name));
        fs::write(
            &path,
            format!("<document lang=\"{}\"><title>{}</title></document>", locale, report.name),
        )?;
        Ok(path)
    }
}
