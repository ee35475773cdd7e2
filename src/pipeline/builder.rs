// src/pipeline/builder.rs
use super::config::PdfConfig;
use super::orchestrator::DocumentPipeline;
use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use quire_core::SiteDescriptorLoader;
use quire_source::Interpolator;
use quire_traits::{
    BundledMessages, DecorationLoader, DefaultSiteTool, DocumentRenderer, MessageCatalog,
    NoReports, ReportGenerator, SiteTool,
};
use quire_types::ProjectDescriptor;
use std::collections::BTreeMap;

/// A builder for creating a `DocumentPipeline`.
///
/// Only the renderer is mandatory. Everything else defaults to the built-in
/// implementations: decoration from the project's `site.xml`, the bundled
/// message catalog, syntactic locale validation and no reports.
#[derive(Debug)]
pub struct PipelineBuilder {
    project: ProjectDescriptor,
    config: Option<PdfConfig>,
    renderer: Option<Box<dyn DocumentRenderer>>,
    report_generator: Option<Box<dyn ReportGenerator>>,
    decoration_loader: Option<Box<dyn DecorationLoader>>,
    message_catalog: Option<Box<dyn MessageCatalog>>,
    site_tool: Option<Box<dyn SiteTool>>,
    build_properties: BTreeMap<String, String>,
    reactor: Vec<ProjectDescriptor>,
    build_instant: Option<DateTime<Utc>>,
}

impl PipelineBuilder {
    /// Creates a builder for `project` with module defaults
    /// (see [`PdfConfig::for_project`]).
    pub fn new(project: ProjectDescriptor) -> Self {
        Self {
            project,
            config: None,
            renderer: None,
            report_generator: None,
            decoration_loader: None,
            message_catalog: None,
            site_tool: None,
            build_properties: BTreeMap::new(),
            reactor: Vec::new(),
            build_instant: None,
        }
    }

    pub fn with_config(mut self, config: PdfConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_renderer(mut self, renderer: impl DocumentRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_report_generator(mut self, generator: impl ReportGenerator + 'static) -> Self {
        self.report_generator = Some(Box::new(generator));
        self
    }

    pub fn with_decoration_loader(mut self, loader: impl DecorationLoader + 'static) -> Self {
        self.decoration_loader = Some(Box::new(loader));
        self
    }

    pub fn with_message_catalog(mut self, catalog: impl MessageCatalog + 'static) -> Self {
        self.message_catalog = Some(Box::new(catalog));
        self
    }

    pub fn with_site_tool(mut self, site_tool: impl SiteTool + 'static) -> Self {
        self.site_tool = Some(Box::new(site_tool));
        self
    }

    /// Build-level properties. Project properties win on key collisions.
    pub fn with_build_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.build_properties = properties;
        self
    }

    /// The modules aggregated in aggregate mode, in build order.
    pub fn with_reactor(mut self, modules: Vec<ProjectDescriptor>) -> Self {
        self.reactor = modules;
        self
    }

    /// Pins the instant used for `${date}`-style values and cover dates.
    pub fn with_build_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.build_instant = Some(instant);
        self
    }

    /// Consumes the builder and creates the `DocumentPipeline`.
    pub fn build(self) -> Result<DocumentPipeline, PipelineError> {
        let renderer = self.renderer.ok_or_else(|| {
            PipelineError::Config(
                "No renderer has been configured. Use `with_renderer`.".to_string(),
            )
        })?;
        let config = self
            .config
            .unwrap_or_else(|| PdfConfig::for_project(&self.project));
        let build_instant = self.build_instant.unwrap_or_else(Utc::now);

        if config.doc_descriptor.as_os_str().is_empty() {
            return Err(PipelineError::Config(
                "The document descriptor path is empty.".to_string(),
            ));
        }

        let decoration_loader = match self.decoration_loader {
            Some(loader) => loader,
            None => Box::new(SiteDescriptorLoader::new(
                config.site_directory.clone(),
                Interpolator::for_project(&self.build_properties, Some(&self.project), build_instant),
            )),
        };

        Ok(DocumentPipeline::new(
            self.project,
            config,
            renderer,
            self.report_generator.unwrap_or_else(|| Box::new(NoReports)),
            decoration_loader,
            self.message_catalog
                .unwrap_or_else(|| Box::new(BundledMessages::new())),
            self.site_tool
                .unwrap_or_else(|| Box::new(DefaultSiteTool::default())),
            self.build_properties,
            self.reactor,
            build_instant,
        ))
    }
}
