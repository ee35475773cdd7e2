// src/pipeline/orchestrator.rs
use super::config::{BuildMode, PdfConfig};
use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use log::{debug, error, info, log_enabled, warn};
use quire_core::aggregator::TocAggregator;
use quire_core::dump::dump_model;
use quire_core::staging::{
    generated_documents, merge_generated_site, prepare_site_directory, report_output_directory,
    site_provides,
};
use quire_core::title::document_title;
use quire_core::{
    AggregationReport, DefaultModelSynthesizer, DescriptorLoader, LocaleResolver, Locales,
    PROJECT_INFO_REF, generator_string, toc_store,
};
use quire_resource::create_dir_all;
use quire_source::Interpolator;
use quire_traits::i18n::TOC_PROJECT_INFO_ITEM;
use quire_traits::{
    DecorationLoader, DecorationModel, DocumentRenderer, MessageCatalog, RenderContext,
    ReportDescriptor, ReportGenerator, SiteTool,
};
use quire_types::{DocumentModel, DocumentTocItem, Locale, ProjectDescriptor};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

/// What a finished build produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutcome {
    /// The locales built, default first.
    pub locales: Vec<Locale>,
    /// The rendered files at their final location, one per locale that
    /// produced one.
    pub outputs: Vec<PathBuf>,
    /// Set in aggregate mode: what the aggregation pass of the default
    /// locale did.
    pub aggregation: Option<AggregationReport>,
}

/// Builds one project's document for every configured locale.
///
/// Created through [`super::PipelineBuilder`]. A pipeline can be executed
/// more than once; every run starts from scratch.
#[derive(Debug)]
pub struct DocumentPipeline {
    project: ProjectDescriptor,
    config: PdfConfig,
    renderer: Box<dyn DocumentRenderer>,
    report_generator: Box<dyn ReportGenerator>,
    decoration_loader: Box<dyn DecorationLoader>,
    message_catalog: Box<dyn MessageCatalog>,
    site_tool: Box<dyn SiteTool>,
    build_properties: BTreeMap<String, String>,
    reactor: Vec<ProjectDescriptor>,
    build_instant: DateTime<Utc>,
}

/// Per-run caches. Models and report lists are never shared between locales.
#[derive(Default)]
struct RunState {
    models: HashMap<Locale, DocumentModel>,
    generated_reports: HashMap<Locale, Vec<ReportDescriptor>>,
    default_decoration: Option<Option<DecorationModel>>,
    aggregation: Option<AggregationReport>,
}

impl DocumentPipeline {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        project: ProjectDescriptor,
        config: PdfConfig,
        renderer: Box<dyn DocumentRenderer>,
        report_generator: Box<dyn ReportGenerator>,
        decoration_loader: Box<dyn DecorationLoader>,
        message_catalog: Box<dyn MessageCatalog>,
        site_tool: Box<dyn SiteTool>,
        build_properties: BTreeMap<String, String>,
        reactor: Vec<ProjectDescriptor>,
        build_instant: DateTime<Utc>,
    ) -> Self {
        Self {
            project,
            config,
            renderer,
            report_generator,
            decoration_loader,
            message_catalog,
            site_tool,
            build_properties,
            reactor,
            build_instant,
        }
    }

    pub fn config(&self) -> &PdfConfig {
        &self.config
    }

    pub fn project(&self) -> &ProjectDescriptor {
        &self.project
    }

    /// The locales this pipeline builds, default first.
    pub fn locales(&self) -> Locales {
        LocaleResolver::new(self.site_tool.as_ref())
            .resolve(self.config.locales.as_deref())
            .clone()
    }

    /// The `meta.generator` value of models built by this pipeline.
    pub fn generator(&self) -> String {
        generator_string(self.config.implementation.name())
    }

    /// Runs the whole build: stage the site, then per locale generate reports,
    /// build the model and render it, then move the outputs into place.
    ///
    /// A failure aborts the run; locales rendered before it keep their output
    /// in the working directory.
    pub fn execute(&self) -> Result<PipelineOutcome, PipelineError> {
        let locales = self.locales();
        let loader = self.descriptor_loader();
        let context = self.render_context();
        let mut state = RunState::default();

        info!(
            "Building document of {} for locale(s) {}",
            self.project.artifact_id,
            locales.ordered().iter().map(Locale::to_string).collect::<Vec<_>>().join(", ")
        );
        self.prepare_site(&locales)?;

        for locale in locales.ordered() {
            self.render_locale(locale, &locales, &loader, &context, &mut state)
                .map_err(|e| PipelineError::for_locale(locale, e))?;
        }

        let default_locale = locales.default_locale();
        let output_name = self
            .document_model(default_locale, &locales, &loader, &mut state, true)?
            .output_file_name(self.renderer.output_extension())
            .unwrap_or_else(|| {
                format!("{}.{}", self.project.artifact_id, self.renderer.output_extension())
            });
        let outputs = self.copy_generated_outputs(&locales, &output_name)?;

        Ok(PipelineOutcome {
            locales: locales.ordered().to_vec(),
            outputs,
            aggregation: state.aggregation,
        })
    }

    /// The model handed to the renderer for `locale`, without rendering it.
    ///
    /// Nothing is generated or written: the saved `toc.json` of an earlier
    /// build stays as it was.
    pub fn resolve_model(&self, locale: &Locale) -> Result<DocumentModel, PipelineError> {
        let locales = self.locales();
        let loader = self.descriptor_loader();
        let mut state = RunState::default();
        self.document_model(locale, &locales, &loader, &mut state, false)
    }

    fn descriptor_loader(&self) -> DescriptorLoader {
        DescriptorLoader::new(self.interpolator(), self.generator())
    }

    fn interpolator(&self) -> Interpolator {
        Interpolator::for_project(&self.build_properties, Some(&self.project), self.build_instant)
    }

    fn prepare_site(&self, locales: &Locales) -> Result<(), PipelineError> {
        let site_tmp = self.config.site_directory_tmp();
        match self.config.mode {
            BuildMode::Module => prepare_site_directory(
                &self.config.site_directory,
                &self.config.generated_site_directory,
                &site_tmp,
                locales,
            )?,
            BuildMode::Aggregate => create_dir_all(&site_tmp)?,
        }
        Ok(())
    }

    fn render_locale(
        &self,
        locale: &Locale,
        locales: &Locales,
        loader: &DescriptorLoader,
        context: &RenderContext,
        state: &mut RunState,
    ) -> Result<(), PipelineError> {
        let working_dir = locales.locale_directory(&self.config.working_directory, locale);
        let source_dir = locales.locale_directory(&self.config.site_directory_tmp(), locale);
        create_dir_all(&working_dir)?;

        self.generate_reports(locale, locales, state)?;

        if !self.config.aggregate {
            debug!("Rendering each source document of locale {} on its own", locale);
            self.renderer.render(&source_dir, &working_dir, None, context)?;
            return Ok(());
        }

        let model = self.document_model(locale, locales, loader, state, true)?;
        info!(
            "Rendering {} with the '{}' renderer into {}",
            locale,
            self.renderer.name(),
            working_dir.display()
        );
        if let Err(e) = self.renderer.render(&source_dir, &working_dir, Some(&model), context) {
            self.dump_for_debugging(&model);
            return Err(e.into());
        }
        Ok(())
    }

    /// Descriptor-backed when a descriptor exists for `locale`, synthesized
    /// from the project otherwise. Built once per locale and run; its TOC is
    /// saved to the working directory when `persist` is set.
    fn document_model(
        &self,
        locale: &Locale,
        locales: &Locales,
        loader: &DescriptorLoader,
        state: &mut RunState,
        persist: bool,
    ) -> Result<DocumentModel, PipelineError> {
        if let Some(model) = state.models.get(locale) {
            return Ok(model.clone());
        }

        let descriptor = DescriptorLoader::effective_path(&self.config.doc_descriptor, Some(locale));
        let synthesized = !descriptor.is_file();
        let mut model = if synthesized {
            debug!("No document descriptor at {}, using project metadata", descriptor.display());
            let decoration = self.default_decoration(locales, state)?;
            DefaultModelSynthesizer::new(
                &self.project,
                decoration,
                self.message_catalog.as_ref(),
                self.generator(),
                self.build_instant,
            )
            .synthesize(locale, locales.default_locale())
        } else {
            loader.load(&self.config.doc_descriptor, locale)?
        };

        self.append_generated_reports(&mut model, locale, locales, state);

        if persist {
            if let Err(e) = toc_store::save(&self.config.working_directory, &model.toc) {
                error!("Error while writing table of contents: {}", e);
            }
        }

        if synthesized {
            self.dump_for_debugging(&model);
        }

        state.models.insert(locale.clone(), model.clone());
        Ok(model)
    }

    fn default_decoration<'s>(
        &self,
        locales: &Locales,
        state: &'s mut RunState,
    ) -> Result<Option<&'s DecorationModel>, PipelineError> {
        if state.default_decoration.is_none() {
            let decoration = self.decoration_loader.load(locales.default_locale())?;
            state.default_decoration = Some(decoration);
        }
        Ok(state.default_decoration.as_ref().and_then(Option::as_ref))
    }

    /// Appends the "Project Reports" bucket: one entry per generated report,
    /// then one per titled document of the generated site not already listed.
    fn append_generated_reports(
        &self,
        model: &mut DocumentModel,
        locale: &Locale,
        locales: &Locales,
        state: &mut RunState,
    ) {
        if let Some(reports) = state.generated_reports.get(locale).filter(|r| !r.is_empty()) {
            let mut bucket = DocumentTocItem::new(
                self.message_catalog.message(locale, TOC_PROJECT_INFO_ITEM),
                PROJECT_INFO_REF,
            );
            let mut added: HashSet<String> = HashSet::new();
            for report in reports {
                bucket.add_item(DocumentTocItem::new(&report.name, &report.output_name));
                added.insert(report.output_name.clone());
            }
            self.append_generated_documents(&mut bucket, &mut added, locale, locales);
            model.toc.add_item(bucket);
        }

        if self.config.mode == BuildMode::Aggregate {
            let report = TocAggregator::new(self.config.site_directory_tmp())
                .aggregate(&mut model.toc, &self.reactor);
            debug!(
                "Aggregated {} module(s), {} staged site(s) copied",
                self.reactor.len(),
                report.copied.len()
            );
            state.aggregation.get_or_insert(report);
        }
    }

    fn append_generated_documents(
        &self,
        bucket: &mut DocumentTocItem,
        added: &mut HashSet<String>,
        locale: &Locale,
        locales: &Locales,
    ) {
        let documents =
            match generated_documents(&self.config.generated_site_directory, locale, locales) {
                Ok(documents) => documents,
                Err(e) => {
                    error!("Unable to list the generated site documents: {}", e);
                    return;
                }
            };
        for (reference, file) in documents {
            if added.contains(&reference) {
                continue;
            }
            if let Some(title) = document_title(&file) {
                bucket.add_item(DocumentTocItem::new(&title, &reference));
                added.insert(reference);
            }
        }
    }

    /// Generates the configured reports for `locale` into the generated site
    /// and merges them into the staged site.
    fn generate_reports(
        &self,
        locale: &Locale,
        locales: &Locales,
        state: &mut RunState,
    ) -> Result<(), PipelineError> {
        if !self.config.include_reports() {
            info!("Skipped report generation.");
            return Ok(());
        }
        if self.project.reporting.is_none() {
            info!("No report was specified.");
            return Ok(());
        }

        let reports = match self.report_generator.reports(locale) {
            Ok(reports) => reports,
            Err(e) => {
                warn!("Unable to list the reports of {}: {}", self.project.artifact_id, e);
                return Ok(());
            }
        };

        let generated_tmp = self.config.generated_site_directory_tmp();
        for report in reports {
            if !report.can_generate {
                info!("Skipped \"{}\" report.", report.name);
                continue;
            }
            if report.external {
                info!("Skipped external \"{}\" report.", report.name);
                continue;
            }
            let generated = state.generated_reports.entry(locale.clone()).or_default();
            if generated.iter().any(|r| r.output_name == report.output_name) {
                debug!("\"{}\" report already generated for locale {}", report.name, locale);
                continue;
            }
            if site_provides(&self.config.site_directory, &report.output_name, locale, locales)? {
                info!(
                    "Skipped \"{}\" report, file \"{}\" already exists for the {} version.",
                    report.name, report.output_name, locale
                );
                continue;
            }

            let out_dir = report_output_directory(&generated_tmp, locale, locales);
            create_dir_all(&out_dir)?;
            match self.report_generator.generate(&report, locale, &out_dir) {
                Ok(path) => {
                    debug!("Generated \"{}\" report into {}", report.name, path.display());
                    generated.push(report);
                }
                Err(e) => warn!("Error when generating \"{}\" report: {}", report.name, e),
            }
        }

        let site_tmp = self.config.site_directory_tmp();
        merge_generated_site(&generated_tmp, &self.config.site_directory, &site_tmp, locales)?;
        merge_generated_site(
            &self.config.generated_site_directory,
            &self.config.site_directory,
            &site_tmp,
            locales,
        )?;
        Ok(())
    }

    fn render_context(&self) -> RenderContext {
        let mut context = RenderContext::new();
        context.insert("generateTOC".to_string(), self.config.generate_toc.to_string());
        context.insert("validate".to_string(), self.config.validate.to_string());
        context.insert("implementation".to_string(), self.config.implementation.to_string());

        let project = &self.project;
        let coordinates = [
            ("project.groupId", project.group_id.as_deref()),
            ("project.artifactId", Some(project.artifact_id.as_str())),
            ("project.version", project.version.as_deref()),
            ("project.name", Some(project.display_name())),
        ];
        for (key, value) in coordinates {
            if let Some(value) = value {
                context.insert(key.to_string(), value.to_string());
            }
        }
        context.extend(project.properties.clone());
        context
    }

    fn dump_for_debugging(&self, model: &DocumentModel) {
        if !log_enabled!(log::Level::Debug) {
            return;
        }
        let dir = self.project.build_directory().join("pdf");
        match dump_model(model, &dir) {
            Ok(path) => debug!("Generated document model written to {}", path.display()),
            Err(e) => debug!("Could not write the document model to {}: {}", dir.display(), e),
        }
    }

    /// Moves each locale's `file_name` from the working into the output
    /// directory when the two differ.
    fn copy_generated_outputs(
        &self,
        locales: &Locales,
        file_name: &str,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        create_dir_all(&self.config.output_directory)?;
        create_dir_all(&self.config.working_directory)?;
        let require_copy = fs::canonicalize(&self.config.output_directory)?
            != fs::canonicalize(&self.config.working_directory)?;

        let mut outputs = Vec::new();
        for locale in locales.ordered() {
            let generated = locales
                .locale_directory(&self.config.working_directory, locale)
                .join(file_name);
            if !generated.is_file() {
                warn!("Unable to find the generated file: {}", generated.display());
                continue;
            }
            if !require_copy {
                outputs.push(generated);
                continue;
            }

            let target = locales
                .locale_directory(&self.config.output_directory, locale)
                .join(file_name);
            quire_resource::copy_file(&generated, &target)?;
            fs::remove_file(&generated)?;
            info!("pdf generated: {}", target.display());
            outputs.push(target);
        }
        Ok(outputs)
    }
}

