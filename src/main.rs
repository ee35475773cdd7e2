//! quire - per-project document assembly

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, info};

use quire::manifest::{load_project, load_reactor};
use quire::{
    Locale, ModelXmlRenderer, PdfBackend, PdfConfig, PipelineBuilder, PipelineError,
    PipelineOutcome, ProjectDescriptor, TocPlacement,
};
use quire_core::descriptor::model_to_string;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version, about = "Assembles project documentation into per-locale documents", long_about = None)]
#[command(after_help = "EXAMPLES:
    quire resolve pom.json              Print the resolved document model
    quire pdf pom.json --locales en,fr  Build the module document for two locales
    quire aggregate reactor.json        Aggregate every module of a reactor")]
struct Cli {
    /// Log debug output (and dump generated models)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the document model of a project as a descriptor
    Resolve {
        /// Project manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Locale to resolve (defaults to the build's default locale)
        #[arg(short, long)]
        locale: Option<String>,

        #[command(flatten)]
        build: BuildArgs,
    },
    /// Build the document of one module
    Pdf {
        /// Project manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        #[command(flatten)]
        build: BuildArgs,
    },
    /// Build the aggregated document of a multi-module reactor
    Aggregate {
        /// Reactor manifest (JSON), its root manifest being the aggregating project
        #[arg(value_name = "REACTOR")]
        reactor: PathBuf,

        #[command(flatten)]
        build: BuildArgs,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Document descriptor (defaults to src/site/pdf.xml)
    #[arg(long, value_name = "FILE")]
    descriptor: Option<PathBuf>,

    /// Comma-separated locales, the first being the default one
    #[arg(long)]
    locales: Option<String>,

    /// Where the rendered documents end up
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Where documents are rendered before being moved to the output directory
    #[arg(long, value_name = "DIR")]
    working_dir: Option<PathBuf>,

    /// Rendering implementation: fo or itext
    #[arg(long)]
    implementation: Option<String>,

    /// Table of contents placement: none, start or end
    #[arg(long, value_name = "PLACEMENT")]
    generate_toc: Option<String>,

    /// Do not generate project reports
    #[arg(long)]
    no_reports: bool,

    /// Render each source document on its own instead of one document
    #[arg(long)]
    no_aggregate: bool,

    /// Ask the renderer to validate its output
    #[arg(long)]
    validate: bool,

    /// Build property, e.g. -D release.train=spring
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_property)]
    properties: Vec<(String, String)>,
}

impl BuildArgs {
    fn apply(&self, mut config: PdfConfig) -> PdfConfig {
        if let Some(descriptor) = &self.descriptor {
            config.doc_descriptor = descriptor.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_directory = dir.clone();
        }
        if let Some(dir) = &self.working_dir {
            config.working_directory = dir.clone();
        }
        if let Some(implementation) = &self.implementation {
            config.implementation = PdfBackend::parse_lenient(implementation);
        }
        if let Some(placement) = &self.generate_toc {
            config.generate_toc = TocPlacement::parse_lenient(placement);
        }
        config.locales = self.locales.clone().or(config.locales);
        config.include_reports &= !self.no_reports;
        config.aggregate &= !self.no_aggregate;
        config.validate |= self.validate;
        config
    }

    fn build_properties(&self) -> BTreeMap<String, String> {
        self.properties.iter().cloned().collect()
    }

    fn builder(&self, project: ProjectDescriptor, config: PdfConfig) -> PipelineBuilder {
        PipelineBuilder::new(project)
            .with_config(self.apply(config))
            .with_build_properties(self.build_properties())
            .with_renderer(ModelXmlRenderer::new())
    }
}

fn parse_property(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), PipelineError> {
    match command {
        Command::Resolve {
            manifest,
            locale,
            build,
        } => {
            let project = load_project(&manifest)?;
            let config = PdfConfig::for_project(&project);
            let pipeline = build.builder(project, config).build()?;

            let locale = match locale {
                Some(tag) => Locale::new(&tag),
                None => pipeline.locales().default_locale().clone(),
            };
            let model = pipeline.resolve_model(&locale)?;
            print!("{}", model_to_string(&model)?);
            Ok(())
        }
        Command::Pdf { manifest, build } => {
            let project = load_project(&manifest)?;
            let config = PdfConfig::for_project(&project);
            let outcome = build.builder(project, config).build()?.execute()?;
            report(&outcome);
            Ok(())
        }
        Command::Aggregate { reactor, build } => {
            let modules = load_reactor(&reactor)?;
            let root = modules
                .first()
                .cloned()
                .ok_or_else(|| PipelineError::Config("The reactor has no modules.".to_string()))?;
            let config = PdfConfig::aggregate_for(&root);
            let outcome = build
                .builder(root, config)
                .with_reactor(modules)
                .build()?
                .execute()?;
            report(&outcome);
            Ok(())
        }
    }
}

fn report(outcome: &PipelineOutcome) {
    if let Some(aggregation) = &outcome.aggregation {
        info!(
            "Aggregated {} module(s): {} staged, {} without a table of contents",
            aggregation.copied.len() + aggregation.skipped.len(),
            aggregation.copied.len(),
            aggregation.unreadable_tocs.len()
        );
    }
    for output in &outcome.outputs {
        println!("{}", output.display());
    }
}
