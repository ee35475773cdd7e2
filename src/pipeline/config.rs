use log::warn;
use quire_types::ProjectDescriptor;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The rendering implementation a build targets. Only its name travels:
/// it ends up in the generator string and the render context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PdfBackend {
    /// XSL-FO based rendering.
    #[default]
    Fo,
    /// Direct rendering through iText.
    IText,
}

impl PdfBackend {
    pub fn name(&self) -> &'static str {
        match self {
            PdfBackend::Fo => "fo",
            PdfBackend::IText => "itext",
        }
    }

    /// Like [`FromStr`], but falls back to [`PdfBackend::Fo`] with a warning.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("Invalid 'implementation' parameter: '{}', using 'fo' as default.", value);
            PdfBackend::Fo
        })
    }
}

impl FromStr for PdfBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("fo") {
            Ok(PdfBackend::Fo)
        } else if s.eq_ignore_ascii_case("itext") {
            Ok(PdfBackend::IText)
        } else {
            Err(format!("unknown implementation '{s}'"))
        }
    }
}

impl fmt::Display for PdfBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the renderer places the table of contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TocPlacement {
    None,
    #[default]
    Start,
    End,
}

impl TocPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            TocPlacement::None => "none",
            TocPlacement::Start => "start",
            TocPlacement::End => "end",
        }
    }

    /// Like [`FromStr`], but falls back to [`TocPlacement::Start`] with a warning.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("Invalid 'generateTOC' parameter: '{}', using 'start' as default.", value);
            TocPlacement::Start
        })
    }
}

impl FromStr for TocPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(TocPlacement::None),
            "start" => Ok(TocPlacement::Start),
            "end" => Ok(TocPlacement::End),
            _ => Err(format!("unknown TOC placement '{s}'")),
        }
    }
}

impl fmt::Display for TocPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a build produces a module's own document or aggregates the
/// documents of a whole reactor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    #[default]
    Module,
    Aggregate,
}

/// Settings of one document build. Paths are absolute once created through
/// [`PdfConfig::for_project`] or [`PdfConfig::aggregate_for`].
#[derive(Debug, Clone, PartialEq)]
pub struct PdfConfig {
    pub mode: BuildMode,
    pub site_directory: PathBuf,
    pub generated_site_directory: PathBuf,
    /// The document descriptor; when it does not exist a model is synthesized.
    pub doc_descriptor: PathBuf,
    pub working_directory: PathBuf,
    pub output_directory: PathBuf,
    /// Comma-separated locale codes; `None` means the default locale only.
    pub locales: Option<String>,
    pub include_reports: bool,
    pub generate_toc: TocPlacement,
    pub implementation: PdfBackend,
    /// When false the renderer gets no model and renders each source
    /// document on its own.
    pub aggregate: bool,
    pub validate: bool,
}

impl PdfConfig {
    /// Defaults for building `project`'s own document under `<build>/pdf`.
    pub fn for_project(project: &ProjectDescriptor) -> Self {
        let site_directory = project.basedir.join("src").join("site");
        let build_directory = project.build_directory();
        let pdf_directory = build_directory.join("pdf");

        Self {
            mode: BuildMode::Module,
            doc_descriptor: site_directory.join("pdf.xml"),
            generated_site_directory: build_directory.join("generated-site"),
            site_directory,
            working_directory: pdf_directory.clone(),
            output_directory: pdf_directory,
            locales: None,
            include_reports: true,
            generate_toc: TocPlacement::default(),
            implementation: PdfBackend::default(),
            aggregate: true,
            validate: false,
        }
    }

    /// Defaults for aggregating a reactor under `<build>/pdf-aggregate`.
    /// Reports are never generated in this mode.
    pub fn aggregate_for(project: &ProjectDescriptor) -> Self {
        let aggregate_directory = project.build_directory().join("pdf-aggregate");
        Self {
            mode: BuildMode::Aggregate,
            working_directory: aggregate_directory.clone(),
            output_directory: aggregate_directory,
            include_reports: false,
            ..Self::for_project(project)
        }
    }

    /// Effective report setting: aggregation only reuses what module builds
    /// produced.
    pub fn include_reports(&self) -> bool {
        self.include_reports && self.mode == BuildMode::Module
    }

    pub fn site_directory_tmp(&self) -> PathBuf {
        self.working_directory.join("site.tmp")
    }

    pub fn generated_site_directory_tmp(&self) -> PathBuf {
        self.working_directory.join("generated-site.tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(PdfBackend::parse_lenient("iText"), PdfBackend::IText);
        assert_eq!(PdfBackend::parse_lenient("pdfbox"), PdfBackend::Fo);
        assert_eq!(TocPlacement::parse_lenient("END"), TocPlacement::End);
        assert_eq!(TocPlacement::parse_lenient("middle"), TocPlacement::Start);
        assert!("middle".parse::<TocPlacement>().is_err());
    }

    #[test]
    fn test_project_defaults() {
        let mut project = ProjectDescriptor::new("core");
        project.basedir = PathBuf::from("/work/core");

        let config = PdfConfig::for_project(&project);
        assert_eq!(config.doc_descriptor, Path::new("/work/core/src/site/pdf.xml"));
        assert_eq!(config.working_directory, Path::new("/work/core/target/pdf"));
        assert_eq!(config.site_directory_tmp(), Path::new("/work/core/target/pdf/site.tmp"));
        assert!(config.include_reports());

        let aggregate = PdfConfig::aggregate_for(&project);
        assert_eq!(aggregate.mode, BuildMode::Aggregate);
        assert_eq!(aggregate.output_directory, Path::new("/work/core/target/pdf-aggregate"));
        assert!(!aggregate.include_reports());
    }
}
