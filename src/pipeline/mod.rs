//! Document build orchestration.
//!
//! - [`PipelineBuilder`]: fluent builder wiring a project, its configuration
//!   and the collaborators into a pipeline
//! - [`DocumentPipeline`]: runs the per-locale build
//! - [`PdfConfig`]: paths and flags of one build, with the [`PdfBackend`] and
//!   [`TocPlacement`] choices
//!
//! # Example
//!
//! ```ignore
//! use quire::{ModelXmlRenderer, PipelineBuilder};
//!
//! let outcome = PipelineBuilder::new(project)
//!     .with_renderer(ModelXmlRenderer)
//!     .build()?
//!     .execute()?;
//! ```

mod builder;
pub mod config;
mod orchestrator;
pub mod renderer;

pub use builder::PipelineBuilder;
pub use config::{BuildMode, PdfBackend, PdfConfig, TocPlacement};
pub use orchestrator::{DocumentPipeline, PipelineOutcome};
pub use renderer::ModelXmlRenderer;
