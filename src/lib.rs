//! # quire
//!
//! Assembles a project's documentation sources into a per-locale document
//! model, hands it to a renderer and merges the tables of contents of a
//! multi-module build into one aggregated document.
//!
//! The building blocks live in the `quire-*` crates; this crate wires them
//! into a [`DocumentPipeline`] and ships the `quire` command line tool.

pub mod error;
pub mod manifest;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{
    BuildMode, DocumentPipeline, ModelXmlRenderer, PdfBackend, PdfConfig, PipelineBuilder,
    PipelineOutcome, TocPlacement,
};
pub use quire_types::{DocumentModel, Locale, ProjectDescriptor};
