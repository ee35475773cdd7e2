// src/error.rs
use quire_core::{CoreError, DescriptorError, TocStoreError};
use quire_resource::StageError;
use quire_traits::CollaboratorError;
use thiserror::Error;

/// The top-level error for a document build.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid project manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error reading document descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("Error while handling the table of contents: {0}")]
    TocStore(#[from] TocStoreError),

    #[error("Error preparing the staged site: {0}")]
    Stage(#[from] StageError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure while building one locale's document. Locales built before
    /// it keep their output.
    #[error("Error during document generation for locale '{locale}': {source}")]
    Locale {
        locale: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    pub fn for_locale(locale: impl ToString, source: PipelineError) -> Self {
        PipelineError::Locale {
            locale: locale.to_string(),
            source: Box::new(source),
        }
    }
}
