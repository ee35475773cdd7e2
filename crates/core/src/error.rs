//! Error types for descriptor loading, TOC persistence and staging.

use quire_resource::StageError;
use quire_source::InterpolationError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a descriptor file into a document model.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error interpolating document descriptor '{path}': {source}")]
    Interpolation {
        path: PathBuf,
        #[source]
        source: InterpolationError,
    },

    #[error("Error parsing '{path}' at position {position}: {message}")]
    Parse {
        path: PathBuf,
        position: u64,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum TocStoreError {
    #[error("I/O error on TOC file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed TOC file '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The umbrella error for everything this crate does.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    TocStore(#[from] TocStoreError),
    #[error("Staging error: {0}")]
    Stage(#[from] StageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
