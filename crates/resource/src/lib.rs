//! Staged site directories for quire document builds.
//!
//! Site sources are never rendered in place. They are first copied into a
//! staging directory, minus SCM metadata and the sub-directories that belong
//! to other locales. This crate holds the exclusion rules and the filesystem
//! helpers used for that staging, and for copying module sites under their
//! staged identifiers during aggregation.

mod excludes;
mod filesystem;

use std::path::PathBuf;
use thiserror::Error;

pub use excludes::{DEFAULT_EXCLUDES, Excludes};
pub use filesystem::{
    copy_directory_structure, copy_file, create_dir_all, directory_names, file_names,
    remove_default_excludes, safe_join,
};

#[derive(Error, Debug)]
pub enum StageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk '{path}': {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}
