//! `toc.json`: the one file a module build leaves behind for the aggregating
//! build to read.

use crate::error::TocStoreError;
use log::debug;
use quire_types::{DocumentToc, TocTree};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOC_FILE_NAME: &str = "toc.json";

pub fn toc_file(working_dir: &Path) -> PathBuf {
    working_dir.join(TOC_FILE_NAME)
}

/// Writes `toc` to `<working_dir>/toc.json`, replacing any previous file.
pub fn save(working_dir: &Path, toc: &DocumentToc) -> Result<PathBuf, TocStoreError> {
    let path = toc_file(working_dir);
    let io_error = |source| TocStoreError::Io {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(working_dir).map_err(io_error)?;

    let tree = TocTree::from(toc);
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"  "));
    tree.serialize(&mut serializer)
        .map_err(|source| TocStoreError::Json {
            path: path.clone(),
            source,
        })?;
    out.push(b'\n');

    fs::write(&path, out).map_err(io_error)?;
    debug!("Saved TOC to {}", path.display());
    Ok(path)
}

/// Reads `<working_dir>/toc.json` back as a generic tree.
pub fn load(working_dir: &Path) -> Result<TocTree, TocStoreError> {
    let path = toc_file(working_dir);
    let text = fs::read_to_string(&path).map_err(|source| TocStoreError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| TocStoreError::Json { path, source })
}
