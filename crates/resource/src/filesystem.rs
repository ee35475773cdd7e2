//! Filesystem operations on staged site directories.
//!
//! Staged content is addressed with module identifiers that come from
//! project metadata, so every join of an untrusted relative path goes through
//! [`safe_join`], which refuses absolute paths and `..` components.

use crate::excludes::Excludes;
use crate::StageError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Joins `relative` onto `base`, returning `None` if the result could escape
/// `base`.
pub fn safe_join(base: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    if relative.is_absolute() {
        return None;
    }
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return None,
        }
    }
    Some(base.join(relative))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StageError + '_ {
    move |source| StageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn create_dir_all(dir: &Path) -> Result<(), StageError> {
    fs::create_dir_all(dir).map_err(io_error(dir))
}

/// Copies one file, creating the destination's parent directories.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), StageError> {
    if let Some(parent) = to.parent() {
        create_dir_all(parent)?;
    }
    fs::copy(from, to).map_err(io_error(from))?;
    Ok(())
}

/// Names of the immediate sub-directories of `dir`, sorted, minus excluded
/// ones.
pub fn directory_names(dir: &Path, excludes: &Excludes) -> Result<Vec<String>, StageError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        if !entry.path().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !excludes.matches(Path::new(&name)) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Every file below `dir`, as sorted paths relative to `dir`, minus excluded
/// ones. A missing `dir` yields an empty list.
pub fn file_names(dir: &Path, excludes: &Excludes) -> Result<Vec<PathBuf>, StageError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(|e| StageError::Walk {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        if !excludes.matches(relative) {
            files.push(relative.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Copies the tree under `from` into `to`, preserving its structure and
/// overwriting existing files. Returns the number of files copied.
pub fn copy_directory_structure(
    from: &Path,
    to: &Path,
    excludes: &Excludes,
) -> Result<usize, StageError> {
    if !from.is_dir() {
        return Err(StageError::NotADirectory(from.to_path_buf()));
    }
    create_dir_all(to)?;

    let files = file_names(from, excludes)?;
    for relative in &files {
        copy_file(&from.join(relative), &to.join(relative))?;
    }
    Ok(files.len())
}

/// Deletes everything below `dir` matching the default excludes.
pub fn remove_default_excludes(dir: &Path) -> Result<usize, StageError> {
    let mut doomed = Vec::new();
    let mut walker = WalkDir::new(dir).min_depth(1).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| StageError::Walk {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let name = entry.file_name().to_string_lossy();
        if Excludes::is_default_excluded(&name) {
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            doomed.push((entry.path().to_path_buf(), entry.file_type().is_dir()));
        }
    }

    for (path, is_dir) in &doomed {
        if *is_dir {
            fs::remove_dir_all(path).map_err(io_error(path))?;
        } else {
            fs::remove_file(path).map_err(io_error(path))?;
        }
    }
    Ok(doomed.len())
}
