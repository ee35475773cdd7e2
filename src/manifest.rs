//! JSON project manifests read by the command line tool.
//!
//! A project manifest is a serialized [`ProjectDescriptor`]. A reactor
//! manifest nests manifests the way modules nest:
//!
//! ```json
//! { "manifest": "pom.json",
//!   "modules": [ { "manifest": "a/pom.json", "modules": [ { "manifest": "a/b/pom.json" } ] } ] }
//! ```

use crate::error::PipelineError;
use log::debug;
use quire_types::ProjectDescriptor;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ReactorEntry {
    pub manifest: PathBuf,
    #[serde(default)]
    pub modules: Vec<ReactorEntry>,
}

/// Reads a project manifest. A missing or relative `basedir` is taken
/// relative to the manifest's directory.
pub fn load_project(path: &Path) -> Result<ProjectDescriptor, PipelineError> {
    let content = fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!("Cannot read project manifest {}: {}", path.display(), e))
    })?;
    let mut project: ProjectDescriptor = serde_json::from_str(&content)?;

    let manifest_dir = manifest_directory(path);
    if !project.basedir.is_absolute() {
        project.basedir = manifest_dir.join(&project.basedir);
    }
    debug!("Loaded project {} from {}", project.artifact_id, path.display());
    Ok(project)
}

/// Reads a reactor manifest into its modules in build order, root first.
/// Each module's `parent` is set from the nesting.
pub fn load_reactor(path: &Path) -> Result<Vec<ProjectDescriptor>, PipelineError> {
    let content = fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!("Cannot read reactor manifest {}: {}", path.display(), e))
    })?;
    let root: ReactorEntry = serde_json::from_str(&content)?;

    let mut modules = Vec::new();
    collect_modules(&root, &manifest_directory(path), None, &mut modules)?;
    Ok(modules)
}

fn collect_modules(
    entry: &ReactorEntry,
    base: &Path,
    parent: Option<&ProjectDescriptor>,
    modules: &mut Vec<ProjectDescriptor>,
) -> Result<(), PipelineError> {
    let mut project = load_project(&base.join(&entry.manifest))?;
    if let Some(parent) = parent {
        project.parent = Some(Box::new(parent.clone()));
    }
    modules.push(project.clone());

    for child in &entry.modules {
        collect_modules(child, base, Some(&project), modules)?;
    }
    Ok(())
}

fn manifest_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
