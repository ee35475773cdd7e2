//! Merges the TOCs and staged sites of reactor modules into the aggregating
//! project's document.
//!
//! Every module build leaves `toc.json` and a `site.tmp` directory under
//! `<build>/pdf`. The aggregator runs after all of them, reads those back
//! and re-roots each module's content under its [`StagedId`], both on disk
//! (`<site.tmp>/<dir>/<staged-id>/…`) and in the TOC (`<staged-id>/<ref>`).

use crate::toc_store;
use log::{error, info};
use quire_resource::{Excludes, copy_directory_structure, directory_names};
use quire_types::{DocumentToc, DocumentTocItem, ProjectDescriptor, StagedId, TocTree};
use std::path::{Path, PathBuf};

/// The reference of the TOC bucket holding generated report entries.
pub const PROJECT_INFO_REF: &str = "project-info";

pub const SITE_TMP: &str = "site.tmp";

/// `<build>/pdf` of `project`.
pub fn module_working_directory(project: &ProjectDescriptor) -> PathBuf {
    project.build_directory().join("pdf")
}

/// `<build>/pdf/site.tmp` of `project`.
pub fn module_site_directory_tmp(project: &ProjectDescriptor) -> PathBuf {
    module_working_directory(project).join(SITE_TMP)
}

/// What one aggregation pass did, module by module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Modules whose staged site was copied.
    pub copied: Vec<StagedId>,
    /// Modules whose staged site was skipped.
    pub skipped: Vec<StagedId>,
    /// Modules whose TOC could not be read and was replaced by an empty one.
    pub unreadable_tocs: Vec<StagedId>,
}

#[derive(Debug, Clone)]
pub struct TocAggregator {
    parent_site_tmp: PathBuf,
    excludes: Excludes,
}

impl TocAggregator {
    /// `parent_site_tmp` is the aggregating project's staged site directory.
    pub fn new(parent_site_tmp: impl Into<PathBuf>) -> Self {
        Self {
            parent_site_tmp: parent_site_tmp.into(),
            excludes: Excludes::defaults(),
        }
    }

    /// Appends one item per module of `modules` to `toc`, in order.
    ///
    /// Nothing is added when the parent's staged site directory is missing.
    /// Problems with a single module are logged and never stop the pass.
    pub fn aggregate(&self, toc: &mut DocumentToc, modules: &[ProjectDescriptor]) -> AggregationReport {
        let mut report = AggregationReport::default();

        if !self.parent_site_tmp.is_dir() {
            error!(
                "Top-level project does not have a {} directory: {}",
                SITE_TMP,
                self.parent_site_tmp.display()
            );
            return report;
        }

        for module in modules {
            info!("Appending {} reports.", module.artifact_id);
            let staged_id = module.staged_id();

            if self.copy_site_directory_tmp(module, &staged_id) {
                report.copied.push(staged_id.clone());
            } else {
                report.skipped.push(staged_id.clone());
            }

            let tree = match toc_store::load(&module_working_directory(module)) {
                Ok(tree) => tree,
                Err(e) => {
                    error!(
                        "Error while reading table of contents of module {}: {}",
                        module.artifact_id, e
                    );
                    report.unreadable_tocs.push(staged_id.clone());
                    TocTree::default()
                }
            };

            toc.add_item(module_item(module.display_name(), &staged_id, &tree));
        }
        report
    }

    /// Copies each top-level directory `D` of the module's `site.tmp` to
    /// `<parent site.tmp>/D/<staged-id>`. Returns whether anything was copied.
    fn copy_site_directory_tmp(&self, module: &ProjectDescriptor, staged_id: &StagedId) -> bool {
        if module.reporting.is_none() {
            info!("Skipping reactor project {}: no reporting", staged_id);
            return false;
        }

        let source = module_site_directory_tmp(module);
        if !source.is_dir() {
            info!("Skipping reactor project {}: no {} directory", staged_id, SITE_TMP);
            return false;
        }

        let dir_names = match directory_names(&source, &self.excludes) {
            Ok(names) => names,
            Err(e) => {
                error!("Error while listing {}: {}", source.display(), e);
                return false;
            }
        };

        for dir_name in dir_names {
            let Some(target) = self.staged_target(&dir_name, staged_id) else {
                error!("Refusing to stage {} under '{}'", module.artifact_id, staged_id);
                return false;
            };
            if let Err(e) = quire_resource::create_dir_all(&target) {
                error!("Could not create directory: {} ({})", target.display(), e);
                return false;
            }
            if let Err(e) = copy_directory_structure(&source.join(&dir_name), &target, &self.excludes) {
                error!(
                    "Error while copying sub-project {} {}: {}",
                    module.artifact_id, SITE_TMP, e
                );
                return false;
            }
        }
        true
    }

    fn staged_target(&self, dir_name: &str, staged_id: &StagedId) -> Option<PathBuf> {
        let dir = quire_resource::safe_join(&self.parent_site_tmp, dir_name)?;
        quire_resource::safe_join(&dir, staged_id.as_str())
    }

    pub fn parent_site_tmp(&self) -> &Path {
        &self.parent_site_tmp
    }
}

/// The TOC item standing for one module: named after it, referencing its
/// staged id, holding its loaded entries with qualified references.
///
/// A module whose only entry is the generated reports bucket contributes
/// the reports directly.
pub fn module_item(name: &str, staged_id: &StagedId, tree: &TocTree) -> DocumentTocItem {
    let mut entries = tree.items.as_slice();
    if let [only] = entries
        && only.reference.as_deref() == Some(PROJECT_INFO_REF)
    {
        entries = only.items.as_slice();
    }

    let qualify = |reference: Option<&str>| reference.map(|r| staged_id.qualify(r));
    DocumentTocItem {
        name: Some(name.to_string()),
        reference: Some(staged_id.to_string()),
        items: entries.iter().map(|e| e.to_item_with(&qualify)).collect(),
    }
}
