//! The rendering engine seam.
//!
//! Page layout and PDF output live outside this workspace. The pipeline hands
//! a renderer the staged source directory, the locale's output directory, the
//! resolved model and a map of named options, and expects
//! `<model.output_name>.pdf` to appear in the output directory.

use crate::error::CollaboratorError;
use quire_types::DocumentModel;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

/// Named options passed through to the renderer (`generateTOC`, `validate`,
/// project properties, ...).
pub type RenderContext = BTreeMap<String, String>;

pub trait DocumentRenderer: Debug {
    /// Renders every source document under `source_dir` into `output_dir`.
    ///
    /// When `model` is `None` the renderer produces one output per source
    /// document instead of a single aggregated one.
    fn render(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        model: Option<&DocumentModel>,
        context: &RenderContext,
    ) -> Result<(), CollaboratorError>;

    /// Returns a human-readable name for this renderer (for logging).
    fn name(&self) -> &'static str;

    /// Extension of the files this renderer produces.
    fn output_extension(&self) -> &'static str {
        "pdf"
    }
}
