//! A renderer that stops before page layout.
//!
//! PDF rendering lives outside this workspace. [`ModelXmlRenderer`] writes
//! the model it is handed back out as a document descriptor, which is enough
//! to inspect what a real renderer would receive.

use log::{debug, info};
use quire_core::descriptor::model_to_string;
use quire_traits::{CollaboratorError, DocumentRenderer, RenderContext};
use quire_types::DocumentModel;
use std::fs;
use std::path::Path;

const RENDERER_NAME: &str = "model-xml";

#[derive(Debug, Default, Clone, Copy)]
pub struct ModelXmlRenderer;

impl ModelXmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn failure(message: impl Into<String>) -> CollaboratorError {
        CollaboratorError::Render {
            renderer: RENDERER_NAME.to_string(),
            message: message.into(),
        }
    }
}

impl DocumentRenderer for ModelXmlRenderer {
    fn render(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        model: Option<&DocumentModel>,
        context: &RenderContext,
    ) -> Result<(), CollaboratorError> {
        let model = model.ok_or_else(|| {
            Self::failure("one output per source document is not supported, enable aggregation")
        })?;
        let file_name = model
            .output_file_name(self.output_extension())
            .ok_or_else(|| Self::failure("the document model has no output name"))?;

        debug!(
            "Rendering sources of {} with {} option(s)",
            source_dir.display(),
            context.len()
        );
        let xml = model_to_string(model).map_err(|e| Self::failure(e.to_string()))?;

        fs::create_dir_all(output_dir)?;
        let target = output_dir.join(file_name);
        fs::write(&target, xml)?;
        info!("Wrote document model to {}", target.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        RENDERER_NAME
    }

    fn output_extension(&self) -> &'static str {
        "xml"
    }
}
