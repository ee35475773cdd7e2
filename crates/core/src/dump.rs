//! Debug dumps of generated document models.

use crate::descriptor::write_model;
use crate::error::CoreError;
use quire_resource::create_dir_all;
use quire_types::DocumentModel;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `model` as a descriptor to a fresh `pdf-*.xml` file in `dir`.
pub fn dump_model(model: &DocumentModel, dir: &Path) -> Result<PathBuf, CoreError> {
    create_dir_all(dir)?;

    let file = tempfile::Builder::new()
        .prefix("pdf-")
        .suffix(".xml")
        .tempfile_in(dir)?;
    let (file, path) = file.keep().map_err(|e| CoreError::Io(e.error))?;

    let mut writer = BufWriter::new(file);
    write_model(model, &mut writer)?;
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_dump_creates_fresh_files() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target/pdf");
        let model = DocumentModel {
            output_name: Some("core".to_string()),
            ..Default::default()
        };

        let first = dump_model(&model, &target).unwrap();
        let second = dump_model(&model, &target).unwrap();

        assert_ne!(first, second);
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pdf-") && name.ends_with(".xml"));
        assert!(fs::read_to_string(first).unwrap().contains("outputName=\"core\""));
    }
}
