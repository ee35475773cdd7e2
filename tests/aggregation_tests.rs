mod common;

use common::{RecordingRenderer, TestResult, descriptor, init_logging, module, project, write};
use quire::{BuildMode, PdfConfig, PipelineBuilder, ProjectDescriptor};
use quire_core::{PROJECT_INFO_REF, toc_store};
use quire_types::{DocumentToc, DocumentTocItem, Reporting, StagedId};

/// Builds `project`'s own document from a descriptor with a single `x` entry.
fn build_module(project: &ProjectDescriptor) -> TestResult {
    let site = project.basedir.join("src/site");
    write(&site.join("pdf.xml"), &descriptor(&project.artifact_id, &[("X", "x")]))?;
    write(&site.join("xdoc/x.xml"), "<document/>")?;

    PipelineBuilder::new(project.clone())
        .with_renderer(RecordingRenderer::new())
        .build()?
        .execute()?;
    Ok(())
}

fn reactor(base: &std::path::Path) -> Vec<ProjectDescriptor> {
    let mut root = project(base, "root");
    root.reporting = Some(Reporting::default());
    let a = module(&root, "a");
    let b = module(&a, "b");
    vec![root, a, b]
}

#[test]
fn test_nested_modules_are_qualified_by_staged_id() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let modules = reactor(dir.path());
    for module in &modules {
        build_module(module)?;
    }

    let root = modules[0].clone();
    let config = PdfConfig::aggregate_for(&root);
    assert_eq!(config.mode, BuildMode::Aggregate);
    let site_tmp = config.site_directory_tmp();

    let renderer = RecordingRenderer::new();
    let outcome = PipelineBuilder::new(root.clone())
        .with_config(config)
        .with_renderer(renderer.clone())
        .with_reactor(modules)
        .build()?
        .execute()?;

    let model = renderer.calls()[0].model.clone().ok_or("no model")?;
    let top: Vec<_> = model
        .toc
        .items
        .iter()
        .map(|i| i.reference.clone().unwrap_or_default())
        .collect();
    assert_eq!(top, vec!["x", "root", "root/a", "root/a/b"]);

    let child_refs = |index: usize| -> Vec<String> {
        model.toc.items[index]
            .items
            .iter()
            .map(|i| i.reference.clone().unwrap_or_default())
            .collect()
    };
    assert_eq!(child_refs(1), vec!["root/x"]);
    assert_eq!(child_refs(2), vec!["root/a/x"]);
    assert_eq!(child_refs(3), vec!["root/a/b/x"]);
    assert_eq!(model.toc.items[2].name.as_deref(), Some("a"));

    assert!(site_tmp.join("xdoc/root/a/b/x.xml").is_file());
    assert!(site_tmp.join("xdoc/root/a/x.xml").is_file());

    let aggregation = outcome.aggregation.ok_or("no aggregation report")?;
    assert_eq!(aggregation.copied.len(), 3);
    assert!(aggregation.unreadable_tocs.is_empty());

    let output = root.build_directory().join("pdf-aggregate/root.pdf");
    assert_eq!(outcome.outputs, vec![output]);
    Ok(())
}

#[test]
fn test_module_reports_bucket_collapses_into_module_item() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let modules = reactor(dir.path());
    let root = modules[0].clone();
    let a = modules[1].clone();

    let mut bucket = DocumentTocItem::new("Project Reports", PROJECT_INFO_REF);
    bucket.add_item(DocumentTocItem::new("Licenses", "license"));
    bucket.add_item(DocumentTocItem::new("Team", "team"));
    let mut toc = DocumentToc::default();
    toc.add_item(bucket);
    let working_dir = a.build_directory().join("pdf");
    toc_store::save(&working_dir, &toc)?;
    std::fs::create_dir_all(working_dir.join("site.tmp"))?;

    let renderer = RecordingRenderer::new();
    PipelineBuilder::new(root.clone())
        .with_config(PdfConfig::aggregate_for(&root))
        .with_renderer(renderer.clone())
        .with_reactor(vec![a])
        .build()?
        .execute()?;

    let model = renderer.calls()[0].model.clone().ok_or("no model")?;
    let module_item = &model.toc.items[0];
    assert_eq!(module_item.reference.as_deref(), Some("root/a"));
    let refs: Vec<_> = module_item
        .items
        .iter()
        .map(|i| i.reference.clone().unwrap_or_default())
        .collect();
    assert_eq!(refs, vec!["root/a/license", "root/a/team"]);
    Ok(())
}

#[test]
fn test_module_without_toc_still_gets_an_item() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let modules = reactor(dir.path());
    let root = modules[0].clone();

    let renderer = RecordingRenderer::new();
    let outcome = PipelineBuilder::new(root.clone())
        .with_config(PdfConfig::aggregate_for(&root))
        .with_renderer(renderer.clone())
        .with_reactor(modules[1..].to_vec())
        .build()?
        .execute()?;

    let model = renderer.calls()[0].model.clone().ok_or("no model")?;
    assert_eq!(model.toc.items.len(), 2);
    assert!(model.toc.items.iter().all(|i| i.items.is_empty()));

    let aggregation = outcome.aggregation.ok_or("no aggregation report")?;
    assert_eq!(
        aggregation.unreadable_tocs,
        vec![StagedId::new("root/a"), StagedId::new("root/a/b")]
    );
    assert_eq!(aggregation.skipped.len(), 2);
    Ok(())
}

#[test]
fn test_toc_round_trip_keeps_shape() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;

    let empty = DocumentToc::default();
    toc_store::save(dir.path(), &empty)?;
    let loaded = toc_store::load(dir.path())?;
    assert!(loaded.items.is_empty());

    let mut guide = DocumentTocItem::new("Guide", "guide");
    let mut install = DocumentTocItem::new("Install", "guide/install");
    install.add_item(DocumentTocItem::new("Linux", "guide/install/linux"));
    guide.add_item(install);
    guide.add_item(DocumentTocItem::new("Upgrade", "guide/upgrade"));
    let mut toc = DocumentToc {
        name: Some("Contents".to_string()),
        ..Default::default()
    };
    toc.add_item(guide);
    toc.add_item(DocumentTocItem::new("FAQ", "faq"));

    toc_store::save(dir.path(), &toc)?;
    let loaded = toc_store::load(dir.path())?;

    assert_eq!(loaded.name.as_deref(), Some("Contents"));
    assert_eq!(loaded.items[0].items[0].items[0].reference.as_deref(), Some("guide/install/linux"));
    assert_eq!(loaded.items[0].items[1].name.as_deref(), Some("Upgrade"));
    assert_eq!(loaded.items[1].reference.as_deref(), Some("faq"));

    let json = std::fs::read_to_string(toc_store::toc_file(dir.path()))?;
    assert!(json.starts_with("{\n  \"name\": \"Contents\""));
    Ok(())
}
