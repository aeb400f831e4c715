//! Integration tests for the segment → compose → verify stages.
//!
//! No PDF backend is needed: the extraction artifacts are produced with
//! [`build_document`] from in-memory page texts, exactly as `extract_pdf`
//! would after decoding.

use docsplit::verify::Check;
use docsplit::{
    build_document, compose_docx, parse_markdown, plan_document, render_markdown, segment_file,
    verify_outputs, ExtractionDocument, Glossary, OutputLayout, PipelineConfig,
    PipelineProgressCallback, Section, Stage,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("docsplit=debug"))
        .with_test_writer()
        .try_init();
}

const PAGES: &[&str] = &[
    "CRYSTALS-Dilithium\nAbstract\nWe present a digital signature scheme based on\nlattice problems. The signature is short.\n",
    "1. Introduction\nLattice-based crypto-\ngraphy is a candidate for\tpost-quantum\nsecurity.\n\n\n\nThe digital signature scheme is simple.",
    "5 Security Analysis\nSUF-CMA security follows.\nReferences\n[1] Ducas et al.",
];

const GLOSSARY: &str = "terms:\n  digital signature: 数字签名\n  signature: 签名\n  lattice: 格\n";

/// Write `<stem>_en.md`, `<stem>_en.json` and the glossary into a fresh layout.
fn seed_layout(root: &Path, config: &PipelineConfig) -> (OutputLayout, ExtractionDocument) {
    let layout = OutputLayout::new(root, config);
    let raw: Vec<String> = PAGES.iter().map(|p| p.to_string()).collect();
    let document = build_document("Dilithium.pdf", &raw, config);

    std::fs::create_dir_all(&layout.out_dir).unwrap();
    std::fs::write(&layout.markdown, render_markdown(&document.sections)).unwrap();
    std::fs::write(
        &layout.json,
        serde_json::to_string_pretty(&document).unwrap(),
    )
    .unwrap();
    std::fs::create_dir_all(layout.glossary.parent().unwrap()).unwrap();
    std::fs::write(&layout.glossary, GLOSSARY).unwrap();

    (layout, document)
}

#[derive(Default)]
struct RecordingCallback {
    events: Mutex<Vec<(Stage, String)>>,
}

impl PipelineProgressCallback for RecordingCallback {
    fn on_item_complete(&self, stage: Stage, _index: usize, _total: usize, label: &str) {
        self.events.lock().unwrap().push((stage, label.to_string()));
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_sections_detected_across_pages() {
    let raw: Vec<String> = PAGES.iter().map(|p| p.to_string()).collect();
    let doc = build_document("Dilithium.pdf", &raw, &PipelineConfig::default());

    let titles: Vec<&str> = doc.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Abstract", "1. Introduction", "5 Security Analysis", "References"]
    );
    assert!(doc.sections[1].content.contains("cryptography"));
    assert_eq!(doc.total_pages, 3);
}

#[test]
fn test_markdown_artifact_round_trips() {
    let raw: Vec<String> = PAGES.iter().map(|p| p.to_string()).collect();
    let doc = build_document("Dilithium.pdf", &raw, &PipelineConfig::default());
    assert_eq!(parse_markdown(&render_markdown(&doc.sections)), doc.sections);
}

#[tokio::test]
async fn test_segment_from_markdown_and_json_agree() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::default();
    let (layout, _) = seed_layout(dir.path(), &config);

    let from_md = segment_file(&layout.markdown, dir.path().join("from_md"), &config)
        .await
        .unwrap();
    let from_json = segment_file(&layout.json, dir.path().join("from_json"), &config)
        .await
        .unwrap();

    let names = |files: &[docsplit::SectionFile]| -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    };
    assert_eq!(names(&from_md.files), names(&from_json.files));
    assert_eq!(
        names(&from_md.files),
        vec![
            "01_Abstract.md",
            "02_1_Introduction.md",
            "03_5_Security_Analysis.md",
            "04_References.md",
        ]
    );

    for (a, b) in from_md.files.iter().zip(&from_json.files) {
        assert_eq!(
            std::fs::read_to_string(&a.path).unwrap(),
            std::fs::read_to_string(&b.path).unwrap()
        );
    }
}

#[tokio::test]
async fn test_full_pipeline_with_one_human_translation() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let recorder = Arc::new(RecordingCallback::default());
    let config = PipelineConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let (layout, _) = seed_layout(dir.path(), &config);

    segment_file(&layout.markdown, &layout.sections_dir, &config)
        .await
        .unwrap();

    std::fs::create_dir_all(&layout.translation_dir).unwrap();
    std::fs::write(
        layout.translation_dir.join("01_Abstract.zh.md"),
        "# 摘要\n\n我们提出了一种基于格问题的数字签名方案。\n",
    )
    .unwrap();

    let composed = compose_docx(
        &layout.sections_dir,
        &layout.docx,
        &layout.glossary,
        Some(layout.translation_dir.as_path()),
        &config,
    )
    .await
    .unwrap();

    assert_eq!(composed.stats.section_files, 4);
    assert_eq!(composed.stats.human_translations, 1);
    assert_eq!(composed.stats.placeholders, 3);
    assert_eq!(composed.stats.glossary_terms, 3);

    let docx = std::fs::read(&layout.docx).unwrap();
    assert!(docx.starts_with(b"PK"), "docx must be a zip archive");

    let compose_events = recorder
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|(stage, _)| *stage == Stage::Compose)
        .count();
    assert_eq!(compose_events, 4);

    let report = verify_outputs(&layout);
    assert!(report.is_ok(), "problems: {:?}", report.problems);
    assert!(report.passed.iter().any(|c| matches!(
        c,
        Check::SectionDir { count, .. } if *count == 4
    )));
}

#[tokio::test]
async fn test_placeholder_body_uses_glossary_longest_first() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::default();
    let (layout, _) = seed_layout(dir.path(), &config);
    segment_file(&layout.json, &layout.sections_dir, &config)
        .await
        .unwrap();

    let glossary = Glossary::load(&layout.glossary, "terms").await.unwrap();
    let (plan, _) = plan_document(&layout.sections_dir, &glossary, None, &config)
        .await
        .unwrap();

    let docsplit::SectionBody::Placeholder { substituted } = &plan.sections[0].body else {
        panic!("expected a placeholder body");
    };
    assert!(substituted.contains("数字签名 scheme"), "got: {substituted}");
    assert!(substituted.contains("The 签名 is short"), "got: {substituted}");
    assert!(!substituted.contains("digital 签名"));
}

#[tokio::test]
async fn test_resegmenting_after_edit_drops_removed_sections() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::default();
    let (layout, document) = seed_layout(dir.path(), &config);

    segment_file(&layout.markdown, &layout.sections_dir, &config)
        .await
        .unwrap();

    let shorter: Vec<Section> = document.sections[..2].to_vec();
    std::fs::write(&layout.markdown, render_markdown(&shorter)).unwrap();
    let out = segment_file(&layout.markdown, &layout.sections_dir, &config)
        .await
        .unwrap();

    assert_eq!(out.files.len(), 2);
    let on_disk = std::fs::read_dir(&layout.sections_dir).unwrap().count();
    assert_eq!(on_disk, 2);
}

#[test]
fn test_verify_reports_missing_docx() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::default();
    let (layout, _) = seed_layout(dir.path(), &config);

    let report = verify_outputs(&layout);
    assert!(!report.is_ok());
    assert!(report
        .problems
        .iter()
        .any(|p| p.contains("Dilithium_zh.docx")));
}
