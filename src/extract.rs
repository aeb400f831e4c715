//! Stage 1: PDF → normalised text → sections → Markdown + JSON.
//!
//! Each page is normalised on its own and the pages are joined with a blank
//! line before section splitting, so a heading at the top of a page still
//! starts on its own line.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::output::{ExtractionDocument, ExtractionOutput, ExtractionStats, PageRecord};
use crate::pipeline::backend::extract_with_fallback;
use crate::pipeline::markdown::render_markdown;
use crate::pipeline::normalize::normalize_text;
use crate::pipeline::split::split_sections;
use crate::pipeline::{input, write::write_atomic};
use crate::progress::Stage;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Separator placed between normalised pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Extract a PDF and write `<stem>_<lang>.md` and `<stem>_<lang>.json` into
/// `output_dir`.
///
/// # Errors
/// - [`PipelineError::InputNotFound`] / [`PipelineError::NotAPdf`] for a bad input
/// - [`PipelineError::NoBackendAvailable`] when no backend could be loaded
/// - [`PipelineError::ExtractionFailed`] when every backend failed to decode
/// - [`PipelineError::OutputWriteFailed`] when an artifact cannot be written
pub async fn extract_pdf(
    pdf_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<ExtractionOutput, PipelineError> {
    let total_start = Instant::now();
    let pdf_path = input::resolve_pdf(pdf_path.as_ref())?;
    let output_dir = output_dir.as_ref();
    info!("Extracting text from {}", pdf_path.display());

    // ── Step 1: Decode pages (blocking) ──────────────────────────────────
    let decode_start = Instant::now();
    let preference = config.backend;
    let path = pdf_path.clone();
    let (backend, raw_pages) =
        tokio::task::spawn_blocking(move || extract_with_fallback(&path, preference))
            .await
            .map_err(|e| PipelineError::Internal(format!("Extraction task panicked: {}", e)))??;
    let decode_duration_ms = decode_start.elapsed().as_millis() as u64;
    info!(
        "Extracted {} pages using {} in {}ms",
        raw_pages.len(),
        backend,
        decode_duration_ms
    );

    // ── Step 2: Normalise and split ──────────────────────────────────────
    let source_file = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = build_document(source_file, &raw_pages, config);
    info!("Detected {} sections", document.sections.len());

    // ── Step 3: Write artifacts ──────────────────────────────────────────
    let markdown = render_markdown(&document.sections);
    let markdown_path = output_dir.join(config.markdown_file_name());
    let json_path = output_dir.join(config.json_file_name());

    write_atomic(&markdown_path, &markdown).await?;
    info!("Saved Markdown to {}", markdown_path.display());

    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| PipelineError::Internal(format!("JSON serialisation failed: {}", e)))?;
    write_atomic(&json_path, json).await?;
    info!("Saved JSON to {}", json_path.display());

    let stats = ExtractionStats {
        backend,
        total_pages: document.total_pages,
        section_count: document.sections.len(),
        decode_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(ExtractionOutput {
        document,
        markdown,
        markdown_path,
        json_path,
        stats,
    })
}

/// Normalise raw page texts and split them into sections.
///
/// Reports one [`Stage::Extract`] item per page to the configured callback.
pub fn build_document(
    source_file: impl Into<String>,
    raw_pages: &[String],
    config: &PipelineConfig,
) -> ExtractionDocument {
    let total = raw_pages.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(Stage::Extract, total);
    }

    let pages: Vec<PageRecord> = raw_pages
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let text = normalize_text(raw);
            debug!("Page {}: {} chars after normalisation", idx + 1, text.len());
            if let Some(ref cb) = config.progress_callback {
                cb.on_item_complete(Stage::Extract, idx + 1, total, &format!("page {}", idx + 1));
            }
            PageRecord {
                page: idx + 1,
                text,
            }
        })
        .collect();

    let full_text = pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);
    let sections = split_sections(&full_text);

    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(Stage::Extract, total);
    }

    ExtractionDocument {
        source_file: source_file.into(),
        total_pages: total,
        pages,
        sections,
    }
}

/// Synchronous wrapper around [`extract_pdf`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_pdf_sync(
    pdf_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<ExtractionOutput, PipelineError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PipelineError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract_pdf(pdf_path, output_dir, config))
}

/// Extract a PDF held in memory.
///
/// The bytes are written to a managed [`tempfile`] that is removed on return.
/// `source_name` is recorded as `source_file` in the JSON artifact in place
/// of the temp file's name.
pub async fn extract_from_bytes(
    bytes: &[u8],
    source_name: &str,
    output_dir: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<ExtractionOutput, PipelineError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| PipelineError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| PipelineError::Internal(format!("tempfile write: {e}")))?;
    tmp.flush()
        .map_err(|e| PipelineError::Internal(format!("tempfile flush: {e}")))?;

    let mut output = extract_pdf(tmp.path(), output_dir, config).await?;
    if output.document.source_file != source_name {
        output.document.source_file = source_name.to_string();
        let json = serde_json::to_string_pretty(&output.document)
            .map_err(|e| PipelineError::Internal(format!("JSON serialisation failed: {}", e)))?;
        write_atomic(&output.json_path, json).await?;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Section;
    use crate::progress::PipelineProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_document_pages_and_sections() {
        let raw = pages(&[
            "Abstract\nWe present a crypto-\ngraphic   scheme.\n",
            "1. Introduction\nLattices are\t\tgreat.\n\n\n\nMore.",
        ]);
        let doc = build_document("Dilithium.pdf", &raw, &PipelineConfig::default());

        assert_eq!(doc.source_file, "Dilithium.pdf");
        assert_eq!(doc.total_pages, 2);
        assert_eq!(doc.pages[0].page, 1);
        assert_eq!(doc.pages[0].text, "Abstract\nWe present a cryptographic scheme.");
        assert_eq!(
            doc.sections,
            vec![
                Section::new("Abstract", "We present a cryptographic scheme."),
                Section::new("1. Introduction", "Lattices are great.\n\nMore."),
            ]
        );
    }

    #[test]
    fn test_build_document_without_headings() {
        let doc = build_document("x.pdf", &pages(&["just some text"]), &PipelineConfig::default());
        assert_eq!(doc.sections, vec![Section::new("Document", "just some text")]);
    }

    #[test]
    fn test_build_document_reports_pages() {
        struct Counter(AtomicUsize);
        impl PipelineProgressCallback for Counter {
            fn on_item_complete(&self, _: Stage, _: usize, _: usize, _: &str) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let config = PipelineConfig::builder()
            .progress_callback(counter.clone())
            .build()
            .unwrap();
        build_document("x.pdf", &pages(&["a", "b", "c"]), &config);
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_extract_rejects_non_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, "not a pdf").unwrap();
        let err = extract_pdf(&path, dir.path(), &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotAPdf { .. }));
        assert!(!dir.path().join("Dilithium_en.md").exists());
    }

    #[tokio::test]
    async fn test_extract_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = extract_pdf(dir.path().join("missing.pdf"), dir.path(), &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound { .. }));
    }
}
