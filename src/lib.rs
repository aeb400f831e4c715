//! # docsplit
//!
//! Turn a PDF paper into titled sections and a bilingual Word document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract  pdfium / pdf-extract → normalised pages → sections
//!  │              → <stem>_en.md + <stem>_en.json
//!  ├─ 2. Segment  .md or .json → NN_<Title>.md per section
//!  └─ 3. Compose  NN_<Title>.md + glossary + NN_<Title>.zh.md
//!                 → <stem>_zh.docx
//! ```
//!
//! Each stage reads the previous stage's files, so they can be run one at a
//! time (and re-run after editing the intermediate files) or chained with
//! the `docsplit run` command.
//!
//! Sections are found heuristically: known academic titles (`Abstract`,
//! `3. Construction`, `References`, …) and short upper-case or numbered lines
//! open a new section. Sections without a human translation are rendered with
//! glossary terms substituted into the English text and a "translation
//! pending" marker.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docsplit::{compose_docx, extract_pdf, segment_file, OutputLayout, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default();
//!     let layout = OutputLayout::default();
//!
//!     let extracted = extract_pdf("Dilithium.pdf", &layout.out_dir, &config).await?;
//!     segment_file(&extracted.markdown_path, &layout.sections_dir, &config).await?;
//!     let composed = compose_docx(
//!         &layout.sections_dir,
//!         &layout.docx,
//!         &layout.glossary,
//!         Some(layout.translation_dir.as_path()),
//!         &config,
//!     )
//!     .await?;
//!     eprintln!("{} placeholders left", composed.stats.placeholders);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature       | Default | Description |
//! |---------------|---------|-------------|
//! | `cli`         | on      | Enables the `docsplit` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `pdfium`      | on      | pdfium-render backend; needs a pdfium library at runtime |
//! | `pdf-extract` | on      | Pure-Rust fallback backend |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docsplit = { version = "0.1", default-features = false, features = ["pdf-extract"] }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod segment;
pub mod verify;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use compose::{compose_docx, plan_document};
pub use config::{OutputLayout, PipelineConfig, PipelineConfigBuilder};
pub use error::{BackendError, PipelineError};
pub use extract::{build_document, extract_from_bytes, extract_pdf, extract_pdf_sync};
pub use output::{
    ComposeOutput, ComposeStats, ExtractionDocument, ExtractionOutput, ExtractionStats,
    PageRecord, Section, SectionFile, SegmentOutput,
};
pub use pipeline::backend::{Backend, BackendPreference};
pub use pipeline::bilingual::{DocumentLabels, DocumentPlan, SectionBody};
pub use pipeline::glossary::Glossary;
pub use pipeline::heading::{classify_line, is_heading, LineKind};
pub use pipeline::markdown::{parse_markdown, render_markdown};
pub use pipeline::normalize::normalize_text;
pub use pipeline::sanitize::sanitize_filename;
pub use pipeline::split::split_sections;
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback, Stage};
pub use segment::{read_sections, segment_file, write_sections};
pub use verify::{verify_outputs, VerificationReport};
