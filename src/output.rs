//! Data types produced by the pipeline stages.
//!
//! [`Section`] is the unit every stage exchanges. [`ExtractionDocument`] is the
//! exact shape of the JSON artifact written by the extractor and read back by
//! the segmenter, so its field names are part of the on-disk format.

use crate::pipeline::backend::Backend;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A titled block of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Normalised text of a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-indexed page number.
    pub page: usize,
    pub text: String,
}

/// The JSON artifact: `{source_file, total_pages, pages, sections}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionDocument {
    /// File name (not path) of the source PDF.
    pub source_file: String,
    pub total_pages: usize,
    pub pages: Vec<PageRecord>,
    pub sections: Vec<Section>,
}

/// Result of the extraction stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub document: ExtractionDocument,
    /// Rendered Markdown, identical to the contents of `markdown_path`.
    pub markdown: String,
    pub markdown_path: PathBuf,
    pub json_path: PathBuf,
    pub stats: ExtractionStats,
}

/// Timing and provenance for an extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Backend that produced the page text.
    pub backend: Backend,
    pub total_pages: usize,
    pub section_count: usize,
    pub decode_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// One per-section file written by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFile {
    /// 1-indexed position in the document.
    pub index: usize,
    pub title: String,
    pub path: PathBuf,
}

/// Result of the segmentation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentOutput {
    pub files: Vec<SectionFile>,
    pub output_dir: PathBuf,
}

/// Counters reported by the composition stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeStats {
    /// Section files found in the sections directory.
    pub section_files: usize,
    /// Sections rendered from a human translation.
    pub human_translations: usize,
    /// Sections rendered as glossary-substituted placeholders.
    pub placeholders: usize,
    /// Files skipped because they had no heading or no content.
    pub skipped: usize,
    pub glossary_terms: usize,
}

/// Result of the composition stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeOutput {
    pub path: PathBuf,
    pub stats: ComposeStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_document_uses_artifact_field_names() {
        let doc = ExtractionDocument {
            source_file: "paper.pdf".into(),
            total_pages: 1,
            pages: vec![PageRecord {
                page: 1,
                text: "Abstract".into(),
            }],
            sections: vec![Section::new("Abstract", "")],
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["source_file"], "paper.pdf");
        assert_eq!(value["total_pages"], 1);
        assert_eq!(value["pages"][0]["page"], 1);
        assert_eq!(value["pages"][0]["text"], "Abstract");
        assert_eq!(value["sections"][0]["title"], "Abstract");
        assert_eq!(value["sections"][0]["content"], "");
    }

    #[test]
    fn non_ascii_survives_json() {
        let s = Section::new("摘要", "数字签名");
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("数字签名"));
    }
}
