//! Stage 2: Markdown or JSON sections → one Markdown file per section.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::output::{Section, SectionFile, SegmentOutput};
use crate::pipeline::input::{self, SectionSource};
use crate::pipeline::markdown::{parse_markdown, render_section};
use crate::pipeline::sanitize::section_file_name;
use crate::pipeline::write::write_atomic;
use crate::progress::Stage;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

// Names this stage generates. Sanitised titles never contain a dot, so
// `NN_Title.<lang>.md` translation files never match.
static RE_GENERATED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2,}_[\w-]*\.md$").unwrap());

/// The part of the JSON artifact the segmenter reads. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct SectionsArtifact {
    #[serde(default)]
    sections: Vec<Section>,
}

/// Read sections from a Markdown document or the extractor's JSON artifact.
///
/// The format is chosen by extension. A JSON file without a `sections` key
/// yields no sections.
pub async fn read_sections(path: impl AsRef<Path>) -> Result<Vec<Section>, PipelineError> {
    let path = path.as_ref();
    input::require_file(
        path,
        "Run `docsplit extract` first, or pass an existing .md/.json file.",
    )?;
    let source = SectionSource::from_path(path)?;

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PipelineError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let sections = match source {
        SectionSource::Json => parse_json_sections(&text, path)?,
        SectionSource::Markdown => parse_markdown(&text),
    };
    info!("Found {} sections in {}", sections.len(), path.display());
    Ok(sections)
}

fn parse_json_sections(text: &str, path: &Path) -> Result<Vec<Section>, PipelineError> {
    serde_json::from_str::<SectionsArtifact>(text)
        .map(|a| a.sections)
        .map_err(|e| PipelineError::MalformedJson {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write each section to `output_dir` as `NN_<title>.md`.
///
/// Section files left over from an earlier run that are not part of this
/// one are removed. Only plain `NN_<title>.md` names are touched, so
/// translation files (`NN_<title>.<lang>.md`) of any language survive.
pub async fn write_sections(
    sections: &[Section],
    output_dir: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<SegmentOutput, PipelineError> {
    let output_dir = output_dir.as_ref();
    let total = sections.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(Stage::Segment, total);
    }

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| PipelineError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let mut files = Vec::with_capacity(total);
    for (i, section) in sections.iter().enumerate() {
        let index = i + 1;
        let name = section_file_name(index, &section.title);
        let path = output_dir.join(&name);
        write_atomic(&path, render_section(section)).await?;
        debug!("Wrote {}", path.display());

        if let Some(ref cb) = config.progress_callback {
            cb.on_item_complete(Stage::Segment, index, total, &name);
        }
        files.push(SectionFile {
            index,
            title: section.title.clone(),
            path,
        });
    }

    remove_stale_files(output_dir, &files).await;

    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(Stage::Segment, total);
    }
    info!("Segmented {} sections into {}", total, output_dir.display());

    Ok(SegmentOutput {
        files,
        output_dir: output_dir.to_path_buf(),
    })
}

/// Read `input` and write its sections into `output_dir`.
///
/// # Errors
/// - [`PipelineError::InputNotFound`] when `input` does not exist
/// - [`PipelineError::UnsupportedFormat`] for anything but `.md` / `.json`
/// - [`PipelineError::MalformedJson`] for an unparseable JSON artifact
pub async fn segment_file(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<SegmentOutput, PipelineError> {
    let sections = read_sections(input).await?;
    write_sections(&sections, output_dir, config).await
}

async fn remove_stale_files(dir: &Path, keep: &[SectionFile]) {
    let keep: HashSet<&Path> = keep.iter().map(|f| f.path.as_path()).collect();

    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if keep.contains(path.as_path()) || !RE_GENERATED_NAME.is_match(&name) {
            continue;
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed stale section file {}", path.display()),
            Err(e) => warn!("Could not remove stale {}: {}", path.display(), e),
        }
    }
}
