//! Stage 3: per-section Markdown files + glossary + optional human
//! translations → one bilingual Word document.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::output::{ComposeOutput, ComposeStats};
use crate::pipeline::bilingual::{ComposedSection, DocumentPlan, SectionBody};
use crate::pipeline::docx::pack_docx;
use crate::pipeline::glossary::Glossary;
use crate::pipeline::input::{self, list_section_files, translation_path};
use crate::pipeline::markdown::parse_section_file;
use crate::pipeline::write::write_atomic;
use crate::progress::Stage;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read every section file and decide what each section will show.
///
/// Files are taken in file-name order. A file without a heading line or with
/// no content after the heading is skipped. A missing `translation_dir` is
/// treated as "no translations yet".
pub async fn plan_document(
    sections_dir: &Path,
    glossary: &Glossary,
    translation_dir: Option<&Path>,
    config: &PipelineConfig,
) -> Result<(DocumentPlan, ComposeStats), PipelineError> {
    input::require_dir(sections_dir, "Run `docsplit segment` first.")?;
    let files = list_section_files(sections_dir, &config.target_lang)?;
    let total = files.len();
    info!("Found {} section files in {}", total, sections_dir.display());

    let translation_dir = translation_dir.filter(|d| {
        let exists = d.is_dir();
        if !exists {
            debug!("Translation directory {} not found", d.display());
        }
        exists
    });

    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(Stage::Compose, total);
    }

    let mut plan = DocumentPlan::new(config.labels.clone());
    let mut stats = ComposeStats {
        section_files: total,
        glossary_terms: glossary.len(),
        ..ComposeStats::default()
    };

    for (i, file) in files.iter().enumerate() {
        let index = i + 1;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let text = tokio::fs::read_to_string(file)
            .await
            .map_err(|e| PipelineError::ReadFailed {
                path: file.clone(),
                source: e,
            })?;

        let section = match parse_section_file(&text) {
            Some(s) if s.title.is_empty() => None,
            Some(s) if s.content.is_empty() => {
                skip(config, &mut stats, index, total, &file_name, "empty content");
                continue;
            }
            other => other,
        };
        let Some(section) = section else {
            skip(config, &mut stats, index, total, &file_name, "no heading");
            continue;
        };

        let translation = match translation_dir {
            Some(dir) => read_translation(&translation_path(file, dir, &config.target_lang)).await?,
            None => None,
        };

        let body = SectionBody::choose(&section, translation.as_deref(), glossary);
        debug!(
            "{}: {}",
            file_name,
            if body.is_human() {
                "human translation"
            } else {
                "placeholder translation"
            }
        );

        plan.push(ComposedSection {
            file_name: file_name.clone(),
            title: section.title,
            body,
        });

        if let Some(ref cb) = config.progress_callback {
            cb.on_item_complete(Stage::Compose, index, total, &file_name);
        }
    }

    stats.human_translations = plan.human_count();
    stats.placeholders = plan.placeholder_count();

    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(Stage::Compose, plan.sections.len());
    }

    Ok((plan, stats))
}

/// Build the bilingual document and write it to `output`.
///
/// # Errors
/// - [`PipelineError::InputNotFound`] when `sections_dir` or `glossary_path` is missing
/// - [`PipelineError::MalformedGlossary`] for an unreadable glossary
/// - [`PipelineError::DocxWriteFailed`] / [`PipelineError::OutputWriteFailed`] on output
pub async fn compose_docx(
    sections_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    glossary_path: impl AsRef<Path>,
    translation_dir: Option<&Path>,
    config: &PipelineConfig,
) -> Result<ComposeOutput, PipelineError> {
    let sections_dir = sections_dir.as_ref();
    let output = output.as_ref();
    let glossary_path = glossary_path.as_ref();

    input::require_file(
        glossary_path,
        &format!(
            "Create a YAML glossary with a top-level '{}' mapping.",
            config.glossary_key
        ),
    )?;
    let glossary = Glossary::load(glossary_path, &config.glossary_key).await?;
    info!("Loaded {} glossary terms", glossary.len());
    debug!(
        "Glossary order: {:?}",
        glossary.terms().map(|(en, _)| en).collect::<Vec<_>>()
    );

    let (plan, stats) = plan_document(sections_dir, &glossary, translation_dir, config).await?;

    let bytes = pack_docx(&plan).map_err(|detail| PipelineError::DocxWriteFailed {
        path: output.to_path_buf(),
        detail,
    })?;
    write_atomic(output, bytes).await?;

    info!(
        "Saved Word document to {} ({} human, {} placeholder, {} skipped)",
        output.display(),
        stats.human_translations,
        stats.placeholders,
        stats.skipped
    );

    Ok(ComposeOutput {
        path: output.to_path_buf(),
        stats,
    })
}

async fn read_translation(path: &Path) -> Result<Option<String>, PipelineError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PipelineError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn skip(
    config: &PipelineConfig,
    stats: &mut ComposeStats,
    index: usize,
    total: usize,
    file_name: &str,
    reason: &str,
) {
    warn!("Skipping {}: {}", file_name, reason);
    stats.skipped += 1;
    if let Some(ref cb) = config.progress_callback {
        cb.on_item_skipped(Stage::Compose, index, total, file_name, reason);
    }
}
