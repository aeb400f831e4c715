//! Input resolution: validate user-supplied paths before any stage starts.
//!
//! Each stage fails fast with an actionable [`PipelineError`] rather than
//! letting a backend or the filesystem produce a bare I/O error halfway
//! through. PDFs are checked for their `%PDF` magic bytes up front.

use crate::error::PipelineError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Format of a segmenter input, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSource {
    /// The extractor's JSON artifact; sections are read from `sections`.
    Json,
    /// A Markdown document with `# ` top-level headings.
    Markdown,
}

impl SectionSource {
    /// Detect the format from `path`'s extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(SectionSource::Json),
            "md" | "markdown" => Ok(SectionSource::Markdown),
            _ => Err(PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: if ext.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{ext}")
                },
            }),
        }
    }
}

/// Validate a local PDF: it exists, is readable, and starts with `%PDF`.
pub fn resolve_pdf(path: &Path) -> Result<PathBuf, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
            hint: "Check the path to the source PDF.".into(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
                return Err(PipelineError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PipelineError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(PipelineError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path.to_path_buf())
}

/// Require an existing regular file, with `hint` shown when it is missing.
pub fn require_file(path: &Path, hint: &str) -> Result<(), PipelineError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
            hint: hint.to_string(),
        })
    }
}

/// Require an existing directory, with `hint` shown when it is missing.
pub fn require_dir(path: &Path, hint: &str) -> Result<(), PipelineError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
            hint: hint.to_string(),
        })
    }
}

/// List the per-section Markdown files in `dir`, sorted by file name.
///
/// Translation siblings (`NN_Title.<lang>.md`) are excluded so that a
/// translation directory shared with the sections directory is not read
/// twice.
pub fn list_section_files(dir: &Path, lang: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let read_failed = |e: std::io::Error| PipelineError::ReadFailed {
        path: dir.to_path_buf(),
        source: e,
    };

    let translation_suffix = format!(".{lang}.md");
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(read_failed)? {
        let path = entry.map_err(read_failed)?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(".md") && !name.ends_with(&translation_suffix) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} section files in {}", files.len(), dir.display());
    Ok(files)
}

/// Path of the human translation for `section_file` inside `translation_dir`:
/// `NN_Title.md` → `<translation_dir>/NN_Title.<lang>.md`.
pub fn translation_path(section_file: &Path, translation_dir: &Path, lang: &str) -> PathBuf {
    let stem = section_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    translation_dir.join(format!("{stem}.{lang}.md"))
}
