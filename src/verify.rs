//! Post-run check that every pipeline artifact is where the layout says.
//!
//! Verification never fails with an error: missing artifacts are collected
//! as [`VerificationReport::problems`] so the caller can print all of them at
//! once and choose an exit status.

use crate::config::OutputLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One checked artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Check {
    /// A file that exists, with its size in bytes.
    File { path: PathBuf, size: u64 },
    /// A directory holding `count` section files.
    SectionDir { path: PathBuf, count: usize },
}

/// Outcome of [`verify_outputs`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub passed: Vec<Check>,
    pub problems: Vec<String>,
}

impl VerificationReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Check the Markdown, JSON and DOCX artifacts, the sections directory and
/// the glossary.
pub fn verify_outputs(layout: &OutputLayout) -> VerificationReport {
    let mut report = VerificationReport::default();

    for (what, path) in [
        ("output", &layout.markdown),
        ("output", &layout.json),
        ("output", &layout.docx),
        ("glossary", &layout.glossary),
    ] {
        check_file(&mut report, what, path);
    }

    let dir = &layout.sections_dir;
    if !dir.is_dir() {
        report
            .problems
            .push(format!("Missing sections directory: {}", dir.display()));
    } else {
        match count_markdown_files(dir) {
            Ok(0) => report
                .problems
                .push(format!("No section files found in {}", dir.display())),
            Ok(count) => report.passed.push(Check::SectionDir {
                path: dir.clone(),
                count,
            }),
            Err(e) => report
                .problems
                .push(format!("Cannot read {}: {}", dir.display(), e)),
        }
    }

    report
}

fn check_file(report: &mut VerificationReport, what: &str, path: &Path) {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => report.passed.push(Check::File {
            path: path.to_path_buf(),
            size: meta.len(),
        }),
        _ => report
            .problems
            .push(format!("Missing {what} file: {}", path.display())),
    }
}

fn count_markdown_files(dir: &Path) -> std::io::Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "md") {
            count += 1;
        }
    }
    Ok(count)
}
