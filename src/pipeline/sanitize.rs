//! File name sanitising for per-section Markdown files.
//!
//! File names are regenerated on every run, so the mapping from title to
//! name must be deterministic and idempotent: sanitising an already
//! sanitised name returns it unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}_\s-]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Map a section title to a safe file name fragment.
///
/// Keeps alphanumerics (Unicode letters and decimal digits), underscore,
/// whitespace and hyphens; whitespace runs become `_`; leading/trailing `_`
/// are removed. Combining marks and other connector punctuation are dropped.
pub fn sanitize_filename(title: &str) -> String {
    let kept = RE_UNSAFE.replace_all(title, "");
    let joined = RE_WHITESPACE.replace_all(&kept, "_");
    joined.trim_matches('_').to_string()
}

/// `<2-digit index>_<sanitised title>.md`, e.g. `03_2_Introduction.md`.
pub fn section_file_name(index: usize, title: &str) -> String {
    format!("{index:02}_{}.md", sanitize_filename(title))
}
