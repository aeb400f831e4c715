//! Text normalisation: deterministic cleanup of raw PDF text.
//!
//! Text pulled out of a PDF carries layout artefacts that confuse heading
//! detection: words hyphenated across a line break, runs of spaces used for
//! justification, and large vertical gaps between blocks. Each rule below is
//! a pure `&str → String` pass and the composition is idempotent, so pages
//! can be normalised individually and the joined result normalised again
//! without drift.
//!
//! ## Rule Order
//!
//! Hyphenation must be repaired first, while the line breaks it keys on are
//! still intact. Blank-line collapsing runs before trailing-whitespace
//! trimming because its pattern tolerates whitespace between newlines.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Apply all normalisation rules to raw extracted text.
///
/// Rules (applied in order):
/// 1. Join words hyphenated across a line break (`crypto-\ngraphic` → `cryptographic`)
/// 2. Collapse runs of spaces and tabs to one space
/// 3. Collapse 3+ newlines (with any whitespace between them) to exactly 2
/// 4. Trim trailing whitespace per line
/// 5. Trim the whole text
///
/// Rule 1 also joins genuine hyphenated compounds that happen to break at a
/// line end ("state-\nof-the-art" → "stateof-the-art"); that is a known
/// limitation of the heuristic.
pub fn normalize_text(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let s = join_hyphenated_words(input);
    let s = collapse_horizontal_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = trim_trailing_whitespace(&s);
    s.trim().to_string()
}

// ── Rule 1: Join hyphenated line breaks ──────────────────────────────────────

static RE_HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)-\s*\n\s*(\w)").unwrap());

/// Repeats until no match remains: a chain like `ab-\ncd-\nef` shares the
/// `d` between two matches, so one pass would leave the second break behind.
fn join_hyphenated_words(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        match RE_HYPHEN_BREAK.replace_all(&current, "${1}${2}") {
            Cow::Borrowed(_) => return current,
            Cow::Owned(next) => current = next,
        }
    }
}

// ── Rule 2: Collapse horizontal whitespace ───────────────────────────────────

static RE_HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

fn collapse_horizontal_whitespace(input: &str) -> String {
    RE_HORIZONTAL_WS.replace_all(input, " ").into_owned()
}

// ── Rule 3: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Tests ────────────────────────────────────────────────────────────────────
