//! Heading classification: decide whether a line of normalised text opens a
//! new section.
//!
//! Two rules, first match wins:
//!
//! 1. **Known section titles**: the fixed vocabulary of academic papers
//!    (`Abstract`, `3. Construction`, `References`, `Appendix B`, …), matched
//!    case-insensitively against the whole line.
//! 2. **Short structural lines**: under 50 characters and either entirely
//!    upper-case (`PRELIMINARIES`) or numbered with a capitalised title
//!    (`4 Rejection Sampling`).
//!
//! Rule 2 is a heuristic and will also catch short upper-case body lines such
//! as table captions. It is kept as-is rather than tightened.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

/// Section titles recognised by rule 1. Matched with `(?i)`.
pub const KNOWN_SECTION_PATTERNS: &[&str] = &[
    r"^Abstract\s*$",
    r"^\d+\.?\s+Introduction\s*$",
    r"^\d+\.?\s+Related\s+Work\s*$",
    r"^\d+\.?\s+Preliminaries\s*$",
    r"^\d+\.?\s+Construction\s*$",
    r"^\d+\.?\s+Security\s*$",
    r"^\d+\.?\s+Security\s+Analysis\s*$",
    r"^\d+\.?\s+Implementation\s*$",
    r"^\d+\.?\s+Performance\s*$",
    r"^\d+\.?\s+Evaluation\s*$",
    r"^\d+\.?\s+Conclusions?\s*$",
    r"^References\s*$",
    r"^Bibliography\s*$",
    r"^Acknowledgments?\s*$",
    r"^Appendix\s*[A-Z]?\s*$",
];

/// Lines at or above this many characters are never rule-2 headings.
pub const MAX_INFERRED_HEADING_CHARS: usize = 50;

static KNOWN_SECTIONS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(KNOWN_SECTION_PATTERNS.iter().map(|p| format!("(?i){p}"))).unwrap()
});

// Case-sensitive on purpose: "3. we show" is body text.
static RE_NUMBERED_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\s+[A-Z]").unwrap());

/// How a single line was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Matches one of [`KNOWN_SECTION_PATTERNS`].
    KnownSection,
    /// Short line that is all upper-case or numbered with a capital letter.
    NumberedOrCaps,
    /// Everything else.
    Body,
}

impl LineKind {
    pub fn is_heading(self) -> bool {
        !matches!(self, LineKind::Body)
    }
}

/// Classify one line. Leading and trailing whitespace is ignored.
pub fn classify_line(line: &str) -> LineKind {
    let line = line.trim();

    if KNOWN_SECTIONS.is_match(line) {
        return LineKind::KnownSection;
    }

    if line.chars().count() < MAX_INFERRED_HEADING_CHARS
        && (is_upper_case(line) || RE_NUMBERED_TITLE.is_match(line))
    {
        return LineKind::NumberedOrCaps;
    }

    LineKind::Body
}

/// `true` when `line` should start a new section.
pub fn is_heading(line: &str) -> bool {
    classify_line(line).is_heading()
}

/// At least one cased character and no lower-case ones, so `"RSA-2048"` is
/// upper-case while `"2048"` and `""` are not.
fn is_upper_case(line: &str) -> bool {
    let mut has_upper = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}
