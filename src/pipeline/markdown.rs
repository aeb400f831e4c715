//! Markdown rendering and re-ingestion of sections.
//!
//! Sections are written as top-level ATX headings (`# Title`), a blank line,
//! and the content. [`parse_markdown`] is the exact inverse of
//! [`render_markdown`] for sections produced by the splitter (single-line
//! trimmed titles, trimmed content).
//!
//! A body line that itself starts with `# ` would read back as a heading, so
//! such lines are escaped with one extra leading backslash (`\# `). Lines
//! already made of backslashes followed by `# ` get one more, which keeps the
//! escaping reversible.

use crate::output::Section;
use std::borrow::Cow;

/// Top-level heading marker, including the separating space.
pub const HEADING_MARKER: &str = "# ";

/// Title given to content that appears before the first heading.
pub const PREFACE_TITLE: &str = "Preface";

/// Render one section as `# <title>\n\n<content>\n`.
pub fn render_section(section: &Section) -> String {
    let body = section
        .content
        .split('\n')
        .map(escape_line)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{HEADING_MARKER}{}\n\n{body}\n", section.title)
}

/// Render a whole document: sections in order, separated by a blank line.
pub fn render_markdown(sections: &[Section]) -> String {
    sections
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recover sections from a Markdown document.
///
/// Non-blank text before the first heading becomes a [`PREFACE_TITLE`]
/// section. A heading followed directly by another heading gets empty content.
pub fn parse_markdown(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_title: Option<String> = None;
    let mut buffer: Vec<Cow<'_, str>> = Vec::new();

    for line in text.lines() {
        if let Some(title) = line.strip_prefix(HEADING_MARKER) {
            flush(&mut sections, current_title.take(), &buffer);
            buffer.clear();
            current_title = Some(title.trim().to_string());
        } else {
            buffer.push(unescape_line(line));
        }
    }
    flush(&mut sections, current_title, &buffer);

    sections
}

/// Read a single per-section file.
///
/// The first line starting with `#` (any level) is the title; every other
/// line is content. Returns `None` when the file has no heading line.
pub fn parse_section_file(text: &str) -> Option<Section> {
    let mut title: Option<String> = None;
    let mut content: Vec<Cow<'_, str>> = Vec::new();

    for line in text.lines() {
        if title.is_none() && line.starts_with('#') {
            title = Some(line.trim_start_matches('#').trim().to_string());
        } else {
            content.push(unescape_line(line));
        }
    }

    title.map(|t| Section::new(t, content.join("\n").trim()))
}

/// Drop a leading heading line, if any, and trim the rest.
///
/// Used for human translation files, which conventionally repeat the section
/// title as their first line.
pub fn strip_leading_heading(text: &str) -> String {
    match text.split_once('\n') {
        Some((first, rest)) if first.starts_with('#') => rest.trim().to_string(),
        None if text.starts_with('#') => String::new(),
        _ => text.trim().to_string(),
    }
}

fn flush(sections: &mut Vec<Section>, title: Option<String>, buffer: &[Cow<'_, str>]) {
    let content = buffer.join("\n").trim().to_string();
    match title {
        Some(title) => sections.push(Section::new(title, content)),
        None if !content.is_empty() => sections.push(Section::new(PREFACE_TITLE, content)),
        None => {}
    }
}

fn needs_escape(line: &str) -> bool {
    line.trim_start_matches('\\').starts_with(HEADING_MARKER)
}

fn escape_line(line: &str) -> Cow<'_, str> {
    if needs_escape(line) {
        Cow::Owned(format!("\\{line}"))
    } else {
        Cow::Borrowed(line)
    }
}

fn unescape_line(line: &str) -> Cow<'_, str> {
    if line.starts_with('\\') && needs_escape(line) {
        Cow::Borrowed(&line[1..])
    } else {
        Cow::Borrowed(line)
    }
}
