//! DOCX rendering of a [`DocumentPlan`] with `docx-rs`.
//!
//! ## Formatting
//!
//! | Block            | Style / run formatting                       |
//! |------------------|----------------------------------------------|
//! | Title            | `Title` style, centred                       |
//! | Subtitle         | 14 pt, grey `#646464`, centred               |
//! | Heading          | `Heading1` style                             |
//! | Body             | default style                                |
//! | PendingNote      | 9 pt, italic, `#C86464`                      |
//! | ReferenceLabel   | 9 pt, italic, grey `#969696`                 |
//! | Reference        | 9 pt, grey `#969696`                         |
//!
//! `docx-rs` sizes are half-points, so 9 pt is `18`.
//!
//! Text blocks are split into paragraphs on blank lines; single newlines
//! inside a paragraph become line breaks.
//!
//! PDF text can carry control characters that XML 1.0 forbids and that
//! `docx-rs` writes through unchanged. Every run goes through `xml_text`
//! first: vertical tab and form feed become a space, anything else outside
//! the XML `Char` range is dropped.

use crate::pipeline::bilingual::{Block, DocumentPlan};
use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, Style, StyleType};
use std::borrow::Cow;
use std::io::Cursor;

const TITLE_STYLE: &str = "Title";
const HEADING_STYLE: &str = "Heading1";

const SUBTITLE_SIZE: usize = 28;
const SMALL_SIZE: usize = 18;

const SUBTITLE_COLOR: &str = "646464";
const REFERENCE_COLOR: &str = "969696";
const PENDING_COLOR: &str = "C86464";

/// Build the Word document for `plan`.
pub fn build_docx(plan: &DocumentPlan) -> Docx {
    let mut docx = Docx::new()
        .add_style(
            Style::new(TITLE_STYLE, StyleType::Paragraph)
                .name("Title")
                .size(56)
                .bold(),
        )
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        );

    for block in plan.blocks() {
        for paragraph in render_block(&block) {
            docx = docx.add_paragraph(paragraph);
        }
    }

    docx
}

/// Build and pack the document into `.docx` bytes.
pub fn pack_docx(plan: &DocumentPlan) -> Result<Vec<u8>, String> {
    let mut buf = Cursor::new(Vec::new());
    build_docx(plan)
        .build()
        .pack(&mut buf)
        .map_err(|e| e.to_string())?;
    Ok(buf.into_inner())
}

fn render_block(block: &Block) -> Vec<Paragraph> {
    match block {
        Block::Title(text) => vec![Paragraph::new()
            .style(TITLE_STYLE)
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(xml_text(text)))],
        Block::Subtitle(text) => vec![Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(
                Run::new()
                    .add_text(xml_text(text))
                    .size(SUBTITLE_SIZE)
                    .color(SUBTITLE_COLOR),
            )],
        Block::Heading(text) => vec![Paragraph::new()
            .style(HEADING_STYLE)
            .add_run(Run::new().add_text(xml_text(text)))],
        Block::Body(text) => text_paragraphs(text, Run::new),
        Block::PendingNote(text) => vec![Paragraph::new().add_run(
            Run::new()
                .add_text(xml_text(text))
                .size(SMALL_SIZE)
                .color(PENDING_COLOR)
                .italic(),
        )],
        Block::ReferenceLabel(text) => vec![Paragraph::new().add_run(
            Run::new()
                .add_text(xml_text(text))
                .size(SMALL_SIZE)
                .color(REFERENCE_COLOR)
                .italic(),
        )],
        Block::Reference(text) => text_paragraphs(text, || {
            Run::new().size(SMALL_SIZE).color(REFERENCE_COLOR)
        }),
        Block::Spacer => vec![Paragraph::new()],
    }
}

/// Split `text` into paragraphs on blank lines, one run per paragraph.
fn text_paragraphs(text: &str, new_run: impl Fn() -> Run) -> Vec<Paragraph> {
    split_paragraphs(text)
        .into_iter()
        .map(|para| {
            let mut run = new_run();
            for (i, line) in para.iter().enumerate() {
                if i > 0 {
                    run = run.add_break(BreakType::TextWrapping);
                }
                run = run.add_text(xml_text(line));
            }
            Paragraph::new().add_run(run)
        })
        .collect()
}

/// Make `text` safe for an XML 1.0 document.
fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .filter_map(|c| match c {
                '\u{b}' | '\u{c}' => Some(' '),
                c if is_xml_char(c) => Some(c),
                _ => None,
            })
            .collect(),
    )
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Group lines into paragraphs separated by blank lines.
fn split_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}
