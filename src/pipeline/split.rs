//! Section splitting: turn normalised text into an ordered list of
//! [`Section`]s, one per detected heading.
//!
//! The result is flat. Sub-headings only start a new section when they
//! independently satisfy [`is_heading`]; otherwise they stay in the body of
//! the enclosing section.

use crate::output::Section;
use crate::pipeline::heading::is_heading;

/// Title used when the text contains no heading at all.
pub const UNTITLED_SECTION: &str = "Document";

/// Split normalised text into sections. Lines are separated on `\n`.
pub fn split_sections(text: &str) -> Vec<Section> {
    split_lines(text.split('\n'))
}

/// Split an ordered sequence of lines into sections.
///
/// Content is the lines between two headings joined by `\n` and trimmed.
/// Lines before the first heading are dropped unless no heading is ever
/// found, in which case all non-blank content becomes a single
/// [`UNTITLED_SECTION`].
pub fn split_lines<'a, I>(lines: I) -> Vec<Section>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sections = Vec::new();
    let mut current_title: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in lines {
        if is_heading(line) {
            if let Some(title) = current_title.take() {
                sections.push(Section::new(title, join_content(&buffer)));
            }
            buffer.clear();
            current_title = Some(line.trim().to_string());
        } else {
            buffer.push(line);
        }
    }

    match current_title {
        Some(title) => sections.push(Section::new(title, join_content(&buffer))),
        None => {
            let content = join_content(&buffer);
            if !content.is_empty() {
                sections.push(Section::new(UNTITLED_SECTION, content));
            }
        }
    }

    sections
}

fn join_content(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sections() {
        let sections = split_lines(["Abstract", "Foo.", "2. Introduction", "Bar baz."]);
        assert_eq!(
            sections,
            vec![
                Section::new("Abstract", "Foo."),
                Section::new("2. Introduction", "Bar baz."),
            ]
        );
    }

    #[test]
    fn test_no_headings() {
        assert_eq!(
            split_lines(["just text"]),
            vec![Section::new("Document", "just text")]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(split_lines(std::iter::empty::<&str>()).is_empty());
        assert!(split_sections("").is_empty());
        assert!(split_sections("\n\n").is_empty());
    }

    #[test]
    fn test_preamble_before_first_heading_dropped() {
        let text = "CRYSTALS-Dilithium authors\nsome affiliation\nAbstract\nWe present.";
        let sections = split_sections(text);
        // "CRYSTALS-Dilithium authors" has lower-case letters, so only Abstract opens a section.
        assert_eq!(sections, vec![Section::new("Abstract", "We present.")]);
    }

    #[test]
    fn test_heading_without_content() {
        let sections = split_sections("Abstract\nReferences\n[1] Ducas et al.");
        assert_eq!(
            sections,
            vec![
                Section::new("Abstract", ""),
                Section::new("References", "[1] Ducas et al."),
            ]
        );
    }

    #[test]
    fn test_duplicate_titles_kept() {
        let sections = split_sections("Abstract\nfirst\nAbstract\nsecond");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, sections[1].title);
    }

    #[test]
    fn test_content_trimmed_and_paragraphs_kept() {
        let text = "1. Introduction\n\nFirst paragraph.\n\nSecond paragraph.\n\n";
        let sections = split_sections(text);
        assert_eq!(
            sections[0].content,
            "First paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_heading_title_trimmed() {
        let sections = split_lines(["  3. Construction  ", "body"]);
        assert_eq!(sections[0].title, "3. Construction");
    }
}
