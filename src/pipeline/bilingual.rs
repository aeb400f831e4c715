//! Bilingual document model: decide, per section, whether a human
//! translation or a glossary placeholder is shown, and lay the result out as
//! a flat list of [`Block`]s for the DOCX writer.
//!
//! Keeping the layout here, independent of `docx-rs`, means the composition
//! rules can be tested on plain values.

use crate::output::Section;
use crate::pipeline::glossary::Glossary;
use crate::pipeline::markdown::strip_leading_heading;
use serde::{Deserialize, Serialize};

/// Fixed text placed around the translated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLabels {
    pub title: String,
    pub subtitle: String,
    /// Shown under a placeholder body.
    pub pending_marker: String,
    /// Introduces the English original under a human translation.
    pub reference_label: String,
}

impl Default for DocumentLabels {
    fn default() -> Self {
        Self {
            title: "Dilithium Digital Signature Scheme".into(),
            subtitle: "中文翻译版本 / Chinese Translation".into(),
            pending_marker: "（待翻译 / Translation pending）".into(),
            reference_label: "English Reference:".into(),
        }
    }
}

/// What is shown as a section's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    /// A human translation exists; the English original follows as reference.
    Human { translation: String, english: String },
    /// No translation yet; the English text with glossary terms substituted.
    Placeholder { substituted: String },
}

impl SectionBody {
    /// Pick the body for `section`.
    ///
    /// `translation` is the raw contents of the translation file, if one
    /// exists. It counts only when something is left after dropping a
    /// leading heading line and surrounding whitespace.
    pub fn choose(section: &Section, translation: Option<&str>, glossary: &Glossary) -> Self {
        match translation.map(strip_leading_heading) {
            Some(text) if !text.is_empty() => SectionBody::Human {
                translation: text,
                english: section.content.clone(),
            },
            _ => SectionBody::Placeholder {
                substituted: glossary.apply(&section.content),
            },
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, SectionBody::Human { .. })
    }
}

/// One section as it will appear in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedSection {
    /// Name of the section file it came from.
    pub file_name: String,
    pub title: String,
    pub body: SectionBody,
}

/// Everything needed to write the bilingual document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPlan {
    pub labels: DocumentLabels,
    pub sections: Vec<ComposedSection>,
}

/// A paragraph-level unit of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Heading(String),
    Body(String),
    PendingNote(String),
    ReferenceLabel(String),
    Reference(String),
    /// An empty paragraph.
    Spacer,
}

#[cfg(test)]
impl Block {
    fn text(&self) -> &str {
        match self {
            Block::Title(t)
            | Block::Subtitle(t)
            | Block::Heading(t)
            | Block::Body(t)
            | Block::PendingNote(t)
            | Block::ReferenceLabel(t)
            | Block::Reference(t) => t,
            Block::Spacer => "",
        }
    }
}

impl DocumentPlan {
    pub fn new(labels: DocumentLabels) -> Self {
        Self {
            labels,
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: ComposedSection) {
        self.sections.push(section);
    }

    pub fn human_count(&self) -> usize {
        self.sections.iter().filter(|s| s.body.is_human()).count()
    }

    pub fn placeholder_count(&self) -> usize {
        self.sections.len() - self.human_count()
    }

    /// Lay the plan out in reading order.
    ///
    /// Title and subtitle, a spacer, then for each section its heading, the
    /// body (plus the English reference or the pending marker) and a spacer.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = vec![
            Block::Title(self.labels.title.clone()),
            Block::Subtitle(self.labels.subtitle.clone()),
            Block::Spacer,
        ];

        for section in &self.sections {
            blocks.push(Block::Heading(section.title.clone()));
            match &section.body {
                SectionBody::Human {
                    translation,
                    english,
                } => {
                    blocks.push(Block::Body(translation.clone()));
                    blocks.push(Block::Spacer);
                    blocks.push(Block::ReferenceLabel(self.labels.reference_label.clone()));
                    blocks.push(Block::Reference(english.clone()));
                }
                SectionBody::Placeholder { substituted } => {
                    blocks.push(Block::Body(substituted.clone()));
                    blocks.push(Block::PendingNote(self.labels.pending_marker.clone()));
                }
            }
            blocks.push(Block::Spacer);
        }

        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glossary() -> Glossary {
        Glossary::from_terms([("digital signature", "数字签名"), ("signature", "签名")]).unwrap()
    }

    fn abstract_section() -> Section {
        Section::new("Abstract", "We present a digital signature scheme.")
    }

    #[test]
    fn test_human_translation_chosen() {
        let body = SectionBody::choose(
            &abstract_section(),
            Some("# 摘要\n\n我们提出了一种数字签名方案。\n"),
            &glossary(),
        );
        assert_eq!(
            body,
            SectionBody::Human {
                translation: "我们提出了一种数字签名方案。".into(),
                english: "We present a digital signature scheme.".into(),
            }
        );
    }

    #[test]
    fn test_placeholder_when_missing() {
        let body = SectionBody::choose(&abstract_section(), None, &glossary());
        assert_eq!(
            body,
            SectionBody::Placeholder {
                substituted: "We present a 数字签名 scheme.".into()
            }
        );
    }

    #[test]
    fn test_heading_only_translation_is_placeholder() {
        let body = SectionBody::choose(&abstract_section(), Some("# 摘要\n\n  \n"), &glossary());
        assert!(!body.is_human());
    }

    #[test]
    fn test_blocks_human() {
        let mut plan = DocumentPlan::new(DocumentLabels::default());
        plan.push(ComposedSection {
            file_name: "01_Abstract.md".into(),
            title: "Abstract".into(),
            body: SectionBody::Human {
                translation: "我们提出。".into(),
                english: "We present.".into(),
            },
        });

        let blocks = plan.blocks();
        assert_eq!(blocks[0], Block::Title("Dilithium Digital Signature Scheme".into()));
        assert_eq!(&blocks[3..], &[
            Block::Heading("Abstract".into()),
            Block::Body("我们提出。".into()),
            Block::Spacer,
            Block::ReferenceLabel("English Reference:".into()),
            Block::Reference("We present.".into()),
            Block::Spacer,
        ]);
        assert!(!blocks.iter().any(|b| matches!(b, Block::PendingNote(_))));
    }

    #[test]
    fn test_blocks_placeholder() {
        let mut plan = DocumentPlan::new(DocumentLabels::default());
        plan.push(ComposedSection {
            file_name: "02_Introduction.md".into(),
            title: "2. Introduction".into(),
            body: SectionBody::Placeholder {
                substituted: "签名 text".into(),
            },
        });

        let blocks = plan.blocks();
        let texts: Vec<&str> = blocks.iter().skip(3).map(Block::text).collect();
        assert_eq!(
            texts,
            vec!["2. Introduction", "签名 text", "（待翻译 / Translation pending）", ""]
        );
        assert_eq!(plan.placeholder_count(), 1);
        assert_eq!(plan.human_count(), 0);
    }
}
