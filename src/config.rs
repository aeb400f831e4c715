//! Configuration types for the docsplit pipeline.
//!
//! Everything a stage needs beyond its input and output paths lives in
//! [`PipelineConfig`], built via [`PipelineConfigBuilder`]. Conventional file
//! locations live in [`OutputLayout`] so the CLI and the `run` command agree
//! on where each stage reads and writes.

use crate::error::PipelineError;
use crate::pipeline::backend::BackendPreference;
use crate::pipeline::bilingual::DocumentLabels;
use crate::pipeline::glossary::DEFAULT_GLOSSARY_KEY;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration shared by the extract, segment and compose stages.
///
/// # Example
/// ```rust
/// use docsplit::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .document_stem("Kyber")
///     .target_lang("ja")
///     .build()
///     .unwrap();
/// assert_eq!(config.markdown_file_name(), "Kyber_en.md");
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Which PDF backends the extractor may use. Default: [`BackendPreference::Auto`].
    pub backend: BackendPreference,

    /// Base name of the extraction artifacts. Default: `Dilithium`.
    ///
    /// The extractor writes `<stem>_<source_lang>.md` and
    /// `<stem>_<source_lang>.json`; the default DOCX is `<stem>_<target_lang>.docx`.
    pub document_stem: String,

    /// Language code of the source document. Default: `en`.
    pub source_lang: String,

    /// Language code of the translation. Default: `zh`.
    ///
    /// Human translations are looked up as `NN_Title.<target_lang>.md`.
    pub target_lang: String,

    /// Title, subtitle and marker text of the composed document.
    pub labels: DocumentLabels,

    /// Top-level YAML key holding the glossary terms. Default: `terms`.
    pub glossary_key: String,

    /// Optional per-item progress reporting.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::default(),
            document_stem: "Dilithium".into(),
            source_lang: "en".into(),
            target_lang: "zh".into(),
            labels: DocumentLabels::default(),
            glossary_key: DEFAULT_GLOSSARY_KEY.into(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("backend", &self.backend)
            .field("document_stem", &self.document_stem)
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("labels", &self.labels)
            .field("glossary_key", &self.glossary_key)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn PipelineProgressCallback>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// `<stem>_<source_lang>.md`
    pub fn markdown_file_name(&self) -> String {
        format!("{}_{}.md", self.document_stem, self.source_lang)
    }

    /// `<stem>_<source_lang>.json`
    pub fn json_file_name(&self) -> String {
        format!("{}_{}.json", self.document_stem, self.source_lang)
    }

    /// `<stem>_<target_lang>.docx`
    pub fn docx_file_name(&self) -> String {
        format!("{}_{}.docx", self.document_stem, self.target_lang)
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn backend(mut self, preference: BackendPreference) -> Self {
        self.config.backend = preference;
        self
    }

    pub fn document_stem(mut self, stem: impl Into<String>) -> Self {
        self.config.document_stem = stem.into();
        self
    }

    pub fn source_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.source_lang = lang.into();
        self
    }

    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.target_lang = lang.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.labels.title = title.into();
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.config.labels.subtitle = subtitle.into();
        self
    }

    pub fn pending_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.labels.pending_marker = marker.into();
        self
    }

    pub fn reference_label(mut self, label: impl Into<String>) -> Self {
        self.config.labels.reference_label = label.into();
        self
    }

    pub fn glossary_key(mut self, key: impl Into<String>) -> Self {
        self.config.glossary_key = key.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, PipelineError> {
        let c = &self.config;
        if c.document_stem.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "Document stem must not be empty".into(),
            ));
        }
        if c.document_stem.contains(['/', '\\']) {
            return Err(PipelineError::InvalidConfig(format!(
                "Document stem must be a file name, got '{}'",
                c.document_stem
            )));
        }
        for (what, lang) in [("Source", &c.source_lang), ("Target", &c.target_lang)] {
            if !is_lang_code(lang) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{what} language must be a short code like 'en' or 'zh-CN', got '{lang}'"
                )));
            }
        }
        if c.source_lang.eq_ignore_ascii_case(&c.target_lang) {
            return Err(PipelineError::InvalidConfig(format!(
                "Source and target language are both '{}'",
                c.source_lang
            )));
        }
        if c.glossary_key.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "Glossary key must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

fn is_lang_code(lang: &str) -> bool {
    !lang.is_empty()
        && lang.len() <= 16
        && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ── Layout ───────────────────────────────────────────────────────────────

/// Conventional locations of every pipeline artifact, relative to a root.
///
/// | Field              | Default                          |
/// |--------------------|----------------------------------|
/// | `out_dir`          | `docs/out`                       |
/// | `sections_dir`     | `docs/out/sections`              |
/// | `glossary`         | `config/terms_<target>.yaml`     |
/// | `translation_dir`  | `docs/translation/sections`      |
/// | `markdown`         | `docs/out/<stem>_<source>.md`    |
/// | `json`             | `docs/out/<stem>_<source>.json`  |
/// | `docx`             | `docs/out/<stem>_<target>.docx`  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub out_dir: PathBuf,
    pub sections_dir: PathBuf,
    pub glossary: PathBuf,
    pub translation_dir: PathBuf,
    pub markdown: PathBuf,
    pub json: PathBuf,
    pub docx: PathBuf,
}

impl OutputLayout {
    /// The conventional layout under `root` for the artifacts named by `config`.
    pub fn new(root: impl AsRef<Path>, config: &PipelineConfig) -> Self {
        let root = root.as_ref();
        let out_dir = root.join("docs").join("out");
        Self {
            sections_dir: out_dir.join("sections"),
            glossary: root
                .join("config")
                .join(format!("terms_{}.yaml", config.target_lang)),
            translation_dir: root.join("docs").join("translation").join("sections"),
            markdown: out_dir.join(config.markdown_file_name()),
            json: out_dir.join(config.json_file_name()),
            docx: out_dir.join(config.docx_file_name()),
            out_dir,
        }
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new("", &PipelineConfig::default())
    }
}
