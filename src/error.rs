//! Error types for the docsplit library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PipelineError`] is **fatal**: the stage cannot proceed at all
//!   (missing input, unsupported file, no PDF backend, unwritable output).
//!   Returned as `Err(PipelineError)` from the `extract*`, `segment*` and
//!   `compose*` entry points.
//!
//! * [`BackendError`] is **non-fatal**: one PDF backend could not be loaded or
//!   failed to decode the document. The extractor logs it and moves on to the
//!   next backend in the fallback chain; only when every backend has failed
//!   does it become a [`PipelineError`].

use crate::pipeline::backend::Backend;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docsplit library.
#[derive(Debug, Error)]
pub enum PipelineError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// A required input file or directory does not exist.
    #[error("Input not found: '{path}'\n{hint}")]
    InputNotFound { path: PathBuf, hint: String },

    /// Process does not have read permission on the input.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// Section input has an extension the segmenter cannot read.
    #[error("Unsupported file format '{extension}' for '{path}'. Use .json or .md")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// A JSON sections artifact could not be parsed.
    #[error("Malformed JSON in '{path}': {source}")]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The glossary file is not valid YAML or has the wrong shape.
    #[error("Malformed glossary '{path}': {detail}")]
    MalformedGlossary { path: PathBuf, detail: String },

    /// A glossary term could not be compiled into a matcher.
    #[error("Invalid glossary term '{term}': {detail}")]
    InvalidGlossaryTerm { term: String, detail: String },

    /// An input file could not be read after it was found.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Backend errors ────────────────────────────────────────────────────
    /// No PDF backend is compiled in or loadable.
    #[error(
        "No PDF extraction backend available (tried: {tried}).\n\
Install a pdfium library and set PDFIUM_LIB_PATH, or build with the `pdf-extract` feature."
    )]
    NoBackendAvailable { tried: String },

    /// Every available backend failed to decode the document.
    #[error("Text extraction failed for '{path}': {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The Word document could not be packed.
    #[error("Failed to build Word document '{path}': {detail}")]
    DocxWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of a single PDF backend.
///
/// Logged by the extractor, which then tries the next backend.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum BackendError {
    /// The backend is not compiled in or its native library could not be loaded.
    #[error("{backend} backend unavailable: {detail}")]
    Unavailable { backend: Backend, detail: String },

    /// The backend loaded but could not decode the document.
    #[error("{backend} failed to decode PDF: {detail}")]
    DecodeFailed { backend: Backend, detail: String },
}

impl BackendError {
    /// The backend that produced this error.
    pub fn backend(&self) -> Backend {
        match self {
            BackendError::Unavailable { backend, .. } | BackendError::DecodeFailed { backend, .. } => {
                *backend
            }
        }
    }
}
