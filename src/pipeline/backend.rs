//! PDF text backends and the fallback chain between them.
//!
//! Two backends are supported, each behind its own Cargo feature:
//!
//! | Backend                | Feature       | Notes                                   |
//! |------------------------|---------------|-----------------------------------------|
//! | [`Backend::Pdfium`]    | `pdfium`      | Needs a pdfium shared library at runtime |
//! | [`Backend::PdfExtract`]| `pdf-extract` | Pure Rust, always loadable               |
//!
//! Both return one `String` per page. A backend that is compiled out, or whose
//! native library cannot be bound, reports [`BackendError::Unavailable`]; one
//! that loads but chokes on the document reports [`BackendError::DecodeFailed`].
//! [`extract_with_fallback`] walks the chain and turns the combined outcome
//! into a single fatal error only when nothing worked.
//!
//! Everything here is blocking. Callers on an async runtime go through
//! `tokio::task::spawn_blocking`.

use crate::error::{BackendError, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// A PDF text extraction backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Pdfium,
    PdfExtract,
}

impl Backend {
    /// All backends in fallback order.
    pub const ALL: [Backend; 2] = [Backend::Pdfium, Backend::PdfExtract];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Pdfium => "pdfium",
            Backend::PdfExtract => "pdf-extract",
        }
    }

    /// Whether support for this backend was compiled in.
    pub fn is_compiled_in(self) -> bool {
        match self {
            Backend::Pdfium => cfg!(feature = "pdfium"),
            Backend::PdfExtract => cfg!(feature = "pdf-extract"),
        }
    }

    /// Extract the raw text of every page, in page order.
    pub fn extract_pages(self, path: &Path) -> Result<Vec<String>, BackendError> {
        match self {
            Backend::Pdfium => pdfium_pages(path),
            Backend::PdfExtract => pdf_extract_pages(path),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdfium" => Ok(Backend::Pdfium),
            "pdf-extract" | "pdf_extract" | "pdfextract" => Ok(Backend::PdfExtract),
            other => Err(format!(
                "unknown backend '{other}' (expected 'pdfium' or 'pdf-extract')"
            )),
        }
    }
}

/// Which backends the extractor may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackendPreference {
    /// Try every backend in [`Backend::ALL`] order.
    #[default]
    Auto,
    /// Use exactly this backend, no fallback.
    Only(Backend),
}

impl BackendPreference {
    /// Backends to try, in order.
    pub fn candidates(self) -> Vec<Backend> {
        match self {
            BackendPreference::Auto => Backend::ALL.to_vec(),
            BackendPreference::Only(b) => vec![b],
        }
    }
}

/// Run the backends allowed by `preference` until one succeeds.
///
/// Returns the page texts together with the backend that produced them.
/// If every attempt was [`BackendError::Unavailable`] the result is
/// [`PipelineError::NoBackendAvailable`]; if at least one backend loaded but
/// failed to decode, it is [`PipelineError::ExtractionFailed`].
pub fn extract_with_fallback(
    path: &Path,
    preference: BackendPreference,
) -> Result<(Backend, Vec<String>), PipelineError> {
    extract_with(path, &preference.candidates(), |backend, p| {
        backend.extract_pages(p)
    })
}

/// Fallback loop with an injectable backend runner.
fn extract_with<F>(
    path: &Path,
    candidates: &[Backend],
    mut run: F,
) -> Result<(Backend, Vec<String>), PipelineError>
where
    F: FnMut(Backend, &Path) -> Result<Vec<String>, BackendError>,
{
    let mut failures: Vec<BackendError> = Vec::new();

    for &backend in candidates {
        debug!("Trying {} backend for {}", backend, path.display());
        match run(backend, path) {
            Ok(pages) => {
                info!("{} extracted {} pages", backend, pages.len());
                return Ok((backend, pages));
            }
            Err(e) => {
                warn!("{}", e);
                failures.push(e);
            }
        }
    }

    let tried = candidates
        .iter()
        .map(|b| b.name())
        .collect::<Vec<_>>()
        .join(", ");

    let decode_failures: Vec<String> = failures
        .iter()
        .filter(|e| matches!(e, BackendError::DecodeFailed { .. }))
        .map(|e| e.to_string())
        .collect();

    if decode_failures.is_empty() {
        Err(PipelineError::NoBackendAvailable { tried })
    } else {
        Err(PipelineError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: decode_failures.join("; "),
        })
    }
}

// ── pdfium ───────────────────────────────────────────────────────────────────

#[cfg(feature = "pdfium")]
fn bind_pdfium() -> Result<pdfium_render::prelude::Pdfium, BackendError> {
    use pdfium_render::prelude::Pdfium;

    let unavailable = |detail: String| BackendError::Unavailable {
        backend: Backend::Pdfium,
        detail,
    };

    // 1. Explicit library path.
    if let Ok(lib) = std::env::var("PDFIUM_LIB_PATH") {
        return Pdfium::bind_to_library(&lib)
            .map(Pdfium::new)
            .map_err(|e| unavailable(format!("cannot bind PDFIUM_LIB_PATH '{lib}': {e:?}")));
    }

    // 2. Library next to the working directory, then 3. system library.
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| unavailable(format!("no pdfium library found: {e:?}")))
}

#[cfg(feature = "pdfium")]
fn pdfium_pages(path: &Path) -> Result<Vec<String>, BackendError> {
    let pdfium = bind_pdfium()?;

    let decode_failed = |detail: String| BackendError::DecodeFailed {
        backend: Backend::Pdfium,
        detail,
    };

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| decode_failed(format!("{e:?}")))?;

    document
        .pages()
        .iter()
        .enumerate()
        .map(|(idx, page)| {
            page.text()
                .map(|text| text.all())
                .map_err(|e| decode_failed(format!("page {}: {e:?}", idx + 1)))
        })
        .collect()
}

#[cfg(not(feature = "pdfium"))]
fn pdfium_pages(_path: &Path) -> Result<Vec<String>, BackendError> {
    Err(BackendError::Unavailable {
        backend: Backend::Pdfium,
        detail: "not compiled in (enable the `pdfium` feature)".into(),
    })
}

// ── pdf-extract ──────────────────────────────────────────────────────────────

#[cfg(feature = "pdf-extract")]
fn pdf_extract_pages(path: &Path) -> Result<Vec<String>, BackendError> {
    let decode_failed = |detail: String| BackendError::DecodeFailed {
        backend: Backend::PdfExtract,
        detail,
    };

    let bytes = std::fs::read(path).map_err(|e| decode_failed(e.to_string()))?;

    // pdf-extract panics on some malformed inputs instead of returning Err.
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    }));

    match outcome {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(decode_failed(e.to_string())),
        Err(_) => Err(decode_failed("decoder panicked".into())),
    }
}

#[cfg(not(feature = "pdf-extract"))]
fn pdf_extract_pages(_path: &Path) -> Result<Vec<String>, BackendError> {
    Err(BackendError::Unavailable {
        backend: Backend::PdfExtract,
        detail: "not compiled in (enable the `pdf-extract` feature)".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable(backend: Backend) -> BackendError {
        BackendError::Unavailable {
            backend,
            detail: "missing".into(),
        }
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Backend::Pdfium.to_string(), "pdfium");
        assert_eq!(Backend::PdfExtract.to_string(), "pdf-extract");
        assert_eq!("PDFium".parse::<Backend>().unwrap(), Backend::Pdfium);
        assert_eq!("pdf_extract".parse::<Backend>().unwrap(), Backend::PdfExtract);
        assert!("mupdf".parse::<Backend>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Backend::PdfExtract).unwrap(),
            "\"pdf-extract\""
        );
    }

    #[test]
    fn test_candidates() {
        assert_eq!(
            BackendPreference::Auto.candidates(),
            vec![Backend::Pdfium, Backend::PdfExtract]
        );
        assert_eq!(
            BackendPreference::Only(Backend::PdfExtract).candidates(),
            vec![Backend::PdfExtract]
        );
    }

    #[test]
    fn test_falls_back_to_second_backend() {
        let (backend, pages) = extract_with(Path::new("a.pdf"), &Backend::ALL, |b, _| match b {
            Backend::Pdfium => Err(unavailable(b)),
            Backend::PdfExtract => Ok(vec!["page one".into()]),
        })
        .unwrap();
        assert_eq!(backend, Backend::PdfExtract);
        assert_eq!(pages, vec!["page one".to_string()]);
    }

    #[test]
    fn test_first_success_wins() {
        let mut calls = Vec::new();
        let (backend, _) = extract_with(Path::new("a.pdf"), &Backend::ALL, |b, _| {
            calls.push(b);
            Ok(vec![])
        })
        .unwrap();
        assert_eq!(backend, Backend::Pdfium);
        assert_eq!(calls, vec![Backend::Pdfium]);
    }

    #[test]
    fn test_all_unavailable_is_no_backend() {
        let err = extract_with(Path::new("a.pdf"), &Backend::ALL, |b, _| Err(unavailable(b)))
            .unwrap_err();
        match err {
            PipelineError::NoBackendAvailable { tried } => {
                assert_eq!(tried, "pdfium, pdf-extract")
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_decode_failure_is_extraction_failed() {
        let err = extract_with(Path::new("a.pdf"), &Backend::ALL, |b, _| match b {
            Backend::Pdfium => Err(unavailable(b)),
            Backend::PdfExtract => Err(BackendError::DecodeFailed {
                backend: b,
                detail: "bad xref".into(),
            }),
        })
        .unwrap_err();
        match err {
            PipelineError::ExtractionFailed { detail, .. } => assert!(detail.contains("bad xref")),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_empty_candidate_list() {
        let err = extract_with(Path::new("a.pdf"), &[], |_, _| Ok(vec![])).unwrap_err();
        assert!(matches!(err, PipelineError::NoBackendAvailable { .. }));
    }

    #[cfg(not(feature = "pdfium"))]
    #[test]
    fn test_pdfium_compiled_out_is_unavailable() {
        let err = Backend::Pdfium.extract_pages(Path::new("a.pdf")).unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));
    }
}
