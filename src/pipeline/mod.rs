//! Pipeline building blocks for the three stages.
//!
//! Each submodule implements one step. The pure text steps (`normalize`,
//! `heading`, `split`, `markdown`, `sanitize`, `glossary`, `bilingual`) never
//! touch the filesystem, so they are tested on plain strings; the stage entry
//! points in [`crate::extract`], [`crate::segment`] and [`crate::compose`]
//! wire them to I/O.
//!
//! ## Data Flow
//!
//! ```text
//!  extract:  input ──▶ backend ──▶ normalize ──▶ split ──▶ markdown / JSON
//!           (%PDF)   (pdfium,     (per page)   (heading)
//!                     pdf-extract)
//!
//!  segment:  markdown | JSON ──▶ sanitize ──▶ NN_Title.md files
//!
//!  compose:  NN_Title.md ──▶ glossary ──▶ bilingual ──▶ docx
//!           (+ NN_Title.<lang>.md)
//! ```
//!
//! 1. [`input`]: validate paths, detect section formats, list section files
//! 2. [`backend`]: PDF text per page with a pdfium → pdf-extract fallback;
//!    blocking, so callers use `spawn_blocking`
//! 3. [`normalize`]: whitespace and hyphenation cleanup
//! 4. [`heading`]: classify a line as a section heading or body
//! 5. [`split`]: group lines into titled sections
//! 6. [`markdown`]: render sections to Markdown and parse them back
//! 7. [`sanitize`]: section titles to file names
//! 8. [`glossary`]: YAML term map, longest-first substitution
//! 9. [`bilingual`]: human translation vs placeholder, document layout
//! 10. [`docx`]: write the layout with `docx-rs`
//! 11. [`write`]: atomic file output

pub mod backend;
pub mod bilingual;
pub mod docx;
pub mod glossary;
pub mod heading;
pub mod input;
pub mod markdown;
pub mod normalize;
pub mod sanitize;
pub mod split;
pub mod write;
