//! CLI binary for docsplit.
//!
//! A thin shim over the library crate that maps subcommands and flags to
//! `PipelineConfig` / `OutputLayout` and prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docsplit::{
    compose_docx, extract_pdf, segment_file, verify_outputs, Backend, BackendPreference,
    OutputLayout, PipelineConfig, PipelineProgressCallback, ProgressCallback, Stage,
    VerificationReport,
};
use docsplit::verify::Check;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one progress bar per stage plus a log line per
/// item. A spinner covers the time before the first stage knows its size.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    /// Show a spinner until the next `on_stage_start`.
    fn spin(&self, prefix: &str, message: &str) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix(prefix.to_string());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        self.replace(Some(bar));
    }

    fn replace(&self, bar: Option<ProgressBar>) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(old) = slot.take() {
                old.finish_and_clear();
            }
            *slot = bar;
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                f(bar);
            }
        }
    }
}

fn item_noun(stage: Stage) -> &'static str {
    match stage {
        Stage::Extract => "pages",
        Stage::Segment | Stage::Compose => "sections",
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(&format!(
                "{{spinner:.cyan}} {{prefix:.bold}}  \
                 [{{bar:42.green/238}}] {{pos:>3}}/{{len}} {}  \
                 ⏱ {{elapsed_precise}}",
                item_noun(stage)
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        bar.set_prefix(capitalise(&stage.to_string()));
        bar.enable_steady_tick(Duration::from_millis(80));
        self.replace(Some(bar));
    }

    fn on_item_complete(&self, _stage: Stage, index: usize, total: usize, label: &str) {
        self.with_bar(|bar| {
            bar.println(format!("  {} {:>3}/{:<3}  {}", green("✓"), index, total, label));
            bar.inc(1);
        });
    }

    fn on_item_skipped(&self, _stage: Stage, index: usize, total: usize, label: &str, reason: &str) {
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} {:>3}/{:<3}  {}  {}",
                yellow("⚠"),
                index,
                total,
                label,
                dim(reason)
            ));
            bar.inc(1);
        });
    }

    fn on_stage_complete(&self, stage: Stage, processed: usize) {
        self.replace(None);
        eprintln!(
            "{} {}: {} {}",
            green("✔"),
            bold(&capitalise(&stage.to_string())),
            processed,
            item_noun(stage)
        );
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Stage 1: PDF → docs/out/Dilithium_en.md + docs/out/Dilithium_en.json
  docsplit extract Dilithium.pdf

  # Stage 2: one Markdown file per section
  docsplit segment docs/out/Dilithium_en.md
  docsplit segment docs/out/Dilithium_en.json docs/out/sections

  # Stage 3: bilingual Word document
  docsplit compose
  docsplit compose docs/out/sections -o docs/out/Dilithium_zh.docx \
      --glossary config/terms_zh.yaml --translations docs/translation/sections

  # Everything, then verify
  docsplit run Dilithium.pdf

  # Check that all artifacts exist
  docsplit verify

FILES:
  docs/out/<stem>_en.md             extracted sections as Markdown
  docs/out/<stem>_en.json           pages and sections as JSON
  docs/out/sections/NN_<Title>.md   one file per section
  docs/translation/sections/NN_<Title>.zh.md
                                    optional human translation
  config/terms_zh.yaml              glossary, `terms:` mapping English → Chinese
  docs/out/<stem>_zh.docx           composed document

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to a pdfium shared library
  RUST_LOG                Override log filter (e.g. docsplit=debug)
  DOCSPLIT_*              Every flag has a DOCSPLIT_ variable, see --help
"#;

/// Split PDF papers into sections and compose a bilingual Word document.
#[derive(Parser, Debug)]
#[command(
    name = "docsplit",
    version,
    about = "Split PDF papers into sections and compose a bilingual Word document",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    doc: DocumentArgs,

    /// Print stage results as JSON on stdout.
    #[arg(long, global = true, env = "DOCSPLIT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, global = true, env = "DOCSPLIT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOCSPLIT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "DOCSPLIT_QUIET")]
    quiet: bool,
}

/// Options shared by every stage.
#[derive(Args, Debug)]
struct DocumentArgs {
    /// Base name of the artifacts (<stem>_en.md, <stem>_zh.docx, …).
    #[arg(long, global = true, env = "DOCSPLIT_STEM", default_value = "Dilithium")]
    stem: String,

    /// Source language code.
    #[arg(long, global = true, env = "DOCSPLIT_SOURCE_LANG", default_value = "en")]
    source_lang: String,

    /// Target language code; translations are read from NN_<Title>.<lang>.md.
    #[arg(long, global = true, env = "DOCSPLIT_TARGET_LANG", default_value = "zh")]
    target_lang: String,

    /// PDF backend: auto, pdfium, pdf-extract.
    #[arg(long, global = true, env = "DOCSPLIT_BACKEND", value_enum, default_value = "auto")]
    backend: BackendArg,

    /// Document title in the composed document.
    #[arg(long, global = true, env = "DOCSPLIT_TITLE")]
    title: Option<String>,

    /// Subtitle in the composed document.
    #[arg(long, global = true, env = "DOCSPLIT_SUBTITLE")]
    subtitle: Option<String>,

    /// Marker shown under sections without a human translation.
    #[arg(long, global = true, env = "DOCSPLIT_PENDING_MARKER")]
    pending_marker: Option<String>,

    /// Top-level YAML key of the glossary mapping.
    #[arg(long, global = true, env = "DOCSPLIT_GLOSSARY_KEY", default_value = "terms")]
    glossary_key: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text and sections from a PDF into Markdown and JSON.
    Extract {
        /// Source PDF.
        pdf: PathBuf,
        /// Output directory.
        #[arg(env = "DOCSPLIT_OUT_DIR", default_value = "docs/out")]
        output_dir: PathBuf,
    },

    /// Write one Markdown file per section from a .md or .json file.
    Segment {
        /// Markdown or JSON produced by `extract`.
        input: PathBuf,
        /// Directory for the section files.
        #[arg(env = "DOCSPLIT_SECTIONS_DIR", default_value = "docs/out/sections")]
        output_dir: PathBuf,
    },

    /// Compose the bilingual Word document from section files.
    Compose {
        /// Directory of NN_<Title>.md files.
        #[arg(env = "DOCSPLIT_SECTIONS_DIR", default_value = "docs/out/sections")]
        sections_dir: PathBuf,
        /// Output .docx path. Default: docs/out/<stem>_<target>.docx.
        #[arg(short, long, env = "DOCSPLIT_OUTPUT")]
        output: Option<PathBuf>,
        /// Glossary YAML. Default: config/terms_<target>.yaml.
        #[arg(long, env = "DOCSPLIT_GLOSSARY")]
        glossary: Option<PathBuf>,
        /// Directory of human translations.
        #[arg(long, env = "DOCSPLIT_TRANSLATIONS", default_value = "docs/translation/sections")]
        translations: PathBuf,
        /// Ignore human translations; every section gets a placeholder.
        #[arg(long)]
        no_translations: bool,
    },

    /// Check that every pipeline artifact exists.
    Verify {
        /// Project root holding docs/ and config/.
        #[arg(long, env = "DOCSPLIT_ROOT", default_value = ".")]
        root: PathBuf,
    },

    /// Run extract, segment and compose in order, then verify.
    Run {
        /// Source PDF.
        pdf: PathBuf,
        /// Project root holding docs/ and config/.
        #[arg(long, env = "DOCSPLIT_ROOT", default_value = ".")]
        root: PathBuf,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Auto,
    Pdfium,
    PdfExtract,
}

impl From<BackendArg> for BackendPreference {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Auto => BackendPreference::Auto,
            BackendArg::Pdfium => BackendPreference::Only(Backend::Pdfium),
            BackendArg::PdfExtract => BackendPreference::Only(Backend::PdfExtract),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs are hidden while the progress bar is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(
        &cli.doc,
        progress
            .clone()
            .map(|cb| cb as Arc<dyn PipelineProgressCallback>),
    )?;
    let out = Output {
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Extract { pdf, output_dir } => {
            run_extract(&pdf, &output_dir, &config, progress.as_deref(), &out).await
        }
        Command::Segment { input, output_dir } => {
            run_segment(&input, &output_dir, &config, &out).await
        }
        Command::Compose {
            sections_dir,
            output,
            glossary,
            translations,
            no_translations,
        } => {
            let layout = OutputLayout::new("", &config);
            let output = output.unwrap_or(layout.docx);
            let glossary = glossary.unwrap_or(layout.glossary);
            let translations = (!no_translations).then_some(translations.as_path());
            run_compose(&sections_dir, &output, &glossary, translations, &config, &out).await
        }
        Command::Verify { root } => {
            let layout = OutputLayout::new(&root, &config);
            report_verification(&verify_outputs(&layout), &out)
        }
        Command::Run { pdf, root } => {
            let layout = OutputLayout::new(&root, &config);
            run_extract(&pdf, &layout.out_dir, &config, progress.as_deref(), &out).await?;
            run_segment(&layout.markdown, &layout.sections_dir, &config, &out).await?;
            run_compose(
                &layout.sections_dir,
                &layout.docx,
                &layout.glossary,
                Some(layout.translation_dir.as_path()),
                &config,
                &out,
            )
            .await?;
            report_verification(&verify_outputs(&layout), &out)
        }
    }
}

/// How results are printed.
struct Output {
    json: bool,
    quiet: bool,
}

impl Output {
    fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
        println!("{json}");
        Ok(())
    }
}

async fn run_extract(
    pdf: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    progress: Option<&CliProgressCallback>,
    out: &Output,
) -> Result<()> {
    if let Some(cb) = progress {
        cb.spin("Extracting", &format!("Decoding {}…", pdf.display()));
    }

    let result = extract_pdf(pdf, output_dir, config).await;
    if let Some(cb) = progress {
        cb.replace(None);
    }
    let output = result.with_context(|| format!("Extraction of {} failed", pdf.display()))?;

    if out.json {
        return out.json(&output.stats);
    }
    if !out.quiet {
        eprintln!(
            "{}  {} pages, {} sections via {}  {}ms",
            green("✔"),
            output.stats.total_pages,
            output.stats.section_count,
            cyan(output.stats.backend.name()),
            output.stats.total_duration_ms,
        );
        eprintln!("   →  {}", bold(&output.markdown_path.display().to_string()));
        eprintln!("   →  {}", bold(&output.json_path.display().to_string()));
    }
    Ok(())
}

async fn run_segment(
    input: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    out: &Output,
) -> Result<()> {
    let output = segment_file(input, output_dir, config)
        .await
        .with_context(|| format!("Segmentation of {} failed", input.display()))?;

    if out.json {
        return out.json(&output);
    }
    if !out.quiet {
        eprintln!(
            "{}  {} section files  →  {}",
            green("✔"),
            output.files.len(),
            bold(&output.output_dir.display().to_string()),
        );
    }
    Ok(())
}

async fn run_compose(
    sections_dir: &Path,
    output: &Path,
    glossary: &Path,
    translations: Option<&Path>,
    config: &PipelineConfig,
    out: &Output,
) -> Result<()> {
    let composed = compose_docx(sections_dir, output, glossary, translations, config)
        .await
        .context("Composition failed")?;

    if out.json {
        return out.json(&composed);
    }
    if !out.quiet {
        let s = &composed.stats;
        eprintln!(
            "{}  {} human, {} placeholder, {} skipped  ({} glossary terms)  →  {}",
            green("✔"),
            s.human_translations,
            s.placeholders,
            s.skipped,
            s.glossary_terms,
            bold(&composed.path.display().to_string()),
        );
    }
    Ok(())
}

fn report_verification(report: &VerificationReport, out: &Output) -> Result<()> {
    if out.json {
        out.json(report)?;
    } else if !out.quiet {
        for check in &report.passed {
            match check {
                Check::File { path, size } => eprintln!(
                    "{} {} {}",
                    green("✓"),
                    path.display(),
                    dim(&format!("({size} bytes)"))
                ),
                Check::SectionDir { path, count } => eprintln!(
                    "{} {} {}",
                    green("✓"),
                    path.display(),
                    dim(&format!("({count} section files)"))
                ),
            }
        }
        for problem in &report.problems {
            eprintln!("{} {}", red("✗"), problem);
        }
    }

    if !report.is_ok() {
        anyhow::bail!(
            "Pipeline verification failed with {} problem(s)",
            report.problems.len()
        );
    }
    if !out.quiet && !out.json {
        eprintln!("{} All pipeline artifacts present", green("✔"));
    }
    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(args: &DocumentArgs, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .backend(args.backend.into())
        .document_stem(&args.stem)
        .source_lang(&args.source_lang)
        .target_lang(&args.target_lang)
        .glossary_key(&args.glossary_key);

    if let Some(ref title) = args.title {
        builder = builder.title(title);
    }
    if let Some(ref subtitle) = args.subtitle {
        builder = builder.subtitle(subtitle);
    }
    if let Some(ref marker) = args.pending_marker {
        builder = builder.pending_marker(marker);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
