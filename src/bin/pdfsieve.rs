//! CLI binary for pdfsieve.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and writes or prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfsieve::{
    extract, extract_to_dir, inspect, ExtractionConfig, ExtractionProgressCallback,
    ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live scan bar plus one log line per
/// rendered image or skipped page. Pages arrive strictly in order.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Count of pages that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_extraction_start` (called before any pages are scanned).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_extraction_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Scanning");
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Scanning {total_pages} pages for images…"))
        ));
    }

    fn on_page_scanned(&self, page_number: usize, _total: usize, hits_on_page: usize) {
        self.bar.set_message(format!("page {page_number}"));
        if hits_on_page > 0 {
            self.bar.println(format!(
                "  {} Page {:>3}  {}",
                green("✓"),
                page_number,
                dim(&format!("{hits_on_page} image(s)")),
            ));
        }
        self.bar.inc(1);
    }

    fn on_image_rendered(&self, sequence_id: usize, page_number: usize) {
        self.bar.set_prefix("Rendering");
        self.bar
            .set_message(format!("image {sequence_id} (page {page_number})"));
    }

    fn on_page_error(&self, page_number: usize, error: String) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error
        };

        self.bar
            .println(format!("  {} Page {:>3}  {}", red("✗"), page_number, red(&msg)));
    }

    fn on_extraction_complete(&self, images_emitted: usize, failed_pages: usize) {
        self.bar.finish_and_clear();

        if failed_pages == 0 {
            eprintln!(
                "{} {} image(s) extracted",
                green("✔"),
                bold(&images_emitted.to_string())
            );
        } else {
            eprintln!(
                "{} {} image(s) extracted  ({} page(s) skipped)",
                if images_emitted == 0 { red("✘") } else { cyan("⚠") },
                bold(&images_emitted.to_string()),
                red(&failed_pages.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # List what the PDF contains (no files written)
  pdfsieve document.pdf

  # Save every extracted image as a PNG file
  pdfsieve document.pdf -o images/

  # Print data URIs suitable for pasting into HTML
  pdfsieve --base64 document.pdf

  # Structured JSON output (embeds the base64 payloads)
  pdfsieve --json document.pdf > run.json

  # Encrypted PDF
  pdfsieve --password hunter2 secret.pdf -o images/

  # Snapshot more pages when the PDF has no embedded images
  pdfsieve --max-fallback-pages 10 --fallback-scale 2.0 scanned.pdf -o pages/

  # Inspect PDF metadata only
  pdfsieve --inspect-only document.pdf

FALLBACK BEHAVIOUR:
  When no embedded images are found anywhere in the document, pdfsieve
  renders the first pages (up to --max-fallback-pages, default 5) as
  whole-page snapshots instead, so scanned documents still produce
  useful output.

ENVIRONMENT VARIABLES:
  PDFSIEVE_OUTPUT     Default output directory (-o)
  PDFSIEVE_PASSWORD   PDF user password (--password)
  PDFIUM_LIB_PATH     Path to an existing libpdfium shared library

SETUP:
  pdfsieve needs a pdfium shared library at runtime. Place libpdfium
  next to the executable, install it system-wide, or point
  PDFIUM_LIB_PATH at an existing copy.
"#;

/// Extract images from PDF documents as PNG files or base64 payloads.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsieve",
    version,
    about = "Extract images from PDF documents as PNG files or base64 payloads",
    long_about = "Extract images from PDF documents. Pages containing embedded images are \
rendered as they display, one result per image-paint operator; documents without any \
embedded images fall back to whole-page snapshots of the first pages.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Write extracted images as files into this directory.
    #[arg(short, long, env = "PDFSIEVE_OUTPUT")]
    output: Option<PathBuf>,

    /// Print each image as a data: URI instead of a summary line.
    #[arg(long)]
    base64: bool,

    /// Output structured JSON (images, metadata, stats) instead of text.
    #[arg(long)]
    json: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFSIEVE_PASSWORD")]
    password: Option<String>,

    /// Scale factor for embedded-image page renders.
    #[arg(long, default_value_t = 1.0)]
    embedded_scale: f32,

    /// Scale factor for fallback page snapshots.
    #[arg(long, default_value_t = 1.2)]
    fallback_scale: f32,

    /// Maximum pages rendered when falling back to page snapshots.
    #[arg(long, default_value_t = 5)]
    max_fallback_pages: usize,

    /// Maximum rendered width or height in pixels.
    #[arg(long, default_value_t = 4000)]
    max_pixels: u32,

    /// Disable progress bar.
    #[arg(long, env = "PDFSIEVE_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSIEVE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFSIEVE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    // The progress bar is initialised with a spinner (no page count yet);
    // `on_extraction_start` resizes it to the correct total once the PDF
    // has been loaded.

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let mut builder = ExtractionConfig::builder()
        .embedded_scale(cli.embedded_scale)
        .fallback_scale(cli.fallback_scale)
        .max_fallback_pages(cli.max_fallback_pages)
        .max_rendered_pixels(cli.max_pixels);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run extraction ───────────────────────────────────────────────────
    if let Some(ref dir) = cli.output {
        let output = extract_to_dir(&cli.input, dir, &config)
            .await
            .context("Extraction failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else if let Some(notice) = output.notice() {
            eprintln!("{} {}", cyan("ℹ"), notice);
        } else if !cli.quiet {
            eprintln!(
                "{}  {} image(s)  {}ms  →  {}",
                green("✔"),
                output.images.len(),
                output.stats.total_duration_ms,
                bold(&dir.display().to_string()),
            );
        }
        return Ok(());
    }

    let output = extract(&cli.input, &config)
        .await
        .context("Extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if let Some(notice) = output.notice() {
        eprintln!("{} {}", cyan("ℹ"), notice);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for img in &output.images {
        if cli.base64 {
            writeln!(handle, "{}", img.image.to_data_uri()).context("Failed to write to stdout")?;
        } else {
            writeln!(
                handle,
                "{:<4} {:<22} page {:<4} {:>5}x{:<5} {}",
                img.sequence_id,
                img.label,
                img.page_number,
                img.width,
                img.height,
                dim(&img.download_filename()),
            )
            .context("Failed to write to stdout")?;
        }
    }

    if !cli.quiet && !show_progress {
        eprintln!(
            "Extracted {} image(s) from {} page(s) in {}ms",
            output.stats.images_emitted, output.stats.total_pages, output.stats.total_duration_ms
        );
        if output.stats.failed_renders > 0 {
            eprintln!("  {} render(s) failed", output.stats.failed_renders);
        }
    }

    Ok(())
}
