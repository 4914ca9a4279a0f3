//! # pdfsieve
//!
//! Extract images from PDF documents as base64 PNG payloads.
//!
//! ## Why this crate?
//!
//! Pulling the raw image streams out of a PDF is unreliable — embedded
//! images are routinely masked, tiled, colour-keyed, or split across
//! several XObjects, and the bytes alone lose all of that. Instead this
//! crate scans each page's drawing operators for image paints and renders
//! the *page* via pdfium, once per hit, so every result looks exactly the
//! way the document displays it. Documents with no embedded images at all
//! fall back to plain page snapshots, so a run never comes back
//! empty-handed for a renderable document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Load    validate MIME + %PDF magic, parse via pdfium (spawn_blocking)
//!  ├─ 2. Scan    walk every page's operators, record image-paint hits
//!  ├─ 3. Decide  hits found → embedded path; none → fallback path (≤ 5 pages)
//!  ├─ 4. Render  whole-page rasters per hit (or per fallback page)
//!  └─ 5. Encode  PNG → base64 results + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfsieve::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("document.pdf", &config).await?;
//!     for img in &output.images {
//!         println!("{} (page {}, {}x{})",
//!             img.download_filename(), img.page_number, img.width, img.height);
//!     }
//!     if let Some(notice) = output.notice() {
//!         eprintln!("{notice}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsieve` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdfsieve = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use document::{PageOperator, RenderedPage, SourceDocument};
pub use error::{ExtractError, PageError};
pub use extract::{
    extract, extract_from_bytes, extract_selected, extract_sync, extract_to_dir, inspect,
};
pub use output::{
    DocumentMetadata, EncodedImage, ExtractedImage, ExtractionOutput, ExtractionStats, ImageOrigin,
};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use state::{ExtractorSession, SelectedFile, SessionState};
