//! Eager (full-document) extraction entry points.
//!
//! ## Why one blocking closure?
//!
//! pdfium wraps a C++ library with thread-local state and is not safe to
//! call from async contexts, so the entire load → scan → render sequence
//! runs inside a single `tokio::task::spawn_blocking` closure. Pages are
//! processed strictly sequentially in page order inside it — only one
//! library operation is ever in flight, which is exactly what keeps
//! sequence ids monotone without any synchronisation.

use crate::config::ExtractionConfig;
use crate::document::SourceDocument;
use crate::error::ExtractError;
use crate::output::{DocumentMetadata, ExtractedImage, ExtractionOutput, ExtractionStats};
use crate::pipeline::{load, render, scan};
use crate::state::SelectedFile;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Extract images from a PDF file on disk.
///
/// This is the primary entry point for the CLI.
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors: file not found,
/// not a valid PDF, password required. A run where every page failed
/// individually still returns `Ok` with an empty result list — check
/// [`ExtractionOutput::notice`].
pub async fn extract(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let bytes = read_input(path.as_ref()).await?;
    extract_from_bytes(&bytes, config).await
}

/// Extract images from an in-memory PDF byte buffer.
///
/// The recommended API when the PDF comes from an upload, a database, or
/// a network stream rather than a file on disk.
pub async fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let bytes = bytes.to_vec();
    let config = config.clone();

    let mut output = tokio::task::spawn_blocking(move || extract_blocking(&bytes, &config))
        .await
        .map_err(|e| ExtractError::Internal(format!("Extraction task panicked: {e}")))??;

    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Extraction complete: {} image(s) in {}ms",
        output.images.len(),
        output.stats.total_duration_ms
    );
    Ok(output)
}

/// Extract images from a user-selected file, validating the declared
/// MIME type before any parsing begins.
pub async fn extract_selected(
    file: &SelectedFile,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    if !load::is_pdf_mime(&file.mime) {
        return Err(ExtractError::UnsupportedFileType {
            mime: file.mime.clone(),
        });
    }
    extract_from_bytes(&file.bytes, config).await
}

/// Extract images and write each one into `dir` under its
/// [`download filename`](crate::output::ExtractedImage::download_filename).
///
/// Returns the full output so callers can still inspect stats and
/// metadata after the files are on disk.
pub async fn extract_to_dir(
    input: impl AsRef<Path>,
    dir: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let output = extract(input, config).await?;
    let dir = dir.as_ref();

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ExtractError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source,
        })?;

    for img in &output.images {
        let path = dir.join(img.download_filename());
        let bytes = img.image.decode().map_err(|e| {
            ExtractError::Internal(format!("Corrupt base64 payload for '{}': {e}", img.label))
        })?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| ExtractError::OutputWriteFailed { path, source })?;
        info!("Wrote {}", dir.join(img.download_filename()).display());
    }

    Ok(output)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(path, config))
}

/// Read PDF metadata without scanning or rendering anything.
pub async fn inspect(path: impl AsRef<Path>) -> Result<DocumentMetadata, ExtractError> {
    let bytes = read_input(path.as_ref()).await?;

    tokio::task::spawn_blocking(move || {
        let pdfium = load::bind_pdfium()?;
        let document = load::load_document(&pdfium, &bytes, None)?;
        Ok(load::read_metadata(&document))
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("Inspect task panicked: {e}")))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn read_input(path: &Path) -> Result<Vec<u8>, ExtractError> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExtractError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ExtractError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ExtractError::Internal(format!("Failed to read '{}': {e}", path.display())),
    })
}

/// Blocking implementation: all pdfium work happens here.
fn extract_blocking(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    // ── Step 1: Load the document ────────────────────────────────────────
    let pdfium = load::bind_pdfium()?;
    let document = load::load_document(&pdfium, bytes, config.password.as_deref())?;
    let metadata = load::read_metadata(&document);
    info!("PDF loaded: {} pages", metadata.page_count);

    // ── Step 2: Scan and render ──────────────────────────────────────────
    let source = load::PdfiumSource::new(&document, config.max_rendered_pixels);
    let (images, stats) = run_extraction(&source, config);

    Ok(ExtractionOutput {
        images,
        metadata,
        stats,
    })
}

/// The page-scan/extraction-decision workflow, generic over the document
/// backend. Never fails fatally: the document is already loaded and every
/// per-page failure is isolated.
pub(crate) fn run_extraction<D: SourceDocument>(
    doc: &D,
    config: &ExtractionConfig,
) -> (Vec<ExtractedImage>, ExtractionStats) {
    let progress = config.progress_callback.as_ref();
    let total_pages = doc.page_count();
    if let Some(cb) = progress {
        cb.on_extraction_start(total_pages);
    }

    // Discovery first: the fallback decision needs the complete scan.
    let scan_start = Instant::now();
    let scan_report = scan::discover_images(doc, progress);
    let scan_duration_ms = scan_start.elapsed().as_millis() as u64;

    let render_start = Instant::now();
    let built = if scan_report.hits.is_empty() {
        info!("No embedded images found; falling back to page snapshots");
        render::build_fallback_results(doc, config, progress)
    } else {
        info!(
            "Found {} image-paint operator(s) across {} page(s)",
            scan_report.hits.len(),
            scan_report.pages_scanned
        );
        render::build_embedded_results(doc, &scan_report.hits, config, progress)
    };
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    if let Some(cb) = progress {
        cb.on_extraction_complete(
            built.images.len(),
            scan_report.pages_skipped + built.failed_renders,
        );
    }

    let stats = ExtractionStats {
        total_pages,
        pages_scanned: scan_report.pages_scanned,
        pages_skipped: scan_report.pages_skipped,
        operators_found: scan_report.hits.len(),
        images_emitted: built.images.len(),
        failed_renders: built.failed_renders,
        scan_duration_ms,
        render_duration_ms,
        total_duration_ms: 0, // filled in by the async wrapper
    };

    (built.images, stats)
}
