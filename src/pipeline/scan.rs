//! Image discovery: walk every page's drawing operators in document
//! order and record each image-paint hit.
//!
//! The sequence counter is threaded through the scan and returned with
//! the hits — there is no shared mutable counter anywhere, so re-running
//! the scan on the same document always yields the same ids. A page whose
//! operator list cannot be retrieved is logged and skipped; partial
//! failure never aborts the scan.

use crate::document::{PageOperator, SourceDocument};
use crate::progress::ProgressCallback;
use tracing::{debug, warn};

/// One image-paint operator found during the scan.
///
/// A page with N image-paint operators yields N hits, each of which later
/// produces its own whole-page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHit {
    /// 1-based id, assigned in discovery order across the whole document.
    pub sequence_id: usize,
    /// 1-based page the operator was found on.
    pub page_number: usize,
}

/// Everything the scan learned about the document.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// All hits, in document order and operator order within a page.
    pub hits: Vec<ImageHit>,
    /// Pages whose operator list was retrieved successfully.
    pub pages_scanned: usize,
    /// Pages skipped because their operator list could not be retrieved.
    pub pages_skipped: usize,
}

/// Scan pages `1..=page_count` in order for image-paint operators.
pub fn discover_images<D: SourceDocument>(
    doc: &D,
    progress: Option<&ProgressCallback>,
) -> ScanReport {
    let total_pages = doc.page_count();
    let mut report = ScanReport::default();
    let mut sequence = 0usize;

    for page_number in 1..=total_pages {
        match doc.page_operators(page_number) {
            Ok(operators) => {
                report.pages_scanned += 1;
                let before = report.hits.len();
                for operator in operators {
                    if operator == PageOperator::PaintImage {
                        sequence += 1;
                        report.hits.push(ImageHit {
                            sequence_id: sequence,
                            page_number,
                        });
                    }
                }
                let found = report.hits.len() - before;
                if found > 0 {
                    debug!("Page {page_number}: {found} image-paint operator(s)");
                }
                if let Some(cb) = progress {
                    cb.on_page_scanned(page_number, total_pages, found);
                }
            }
            Err(e) => {
                report.pages_skipped += 1;
                warn!("Skipping page {page_number}: {e}");
                if let Some(cb) = progress {
                    cb.on_page_error(page_number, e.to_string());
                }
            }
        }
    }

    report
}
