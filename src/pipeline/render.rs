//! Page rasterisation and result building.
//!
//! Two paths, mutually exclusive per run:
//!
//! * **Embedded** — one whole-page render per [`ImageHit`] from the scan,
//!   at the embedded scale factor. A page with several hits is rendered
//!   once per hit; the duplicate renders are the contract, not an
//!   accident — each result record stands alone as a download.
//! * **Fallback** — only when the scan found nothing: whole-page
//!   snapshots of the first `min(page_count, max_fallback_pages)` pages
//!   at the (higher) fallback scale factor.
//!
//! A render or encode failure on one page is logged and that page is
//! skipped; it never aborts the run.

use crate::config::ExtractionConfig;
use crate::document::SourceDocument;
use crate::error::PageError;
use crate::output::{ExtractedImage, ImageOrigin};
use crate::pipeline::encode::{self, PNG_FORMAT};
use crate::pipeline::scan::ImageHit;
use crate::progress::ProgressCallback;
use tracing::warn;

/// What a build pass produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Result records in emission order.
    pub images: Vec<ExtractedImage>,
    /// Renders or encodes that failed and were skipped.
    pub failed_renders: usize,
}

/// The 1-based page numbers the fallback path will render.
pub fn fallback_page_numbers(total_pages: usize, cap: usize) -> std::ops::RangeInclusive<usize> {
    1..=total_pages.min(cap)
}

/// Embedded path: one whole-page render per scan hit.
pub fn build_embedded_results<D: SourceDocument>(
    doc: &D,
    hits: &[ImageHit],
    config: &ExtractionConfig,
    progress: Option<&ProgressCallback>,
) -> BuildReport {
    let mut report = BuildReport::default();

    for hit in hits {
        match render_and_encode(doc, hit.page_number, config.embedded_scale) {
            Ok((image, width, height)) => {
                report.images.push(ExtractedImage {
                    sequence_id: hit.sequence_id,
                    label: format!("Embedded Image {}", hit.sequence_id),
                    page_number: hit.page_number,
                    image,
                    format: PNG_FORMAT.to_string(),
                    width,
                    height,
                    origin: ImageOrigin::Embedded,
                });
                if let Some(cb) = progress {
                    cb.on_image_rendered(hit.sequence_id, hit.page_number);
                }
            }
            Err(e) => {
                report.failed_renders += 1;
                warn!("Skipping embedded result {}: {e}", hit.sequence_id);
                if let Some(cb) = progress {
                    cb.on_page_error(hit.page_number, e.to_string());
                }
            }
        }
    }

    report
}

/// Fallback path: snapshot the first pages of a document with no
/// embedded images. `sequence_id` equals the page number here.
pub fn build_fallback_results<D: SourceDocument>(
    doc: &D,
    config: &ExtractionConfig,
    progress: Option<&ProgressCallback>,
) -> BuildReport {
    let mut report = BuildReport::default();

    for page_number in fallback_page_numbers(doc.page_count(), config.max_fallback_pages) {
        match render_and_encode(doc, page_number, config.fallback_scale) {
            Ok((image, width, height)) => {
                report.images.push(ExtractedImage {
                    sequence_id: page_number,
                    label: format!("Page {page_number}"),
                    page_number,
                    image,
                    format: PNG_FORMAT.to_string(),
                    width,
                    height,
                    origin: ImageOrigin::PageRender,
                });
                if let Some(cb) = progress {
                    cb.on_image_rendered(page_number, page_number);
                }
            }
            Err(e) => {
                report.failed_renders += 1;
                warn!("Skipping page snapshot: {e}");
                if let Some(cb) = progress {
                    cb.on_page_error(page_number, e.to_string());
                }
            }
        }
    }

    report
}

/// Render one whole page and PNG-encode the surface.
///
/// The surface is allocated here and dropped on return; nothing is
/// pooled or reused across pages.
fn render_and_encode<D: SourceDocument>(
    doc: &D,
    page_number: usize,
    scale: f32,
) -> Result<(crate::output::EncodedImage, u32, u32), PageError> {
    let rendered = doc.render_page(page_number, scale)?;
    let encoded = encode::encode_png(&rendered.image).map_err(|e| PageError::EncodeFailed {
        page: page_number,
        detail: e.to_string(),
    })?;
    Ok((encoded, rendered.width, rendered.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fake::FakeDocument;
    use crate::document::PageOperator::{PaintImage, Text};
    use crate::pipeline::scan::discover_images;

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn embedded_results_carry_hit_ids_and_labels() {
        let doc = FakeDocument::new().page(&[PaintImage, Text, PaintImage]);
        let report = discover_images(&doc, None);
        let built = build_embedded_results(&doc, &report.hits, &config(), None);

        assert_eq!(built.images.len(), 2);
        assert_eq!(built.failed_renders, 0);
        assert_eq!(built.images[0].label, "Embedded Image 1");
        assert_eq!(built.images[1].label, "Embedded Image 2");
        assert!(built
            .images
            .iter()
            .all(|i| i.origin == ImageOrigin::Embedded && i.page_number == 1));
    }

    #[test]
    fn embedded_render_dimensions_follow_embedded_scale() {
        // Fake pages are 200x300 at scale 1.0.
        let doc = FakeDocument::new().page(&[PaintImage]);
        let report = discover_images(&doc, None);
        let built = build_embedded_results(&doc, &report.hits, &config(), None);
        assert_eq!((built.images[0].width, built.images[0].height), (200, 300));
    }

    #[test]
    fn failed_render_is_skipped_but_ids_stay_increasing() {
        let doc = FakeDocument::new()
            .page(&[PaintImage])
            .page_render_fails(&[PaintImage])
            .page(&[PaintImage]);
        let report = discover_images(&doc, None);
        let built = build_embedded_results(&doc, &report.hits, &config(), None);

        assert_eq!(built.failed_renders, 1);
        let ids: Vec<usize> = built.images.iter().map(|i| i.sequence_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn fallback_caps_at_max_fallback_pages() {
        let doc = FakeDocument::new().text_pages(7);
        let built = build_fallback_results(&doc, &config(), None);

        assert_eq!(built.images.len(), 5);
        let pages: Vec<usize> = built.images.iter().map(|i| i.page_number).collect();
        assert_eq!(pages, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn fallback_sequence_id_equals_page_number() {
        let doc = FakeDocument::new().text_pages(3);
        let built = build_fallback_results(&doc, &config(), None);

        for img in &built.images {
            assert_eq!(img.sequence_id, img.page_number);
            assert_eq!(img.label, format!("Page {}", img.page_number));
            assert_eq!(img.origin, ImageOrigin::PageRender);
        }
    }

    #[test]
    fn fallback_uses_higher_scale_than_embedded() {
        // 200x300 base scaled by the 1.2 default fallback factor.
        let doc = FakeDocument::new().text_pages(1);
        let built = build_fallback_results(&doc, &config(), None);
        assert_eq!((built.images[0].width, built.images[0].height), (240, 360));
    }

    #[test]
    fn fallback_page_numbers_short_document() {
        assert_eq!(fallback_page_numbers(3, 5).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(
            fallback_page_numbers(7, 5).collect::<Vec<_>>(),
            [1, 2, 3, 4, 5]
        );
        assert!(fallback_page_numbers(0, 5).collect::<Vec<_>>().is_empty());
    }
}
