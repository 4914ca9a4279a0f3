//! The collaborator seam for the external PDF library.
//!
//! All PDF parsing, operator decoding, and rasterisation is delegated to
//! the library behind the [`SourceDocument`] trait. The pipeline stages
//! ([`crate::pipeline::scan`], [`crate::pipeline::render`]) only ever see
//! this trait, which keeps the page-scan/extraction-decision workflow
//! testable against an in-memory document and lets the rendering backend
//! change without touching the stages.
//!
//! The production implementation is [`crate::pipeline::load::PdfiumSource`].

use crate::error::PageError;
use image::DynamicImage;

/// A drawing operator on a page, reduced to the categories the scanner
/// cares about. The source library reports its full operator/object
/// taxonomy; everything that is not interesting maps to [`Other`].
///
/// [`Other`]: PageOperator::Other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOperator {
    /// Paints an embedded raster image. The tag the scanner looks for.
    PaintImage,
    /// Draws text.
    Text,
    /// Draws a vector path.
    Path,
    /// Anything else (shading, form fragments, annotations, …).
    Other,
}

/// A rendered page surface: pixel dimensions plus the raster itself.
///
/// One surface is allocated per rendered page and dropped as soon as it
/// has been encoded; there is no reuse or pooling.
pub struct RenderedPage {
    pub width: u32,
    pub height: u32,
    pub image: DynamicImage,
}

/// A parsed document handle, as required from the PDF library.
///
/// Page numbers are 1-based throughout, matching how pages are reported
/// to the user. Both per-page operations return [`PageError`] — the
/// caller logs and skips the page rather than aborting the run.
pub trait SourceDocument {
    /// Total number of pages in the document.
    fn page_count(&self) -> usize;

    /// The ordered drawing-operator list for page `page_number`.
    fn page_operators(&self, page_number: usize) -> Result<Vec<PageOperator>, PageError>;

    /// Render the whole page at the given scale factor.
    fn render_page(&self, page_number: usize, scale: f32) -> Result<RenderedPage, PageError>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! An in-memory [`SourceDocument`] for exercising the pipeline
    //! without pdfium.

    use super::*;
    use image::{Rgba, RgbaImage};

    const BASE_WIDTH: u32 = 200;
    const BASE_HEIGHT: u32 = 300;

    enum FakePage {
        Ok {
            operators: Vec<PageOperator>,
            render_fails: bool,
        },
        ScanFails(String),
    }

    /// Builder-style fake document. Pages are appended in order; page
    /// numbers follow insertion order starting at 1.
    pub struct FakeDocument {
        pages: Vec<FakePage>,
    }

    impl FakeDocument {
        pub fn new() -> Self {
            Self { pages: Vec::new() }
        }

        /// A page with the given operator list that renders fine.
        pub fn page(mut self, operators: &[PageOperator]) -> Self {
            self.pages.push(FakePage::Ok {
                operators: operators.to_vec(),
                render_fails: false,
            });
            self
        }

        /// A page whose operator-list retrieval fails.
        pub fn page_scan_fails(mut self, detail: &str) -> Self {
            self.pages.push(FakePage::ScanFails(detail.to_string()));
            self
        }

        /// A page that scans fine but whose render always fails.
        pub fn page_render_fails(mut self, operators: &[PageOperator]) -> Self {
            self.pages.push(FakePage::Ok {
                operators: operators.to_vec(),
                render_fails: true,
            });
            self
        }

        /// Convenience: `n` pages containing only text operators.
        pub fn text_pages(mut self, n: usize) -> Self {
            for _ in 0..n {
                self = self.page(&[PageOperator::Text, PageOperator::Path]);
            }
            self
        }
    }

    impl SourceDocument for FakeDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_operators(&self, page_number: usize) -> Result<Vec<PageOperator>, PageError> {
            match &self.pages[page_number - 1] {
                FakePage::Ok { operators, .. } => Ok(operators.clone()),
                FakePage::ScanFails(detail) => Err(PageError::OperatorScan {
                    page: page_number,
                    detail: detail.clone(),
                }),
            }
        }

        fn render_page(&self, page_number: usize, scale: f32) -> Result<RenderedPage, PageError> {
            match &self.pages[page_number - 1] {
                FakePage::Ok {
                    render_fails: true, ..
                } => Err(PageError::RenderFailed {
                    page: page_number,
                    detail: "raster context unavailable".to_string(),
                }),
                FakePage::Ok { .. } => {
                    let width = (BASE_WIDTH as f32 * scale).round() as u32;
                    let height = (BASE_HEIGHT as f32 * scale).round() as u32;
                    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                        width,
                        height,
                        Rgba([255, 255, 255, 255]),
                    ));
                    Ok(RenderedPage {
                        width,
                        height,
                        image,
                    })
                }
                FakePage::ScanFails(_) => Err(PageError::RenderFailed {
                    page: page_number,
                    detail: "page unavailable".to_string(),
                }),
            }
        }
    }
}
