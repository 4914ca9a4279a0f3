//! Document loading: byte buffer → parsed pdfium document handle.
//!
//! ## Why validate before pdfium sees the bytes?
//!
//! pdfium reports every load failure through the same opaque error type,
//! so a buffer that was never a PDF in the first place would surface as a
//! generic parse error. Checking the declared MIME type and the `%PDF`
//! magic bytes up front gives callers a meaningful validation message
//! before any parsing starts.
//!
//! ## Error classification
//!
//! pdfium does not expose a structured error taxonomy for load failures;
//! like every consumer of the binding we classify by inspecting the debug
//! representation. [`classify_load_error`] is pure so the mapping is unit
//! tested without a pdfium library present.

use crate::document::{PageOperator, RenderedPage, SourceDocument};
use crate::error::{ExtractError, PageError};
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use tracing::debug;

/// True when the declared MIME type indicates a PDF.
///
/// Accepts `application/pdf` and the legacy `application/x-pdf`,
/// case-insensitively, ignoring parameters (`; charset=...`).
pub fn is_pdf_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or("").trim();
    essence.eq_ignore_ascii_case("application/pdf")
        || essence.eq_ignore_ascii_case("application/x-pdf")
}

/// True when the buffer starts with the `%PDF` magic bytes.
pub fn has_pdf_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

/// Bind to a pdfium shared library.
///
/// Resolution order: `PDFIUM_LIB_PATH`, a copy next to the executable,
/// then the system library. Binding failure is fatal for the whole run.
pub fn bind_pdfium() -> Result<Pdfium, ExtractError> {
    if let Ok(path) = std::env::var("PDFIUM_LIB_PATH") {
        if !path.is_empty() {
            return Pdfium::bind_to_library(&path)
                .map(Pdfium::new)
                .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{e:?} (at {path})")));
        }
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{e:?}")))
}

/// Parse a byte buffer into a document handle.
///
/// Fails with [`ExtractError::InvalidFormat`] when the buffer is not a
/// well-formed PDF, [`ExtractError::PasswordProtected`] /
/// [`ExtractError::WrongPassword`] for encrypted documents, and
/// [`ExtractError::ParseFailed`] for anything else pdfium reports.
pub fn load_document<'a>(
    pdfium: &'a Pdfium,
    bytes: &'a [u8],
    password: Option<&str>,
) -> Result<PdfDocument<'a>, ExtractError> {
    if !has_pdf_magic(bytes) {
        return Err(ExtractError::InvalidFormat {
            detail: "missing %PDF header".to_string(),
        });
    }

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| classify_load_error(&format!("{e:?}"), password.is_some()))?;

    debug!("PDF loaded: {} pages", document.pages().len());
    Ok(document)
}

/// Map a pdfium load-failure debug string onto the fatal error taxonomy.
pub(crate) fn classify_load_error(detail: &str, had_password: bool) -> ExtractError {
    if detail.contains("Password") || detail.contains("password") {
        if had_password {
            ExtractError::WrongPassword
        } else {
            ExtractError::PasswordProtected
        }
    } else if detail.contains("Format") || detail.contains("format") {
        ExtractError::InvalidFormat {
            detail: detail.to_string(),
        }
    } else {
        ExtractError::ParseFailed {
            detail: detail.to_string(),
        }
    }
}

/// Read document metadata from a parsed handle.
pub fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

/// [`SourceDocument`] adapter over a loaded pdfium document.
///
/// Page objects stand in for the drawing-operator stream: pdfium reports
/// them in content order, and an image object corresponds to an
/// image-paint operator in the page's content stream.
pub struct PdfiumSource<'a, 'b> {
    document: &'a PdfDocument<'b>,
    max_pixels: u32,
}

impl<'a, 'b> PdfiumSource<'a, 'b> {
    pub fn new(document: &'a PdfDocument<'b>, max_pixels: u32) -> Self {
        Self {
            document,
            max_pixels,
        }
    }
}

impl SourceDocument for PdfiumSource<'_, '_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_operators(&self, page_number: usize) -> Result<Vec<PageOperator>, PageError> {
        let pages = self.document.pages();
        let page = pages
            .get((page_number - 1) as u16)
            .map_err(|e| PageError::OperatorScan {
                page: page_number,
                detail: format!("{e:?}"),
            })?;

        let operators = page
            .objects()
            .iter()
            .map(|object| match object.object_type() {
                PdfPageObjectType::Image => PageOperator::PaintImage,
                PdfPageObjectType::Text => PageOperator::Text,
                PdfPageObjectType::Path => PageOperator::Path,
                _ => PageOperator::Other,
            })
            .collect();

        Ok(operators)
    }

    fn render_page(&self, page_number: usize, scale: f32) -> Result<RenderedPage, PageError> {
        let pages = self.document.pages();
        let page = pages
            .get((page_number - 1) as u16)
            .map_err(|e| PageError::RenderFailed {
                page: page_number,
                detail: format!("{e:?}"),
            })?;

        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(scale)
            .set_maximum_width(self.max_pixels as i32)
            .set_maximum_height(self.max_pixels as i32);

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| PageError::RenderFailed {
                    page: page_number,
                    detail: format!("{e:?}"),
                })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} @ {:.2}x → {}x{} px",
            page_number,
            scale,
            image.width(),
            image.height()
        );

        Ok(RenderedPage {
            width: image.width(),
            height: image.height(),
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_mime_accepts_parameters_and_case() {
        assert!(is_pdf_mime("application/pdf"));
        assert!(is_pdf_mime("Application/PDF"));
        assert!(is_pdf_mime("application/pdf; charset=binary"));
        assert!(is_pdf_mime("application/x-pdf"));
    }

    #[test]
    fn pdf_mime_rejects_other_types() {
        assert!(!is_pdf_mime("image/png"));
        assert!(!is_pdf_mime("text/plain"));
        assert!(!is_pdf_mime(""));
        assert!(!is_pdf_mime("pdf"));
    }

    #[test]
    fn magic_check() {
        assert!(has_pdf_magic(b"%PDF-1.7\n..."));
        assert!(!has_pdf_magic(b"PK\x03\x04zipfile"));
        assert!(!has_pdf_magic(b"%PD"));
        assert!(!has_pdf_magic(b""));
    }

    #[test]
    fn classify_password_without_password_supplied() {
        let err = classify_load_error("PdfiumLibraryInternalError(PasswordError)", false);
        assert!(matches!(err, ExtractError::PasswordProtected));
    }

    #[test]
    fn classify_password_with_password_supplied() {
        let err = classify_load_error("PdfiumLibraryInternalError(PasswordError)", true);
        assert!(matches!(err, ExtractError::WrongPassword));
    }

    #[test]
    fn classify_format_error() {
        let err = classify_load_error("PdfiumLibraryInternalError(FormatError)", false);
        assert!(matches!(err, ExtractError::InvalidFormat { .. }));
    }

    #[test]
    fn classify_unknown_error_keeps_message() {
        let err = classify_load_error("something exploded", false);
        match err {
            ExtractError::ParseFailed { detail } => assert_eq!(detail, "something exploded"),
            other => panic!("expected ParseFailed, got {other:?}"),
        }
    }
}
