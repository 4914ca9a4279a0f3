//! Error types for the pdfsieve library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the extraction run cannot proceed at
//!   all (wrong file type, corrupt document, missing password). Returned
//!   as `Err(ExtractError)` from the top-level `extract*` functions and
//!   the run aborts with no results.
//!
//! * [`PageError`] — **Non-fatal**: a single page failed (operator scan
//!   glitch, render failure) but all other pages are fine. Logged at WARN
//!   and counted in [`crate::output::ExtractionStats`]; the run continues
//!   with the next page.
//!
//! The separation keeps the propagation policy of the pipeline explicit:
//! only document-load failures abort the whole run, every per-page
//! failure is isolated.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfsieve library.
///
/// Page-level failures use [`PageError`] and are logged rather than
/// propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The declared MIME type does not indicate a PDF.
    ///
    /// Checked before any parsing begins; this is the user-facing
    /// "please select a PDF file" condition.
    #[error("Not a PDF file (declared type: '{mime}')\nSelect a file with MIME type application/pdf.")]
    UnsupportedFileType { mime: String },

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Document-load errors ──────────────────────────────────────────────
    /// The byte buffer is not a well-formed PDF.
    #[error("The file is not a valid PDF document: {detail}")]
    InvalidFormat { detail: String },

    /// The document is encrypted and no password was provided.
    #[error("This PDF is password protected.\nProvide the password with --password <PASSWORD>.")]
    PasswordProtected,

    /// A password was provided but it is wrong.
    #[error("Wrong password for this PDF")]
    WrongPassword,

    /// The library failed to parse the document for some other reason.
    #[error("Failed to parse the PDF: {detail}")]
    ParseFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Session errors ────────────────────────────────────────────────────
    /// A session event was fired from a state that does not accept it.
    #[error("Cannot {event} while the session is {state}")]
    InvalidTransition {
        event: &'static str,
        state: &'static str,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the executable, or install it system-wide.\n\
An existing copy can be selected with PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Logged by the pipeline when a page fails; the run continues with the
/// remaining pages.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The page's drawing-operator list could not be retrieved.
    #[error("Page {page}: operator scan failed: {detail}")]
    OperatorScan { page: usize, detail: String },

    /// Page rasterisation failed.
    #[error("Page {page}: rasterisation failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// The rendered surface could not be PNG-encoded.
    #[error("Page {page}: PNG encoding failed: {detail}")]
    EncodeFailed { page: usize, detail: String },
}

impl PageError {
    /// 1-based number of the page that failed.
    pub fn page_number(&self) -> usize {
        match self {
            PageError::OperatorScan { page, .. }
            | PageError::RenderFailed { page, .. }
            | PageError::EncodeFailed { page, .. } => *page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_file_type_display() {
        let e = ExtractError::UnsupportedFileType {
            mime: "image/png".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("image/png"), "got: {msg}");
        assert!(msg.contains("application/pdf"));
    }

    #[test]
    fn password_protected_display_mentions_flag() {
        let e = ExtractError::PasswordProtected;
        assert!(e.to_string().contains("--password"));
    }

    #[test]
    fn invalid_transition_display() {
        let e = ExtractError::InvalidTransition {
            event: "start extraction",
            state: "idle",
        };
        assert_eq!(
            e.to_string(),
            "Cannot start extraction while the session is idle"
        );
    }

    #[test]
    fn page_error_reports_page_number() {
        let e = PageError::RenderFailed {
            page: 4,
            detail: "no raster context".into(),
        };
        assert_eq!(e.page_number(), 4);
        assert!(e.to_string().contains("Page 4"));
    }

    #[test]
    fn page_error_serialises() {
        let e = PageError::OperatorScan {
            page: 2,
            detail: "bad content stream".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        let back: PageError = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back.page_number(), 2);
    }
}
