//! Output types: extracted images, run statistics, and document metadata.
//!
//! Everything here is plain data with serde derives so the CLI `--json`
//! mode (and any host application) can serialise a whole run verbatim.
//! The result list lives only in memory for the duration of a session;
//! nothing is persisted between runs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Where an extracted image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageOrigin {
    /// An image-paint operator was found on the page; the result is a
    /// whole-page render of that page.
    Embedded,
    /// Fallback whole-page snapshot taken because the scan found no
    /// embedded images anywhere in the document.
    PageRender,
}

/// A self-contained encoded raster payload: base64 data plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Base64-encoded image bytes (standard alphabet, padded).
    pub data: String,
    /// MIME type of the encoded bytes, e.g. `image/png`.
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// The copyable textual representation: a `data:` URI embedding the
    /// whole payload.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload back to raw image bytes (e.g. to write a file).
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}

/// One extracted image — the single domain entity of an extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedImage {
    /// Unique within one run, assigned in discovery order, starts at 1.
    /// Strictly increasing in emission order.
    pub sequence_id: usize,
    /// Human-readable name derived from the sequence number and origin,
    /// e.g. `Embedded Image 3` or `Page 2`.
    pub label: String,
    /// 1-based page number in the source document.
    pub page_number: usize,
    /// The encoded raster payload.
    pub image: EncodedImage,
    /// Encoding identifier. Currently always `PNG`; the encoder choice is
    /// fixed, not derived from the source image.
    pub format: String,
    /// Pixel width of the rendered surface.
    pub width: u32,
    /// Pixel height of the rendered surface.
    pub height: u32,
    /// Whether this came from an embedded-image hit or a page fallback.
    pub origin: ImageOrigin,
}

impl ExtractedImage {
    /// Filename to use when saving this image: `<label>.<format lowercased>`.
    pub fn download_filename(&self) -> String {
        format!("{}.{}", self.label, self.format.to_lowercase())
    }
}

/// Statistics for a single extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total pages in the source document.
    pub total_pages: usize,
    /// Pages whose operator list was scanned successfully.
    pub pages_scanned: usize,
    /// Pages skipped because their operator list could not be retrieved.
    pub pages_skipped: usize,
    /// Image-paint operators found across all pages.
    pub operators_found: usize,
    /// Results actually emitted (renders that succeeded).
    pub images_emitted: usize,
    /// Pages whose render or encode failed and were skipped.
    pub failed_renders: usize,
    /// Wall-clock time spent scanning operator lists.
    pub scan_duration_ms: u64,
    /// Wall-clock time spent rendering and encoding.
    pub render_duration_ms: u64,
    /// Total wall-clock time for the run.
    pub total_duration_ms: u64,
}

/// The complete result of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Extracted images in emission order. Either all [`ImageOrigin::Embedded`]
    /// or all [`ImageOrigin::PageRender`], never mixed.
    pub images: Vec<ExtractedImage>,
    /// Document metadata read from the parsed handle.
    pub metadata: DocumentMetadata,
    /// Run statistics.
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// True when both the embedded scan and the page fallback produced
    /// nothing renderable.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The informational empty-state message, or `None` when there are
    /// results. An empty run is a user-visible outcome, not an error.
    pub fn notice(&self) -> Option<&'static str> {
        if self.is_empty() {
            Some("No extractable content was found in this PDF.")
        } else {
            None
        }
    }
}

/// Document metadata extracted from a parsed PDF handle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    /// Total page count.
    pub page_count: usize,
    /// PDF version string as reported by the library.
    pub pdf_version: String,
}
