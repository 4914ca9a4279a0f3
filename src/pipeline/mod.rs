//! Pipeline stages for PDF image extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! the rendering backend without touching the decision logic.
//!
//! ## Data Flow
//!
//! ```text
//! load ──▶ scan ──▶ render ──▶ encode
//! (pdfium)  (operator walk)  (whole-page raster)  (PNG + base64)
//! ```
//!
//! 1. [`load`]   — bind pdfium, parse the byte buffer into a document
//!    handle, classify load failures
//! 2. [`scan`]   — walk each page's drawing operators and record every
//!    image-paint hit in document order
//! 3. [`render`] — rasterise whole pages (per hit, or the page-snapshot
//!    fallback) and build the result records
//! 4. [`encode`] — PNG-encode and base64-wrap each rendered surface
pub mod encode;
pub mod load;
pub mod render;
pub mod scan;
