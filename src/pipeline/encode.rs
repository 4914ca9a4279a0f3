//! Image encoding: `DynamicImage` → base64 PNG wrapped in [`EncodedImage`].
//!
//! PNG is the fixed encoder choice: results are meant to be downloaded
//! or pasted as data-URIs, and lossless encoding keeps rendered text and
//! line art crisp regardless of what the source page contained. The
//! format tag on the result record is therefore always `PNG`, never
//! derived from the source image.

use crate::output::EncodedImage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// MIME type of every payload this module produces.
pub const PNG_MIME: &str = "image/png";

/// Format identifier stamped on every result record.
pub const PNG_FORMAT: &str = "PNG";

/// Encode a rendered page surface as a base64 PNG payload.
pub fn encode_png(img: &DynamicImage) -> Result<EncodedImage, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded surface → {} bytes base64", b64.len());

    Ok(EncodedImage::new(b64, PNG_MIME))
}
