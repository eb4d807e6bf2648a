//! Encoder dispatch: the single place quality-forcing and AUTO
//! format-selection rules live, behind a tagged variant and a single
//! `encode()` dispatch function.

use rdp_capture::Bitmap;

use crate::format::{Encoding, ImageFormat, HIGHEST};
use crate::{jpeg, png, webp};

/// Non-terminal encode failure (spec §7: `Encode(format)`). The caller
/// drops the affected frame and logs at WARN; the session is never torn
/// down because of this.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("png encode failed: {0}")]
    Png(String),
    #[error("jpeg encode failed: {0}")]
    Jpeg(String),
    #[error("webp encode failed: {0}")]
    Webp(String),
    #[error("no encoder produced output")]
    AllFailed,
}

/// Encode `bitmap` per `encoding`, returning the wire format actually used,
/// the encoded bytes, and the quality to report on the wire.
///
/// Invariant (spec §3): whenever the resulting format is PNG (lossless),
/// the reported quality is forced to [`HIGHEST`] regardless of what was
/// requested.
pub fn encode(encoding: Encoding, bitmap: &Bitmap, quality: u8) -> Result<(ImageFormat, Vec<u8>, u8), EncodeError> {
    match encoding {
        Encoding::Png => {
            let bytes = png::encode_png(bitmap)?;
            Ok((ImageFormat::Png, bytes, HIGHEST))
        }
        Encoding::Jpeg => {
            let bytes = jpeg::encode_jpeg(bitmap, quality)?;
            Ok((ImageFormat::Jpeg, bytes, quality))
        }
        Encoding::Webp => {
            let bytes = webp::encode_webp(bitmap, quality)?;
            Ok((ImageFormat::Webp, bytes, quality))
        }
        Encoding::Auto => encode_auto(bitmap, quality),
    }
}

/// AUTO: encode both PNG and JPEG, keep whichever payload is smaller.
/// Text/UI regions compress better in PNG, photographic regions in JPEG;
/// per-region selection beats a fixed format (spec §4.1).
fn encode_auto(bitmap: &Bitmap, quality: u8) -> Result<(ImageFormat, Vec<u8>, u8), EncodeError> {
    let png_result = png::encode_png(bitmap)
        .inspect_err(|e| tracing::warn!(error = %e, "AUTO: png candidate failed"))
        .ok();
    let jpeg_result = jpeg::encode_jpeg(bitmap, quality)
        .inspect_err(|e| tracing::warn!(error = %e, "AUTO: jpeg candidate failed"))
        .ok();

    match (png_result, jpeg_result) {
        (Some(png_bytes), Some(jpeg_bytes)) => {
            if png_bytes.len() <= jpeg_bytes.len() {
                Ok((ImageFormat::Png, png_bytes, HIGHEST))
            } else {
                Ok((ImageFormat::Jpeg, jpeg_bytes, quality))
            }
        }
        (Some(png_bytes), None) => Ok((ImageFormat::Png, png_bytes, HIGHEST)),
        (None, Some(jpeg_bytes)) => Ok((ImageFormat::Jpeg, jpeg_bytes, quality)),
        (None, None) => Err(EncodeError::AllFailed),
    }
}
