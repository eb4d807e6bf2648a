//! Lossy JPEG encoding.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use rdp_capture::Bitmap;

use crate::encoder::EncodeError;

/// Encode a bitmap as JPEG at the given quality (1..=100).
///
/// JPEG has no alpha channel; the bitmap's alpha is dropped (captured
/// desktop regions are always opaque in practice).
pub fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let quality = quality.clamp(1, 100);
    let rgb = rgba_to_rgb(&bitmap.data);

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, bitmap.width, bitmap.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::Jpeg(e.to_string()))?;
    Ok(out)
}

fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[0..3]);
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_solid_bitmap() {
        let bitmap = Bitmap::solid(8, 8, [200, 50, 50, 255]);
        let bytes = encode_jpeg(&bitmap, 75).unwrap();
        assert!(!bytes.is_empty());
        // JPEG SOI marker.
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn clamps_out_of_range_quality() {
        let bitmap = Bitmap::solid(4, 4, [0, 0, 0, 255]);
        assert!(encode_jpeg(&bitmap, 0).is_ok());
        assert!(encode_jpeg(&bitmap, 255).is_ok());
    }
}
