//! Lossless PNG encoding.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use rdp_capture::Bitmap;

use crate::encoder::EncodeError;

/// Encode a bitmap as PNG. Lossless; the caller is responsible for
/// reporting quality as [`crate::format::HIGHEST`] regardless of the
/// requested value (spec §3 invariant).
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&bitmap.data, bitmap.width, bitmap.height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::Png(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_solid_bitmap() {
        let bitmap = Bitmap::solid(4, 4, [10, 20, 30, 255]);
        let bytes = encode_png(&bitmap).unwrap();
        assert!(!bytes.is_empty());
        // PNG magic bytes.
        assert_eq!(&bytes[0..4], &[0x89, b'P', b'N', b'G']);
    }
}
