//! Lossy WebP encoding.

use rdp_capture::Bitmap;

use crate::encoder::EncodeError;

/// Encode a bitmap as WebP. `quality` is 0..=100 on the wire; the `webp`
/// crate takes a float in the same range.
pub fn encode_webp(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>, EncodeError> {
    if !bitmap.is_valid() {
        return Err(EncodeError::Webp("bitmap length does not match dimensions".into()));
    }
    let encoder = ::webp::Encoder::from_rgba(&bitmap.data, bitmap.width, bitmap.height);
    let memory = encoder.encode(f32::from(quality.clamp(0, 100)));
    Ok(memory.to_vec())
}
