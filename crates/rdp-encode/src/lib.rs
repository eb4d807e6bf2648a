// Frame codec for rdp-session-bridge.
//
// Provides the Frame Codec (C1): encode a captured bitmap to PNG / JPEG /
// WebP, or let AUTO pick whichever of PNG/JPEG is smaller.
//
// - format.rs: ImageFormat (wire tag) and Encoding (policy selector)
// - png.rs / jpeg.rs / webp.rs: per-format encoders
// - encoder.rs: encode() dispatch, quality-forcing rule for PNG

pub mod encoder;
pub mod format;
pub mod jpeg;
pub mod png;
pub mod webp;

pub use encoder::{encode, EncodeError};
pub use format::{Encoding, ImageFormat, HIGH, HIGHER, HIGHEST, LOW, MEDIUM};
