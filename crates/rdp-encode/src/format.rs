//! Wire image format tags and the policy-level encoding selector.

/// Quality presets from spec §3. Stored as plain `u8` so they round-trip
/// directly through the wire frame's `quality` field.
pub const LOW: u8 = 10;
pub const MEDIUM: u8 = 25;
pub const HIGH: u8 = 50;
pub const HIGHER: u8 = 75;
pub const HIGHEST: u8 = 100;

/// Wire format tag, matches the `format` field of an image frame
/// (spec §3/§4.4): `CUR=0, PNG=1, JPEG=2, WEBP=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Cur = 0,
    Png = 1,
    Jpeg = 2,
    Webp = 3,
}

impl ImageFormat {
    #[must_use]
    pub fn wire_tag(self) -> u32 {
        self as u32
    }
}

/// The encoding policy an [`crate::encode`] call is asked to honor.
/// `Auto` is not itself a wire tag — it resolves to `Png` or `Jpeg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Auto,
    Png,
    Jpeg,
    Webp,
}
