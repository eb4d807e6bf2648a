//! `ImagePolicy` (spec §3): the mutable knobs `ECD`/`QLT`/`QNT`/`SCA`
//! commands update and the capture pipeline reads on every frame.
//!
//! Scalar fields use `AtomicU32`/`AtomicBool` since they're touched from
//! both the input reader and capture callbacks (spec §5, §9 "globally
//! mutable session state" redesign note).

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use rdp_encode::{Encoding, HIGH};

/// `ImagePolicy.encoding` as a packed atomic. `Encoding` has no data, so a
/// `u8` discriminant round-trips losslessly.
fn encoding_to_u8(encoding: Encoding) -> u8 {
    match encoding {
        Encoding::Auto => 0,
        Encoding::Png => 1,
        Encoding::Jpeg => 2,
        Encoding::Webp => 3,
    }
}

fn encoding_from_u8(value: u8) -> Encoding {
    match value {
        1 => Encoding::Png,
        2 => Encoding::Jpeg,
        3 => Encoding::Webp,
        _ => Encoding::Auto,
    }
}

/// Image quantity, as sent over the wire by `QNT` (spec §3): `100` emits
/// every region update, `q<100` emits one update per `100/q`.
pub struct ImagePolicy {
    encoding: AtomicU8,
    quality: AtomicU8,
    quantity: AtomicU32,
    scale_display: AtomicBool,
    client_w: AtomicU32,
    client_h: AtomicU32,
}

impl Default for ImagePolicy {
    /// AUTO encoding, HIGH quality, quantity 100 (emit all), scaling off
    /// (spec §3 defaults; AUTO-vs-JPEG default resolved to AUTO per
    /// DESIGN.md).
    fn default() -> Self {
        Self {
            encoding: AtomicU8::new(encoding_to_u8(Encoding::Auto)),
            quality: AtomicU8::new(HIGH),
            quantity: AtomicU32::new(100),
            scale_display: AtomicBool::new(false),
            client_w: AtomicU32::new(0),
            client_h: AtomicU32::new(0),
        }
    }
}

impl ImagePolicy {
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        encoding_from_u8(self.encoding.load(Ordering::Relaxed))
    }

    /// `ECD` (spec §4.6): set encoding and reset quality to HIGH.
    pub fn set_encoding(&self, encoding_tag: u32) {
        let encoding = match encoding_tag {
            1 => Encoding::Png,
            2 => Encoding::Jpeg,
            3 => Encoding::Webp,
            _ => Encoding::Auto,
        };
        self.encoding.store(encoding_to_u8(encoding), Ordering::Relaxed);
        self.quality.store(HIGH, Ordering::Relaxed);
    }

    #[must_use]
    pub fn quality(&self) -> u8 {
        self.quality.load(Ordering::Relaxed)
    }

    /// `QLT` (spec §4.6).
    pub fn set_quality(&self, quality: u32) {
        #[allow(clippy::cast_possible_truncation)]
        self.quality.store(quality.min(100) as u8, Ordering::Relaxed);
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity.load(Ordering::Relaxed)
    }

    /// `QNT` (spec §4.6).
    pub fn set_quantity(&self, quantity: u32) {
        self.quantity.store(quantity, Ordering::Relaxed);
    }

    #[must_use]
    pub fn scale_display(&self) -> bool {
        self.scale_display.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn client_dims(&self) -> (u32, u32) {
        (self.client_w.load(Ordering::Relaxed), self.client_h.load(Ordering::Relaxed))
    }

    /// `RSZ` (spec §4.6): update client dimensions only.
    pub fn set_client_dims(&self, width: u32, height: u32) {
        self.client_w.store(width, Ordering::Relaxed);
        self.client_h.store(height, Ordering::Relaxed);
    }

    /// `SCA` (spec §4.6): `0` disables scaling; otherwise enables it and
    /// updates client dims together (spec §3 invariant: scale flag and
    /// client dims mutate together).
    pub fn set_scale(&self, enabled: Option<(u32, u32)>) {
        match enabled {
            None => self.scale_display.store(false, Ordering::Relaxed),
            Some((width, height)) => {
                self.set_client_dims(width, height);
                self.scale_display.store(true, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_encoding_resets_quality_to_high() {
        let policy = ImagePolicy::default();
        policy.set_quality(10);
        policy.set_encoding(1);
        assert_eq!(policy.encoding(), Encoding::Png);
        assert_eq!(policy.quality(), HIGH);
    }

    #[test]
    fn scale_enable_sets_dims_together() {
        let policy = ImagePolicy::default();
        policy.set_scale(Some((800, 600)));
        assert!(policy.scale_display());
        assert_eq!(policy.client_dims(), (800, 600));

        policy.set_scale(None);
        assert!(!policy.scale_display());
    }
}
