//! The Screen Source (C3): acquires a full or sub-region bitmap from the
//! remote desktop.
//!
//! The actual acquisition primitive is out of scope for this core (see
//! spec §1) — callers inject a concrete [`ScreenSource`] obtained from
//! whatever platform capture mechanism is available; this crate only
//! defines the trait, the scaling transform, and a trivial reference
//! implementation used in tests and as a documented stand-in.

use crate::bitmap::{Bitmap, Rect};

/// Acquires bitmaps from the remote desktop's primary drawing surface.
pub trait ScreenSource: Send + Sync {
    /// Size of the desktop this source captures, in pixels.
    fn desktop_size(&self) -> (u32, u32);

    /// Capture the full desktop, honoring `scale_display`/`client_w/h` if
    /// set (see [`capture_full`]).
    fn capture_full(&self) -> Bitmap;

    /// Capture a sub-region. Returns `None` if the underlying surface is
    /// momentarily unavailable.
    fn capture_region_raw(&self, rect: Rect) -> Option<Bitmap>;
}

/// Capture the full screen, scaling to the client window if requested.
///
/// Mirrors spec §4.3/§4.9 `send_screen`: produces `(desktop_w, desktop_h)`
/// or, under scaling, `(client_w, client_h)` using an area-averaging
/// downsample.
#[must_use]
pub fn capture_full(source: &dyn ScreenSource, scale_display: bool, client_w: u32, client_h: u32) -> Bitmap {
    let bitmap = source.capture_full();
    if scale_display && (client_w, client_h) != (bitmap.width, bitmap.height) && client_w > 0 && client_h > 0 {
        bitmap.resize(client_w, client_h)
    } else {
        bitmap
    }
}

/// Capture a region, rejecting out-of-bounds or inverted rectangles and
/// remapping both the pixels and the reported rect to client coordinates
/// under scaling.
///
/// Returns `None` (no bitmap, no error surface) for rejected rectangles or
/// a momentarily unavailable surface, per spec §4.3/§8.
#[must_use]
pub fn capture_region(
    source: &dyn ScreenSource,
    rect: Rect,
    scale_display: bool,
    client_w: u32,
    client_h: u32,
) -> Option<(Bitmap, Rect)> {
    let (desktop_w, desktop_h) = source.desktop_size();
    if !rect.is_within_desktop(desktop_w, desktop_h) {
        return None;
    }
    let bitmap = source.capture_region_raw(rect)?;
    if scale_display && client_w > 0 && client_h > 0 {
        let scaled_rect = rect.scale_to_client(desktop_w, desktop_h, client_w, client_h);
        let scaled_bitmap = bitmap.resize(scaled_rect.width().max(1), scaled_rect.height().max(1));
        Some((scaled_bitmap, scaled_rect))
    } else {
        Some((bitmap, rect))
    }
}

/// A fixed-size, fixed-color screen source used for tests and as a
/// documented placeholder until a real acquisition primitive is wired in.
pub struct StaticScreenSource {
    width: u32,
    height: u32,
    color: [u8; 4],
}

impl StaticScreenSource {
    #[must_use]
    pub fn new(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            width,
            height,
            color,
        }
    }
}

impl ScreenSource for StaticScreenSource {
    fn desktop_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture_full(&self) -> Bitmap {
        Bitmap::solid(self.width, self.height, self.color)
    }

    fn capture_region_raw(&self, rect: Rect) -> Option<Bitmap> {
        Some(Bitmap::solid(rect.width(), rect.height(), self.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_out_of_bounds_is_rejected() {
        let src = StaticScreenSource::new(1024, 768, [0, 0, 0, 0]);
        let rect = Rect::new(1000, 700, 1100, 800);
        assert!(capture_region(&src, rect, false, 1024, 768).is_none());
    }

    #[test]
    fn region_inverted_is_rejected() {
        let src = StaticScreenSource::new(1024, 768, [0, 0, 0, 0]);
        // left > right: genuinely inverted, not just zero-size.
        let rect = Rect::new(100, 100, 10, 10);
        assert!(capture_region(&src, rect, false, 1024, 768).is_none());
    }

    #[test]
    fn scaled_region_maps_rect_and_pixels() {
        let src = StaticScreenSource::new(1600, 1200, [0, 0, 0, 0]);
        let rect = Rect::new(400, 300, 800, 600);
        let (bitmap, scaled_rect) = capture_region(&src, rect, true, 800, 600).unwrap();
        assert_eq!(scaled_rect, Rect::new(200, 150, 400, 300));
        assert_eq!(bitmap.width, 200);
        assert_eq!(bitmap.height, 150);
    }

    #[test]
    fn full_screen_scales_when_requested() {
        let src = StaticScreenSource::new(1920, 1080, [1, 1, 1, 1]);
        let bitmap = capture_full(&src, true, 960, 540);
        assert_eq!((bitmap.width, bitmap.height), (960, 540));
    }
}
