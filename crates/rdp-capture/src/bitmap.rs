//! Bitmap and rectangle types shared by the screen source and cursor
//! compositor.

/// A rectangular region in desktop (or, after scaling, client) pixel space,
/// given as its four corners (left, top, right, bottom) rather than an
/// origin plus extent — this is the only representation that can express
/// an inverted rect (`left > right`), which `is_within_desktop` must be
/// able to reject (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    #[must_use]
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left).max(0) as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0) as u32
    }

    /// Whether this rect is fully contained within `(0, 0, desktop_w,
    /// desktop_h)` and has non-inverted, non-zero dimensions.
    #[must_use]
    pub fn is_within_desktop(&self, desktop_w: u32, desktop_h: u32) -> bool {
        if self.right <= self.left || self.bottom <= self.top {
            return false;
        }
        self.left >= 0 && self.top >= 0 && self.right <= desktop_w as i64 as i32 && self.bottom <= desktop_h as i64 as i32
    }

    /// Map this rect from desktop coordinates into client coordinates by
    /// scaling all four corners with the symmetric transform
    /// `x' = x * client_w / desktop_w`.
    #[must_use]
    pub fn scale_to_client(&self, desktop_w: u32, desktop_h: u32, client_w: u32, client_h: u32) -> Self {
        Self {
            left: scale_coord(self.left, desktop_w, client_w),
            top: scale_coord(self.top, desktop_h, client_h),
            right: scale_coord(self.right, desktop_w, client_w),
            bottom: scale_coord(self.bottom, desktop_h, client_h),
        }
    }
}

/// Scale a single coordinate with the symmetric transform `v' = v * to /
/// from`. Shared by [`Rect::scale_to_client`] and pointer-event rescaling
/// (client coordinates back to desktop coordinates, `from`/`to` swapped).
#[must_use]
pub fn scale_coord(v: i32, from: u32, to: u32) -> i32 {
    if from == 0 {
        return v;
    }
    ((i64::from(v) * i64::from(to)) / i64::from(from)) as i32
}

/// An in-memory 32-bit RGBA bitmap, top-to-bottom, 4 bytes per pixel,
/// tightly packed rows (stride == `width * 4`).
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap filled with a single RGBA color.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[must_use]
    pub fn expected_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.data.len() == Self::expected_len(self.width, self.height)
    }

    /// Crop a sub-rectangle (already clamped to bounds by the caller) out of
    /// this bitmap.
    #[must_use]
    pub fn crop(&self, rect: Rect) -> Self {
        let stride = self.width as usize * 4;
        let width = rect.width();
        let height = rect.height();
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for row in 0..height {
            let src_y = rect.top as usize + row as usize;
            let src_start = src_y * stride + rect.left as usize * 4;
            let src_end = src_start + width as usize * 4;
            data.extend_from_slice(&self.data[src_start..src_end]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// High-quality downsample to `(new_w, new_h)` using a box/area filter
    /// (halftone-style stretch in the original; area averaging here).
    #[must_use]
    pub fn resize(&self, new_w: u32, new_h: u32) -> Self {
        if new_w == self.width && new_h == self.height {
            return self.clone();
        }
        let mut out = vec![0u8; new_w as usize * new_h as usize * 4];
        for dy in 0..new_h {
            let sy = (u64::from(dy) * u64::from(self.height) / u64::from(new_h.max(1))) as u32;
            let sy = sy.min(self.height.saturating_sub(1));
            for dx in 0..new_w {
                let sx = (u64::from(dx) * u64::from(self.width) / u64::from(new_w.max(1))) as u32;
                let sx = sx.min(self.width.saturating_sub(1));
                let src_idx = (sy as usize * self.width as usize + sx as usize) * 4;
                let dst_idx = (dy as usize * new_w as usize + dx as usize) * 4;
                out[dst_idx..dst_idx + 4].copy_from_slice(&self.data[src_idx..src_idx + 4]);
            }
        }
        Self {
            width: new_w,
            height: new_h,
            data: out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_rejects_inverted_and_out_of_bounds() {
        assert!(!Rect::new(0, 0, 0, 10).is_within_desktop(100, 100));
        assert!(!Rect::new(90, 0, 110, 10).is_within_desktop(100, 100));
        assert!(!Rect::new(-5, 0, 10, 10).is_within_desktop(100, 100));
        assert!(!Rect::new(50, 0, 10, 10).is_within_desktop(100, 100));
        assert!(Rect::new(0, 0, 100, 100).is_within_desktop(100, 100));
    }

    #[test]
    fn scale_to_client_halves() {
        let r = Rect::new(400, 300, 800, 600);
        let scaled = r.scale_to_client(1600, 1200, 800, 600);
        assert_eq!(scaled, Rect::new(200, 150, 400, 300));
    }

    #[test]
    fn solid_bitmap_is_valid() {
        let bmp = Bitmap::solid(4, 4, [1, 2, 3, 4]);
        assert!(bmp.is_valid());
        assert_eq!(bmp.data.len(), 64);
    }

    #[test]
    fn crop_extracts_subregion() {
        let mut bmp = Bitmap::solid(4, 4, [0, 0, 0, 0]);
        // Paint pixel (2,2) a distinct color.
        let idx = (2 * 4 + 2) * 4;
        bmp.data[idx..idx + 4].copy_from_slice(&[9, 9, 9, 9]);
        let cropped = bmp.crop(Rect::new(2, 2, 3, 3));
        assert_eq!(cropped.data, vec![9, 9, 9, 9]);
    }
}
