#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Pixel grids use screen coordinates (0-indexed, origin at top-left, row-major).
//! Each pixel is sampled at its center, so pixel `(x, y)` of a `w x h` grid maps
//! to `uv = ((x + 0.5) / w, (y + 0.5) / h)` and to fragment coordinate
//! `(x + 0.5, y + 0.5)`.

/// Normalized surface coordinate in `[0, 1] x [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

impl Uv {
    /// Screen center.
    pub const CENTER: Self = Self::new(0.5, 0.5);

    #[inline]
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// Fragment coordinate in pixels (pixel centers sit on `.5`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelCoord {
    pub x: f64,
    pub y: f64,
}

impl PixelCoord {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of pixels.
    #[inline]
    pub const fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `width / height`, or `1.0` for a degenerate viewport.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    /// UV and fragment coordinate sampled at the center of pixel `(x, y)`.
    #[inline]
    pub fn sample(&self, x: u16, y: u16) -> (Uv, PixelCoord) {
        let fx = x as f64 + 0.5;
        let fy = y as f64 + 0.5;
        let w = (self.width as f64).max(1.0);
        let h = (self.height as f64).max(1.0);
        (Uv::new(fx / w, fy / h), PixelCoord::new(fx, fy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_of_landscape_viewport() {
        assert_eq!(Viewport::new(200, 100).aspect_ratio(), 2.0);
    }

    #[test]
    fn degenerate_viewport_has_unit_aspect() {
        assert_eq!(Viewport::new(0, 100).aspect_ratio(), 1.0);
        assert_eq!(Viewport::new(100, 0).aspect_ratio(), 1.0);
        assert!(Viewport::new(100, 0).is_empty());
    }

    #[test]
    fn samples_pixel_centers() {
        let vp = Viewport::new(4, 2);
        let (uv, frag) = vp.sample(0, 0);
        assert_eq!(uv, Uv::new(0.125, 0.25));
        assert_eq!(frag, PixelCoord::new(0.5, 0.5));
        let (uv, _) = vp.sample(3, 1);
        assert_eq!(uv, Uv::new(0.875, 0.75));
    }

    #[test]
    fn odd_grid_center_pixel_hits_uv_center() {
        let (uv, _) = Viewport::new(5, 5).sample(2, 2);
        assert_eq!(uv, Uv::CENTER);
    }
}
