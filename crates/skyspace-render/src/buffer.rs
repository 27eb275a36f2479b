#![forbid(unsafe_code)]

//! Caller-owned pixel storage.
//!
//! Pixels are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `pixels.len() == width * height`
//! 2. Zero-sized buffers are valid and hold no pixels.
//! 3. Backing storage is grow-only: shrinking keeps capacity for reuse.

use crate::color::PackedRgba;

/// A 2D grid of packed pixels handed to a display collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    pixels: Vec<PackedRgba>,
}

impl PixelBuffer {
    /// Create a buffer filled with [`PackedRgba::TRANSPARENT`].
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![PackedRgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Change dimensions, reusing the allocation when it is large enough.
    ///
    /// Returns `true` when the dimensions actually changed. Pixel contents are
    /// unspecified after a resize; callers re-render the whole frame.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if (self.width, self.height) == (width, height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels
            .resize(width as usize * height as usize, PackedRgba::TRANSPARENT);
        true
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<PackedRgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Fill every pixel with `color`.
    pub fn fill(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
    }

    /// One row of pixels.
    pub fn row(&self, y: u16) -> Option<&[PackedRgba]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        self.pixels.get(start..start + w)
    }

    #[inline]
    pub fn as_slice(&self) -> &[PackedRgba] {
        &self.pixels
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [PackedRgba] {
        &mut self.pixels
    }
}
