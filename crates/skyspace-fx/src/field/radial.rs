#![forbid(unsafe_code)]

//! Radial field: concentric palette rings that breathe with the clock.

use skyspace_core::Uv;
use skyspace_render::Color;

use crate::params::RadialParams;
use crate::primitives::{distance_from_center, oscillation, smooth_curve};

/// Radial field resolved for one frame.
///
/// The four palette stops are blended pairwise by the frame's oscillation
/// weight once, so per-pixel work is only the distance curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialField {
    inner: Color,
    mid: Color,
    outer: Color,
    use_gaussian_falloff: bool,
    aspect_ratio: f64,
    dither_strength: f64,
}

impl RadialField {
    pub fn new(params: &RadialParams, aspect_ratio: f64, time: f64) -> Self {
        let t = oscillation(time);
        Self {
            inner: params.center.lerp(params.mid, t),
            mid: params.mid.lerp(params.outer, t),
            outer: params.outer.lerp(params.background, t),
            use_gaussian_falloff: params.use_gaussian_falloff,
            aspect_ratio,
            dither_strength: params.dither_strength,
        }
    }

    /// Color at the exact center for this frame.
    #[inline]
    pub fn inner_color(&self) -> Color {
        self.inner
    }

    /// Color of the middle ring for this frame.
    #[inline]
    pub fn mid_color(&self) -> Color {
        self.mid
    }

    /// Color of the outermost ring for this frame.
    #[inline]
    pub fn outer_color(&self) -> Color {
        self.outer
    }

    #[inline]
    pub fn dither_strength(&self) -> f64 {
        self.dither_strength
    }

    /// Undithered color at `uv`.
    pub fn shade(&self, uv: Uv) -> Color {
        let dist = distance_from_center(uv, self.aspect_ratio);
        if self.use_gaussian_falloff {
            let color = self.inner.lerp(self.mid, smooth_curve(0.0, 0.7, dist));
            if dist > 0.5 {
                color.lerp(self.outer, smooth_curve(0.5, 1.0, dist))
            } else {
                color
            }
        } else if dist < 0.3 {
            self.inner.lerp(self.mid, smooth_curve(0.0, 0.3, dist))
        } else if dist < 0.7 {
            self.mid.lerp(self.outer, smooth_curve(0.3, 0.7, dist))
        } else {
            self.outer
        }
    }
}
