#![forbid(unsafe_code)]

//! Flood ("aura") field: a ring of edge tone sweeps outward from the center
//! while the center takes on the next color, then the outer field contracts
//! back in over the second half of the transition.

use std::f64::consts::PI;

use skyspace_core::Uv;
use skyspace_render::Color;

use crate::params::FLOOD_EDGE_COLOR;
use crate::primitives::{distance_from_center, gaussian_falloff, smooth_curve};

/// Flood field resolved for one transition frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodField {
    from: Color,
    to: Color,
    edge: Color,
    center: Color,
    progress: f64,
    radius: f64,
    edge_width: f64,
    contraction: f64,
    aspect_ratio: f64,
    dither_strength: f64,
}

impl FloodField {
    /// Resolve the frame between `from` and `to` at `progress` in `[0, 1]`.
    ///
    /// Progress is clamped; NaN reads as 0.
    pub fn new(
        from: Color,
        to: Color,
        progress: f64,
        aspect_ratio: f64,
        dither_strength: f64,
    ) -> Self {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        Self {
            from,
            to,
            edge: FLOOD_EDGE_COLOR,
            center: from.lerp(to, smooth_curve(0.0, 0.4, progress)),
            progress,
            radius: progress * 1.5,
            edge_width: 0.1 + 0.1 * (progress * PI).sin(),
            contraction: smooth_curve(0.5, 1.0, progress),
            aspect_ratio,
            dither_strength,
        }
    }

    #[inline]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Color the center is heading to at this progress.
    #[inline]
    pub fn center_color(&self) -> Color {
        self.center
    }

    #[inline]
    pub fn dither_strength(&self) -> f64 {
        self.dither_strength
    }

    /// Undithered color at `uv`.
    pub fn shade(&self, uv: Uv) -> Color {
        let dist = distance_from_center(uv, self.aspect_ratio);
        let mix = smooth_curve(
            self.radius - self.edge_width,
            self.radius + self.edge_width,
            dist,
        );
        let color = if self.progress < 0.5 {
            self.center.lerp(self.edge, mix)
        } else {
            self.to
                .lerp(self.from.lerp(self.edge, mix), self.contraction)
        };
        color.lerp(self.center, 0.2 * gaussian_falloff(dist, 0.5))
    }
}
