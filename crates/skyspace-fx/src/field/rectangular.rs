#![forbid(unsafe_code)]

//! Rectangular field: an axis-aligned glowing panel.
//!
//! The rectangle is defined directly in UV space and is not aspect-corrected,
//! so `width = height` only looks square on a square viewport.

use skyspace_core::Uv;
use skyspace_render::Color;

use crate::params::RectangularParams;
use crate::primitives::{gaussian_falloff, oscillation, smooth_curve};

/// Smallest rectangle dimension used for evaluation.
pub const MIN_DIMENSION: f64 = 1e-4;

/// Rectangular field resolved for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangularField {
    center: Color,
    edge: Color,
    background: Color,
    half_width: f64,
    half_height: f64,
    center_glow: bool,
    dither_strength: f64,
}

impl RectangularField {
    pub fn new(params: &RectangularParams, time: f64) -> Self {
        let t = oscillation(time);
        Self {
            center: params.center.lerp(params.edge, t * 0.5),
            edge: params.edge.lerp(params.background, t * 0.3),
            background: params.background,
            half_width: floor_dimension(params.width) * 0.5,
            half_height: floor_dimension(params.height) * 0.5,
            center_glow: params.center_glow,
            dither_strength: params.dither_strength,
        }
    }

    /// Animated center color for this frame.
    #[inline]
    pub fn center_color(&self) -> Color {
        self.center
    }

    /// Animated edge color for this frame.
    #[inline]
    pub fn edge_color(&self) -> Color {
        self.edge
    }

    #[inline]
    pub fn dither_strength(&self) -> f64 {
        self.dither_strength
    }

    /// Euclidean distance from `uv` to the rectangle, 0 inside.
    #[inline]
    pub fn edge_distance(&self, uv: Uv) -> f64 {
        let dx = ((uv.u - 0.5).abs() - self.half_width).max(0.0);
        let dy = ((uv.v - 0.5).abs() - self.half_height).max(0.0);
        dx.hypot(dy)
    }

    /// Undithered color at `uv`.
    pub fn shade(&self, uv: Uv) -> Color {
        let d = self.edge_distance(uv);
        if d > 0.0 {
            return self.edge.lerp(self.background, smooth_curve(0.0, 0.2, d));
        }

        let nx = (uv.u - 0.5) / self.half_width;
        let ny = (uv.v - 0.5) / self.half_height;
        let center_dist = nx.hypot(ny);
        if self.center_glow {
            let glow = gaussian_falloff(center_dist, 0.5);
            let eased = center_dist + (smooth_curve(0.0, 1.0, center_dist) - center_dist) * 0.7;
            self.center
                .lerp(self.edge, eased)
                .lerp(self.center, 0.3 * glow)
        } else {
            self.center
                .lerp(self.edge, smooth_curve(0.0, 1.0, center_dist))
        }
    }
}

#[inline]
fn floor_dimension(value: f64) -> f64 {
    if value.is_nan() {
        MIN_DIMENSION
    } else {
        value.max(MIN_DIMENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RectangularParams {
        RectangularParams {
            dither_strength: 0.0,
            ..RectangularParams::default()
        }
    }

    #[test]
    fn center_without_glow_is_animated_center() {
        let p = RectangularParams {
            center_glow: false,
            ..params()
        };
        let field = RectangularField::new(&p, 1.3);
        assert_eq!(field.shade(Uv::CENTER), field.center_color());
    }

    #[test]
    fn center_with_glow_pulls_toward_center() {
        let field = RectangularField::new(&params(), 1.3);
        // centerDist = 0, glow = 1: lerp(center, center, 0.3) is the center.
        let c = field.shade(Uv::CENTER);
        assert!(c.max_channel_delta(field.center_color()) < 1e-12);
    }

    #[test]
    fn time_zero_breathing_weights() {
        let p = params();
        let field = RectangularField::new(&p, 0.0);
        let center = p.center.lerp(p.edge, 0.25);
        let edge = p.edge.lerp(p.background, 0.15);
        assert!(field.center_color().max_channel_delta(center) < 1e-12);
        assert!(field.edge_color().max_channel_delta(edge) < 1e-12);
    }

    #[test]
    fn edge_distance_is_zero_inside_and_euclidean_outside() {
        let field = RectangularField::new(&params(), 0.0);
        assert_eq!(field.edge_distance(Uv::CENTER), 0.0);
        assert_eq!(field.edge_distance(Uv::new(0.79, 0.5)), 0.0);
        // half extents are (0.3, 0.45): corner at (0.8, 0.95).
        let d = field.edge_distance(Uv::new(0.83, 0.99));
        assert!((d - 0.05).abs() < 1e-9);
    }

    #[test]
    fn far_outside_is_background() {
        let p = params();
        let field = RectangularField::new(&p, 0.0);
        let c = field.shade(Uv::new(1.0, 0.5));
        assert!(c.max_channel_delta(p.background) < 1e-12);
    }

    #[test]
    fn zero_dimensions_stay_finite() {
        let p = RectangularParams {
            width: 0.0,
            height: f64::NAN,
            ..params()
        };
        let field = RectangularField::new(&p, 0.0);
        for uv in [Uv::CENTER, Uv::new(0.5, 0.50001), Uv::new(0.2, 0.7)] {
            assert!(field.shade(uv).is_finite());
        }
    }
}
