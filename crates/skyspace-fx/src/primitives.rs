#![forbid(unsafe_code)]

//! Shared field math.
//!
//! Every field variant is built from the same handful of curves:
//! an aspect-corrected distance metric, a cubic smoothstep, a gaussian glow
//! kernel, and a hashed per-pixel dither. All functions are pure.

use skyspace_core::{PixelCoord, Uv};
use skyspace_render::Color;

const NOISE_DOT_X: f64 = 12.9898;
const NOISE_DOT_Y: f64 = 78.233;
const NOISE_SCALE: f64 = 43758.5453;

/// Distance from the screen center, undistorted by `aspect_ratio`.
///
/// `u` is stretched around the center by the aspect ratio before measuring,
/// and the result is doubled: ~0 at the center, ~1 at the nearer screen edge.
#[inline]
pub fn distance_from_center(uv: Uv, aspect_ratio: f64) -> f64 {
    let dx = (uv.u - 0.5) * aspect_ratio;
    let dy = uv.v - 0.5;
    2.0 * dx.hypot(dy)
}

/// Cubic Hermite smoothstep between `edge0` and `edge1`.
///
/// Exactly 0 at or below `edge0`, exactly 1 at or above `edge1`. Degenerate
/// edges (`edge1 <= edge0`) act as a hard step at `edge0`; NaN input maps to 0.
#[inline]
pub fn smooth_curve(edge0: f64, edge1: f64, x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Gaussian glow kernel `exp(-dist^2 / spread)`.
#[inline]
pub fn gaussian_falloff(dist: f64, spread: f64) -> f64 {
    (-(dist * dist) / spread).exp()
}

/// `0.5 + 0.5 sin(time)`: the breathing weight of the periodic fields.
///
/// Non-finite time is read as phase 0.
#[inline]
pub fn oscillation(time: f64) -> f64 {
    let time = if time.is_finite() { time } else { 0.0 };
    0.5 + 0.5 * time.sin()
}

/// Hashed noise in `[0, 1)` for a fragment coordinate.
///
/// Stable per pixel: the same coordinate always yields the same value.
#[inline]
pub fn dither_noise(coord: PixelCoord) -> f64 {
    let v = (coord.x * NOISE_DOT_X + coord.y * NOISE_DOT_Y).sin() * NOISE_SCALE;
    let f = v - v.floor();
    if f >= 1.0 || f.is_nan() { 0.0 } else { f }
}

/// Add zero-mean dither of amplitude `strength / 255` to every channel.
#[inline]
pub fn apply_dither(color: Color, strength: f64, coord: PixelCoord) -> Color {
    if strength == 0.0 {
        return color;
    }
    color.offset(strength / 255.0 * dither_noise(coord) - strength / 510.0)
}
