//! Property-based invariant tests for field evaluation.
//!
//! 1. `smooth_curve(a, b, x)` is exactly 0 below `a`, exactly 1 above `b`, and
//!    non-decreasing in between.
//! 2. The radial field's center pixel is the frame's inner color, for any
//!    palette, time, and aspect ratio.
//! 3. The rectangular field's center (glow off) is the animated center color.
//! 4. Dithering never moves a channel by more than `strength / 255`.
//! 5. At progress 0 the flood field does not depend on the target color.
//! 6. In-range inputs always produce finite colors.

use proptest::prelude::*;
use skyspace_core::{PixelCoord, Uv};
use skyspace_fx::primitives::{apply_dither, distance_from_center, smooth_curve};
use skyspace_fx::{FloodField, RadialField, RadialParams, RectangularField, RectangularParams};
use skyspace_render::Color;

fn unit_color() -> impl Strategy<Value = Color> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(r, g, b)| Color::new(r, g, b))
}

fn uv() -> impl Strategy<Value = Uv> {
    (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(u, v)| Uv::new(u, v))
}

fn radial_params() -> impl Strategy<Value = RadialParams> {
    (
        unit_color(),
        unit_color(),
        unit_color(),
        unit_color(),
        any::<bool>(),
        0.0f64..=3.0,
    )
        .prop_map(
            |(center, mid, outer, background, use_gaussian_falloff, dither_strength)| {
                RadialParams {
                    center,
                    mid,
                    outer,
                    background,
                    use_gaussian_falloff,
                    dither_strength,
                    ..RadialParams::default()
                }
            },
        )
}

fn rect_params() -> impl Strategy<Value = RectangularParams> {
    (
        unit_color(),
        unit_color(),
        unit_color(),
        0.1f64..=1.0,
        0.1f64..=1.0,
        any::<bool>(),
    )
        .prop_map(|(center, edge, background, width, height, center_glow)| {
            RectangularParams {
                center,
                edge,
                background,
                width,
                height,
                center_glow,
                ..RectangularParams::default()
            }
        })
}

proptest! {
    #[test]
    fn smooth_curve_is_clamped_and_monotonic(
        a in -10.0f64..10.0,
        span in 0.001f64..10.0,
        x in -30.0f64..30.0,
        dx in 0.0f64..5.0,
    ) {
        let b = a + span;
        let y0 = smooth_curve(a, b, x);
        let y1 = smooth_curve(a, b, x + dx);
        prop_assert!((0.0..=1.0).contains(&y0));
        prop_assert!(y1 >= y0 - 1e-12);
        if x <= a {
            prop_assert_eq!(y0, 0.0);
        }
        if x >= b {
            prop_assert_eq!(y0, 1.0);
        }
    }

    #[test]
    fn radial_center_is_inner_color(
        params in radial_params(),
        time in -1000.0f64..1000.0,
        aspect in 0.1f64..10.0,
    ) {
        let field = RadialField::new(&params, aspect, time);
        prop_assert_eq!(distance_from_center(Uv::CENTER, aspect), 0.0);
        prop_assert_eq!(field.shade(Uv::CENTER), field.inner_color());
    }

    #[test]
    fn rect_center_without_glow_is_animated_center(
        params in rect_params(),
        time in -1000.0f64..1000.0,
    ) {
        let params = RectangularParams { center_glow: false, ..params };
        let field = RectangularField::new(&params, time);
        prop_assert_eq!(field.shade(Uv::CENTER), field.center_color());
    }

    #[test]
    fn dither_amplitude_is_bounded(
        color in unit_color(),
        strength in 0.0f64..=3.0,
        x in 0u16..4096,
        y in 0u16..4096,
    ) {
        let frag = PixelCoord::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let delta = apply_dither(color, strength, frag).max_channel_delta(color);
        prop_assert!(delta <= strength / 255.0);
    }

    #[test]
    fn flood_start_ignores_target(
        from in unit_color(),
        to_a in unit_color(),
        to_b in unit_color(),
        at in uv(),
        aspect in 0.1f64..10.0,
    ) {
        let a = FloodField::new(from, to_a, 0.0, aspect, 0.0);
        let b = FloodField::new(from, to_b, 0.0, aspect, 0.0);
        prop_assert_eq!(a.shade(at), b.shade(at));
    }

    #[test]
    fn fields_stay_finite(
        radial in radial_params(),
        rect in rect_params(),
        from in unit_color(),
        to in unit_color(),
        progress in 0.0f64..=1.0,
        time in -1.0e6f64..1.0e6,
        at in uv(),
        aspect in 0.1f64..10.0,
    ) {
        prop_assert!(RadialField::new(&radial, aspect, time).shade(at).is_finite());
        prop_assert!(RectangularField::new(&rect, time).shade(at).is_finite());
        prop_assert!(FloodField::new(from, to, progress, aspect, 1.5).shade(at).is_finite());
    }
}
