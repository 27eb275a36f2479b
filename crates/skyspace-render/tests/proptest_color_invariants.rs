//! Property-based invariant tests for color primitives.
//!
//! 1. `lerp` with `t` in [0, 1] stays inside the channel-wise hull of its endpoints.
//! 2. Packing never panics, whatever the channel values.
//! 3. Hex parsing never panics on arbitrary input.
//! 4. Hex formatting is a fixed point of parsing for quantized colors.

use proptest::prelude::*;
use skyspace_render::{Color, PackedRgba};

fn unit_color() -> impl Strategy<Value = Color> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(r, g, b)| Color::new(r, g, b))
}

proptest! {
    #[test]
    fn lerp_stays_in_hull(a in unit_color(), b in unit_color(), t in 0.0f64..=1.0) {
        let c = a.lerp(b, t);
        for (lo, hi, v) in [(a.r, b.r, c.r), (a.g, b.g, c.g), (a.b, b.b, c.b)] {
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            prop_assert!(v >= lo - 1e-12 && v <= hi + 1e-12, "{v} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn packing_is_total(r in any::<f64>(), g in any::<f64>(), b in any::<f64>()) {
        let packed = Color::new(r, g, b).to_packed();
        prop_assert_eq!(packed.a(), 255);
    }

    #[test]
    fn parse_never_panics(s in ".{0,12}") {
        let _ = Color::parse_hex(&s);
    }

    #[test]
    fn formatted_hex_parses_back(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let c = Color::from(PackedRgba::rgb(r, g, b));
        let parsed = Color::parse_hex(&c.to_hex_string()).unwrap();
        prop_assert_eq!(parsed.to_packed(), PackedRgba::rgb(r, g, b));
    }
}
