#![forbid(unsafe_code)]

//! Parameter sets.
//!
//! Each field variant reads one plain-data parameter record. Records are owned
//! by the caller and replaced wholesale between frames; evaluators never
//! mutate them.
//!
//! The model enforces only what evaluation needs: finite values, colors in
//! `[0, 1]`, dither strength `>= 0`, rectangle dimensions in
//! `[MIN_DIMENSION, 1]`, and holds of at least [`MIN_HOLD`].
//! [`Parameters::validate`] reports every violation; [`Parameters::sanitize`]
//! repairs them in place: out-of-bound values are clamped and non-finite
//! values fall back to the variant default.
//!
//! [`DITHER_RANGE`], [`DIMENSION_RANGE`] and [`SPEED_RANGE`] are the ranges a
//! control surface offers. They are advisory: values outside them are valid
//! parameters.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use skyspace_render::Color;

use crate::field::MIN_DIMENSION;

/// Dither strength control range (advisory).
pub const DITHER_RANGE: RangeInclusive<f64> = 0.0..=3.0;
/// Rectangle width/height control range (advisory, fraction of the viewport).
pub const DIMENSION_RANGE: RangeInclusive<f64> = 0.1..=1.0;
/// Animation speed control range (advisory, radians of phase per frame).
pub const SPEED_RANGE: RangeInclusive<f64> = 0.0001..=0.005;
/// Shortest admissible flood hold.
pub const MIN_HOLD: Duration = Duration::from_millis(1);

const DITHER_BOUNDS: (f64, f64) = (0.0, f64::INFINITY);
const DIMENSION_BOUNDS: (f64, f64) = (MIN_DIMENSION, 1.0);
const SPEED_BOUNDS: (f64, f64) = (f64::NEG_INFINITY, f64::INFINITY);

/// Default dither strength for every variant.
pub const DEFAULT_DITHER: f64 = 1.5;
/// Boundary tone of the flood transition. Fixed, not part of [`FloodParams`].
pub const FLOOD_EDGE_COLOR: Color = Color::from_hex(0xF0F0F0);

// ---------------------------------------------------------------------------
// ShapeKind
// ---------------------------------------------------------------------------

/// Field variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    /// Concentric palette rings around the center.
    #[default]
    Radial,
    /// Axis-aligned glowing rectangle.
    Rectangular,
    /// Whole-screen "aura" flood between sequence colors.
    Flood,
}

impl ShapeKind {
    pub const ALL: [Self; 3] = [Self::Radial, Self::Rectangular, Self::Flood];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Radial => "circle",
            Self::Rectangular => "rectangle",
            Self::Flood => "aura",
        }
    }

    /// Parse a shape name. Accepts the display names plus a few aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "circle" | "radial" => Some(Self::Radial),
            "rectangle" | "rect" | "rectangular" => Some(Self::Rectangular),
            "aura" | "flood" => Some(Self::Flood),
            _ => None,
        }
    }

    /// Whether the variant is driven by the periodic clock.
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::Radial | Self::Rectangular)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RadialParams {
    pub center: Color,
    pub mid: Color,
    pub outer: Color,
    pub background: Color,
    /// Two-stage smooth blend instead of discrete bands.
    pub use_gaussian_falloff: bool,
    pub dither_strength: f64,
    pub animation_speed: f64,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            center: Color::from_hex(0x3060FF),
            mid: Color::from_hex(0x40C0D0),
            outer: Color::from_hex(0x80E0E0),
            background: Color::from_hex(0xC0C0C0),
            use_gaussian_falloff: true,
            dither_strength: DEFAULT_DITHER,
            animation_speed: 0.0005,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectangularParams {
    pub center: Color,
    pub edge: Color,
    pub background: Color,
    /// Fraction of the viewport width.
    pub width: f64,
    /// Fraction of the viewport height.
    pub height: f64,
    pub center_glow: bool,
    pub dither_strength: f64,
    pub animation_speed: f64,
}

impl Default for RectangularParams {
    fn default() -> Self {
        Self {
            center: Color::from_hex(0x3040FF),
            edge: Color::from_hex(0xE0E080),
            background: Color::from_hex(0xC0C0C0),
            width: 0.6,
            height: 0.9,
            center_glow: true,
            dither_strength: DEFAULT_DITHER,
            animation_speed: 0.0003,
        }
    }
}

/// One entry of the flood sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodStop {
    pub color: Color,
    pub hold: Duration,
}

impl FloodStop {
    pub const fn new(color: Color, hold: Duration) -> Self {
        Self { color, hold }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloodParams {
    /// Cyclic color sequence.
    pub sequence: Vec<FloodStop>,
    pub dither_strength: f64,
}

impl FloodParams {
    /// Hold durations in sequence order.
    pub fn holds(&self) -> impl Iterator<Item = Duration> + '_ {
        self.sequence.iter().map(|stop| stop.hold)
    }

    /// Color of the sequence entry at `index`, wrapping around.
    pub fn color_at(&self, index: usize) -> Option<Color> {
        if self.sequence.is_empty() {
            None
        } else {
            Some(self.sequence[index % self.sequence.len()].color)
        }
    }
}

impl Default for FloodParams {
    fn default() -> Self {
        Self {
            sequence: vec![
                FloodStop::new(Color::from_hex(0x3060FF), Duration::from_secs(10)),
                FloodStop::new(Color::from_hex(0xFF6030), Duration::from_secs(8)),
                FloodStop::new(Color::from_hex(0x50D080), Duration::from_secs(10)),
                FloodStop::new(Color::from_hex(0xD050A0), Duration::from_secs(8)),
            ],
            dither_strength: DEFAULT_DITHER,
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// The parameter set of one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    Radial(RadialParams),
    Rectangular(RectangularParams),
    Flood(FloodParams),
}

impl Parameters {
    /// Default parameter set for `kind`.
    pub fn defaults(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Radial => Self::Radial(RadialParams::default()),
            ShapeKind::Rectangular => Self::Rectangular(RectangularParams::default()),
            ShapeKind::Flood => Self::Flood(FloodParams::default()),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Radial(_) => ShapeKind::Radial,
            Self::Rectangular(_) => ShapeKind::Rectangular,
            Self::Flood(_) => ShapeKind::Flood,
        }
    }

    pub fn dither_strength(&self) -> f64 {
        match self {
            Self::Radial(p) => p.dither_strength,
            Self::Rectangular(p) => p.dither_strength,
            Self::Flood(p) => p.dither_strength,
        }
    }

    pub fn set_dither_strength(&mut self, strength: f64) {
        match self {
            Self::Radial(p) => p.dither_strength = strength,
            Self::Rectangular(p) => p.dither_strength = strength,
            Self::Flood(p) => p.dither_strength = strength,
        }
    }

    /// Phase per frame for periodic variants; `None` for the flood.
    pub fn animation_speed(&self) -> Option<f64> {
        match self {
            Self::Radial(p) => Some(p.animation_speed),
            Self::Rectangular(p) => Some(p.animation_speed),
            Self::Flood(_) => None,
        }
    }

    /// Set the animation speed. Ignored by the flood variant.
    pub fn set_animation_speed(&mut self, speed: f64) {
        match self {
            Self::Radial(p) => p.animation_speed = speed,
            Self::Rectangular(p) => p.animation_speed = speed,
            Self::Flood(_) => {}
        }
    }

    /// Check every invariant and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ParamError>> {
        let mut errors = Vec::new();
        match self {
            Self::Radial(p) => {
                check_color("center", p.center, &mut errors);
                check_color("mid", p.mid, &mut errors);
                check_color("outer", p.outer, &mut errors);
                check_color("background", p.background, &mut errors);
                check_range("dither_strength", p.dither_strength, DITHER_BOUNDS, &mut errors);
                check_range("animation_speed", p.animation_speed, SPEED_BOUNDS, &mut errors);
            }
            Self::Rectangular(p) => {
                check_color("center", p.center, &mut errors);
                check_color("edge", p.edge, &mut errors);
                check_color("background", p.background, &mut errors);
                check_range("width", p.width, DIMENSION_BOUNDS, &mut errors);
                check_range("height", p.height, DIMENSION_BOUNDS, &mut errors);
                check_range("dither_strength", p.dither_strength, DITHER_BOUNDS, &mut errors);
                check_range("animation_speed", p.animation_speed, SPEED_BOUNDS, &mut errors);
            }
            Self::Flood(p) => {
                if p.sequence.is_empty() {
                    errors.push(ParamError::EmptySequence);
                }
                for stop in &p.sequence {
                    check_color("sequence.color", stop.color, &mut errors);
                    if stop.hold < MIN_HOLD {
                        errors.push(ParamError::OutOfRange {
                            field: "sequence.hold_ms",
                            value: stop.hold.as_secs_f64() * 1000.0,
                            min: MIN_HOLD.as_secs_f64() * 1000.0,
                            max: f64::INFINITY,
                        });
                    }
                }
                check_range("dither_strength", p.dither_strength, DITHER_BOUNDS, &mut errors);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Repair every violation in place and return what was repaired.
    ///
    /// An empty flood sequence cannot be repaired and is left as is (and
    /// reported).
    pub fn sanitize(&mut self) -> Vec<ParamError> {
        let mut fixes = Vec::new();
        match self {
            Self::Radial(p) => {
                let d = RadialParams::default();
                fix_color("center", &mut p.center, d.center, &mut fixes);
                fix_color("mid", &mut p.mid, d.mid, &mut fixes);
                fix_color("outer", &mut p.outer, d.outer, &mut fixes);
                fix_color("background", &mut p.background, d.background, &mut fixes);
                fix_range(
                    "dither_strength",
                    &mut p.dither_strength,
                    d.dither_strength,
                    DITHER_BOUNDS,
                    &mut fixes,
                );
                fix_range(
                    "animation_speed",
                    &mut p.animation_speed,
                    d.animation_speed,
                    SPEED_BOUNDS,
                    &mut fixes,
                );
            }
            Self::Rectangular(p) => {
                let d = RectangularParams::default();
                fix_color("center", &mut p.center, d.center, &mut fixes);
                fix_color("edge", &mut p.edge, d.edge, &mut fixes);
                fix_color("background", &mut p.background, d.background, &mut fixes);
                fix_range("width", &mut p.width, d.width, DIMENSION_BOUNDS, &mut fixes);
                fix_range("height", &mut p.height, d.height, DIMENSION_BOUNDS, &mut fixes);
                fix_range(
                    "dither_strength",
                    &mut p.dither_strength,
                    d.dither_strength,
                    DITHER_BOUNDS,
                    &mut fixes,
                );
                fix_range(
                    "animation_speed",
                    &mut p.animation_speed,
                    d.animation_speed,
                    SPEED_BOUNDS,
                    &mut fixes,
                );
            }
            Self::Flood(p) => {
                if p.sequence.is_empty() {
                    fixes.push(ParamError::EmptySequence);
                }
                let fallback = FLOOD_EDGE_COLOR;
                for stop in &mut p.sequence {
                    fix_color("sequence.color", &mut stop.color, fallback, &mut fixes);
                    if stop.hold < MIN_HOLD {
                        fixes.push(ParamError::OutOfRange {
                            field: "sequence.hold_ms",
                            value: stop.hold.as_secs_f64() * 1000.0,
                            min: MIN_HOLD.as_secs_f64() * 1000.0,
                            max: f64::INFINITY,
                        });
                        stop.hold = MIN_HOLD;
                    }
                }
                fix_range(
                    "dither_strength",
                    &mut p.dither_strength,
                    DEFAULT_DITHER,
                    DITHER_BOUNDS,
                    &mut fixes,
                );
            }
        }
        fixes
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::defaults(ShapeKind::default())
    }
}

impl From<RadialParams> for Parameters {
    fn from(params: RadialParams) -> Self {
        Self::Radial(params)
    }
}

impl From<RectangularParams> for Parameters {
    fn from(params: RectangularParams) -> Self {
        Self::Rectangular(params)
    }
}

impl From<FloodParams> for Parameters {
    fn from(params: FloodParams) -> Self {
        Self::Flood(params)
    }
}

fn check_color(field: &'static str, color: Color, errors: &mut Vec<ParamError>) {
    if !color.is_finite() {
        errors.push(ParamError::NonFinite { field });
        return;
    }
    for channel in [color.r, color.g, color.b] {
        if !(0.0..=1.0).contains(&channel) {
            errors.push(ParamError::OutOfRange {
                field,
                value: channel,
                min: 0.0,
                max: 1.0,
            });
        }
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
    errors: &mut Vec<ParamError>,
) {
    if !value.is_finite() {
        errors.push(ParamError::NonFinite { field });
    } else if !(min..=max).contains(&value) {
        errors.push(ParamError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
}

fn fix_color(field: &'static str, color: &mut Color, fallback: Color, fixes: &mut Vec<ParamError>) {
    let before = fixes.len();
    check_color(field, *color, fixes);
    if fixes.len() == before {
        return;
    }
    *color = if color.is_finite() {
        color.clamped()
    } else {
        fallback
    };
}

fn fix_range(
    field: &'static str,
    value: &mut f64,
    fallback: f64,
    bounds: (f64, f64),
    fixes: &mut Vec<ParamError>,
) {
    let before = fixes.len();
    check_range(field, *value, bounds, fixes);
    if fixes.len() == before {
        return;
    }
    *value = if value.is_finite() {
        value.clamp(bounds.0, bounds.1)
    } else {
        fallback
    };
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A parameter set rejected or repaired by the owning context.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// The set belongs to a different variant than the active one.
    VariantMismatch {
        active: ShapeKind,
        provided: ShapeKind,
    },
    /// A flood sequence with no entries.
    EmptySequence,
    /// A numeric value outside the bounds evaluation needs.
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// NaN or infinite value.
    NonFinite { field: &'static str },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VariantMismatch { active, provided } => {
                write!(f, "parameters for {provided} given while {active} is active")
            }
            Self::EmptySequence => f.write_str("flood sequence is empty"),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                if max.is_finite() {
                    write!(f, "{field}={value} outside [{min}, {max}]")
                } else {
                    write!(f, "{field}={value} below minimum {min}")
                }
            }
            Self::NonFinite { field } => write!(f, "{field} is not finite"),
        }
    }
}

impl std::error::Error for ParamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_within_bounds() {
        for kind in ShapeKind::ALL {
            assert_eq!(Parameters::defaults(kind).validate(), Ok(()), "{kind}");
        }
    }

    #[test]
    fn shape_names_parse_back() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ShapeKind::parse(" Flood "), Some(ShapeKind::Flood));
        assert_eq!(ShapeKind::parse("hexagon"), None);
    }

    #[test]
    fn validate_reports_every_violation() {
        let params = Parameters::Rectangular(RectangularParams {
            width: 0.0,
            height: f64::NAN,
            dither_strength: -1.0,
            ..RectangularParams::default()
        });
        let errors = params.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ParamError::NonFinite { field: "height" }));
        assert!(errors.contains(&ParamError::OutOfRange {
            field: "width",
            value: 0.0,
            min: MIN_DIMENSION,
            max: 1.0
        }));
        assert!(errors.contains(&ParamError::OutOfRange {
            field: "dither_strength",
            value: -1.0,
            min: 0.0,
            max: f64::INFINITY
        }));
    }

    #[test]
    fn values_beyond_control_ranges_are_valid() {
        let mut params = Parameters::Rectangular(RectangularParams {
            width: 0.05,
            height: 0.05,
            dither_strength: 4.0,
            animation_speed: 0.0,
            ..RectangularParams::default()
        });
        assert!(!DIMENSION_RANGE.contains(&0.05));
        assert!(!DITHER_RANGE.contains(&4.0));
        assert!(!SPEED_RANGE.contains(&0.0));
        assert_eq!(params.validate(), Ok(()));
        let before = params.clone();
        assert!(params.sanitize().is_empty());
        assert_eq!(params, before);
    }

    #[test]
    fn dimensions_are_floored_at_epsilon() {
        let mut params = Parameters::Rectangular(RectangularParams {
            width: 0.0,
            height: 1e-9,
            ..RectangularParams::default()
        });
        assert_eq!(params.sanitize().len(), 2);
        let Parameters::Rectangular(p) = &params else {
            panic!("variant changed");
        };
        assert_eq!((p.width, p.height), (MIN_DIMENSION, MIN_DIMENSION));
    }

    #[test]
    fn sanitize_clamps_and_restores_defaults() {
        let mut params = Parameters::Radial(RadialParams {
            center: Color::new(1.5, -0.5, 0.5),
            mid: Color::new(f64::NAN, 0.0, 0.0),
            dither_strength: -1.0,
            animation_speed: f64::INFINITY,
            ..RadialParams::default()
        });
        let fixes = params.sanitize();
        assert_eq!(fixes.len(), 5);
        let Parameters::Radial(p) = &params else {
            panic!("variant changed");
        };
        assert_eq!(p.center, Color::new(1.0, 0.0, 0.5));
        assert_eq!(p.mid, RadialParams::default().mid);
        assert_eq!(p.dither_strength, 0.0);
        assert_eq!(p.animation_speed, RadialParams::default().animation_speed);
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn sanitize_floors_zero_holds() {
        let mut params = Parameters::Flood(FloodParams {
            sequence: vec![FloodStop::new(Color::WHITE, Duration::ZERO)],
            dither_strength: 1.0,
        });
        assert_eq!(params.sanitize().len(), 1);
        let Parameters::Flood(p) = &params else {
            panic!("variant changed");
        };
        assert_eq!(p.sequence[0].hold, MIN_HOLD);
    }

    #[test]
    fn empty_sequence_is_reported() {
        let mut params = Parameters::Flood(FloodParams {
            sequence: Vec::new(),
            dither_strength: 1.0,
        });
        assert_eq!(params.validate(), Err(vec![ParamError::EmptySequence]));
        assert_eq!(params.sanitize(), vec![ParamError::EmptySequence]);
    }

    #[test]
    fn flood_colors_wrap() {
        let params = FloodParams::default();
        assert_eq!(params.color_at(4), params.color_at(0));
        assert_eq!(params.holds().count(), 4);
        assert_eq!(
            FloodParams {
                sequence: Vec::new(),
                dither_strength: 0.0
            }
            .color_at(0),
            None
        );
    }

    #[test]
    fn speed_is_ignored_by_flood() {
        let mut params = Parameters::defaults(ShapeKind::Flood);
        params.set_animation_speed(0.002);
        assert_eq!(params.animation_speed(), None);
        params.set_dither_strength(2.0);
        assert_eq!(params.dither_strength(), 2.0);
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ParamError::OutOfRange {
            field: "width",
            value: 2.0,
            min: 0.1,
            max: 1.0,
        };
        assert_eq!(err.to_string(), "width=2 outside [0.1, 1]");
        let err = ParamError::VariantMismatch {
            active: ShapeKind::Radial,
            provided: ShapeKind::Flood,
        };
        assert_eq!(err.to_string(), "parameters for aura given while circle is active");
    }
}
