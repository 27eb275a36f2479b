#![forbid(unsafe_code)]

//! Field evaluation.
//!
//! A [`Field`] is one variant's parameter set resolved against an aspect ratio
//! and a clock reading. Resolving hoists every per-frame constant out of the
//! pixel loop; afterwards [`Field::evaluate`] is a pure function of the pixel.

pub mod flood;
pub mod radial;
pub mod rectangular;

use std::fmt;

use skyspace_core::{FloodFrame, PixelCoord, Uv};
use skyspace_render::Color;

pub use flood::FloodField;
pub use radial::RadialField;
pub use rectangular::{MIN_DIMENSION, RectangularField};

use crate::params::{Parameters, ShapeKind};
use crate::primitives::apply_dither;

/// Clock reading handed to a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldTime {
    /// Unbounded phase of the periodic clock.
    Periodic(f64),
    /// Transition frame of the flood clock.
    Flood(FloodFrame),
}

impl FieldTime {
    /// Start of a flood cycle: first entry toward the second, nothing swept yet.
    pub const FLOOD_START: Self = Self::Flood(FloodFrame {
        from_index: 0,
        to_index: 1,
        progress: 0.0,
    });
}

impl Default for FieldTime {
    fn default() -> Self {
        Self::Periodic(0.0)
    }
}

/// A field variant resolved for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Radial(RadialField),
    Rectangular(RectangularField),
    Flood(FloodField),
}

impl Field {
    /// Resolve `params` for the frame described by `aspect_ratio` and `time`.
    ///
    /// The clock kind must match the variant: periodic time for radial and
    /// rectangular sets, a flood frame for flood sets. Flood frame indices wrap
    /// around the sequence.
    pub fn resolve(
        params: &Parameters,
        aspect_ratio: f64,
        time: FieldTime,
    ) -> Result<Self, FieldError> {
        match (params, time) {
            (Parameters::Radial(p), FieldTime::Periodic(t)) => {
                Ok(Self::Radial(RadialField::new(p, aspect_ratio, t)))
            }
            (Parameters::Rectangular(p), FieldTime::Periodic(t)) => {
                Ok(Self::Rectangular(RectangularField::new(p, t)))
            }
            (Parameters::Flood(p), FieldTime::Flood(frame)) => {
                let from = p.color_at(frame.from_index).ok_or(FieldError::EmptySequence)?;
                let to = p.color_at(frame.to_index).ok_or(FieldError::EmptySequence)?;
                Ok(Self::Flood(FloodField::new(
                    from,
                    to,
                    frame.progress,
                    aspect_ratio,
                    p.dither_strength,
                )))
            }
            (params, time) => Err(FieldError::ClockMismatch {
                kind: params.kind(),
                time,
            }),
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
            Self::Radial(f) => f.dither_strength(),
            Self::Rectangular(f) => f.dither_strength(),
            Self::Flood(f) => f.dither_strength(),
        }
    }

    /// Color at `uv` before dithering.
    #[inline]
    pub fn shade(&self, uv: Uv) -> Color {
        match self {
            Self::Radial(f) => f.shade(uv),
            Self::Rectangular(f) => f.shade(uv),
            Self::Flood(f) => f.shade(uv),
        }
    }

    /// Final color at `uv`, dithered by the fragment coordinate `frag`.
    #[inline]
    pub fn evaluate(&self, uv: Uv, frag: PixelCoord) -> Color {
        apply_dither(self.shade(uv), self.dither_strength(), frag)
    }
}

/// A parameter set that cannot be resolved against the given clock reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldError {
    /// Periodic time given to a flood set, or a flood frame to a periodic set.
    ClockMismatch { kind: ShapeKind, time: FieldTime },
    /// Flood set without entries.
    EmptySequence,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockMismatch { kind, time } => {
                let clock = match time {
                    FieldTime::Periodic(_) => "periodic",
                    FieldTime::Flood(_) => "flood",
                };
                write!(f, "{kind} field cannot be driven by the {clock} clock")
            }
            Self::EmptySequence => f.write_str("flood sequence is empty"),
        }
    }
}

impl std::error::Error for FieldError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FloodParams, RadialParams};

    #[test]
    fn resolve_pairs_variant_with_clock() {
        for kind in ShapeKind::ALL {
            let time = if kind.is_periodic() {
                FieldTime::Periodic(0.4)
            } else {
                FieldTime::FLOOD_START
            };
            let field = Field::resolve(&Parameters::defaults(kind), 1.0, time).unwrap();
            assert_eq!(field.kind(), kind);
        }
    }

    #[test]
    fn resolve_rejects_wrong_clock() {
        let flood = Parameters::defaults(ShapeKind::Flood);
        let err = Field::resolve(&flood, 1.0, FieldTime::Periodic(0.0)).unwrap_err();
        assert!(matches!(
            err,
            FieldError::ClockMismatch {
                kind: ShapeKind::Flood,
                ..
            }
        ));
        let radial = Parameters::defaults(ShapeKind::Radial);
        assert!(Field::resolve(&radial, 1.0, FieldTime::FLOOD_START).is_err());
    }

    #[test]
    fn resolve_rejects_empty_sequence() {
        let params = Parameters::Flood(FloodParams {
            sequence: Vec::new(),
            dither_strength: 0.0,
        });
        assert_eq!(
            Field::resolve(&params, 1.0, FieldTime::FLOOD_START),
            Err(FieldError::EmptySequence)
        );
    }

    #[test]
    fn flood_indices_wrap() {
        let params = Parameters::defaults(ShapeKind::Flood);
        let wrapped = FieldTime::Flood(FloodFrame {
            from_index: 4,
            to_index: 5,
            progress: 0.3,
        });
        let direct = FieldTime::Flood(FloodFrame {
            from_index: 0,
            to_index: 1,
            progress: 0.3,
        });
        assert_eq!(
            Field::resolve(&params, 1.0, wrapped),
            Field::resolve(&params, 1.0, direct)
        );
    }

    #[test]
    fn evaluate_is_shade_plus_bounded_dither() {
        let params = Parameters::Radial(RadialParams {
            dither_strength: 3.0,
            ..RadialParams::default()
        });
        let field = Field::resolve(&params, 1.5, FieldTime::Periodic(2.0)).unwrap();
        let uv = Uv::new(0.3, 0.6);
        let delta = field
            .evaluate(uv, PixelCoord::new(12.5, 40.5))
            .max_channel_delta(field.shade(uv));
        assert!(delta <= 3.0 / 510.0 + 1e-12);
    }

    #[test]
    fn non_finite_time_is_phase_zero() {
        let params = Parameters::defaults(ShapeKind::Rectangular);
        assert_eq!(
            Field::resolve(&params, 1.0, FieldTime::Periodic(f64::NAN)),
            Field::resolve(&params, 1.0, FieldTime::Periodic(0.0))
        );
    }

    #[test]
    fn mismatch_message_names_both_sides() {
        let err = FieldError::ClockMismatch {
            kind: ShapeKind::Radial,
            time: FieldTime::FLOOD_START,
        };
        assert_eq!(err.to_string(), "circle field cannot be driven by the flood clock");
    }
}
