#![forbid(unsafe_code)]

//! The owning context.
//!
//! [`LightField`] is what a display loop and a control surface talk to. It
//! owns one parameter set per variant, the clocks, the aspect ratio, and the
//! render caches. Per frame the caller does, in order:
//!
//! 1. [`LightField::tick`] with the frame timestamp (idempotent per timestamp),
//! 2. [`LightField::render`] into its pixel buffer.
//!
//! Edits arrive through [`LightField::on_parameter_changed`], which replaces
//! the active set wholesale between frames.

use std::time::Duration;

use skyspace_core::{FloodClock, PeriodicClock, Viewport};
use skyspace_render::{Color, PixelBuffer};

use crate::config::FieldConfig;
use crate::field::{Field, FieldError, FieldTime};
use crate::fx::{BackdropFx, FieldFx, FxContext, GanzfeldFx};
use crate::params::{
    FloodParams, ParamError, Parameters, RadialParams, RectangularParams, ShapeKind,
};

/// Parameter sets of every variant, so switching back restores edits.
#[derive(Debug, Clone, Default)]
struct ParameterSets {
    radial: RadialParams,
    rectangular: RectangularParams,
    flood: FloodParams,
}

impl ParameterSets {
    fn get(&self, kind: ShapeKind) -> Parameters {
        match kind {
            ShapeKind::Radial => Parameters::Radial(self.radial.clone()),
            ShapeKind::Rectangular => Parameters::Rectangular(self.rectangular.clone()),
            ShapeKind::Flood => Parameters::Flood(self.flood.clone()),
        }
    }

    fn store(&mut self, params: Parameters) {
        match params {
            Parameters::Radial(p) => self.radial = p,
            Parameters::Rectangular(p) => self.rectangular = p,
            Parameters::Flood(p) => self.flood = p,
        }
    }
}

/// Light-and-space field: parameters, clocks, and viewport in one place.
#[derive(Debug, Clone)]
pub struct LightField {
    variant: ShapeKind,
    stash: ParameterSets,
    fx: FieldFx,
    periodic: PeriodicClock,
    flood_clock: FloodClock,
    holds: Vec<Duration>,
    aspect_ratio: f64,
    ganzfeld: bool,
    frame: u64,
}

impl LightField {
    /// A field showing `variant` with default parameters.
    pub fn new(variant: ShapeKind) -> Self {
        let stash = ParameterSets::default();
        let params = stash.get(variant);
        let mut field = Self {
            variant,
            periodic: PeriodicClock::new(params.animation_speed().unwrap_or(0.0)),
            fx: FieldFx::new(params),
            stash,
            flood_clock: FloodClock::new(),
            holds: Vec::new(),
            aspect_ratio: 1.0,
            ganzfeld: false,
            frame: 0,
        };
        field.sync_holds();
        field
    }

    /// A field built from environment-style configuration.
    ///
    /// Dither strength and speed overrides are applied to every variant's set
    /// and sanitized like any other edit. A center color override applies to
    /// the circle and rectangle.
    pub fn from_config(config: &FieldConfig) -> Self {
        let mut field = Self::new(config.shape);
        for kind in ShapeKind::ALL {
            let mut params = field.stash.get(kind);
            if let Some(dither) = config.dither_strength {
                params.set_dither_strength(dither);
            }
            if let Some(speed) = config.animation_speed {
                params.set_animation_speed(speed);
            }
            if let Some(center) = config.center {
                match &mut params {
                    Parameters::Radial(p) => p.center = center,
                    Parameters::Rectangular(p) => p.center = center,
                    Parameters::Flood(_) => {}
                }
            }
            log_fixes(kind, &params.sanitize());
            field.stash.store(params);
        }
        field.fx.set_params(field.stash.get(config.shape));
        field.sync_clock_rate();
        field.sync_holds();
        if config.ganzfeld {
            field.set_ganzfeld(true);
        }
        field
    }

    #[inline]
    pub fn variant(&self) -> ShapeKind {
        self.variant
    }

    /// Switch variants. The outgoing set is kept for later; clocks restart and
    /// Ganzfeld mode is cleared.
    pub fn set_variant(&mut self, kind: ShapeKind) {
        if kind == self.variant {
            return;
        }
        let outgoing = self.fx.params().clone();
        self.stash.store(outgoing);
        self.fx.set_params(self.stash.get(kind));
        tracing::debug!(from = %self.variant, to = %kind, "variant switched");
        self.variant = kind;
        self.ganzfeld = false;
        self.periodic.reset();
        self.flood_clock.reset();
        self.sync_clock_rate();
        self.sync_holds();
    }

    /// The active parameter set.
    #[inline]
    pub fn parameters(&self) -> &Parameters {
        self.fx.params()
    }

    /// Replace the active parameter set.
    ///
    /// The set must belong to the active variant and a flood sequence must not
    /// be empty. Values that would break evaluation (negative dither, rectangle
    /// dimensions outside `[MIN_DIMENSION, 1]`, sub-millisecond holds) are
    /// clamped and non-finite values fall back to defaults; each repair is
    /// logged. Anything else, including values beyond the advisory control
    /// ranges, is kept as given.
    pub fn on_parameter_changed(&mut self, params: Parameters) -> Result<(), ParamError> {
        let provided = params.kind();
        if provided != self.variant {
            return Err(ParamError::VariantMismatch {
                active: self.variant,
                provided,
            });
        }
        if let Parameters::Flood(p) = &params {
            if p.sequence.is_empty() {
                return Err(ParamError::EmptySequence);
            }
        }
        let mut params = params;
        log_fixes(provided, &params.sanitize());
        self.fx.set_params(params);
        self.sync_clock_rate();
        self.sync_holds();
        Ok(())
    }

    /// Advance the active clock for the frame at `timestamp_ms`.
    ///
    /// Returns `false` when nothing advanced: repeated, decreasing, and
    /// non-finite timestamps are ignored.
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        let advanced = if self.variant.is_periodic() {
            self.periodic.tick(timestamp_ms)
        } else {
            self.flood_clock.tick(timestamp_ms, &self.holds)
        };
        if advanced {
            self.frame += 1;
        } else {
            tracing::trace!(timestamp_ms, "tick ignored");
        }
        advanced
    }

    /// Number of admitted ticks since construction.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Clock reading the next render uses.
    pub fn time(&self) -> FieldTime {
        if self.variant.is_periodic() {
            FieldTime::Periodic(self.periodic.time())
        } else {
            FieldTime::Flood(self.flood_clock.frame())
        }
    }

    #[inline]
    pub fn periodic_clock(&self) -> &PeriodicClock {
        &self.periodic
    }

    #[inline]
    pub fn flood_clock(&self) -> &FloodClock {
        &self.flood_clock
    }

    /// Set the display aspect ratio (`width / height`). Last write wins;
    /// non-finite and non-positive ratios are ignored.
    pub fn on_viewport_resize(&mut self, aspect_ratio: f64) {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            tracing::warn!(aspect_ratio, "ignoring invalid aspect ratio");
            return;
        }
        self.aspect_ratio = aspect_ratio;
    }

    /// Set the aspect ratio from square-pixel dimensions. Empty sizes are ignored.
    pub fn on_viewport_resize_px(&mut self, width: u16, height: u16) {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            tracing::warn!(width, height, "ignoring empty viewport");
            return;
        }
        self.on_viewport_resize(viewport.aspect_ratio());
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Toggle Ganzfeld mode: the whole viewport takes the radial center color.
    ///
    /// Only the radial variant has a Ganzfeld mode. Returns whether the mode
    /// now matches the request.
    pub fn set_ganzfeld(&mut self, on: bool) -> bool {
        if on && self.variant != ShapeKind::Radial {
            tracing::warn!(variant = %self.variant, "ganzfeld mode needs the circle shape");
            return false;
        }
        if self.ganzfeld != on {
            tracing::debug!(on, "ganzfeld toggled");
        }
        self.ganzfeld = on;
        true
    }

    #[inline]
    pub fn ganzfeld(&self) -> bool {
        self.ganzfeld
    }

    fn ganzfeld_fx(&self) -> Option<GanzfeldFx> {
        match self.fx.params() {
            Parameters::Radial(p) if self.ganzfeld => Some(GanzfeldFx::new(p.center)),
            _ => None,
        }
    }

    /// Resolve the active set against the current clock and aspect ratio.
    pub fn field(&self) -> Result<Field, FieldError> {
        Field::resolve(self.fx.params(), self.aspect_ratio, self.time())
    }

    /// Render the current frame into `buffer`.
    pub fn render(&mut self, buffer: &mut PixelBuffer) {
        let ctx = FxContext {
            width: buffer.width(),
            height: buffer.height(),
            frame: self.frame,
            aspect_ratio: self.aspect_ratio,
            time: self.time(),
        };
        match self.ganzfeld_fx() {
            Some(mut ganzfeld) => ganzfeld.render(ctx, buffer.as_mut_slice()),
            None => self.fx.render(ctx, buffer.as_mut_slice()),
        }
    }

    /// Color of pixel `(x, y)` in a `width x height` grid for the current frame.
    pub fn evaluate(
        &self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<Color, FieldError> {
        if let Some(ganzfeld) = self.ganzfeld_fx() {
            return Ok(ganzfeld.color());
        }
        let (uv, frag) = Viewport::new(width, height).sample(x, y);
        Ok(self.field()?.evaluate(uv, frag))
    }

    fn sync_clock_rate(&mut self) {
        if let Some(speed) = self.fx.params().animation_speed() {
            self.periodic.set_rate(speed);
        }
    }

    fn sync_holds(&mut self) {
        self.holds.clear();
        if let Parameters::Flood(p) = self.fx.params() {
            self.holds.extend(p.holds());
        }
    }
}

impl Default for LightField {
    fn default() -> Self {
        Self::new(ShapeKind::default())
    }
}

fn log_fixes(kind: ShapeKind, fixes: &[ParamError]) {
    for fix in fixes {
        tracing::warn!(variant = %kind, "parameter adjusted: {fix}");
    }
}
