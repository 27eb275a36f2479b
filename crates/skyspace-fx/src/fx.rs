#![forbid(unsafe_code)]

//! Backdrop rendering.
//!
//! Effects render into a caller-owned, row-major pixel slice:
//! `out[y * width + x]` for `0 <= x < width`, `0 <= y < height`.
//!
//! Contract for every [`BackdropFx`]:
//! - **Deterministic**: the same context and parameters give the same pixels.
//! - **Tiny-area safe**: zero width or height renders nothing and never panics.
//! - **Length-checked**: an `out` slice whose length is not `width * height`
//!   is left untouched.

use skyspace_core::{PixelCoord, Uv, Viewport};
use skyspace_render::{Color, PackedRgba};

use crate::field::{Field, FieldTime};
use crate::params::{Parameters, ShapeKind};

/// Call-site provided render context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxContext {
    pub width: u16,
    pub height: u16,
    /// Index of the frame being rendered.
    pub frame: u64,
    /// Display aspect ratio. Usually `width / height`, but display
    /// collaborators with non-square pixels pass their own.
    pub aspect_ratio: f64,
    pub time: FieldTime,
}

impl FxContext {
    /// Context for a `width x height` target whose pixels are square.
    pub fn new(width: u16, height: u16, time: FieldTime) -> Self {
        Self {
            width,
            height,
            frame: 0,
            aspect_ratio: Viewport::new(width, height).aspect_ratio(),
            time,
        }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

/// A full-area background effect.
pub trait BackdropFx {
    /// Human-readable name (used for debugging / UI).
    fn name(&self) -> &'static str;

    /// Optional resize hook so effects can (re)allocate caches deterministically.
    fn resize(&mut self, _width: u16, _height: u16) {}

    /// Render into `out` (row-major, width*height).
    fn render(&mut self, ctx: FxContext, out: &mut [PackedRgba]);
}

// ---------------------------------------------------------------------------
// FieldFx
// ---------------------------------------------------------------------------

/// Renders a parameter set through the field evaluator.
///
/// Keeps per-column and per-row UV caches so the steady-state render loop
/// does not allocate.
#[derive(Debug, Clone)]
pub struct FieldFx {
    params: Parameters,
    u_coords: Vec<f64>,
    v_coords: Vec<f64>,
}

impl FieldFx {
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            u_coords: Vec::new(),
            v_coords: Vec::new(),
        }
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Replace parameters (keeps caches).
    pub fn set_params(&mut self, params: Parameters) {
        self.params = params;
    }

    fn ensure_coords(&mut self, width: u16, height: u16) {
        fill_centers(&mut self.u_coords, width);
        fill_centers(&mut self.v_coords, height);
    }
}

/// Pixel-center coordinates `(i + 0.5) / n`, recomputed only on size change.
fn fill_centers(coords: &mut Vec<f64>, n: u16) {
    let n_usize = n as usize;
    if coords.len() == n_usize {
        return;
    }
    coords.clear();
    let denom = f64::from(n);
    coords.extend((0..n).map(|i| (f64::from(i) + 0.5) / denom));
}

impl Default for FieldFx {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}

impl BackdropFx for FieldFx {
    fn name(&self) -> &'static str {
        match self.params.kind() {
            ShapeKind::Radial => "radial-field",
            ShapeKind::Rectangular => "rectangular-field",
            ShapeKind::Flood => "flood-field",
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        if width == 0 || height == 0 {
            self.u_coords.clear();
            self.v_coords.clear();
            return;
        }
        self.ensure_coords(width, height);
    }

    fn render(&mut self, ctx: FxContext, out: &mut [PackedRgba]) {
        if ctx.is_empty() || out.len() != ctx.len() {
            return;
        }
        let field = match Field::resolve(&self.params, ctx.aspect_ratio, ctx.time) {
            Ok(field) => field,
            Err(err) => {
                tracing::warn!(fx = self.name(), frame = ctx.frame, %err, "skipping frame");
                return;
            }
        };

        self.ensure_coords(ctx.width, ctx.height);
        let width = ctx.width as usize;
        for (y, row) in out.chunks_exact_mut(width).enumerate() {
            let v = self.v_coords[y];
            let fy = y as f64 + 0.5;
            for (x, px) in row.iter_mut().enumerate() {
                let uv = Uv::new(self.u_coords[x], v);
                let frag = PixelCoord::new(x as f64 + 0.5, fy);
                *px = field.evaluate(uv, frag).to_packed();
            }
        }
        tracing::trace!(
            fx = self.name(),
            frame = ctx.frame,
            width = ctx.width,
            height = ctx.height,
            "rendered field"
        );
    }
}

// ---------------------------------------------------------------------------
// GanzfeldFx
// ---------------------------------------------------------------------------

/// Featureless uniform field: every pixel gets the same color, undithered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GanzfeldFx {
    color: Color,
}

impl GanzfeldFx {
    pub const fn new(color: Color) -> Self {
        Self { color }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }
}

impl BackdropFx for GanzfeldFx {
    fn name(&self) -> &'static str {
        "ganzfeld"
    }

    fn render(&mut self, ctx: FxContext, out: &mut [PackedRgba]) {
        if ctx.is_empty() || out.len() != ctx.len() {
            return;
        }
        out.fill(self.color.to_packed());
    }
}
