#![forbid(unsafe_code)]

//! Light-and-space color fields.
//!
//! For any pixel and any instant, compute a color from a distance metric,
//! smooth curves, a clock, and a per-pixel dither. Three variants share that
//! structure:
//!
//! - **Radial**: concentric palette rings that breathe with a periodic clock.
//! - **Rectangular**: an axis-aligned glowing panel, also periodic.
//! - **Flood** ("aura"): a hold/transition cycle through a color sequence.
//!
//! [`LightField`] is the owning context a display loop drives; [`Field`] and
//! the [`BackdropFx`] effects are the lower-level building blocks.
//!
//! # Example
//!
//! ```
//! use skyspace_fx::{LightField, ShapeKind};
//! use skyspace_render::PixelBuffer;
//!
//! let mut field = LightField::new(ShapeKind::Radial);
//! let mut buffer = PixelBuffer::new(32, 16);
//! field.on_viewport_resize_px(32, 16);
//! field.tick(16.0);
//! field.render(&mut buffer);
//! assert!(buffer.as_slice().iter().all(|px| px.a() == 255));
//! ```

pub mod config;
pub mod field;
pub mod fx;
pub mod model;
pub mod params;
pub mod primitives;

pub use config::{ConfigError, FieldConfig, FieldConfigParse};
pub use field::{Field, FieldError, FieldTime, FloodField, RadialField, RectangularField};
pub use fx::{BackdropFx, FieldFx, FxContext, GanzfeldFx};
pub use model::LightField;
pub use params::{
    FLOOD_EDGE_COLOR, FloodParams, FloodStop, ParamError, Parameters, RadialParams,
    RectangularParams, ShapeKind,
};
