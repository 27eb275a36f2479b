#![forbid(unsafe_code)]

//! Core: viewport geometry and the frame clocks that drive field animation.

pub mod clock;
pub mod geometry;

pub use clock::{FloodClock, FloodFrame, FloodPhase, PeriodicClock, TRANSITION_DURATION};
pub use geometry::{PixelCoord, Uv, Viewport};
