#![forbid(unsafe_code)]

//! Render kernel: normalized colors, packed pixels, and pixel buffers.

pub mod buffer;
pub mod color;

pub use buffer::PixelBuffer;
pub use color::{Color, ColorParseError, PackedRgba};
