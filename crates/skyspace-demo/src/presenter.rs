#![forbid(unsafe_code)]

//! Half-block truecolor presenter.
//!
//! A terminal of `cols x rows` cells shows a `cols x (2 * rows)` pixel grid.
//! Every cell is `U+2580 UPPER HALF BLOCK` with the upper pixel as foreground
//! and the lower pixel as background. SGR sequences are emitted only when a
//! color changes, so uniform regions cost one byte triple per cell.

use std::io::{self, Write};

use skyspace_core::Viewport;
use skyspace_render::{PackedRgba, PixelBuffer};

const UPPER_HALF: &str = "\u{2580}";

/// Pixel grid for a terminal of `cols x rows` cells.
#[inline]
pub fn pixel_grid(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols, rows.saturating_mul(2))
}

/// Write `buffer` as half-block cells starting at the top-left corner.
///
/// An odd final pixel row is drawn as if its lower neighbour had the same
/// color.
pub fn encode_half_blocks<W: Write>(buffer: &PixelBuffer, out: &mut W) -> io::Result<()> {
    let mut fg: Option<PackedRgba> = None;
    let mut bg: Option<PackedRgba> = None;
    let cell_rows = buffer.height().div_ceil(2);

    for cell_y in 0..cell_rows {
        let Some(upper) = buffer.row(cell_y * 2) else {
            break;
        };
        let lower = buffer.row(cell_y * 2 + 1).unwrap_or(upper);
        write!(out, "\x1b[{};1H", cell_y + 1)?;
        for (top, bottom) in upper.iter().zip(lower) {
            if fg != Some(*top) {
                write!(out, "\x1b[38;2;{};{};{}m", top.r(), top.g(), top.b())?;
                fg = Some(*top);
            }
            if bg != Some(*bottom) {
                write!(out, "\x1b[48;2;{};{};{}m", bottom.r(), bottom.g(), bottom.b())?;
                bg = Some(*bottom);
            }
            out.write_all(UPPER_HALF.as_bytes())?;
        }
    }
    out.write_all(b"\x1b[0m")
}
