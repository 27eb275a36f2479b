#![forbid(unsafe_code)]

//! Color types.
//!
//! Two representations live side by side:
//!
//! - [`Color`]: normalized floating-point RGB used by every field computation.
//!   Channels are nominally in `[0.0, 1.0]`; intermediate values (dithering,
//!   extrapolated blends) may step slightly outside and are only clamped when
//!   packed for display.
//! - [`PackedRgba`]: 8-bit straight-alpha RGBA packed into a `u32`, the pixel
//!   format handed to display collaborators.

use std::fmt;
use std::str::FromStr;

/// A 32-bit color: `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// `(r, g, b)` as a tuple, alpha dropped.
    #[inline]
    pub const fn to_rgb8(self) -> (u8, u8, u8) {
        (self.r(), self.g(), self.b())
    }
}

/// Normalized RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Gray with all channels equal to `v`.
    #[inline]
    pub const fn gray(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// From 8-bit channels.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// From a `0xRRGGBB` literal, e.g. `Color::from_hex(0x3060FF)`.
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`.
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        let mut nibbles = [0u8; 6];
        let count = digits.chars().count();
        if count != 3 && count != 6 {
            return Err(ColorParseError::InvalidLength { len: count });
        }
        for (index, ch) in digits.chars().enumerate() {
            let value = ch
                .to_digit(16)
                .ok_or(ColorParseError::InvalidDigit { index, ch })?;
            nibbles[index] = value as u8;
        }

        let (r, g, b) = if count == 3 {
            (nibbles[0] * 17, nibbles[1] * 17, nibbles[2] * 17)
        } else {
            (
                (nibbles[0] << 4) | nibbles[1],
                (nibbles[2] << 4) | nibbles[3],
                (nibbles[4] << 4) | nibbles[5],
            )
        };
        Ok(Self::from_rgb8(r, g, b))
    }

    /// Linear interpolation: `self + (other - self) * t`.
    ///
    /// `t` is not clamped, matching GLSL `mix`.
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Add `delta` to every channel.
    #[inline]
    pub fn offset(self, delta: f64) -> Self {
        Self::new(self.r + delta, self.g + delta, self.b + delta)
    }

    /// Clamp every channel into `[0.0, 1.0]`. NaN channels become 0.
    #[inline]
    pub fn clamped(self) -> Self {
        fn c(v: f64) -> f64 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }
        Self::new(c(self.r), c(self.g), c(self.b))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Whether every channel is finite and within `[0.0, 1.0]`.
    #[inline]
    pub fn is_normalized(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }

    /// Largest absolute per-channel difference.
    #[inline]
    pub fn max_channel_delta(self, other: Self) -> f64 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }

    /// Quantize to an opaque 8-bit pixel (clamped, rounded).
    #[inline]
    pub fn to_packed(self) -> PackedRgba {
        let c = self.clamped();
        PackedRgba::rgb(
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        )
    }

    /// `#RRGGBB` form of the quantized color.
    pub fn to_hex_string(self) -> String {
        let (r, g, b) = self.to_packed().to_rgb8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

impl From<PackedRgba> for Color {
    fn from(color: PackedRgba) -> Self {
        Self::from_rgb8(color.r(), color.g(), color.b())
    }
}

impl From<Color> for PackedRgba {
    fn from(color: Color) -> Self {
        color.to_packed()
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

/// Failure to parse a hex color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    /// Digit count (after an optional `#`) was not 3 or 6.
    InvalidLength { len: usize },
    /// A character was not a hexadecimal digit.
    InvalidDigit { index: usize, ch: char },
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { len } => {
                write!(f, "expected 3 or 6 hex digits, found {len}")
            }
            Self::InvalidDigit { index, ch } => {
                write!(f, "invalid hex digit {ch:?} at position {index}")
            }
        }
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_channels_round_trip() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(PackedRgba::rgb(9, 8, 7).a(), 255);
    }

    #[test]
    fn parse_six_digit_hex() {
        let c: Color = "#3060FF".parse().unwrap();
        assert_eq!(c, Color::from_rgb8(0x30, 0x60, 0xFF));
        assert_eq!(c, Color::from_hex(0x3060FF));
    }

    #[test]
    fn parse_three_digit_hex_and_no_prefix() {
        assert_eq!(Color::parse_hex("fff").unwrap(), Color::WHITE);
        assert_eq!(
            Color::parse_hex("C0C0C0").unwrap(),
            Color::from_rgb8(0xC0, 0xC0, 0xC0)
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            Color::parse_hex("#12345"),
            Err(ColorParseError::InvalidLength { len: 5 })
        );
        assert_eq!(
            Color::parse_hex("#12G456"),
            Err(ColorParseError::InvalidDigit { index: 2, ch: 'G' })
        );
        assert_eq!(
            Color::parse_hex(""),
            Err(ColorParseError::InvalidLength { len: 0 })
        );
    }

    #[test]
    fn hex_string_round_trips_through_packed() {
        let c = Color::from_hex(0xD050A0);
        assert_eq!(c.to_hex_string(), "#D050A0");
        assert_eq!(c.to_string(), "#D050A0");
        assert_eq!(Color::from(c.to_packed()), c);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Color::new(0.0, 0.0, 1.0);
        let b = Color::new(0.0, 1.0, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn to_packed_clamps_out_of_range_and_nan() {
        let c = Color::new(-0.2, 1.4, f64::NAN).to_packed();
        assert_eq!(c, PackedRgba::rgb(0, 255, 0));
    }

    #[test]
    fn offset_shifts_every_channel() {
        let c = Color::gray(0.5).offset(0.1);
        assert!(c.max_channel_delta(Color::gray(0.6)) < 1e-12);
    }
}
