#![forbid(unsafe_code)]

//! Environment configuration.
//!
//! | Variable             | Values                        | Default  |
//! |----------------------|-------------------------------|----------|
//! | `SKYSPACE_SHAPE`     | `circle`, `rectangle`, `aura` | `circle` |
//! | `SKYSPACE_DITHER`    | float in `[0, 3]`             | preset   |
//! | `SKYSPACE_SPEED`     | float in `[0.0001, 0.005]`    | preset   |
//! | `SKYSPACE_GANZFELD`  | bool (`1/0/true/false/...`)   | `false`  |
//! | `SKYSPACE_CENTER`    | hex color (`#RRGGBB`, `#RGB`) | preset   |
//!
//! Malformed values are reported and the default is kept. Dither and speed
//! outside the control ranges are reported by [`FieldConfig::validate`] but
//! remain usable parameters.

use std::env;
use std::fmt;

use skyspace_render::Color;

use crate::params::{DITHER_RANGE, SPEED_RANGE, ShapeKind};

pub const ENV_SHAPE: &str = "SKYSPACE_SHAPE";
pub const ENV_DITHER: &str = "SKYSPACE_DITHER";
pub const ENV_SPEED: &str = "SKYSPACE_SPEED";
pub const ENV_GANZFELD: &str = "SKYSPACE_GANZFELD";
pub const ENV_CENTER: &str = "SKYSPACE_CENTER";

/// Startup configuration for a [`LightField`](crate::LightField).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldConfig {
    pub shape: ShapeKind,
    /// Overrides the dither strength of every variant.
    pub dither_strength: Option<f64>,
    /// Overrides the animation speed of the periodic variants.
    pub animation_speed: Option<f64>,
    pub ganzfeld: bool,
    /// Overrides the center color of the periodic variants.
    pub center: Option<Color>,
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct FieldConfigParse {
    pub config: FieldConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    pub fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl FieldConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> FieldConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> FieldConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config from an arbitrary key lookup.
    pub fn from_env_with<F>(get: F) -> FieldConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut parsed = Self::parse_env_with(get);
        if let Err(mut validation) = parsed.config.validate() {
            parsed.errors.append(&mut validation);
        }
        parsed
    }

    /// Like [`FieldConfig::from_env_with`] but reports only malformed values,
    /// leaving validation to the caller (e.g. after layering CLI flags).
    pub fn parse_env_with<F>(mut get: F) -> FieldConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = FieldConfig::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_SHAPE) {
            match ShapeKind::parse(&value) {
                Some(parsed) => config.shape = parsed,
                None => errors.push(ConfigError::new(
                    "shape",
                    value,
                    "expected circle|rectangle|aura",
                )),
            }
        }

        if let Some(value) = get(ENV_DITHER) {
            match parse_f64(&value) {
                Some(parsed) => config.dither_strength = Some(parsed),
                None => errors.push(ConfigError::new("dither_strength", value, "expected number")),
            }
        }

        if let Some(value) = get(ENV_SPEED) {
            match parse_f64(&value) {
                Some(parsed) => config.animation_speed = Some(parsed),
                None => errors.push(ConfigError::new("animation_speed", value, "expected number")),
            }
        }

        if let Some(value) = get(ENV_GANZFELD) {
            match parse_bool(&value) {
                Some(parsed) => config.ganzfeld = parsed,
                None => errors.push(ConfigError::new(
                    "ganzfeld",
                    value,
                    "expected bool (1/0/true/false)",
                )),
            }
        }

        if let Some(value) = get(ENV_CENTER) {
            match value.parse::<Color>() {
                Ok(parsed) => config.center = Some(parsed),
                Err(err) => errors.push(ConfigError::new("center", value, err.to_string())),
            }
        }

        FieldConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if let Some(dither) = self.dither_strength {
            validate_range("dither_strength", dither, DITHER_RANGE.into_inner(), &mut errors);
        }
        if let Some(speed) = self.animation_speed {
            validate_range("animation_speed", speed, SPEED_RANGE.into_inner(), &mut errors);
        }
        if self.ganzfeld && self.shape != ShapeKind::Radial {
            errors.push(ConfigError::new(
                "ganzfeld",
                "true",
                format!("ganzfeld requires shape=circle, not {}", self.shape),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Short human-readable summary for status lines.
    #[must_use]
    pub fn summary_short(&self) -> String {
        let ganzfeld = if self.ganzfeld { " · ganzfeld" } else { "" };
        match self.center {
            Some(center) => format!("{}{ganzfeld} · {center}", self.shape),
            None => format!("{}{ganzfeld}", self.shape),
        }
    }
}

#[inline]
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn validate_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
    errors: &mut Vec<ConfigError>,
) {
    if !(min..=max).contains(&value) {
        errors.push(ConfigError::new(
            field,
            value.to_string(),
            format!("must be within [{min}, {max}]"),
        ));
    }
}
