#![forbid(unsafe_code)]

//! Command-line argument parsing for the viewer.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Environment variables (`SKYSPACE_*`) are read first and overridden by
//! explicit flags.

use std::fmt;

use skyspace_fx::{ConfigError, FieldConfig, ShapeKind};
use skyspace_render::Color;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
skyspace: light-and-space color fields in the terminal

USAGE:
    skyspace-demo [OPTIONS]

OPTIONS:
    --shape=SHAPE        Field shape: circle (default), rectangle, aura
    --dither=N           Dither strength in [0, 3]
    --speed=N            Animation speed in [0.0001, 0.005]
    --center=#RRGGBB     Center color of the circle and rectangle
    --ganzfeld           Start in Ganzfeld mode (circle only)
    --exit-after-ms=N    Quit after N milliseconds (0 = never)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    1 / 2 / 3       Circle / rectangle / aura
    g               Toggle Ganzfeld mode
    q / Esc         Quit

ENVIRONMENT VARIABLES (flags take precedence):
    SKYSPACE_SHAPE        Default for --shape
    SKYSPACE_DITHER       Default for --dither
    SKYSPACE_SPEED        Default for --speed
    SKYSPACE_CENTER       Default for --center
    SKYSPACE_GANZFELD     Default for --ganzfeld (1/0/true/false)
    SKYSPACE_LOG          Log filter (e.g. debug, skyspace_fx=trace)
    SKYSPACE_LOG_FILE     Log file path (default: skyspace.log)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Opts {
    pub shape: Option<ShapeKind>,
    pub dither_strength: Option<f64>,
    pub animation_speed: Option<f64>,
    pub center: Option<Color>,
    pub ganzfeld: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

/// What the binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Argument errors. All are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    UnknownArgument(String),
    InvalidValue { flag: &'static str, value: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse arguments (without the program name).
    pub fn parse_from<I, S>(args: I) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = Self::default();
        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--ganzfeld" => opts.ganzfeld = true,
                other => {
                    if let Some(val) = other.strip_prefix("--shape=") {
                        opts.shape = Some(
                            ShapeKind::parse(val).ok_or_else(|| invalid("--shape", val))?,
                        );
                    } else if let Some(val) = other.strip_prefix("--dither=") {
                        opts.dither_strength = Some(parse_number("--dither", val)?);
                    } else if let Some(val) = other.strip_prefix("--speed=") {
                        opts.animation_speed = Some(parse_number("--speed", val)?);
                    } else if let Some(val) = other.strip_prefix("--center=") {
                        opts.center = Some(
                            Color::parse_hex(val).map_err(|_| invalid("--center", val))?,
                        );
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms =
                            val.parse().map_err(|_| invalid("--exit-after-ms", val))?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }
        Ok(Command::Run(opts))
    }

    /// Layer these flags over an environment-derived config.
    pub fn apply(&self, config: &mut FieldConfig) {
        if let Some(shape) = self.shape {
            config.shape = shape;
        }
        if self.dither_strength.is_some() {
            config.dither_strength = self.dither_strength;
        }
        if self.animation_speed.is_some() {
            config.animation_speed = self.animation_speed;
        }
        if self.center.is_some() {
            config.center = self.center;
        }
        if self.ganzfeld {
            config.ganzfeld = true;
        }
    }

    /// Environment config with these flags applied, plus every diagnostic:
    /// env parse errors first, then validation of the merged result.
    pub fn resolve_config<F>(&self, get: F) -> (FieldConfig, Vec<ConfigError>)
    where
        F: FnMut(&str) -> Option<String>,
    {
        let parsed = FieldConfig::parse_env_with(get);
        let mut config = parsed.config;
        let mut errors = parsed.errors;
        self.apply(&mut config);
        if let Err(mut validation) = config.validate() {
            errors.append(&mut validation);
        }
        (config, errors)
    }
}

pub fn version_line() -> String {
    format!("skyspace-demo {VERSION}")
}

fn invalid(flag: &'static str, value: &str) -> CliError {
    CliError::InvalidValue {
        flag,
        value: value.to_string(),
    }
}

fn parse_number(flag: &'static str, value: &str) -> Result<f64, CliError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(flag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Opts {
        match Opts::parse_from(args) {
            Ok(Command::Run(opts)) => opts,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = run(&[]);
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.exit_after_ms, 0);
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
        assert!(version_line().starts_with("skyspace-demo "));
    }

    #[test]
    fn help_text_lists_shapes() {
        for shape in ShapeKind::ALL {
            assert!(HELP_TEXT.contains(shape.as_str()));
        }
        assert!(HELP_TEXT.contains("SKYSPACE_SHAPE        Default for --shape"));
        assert!(!HELP_TEXT.contains("Override"));
    }

    #[test]
    fn flags_parse() {
        let opts = run(&[
            "--shape=aura",
            "--dither=0.5",
            "--speed=0.002",
            "--ganzfeld",
            "--center=#fa0",
            "--exit-after-ms=250",
        ]);
        assert_eq!(opts.shape, Some(ShapeKind::Flood));
        assert_eq!(opts.dither_strength, Some(0.5));
        assert_eq!(opts.animation_speed, Some(0.002));
        assert!(opts.ganzfeld);
        assert_eq!(opts.center, Some(Color::from_hex(0xFFAA00)));
        assert_eq!(opts.exit_after_ms, 250);
    }

    #[test]
    fn help_and_version_stop_parsing() {
        assert_eq!(
            Opts::parse_from(["--bogus=1", "-h"]),
            Err(CliError::UnknownArgument("--bogus=1".into()))
        );
        assert_eq!(Opts::parse_from(["--dither=1", "--help"]), Ok(Command::Help));
        assert_eq!(Opts::parse_from(["-h"]), Ok(Command::Help));
        assert_eq!(Opts::parse_from(["--version"]), Ok(Command::Version));
    }

    #[test]
    fn bad_values_are_errors() {
        assert_eq!(
            Opts::parse_from(["--dither=NaN"]),
            Err(CliError::InvalidValue {
                flag: "--dither",
                value: "NaN".into()
            })
        );
        let err = Opts::parse_from(["--shape=hexagon"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid --shape value: hexagon");
        assert_eq!(
            Opts::parse_from(["--center=blue"]),
            Err(CliError::InvalidValue {
                flag: "--center",
                value: "blue".into()
            })
        );
        assert!(matches!(
            Opts::parse_from(["--exit-after-ms=-1"]),
            Err(CliError::InvalidValue { .. })
        ));
    }

    #[test]
    fn flags_override_env() {
        let opts = run(&["--shape=rectangle", "--dither=2"]);
        let env = |key: &str| match key {
            "SKYSPACE_SHAPE" => Some("aura".to_string()),
            "SKYSPACE_DITHER" => Some("1".to_string()),
            "SKYSPACE_SPEED" => Some("0.001".to_string()),
            _ => None,
        };
        let (config, errors) = opts.resolve_config(env);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(config.shape, ShapeKind::Rectangular);
        assert_eq!(config.dither_strength, Some(2.0));
        assert_eq!(config.animation_speed, Some(0.001));
    }

    #[test]
    fn merged_config_is_validated_once() {
        let opts = run(&["--shape=circle"]);
        let env = |key: &str| match key {
            "SKYSPACE_SHAPE" => Some("aura".to_string()),
            "SKYSPACE_GANZFELD" => Some("1".to_string()),
            "SKYSPACE_SPEED" => Some("9".to_string()),
            _ => None,
        };
        let (config, errors) = opts.resolve_config(env);
        assert!(config.ganzfeld);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(errors[0].field, "animation_speed");
    }
}
