//! TOML-based forecast configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::analog::WindowConfig;

/// Top-level forecast configuration parsed from TOML.
///
/// All sections have defaults matching the baseline run. Load from TOML with
/// [`ForecastConfig::from_toml_file`] or use [`ForecastConfig::baseline`] for
/// the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    /// Window search resolution.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Forecast horizon.
    #[serde(default)]
    pub forecast: HorizonConfig,
    /// Synthetic input series, used when no CSV series is supplied.
    #[serde(default)]
    pub series: SeriesConfig,
    /// Trace output.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Window search resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Projection lower-edge positions (must be > 0).
    pub projection_steps: usize,
    /// Candidate edge grid resolution (must be > 0).
    pub candidate_steps: usize,
    /// Samples per window comparison (must be > 0).
    pub metric_steps: usize,
    /// Dissimilarity exponent of the weight falloff (must be > 0).
    pub weight_exponent: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let window = WindowConfig::default();
        Self {
            projection_steps: window.projection_steps,
            candidate_steps: window.candidate_steps,
            metric_steps: window.metric_steps,
            weight_exponent: window.weight_exponent,
        }
    }
}

impl EngineConfig {
    /// Window configuration handed to the engine.
    pub fn window(&self) -> WindowConfig {
        WindowConfig {
            projection_steps: self.projection_steps,
            candidate_steps: self.candidate_steps,
            metric_steps: self.metric_steps,
            weight_exponent: self.weight_exponent,
        }
    }
}

/// Forecast horizon.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HorizonConfig {
    /// `"steps"` (fixed step size) or `"edge"` (fixed upper edge).
    pub mode: String,
    /// Spacing of forecast points in steps mode.
    pub step_size: f64,
    /// Number of forecast points.
    pub steps_count: usize,
    /// Forecast horizon in edge mode.
    pub upper_edge: Option<f64>,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            mode: "steps".to_string(),
            step_size: 1.0,
            steps_count: 10,
            upper_edge: None,
        }
    }
}

/// Synthetic series parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeriesConfig {
    /// `"linear"`, `"sine"` or `"noisy_sine"`.
    pub preset: String,
    /// Number of generated points (must be >= 2).
    pub points: usize,
    /// Abscissa of the first point.
    pub start_x: f64,
    /// Abscissa spacing (must be > 0).
    pub step_x: f64,
    /// Constant level.
    pub offset: f64,
    /// Linear trend per unit of x.
    pub slope: f64,
    /// Sine amplitude.
    pub amplitude: f64,
    /// Sine period in units of x (must be > 0).
    pub period: f64,
    /// Gaussian noise standard deviation for `noisy_sine` (must be >= 0).
    pub noise_std: f64,
    /// Noise seed.
    pub seed: u64,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            preset: "linear".to_string(),
            points: 48,
            start_x: 0.0,
            step_x: 1.0,
            offset: 0.0,
            slope: 1.0,
            amplitude: 0.0,
            period: 24.0,
            noise_std: 0.0,
            seed: 42,
        }
    }
}

/// Trace output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Forward engine trace lines to the log at `DEBUG` level.
    pub trace: bool,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"engine.metric_steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ForecastConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "seasonal", "noisy_seasonal"];

    /// Known series generators.
    pub const SERIES_PRESETS: &[&str] = &["linear", "sine", "noisy_sine"];

    /// Returns the baseline configuration: a straight line extended by ten steps.
    pub fn baseline() -> Self {
        Self {
            engine: EngineConfig::default(),
            forecast: HorizonConfig::default(),
            series: SeriesConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    /// Returns the seasonal preset: four clean daily cycles, one day ahead.
    pub fn seasonal() -> Self {
        Self {
            forecast: HorizonConfig {
                steps_count: 24,
                ..HorizonConfig::default()
            },
            series: SeriesConfig {
                preset: "sine".to_string(),
                points: 96,
                offset: 10.0,
                slope: 0.0,
                amplitude: 3.0,
                period: 24.0,
                ..SeriesConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the noisy-seasonal preset: trending cycles with Gaussian noise,
    /// forecast to a fixed horizon with a finer window search.
    pub fn noisy_seasonal() -> Self {
        Self {
            engine: EngineConfig {
                projection_steps: 12,
                candidate_steps: 16,
                metric_steps: 24,
                ..EngineConfig::default()
            },
            forecast: HorizonConfig {
                mode: "edge".to_string(),
                steps_count: 12,
                upper_edge: Some(107.0),
                ..HorizonConfig::default()
            },
            series: SeriesConfig {
                preset: "noisy_sine".to_string(),
                points: 96,
                offset: 5.0,
                slope: 0.05,
                amplitude: 2.0,
                period: 24.0,
                noise_std: 0.2,
                ..SeriesConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "seasonal" => Ok(Self::seasonal()),
            "noisy_seasonal" => Ok(Self::noisy_seasonal()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let e = &self.engine;
        for (field, value) in [
            ("engine.projection_steps", e.projection_steps),
            ("engine.candidate_steps", e.candidate_steps),
            ("engine.metric_steps", e.metric_steps),
        ] {
            if value == 0 {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }
        if !is_positive(e.weight_exponent) {
            errors.push(ConfigError::new("engine.weight_exponent", "must be finite and > 0"));
        }

        let h = &self.forecast;
        match h.mode.as_str() {
            "steps" => {
                if !is_positive(h.step_size) {
                    errors.push(ConfigError::new("forecast.step_size", "must be finite and > 0"));
                }
            }
            "edge" => {
                match h.upper_edge {
                    None => errors.push(ConfigError::new(
                        "forecast.upper_edge",
                        "required when forecast.mode = \"edge\"",
                    )),
                    Some(edge) if !edge.is_finite() => {
                        errors.push(ConfigError::new("forecast.upper_edge", "must be finite"));
                    }
                    Some(_) => {}
                }
            }
            other => errors.push(ConfigError::new(
                "forecast.mode",
                format!("must be \"steps\" or \"edge\", got \"{other}\""),
            )),
        }
        if h.steps_count == 0 {
            errors.push(ConfigError::new("forecast.steps_count", "must be > 0"));
        }

        let s = &self.series;
        if !Self::SERIES_PRESETS.contains(&s.preset.as_str()) {
            errors.push(ConfigError::new(
                "series.preset",
                format!(
                    "must be one of {}, got \"{}\"",
                    Self::SERIES_PRESETS.join(", "),
                    s.preset
                ),
            ));
        }
        if s.points < 2 {
            errors.push(ConfigError::new("series.points", "must be >= 2"));
        }
        if !is_positive(s.step_x) {
            errors.push(ConfigError::new("series.step_x", "must be finite and > 0"));
        }
        if !is_positive(s.period) {
            errors.push(ConfigError::new("series.period", "must be finite and > 0"));
        }
        if !s.noise_std.is_finite() || s.noise_std < 0.0 {
            errors.push(ConfigError::new("series.noise_std", "must be finite and >= 0"));
        }
        for (field, value) in [
            ("series.start_x", s.start_x),
            ("series.offset", s.offset),
            ("series.slope", s.slope),
            ("series.amplitude", s.amplitude),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be finite"));
            }
        }

        errors
    }
}

/// `true` only for finite values above zero.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
