//! Engine configuration, lifecycle state, and forecast results.

use std::fmt;

use super::metric::WindowMetric;

/// Step counts that drive the window search.
///
/// # Examples
///
/// ```
/// use analog_forecast::analog::types::WindowConfig;
///
/// let cfg = WindowConfig::default();
/// assert_eq!(cfg.projection_steps, 10);
/// assert_eq!(cfg.candidate_steps, 10);
/// assert_eq!(cfg.metric_steps, 10);
/// assert_eq!(cfg.weight_exponent, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    /// Number of lower-edge positions tried for the projection window.
    pub projection_steps: usize,
    /// Grid resolution for candidate window edges.
    pub candidate_steps: usize,
    /// Sampling resolution of each window comparison.
    pub metric_steps: usize,
    /// Exponent applied to the dissimilarity before the Gaussian falloff.
    pub weight_exponent: f64,
}

impl WindowConfig {
    /// Creates a configuration with the default weight exponent.
    pub fn new(projection_steps: usize, candidate_steps: usize, metric_steps: usize) -> Self {
        Self {
            projection_steps,
            candidate_steps,
            metric_steps,
            ..Self::default()
        }
    }

    /// Number of window comparisons one forecast performs for a given
    /// higher-edge correction.
    pub fn window_count(&self, higher_candidate_correction: i64) -> usize {
        let per_projection: usize = (0..self.candidate_steps)
            .map(|lower| {
                let start = (lower as i64).saturating_add(higher_candidate_correction);
                let end = (self.candidate_steps as i64).saturating_add(higher_candidate_correction);
                end.saturating_sub(start).max(0) as usize
            })
            .sum();
        per_projection * self.projection_steps
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            projection_steps: 10,
            candidate_steps: 10,
            metric_steps: 10,
            weight_exponent: 2.0,
        }
    }
}

/// Lifecycle of an engine: collect observations, then extrapolate once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Accepting observations and configuration.
    #[default]
    Collecting,
    /// A forecast has run; the engine is frozen.
    Forecasted,
}

/// Resolved forecast horizon handed to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRequest {
    /// Abscissa of the furthest synthesized point.
    pub upper_edge: f64,
    /// Distance between synthesized points.
    pub step_size: f64,
    /// Maximum number of synthesized points.
    pub steps_count: usize,
}

/// Everything one forecast computed.
#[derive(Debug, Clone)]
pub struct ForecastReport {
    /// The horizon that was forecast.
    pub request: ForecastRequest,
    /// Smallest recorded abscissa before the forecast.
    pub x_min: f64,
    /// Largest recorded abscissa before the forecast.
    pub x_max: f64,
    /// Gap between `x_max` and the horizon.
    pub margin: f64,
    /// Grid spacing of candidate window edges.
    pub candidate_step_size: f64,
    /// Grid spacing of projection lower edges.
    pub projection_step_size: f64,
    /// Minimum candidate width, in candidate steps.
    pub higher_candidate_correction: i64,
    /// Every evaluated window pair, with normalized weights.
    pub metrics: Vec<WindowMetric>,
    /// Sum of the weights before normalization.
    pub raw_weight_sum: f64,
    /// Synthesized points in the order they were produced (horizon first).
    pub points: Vec<(f64, f64)>,
}

impl ForecastReport {
    /// Sum of the normalized weights (1.0 unless every window was rejected).
    pub fn weight_sum(&self) -> f64 {
        self.metrics.iter().map(|m| m.weight).sum()
    }

    /// The window pair with the largest weight.
    pub fn best_metric(&self) -> Option<&WindowMetric> {
        self.metrics
            .iter()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
    }
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "domain=[{:.4}, {:.4}] horizon={:.4} step={:.4} | windows={} raw_weight={:.6} | points={}",
            self.x_min,
            self.x_max,
            self.request.upper_edge,
            self.request.step_size,
            self.metrics.len(),
            self.raw_weight_sum,
            self.points.len(),
        )?;
        if let Some(best) = self.best_metric() {
            write!(
                f,
                " | best candidate=[{:.4}, {:.4}] projection=[{:.4}, {:.4}] weight={:.6}",
                best.candidate_lower,
                best.candidate_higher,
                best.projection_lower,
                best.projection_higher,
                best.weight,
            )?;
        }
        Ok(())
    }
}
