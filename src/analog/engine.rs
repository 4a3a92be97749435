//! Two-phase forecasting engine: collect observations, then extrapolate once.

use crate::diagnostics::{DiagnosticSink, Diagnostics};

use super::orchestrator;
use super::store::{Observation, ObservationStore, Origin};
use super::types::{EngineState, ForecastReport, ForecastRequest, WindowConfig};

/// Analog-pattern forecaster owning its observations and configuration.
///
/// Mutating operations are honoured only while the engine is
/// [`EngineState::Collecting`]; the first successful forecast freezes it.
///
/// # Examples
///
/// ```
/// use analog_forecast::analog::engine::Engine;
///
/// let mut engine = Engine::new();
/// for i in 0..4 {
///     engine.add_observation(i as f64, i as f64);
/// }
/// let report = engine.forecast_by_steps(1.0, 2).expect("forecast runs");
/// assert_eq!(report.points.len(), 2);
/// assert!((engine.value_at(5.0) - 5.0).abs() < 1e-6);
///
/// // Frozen from now on.
/// assert!(!engine.add_observation(10.0, 10.0));
/// assert!(engine.forecast_by_steps(1.0, 2).is_none());
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    store: ObservationStore,
    config: WindowConfig,
    state: EngineState,
    diagnostics: Diagnostics,
}

impl Engine {
    /// Creates an engine with the default 10/10/10 step counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with an explicit window configuration.
    pub fn with_config(config: WindowConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sets the three step counts. Ignored once a forecast has run.
    pub fn configure(&mut self, projection_steps: usize, candidate_steps: usize, metric_steps: usize) {
        if self.is_forecasted() {
            return;
        }
        self.config.projection_steps = projection_steps;
        self.config.candidate_steps = candidate_steps;
        self.config.metric_steps = metric_steps;
        self.diagnostics.emit(format_args!(
            "configure: projection steps = {projection_steps}, candidate steps = {candidate_steps}, metric steps = {metric_steps}"
        ));
    }

    /// Sets the dissimilarity exponent of the weight falloff. Ignored once a
    /// forecast has run.
    pub fn set_weight_exponent(&mut self, weight_exponent: f64) {
        if !self.is_forecasted() {
            self.config.weight_exponent = weight_exponent;
        }
    }

    /// Routes trace lines to `sink`. Ignored once a forecast has run.
    pub fn attach_diagnostic_sink(&mut self, sink: impl DiagnosticSink + 'static) {
        if !self.is_forecasted() {
            self.diagnostics.attach(Box::new(sink));
        }
    }

    /// Records an original observation.
    ///
    /// Returns `false` if `x` is already recorded or the engine is frozen.
    pub fn add_observation(&mut self, x: f64, y: f64) -> bool {
        if self.is_forecasted() {
            self.diagnostics
                .emit(format_args!("insert: ({x:.6}, {y:.6}) rejected, engine is frozen"));
            return false;
        }
        let placement = self.store.place(x, y, Origin::Original);
        self.diagnostics
            .emit(format_args!("insert: ({x:.6}, {y:.6}) {placement}"));
        placement.is_inserted()
    }

    /// Forecasts `steps_count` evenly spaced points up to `upper_edge`.
    ///
    /// Returns `None` (and changes nothing) when the engine is frozen or
    /// empty, `upper_edge` is not finite or does not exceed the last
    /// abscissa, or `steps_count` is zero.
    pub fn forecast_to_edge(&mut self, upper_edge: f64, steps_count: usize) -> Option<ForecastReport> {
        let last_x = self.store.last()?.x;
        if !upper_edge.is_finite() || upper_edge <= last_x || steps_count == 0 {
            return None;
        }
        let step_size = (upper_edge - last_x) / steps_count as f64;
        if !step_size.is_finite() {
            return None;
        }
        self.forecast(ForecastRequest {
            upper_edge,
            step_size,
            steps_count,
        })
    }

    /// Forecasts `steps_count` points spaced `step_size` apart past the last
    /// abscissa.
    ///
    /// Returns `None` (and changes nothing) when the engine is frozen or
    /// empty, `step_size` is not a finite positive value, `steps_count` is
    /// zero, or the resulting horizon is not finite.
    pub fn forecast_by_steps(&mut self, step_size: f64, steps_count: usize) -> Option<ForecastReport> {
        let last_x = self.store.last()?.x;
        if !step_size.is_finite() || step_size <= 0.0 || steps_count == 0 {
            return None;
        }
        let upper_edge = last_x + step_size * steps_count as f64;
        if !upper_edge.is_finite() {
            return None;
        }
        self.forecast(ForecastRequest {
            upper_edge,
            step_size,
            steps_count,
        })
    }

    fn forecast(&mut self, request: ForecastRequest) -> Option<ForecastReport> {
        if self.is_forecasted() {
            return None;
        }
        let report = orchestrator::run(&mut self.store, &self.config, &mut self.diagnostics, request);
        self.state = EngineState::Forecasted;
        Some(report)
    }

    /// Ordinate at `x`, interpolated between recorded (and synthesized) points.
    pub fn value_at(&self, x: f64) -> f64 {
        self.store.value_at(x)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether a forecast has already run.
    pub fn is_forecasted(&self) -> bool {
        self.state == EngineState::Forecasted
    }

    /// Active window configuration.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// All observations in increasing abscissa order.
    pub fn observations(&self) -> &[Observation] {
        self.store.as_slice()
    }

    /// Underlying store.
    pub fn store(&self) -> &ObservationStore {
        &self.store
    }

    /// Number of recorded observations, synthesized ones included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no observation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
