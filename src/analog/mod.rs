//! Analog-pattern forecasting engine.

/// Public engine facade and lifecycle.
pub mod engine;
/// Two-point linear interpolation.
pub mod mapper;
pub mod metric;
pub mod orchestrator;
/// Ordered observation storage.
pub mod store;
pub mod types;

pub use engine::Engine;
pub use metric::WindowMetric;
pub use store::{Observation, ObservationStore, Origin};
pub use types::{EngineState, ForecastReport, ForecastRequest, WindowConfig};
