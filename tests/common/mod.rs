//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use analog_forecast::analog::Engine;
use analog_forecast::config::SeriesConfig;
use analog_forecast::series;

/// The four-point line `(0,0)..(3,3)`.
pub fn linear_points() -> Vec<(f64, f64)> {
    (0..4).map(|i| (i as f64, i as f64)).collect()
}

/// Four clean cycles of a period-24 sine around 10 (amplitude 3).
pub fn seasonal_points() -> Vec<(f64, f64)> {
    series::generate(&SeriesConfig {
        preset: "sine".to_string(),
        points: 96,
        offset: 10.0,
        slope: 0.0,
        amplitude: 3.0,
        period: 24.0,
        ..SeriesConfig::default()
    })
}

/// Engine with default step counts fed with `points`.
pub fn engine_with(points: &[(f64, f64)]) -> Engine {
    let mut engine = Engine::new();
    for &(x, y) in points {
        engine.add_observation(x, y);
    }
    engine
}
