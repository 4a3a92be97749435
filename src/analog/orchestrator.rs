//! Window search, weight normalization, and synthesis of forecast points.

use crate::diagnostics::Diagnostics;

use super::metric::WindowMetric;
use super::store::{ObservationStore, Origin};
use super::types::{ForecastReport, ForecastRequest, WindowConfig};

/// Runs one forecast against `store` and writes the synthesized points back
/// into it.
///
/// The store must be non-empty. Degenerate windows (a margin as wide as the
/// recorded span, a zero metric resolution) are not rejected here and
/// produce NaN ordinates.
pub fn run(
    store: &mut ObservationStore,
    config: &WindowConfig,
    diagnostics: &mut Diagnostics,
    request: ForecastRequest,
) -> ForecastReport {
    let (x_min, x_max) = match (store.first(), store.last()) {
        (Some(first), Some(last)) => (first.x, last.x),
        _ => (0.0, 0.0),
    };
    let upper_edge = request.upper_edge;
    let margin = upper_edge - x_max;

    let usable_span = x_max - margin - x_min;
    let projection_step_size = usable_span / config.projection_steps as f64;
    let candidate_step_size = usable_span / config.candidate_steps as f64;

    // Candidate windows must be at least as wide as the extrapolated gap.
    let higher_candidate_correction = ((margin / candidate_step_size).floor() as i64).saturating_add(1);

    diagnostics.emit(format_args!(
        "forecast: upper projection edge = {:.6}, step size = {:.6}, steps count = {}",
        upper_edge, request.step_size, request.steps_count
    ));
    diagnostics.emit(format_args!(
        "forecast: domain = [{x_min:.6}, {x_max:.6}], margin = {margin:.6}"
    ));
    diagnostics.emit(format_args!(
        "forecast: candidate step size = {candidate_step_size:.6}, projection step size = {projection_step_size:.6}"
    ));

    let mut metrics =
        Vec::with_capacity(config.window_count(higher_candidate_correction).min(1 << 20));
    let candidate_steps = config.candidate_steps as i64;

    for projection_step in 0..config.projection_steps {
        let projection_lower = x_min + projection_step_size * projection_step as f64;
        let data_to_projection_ratio = (x_max - projection_lower) / (upper_edge - projection_lower);

        for lower_step in 0..candidate_steps {
            let candidate_lower = x_min + candidate_step_size * lower_step as f64;

            let first_higher = lower_step.saturating_add(higher_candidate_correction);
            let end_higher = candidate_steps.saturating_add(higher_candidate_correction);
            for higher_step in first_higher..end_higher {
                let candidate_higher = x_min + candidate_step_size * higher_step as f64;
                let metric = WindowMetric::compute(
                    store,
                    candidate_lower,
                    candidate_higher,
                    data_to_projection_ratio,
                    projection_lower,
                    x_max,
                    config.metric_steps,
                    config.weight_exponent,
                );
                metric.trace(diagnostics);
                metrics.push(metric);
            }
        }
    }

    let raw_weight_sum = normalize_weights(&mut metrics);
    if diagnostics.is_enabled() {
        let listing: Vec<String> = metrics
            .iter()
            .filter(|m| m.weight > 0.0)
            .map(|m| format!("{:.6}", m.weight))
            .collect();
        diagnostics.emit(format_args!("forecast: weights: {}", listing.join(" ")));
    }

    let mut points = Vec::new();
    if !metrics.is_empty() {
        for i in 0..request.steps_count {
            let x = upper_edge - request.step_size * i as f64;
            if x <= x_max {
                break;
            }
            let y: f64 = metrics
                .iter()
                .map(|m| m.weight * m.project(store, x, upper_edge))
                .sum();

            let placement = store.place(x, y, Origin::Synthesized);
            diagnostics.emit(format_args!("insert: ({x:.6}, {y:.6}) {placement}"));
            points.push((x, y));
        }
    }

    ForecastReport {
        request,
        x_min,
        x_max,
        margin,
        candidate_step_size,
        projection_step_size,
        higher_candidate_correction,
        metrics,
        raw_weight_sum,
        points,
    }
}

/// Scales weights to sum to one and returns the sum before scaling.
///
/// A zero (or non-positive) sum leaves every weight untouched.
fn normalize_weights(metrics: &mut [WindowMetric]) -> f64 {
    let sum: f64 = metrics.iter().map(|m| m.weight).sum();
    if sum > 0.0 {
        for metric in metrics.iter_mut() {
            metric.weight /= sum;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeriesConfig;
    use approx::assert_abs_diff_eq;

    fn store_of(points: &[(f64, f64)]) -> ObservationStore {
        let mut store = ObservationStore::new();
        for &(x, y) in points {
            store.insert(x, y, Origin::Original);
        }
        store
    }

    fn linear_store() -> ObservationStore {
        store_of(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)])
    }

    fn request(upper_edge: f64, step_size: f64, steps_count: usize) -> ForecastRequest {
        ForecastRequest {
            upper_edge,
            step_size,
            steps_count,
        }
    }

    #[test]
    fn linear_series_continues_its_trend() {
        let mut store = linear_store();
        let report = run(
            &mut store,
            &WindowConfig::default(),
            &mut Diagnostics::none(),
            request(5.0, 1.0, 2),
        );

        assert_eq!(report.points.len(), 2);
        assert_eq!(report.points[0].0, 5.0);
        assert_eq!(report.points[1].0, 4.0);
        assert_abs_diff_eq!(report.points[0].1, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(report.points[1].1, 4.0, epsilon = 1e-6);
        assert_eq!(store.len(), 6);
        assert_abs_diff_eq!(store.value_at(4.0), 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(store.value_at(5.0), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn search_geometry_is_derived_from_margin() {
        let mut store = linear_store();
        let report = run(
            &mut store,
            &WindowConfig::default(),
            &mut Diagnostics::none(),
            request(5.0, 1.0, 2),
        );
        assert_eq!(report.x_min, 0.0);
        assert_eq!(report.x_max, 3.0);
        assert_eq!(report.margin, 2.0);
        assert_abs_diff_eq!(report.candidate_step_size, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(report.projection_step_size, 0.1, epsilon = 1e-12);
        assert!(
            (20..=21).contains(&report.higher_candidate_correction),
            "correction = {}",
            report.higher_candidate_correction
        );
        assert_eq!(
            report.metrics.len(),
            WindowConfig::default().window_count(report.higher_candidate_correction)
        );
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let mut store = store_of(&[
            (0.0, 1.0),
            (1.0, 3.0),
            (2.0, 2.0),
            (3.0, 5.0),
            (4.0, 4.0),
            (5.0, 6.0),
            (6.0, 5.5),
            (7.0, 7.0),
        ]);
        let report = run(
            &mut store,
            &WindowConfig::new(4, 6, 8),
            &mut Diagnostics::none(),
            request(8.0, 0.5, 2),
        );
        assert!(report.raw_weight_sum > 0.0);
        assert_abs_diff_eq!(report.weight_sum(), 1.0, epsilon = 1e-9);
        assert!(report.metrics.iter().all(|m| m.weight >= 0.0));
    }

    #[test]
    fn zero_weight_sum_leaves_weights_untouched() {
        let mut metrics = vec![WindowMetric {
            candidate_lower: 0.0,
            candidate_middle: 0.5,
            candidate_higher: 1.0,
            projection_lower: 0.0,
            projection_higher: 1.0,
            weight: 0.0,
            scale: 1.0,
            candidate_mean: 0.0,
            projection_mean: 0.0,
            candidate_std_dev: 0.0,
            projection_std_dev: 0.0,
            dissimilarity: 100.0,
        }];
        assert_eq!(normalize_weights(&mut metrics), 0.0);
        assert_eq!(metrics[0].weight, 0.0);
    }

    #[test]
    fn all_rejected_windows_synthesize_zeros() {
        // Residuals of order 1e6 drive every exp(-d^2) to zero.
        let series = crate::series::generate(&SeriesConfig {
            preset: "noisy_sine".to_string(),
            points: 48,
            offset: 0.0,
            slope: 0.0,
            amplitude: 0.0,
            noise_std: 1.0e6,
            seed: 3,
            ..SeriesConfig::default()
        });
        let mut store = store_of(&series);
        let report = run(
            &mut store,
            &WindowConfig::default(),
            &mut Diagnostics::none(),
            request(50.0, 1.0, 3),
        );

        assert!(!report.metrics.is_empty());
        assert_eq!(report.raw_weight_sum, 0.0);
        assert!(report.metrics.iter().all(|m| m.weight == 0.0));
        assert_eq!(report.points.len(), 3);
        for &(x, y) in &report.points {
            assert_eq!(y, 0.0, "x = {x}");
        }
        assert_eq!(store.value_at(50.0), 0.0);
    }

    #[test]
    fn points_are_produced_from_the_horizon_down() {
        let mut store = linear_store();
        let report = run(
            &mut store,
            &WindowConfig::new(2, 2, 4),
            &mut Diagnostics::none(),
            request(3.3, 0.1, 3),
        );
        let xs: Vec<f64> = report.points.iter().map(|p| p.0).collect();
        assert_eq!(xs.len(), 3);
        assert!(xs.windows(2).all(|w| w[0] > w[1]));
        assert!(xs.iter().all(|&x| x > 3.0));
    }

    #[test]
    fn synthesized_points_are_tagged() {
        let mut store = linear_store();
        run(
            &mut store,
            &WindowConfig::default(),
            &mut Diagnostics::none(),
            request(5.0, 1.0, 2),
        );
        let synthesized: Vec<f64> = store
            .iter()
            .filter(|p| p.origin == Origin::Synthesized)
            .map(|p| p.x)
            .collect();
        assert_eq!(synthesized, vec![4.0, 5.0]);
    }

    #[test]
    fn zero_projection_steps_synthesizes_nothing() {
        let mut store = linear_store();
        let report = run(
            &mut store,
            &WindowConfig::new(0, 10, 10),
            &mut Diagnostics::none(),
            request(5.0, 1.0, 2),
        );
        assert!(report.metrics.is_empty());
        assert!(report.points.is_empty());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn trace_covers_header_metrics_weights_and_inserts() {
        let sink = crate::diagnostics::MemorySink::new();
        let mut diagnostics = Diagnostics::none();
        diagnostics.attach(Box::new(sink.clone()));

        let mut store = linear_store();
        let report = run(
            &mut store,
            &WindowConfig::new(1, 2, 2),
            &mut diagnostics,
            request(3.5, 0.5, 1),
        );

        let lines = sink.lines();
        assert!(lines[0].starts_with("forecast: upper projection edge"));
        let metric_lines = lines.iter().filter(|l| l.starts_with("metric:")).count();
        assert_eq!(metric_lines, report.metrics.len());
        assert!(lines.iter().any(|l| l.starts_with("forecast: weights:")));
        assert!(lines.iter().any(|l| l.starts_with("insert: (3.500000")));
    }
}
