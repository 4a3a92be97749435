//! Deterministic synthetic series used by presets and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::SeriesConfig;

/// Generates `(x, y)` pairs for the configured preset.
///
/// * `linear` - `offset + slope * x`
/// * `sine` - linear trend plus `amplitude * sin(2πx / period)`
/// * `noisy_sine` - `sine` plus Gaussian noise drawn from a seeded RNG
///
/// Unknown presets fall back to `linear`; validate the configuration first.
///
/// # Examples
///
/// ```
/// use analog_forecast::config::SeriesConfig;
/// use analog_forecast::series::generate;
///
/// let cfg = SeriesConfig { points: 3, slope: 2.0, ..SeriesConfig::default() };
/// assert_eq!(generate(&cfg), vec![(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)]);
/// ```
pub fn generate(cfg: &SeriesConfig) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let seasonal = matches!(cfg.preset.as_str(), "sine" | "noisy_sine");
    let noisy = cfg.preset == "noisy_sine";

    (0..cfg.points)
        .map(|i| {
            let x = cfg.start_x + cfg.step_x * i as f64;
            let mut y = cfg.offset + cfg.slope * x;
            if seasonal {
                let angle = 2.0 * std::f64::consts::PI * x / cfg.period;
                y += cfg.amplitude * angle.sin();
            }
            if noisy {
                y += gaussian_noise(&mut rng, cfg.noise_std);
            }
            (x, y)
        })
        .collect()
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sine_cfg() -> SeriesConfig {
        SeriesConfig {
            preset: "sine".to_string(),
            points: 48,
            offset: 10.0,
            slope: 0.0,
            amplitude: 3.0,
            period: 24.0,
            ..SeriesConfig::default()
        }
    }

    #[test]
    fn respects_point_count_and_spacing() {
        let cfg = SeriesConfig {
            points: 5,
            start_x: 10.0,
            step_x: 0.5,
            ..SeriesConfig::default()
        };
        let xs: Vec<f64> = generate(&cfg).iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![10.0, 10.5, 11.0, 11.5, 12.0]);
    }

    #[test]
    fn sine_repeats_every_period() {
        let series = generate(&sine_cfg());
        for i in 0..24 {
            assert_abs_diff_eq!(series[i].1, series[i + 24].1, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(series[6].1, 13.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series[18].1, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn noise_is_seeded() {
        let cfg = SeriesConfig {
            preset: "noisy_sine".to_string(),
            noise_std: 0.5,
            ..sine_cfg()
        };
        assert_eq!(generate(&cfg), generate(&cfg));

        let other = SeriesConfig { seed: 7, ..cfg.clone() };
        assert_ne!(generate(&cfg), generate(&other));
    }

    #[test]
    fn zero_noise_matches_clean_sine() {
        let cfg = SeriesConfig {
            preset: "noisy_sine".to_string(),
            noise_std: 0.0,
            ..sine_cfg()
        };
        assert_eq!(generate(&cfg), generate(&sine_cfg()));
    }

    #[test]
    fn gaussian_noise_zero_std_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(gaussian_noise(&mut rng, 0.0), 0.0);
    }
}
