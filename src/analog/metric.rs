//! Shape comparison between a candidate window and the projection window.

use crate::diagnostics::Diagnostics;

use super::store::ObservationStore;

/// Similarity of one candidate window to one projection window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMetric {
    /// Lower edge of the candidate window.
    pub candidate_lower: f64,
    /// Point of the candidate window matching the projection's upper edge.
    pub candidate_middle: f64,
    /// Upper edge of the candidate window.
    pub candidate_higher: f64,
    /// Lower edge of the projection window.
    pub projection_lower: f64,
    /// Upper edge of the projection window (the last recorded abscissa).
    pub projection_higher: f64,
    /// Similarity weight; normalized across all windows after the search.
    pub weight: f64,
    /// Ratio of projection to candidate standard deviation.
    pub scale: f64,
    /// Mean of the candidate samples.
    pub candidate_mean: f64,
    /// Mean of the projection samples.
    pub projection_mean: f64,
    /// Population standard deviation of the candidate samples.
    pub candidate_std_dev: f64,
    /// Population standard deviation of the projection samples.
    pub projection_std_dev: f64,
    /// Mean absolute deviation after rescaling the candidate.
    pub dissimilarity: f64,
}

impl WindowMetric {
    /// Compares `[candidate_lower, candidate_middle]` with
    /// `[projection_lower, projection_higher]`, each sampled at
    /// `resolution + 1` evenly spaced abscissas.
    ///
    /// `data_to_projection_ratio` places `candidate_middle` inside the
    /// candidate window. The weight is `exp(-dissimilarity^weight_exponent)`.
    #[expect(clippy::too_many_arguments)]
    pub fn compute(
        store: &ObservationStore,
        candidate_lower: f64,
        candidate_higher: f64,
        data_to_projection_ratio: f64,
        projection_lower: f64,
        projection_higher: f64,
        resolution: usize,
        weight_exponent: f64,
    ) -> Self {
        let candidate_middle =
            candidate_lower + data_to_projection_ratio * (candidate_higher - candidate_lower);

        let candidate_step = (candidate_middle - candidate_lower) / resolution as f64;
        let projection_step = (projection_higher - projection_lower) / resolution as f64;

        let candidate: Vec<f64> = (0..=resolution)
            .map(|i| store.value_at(candidate_lower + candidate_step * i as f64))
            .collect();
        let projection: Vec<f64> = (0..=resolution)
            .map(|i| store.value_at(projection_lower + projection_step * i as f64))
            .collect();

        let candidate_mean = mean(&candidate);
        let projection_mean = mean(&projection);
        let candidate_std_dev = std_dev(&candidate, candidate_mean);
        let projection_std_dev = std_dev(&projection, projection_mean);

        let scale = if candidate_std_dev > 0.0 {
            projection_std_dev / candidate_std_dev
        } else {
            1.0
        };

        let dissimilarity = mean_by(candidate.iter().zip(&projection), |(c, p)| {
            (p - ((c - candidate_mean) * scale + projection_mean)).abs()
        });

        let weight = (-dissimilarity.powf(weight_exponent)).exp();

        Self {
            candidate_lower,
            candidate_middle,
            candidate_higher,
            projection_lower,
            projection_higher,
            weight,
            scale,
            candidate_mean,
            projection_mean,
            candidate_std_dev,
            projection_std_dev,
            dissimilarity,
        }
    }

    /// Maps a forecast abscissa into this candidate window and returns the
    /// rescaled, recentred candidate value (unweighted).
    pub fn project(&self, store: &ObservationStore, x: f64, upper_edge: f64) -> f64 {
        let sample_ratio = (x - self.projection_lower) / (upper_edge - self.projection_lower);
        let candidate_x = self.candidate_lower
            + sample_ratio * (self.candidate_higher - self.candidate_lower);
        (store.value_at(candidate_x) - self.candidate_mean) * self.scale + self.projection_mean
    }

    /// Writes the one-line summary of this comparison.
    pub fn trace(&self, diagnostics: &mut Diagnostics) {
        diagnostics.emit(format_args!(
            "metric: candidate=[{:.6}, {:.6}, {:.6}] projection=[{:.6}, {:.6}] \
             candidate(mean={:.6}, std={:.6}) projection(mean={:.6}, std={:.6}) \
             scale={:.6} difference={:.6} weight={:.6}",
            self.candidate_lower,
            self.candidate_middle,
            self.candidate_higher,
            self.projection_lower,
            self.projection_higher,
            self.candidate_mean,
            self.candidate_std_dev,
            self.projection_mean,
            self.projection_std_dev,
            self.scale,
            self.dissimilarity,
            self.weight,
        ));
    }
}

fn mean(values: &[f64]) -> f64 {
    mean_by(values.iter(), |v| *v)
}

fn mean_by<I, F>(values: I, f: F) -> f64
where
    I: ExactSizeIterator,
    F: FnMut(I::Item) -> f64,
{
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.map(f).sum::<f64>() / n as f64
}

/// Population standard deviation around a precomputed mean.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    mean_by(values.iter(), |v| (v - mean) * (v - mean)).sqrt()
}
