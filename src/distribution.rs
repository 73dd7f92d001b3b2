//! Kernel-density probability modeling
//!
//! Fits a Gaussian KDE over a metric's observations and derives a
//! deterministic 100-point density curve plus summary moments. Bandwidth
//! follows Scott's rule, `h = s * n^(-1/5)` with `s` the sample (N-1)
//! standard deviation, fixed so repeated runs over the same data reproduce
//! the same curve bit-for-bit.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::stats;

/// Number of evaluation points for the density curve
const GRID_POINTS: usize = 100;

/// Gaussian kernel density estimator with an explicit fit state.
///
/// Evaluating before [`GaussianKde::fit`] fails with `NotFitted`; fitting
/// rejects samples that cannot carry a bandwidth (fewer than two points or
/// zero spread).
#[derive(Debug, Clone, Default)]
pub struct GaussianKde {
    state: KdeState,
}

#[derive(Debug, Clone, Default)]
enum KdeState {
    #[default]
    Unfit,
    Fit {
        samples: Vec<f64>,
        bandwidth: f64,
    },
}

impl GaussianKde {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the estimator over `samples` using Scott's rule bandwidth.
    pub fn fit(&mut self, samples: &[f64]) -> Result<()> {
        if samples.len() < 2 {
            return Err(AnalyticsError::invalid(format!(
                "KDE requires at least 2 samples, got {}",
                samples.len()
            )));
        }
        let s = stats::sample_std(samples);
        if s == 0.0 {
            return Err(AnalyticsError::invalid(
                "KDE bandwidth is zero: sample has no spread",
            ));
        }
        let bandwidth = s * (samples.len() as f64).powf(-0.2);
        debug!(n = samples.len(), bandwidth, "KDE fitted");
        self.state = KdeState::Fit {
            samples: samples.to_vec(),
            bandwidth,
        };
        Ok(())
    }

    pub fn is_fit(&self) -> bool {
        matches!(self.state, KdeState::Fit { .. })
    }

    /// Density estimate at a single point.
    pub fn evaluate(&self, x: f64) -> Result<f64> {
        match &self.state {
            KdeState::Unfit => Err(AnalyticsError::NotFitted { transform: "kde" }),
            KdeState::Fit { samples, bandwidth } => {
                let n = samples.len() as f64;
                let sum: f64 = samples
                    .iter()
                    .map(|xi| stats::normal_pdf((x - xi) / bandwidth, 0.0, 1.0))
                    .sum();
                Ok(sum / (n * bandwidth))
            }
        }
    }

    /// Density estimates over a grid of points.
    pub fn evaluate_grid(&self, grid: &[f64]) -> Result<Vec<f64>> {
        grid.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Summary of a metric's estimated probability distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Inclusive support range [min, max] of the raw sample
    pub support: (f64, f64),
    /// 100 evenly spaced evaluation points spanning the support
    pub grid: Vec<f64>,
    /// KDE density at each grid point
    pub density: Vec<f64>,
    pub mean: f64,
    pub median: f64,
    /// Most frequent exact value; ties broken by first occurrence
    pub mode: f64,
    /// Sample (N-1) standard deviation
    pub std_dev: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// Outcome of a distribution estimate: degenerate inputs produce a sentinel
/// status rather than an error so batch pipelines can skip them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DistributionEstimate {
    InsufficientData,
    Estimated(DistributionSummary),
}

impl DistributionEstimate {
    pub fn summary(&self) -> Option<&DistributionSummary> {
        match self {
            DistributionEstimate::Estimated(s) => Some(s),
            DistributionEstimate::InsufficientData => None,
        }
    }
}

/// Builds continuous probability models over metric samples
#[derive(Debug, Clone, Default)]
pub struct DistributionEstimator;

impl DistributionEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the probability distribution of `samples`.
    ///
    /// Empty, single-point, and zero-spread samples cannot carry a KDE
    /// bandwidth and return [`DistributionEstimate::InsufficientData`].
    pub fn estimate(&self, samples: &[f64]) -> DistributionEstimate {
        let mut kde = GaussianKde::new();
        if kde.fit(samples).is_err() {
            return DistributionEstimate::InsufficientData;
        }

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let step = (max - min) / (GRID_POINTS - 1) as f64;
        let grid: Vec<f64> = (0..GRID_POINTS).map(|i| min + step * i as f64).collect();
        // fit() succeeded, so the grid is valid and evaluation cannot fail
        let density = kde.evaluate_grid(&grid).unwrap_or_default();

        DistributionEstimate::Estimated(DistributionSummary {
            support: (min, max),
            grid,
            density,
            mean: stats::mean(samples),
            median: stats::median(samples),
            mode: mode_first_occurrence(samples),
            std_dev: stats::sample_std(samples),
            skewness: stats::skewness(samples),
            kurtosis: stats::kurtosis(samples),
        })
    }
}

/// Most frequent exact value; ties broken by earliest first occurrence.
fn mode_first_occurrence(samples: &[f64]) -> f64 {
    let mut counts: HashMap<OrderedFloat<f64>, (usize, usize)> = HashMap::new();
    for (i, &x) in samples.iter().enumerate() {
        let entry = counts.entry(OrderedFloat(x)).or_insert((0, i));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .min_by_key(|(_, (count, first))| (std::cmp::Reverse(*count), *first))
        .map(|(value, _)| value.into_inner())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample_is_insufficient() {
        let estimate = DistributionEstimator::new().estimate(&[]);
        assert!(matches!(estimate, DistributionEstimate::InsufficientData));
    }

    #[test]
    fn test_constant_sample_is_insufficient() {
        let estimate = DistributionEstimator::new().estimate(&[4.0, 4.0, 4.0]);
        assert!(matches!(estimate, DistributionEstimate::InsufficientData));
    }

    #[test]
    fn test_grid_is_deterministic_and_inclusive() {
        let samples = [10.0, 12.0, 14.0, 16.0, 20.0];
        let estimate = DistributionEstimator::new().estimate(&samples);
        let summary = estimate.summary().expect("should estimate");

        assert_eq!(summary.grid.len(), 100);
        assert_eq!(summary.density.len(), 100);
        assert_eq!(summary.grid[0], 10.0);
        assert!((summary.grid[99] - 20.0).abs() < 1e-9);
        assert_eq!(summary.support, (10.0, 20.0));

        // same input, same curve
        let again = DistributionEstimator::new().estimate(&samples);
        assert_eq!(again.summary().unwrap().density, summary.density);
    }

    #[test]
    fn test_density_is_positive_and_peaks_near_mass() {
        // mass concentrated around 5
        let samples = [4.8, 4.9, 5.0, 5.0, 5.1, 5.2, 9.0];
        let estimate = DistributionEstimator::new().estimate(&samples);
        let summary = estimate.summary().unwrap();

        assert!(summary.density.iter().all(|&d| d > 0.0));
        let peak_idx = summary
            .density
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(
            summary.grid[peak_idx] < 6.0,
            "peak at {} should be near the cluster",
            summary.grid[peak_idx]
        );
    }

    #[test]
    fn test_moments_from_raw_samples() {
        let samples = [1.0, 2.0, 2.0, 3.0, 10.0];
        let summary = DistributionEstimator::new()
            .estimate(&samples)
            .summary()
            .cloned()
            .unwrap();

        assert!((summary.mean - 3.6).abs() < 1e-12);
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.mode, 2.0);
        assert!(summary.skewness > 0.0, "right-tailed sample");
    }

    #[test]
    fn test_mode_tie_broken_by_first_occurrence() {
        // 7.0 and 3.0 both appear twice; 7.0 appears first
        let samples = [7.0, 3.0, 7.0, 3.0, 1.0];
        let summary = DistributionEstimator::new()
            .estimate(&samples)
            .summary()
            .cloned()
            .unwrap();
        assert_eq!(summary.mode, 7.0);
    }

    #[test]
    fn test_kde_not_fitted_fails() {
        let kde = GaussianKde::new();
        let err = kde.evaluate(1.0).unwrap_err();
        assert!(matches!(err, AnalyticsError::NotFitted { transform: "kde" }));
    }

    #[test]
    fn test_kde_density_integrates_to_one() {
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut kde = GaussianKde::new();
        kde.fit(&samples).unwrap();

        // trapezoid rule over a wide grid
        let lo = -10.0;
        let hi = 16.0;
        let n = 2000;
        let step = (hi - lo) / n as f64;
        let mut integral = 0.0;
        let mut prev = kde.evaluate(lo).unwrap();
        for i in 1..=n {
            let cur = kde.evaluate(lo + step * i as f64).unwrap();
            integral += 0.5 * (prev + cur) * step;
            prev = cur;
        }
        assert!(
            (integral - 1.0).abs() < 1e-3,
            "density should integrate to ~1, got {integral}"
        );
    }
}
