//! Z-score outlier detection
//!
//! Standardizes a metric sample against its own population mean/std and
//! flags points whose |z| exceeds the inverse-normal threshold for the
//! requested confidence percentile.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::stats;

/// A single flagged observation, with its position in the input sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierPoint {
    pub index: usize,
    pub value: f64,
    pub z_score: f64,
}

/// Outcome of a z-score scan over one metric sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierResult {
    pub mean: f64,
    pub std_dev: f64,
    /// Z-score for every input point, in input order
    pub z_scores: Vec<f64>,
    /// Points with |z| above the threshold
    pub outliers: Vec<OutlierPoint>,
}

impl OutlierResult {
    fn empty() -> Self {
        Self {
            mean: 0.0,
            std_dev: 0.0,
            z_scores: Vec::new(),
            outliers: Vec::new(),
        }
    }
}

/// Flags statistical outliers in a numeric sample
#[derive(Debug, Clone)]
pub struct OutlierDetector {
    /// Confidence percentile defining the |z| threshold
    percentile: f64,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self { percentile: 0.95 }
    }
}

impl OutlierDetector {
    /// Detector at the default 95% confidence percentile.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_percentile(percentile: f64) -> Self {
        Self { percentile }
    }

    /// Scan `sample` for outliers at the configured confidence percentile.
    ///
    /// The threshold is the inverse standard-normal CDF at the percentile,
    /// compared against |z|, so this is effectively a two-tailed test.
    /// An empty sample yields an empty result rather than an error; a
    /// zero-spread sample defines every z-score as 0 and flags nothing.
    pub fn detect(&self, sample: &[f64]) -> Result<OutlierResult> {
        let percentile = self.percentile;
        if percentile <= 0.0 || percentile >= 1.0 {
            return Err(AnalyticsError::invalid(format!(
                "percentile must be in (0, 1), got {percentile}"
            )));
        }

        if sample.is_empty() {
            return Ok(OutlierResult::empty());
        }

        let mean = stats::mean(sample);
        let std_dev = stats::population_std(sample);

        let z_scores: Vec<f64> = if std_dev == 0.0 {
            vec![0.0; sample.len()]
        } else {
            sample.iter().map(|x| (x - mean) / std_dev).collect()
        };

        let threshold = stats::normal_ppf(percentile);
        let outliers: Vec<OutlierPoint> = z_scores
            .iter()
            .enumerate()
            .filter(|(_, z)| z.abs() > threshold)
            .map(|(index, &z_score)| OutlierPoint {
                index,
                value: sample[index],
                z_score,
            })
            .collect();

        debug!(
            n = sample.len(),
            flagged = outliers.len(),
            threshold,
            "outlier scan complete"
        );

        Ok(OutlierResult {
            mean,
            std_dev,
            z_scores,
            outliers,
        })
    }
}
