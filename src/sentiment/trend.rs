//! Sentiment trend detection over a time-ordered polarity series
//!
//! Smooths the series with a recursive EWMA (adjust=false form), fits a
//! first-degree least-squares line through the smoothed values, and
//! classifies the slope sign. The classification compares against exactly
//! zero with no epsilon band; a perfectly flat fitted line is the only
//! input reported as stable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stats;

/// One observation in a sentiment history: position in the series plus the
/// polarity recorded there
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub index: f64,
    pub polarity: f64,
}

impl SentimentPoint {
    pub fn new(index: f64, polarity: f64) -> Self {
        Self { index, polarity }
    }
}

/// Slope-sign classification of the smoothed series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    Improving,
    Declining,
    Stable,
}

/// Fitted trend over a sentiment history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentTrend {
    pub status: TrendStatus,
    pub slope: f64,
    /// EWMA-smoothed series, same length and order as the input
    pub smoothed: Vec<f64>,
    /// Sample standard deviation of the raw (unsmoothed) series
    pub volatility: f64,
}

/// Trend outcome: an empty history is a sentinel, not an error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TrendOutcome {
    InsufficientData,
    Trend(SentimentTrend),
}

impl TrendOutcome {
    pub fn trend(&self) -> Option<&SentimentTrend> {
        match self {
            TrendOutcome::Trend(t) => Some(t),
            TrendOutcome::InsufficientData => None,
        }
    }
}

/// Recursive exponentially weighted moving average:
/// `avg[0] = x[0]`, `avg[t] = alpha * x[t] + (1 - alpha) * avg[t-1]`
/// with `alpha = 2 / (span + 1)`.
pub fn ewma(series: &[f64], span: usize) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut smoothed = Vec::with_capacity(series.len());
    let mut avg = series[0];
    smoothed.push(avg);
    for &x in &series[1..] {
        avg = alpha * x + (1.0 - alpha) * avg;
        smoothed.push(avg);
    }
    smoothed
}

/// Smooth, fit and classify a sentiment history.
pub fn analyze_trend(history: &[SentimentPoint], span: usize) -> TrendOutcome {
    if history.is_empty() {
        return TrendOutcome::InsufficientData;
    }

    let raw: Vec<f64> = history.iter().map(|p| p.polarity).collect();
    let indices: Vec<f64> = history.iter().map(|p| p.index).collect();
    let smoothed = ewma(&raw, span);
    let (slope, _) = stats::linear_fit(&indices, &smoothed);

    let status = if slope > 0.0 {
        TrendStatus::Improving
    } else if slope < 0.0 {
        TrendStatus::Declining
    } else {
        TrendStatus::Stable
    };

    debug!(n = history.len(), slope, ?status, "sentiment trend fitted");

    TrendOutcome::Trend(SentimentTrend {
        status,
        slope,
        smoothed,
        volatility: stats::sample_std(&raw),
    })
}
