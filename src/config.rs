use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Main configuration structure for the analytics engine
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub outlier: OutlierConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub clutch: ClutchFeatureConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutlierConfig {
    /// Confidence percentile defining the |z| outlier threshold
    #[serde(default = "default_percentile")]
    pub percentile: f64,
}

fn default_percentile() -> f64 {
    0.95
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self { percentile: 0.95 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationConfig {
    /// Minimum |correlation| for a pair to be flagged significant
    #[serde(default = "default_significance_threshold")]
    pub significance_threshold: f64,
    /// Equal-width bins per variable for mutual information
    #[serde(default = "default_mi_bins")]
    pub mi_bins: usize,
}

fn default_significance_threshold() -> f64 {
    0.5
}

fn default_mi_bins() -> usize {
    10
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            significance_threshold: 0.5,
            mi_bins: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentimentConfig {
    /// Apply the asymmetric sports-context weighting by default
    #[serde(default = "default_true")]
    pub domain_weighting: bool,
    /// EWMA span for trend smoothing
    #[serde(default = "default_ewma_span")]
    pub ewma_span: usize,
    /// Number of key phrases to report
    #[serde(default = "default_top_n")]
    pub key_phrase_top_n: usize,
}

fn default_true() -> bool {
    true
}

fn default_ewma_span() -> usize {
    5
}

fn default_top_n() -> usize {
    10
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            domain_weighting: true,
            ewma_span: 5,
            key_phrase_top_n: 10,
        }
    }
}

/// Feature lists for the clutch-performance pipeline.
///
/// These were implicit defaults in earlier tooling; they are explicit
/// configuration here so pipeline entry points carry no hidden globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClutchFeatureConfig {
    /// Predictor columns describing clutch situations
    #[serde(default = "default_clutch_features")]
    pub features: Vec<String>,
    /// Outcome columns defining clutch performance
    #[serde(default = "default_performance_columns")]
    pub performance_columns: Vec<String>,
    /// Score above which a performance counts as clutch
    #[serde(default = "default_clutch_threshold")]
    pub clutch_threshold: f64,
}

fn default_clutch_features() -> Vec<String> {
    vec![
        "points_in_close_games".to_string(),
        "fourth_quarter_performance".to_string(),
        "game_winning_shots".to_string(),
    ]
}

fn default_performance_columns() -> Vec<String> {
    vec![
        "points".to_string(),
        "assists".to_string(),
        "rebounds".to_string(),
    ]
}

fn default_clutch_threshold() -> f64 {
    0.7
}

impl Default for ClutchFeatureConfig {
    fn default() -> Self {
        Self {
            features: default_clutch_features(),
            performance_columns: default_performance_columns(),
            clutch_threshold: default_clutch_threshold(),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from an optional TOML file plus environment
    /// overrides (PROPSIGHT_CORRELATION__MI_BINS, etc.). Missing file and
    /// missing keys fall back to defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("PROPSIGHT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validate configured values, returning every problem at once.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.outlier.percentile <= 0.0 || self.outlier.percentile >= 1.0 {
            errors.push("outlier.percentile must be in (0, 1)".to_string());
        }
        if self.correlation.significance_threshold < 0.0
            || self.correlation.significance_threshold > 1.0
        {
            errors.push("correlation.significance_threshold must be in [0, 1]".to_string());
        }
        if self.correlation.mi_bins < 2 {
            errors.push("correlation.mi_bins must be at least 2".to_string());
        }
        if self.sentiment.ewma_span == 0 {
            errors.push("sentiment.ewma_span must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.clutch.clutch_threshold) {
            errors.push("clutch.clutch_threshold must be in [0, 1]".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.outlier.percentile, 0.95);
        assert_eq!(config.correlation.significance_threshold, 0.5);
        assert_eq!(config.correlation.mi_bins, 10);
        assert_eq!(config.sentiment.ewma_span, 5);
        assert_eq!(config.clutch.features.len(), 3);
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut config = AnalyticsConfig::default();
        config.outlier.percentile = 1.5;
        config.correlation.mi_bins = 1;
        config.sentiment.ewma_span = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = AnalyticsConfig::load_from("does-not-exist.toml").unwrap();
        assert_eq!(config.correlation.mi_bins, 10);
        assert!(config.sentiment.domain_weighting);
    }
}
