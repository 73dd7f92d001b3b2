//! Statistical analytics engine for sports prop-betting signals
//!
//! Turns raw player/market observations and social text into quantitative
//! signals: outlier flags, probability distributions, posterior probability
//! shifts, correlation structure and sentiment trend. Model training and
//! artifact persistence live outside this crate; every result type here is
//! serde-serializable so downstream tooling can persist it as plain JSON.

pub mod bayes;
pub mod config;
pub mod correlation;
pub mod dataset;
pub mod distribution;
pub mod error;
pub mod outlier;
pub mod pipeline;
pub mod sentiment;
pub mod stats;

pub use bayes::{BayesianEstimate, BayesianUpdater};
pub use config::{
    AnalyticsConfig, ClutchFeatureConfig, CorrelationConfig, OutlierConfig, SentimentConfig,
};
pub use correlation::{
    CorrelationAnalysis, CorrelationEngine, CorrelationMatrix, MutualInformationMatrix, Pca,
    PcaReduction, SignificantPair, StandardScaler,
};
pub use dataset::{Column, Dataset};
pub use distribution::{
    DistributionEstimate, DistributionEstimator, DistributionSummary, GaussianKde,
};
pub use error::{AnalyticsError, Result};
pub use outlier::{OutlierDetector, OutlierPoint, OutlierResult};
pub use pipeline::{
    analyze_prop_relationships, prepare_clutch_training, ClutchTrainingSet, PropRelationshipReport,
};
pub use sentiment::{
    KeyPhrase, LexiconScorer, SentimentAggregator, SentimentBreakdown, SentimentCategory,
    SentimentPoint, SentimentScorer, SentimentSummary, SentimentTrend, TrendOutcome, TrendStatus,
};
