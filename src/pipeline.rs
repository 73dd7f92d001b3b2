//! Batch analysis entry points
//!
//! Bundles the correlation-structure analyses into one serializable report,
//! the shape downstream training/persistence tooling writes to disk. The
//! core guarantees the report is plain numbers/strings/nested mappings so
//! JSON serialization cannot fail on shape.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ClutchFeatureConfig;
use crate::correlation::{
    CorrelationAnalysis, CorrelationEngine, MutualInformationMatrix, PcaReduction, StandardScaler,
};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::stats;

/// Combined correlation / PCA / mutual-information report over a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropRelationshipReport {
    pub correlation: CorrelationAnalysis,
    pub pca: PcaReduction,
    pub mutual_information: MutualInformationMatrix,
}

impl PropRelationshipReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the full relationship analysis over every numeric column of the
/// dataset: pairwise correlation with significance flags, standardized
/// PCA (fitting the engine's reusable transform), and pairwise mutual
/// information.
pub fn analyze_prop_relationships(
    engine: &mut CorrelationEngine,
    data: &Dataset,
) -> Result<PropRelationshipReport> {
    let variables: Vec<String> = data
        .numeric_columns()
        .iter()
        .map(|(name, _)| (*name).to_string())
        .collect();
    let variable_refs: Vec<&str> = variables.iter().map(String::as_str).collect();

    let correlation = engine.correlate(data, &variable_refs)?;
    let pca = engine.reduce(data)?;
    let mutual_information = engine.mutual_information(data)?;

    info!(
        variables = variables.len(),
        rows = data.row_count(),
        significant = correlation.significant_pairs.len(),
        "prop relationship analysis complete"
    );

    Ok(PropRelationshipReport {
        correlation,
        pca,
        mutual_information,
    })
}

/// Feature matrix and binary labels for the opaque clutch predictor
/// (`fit(features, labels)` / `predict(features)` collaborator)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClutchTrainingSet {
    /// Standardized predictor rows, one per input row
    pub features: Vec<Vec<f64>>,
    /// 1.0 where the row's performance score reaches the configured
    /// quantile, 0.0 otherwise
    pub labels: Vec<f64>,
}

/// Build the clutch training frame from explicit feature configuration.
///
/// Predictor columns are standardized to zero mean/unit variance. The
/// label for each row is derived from the performance columns: each column
/// is min-max scaled to 0..100 (constant columns contribute 0), the row
/// mean forms a performance score, and rows at or above the
/// `clutch_threshold` quantile of those scores are labeled 1.0.
pub fn prepare_clutch_training(
    data: &Dataset,
    config: &ClutchFeatureConfig,
) -> Result<ClutchTrainingSet> {
    if config.features.is_empty() || config.performance_columns.is_empty() {
        return Err(crate::error::AnalyticsError::invalid(
            "clutch config requires at least one feature and one performance column",
        ));
    }

    let feature_names: Vec<&str> = config.features.iter().map(String::as_str).collect();
    let feature_columns = data.resolve_numeric(&feature_names)?;
    let performance_names: Vec<&str> = config
        .performance_columns
        .iter()
        .map(String::as_str)
        .collect();
    let performance_columns = data.resolve_numeric(&performance_names)?;

    let n = data.row_count();
    let mut feature_rows = vec![Vec::with_capacity(feature_columns.len()); n];
    for (_, values) in &feature_columns {
        for (row, &v) in feature_rows.iter_mut().zip(values.iter()) {
            row.push(v);
        }
    }
    let mut scaler = StandardScaler::new();
    scaler.fit(&feature_rows)?;
    let features = scaler.transform(&feature_rows)?;

    // per-row mean of min-max scaled performance columns
    let mut scores = vec![0.0; n];
    for (_, values) in &performance_columns {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        for (score, &v) in scores.iter_mut().zip(values.iter()) {
            if range > 0.0 {
                *score += (v - min) / range * 100.0;
            }
        }
    }
    let k = performance_columns.len() as f64;
    for score in &mut scores {
        *score /= k;
    }

    let cutoff = stats::quantile(&scores, config.clutch_threshold);
    let labels = scores
        .iter()
        .map(|&s| if s >= cutoff { 1.0 } else { 0.0 })
        .collect();

    Ok(ClutchTrainingSet { features, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorrelationConfig;

    fn player_dataset() -> Dataset {
        let mut data = Dataset::new();
        data.insert_numeric("points", vec![22.0, 28.0, 18.0, 31.0, 25.0, 20.0])
            .unwrap();
        data.insert_numeric("minutes", vec![33.0, 38.0, 29.0, 41.0, 36.0, 31.0])
            .unwrap();
        data.insert_numeric("rebounds", vec![6.0, 4.0, 9.0, 5.0, 7.0, 8.0])
            .unwrap();
        data
    }

    #[test]
    fn test_report_covers_all_numeric_columns() {
        let data = player_dataset();
        let mut engine = CorrelationEngine::new(CorrelationConfig::default());
        let report = analyze_prop_relationships(&mut engine, &data).unwrap();

        assert_eq!(report.correlation.matrix.variables.len(), 3);
        assert_eq!(report.pca.components.len(), 3);
        assert_eq!(report.mutual_information.variables.len(), 3);
        assert!(engine.is_fit(), "reduce must leave the engine fitted");
    }

    #[test]
    fn test_report_serializes_to_json() {
        let data = player_dataset();
        let mut engine = CorrelationEngine::new(CorrelationConfig::default());
        let report = analyze_prop_relationships(&mut engine, &data).unwrap();

        let json = report.to_json().unwrap();
        assert!(json.contains("\"correlation\""));
        assert!(json.contains("\"explained_variance\""));
        assert!(json.contains("\"mutual_information\""));

        // round-trips through serde without shape loss
        let back: PropRelationshipReport = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.correlation.matrix.variables,
            report.correlation.matrix.variables
        );
    }

    #[test]
    fn test_empty_dataset_fails_loudly() {
        let data = Dataset::new();
        let mut engine = CorrelationEngine::new(CorrelationConfig::default());
        assert!(analyze_prop_relationships(&mut engine, &data).is_err());
    }

    fn clutch_dataset() -> Dataset {
        let mut data = Dataset::new();
        data.insert_numeric(
            "points_in_close_games",
            vec![12.0, 4.0, 18.0, 7.0, 15.0, 2.0],
        )
        .unwrap();
        data.insert_numeric(
            "fourth_quarter_performance",
            vec![8.0, 3.0, 11.0, 5.0, 9.0, 1.0],
        )
        .unwrap();
        data.insert_numeric("game_winning_shots", vec![2.0, 0.0, 3.0, 1.0, 2.0, 0.0])
            .unwrap();
        data.insert_numeric("points", vec![25.0, 12.0, 34.0, 16.0, 28.0, 9.0])
            .unwrap();
        data.insert_numeric("assists", vec![7.0, 3.0, 9.0, 4.0, 6.0, 2.0])
            .unwrap();
        data.insert_numeric("rebounds", vec![8.0, 5.0, 10.0, 6.0, 9.0, 3.0])
            .unwrap();
        data
    }

    #[test]
    fn test_clutch_training_set_shapes_and_labels() {
        let data = clutch_dataset();
        let training = prepare_clutch_training(&data, &ClutchFeatureConfig::default()).unwrap();

        assert_eq!(training.features.len(), 6);
        assert!(training.features.iter().all(|r| r.len() == 3));
        assert_eq!(training.labels.len(), 6);
        assert!(training.labels.iter().all(|&l| l == 0.0 || l == 1.0));

        // the two strongest stat lines (rows 2 and 4) clear the 0.7 quantile
        assert_eq!(training.labels[2], 1.0);
        assert!(training.labels.iter().sum::<f64>() >= 1.0);
        // the weakest line never counts as clutch
        assert_eq!(training.labels[5], 0.0);
    }

    #[test]
    fn test_clutch_training_missing_feature_fails() {
        let mut data = Dataset::new();
        data.insert_numeric("points", vec![1.0, 2.0]).unwrap();
        let err = prepare_clutch_training(&data, &ClutchFeatureConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AnalyticsError::UnknownVariables { .. }
        ));
    }
}
