//! Correlation structure analysis
//!
//! Pairwise Pearson correlation with significance flagging, PCA
//! dimensionality reduction over standardized variables, and pairwise
//! mutual information over discretized variables.

pub mod mutual_info;
pub mod pca;
pub mod pearson;

use tracing::{debug, info};

use crate::config::CorrelationConfig;
use crate::dataset::Dataset;
use crate::error::{AnalyticsError, Result};

pub use mutual_info::MutualInformationMatrix;
pub use pca::{Pca, PcaReduction, StandardScaler};
pub use pearson::{CorrelationAnalysis, CorrelationMatrix, SignificantPair};

/// Analyzes correlation structure across a dataset's metrics.
///
/// The engine owns a standard scaler and a PCA transform fitted by
/// [`CorrelationEngine::reduce`]; [`CorrelationEngine::transform`] reuses
/// them for new rows. The fitted transforms are exclusive state: callers
/// needing concurrency must use one engine instance per caller or
/// synchronize around `reduce`.
#[derive(Debug, Default)]
pub struct CorrelationEngine {
    config: CorrelationConfig,
    scaler: StandardScaler,
    pca: Pca,
}

impl CorrelationEngine {
    pub fn new(config: CorrelationConfig) -> Self {
        Self {
            config,
            scaler: StandardScaler::new(),
            pca: Pca::new(),
        }
    }

    /// Pairwise Pearson correlation over the requested variables, plus
    /// every pair clearing the configured significance threshold.
    ///
    /// Unknown or non-numeric variables fail with `UnknownVariables`.
    pub fn correlate(&self, data: &Dataset, variables: &[&str]) -> Result<CorrelationAnalysis> {
        let columns = data.resolve_numeric(variables)?;
        let matrix = pearson::correlation_matrix(&columns)?;
        let significant_pairs =
            pearson::significant_pairs(&matrix, self.config.significance_threshold);

        info!(
            variables = variables.len(),
            significant = significant_pairs.len(),
            threshold = self.config.significance_threshold,
            "correlation analysis complete"
        );

        Ok(CorrelationAnalysis {
            matrix,
            significant_pairs,
        })
    }

    /// Standardize every numeric column and fit PCA over the result,
    /// storing both transforms for later [`CorrelationEngine::transform`]
    /// calls. Returns the components, explained-variance ratios and the
    /// projected input rows.
    pub fn reduce(&mut self, data: &Dataset) -> Result<PcaReduction> {
        let rows = numeric_rows(data)?;
        self.scaler.fit(&rows)?;
        let scaled = self.scaler.transform(&rows)?;
        self.pca.fit(&scaled)?;

        let transformed = self.pca.transform(&scaled)?;
        let reduction = PcaReduction {
            components: self.pca.components()?.to_vec(),
            explained_variance: self.pca.explained_variance()?.to_vec(),
            transformed,
        };

        debug!(
            rows = rows.len(),
            components = reduction.components.len(),
            "PCA reduction complete"
        );
        Ok(reduction)
    }

    /// Project new raw rows through the fitted scaler and PCA.
    /// Fails with `NotFitted` before any successful [`Self::reduce`].
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let scaled = self.scaler.transform(rows)?;
        self.pca.transform(&scaled)
    }

    pub fn is_fit(&self) -> bool {
        self.scaler.is_fit() && self.pca.is_fit()
    }

    /// Pairwise mutual information over every numeric column, discretized
    /// into the configured number of equal-width bins.
    pub fn mutual_information(&self, data: &Dataset) -> Result<MutualInformationMatrix> {
        let columns = data.numeric_columns();
        if columns.is_empty() {
            return Err(AnalyticsError::invalid(
                "mutual information requires at least one numeric column",
            ));
        }
        Ok(mutual_info::mutual_information_matrix(
            &columns,
            self.config.mi_bins,
        ))
    }
}

/// Numeric columns of the dataset as row-major vectors, insertion order.
fn numeric_rows(data: &Dataset) -> Result<Vec<Vec<f64>>> {
    let columns = data.numeric_columns();
    if columns.is_empty() {
        return Err(AnalyticsError::invalid(
            "dataset has no numeric columns",
        ));
    }
    let n = columns[0].1.len();
    let mut rows = vec![Vec::with_capacity(columns.len()); n];
    for (_, values) in &columns {
        for (row, &v) in rows.iter_mut().zip(values.iter()) {
            row.push(v);
        }
    }
    Ok(rows)
}
