//! Pearson correlation matrix and significant-pair extraction

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Symmetric matrix of pairwise coefficients over named variables.
///
/// Shared by correlation (entries in [-1, 1], diagonal 1) and mutual
/// information (entries >= 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseMatrix {
    pub variables: Vec<String>,
    /// Row-major values; `values[i][j]` pairs `variables[i]` with `variables[j]`
    pub values: Vec<Vec<f64>>,
}

impl PairwiseMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.variables.iter().position(|v| v == a)?;
        let j = self.variables.iter().position(|v| v == b)?;
        Some(self.values[i][j])
    }
}

/// Correlation matrix over named variables
pub type CorrelationMatrix = PairwiseMatrix;

/// An unordered variable pair whose |correlation| clears the threshold.
/// `first` always precedes `second` in variable order, so the set carries
/// no duplicates and no self-pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificantPair {
    pub first: String,
    pub second: String,
    pub correlation: f64,
}

/// Correlation matrix plus the pairs clearing the significance threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub matrix: CorrelationMatrix,
    pub significant_pairs: Vec<SignificantPair>,
}

/// Pearson correlation coefficient of two equal-length series.
///
/// A zero-variance series defines the coefficient as 0.0 rather than NaN.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(AnalyticsError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    if x.is_empty() {
        return Ok(0.0);
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok(cov / denom)
}

/// Build the full correlation matrix over named columns.
/// Diagonal entries are fixed at 1.0.
pub fn correlation_matrix(columns: &[(&str, &[f64])]) -> Result<CorrelationMatrix> {
    let m = columns.len();
    let mut values = vec![vec![0.0; m]; m];
    for i in 0..m {
        values[i][i] = 1.0;
        for j in (i + 1)..m {
            let r = pearson(columns[i].1, columns[j].1)?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Ok(CorrelationMatrix {
        variables: columns.iter().map(|(name, _)| (*name).to_string()).collect(),
        values,
    })
}

/// Extract every i<j pair with |correlation| >= threshold.
pub fn significant_pairs(matrix: &CorrelationMatrix, threshold: f64) -> Vec<SignificantPair> {
    let m = matrix.variables.len();
    let mut pairs = Vec::new();
    for i in 0..m {
        for j in (i + 1)..m {
            let r = matrix.values[i][j];
            if r.abs() >= threshold {
                pairs.push(SignificantPair {
                    first: matrix.variables[i].clone(),
                    second: matrix.variables[j].clone(),
                    correlation: r,
                });
            }
        }
    }
    pairs
}
