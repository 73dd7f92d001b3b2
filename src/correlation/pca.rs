//! Standardization and principal component analysis
//!
//! Both transforms carry an explicit `Unfit | Fit` state so use-before-fit
//! is a visible error instead of a silently wrong-shape output. The PCA
//! eigen-decomposition uses the cyclic Jacobi rotation method, which is
//! exact enough for the small symmetric covariance matrices this engine
//! produces (one row/column per tracked metric).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, Result};

/// Z-score standardizer: zero mean, unit variance per feature.
///
/// Uses the population (N) standard deviation; constant features keep a
/// scale of 1.0 so they standardize to exactly zero.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    state: ScalerState,
}

#[derive(Debug, Clone, Default)]
enum ScalerState {
    #[default]
    Unfit,
    Fit { means: Vec<f64>, scales: Vec<f64> },
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fit(&self) -> bool {
        matches!(self.state, ScalerState::Fit { .. })
    }

    /// Fit per-feature means and scales over row-major data.
    pub fn fit(&mut self, rows: &[Vec<f64>]) -> Result<()> {
        let n = rows.len();
        if n == 0 {
            return Err(AnalyticsError::invalid("cannot fit scaler on empty data"));
        }
        let d = rows[0].len();
        for row in rows {
            if row.len() != d {
                return Err(AnalyticsError::DimensionMismatch {
                    expected: d,
                    actual: row.len(),
                });
            }
        }

        let mut means = vec![0.0; d];
        for row in rows {
            for (j, &v) in row.iter().enumerate() {
                means[j] += v;
            }
        }
        for m in &mut means {
            *m /= n as f64;
        }

        let mut scales = vec![0.0; d];
        for row in rows {
            for (j, &v) in row.iter().enumerate() {
                let diff = v - means[j];
                scales[j] += diff * diff;
            }
        }
        for s in &mut scales {
            *s = (*s / n as f64).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        self.state = ScalerState::Fit { means, scales };
        Ok(())
    }

    /// Standardize rows with the fitted parameters.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let ScalerState::Fit { means, scales } = &self.state else {
            return Err(AnalyticsError::NotFitted {
                transform: "scaler",
            });
        };
        rows.iter()
            .map(|row| {
                if row.len() != means.len() {
                    return Err(AnalyticsError::DimensionMismatch {
                        expected: means.len(),
                        actual: row.len(),
                    });
                }
                Ok(row
                    .iter()
                    .enumerate()
                    .map(|(j, &v)| (v - means[j]) / scales[j])
                    .collect())
            })
            .collect()
    }
}

/// Result of fitting and applying PCA to a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaReduction {
    /// Principal axes, one vector over the original variables per component,
    /// ordered by descending explained variance
    pub components: Vec<Vec<f64>>,
    /// Fraction of total variance per component, descending, sums to <= 1
    pub explained_variance: Vec<f64>,
    /// Input rows projected onto the components
    pub transformed: Vec<Vec<f64>>,
}

/// Principal component analysis with an owned, reusable fitted transform
#[derive(Debug, Clone, Default)]
pub struct Pca {
    state: PcaState,
}

#[derive(Debug, Clone, Default)]
enum PcaState {
    #[default]
    Unfit,
    Fit {
        components: Vec<Vec<f64>>,
        explained_variance: Vec<f64>,
    },
}

impl Pca {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fit(&self) -> bool {
        matches!(self.state, PcaState::Fit { .. })
    }

    /// Fit all principal components of row-major (already standardized) data.
    pub fn fit(&mut self, rows: &[Vec<f64>]) -> Result<()> {
        let n = rows.len();
        if n < 2 {
            return Err(AnalyticsError::invalid(format!(
                "PCA requires at least 2 rows, got {n}"
            )));
        }
        let d = rows[0].len();
        if d == 0 {
            return Err(AnalyticsError::invalid("PCA requires at least 1 feature"));
        }
        for row in rows {
            if row.len() != d {
                return Err(AnalyticsError::DimensionMismatch {
                    expected: d,
                    actual: row.len(),
                });
            }
        }

        // covariance of the (centered) input, N-1 denominator
        let mut means = vec![0.0; d];
        for row in rows {
            for (j, &v) in row.iter().enumerate() {
                means[j] += v;
            }
        }
        for m in &mut means {
            *m /= n as f64;
        }

        let mut cov = vec![vec![0.0; d]; d];
        for row in rows {
            for i in 0..d {
                let di = row[i] - means[i];
                for j in i..d {
                    cov[i][j] += di * (row[j] - means[j]);
                }
            }
        }
        let scale = 1.0 / (n - 1) as f64;
        for i in 0..d {
            for j in i..d {
                cov[i][j] *= scale;
                cov[j][i] = cov[i][j];
            }
        }

        let (eigenvalues, eigenvectors) = jacobi_eigen(cov);

        let total: f64 = eigenvalues.iter().map(|&v| v.max(0.0)).sum();
        let explained_variance: Vec<f64> = if total > 0.0 {
            eigenvalues.iter().map(|&v| v.max(0.0) / total).collect()
        } else {
            vec![0.0; d]
        };

        debug!(
            n,
            d,
            leading = explained_variance.first().copied().unwrap_or(0.0),
            "PCA fitted"
        );

        self.state = PcaState::Fit {
            components: eigenvectors,
            explained_variance,
        };
        Ok(())
    }

    /// Project (already standardized) rows onto the fitted components.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let PcaState::Fit { components, .. } = &self.state else {
            return Err(AnalyticsError::NotFitted { transform: "pca" });
        };
        let d = components.first().map(Vec::len).unwrap_or(0);
        rows.iter()
            .map(|row| {
                if row.len() != d {
                    return Err(AnalyticsError::DimensionMismatch {
                        expected: d,
                        actual: row.len(),
                    });
                }
                Ok(components
                    .iter()
                    .map(|axis| row.iter().zip(axis).map(|(&x, &w)| x * w).sum())
                    .collect())
            })
            .collect()
    }

    pub fn components(&self) -> Result<&[Vec<f64>]> {
        match &self.state {
            PcaState::Fit { components, .. } => Ok(components),
            PcaState::Unfit => Err(AnalyticsError::NotFitted { transform: "pca" }),
        }
    }

    pub fn explained_variance(&self) -> Result<&[f64]> {
        match &self.state {
            PcaState::Fit {
                explained_variance, ..
            } => Ok(explained_variance),
            PcaState::Unfit => Err(AnalyticsError::NotFitted { transform: "pca" }),
        }
    }
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns eigenvalues and matching eigenvectors (as row vectors), sorted
/// by descending eigenvalue.
fn jacobi_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let d = a.len();
    // eigenvector accumulator, starts as identity
    let mut v = vec![vec![0.0; d]; d];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    const MAX_SWEEPS: usize = 100;
    const EPS: f64 = 1e-12;

    for _ in 0..MAX_SWEEPS {
        let mut off_diag: f64 = 0.0;
        for p in 0..d {
            for q in (p + 1)..d {
                off_diag += a[p][q] * a[p][q];
            }
        }
        if off_diag.sqrt() < EPS {
            break;
        }

        for p in 0..d {
            for q in (p + 1)..d {
                if a[p][q].abs() < EPS * 1e-3 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..d {
                    let akp = a[k][p];
                    let akq = a[k][q];
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..d {
                    let apk = a[p][k];
                    let aqk = a[q][k];
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for k in 0..d {
                    let vkp = v[k][p];
                    let vkq = v[k][q];
                    v[k][p] = c * vkp - s * vkq;
                    v[k][q] = s * vkp + c * vkq;
                }
            }
        }
    }

    // eigenvalue i is a[i][i]; eigenvector i is column i of v
    let mut order: Vec<usize> = (0..d).collect();
    order.sort_by(|&i, &j| a[j][j].total_cmp(&a[i][i]));

    let eigenvalues: Vec<f64> = order.iter().map(|&i| a[i][i]).collect();
    let eigenvectors: Vec<Vec<f64>> = order
        .iter()
        .map(|&i| (0..d).map(|k| v[k][i]).collect())
        .collect();
    (eigenvalues, eigenvectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlated_rows() -> Vec<Vec<f64>> {
        // second feature is 2x the first plus small wobble, third is noise
        vec![
            vec![1.0, 2.1, 0.3],
            vec![2.0, 3.9, -0.8],
            vec![3.0, 6.2, 0.1],
            vec![4.0, 7.8, 0.5],
            vec![5.0, 10.1, -0.4],
            vec![6.0, 12.0, 0.2],
        ]
    }

    #[test]
    fn test_scaler_zero_mean_unit_variance() {
        let rows = correlated_rows();
        let mut scaler = StandardScaler::new();
        scaler.fit(&rows).unwrap();
        let scaled = scaler.transform(&rows).unwrap();

        let n = scaled.len() as f64;
        for j in 0..3 {
            let mean: f64 = scaled.iter().map(|r| r[j]).sum::<f64>() / n;
            let var: f64 = scaled.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-10, "feature {j} mean = {mean}");
            assert!((var - 1.0).abs() < 1e-10, "feature {j} var = {var}");
        }
    }

    #[test]
    fn test_scaler_constant_feature_maps_to_zero() {
        let rows = vec![vec![1.0, 7.0], vec![2.0, 7.0], vec![3.0, 7.0]];
        let mut scaler = StandardScaler::new();
        scaler.fit(&rows).unwrap();
        let scaled = scaler.transform(&rows).unwrap();
        assert!(scaled.iter().all(|r| r[1] == 0.0));
    }

    #[test]
    fn test_scaler_not_fitted_fails() {
        let scaler = StandardScaler::new();
        let err = scaler.transform(&[vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::NotFitted {
                transform: "scaler"
            }
        ));
    }

    #[test]
    fn test_pca_not_fitted_fails() {
        let pca = Pca::new();
        assert!(matches!(
            pca.transform(&[vec![1.0]]).unwrap_err(),
            AnalyticsError::NotFitted { transform: "pca" }
        ));
        assert!(pca.explained_variance().is_err());
    }

    #[test]
    fn test_explained_variance_descending_sums_to_one() {
        let rows = correlated_rows();
        let mut pca = Pca::new();
        pca.fit(&rows).unwrap();
        let ratios = pca.explained_variance().unwrap();

        assert_eq!(ratios.len(), 3);
        let sum: f64 = ratios.iter().sum();
        assert!(
            (sum - 1.0).abs() < 1e-9,
            "untruncated ratios should sum to ~1, got {sum}"
        );
        for w in ratios.windows(2) {
            assert!(w[0] >= w[1] - 1e-12, "ratios not descending: {ratios:?}");
        }
        assert!(ratios.iter().all(|&r| r >= 0.0));
    }

    #[test]
    fn test_first_component_captures_linear_structure() {
        // perfectly correlated pair: one dominant direction
        let rows: Vec<Vec<f64>> = (1..=6).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
        let mut pca = Pca::new();
        pca.fit(&rows).unwrap();
        let ratios = pca.explained_variance().unwrap();
        assert!(
            ratios[0] > 0.999,
            "PC1 should explain ~all variance, got {}",
            ratios[0]
        );
    }

    #[test]
    fn test_components_orthonormal() {
        let rows = correlated_rows();
        let mut pca = Pca::new();
        pca.fit(&rows).unwrap();
        let components = pca.components().unwrap();

        for (i, ci) in components.iter().enumerate() {
            let norm: f64 = ci.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "component {i} norm = {norm}");
            for cj in components.iter().skip(i + 1) {
                let dot: f64 = ci.iter().zip(cj).map(|(&a, &b)| a * b).sum();
                assert!(dot.abs() < 1e-9, "components not orthogonal: dot = {dot}");
            }
        }
    }

    #[test]
    fn test_transform_projects_to_component_space() {
        let rows = correlated_rows();
        let mut pca = Pca::new();
        pca.fit(&rows).unwrap();
        let projected = pca.transform(&rows).unwrap();

        assert_eq!(projected.len(), rows.len());
        assert!(projected.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_pca_rejects_degenerate_input() {
        let mut pca = Pca::new();
        assert!(pca.fit(&[]).is_err());
        assert!(pca.fit(&[vec![1.0, 2.0]]).is_err());
        assert!(pca
            .fit(&[vec![1.0, 2.0], vec![1.0]])
            .is_err());
    }

    #[test]
    fn test_jacobi_known_eigenvalues() {
        // [[2, 1], [1, 2]] has eigenvalues 3 and 1
        let m = vec![vec![2.0, 1.0], vec![1.0, 2.0]];
        let (values, vectors) = jacobi_eigen(m);
        assert!((values[0] - 3.0).abs() < 1e-10);
        assert!((values[1] - 1.0).abs() < 1e-10);
        // eigenvector for 3 is (1, 1)/sqrt(2) up to sign
        let e = 1.0 / 2.0f64.sqrt();
        assert!((vectors[0][0].abs() - e).abs() < 1e-10);
        assert!((vectors[0][1].abs() - e).abs() < 1e-10);
    }
}
