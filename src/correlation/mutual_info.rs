//! Pairwise mutual information over discretized variables
//!
//! Each continuous variable is cut into equal-width bins over its own
//! [min, max] range, then pairwise MI is estimated from the joint bin
//! counts in nats. Diagonal entries run through the same estimator as
//! off-diagonal ones, yielding the binned entropy of the variable; callers
//! expecting a closed-form self-entropy on the diagonal get the estimated
//! value instead.

use super::pearson::PairwiseMatrix;

/// Mutual information matrix over named variables; entries are >= 0
pub type MutualInformationMatrix = PairwiseMatrix;

/// Assign each value to one of `bins` equal-width bins over [min, max].
///
/// A zero-width range (constant column) collapses to a single bin.
pub fn discretize(values: &[f64], bins: usize) -> Vec<usize> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;
    if width == 0.0 {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|&x| (((x - min) / width) as usize).min(bins - 1))
        .collect()
}

/// Discrete mutual information (nats) between two label sequences.
pub fn mutual_information_discrete(x: &[usize], y: &[usize], bins: usize) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;

    let mut joint = vec![0usize; bins * bins];
    let mut margin_x = vec![0usize; bins];
    let mut margin_y = vec![0usize; bins];
    for i in 0..n {
        joint[x[i] * bins + y[i]] += 1;
        margin_x[x[i]] += 1;
        margin_y[y[i]] += 1;
    }

    let mut mi = 0.0;
    for bx in 0..bins {
        for by in 0..bins {
            let count = joint[bx * bins + by];
            if count == 0 {
                continue;
            }
            let p_xy = count as f64 / nf;
            let p_x = margin_x[bx] as f64 / nf;
            let p_y = margin_y[by] as f64 / nf;
            mi += p_xy * (p_xy / (p_x * p_y)).ln();
        }
    }
    // estimator noise can dip fractionally below zero
    mi.max(0.0)
}

/// Pairwise MI matrix over named columns, each discretized into `bins`
/// equal-width bins. The diagonal is estimated the same way as every other
/// cell.
pub fn mutual_information_matrix(columns: &[(&str, &[f64])], bins: usize) -> MutualInformationMatrix {
    let m = columns.len();
    let discretized: Vec<Vec<usize>> = columns
        .iter()
        .map(|(_, values)| discretize(values, bins))
        .collect();

    let mut values = vec![vec![0.0; m]; m];
    for i in 0..m {
        for j in i..m {
            let mi = mutual_information_discrete(&discretized[i], &discretized[j], bins);
            values[i][j] = mi;
            values[j][i] = mi;
        }
    }

    MutualInformationMatrix {
        variables: columns.iter().map(|(name, _)| (*name).to_string()).collect(),
        values,
    }
}
