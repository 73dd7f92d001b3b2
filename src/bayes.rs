//! Bayesian posterior estimation
//!
//! Combines a prior probability with the likelihood of an evidence sample
//! under a two-hypothesis Bayes rule where the null hypothesis likelihood
//! is fixed at 1:
//!
//! posterior = prior * L / (prior * L + (1 - prior))
//!
//! The likelihood is the product of normal densities whose mean and std are
//! estimated from the evidence sample itself. Downstream probability shifts
//! are calibrated against that self-referential parameterization; do not
//! swap in a held-out parameter fit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::stats;

/// Posterior probability estimate for one evidence batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayesianEstimate {
    pub prior: f64,
    /// Product of per-point normal densities. Underflows to 0.0 for large
    /// evidence samples; `log_likelihood` carries the usable quantity.
    pub likelihood: f64,
    pub log_likelihood: f64,
    pub posterior: f64,
    /// posterior - prior
    pub shift: f64,
}

/// Updates prior probabilities against observed evidence samples
#[derive(Debug, Clone, Default)]
pub struct BayesianUpdater;

impl BayesianUpdater {
    pub fn new() -> Self {
        Self
    }

    /// Update `prior` with the likelihood of `evidence`.
    ///
    /// The posterior is evaluated in log-space as
    /// `prior / (prior + (1 - prior) * exp(-log_likelihood))`, which is
    /// algebraically the exact Bayes formula but does not underflow when the
    /// evidence sample is large. Empty evidence, a prior outside [0, 1],
    /// and zero-spread evidence (undefined density) are invalid inputs.
    pub fn update(&self, prior: f64, evidence: &[f64]) -> Result<BayesianEstimate> {
        if !(0.0..=1.0).contains(&prior) {
            return Err(AnalyticsError::invalid(format!(
                "prior must be in [0, 1], got {prior}"
            )));
        }
        if evidence.is_empty() {
            return Err(AnalyticsError::invalid(
                "empty evidence: cannot estimate likelihood parameters",
            ));
        }

        let mean = stats::mean(evidence);
        let std_dev = stats::population_std(evidence);
        if std_dev == 0.0 {
            return Err(AnalyticsError::invalid(
                "evidence has zero variance: normal density is undefined",
            ));
        }

        let log_likelihood: f64 = evidence
            .iter()
            .map(|&x| stats::normal_pdf(x, mean, std_dev).ln())
            .sum();
        let likelihood = log_likelihood.exp();

        // prior * e^l / (prior * e^l + (1 - prior)), rearranged so that a
        // deeply negative log-likelihood drives the posterior to 0 instead
        // of producing 0/0
        let posterior = if prior == 0.0 {
            0.0
        } else if prior == 1.0 {
            1.0
        } else {
            prior / (prior + (1.0 - prior) * (-log_likelihood).exp())
        };

        debug!(
            n = evidence.len(),
            prior, log_likelihood, posterior, "bayesian update"
        );

        Ok(BayesianEstimate {
            prior,
            likelihood,
            log_likelihood,
            posterior,
            shift: posterior - prior,
        })
    }
}
