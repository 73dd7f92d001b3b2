//! Shared descriptive statistics and normal-distribution kernel
//!
//! Every analysis module builds on these primitives. Two standard-deviation
//! conventions coexist in the engine and both are provided here:
//! `population_std` (denominator N, used for z-scores and sentiment spread)
//! and `sample_std` (denominator N-1, used for distribution summaries and
//! trend volatility).

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance (denominator N). Returns 0.0 for an empty slice.
pub fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation (denominator N).
pub fn population_std(data: &[f64]) -> f64 {
    population_variance(data).sqrt()
}

/// Sample variance (denominator N-1). Returns 0.0 when fewer than 2 points.
pub fn sample_variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

/// Sample standard deviation (denominator N-1).
pub fn sample_std(data: &[f64]) -> f64 {
    sample_variance(data).sqrt()
}

/// Median of a sample (average of the two middle values for even N).
/// Returns 0.0 for an empty slice.
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Linearly interpolated quantile, `q` in [0, 1]: position `q * (n - 1)`
/// between sorted order statistics. Returns 0.0 for an empty slice.
pub fn quantile(data: &[f64], q: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Fisher-adjusted (unbiased) skewness estimator:
///
/// g1 = n / ((n-1)(n-2)) * Σ((x - x̄) / s)³
///
/// with s the sample (N-1) standard deviation. Defined as 0.0 when n < 3
/// or the sample has no spread, keeping results JSON-safe.
pub fn skewness(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 3 {
        return 0.0;
    }
    let s = sample_std(data);
    if s == 0.0 {
        return 0.0;
    }
    let m = mean(data);
    let nf = n as f64;
    let sum_cubed: f64 = data.iter().map(|x| ((x - m) / s).powi(3)).sum();
    nf / ((nf - 1.0) * (nf - 2.0)) * sum_cubed
}

/// Fisher-adjusted (unbiased) excess kurtosis estimator:
///
/// G2 = n(n+1) / ((n-1)(n-2)(n-3)) * Σ((x - x̄) / s)⁴ - 3(n-1)² / ((n-2)(n-3))
///
/// with s the sample (N-1) standard deviation. Defined as 0.0 when n < 4
/// or the sample has no spread.
pub fn kurtosis(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 4 {
        return 0.0;
    }
    let s = sample_std(data);
    if s == 0.0 {
        return 0.0;
    }
    let m = mean(data);
    let nf = n as f64;
    let sum_fourth: f64 = data.iter().map(|x| ((x - m) / s).powi(4)).sum();
    nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * sum_fourth
        - 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0))
}

/// Normal probability density at `x` for the given mean and standard deviation.
///
/// Caller must ensure `std_dev > 0`.
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * std::f64::consts::PI).sqrt())
}

/// Standard normal CDF approximation (Abramowitz-Stegun)
/// Accurate to ~4 decimal places
pub fn normal_cdf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * z);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-z * z).exp();

    0.5 * (1.0 + sign * y)
}

/// Inverse standard normal CDF (Acklam's rational approximation)
/// Accurate to ~1e-9 over (0, 1); returns ±INFINITY at the boundaries.
pub fn normal_ppf(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];

    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -((((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0))
    }
}

/// First-degree least-squares fit through (x, y) pairs.
///
/// Returns (slope, intercept). Degenerate inputs (fewer than 2 points, or
/// all x equal) yield slope 0.0 with the mean of y as intercept.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return (0.0, mean(ys));
    }
    let mx = mean(&xs[..n]);
    let my = mean(&ys[..n]);
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        sxx += dx * dx;
        sxy += dx * (ys[i] - my);
    }
    if sxx == 0.0 {
        return (0.0, my);
    }
    let slope = sxy / sxx;
    (slope, my - slope * mx)
}

/// Trailing moving average: element i averages the window ending at i.
///
/// Series shorter than the window are returned unchanged.
pub fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || data.len() < window {
        return data.to_vec();
    }
    data.iter()
        .enumerate()
        .map(|(i, _)| {
            let start = i.saturating_sub(window - 1);
            mean(&data[start..=i])
        })
        .collect()
}

/// Confidence interval for a mean estimate
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Normal-approximation confidence interval around a mean.
///
/// Uses z = 1.96 at the 95% level and z = 1.645 otherwise (the two levels
/// the prediction reports actually request).
pub fn confidence_interval(
    mean: f64,
    std_dev: f64,
    confidence_level: f64,
    sample_size: usize,
) -> ConfidenceInterval {
    let z = if confidence_level == 0.95 { 1.96 } else { 1.645 };
    let standard_error = std_dev / (sample_size.max(1) as f64).sqrt();
    ConfidenceInterval {
        lower: mean - z * standard_error,
        upper: mean + z * standard_error,
    }
}
