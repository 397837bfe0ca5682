//! Statistical primitives for feature engineering and scoring.
//!
//! Small, pure helpers: clipping, min-max normalization, percentile
//! winsorization, Bayesian shrinkage toward a prior, and weighted means.
//! Degenerate inputs (empty samples, zero variance) map to defined neutral
//! results; inputs that would corrupt a score (mismatched lengths, all-zero
//! weights) are rejected with `InvalidArgument`.

use crate::error::{EdgeScanError, Result};

/// Clips `value` into `[min_val, max_val]`.
#[must_use]
pub fn clip(value: f64, min_val: f64, max_val: f64) -> f64 {
    value.min(max_val).max(min_val)
}

/// Min-max normalization of `value` against `[min_val, max_val]`.
///
/// A degenerate range (`max_val == min_val`) returns the neutral midpoint
/// `0.5`. The raw result can fall outside `[0, 1]` for out-of-range values;
/// callers that need hard bounds must `clip` separately.
#[must_use]
pub fn normalize_to_unit(value: f64, min_val: f64, max_val: f64) -> f64 {
    if (max_val - min_val).abs() < f64::EPSILON {
        return 0.5;
    }

    (value - min_val) / (max_val - min_val)
}

/// Sorted copy of `values` with a total order (NaN-tolerant).
fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Percentile bounds used by `winsorize` and `robust_scale`.
///
/// Lower index is `floor(n * (1 - clip_pct) / 2)`, upper index is
/// `floor(n * (1 + clip_pct) / 2)`, both clamped into `[0, n - 1]`.
fn percentile_bounds(sorted: &[f64], clip_pct: f64) -> (f64, f64) {
    let n = sorted.len();
    let lower_idx = ((n as f64) * (1.0 - clip_pct) / 2.0) as usize;
    let upper_idx = ((n as f64) * (1.0 + clip_pct) / 2.0) as usize;

    (sorted[lower_idx.min(n - 1)], sorted[upper_idx.min(n - 1)])
}

/// Winsorizes `values` by clipping each element into its percentile bounds.
///
/// Outliers are clipped rather than discarded, limiting their influence
/// while preserving the sample size. Input order is preserved; empty input
/// returns an empty vector.
#[must_use]
pub fn winsorize(values: &[f64], clip_pct: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let sorted = sorted_copy(values);
    let (lower, upper) = percentile_bounds(&sorted, clip_pct);

    values.iter().map(|&v| clip(v, lower, upper)).collect()
}

/// Scales `values` into `[0, 1]` against percentile bounds instead of the
/// raw min/max, so outliers cannot stretch the scale.
///
/// Degenerate bounds (all values inside a single percentile bucket) map the
/// whole sample to the neutral `0.5`.
#[must_use]
pub fn robust_scale(values: &[f64], clip_pct: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let sorted = sorted_copy(values);
    let (lower, upper) = percentile_bounds(&sorted, clip_pct);

    if (upper - lower).abs() < f64::EPSILON {
        return vec![0.5; values.len()];
    }

    values
        .iter()
        .map(|&v| clip((v - lower) / (upper - lower), 0.0, 1.0))
        .collect()
}

/// Bayesian-style shrinkage of `observed` toward `prior`.
///
/// The observed value carries weight `n_obs / (n_obs + n_prior)`; with no
/// observations and no prior mass the prior is returned directly.
#[must_use]
pub fn shrink_to_prior(observed: f64, prior: f64, n_obs: usize, n_prior: usize) -> f64 {
    let total = n_obs + n_prior;
    if total == 0 {
        return prior;
    }

    let weight_obs = n_obs as f64 / total as f64;
    let weight_prior = n_prior as f64 / total as f64;

    weight_obs * observed + weight_prior * prior
}

/// Weighted mean of `values` under `weights`.
///
/// Empty input returns `0.0` (a defined no-data answer, not an error).
///
/// # Errors
/// Returns `InvalidArgument` when the slices differ in length or when the
/// weights sum to zero; dividing through silently would corrupt the result.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Result<f64> {
    if values.len() != weights.len() {
        return Err(EdgeScanError::invalid_argument(format!(
            "values and weights must have the same length ({} vs {})",
            values.len(),
            weights.len()
        )));
    }

    if values.is_empty() {
        return Ok(0.0);
    }

    let total_weight: f64 = weights.iter().sum();
    if total_weight == 0.0 {
        return Err(EdgeScanError::invalid_argument("weights sum to zero"));
    }

    let weighted_sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Ok(weighted_sum / total_weight)
}
