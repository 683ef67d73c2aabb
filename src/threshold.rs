//! Percentile thresholds and mask statistics over importance scores.
//!
//! Pure functions over a flattened score tensor: percentile-threshold
//! lookup, mask-from-threshold, average importance of survivors, and
//! the inverse mapping from a target survivor average back to a
//! threshold. No state, no I/O; all failures are precondition
//! violations surfaced to the caller.

use crate::error::PruningError;
use crate::tensor::Tensor;

/// Threshold fitted to a target survivor average.
///
/// Produced by [`threshold_from_avg_importance`]: the smallest top-k
/// prefix (by descending score) whose running average falls at or below
/// the target determines the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdFit {
    /// Score value at the determining rank
    pub threshold: f32,
    /// Running average achieved at that rank
    pub achieved_avg: f32,
    /// Fraction of elements kept (rank / n)
    pub fraction_kept: f32,
}

/// Elementwise mask from an inclusive score threshold.
///
/// `score >= threshold` keeps the weight (mask 1), otherwise prunes it
/// (mask 0). Ties at exactly `threshold` are kept.
#[must_use]
pub fn compute_mask(scores: &Tensor, threshold: f32) -> Tensor {
    let data: Vec<f32> = scores
        .data()
        .iter()
        .map(|&v| if v >= threshold { 1.0 } else { 0.0 })
        .collect();
    Tensor::new(&data, scores.shape())
}

/// Percentile threshold achieving approximately the given sparsity.
///
/// Sorting the flattened scores ascending, the value at
/// `floor(n * sparsity)` (clamped to `n - 1`, so sparsity 1.0 indexes
/// the largest element) is the inclusive cutoff: exactly the elements
/// strictly below it are pruned by [`compute_mask`], modulo ties.
///
/// # Errors
/// - [`PruningError::InvalidSparsity`] if `sparsity` is not a finite value in [0, 1]
/// - [`PruningError::EmptyImportance`] if the score array is empty
pub fn importance_threshold(scores: &Tensor, sparsity: f32) -> Result<f32, PruningError> {
    if !sparsity.is_finite() || !(0.0..=1.0).contains(&sparsity) {
        return Err(PruningError::InvalidSparsity {
            value: sparsity,
            constraint: "must be between 0.0 and 1.0".to_string(),
        });
    }

    let data = scores.data();
    if data.is_empty() {
        return Err(PruningError::EmptyImportance {
            method: "importance_threshold".to_string(),
        });
    }

    let mut sorted: Vec<f32> = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let index = ((sorted.len() as f32 * sparsity).floor() as usize).min(sorted.len() - 1);
    Ok(sorted[index])
}

/// Average score of the weights surviving the given threshold.
///
/// `sum(score * mask) / sum(mask)` with `mask = compute_mask(threshold)`.
///
/// # Errors
/// - [`PruningError::EmptyImportance`] if the score array is empty
/// - [`PruningError::NoSurvivors`] if the threshold exceeds every score
pub fn avg_importance_from_threshold(
    scores: &Tensor,
    threshold: f32,
) -> Result<f32, PruningError> {
    if scores.data().is_empty() {
        return Err(PruningError::EmptyImportance {
            method: "avg_importance_from_threshold".to_string(),
        });
    }

    let mut kept_sum = 0.0f64;
    let mut kept = 0usize;
    for &v in scores.data() {
        if v >= threshold {
            kept_sum += f64::from(v);
            kept += 1;
        }
    }

    if kept == 0 {
        return Err(PruningError::NoSurvivors { threshold });
    }
    Ok((kept_sum / kept as f64) as f32)
}

/// Average survivor score at the threshold fitted to a sparsity target.
///
/// Composition of [`importance_threshold`] and
/// [`avg_importance_from_threshold`].
///
/// # Errors
/// Propagates the errors of both composed operations.
pub fn avg_importance_from_sparsity(scores: &Tensor, sparsity: f32) -> Result<f32, PruningError> {
    let threshold = importance_threshold(scores, sparsity)?;
    avg_importance_from_threshold(scores, threshold)
}

/// Fit a threshold to a target survivor average.
///
/// Sizes a threshold to hit a quality target (average surviving
/// importance) rather than a quantity target (sparsity fraction): the
/// smallest top-k prefix by descending score whose running average is
/// at or below `target_avg` determines the answer. If even the full
/// population averages above the target, the fallback is the minimum
/// score, the global average, and a kept fraction of 1.0.
///
/// # Errors
/// - [`PruningError::EmptyImportance`] if the score array is empty
pub fn threshold_from_avg_importance(
    scores: &Tensor,
    target_avg: f32,
) -> Result<ThresholdFit, PruningError> {
    let data = scores.data();
    if data.is_empty() {
        return Err(PruningError::EmptyImportance {
            method: "threshold_from_avg_importance".to_string(),
        });
    }

    let mut sorted: Vec<f32> = data.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mut running_sum = 0.0f64;
    let mut running_avg = 0.0f64;
    for (i, &v) in sorted.iter().enumerate() {
        running_sum += f64::from(v);
        running_avg = running_sum / (i + 1) as f64;
        if running_avg <= f64::from(target_avg) {
            return Ok(ThresholdFit {
                threshold: v,
                achieved_avg: running_avg as f32,
                fraction_kept: (i + 1) as f32 / n as f32,
            });
        }
    }

    // Target sits below the global average: keep everything.
    Ok(ThresholdFit {
        threshold: sorted[n - 1],
        achieved_avg: running_avg as f32,
        fraction_kept: 1.0,
    })
}


#[cfg(test)]
#[path = "tests_threshold_contract.rs"]
mod contract_tests;
