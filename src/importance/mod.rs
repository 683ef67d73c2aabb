//! Importance scoring for weight pruning.
//!
//! Every trainable weight receives a non-negative score estimating how
//! much removing it would harm the model. Two sources are provided:
//!
//! - [`MagnitudeImportance`]: `|weight * mask|`, recomputed fresh on
//!   every read, no state (Han et al., 2015).
//! - [`TaylorImportance`]: time-average of `|weight * mask * gradient|`
//!   accumulated across backward passes (Molchanov et al., 2017).
//!
//! # Toyota Way: Jidoka
//! Gradient contributions are screened for non-finite values before
//! accumulation; a single exploding gradient cannot corrupt the running
//! average.
//!
//! # References
//! - Han, S., et al. (2015). Learning both weights and connections. `NeurIPS`.
//! - Molchanov, P., et al. (2017). Pruning convolutional neural networks
//!   for resource efficient inference. ICLR.

mod accumulator;
mod magnitude;
mod taylor;

pub use accumulator::ScoreAccumulator;
pub use magnitude::MagnitudeImportance;
pub use taylor::TaylorImportance;

use crate::error::PruningError;
use crate::layer::PrunableLayer;
use crate::tensor::Tensor;

/// Importance estimation over one prunable layer.
///
/// # Contract
/// - `importance` returns a non-negative score tensor with the weight's
///   shape and never fails; stateful sources with zero observations
///   return their all-zero accumulator rather than dividing by zero.
/// - `reset` restarts the estimation window; it is called at
///   construction and may be called again at any time (typically after
///   each mask update, so the next threshold decision uses only the
///   most recent evidence).
/// - `observe` delivers one gradient tensor per backward pass; sources
///   that don't consume gradients accept and ignore it.
/// - `close` releases the gradient subscription; the caller must invoke
///   it before discarding a gradient-consuming source, and observations
///   after `close` are rejected.
///
/// # Object Safety
/// This trait is object-safe; the closed set of variants is resolved by
/// name through [`importance_factory`].
pub trait Importance: Send + Sync {
    /// Current importance score, same shape as the layer's weight.
    fn importance(&self, layer: &PrunableLayer) -> Tensor;

    /// Restart the estimation window.
    fn reset(&mut self, layer: &PrunableLayer);

    /// Deliver one gradient observation, aligned to the weight's shape.
    ///
    /// # Errors
    /// - [`PruningError::ShapeMismatch`] if the gradient doesn't match the weight
    /// - [`PruningError::SourceClosed`] if the source was already closed
    fn observe(&mut self, layer: &PrunableLayer, gradient: &Tensor) -> Result<(), PruningError>;

    /// Release the gradient subscription. Idempotent.
    fn close(&mut self);

    /// Name of this source for diagnostics and factory lookup.
    fn name(&self) -> &'static str;
}

/// Resolve an importance source by configured name.
///
/// Closed registry: `"magnitude"` and `"taylor"`. Unknown names are a
/// configuration error, surfaced at construction rather than deferred.
pub fn importance_factory(
    name: &str,
    layer: &PrunableLayer,
) -> Result<Box<dyn Importance>, PruningError> {
    match name {
        "magnitude" => Ok(Box::new(MagnitudeImportance::new())),
        "taylor" => Ok(Box::new(TaylorImportance::new(layer))),
        _ => Err(PruningError::UnknownImportance {
            name: name.to_string(),
        }),
    }
}

/// Summary statistics over an importance score tensor.
#[derive(Debug, Clone, Default)]
pub struct ImportanceStats {
    /// Minimum score
    pub min: f32,
    /// Maximum score
    pub max: f32,
    /// Mean score
    pub mean: f32,
    /// Population standard deviation
    pub std: f32,
}

impl ImportanceStats {
    /// Compute statistics from a score tensor.
    ///
    /// An empty tensor yields all-zero statistics rather than a panic.
    #[must_use]
    pub fn from_tensor(scores: &Tensor) -> Self {
        let data = scores.data();
        if data.is_empty() {
            return Self::default();
        }

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        for &v in data {
            min = min.min(v);
            max = max.max(v);
            sum += f64::from(v);
        }
        let mean = (sum / data.len() as f64) as f32;

        let var: f64 = data
            .iter()
            .map(|&v| {
                let d = f64::from(v) - f64::from(mean);
                d * d
            })
            .sum::<f64>()
            / data.len() as f64;

        Self {
            min,
            max,
            mean,
            std: var.sqrt() as f32,
        }
    }

    /// Fraction of scores strictly below `threshold`.
    #[must_use]
    pub fn sparsity_at(&self, scores: &Tensor, threshold: f32) -> f32 {
        let data = scores.data();
        if data.is_empty() {
            return 0.0;
        }
        let below = data.iter().filter(|&&v| v < threshold).count();
        below as f32 / data.len() as f32
    }
}

#[cfg(test)]
#[path = "importance_tests.rs"]
mod tests;
