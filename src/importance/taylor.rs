//! Gradient-weighted (Taylor) importance.

use super::accumulator::ScoreAccumulator;
use super::Importance;
use crate::error::PruningError;
use crate::layer::PrunableLayer;
use crate::tensor::Tensor;

/// First-order Taylor importance (Molchanov et al., 2017).
///
/// On each backward pass the collaborator delivers the weight's gradient;
/// the contribution `|weight * mask * gradient|` is screened for
/// non-finite entries and added into a [`ScoreAccumulator`]. The score
/// read back is the time-average over the current estimation window.
///
/// # Jidoka
/// NaN and infinite entries are clamped to zero before accumulation.
/// Finiteness is decided with `f32::is_finite`; an equality test against
/// a NaN literal would pass every NaN through, since NaN compares
/// unequal to everything including itself.
///
/// # Lifecycle
/// The source attaches to the gradient stream at construction and must
/// be released with [`Importance::close`] before being discarded;
/// observations after `close` are rejected so a forgotten release is
/// caught instead of silently skewing the next estimation window.
#[derive(Debug, Clone)]
pub struct TaylorImportance {
    accumulator: ScoreAccumulator,
    closed: bool,
}

impl TaylorImportance {
    /// Create a Taylor importance source attached to the given layer.
    #[must_use]
    pub fn new(layer: &PrunableLayer) -> Self {
        Self {
            accumulator: ScoreAccumulator::new(layer.weight().shape()),
            closed: false,
        }
    }

    /// Observations accumulated in the current estimation window.
    #[must_use]
    pub fn observations(&self) -> u32 {
        self.accumulator.count()
    }
}

impl Importance for TaylorImportance {
    fn importance(&self, _layer: &PrunableLayer) -> Tensor {
        self.accumulator.average()
    }

    fn reset(&mut self, layer: &PrunableLayer) {
        self.accumulator.reset(layer.weight().shape());
    }

    fn observe(&mut self, layer: &PrunableLayer, gradient: &Tensor) -> Result<(), PruningError> {
        if self.closed {
            return Err(PruningError::SourceClosed {
                method: self.name().to_string(),
            });
        }
        if gradient.shape() != layer.weight().shape() {
            return Err(PruningError::ShapeMismatch {
                expected: layer.weight().shape().to_vec(),
                got: gradient.shape().to_vec(),
            });
        }

        let contribution: Vec<f32> = layer
            .weight()
            .data()
            .iter()
            .zip(layer.mask().data())
            .zip(gradient.data())
            .map(|((w, m), g)| {
                let v = (w * m * g).abs();
                if v.is_finite() {
                    v
                } else {
                    0.0
                }
            })
            .collect();

        self.accumulator
            .accumulate(&Tensor::new(&contribution, layer.weight().shape()));
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn name(&self) -> &'static str {
        "taylor"
    }
}
