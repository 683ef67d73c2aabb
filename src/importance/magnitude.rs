//! Magnitude-based importance: `|weight * mask|`.

use super::Importance;
use crate::error::PruningError;
use crate::layer::PrunableLayer;
use crate::tensor::Tensor;

/// Stateless magnitude importance (Han et al., 2015).
///
/// The score is the elementwise absolute value of weight times mask,
/// recomputed fresh on every read. Already-pruned weights score zero,
/// so they stay below any positive threshold.
#[derive(Debug, Clone, Default)]
pub struct MagnitudeImportance {
    closed: bool,
}

impl MagnitudeImportance {
    /// Create a magnitude importance source.
    #[must_use]
    pub fn new() -> Self {
        Self { closed: false }
    }
}

impl Importance for MagnitudeImportance {
    fn importance(&self, layer: &PrunableLayer) -> Tensor {
        let data: Vec<f32> = layer
            .weight()
            .data()
            .iter()
            .zip(layer.mask().data().iter())
            .map(|(w, m)| (w * m).abs())
            .collect();
        Tensor::new(&data, layer.weight().shape())
    }

    fn reset(&mut self, _layer: &PrunableLayer) {
        // No accumulated state.
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
        // Magnitude importance doesn't consume gradients.
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn name(&self) -> &'static str {
        "magnitude"
    }
}
