//! Prunable layer unit: one weight tensor plus its binary mask.
//!
//! # Toyota Way: Poka-Yoke
//! The mask is mutated exclusively through [`PrunableLayer::set_mask`],
//! which validates shape compatibility and binary values, preventing
//! invalid masks from reaching the forward pass.

use crate::error::PruningError;
use crate::tensor::Tensor;

/// One weight tensor and its same-shaped binary mask (1 = keep, 0 = prune).
///
/// The weight is owned by the training system and read-only from the
/// pruning core's perspective; the mask is installed wholesale on every
/// update, never merged with its predecessor.
///
/// # Invariants
/// - Mask shape equals weight shape
/// - Every mask element is exactly 0.0 or 1.0
#[derive(Debug, Clone)]
pub struct PrunableLayer {
    /// Weight tensor, shape fixed for the layer's lifetime
    weight: Tensor,
    /// Binary mask, same shape as the weight
    mask: Tensor,
}

impl PrunableLayer {
    /// Wrap a weight tensor with a dense (all-ones) mask.
    #[must_use]
    pub fn new(weight: Tensor) -> Self {
        let mask = Tensor::ones_like(&weight);
        Self { weight, mask }
    }

    /// Get the weight tensor.
    #[must_use]
    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    /// Get the current mask.
    #[must_use]
    pub fn mask(&self) -> &Tensor {
        &self.mask
    }

    /// Replace the weight values, keeping the current mask.
    ///
    /// Used by the training system after an optimizer step; the new
    /// weight must keep the layer's shape.
    pub fn set_weight(&mut self, weight: Tensor) -> Result<(), PruningError> {
        if weight.shape() != self.mask.shape() {
            return Err(PruningError::ShapeMismatch {
                expected: self.mask.shape().to_vec(),
                got: weight.shape().to_vec(),
            });
        }
        self.weight = weight;
        Ok(())
    }

    /// Install a new mask, fully replacing the previous one.
    ///
    /// # Errors
    /// - [`PruningError::ShapeMismatch`] if the mask doesn't match the weight shape
    /// - [`PruningError::InvalidMask`] if any element is not exactly 0.0 or 1.0
    pub fn set_mask(&mut self, mask: Tensor) -> Result<(), PruningError> {
        if mask.shape() != self.weight.shape() {
            return Err(PruningError::ShapeMismatch {
                expected: self.weight.shape().to_vec(),
                got: mask.shape().to_vec(),
            });
        }
        for &v in mask.data() {
            if v != 0.0 && v != 1.0 {
                return Err(PruningError::InvalidMask {
                    reason: format!("Mask contains non-binary value: {v}"),
                });
            }
        }
        self.mask = mask;
        Ok(())
    }

    /// Elementwise weight times mask.
    #[must_use]
    pub fn masked_weight(&self) -> Tensor {
        let data: Vec<f32> = self
            .weight
            .data()
            .iter()
            .zip(self.mask.data().iter())
            .map(|(w, m)| w * m)
            .collect();
        Tensor::new(&data, self.weight.shape())
    }

    /// Fraction of weights currently pruned (mask = 0).
    #[must_use]
    pub fn sparsity(&self) -> f32 {
        let data = self.mask.data();
        if data.is_empty() {
            return 0.0;
        }
        let zeros = data.iter().filter(|&&v| v == 0.0).count();
        zeros as f32 / data.len() as f32
    }

    /// Number of surviving (unpruned) weights.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.mask.data().iter().filter(|&&v| v == 1.0).count()
    }

    /// Total number of weights.
    #[must_use]
    pub fn numel(&self) -> usize {
        self.weight.numel()
    }
}
