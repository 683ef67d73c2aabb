//! Mask generation and installation.
//!
//! [`MaskUpdater`] pairs an importance source with the threshold
//! statistics and writes the resulting mask onto the layer. The new
//! mask fully supersedes the old one; errors from the threshold
//! machinery propagate unchanged, since they are precondition
//! violations rather than transient failures.

use crate::error::PruningError;
use crate::importance::{importance_factory, Importance, MagnitudeImportance, TaylorImportance};
use crate::layer::PrunableLayer;
use crate::tensor::Tensor;
use crate::threshold;
use crate::threshold::ThresholdFit;

/// Diagnostics from one mask update.
#[derive(Debug, Clone, Copy)]
pub struct MaskUpdate {
    /// Threshold the mask was cut at
    pub threshold: f32,
    /// Fraction of weights pruned by the installed mask
    pub achieved_sparsity: f32,
    /// Number of weights pruned (mask = 0)
    pub weights_pruned: usize,
    /// Total weights in the layer
    pub total_weights: usize,
}

/// Applies sparsity levels or raw thresholds to one prunable layer.
pub struct MaskUpdater {
    source: Box<dyn Importance>,
}

impl MaskUpdater {
    /// Updater over the given importance source.
    #[must_use]
    pub fn new(source: Box<dyn Importance>) -> Self {
        Self { source }
    }

    /// Updater with magnitude importance.
    #[must_use]
    pub fn magnitude() -> Self {
        Self::new(Box::new(MagnitudeImportance::new()))
    }

    /// Updater with gradient-weighted Taylor importance for a layer.
    #[must_use]
    pub fn taylor(layer: &PrunableLayer) -> Self {
        Self::new(Box::new(TaylorImportance::new(layer)))
    }

    /// Updater with the importance source resolved by configured name.
    ///
    /// # Errors
    /// [`PruningError::UnknownImportance`] for names outside the registry.
    pub fn from_name(name: &str, layer: &PrunableLayer) -> Result<Self, PruningError> {
        Ok(Self::new(importance_factory(name, layer)?))
    }

    /// Current importance snapshot for the layer.
    #[must_use]
    pub fn importance(&self, layer: &PrunableLayer) -> Tensor {
        self.source.importance(layer)
    }

    /// Restart the importance estimation window.
    pub fn reset(&mut self, layer: &PrunableLayer) {
        self.source.reset(layer);
    }

    /// Deliver one gradient observation to the importance source.
    ///
    /// # Errors
    /// Propagates [`PruningError::ShapeMismatch`] and
    /// [`PruningError::SourceClosed`] from the source.
    pub fn observe(
        &mut self,
        layer: &PrunableLayer,
        gradient: &Tensor,
    ) -> Result<(), PruningError> {
        self.source.observe(layer, gradient)
    }

    /// Release the importance source's gradient subscription.
    pub fn close(&mut self) {
        self.source.close();
    }

    /// Name of the underlying importance source.
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Cut a mask at the threshold matching the sparsity target and
    /// install it.
    ///
    /// # Errors
    /// - [`PruningError::InvalidSparsity`] for targets outside [0, 1]
    /// - [`PruningError::EmptyImportance`] for a zero-element layer
    pub fn apply_sparsity(
        &self,
        layer: &mut PrunableLayer,
        sparsity: f32,
    ) -> Result<MaskUpdate, PruningError> {
        let scores = self.source.importance(layer);
        let thr = threshold::importance_threshold(&scores, sparsity)?;
        self.install(layer, &scores, thr)
    }

    /// Cut a mask at a raw importance threshold and install it.
    ///
    /// # Errors
    /// - [`PruningError::EmptyImportance`] for a zero-element layer
    pub fn apply_threshold(
        &self,
        layer: &mut PrunableLayer,
        thr: f32,
    ) -> Result<MaskUpdate, PruningError> {
        let scores = self.source.importance(layer);
        if scores.data().is_empty() {
            return Err(PruningError::EmptyImportance {
                method: "apply_threshold".to_string(),
            });
        }
        self.install(layer, &scores, thr)
    }

    /// Average importance of the weights a threshold would keep.
    ///
    /// # Errors
    /// Propagates [`PruningError::NoSurvivors`] and
    /// [`PruningError::EmptyImportance`].
    pub fn avg_importance_from_threshold(
        &self,
        layer: &PrunableLayer,
        thr: f32,
    ) -> Result<f32, PruningError> {
        threshold::avg_importance_from_threshold(&self.source.importance(layer), thr)
    }

    /// Average importance of survivors at a sparsity target.
    ///
    /// # Errors
    /// Propagates the composed threshold-statistics errors.
    pub fn avg_importance_from_sparsity(
        &self,
        layer: &PrunableLayer,
        sparsity: f32,
    ) -> Result<f32, PruningError> {
        threshold::avg_importance_from_sparsity(&self.source.importance(layer), sparsity)
    }

    /// Fit a threshold to a target survivor average against the current
    /// importance snapshot.
    ///
    /// # Errors
    /// Propagates [`PruningError::EmptyImportance`].
    pub fn threshold_from_avg_importance(
        &self,
        layer: &PrunableLayer,
        target_avg: f32,
    ) -> Result<ThresholdFit, PruningError> {
        threshold::threshold_from_avg_importance(&self.source.importance(layer), target_avg)
    }

    fn install(
        &self,
        layer: &mut PrunableLayer,
        scores: &Tensor,
        thr: f32,
    ) -> Result<MaskUpdate, PruningError> {
        let mask = threshold::compute_mask(scores, thr);
        let total = mask.numel();
        let pruned = mask.data().iter().filter(|&&m| m == 0.0).count();
        layer.set_mask(mask)?;

        Ok(MaskUpdate {
            threshold: thr,
            achieved_sparsity: if total == 0 {
                0.0
            } else {
                pruned as f32 / total as f32
            },
            weights_pruned: pruned,
            total_weights: total,
        })
    }
}

impl std::fmt::Debug for MaskUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskUpdater")
            .field("source", &self.source.name())
            .finish()
    }
}
