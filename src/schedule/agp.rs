//! Automated gradual pruning ramp (Zhu & Gupta, 2017).

use super::SparsityCurve;

/// Polynomial sparsity ramp with configurable exponent.
///
/// ```text
/// value = final - (final - 1.0) * (1 - stage / num_stages)^T
/// ```
///
/// The initial term is a fixed 1.0: the ramp evaluates to 1.0 at stage
/// 0 for any target and relaxes monotonically toward `final_sparsity`,
/// which it reaches exactly at `stage = num_stages`. This reproduces
/// the behavior of the system this scheduler was ported from; callers
/// expecting a ramp that grows from 0 toward the target must invert
/// their stage indexing.
#[derive(Debug, Clone, Copy)]
pub struct AgpCurve {
    exponent: f32,
}

impl AgpCurve {
    /// Ramp with the given polynomial exponent.
    #[must_use]
    pub fn new(exponent: f32) -> Self {
        Self { exponent }
    }

    /// The configured exponent.
    #[must_use]
    pub fn exponent(&self) -> f32 {
        self.exponent
    }
}

impl Default for AgpCurve {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl SparsityCurve for AgpCurve {
    fn value(&self, final_sparsity: f32, stage: i64, num_stages: i64) -> f32 {
        let progress = stage as f32 / num_stages as f32;
        final_sparsity - (final_sparsity - 1.0) * (1.0 - progress).powf(self.exponent)
    }

    fn name(&self) -> &'static str {
        "agp"
    }
}
