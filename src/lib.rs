//! Podar: in-training neural network weight pruning in pure Rust.
//!
//! Podar decides, per trainable weight tensor, which individual weights to
//! zero out and how aggressively to do so over the course of training. It
//! provides importance scoring (magnitude and gradient-weighted), percentile
//! threshold statistics, binary mask generation, and a staged sparsity
//! scheduler with a polynomial ramp.
//!
//! # Quick Start
//!
//! ```
//! use podar::prelude::*;
//!
//! // Wrap a weight tensor; the mask starts dense (all ones).
//! let mut layer = PrunableLayer::new(Tensor::new(&[1.0, -2.0, 3.0, -4.0], &[2, 2]));
//!
//! // Magnitude importance, prune the smallest half.
//! let updater = MaskUpdater::magnitude();
//! let update = updater.apply_sparsity(&mut layer, 0.5).unwrap();
//!
//! assert_eq!(update.weights_pruned, 2);
//! assert_eq!(layer.mask().data(), &[0.0, 0.0, 1.0, 1.0]);
//! ```
//!
//! # Modules
//!
//! - [`tensor`]: Minimal dense tensor carrying weights, masks, and scores
//! - [`layer`]: Prunable layer unit (weight + binary mask)
//! - [`importance`]: Importance scoring (magnitude, gradient-weighted Taylor)
//! - [`threshold`]: Percentile thresholds and mask statistics
//! - [`updater`]: Mask generation and installation
//! - [`schedule`]: Staged sparsity scheduling (AGP polynomial ramp)
//! - [`error`]: Error types
//!
//! # References
//!
//! - Han, S., et al. (2015). Learning both weights and connections. `NeurIPS`.
//! - Zhu, M., & Gupta, S. (2017). To prune, or not to prune: exploring the
//!   efficacy of pruning for model compression. arXiv:1710.01878.
//! - Molchanov, P., et al. (2017). Pruning convolutional neural networks for
//!   resource efficient inference. ICLR.

pub mod error;
pub mod importance;
pub mod layer;
pub mod prelude;
pub mod schedule;
pub mod tensor;
pub mod threshold;
pub mod updater;

pub use error::PruningError;
pub use importance::{
    importance_factory, Importance, ImportanceStats, MagnitudeImportance, ScoreAccumulator,
    TaylorImportance,
};
pub use layer::PrunableLayer;
pub use schedule::{AgpCurve, ScheduleConfig, SparsityCurve, SparsityScheduler};
pub use tensor::Tensor;
pub use threshold::ThresholdFit;
pub use updater::{MaskUpdate, MaskUpdater};
