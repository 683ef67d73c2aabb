//! Convenient re-exports for common usage.
//!
//! ```
//! use podar::prelude::*;
//! ```

pub use crate::error::PruningError;
pub use crate::importance::{
    importance_factory, Importance, ImportanceStats, MagnitudeImportance, ScoreAccumulator,
    TaylorImportance,
};
pub use crate::layer::PrunableLayer;
pub use crate::schedule::{AgpCurve, ScheduleConfig, SparsityCurve, SparsityScheduler};
pub use crate::tensor::Tensor;
pub use crate::threshold::ThresholdFit;
pub use crate::updater::{MaskUpdate, MaskUpdater};
