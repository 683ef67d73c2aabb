//! Staged sparsity scheduling.
//!
//! Given a training epoch, the scheduler computes the target sparsity
//! for every named layer by walking a discrete stage counter through a
//! pluggable ramp curve. One stage elapses per `frequency` epochs
//! between `starting_epoch` and `ending_epoch`; before the start the
//! stage is 0, and at or beyond the end it saturates at `num_stages`.
//!
//! # References
//! - Zhu, M., & Gupta, S. (2017). To prune, or not to prune: exploring
//!   the efficacy of pruning for model compression. arXiv:1710.01878.

mod agp;

pub use agp::AgpCurve;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PruningError;

/// Sparsity ramp over discrete stages.
///
/// # Object Safety
/// Object-safe; the closed set of curves is resolved by name through
/// [`curve_factory`].
pub trait SparsityCurve: Send + Sync {
    /// Sparsity value for a layer at the given stage.
    fn value(&self, final_sparsity: f32, stage: i64, num_stages: i64) -> f32;

    /// Name of this curve for diagnostics.
    fn name(&self) -> &'static str;
}

/// Static scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// First epoch of the pruning window
    pub starting_epoch: i64,
    /// Epochs per stage
    pub frequency: i64,
    /// Last epoch of the pruning window
    pub ending_epoch: i64,
    /// Final target sparsity per layer name, each in [0, 1]
    #[serde(default)]
    pub final_sparsity: BTreeMap<String, f32>,
    /// Ramp curve name (registry lookup)
    #[serde(default = "default_curve")]
    pub curve: String,
    /// Polynomial exponent for the AGP curve
    #[serde(default = "default_exponent")]
    pub exponent: f32,
}

fn default_curve() -> String {
    "agp".to_string()
}

fn default_exponent() -> f32 {
    3.0
}

impl ScheduleConfig {
    /// Configuration with the default AGP curve and no layers.
    #[must_use]
    pub fn new(starting_epoch: i64, frequency: i64, ending_epoch: i64) -> Self {
        Self {
            starting_epoch,
            frequency,
            ending_epoch,
            final_sparsity: BTreeMap::new(),
            curve: default_curve(),
            exponent: default_exponent(),
        }
    }

    /// Add a layer with its final target sparsity.
    #[must_use]
    pub fn with_layer(mut self, name: impl Into<String>, final_sparsity: f32) -> Self {
        self.final_sparsity.insert(name.into(), final_sparsity);
        self
    }

    /// Select the ramp curve by name.
    #[must_use]
    pub fn with_curve(mut self, name: impl Into<String>) -> Self {
        self.curve = name.into();
        self
    }

    /// Override the polynomial exponent.
    #[must_use]
    pub fn with_exponent(mut self, exponent: f32) -> Self {
        self.exponent = exponent;
        self
    }
}

/// Resolve a ramp curve by configured name.
///
/// Closed registry built at construction time; no ambient lookup.
/// Unknown names are a configuration error.
pub fn curve_factory(
    name: &str,
    config: &ScheduleConfig,
) -> Result<Box<dyn SparsityCurve>, PruningError> {
    match name {
        "agp" => Ok(Box::new(AgpCurve::new(config.exponent))),
        _ => Err(PruningError::UnknownCurve {
            name: name.to_string(),
        }),
    }
}

/// Staged sparsity scheduler.
///
/// State machine over stages `0..=num_stages`, with
/// `num_stages = (ending_epoch - starting_epoch) / frequency + 1`.
/// The stage count and the current-sparsity map mutate on every
/// [`step_all`](SparsityScheduler::step_all) query and are never
/// otherwise reset.
pub struct SparsityScheduler {
    starting_epoch: i64,
    frequency: i64,
    num_stages: i64,
    final_sparsity: BTreeMap<String, f32>,
    current_sparsity: BTreeMap<String, f32>,
    stage_count: i64,
    curve: Box<dyn SparsityCurve>,
}

impl SparsityScheduler {
    /// Build a scheduler from a validated configuration.
    ///
    /// # Errors
    /// - [`PruningError::InvalidSchedule`] for `frequency < 1` or
    ///   `ending_epoch < starting_epoch`
    /// - [`PruningError::InvalidSparsity`] for a per-layer target
    ///   outside [0, 1]
    /// - [`PruningError::UnknownCurve`] for a curve name outside the registry
    pub fn new(config: ScheduleConfig) -> Result<Self, PruningError> {
        if config.frequency < 1 {
            return Err(PruningError::InvalidSchedule {
                message: format!("frequency {} must be at least 1", config.frequency),
            });
        }
        if config.ending_epoch < config.starting_epoch {
            return Err(PruningError::InvalidSchedule {
                message: format!(
                    "ending_epoch {} precedes starting_epoch {}",
                    config.ending_epoch, config.starting_epoch
                ),
            });
        }
        for (layer, &target) in &config.final_sparsity {
            if !target.is_finite() || !(0.0..=1.0).contains(&target) {
                return Err(PruningError::InvalidSparsity {
                    value: target,
                    constraint: format!("target for layer '{layer}' must be between 0.0 and 1.0"),
                });
            }
        }

        let curve = curve_factory(&config.curve, &config)?;
        let num_stages = (config.ending_epoch - config.starting_epoch) / config.frequency + 1;
        let current_sparsity: BTreeMap<String, f32> = config
            .final_sparsity
            .keys()
            .map(|name| (name.clone(), 0.0))
            .collect();

        Ok(Self {
            starting_epoch: config.starting_epoch,
            frequency: config.frequency,
            num_stages,
            final_sparsity: config.final_sparsity,
            current_sparsity,
            stage_count: 0,
            curve,
        })
    }

    /// Stage reached at the given epoch, clamped to `[0, num_stages]`.
    ///
    /// Floor division, so epochs before `starting_epoch` land at stage 0
    /// and epochs at or beyond `ending_epoch` saturate at `num_stages`.
    pub fn compute_stage_count(&mut self, epoch: i64) -> i64 {
        let raw = 1 + (epoch - self.starting_epoch).div_euclid(self.frequency);
        self.stage_count = raw.clamp(0, self.num_stages);
        self.stage_count
    }

    /// Recompute the stage for `epoch` and apply the ramp curve to every
    /// configured layer, updating and returning the current-sparsity map.
    pub fn step_all(&mut self, epoch: i64) -> &BTreeMap<String, f32> {
        self.compute_stage_count(epoch);
        for (layer, &final_sparsity) in &self.final_sparsity {
            let value = self
                .curve
                .value(final_sparsity, self.stage_count, self.num_stages);
            if let Some(current) = self.current_sparsity.get_mut(layer) {
                *current = value;
            }
        }
        &self.current_sparsity
    }

    /// Current sparsity target per layer, as of the last query.
    #[must_use]
    pub fn current_sparsity(&self) -> &BTreeMap<String, f32> {
        &self.current_sparsity
    }

    /// Stage reached by the last query.
    #[must_use]
    pub fn stage_count(&self) -> i64 {
        self.stage_count
    }

    /// Total number of stages in the schedule (at least 1).
    #[must_use]
    pub fn num_stages(&self) -> i64 {
        self.num_stages
    }

    /// Name of the configured ramp curve.
    #[must_use]
    pub fn curve_name(&self) -> &'static str {
        self.curve.name()
    }
}

impl std::fmt::Debug for SparsityScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparsityScheduler")
            .field("starting_epoch", &self.starting_epoch)
            .field("frequency", &self.frequency)
            .field("num_stages", &self.num_stages)
            .field("stage_count", &self.stage_count)
            .field("curve", &self.curve.name())
            .field("layers", &self.final_sparsity.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
