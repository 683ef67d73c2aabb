//! Error types for pruning operations.
//!
//! Provides rich error context for pruning operations following
//! Toyota Way Jidoka (stop on defect) principles: precondition
//! violations are surfaced immediately, never substituted with a
//! default, since a silent default would mask a misconfigured
//! pruning schedule.

use std::fmt;

/// Pruning operation errors with detailed context.
///
/// # Toyota Way: Andon
/// Errors contain actionable information for diagnosis. Each variant
/// provides specific context to help identify and resolve issues.
#[derive(Debug, Clone)]
pub enum PruningError {
    /// Importance array has zero elements.
    ///
    /// Percentile thresholds and survivor averages are undefined over
    /// an empty score array.
    EmptyImportance {
        /// Operation that required a non-empty score
        method: String,
    },

    /// Tensor shape mismatch.
    ///
    /// Occurs when a gradient or mask tensor doesn't align with the
    /// weight tensor it must correspond to elementwise.
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape found
        got: Vec<usize>,
    },

    /// Invalid sparsity target.
    ///
    /// Sparsity must be a finite fraction in [0.0, 1.0].
    InvalidSparsity {
        /// Provided value
        value: f32,
        /// Constraint description
        constraint: String,
    },

    /// Invalid sparsity mask.
    ///
    /// Masks must contain only binary values (0.0 or 1.0).
    InvalidMask {
        /// Reason for invalidity
        reason: String,
    },

    /// A threshold above the maximum score left no surviving weights.
    ///
    /// The average importance of survivors divides by the survivor
    /// count; callers must guard against pathological thresholds.
    NoSurvivors {
        /// The offending threshold
        threshold: f32,
    },

    /// Misconfigured pruning schedule.
    ///
    /// Epoch bounds and frequency must yield at least one stage.
    InvalidSchedule {
        /// Description of the invalid configuration
        message: String,
    },

    /// Schedule-curve name not present in the registry.
    UnknownCurve {
        /// The name that failed to resolve
        name: String,
    },

    /// Importance-source name not present in the registry.
    UnknownImportance {
        /// The name that failed to resolve
        name: String,
    },

    /// Gradient observation delivered after the source was closed.
    ///
    /// A closed source has released its gradient subscription; further
    /// observations indicate a release-ordering bug in the caller.
    SourceClosed {
        /// Source that rejected the observation
        method: String,
    },
}

impl fmt::Display for PruningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PruningError::EmptyImportance { method } => {
                write!(f, "{method} requires a non-empty importance array")
            }
            PruningError::ShapeMismatch { expected, got } => {
                write!(f, "Shape mismatch: expected {expected:?}, got {got:?}")
            }
            PruningError::InvalidSparsity { value, constraint } => {
                write!(f, "Invalid sparsity value {value}: {constraint}")
            }
            PruningError::InvalidMask { reason } => {
                write!(f, "Invalid sparsity mask: {reason}")
            }
            PruningError::NoSurvivors { threshold } => {
                write!(
                    f,
                    "Threshold {threshold} leaves no surviving weights; survivor average is undefined"
                )
            }
            PruningError::InvalidSchedule { message } => {
                write!(f, "Invalid pruning schedule: {message}")
            }
            PruningError::UnknownCurve { name } => {
                write!(f, "Unknown schedule curve '{name}'")
            }
            PruningError::UnknownImportance { name } => {
                write!(f, "Unknown importance source '{name}'")
            }
            PruningError::SourceClosed { method } => {
                write!(f, "Importance source '{method}' received an observation after close()")
            }
        }
    }
}

impl std::error::Error for PruningError {}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // FALSIFICATION: Error variants carry actionable context
    // ==========================================================================
    #[test]
    fn test_empty_importance_error_names_method() {
        let err = PruningError::EmptyImportance {
            method: "importance_threshold".to_string(),
        };
        assert!(
            err.to_string().contains("importance_threshold"),
            "ERR-01 FALSIFIED: Error message must contain method name"
        );
    }

    #[test]
    fn test_shape_mismatch_error() {
        let err = PruningError::ShapeMismatch {
            expected: vec![512, 256],
            got: vec![256, 512],
        };
        let msg = err.to_string();
        assert!(
            msg.contains("512") && msg.contains("256"),
            "ERR-02 FALSIFIED: Shape mismatch must show both shapes"
        );
    }

    #[test]
    fn test_invalid_sparsity_error() {
        let err = PruningError::InvalidSparsity {
            value: 1.5,
            constraint: "must be between 0.0 and 1.0".to_string(),
        };
        let msg = err.to_string();
        assert!(
            msg.contains("1.5"),
            "ERR-03 FALSIFIED: Invalid sparsity must show value"
        );
        assert!(
            msg.contains("0.0") && msg.contains("1.0"),
            "ERR-03 FALSIFIED: Invalid sparsity must show constraint"
        );
    }

    #[test]
    fn test_no_survivors_error_shows_threshold() {
        let err = PruningError::NoSurvivors { threshold: 99.0 };
        assert!(
            err.to_string().contains("99"),
            "ERR-04 FALSIFIED: NoSurvivors must show the offending threshold"
        );
    }

    #[test]
    fn test_invalid_schedule_error() {
        let err = PruningError::InvalidSchedule {
            message: "ending_epoch 2 precedes starting_epoch 5".to_string(),
        };
        assert!(
            err.to_string().contains("ending_epoch 2"),
            "ERR-05 FALSIFIED: Schedule error must contain the message"
        );
    }

    #[test]
    fn test_unknown_curve_error() {
        let err = PruningError::UnknownCurve {
            name: "cosine".to_string(),
        };
        assert!(
            err.to_string().contains("cosine"),
            "ERR-06 FALSIFIED: Unknown curve must name the curve"
        );
    }

    #[test]
    fn test_unknown_importance_error() {
        let err = PruningError::UnknownImportance {
            name: "fisher".to_string(),
        };
        assert!(
            err.to_string().contains("fisher"),
            "ERR-07 FALSIFIED: Unknown importance must name the source"
        );
    }

    #[test]
    fn test_source_closed_error() {
        let err = PruningError::SourceClosed {
            method: "taylor".to_string(),
        };
        let msg = err.to_string();
        assert!(
            msg.contains("taylor") && msg.contains("close"),
            "ERR-08 FALSIFIED: SourceClosed must name the source and mention close"
        );
    }

    #[test]
    fn test_invalid_mask_error() {
        let err = PruningError::InvalidMask {
            reason: "Mask contains non-binary value: 0.5".to_string(),
        };
        assert!(
            err.to_string().contains("non-binary"),
            "ERR-09 FALSIFIED: Invalid mask error must contain reason"
        );
    }

    // ==========================================================================
    // FALSIFICATION: Error implements std::error::Error and is Clone
    // ==========================================================================
    #[test]
    fn test_error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PruningError>();
    }

    #[test]
    fn test_error_is_clone() {
        let err = PruningError::ShapeMismatch {
            expected: vec![10, 20],
            got: vec![20, 10],
        };
        let cloned = err.clone();
        assert_eq!(
            err.to_string(),
            cloned.to_string(),
            "ERR-10 FALSIFIED: Cloned error must be identical"
        );
    }

    #[test]
    fn test_error_debug_impl() {
        let err = PruningError::NoSurvivors { threshold: 1.0 };
        assert!(
            format!("{err:?}").contains("NoSurvivors"),
            "ERR-11 FALSIFIED: Debug must show variant name"
        );
    }
}
