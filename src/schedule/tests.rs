use super::*;

fn two_layer_config() -> ScheduleConfig {
    ScheduleConfig::new(0, 2, 10)
        .with_layer("fc1", 0.8)
        .with_layer("fc2", 0.5)
}

// ==========================================================================
// FALSIFICATION: Stage counting over the epoch range
// ==========================================================================
#[test]
fn test_num_stages_formula() {
    let scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    // (10 - 0) / 2 + 1 = 6
    assert_eq!(scheduler.num_stages(), 6, "SCH-01 FALSIFIED: num_stages");
}

#[test]
fn test_stage_zero_before_starting_epoch() {
    let mut scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    assert_eq!(
        scheduler.compute_stage_count(-1),
        0,
        "SCH-02 FALSIFIED: stage before starting_epoch must be 0"
    );
}

#[test]
fn test_stage_one_at_starting_epoch() {
    let mut scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    assert_eq!(scheduler.compute_stage_count(0), 1);
}

#[test]
fn test_stage_saturates_at_ending_epoch() {
    let mut scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    assert_eq!(
        scheduler.compute_stage_count(10),
        scheduler.num_stages(),
        "SCH-03 FALSIFIED: stage at ending_epoch must be num_stages"
    );
    assert_eq!(scheduler.compute_stage_count(1000), scheduler.num_stages());
}

#[test]
fn test_stage_floor_division_with_negative_offset() {
    // starting_epoch 5, frequency 2: epoch 0 sits 5 epochs before the
    // start; floor division must clamp to 0, not round toward zero.
    let config = ScheduleConfig::new(5, 2, 15).with_layer("fc", 0.9);
    let mut scheduler = SparsityScheduler::new(config).expect("valid config");
    assert_eq!(scheduler.compute_stage_count(0), 0);
    assert_eq!(scheduler.compute_stage_count(4), 0);
    assert_eq!(scheduler.compute_stage_count(5), 1);
    assert_eq!(scheduler.compute_stage_count(6), 1);
    assert_eq!(scheduler.compute_stage_count(7), 2);
}

#[test]
fn test_single_stage_schedule() {
    // starting == ending: exactly one stage.
    let config = ScheduleConfig::new(3, 1, 3).with_layer("fc", 0.5);
    let scheduler = SparsityScheduler::new(config).expect("valid config");
    assert_eq!(scheduler.num_stages(), 1);
}

// ==========================================================================
// FALSIFICATION: AGP ramp values (literal formula)
// ==========================================================================
#[test]
fn test_agp_stage_zero_is_one() {
    let curve = AgpCurve::default();
    // The initial term is a fixed 1.0, so stage 0 evaluates to 1.0
    // regardless of the target.
    assert!((curve.value(0.8, 0, 6) - 1.0).abs() < 1e-6);
    assert!((curve.value(0.1, 0, 6) - 1.0).abs() < 1e-6);
}

#[test]
fn test_agp_final_stage_reaches_target() {
    let curve = AgpCurve::default();
    assert!(
        (curve.value(0.8, 6, 6) - 0.8).abs() < 1e-6,
        "SCH-04 FALSIFIED: the ramp must reach final_sparsity at the last stage"
    );
}

#[test]
fn test_agp_monotone_decreasing_across_stages() {
    let curve = AgpCurve::default();
    let num_stages = 8;
    let mut previous = f32::INFINITY;
    for stage in 0..=num_stages {
        let value = curve.value(0.6, stage, num_stages);
        assert!(
            value <= previous + 1e-6,
            "SCH-05 FALSIFIED: ramp must relax monotonically, rose at stage {stage}"
        );
        previous = value;
    }
}

#[test]
fn test_agp_linear_with_unit_exponent() {
    let curve = AgpCurve::new(1.0);
    // final 0.8 over 4 stages: 1.0, 0.95, 0.9, 0.85, 0.8
    assert!((curve.value(0.8, 0, 4) - 1.0).abs() < 1e-6);
    assert!((curve.value(0.8, 1, 4) - 0.95).abs() < 1e-6);
    assert!((curve.value(0.8, 2, 4) - 0.9).abs() < 1e-6);
    assert!((curve.value(0.8, 3, 4) - 0.85).abs() < 1e-6);
    assert!((curve.value(0.8, 4, 4) - 0.8).abs() < 1e-6);
}

#[test]
fn test_agp_cubic_default_exponent() {
    let curve = AgpCurve::default();
    assert!((curve.exponent() - 3.0).abs() < 1e-6);
    // final 0.5 at stage 1 of 2: 0.5 - (-0.5) * 0.5^3 = 0.5625
    assert!((curve.value(0.5, 1, 2) - 0.5625).abs() < 1e-6);
}

// ==========================================================================
// FALSIFICATION: step_all drives the current-sparsity map
// ==========================================================================
#[test]
fn test_current_sparsity_initialized_to_zero() {
    let scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    assert_eq!(scheduler.current_sparsity()["fc1"], 0.0);
    assert_eq!(scheduler.current_sparsity()["fc2"], 0.0);
}

#[test]
fn test_step_all_updates_every_layer() {
    let mut scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    let targets = scheduler.step_all(10);

    assert_eq!(targets.len(), 2);
    assert!(
        (targets["fc1"] - 0.8).abs() < 1e-6,
        "SCH-06 FALSIFIED: fc1 must reach its final target at the last stage"
    );
    assert!((targets["fc2"] - 0.5).abs() < 1e-6);
}

#[test]
fn test_step_all_before_start_is_full_ramp_value() {
    let mut scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    let targets = scheduler.step_all(-5);
    // Stage 0: the literal AGP ramp evaluates to 1.0 for every layer.
    assert!((targets["fc1"] - 1.0).abs() < 1e-6);
    assert!((targets["fc2"] - 1.0).abs() < 1e-6);
}

#[test]
fn test_step_all_monotone_in_epoch() {
    let mut scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    let mut previous = f32::INFINITY;
    for epoch in 0..=10 {
        let value = scheduler.step_all(epoch)["fc1"];
        assert!(
            value <= previous + 1e-6,
            "SCH-07 FALSIFIED: per-epoch targets must relax monotonically"
        );
        previous = value;
    }
}

#[test]
fn test_step_all_updates_stage_count() {
    let mut scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    scheduler.step_all(4);
    assert_eq!(scheduler.stage_count(), 3);
}

// ==========================================================================
// FALSIFICATION: Misconfiguration is a construction error
// ==========================================================================
#[test]
fn test_zero_frequency_rejected() {
    let config = ScheduleConfig::new(0, 0, 10).with_layer("fc", 0.5);
    assert!(
        matches!(
            SparsityScheduler::new(config),
            Err(PruningError::InvalidSchedule { .. })
        ),
        "SCH-08 FALSIFIED: frequency 0 must be rejected at construction"
    );
}

#[test]
fn test_inverted_epoch_bounds_rejected() {
    let config = ScheduleConfig::new(10, 1, 5).with_layer("fc", 0.5);
    assert!(matches!(
        SparsityScheduler::new(config),
        Err(PruningError::InvalidSchedule { .. })
    ));
}

#[test]
fn test_out_of_range_target_rejected() {
    let config = ScheduleConfig::new(0, 1, 10).with_layer("fc", 1.5);
    assert!(matches!(
        SparsityScheduler::new(config),
        Err(PruningError::InvalidSparsity { .. })
    ));
}

#[test]
fn test_unknown_curve_rejected_at_construction() {
    let config = ScheduleConfig::new(0, 1, 10)
        .with_layer("fc", 0.5)
        .with_curve("cosine");
    assert!(
        matches!(
            SparsityScheduler::new(config),
            Err(PruningError::UnknownCurve { .. })
        ),
        "SCH-09 FALSIFIED: unknown curve names must fail at construction, not first use"
    );
}

#[test]
fn test_curve_factory_resolves_agp() {
    let config = ScheduleConfig::new(0, 1, 10);
    let curve = curve_factory("agp", &config).expect("known name");
    assert_eq!(curve.name(), "agp");
}

// ==========================================================================
// FALSIFICATION: Configuration serde round trip and defaults
// ==========================================================================
#[test]
fn test_config_deserializes_with_defaults() {
    let json = r#"{
        "starting_epoch": 0,
        "frequency": 2,
        "ending_epoch": 10,
        "final_sparsity": { "fc1": 0.8 }
    }"#;
    let config: ScheduleConfig = serde_json::from_str(json).expect("valid config JSON");

    assert_eq!(config.curve, "agp");
    assert!((config.exponent - 3.0).abs() < 1e-6);
    assert_eq!(config.final_sparsity["fc1"], 0.8);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = two_layer_config().with_exponent(2.0);
    let json = serde_json::to_string(&config).expect("serializable");
    let back: ScheduleConfig = serde_json::from_str(&json).expect("deserializable");

    assert_eq!(back.starting_epoch, config.starting_epoch);
    assert_eq!(back.frequency, config.frequency);
    assert_eq!(back.ending_epoch, config.ending_epoch);
    assert_eq!(back.final_sparsity, config.final_sparsity);
    assert!((back.exponent - 2.0).abs() < 1e-6);
}

#[test]
fn test_scheduler_debug_names_curve() {
    let scheduler = SparsityScheduler::new(two_layer_config()).expect("valid config");
    let debug = format!("{scheduler:?}");
    assert!(debug.contains("agp"));
}
