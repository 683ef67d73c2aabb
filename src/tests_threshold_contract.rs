// =========================================================================
// FALSIFY-THR: threshold statistics contract (podar threshold)
//
// Properties over the percentile/average machinery that mask updates
// depend on:
//   - the pruned fraction lands within 1/n of the requested sparsity
//   - survivor averages never decrease as the threshold tightens
//   - the quality->threshold inverse keeps no more than the forward
//     quantity map kept
// =========================================================================

use super::*;
use proptest::prelude::*;

/// Strictly increasing positive scores: base values sorted ascending,
/// then offset by their rank so no two elements tie.
fn distinct_scores(n: usize, seed: u32) -> Tensor {
    let mut base: Vec<f32> = (0..n)
        .map(|i| ((i as f32 + seed as f32) * 0.37).sin().abs() * 50.0)
        .collect();
    base.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let data: Vec<f32> = base.iter().enumerate().map(|(i, &v)| v + i as f32).collect();
    Tensor::from_slice(&data)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// FALSIFY-THR-001: pruned fraction is within 1/n of the target sparsity
    #[test]
    fn falsify_thr_001_pruned_fraction_tracks_sparsity(
        n in 2..=64usize,
        seed in 0..1000u32,
        sparsity in 0.0f32..=1.0f32,
    ) {
        let scores = distinct_scores(n, seed);
        let thr = importance_threshold(&scores, sparsity).expect("non-empty scores");
        let mask = compute_mask(&scores, thr);

        let pruned = mask.data().iter().filter(|&&m| m == 0.0).count();
        let achieved = pruned as f32 / n as f32;
        let slack = 1.0 / n as f32 + 1e-6;

        prop_assert!(
            (achieved - sparsity).abs() <= slack,
            "FALSIFIED THR-001: target={}, achieved={}, n={}",
            sparsity, achieved, n
        );
    }

    /// FALSIFY-THR-002: survivor average is non-decreasing in the threshold
    #[test]
    fn falsify_thr_002_survivor_average_monotone(
        n in 2..=64usize,
        seed in 0..1000u32,
        a in 0.0f32..=1.0f32,
        b in 0.0f32..=1.0f32,
    ) {
        let scores = distinct_scores(n, seed);
        let max = scores.data().iter().fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        let min = scores.data().iter().fold(f32::INFINITY, |m, &v| m.min(v));

        // Two thresholds inside [min, max], ordered.
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let thr_lo = min + lo * (max - min);
        let thr_hi = min + hi * (max - min);

        let avg_lo = avg_importance_from_threshold(&scores, thr_lo).expect("survivors at <= max");
        let avg_hi = avg_importance_from_threshold(&scores, thr_hi).expect("survivors at <= max");

        prop_assert!(
            avg_lo <= avg_hi + 1e-3,
            "FALSIFIED THR-002: tightening the threshold lowered the survivor average \
             ({} at {} vs {} at {})",
            avg_lo, thr_lo, avg_hi, thr_hi
        );
    }

    /// FALSIFY-THR-003: inverse of the forward quantity map keeps at most
    /// (1 - sparsity) of the population, up to flooring slack
    #[test]
    fn falsify_thr_003_round_trip_fraction_bound(
        n in 2..=64usize,
        seed in 0..1000u32,
        sparsity in 0.0f32..=0.95f32,
    ) {
        let scores = distinct_scores(n, seed);
        let target_avg = avg_importance_from_sparsity(&scores, sparsity).expect("valid input");
        let fit = threshold_from_avg_importance(&scores, target_avg).expect("non-empty scores");

        let slack = 2.0 / n as f32 + 1e-6;
        prop_assert!(
            fit.fraction_kept <= 1.0 - sparsity + slack,
            "FALSIFIED THR-003: sparsity={}, fraction_kept={}, n={}",
            sparsity, fit.fraction_kept, n
        );
    }

    /// FALSIFY-THR-004: a fitted threshold's achieved average respects the
    /// target whenever a qualifying rank exists
    #[test]
    fn falsify_thr_004_achieved_average_at_or_below_target(
        n in 2..=64usize,
        seed in 0..1000u32,
        quantile in 0.0f32..=1.0f32,
    ) {
        let scores = distinct_scores(n, seed);
        let min = scores.data().iter().fold(f32::INFINITY, |m, &v| m.min(v));
        let max = scores.data().iter().fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        let target = min + quantile * (max - min);

        let fit = threshold_from_avg_importance(&scores, target).expect("non-empty scores");
        if fit.fraction_kept < 1.0 {
            prop_assert!(
                fit.achieved_avg <= target + 1e-3,
                "FALSIFIED THR-004: achieved_avg={} exceeds target={}",
                fit.achieved_avg, target
            );
        }
    }
}
