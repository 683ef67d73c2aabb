//! Running elementwise importance accumulator.

use crate::tensor::Tensor;

/// Elementwise running sum plus an observation counter.
///
/// Backs gradient-based importance sources: each backward pass adds one
/// contribution tensor, and the score read back is the time-average of
/// everything accumulated since the last reset.
///
/// # Invariants
/// - `sum` keeps the shape it was reset to
/// - `count` equals the number of `accumulate` calls since the last reset
#[derive(Debug, Clone)]
pub struct ScoreAccumulator {
    /// Elementwise running sum of contributions
    sum: Tensor,
    /// Observations accumulated since the last reset
    count: u32,
}

impl ScoreAccumulator {
    /// Create a zeroed accumulator for the given shape.
    #[must_use]
    pub fn new(shape: &[usize]) -> Self {
        Self {
            sum: Tensor::zeros(shape),
            count: 0,
        }
    }

    /// Zero the running sum and the counter, starting a fresh window.
    pub fn reset(&mut self, shape: &[usize]) {
        self.sum = Tensor::zeros(shape);
        self.count = 0;
    }

    /// Add one contribution elementwise and bump the counter.
    ///
    /// The caller guarantees the contribution matches the accumulator's
    /// shape; shape checking happens at the observation boundary.
    pub fn accumulate(&mut self, contribution: &Tensor) {
        for (acc, &c) in self.sum.data_mut().iter_mut().zip(contribution.data()) {
            *acc += c;
        }
        self.count += 1;
    }

    /// Time-average of accumulated contributions.
    ///
    /// With zero observations the untouched all-zero sum is returned
    /// unmodified; the division by the observation count is guarded, not
    /// an error.
    #[must_use]
    pub fn average(&self) -> Tensor {
        if self.count == 0 {
            return self.sum.clone();
        }
        let n = self.count as f32;
        let data: Vec<f32> = self.sum.data().iter().map(|&v| v / n).collect();
        Tensor::new(&data, self.sum.shape())
    }

    /// Observations accumulated since the last reset.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_starts_zeroed() {
        let acc = ScoreAccumulator::new(&[2, 2]);
        assert_eq!(acc.count(), 0);
        assert!(acc.average().data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_accumulate_and_average() {
        let mut acc = ScoreAccumulator::new(&[3]);
        acc.accumulate(&Tensor::from_slice(&[1.0, 2.0, 3.0]));
        acc.accumulate(&Tensor::from_slice(&[3.0, 2.0, 1.0]));

        assert_eq!(acc.count(), 2);
        assert_eq!(acc.average().data(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_average_with_zero_count_returns_zero_sum() {
        // Guarded division: no observations means the raw zero sum,
        // not NaN from 0/0.
        let acc = ScoreAccumulator::new(&[4]);
        let avg = acc.average();
        assert!(avg.data().iter().all(|&v| v == 0.0));
        assert!(avg.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_reset_zeroes_sum_and_count() {
        let mut acc = ScoreAccumulator::new(&[2]);
        acc.accumulate(&Tensor::from_slice(&[5.0, 5.0]));
        assert_eq!(acc.count(), 1);

        acc.reset(&[2]);
        assert_eq!(acc.count(), 0);
        assert!(acc.average().data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_average_does_not_mutate_sum() {
        let mut acc = ScoreAccumulator::new(&[2]);
        acc.accumulate(&Tensor::from_slice(&[4.0, 8.0]));
        let first = acc.average();
        let second = acc.average();
        assert_eq!(first.data(), second.data());
        assert_eq!(first.data(), &[4.0, 8.0]);
    }
}
