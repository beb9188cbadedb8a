//! Born-rule sampling over a dense amplitude vector.
//!
//! Sampling builds a cumulative-weight partition of `[0, W)` where
//! `W = Σ |a_k|²`, then maps each uniform draw `u ∈ [0, W)` to the first
//! cell whose upper edge exceeds `u`:
//!
//! ```text
//!   weights     w_0      w_1   w_2=0      w_3
//!             |--------|-----||--------------|
//!   cumulative c_0      c_1   c_2=c_1        c_3 = W
//! ```
//!
//! Zero-weight cells have an empty interval and are never selected. The
//! vector is not required to be normalized; outcomes are drawn in
//! proportion to the weights actually present.

use num_complex::Complex32;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::trace;

use crate::error::{StateError, StateResult};

#[inline]
fn weight(amplitude: &Complex32) -> f64 {
    f64::from(amplitude.norm_sqr())
}

/// Prefix sums of squared amplitude magnitudes.
#[derive(Debug, Clone)]
pub struct CumulativeWeights {
    cumulative: Vec<f64>,
    total: f64,
    /// Highest index with positive weight.
    last_positive: usize,
}

impl CumulativeWeights {
    /// Build the partition on the calling thread.
    pub fn build(amplitudes: &[Complex32]) -> StateResult<Self> {
        let mut cumulative = Vec::with_capacity(amplitudes.len());
        let mut acc = 0.0;
        for a in amplitudes {
            acc += weight(a);
            cumulative.push(acc);
        }
        Self::from_cumulative(cumulative)
    }

    /// Build the partition on the current rayon pool.
    ///
    /// Each chunk computes local prefix sums, a serial scan turns the chunk
    /// totals into offsets, and the offsets are added back in parallel.
    /// The result is monotone across chunk boundaries.
    pub fn build_parallel(amplitudes: &[Complex32], chunk_len: usize) -> StateResult<Self> {
        let chunk_len = chunk_len.max(1);
        let mut cumulative = vec![0.0; amplitudes.len()];

        cumulative
            .par_chunks_mut(chunk_len)
            .zip(amplitudes.par_chunks(chunk_len))
            .for_each(|(out, amps)| {
                let mut acc = 0.0;
                for (c, a) in out.iter_mut().zip(amps) {
                    acc += weight(a);
                    *c = acc;
                }
            });

        let mut offsets = Vec::with_capacity(cumulative.len().div_ceil(chunk_len));
        let mut running = 0.0;
        for chunk in cumulative.chunks(chunk_len) {
            offsets.push(running);
            running += chunk[chunk.len() - 1];
        }
        trace!(chunks = offsets.len(), chunk_len, "built chunk offsets");

        cumulative
            .par_chunks_mut(chunk_len)
            .zip(offsets.par_iter())
            .for_each(|(out, &offset)| {
                for c in out {
                    *c += offset;
                }
            });

        Self::from_cumulative(cumulative)
    }

    fn from_cumulative(cumulative: Vec<f64>) -> StateResult<Self> {
        let total = cumulative.last().copied().unwrap_or(0.0);
        if !(total.is_finite() && total > 0.0) {
            return Err(StateError::DegenerateDistribution {
                total_weight: total,
            });
        }
        let last_positive = cumulative.partition_point(|&c| c < total);
        Ok(Self {
            cumulative,
            total,
            last_positive,
        })
    }

    /// Total weight `Σ |a_k|²`.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Always false for a successfully built partition.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Draw one outcome index.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let u = rng.r#gen::<f64>() * self.total;
        let k = self.cumulative.partition_point(|&c| c <= u);
        // u can round up to total; that draw belongs to the last live cell.
        k.min(self.last_positive) as u64
    }

    /// Append `num_samples` draws to `out` in draw order.
    pub fn sample_into<R: Rng + ?Sized>(&self, num_samples: usize, rng: &mut R, out: &mut Vec<u64>) {
        out.reserve(num_samples);
        for _ in 0..num_samples {
            out.push(self.draw(rng));
        }
    }

    /// Append `num_samples` draws produced by one parallel worker per seed.
    ///
    /// Each block gets its own generator seeded from `seeds`. Blocks are
    /// contiguous and concatenated in block order, so `out` still receives
    /// exactly `num_samples` independent draws.
    ///
    /// # Panics
    ///
    /// Panics if `seeds` is empty while `num_samples > 0`.
    pub fn sample_blocks_into(&self, num_samples: usize, seeds: &[u64], out: &mut Vec<u64>) {
        assert!(
            num_samples == 0 || !seeds.is_empty(),
            "sample_blocks_into needs at least one seed"
        );
        let num_blocks = seeds.len().max(1);
        let base = num_samples / num_blocks;
        let extra = num_samples % num_blocks;

        let draws: Vec<Vec<u64>> = seeds
            .par_iter()
            .enumerate()
            .map(|(b, &seed)| {
                let len = base + usize::from(b < extra);
                let mut block_rng = StdRng::seed_from_u64(seed);
                let mut block = Vec::with_capacity(len);
                self.sample_into(len, &mut block_rng, &mut block);
                block
            })
            .collect();

        out.reserve(num_samples);
        for block in draws {
            out.extend(block);
        }
    }

    /// Per-outcome probabilities, normalized by the total weight.
    pub fn probabilities(&self) -> Vec<f64> {
        let mut prev = 0.0;
        self.cumulative
            .iter()
            .map(|&c| {
                let p = (c - prev) / self.total;
                prev = c;
                p
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn amps(values: &[f32]) -> Vec<Complex32> {
        values.iter().map(|&v| Complex32::new(v, 0.0)).collect()
    }

    #[test]
    fn test_all_zero_is_degenerate() {
        let err = CumulativeWeights::build(&amps(&[0.0, 0.0])).unwrap_err();
        assert!(matches!(
            err,
            StateError::DegenerateDistribution { total_weight } if total_weight == 0.0
        ));
        assert!(CumulativeWeights::build_parallel(&amps(&[0.0; 8]), 3).is_err());
    }

    #[test]
    fn test_nan_is_degenerate() {
        assert!(CumulativeWeights::build(&amps(&[f32::NAN, 1.0])).is_err());
        assert!(CumulativeWeights::build(&amps(&[f32::INFINITY, 1.0])).is_err());
    }

    #[test]
    fn test_lowest_draw_skips_leading_zero_cells() {
        let w = CumulativeWeights::build(&amps(&[0.0, 0.0, 1.0, 0.0])).unwrap();
        let mut rng = StepRng::new(0, 0);
        assert_eq!(w.draw(&mut rng), 2);
    }

    #[test]
    fn test_highest_draw_skips_trailing_zero_cells() {
        let w = CumulativeWeights::build(&amps(&[0.5, 0.5, 0.0, 0.0])).unwrap();
        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(w.draw(&mut rng), 1);
    }

    #[test]
    fn test_unnormalized_weights() {
        // Weights 4 and 12: outcome 1 covers [4, 16).
        let w = CumulativeWeights::build(&amps(&[2.0, 12.0_f32.sqrt()])).unwrap();
        assert!((w.total() - 16.0).abs() < 1e-4);
        let p = w.probabilities();
        assert!((p[0] - 0.25).abs() < 1e-6);
        assert!((p[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_parallel_build_matches_serial() {
        let values: Vec<Complex32> = (0..1000)
            .map(|i| Complex32::new((i % 7) as f32 * 0.01, (i % 3) as f32 * 0.02))
            .collect();
        let serial = CumulativeWeights::build(&values).unwrap();
        for chunk_len in [1, 3, 64, 999, 1000, 5000] {
            let parallel = CumulativeWeights::build_parallel(&values, chunk_len).unwrap();
            assert_eq!(parallel.len(), serial.len());
            assert!((parallel.total() - serial.total()).abs() < 1e-9);
            assert!(parallel.cumulative.windows(2).all(|w| w[0] <= w[1]));
            for (a, b) in parallel.cumulative.iter().zip(&serial.cumulative) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_parallel_sampling_count_and_order() {
        let w = CumulativeWeights::build(&amps(&[0.0, 1.0])).unwrap();
        let mut out = vec![42];
        w.sample_blocks_into(1001, &[1, 2, 3, 4, 5, 6, 7, 8], &mut out);
        assert_eq!(out.len(), 1002);
        assert_eq!(out[0], 42);
        assert!(out[1..].iter().all(|&k| k == 1));
    }

    #[test]
    fn test_parallel_sampling_more_blocks_than_samples() {
        let w = CumulativeWeights::build(&amps(&[1.0, 1.0])).unwrap();
        let seeds: Vec<u64> = (0..16).collect();
        let mut out = Vec::new();
        w.sample_blocks_into(3, &seeds, &mut out);
        assert_eq!(out.len(), 3);
        w.sample_blocks_into(0, &seeds, &mut out);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_block_seeds_are_deterministic() {
        let w = CumulativeWeights::build(&amps(&[1.0, 1.0, 1.0, 1.0])).unwrap();
        let (mut a, mut b) = (Vec::new(), Vec::new());
        w.sample_blocks_into(5000, &[9, 10, 11], &mut a);
        w.sample_blocks_into(5000, &[9, 10, 11], &mut b);
        assert_eq!(a, b);
    }
}
