//! Multi-threaded backend on a dedicated rayon pool.

use num_complex::Complex32;
use rand::RngCore;
use rand::rngs::StdRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, instrument, trace};

use super::scalar::check_total;
use crate::amplitudes::Amplitudes;
use crate::config::StateSpaceConfig;
use crate::error::{StateError, StateResult};
use crate::sampler::CumulativeWeights;
use crate::space::{StateSpace, StateSpaceKind};

/// Draws per worker below which sampling stays on one thread.
const MIN_DRAWS_PER_BLOCK: usize = 1024;

/// Backend that spreads initialization, weight construction and draws over
/// `num_threads` workers. Every call blocks until all workers are done.
pub struct ParallelStateSpace {
    store: Amplitudes,
    rng: StdRng,
    pool: ThreadPool,
    num_threads: usize,
    min_chunk_len: usize,
}

impl std::fmt::Debug for ParallelStateSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelStateSpace")
            .field("store", &self.store)
            .field("num_threads", &self.num_threads)
            .field("min_chunk_len", &self.min_chunk_len)
            .finish_non_exhaustive()
    }
}

impl ParallelStateSpace {
    /// Reserve a state space for `num_qubits` qubits with its own pool of
    /// `num_threads` workers.
    pub fn new(num_qubits: u32, num_threads: usize, config: &StateSpaceConfig) -> StateResult<Self> {
        config.validate()?;
        if num_threads == 0 {
            return Err(StateError::InvalidThreadCount(num_threads));
        }
        let store = Amplitudes::allocate(num_qubits, config.max_qubits)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("qstate-worker-{i}"))
            .build()?;
        Ok(Self {
            store,
            rng: super::instance_rng(config.seed),
            pool,
            num_threads,
            min_chunk_len: config.min_chunk_len,
        })
    }

    fn chunk_len(&self, len: usize) -> usize {
        len.div_ceil(self.num_threads).max(self.min_chunk_len)
    }

    #[instrument(level = "debug", skip(self), fields(num_qubits = self.store.num_qubits()))]
    fn build_weights(&self) -> StateResult<CumulativeWeights> {
        let amplitudes = self.store.as_slice()?;
        let chunk_len = self.chunk_len(amplitudes.len());
        let weights = self
            .pool
            .install(|| CumulativeWeights::build_parallel(amplitudes, chunk_len))?;
        check_total(weights.total());
        Ok(weights)
    }
}

impl StateSpace for ParallelStateSpace {
    fn kind(&self) -> StateSpaceKind {
        StateSpaceKind::Parallel
    }

    fn num_threads(&self) -> usize {
        self.num_threads
    }

    fn store(&self) -> &Amplitudes {
        &self.store
    }

    fn store_mut(&mut self) -> &mut Amplitudes {
        &mut self.store
    }

    fn create_state(&mut self) {
        if self.store.is_initialized() {
            let chunk_len = self.chunk_len(self.store.dimension() as usize);
            if let Ok(data) = self.store.as_mut_slice() {
                self.pool.install(|| {
                    data.par_chunks_mut(chunk_len)
                        .for_each(|chunk| chunk.fill(Complex32::new(0.0, 0.0)));
                });
                data[0] = Complex32::new(1.0, 0.0);
            }
        } else {
            self.store.reset_to_zero_state();
        }
        debug!(
            dimension = self.store.dimension(),
            num_threads = self.num_threads,
            "created zero state"
        );
    }

    fn sample_state(&mut self, num_samples: usize, samples: &mut Vec<u64>) -> StateResult<()> {
        if num_samples == 0 {
            return Ok(());
        }
        let weights = self.build_weights()?;
        draw(&self.pool, self.num_threads, &weights, num_samples, &mut self.rng, samples);
        Ok(())
    }

    fn sample_state_with_rng(
        &self,
        num_samples: usize,
        rng: &mut dyn RngCore,
        samples: &mut Vec<u64>,
    ) -> StateResult<()> {
        if num_samples == 0 {
            return Ok(());
        }
        let weights = self.build_weights()?;
        draw(&self.pool, self.num_threads, &weights, num_samples, rng, samples);
        Ok(())
    }
}

/// Draw on the calling thread for small requests, otherwise fan out one
/// block per worker. Block seeds come from `rng` before entering the pool.
fn draw<R: RngCore + ?Sized>(
    pool: &ThreadPool,
    num_threads: usize,
    weights: &CumulativeWeights,
    num_samples: usize,
    rng: &mut R,
    samples: &mut Vec<u64>,
) {
    let num_blocks = (num_samples / MIN_DRAWS_PER_BLOCK).min(num_threads);
    if num_blocks <= 1 {
        weights.sample_into(num_samples, rng, samples);
        return;
    }
    let seeds: Vec<u64> = (0..num_blocks).map(|_| rng.next_u64()).collect();
    trace!(num_blocks, num_samples, "sampling in parallel blocks");
    pool.install(|| weights.sample_blocks_into(num_samples, &seeds, samples));
}
