//! Single-threaded reference backend.

use rand::RngCore;
use rand::rngs::StdRng;
use tracing::{debug, instrument, warn};

use crate::amplitudes::Amplitudes;
use crate::config::StateSpaceConfig;
use crate::error::StateResult;
use crate::sampler::CumulativeWeights;
use crate::space::{StateSpace, StateSpaceKind};

/// Deviation of the total weight from 1 above which sampling logs a warning.
pub(crate) const NORM_WARN_TOLERANCE: f64 = 1e-3;

/// Reference implementation: every operation runs on the calling thread.
#[derive(Debug)]
pub struct ScalarStateSpace {
    store: Amplitudes,
    rng: StdRng,
}

impl ScalarStateSpace {
    /// Reserve a state space for `num_qubits` qubits.
    pub fn new(num_qubits: u32, config: &StateSpaceConfig) -> StateResult<Self> {
        config.validate()?;
        Ok(Self {
            store: Amplitudes::allocate(num_qubits, config.max_qubits)?,
            rng: super::instance_rng(config.seed),
        })
    }
}

impl StateSpace for ScalarStateSpace {
    fn kind(&self) -> StateSpaceKind {
        StateSpaceKind::Scalar
    }

    fn num_threads(&self) -> usize {
        1
    }

    fn store(&self) -> &Amplitudes {
        &self.store
    }

    fn store_mut(&mut self) -> &mut Amplitudes {
        &mut self.store
    }

    fn create_state(&mut self) {
        self.store.reset_to_zero_state();
        debug!(dimension = self.store.dimension(), "created zero state");
    }

    fn sample_state(&mut self, num_samples: usize, samples: &mut Vec<u64>) -> StateResult<()> {
        if num_samples == 0 {
            return Ok(());
        }
        let weights = build_weights(&self.store)?;
        weights.sample_into(num_samples, &mut self.rng, samples);
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
        let weights = build_weights(&self.store)?;
        weights.sample_into(num_samples, rng, samples);
        Ok(())
    }
}

#[instrument(level = "debug", skip(store), fields(num_qubits = store.num_qubits()))]
fn build_weights(store: &Amplitudes) -> StateResult<CumulativeWeights> {
    let weights = CumulativeWeights::build(store.as_slice()?)?;
    check_total(weights.total());
    Ok(weights)
}

pub(crate) fn check_total(total: f64) {
    if (total - 1.0).abs() > NORM_WARN_TOLERANCE {
        warn!(total, "state is not normalized; sampling by relative weight");
    } else {
        debug!(total, "sampling weights ready");
    }
}
