//! Backend selection.
//!
//! Callers ask for a qubit count and a thread budget and get back a
//! `Box<dyn StateSpace>`; which variant sits behind it is decided here.

use tracing::{debug, instrument};

use crate::backends::{ParallelStateSpace, ScalarStateSpace};
use crate::config::StateSpaceConfig;
use crate::error::{StateError, StateResult};
use crate::space::{StateSpace, StateSpaceKind};

/// Pick a backend for `num_qubits` qubits and `num_threads` workers.
///
/// Small registers are not worth a thread pool, so the parallel backend is
/// only chosen at or above `config.parallel_threshold` qubits.
pub fn select_kind(num_qubits: u32, num_threads: usize, config: &StateSpaceConfig) -> StateSpaceKind {
    if num_threads > 1 && num_qubits >= config.parallel_threshold {
        StateSpaceKind::Parallel
    } else {
        StateSpaceKind::Scalar
    }
}

/// Create a state space with the default configuration.
///
/// The amplitude buffer is reserved but not initialized; call
/// [`StateSpace::create_state`] before use.
///
/// ```rust
/// use num_complex::Complex32;
/// use qstate::get_state_space;
///
/// let mut space = get_state_space(1, 1).unwrap();
/// space.create_state();
/// space.set_ampl(0, Complex32::new(0.0, 0.0)).unwrap();
/// space.set_ampl(1, Complex32::new(1.0, 0.0)).unwrap();
///
/// let mut samples = Vec::new();
/// space.sample_state(10, &mut samples).unwrap();
/// assert_eq!(samples, vec![1; 10]);
/// ```
pub fn get_state_space(num_qubits: u32, num_threads: usize) -> StateResult<Box<dyn StateSpace>> {
    get_state_space_with_config(num_qubits, num_threads, &StateSpaceConfig::default())
}

/// Create a state space using `config` for tuning and seeding.
#[instrument(level = "debug", skip(config))]
pub fn get_state_space_with_config(
    num_qubits: u32,
    num_threads: usize,
    config: &StateSpaceConfig,
) -> StateResult<Box<dyn StateSpace>> {
    config.validate()?;
    if num_threads == 0 {
        return Err(StateError::InvalidThreadCount(num_threads));
    }

    let kind = select_kind(num_qubits, num_threads, config);
    debug!(%kind, num_qubits, num_threads, "selected state space backend");

    Ok(match kind {
        StateSpaceKind::Scalar => Box::new(ScalarStateSpace::new(num_qubits, config)?),
        StateSpaceKind::Parallel => {
            Box::new(ParallelStateSpace::new(num_qubits, num_threads, config)?)
        }
    })
}
