//! The `StateSpace` contract.
//!
//! A state space owns exactly one amplitude vector and exposes the
//! lifecycle
//!
//! ```text
//!   get_state_space() ──→ create_state() ──→ set_ampl()* ──→ sample_state()
//!      (factory)           (|0...0⟩)          (optional)       (Born rule)
//! ```
//!
//! Every variant returned by the factory is observationally equivalent;
//! they differ only in how much work is spread over worker threads.
//!
//! Instances are `Send` but take `&mut self` for every mutating call
//! including sampling (the RNG advances), so sharing one instance across
//! threads needs an external `Mutex` or ownership transfer.

use std::fmt;

use num_complex::{Complex32, Complex64};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::amplitudes::Amplitudes;
use crate::error::{StateError, StateResult};

/// Concrete backend behind a [`StateSpace`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateSpaceKind {
    /// Single-threaded reference implementation.
    Scalar,
    /// Work split across a dedicated rayon pool.
    Parallel,
}

impl fmt::Display for StateSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSpaceKind::Scalar => write!(f, "scalar"),
            StateSpaceKind::Parallel => write!(f, "parallel"),
        }
    }
}

/// A dense N-qubit state vector with Born-rule sampling.
pub trait StateSpace: Send + fmt::Debug {
    /// Which backend this is.
    fn kind(&self) -> StateSpaceKind;

    /// Thread budget this instance was built with.
    fn num_threads(&self) -> usize;

    /// The owned amplitude store.
    fn store(&self) -> &Amplitudes;

    /// Mutable access to the owned amplitude store.
    fn store_mut(&mut self) -> &mut Amplitudes;

    /// Reset to the computational-basis state |0...0⟩.
    ///
    /// Calling it again discards any amplitudes written since.
    fn create_state(&mut self);

    /// Append `num_samples` outcomes drawn from `|a_k|²` to `samples`.
    ///
    /// `num_samples == 0` is a no-op. On error nothing is appended.
    fn sample_state(&mut self, num_samples: usize, samples: &mut Vec<u64>) -> StateResult<()>;

    /// Like [`sample_state`](Self::sample_state) but drawing from `rng`.
    fn sample_state_with_rng(
        &self,
        num_samples: usize,
        rng: &mut dyn RngCore,
        samples: &mut Vec<u64>,
    ) -> StateResult<()>;

    /// Number of qubits.
    fn num_qubits(&self) -> u32 {
        self.store().num_qubits()
    }

    /// Number of amplitudes, 2^N.
    fn dimension(&self) -> u64 {
        self.store().dimension()
    }

    /// Whether `create_state` has run.
    fn is_initialized(&self) -> bool {
        self.store().is_initialized()
    }

    /// Read the amplitude of basis state `index`.
    fn get_ampl(&self, index: u64) -> StateResult<Complex32> {
        self.store().get(index)
    }

    /// Overwrite the amplitude of basis state `index`. No normalization.
    fn set_ampl(&mut self, index: u64, value: Complex32) -> StateResult<()> {
        self.store_mut().set(index, value)
    }

    /// All amplitudes in index order.
    fn amplitudes(&self) -> StateResult<&[Complex32]> {
        self.store().as_slice()
    }

    /// Total weight `Σ |a_k|²`.
    fn norm_sqr(&self) -> StateResult<f64> {
        self.store().norm_sqr()
    }

    /// Rescale so that the total weight is 1.
    ///
    /// Sampling never does this implicitly.
    fn normalize(&mut self) -> StateResult<()> {
        let total = self.norm_sqr()?;
        if !(total.is_finite() && total > 0.0) {
            return Err(StateError::DegenerateDistribution {
                total_weight: total,
            });
        }
        let scale = (1.0 / total.sqrt()) as f32;
        for a in self.store_mut().as_mut_slice()? {
            *a *= scale;
        }
        Ok(())
    }

    /// Outcome probabilities `|a_k|² / Σ |a_j|²`.
    fn probabilities(&self) -> StateResult<Vec<f64>> {
        Ok(crate::sampler::CumulativeWeights::build(self.amplitudes()?)?.probabilities())
    }

    /// Copy all amplitudes from `other`, which must have the same width.
    fn copy_from(&mut self, other: &dyn StateSpace) -> StateResult<()> {
        check_same_width(self.num_qubits(), other.num_qubits())?;
        let src = other.amplitudes()?;
        let store = self.store_mut();
        if !store.is_initialized() {
            store.reset_to_zero_state();
        }
        store.as_mut_slice()?.copy_from_slice(src);
        Ok(())
    }

    /// `⟨self|other⟩`, accumulated in double precision.
    fn inner_product(&self, other: &dyn StateSpace) -> StateResult<Complex64> {
        check_same_width(self.num_qubits(), other.num_qubits())?;
        let lhs = self.amplitudes()?;
        let rhs = other.amplitudes()?;
        Ok(lhs
            .iter()
            .zip(rhs)
            .map(|(a, b)| widen(*a).conj() * widen(*b))
            .sum())
    }

    /// Real part of [`inner_product`](Self::inner_product).
    fn real_inner_product(&self, other: &dyn StateSpace) -> StateResult<f64> {
        Ok(self.inner_product(other)?.re)
    }
}

fn check_same_width(expected: u32, actual: u32) -> StateResult<()> {
    if expected != actual {
        return Err(StateError::QubitCountMismatch { expected, actual });
    }
    Ok(())
}

fn widen(a: Complex32) -> Complex64 {
    Complex64::new(f64::from(a.re), f64::from(a.im))
}
