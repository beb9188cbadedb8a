//! Error types for the qstate crate.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by state-space construction, amplitude access and sampling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    /// The amplitude vector for this many qubits cannot be addressed.
    #[error("{num_qubits} qubits exceed the supported maximum of {max}")]
    TooManyQubits {
        /// Requested qubit count.
        num_qubits: u32,
        /// Largest qubit count accepted.
        max: u32,
    },

    /// The allocator refused the amplitude buffer.
    #[error("Failed to allocate amplitudes for {num_qubits} qubits: {source}")]
    AllocationFailed {
        /// Requested qubit count.
        num_qubits: u32,
        /// Underlying allocation error.
        #[source]
        source: TryReserveError,
    },

    /// Thread budget must be at least 1.
    #[error("num_threads must be at least 1, got {0}")]
    InvalidThreadCount(usize),

    /// Amplitude index outside `0..2^num_qubits`.
    #[error("Amplitude index {index} out of range for dimension {dimension}")]
    IndexOutOfRange {
        /// The offending index.
        index: u64,
        /// Size of the amplitude vector.
        dimension: u64,
    },

    /// The state was used before `create_state`.
    #[error("State has not been created; call create_state first")]
    Uninitialized,

    /// No outcome carries positive weight.
    #[error("Amplitude weights do not form a distribution (total weight {total_weight})")]
    DegenerateDistribution {
        /// Sum of squared magnitudes that was found.
        total_weight: f64,
    },

    /// Two states of different width were combined.
    #[error("Qubit count mismatch: expected {expected}, got {actual}")]
    QubitCountMismatch {
        /// Width of the receiving state.
        expected: u32,
        /// Width of the other state.
        actual: u32,
    },

    /// The worker pool could not be started.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for state-space operations.
pub type StateResult<T> = Result<T, StateError>;
