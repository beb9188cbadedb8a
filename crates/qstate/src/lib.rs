//! `qstate` — dense state-vector storage and Born-rule sampling.
//!
//! A [`StateSpace`] owns the 2^N complex amplitudes of an N-qubit register
//! and draws measurement outcomes with probability `|a_k|²`. Handles come
//! from the factory, which picks a single-threaded or a rayon-backed
//! implementation from the qubit count and thread budget:
//!
//! | Backend    | Chosen when                                   |
//! |------------|-----------------------------------------------|
//! | `Scalar`   | `num_threads == 1` or below the threshold     |
//! | `Parallel` | `num_threads > 1` and `N >= parallel_threshold` |
//!
//! # Quick start
//!
//! ```rust
//! use num_complex::Complex32;
//! use qstate::{Counts, StateSpaceConfig, get_state_space_with_config};
//!
//! let config = StateSpaceConfig::default().with_seed(42);
//! let mut space = get_state_space_with_config(1, 1, &config).unwrap();
//! space.create_state();
//!
//! let h = std::f32::consts::FRAC_1_SQRT_2;
//! space.set_ampl(0, Complex32::new(h, 0.0)).unwrap();
//! space.set_ampl(1, Complex32::new(h, 0.0)).unwrap();
//!
//! let mut samples = Vec::new();
//! space.sample_state(10_000, &mut samples).unwrap();
//! let counts = Counts::from_samples(&samples);
//! assert!((counts.frequency(0) - 0.5).abs() < 0.05);
//! ```
//!
//! Amplitudes are not renormalized before sampling; outcomes are drawn in
//! proportion to the squared magnitudes present. Use
//! [`StateSpace::normalize`] to rescale explicitly.

pub mod amplitudes;
pub mod backends;
pub mod bitstring;
pub mod config;
pub mod error;
pub mod factory;
pub mod sampler;
pub mod space;

pub use amplitudes::Amplitudes;
pub use backends::{ParallelStateSpace, ScalarStateSpace};
pub use bitstring::{Counts, outcome_to_bitstring};
pub use config::{ConfigError, StateSpaceConfig};
pub use error::{StateError, StateResult};
pub use factory::{get_state_space, get_state_space_with_config, select_kind};
pub use sampler::CumulativeWeights;
pub use space::{StateSpace, StateSpaceKind};
