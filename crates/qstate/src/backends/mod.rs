//! Concrete state-space implementations.

mod parallel;
mod scalar;

pub use parallel::ParallelStateSpace;
pub use scalar::ScalarStateSpace;

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Instance RNG: fixed seed when configured, OS entropy otherwise.
pub(crate) fn instance_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
