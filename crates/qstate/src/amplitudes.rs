//! Dense amplitude storage.

use num_complex::Complex32;

use crate::error::{StateError, StateResult};

const ZERO: Complex32 = Complex32::new(0.0, 0.0);
const ONE: Complex32 = Complex32::new(1.0, 0.0);

/// Largest qubit count whose amplitude buffer fits in `isize::MAX` bytes.
pub const MAX_ADDRESSABLE_QUBITS: u32 =
    usize::BITS - 2 - std::mem::size_of::<Complex32>().trailing_zeros();

/// The 2^N complex amplitudes of an N-qubit register.
///
/// Index `k` holds the amplitude of the basis state whose binary
/// representation is `k` (qubit 0 is the least significant bit).
///
/// The buffer is reserved at construction but stays empty until
/// [`reset_to_zero_state`](Self::reset_to_zero_state) fills it.
#[derive(Debug, Clone)]
pub struct Amplitudes {
    num_qubits: u32,
    data: Vec<Complex32>,
}

impl Amplitudes {
    /// Reserve storage for `num_qubits` qubits.
    ///
    /// `max_qubits` lowers the addressability limit further.
    pub fn allocate(num_qubits: u32, max_qubits: Option<u32>) -> StateResult<Self> {
        let max = max_qubits.map_or(MAX_ADDRESSABLE_QUBITS, |m| m.min(MAX_ADDRESSABLE_QUBITS));
        if num_qubits > max {
            return Err(StateError::TooManyQubits { num_qubits, max });
        }

        let mut data = Vec::new();
        data.try_reserve_exact(1usize << num_qubits)
            .map_err(|source| StateError::AllocationFailed { num_qubits, source })?;

        Ok(Self { num_qubits, data })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of amplitudes, 2^N.
    pub fn dimension(&self) -> u64 {
        1u64 << self.num_qubits
    }

    /// Whether the state has been filled at least once.
    pub fn is_initialized(&self) -> bool {
        !self.data.is_empty()
    }

    /// Set every amplitude to zero except index 0, which becomes 1.
    pub fn reset_to_zero_state(&mut self) {
        self.data.clear();
        self.data.resize(1usize << self.num_qubits, ZERO);
        self.data[0] = ONE;
    }

    /// Read the amplitude at `index`.
    pub fn get(&self, index: u64) -> StateResult<Complex32> {
        let i = self.checked_index(index)?;
        Ok(self.data[i])
    }

    /// Overwrite the amplitude at `index`.
    pub fn set(&mut self, index: u64, value: Complex32) -> StateResult<()> {
        let i = self.checked_index(index)?;
        self.data[i] = value;
        Ok(())
    }

    /// All amplitudes in index order.
    pub fn as_slice(&self) -> StateResult<&[Complex32]> {
        if !self.is_initialized() {
            return Err(StateError::Uninitialized);
        }
        Ok(&self.data)
    }

    /// Mutable view of all amplitudes.
    pub fn as_mut_slice(&mut self) -> StateResult<&mut [Complex32]> {
        if !self.is_initialized() {
            return Err(StateError::Uninitialized);
        }
        Ok(&mut self.data)
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> StateResult<f64> {
        Ok(self
            .as_slice()?
            .iter()
            .map(|a| f64::from(a.norm_sqr()))
            .sum())
    }

    fn checked_index(&self, index: u64) -> StateResult<usize> {
        if !self.is_initialized() {
            return Err(StateError::Uninitialized);
        }
        let dimension = self.dimension();
        if index >= dimension {
            return Err(StateError::IndexOutOfRange { index, dimension });
        }
        // index < 2^N <= usize::MAX after allocate()
        Ok(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_leaves_state_uninitialized() {
        let amps = Amplitudes::allocate(3, None).unwrap();
        assert_eq!(amps.dimension(), 8);
        assert!(!amps.is_initialized());
        assert!(matches!(amps.get(0), Err(StateError::Uninitialized)));
    }

    #[test]
    fn test_zero_state() {
        let mut amps = Amplitudes::allocate(2, None).unwrap();
        amps.reset_to_zero_state();
        assert_eq!(amps.get(0).unwrap(), ONE);
        for k in 1..4 {
            assert_eq!(amps.get(k).unwrap(), ZERO);
        }
    }

    #[test]
    fn test_reset_discards_previous_amplitudes() {
        let mut amps = Amplitudes::allocate(1, None).unwrap();
        amps.reset_to_zero_state();
        amps.set(0, ZERO).unwrap();
        amps.set(1, Complex32::new(0.0, 1.0)).unwrap();
        amps.reset_to_zero_state();
        assert_eq!(amps.as_slice().unwrap(), &[ONE, ZERO]);
    }

    #[test]
    fn test_zero_qubits_has_one_amplitude() {
        let mut amps = Amplitudes::allocate(0, None).unwrap();
        amps.reset_to_zero_state();
        assert_eq!(amps.dimension(), 1);
        assert_eq!(amps.as_slice().unwrap(), &[ONE]);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut amps = Amplitudes::allocate(2, None).unwrap();
        amps.reset_to_zero_state();
        assert!(matches!(
            amps.set(4, ONE),
            Err(StateError::IndexOutOfRange {
                index: 4,
                dimension: 4
            })
        ));
        assert!(matches!(
            amps.get(u64::MAX),
            Err(StateError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_too_many_qubits() {
        assert!(matches!(
            Amplitudes::allocate(64, None),
            Err(StateError::TooManyQubits { num_qubits: 64, .. })
        ));
        assert!(matches!(
            Amplitudes::allocate(MAX_ADDRESSABLE_QUBITS + 1, None),
            Err(StateError::TooManyQubits { .. })
        ));
        assert!(matches!(
            Amplitudes::allocate(5, Some(4)),
            Err(StateError::TooManyQubits { num_qubits: 5, max: 4 })
        ));
    }

    #[test]
    fn test_norm_sqr() {
        let mut amps = Amplitudes::allocate(1, None).unwrap();
        amps.reset_to_zero_state();
        amps.set(0, Complex32::new(0.6, 0.0)).unwrap();
        amps.set(1, Complex32::new(0.0, 0.8)).unwrap();
        assert!((amps.norm_sqr().unwrap() - 1.0).abs() < 1e-6);
    }
}
