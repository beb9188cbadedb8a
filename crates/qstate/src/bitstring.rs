//! Outcome formatting and histograms.

use std::collections::BTreeMap;

/// Convert a sampled outcome to a bitstring with qubit 0 leftmost.
pub fn outcome_to_bitstring(outcome: u64, num_qubits: u32) -> String {
    (0..num_qubits)
        .map(|q| if (outcome >> q) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Occurrence counts of sampled outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts {
    counts: BTreeMap<u64, usize>,
    total: usize,
}

impl Counts {
    /// Tally a buffer of samples.
    pub fn from_samples(samples: &[u64]) -> Self {
        let mut counts = BTreeMap::new();
        for &s in samples {
            *counts.entry(s).or_insert(0) += 1;
        }
        Self {
            counts,
            total: samples.len(),
        }
    }

    /// Times `outcome` was drawn.
    pub fn get(&self, outcome: u64) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Empirical frequency of `outcome`; 0 for an empty tally.
    pub fn frequency(&self, outcome: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.get(outcome) as f64 / self.total as f64
    }

    /// Number of samples tallied.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Distinct outcomes in ascending order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.counts.iter().map(|(&k, &v)| (k, v))
    }

    /// Counts keyed by bitstring.
    pub fn to_bitstrings(&self, num_qubits: u32) -> BTreeMap<String, usize> {
        self.iter()
            .map(|(k, v)| (outcome_to_bitstring(k, num_qubits), v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitstring_order() {
        assert_eq!(outcome_to_bitstring(0b001, 3), "100");
        assert_eq!(outcome_to_bitstring(0b110, 3), "011");
        assert_eq!(outcome_to_bitstring(0, 0), "");
    }

    #[test]
    fn test_counts() {
        let counts = Counts::from_samples(&[3, 0, 3, 3]);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get(3), 3);
        assert_eq!(counts.get(1), 0);
        assert!((counts.frequency(0) - 0.25).abs() < 1e-12);
        let bits = counts.to_bitstrings(2);
        assert_eq!(bits.get("11"), Some(&3));
        assert_eq!(bits.get("00"), Some(&1));
    }

    #[test]
    fn test_empty_counts() {
        let counts = Counts::from_samples(&[]);
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.frequency(0), 0.0);
    }
}
