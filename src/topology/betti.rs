//! Betti Numbers: Topological Invariants
//!
//! The k-th Betti number βₖ counts the k-dimensional "holes":
//!
//! - β₀: Number of connected components
//! - β₁: Number of 1-dimensional loops/cycles
//!
//! Over a whole filtration we read βₖ off the diagram as the number of
//! points recorded in degree k, essential classes included.

use serde::Serialize;

use super::persistence::PersistenceDiagram;

/// Betti numbers indexed by degree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BettiNumbers {
    pub values: Vec<usize>,
}

impl BettiNumbers {
    pub fn from_diagrams(diagrams: &[PersistenceDiagram]) -> Self {
        Self {
            values: diagrams.iter().map(PersistenceDiagram::len).collect(),
        }
    }

    /// βₖ, zero when degree k was not computed
    pub fn beta(&self, k: usize) -> usize {
        self.values.get(k).copied().unwrap_or(0)
    }

    /// Total topological complexity
    pub fn total(&self) -> usize {
        self.values.iter().sum()
    }

    /// Euler characteristic χ = Σ (−1)ᵏ βₖ
    pub fn euler_characteristic(&self) -> i64 {
        self.values
            .iter()
            .enumerate()
            .map(|(k, &b)| if k % 2 == 0 { b as i64 } else { -(b as i64) })
            .sum()
    }

    /// β₁ / β₀, or None when there are no components
    pub fn loop_ratio(&self) -> Option<f64> {
        match self.beta(0) {
            0 => None,
            b0 => Some(self.beta(1) as f64 / b0 as f64),
        }
    }
}

/// Smallest and largest finite persistence in one degree
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersistenceRange {
    pub degree: usize,
    pub min: f64,
    pub max: f64,
}

impl PersistenceRange {
    /// None when the degree has no finite pairs
    pub fn of(diagram: &PersistenceDiagram) -> Option<Self> {
        let lengths = diagram.persistences();
        if lengths.is_empty() {
            return None;
        }
        let min = lengths.iter().copied().fold(f64::INFINITY, f64::min);
        let max = lengths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { degree: diagram.degree(), min, max })
    }
}

/// Ranges for every degree that has finite pairs
pub fn persistence_ranges(diagrams: &[PersistenceDiagram]) -> Vec<PersistenceRange> {
    diagrams.iter().filter_map(PersistenceRange::of).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::PersistencePair;

    fn diagrams() -> Vec<PersistenceDiagram> {
        vec![
            PersistenceDiagram::new(
                0,
                vec![
                    PersistencePair::new(0.0, 0.5),
                    PersistencePair::new(0.0, 1.5),
                    PersistencePair::new(0.0, f64::INFINITY),
                ],
            ),
            PersistenceDiagram::new(1, vec![PersistencePair::new(1.0, 1.2)]),
        ]
    }

    #[test]
    fn test_betti_counts_and_euler() {
        let betti = BettiNumbers::from_diagrams(&diagrams());
        assert_eq!(betti.values, vec![3, 1]);
        assert_eq!(betti.euler_characteristic(), 2);
        assert_eq!(betti.beta(2), 0);
        assert_eq!(betti.loop_ratio(), Some(1.0 / 3.0));
    }

    #[test]
    fn test_ranges_skip_infinite() {
        let ranges = persistence_ranges(&diagrams());
        assert_eq!(ranges.len(), 2);
        assert_eq!((ranges[0].min, ranges[0].max), (0.5, 1.5));
        assert!((ranges[1].max - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_degree_has_no_range() {
        assert!(PersistenceRange::of(&PersistenceDiagram::new(1, vec![])).is_none());
    }
}
