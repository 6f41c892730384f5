//! Codimension cycles with an entrywise intersection product.

use std::fmt;

use ndarray::Array2;

use super::matrix::pad_to;

#[derive(Debug, Clone, PartialEq)]
pub struct CodimensionCycle {
    pub variety: String,
    pub codimension: usize,
    pub matrix: Array2<f64>,
}

impl CodimensionCycle {
    pub fn new(variety: impl Into<String>, codimension: usize, matrix: Array2<f64>) -> Self {
        Self {
            variety: variety.into(),
            codimension,
            matrix,
        }
    }

    /// Zero-pad both matrices to the common shape and multiply entrywise;
    /// codimensions add
    pub fn intersect(&self, other: &CodimensionCycle) -> CodimensionCycle {
        let rows = self.matrix.nrows().max(other.matrix.nrows());
        let cols = self.matrix.ncols().max(other.matrix.ncols());
        let product = pad_to(&self.matrix, rows, cols) * pad_to(&other.matrix, rows, cols);
        CodimensionCycle {
            variety: format!("Intersection({}, {})", self.variety, other.variety),
            codimension: self.codimension + other.codimension,
            matrix: product,
        }
    }
}

impl fmt::Display for CodimensionCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodimensionCycle(Variety: {}, Codimension: {})", self.variety, self.codimension)
    }
}

/// Intersections of every unordered pair i < j, keyed "A ∩ B"
pub fn pairwise_intersections(cycles: &[CodimensionCycle]) -> Vec<(String, CodimensionCycle)> {
    let mut out = Vec::new();
    for (i, a) in cycles.iter().enumerate() {
        for b in &cycles[i + 1..] {
            out.push((format!("{} ∩ {}", a.variety, b.variety), a.intersect(b)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_intersection_pads_and_multiplies() {
        let a = CodimensionCycle::new("A", 1, array![[2.0, 3.0], [4.0, 5.0]]);
        let b = CodimensionCycle::new("B", 2, array![[10.0]]);
        let c = a.intersect(&b);
        assert_eq!(c.codimension, 3);
        assert_eq!(c.matrix, array![[20.0, 0.0], [0.0, 0.0]]);
        assert_eq!(c.variety, "Intersection(A, B)");
    }

    #[test]
    fn test_pairwise_count() {
        let cycles: Vec<_> = (0..4)
            .map(|i| CodimensionCycle::new(format!("C{i}"), i, Array2::ones((2, 2))))
            .collect();
        let pairs = pairwise_intersections(&cycles);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0].0, "C0 ∩ C1");
        assert_eq!(pairs[5].1.codimension, 5);
    }
}
