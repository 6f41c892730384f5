//! Exact Persistent Homology via the Standard Algorithm
//!
//! Z/2 boundary-matrix reduction over the Vietoris-Rips filtration.
//!
//! ## Algorithm Overview
//!
//! 1. Build the filtered complex up to (max_degree + 1)-simplices
//! 2. Sort simplices by (birth, dimension, vertices)
//! 3. Reduce boundary columns left to right: while low(j) is the pivot of
//!    an earlier column i, set column j ← column j + column i
//! 4. A non-zero reduced column j with low i pairs simplex i (birth) with
//!    simplex j (death); a zero column that is never a pivot is essential
//!
//! Only degrees ≤ 1 are supported, since the filtration stops at triangles.
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;
use serde::Serialize;

use super::vietoris_rips::{FilteredSimplex, VietorisRips};
use crate::error::{Error, Result};
use crate::spaces::PointCloud;

/// Highest homological degree the triangle-level filtration can resolve
pub const MAX_SUPPORTED_DEGREE: usize = 1;

/// A (birth, death) pair; death is +∞ for essential classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersistencePair {
    pub birth: f64,
    pub death: f64,
}

impl PersistencePair {
    pub fn new(birth: f64, death: f64) -> Self {
        Self { birth, death }
    }

    pub fn persistence(&self) -> f64 {
        if self.death.is_infinite() {
            f64::INFINITY
        } else {
            self.death - self.birth
        }
    }

    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }
}

/// Persistence pairs of a single homological degree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistenceDiagram {
    degree: usize,
    pairs: Vec<PersistencePair>,
}

impl PersistenceDiagram {
    pub fn new(degree: usize, pairs: Vec<PersistencePair>) -> Self {
        Self { degree, pairs }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn pairs(&self) -> &[PersistencePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Copy with the essential (infinite-death) pairs removed
    pub fn finite(&self) -> PersistenceDiagram {
        PersistenceDiagram {
            degree: self.degree,
            pairs: self.pairs.iter().filter(|p| !p.is_essential()).copied().collect(),
        }
    }

    pub fn n_infinite(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_essential()).count()
    }

    /// Lengths death − birth of the finite pairs
    pub fn persistences(&self) -> Vec<f64> {
        self.pairs
            .iter()
            .filter(|p| !p.is_essential())
            .map(PersistencePair::persistence)
            .collect()
    }

    /// Total persistence of the finite pairs
    pub fn total_persistence(&self) -> f64 {
        self.persistences().iter().sum()
    }

    /// Persistence entropy H = −Σ pᵢ ln pᵢ with pᵢ = ℓᵢ / Σℓ over finite,
    /// strictly positive lengths
    pub fn persistence_entropy(&self) -> f64 {
        let lengths: Vec<f64> = self.persistences().into_iter().filter(|&l| l > 0.0).collect();
        let total: f64 = lengths.iter().sum();
        if lengths.is_empty() || total <= 0.0 {
            return 0.0;
        }

        let mut entropy = 0.0;
        for l in lengths {
            let prob = l / total;
            if prob > 0.0 {
                entropy -= prob * prob.ln();
            }
        }
        entropy
    }
}

/// Sparse Z/2 column of the boundary matrix
#[derive(Debug, Clone, Default)]
struct SparseColumn {
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    fn from_faces(faces: impl IntoIterator<Item = usize>) -> Self {
        let mut column = Self::default();
        for face in faces {
            column.toggle(face);
        }
        column
    }

    fn is_zero(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lowest (maximum) non-zero row
    fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    fn toggle(&mut self, row: usize) {
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
    }

    /// Symmetric difference, i.e. addition over Z/2
    fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            self.toggle(row);
        }
    }
}

/// Persistence diagrams of a point cloud for degrees 0..=max_degree.
///
/// Pairwise distances are clipped to `max_diameter`, which is also the
/// filtration threshold. `f64::INFINITY` runs the full, unclipped filtration.
pub fn persistence_diagrams(
    cloud: &PointCloud,
    max_diameter: f64,
    max_degree: usize,
) -> Result<Vec<PersistenceDiagram>> {
    let vr = VietorisRips::from_points(cloud, max_diameter)?;
    compute_persistence(&vr, max_degree)
}

/// Persistence diagrams of a precomputed distance matrix
pub fn persistence_from_distances(
    distances: &Array2<f64>,
    max_diameter: f64,
    max_degree: usize,
) -> Result<Vec<PersistenceDiagram>> {
    let vr = VietorisRips::from_distance_matrix(distances, max_diameter)?;
    compute_persistence(&vr, max_degree)
}

/// Reduce the boundary matrix of `vr` and read off one diagram per degree
pub fn compute_persistence(vr: &VietorisRips, max_degree: usize) -> Result<Vec<PersistenceDiagram>> {
    if max_degree > MAX_SUPPORTED_DEGREE {
        return Err(Error::Unsupported(format!(
            "persistent homology above degree {MAX_SUPPORTED_DEGREE} (requested {max_degree})"
        )));
    }

    let n = vr.n_points();
    let simplices = vr.filtration(max_degree + 1);

    // Filtration position of each vertex and edge, used to address faces
    let mut vertex_index = vec![0usize; n];
    let mut edge_index = Array2::<usize>::from_elem((n, n), usize::MAX);
    for (idx, s) in simplices.iter().enumerate() {
        match s.dim {
            0 => vertex_index[s.vertices[0]] = idx,
            1 => {
                let [i, j, _] = s.vertices;
                edge_index[[i, j]] = idx;
                edge_index[[j, i]] = idx;
            }
            _ => {}
        }
    }

    let m = simplices.len();
    let mut columns: Vec<SparseColumn> = Vec::with_capacity(m);
    let mut low_to_col: HashMap<usize, usize> = HashMap::new();

    for (col_idx, simplex) in simplices.iter().enumerate() {
        let mut boundary = boundary_column(simplex, &vertex_index, &edge_index);

        while let Some(low_idx) = boundary.low() {
            match low_to_col.get(&low_idx) {
                Some(&pivot_col) => boundary.add_assign(&columns[pivot_col]),
                None => break,
            }
        }

        if let Some(low_idx) = boundary.low() {
            low_to_col.insert(low_idx, col_idx);
        }
        columns.push(boundary);
    }

    let mut pairs: Vec<Vec<PersistencePair>> = vec![Vec::new(); max_degree + 1];
    let mut paired = vec![false; m];

    for (col_idx, column) in columns.iter().enumerate() {
        if let Some(low_idx) = column.low() {
            let birth_simplex = &simplices[low_idx];
            let death_simplex = &simplices[col_idx];
            paired[low_idx] = true;
            paired[col_idx] = true;

            // Zero-length intervals are not reported
            if birth_simplex.dim <= max_degree && death_simplex.birth > birth_simplex.birth {
                pairs[birth_simplex.dim].push(PersistencePair::new(birth_simplex.birth, death_simplex.birth));
            }
        }
    }

    for (idx, simplex) in simplices.iter().enumerate() {
        if !paired[idx] && columns[idx].is_zero() && simplex.dim <= max_degree {
            pairs[simplex.dim].push(PersistencePair::new(simplex.birth, f64::INFINITY));
        }
    }

    Ok(pairs
        .into_iter()
        .enumerate()
        .map(|(degree, pairs)| PersistenceDiagram::new(degree, pairs))
        .collect())
}

fn boundary_column(
    simplex: &FilteredSimplex,
    vertex_index: &[usize],
    edge_index: &Array2<usize>,
) -> SparseColumn {
    let [a, b, c] = simplex.vertices;
    match simplex.dim {
        1 => SparseColumn::from_faces([vertex_index[a], vertex_index[b]]),
        2 => SparseColumn::from_faces([edge_index[[a, b]], edge_index[[a, c]], edge_index[[b, c]]]),
        _ => SparseColumn::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_two_points() {
        let dm = array![[0.0, 1.0], [1.0, 0.0]];
        let diagrams = persistence_from_distances(&dm, 2.0, 1).unwrap();

        assert_eq!(diagrams.len(), 2);
        let h0 = &diagrams[0];
        assert_eq!(h0.n_infinite(), 1);
        let finite = h0.finite();
        assert_eq!(finite.len(), 1);
        assert_abs_diff_eq!(finite.pairs()[0].birth, 0.0);
        assert_abs_diff_eq!(finite.pairs()[0].death, 1.0);
        assert!(diagrams[1].is_empty());
    }

    #[test]
    fn test_triangle_has_no_loop() {
        let dm = array![[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]];
        let diagrams = persistence_from_distances(&dm, 2.0, 1).unwrap();

        assert_eq!(diagrams[0].finite().len(), 2);
        assert!(diagrams[1].is_empty());
    }

    #[test]
    fn test_square_cycle() {
        let s2 = 2.0_f64.sqrt();
        let dm = array![
            [0.0, 1.0, s2, 1.0],
            [1.0, 0.0, 1.0, s2],
            [s2, 1.0, 0.0, 1.0],
            [1.0, s2, 1.0, 0.0]
        ];

        let diagrams = persistence_from_distances(&dm, 2.0, 1).unwrap();
        let h1 = &diagrams[1];
        assert_eq!(h1.len(), 1);
        assert_abs_diff_eq!(h1.pairs()[0].birth, 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(h1.pairs()[0].death, s2, epsilon = 1e-10);
    }

    #[test]
    fn test_unclipped_square_keeps_true_scales() {
        let cloud = PointCloud::new(array![[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]]);
        let diagrams = persistence_diagrams(&cloud, f64::INFINITY, 1).unwrap();
        assert_eq!(diagrams[0].n_infinite(), 1);
        let h1 = &diagrams[1];
        assert_eq!(h1.len(), 1);
        assert_abs_diff_eq!(h1.pairs()[0].birth, 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(h1.pairs()[0].death, 18.0_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_clipping_kills_long_edges_at_threshold() {
        // Square of side 3: every edge clips to the 2.0 threshold, so the
        // loop is born and filled at the same value
        let cloud = PointCloud::new(array![[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]]);
        let diagrams = persistence_diagrams(&cloud, 2.0, 1).unwrap();
        assert!(diagrams[1].is_empty());
        assert_eq!(diagrams[0].persistences(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_degree_zero_only() {
        let cloud = PointCloud::new(array![[0.0], [1.0], [3.0]]);
        let diagrams = persistence_diagrams(&cloud, 10.0, 0).unwrap();
        assert_eq!(diagrams.len(), 1);
        assert_eq!(diagrams[0].degree(), 0);
    }

    #[test]
    fn test_errors() {
        let cloud = PointCloud::new(array![[0.0], [1.0]]);
        assert!(matches!(persistence_diagrams(&cloud, 2.0, 2), Err(Error::Unsupported(_))));

        let empty = PointCloud::new(Array2::zeros((0, 2)));
        assert!(matches!(persistence_diagrams(&empty, 2.0, 1), Err(Error::EmptyPointCloud)));
    }

    #[test]
    fn test_entropy_uniform_lengths() {
        let diagram = PersistenceDiagram::new(
            1,
            vec![
                PersistencePair::new(0.0, 1.0),
                PersistencePair::new(0.5, 1.5),
                PersistencePair::new(0.0, f64::INFINITY),
            ],
        );
        assert_abs_diff_eq!(diagram.persistence_entropy(), 2.0_f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(diagram.total_persistence(), 2.0);
    }
}
