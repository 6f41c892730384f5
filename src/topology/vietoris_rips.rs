//! Vietoris-Rips Filtration Construction
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! Distances are clipped to a maximum diameter before the filtration is
//! built, so every pair is connected by the time ε reaches the threshold.
//! An infinite maximum diameter keeps the distances as they are.
//! The filtration is listed up to triangles, which is what degree ≤ 1
//! persistent homology needs.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::spaces::PointCloud;

/// Relative slack allowed between d(i, j) and d(j, i)
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Vietoris-Rips filtration over a validated distance matrix
#[derive(Debug, Clone)]
pub struct VietorisRips {
    /// Distance matrix, symmetric with zero diagonal, clipped to `threshold`
    distances: Array2<f64>,
    /// Maximum filtration value
    threshold: f64,
}

/// A simplex of dimension ≤ 2 with its filtration value
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FilteredSimplex {
    /// Sorted vertex indices; only the first `dim + 1` are meaningful
    pub vertices: [usize; 3],
    pub dim: usize,
    pub birth: f64,
}

impl FilteredSimplex {
    fn vertex(v: usize) -> Self {
        Self { vertices: [v, 0, 0], dim: 0, birth: 0.0 }
    }

    fn edge(i: usize, j: usize, birth: f64) -> Self {
        Self { vertices: [i, j, 0], dim: 1, birth }
    }

    fn triangle(i: usize, j: usize, k: usize, birth: f64) -> Self {
        Self { vertices: [i, j, k], dim: 2, birth }
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices[..=self.dim]
    }
}

impl VietorisRips {
    /// Build from a point cloud: Euclidean distances clipped to `max_diameter`
    pub fn from_points(cloud: &PointCloud, max_diameter: f64) -> Result<Self> {
        let distances = distance_matrix(cloud)?;
        Self::from_distance_matrix(&distances, max_diameter)
    }

    /// Build from a precomputed distance matrix, clipping it to `max_diameter`.
    /// The matrix must be symmetric with a zero diagonal.
    pub fn from_distance_matrix(distances: &Array2<f64>, max_diameter: f64) -> Result<Self> {
        let (rows, cols) = distances.dim();
        if rows != cols {
            return Err(Error::NonSquare { rows, cols });
        }
        if rows == 0 {
            return Err(Error::EmptyPointCloud);
        }
        // +∞ leaves the distances unclipped
        if max_diameter.is_nan() || max_diameter <= 0.0 {
            return Err(Error::invalid("max_diameter", format!("{max_diameter} is not positive")));
        }
        for ((i, j), &d) in distances.indexed_iter() {
            if !d.is_finite() {
                return Err(Error::non_finite(format!("distance ({i}, {j})")));
            }
            if d < 0.0 {
                return Err(Error::invalid("distances", format!("negative distance at ({i}, {j})")));
            }
            if i == j && d != 0.0 {
                return Err(Error::invalid("distances", format!("non-zero diagonal entry {d} at ({i}, {i})")));
            }
            if j > i && (d - distances[[j, i]]).abs() > SYMMETRY_TOLERANCE * d.max(1.0) {
                return Err(Error::invalid("distances", format!("asymmetric entries at ({i}, {j}) and ({j}, {i})")));
            }
        }

        Ok(Self {
            distances: clip_distances(distances, max_diameter),
            threshold: max_diameter,
        })
    }

    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }

    /// All simplices up to dimension `max_simplex_dim` (≤ 2), sorted by
    /// (birth, dimension, vertices)
    pub(crate) fn filtration(&self, max_simplex_dim: usize) -> Vec<FilteredSimplex> {
        let n = self.n_points();
        let eps = self.threshold;
        let dm = &self.distances;
        let mut simplices: Vec<FilteredSimplex> = (0..n).map(FilteredSimplex::vertex).collect();

        if max_simplex_dim >= 1 {
            for i in 0..n {
                for j in i + 1..n {
                    let d = dm[[i, j]];
                    if d <= eps {
                        simplices.push(FilteredSimplex::edge(i, j, d));
                    }
                }
            }
        }

        if max_simplex_dim >= 2 {
            for i in 0..n {
                for j in i + 1..n {
                    let dij = dm[[i, j]];
                    if dij > eps {
                        continue;
                    }
                    for k in j + 1..n {
                        let dik = dm[[i, k]];
                        let djk = dm[[j, k]];
                        if dik <= eps && djk <= eps {
                            // Triangle birth = max of all edge births
                            let birth = dij.max(dik).max(djk);
                            simplices.push(FilteredSimplex::triangle(i, j, k, birth));
                        }
                    }
                }
            }
        }

        simplices.sort_by(|a, b| {
            a.birth
                .total_cmp(&b.birth)
                .then(a.dim.cmp(&b.dim))
                .then_with(|| a.vertices().cmp(b.vertices()))
        });
        simplices
    }
}

/// Pairwise Euclidean distances between the rows of a cloud
pub fn distance_matrix(cloud: &PointCloud) -> Result<Array2<f64>> {
    if cloud.is_empty() {
        return Err(Error::EmptyPointCloud);
    }
    if !cloud.is_finite() {
        return Err(Error::non_finite("point cloud"));
    }

    let points = cloud.points();
    let n = points.nrows();
    let mut dm = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in i + 1..n {
            let diff = &points.row(i) - &points.row(j);
            let dist = diff.dot(&diff).sqrt();
            dm[[i, j]] = dist;
            dm[[j, i]] = dist;
        }
    }

    Ok(dm)
}

/// Replace every entry above `max_diameter` with `max_diameter`
pub fn clip_distances(distances: &Array2<f64>, max_diameter: f64) -> Array2<f64> {
    distances.mapv(|d| d.min(max_diameter))
}
