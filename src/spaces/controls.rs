//! Algebraic control spaces with known topology.
//!
//! Controls are sampled from explicit varieties (an elliptic curve, a
//! quartic surface, a great circle on a random 2-plane) and standardized
//! like the synthetic spaces so the two families are comparable.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::DMatrix;
use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

use super::cloud::PointCloud;
use crate::error::{Error, Result};

/// Weierstrass coefficients of y² = x³ + ax + b
const WEIERSTRASS_A: f64 = 2.0;
const WEIERSTRASS_B: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlSpace {
    Elliptic,
    K3,
    Grassmannian,
}

impl ControlSpace {
    pub const ALL: [ControlSpace; 3] = [
        ControlSpace::Elliptic,
        ControlSpace::K3,
        ControlSpace::Grassmannian,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ControlSpace::Elliptic => "elliptic",
            ControlSpace::K3 => "k3",
            ControlSpace::Grassmannian => "grassmannian",
        }
    }

    /// Smallest ambient dimension the control embeds in
    pub fn min_dimension(&self) -> usize {
        match self {
            ControlSpace::Elliptic | ControlSpace::Grassmannian => 2,
            ControlSpace::K3 => 3,
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        dimension: usize,
        n_points: usize,
        rng: &mut R,
    ) -> Result<PointCloud> {
        if dimension < self.min_dimension() {
            return Err(Error::invalid(
                "dimension",
                format!("{} needs at least {} coordinates", self.label(), self.min_dimension()),
            ));
        }
        if n_points < 2 {
            return Err(Error::invalid("n_points", "need at least two samples"));
        }

        let points = match self {
            ControlSpace::Elliptic => elliptic(dimension, n_points),
            ControlSpace::K3 => k3_surface(dimension, n_points),
            ControlSpace::Grassmannian => grassmannian(dimension, n_points, rng),
        };
        Ok(PointCloud::new(points).standardized())
    }
}

impl fmt::Display for ControlSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Real branch of y² = x³ + 2x + 3 over x ∈ [0, 2π], zero-padded
fn elliptic(dimension: usize, n_points: usize) -> Array2<f64> {
    let xs = linspace(0.0, 2.0 * PI, n_points);
    let mut points = Array2::zeros((n_points, dimension));
    for (i, x) in xs.into_iter().enumerate() {
        points[[i, 0]] = x;
        points[[i, 1]] = (x.powi(3) + WEIERSTRASS_A * x + WEIERSTRASS_B + 1e-10).sqrt();
    }
    points
}

/// Graph of w = u⁴ + v⁴ − 1 on a ⌊√n⌋ × ⌊√n⌋ grid over [−1, 1]²
fn k3_surface(dimension: usize, n_points: usize) -> Array2<f64> {
    let side = (n_points as f64).sqrt().floor() as usize;
    let grid = linspace(-1.0, 1.0, side);
    let mut points = Array2::zeros((side * side, dimension));
    let mut row = 0;
    for &v in &grid {
        for &u in &grid {
            points[[row, 0]] = u;
            points[[row, 1]] = v;
            points[[row, 2]] = u.powi(4) + v.powi(4) - 1.0;
            row += 1;
        }
    }
    points
}

/// Unit circle in the 2-plane spanned by the QR basis of a random d×2 matrix
fn grassmannian<R: Rng + ?Sized>(dimension: usize, n_points: usize, rng: &mut R) -> Array2<f64> {
    let basis = DMatrix::<f64>::from_fn(dimension, 2, |_, _| rng.sample(StandardNormal));
    let q = basis.qr().q();

    let mut points = Array2::zeros((n_points, dimension));
    for i in 0..n_points {
        let theta: f64 = rng.random_range(0.0..2.0 * PI);
        let (s, c) = theta.sin_cos();
        for d in 0..dimension {
            points[[i, d]] = q[(d, 0)] * c + q[(d, 1)] * s;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_k3_grid_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let cloud = ControlSpace::K3.generate(4, 100, &mut rng).unwrap();
        assert_eq!(cloud.n_points(), 100);
        assert_eq!(cloud.dimension(), 4);
        // padding column stays identically zero after standardization
        assert!(cloud.points().column(3).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_grassmannian_points_lie_on_plane_circle() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let raw = grassmannian(5, 50, &mut rng);
        for row in raw.rows() {
            let norm = row.dot(&row).sqrt();
            assert!((norm - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_dimension_too_small() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(ControlSpace::K3.generate(2, 100, &mut rng).is_err());
        assert!(ControlSpace::Elliptic.generate(2, 100, &mut rng).is_ok());
    }
}
