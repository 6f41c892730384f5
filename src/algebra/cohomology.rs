//! Cohomology records: scalar values, perturbed matrices and a first-order
//! differential operator.
//!
//! ## Mathematical Background
//!
//! For a theory of rank r on a space of dimension d the scalar value is
//! √(r·d + 1/10)·scale. The perturbed matrix starts at I_d, shifts the
//! diagonal by δ and every off-diagonal entry by η, then runs the attached
//! degeneration rules. The operator D = cₓ∂ₓ + c_y∂_y acts on
//! f(x, y) = sin(xy) + cos(xy), for which
//!
//!   D f = (cₓ·y + c_y·x)·(cos(xy) − sin(xy)).

use std::fmt;

use ndarray::Array2;
use serde::Serialize;

use super::degeneration::{apply_all, Degeneration};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohomologyParameters {
    pub scaling_factor: f64,
    pub diagonal_perturb: f64,
    pub off_diagonal_perturb: f64,
    pub diff_coeff_x: f64,
    pub diff_coeff_y: f64,
    pub degenerations: Vec<Degeneration>,
}

impl Default for CohomologyParameters {
    fn default() -> Self {
        Self {
            scaling_factor: 1.0,
            diagonal_perturb: 0.1,
            off_diagonal_perturb: 0.05,
            diff_coeff_x: 1.0,
            diff_coeff_y: 1.0,
            degenerations: Vec::new(),
        }
    }
}

/// cₓ∂ₓ + c_y∂_y applied to sin(xy) + cos(xy)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifferentialOperator {
    pub coeff_x: f64,
    pub coeff_y: f64,
}

impl DifferentialOperator {
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let (s, c) = (x * y).sin_cos();
        (self.coeff_x * y + self.coeff_y * x) * (c - s)
    }
}

impl fmt::Display for DifferentialOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}*y*(cos(x*y) - sin(x*y)) + {}*x*(cos(x*y) - sin(x*y))",
            self.coeff_x, self.coeff_y
        )
    }
}

fn perturbed_identity(dimension: usize, params: &CohomologyParameters) -> Array2<f64> {
    let base = Array2::from_shape_fn((dimension, dimension), |(i, j)| {
        if i == j {
            1.0 + params.diagonal_perturb
        } else {
            params.off_diagonal_perturb
        }
    });
    apply_all(&base, &params.degenerations)
}

/// A named cohomology theory (étale, de Rham, ...) on a variety
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohomologyType {
    pub variety: String,
    pub kind: String,
    pub rank: usize,
    pub dimension: usize,
    pub parameters: CohomologyParameters,
}

impl CohomologyType {
    pub fn new(variety: impl Into<String>, kind: impl Into<String>, rank: usize, dimension: usize) -> Self {
        Self {
            variety: variety.into(),
            kind: kind.into(),
            rank,
            dimension,
            parameters: CohomologyParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: CohomologyParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn value(&self) -> f64 {
        ((self.rank * self.dimension) as f64 + 0.1).sqrt() * self.parameters.scaling_factor
    }

    pub fn perturbed_matrix(&self) -> Array2<f64> {
        perturbed_identity(self.dimension, &self.parameters)
    }

    pub fn differential_operator(&self) -> DifferentialOperator {
        DifferentialOperator {
            coeff_x: self.parameters.diff_coeff_x,
            coeff_y: self.parameters.diff_coeff_y,
        }
    }
}

impl fmt::Display for CohomologyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, cohomology_value={:.6})", self.kind, self.variety, self.value())
    }
}

/// Cohomology group Hᵏ of fixed dimension with outgoing differentials
#[derive(Debug, Clone, PartialEq)]
pub struct CohomologyGroup {
    pub name: String,
    pub degree: usize,
    pub dimension: usize,
    pub coefficients: Vec<f64>,
    pub parameters: CohomologyParameters,
    differentials: Vec<(String, Array2<f64>)>,
}

impl CohomologyGroup {
    pub fn new(name: impl Into<String>, degree: usize, dimension: usize, coefficients: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            degree,
            dimension,
            coefficients,
            parameters: CohomologyParameters::default(),
            differentials: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: CohomologyParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Record d: self → other; the matrix must be dim(self) × dim(other)
    pub fn with_differential(mut self, other: &CohomologyGroup, matrix: Array2<f64>) -> Result<Self> {
        if matrix.dim() != (self.dimension, other.dimension) {
            return Err(Error::ShapeMismatch {
                operation: "differential",
                left: (self.dimension, other.dimension),
                right: matrix.dim(),
            });
        }
        self.differentials.push((other.name.clone(), matrix));
        Ok(self)
    }

    pub fn differentials(&self) -> &[(String, Array2<f64>)] {
        &self.differentials
    }

    /// Σ_{i=0}^{degree} (−1)ⁱ·dim
    pub fn euler_characteristic(&self) -> i64 {
        let dim = self.dimension as i64;
        (0..=self.degree).map(|i| if i % 2 == 0 { dim } else { -dim }).sum()
    }

    pub fn value(&self) -> f64 {
        ((self.dimension * self.degree) as f64 + 0.1).sqrt() * self.parameters.scaling_factor
    }

    pub fn perturbed_matrix(&self) -> Array2<f64> {
        perturbed_identity(self.dimension, &self.parameters)
    }

    pub fn differential_operator(&self) -> DifferentialOperator {
        DifferentialOperator {
            coeff_x: self.parameters.diff_coeff_x,
            coeff_y: self.parameters.diff_coeff_y,
        }
    }
}

impl fmt::Display for CohomologyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CohomologyGroup({}, Degree: {}, Dimension: {})",
            self.name, self.degree, self.dimension
        )
    }
}
