//! Mixed Motives as Immutable Matrix Records
//!
//! A motive is a named m×n matrix with a dimension label and variety
//! parameters. The label is independent of the matrix shape. Every operation returns a new motive:
//!
//! - **Tensor** M ⊗ N: kron(M, N)·(τ_M·τ_N), dimension m·n, default parameters
//! - **Dual** M*: Mᵀ·δ_M, parameters carried over
//! - **Triangulation** M ⊕ N: diag(w_M·M, w_N·N), dimension m + n
//! - **Correspondence**: M·C·ι_M against another motive
//! - **Exact sequence** (f, g, h)·ε_M, exact iff rank f = nullity g
//!
//! Degeneration rules are attached with [`Motive::with_degeneration`] and
//! folded into the matrix by [`Motive::degenerate`].

use std::fmt;

use nalgebra::Complex;
use ndarray::Array2;
use serde::Serialize;

use super::degeneration::{apply_all, Degeneration};
use super::matrix::{block_diag, eigenvalues, kron, nullity, rank};
use crate::error::{Error, Result};

/// Per-variety scaling coefficients, all 1 unless set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VarietyParameters {
    pub tensor_scaling: f64,
    pub interaction_factor: f64,
    pub duality_factor: f64,
    pub triangulation_weight: f64,
    pub exact_sequence_factor: f64,
}

impl Default for VarietyParameters {
    fn default() -> Self {
        Self {
            tensor_scaling: 1.0,
            interaction_factor: 1.0,
            duality_factor: 1.0,
            triangulation_weight: 1.0,
            exact_sequence_factor: 1.0,
        }
    }
}

/// Three morphism matrices A → B → C → ... recorded on a motive
#[derive(Debug, Clone, PartialEq)]
pub struct ExactSequence {
    pub f: Array2<f64>,
    pub g: Array2<f64>,
    pub h: Array2<f64>,
}

impl ExactSequence {
    /// dim im f == dim ker g; `h` does not take part in the check
    pub fn is_exact(&self) -> Result<bool> {
        Ok(rank(&self.f)? == nullity(&self.g)?)
    }
}

/// Adjusted morphism matrix towards another motive
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondence {
    pub target: String,
    pub matrix: Array2<f64>,
}

/// Eigenvalue check of a motive after its degenerations
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityReport {
    pub name: String,
    pub eigenvalues: Vec<Complex<f64>>,
    pub stable: bool,
}

impl StabilityReport {
    pub fn eigenvalue_sum(&self) -> Complex<f64> {
        self.eigenvalues.iter().fold(Complex::new(0.0, 0.0), |acc, z| acc + z)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Motive {
    name: String,
    dimension: usize,
    matrix: Array2<f64>,
    parameters: VarietyParameters,
    degenerations: Vec<Degeneration>,
    exact_sequences: Vec<ExactSequence>,
    correspondences: Vec<Correspondence>,
}

impl Motive {
    /// `dimension` is a label carried alongside the matrix; the matrix may be
    /// any non-empty m×n shape
    pub fn new(name: impl Into<String>, dimension: usize, matrix: Array2<f64>) -> Result<Self> {
        if matrix.is_empty() {
            return Err(Error::invalid("matrix", "motive matrix has no entries"));
        }
        Ok(Self::from_parts(name.into(), dimension, matrix, VarietyParameters::default()))
    }

    fn from_parts(name: String, dimension: usize, matrix: Array2<f64>, parameters: VarietyParameters) -> Self {
        Self {
            name,
            dimension,
            matrix,
            parameters,
            degenerations: Vec::new(),
            exact_sequences: Vec::new(),
            correspondences: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: VarietyParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn parameters(&self) -> &VarietyParameters {
        &self.parameters
    }

    pub fn degenerations(&self) -> &[Degeneration] {
        &self.degenerations
    }

    pub fn exact_sequences(&self) -> &[ExactSequence] {
        &self.exact_sequences
    }

    pub fn correspondences(&self) -> &[Correspondence] {
        &self.correspondences
    }

    pub fn tensor(&self, other: &Motive) -> Motive {
        let scale = self.parameters.tensor_scaling * other.parameters.tensor_scaling;
        Motive::from_parts(
            format!("Tensor({}, {})", self.name, other.name),
            self.dimension * other.dimension,
            kron(&self.matrix, &other.matrix) * scale,
            VarietyParameters::default(),
        )
    }

    pub fn dual(&self) -> Motive {
        Motive::from_parts(
            format!("Dual({})", self.name),
            self.dimension,
            self.matrix.t().to_owned() * self.parameters.duality_factor,
            self.parameters,
        )
    }

    pub fn triangulate(&self, other: &Motive) -> Motive {
        let left = &self.matrix * self.parameters.triangulation_weight;
        let right = &other.matrix * other.parameters.triangulation_weight;
        Motive::from_parts(
            format!("Triangulate({}, {})", self.name, other.name),
            self.dimension + other.dimension,
            block_diag(&left, &right),
            VarietyParameters::default(),
        )
    }

    /// Record self·morphism·interaction_factor as a correspondence to `other`
    pub fn with_correspondence(mut self, other: &Motive, morphism: &Array2<f64>) -> Result<Self> {
        if morphism.nrows() != self.matrix.ncols() {
            return Err(Error::ShapeMismatch {
                operation: "correspondence",
                left: self.matrix.dim(),
                right: morphism.dim(),
            });
        }
        let matrix = self.matrix.dot(morphism) * self.parameters.interaction_factor;
        self.correspondences.push(Correspondence {
            target: other.name.clone(),
            matrix,
        });
        Ok(self)
    }

    /// Record the matrices of three motives, scaled by this motive's factor
    pub fn with_exact_sequence(mut self, first: &Motive, second: &Motive, third: &Motive) -> Self {
        let factor = self.parameters.exact_sequence_factor;
        self.exact_sequences.push(ExactSequence {
            f: &first.matrix * factor,
            g: &second.matrix * factor,
            h: &third.matrix * factor,
        });
        self
    }

    pub fn check_exact_sequences(&self) -> Result<Vec<bool>> {
        self.exact_sequences.iter().map(ExactSequence::is_exact).collect()
    }

    pub fn with_degeneration(mut self, degeneration: Degeneration) -> Self {
        self.degenerations.push(degeneration);
        self
    }

    /// Matrix after every attached rule, in order
    pub fn degenerated_matrix(&self) -> Array2<f64> {
        apply_all(&self.matrix, &self.degenerations)
    }

    /// New motive whose matrix has absorbed the attached rules
    pub fn degenerate(&self) -> Motive {
        Motive {
            matrix: self.degenerated_matrix(),
            degenerations: Vec::new(),
            ..self.clone()
        }
    }

    /// Eigenvalues after degeneration; stable iff every eigenvalue is finite.
    /// Rectangular motives have no spectrum and return `NonSquare`.
    pub fn stability(&self) -> Result<StabilityReport> {
        let (rows, cols) = self.matrix.dim();
        if rows != cols {
            return Err(Error::NonSquare { rows, cols });
        }
        let degenerated = self.degenerated_matrix();
        let (eigenvalues, stable) = if degenerated.iter().all(|v| v.is_finite()) {
            let eig = eigenvalues(&degenerated)?;
            let stable = eig.iter().all(|z| z.re.is_finite() && z.im.is_finite());
            (eig, stable)
        } else {
            (Vec::new(), false)
        };
        Ok(StabilityReport {
            name: self.name.clone(),
            eigenvalues,
            stable,
        })
    }
}

impl fmt::Display for Motive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MixedMotive({}, dim={})", self.name, self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, s};

    fn motive(name: &str, m: Array2<f64>) -> Motive {
        let n = m.nrows();
        Motive::new(name, n, m).unwrap()
    }

    #[test]
    fn test_tensor_shape_and_scaling() {
        let a = motive("A", Array2::eye(2)).with_parameters(VarietyParameters {
            tensor_scaling: 2.0,
            ..Default::default()
        });
        let b = motive("B", Array2::eye(3)).with_parameters(VarietyParameters {
            tensor_scaling: 1.5,
            ..Default::default()
        });
        let t = a.tensor(&b);
        assert_eq!(t.dimension(), 6);
        assert_eq!(t.matrix().dim(), (6, 6));
        assert_abs_diff_eq!(t.matrix()[[5, 5]], 3.0);
        assert_eq!(*t.parameters(), VarietyParameters::default());
        assert_eq!(t.name(), "Tensor(A, B)");
    }

    #[test]
    fn test_dual_transposes_and_keeps_parameters() {
        let params = VarietyParameters {
            duality_factor: 0.5,
            ..Default::default()
        };
        let a = motive("A", array![[1.0, 2.0], [3.0, 4.0]]).with_parameters(params);
        let d = a.dual();
        assert_eq!(d.matrix(), &array![[0.5, 1.5], [1.0, 2.0]]);
        assert_eq!(*d.parameters(), params);
        // Receiver untouched
        assert_eq!(a.matrix()[[0, 1]], 2.0);
    }

    #[test]
    fn test_triangulation_block_diagonal() {
        let a = motive("A", Array2::ones((2, 2))).with_parameters(VarietyParameters {
            triangulation_weight: 3.0,
            ..Default::default()
        });
        let b = motive("B", Array2::ones((3, 3)));
        let t = a.triangulate(&b);
        assert_eq!(t.dimension(), 5);
        assert!(t.matrix().slice(s![..2, 2..]).iter().all(|v| *v == 0.0));
        assert!(t.matrix().slice(s![2.., ..2]).iter().all(|v| *v == 0.0));
        assert_eq!(t.matrix()[[0, 0]], 3.0);
        assert_eq!(t.matrix()[[4, 4]], 1.0);
    }

    #[test]
    fn test_exactness_cases() {
        let i2 = motive("I", Array2::eye(2));
        let z2 = motive("0", Array2::zeros((2, 2)));
        let host = motive("host", Array2::eye(1))
            .with_exact_sequence(&i2, &z2, &i2)
            .with_exact_sequence(&z2, &i2, &i2)
            .with_exact_sequence(&i2, &i2, &i2);
        assert_eq!(host.check_exact_sequences().unwrap(), vec![true, true, false]);
    }

    #[test]
    fn test_exact_sequence_factor_applied() {
        let i2 = motive("I", Array2::eye(2));
        let host = motive("host", Array2::eye(1))
            .with_parameters(VarietyParameters {
                exact_sequence_factor: 1.05,
                ..Default::default()
            })
            .with_exact_sequence(&i2, &i2, &i2);
        assert_abs_diff_eq!(host.exact_sequences()[0].f[[0, 0]], 1.05);
    }

    #[test]
    fn test_correspondence_shape_mismatch() {
        let a = motive("A", Array2::eye(2));
        let b = motive("B", Array2::eye(3));
        assert!(matches!(
            a.clone().with_correspondence(&b, &Array2::zeros((3, 3))),
            Err(Error::ShapeMismatch { .. })
        ));
        let ok = a.with_correspondence(&b, &Array2::ones((2, 3))).unwrap();
        assert_eq!(ok.correspondences()[0].matrix.dim(), (2, 3));
        assert_eq!(ok.correspondences()[0].target, "B");
    }

    #[test]
    fn test_degenerate_is_new_instance() {
        let a = motive("A", Array2::eye(2)).with_degeneration(Degeneration::logarithmic(0.1));
        let d = a.degenerate();
        assert_abs_diff_eq!(d.matrix()[[0, 0]], 1.1);
        assert!(d.degenerations().is_empty());
        assert_eq!(a.matrix()[[0, 0]], 1.0);
    }

    #[test]
    fn test_stability_identity() {
        let report = motive("A", Array2::eye(3))
            .with_degeneration(Degeneration::arithmetic(0.5))
            .stability()
            .unwrap();
        assert!(report.stable);
        assert_abs_diff_eq!(report.eigenvalue_sum().re, 4.5, epsilon = 1e-10);
    }

    #[test]
    fn test_non_finite_is_unstable() {
        let report = motive("A", array![[f64::INFINITY]]).stability().unwrap();
        assert!(!report.stable);
    }

    #[test]
    fn test_dimension_is_a_label() {
        let shimura = Motive::new("Shimura", 10, Array2::eye(2)).unwrap();
        assert_eq!(shimura.dimension(), 10);
        assert_eq!(shimura.matrix().dim(), (2, 2));
        assert_eq!(shimura.dual().to_string(), "MixedMotive(Dual(Shimura), dim=10)");

        let row = Motive::new("K3", 5, Array2::ones((1, 10))).unwrap();
        assert_eq!(row.tensor(&shimura).dimension(), 50);
        assert_eq!(row.triangulate(&shimura).dimension(), 15);
        assert!(Motive::new("empty", 1, Array2::zeros((0, 3))).is_err());
    }

    #[test]
    fn test_rectangular_operations() {
        let a = Motive::new("A", 2, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let d = a.dual();
        assert_eq!(d.matrix().dim(), (3, 2));
        assert_eq!(d.matrix()[[2, 0]], 3.0);

        let b = Motive::new("B", 1, Array2::ones((1, 4))).unwrap();
        assert_eq!(a.tensor(&b).matrix().dim(), (2, 12));
        let t = a.triangulate(&b);
        assert_eq!(t.matrix().dim(), (3, 7));
        assert!(t.matrix().slice(s![..2, 3..]).iter().all(|v| *v == 0.0));

        let nodal = a.with_degeneration(Degeneration::nodal(0.5)).degenerate();
        assert_abs_diff_eq!(nodal.matrix()[[0, 1]], 2.5);
        assert!(matches!(
            b.with_degeneration(Degeneration::arithmetic(1.0)).stability(),
            Err(Error::NonSquare { rows: 1, cols: 4 })
        ));
    }
}
