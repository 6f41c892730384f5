//! Degeneration Rules: Closed-Form Matrix Perturbations
//!
//! Each rule maps a matrix M to a nearby matrix:
//!
//! | rule          | default       | action                                   |
//! |---------------|---------------|------------------------------------------|
//! | logarithmic   | s = 1/100     | M ↦ (1 + s)·M                            |
//! | tropical      | s = 1/200     | zero listed in-bound entries, then (1+s)·M |
//! | nodal         | f = 2/5       | M₀₁ += f, M₁₀ += f when M is ≥ 2×2        |
//! | arithmetic    | a = 1/400     | M ↦ M + a·I on the main diagonal          |
//!
//! Rules compose left to right.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::Serialize;

use crate::error::{Error, Result};

pub const DEFAULT_LOG_SCALING: f64 = 1.0 / 100.0;
pub const DEFAULT_TROPICAL_SCALING: f64 = 1.0 / 200.0;
pub const DEFAULT_NODAL_FACTOR: f64 = 2.0 / 5.0;
pub const DEFAULT_ARITHMETIC_FACTOR: f64 = 1.0 / 400.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Degeneration {
    Logarithmic { scaling: f64 },
    Tropical { positions: Vec<(usize, usize)>, scaling: f64 },
    Nodal { factor: f64 },
    Arithmetic { factor: f64 },
}

impl Degeneration {
    pub fn logarithmic(scaling: f64) -> Self {
        Degeneration::Logarithmic { scaling }
    }

    pub fn tropical(positions: Vec<(usize, usize)>, scaling: f64) -> Self {
        Degeneration::Tropical { positions, scaling }
    }

    pub fn nodal(factor: f64) -> Self {
        Degeneration::Nodal { factor }
    }

    pub fn arithmetic(factor: f64) -> Self {
        Degeneration::Arithmetic { factor }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Degeneration::Logarithmic { .. } => "logarithmic",
            Degeneration::Tropical { .. } => "tropical",
            Degeneration::Nodal { .. } => "nodal",
            Degeneration::Arithmetic { .. } => "arithmetic",
        }
    }

    pub fn apply(&self, m: &Array2<f64>) -> Array2<f64> {
        match self {
            Degeneration::Logarithmic { scaling } => m * (1.0 + scaling),
            Degeneration::Tropical { positions, scaling } => {
                let mut out = m.clone();
                for &(i, j) in positions {
                    if let Some(entry) = out.get_mut((i, j)) {
                        *entry = 0.0;
                    }
                }
                out * (1.0 + scaling)
            }
            Degeneration::Nodal { factor } => {
                let mut out = m.clone();
                if out.nrows() >= 2 && out.ncols() >= 2 {
                    out[[0, 1]] += factor;
                    out[[1, 0]] += factor;
                }
                out
            }
            Degeneration::Arithmetic { factor } => {
                let mut out = m.clone();
                out.diag_mut().mapv_inplace(|d| d + factor);
                out
            }
        }
    }
}

impl fmt::Display for Degeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Degeneration({})", self.name())
    }
}

/// Parses a rule name into that rule with its default parameters
impl FromStr for Degeneration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "logarithmic" => Ok(Degeneration::logarithmic(DEFAULT_LOG_SCALING)),
            "tropical" => Ok(Degeneration::tropical(Vec::new(), DEFAULT_TROPICAL_SCALING)),
            "nodal" => Ok(Degeneration::nodal(DEFAULT_NODAL_FACTOR)),
            "arithmetic" => Ok(Degeneration::arithmetic(DEFAULT_ARITHMETIC_FACTOR)),
            other => Err(Error::UnknownDegeneration(other.to_string())),
        }
    }
}

/// Apply rules in order
pub fn apply_all(m: &Array2<f64>, rules: &[Degeneration]) -> Array2<f64> {
    rules.iter().fold(m.clone(), |acc, rule| rule.apply(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_logarithmic_on_identity() {
        let s = 0.01;
        let out = Degeneration::logarithmic(s).apply(&Array2::eye(3));
        assert_eq!(out, Array2::<f64>::eye(3) * (1.0 + s));
    }

    #[test]
    fn test_logarithmic_composes() {
        let (s1, s2) = (0.01, 0.03);
        let rules = [Degeneration::logarithmic(s1), Degeneration::logarithmic(s2)];
        let out = apply_all(&Array2::eye(4), &rules);
        for ((i, j), v) in out.indexed_iter() {
            let expected = if i == j { (1.0 + s2) * (1.0 + s1) } else { 0.0 };
            assert_abs_diff_eq!(*v, expected, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_tropical_ignores_out_of_bounds() {
        let m = array![[1.0, 2.0], [3.0, 4.0]];
        let out = Degeneration::tropical(vec![(0, 1), (5, 5)], 0.5).apply(&m);
        assert_eq!(out, array![[1.5, 0.0], [4.5, 6.0]]);
    }

    #[test]
    fn test_nodal_needs_two_by_two() {
        let one = array![[1.0]];
        assert_eq!(Degeneration::nodal(0.4).apply(&one), one);
        let out = Degeneration::nodal(0.4).apply(&Array2::eye(3));
        assert_eq!(out[[0, 1]], 0.4);
        assert_eq!(out[[1, 0]], 0.4);
        assert_eq!(out[[2, 1]], 0.0);
    }

    #[test]
    fn test_arithmetic_shifts_diagonal() {
        let m = array![[2.0, 1.0], [0.0, 2.0]];
        let out = Degeneration::arithmetic(0.25).apply(&m);
        assert_eq!(out, array![[2.25, 1.0], [0.0, 2.25]]);
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(
            "nodal".parse::<Degeneration>().unwrap(),
            Degeneration::nodal(DEFAULT_NODAL_FACTOR)
        );
        assert!(matches!(
            "smooth".parse::<Degeneration>(),
            Err(Error::UnknownDegeneration(_))
        ));
    }
}
