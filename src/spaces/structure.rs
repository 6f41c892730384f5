//! Degeneration Spaces: Closed-Form Transforms of Gaussian Blocks
//!
//! Each structure type builds one or more blocks from a normal-random base
//! block, stacks them and standardizes the result. The transforms mimic
//! algebraic degenerations:
//!
//! - **Kummer**: a cyclic coordinate rotation of the base
//! - **Artin–Schreier**: translates base + i for i ∈ ℤ/p
//! - **Combined**: logarithmic (eˣ), nodal (|x|) and cuspidal (x^{2/3}) blocks
//! - **Wild ramification**: base + i/p + (i/p)ᵖ + (i/p)ᵖ⁺¹
//! - **Non-commutative**: rotations plus a row-shifted braid
//! - **Frobenius wild**: p iterations of x ← x + clip(xᵖ − x)/p
//! - **Matrix action**: base·A, base·B, base·[A, B] for random A, B

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Zip};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

use super::cloud::{roll_columns, roll_rows, PointCloud};
use crate::error::{Error, Result};

/// Characteristic used when a structure needs one and none is given
pub const DEFAULT_CHAR_P: u32 = 5;

/// Clip bound for the Frobenius iteration
const FROBENIUS_CLIP: f64 = 1e6;

/// Closed set of synthetic structure types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Standard,
    Sphere,
    Kummer,
    ArtinSchreier,
    Combined,
    WildRamification,
    Noncommutative,
    FrobeniusWild,
    Singular,
    MatrixAction,
}

impl StructureType {
    pub const ALL: [StructureType; 10] = [
        StructureType::Standard,
        StructureType::Sphere,
        StructureType::Kummer,
        StructureType::ArtinSchreier,
        StructureType::Combined,
        StructureType::WildRamification,
        StructureType::Noncommutative,
        StructureType::FrobeniusWild,
        StructureType::Singular,
        StructureType::MatrixAction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StructureType::Standard => "standard",
            StructureType::Sphere => "sphere",
            StructureType::Kummer => "kummer",
            StructureType::ArtinSchreier => "artin_schreier",
            StructureType::Combined => "combined",
            StructureType::WildRamification => "wild_ramification",
            StructureType::Noncommutative => "noncommutative",
            StructureType::FrobeniusWild => "frobenius_wild",
            StructureType::Singular => "singular",
            StructureType::MatrixAction => "matrix_action",
        }
    }

    /// Generate a standardized cloud with the default characteristic
    pub fn generate<R: Rng + ?Sized>(
        &self,
        dimension: usize,
        n_points: usize,
        rng: &mut R,
    ) -> Result<PointCloud> {
        self.generate_with_char(dimension, n_points, DEFAULT_CHAR_P, rng)
    }

    /// Generate a standardized cloud of roughly `n_points` rows in ℝ^`dimension`
    pub fn generate_with_char<R: Rng + ?Sized>(
        &self,
        dimension: usize,
        n_points: usize,
        char_p: u32,
        rng: &mut R,
    ) -> Result<PointCloud> {
        if dimension == 0 {
            return Err(Error::invalid("dimension", "must be at least 1"));
        }
        if char_p < 2 {
            return Err(Error::invalid("char_p", format!("{char_p} is not a characteristic")));
        }
        let p = char_p as usize;
        let pf = char_p as f64;

        let cloud = match self {
            StructureType::Standard => {
                PointCloud::new(normal_block(rng, block_rows(n_points, 1)?, dimension))
            }
            StructureType::Sphere => {
                let mut base = normal_block(rng, block_rows(n_points, 1)?, dimension);
                for mut row in base.rows_mut() {
                    let norm = row.dot(&row).sqrt();
                    if norm > 0.0 {
                        row /= norm;
                    }
                }
                PointCloud::new(base)
            }
            StructureType::Kummer => {
                let base = normal_block(rng, block_rows(n_points, 2)?, dimension);
                let rotated = roll_columns(&base, 1);
                PointCloud::stack(&[base, rotated])?
            }
            StructureType::ArtinSchreier => {
                let base = normal_block(rng, block_rows(n_points, p)?, dimension);
                let blocks: Vec<Array2<f64>> = (0..p).map(|i| &base + i as f64).collect();
                PointCloud::stack(&blocks)?
            }
            StructureType::Combined => {
                let base = normal_block(rng, block_rows(n_points, 3)?, dimension);
                let log_component = base.mapv(f64::exp);
                let nodal_component = base.mapv(f64::abs);
                let cusp_component = base.mapv(cusp);
                PointCloud::stack(&[log_component, nodal_component, cusp_component])?
            }
            StructureType::WildRamification => {
                let base = normal_block(rng, block_rows(n_points, p)?, dimension);
                let blocks: Vec<Array2<f64>> = (0..p)
                    .map(|i| {
                        let t = i as f64 / pf;
                        let shift = t + t.powi(char_p as i32) + t.powi(char_p as i32 + 1);
                        &base + shift
                    })
                    .collect();
                PointCloud::stack(&blocks)?
            }
            StructureType::Noncommutative => {
                let base = normal_block(rng, block_rows(n_points, 3)?, dimension);
                let rot_1 = roll_columns(&base, 1);
                let rot_2 = roll_columns(&base, 2);
                let braid = &rot_1 + &roll_rows(&rot_2, 1);
                PointCloud::stack(&[base, rot_1, braid])?
            }
            StructureType::FrobeniusWild => {
                let base = normal_block(rng, block_rows(n_points, p)?, dimension);
                PointCloud::new(frobenius_action(base, char_p)?)
            }
            StructureType::Singular => {
                let base = normal_block(rng, block_rows(n_points, 3)?, dimension);
                let node = base.mapv(|x| x.abs() * sign(x));
                let cusp_component = base.mapv(cusp);
                let log_component = base.mapv(|x| (x.abs() + 1.0).ln() * sign(x));
                PointCloud::stack(&[node, cusp_component, log_component])?
            }
            StructureType::MatrixAction => {
                let base = normal_block(rng, block_rows(n_points, 4)?, dimension);
                PointCloud::stack(&matrix_action(&base, dimension, rng))?
            }
        };

        if !cloud.is_finite() {
            return Err(Error::non_finite(format!("{} space", self.label())));
        }
        Ok(cloud.standardized())
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StructureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StructureType::ALL
            .iter()
            .copied()
            .find(|t| t.label() == s)
            .ok_or_else(|| Error::UnknownStructure(s.to_string()))
    }
}

/// n×d block of i.i.d. N(0, 1) samples
pub(crate) fn normal_block<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.sample::<f64, _>(StandardNormal))
}

fn block_rows(n_points: usize, blocks: usize) -> Result<usize> {
    let rows = n_points / blocks;
    if rows == 0 {
        return Err(Error::invalid(
            "n_points",
            format!("{n_points} points cannot fill {blocks} blocks"),
        ));
    }
    Ok(rows)
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn cusp(x: f64) -> f64 {
    sign(x) * x.abs().powf(2.0 / 3.0)
}

/// x ← x + clip(xᵖ − x, ±1e6) / (p + 1e-10), repeated p times
fn frobenius_action(mut base: Array2<f64>, char_p: u32) -> Result<Array2<f64>> {
    let pf = char_p as f64;
    for _ in 0..char_p {
        Zip::from(&mut base).for_each(|x| {
            let frob = (x.powi(char_p as i32) - *x).clamp(-FROBENIUS_CLIP, FROBENIUS_CLIP);
            *x += frob / (pf + 1e-10);
        });
        if base.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("frobenius action"));
        }
    }
    Ok(base)
}

/// Blocks base, base·A, base·B, base·(AB − BA)
fn matrix_action<R: Rng + ?Sized>(
    base: &Array2<f64>,
    dimension: usize,
    rng: &mut R,
) -> Vec<Array2<f64>> {
    let a = normal_block(rng, dimension, dimension);
    let mut b = normal_block(rng, dimension, dimension);
    let ab = a.dot(&b);
    let ba = b.dot(&a);
    let commute = ab
        .iter()
        .zip(ba.iter())
        .all(|(x, y)| (x - y).abs() <= 1e-8 + 1e-5 * y.abs());
    if commute {
        b += &Array2::<f64>::eye(dimension);
    }
    let commutator = a.dot(&b) - b.dot(&a);
    vec![base.clone(), base.dot(&a), base.dot(&b), base.dot(&commutator)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_unknown_label_is_error() {
        assert!(matches!(
            "tropical".parse::<StructureType>(),
            Err(Error::UnknownStructure(_))
        ));
        assert_eq!("kummer".parse::<StructureType>().unwrap(), StructureType::Kummer);
    }

    #[test]
    fn test_block_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let kummer = StructureType::Kummer.generate(3, 101, &mut rng).unwrap();
        assert_eq!(kummer.n_points(), 100);
        let artin = StructureType::ArtinSchreier.generate(3, 101, &mut rng).unwrap();
        assert_eq!(artin.n_points(), 100);
        let action = StructureType::MatrixAction.generate(4, 100, &mut rng).unwrap();
        assert_eq!(action.n_points(), 100);
        assert_eq!(action.dimension(), 4);
    }

    #[test]
    fn test_too_few_points() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(StructureType::WildRamification.generate(3, 4, &mut rng).is_err());
        assert!(StructureType::Standard.generate(0, 10, &mut rng).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        #[test]
        fn test_generated_clouds_are_standardized(
            seed in any::<u64>(),
            dimension in 1usize..7,
            idx in 0usize..StructureType::ALL.len(),
        ) {
            let structure = StructureType::ALL[idx];
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let cloud = structure.generate(dimension, 120, &mut rng).unwrap();
            prop_assert_eq!(cloud.dimension(), dimension);
            for m in cloud.column_means() {
                assert_abs_diff_eq!(m, 0.0, epsilon = 1e-8);
            }
            for v in cloud.column_variances() {
                assert_abs_diff_eq!(v, 1.0, epsilon = 1e-8);
            }
        }
    }
}
