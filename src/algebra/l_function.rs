//! L-Functions: Series, Polylogarithms and Euler Products
//!
//! ## Mathematical Background
//!
//! - **Dirichlet series**: L(s) = Σ_{n<N} n⁻ˢ, a truncated ζ(s)
//! - **Polylogarithm**: Li_s(z) = Σ_{k≥1} zᵏ / kˢ for |z| ≤ 1, with
//!   Li_s(1) = ζ(s) and Li_s(−1) = −(1 − 2^{1−s})ζ(s)
//! - **Automorphic form**: L(f, s) = Σ aₙ n⁻ˢ over Hecke eigenvalues aₙ
//! - **Artin L-function**: L(ρ, s) = Π_p (1 − χ(p) p⁻ˢ)⁻¹
//!
//! The variety-specific values are fixed polylogarithm combinations
//! scaled by per-variety coefficients.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Default truncation of the plain Dirichlet series (n = 1..999)
pub const DIRICHLET_TERMS: usize = 999;
/// Default truncation for automorphic and Artin L-functions
pub const DEFAULT_TERMS: usize = 100_000;
/// Substitute for a vanishing Euler factor denominator
pub const ZERO_DENOMINATOR_GUARD: f64 = 1e-10;
/// Share of an L-value counted as motivic contribution
pub const MOTIVIC_SHARE: f64 = 0.9;

const SERIES_TOL: f64 = 1e-17;
const SERIES_MAX_TERMS: usize = 100_000;
/// Terms summed explicitly before the Euler–Maclaurin tail of ζ(s)
const ZETA_HEAD: usize = 50;

/// Σ_{n=1}^{terms} n⁻ˢ
pub fn dirichlet_series(s: f64, terms: usize) -> f64 {
    (1..=terms).map(|n| (n as f64).powf(-s)).sum()
}

/// Riemann ζ(s) for real s > 1
pub fn zeta(s: f64) -> Result<f64> {
    if !(s > 1.0) {
        return Err(Error::invalid("s", format!("zeta diverges at s = {s}")));
    }
    let n = ZETA_HEAD as f64;
    let head: f64 = (1..ZETA_HEAD).map(|k| (k as f64).powf(-s)).sum();
    // Euler–Maclaurin tail from N to ∞
    let tail = n.powf(1.0 - s) / (s - 1.0) + 0.5 * n.powf(-s) + s * n.powf(-s - 1.0) / 12.0
        - s * (s + 1.0) * (s + 2.0) * n.powf(-s - 3.0) / 720.0;
    Ok(head + tail)
}

/// Li_s(z) for real s and real |z| ≤ 1
pub fn polylog(s: f64, z: f64) -> Result<f64> {
    if !z.is_finite() || z.abs() > 1.0 {
        return Err(Error::invalid("z", format!("polylog series needs |z| <= 1, got {z}")));
    }
    if z == 1.0 {
        return zeta(s);
    }
    if z == -1.0 {
        return Ok(-(1.0 - 2f64.powf(1.0 - s)) * zeta(s)?);
    }
    if z == 0.0 {
        return Ok(0.0);
    }

    let mut sum = 0.0;
    let mut power = 1.0;
    for k in 1..=SERIES_MAX_TERMS {
        power *= z;
        let term = power / (k as f64).powf(s);
        sum += term;
        if term.abs() <= SERIES_TOL * sum.abs() {
            break;
        }
    }
    Ok(sum)
}

/// Variety families with a dedicated L-value formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarietyKind {
    EllipticCurve,
    ShimuraVariety,
    K3Surface,
    SiegelModularVariety,
    HilbertModularSurface,
    #[default]
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LFunctionParameters {
    pub kind: VarietyKind,
    pub l_scaling: f64,
    pub l_variety_term: f64,
    pub local_factor_coeff: f64,
}

impl Default for LFunctionParameters {
    fn default() -> Self {
        Self {
            kind: VarietyKind::Generic,
            l_scaling: 1.0,
            l_variety_term: 0.0,
            local_factor_coeff: 0.02,
        }
    }
}

/// Running record of L-values for one variety
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomorphicLFunction {
    pub variety: String,
    pub parameters: LFunctionParameters,
    l_values: Vec<f64>,
    motivic_contributions: Vec<f64>,
}

impl AutomorphicLFunction {
    pub fn new(variety: impl Into<String>, parameters: LFunctionParameters) -> Self {
        Self {
            variety: variety.into(),
            parameters,
            l_values: Vec::new(),
            motivic_contributions: Vec::new(),
        }
    }

    /// Variety-specific polylog combination, then l ← l·scaling + term·Li₃(½)
    pub fn realistic_value(&self) -> Result<f64> {
        let p = &self.parameters;
        let (ls, lfc) = (p.l_scaling, p.local_factor_coeff);
        let base = match p.kind {
            VarietyKind::EllipticCurve => polylog(2.0, 1.0)? * ls + lfc * polylog(3.0, 0.5)?,
            VarietyKind::ShimuraVariety => polylog(2.0, 1.0)? + polylog(3.0, 0.5)? * ls,
            VarietyKind::K3Surface => polylog(4.0, 0.3)? * ls + lfc * polylog(5.0, 0.2)?,
            VarietyKind::SiegelModularVariety => polylog(2.5, 0.7)? + polylog(3.5, 0.2)? * ls,
            VarietyKind::HilbertModularSurface => polylog(3.0, 0.4)? * ls + polylog(4.0, 0.6)?,
            VarietyKind::Generic => polylog(2.0, 1.0)?,
        };
        Ok(base * ls + p.l_variety_term * polylog(3.0, 0.5)?)
    }

    /// Store an L-value with its motivic contribution (0.9·L)
    pub fn record(&mut self, l_value: f64) {
        self.l_values.push(l_value);
        self.motivic_contributions.push(l_value * MOTIVIC_SHARE);
    }

    pub fn l_values(&self) -> &[f64] {
        &self.l_values
    }

    /// Zero when nothing has been recorded
    pub fn average_l_value(&self) -> f64 {
        average(&self.l_values)
    }

    pub fn average_motivic_contribution(&self) -> f64 {
        average(&self.motivic_contributions)
    }
}

impl fmt::Display for AutomorphicLFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AutomorphicLFunction({}, avg_L={:.6}, avg_motivic={:.6})",
            self.variety,
            self.average_l_value(),
            self.average_motivic_contribution()
        )
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Modular form of given weight and level with Hecke eigenvalues aₙ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomorphicForm {
    pub name: String,
    pub weight: u32,
    pub level: u32,
    pub coefficients: BTreeMap<usize, f64>,
}

impl AutomorphicForm {
    pub fn new(name: impl Into<String>, weight: u32, level: u32, coefficients: BTreeMap<usize, f64>) -> Self {
        Self {
            name: name.into(),
            weight,
            level,
            coefficients,
        }
    }

    /// aₙ, zero when not given
    pub fn hecke_eigenvalue(&self, n: usize) -> f64 {
        self.coefficients.get(&n).copied().unwrap_or(0.0)
    }

    /// Σ_{n=1}^{terms} aₙ n⁻ˢ
    pub fn l_value(&self, s: f64, terms: usize) -> f64 {
        self.coefficients
            .range(1..=terms)
            .map(|(&n, &a)| a * (n as f64).powf(-s))
            .sum()
    }
}

impl fmt::Display for AutomorphicForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AutomorphicForm({}, Weight: {}, Level: {})", self.name, self.weight, self.level)
    }
}

/// Galois representation given by its character values at primes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaloisRepresentation {
    pub name: String,
    pub dimension: usize,
    /// χ(p); primes not listed use χ(p) = 1
    pub character_values: BTreeMap<u64, f64>,
}

impl GaloisRepresentation {
    pub fn new(name: impl Into<String>, dimension: usize, character_values: BTreeMap<u64, f64>) -> Self {
        Self {
            name: name.into(),
            dimension,
            character_values,
        }
    }

    /// Π_{p ≤ terms+1} (1 − χ(p)/pˢ)⁻¹; a zero denominator becomes 1e-10
    pub fn artin_l_value(&self, s: f64, terms: usize) -> f64 {
        primes_up_to(terms as u64 + 1)
            .into_iter()
            .map(|p| {
                let chi = self.character_values.get(&p).copied().unwrap_or(1.0);
                let mut denom = 1.0 - chi / (p as f64).powf(s);
                if denom == 0.0 {
                    denom = ZERO_DENOMINATOR_GUARD;
                }
                1.0 / denom
            })
            .product()
    }
}

impl fmt::Display for GaloisRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GaloisRepresentation({}, Dimension: {})", self.name, self.dimension)
    }
}

/// Sieve of Eratosthenes
pub fn primes_up_to(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let n = limit as usize;
    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    is_prime[1] = false;
    let mut i = 2;
    while i * i <= n {
        if is_prime[i] {
            for j in (i * i..=n).step_by(i) {
                is_prime[j] = false;
            }
        }
        i += 1;
    }
    is_prime
        .iter()
        .enumerate()
        .filter(|(_, p)| **p)
        .map(|(i, _)| i as u64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_zeta_values() {
        assert_abs_diff_eq!(zeta(2.0).unwrap(), PI * PI / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(zeta(4.0).unwrap(), PI.powi(4) / 90.0, epsilon = 1e-12);
        assert!(zeta(1.0).is_err());
    }

    #[test]
    fn test_polylog_closed_forms() {
        // Li₁(z) = −ln(1 − z)
        assert_abs_diff_eq!(polylog(1.0, 0.5).unwrap(), 2f64.ln(), epsilon = 1e-14);
        // Li₂(½) = π²/12 − ln²2 / 2
        let expected = PI * PI / 12.0 - 2f64.ln().powi(2) / 2.0;
        assert_abs_diff_eq!(polylog(2.0, 0.5).unwrap(), expected, epsilon = 1e-14);
        // Li₂(−1) = −π²/12
        assert_abs_diff_eq!(polylog(2.0, -1.0).unwrap(), -PI * PI / 12.0, epsilon = 1e-12);
        assert!(polylog(2.0, 1.5).is_err());
    }

    #[test]
    fn test_dirichlet_close_to_zeta() {
        let l = dirichlet_series(3.0, DIRICHLET_TERMS);
        assert_abs_diff_eq!(l, zeta(3.0).unwrap(), epsilon = 1e-6);
    }

    #[test]
    fn test_elliptic_realistic_value() {
        let params = LFunctionParameters {
            kind: VarietyKind::EllipticCurve,
            l_scaling: 1.0,
            l_variety_term: 0.5,
            local_factor_coeff: 0.02,
        };
        let l = AutomorphicLFunction::new("Elliptic Curve", params);
        let li3_half = polylog(3.0, 0.5).unwrap();
        let expected = PI * PI / 6.0 + 0.02 * li3_half + 0.5 * li3_half;
        assert_abs_diff_eq!(l.realistic_value().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_averages() {
        let mut l = AutomorphicLFunction::new("V", LFunctionParameters::default());
        assert_eq!(l.average_l_value(), 0.0);
        l.record(1.0);
        l.record(3.0);
        assert_abs_diff_eq!(l.average_l_value(), 2.0);
        assert_abs_diff_eq!(l.average_motivic_contribution(), 1.8);
    }

    #[test]
    fn test_automorphic_form_series() {
        let coeffs: BTreeMap<usize, f64> = (1..=4).map(|n| (n, 1.0)).collect();
        let form = AutomorphicForm::new("f", 2, 11, coeffs);
        assert_abs_diff_eq!(form.l_value(1.0, 2), 1.5);
        assert_eq!(form.hecke_eigenvalue(7), 0.0);
    }

    #[test]
    fn test_artin_trivial_character_is_zeta() {
        let rho = GaloisRepresentation::new("trivial", 1, BTreeMap::new());
        assert_abs_diff_eq!(rho.artin_l_value(2.0, 100_000), PI * PI / 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_artin_zero_denominator_guard() {
        // χ(2) = 4 at s = 2 makes 1 − χ/pˢ vanish
        let rho = GaloisRepresentation::new("rho", 1, BTreeMap::from([(2, 4.0)]));
        let l = rho.artin_l_value(2.0, 1);
        assert_abs_diff_eq!(l, 1.0 / ZERO_DENOMINATOR_GUARD);
    }

    #[test]
    fn test_sieve() {
        assert_eq!(primes_up_to(20), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert!(primes_up_to(1).is_empty());
    }
}
