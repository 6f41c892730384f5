//! Field Extensions: Binomial Minimal Polynomials over ℚ
//!
//! ## Mathematical Background
//!
//! A radical a^{1/n} has minimal polynomial xⁿ − a exactly when that
//! binomial is irreducible. Capelli's theorem decides this: xⁿ − a is
//! irreducible over ℚ iff
//!
//! - a ∉ ℚᵖ for every prime p | n, and
//! - a ∉ −4ℚ⁴ whenever 4 | n.
//!
//! The suite checks Kummer radicals, the binomials xᵖ − a used as
//! Artin–Schreier test polynomials, Witt vector powers, purely
//! inseparable binomials x^{cᵏ} − c, the stability of real cube roots and
//! the agreement of exact and numerical roots. Transcendental bases or
//! exponents have no minimal polynomial and count as failures.

use std::collections::BTreeMap;
use std::f64::consts::{E, PI};
use std::fmt;

use serde::Serialize;

use crate::comparison::{mean, population_variance};
use crate::error::{Error, Result};

/// Repetitions used by the cube-root stability check
const STABILITY_REPEATS: usize = 5;
/// Relative tolerance for numerical root agreement
const ROOT_TOL: f64 = 1e-9;

/// Base of a radical
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FieldElement {
    Integer(i64),
    /// √m
    Sqrt(i64),
    E,
    Pi,
}

impl FieldElement {
    pub fn value(&self) -> f64 {
        match self {
            FieldElement::Integer(a) => *a as f64,
            FieldElement::Sqrt(m) => (*m as f64).sqrt(),
            FieldElement::E => E,
            FieldElement::Pi => PI,
        }
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldElement::Integer(a) => write!(f, "{a}"),
            FieldElement::Sqrt(m) => write!(f, "sqrt({m})"),
            FieldElement::E => f.write_str("E"),
            FieldElement::Pi => f.write_str("pi"),
        }
    }
}

/// Exponent applied to a base
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Exponent {
    /// 1/q
    Reciprocal(u32),
    /// √m
    Sqrt(i64),
    Pi,
}

impl Exponent {
    pub fn value(&self) -> f64 {
        match self {
            Exponent::Reciprocal(q) => 1.0 / *q as f64,
            Exponent::Sqrt(m) => (*m as f64).sqrt(),
            Exponent::Pi => PI,
        }
    }
}

impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exponent::Reciprocal(q) => write!(f, "1/{q}"),
            Exponent::Sqrt(m) => write!(f, "sqrt({m})"),
            Exponent::Pi => f.write_str("pi"),
        }
    }
}

/// xⁿ − c with integer c
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binomial {
    pub degree: u64,
    pub constant: i64,
}

impl Binomial {
    pub fn new(degree: u64, constant: i64) -> Self {
        Self { degree, constant }
    }

    /// Capelli's criterion
    pub fn is_irreducible(&self) -> bool {
        let n = self.degree;
        let a = self.constant;
        if n == 0 {
            return false;
        }
        if n == 1 {
            return true;
        }
        if prime_factors(n).into_iter().any(|p| is_perfect_power(a, p)) {
            return false;
        }
        if n % 4 == 0 && a % 4 == 0 && a < 0 && is_perfect_power(-a / 4, 4) {
            return false;
        }
        true
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        x.powf(self.degree as f64) - self.constant as f64
    }
}

impl fmt::Display for Binomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constant < 0 {
            write!(f, "x**{} + {}", self.degree, -self.constant)
        } else {
            write!(f, "x**{} - {}", self.degree, self.constant)
        }
    }
}

/// Distinct prime factors in increasing order
fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            out.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        out.push(n);
    }
    out
}

/// Whether a = bᵖ for some integer b
fn is_perfect_power(a: i64, p: u64) -> bool {
    if a < 0 && p % 2 == 0 {
        return false;
    }
    let magnitude = a.unsigned_abs() as f64;
    let guess = magnitude.powf(1.0 / p as f64).round() as i128;
    let target = a.unsigned_abs() as i128;
    (guess - 1..=guess + 1).filter(|b| *b >= 0).any(|b| {
        u32::try_from(p)
            .ok()
            .and_then(|e| b.checked_pow(e))
            .is_some_and(|v| v == target)
    })
}

/// Minimal polynomial of base^exponent for algebraic radicals.
///
/// Integer a with exponent 1/q gives x^q − a; √m with 1/q gives x^{2q} − m.
/// Transcendental inputs are `Unsupported`; reducible binomials are
/// `Reducible`.
pub fn kummer_minimal_polynomial(base: FieldElement, exponent: Exponent) -> Result<Binomial> {
    let q = match exponent {
        Exponent::Reciprocal(q) if q > 0 => q as u64,
        Exponent::Reciprocal(_) => return Err(Error::invalid("exponent", "1/0 is undefined")),
        other => {
            return Err(Error::Unsupported(format!(
                "{base}**{other} is not algebraic of known degree"
            )))
        }
    };
    let poly = match base {
        FieldElement::Integer(a) => Binomial::new(q, a),
        FieldElement::Sqrt(m) => Binomial::new(2 * q, m),
        FieldElement::E | FieldElement::Pi => {
            return Err(Error::Unsupported(format!("{base} is transcendental")))
        }
    };
    if !poly.is_irreducible() {
        return Err(Error::Reducible(poly.to_string()));
    }
    Ok(poly)
}

/// xᵖ − a, required to be irreducible
pub fn artin_schreier_polynomial(prime: u64, base: i64) -> Result<Binomial> {
    let poly = Binomial::new(prime, base);
    if !poly.is_irreducible() {
        return Err(Error::Reducible(poly.to_string()));
    }
    Ok(poly)
}

/// Components base⁰, base¹, …, base^{dimension−1}
pub fn witt_vector(base: FieldElement, dimension: usize) -> Result<Vec<f64>> {
    let b = base.value();
    let components: Vec<f64> = (0..dimension).map(|i| b.powi(i as i32)).collect();
    if components.iter().any(|c| !c.is_finite()) {
        return Err(Error::non_finite(format!("witt vector of {base}")));
    }
    Ok(components)
}

/// x^{cᵏ} − c in characteristic c
pub fn purely_inseparable_polynomial(characteristic: u64, power: u32) -> Result<Binomial> {
    let degree = characteristic
        .checked_pow(power)
        .ok_or_else(|| Error::invalid("power", format!("{characteristic}^{power} overflows")))?;
    let constant = i64::try_from(characteristic)
        .map_err(|_| Error::invalid("characteristic", "does not fit in i64"))?;
    Ok(Binomial::new(degree, constant))
}

/// Repeated real cube roots agree bit for bit
pub fn cube_root_stability(base: i64) -> Result<f64> {
    let roots: Vec<f64> = (0..STABILITY_REPEATS).map(|_| (base as f64).cbrt()).collect();
    let first = roots[0];
    if !first.is_finite() || roots.iter().any(|r| r.to_bits() != first.to_bits()) {
        return Err(Error::non_finite(format!("cube root of {base}")));
    }
    Ok(first)
}

/// Compare powf against an independent evaluation: the binomial residual
/// for radicals, exp(e·ln b) otherwise
pub fn cross_verify_root(base: i64, exponent: Exponent) -> Result<f64> {
    if base <= 0 {
        return Err(Error::invalid("base", "cross verification needs a positive base"));
    }
    let b = base as f64;
    let numerical = b.powf(exponent.value());
    let agrees = match exponent {
        Exponent::Reciprocal(q) => {
            let poly = Binomial::new(q as u64, base);
            poly.evaluate(numerical).abs() <= ROOT_TOL * b
        }
        _ => {
            let independent = (exponent.value() * b.ln()).exp();
            (numerical - independent).abs() <= ROOT_TOL * numerical.abs()
        }
    };
    if !agrees {
        return Err(Error::invalid("root", format!("{base}**{exponent} disagrees between evaluations")));
    }
    Ok(numerical)
}

/// Test families tallied by the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ExtensionCategory {
    Kummer,
    ArtinSchreier,
    Witt,
    CrossVerification,
}

impl ExtensionCategory {
    pub const ALL: [ExtensionCategory; 4] = [
        ExtensionCategory::Kummer,
        ExtensionCategory::ArtinSchreier,
        ExtensionCategory::Witt,
        ExtensionCategory::CrossVerification,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExtensionCategory::Kummer => "Kummer Extensions",
            ExtensionCategory::ArtinSchreier => "Artin-Schreier Extensions",
            ExtensionCategory::Witt => "Witt Vector Fields",
            ExtensionCategory::CrossVerification => "Cross-Verification of Roots",
        }
    }
}

/// One executed check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionTest {
    pub category: ExtensionCategory,
    pub section: &'static str,
    pub description: String,
    pub passed: bool,
    /// Result on success, error message on failure
    pub detail: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub successful: usize,
    pub failed: usize,
}

/// Inputs of the extension suite
#[derive(Debug, Clone, Serialize)]
pub struct FieldExtensionSuite {
    pub bases: Vec<FieldElement>,
    pub kummer_powers: Vec<Exponent>,
    pub artin_schreier_primes: Vec<u64>,
    pub artin_schreier_bases: Vec<i64>,
    pub witt_bases: Vec<FieldElement>,
    pub witt_dimensions: Vec<usize>,
    pub extended_bases: Vec<i64>,
    pub extended_powers: Vec<Exponent>,
    pub inseparable_chars: Vec<u64>,
    pub inseparable_powers: Vec<u32>,
}

impl Default for FieldExtensionSuite {
    fn default() -> Self {
        use FieldElement as F;
        Self {
            bases: vec![
                F::Integer(7),
                F::Integer(11),
                F::Integer(13),
                F::Integer(17),
                F::Integer(-3),
                F::Sqrt(2),
                F::E,
                F::Pi,
            ],
            kummer_powers: vec![
                Exponent::Reciprocal(3),
                Exponent::Reciprocal(4),
                Exponent::Reciprocal(5),
                Exponent::Reciprocal(7),
                Exponent::Reciprocal(9),
                Exponent::Sqrt(2),
                Exponent::Pi,
            ],
            artin_schreier_primes: vec![2, 3, 5, 7, 11],
            artin_schreier_bases: vec![7, 11, 13, 17, -3],
            witt_bases: vec![
                F::Integer(7),
                F::Integer(11),
                F::Integer(13),
                F::Integer(17),
                F::Integer(-3),
                F::Sqrt(2),
            ],
            witt_dimensions: vec![2, 3, 4, 5],
            extended_bases: vec![7, 11],
            extended_powers: vec![
                Exponent::Reciprocal(3),
                Exponent::Reciprocal(5),
                Exponent::Sqrt(2),
                Exponent::Pi,
            ],
            inseparable_chars: vec![2, 3],
            inseparable_powers: vec![1, 2, 3, 4],
        }
    }
}

impl FieldExtensionSuite {
    pub fn run(&self) -> FieldExtensionReport {
        let mut tests = Vec::new();
        let mut push = |category, section, description: String, outcome: Result<String>| {
            let (passed, detail) = match outcome {
                Ok(detail) => (true, detail),
                Err(err) => (false, err.to_string()),
            };
            tests.push(ExtensionTest {
                category,
                section,
                description,
                passed,
                detail,
            });
        };

        for &base in &self.bases {
            for &power in &self.kummer_powers {
                push(
                    ExtensionCategory::Kummer,
                    "Kummer Extensions",
                    format!("base {base} with power {power}"),
                    kummer_minimal_polynomial(base, power).map(|p| p.to_string()),
                );
            }
        }

        for &prime in &self.artin_schreier_primes {
            for &base in &self.artin_schreier_bases {
                push(
                    ExtensionCategory::ArtinSchreier,
                    "Artin-Schreier Extensions",
                    format!("prime {prime} and base {base}"),
                    artin_schreier_polynomial(prime, base).map(|p| p.to_string()),
                );
            }
        }

        for &base in &self.witt_bases {
            for &dimension in &self.witt_dimensions {
                push(
                    ExtensionCategory::Witt,
                    "Witt Vector Fields",
                    format!("base {base} and dimension {dimension}"),
                    witt_vector(base, dimension).map(|v| format!("{v:?}")),
                );
            }
        }

        for &base in &self.extended_bases {
            for &power in &self.extended_powers {
                push(
                    ExtensionCategory::Kummer,
                    "Extended Automorphism Tests",
                    format!("base {base} with power {power}"),
                    kummer_minimal_polynomial(FieldElement::Integer(base), power).map(|p| p.to_string()),
                );
            }
        }

        for &characteristic in &self.inseparable_chars {
            for &power in &self.inseparable_powers {
                push(
                    ExtensionCategory::ArtinSchreier,
                    "Purely Inseparable Extensions",
                    format!("characteristic {characteristic} and power {power}"),
                    purely_inseparable_polynomial(characteristic, power).map(|p| p.to_string()),
                );
            }
        }

        for &base in &self.extended_bases {
            push(
                ExtensionCategory::CrossVerification,
                "Cube Root Stability",
                format!("base {base}"),
                cube_root_stability(base).map(|r| format!("{r:.15}")),
            );
        }

        for &base in &self.extended_bases {
            for &power in &self.extended_powers {
                push(
                    ExtensionCategory::CrossVerification,
                    "Cross-Verification of Roots",
                    format!("base {base} and power {power}"),
                    cross_verify_root(base, power).map(|r| format!("{r:.15}")),
                );
            }
        }

        FieldExtensionReport { tests }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldExtensionReport {
    pub tests: Vec<ExtensionTest>,
}

impl FieldExtensionReport {
    pub fn tallies(&self) -> BTreeMap<ExtensionCategory, Tally> {
        let mut out: BTreeMap<ExtensionCategory, Tally> =
            ExtensionCategory::ALL.iter().map(|c| (*c, Tally::default())).collect();
        for test in &self.tests {
            let tally = out.entry(test.category).or_default();
            if test.passed {
                tally.successful += 1;
            } else {
                tally.failed += 1;
            }
        }
        out
    }

    pub fn total_successful(&self) -> usize {
        self.tests.iter().filter(|t| t.passed).count()
    }

    pub fn total_failed(&self) -> usize {
        self.tests.len() - self.total_successful()
    }

    /// (mean, population variance) of successes across categories
    pub fn success_spread(&self) -> (f64, f64) {
        let counts: Vec<f64> = self.tallies().values().map(|t| t.successful as f64).collect();
        (mean(&counts), population_variance(&counts))
    }

    /// (mean, population variance) of failures across categories
    pub fn failure_spread(&self) -> (f64, f64) {
        let counts: Vec<f64> = self.tallies().values().map(|t| t.failed as f64).collect();
        (mean(&counts), population_variance(&counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capelli() {
        assert!(Binomial::new(3, 7).is_irreducible());
        assert!(Binomial::new(4, -3).is_irreducible());
        assert!(!Binomial::new(2, 4).is_irreducible());
        assert!(!Binomial::new(3, -8).is_irreducible());
        assert!(!Binomial::new(6, 8).is_irreducible());
        // x⁴ + 4 = (x² + 2x + 2)(x² − 2x + 2)
        assert!(!Binomial::new(4, -4).is_irreducible());
        assert!(Binomial::new(2, -4).is_irreducible());
    }

    #[test]
    fn test_kummer_minimal_polynomials() {
        let p = kummer_minimal_polynomial(FieldElement::Integer(7), Exponent::Reciprocal(3)).unwrap();
        assert_eq!(p.to_string(), "x**3 - 7");
        let p = kummer_minimal_polynomial(FieldElement::Sqrt(2), Exponent::Reciprocal(4)).unwrap();
        assert_eq!(p, Binomial::new(8, 2));
        let p = kummer_minimal_polynomial(FieldElement::Integer(-3), Exponent::Reciprocal(5)).unwrap();
        assert_eq!(p.to_string(), "x**5 + 3");
    }

    #[test]
    fn test_transcendental_and_reducible() {
        assert!(matches!(
            kummer_minimal_polynomial(FieldElement::E, Exponent::Reciprocal(3)),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            kummer_minimal_polynomial(FieldElement::Integer(7), Exponent::Pi),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            kummer_minimal_polynomial(FieldElement::Integer(8), Exponent::Reciprocal(3)),
            Err(Error::Reducible(_))
        ));
    }

    #[test]
    fn test_witt_and_inseparable() {
        assert_eq!(witt_vector(FieldElement::Integer(-3), 4).unwrap(), vec![1.0, -3.0, 9.0, -27.0]);
        assert_eq!(purely_inseparable_polynomial(3, 4).unwrap(), Binomial::new(81, 3));
    }

    #[test]
    fn test_cross_verification() {
        assert!(cross_verify_root(7, Exponent::Reciprocal(3)).is_ok());
        assert!(cross_verify_root(11, Exponent::Pi).is_ok());
        assert!(cross_verify_root(-3, Exponent::Reciprocal(3)).is_err());
        assert!((cube_root_stability(11).unwrap().powi(3) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_suite_tallies() {
        let report = FieldExtensionSuite::default().run();
        let tallies = report.tallies();
        // 30 algebraic radicals + 4 extended rational powers
        assert_eq!(tallies[&ExtensionCategory::Kummer], Tally { successful: 34, failed: 30 });
        assert_eq!(tallies[&ExtensionCategory::ArtinSchreier], Tally { successful: 33, failed: 0 });
        assert_eq!(tallies[&ExtensionCategory::Witt], Tally { successful: 24, failed: 0 });
        assert_eq!(tallies[&ExtensionCategory::CrossVerification], Tally { successful: 10, failed: 0 });
        assert_eq!(report.total_successful() + report.total_failed(), report.tests.len());

        let (mean_ok, _) = report.success_spread();
        assert!((mean_ok - 101.0 / 4.0).abs() < 1e-12);
    }
}
