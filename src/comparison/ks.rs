//! Two-sample Kolmogorov–Smirnov test.
//!
//! D = sup_x |F₁(x) − F₂(x)|, with the p-value from the asymptotic
//! Kolmogorov distribution
//!
//!   Q(λ) = 2 Σ_{j≥1} (−1)^{j−1} e^{−2j²λ²},  λ = (√nₑ + 0.12 + 0.11/√nₑ)·D
//!
//! where nₑ = n₁n₂/(n₁ + n₂) is the effective sample size.

use serde::Serialize;

use super::wasserstein::{count_le, sorted};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KsResult {
    pub statistic: f64,
    pub p_value: f64,
}

pub fn ks_2samp(a: &[f64], b: &[f64]) -> Result<KsResult> {
    if a.is_empty() || b.is_empty() {
        return Err(Error::invalid("samples", "KS test needs two non-empty samples"));
    }
    if a.iter().chain(b).any(|x| x.is_nan()) {
        return Err(Error::non_finite("KS sample"));
    }

    let a_sorted = sorted(a);
    let b_sorted = sorted(b);
    let na = a.len() as f64;
    let nb = b.len() as f64;

    let statistic = a_sorted
        .iter()
        .chain(&b_sorted)
        .map(|&x| {
            let fa = count_le(&a_sorted, x) as f64 / na;
            let fb = count_le(&b_sorted, x) as f64 / nb;
            (fa - fb).abs()
        })
        .fold(0.0, f64::max);

    let en = (na * nb / (na + nb)).sqrt();
    let lambda = (en + 0.12 + 0.11 / en) * statistic;

    Ok(KsResult {
        statistic,
        p_value: kolmogorov_q(lambda),
    })
}

/// Survival function of the Kolmogorov distribution
fn kolmogorov_q(lambda: f64) -> f64 {
    const EPS1: f64 = 1e-3;
    const EPS2: f64 = 1e-8;

    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut term_prev = 0.0_f64;

    for j in 1..=100 {
        let jf = j as f64;
        let term = fac * (a2 * jf * jf).exp();
        sum += term;
        if term.abs() <= EPS1 * term_prev || term.abs() <= EPS2 * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        term_prev = term.abs();
    }
    // No convergence: λ is near zero and the samples are indistinguishable
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identical_samples() {
        let x = [0.1, 0.4, 0.2, 0.9];
        let r = ks_2samp(&x, &x).unwrap();
        assert_abs_diff_eq!(r.statistic, 0.0);
        assert_abs_diff_eq!(r.p_value, 1.0);
    }

    #[test]
    fn test_disjoint_samples() {
        let a: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let b: Vec<f64> = (100..150).map(|i| i as f64).collect();
        let r = ks_2samp(&a, &b).unwrap();
        assert_abs_diff_eq!(r.statistic, 1.0);
        assert!(r.p_value < 1e-10);
    }

    #[test]
    fn test_statistic_with_ties() {
        let r = ks_2samp(&[1.0, 2.0, 2.0, 3.0], &[2.0, 3.0]).unwrap();
        // At x = 2: F₁ = 3/4, F₂ = 1/2
        assert_abs_diff_eq!(r.statistic, 0.25);
        assert!(r.p_value > 0.5 && r.p_value <= 1.0);
    }

    #[test]
    fn test_q_is_monotone() {
        assert!(kolmogorov_q(0.5) > kolmogorov_q(1.0));
        assert!(kolmogorov_q(1.0) > kolmogorov_q(2.0));
        assert_abs_diff_eq!(kolmogorov_q(1.0), 0.26999967, epsilon = 1e-6);
    }
}
