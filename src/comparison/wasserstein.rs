//! First Wasserstein distance between two 1-D empirical distributions.
//!
//! W₁(u, v) = ∫ |F_u(x) − F_v(x)| dx, evaluated exactly on the merged
//! sorted support where both CDFs are step functions.

use crate::error::{Error, Result};

pub fn wasserstein_1d(u: &[f64], v: &[f64]) -> Result<f64> {
    if u.is_empty() || v.is_empty() {
        return Err(Error::invalid("samples", "Wasserstein distance needs two non-empty samples"));
    }
    if u.iter().chain(v).any(|x| !x.is_finite()) {
        return Err(Error::non_finite("wasserstein sample"));
    }

    let u_sorted = sorted(u);
    let v_sorted = sorted(v);
    let mut all: Vec<f64> = u.iter().chain(v).copied().collect();
    all.sort_by(f64::total_cmp);

    let nu = u.len() as f64;
    let nv = v.len() as f64;
    let mut distance = 0.0;
    for w in all.windows(2) {
        let delta = w[1] - w[0];
        if delta == 0.0 {
            continue;
        }
        let u_cdf = count_le(&u_sorted, w[0]) as f64 / nu;
        let v_cdf = count_le(&v_sorted, w[0]) as f64 / nv;
        distance += (u_cdf - v_cdf).abs() * delta;
    }
    Ok(distance)
}

pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Number of entries ≤ x in a sorted slice (right-sided search)
pub(crate) fn count_le(sorted: &[f64], x: f64) -> usize {
    sorted.partition_point(|&v| v <= x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_shifted_samples() {
        let d = wasserstein_1d(&[0.0, 1.0, 3.0], &[5.0, 6.0, 8.0]).unwrap();
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unequal_sizes() {
        // scipy.stats.wasserstein_distance([0, 1], [0]) == 0.5
        let d = wasserstein_1d(&[0.0, 1.0], &[0.0]).unwrap();
        assert_abs_diff_eq!(d, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_identical_is_zero() {
        let d = wasserstein_1d(&[0.2, 0.4, 0.4], &[0.4, 0.2, 0.4]).unwrap();
        assert_abs_diff_eq!(d, 0.0);
    }

    #[test]
    fn test_empty_is_error() {
        assert!(wasserstein_1d(&[], &[1.0]).is_err());
    }
}
