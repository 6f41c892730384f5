//! Diagram comparison and single-diagram summaries.
//!
//! Every comparison strips essential pairs first. A degree in which either
//! filtered diagram is empty is left out of the result map entirely, so a
//! missing key means "not computable" and never "zero".

use std::collections::BTreeMap;

use serde::Serialize;

use super::bottleneck::bottleneck_distance;
use super::ks::{ks_2samp, KsResult};
use super::summary::{mean, population_variance};
use super::wasserstein::wasserstein_1d;
use crate::error::Result;
use crate::topology::PersistenceDiagram;

/// Metrics between two diagrams of the same degree
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegreeComparison {
    pub bottleneck: f64,
    /// W₁ between persistence-length samples
    pub wasserstein: f64,
    /// |mean/max(a) − mean/max(b)| over persistence lengths
    pub ratio_stability: f64,
    /// Difference of mean persistence
    pub field_diff: f64,
    /// KS test over log(1 + persistence)
    pub weight_ks: KsResult,
}

/// Metrics of a single diagram's finite pairs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagramMetrics {
    /// Mean of log(1 + persistence)
    pub weight_mean: f64,
    /// Population std of log(1 + persistence)
    pub weight_std: f64,
    /// count × mean persistence
    pub complexity: f64,
    /// Σ persistence / count
    pub field_measure: f64,
}

/// Counts and persistence summary of one diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersistenceStats {
    pub mean_persistence: f64,
    pub max_persistence: f64,
    /// mean / max, zero when there is nothing finite
    pub persistence_ratio: f64,
    /// All pairs, essential ones included
    pub n_points: usize,
    pub n_infinite: usize,
}

impl PersistenceStats {
    pub fn of(diagram: &PersistenceDiagram) -> Self {
        let lengths = diagram.persistences();
        let n_points = diagram.len();
        let n_infinite = diagram.n_infinite();
        if lengths.is_empty() {
            return Self {
                mean_persistence: 0.0,
                max_persistence: 0.0,
                persistence_ratio: 0.0,
                n_points,
                n_infinite,
            };
        }

        let mean_persistence = mean(&lengths);
        let max_persistence = max(&lengths);
        Self {
            mean_persistence,
            max_persistence,
            persistence_ratio: if max_persistence > 0.0 { mean_persistence / max_persistence } else { 0.0 },
            n_points,
            n_infinite,
        }
    }
}

/// Compare two diagram lists degree by degree
pub fn compare_diagrams(
    a: &[PersistenceDiagram],
    b: &[PersistenceDiagram],
) -> Result<BTreeMap<usize, DegreeComparison>> {
    let mut out = BTreeMap::new();
    for (dgm_a, dgm_b) in a.iter().zip(b) {
        let fa = dgm_a.finite();
        let fb = dgm_b.finite();
        if fa.is_empty() || fb.is_empty() {
            continue;
        }
        out.insert(dgm_a.degree(), compare_finite(&fa, &fb)?);
    }
    Ok(out)
}

fn compare_finite(a: &PersistenceDiagram, b: &PersistenceDiagram) -> Result<DegreeComparison> {
    let pers_a = a.persistences();
    let pers_b = b.persistences();

    let ratio_a = mean(&pers_a) / max(&pers_a);
    let ratio_b = mean(&pers_b) / max(&pers_b);

    Ok(DegreeComparison {
        bottleneck: bottleneck_distance(a.pairs(), b.pairs())?,
        wasserstein: wasserstein_1d(&pers_a, &pers_b)?,
        ratio_stability: (ratio_a - ratio_b).abs(),
        field_diff: (mean(&pers_a) - mean(&pers_b)).abs(),
        weight_ks: ks_2samp(&log_weights(&pers_a), &log_weights(&pers_b))?,
    })
}

/// Single-diagram metrics for every degree with finite pairs
pub fn diagram_metrics(diagrams: &[PersistenceDiagram]) -> BTreeMap<usize, DiagramMetrics> {
    diagrams
        .iter()
        .filter_map(|dgm| {
            let pers = dgm.persistences();
            if pers.is_empty() {
                return None;
            }
            let weights = log_weights(&pers);
            let count = pers.len() as f64;
            Some((
                dgm.degree(),
                DiagramMetrics {
                    weight_mean: mean(&weights),
                    weight_std: population_variance(&weights).sqrt(),
                    complexity: count * mean(&pers),
                    field_measure: pers.iter().sum::<f64>() / count,
                },
            ))
        })
        .collect()
}

/// log(1 + persistence)
pub fn log_weights(persistences: &[f64]) -> Vec<f64> {
    persistences.iter().map(|p| p.ln_1p()).collect()
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::PersistencePair;
    use approx::assert_abs_diff_eq;

    fn diagram(degree: usize, points: &[(f64, f64)]) -> PersistenceDiagram {
        PersistenceDiagram::new(degree, points.iter().map(|&(b, d)| PersistencePair::new(b, d)).collect())
    }

    #[test]
    fn test_only_infinite_points_are_omitted() {
        let a = vec![diagram(0, &[(0.0, f64::INFINITY)])];
        let b = vec![diagram(0, &[(0.0, f64::INFINITY)])];
        let cmp = compare_diagrams(&a, &b).unwrap();
        assert!(cmp.is_empty());
    }

    #[test]
    fn test_empty_degree_omitted_other_kept() {
        let a = vec![diagram(0, &[(0.0, 1.0), (0.0, f64::INFINITY)]), diagram(1, &[])];
        let b = vec![diagram(0, &[(0.0, 1.5)]), diagram(1, &[(0.5, 0.7)])];
        let cmp = compare_diagrams(&a, &b).unwrap();
        assert_eq!(cmp.keys().copied().collect::<Vec<_>>(), vec![0]);

        let h0 = cmp[&0];
        assert_abs_diff_eq!(h0.bottleneck, 0.5);
        assert_abs_diff_eq!(h0.wasserstein, 0.5);
        assert_abs_diff_eq!(h0.field_diff, 0.5);
        assert_abs_diff_eq!(h0.ratio_stability, 0.0);
    }

    #[test]
    fn test_self_comparison_is_zero() {
        let a = vec![diagram(0, &[(0.0, 0.3), (0.0, 0.8), (0.0, 1.1)])];
        let cmp = compare_diagrams(&a, &a).unwrap();
        let h0 = cmp[&0];
        assert_abs_diff_eq!(h0.bottleneck, 0.0);
        assert_abs_diff_eq!(h0.wasserstein, 0.0);
        assert_abs_diff_eq!(h0.weight_ks.statistic, 0.0);
    }

    #[test]
    fn test_diagram_metrics() {
        let dgms = vec![diagram(0, &[(0.0, 1.0), (0.0, 3.0), (0.0, f64::INFINITY)]), diagram(1, &[])];
        let metrics = diagram_metrics(&dgms);
        assert_eq!(metrics.len(), 1);
        let m = metrics[&0];
        assert_abs_diff_eq!(m.complexity, 4.0);
        assert_abs_diff_eq!(m.field_measure, 2.0);
        assert_abs_diff_eq!(m.weight_mean, (2.0_f64.ln() + 4.0_f64.ln()) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_persistence_stats() {
        let stats = PersistenceStats::of(&diagram(0, &[(0.0, 1.0), (0.0, 3.0), (0.0, f64::INFINITY)]));
        assert_abs_diff_eq!(stats.mean_persistence, 2.0);
        assert_abs_diff_eq!(stats.max_persistence, 3.0);
        assert_abs_diff_eq!(stats.persistence_ratio, 2.0 / 3.0);
        assert_eq!((stats.n_points, stats.n_infinite), (3, 1));

        let empty = PersistenceStats::of(&diagram(1, &[(0.0, f64::INFINITY)]));
        assert_eq!(empty.persistence_ratio, 0.0);
        assert_eq!(empty.n_infinite, 1);
    }
}
