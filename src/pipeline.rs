//! Generate → perturb → compute → compare, once per (dimension, space).
//!
//! Two sweeps share the machinery:
//!
//! - [`run_stability`]: each structure type against a noisy copy of itself
//! - [`run_controls`]: motivic spaces against algebraic control varieties
//!
//! A unit that fails is handled by the configured [`FailurePolicy`]:
//! `Sentinel` keeps the error text, reports NaN and carries on, `Abort`
//! returns the error.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::comparison::{
    compare_diagrams, diagram_metrics, mean, DegreeComparison, DiagramMetrics, PersistenceStats,
};
use crate::config::{ControlConfig, FailurePolicy, StabilityConfig};
use crate::error::Result;
use crate::report::{histogram, tuple_key, ResultValue, ResultsMap};
use crate::spaces::{perturb, PointCloud, StructureType};
use crate::topology::{
    persistence_diagrams, persistence_ranges, BettiNumbers, PersistenceDiagram, PersistenceRange,
};

/// Ok(Some) on success, Ok(None) for a tolerated failure, Err to abort
fn apply_policy<T>(policy: FailurePolicy, unit: &str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match policy {
            FailurePolicy::Abort => Err(err),
            FailurePolicy::Sentinel => {
                warn!(unit, error = %err, "computation failed, recording NaN");
                Ok(None)
            }
        },
    }
}

fn comparison_value(c: &DegreeComparison) -> ResultValue {
    let mut m = ResultsMap::new();
    m.insert("bottleneck".into(), c.bottleneck.into());
    m.insert("wasserstein".into(), c.wasserstein.into());
    m.insert("ratio_stability".into(), c.ratio_stability.into());
    m.insert("field_diff".into(), c.field_diff.into());
    m.insert("weight_ks_stat".into(), c.weight_ks.statistic.into());
    m.insert("weight_ks_pval".into(), c.weight_ks.p_value.into());
    m.into()
}

fn metrics_value(d: &DiagramMetrics) -> ResultValue {
    let mut m = ResultsMap::new();
    m.insert("weight_mean".into(), d.weight_mean.into());
    m.insert("weight_std".into(), d.weight_std.into());
    m.insert("complexity".into(), d.complexity.into());
    m.insert("field_measure".into(), d.field_measure.into());
    m.into()
}

fn per_degree<T>(map: &BTreeMap<usize, T>, f: impl Fn(&T) -> ResultValue) -> ResultValue {
    map.iter()
        .map(|(deg, v)| (format!("dim_{deg}"), f(v)))
        .collect::<ResultsMap>()
        .into()
}

/// Everything measured for one base/perturbed pair
#[derive(Debug, Clone, Serialize)]
pub struct StabilityAnalysis {
    pub betti: BettiNumbers,
    pub ranges: Vec<PersistenceRange>,
    pub statistics: Vec<PersistenceStats>,
    pub entropy: Vec<f64>,
    /// Degrees where both filtered diagrams are non-empty
    pub comparisons: BTreeMap<usize, DegreeComparison>,
    /// Finite persistence lengths of the base diagrams, per degree
    pub lengths: Vec<Vec<f64>>,
}

impl StabilityAnalysis {
    fn of(base: &[PersistenceDiagram], perturbed: &[PersistenceDiagram]) -> Result<Self> {
        Ok(Self {
            betti: BettiNumbers::from_diagrams(base),
            ranges: persistence_ranges(base),
            statistics: base.iter().map(PersistenceStats::of).collect(),
            entropy: base.iter().map(PersistenceDiagram::persistence_entropy).collect(),
            comparisons: compare_diagrams(base, perturbed)?,
            lengths: base.iter().map(PersistenceDiagram::persistences).collect(),
        })
    }

    /// Mean of bottleneck, Wasserstein and ratio stability over all degrees
    pub fn average_stability(&self) -> f64 {
        let values: Vec<f64> = self
            .comparisons
            .values()
            .flat_map(|c| [c.bottleneck, c.wasserstein, c.ratio_stability])
            .collect();
        mean(&values)
    }

    /// Mean bottleneck over the compared degrees
    pub fn mean_bottleneck(&self) -> f64 {
        let values: Vec<f64> = self.comparisons.values().map(|c| c.bottleneck).collect();
        mean(&values)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StabilityRecord {
    pub dimension: usize,
    pub structure: StructureType,
    pub analysis: Option<StabilityAnalysis>,
    pub error: Option<String>,
}

impl StabilityRecord {
    /// NaN sentinel when the unit failed
    pub fn average_stability(&self) -> f64 {
        self.analysis
            .as_ref()
            .map_or(f64::NAN, StabilityAnalysis::average_stability)
    }

    fn to_value(&self) -> ResultValue {
        let mut m = ResultsMap::new();
        m.insert("average_stability".into(), self.average_stability().into());
        if let Some(err) = &self.error {
            m.insert("error".into(), err.clone().into());
        }
        if let Some(a) = &self.analysis {
            m.insert("betti_numbers".into(), a.betti.values.clone().into());
            m.insert("euler_characteristic".into(), a.betti.euler_characteristic().into());
            m.insert("persistence_entropy".into(), a.entropy.clone().into());
            m.insert("stability_metrics".into(), per_degree(&a.comparisons, comparison_value));

            let ranges: ResultsMap = a
                .ranges
                .iter()
                .map(|r| (format!("dim_{}", r.degree), vec![r.min, r.max].into()))
                .collect();
            m.insert("persistence_ranges".into(), ranges.into());

            let stats: ResultsMap = a
                .statistics
                .iter()
                .enumerate()
                .map(|(deg, s)| {
                    let mut sm = ResultsMap::new();
                    sm.insert("mean_persistence".into(), s.mean_persistence.into());
                    sm.insert("max_persistence".into(), s.max_persistence.into());
                    sm.insert("persistence_ratio".into(), s.persistence_ratio.into());
                    sm.insert("n_points".into(), s.n_points.into());
                    sm.insert("n_infinite".into(), s.n_infinite.into());
                    (format!("dim_{deg}"), sm.into())
                })
                .collect();
            m.insert("persistence_statistics".into(), stats.into());
        }
        m.into()
    }
}

fn analyse_structure<R: Rng + ?Sized>(
    config: &StabilityConfig,
    structure: StructureType,
    dimension: usize,
    rng: &mut R,
) -> Result<StabilityAnalysis> {
    let base = structure.generate(dimension, config.n_points, rng)?;
    let perturbed = perturb(&base, config.noise_std, rng)?;
    let base_dgms = persistence_diagrams(&base, config.max_diameter, config.max_degree)?;
    let perturbed_dgms = persistence_diagrams(&perturbed, config.max_diameter, config.max_degree)?;
    StabilityAnalysis::of(&base_dgms, &perturbed_dgms)
}

/// Per-structure behaviour across the swept dimensions
#[derive(Debug, Clone, Serialize)]
pub struct TrendAnalysis {
    pub dimensions: Vec<usize>,
    /// Mean bottleneck per dimension
    pub bottleneck_trend: Vec<f64>,
    /// Δbottleneck / previous bottleneck
    pub relative_changes: Vec<f64>,
    /// β₁ / β₀ per dimension
    pub betti_growth: Vec<f64>,
    /// Mean H1 persistence per dimension
    pub persistence_trend: Vec<f64>,
    /// Successive differences of the H0 persistence ratio
    pub ratio_growth: Vec<f64>,
    /// Successive differences of the average stability
    pub stability_change: Vec<f64>,
}

fn diff(xs: &[f64]) -> Vec<f64> {
    xs.windows(2).map(|w| w[1] - w[0]).collect()
}

impl TrendAnalysis {
    fn of(records: &[&StabilityRecord]) -> Self {
        let field = |f: &dyn Fn(&StabilityAnalysis) -> f64| -> Vec<f64> {
            records
                .iter()
                .map(|r| r.analysis.as_ref().map_or(f64::NAN, f))
                .collect()
        };

        let bottleneck_trend = field(&StabilityAnalysis::mean_bottleneck);
        let relative_changes = bottleneck_trend.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
        let ratios = field(&|a: &StabilityAnalysis| a.statistics.first().map_or(f64::NAN, |s| s.persistence_ratio));
        let stability: Vec<f64> = records.iter().map(|r| r.average_stability()).collect();

        Self {
            dimensions: records.iter().map(|r| r.dimension).collect(),
            relative_changes,
            betti_growth: field(&|a: &StabilityAnalysis| a.betti.loop_ratio().unwrap_or(f64::NAN)),
            persistence_trend: field(&|a: &StabilityAnalysis| a.statistics.get(1).map_or(f64::NAN, |s| s.mean_persistence)),
            ratio_growth: diff(&ratios),
            stability_change: diff(&stability),
            bottleneck_trend,
        }
    }

    fn to_value(&self) -> ResultValue {
        let mut m = ResultsMap::new();
        m.insert("dimensions".into(), self.dimensions.clone().into());
        m.insert("bottleneck_trend".into(), self.bottleneck_trend.clone().into());
        m.insert("relative_changes".into(), self.relative_changes.clone().into());
        m.insert("betti_growth".into(), self.betti_growth.clone().into());
        m.insert("persistence_trend".into(), self.persistence_trend.clone().into());
        m.insert("ratio_growth".into(), self.ratio_growth.clone().into());
        m.insert("stability_change".into(), self.stability_change.clone().into());
        m.into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StabilitySweep {
    /// Structure-major, dimensions ascending within a structure
    pub records: Vec<StabilityRecord>,
    pub histogram_bins: usize,
}

impl StabilitySweep {
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn trends(&self) -> BTreeMap<StructureType, TrendAnalysis> {
        let mut grouped: BTreeMap<StructureType, Vec<&StabilityRecord>> = BTreeMap::new();
        for r in &self.records {
            grouped.entry(r.structure).or_default().push(r);
        }
        grouped
            .into_iter()
            .map(|(s, mut rs)| {
                rs.sort_by_key(|r| r.dimension);
                (s, TrendAnalysis::of(&rs))
            })
            .collect()
    }

    /// Results keyed `(dimension, structure)` plus a `trends` section
    pub fn to_results(&self) -> ResultsMap {
        let mut out: ResultsMap = self
            .records
            .iter()
            .map(|r| (tuple_key(r.dimension, r.structure.label()), r.to_value()))
            .collect();
        let trends: ResultsMap = self
            .trends()
            .iter()
            .map(|(s, t)| (s.label().to_owned(), t.to_value()))
            .collect();
        out.insert("trends".into(), trends.into());
        out
    }

    /// Text histograms of finite persistence lengths, one block per degree
    pub fn histograms(&self) -> String {
        let mut out = String::new();
        if self.histogram_bins == 0 {
            return out;
        }
        for r in &self.records {
            let Some(a) = &r.analysis else { continue };
            for (deg, lengths) in a.lengths.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{} dim {} H{} ({} finite lengths)",
                    r.structure.label(),
                    r.dimension,
                    deg,
                    lengths.len()
                );
                out.push_str(&histogram(lengths, self.histogram_bins));
            }
        }
        out
    }
}

/// Base-vs-perturbed stability for every (structure, dimension)
pub fn run_stability<R: Rng + ?Sized>(config: &StabilityConfig, rng: &mut R) -> Result<StabilitySweep> {
    info!(
        structures = config.structures.len(),
        dimensions = ?config.dimensions,
        n_points = config.n_points,
        "starting stability sweep"
    );
    let mut records = Vec::new();
    for &structure in &config.structures {
        for &dimension in &config.dimensions {
            let unit = tuple_key(dimension, structure.label());
            let outcome = analyse_structure(config, structure, dimension, rng);
            let error = outcome.as_ref().err().map(ToString::to_string);
            let analysis = apply_policy(config.failure_policy, &unit, outcome)?;
            if let Some(a) = &analysis {
                debug!(unit = %unit, betti = ?a.betti.values, stability = a.average_stability(), "unit done");
            }
            records.push(StabilityRecord {
                dimension,
                structure,
                analysis,
                error,
            });
        }
    }
    let sweep = StabilitySweep {
        records,
        histogram_bins: config.histogram_bins,
    };
    info!(units = sweep.records.len(), failures = sweep.failures(), "stability sweep finished");
    Ok(sweep)
}

/// One space's diagrams and single-diagram metrics, or the failure text
#[derive(Debug, Clone, Serialize)]
pub struct SpaceMetrics {
    pub metrics: Option<BTreeMap<usize, DiagramMetrics>>,
    pub error: Option<String>,
    #[serde(skip)]
    diagrams: Option<Vec<PersistenceDiagram>>,
}

impl SpaceMetrics {
    fn to_value(&self) -> ResultValue {
        match (&self.metrics, &self.error) {
            (Some(m), _) => per_degree(m, metrics_value),
            (None, err) => {
                let mut m = ResultsMap::new();
                m.insert("stability".into(), f64::NAN.into());
                m.insert("error".into(), err.clone().unwrap_or_default().into());
                m.into()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlDimension {
    pub dimension: usize,
    pub controls: BTreeMap<String, SpaceMetrics>,
    pub motivic: BTreeMap<String, SpaceMetrics>,
    /// `{motivic}_vs_{control}` → per-degree comparison; None when either
    /// side failed
    pub comparisons: BTreeMap<String, Option<BTreeMap<usize, DegreeComparison>>>,
}

impl ControlDimension {
    fn to_value(&self) -> ResultValue {
        let section = |spaces: &BTreeMap<String, SpaceMetrics>| -> ResultValue {
            spaces
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect::<ResultsMap>()
                .into()
        };
        let comparisons: ResultsMap = self
            .comparisons
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Some(c) => per_degree(c, comparison_value),
                    None => f64::NAN.into(),
                };
                (k.clone(), value)
            })
            .collect();

        let mut m = ResultsMap::new();
        m.insert("controls".into(), section(&self.controls));
        m.insert("motivic".into(), section(&self.motivic));
        m.insert("comparisons".into(), comparisons.into());
        m.into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlSweep {
    pub dimensions: Vec<ControlDimension>,
}

impl ControlSweep {
    pub fn to_results(&self) -> ResultsMap {
        self.dimensions
            .iter()
            .map(|d| (format!("dimension {}", d.dimension), d.to_value()))
            .collect()
    }
}

fn space_metrics(
    policy: FailurePolicy,
    unit: &str,
    cloud: Result<PointCloud>,
    max_diameter: f64,
    max_degree: usize,
) -> Result<SpaceMetrics> {
    let outcome = cloud.and_then(|c| persistence_diagrams(&c, max_diameter, max_degree));
    let error = outcome.as_ref().err().map(ToString::to_string);
    let diagrams = apply_policy(policy, unit, outcome)?;
    Ok(SpaceMetrics {
        metrics: diagrams.as_deref().map(diagram_metrics),
        error,
        diagrams,
    })
}

/// Motivic spaces against algebraic controls at every dimension
pub fn run_controls<R: Rng + ?Sized>(config: &ControlConfig, rng: &mut R) -> Result<ControlSweep> {
    info!(
        dimensions = ?config.dimensions,
        controls = config.controls.len(),
        motivic = config.motivic.len(),
        "starting controls comparison"
    );
    let policy = config.failure_policy;
    let mut dimensions = Vec::new();

    for &dimension in &config.dimensions {
        let mut controls = BTreeMap::new();
        for control in &config.controls {
            let unit = tuple_key(dimension, control.label());
            let cloud = control.generate(dimension, config.n_points, rng);
            let metrics = space_metrics(policy, &unit, cloud, config.max_diameter, config.max_degree)?;
            controls.insert(control.label().to_owned(), metrics);
        }

        let mut motivic = BTreeMap::new();
        for structure in &config.motivic {
            let unit = tuple_key(dimension, structure.label());
            let cloud = structure.generate_with_char(dimension, config.n_points, config.char_p, rng);
            let metrics = space_metrics(policy, &unit, cloud, config.max_diameter, config.max_degree)?;
            motivic.insert(structure.label().to_owned(), metrics);
        }

        let mut comparisons = BTreeMap::new();
        for (mot_name, mot) in &motivic {
            for (ctrl_name, ctrl) in &controls {
                let key = format!("{mot_name}_vs_{ctrl_name}");
                let value = match (&mot.diagrams, &ctrl.diagrams) {
                    (Some(a), Some(b)) => apply_policy(policy, &key, compare_diagrams(a, b))?,
                    _ => None,
                };
                comparisons.insert(key, value);
            }
        }

        debug!(dimension, comparisons = comparisons.len(), "dimension done");
        dimensions.push(ControlDimension {
            dimension,
            controls,
            motivic,
            comparisons,
        });
    }

    info!(dimensions = dimensions.len(), "controls comparison finished");
    Ok(ControlSweep { dimensions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_stability() -> StabilityConfig {
        StabilityConfig {
            dimensions: vec![2, 3],
            structures: vec![StructureType::Standard, StructureType::Sphere],
            n_points: 30,
            histogram_bins: 5,
            seed: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_stability_sweep_records_every_unit() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sweep = run_stability(&small_stability(), &mut rng).unwrap();
        assert_eq!(sweep.records.len(), 4);
        assert_eq!(sweep.failures(), 0);

        let r = &sweep.records[0];
        let a = r.analysis.as_ref().unwrap();
        assert_eq!(a.betti.values.len(), 2);
        // every point is a component; one of them never dies
        assert_eq!(a.betti.beta(0), 30);
        assert_eq!(a.statistics[0].n_infinite, 1);
        assert!(a.comparisons.contains_key(&0));
        assert!(r.average_stability().is_finite());

        let results = sweep.to_results();
        assert!(results.contains_key("(2, standard)"));
        assert!(results.contains_key("(3, sphere)"));
        let trends = results["trends"].as_map().unwrap();
        assert!(trends.contains_key("standard"));
        assert!(sweep.histograms().contains("standard dim 2 H0"));
    }

    #[test]
    fn test_trend_lengths() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let sweep = run_stability(&small_stability(), &mut rng).unwrap();
        let trends = sweep.trends();
        let t = &trends[&StructureType::Standard];
        assert_eq!(t.dimensions, vec![2, 3]);
        assert_eq!(t.bottleneck_trend.len(), 2);
        assert_eq!(t.relative_changes.len(), 1);
        assert_eq!(t.stability_change.len(), 1);
    }

    #[test]
    fn test_failure_policy() {
        let bad = || -> Result<f64> { Err(Error::EmptyPointCloud) };
        assert_eq!(apply_policy(FailurePolicy::Sentinel, "u", bad()).unwrap(), None);
        assert!(apply_policy(FailurePolicy::Abort, "u", bad()).is_err());
        assert_eq!(apply_policy(FailurePolicy::Abort, "u", Ok(1.0)).unwrap(), Some(1.0));
    }

    #[test]
    fn test_sentinel_records_nan() {
        let config = StabilityConfig {
            noise_std: -1.0,
            ..small_stability()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let sweep = run_stability(&config, &mut rng).unwrap();
        assert_eq!(sweep.failures(), 4);
        assert!(sweep.records[0].average_stability().is_nan());

        let abort = StabilityConfig {
            failure_policy: FailurePolicy::Abort,
            ..config
        };
        assert!(run_stability(&abort, &mut rng).is_err());
    }

    #[test]
    fn test_controls_comparison_keys() {
        let config = ControlConfig {
            dimensions: vec![3],
            n_points: 24,
            seed: Some(6),
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let sweep = run_controls(&config, &mut rng).unwrap();
        let d = &sweep.dimensions[0];
        assert_eq!(d.controls.len(), 3);
        assert_eq!(d.motivic.len(), 3);
        assert_eq!(d.comparisons.len(), 9);
        assert!(d.comparisons.contains_key("singular_vs_elliptic"));
        assert!(sweep.to_results().contains_key("dimension 3"));
    }
}
