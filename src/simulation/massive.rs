//! Six independent random tables computed on the rayon pool.
//!
//! Each task draws its own seed from the caller's generator before the
//! fan-out, so a seeded run produces the same tables regardless of
//! scheduling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::comparison::DescriptiveStats;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::report::{ResultValue, Table};

const VARIETIES: [&str; 3] = ["Shimura Variety 1", "Shimura Variety 2", "Shimura Variety 3"];
const CURVES: [&str; 3] = [
    "CM Elliptic Curve",
    "Non-CM Elliptic Curve",
    "Elliptic Curve over Larger Field",
];
const CHROMATIC_LEVELS: [u32; 5] = [0, 1, 2, 3, 4];
const COHOMOLOGY_MAPPINGS: [&str; 3] = ["Ordinary Cohomology", "Complex K-Theory", "Elliptic Cohomology"];

const STABLE_PROBABILITY: f64 = 0.8;
const TORSION_PROBABILITY: f64 = 0.7;
const L_VALUE_MAX: f64 = 10.0;

/// Column holding the automorphic L-values summarised after the run
pub const L_VALUE_COLUMN: &str = "L-function Critical Value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SimulationTask {
    CohomologyRanks,
    SpectralPages,
    AutomorphicL,
    ChromaticMorava,
    NonCommutative,
    PAdicL,
}

impl SimulationTask {
    pub const ALL: [SimulationTask; 6] = [
        SimulationTask::CohomologyRanks,
        SimulationTask::SpectralPages,
        SimulationTask::AutomorphicL,
        SimulationTask::ChromaticMorava,
        SimulationTask::NonCommutative,
        SimulationTask::PAdicL,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SimulationTask::CohomologyRanks => "Motivic Cohomology (Massive)",
            SimulationTask::SpectralPages => "Spectral Sequence (Massive)",
            SimulationTask::AutomorphicL => "Automorphic L-functions (Massive)",
            SimulationTask::ChromaticMorava => "Chromatic Levels and Morava K-theory (Massive)",
            SimulationTask::NonCommutative => "Non-commutative Motive Tests (Massive)",
            SimulationTask::PAdicL => "P-adic L-functions (Massive)",
        }
    }

    pub fn run<R: Rng + ?Sized>(&self, config: &SimulationConfig, rng: &mut R) -> Result<Table> {
        match self {
            SimulationTask::CohomologyRanks => cohomology_ranks(config.dimension, rng),
            SimulationTask::SpectralPages => spectral_pages(config.depth, rng),
            SimulationTask::AutomorphicL => automorphic_l_values(config.sample_count, rng),
            SimulationTask::ChromaticMorava => chromatic_morava(config.sample_count, rng),
            SimulationTask::NonCommutative => non_commutative_motives(config.sample_count, rng),
            SimulationTask::PAdicL => p_adic_l_values(config.sample_count, rng),
        }
    }
}

fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Ranks of H⁰..=H^dim drawn from [50, 500)
pub fn cohomology_ranks<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Table> {
    let mut table = Table::new(["Cohomology Group", "Rank"]);
    for i in 0..=dimension {
        let rank: i64 = rng.random_range(50..500);
        table.push_row(vec![format!("H^{i}").into(), rank.into()])?;
    }
    Ok(table)
}

/// Pages E₂..=E_{depth+1} with values drawn from [1000, 5000)
pub fn spectral_pages<R: Rng + ?Sized>(depth: usize, rng: &mut R) -> Result<Table> {
    let mut table = Table::new(["Spectral Sequence Page", "Value"]);
    for page in 2..depth + 2 {
        let value: i64 = rng.random_range(1000..5000);
        table.push_row(vec![format!("E{page} Page").into(), value.into()])?;
    }
    Ok(table)
}

pub fn automorphic_l_values<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Table> {
    let mut table = Table::new(["Automorphic Form", "Variety", L_VALUE_COLUMN]);
    for _ in 0..count {
        let variety = *pick(&VARIETIES, rng);
        let l_value: f64 = rng.random_range(0.0..L_VALUE_MAX);
        table.push_row(vec![
            format!("Automorphic Form on {variety}").into(),
            variety.into(),
            l_value.into(),
        ])?;
    }
    Ok(table)
}

pub fn chromatic_morava<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Table> {
    let mut table = Table::new(["Chromatic Level", "K-theory Spectrum", "Motivic Cohomology Mapping"]);
    for _ in 0..count {
        let level = *pick(&CHROMATIC_LEVELS, rng);
        let mapping = *pick(&COHOMOLOGY_MAPPINGS, rng);
        table.push_row(vec![
            i64::from(level).into(),
            format!("K({level})").into(),
            mapping.into(),
        ])?;
    }
    Ok(table)
}

/// Stable with probability 0.8
pub fn non_commutative_motives<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Table> {
    let mut table = Table::new(["Non-commutative Motive", "Stability"]);
    for _ in 0..count {
        let variety = *pick(&VARIETIES, rng);
        let stability = if rng.random_bool(STABLE_PROBABILITY) { "Stable" } else { "Unstable" };
        table.push_row(vec![
            format!("Non-commutative motive for {variety}").into(),
            stability.into(),
        ])?;
    }
    Ok(table)
}

/// Iwasawa torsion with probability 0.7
pub fn p_adic_l_values<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Table> {
    let mut table = Table::new(["Elliptic Curve", "L-function Value", "Iwasawa Torsion"]);
    for _ in 0..count {
        let curve = *pick(&CURVES, rng);
        let l_value: f64 = rng.random_range(0.0..L_VALUE_MAX);
        let torsion = if rng.random_bool(TORSION_PROBABILITY) { "Torsion" } else { "Non-torsion" };
        table.push_row(vec![curve.into(), l_value.into(), torsion.into()])?;
    }
    Ok(table)
}

#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// In [`SimulationTask::ALL`] order
    pub tables: Vec<(SimulationTask, Table)>,
    /// Moments of the automorphic L-values
    pub l_value_stats: DescriptiveStats,
}

impl SimulationOutcome {
    pub fn table(&self, task: SimulationTask) -> Option<&Table> {
        self.tables.iter().find(|(t, _)| *t == task).map(|(_, table)| table)
    }

    pub fn stats_value(&self) -> ResultValue {
        let s = &self.l_value_stats;
        let map = [
            ("Mean", s.mean),
            ("Variance", s.variance),
            ("Skewness", s.skewness),
            ("Kurtosis", s.kurtosis),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), ResultValue::Number(v)))
        .collect();
        ResultValue::Map(map)
    }
}

/// Run every task on the global pool and block until all finish
pub fn run_simulation<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<SimulationOutcome> {
    let seeded: Vec<(SimulationTask, u64)> = SimulationTask::ALL.iter().map(|t| (*t, rng.random())).collect();
    info!(
        tasks = seeded.len(),
        sample_count = config.sample_count,
        threads = rayon::current_num_threads(),
        "starting massive simulation"
    );

    let tables = seeded
        .into_par_iter()
        .map(|(task, seed)| -> Result<(SimulationTask, Table)> {
            let mut task_rng = ChaCha8Rng::seed_from_u64(seed);
            let table = task.run(config, &mut task_rng)?;
            debug!(task = ?task, rows = table.len(), "task finished");
            Ok((task, table))
        })
        .collect::<Result<Vec<_>>>()?;

    let l_values = tables
        .iter()
        .find(|(t, _)| *t == SimulationTask::AutomorphicL)
        .map(|(_, table)| table.numeric_column(L_VALUE_COLUMN))
        .unwrap_or_default();
    let l_value_stats = DescriptiveStats::from_slice(&l_values);
    info!(mean = l_value_stats.mean, variance = l_value_stats.variance, "automorphic L-values summarised");

    Ok(SimulationOutcome { tables, l_value_stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            dimension: 4,
            depth: 6,
            sample_count: 2_000,
            preview_rows: 2,
            seed: Some(11),
        }
    }

    #[test]
    fn test_table_shapes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ranks = cohomology_ranks(10, &mut rng).unwrap();
        assert_eq!(ranks.len(), 11);
        assert!(ranks.numeric_column("Rank").iter().all(|r| (50.0..500.0).contains(r)));

        let pages = spectral_pages(20, &mut rng).unwrap();
        assert_eq!(pages.len(), 20);
        assert_eq!(pages.rows()[0][0], ResultValue::from("E2 Page"));
        assert_eq!(pages.rows()[19][0], ResultValue::from("E21 Page"));
    }

    #[test]
    fn test_probabilities_are_respected() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let table = non_commutative_motives(10_000, &mut rng).unwrap();
        let stable = table
            .rows()
            .iter()
            .filter(|r| r[1] == ResultValue::from("Stable"))
            .count() as f64
            / 10_000.0;
        assert!((stable - 0.8).abs() < 0.03);
    }

    #[test]
    fn test_seeded_run_is_reproducible() {
        let config = small_config();
        let a = run_simulation(&config, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let b = run_simulation(&config, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        assert_eq!(a.tables, b.tables);
        assert_eq!(a.tables.len(), 6);
        assert_eq!(a.l_value_stats.count, 2_000);
        // Uniform(0, 10): mean 5, variance 100/12
        assert!((a.l_value_stats.mean - 5.0).abs() < 0.3);
        assert!((a.l_value_stats.variance - 100.0 / 12.0).abs() < 0.8);
        assert!(a.table(SimulationTask::PAdicL).is_some());
    }
}
