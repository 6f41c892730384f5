//! Run configuration for the pipelines and simulations.
//!
//! Every binary starts from `Default` and never reads files, flags or
//! environment variables. Reproducible runs set `seed`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::spaces::{ControlSpace, StructureType};

/// What the aggregation layer does when one unit of work fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FailurePolicy {
    /// Record NaN for the failed metric, log a warning and keep going.
    #[default]
    Sentinel,
    /// Propagate the first error and stop the run.
    Abort,
}

/// Output rendering for the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for the base-vs-perturbed stability sweep
#[derive(Debug, Clone, Serialize)]
pub struct StabilityConfig {
    /// Ambient dimensions to sweep
    pub dimensions: Vec<usize>,
    /// Structure types to sweep
    pub structures: Vec<StructureType>,
    /// Requested points per cloud (blocks may round this down)
    pub n_points: usize,
    /// Distances above this are clipped; also the VR threshold
    pub max_diameter: f64,
    /// Highest homological degree computed
    pub max_degree: usize,
    /// Standard deviation of the perturbation noise
    pub noise_std: f64,
    /// Bins for the persistence-length histograms (0 disables them)
    pub histogram_bins: usize,
    pub failure_policy: FailurePolicy,
    pub format: ReportFormat,
    pub seed: Option<u64>,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            dimensions: vec![3, 5, 7],
            structures: StructureType::ALL.to_vec(),
            // Exact reduction enumerates every triangle, keep N moderate
            n_points: 120,
            max_diameter: 2.0,
            max_degree: 1,
            noise_std: 0.01,
            histogram_bins: 12,
            failure_policy: FailurePolicy::Sentinel,
            format: ReportFormat::Text,
            seed: None,
        }
    }
}

/// Configuration for the algebraic-controls vs motivic-spaces comparison
#[derive(Debug, Clone, Serialize)]
pub struct ControlConfig {
    pub dimensions: Vec<usize>,
    pub controls: Vec<ControlSpace>,
    pub motivic: Vec<StructureType>,
    pub n_points: usize,
    /// Characteristic used by the wild (Frobenius) space
    pub char_p: u32,
    /// VR threshold; `f64::INFINITY` keeps every distance unclipped
    pub max_diameter: f64,
    pub max_degree: usize,
    pub failure_policy: FailurePolicy,
    pub format: ReportFormat,
    pub seed: Option<u64>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            dimensions: vec![3, 5, 7, 9, 11],
            controls: ControlSpace::ALL.to_vec(),
            motivic: vec![
                StructureType::FrobeniusWild,
                StructureType::Singular,
                StructureType::MatrixAction,
            ],
            n_points: 100,
            char_p: 5,
            max_diameter: f64::INFINITY,
            max_degree: 1,
            failure_policy: FailurePolicy::Sentinel,
            format: ReportFormat::Text,
            seed: None,
        }
    }
}

/// Configuration for the parallel table simulation
#[derive(Debug, Clone, Serialize)]
pub struct SimulationConfig {
    /// Projective dimension for the cohomology-rank table (H^0..=H^dim)
    pub dimension: usize,
    /// Last spectral-sequence page is E_{depth+1}
    pub depth: usize,
    /// Rows in each of the large sampled tables
    pub sample_count: usize,
    /// Rows printed from the head and tail of each table
    pub preview_rows: usize,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dimension: 10,
            depth: 20,
            sample_count: 100_000,
            preview_rows: 5,
            seed: None,
        }
    }
}

/// Configuration for the mixed-motive stress run
#[derive(Debug, Clone, Serialize)]
pub struct MotiveStressConfig {
    /// Sides of the identity motives run through every degeneration
    pub high_dimensions: Vec<usize>,
    pub random_motives: usize,
    /// Side range [lo, hi) of the random motives
    pub random_dimension: (usize, usize),
    /// Hecke coefficients a₁..a_terms per automorphic form
    pub automorphic_terms: usize,
    /// Point at which L-functions are evaluated
    pub s_value: f64,
    pub cycles: usize,
    /// Side range [lo, hi) of the random cycle matrices
    pub cycle_size: (usize, usize),
    pub seed: Option<u64>,
}

impl Default for MotiveStressConfig {
    fn default() -> Self {
        Self {
            high_dimensions: vec![50, 100, 150, 200, 250],
            random_motives: 5,
            random_dimension: (100, 500),
            automorphic_terms: 10_000,
            s_value: 2.0,
            cycles: 5,
            cycle_size: (50, 200),
            seed: None,
        }
    }
}

/// Build the run's generator: seeded when asked, from OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
