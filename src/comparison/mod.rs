//! Comparison Module: Distances and Statistics over Diagrams
//!
//! ## Mathematical Background
//!
//! Persistence diagrams are compared by optimal matchings:
//!
//! - **Bottleneck**: d_B = inf_γ sup ‖x − γ(x)‖_∞, points may match the
//!   diagonal Δ = {(t, t)}
//! - **Wasserstein (1-D)**: W₁ = ∫ |F_a − F_b| between persistence lengths
//!
//! and by distributional tests on the lengths ℓ = death − birth:
//!
//! - **Kolmogorov–Smirnov**: D = sup |F_a − F_b| over log(1 + ℓ)
//! - **Ratio stability**: |ℓ̄_a / max ℓ_a − ℓ̄_b / max ℓ_b|

mod bottleneck;
mod ks;
mod metrics;
mod summary;
mod wasserstein;

pub use bottleneck::bottleneck_distance;
pub use ks::{ks_2samp, KsResult};
pub use metrics::{
    compare_diagrams, diagram_metrics, log_weights, DegreeComparison, DiagramMetrics,
    PersistenceStats,
};
pub use summary::{mean, population_variance, DescriptiveStats};
pub use wasserstein::wasserstein_1d;
