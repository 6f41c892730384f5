//! # motivic-tda
//!
//! Synthetic Degeneration Spaces, Persistent Homology and Motive-Style
//! Matrix Transforms with Stability Statistics
//!
//! ## Pipeline
//!
//! Every program in this crate follows one pattern:
//!
//!   generate → perturb → compute invariants → compare → report
//!
//! 1. **Spaces**: point clouds built from closed-form transforms of
//!    Gaussian blocks (Kummer, Artin–Schreier, wild ramification, ...) and
//!    samples of explicit control varieties
//!
//! 2. **Topology**: exact Z/2 persistent homology of the Vietoris–Rips
//!    filtration in degrees 0 and 1, Betti numbers, persistence entropy
//!
//! 3. **Comparison**: bottleneck and Wasserstein distances, KS tests on
//!    log-persistence weights, descriptive moments
//!
//! 4. **Algebra**: mixed motives as immutable matrix records, degeneration
//!    rules, cohomology and L-function records, binomial minimal
//!    polynomials of radical extensions
//!
//! 5. **Simulation**: independent random tables fanned out on rayon
//!
//! ## Randomness
//!
//! Nothing is seeded implicitly. Every generator takes an `Rng` handle and
//! configs carry an optional seed resolved by [`config::make_rng`].
//!
//! ## References
//!
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Cohen-Steiner, Edelsbrunner & Harer, "Stability of Persistence
//!   Diagrams" (2007)
//! - Capelli, irreducibility of xⁿ − a (1898)

pub mod algebra;
pub mod comparison;
pub mod config;
pub mod error;
pub mod motivic;
pub mod pipeline;
pub mod report;
pub mod simulation;
pub mod spaces;
pub mod telemetry;
pub mod topology;

pub use error::{Error, Result};

pub use config::{
    make_rng, ControlConfig, FailurePolicy, MotiveStressConfig, ReportFormat, SimulationConfig,
    StabilityConfig,
};

pub use spaces::{perturb, ControlSpace, PointCloud, StructureType};

pub use topology::{
    compute_persistence, persistence_diagrams, BettiNumbers, PersistenceDiagram, PersistencePair,
    VietorisRips,
};

pub use comparison::{
    bottleneck_distance, compare_diagrams, ks_2samp, wasserstein_1d, DegreeComparison,
    DescriptiveStats,
};

pub use algebra::{Degeneration, FieldExtensionSuite, Motive};

pub use motivic::{run_mixed_motives, run_motive_stress};

pub use pipeline::{run_controls, run_stability, ControlSweep, StabilitySweep};

pub use report::{render, ResultValue, ResultsMap, Table};

pub use simulation::{run_simulation, SimulationOutcome, SimulationTask};
