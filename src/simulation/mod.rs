//! Simulation Module: Parallel Random Tables
//!
//! The only concurrent part of the crate. A fixed set of independent
//! tasks (cohomology ranks, spectral pages, automorphic and p-adic
//! L-values, chromatic levels, non-commutative motive stability) runs on
//! the rayon pool; the caller blocks until every table is ready.

mod massive;

pub use massive::{
    automorphic_l_values, chromatic_morava, cohomology_ranks, non_commutative_motives,
    p_adic_l_values, run_simulation, spectral_pages, SimulationOutcome, SimulationTask,
    L_VALUE_COLUMN,
};
