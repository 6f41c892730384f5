//! Topology Module: Persistent Homology of Point Clouds
//!
//! Implements the invariant computer of the pipeline:
//! - Vietoris-Rips filtration over clipped distances
//! - Exact persistent homology (Z/2 boundary reduction), degrees ≤ 1
//! - Betti numbers and persistence ranges read off the diagrams
//!
//! ## Mathematical Background
//!
//! For a point cloud X we construct a filtration of simplicial complexes
//! VR_ε(X) indexed by the scale parameter ε ∈ [0, max_diameter]. The
//! persistent homology tracks the birth and death of topological
//! features (connected components, loops) across this filtration.

mod betti;
mod persistence;
mod vietoris_rips;

pub use betti::{persistence_ranges, BettiNumbers, PersistenceRange};
pub use persistence::{
    compute_persistence, persistence_diagrams, persistence_from_distances, PersistenceDiagram,
    PersistencePair, MAX_SUPPORTED_DEGREE,
};
pub use vietoris_rips::{clip_distances, distance_matrix, VietorisRips};
