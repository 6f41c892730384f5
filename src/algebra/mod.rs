//! Algebra Module: Motive-Style Matrix Records and Arithmetic Checks
//!
//! Implements the algebraic side of the pipeline:
//! - Mixed motives as immutable matrix records (tensor, dual, triangulation)
//! - Degeneration rules (logarithmic, tropical, nodal, arithmetic)
//! - Cohomology records, L-function series, codimension cycles
//! - Binomial minimal polynomials for field extensions (Capelli test)
//!
//! ## Linear Algebra
//!
//! Matrices are held as `ndarray::Array2<f64>` and handed to `nalgebra`
//! for rank (SVD) and eigenvalues (real Schur form). Rank uses the
//! tolerance σ_max·max(m, n)·ε.

pub mod catalogue;
mod cohomology;
mod cycles;
mod degeneration;
mod extensions;
mod l_function;
mod matrix;
mod motive;

pub use cohomology::{CohomologyGroup, CohomologyParameters, CohomologyType, DifferentialOperator};
pub use cycles::{pairwise_intersections, CodimensionCycle};
pub use degeneration::{
    apply_all, Degeneration, DEFAULT_ARITHMETIC_FACTOR, DEFAULT_LOG_SCALING, DEFAULT_NODAL_FACTOR,
    DEFAULT_TROPICAL_SCALING,
};
pub use extensions::{
    artin_schreier_polynomial, cross_verify_root, cube_root_stability, kummer_minimal_polynomial,
    purely_inseparable_polynomial, witt_vector, Binomial, Exponent, ExtensionCategory,
    ExtensionTest, FieldElement, FieldExtensionReport, FieldExtensionSuite, Tally,
};
pub use l_function::{
    dirichlet_series, polylog, primes_up_to, zeta, AutomorphicForm, AutomorphicLFunction,
    GaloisRepresentation, LFunctionParameters, VarietyKind, DEFAULT_TERMS, DIRICHLET_TERMS,
};
pub use matrix::{block_diag, eigenvalues, kron, nullity, pad_to, rank};
pub use motive::{
    Correspondence, ExactSequence, Motive, StabilityReport, VarietyParameters,
};
