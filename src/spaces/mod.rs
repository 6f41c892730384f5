//! Spaces Module: Synthetic Point Clouds for Stability Analysis
//!
//! Implements the generators feeding the persistence pipeline:
//!
//! - **Degeneration spaces**: closed-form transforms of Gaussian blocks,
//!   indexed by the closed [`StructureType`] enumeration
//! - **Algebraic controls**: samples of explicit varieties ([`ControlSpace`])
//! - **Perturbation**: small i.i.d. Gaussian noise of identical shape
//!
//! Every generator takes the random source as an argument, so a seeded
//! generator reproduces a run exactly.

mod cloud;
mod controls;
mod perturb;
mod structure;

pub use cloud::PointCloud;
pub use controls::ControlSpace;
pub use perturb::{perturb, DEFAULT_NOISE_STD};
pub use structure::{StructureType, DEFAULT_CHAR_P};
