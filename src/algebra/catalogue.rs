//! Fixed variety data for the mixed-motive run: motives with their
//! parameters and degeneration rules, L-function parameters and cohomology
//! theories.

use ndarray::Array2;

use super::cohomology::{CohomologyParameters, CohomologyType};
use super::degeneration::Degeneration;
use super::l_function::{AutomorphicLFunction, LFunctionParameters, VarietyKind};
use super::motive::{Motive, VarietyParameters};
use crate::error::Result;

pub const ELLIPTIC_CURVE: &str = "Elliptic Curve";
pub const SHIMURA_VARIETY: &str = "Shimura Variety (High-Dim)";
pub const K3_SURFACE: &str = "K3 Surface (High-Dim)";
pub const SIEGEL_VARIETY: &str = "Siegel Modular Variety (High-Dim)";
pub const HILBERT_SURFACE: &str = "Hilbert Modular Surface (High-Dim)";

pub const VARIETIES: [&str; 5] = [ELLIPTIC_CURVE, SHIMURA_VARIETY, K3_SURFACE, SIEGEL_VARIETY, HILBERT_SURFACE];

/// rows×cols with `diagonal` on the main diagonal and `off` elsewhere
fn banded(rows: usize, cols: usize, diagonal: f64, off: f64) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(i, j)| if i == j { diagonal } else { off })
}

fn params(tensor: f64, interaction: f64, duality: f64, triangulation: f64, exact: f64) -> VarietyParameters {
    VarietyParameters {
        tensor_scaling: tensor,
        interaction_factor: interaction,
        duality_factor: duality,
        triangulation_weight: triangulation,
        exact_sequence_factor: exact,
    }
}

/// The five variety motives, in [`VARIETIES`] order. Dimensions are labels:
/// the K3 and Hilbert data are single rows and a 2×13 block.
pub fn variety_motives() -> Result<Vec<Motive>> {
    Ok(vec![
        Motive::new(ELLIPTIC_CURVE, 1, Array2::from_elem((1, 1), 31.0))?
            .with_parameters(params(1.0, 1.0, 1.0, 1.0, 1.05)),
        Motive::new(SHIMURA_VARIETY, 10, banded(2, 2, 31.0, 0.1))?
            .with_parameters(params(1.2, 1.1, 0.9, 1.1, 1.05)),
        Motive::new(K3_SURFACE, 5, banded(1, 10, 69.293578, 1.0 / 15.0))?
            .with_parameters(params(1.1, 1.2, 1.0, 1.0, 1.0)),
        Motive::new(SIEGEL_VARIETY, 8, Array2::eye(8))?
            .with_parameters(params(1.3, 1.0, 1.1, 1.2, 1.0)),
        Motive::new(HILBERT_SURFACE, 5, banded(2, 13, 17.0 / 5.0, 1.0 / 20.0))?
            .with_parameters(params(1.15, 1.05, 1.0, 1.05, 1.02)),
    ])
}

/// Degeneration rules attached to a variety motive; empty for unknown names
pub fn variety_degenerations(variety: &str) -> Vec<Degeneration> {
    match variety {
        ELLIPTIC_CURVE => vec![
            Degeneration::logarithmic(1.0 / 100.0),
            Degeneration::tropical(vec![(0, 1), (1, 0)], 1.0 / 200.0),
        ],
        SHIMURA_VARIETY => vec![Degeneration::nodal(1.0 / 5.0), Degeneration::arithmetic(1.0 / 300.0)],
        K3_SURFACE => vec![
            Degeneration::logarithmic(1.0 / 150.0),
            Degeneration::tropical(vec![(0, 2), (2, 0)], 1.0 / 250.0),
        ],
        SIEGEL_VARIETY => vec![Degeneration::nodal(1.0 / 10.0), Degeneration::arithmetic(1.0 / 400.0)],
        HILBERT_SURFACE => vec![
            Degeneration::logarithmic(1.0 / 500.0),
            Degeneration::tropical(vec![(0, 3), (3, 0)], 1.0 / 350.0),
            Degeneration::nodal(2.0 / 5.0),
        ],
        _ => Vec::new(),
    }
}

fn l_params(kind: VarietyKind, l_scaling: f64, l_variety_term: f64, local_factor_coeff: f64) -> LFunctionParameters {
    LFunctionParameters {
        kind,
        l_scaling,
        l_variety_term,
        local_factor_coeff,
    }
}

pub fn variety_l_functions() -> Vec<AutomorphicLFunction> {
    vec![
        AutomorphicLFunction::new(ELLIPTIC_CURVE, l_params(VarietyKind::EllipticCurve, 1.0, 0.5, 0.02)),
        AutomorphicLFunction::new(SHIMURA_VARIETY, l_params(VarietyKind::ShimuraVariety, 1.2, 0.6, 0.15)),
        AutomorphicLFunction::new(K3_SURFACE, l_params(VarietyKind::K3Surface, 1.1, 0.55, 0.25)),
        AutomorphicLFunction::new(SIEGEL_VARIETY, l_params(VarietyKind::SiegelModularVariety, 1.3, 0.65, 0.18)),
        AutomorphicLFunction::new(HILBERT_SURFACE, l_params(VarietyKind::HilbertModularSurface, 1.25, 0.6, 0.2)),
    ]
}

fn cohomology(
    variety: &str,
    kind: &str,
    rank: usize,
    dimension: usize,
    scale: (f64, f64, f64),
    diff: (f64, f64),
) -> CohomologyType {
    let (scaling_factor, diagonal_perturb, off_diagonal_perturb) = scale;
    CohomologyType::new(variety, kind, rank, dimension).with_parameters(CohomologyParameters {
        scaling_factor,
        diagonal_perturb,
        off_diagonal_perturb,
        diff_coeff_x: diff.0,
        diff_coeff_y: diff.1,
        degenerations: variety_degenerations(variety),
    })
}

pub fn cohomology_catalogue() -> Vec<CohomologyType> {
    vec![
        cohomology(ELLIPTIC_CURVE, "étale", 10, 2, (2.0, 3.1, 0.1), (1.0, 1.0)),
        cohomology(SHIMURA_VARIETY, "de Rham", 20, 6, (3.0, 3.1, 0.1), (0.8, 1.2)),
        cohomology(K3_SURFACE, "crystalline", 30, 10, (4.0, 2.4, 1.0 / 15.0), (0.9, 1.1)),
        cohomology(SIEGEL_VARIETY, "motivic", 40, 12, (5.0, 3.3, 1.0 / 12.0), (0.95, 1.05)),
        cohomology(HILBERT_SURFACE, "étale", 50, 15, (6.0, 3.4, 1.0 / 20.0), (1.1, 0.9)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_consistent() {
        let motives = variety_motives().unwrap();
        let names: Vec<&str> = motives.iter().map(Motive::name).collect();
        assert_eq!(names, VARIETIES);
        assert_eq!(motives[1].dimension(), 10);
        assert_eq!(motives[1].matrix().dim(), (2, 2));
        assert_eq!(motives[2].dimension(), 5);
        assert_eq!(motives[2].matrix().dim(), (1, 10));
        assert_eq!(motives[4].matrix().dim(), (2, 13));
        assert_eq!(motives[4].matrix()[[1, 1]], 3.4);
        assert_eq!(motives[4].matrix()[[1, 12]], 0.05);
        assert_eq!(variety_l_functions().len(), 5);
        assert!(cohomology_catalogue().iter().all(|c| !c.parameters.degenerations.is_empty()));
        assert!(variety_degenerations("Fermat Quartic").is_empty());
    }
}
