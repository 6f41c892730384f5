//! Mixed-motive runs over the fixed variety catalogue and over random
//! high-dimensional inputs.
//!
//! [`run_mixed_motives`] is deterministic: tensor, dual and triangulation
//! of the catalogue motives, exactness of recorded sequences, averaged
//! L-values and cohomology records. [`run_motive_stress`] draws random
//! motives, Hecke coefficients, cohomology parameters and cycles and
//! checks eigenvalue stability after every degeneration rule.

use std::collections::BTreeMap;

use nalgebra::Complex;
use ndarray::Array2;
use rand::Rng;
use tracing::{debug, info};

use crate::algebra::catalogue::{cohomology_catalogue, variety_degenerations, variety_l_functions, variety_motives};
use crate::algebra::{
    pairwise_intersections, AutomorphicForm, CodimensionCycle, CohomologyGroup, CohomologyParameters,
    Degeneration, GaloisRepresentation, Motive, StabilityReport, DEFAULT_ARITHMETIC_FACTOR,
    DEFAULT_LOG_SCALING, DEFAULT_NODAL_FACTOR, DEFAULT_TROPICAL_SCALING,
};
use crate::config::MotiveStressConfig;
use crate::error::Result;
use crate::report::{tuple_key, ResultValue, ResultsMap};

/// Evaluations averaged per L-function
pub const L_EVALUATIONS: usize = 10;

fn matrix_value(m: &Array2<f64>) -> ResultValue {
    ResultValue::List(m.rows().into_iter().map(|row| row.to_vec().into()).collect())
}

fn complex_text(z: Complex<f64>) -> String {
    format!("{:.6}{:+.6}i", z.re, z.im)
}

/// Tensor products, duals, triangulations, exact sequences, L-values and
/// cohomology records of the variety catalogue
pub fn run_mixed_motives() -> Result<ResultsMap> {
    let mut motives = variety_motives()?;
    info!(motives = motives.len(), "running mixed motives");

    let mut operations = ResultsMap::new();
    let products = [
        ("Tensor Product 1", motives[0].tensor(&motives[1])),
        ("Tensor Product 2", motives[2].tensor(&motives[3])),
        ("Dual Motive 1", motives[1].dual()),
        ("Dual Motive 2", motives[3].dual()),
        ("Triangulated Motive 1", motives[1].triangulate(&motives[2])),
        ("Triangulated Motive 2", motives[3].triangulate(&motives[0])),
    ];
    for (label, motive) in &products {
        operations.insert((*label).to_owned(), motive.to_string().into());
    }

    motives[1] = motives[1]
        .clone()
        .with_exact_sequence(&motives[0], &motives[2], &motives[3]);
    motives[3] = motives[3]
        .clone()
        .with_exact_sequence(&motives[2], &motives[1], &motives[3]);

    let mut exactness = ResultsMap::new();
    let mut degenerated = ResultsMap::new();
    for motive in &motives {
        let rules = variety_degenerations(motive.name());
        let applied = rules
            .into_iter()
            .fold(motive.clone(), Motive::with_degeneration)
            .degenerate();
        degenerated.insert(motive.name().to_owned(), applied.matrix().diag().sum().into());

        let checks = motive.check_exact_sequences()?;
        let statuses = checks
            .into_iter()
            .map(|exact| ResultValue::from(if exact { "Exact" } else { "Not Exact" }))
            .collect();
        exactness.insert(motive.name().to_owned(), ResultValue::List(statuses));
    }
    operations.insert("Exact Sequence Verifications".into(), exactness.into());
    operations.insert("Degenerated Matrix Traces".into(), degenerated.into());

    let mut l_results = ResultsMap::new();
    for mut l_function in variety_l_functions() {
        for _ in 0..L_EVALUATIONS {
            let value = l_function.realistic_value()?;
            l_function.record(value);
        }
        debug!(variety = %l_function.variety, average = l_function.average_l_value(), "L-function averaged");
        let mut entry = ResultsMap::new();
        entry.insert("Average L-function Value".into(), l_function.average_l_value().into());
        entry.insert(
            "Average Motivic Contribution".into(),
            l_function.average_motivic_contribution().into(),
        );
        l_results.insert(l_function.variety.clone(), entry.into());
    }

    let mut cohomology_results = ResultsMap::new();
    for cohomology in cohomology_catalogue() {
        let mut entry = ResultsMap::new();
        entry.insert("Cohomology Value".into(), cohomology.value().into());
        entry.insert("Perturbed Matrix".into(), matrix_value(&cohomology.perturbed_matrix()));
        entry.insert(
            "Differential Operator Result".into(),
            cohomology.differential_operator().to_string().into(),
        );
        cohomology_results.insert(tuple_key(&cohomology.variety, &cohomology.kind), entry.into());
    }

    let mut results = ResultsMap::new();
    results.insert("Mixed Motives Results".into(), operations.into());
    results.insert("Automorphic L-function Results".into(), l_results.into());
    results.insert("Cohomological Unification Results".into(), cohomology_results.into());
    Ok(results)
}

fn all_rules() -> Vec<Degeneration> {
    vec![
        Degeneration::logarithmic(DEFAULT_LOG_SCALING),
        Degeneration::tropical(vec![(0, 1), (1, 0)], DEFAULT_TROPICAL_SCALING),
        Degeneration::nodal(DEFAULT_NODAL_FACTOR),
        Degeneration::arithmetic(DEFAULT_ARITHMETIC_FACTOR),
    ]
}

fn with_rules(motive: Motive, rules: &[Degeneration]) -> Motive {
    rules.iter().cloned().fold(motive, Motive::with_degeneration)
}

fn stress_motives<R: Rng + ?Sized>(config: &MotiveStressConfig, rng: &mut R) -> Result<Vec<Motive>> {
    let rules = all_rules();
    let elliptic = Motive::new("Elliptic Curve", 2, Array2::eye(2))?;
    let shimura = Motive::new("Shimura Variety (High-Dim)", 10, Array2::eye(10))?;
    let k3 = Motive::new("K3 Surface (High-Dim)", 22, Array2::eye(22))?;
    let siegel = Motive::new("Siegel Modular Variety (High-Dim)", 12, Array2::eye(12))?;
    let hilbert = Motive::new("Hilbert Modular Surface (High-Dim)", 15, Array2::eye(15))?;
    let derived = [elliptic.tensor(&shimura), shimura.dual(), shimura.triangulate(&k3)];

    let mut motives: Vec<Motive> = [elliptic, shimura, k3, siegel, hilbert]
        .into_iter()
        .chain(derived)
        .map(|m| with_rules(m, &rules))
        .collect();

    motives.push(Motive::new("Kummer Extension", 3, Array2::eye(3))?.with_degeneration(Degeneration::nodal(2.0 / 5.0)));
    motives.push(
        Motive::new("Artin-Schreier Extension", 2, Array2::eye(2))?
            .with_degeneration(Degeneration::logarithmic(1.0 / 100.0)),
    );
    motives.push(
        Motive::new("Witt Vector Field", 4, Array2::eye(4))?
            .with_degeneration(Degeneration::arithmetic(1.0 / 300.0)),
    );

    for &dim in &config.high_dimensions {
        let motive = Motive::new(format!("High-Dim Variety {dim}D"), dim, Array2::eye(dim))?;
        motives.push(with_rules(motive, &rules));
    }

    let (lo, hi) = config.random_dimension;
    for i in 0..config.random_motives {
        let dim = rng.random_range(lo..hi);
        let matrix = Array2::from_shape_fn((dim, dim), |_| rng.random::<f64>());
        let motive = Motive::new(format!("Random Complex Motive {}", i + 1), dim, matrix)?;
        motives.push(with_rules(motive, &rules));
    }
    Ok(motives)
}

fn stability_value(report: &StabilityReport) -> ResultValue {
    let mut m = ResultsMap::new();
    m.insert("Stable".into(), report.stable.into());
    m.insert("Sum of Eigenvalues".into(), complex_text(report.eigenvalue_sum()).into());
    m.into()
}

/// χ(p) = (−1)^{(p−1)/2} for odd p, χ(2) = 0
fn quadratic_character_mod4(limit: usize) -> BTreeMap<u64, f64> {
    crate::algebra::primes_up_to(limit as u64 + 1)
        .into_iter()
        .map(|p| {
            let chi = match p % 4 {
                1 => 1.0,
                3 => -1.0,
                _ => 0.0,
            };
            (p, chi)
        })
        .collect()
}

/// Stability, automorphic and Artin L-values, cohomology groups and cycle
/// intersections over random inputs
pub fn run_motive_stress<R: Rng + ?Sized>(config: &MotiveStressConfig, rng: &mut R) -> Result<ResultsMap> {
    let motives = stress_motives(config, rng)?;
    info!(motives = motives.len(), "running stability tests");
    let mut stability = ResultsMap::new();
    for motive in &motives {
        let report = motive.stability()?;
        debug!(motive = motive.name(), stable = report.stable, "stability checked");
        stability.insert(report.name.clone(), stability_value(&report));
    }

    let forms: Vec<AutomorphicForm> = [
        ("Elliptic Curve", 2, 11),
        ("Shimura Variety", 4, 23),
        ("K3 Surface", 6, 37),
        ("Siegel Modular Variety", 8, 53),
        ("Hilbert Modular Surface", 10, 71),
    ]
    .into_iter()
    .map(|(name, weight, level)| {
        let coefficients = (1..=config.automorphic_terms)
            .map(|n| (n, f64::from(rng.random_range(1u8..10))))
            .collect();
        AutomorphicForm::new(name, weight, level, coefficients)
    })
    .collect();
    let representations = [
        GaloisRepresentation::new("Trivial Representation", 1, BTreeMap::new()),
        GaloisRepresentation::new(
            "Quadratic Character mod 4",
            1,
            quadratic_character_mod4(config.automorphic_terms),
        ),
    ];

    let mut l_values = ResultsMap::new();
    for form in &forms {
        l_values.insert(form.name.clone(), form.l_value(config.s_value, config.automorphic_terms).into());
    }
    for rep in &representations {
        l_values.insert(rep.name.clone(), rep.artin_l_value(config.s_value, config.automorphic_terms).into());
    }

    let mut euler = ResultsMap::new();
    let mut cohomology = ResultsMap::new();
    for (i, (degree, dimension)) in [(1, 20), (2, 40), (3, 60), (4, 80), (5, 100)].into_iter().enumerate() {
        let parameters = CohomologyParameters {
            scaling_factor: rng.random_range(1.0..2.0),
            diagonal_perturb: rng.random_range(0.1..0.5),
            off_diagonal_perturb: rng.random_range(0.05..0.2),
            diff_coeff_x: rng.random_range(0.8..1.2),
            diff_coeff_y: rng.random_range(0.8..1.2),
            degenerations: Vec::new(),
        };
        let group = CohomologyGroup::new(format!("Cohomology Group {}", i + 1), degree, dimension, vec![1.0; dimension])
            .with_parameters(parameters);
        euler.insert(group.name.clone(), group.euler_characteristic().into());

        let mut entry = ResultsMap::new();
        entry.insert("Cohomology Value".into(), group.value().into());
        entry.insert(
            "Perturbed Matrix".into(),
            format!("[Matrix of dimension {}]", group.perturbed_matrix().nrows()).into(),
        );
        entry.insert(
            "Differential Operator Result".into(),
            group.differential_operator().to_string().into(),
        );
        cohomology.insert(group.name.clone(), entry.into());
    }

    let (lo, hi) = config.cycle_size;
    let cycles: Vec<CodimensionCycle> = (0..config.cycles)
        .map(|i| {
            let size = rng.random_range(lo..hi);
            let codimension = rng.random_range(1..5);
            let matrix = Array2::from_shape_fn((size, size), |_| rng.random::<f64>());
            CodimensionCycle::new(format!("Cycle {}", i + 1), codimension, matrix)
        })
        .collect();
    let intersections: ResultsMap = pairwise_intersections(&cycles)
        .into_iter()
        .map(|(key, cycle)| (key, cycle.codimension.into()))
        .collect();

    let mut results = ResultsMap::new();
    results.insert("Stability Results".into(), stability.into());
    results.insert("L-function Results".into(), l_values.into());
    results.insert("Exact Sequence Euler Characteristics".into(), euler.into());
    results.insert("Cohomology Results".into(), cohomology.into());
    results.insert("Codimension Cycle Intersections".into(), intersections.into());
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_mixed_motives_sections() {
        let results = run_mixed_motives().unwrap();
        let ops = results["Mixed Motives Results"].as_map().unwrap();
        assert_eq!(
            ops["Tensor Product 1"],
            ResultValue::from("MixedMotive(Tensor(Elliptic Curve, Shimura Variety (High-Dim)), dim=10)")
        );
        assert_eq!(
            ops["Dual Motive 1"],
            ResultValue::from("MixedMotive(Dual(Shimura Variety (High-Dim)), dim=10)")
        );
        assert_eq!(
            ops["Triangulated Motive 1"],
            ResultValue::from(
                "MixedMotive(Triangulate(Shimura Variety (High-Dim), K3 Surface (High-Dim)), dim=15)"
            )
        );
        let exactness = ops["Exact Sequence Verifications"].as_map().unwrap();
        assert_eq!(
            exactness["Shimura Variety (High-Dim)"],
            ResultValue::List(vec!["Not Exact".into()])
        );
        assert_eq!(exactness["Elliptic Curve"], ResultValue::List(vec![]));

        let l = results["Automorphic L-function Results"].as_map().unwrap();
        let ec = l["Elliptic Curve"].as_map().unwrap();
        let avg = ec["Average L-function Value"].as_number().unwrap();
        let motivic = ec["Average Motivic Contribution"].as_number().unwrap();
        assert!((motivic - 0.9 * avg).abs() < 1e-12);

        let cohomology = results["Cohomological Unification Results"].as_map().unwrap();
        assert!(cohomology.contains_key("(Elliptic Curve, étale)"));
        assert_eq!(cohomology.len(), 5);
    }

    #[test]
    fn test_stress_run_small() {
        let config = MotiveStressConfig {
            high_dimensions: vec![6],
            random_motives: 1,
            random_dimension: (5, 8),
            automorphic_terms: 200,
            cycles: 3,
            cycle_size: (4, 6),
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let results = run_motive_stress(&config, &mut rng).unwrap();

        let stability = results["Stability Results"].as_map().unwrap();
        // 8 catalogue motives, 3 extension motives, 1 high-dim, 1 random
        assert_eq!(stability.len(), 13);
        let kummer = stability["Kummer Extension"].as_map().unwrap();
        assert_eq!(kummer["Stable"], ResultValue::Bool(true));
        assert_eq!(kummer["Sum of Eigenvalues"], ResultValue::from("3.000000+0.000000i"));

        let euler = results["Exact Sequence Euler Characteristics"].as_map().unwrap();
        assert_eq!(euler["Cohomology Group 2"], ResultValue::Integer(40));
        assert_eq!(results["Codimension Cycle Intersections"].as_map().unwrap().len(), 3);

        let l_values = results["L-function Results"].as_map().unwrap();
        // Euler product over primes ≤ 201 approaches ζ(2)
        let trivial = l_values["Trivial Representation"].as_number().unwrap();
        assert!((trivial - std::f64::consts::PI.powi(2) / 6.0).abs() < 0.01);
    }

    #[test]
    fn test_quadratic_character() {
        let chi = quadratic_character_mod4(12);
        assert_eq!(chi[&2], 0.0);
        assert_eq!(chi[&5], 1.0);
        assert_eq!(chi[&7], -1.0);
    }
}
