//! Mixed Motives: Operations, L-Values and Stability
//!
//! Part one runs the fixed variety catalogue (tensor, dual,
//! triangulation, exact sequences, averaged L-values, cohomology
//! records). Part two stresses random high-dimensional motives through
//! every degeneration rule and checks eigenvalue stability.

use std::process::ExitCode;

use motivic_tda::config::{make_rng, MotiveStressConfig};
use motivic_tda::motivic::{run_mixed_motives, run_motive_stress};
use motivic_tda::report::render_text;
use motivic_tda::telemetry::init_tracing;
use motivic_tda::Result;

fn run() -> Result<()> {
    println!("══════════════════════════════════════════════════════════════");
    println!("  Variety Catalogue");
    println!("══════════════════════════════════════════════════════════════\n");
    println!("{}", render_text(&run_mixed_motives()?));

    let config = MotiveStressConfig::default();
    let mut rng = make_rng(config.seed);

    println!("══════════════════════════════════════════════════════════════");
    println!("  Stress Tests");
    println!("══════════════════════════════════════════════════════════════\n");
    println!("{}", render_text(&run_motive_stress(&config, &mut rng)?));
    Ok(())
}

fn main() -> ExitCode {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Mixed Motives, Degenerations and Automorphic L-Functions");
    println!("═══════════════════════════════════════════════════════════════\n");

    if let Err(err) = init_tracing() {
        eprintln!("warning: {err}");
    }
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
