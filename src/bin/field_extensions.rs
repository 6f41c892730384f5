//! Field Extensions: Minimal Polynomials and Root Checks
//!
//! Kummer radicals, Artin–Schreier and purely inseparable binomials,
//! Witt vector powers and numerical root cross-verification, tallied per
//! category.

use std::process::ExitCode;

use motivic_tda::algebra::{ExtensionCategory, FieldExtensionSuite};
use motivic_tda::telemetry::init_tracing;

fn main() -> ExitCode {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Field Extensions over Q");
    println!("═══════════════════════════════════════════════════════════════\n");

    if let Err(err) = init_tracing() {
        eprintln!("warning: {err}");
    }

    let report = FieldExtensionSuite::default().run();

    let mut section = "";
    for test in &report.tests {
        if test.section != section {
            section = test.section;
            println!("\n=== {section} ===");
        }
        let status = if test.passed { "ok  " } else { "FAIL" };
        println!("  [{status}] {}: {}", test.description, test.detail);
    }

    println!();
    println!("══════════════════════════════════════════════════════════════");
    println!("  Summary");
    println!("══════════════════════════════════════════════════════════════\n");

    let tallies = report.tallies();
    for category in ExtensionCategory::ALL {
        let tally = tallies.get(&category).copied().unwrap_or_default();
        println!(
            "  {:<30} successful = {:>3}, failed = {:>3}",
            category.label(),
            tally.successful,
            tally.failed
        );
    }

    let total = report.tests.len().max(1) as f64;
    let ok = report.total_successful();
    let failed = report.total_failed();
    let (ok_mean, ok_var) = report.success_spread();
    let (fail_mean, fail_var) = report.failure_spread();

    println!();
    println!("  Total successful: {ok} ({:.2}%)", 100.0 * ok as f64 / total);
    println!("  Total failed:     {failed} ({:.2}%)", 100.0 * failed as f64 / total);
    println!("  Successes per category: mean = {ok_mean:.4}, variance = {ok_var:.4}");
    println!("  Failures per category:  mean = {fail_mean:.4}, variance = {fail_var:.4}");

    ExitCode::SUCCESS
}
