//! Sweeps the identity offset of a four-qubit Pauli chain across target
//! condition numbers 10, 20, ..., 200 and prints the tuned operators.
//!
//! Run with `RUST_LOG=debug` to watch every trial move.

use qcond::{ProblemConfig, QcondError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), QcondError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    println!("--- qcond Example: Condition-Number Sweep ---");

    let mut config = ProblemConfig::from_toml_str(include_str!("four_qubit_chain.toml"))?;
    let base = config.build_operator()?;
    println!("\nBase operator:\n{}", base);

    // Keep the offset above -lambda_min so every tuned operator is positive definite.
    let (lambda_min, lambda_max) = base.spectral_range();
    println!("\nSpectrum without offset: [{:.6}, {:.6}]", lambda_min, lambda_max);
    if config.lower_bound.is_none() {
        config.lower_bound = Some(-lambda_min);
    }

    let results = config.run()?;
    println!("\nResults:");
    for result in &results {
        println!("  {}", result);
    }

    let converged = results.iter().filter(|r| r.converged).count();
    println!("\n{} of {} targets converged.", converged, results.len());

    if let Some(last) = results.last() {
        println!("\nDecomposition handed to the circuit builder for target {}:", last.target);
        println!("{}", last.operator);
    }
    Ok(())
}
