//! Runs a small QF program that prepares a Bell pair and then loops on the
//! first qubit until a sampled estimate reads 0.
//!
//! Set `RUST_LOG=qf=debug` to see every dispatched command.

use qf::{interpret, InterpreterOptions, QfError, RunStatus};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), QfError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qf=info")))
        .init();

    let source = "+@ [ : ] > :";
    println!("--- QF Example: Bell pair and measurement loop ---");
    println!("Source: {:?}", source);

    let options = InterpreterOptions::default()
        .with_seed(2024)
        .with_max_steps(256)
        .skip_unknown(true)
        .collapse_on_measure(true);
    let report = interpret(source, 2, options)?;

    println!("\n{}", report.circuit);
    println!("{}", report.history);
    if let Some(state) = &report.final_state {
        println!("Final state: {}", state);
    }
    match &report.status {
        RunStatus::Halted => println!("Program halted after {} steps.", report.history.len()),
        other => println!("Program stopped: {}", other),
    }
    Ok(())
}
