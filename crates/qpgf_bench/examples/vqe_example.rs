//! QPGF VQE Example
//!
//! Error-count distribution of the two-qubit H2 ansatz on Heron, once with
//! logical gates as single fault sites and once fully decomposed.
//!
//! Run with `RUST_LOG=info` to see the pipeline stages.

use qpgf_bench::CircuitGenerator;
use qpgf_pipeline::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let circuit = CircuitGenerator::new().vqe_h2_ansatz([0.1, -0.2, 0.3, 0.4, -0.5, 0.6]);
    println!("{}", circuit);

    let mut results = Vec::new();
    for strategy in [DecompositionStrategy::Atomic, DecompositionStrategy::Decomposed] {
        let config = QpgfConfig::heron()
            .with_strategy(strategy)
            .with_tail_threshold(Some(0.01));
        let result = Pipeline::new(config).run_circuit(circuit.clone())?;

        println!("── {} ──", strategy);
        println!("{}", result.stats);
        println!("{}", Reporter::to_text(&result.report, Some(0.01)));
        results.push(result);
    }

    println!("{}", Reporter::comparison_report(&results));
    Ok(())
}
