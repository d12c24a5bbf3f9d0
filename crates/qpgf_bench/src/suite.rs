//! Benchmark suite for QPGF
//!
//! Gantree: L6_Benchmark → BenchSuite
//!
//! Runs generated circuits through the pipeline and records distribution
//! statistics next to wall-clock time, to compare decomposition strategies
//! and engine settings.

use crate::generators::CircuitGenerator;
use log::info;
use qpgf_basis::{DecompositionStrategy, HardwareTarget};
use qpgf_core::{Circuit, QpgfResult};
use qpgf_engine::EngineConfig;
use qpgf_pipeline::{Pipeline, PipelineResult, QpgfConfig};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Single benchmark result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Benchmark name
    pub name: String,

    /// Number of qubits
    pub qubits: usize,

    /// Hardware target
    pub hardware: HardwareTarget,

    /// Strategy
    pub strategy: DecompositionStrategy,

    /// Logical gates in the circuit
    pub logical_gates: usize,

    /// GateOps handed to the engine
    pub ops: usize,

    /// Expected number of faults
    pub mean: f64,

    /// Standard deviation of the fault count
    pub std_dev: f64,

    /// P(no fault)
    pub fault_free: f64,

    /// Highest fault count with non-zero probability
    pub support: usize,

    /// Engine time (microseconds)
    pub compute_us: u64,

    /// Whole pipeline time (microseconds)
    pub total_us: u64,
}

impl BenchmarkResult {
    /// Create from a pipeline result
    pub fn from_pipeline(name: &str, qubits: usize, result: &PipelineResult) -> Self {
        Self {
            name: name.to_string(),
            qubits,
            hardware: result.hardware,
            strategy: result.strategy,
            logical_gates: result.stats.logical_gates,
            ops: result.stats.ops_emitted,
            mean: result.summary.mean,
            std_dev: result.summary.std_dev,
            fault_free: result.fault_free_probability(),
            support: result.summary.support,
            compute_us: result.timings.compute_us,
            total_us: result.timings.total_us,
        }
    }
}

/// Benchmark suite
/// Gantree: BenchSuite // 벤치마크 스위트
pub struct BenchSuite {
    /// Seed for random circuits
    seed: u64,

    /// Engine settings for every run
    engine: EngineConfig,

    /// Results
    results: Vec<BenchmarkResult>,
}

impl BenchSuite {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new benchmark suite
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Create with seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            engine: EngineConfig::default(),
            results: Vec::new(),
        }
    }

    /// Use these engine settings
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    fn generator(&self) -> CircuitGenerator {
        CircuitGenerator::with_seed(self.seed)
    }

    // ========================================================================
    // Individual Benchmarks
    // ========================================================================

    /// Run one circuit on one target and strategy with the typical table
    pub fn bench_circuit(
        &mut self,
        name: &str,
        circuit: &Circuit,
        target: HardwareTarget,
        strategy: DecompositionStrategy,
    ) -> QpgfResult<BenchmarkResult> {
        let config = QpgfConfig::for_target(target)
            .with_strategy(strategy)
            .with_engine(self.engine.clone());
        let result = Pipeline::new(config).run_circuit(circuit.clone())?;

        let bench = BenchmarkResult::from_pipeline(name, circuit.num_qubits(), &result);
        info!(
            "bench {} [{} {}]: {} ops, mean {:.4}, {}us",
            bench.name, bench.hardware, bench.strategy, bench.ops, bench.mean, bench.total_us
        );
        self.results.push(bench.clone());
        Ok(bench)
    }

    /// Atomic and decomposed runs of the same circuit
    pub fn compare_strategies(
        &mut self,
        name: &str,
        circuit: &Circuit,
        target: HardwareTarget,
    ) -> QpgfResult<Vec<BenchmarkResult>> {
        [DecompositionStrategy::Atomic, DecompositionStrategy::Decomposed]
            .into_iter()
            .map(|strategy| self.bench_circuit(name, circuit, target, strategy))
            .collect()
    }

    // ========================================================================
    // Benchmark Suites
    // ========================================================================

    /// Layered circuits of growing depth
    pub fn run_layer_scaling(
        &mut self,
        num_qubits: usize,
        layers: &[usize],
        target: HardwareTarget,
    ) -> QpgfResult<Vec<BenchmarkResult>> {
        info!("=== Layer Scaling Benchmark ===");
        let circuits = self.generator().layer_scaling(num_qubits, layers);

        let mut results = Vec::new();
        for (circuit, l) in circuits.iter().zip(layers) {
            let name = format!("layers_{}q_{}l", num_qubits, l);
            results.push(self.bench_circuit(&name, circuit, target, DecompositionStrategy::Decomposed)?);
        }
        Ok(results)
    }

    /// Layered circuits of growing width
    pub fn run_qubit_scaling(
        &mut self,
        widths: &[usize],
        num_layers: usize,
        target: HardwareTarget,
    ) -> QpgfResult<Vec<BenchmarkResult>> {
        info!("=== Qubit Scaling Benchmark ===");
        let circuits = self.generator().qubit_scaling(widths, num_layers);

        let mut results = Vec::new();
        for (circuit, n) in circuits.iter().zip(widths) {
            let name = format!("qubits_{}q_{}l", n, num_layers);
            results.push(self.bench_circuit(&name, circuit, target, DecompositionStrategy::Decomposed)?);
        }
        Ok(results)
    }

    /// Strategy comparison over the reference circuits on both targets
    pub fn run_strategy_comparison(&mut self) -> QpgfResult<Vec<BenchmarkResult>> {
        info!("=== Strategy Comparison ===");
        let gen = self.generator();
        let circuits = [
            ("vqe_h2", gen.vqe_h2_ansatz([0.1, -0.2, 0.3, 0.4, -0.5, 0.6])),
            ("sample", gen.sample()),
            ("random_5q", gen.random(5, 6)),
        ];

        let mut results = Vec::new();
        for target in HardwareTarget::ALL {
            for (name, circuit) in &circuits {
                if let Some(gate) = circuit.gates().iter().find(|g| !target.supports(g.kind())) {
                    info!("skipping {} on {}: no native form for {}", name, target, gate.kind());
                    continue;
                }
                results.extend(self.compare_strategies(name, circuit, target)?);
            }
        }
        Ok(results)
    }

    /// Run quick benchmark (for testing)
    pub fn run_quick(&mut self) -> QpgfResult<Vec<BenchmarkResult>> {
        info!("=== Running Quick Benchmark ===");
        let vqe = self.generator().vqe_h2_ansatz([0.1, -0.2, 0.3, 0.4, -0.5, 0.6]);
        let mut results = self.compare_strategies("vqe_h2", &vqe, HardwareTarget::Heron)?;
        results.extend(self.run_layer_scaling(4, &[1, 4], HardwareTarget::Heron)?);
        Ok(results)
    }

    /// Run full benchmark suite
    pub fn run_all(&mut self) -> QpgfResult<Vec<BenchmarkResult>> {
        let mut all = self.run_strategy_comparison()?;
        all.extend(self.run_layer_scaling(20, &[1, 5, 10, 20], HardwareTarget::Heron)?);
        all.extend(self.run_qubit_scaling(&[5, 10, 20, 40], 10, HardwareTarget::Heron)?);
        Ok(all)
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Get all results
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Clear results
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Get statistics
    pub fn statistics(&self) -> BenchmarkStatistics {
        BenchmarkStatistics::from_results(&self.results)
    }

    /// Markdown table of results
    pub fn to_markdown(results: &[BenchmarkResult]) -> String {
        let mut out = String::new();
        let _ = write_markdown(&mut out, results);
        out
    }
}

impl Default for BenchSuite {
    fn default() -> Self {
        Self::new()
    }
}

fn write_markdown(out: &mut String, results: &[BenchmarkResult]) -> std::fmt::Result {
    let stats = BenchmarkStatistics::from_results(results);
    writeln!(out, "# QPGF Benchmark Results\n")?;
    writeln!(out, "- **Benchmarks**: {}", stats.count)?;
    writeln!(out, "- **Total ops**: {}", stats.total_ops)?;
    writeln!(out, "- **Avg compute**: {:.1}us\n", stats.avg_compute_us)?;

    writeln!(out, "| Name | Qubits | Target | Strategy | Gates | Ops | Mean | Std | P(0) | Compute(us) |")?;
    writeln!(out, "|------|--------|--------|----------|-------|-----|------|-----|------|-------------|")?;
    for r in results {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {:.4} | {:.4} | {:.4} | {} |",
            r.name,
            r.qubits,
            r.hardware,
            r.strategy,
            r.logical_gates,
            r.ops,
            r.mean,
            r.std_dev,
            r.fault_free,
            r.compute_us
        )?;
    }
    Ok(())
}

/// Benchmark statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    /// Number of benchmarks
    pub count: usize,

    /// GateOps processed across all runs
    pub total_ops: usize,

    /// Average expected fault count
    pub avg_mean: f64,

    /// Lowest P(no fault)
    pub min_fault_free: f64,

    /// Average engine time (us)
    pub avg_compute_us: f64,

    /// Total pipeline time (us)
    pub total_us: u64,
}

impl BenchmarkStatistics {
    /// Compute statistics from results
    pub fn from_results(results: &[BenchmarkResult]) -> Self {
        if results.is_empty() {
            return Self {
                count: 0,
                total_ops: 0,
                avg_mean: 0.0,
                min_fault_free: 1.0,
                avg_compute_us: 0.0,
                total_us: 0,
            };
        }

        let count = results.len();
        Self {
            count,
            total_ops: results.iter().map(|r| r.ops).sum(),
            avg_mean: results.iter().map(|r| r.mean).sum::<f64>() / count as f64,
            min_fault_free: results.iter().map(|r| r.fault_free).fold(1.0, f64::min),
            avg_compute_us: results.iter().map(|r| r.compute_us).sum::<u64>() as f64 / count as f64,
            total_us: results.iter().map(|r| r.total_us).sum(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bench_suite_new() {
        let suite = BenchSuite::new();
        assert!(suite.results().is_empty());
        assert_eq!(suite.statistics().count, 0);
    }

    #[test]
    fn test_compare_strategies() {
        let mut suite = BenchSuite::with_seed(1);
        let circuit = CircuitGenerator::new().sample();
        let results = suite.compare_strategies("sample", &circuit, HardwareTarget::Heron).unwrap();

        assert_eq!(results.len(), 2);
        let (atomic, decomposed) = (&results[0], &results[1]);
        assert_eq!(atomic.ops, 12);
        assert!(decomposed.ops > atomic.ops);
        assert_abs_diff_eq!(atomic.fault_free, decomposed.fault_free, epsilon = 1e-12);
        assert_eq!(suite.results().len(), 2);
    }

    #[test]
    fn test_strategy_comparison_skips_unsupported() {
        let mut suite = BenchSuite::new();
        let results = suite.run_strategy_comparison().unwrap();
        // RX has no Eagle form, so sample runs on Heron only
        let eagle = results.iter().filter(|r| r.hardware == HardwareTarget::Eagle).count();
        assert_eq!(eagle, 4);
        assert_eq!(results.len() - eagle, 6);
        assert!(results
            .iter()
            .filter(|r| r.name == "sample")
            .all(|r| r.hardware == HardwareTarget::Heron));
    }

    #[test]
    fn test_layer_scaling_mean_grows_linearly() {
        let mut suite = BenchSuite::new();
        let results = suite.run_layer_scaling(4, &[1, 2], HardwareTarget::Heron).unwrap();
        assert_abs_diff_eq!(results[1].mean, 2.0 * results[0].mean, epsilon = 1e-9);
    }

    #[test]
    fn test_exact_engine_agrees() {
        let circuit = CircuitGenerator::new().large_test(6, 4);
        let fast = BenchSuite::new()
            .bench_circuit("fast", &circuit, HardwareTarget::Heron, DecompositionStrategy::Decomposed)
            .unwrap();
        let exact = BenchSuite::new()
            .with_engine(EngineConfig::exact())
            .bench_circuit("exact", &circuit, HardwareTarget::Heron, DecompositionStrategy::Decomposed)
            .unwrap();
        assert_abs_diff_eq!(fast.fault_free, exact.fault_free, epsilon = 1e-9);
        assert_abs_diff_eq!(fast.mean, exact.mean, epsilon = 1e-9);
    }

    #[test]
    fn test_quick_and_markdown() {
        let mut suite = BenchSuite::new();
        let results = suite.run_quick().unwrap();
        assert_eq!(results.len(), 4);

        let stats = suite.statistics();
        assert_eq!(stats.count, 4);
        assert!(stats.min_fault_free > 0.0 && stats.min_fault_free < 1.0);

        let md = BenchSuite::to_markdown(&results);
        assert!(md.contains("| vqe_h2 | 2 | HERON | atomic |"));
    }
}
