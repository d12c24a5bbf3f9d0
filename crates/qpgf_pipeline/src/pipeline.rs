//! Pipeline for staged QPGF execution
//!
//! Gantree: L5_Integration → Pipeline
//!
//! load_table → parse → resolve → compute, each stage keeping its
//! intermediate result. Later stages fill in missing earlier ones where a
//! sensible default exists (the target's typical error table).

use crate::config::QpgfConfig;
use log::{debug, info};
use qpgf_basis::{DecompositionStrategy, HardwareTarget, ResolveStats};
use qpgf_core::{Circuit, GateSequence, QpgfError, QpgfResult};
use qpgf_engine::{DistributionReport, PgfEngine, PgfSummary};
use qpgf_error_model::ErrorTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Initial state
    Initial,
    /// Error table available
    TableLoaded,
    /// Logical circuit parsed
    CircuitParsed,
    /// Gate sequence resolved against the table
    Resolved,
    /// Distributions computed
    Computed,
}

/// Pipeline state holding intermediate results
#[derive(Debug, Clone)]
pub struct PipelineState {
    /// Current stage
    pub stage: PipelineStage,

    /// Configuration
    pub config: QpgfConfig,

    /// Error table
    pub table: Option<ErrorTable>,

    /// Logical circuit
    pub circuit: Option<Circuit>,

    /// Resolved gate sequence
    pub sequence: Option<GateSequence>,

    /// Resolution counts
    pub stats: Option<ResolveStats>,

    /// Computed distributions
    pub report: Option<DistributionReport>,
}

impl PipelineState {
    /// Create new pipeline state
    pub fn new(config: QpgfConfig) -> Self {
        Self {
            stage: PipelineStage::Initial,
            config,
            table: None,
            circuit: None,
            sequence: None,
            stats: None,
            report: None,
        }
    }

    /// Check if a table is loaded
    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Check if a circuit is loaded
    pub fn has_circuit(&self) -> bool {
        self.circuit.is_some()
    }

    /// Check if resolved
    pub fn is_resolved(&self) -> bool {
        self.sequence.is_some()
    }

    /// Check if computed
    pub fn is_computed(&self) -> bool {
        self.report.is_some()
    }

    // Anything derived from a replaced input is stale
    fn clear_derived(&mut self) {
        self.sequence = None;
        self.stats = None;
        self.report = None;
    }
}

/// Stage wall-clock times in microseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    /// Basis resolution
    pub resolve_us: u64,
    /// PGF computation
    pub compute_us: u64,
    /// Whole run
    pub total_us: u64,
}

/// Result of a full pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Circuit name, if the source had one
    pub circuit_name: Option<String>,
    /// Hardware target
    pub hardware: HardwareTarget,
    /// Strategy used
    pub strategy: DecompositionStrategy,
    /// Error table name
    pub table_name: String,
    /// Resolution counts
    pub stats: ResolveStats,
    /// Global summary
    pub summary: PgfSummary,
    /// Distributions
    pub report: DistributionReport,
    /// Timings
    pub timings: StageTimings,
}

impl PipelineResult {
    /// Expected number of gate faults
    pub fn expected_errors(&self) -> f64 {
        self.summary.mean
    }

    /// Probability that no gate fails
    pub fn fault_free_probability(&self) -> f64 {
        self.report.global.probability(0)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QpgfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// QPGF execution pipeline
/// Gantree: Pipeline // 단계별 실행
pub struct Pipeline {
    state: PipelineState,
}

impl Pipeline {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new pipeline with configuration
    pub fn new(config: QpgfConfig) -> Self {
        Self {
            state: PipelineState::new(config),
        }
    }

    /// Pipeline with the Heron preset
    pub fn heron() -> Self {
        Self::new(QpgfConfig::heron())
    }

    /// Pipeline with the Eagle preset
    pub fn eagle() -> Self {
        Self::new(QpgfConfig::eagle())
    }

    // ========================================================================
    // Stage Accessors
    // ========================================================================

    /// Get current stage
    pub fn stage(&self) -> PipelineStage {
        self.state.stage
    }

    /// Get current state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Get configuration
    pub fn config(&self) -> &QpgfConfig {
        &self.state.config
    }

    // ========================================================================
    // Stage 1: Error Table
    // ========================================================================

    /// Use an already built table
    pub fn use_table(&mut self, table: ErrorTable) -> &ErrorTable {
        debug!("pipeline: using table {} ({} kinds)", table.name, table.len());
        self.state.clear_derived();
        self.state.stage = if self.state.has_circuit() {
            PipelineStage::CircuitParsed
        } else {
            PipelineStage::TableLoaded
        };
        self.state.table.insert(table)
    }

    /// Use the target's typical rates
    pub fn use_default_table(&mut self) -> &ErrorTable {
        let table = self.state.config.default_table();
        self.use_table(table)
    }

    /// Load calibration CSV text with the configured column map
    pub fn load_table_csv(&mut self, text: &str, name: &str) -> QpgfResult<&ErrorTable> {
        self.state.config.validate()?;
        let table = self.state.config.to_csv_loader().load_str(text, name)?;
        Ok(self.use_table(table))
    }

    /// Load a table file: `.json` as a saved table, anything else as CSV
    pub fn load_table_path(&mut self, path: impl AsRef<Path>) -> QpgfResult<&ErrorTable> {
        let path = path.as_ref();
        self.state.config.validate()?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let table = if is_json {
            ErrorTable::from_json_path(path)?
        } else {
            self.state.config.to_csv_loader().load_path(path)?
        };
        Ok(self.use_table(table))
    }

    // ========================================================================
    // Stage 2: Circuit
    // ========================================================================

    /// Use an already built circuit
    pub fn use_circuit(&mut self, circuit: Circuit) -> &Circuit {
        debug!(
            "pipeline: circuit with {} qubits, {} gates",
            circuit.num_qubits(),
            circuit.gate_count()
        );
        self.state.clear_derived();
        self.state.stage = PipelineStage::CircuitParsed;
        self.state.circuit.insert(circuit)
    }

    /// Parse OpenQASM text
    pub fn parse_qasm(&mut self, qasm: &str) -> QpgfResult<&Circuit> {
        let circuit = Circuit::from_qasm(qasm)?;
        Ok(self.use_circuit(circuit))
    }

    /// Parse an OpenQASM file; the file stem names the circuit
    pub fn load_qasm_path(&mut self, path: impl AsRef<Path>) -> QpgfResult<&Circuit> {
        let path = path.as_ref();
        let mut circuit = Circuit::from_qasm(&std::fs::read_to_string(path)?)?;
        if circuit.name().is_none() {
            if let Some(stem) = path.file_stem() {
                circuit.set_name(stem.to_string_lossy());
            }
        }
        Ok(self.use_circuit(circuit))
    }

    // ========================================================================
    // Stage 3: Resolve
    // ========================================================================

    /// Map the circuit onto the target basis and attach error rates
    ///
    /// Falls back to the target's typical table if none is loaded.
    pub fn resolve(&mut self) -> QpgfResult<&GateSequence> {
        if !self.state.has_table() {
            debug!("pipeline: no table loaded, using {} defaults", self.state.config.hardware);
            self.use_default_table();
        }

        let (circuit, table) = match (&self.state.circuit, &self.state.table) {
            (Some(c), Some(t)) => (c, t),
            (None, _) => return Err(QpgfError::ConfigError("no circuit loaded".into())),
            (_, None) => return Err(QpgfError::InternalError("error table missing".into())),
        };

        let (sequence, stats) = self.state.config.to_resolver().resolve_with_stats(circuit, table)?;
        debug!("pipeline: resolved {}", stats);

        self.state.report = None;
        self.state.stats = Some(stats);
        self.state.stage = PipelineStage::Resolved;
        Ok(self.state.sequence.insert(sequence))
    }

    // ========================================================================
    // Stage 4: Compute
    // ========================================================================

    /// Compute global and per-qubit distributions
    pub fn compute(&mut self) -> QpgfResult<&DistributionReport> {
        if !self.state.is_resolved() {
            self.resolve()?;
        }
        let sequence = self
            .state
            .sequence
            .as_ref()
            .ok_or_else(|| QpgfError::InternalError("sequence missing after resolve".into()))?;

        let engine = PgfEngine::new(self.state.config.engine.clone())?;
        let report = engine.compute_report(sequence)?;

        self.state.stage = PipelineStage::Computed;
        Ok(self.state.report.insert(report))
    }

    /// Run every stage on one QASM program
    ///
    /// A table loaded earlier is kept; otherwise the target defaults apply.
    pub fn run(&mut self, qasm: &str) -> QpgfResult<PipelineResult> {
        let start = Instant::now();
        self.state.config.validate()?;
        self.parse_qasm(qasm)?;
        self.run_loaded(start)
    }

    /// Run resolve and compute on the circuit already loaded
    pub fn run_circuit(&mut self, circuit: Circuit) -> QpgfResult<PipelineResult> {
        let start = Instant::now();
        self.state.config.validate()?;
        self.use_circuit(circuit);
        self.run_loaded(start)
    }

    fn run_loaded(&mut self, start: Instant) -> QpgfResult<PipelineResult> {
        let resolve_start = Instant::now();
        self.resolve()?;
        let resolve_us = resolve_start.elapsed().as_micros() as u64;

        let compute_start = Instant::now();
        let report = self.compute()?.clone();
        let compute_us = compute_start.elapsed().as_micros() as u64;

        let config = &self.state.config;
        let result = PipelineResult {
            circuit_name: self
                .state
                .circuit
                .as_ref()
                .and_then(|c| c.name())
                .map(str::to_string),
            hardware: config.hardware,
            strategy: config.strategy,
            table_name: self
                .state
                .table
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            stats: self.state.stats.clone().unwrap_or_default(),
            summary: report.global_summary(config.tail_threshold),
            report,
            timings: StageTimings {
                resolve_us,
                compute_us,
                total_us: start.elapsed().as_micros() as u64,
            },
        };

        info!(
            "pipeline: {} on {} ({}): mean {:.4}, P(0) {:.4}",
            result.circuit_name.as_deref().unwrap_or("circuit"),
            result.hardware,
            result.strategy,
            result.expected_errors(),
            result.fault_free_probability()
        );
        Ok(result)
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Reset pipeline to initial state
    pub fn reset(&mut self) {
        let config = self.state.config.clone();
        self.state = PipelineState::new(config);
    }

    /// Reset and reconfigure
    pub fn reconfigure(&mut self, config: QpgfConfig) {
        self.state = PipelineState::new(config);
    }
}

// ============================================================================
// Tests
// ============================================================================
