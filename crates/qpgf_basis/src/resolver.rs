//! Basis resolution
//!
//! Gantree: L3_Basis → BasisResolver
//!
//! Turns a logical circuit plus an error table into the resolved
//! [`GateSequence`] the PGF engine consumes. The strategy decides whether
//! a compound gate becomes one error source or several.

use crate::hardware::HardwareTarget;
use crate::strategy::DecompositionStrategy;
use log::{debug, trace};
use qpgf_core::{
    Circuit, Gate, GateOp, GateSequence, Probability, QpgfError, QpgfResult, QubitSpan,
};
use qpgf_error_model::ErrorTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts collected while resolving one circuit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolveStats {
    /// Logical gates read
    pub logical_gates: usize,
    /// Logical gates that were already native
    pub native_gates: usize,
    /// Native sub-gates after rewriting
    pub native_sub_gates: usize,
    /// GateOps emitted
    pub ops_emitted: usize,
}

impl fmt::Display for ResolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} logical ({} native) -> {} native sub-gates, {} ops",
            self.logical_gates, self.native_gates, self.native_sub_gates, self.ops_emitted
        )
    }
}

/// Resolves logical circuits against a hardware target
/// Gantree: BasisResolver // 기저 변환기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasisResolver {
    target: HardwareTarget,
    strategy: DecompositionStrategy,
}

impl BasisResolver {
    /// Create a resolver
    pub fn new(target: HardwareTarget, strategy: DecompositionStrategy) -> Self {
        Self { target, strategy }
    }

    /// Set the strategy
    pub fn with_strategy(mut self, strategy: DecompositionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Get the hardware target
    pub fn target(&self) -> HardwareTarget {
        self.target
    }

    /// Get the strategy
    pub fn strategy(&self) -> DecompositionStrategy {
        self.strategy
    }

    /// Rewrite a circuit into the target's native gates
    /// Gantree: transpile(&Circuit) -> Result<Circuit> // 네이티브 회로
    pub fn transpile(&self, circuit: &Circuit) -> QpgfResult<Circuit> {
        let mut native = Circuit::new(circuit.num_qubits());
        if let Some(name) = circuit.name() {
            native.set_name(format!("{}_{}", name, self.target.name().to_lowercase()));
        }
        for gate in circuit.gates() {
            native.add_gates(self.target.decompose(gate)?)?;
        }
        Ok(native)
    }

    /// Resolve a circuit into error-annotated gate operations
    /// Gantree: resolve(&Circuit, &ErrorTable) -> Result<GateSequence> // 에러율 부여
    pub fn resolve(&self, circuit: &Circuit, table: &ErrorTable) -> QpgfResult<GateSequence> {
        self.resolve_with_stats(circuit, table).map(|(seq, _)| seq)
    }

    /// Resolve and report counts
    pub fn resolve_with_stats(
        &self,
        circuit: &Circuit,
        table: &ErrorTable,
    ) -> QpgfResult<(GateSequence, ResolveStats)> {
        let mut seq = GateSequence::new();
        let mut stats = ResolveStats::default();

        for gate in circuit.gates() {
            stats.logical_gates += 1;
            let sub_gates = self.target.decompose(gate)?;
            stats.native_sub_gates += sub_gates.len();
            if self.target.is_native(gate.kind()) {
                stats.native_gates += 1;
            }

            match self.strategy {
                DecompositionStrategy::Atomic => {
                    seq.push(self.atomic_op(gate, &sub_gates, table)?);
                }
                DecompositionStrategy::Decomposed => {
                    for sub in &sub_gates {
                        seq.push(op_for(sub, table.lookup(sub.kind(), span_of(sub)?)?)?);
                    }
                }
            }
        }

        stats.ops_emitted = seq.len();
        debug!(
            "resolved {} on {} ({}): {}",
            circuit.name().unwrap_or("circuit"),
            self.target,
            self.strategy,
            stats
        );
        Ok((seq, stats))
    }

    /// Calibrated rate for the logical gate if the table has one, otherwise
    /// the probability that at least one native sub-gate fails
    fn atomic_op(&self, gate: &Gate, sub_gates: &[Gate], table: &ErrorTable) -> QpgfResult<GateOp> {
        let span = span_of(gate)?;
        let rate = match calibrated(table.lookup(gate.kind(), span))? {
            Some(rate) => rate,
            None => {
                let rates = sub_gates
                    .iter()
                    .map(|sub| table.lookup(sub.kind(), span_of(sub)?))
                    .collect::<QpgfResult<Vec<_>>>()?;
                let combined = Probability::any_of(rates);
                trace!("{}: combined {} sub-gate rates -> {}", gate, sub_gates.len(), combined);
                combined
            }
        };
        op_for(gate, rate)
    }
}

/// A missing table entry means "not calibrated"; other lookup errors propagate
fn calibrated(lookup: QpgfResult<Probability>) -> QpgfResult<Option<Probability>> {
    match lookup {
        Ok(rate) => Ok(Some(rate)),
        Err(QpgfError::MissingErrorRate { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

fn span_of(gate: &Gate) -> QpgfResult<QubitSpan> {
    QubitSpan::from_slice(&gate.qubits())
}

fn op_for(gate: &Gate, rate: Probability) -> QpgfResult<GateOp> {
    GateOp::new(gate.kind(), span_of(gate)?, rate)
}

// ============================================================================
// Tests
// ============================================================================
