//! Circuit builder for QPGF
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent construction of logical circuits, mainly for tests and the
//! benchmark generators.

use crate::circuit::Circuit;
use crate::gate::Gate;
use crate::types::{Angle, QubitId};

/// Fluent circuit builder (consuming self pattern)
///
/// Gates that reference a qubit outside the register are dropped, as with
/// the other consuming builders in this workspace; use
/// [`Circuit::add_gate`] directly when the error matters.
/// Gantree: CircuitBuilder // 빌더 패턴
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Create a new circuit builder
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
        }
    }

    /// Create with circuit name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            circuit: Circuit::with_name(num_qubits, name),
        }
    }

    /// Add an arbitrary gate
    pub fn gate(mut self, gate: Gate) -> Self {
        let _ = self.circuit.add_gate(gate);
        self
    }

    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================

    /// Add identity gate
    pub fn id(self, qubit: QubitId) -> Self {
        self.gate(Gate::Id(qubit))
    }

    /// Add Pauli-X gate
    pub fn x(self, qubit: QubitId) -> Self {
        self.gate(Gate::X(qubit))
    }

    /// Add Pauli-Y gate
    pub fn y(self, qubit: QubitId) -> Self {
        self.gate(Gate::Y(qubit))
    }

    /// Add Pauli-Z gate
    pub fn z(self, qubit: QubitId) -> Self {
        self.gate(Gate::Z(qubit))
    }

    /// Add Hadamard gate
    /// Gantree: h(self, q) -> Self // H 추가
    pub fn h(self, qubit: QubitId) -> Self {
        self.gate(Gate::H(qubit))
    }

    /// Add S gate
    pub fn s(self, qubit: QubitId) -> Self {
        self.gate(Gate::S(qubit))
    }

    /// Add T gate
    pub fn t(self, qubit: QubitId) -> Self {
        self.gate(Gate::T(qubit))
    }

    /// Add SX gate
    pub fn sx(self, qubit: QubitId) -> Self {
        self.gate(Gate::Sx(qubit))
    }

    /// Add Rx rotation
    pub fn rx(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::Rx(qubit, angle))
    }

    /// Add Ry rotation
    /// Gantree: ry(self, q, a) -> Self // Ry 추가
    pub fn ry(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::Ry(qubit, angle))
    }

    /// Add Rz rotation
    pub fn rz(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::Rz(qubit, angle))
    }

    /// Add U gate (general single-qubit)
    pub fn u(self, qubit: QubitId, theta: Angle, phi: Angle, lambda: Angle) -> Self {
        self.gate(Gate::U(qubit, theta, phi, lambda))
    }

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================

    /// Add CNOT gate
    /// Gantree: cx(self, c, t) -> Self // CX 추가
    pub fn cx(self, control: QubitId, target: QubitId) -> Self {
        self.gate(Gate::Cx(control, target))
    }

    /// Add CZ gate
    pub fn cz(self, a: QubitId, b: QubitId) -> Self {
        self.gate(Gate::Cz(a, b))
    }

    /// Add ECR gate
    pub fn ecr(self, a: QubitId, b: QubitId) -> Self {
        self.gate(Gate::Ecr(a, b))
    }

    /// Add RZZ gate
    pub fn rzz(self, a: QubitId, b: QubitId, angle: Angle) -> Self {
        self.gate(Gate::Rzz(a, b, angle))
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// Hadamard on every qubit
    pub fn h_layer(self) -> Self {
        let n = self.circuit.num_qubits();
        (0..n).fold(self, |b, q| b.h(q))
    }

    /// Linear CX chain 0→1→…→n-1
    /// Gantree: cx_chain(self) -> Self // CX 체인
    pub fn cx_chain(self) -> Self {
        let n = self.circuit.num_qubits();
        (0..n.saturating_sub(1)).fold(self, |b, q| b.cx(q, q + 1))
    }

    /// Finish building
    pub fn build(self) -> Circuit {
        self.circuit
    }
}
