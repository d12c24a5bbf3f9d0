//! Quantum gate definitions for QPGF
//!
//! Gantree: L1_Circuit → Gate
//!
//! `Gate` is one parsed circuit instruction with its operands and angles.
//! `GateKind` is the closed, parameter-free tag that error tables and the
//! PGF engine key on; each kind has a fixed qubit arity.

use crate::error::{QpgfError, QpgfResult};
use crate::types::{Angle, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Gate Kind
// ============================================================================

/// Gate-type tag with fixed arity
/// Gantree: GateKind // 게이트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    /// Identity
    Id,
    /// Pauli-X
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
    /// Hadamard
    H,
    /// S gate (sqrt(Z))
    S,
    /// T gate (fourth root of Z)
    T,
    /// SX gate (sqrt(X))
    Sx,
    /// Rotation around X-axis
    Rx,
    /// Rotation around Y-axis
    Ry,
    /// Rotation around Z-axis
    Rz,
    /// General single-qubit rotation U(θ, φ, λ)
    U,
    /// Controlled-NOT
    Cx,
    /// Controlled-Z
    Cz,
    /// Echoed cross-resonance (IBM Eagle native)
    Ecr,
    /// ZZ interaction (IBM Heron native)
    Rzz,
}

impl GateKind {
    /// All kinds, in declaration order
    pub const ALL: [GateKind; 16] = [
        GateKind::Id,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::H,
        GateKind::S,
        GateKind::T,
        GateKind::Sx,
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
        GateKind::U,
        GateKind::Cx,
        GateKind::Cz,
        GateKind::Ecr,
        GateKind::Rzz,
    ];

    /// Number of qubits this kind acts on
    /// Gantree: arity(&self) -> usize // 큐비트 수
    pub fn arity(&self) -> usize {
        match self {
            GateKind::Cx | GateKind::Cz | GateKind::Ecr | GateKind::Rzz => 2,
            _ => 1,
        }
    }

    /// Check if kind is single-qubit
    pub fn is_single_qubit(&self) -> bool {
        self.arity() == 1
    }

    /// Check if kind is two-qubit
    pub fn is_two_qubit(&self) -> bool {
        self.arity() == 2
    }

    /// Number of angle parameters this kind takes
    pub fn num_params(&self) -> usize {
        match self {
            GateKind::Rx | GateKind::Ry | GateKind::Rz | GateKind::Rzz => 1,
            GateKind::U => 3,
            _ => 0,
        }
    }

    /// Upper-case mnemonic used by error tables (`"SX"`, `"ECR"`)
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Id => "ID",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::H => "H",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::Sx => "SX",
            GateKind::Rx => "RX",
            GateKind::Ry => "RY",
            GateKind::Rz => "RZ",
            GateKind::U => "U",
            GateKind::Cx => "CX",
            GateKind::Cz => "CZ",
            GateKind::Ecr => "ECR",
            GateKind::Rzz => "RZZ",
        }
    }

    /// Parse a case-insensitive gate name, accepting common aliases
    /// Gantree: parse(s) -> Result<Self> // 파싱
    pub fn parse(s: &str) -> QpgfResult<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "id" | "i" => GateKind::Id,
            "x" => GateKind::X,
            "y" => GateKind::Y,
            "z" => GateKind::Z,
            "h" => GateKind::H,
            "s" => GateKind::S,
            "t" => GateKind::T,
            "sx" => GateKind::Sx,
            "rx" => GateKind::Rx,
            "ry" => GateKind::Ry,
            "rz" => GateKind::Rz,
            "u" | "u3" => GateKind::U,
            "cx" | "cnot" => GateKind::Cx,
            "cz" => GateKind::Cz,
            "ecr" => GateKind::Ecr,
            "rzz" => GateKind::Rzz,
            _ => return Err(QpgfError::UnsupportedGate(s.trim().to_string())),
        };
        Ok(kind)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = QpgfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Gate
// ============================================================================

/// Parsed circuit instruction
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // ========================================================================
    // Single-Qubit Gates (Non-Parameterized)
    // ========================================================================
    /// Identity gate
    Id(QubitId),

    /// Pauli-X gate (NOT)
    /// Gantree: X(QubitId) // 파울리 X
    X(QubitId),

    /// Pauli-Y gate
    /// Gantree: Y(QubitId) // 파울리 Y
    Y(QubitId),

    /// Pauli-Z gate
    /// Gantree: Z(QubitId) // 파울리 Z
    Z(QubitId),

    /// Hadamard gate
    /// Gantree: H(QubitId) // 하다마드
    H(QubitId),

    /// S gate
    S(QubitId),

    /// T gate
    T(QubitId),

    /// SX gate
    Sx(QubitId),

    // ========================================================================
    // Single-Qubit Parameterized Rotation Gates
    // ========================================================================
    /// Rotation around X-axis
    Rx(QubitId, Angle),

    /// Rotation around Y-axis
    Ry(QubitId, Angle),

    /// Rotation around Z-axis
    Rz(QubitId, Angle),

    /// General single-qubit rotation U(θ, φ, λ)
    U(QubitId, Angle, Angle, Angle),

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT (CX)
    /// Gantree: Cx(QubitId, QubitId) // ctrl, tgt
    Cx(QubitId, QubitId),

    /// Controlled-Z
    Cz(QubitId, QubitId),

    /// Echoed cross-resonance
    Ecr(QubitId, QubitId),

    /// ZZ rotation
    Rzz(QubitId, QubitId, Angle),
}

impl Gate {
    /// Build a gate from a kind, its operands and its angles
    /// Gantree: from_parts(kind, qubits, params) -> Result<Self> // 조립
    pub fn from_parts(kind: GateKind, qubits: &[QubitId], params: &[Angle]) -> QpgfResult<Self> {
        if qubits.len() != kind.arity() {
            return Err(QpgfError::ArityMismatch {
                gate: kind.name().to_string(),
                expected: kind.arity(),
                found: qubits.len(),
            });
        }
        if params.len() != kind.num_params() {
            return Err(QpgfError::InvalidGateParameter(format!(
                "{} expects {} parameter(s), got {}",
                kind,
                kind.num_params(),
                params.len()
            )));
        }
        if kind.is_two_qubit() && qubits[0] == qubits[1] {
            return Err(QpgfError::InvalidGateParameter(format!(
                "{} applied twice to qubit {}",
                kind, qubits[0]
            )));
        }

        let q = qubits[0];
        let gate = match kind {
            GateKind::Id => Gate::Id(q),
            GateKind::X => Gate::X(q),
            GateKind::Y => Gate::Y(q),
            GateKind::Z => Gate::Z(q),
            GateKind::H => Gate::H(q),
            GateKind::S => Gate::S(q),
            GateKind::T => Gate::T(q),
            GateKind::Sx => Gate::Sx(q),
            GateKind::Rx => Gate::Rx(q, params[0]),
            GateKind::Ry => Gate::Ry(q, params[0]),
            GateKind::Rz => Gate::Rz(q, params[0]),
            GateKind::U => Gate::U(q, params[0], params[1], params[2]),
            GateKind::Cx => Gate::Cx(q, qubits[1]),
            GateKind::Cz => Gate::Cz(q, qubits[1]),
            GateKind::Ecr => Gate::Ecr(q, qubits[1]),
            GateKind::Rzz => Gate::Rzz(q, qubits[1], params[0]),
        };
        Ok(gate)
    }

    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Get the parameter-free kind tag
    /// Gantree: kind(&self) -> GateKind // 종류
    pub fn kind(&self) -> GateKind {
        match self {
            Gate::Id(_) => GateKind::Id,
            Gate::X(_) => GateKind::X,
            Gate::Y(_) => GateKind::Y,
            Gate::Z(_) => GateKind::Z,
            Gate::H(_) => GateKind::H,
            Gate::S(_) => GateKind::S,
            Gate::T(_) => GateKind::T,
            Gate::Sx(_) => GateKind::Sx,
            Gate::Rx(_, _) => GateKind::Rx,
            Gate::Ry(_, _) => GateKind::Ry,
            Gate::Rz(_, _) => GateKind::Rz,
            Gate::U(_, _, _, _) => GateKind::U,
            Gate::Cx(_, _) => GateKind::Cx,
            Gate::Cz(_, _) => GateKind::Cz,
            Gate::Ecr(_, _) => GateKind::Ecr,
            Gate::Rzz(_, _, _) => GateKind::Rzz,
        }
    }

    /// Get qubits involved in this gate
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::Id(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::H(q)
            | Gate::S(q)
            | Gate::T(q)
            | Gate::Sx(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::U(q, _, _, _) => vec![*q],

            Gate::Cx(a, b) | Gate::Cz(a, b) | Gate::Ecr(a, b) | Gate::Rzz(a, b, _) => {
                vec![*a, *b]
            }
        }
    }

    /// Get angle parameters
    pub fn params(&self) -> Vec<Angle> {
        match self {
            Gate::Rx(_, a) | Gate::Ry(_, a) | Gate::Rz(_, a) | Gate::Rzz(_, _, a) => vec![*a],
            Gate::U(_, theta, phi, lambda) => vec![*theta, *phi, *lambda],
            _ => vec![],
        }
    }

    /// Check if gate is two-qubit
    pub fn is_two_qubit(&self) -> bool {
        self.kind().is_two_qubit()
    }

    /// Convert to an OpenQASM 3 statement on register `q`
    /// Gantree: to_qasm(&self) -> String // QASM 변환
    pub fn to_qasm(&self) -> String {
        let name = self.kind().name().to_ascii_lowercase();
        let params = self.params();
        let operands: Vec<String> = self.qubits().iter().map(|q| format!("q[{}]", q)).collect();
        if params.is_empty() {
            format!("{} {};", name, operands.join(", "))
        } else {
            let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
            format!("{}({}) {};", name, params.join(", "), operands.join(", "))
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_qasm())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_qubits() {
        assert_eq!(Gate::H(0).qubits(), vec![0]);
        assert_eq!(Gate::Cx(0, 1).qubits(), vec![0, 1]);
        assert_eq!(Gate::Rzz(2, 3, 0.5).qubits(), vec![2, 3]);
    }

    #[test]
    fn test_kind_arity() {
        for kind in GateKind::ALL {
            let expected = matches!(
                kind,
                GateKind::Cx | GateKind::Cz | GateKind::Ecr | GateKind::Rzz
            );
            assert_eq!(kind.is_two_qubit(), expected, "{}", kind);
        }
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in GateKind::ALL {
            assert_eq!(GateKind::parse(kind.name()).unwrap(), kind);
            assert_eq!(kind.name().parse::<GateKind>().unwrap(), kind);
        }
        assert_eq!(GateKind::parse("cnot").unwrap(), GateKind::Cx);
        assert!(matches!(
            GateKind::parse("ccx"),
            Err(QpgfError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn test_from_parts() {
        let g = Gate::from_parts(GateKind::U, &[1], &[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(g, Gate::U(1, 0.1, 0.2, 0.3));
        assert_eq!(g.kind(), GateKind::U);

        assert!(matches!(
            Gate::from_parts(GateKind::Cx, &[0], &[]),
            Err(QpgfError::ArityMismatch { expected: 2, .. })
        ));
        assert!(Gate::from_parts(GateKind::Rz, &[0], &[]).is_err());
        assert!(Gate::from_parts(GateKind::Cz, &[1, 1], &[]).is_err());
    }

    #[test]
    fn test_gate_to_qasm() {
        assert_eq!(Gate::H(0).to_qasm(), "h q[0];");
        assert_eq!(Gate::Cx(0, 1).to_qasm(), "cx q[0], q[1];");
        assert_eq!(Gate::Rz(2, 0.5).to_qasm(), "rz(0.5) q[2];");
    }

    #[test]
    fn test_kind_serde_uppercase() {
        let json = serde_json::to_string(&GateKind::Sx).unwrap();
        assert_eq!(json, "\"SX\"");
        let kind: GateKind = serde_json::from_str("\"ECR\"").unwrap();
        assert_eq!(kind, GateKind::Ecr);
    }
}
