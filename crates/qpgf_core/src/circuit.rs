//! Quantum circuit structure for QPGF
//!
//! Gantree: L1_Circuit → Circuit
//!
//! Holds the logical gate list of a circuit before basis resolution and
//! parses OpenQASM 2/3 source into it.

use crate::error::{QpgfError, QpgfResult};
use crate::gate::{Gate, GateKind};
use crate::types::{Angle, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Quantum circuit
/// Gantree: Circuit // 회로 구조체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Number of qubits
    /// Gantree: num_qubits: usize // 큐비트 수
    num_qubits: usize,

    /// Gate sequence
    /// Gantree: gates: Vec<Gate> // 게이트 목록
    gates: Vec<Gate>,

    /// Optional circuit name
    name: Option<String>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: None,
        }
    }

    /// Create a circuit with a name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// Create from a vector of gates
    pub fn from_gates(num_qubits: usize, gates: Vec<Gate>) -> QpgfResult<Self> {
        let mut circuit = Self::new(num_qubits);
        circuit.add_gates(gates)?;
        Ok(circuit)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate to the circuit
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> QpgfResult<()> {
        for qubit in gate.qubits() {
            if qubit >= self.num_qubits {
                return Err(QpgfError::GateQubitMismatch {
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Add multiple gates
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> QpgfResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set circuit name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Calculate circuit depth (longest path)
    /// Gantree: depth(&self) -> usize // 깊이 계산
    pub fn depth(&self) -> usize {
        let mut qubit_depths = vec![0usize; self.num_qubits];

        for gate in &self.gates {
            let qubits = gate.qubits();
            let max_depth = qubits
                .iter()
                .filter_map(|&q| qubit_depths.get(q))
                .max()
                .copied()
                .unwrap_or(0);
            for q in qubits {
                qubit_depths[q] = max_depth + 1;
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Get total gate count
    /// Gantree: gate_count(&self) -> usize // 게이트 수
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Count single-qubit gates
    pub fn count_1q(&self) -> usize {
        self.gates.iter().filter(|g| !g.is_two_qubit()).count()
    }

    /// Count two-qubit gates
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Gate counts per kind
    pub fn kind_counts(&self) -> BTreeMap<GateKind, usize> {
        let mut counts = BTreeMap::new();
        for gate in &self.gates {
            *counts.entry(gate.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Get qubits used in the circuit
    pub fn used_qubits(&self) -> BTreeSet<QubitId> {
        self.gates.iter().flat_map(|g| g.qubits()).collect()
    }

    // ========================================================================
    // QASM Conversion
    // ========================================================================

    /// Convert to OpenQASM 3.0 string
    /// Gantree: to_qasm(&self) -> String // QASM3 출력
    pub fn to_qasm(&self) -> String {
        let mut lines = vec![
            "OPENQASM 3.0;".to_string(),
            "include \"stdgates.inc\";".to_string(),
            format!("qubit[{}] q;", self.num_qubits),
        ];
        lines.extend(self.gates.iter().map(Gate::to_qasm));
        lines.join("\n")
    }

    /// Parse OpenQASM 2.0 / 3.0 source
    ///
    /// Register declarations (`qubit[n] q;`, `qreg q[n];`) are concatenated
    /// in declaration order. Headers, includes, classical declarations,
    /// measurements, barriers, resets and comments are skipped. Any other
    /// statement must be a supported gate.
    /// Gantree: from_qasm(s) -> Result<Self> // QASM 파싱
    pub fn from_qasm(qasm: &str) -> QpgfResult<Self> {
        let mut registers: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        let mut num_qubits = 0;
        let mut gates = Vec::new();

        for raw in qasm.lines() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            for statement in line.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                if let Some((name, size)) = parse_qubit_declaration(statement)? {
                    registers.insert(name, (num_qubits, size));
                    num_qubits += size;
                    continue;
                }

                if is_skipped_statement(statement) {
                    continue;
                }

                gates.push(parse_gate_statement(statement, &registers)?);
            }
        }

        if registers.is_empty() {
            return Err(QpgfError::InvalidQasm("No qubit declaration found".into()));
        }

        Circuit::from_gates(num_qubits, gates)
    }
}

// ============================================================================
// QASM Parsing Helpers
// ============================================================================

const SKIPPED_KEYWORDS: &[&str] = &[
    "OPENQASM", "include", "bit", "creg", "measure", "barrier", "reset", "gate", "input",
    "output",
];

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn is_skipped_statement(statement: &str) -> bool {
    let head = statement
        .split(|c: char| c.is_whitespace() || c == '[' || c == '(')
        .next()
        .unwrap_or("");
    // `c[0] = measure q[0]` in QASM 3
    SKIPPED_KEYWORDS.contains(&head) || statement.contains("= measure") || statement == "}"
}

/// `qubit[5] q` (QASM 3), `qubit q` (QASM 3 single) or `qreg q[5]` (QASM 2)
fn parse_qubit_declaration(statement: &str) -> QpgfResult<Option<(String, usize)>> {
    if let Some(rest) = statement.strip_prefix("qubit") {
        let rest = rest.trim();
        if let Some(inner) = rest.strip_prefix('[') {
            let end = inner
                .find(']')
                .ok_or_else(|| QpgfError::InvalidQasm(format!("Bad declaration: {}", statement)))?;
            let size = parse_index(&inner[..end], statement)?;
            let name = inner[end + 1..].trim().to_string();
            return Ok(Some((name, size)));
        }
        return Ok(Some((rest.to_string(), 1)));
    }

    if let Some(rest) = statement.strip_prefix("qreg") {
        let rest = rest.trim();
        let (name, size) = parse_indexed(rest, statement)?;
        return Ok(Some((name.to_string(), size)));
    }

    Ok(None)
}

fn parse_gate_statement(
    statement: &str,
    registers: &BTreeMap<String, (usize, usize)>,
) -> QpgfResult<Gate> {
    // Split "name(params) operands" / "name operands"
    let (name, params, operands) = match statement.find('(') {
        Some(open) if open < statement.find(' ').unwrap_or(usize::MAX) => {
            let close = statement.rfind(')').ok_or_else(|| {
                QpgfError::InvalidQasm(format!("Missing closing paren: {}", statement))
            })?;
            let params = statement[open + 1..close]
                .split(',')
                .map(|p| parse_angle(p.trim()))
                .collect::<QpgfResult<Vec<Angle>>>()?;
            (&statement[..open], params, &statement[close + 1..])
        }
        _ => {
            let mut parts = statement.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or("");
            let operands = parts.next().unwrap_or("");
            (name, Vec::new(), operands)
        }
    };

    let kind = GateKind::parse(name)?;
    let qubits = operands
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|operand| resolve_operand(operand, registers, statement))
        .collect::<QpgfResult<Vec<QubitId>>>()?;

    Gate::from_parts(kind, &qubits, &params)
}

fn resolve_operand(
    operand: &str,
    registers: &BTreeMap<String, (usize, usize)>,
    statement: &str,
) -> QpgfResult<QubitId> {
    let (name, index) = if operand.contains('[') {
        parse_indexed(operand, statement)?
    } else {
        (operand, 0)
    };

    let &(offset, size) = registers.get(name).ok_or_else(|| {
        QpgfError::InvalidQasm(format!("Unknown register '{}' in: {}", name, statement))
    })?;

    if index >= size {
        return Err(QpgfError::GateQubitMismatch {
            qubit: index,
            num_qubits: size,
        });
    }
    Ok(offset + index)
}

/// Parse `name[index]`
fn parse_indexed<'a>(s: &'a str, statement: &str) -> QpgfResult<(&'a str, usize)> {
    let open = s
        .find('[')
        .ok_or_else(|| QpgfError::InvalidQasm(format!("Expected '[': {}", statement)))?;
    let close = s
        .find(']')
        .ok_or_else(|| QpgfError::InvalidQasm(format!("Expected ']': {}", statement)))?;
    let index = parse_index(&s[open + 1..close], statement)?;
    Ok((s[..open].trim(), index))
}

fn parse_index(s: &str, statement: &str) -> QpgfResult<usize> {
    s.trim()
        .parse()
        .map_err(|_| QpgfError::InvalidQasm(format!("Bad index '{}' in: {}", s, statement)))
}

/// Evaluate an angle expression: numbers, `pi`/`π`, `+ - * /`, parentheses
/// Gantree: parse_angle(s) -> Result<Angle> // 각도 파싱
pub fn parse_angle(expr: &str) -> QpgfResult<Angle> {
    let tokens: Vec<char> = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parser = AngleParser { tokens, pos: 0 };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() || !value.is_finite() {
        return Err(QpgfError::InvalidGateParameter(expr.to_string()));
    }
    Ok(value)
}

struct AngleParser {
    tokens: Vec<char>,
    pos: usize,
}

impl AngleParser {
    fn peek(&self) -> Option<char> {
        self.tokens.get(self.pos).copied()
    }

    fn error(&self) -> QpgfError {
        QpgfError::InvalidGateParameter(self.tokens.iter().collect())
    }

    fn expression(&mut self) -> QpgfResult<f64> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> QpgfResult<f64> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == '*' { value * rhs } else { value / rhs };
        }
        Ok(value)
    }

    fn factor(&mut self) -> QpgfResult<f64> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some('+') => {
                self.pos += 1;
                self.factor()
            }
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                if self.peek() != Some(')') {
                    return Err(self.error());
                }
                self.pos += 1;
                Ok(value)
            }
            Some('π') => {
                self.pos += 1;
                Ok(std::f64::consts::PI)
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
                    self.pos += 1;
                }
                let ident: String = self.tokens[start..self.pos].iter().collect();
                match ident.as_str() {
                    "pi" => Ok(std::f64::consts::PI),
                    "tau" => Ok(std::f64::consts::TAU),
                    _ => Err(self.error()),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    let exponent_sign = (c == '-' || c == '+')
                        && matches!(self.tokens.get(self.pos - 1), Some('e' | 'E'));
                    if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                let literal: String = self.tokens[start..self.pos].iter().collect();
                literal.parse().map_err(|_| self.error())
            }
            _ => Err(self.error()),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} gates)",
            self.num_qubits,
            self.gates.len()
        )?;
        writeln!(f, "  Depth: {}", self.depth())?;
        writeln!(f, "  1Q gates: {}", self.count_1q())?;
        writeln!(f, "  2Q gates: {}", self.count_2q())?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_circuit_new() {
        let circuit = Circuit::new(5);
        assert_eq!(circuit.num_qubits(), 5);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_add_gate_out_of_range() {
        let mut circuit = Circuit::new(3);
        assert!(circuit.add_gate(Gate::H(0)).is_ok());
        assert!(matches!(
            circuit.add_gate(Gate::H(5)),
            Err(QpgfError::GateQubitMismatch { qubit: 5, .. })
        ));
    }

    #[test]
    fn test_circuit_depth_and_counts() {
        let circuit = Circuit::from_gates(
            3,
            vec![Gate::H(0), Gate::H(1), Gate::Cx(0, 1), Gate::H(2)],
        )
        .unwrap();
        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.count_1q(), 3);
        assert_eq!(circuit.count_2q(), 1);
        assert_eq!(circuit.kind_counts()[&GateKind::H], 3);
    }

    #[test]
    fn test_from_qasm3() {
        let qasm = r#"
            OPENQASM 3.0;
            include "stdgates.inc";
            bit[2] c;
            qubit[2] q;
            ry(0.1) q[0];
            ry(-0.2) q[1];
            cx q[0], q[1];
            rz(pi/2) q[0];
            u(0.5, 0.5, 0.5) q[1];
            c[0] = measure q[0];
        "#;

        let circuit = Circuit::from_qasm(qasm).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.gate_count(), 5);
        assert_eq!(circuit.gates()[2], Gate::Cx(0, 1));
        match circuit.gates()[3] {
            Gate::Rz(0, angle) => assert_abs_diff_eq!(angle, PI / 2.0, epsilon = 1e-12),
            ref other => panic!("unexpected gate {:?}", other),
        }
    }

    #[test]
    fn test_from_qasm2_multiple_registers() {
        let qasm = "OPENQASM 2.0;\nqreg a[2];\nqreg b[3];\ncreg c[5];\nh a[1];\ncx a[0],b[2]; // entangle\n";
        let circuit = Circuit::from_qasm(qasm).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.gates(), &[Gate::H(1), Gate::Cx(0, 4)]);
    }

    #[test]
    fn test_from_qasm_errors() {
        assert!(matches!(
            Circuit::from_qasm("h q[0];"),
            Err(QpgfError::InvalidQasm(_))
        ));
        assert!(matches!(
            Circuit::from_qasm("qubit[1] q;\nccx q[0];"),
            Err(QpgfError::UnsupportedGate(_))
        ));
        assert!(matches!(
            Circuit::from_qasm("qubit[1] q;\nx q[3];"),
            Err(QpgfError::GateQubitMismatch { .. })
        ));
        assert!(matches!(
            Circuit::from_qasm("qubit[1] q;\nrz(theta) q[0];"),
            Err(QpgfError::InvalidGateParameter(_))
        ));
    }

    #[test]
    fn test_qasm_roundtrip() {
        let original = Circuit::from_gates(
            3,
            vec![Gate::H(0), Gate::Cx(0, 1), Gate::Rz(2, 1.25), Gate::Ecr(1, 2)],
        )
        .unwrap();
        let parsed = Circuit::from_qasm(&original.to_qasm()).unwrap();
        assert_eq!(parsed.gates(), original.gates());
    }

    #[test]
    fn test_parse_angle() {
        assert_abs_diff_eq!(parse_angle("pi").unwrap(), PI);
        assert_abs_diff_eq!(parse_angle("-pi/2").unwrap(), -PI / 2.0);
        assert_abs_diff_eq!(parse_angle("2*pi").unwrap(), 2.0 * PI);
        assert_abs_diff_eq!(parse_angle("(pi + 1) / 2").unwrap(), (PI + 1.0) / 2.0);
        assert_abs_diff_eq!(parse_angle("1.5e-3").unwrap(), 1.5e-3);
        assert_abs_diff_eq!(parse_angle("π/4").unwrap(), PI / 4.0);
        assert!(parse_angle("1/0").is_err());
        assert!(parse_angle("pi pi").is_err());
    }
}
