//! Resolved gate operations
//!
//! Gantree: L1_Circuit → GateOp
//!
//! A `GateOp` is a gate after basis resolution: a kind tag, the one or two
//! qubits it touches, and the error probability looked up for it. The PGF
//! engine only ever sees a `GateSequence` of these.

use crate::error::{QpgfError, QpgfResult};
use crate::gate::GateKind;
use crate::types::{ErrorRate, Probability, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// QubitSpan
// ============================================================================

/// Ordered set of one or two distinct qubits
///
/// Deserialization goes through [`QubitSpan::from_slice`], so a pair that
/// repeats a qubit is rejected.
/// Gantree: QubitSpan // 1Q | 2Q
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawQubitSpan")]
pub enum QubitSpan {
    /// Single qubit
    One(QubitId),
    /// Qubit pair in operand order
    Two(QubitId, QubitId),
}

impl QubitSpan {
    /// Build from an operand slice of length 1 or 2
    pub fn from_slice(qubits: &[QubitId]) -> QpgfResult<Self> {
        match *qubits {
            [q] => Ok(QubitSpan::One(q)),
            [a, b] if a != b => Ok(QubitSpan::Two(a, b)),
            [a, _] => Err(QpgfError::InvalidGateParameter(format!(
                "qubit pair repeats qubit {}",
                a
            ))),
            _ => Err(QpgfError::InvalidGateParameter(format!(
                "expected 1 or 2 qubits, got {}",
                qubits.len()
            ))),
        }
    }

    /// Number of qubits
    pub fn len(&self) -> usize {
        match self {
            QubitSpan::One(_) => 1,
            QubitSpan::Two(_, _) => 2,
        }
    }

    /// Always false; a span holds at least one qubit
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check membership
    /// Gantree: contains(q) -> bool // 포함 여부
    pub fn contains(&self, qubit: QubitId) -> bool {
        match *self {
            QubitSpan::One(q) => q == qubit,
            QubitSpan::Two(a, b) => a == qubit || b == qubit,
        }
    }

    /// Iterate qubits in operand order
    pub fn iter(&self) -> impl Iterator<Item = QubitId> {
        let (first, second) = match *self {
            QubitSpan::One(q) => (q, None),
            QubitSpan::Two(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }

    /// Collect into a vector
    pub fn to_vec(&self) -> Vec<QubitId> {
        self.iter().collect()
    }

    /// Largest qubit index in the span
    pub fn max_qubit(&self) -> QubitId {
        match *self {
            QubitSpan::One(q) => q,
            QubitSpan::Two(a, b) => a.max(b),
        }
    }
}

/// Unchecked wire form of [`QubitSpan`]
#[derive(Deserialize)]
enum RawQubitSpan {
    One(QubitId),
    Two(QubitId, QubitId),
}

impl TryFrom<RawQubitSpan> for QubitSpan {
    type Error = QpgfError;

    fn try_from(raw: RawQubitSpan) -> QpgfResult<Self> {
        match raw {
            RawQubitSpan::One(q) => Self::from_slice(&[q]),
            RawQubitSpan::Two(a, b) => Self::from_slice(&[a, b]),
        }
    }
}

impl fmt::Display for QubitSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QubitSpan::One(q) => write!(f, "q[{}]", q),
            QubitSpan::Two(a, b) => write!(f, "q[{}], q[{}]", a, b),
        }
    }
}

// ============================================================================
// GateOp
// ============================================================================

/// One independent Bernoulli error source
///
/// Deserialization goes through [`GateOp::new`], so the span must match the
/// kind's arity.
/// Gantree: GateOp // 게이트 연산
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGateOp")]
pub struct GateOp {
    kind: GateKind,
    qubits: QubitSpan,
    error_rate: ErrorRate,
}

/// Unchecked wire form of [`GateOp`]
#[derive(Deserialize)]
struct RawGateOp {
    kind: GateKind,
    qubits: QubitSpan,
    error_rate: ErrorRate,
}

impl TryFrom<RawGateOp> for GateOp {
    type Error = QpgfError;

    fn try_from(raw: RawGateOp) -> QpgfResult<Self> {
        Self::new(raw.kind, raw.qubits, raw.error_rate)
    }
}

impl GateOp {
    /// Create a gate op, checking the span against the kind's arity
    /// Gantree: new(kind, span, p) -> Result<Self> // 생성+검증
    pub fn new(kind: GateKind, qubits: QubitSpan, error_rate: ErrorRate) -> QpgfResult<Self> {
        if qubits.len() != kind.arity() {
            return Err(QpgfError::ArityMismatch {
                gate: kind.name().to_string(),
                expected: kind.arity(),
                found: qubits.len(),
            });
        }
        Ok(Self {
            kind,
            qubits,
            error_rate,
        })
    }

    /// Single-qubit op from a raw rate
    pub fn single(kind: GateKind, qubit: QubitId, rate: f64) -> QpgfResult<Self> {
        Self::new(kind, QubitSpan::One(qubit), Probability::new(rate)?)
    }

    /// Two-qubit op from a raw rate
    pub fn pair(kind: GateKind, a: QubitId, b: QubitId, rate: f64) -> QpgfResult<Self> {
        Self::new(kind, QubitSpan::from_slice(&[a, b])?, Probability::new(rate)?)
    }

    /// Gate kind
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Touched qubits
    pub fn qubits(&self) -> QubitSpan {
        self.qubits
    }

    /// Resolved error probability
    pub fn error_rate(&self) -> ErrorRate {
        self.error_rate
    }

    /// Check whether this op touches `qubit`
    pub fn touches(&self, qubit: QubitId) -> bool {
        self.qubits.contains(qubit)
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (p={})", self.kind, self.qubits, self.error_rate)
    }
}

// ============================================================================
// GateSequence
// ============================================================================

/// Ordered list of resolved gate ops
/// Gantree: GateSequence // 게이트 시퀀스
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateSequence {
    ops: Vec<GateOp>,
}

impl GateSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Wrap existing ops
    pub fn from_ops(ops: Vec<GateOp>) -> Self {
        Self { ops }
    }

    /// Append an op
    pub fn push(&mut self, op: GateOp) {
        self.ops.push(op);
    }

    /// Borrow the ops
    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    /// Iterate the ops
    pub fn iter(&self) -> std::slice::Iter<'_, GateOp> {
        self.ops.iter()
    }

    /// Number of ops
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Qubits touched by at least one op, ascending
    /// Gantree: used_qubits(&self) -> BTreeSet // 사용 큐비트
    pub fn used_qubits(&self) -> BTreeSet<QubitId> {
        self.ops.iter().flat_map(|op| op.qubits().iter()).collect()
    }

    /// Ops whose support includes `qubit`, in sequence order
    /// Gantree: touching(q) -> Iterator // 큐비트 필터
    pub fn touching(&self, qubit: QubitId) -> impl Iterator<Item = &GateOp> + '_ {
        self.ops.iter().filter(move |op| op.touches(qubit))
    }

    /// Count ops by arity: (single-qubit, two-qubit)
    pub fn arity_counts(&self) -> (usize, usize) {
        let two = self.ops.iter().filter(|op| op.kind().is_two_qubit()).count();
        (self.ops.len() - two, two)
    }

    /// Expected number of faults, Σ p
    pub fn expected_errors(&self) -> f64 {
        self.ops.iter().map(|op| op.error_rate().value()).sum()
    }
}

impl FromIterator<GateOp> for GateSequence {
    fn from_iter<I: IntoIterator<Item = GateOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GateSequence {
    type Item = &'a GateOp;
    type IntoIter = std::slice::Iter<'a, GateOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl IntoIterator for GateSequence {
    type Item = GateOp;
    type IntoIter = std::vec::IntoIter<GateOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl fmt::Display for GateSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (one, two) = self.arity_counts();
        write!(
            f,
            "GateSequence({} ops: {} 1Q, {} 2Q, {} qubits)",
            self.len(),
            one,
            two,
            self.used_qubits().len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
