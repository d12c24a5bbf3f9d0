//! Joint error counts over a qubit subset
//!
//! Gantree: L4_Engine → JointPgf
//!
//! A sparse multivariate PGF: each state is a vector of per-qubit error
//! counts (one slot per tracked qubit). Every gate touching the subset adds
//! one two-point factor that raises the count of each tracked qubit it acts
//! on. The state space grows with the product of per-qubit degrees, so this
//! is meant for small subsets.

use crate::pgf::Pgf;
use log::debug;
use qpgf_core::{GateSequence, QubitId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Per-qubit error-count vector
pub type CountVector = Vec<usize>;

/// Joint distribution of per-qubit error counts
/// Gantree: JointPgf // 결합 PGF
#[derive(Debug, Clone, PartialEq)]
pub struct JointPgf {
    /// Tracked qubits, ascending; slot `i` of every state belongs to `qubits[i]`
    qubits: Vec<QubitId>,

    /// State → probability
    states: BTreeMap<CountVector, f64>,
}

impl JointPgf {
    /// Build from a resolved sequence, tracking `qubits`
    /// Gantree: from_sequence(seq, qubits, skip_zero) -> Self // 결합 분포 구성
    pub fn from_sequence(seq: &GateSequence, qubits: &BTreeSet<QubitId>, skip_zero_rates: bool) -> Self {
        let tracked: Vec<QubitId> = qubits.iter().copied().collect();
        let mut states = BTreeMap::new();
        states.insert(vec![0; tracked.len()], 1.0);
        let mut factors = 0usize;

        for op in seq {
            let p = op.error_rate();
            if skip_zero_rates && p.is_zero() {
                continue;
            }
            let step: Vec<usize> = tracked.iter().map(|&q| usize::from(op.touches(q))).collect();
            if step.iter().all(|&s| s == 0) {
                continue;
            }
            factors += 1;

            let mut next: BTreeMap<CountVector, f64> = BTreeMap::new();
            for (state, prob) in &states {
                *next.entry(state.clone()).or_insert(0.0) += prob * p.complement();
                let raised: CountVector = state.iter().zip(&step).map(|(k, s)| k + s).collect();
                *next.entry(raised).or_insert(0.0) += prob * p.value();
            }
            states = next;
        }

        debug!(
            "joint pgf over {} qubits: {} factors, {} states",
            tracked.len(),
            factors,
            states.len()
        );
        Self {
            qubits: tracked,
            states,
        }
    }

    /// Tracked qubits
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Number of stored states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Never true after construction
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Probability of one count vector (zero if absent)
    pub fn probability(&self, counts: &[usize]) -> f64 {
        self.states.get(counts).copied().unwrap_or(0.0)
    }

    /// Iterate states in lexicographic order
    pub fn states(&self) -> impl Iterator<Item = (&CountVector, f64)> + '_ {
        self.states.iter().map(|(k, &p)| (k, p))
    }

    /// Marginal error-count PGF of one tracked qubit
    /// Gantree: marginal(q) -> Option<Pgf> // 주변 분포
    pub fn marginal(&self, qubit: QubitId) -> Option<Pgf> {
        let slot = self.qubits.iter().position(|&q| q == qubit)?;
        let max_k = self.states.keys().map(|s| s[slot]).max().unwrap_or(0);
        let mut coeffs = vec![0.0; max_k + 1];
        for (state, p) in &self.states {
            coeffs[state[slot]] += p;
        }
        Some(Pgf::from_raw(coeffs, [qubit].into()))
    }

    /// Distribution of the summed qubit-local counts
    ///
    /// A gate acting on two tracked qubits adds two here, unlike the global
    /// PGF where each gate fault counts once.
    /// Gantree: total() -> Pgf // 합산 분포
    pub fn total(&self) -> Pgf {
        let max_total = self.states.keys().map(|s| s.iter().sum::<usize>()).max().unwrap_or(0);
        let mut coeffs = vec![0.0; max_total + 1];
        for (state, p) in &self.states {
            coeffs[state.iter().sum::<usize>()] += p;
        }
        Pgf::from_raw(coeffs, self.qubits.iter().copied().collect())
    }
}

impl fmt::Display for JointPgf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JointPgf(qubits={:?}, states={})", self.qubits, self.states.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
