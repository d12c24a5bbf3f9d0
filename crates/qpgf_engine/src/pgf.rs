//! Probability generating functions
//!
//! Gantree: L4_Engine → Pgf
//!
//! A `Pgf` is the coefficient sequence of an error-count distribution:
//! `coeffs[k] = P(exactly k errors)`. It also records its support, the
//! qubits whose error sources have been folded into it.

use qpgf_core::{numeric, GateOp, Probability, QpgfError, QpgfResult, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Error-count distribution as polynomial coefficients
///
/// Deserialization goes through [`Pgf::from_coefficients`].
/// Gantree: Pgf // 확률생성함수
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPgf")]
pub struct Pgf {
    /// Gantree: coeffs: Vec<f64> // P(k)
    coeffs: Vec<f64>,

    /// Gantree: support: BTreeSet<QubitId> // 의존 큐빗
    support: BTreeSet<QubitId>,
}

/// Unchecked wire form of [`Pgf`]
#[derive(Deserialize)]
struct RawPgf {
    coeffs: Vec<f64>,
    support: BTreeSet<QubitId>,
}

impl TryFrom<RawPgf> for Pgf {
    type Error = QpgfError;

    fn try_from(raw: RawPgf) -> QpgfResult<Self> {
        Self::from_coefficients(raw.coeffs, raw.support)
    }
}

impl Pgf {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// The constant `1`: zero errors with certainty
    /// Gantree: identity() -> Self // 항등원
    pub fn identity() -> Self {
        Self {
            coeffs: vec![1.0],
            support: BTreeSet::new(),
        }
    }

    /// `(1-p) + p·x`
    /// Gantree: elementary(p, support) -> Self // 기본 PGF
    pub fn elementary(p: Probability, support: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            coeffs: vec![p.complement(), p.value()],
            support: support.into_iter().collect(),
        }
    }

    /// Elementary PGF from a raw probability
    pub fn bernoulli(p: f64) -> QpgfResult<Self> {
        Ok(Self::elementary(Probability::new(p)?, std::iter::empty()))
    }

    /// Elementary PGF of one gate's fault, supported on the gate's qubits
    /// Gantree: from_gate_op(&GateOp) -> Self // 게이트 → PGF
    pub fn from_gate_op(op: &GateOp) -> Self {
        Self::elementary(op.error_rate(), op.qubits().iter())
    }

    /// Wrap coefficients after validating them
    pub fn from_coefficients(
        coeffs: Vec<f64>,
        support: impl IntoIterator<Item = QubitId>,
    ) -> QpgfResult<Self> {
        let pgf = Self::from_raw(coeffs, support.into_iter().collect());
        pgf.validate(numeric::SUM_TOLERANCE)?;
        Ok(pgf)
    }

    pub(crate) fn from_raw(coeffs: Vec<f64>, support: BTreeSet<QubitId>) -> Self {
        Self { coeffs, support }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Coefficients, indexed by error count
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Consume into coefficients
    pub fn into_coefficients(self) -> Vec<f64> {
        self.coeffs
    }

    /// Qubits this distribution depends on
    pub fn support(&self) -> &BTreeSet<QubitId> {
        &self.support
    }

    /// Replace the support
    pub fn with_support(mut self, support: BTreeSet<QubitId>) -> Self {
        self.support = support;
        self
    }

    /// Polynomial degree (highest stored index)
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Number of stored coefficients
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Never true for a valid PGF
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// P(X = k), zero beyond the degree
    pub fn probability(&self, k: usize) -> f64 {
        self.coeffs.get(k).copied().unwrap_or(0.0)
    }

    /// Check for the certain-zero-errors distribution
    pub fn is_identity(&self) -> bool {
        self.coeffs.len() == 1 && (self.coeffs[0] - 1.0).abs() <= numeric::SUM_TOLERANCE
    }

    /// Sum of coefficients
    pub fn total_mass(&self) -> f64 {
        self.coeffs.iter().sum()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check non-negativity and normalization
    /// Gantree: validate(tol) -> Result<()> // 분포 검증
    pub fn validate(&self, tolerance: f64) -> QpgfResult<()> {
        validate_coefficients(&self.coeffs, tolerance)
    }

    /// Drop trailing exact zeros, keeping at least one coefficient
    pub fn trim(&mut self) {
        while self.coeffs.len() > 1 && self.coeffs.last() == Some(&0.0) {
            self.coeffs.pop();
        }
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// E[X]
    /// Gantree: mean() -> f64 // 평균
    pub fn mean(&self) -> f64 {
        self.coeffs
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum()
    }

    /// Var[X]
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        let second: f64 = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(k, p)| (k * k) as f64 * p)
            .sum();
        (second - mean * mean).max(0.0)
    }

    /// Most likely error count (lowest k on ties)
    pub fn mode(&self) -> usize {
        self.coeffs
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (k, &p)| {
                if p > best.1 {
                    (k, p)
                } else {
                    best
                }
            })
            .0
    }

    /// Largest single coefficient
    pub fn max_probability(&self) -> f64 {
        self.coeffs.iter().copied().fold(0.0, f64::max)
    }

    /// Highest error count with non-zero probability
    pub fn max_errors(&self) -> usize {
        self.coeffs.iter().rposition(|&p| p > 0.0).unwrap_or(0)
    }

    /// P(X <= k)
    /// Gantree: cdf(k) -> f64 // 누적분포
    pub fn cdf(&self, k: usize) -> f64 {
        self.coeffs.iter().take(k.saturating_add(1)).sum::<f64>().min(1.0)
    }

    /// P(X > k)
    pub fn survival(&self, k: usize) -> f64 {
        self.coeffs.iter().skip(k.saturating_add(1)).sum()
    }

    /// Total mass of coefficients below `threshold`
    pub fn tail_mass(&self, threshold: f64) -> f64 {
        self.coeffs.iter().filter(|&&p| p < threshold).sum()
    }
}

/// Check that `coeffs` is a distribution: non-empty, finite, non-negative,
/// summing to one within `tolerance`
pub fn validate_coefficients(coeffs: &[f64], tolerance: f64) -> QpgfResult<()> {
    if coeffs.is_empty() {
        return Err(QpgfError::invalid_distribution("no coefficients"));
    }
    if let Some((k, &c)) = coeffs
        .iter()
        .enumerate()
        .find(|(_, c)| !c.is_finite() || **c < 0.0)
    {
        return Err(QpgfError::invalid_distribution(format!(
            "coefficient {} is {}",
            k, c
        )));
    }
    let sum: f64 = coeffs.iter().sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(QpgfError::invalid_distribution(format!(
            "coefficients sum to {} (tolerance {:e})",
            sum, tolerance
        )));
    }
    Ok(())
}

impl Default for Pgf {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Pgf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pgf[")?;
        for (k, c) in self.coeffs.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.6}", c)?;
        }
        write!(f, "]")?;
        if !self.support.is_empty() {
            let qubits: Vec<String> = self.support.iter().map(|q| q.to_string()).collect();
            write!(f, " on {{{}}}", qubits.join(","))?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
