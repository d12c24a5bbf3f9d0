//! Distribution reports and summary statistics
//!
//! Gantree: L4_Engine → DistributionReport
//!
//! A report is built once per query and handed to the rendering layer.

use crate::pgf::Pgf;
use qpgf_core::{summary, QpgfResult, QpgfWarning, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Summary
// ============================================================================

/// Summary statistics of one PGF
/// Gantree: PgfSummary // 요약 통계
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgfSummary {
    /// E[X]
    pub mean: f64,
    /// Var[X]
    pub variance: f64,
    /// sqrt(Var[X])
    pub std_dev: f64,
    /// Most likely error count
    pub mode: usize,
    /// Probability at the mode
    pub max_prob: f64,
    /// Highest error count with non-zero probability
    pub support: usize,
    /// Threshold used for `tail_prob`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_threshold: Option<f64>,
    /// Mass held by coefficients below `tail_threshold`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_prob: Option<f64>,
}

impl PgfSummary {
    /// Summarize a PGF; `None` skips the tail statistic
    /// Gantree: from_pgf(pgf, tail) -> Self // 요약
    pub fn from_pgf(pgf: &Pgf, tail_threshold: Option<f64>) -> Self {
        let variance = pgf.variance();
        Self {
            mean: pgf.mean(),
            variance,
            std_dev: variance.sqrt(),
            mode: pgf.mode(),
            max_prob: pgf.max_probability(),
            support: pgf.max_errors(),
            tail_threshold,
            tail_prob: tail_threshold.map(|t| pgf.tail_mass(t)),
        }
    }
}

impl From<&Pgf> for PgfSummary {
    fn from(pgf: &Pgf) -> Self {
        Self::from_pgf(pgf, Some(summary::DEFAULT_TAIL_THRESHOLD))
    }
}

impl fmt::Display for PgfSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean: {:.4}", self.mean)?;
        writeln!(f, "Variance: {:.4}", self.variance)?;
        writeln!(f, "Max prob: {:.4}", self.max_prob)?;
        writeln!(f, "Mode: {}", self.mode)?;
        write!(f, "Support: {}", self.support)?;
        if let (Some(t), Some(p)) = (self.tail_threshold, self.tail_prob) {
            write!(f, "\nTail prob (< {}): {:.4}", t, p)?;
        }
        Ok(())
    }
}

// ============================================================================
// Report
// ============================================================================

/// Global and per-qubit error-count distributions of one circuit
/// Gantree: DistributionReport // 분포 보고서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Every gate fault counted once
    pub global: Pgf,

    /// Faults of gates touching each qubit
    pub per_qubit: BTreeMap<QubitId, Pgf>,

    /// Non-fatal conditions met while computing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QpgfWarning>,
}

impl DistributionReport {
    /// Assemble a report
    pub fn new(global: Pgf, per_qubit: BTreeMap<QubitId, Pgf>) -> Self {
        Self {
            global,
            per_qubit,
            warnings: Vec::new(),
        }
    }

    /// Attach a warning
    pub fn with_warning(mut self, warning: QpgfWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Check whether the report came from an empty sequence
    pub fn is_empty_input(&self) -> bool {
        self.warnings.contains(&QpgfWarning::EmptyInputWarning)
    }

    /// Qubits with a per-qubit PGF
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.per_qubit.keys().copied()
    }

    /// PGF of one qubit
    pub fn qubit(&self, qubit: QubitId) -> Option<&Pgf> {
        self.per_qubit.get(&qubit)
    }

    /// Summary of the global PGF
    pub fn global_summary(&self, tail_threshold: Option<f64>) -> PgfSummary {
        PgfSummary::from_pgf(&self.global, tail_threshold)
    }

    /// Summaries of every per-qubit PGF
    pub fn qubit_summaries(&self, tail_threshold: Option<f64>) -> BTreeMap<QubitId, PgfSummary> {
        self.per_qubit
            .iter()
            .map(|(&q, pgf)| (q, PgfSummary::from_pgf(pgf, tail_threshold)))
            .collect()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QpgfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> QpgfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DistributionReport(global degree {}, mean {:.4}, {} qubits",
            self.global.degree(),
            self.global.mean(),
            self.per_qubit.len()
        )?;
        for w in &self.warnings {
            write!(f, ", {}", w)?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn scenario() -> DistributionReport {
        let global = Pgf::from_coefficients(vec![0.72, 0.26, 0.02], [0]).unwrap();
        let mut per_qubit = BTreeMap::new();
        per_qubit.insert(0, global.clone());
        DistributionReport::new(global, per_qubit)
    }

    #[test]
    fn test_summary_values() {
        let s = scenario().global_summary(Some(0.05));
        assert_abs_diff_eq!(s.mean, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(s.std_dev, 0.5, epsilon = 1e-12);
        assert_eq!(s.mode, 0);
        assert_eq!(s.support, 2);
        assert_abs_diff_eq!(s.tail_prob.unwrap(), 0.02);
        assert!(s.to_string().contains("Tail prob (< 0.05): 0.0200"));
    }

    #[test]
    fn test_summary_without_tail() {
        let s = PgfSummary::from_pgf(&Pgf::identity(), None);
        assert!(s.tail_prob.is_none());
        assert_eq!(s.support, 0);
        assert!(!s.to_string().contains("Tail"));
    }

    #[test]
    fn test_json_roundtrip() {
        let report = scenario().with_warning(QpgfWarning::EmptyInputWarning);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"per_qubit\""));
        let restored = DistributionReport::from_json(&json).unwrap();
        assert_eq!(restored, report);
        assert!(restored.is_empty_input());
    }

    #[test]
    fn test_json_rejects_bad_coefficients() {
        let negative = r#"{"global":{"coeffs":[1.1,-0.1],"support":[]},"per_qubit":{}}"#;
        let err = DistributionReport::from_json(negative).unwrap_err();
        assert!(err.to_string().contains("Invalid distribution"));

        let unnormalized = r#"{"global":{"coeffs":[1.0],"support":[]},"per_qubit":{"0":{"coeffs":[0.5,0.4],"support":[0]}}}"#;
        assert!(DistributionReport::from_json(unnormalized).is_err());

        let valid = r#"{"global":{"coeffs":[0.9,0.1],"support":[0]},"per_qubit":{}}"#;
        assert_eq!(DistributionReport::from_json(valid).unwrap().global.degree(), 1);
    }

    #[test]
    fn test_qubit_summaries() {
        let summaries = scenario().qubit_summaries(None);
        assert_eq!(summaries.len(), 1);
        assert_abs_diff_eq!(summaries[&0].variance, 0.25, epsilon = 1e-12);
    }
}
