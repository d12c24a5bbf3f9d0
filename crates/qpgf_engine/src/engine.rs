//! PGF engine
//!
//! Gantree: L4_Engine → PgfEngine
//!
//! Stateless driver over a resolved [`GateSequence`]:
//! - global PGF: every GateOp contributes its elementary factor once
//! - per-qubit PGF: built only from GateOps touching that qubit, so a
//!   two-qubit gate's factor appears in both of its qubits' composites
//!
//! The engine holds nothing but its configuration; concurrent callers get
//! identical, independent results.

use crate::compose::compose_all;
use crate::config::EngineConfig;
use crate::joint::JointPgf;
use crate::pgf::Pgf;
use crate::report::DistributionReport;
use log::{debug, trace, warn};
use qpgf_core::{GateOp, GateSequence, QpgfResult, QpgfWarning, QubitId};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// PGF engine
/// Gantree: PgfEngine // PGF 엔진
#[derive(Debug, Clone, Default)]
pub struct PgfEngine {
    config: EngineConfig,
}

impl PgfEngine {
    /// Create an engine after validating its configuration
    pub fn new(config: EngineConfig) -> QpgfResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Distribution of the total number of gate faults
    /// Gantree: compute_global(seq) -> Result<Pgf> // 전역 PGF
    pub fn compute_global(&self, seq: &GateSequence) -> QpgfResult<Pgf> {
        debug!(
            "global pgf over {} ops ({:?} reduction)",
            seq.len(),
            self.config.reduction
        );
        self.compose_ops(seq.iter())
    }

    /// Per-qubit distributions for the requested qubits
    ///
    /// A requested qubit that no gate touches gets the identity PGF.
    /// Gantree: compute_per_qubit(seq, qubits) -> Result<BTreeMap> // 큐빗별 PGF
    pub fn compute_per_qubit(
        &self,
        seq: &GateSequence,
        qubits: &BTreeSet<QubitId>,
    ) -> QpgfResult<BTreeMap<QubitId, Pgf>> {
        let buckets = self.bucket_by_qubit(seq, qubits);
        debug!(
            "per-qubit pgfs for {} qubits ({})",
            buckets.len(),
            if self.config.parallel { "parallel" } else { "serial" }
        );

        let compute = |(q, ops): (&QubitId, &Vec<&GateOp>)| -> QpgfResult<(QubitId, Pgf)> {
            trace!("qubit {}: {} ops", q, ops.len());
            Ok((*q, self.compose_ops(ops.iter().copied())?))
        };

        if self.config.parallel {
            buckets.par_iter().map(compute).collect()
        } else {
            buckets.iter().map(compute).collect()
        }
    }

    /// Global PGF plus one PGF per touched qubit
    /// Gantree: compute_report(seq) -> Result<DistributionReport> // 보고서
    pub fn compute_report(&self, seq: &GateSequence) -> QpgfResult<DistributionReport> {
        if seq.is_empty() {
            warn!("{}", QpgfWarning::EmptyInputWarning);
            return Ok(DistributionReport::new(Pgf::identity(), BTreeMap::new())
                .with_warning(QpgfWarning::EmptyInputWarning));
        }

        let global = self.compute_global(seq)?;
        let per_qubit = self.compute_per_qubit(seq, &seq.used_qubits())?;
        Ok(DistributionReport::new(global, per_qubit))
    }

    /// Joint per-qubit error counts over a qubit subset
    /// Gantree: compute_joint(seq, qubits) -> JointPgf // 결합 분포
    pub fn compute_joint(&self, seq: &GateSequence, qubits: &BTreeSet<QubitId>) -> JointPgf {
        JointPgf::from_sequence(seq, qubits, self.config.skip_zero_rates)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Multiply the elementary PGFs of `ops`; support covers every op,
    /// including skipped zero-rate ones
    fn compose_ops<'a>(&self, ops: impl Iterator<Item = &'a GateOp>) -> QpgfResult<Pgf> {
        let mut support = BTreeSet::new();
        let mut factors = Vec::new();

        for op in ops {
            support.extend(op.qubits().iter());
            if self.config.skip_zero_rates && op.error_rate().is_zero() {
                continue;
            }
            factors.push(Pgf::from_gate_op(op));
        }

        Ok(compose_all(factors, &self.config)?.with_support(support))
    }

    /// One pass over the sequence; each op lands in every requested qubit
    /// it touches
    fn bucket_by_qubit<'a>(
        &self,
        seq: &'a GateSequence,
        qubits: &BTreeSet<QubitId>,
    ) -> BTreeMap<QubitId, Vec<&'a GateOp>> {
        let mut buckets: BTreeMap<QubitId, Vec<&GateOp>> =
            qubits.iter().map(|&q| (q, Vec::new())).collect();
        for op in seq {
            for q in op.qubits().iter() {
                if let Some(bucket) = buckets.get_mut(&q) {
                    bucket.push(op);
                }
            }
        }
        buckets
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// [`PgfEngine::compute_global`] with the default configuration
pub fn compute_global(seq: &GateSequence) -> QpgfResult<Pgf> {
    PgfEngine::default().compute_global(seq)
}

/// [`PgfEngine::compute_per_qubit`] with the default configuration
pub fn compute_per_qubit(
    seq: &GateSequence,
    qubits: &BTreeSet<QubitId>,
) -> QpgfResult<BTreeMap<QubitId, Pgf>> {
    PgfEngine::default().compute_per_qubit(seq, qubits)
}

/// [`PgfEngine::compute_report`] with the default configuration
pub fn compute_report(seq: &GateSequence) -> QpgfResult<DistributionReport> {
    PgfEngine::default().compute_report(seq)
}

/// [`PgfEngine::compute_joint`] with the default configuration
pub fn compute_joint(seq: &GateSequence, qubits: &BTreeSet<QubitId>) -> JointPgf {
    PgfEngine::default().compute_joint(seq, qubits)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qpgf_core::GateKind;

    fn single(q: QubitId, p: f64) -> GateOp {
        GateOp::single(GateKind::Sx, q, p).unwrap()
    }

    fn pair(a: QubitId, b: QubitId, p: f64) -> GateOp {
        GateOp::pair(GateKind::Cz, a, b, p).unwrap()
    }

    #[test]
    fn test_two_gates_one_qubit() {
        let seq = GateSequence::from_ops(vec![single(0, 0.1), single(0, 0.2)]);
        let global = compute_global(&seq).unwrap();
        assert_eq!(global.len(), 3);
        for (c, expected) in global.coefficients().iter().zip([0.72, 0.26, 0.02]) {
            assert_abs_diff_eq!(*c, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pair_gate_counted_once_globally() {
        let seq = GateSequence::from_ops(vec![pair(0, 1, 0.05)]);
        let report = compute_report(&seq).unwrap();

        assert_eq!(report.global.len(), 2);
        assert_abs_diff_eq!(report.global.probability(1), 0.05, epsilon = 1e-15);
        for q in [0, 1] {
            let pgf = report.qubit(q).unwrap();
            assert_abs_diff_eq!(pgf.probability(0), 0.95, epsilon = 1e-15);
            assert_abs_diff_eq!(pgf.probability(1), 0.05, epsilon = 1e-15);
        }
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_empty_sequence() {
        let report = compute_report(&GateSequence::new()).unwrap();
        assert_eq!(report.global.coefficients(), &[1.0]);
        assert!(report.per_qubit.is_empty());
        assert_eq!(report.warnings, vec![QpgfWarning::EmptyInputWarning]);
        assert!(compute_global(&GateSequence::new()).unwrap().is_identity());
    }

    #[test]
    fn test_untouched_requested_qubit_is_identity() {
        let seq = GateSequence::from_ops(vec![single(0, 0.1)]);
        let per_qubit = compute_per_qubit(&seq, &[0, 5].into()).unwrap();
        assert!(per_qubit[&5].is_identity());
        assert_abs_diff_eq!(per_qubit[&0].probability(1), 0.1, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_rate_skip_keeps_support() {
        let seq = GateSequence::from_ops(vec![single(3, 0.0), single(4, 0.2)]);
        let skip = compute_global(&seq).unwrap();
        let keep = PgfEngine::new(EngineConfig::default().with_skip_zero_rates(false))
            .unwrap()
            .compute_global(&seq)
            .unwrap();

        assert_eq!(skip.support(), keep.support());
        assert_eq!(skip.support().len(), 2);
        for k in 0..3 {
            assert_abs_diff_eq!(skip.probability(k), keep.probability(k), epsilon = 1e-15);
        }
    }

    #[test]
    fn test_serial_and_parallel_agree() {
        let ops: Vec<GateOp> = (0..40)
            .map(|i| {
                if i % 3 == 0 {
                    pair(i % 4, (i + 1) % 4, 0.01)
                } else {
                    single(i % 4, 0.002 * i as f64)
                }
            })
            .collect();
        let seq = GateSequence::from_ops(ops);

        let parallel = compute_report(&seq).unwrap();
        let serial = PgfEngine::new(EngineConfig::exact()).unwrap().compute_report(&seq).unwrap();
        assert_eq!(parallel.per_qubit.len(), serial.per_qubit.len());
        for (q, pgf) in &parallel.per_qubit {
            let other = &serial.per_qubit[q];
            for k in 0..pgf.len().max(other.len()) {
                assert_abs_diff_eq!(pgf.probability(k), other.probability(k), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(PgfEngine::new(EngineConfig::default().with_fft_threshold(0)).is_err());
    }
}
