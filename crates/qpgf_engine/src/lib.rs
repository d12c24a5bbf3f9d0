//! # QPGF Engine
//!
//! Error-count distributions of quantum circuits as probability generating
//! functions. Each gate fault is an independent Bernoulli trial with PGF
//! `(1-p) + p·x`; independent trials compose by polynomial multiplication,
//! done by FFT convolution once operands are long enough.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qpgf_engine // L4: Engine (완료)
//!     Pgf // 계수열 + 지원 큐빗 (완료)
//!     Convolution // 직접/FFT 합성곱 (완료)
//!         DirectPath // O(n·m) (완료)
//!         FftPath // radix-2, 2의 거듭제곱 패딩 (완료)
//!         CleanProduct // 음수 플러시, 재정규화 (완료)
//!     Compose // 순차/트리 축약 (완료)
//!     PgfEngine // 전역, 큐빗별, 보고서 (완료)
//!     JointPgf // 결합/주변 분포 (완료)
//!     DistributionReport // 보고서 + 요약 (완료)
//!     EngineConfig // 설정 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qpgf_core::prelude::*;
//! use qpgf_engine::prelude::*;
//!
//! let seq = GateSequence::from_ops(vec![
//!     GateOp::single(GateKind::Sx, 0, 0.1).unwrap(),
//!     GateOp::single(GateKind::Sx, 0, 0.2).unwrap(),
//! ]);
//!
//! let global = compute_global(&seq).unwrap();
//! assert!((global.probability(0) - 0.72).abs() < 1e-12);
//! assert!((global.probability(1) - 0.26).abs() < 1e-12);
//! assert!((global.probability(2) - 0.02).abs() < 1e-12);
//! ```
//!
//! ## Global vs Per-Qubit
//!
//! ```rust
//! use qpgf_core::prelude::*;
//! use qpgf_engine::prelude::*;
//!
//! // One CZ fault is one global error but an error event for both qubits
//! let seq = GateSequence::from_ops(vec![GateOp::pair(GateKind::Cz, 0, 1, 0.05).unwrap()]);
//! let report = compute_report(&seq).unwrap();
//!
//! assert_eq!(report.global.degree(), 1);
//! assert_eq!(report.qubit(0).unwrap().degree(), 1);
//! assert_eq!(report.qubit(1).unwrap().degree(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Engine configuration (Gantree: L4_Engine → EngineConfig)
pub mod config;

/// PGF type (Gantree: L4_Engine → Pgf)
pub mod pgf;

/// Convolution primitive (Gantree: L4_Engine → Convolution)
pub mod convolution;

/// Composition driver (Gantree: L4_Engine → Compose)
pub mod compose;

/// Joint distributions (Gantree: L4_Engine → JointPgf)
pub mod joint;

/// Reports (Gantree: L4_Engine → DistributionReport)
pub mod report;

/// Engine (Gantree: L4_Engine → PgfEngine)
pub mod engine;

// ============================================================================
// Re-exports
// ============================================================================

pub use compose::{compose, compose_all};
pub use config::{EngineConfig, ReductionStrategy};
pub use convolution::{convolve, direct_convolve, fft_convolve, ConvolutionPath};
pub use engine::{compute_global, compute_joint, compute_per_qubit, compute_report, PgfEngine};
pub use joint::JointPgf;
pub use pgf::Pgf;
pub use report::{DistributionReport, PgfSummary};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::config::{EngineConfig, ReductionStrategy};
    pub use crate::engine::{
        compute_global, compute_joint, compute_per_qubit, compute_report, PgfEngine,
    };
    pub use crate::joint::JointPgf;
    pub use crate::pgf::Pgf;
    pub use crate::report::{DistributionReport, PgfSummary};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_abs_diff_eq;
    use qpgf_core::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_joint_marginal_matches_per_qubit() {
        let seq = GateSequence::from_ops(vec![
            GateOp::single(GateKind::X, 0, 0.03).unwrap(),
            GateOp::pair(GateKind::Cz, 0, 1, 0.05).unwrap(),
            GateOp::pair(GateKind::Cz, 1, 2, 0.04).unwrap(),
            GateOp::single(GateKind::Sx, 2, 0.01).unwrap(),
        ]);
        let subset: BTreeSet<QubitId> = [0, 1, 2].into();
        let joint = compute_joint(&seq, &subset);
        let per_qubit = compute_per_qubit(&seq, &subset).unwrap();

        for q in subset {
            let marginal = joint.marginal(q).unwrap();
            let direct = &per_qubit[&q];
            assert_eq!(marginal.len(), direct.len());
            for k in 0..direct.len() {
                assert_abs_diff_eq!(marginal.probability(k), direct.probability(k), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_report_summary_after_compute() {
        let seq = GateSequence::from_ops(vec![
            GateOp::single(GateKind::Sx, 0, 0.1).unwrap(),
            GateOp::single(GateKind::Sx, 0, 0.2).unwrap(),
        ]);
        let report = compute_report(&seq).unwrap();
        let summary = report.global_summary(None);
        assert_abs_diff_eq!(summary.mean, seq.expected_errors(), epsilon = 1e-12);
    }
}
