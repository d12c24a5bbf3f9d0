//! # QPGF Pipeline
//!
//! From OpenQASM text and calibration data to reported error-count
//! distributions.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qpgf_pipeline // L5: Integration (완료)
//!     QpgfConfig // 통합 설정 (완료)
//!         hardware, strategy, engine
//!         CSV column map, exclude threshold
//!         to_csv_loader(), to_resolver()
//!     Pipeline // 단계별 실행 (완료)
//!         load_table → parse_qasm → resolve → compute
//!         run() - 전체 파이프라인
//!     Reporter // 결과 리포팅 (완료)
//!         Markdown, JSON, CSV, Text
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qpgf_pipeline::prelude::*;
//!
//! let qasm = "OPENQASM 3.0;\nqubit[2] q;\nh q[0];\ncx q[0], q[1];\n";
//!
//! let mut pipeline = Pipeline::new(QpgfConfig::heron());
//! let result = pipeline.run(qasm).unwrap();
//! println!("Expected errors: {:.4}", result.expected_errors());
//!
//! let csv = Reporter::report(&result.report, ReportFormat::Csv, None);
//! assert!(csv.starts_with("scope,qubit,k,probability"));
//! ```
//!
//! ## Calibrated Run
//!
//! ```rust
//! use qpgf_pipeline::prelude::*;
//!
//! let csv = "ID,RZ,SX,X,ECR\n0.0003,0,0.0003,0.0003,0_1:0.008\n";
//!
//! let mut pipeline = Pipeline::new(QpgfConfig::eagle());
//! pipeline.load_table_csv(csv, "eagle_cal").unwrap();
//! pipeline.parse_qasm("OPENQASM 3.0;\nqubit[2] q;\ncx q[0], q[1];\n").unwrap();
//! pipeline.resolve().unwrap();
//! let report = pipeline.compute().unwrap();
//! assert!(report.global.degree() >= 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Configuration (Gantree: L5_Integration → QpgfConfig)
pub mod config;

/// Staged pipeline (Gantree: L5_Integration → Pipeline)
pub mod pipeline;

/// Reporting (Gantree: L5_Integration → Reporter)
pub mod reporter;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::QpgfConfig;
pub use pipeline::{Pipeline, PipelineResult, PipelineStage, PipelineState, StageTimings};
pub use reporter::{ReportFormat, Reporter};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::config::QpgfConfig;
    pub use crate::pipeline::{Pipeline, PipelineResult, PipelineStage};
    pub use crate::reporter::{ReportFormat, Reporter};

    pub use qpgf_basis::{DecompositionStrategy, HardwareTarget};
    pub use qpgf_core::{Circuit, CircuitBuilder, QpgfError, QpgfResult};
    pub use qpgf_engine::{DistributionReport, EngineConfig, Pgf, PgfSummary};
    pub use qpgf_error_model::ErrorTable;
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

    const VQE: &str = "OPENQASM 3.0;\n\
                       qubit[2] q;\n\
                       ry(0.1) q[0];\n\
                       ry(-0.2) q[1];\n\
                       cx q[0], q[1];\n\
                       rz(0.3) q[0];\n\
                       ry(0.4) q[0];\n\
                       rz(-0.5) q[1];\n\
                       ry(0.6) q[1];\n";

    #[test]
    fn test_strategy_comparison() {
        let mut results = Vec::new();
        for target in HardwareTarget::ALL {
            for strategy in [DecompositionStrategy::Atomic, DecompositionStrategy::Decomposed] {
                let config = QpgfConfig::for_target(target).with_strategy(strategy);
                results.push(Pipeline::new(config).run(VQE).unwrap());
            }
        }

        for pair in results.chunks(2) {
            let (atomic, decomposed) = (&pair[0], &pair[1]);
            assert!(atomic.stats.ops_emitted < decomposed.stats.ops_emitted);
            assert_abs_diff_eq!(
                atomic.fault_free_probability(),
                decomposed.fault_free_probability(),
                epsilon = 1e-12
            );
        }

        let table = Reporter::comparison_report(&results);
        assert_eq!(table.lines().count(), 4 + results.len());
        assert!(table.contains("| atomic |"));
    }

    #[test]
    fn test_config_drives_csv_loading() {
        let config = QpgfConfig::heron().with_qubit_column("Qubit");
        let csv = "Qubit,ID,RX,RZ,SX,X,CZ,RZZ\n\
                   0,0.0001,0.0001,0,0.0001,0.0001,0_1:0.002,\n\
                   1,0.0009,0.0009,0,0.0009,0.0009,1_0:0.004,\n";

        let mut pipeline = Pipeline::new(config);
        pipeline.load_table_csv(csv, "heron_cal").unwrap();
        let result = pipeline
            .run_circuit(CircuitBuilder::new(2).sx(0).sx(1).cz(0, 1).build())
            .unwrap();

        // Per-qubit SX overrides and the averaged pair entry
        assert_abs_diff_eq!(result.report.qubit(0).unwrap().mean(), 0.0001 + 0.003, epsilon = 1e-12);
        assert_abs_diff_eq!(result.report.qubit(1).unwrap().mean(), 0.0009 + 0.003, epsilon = 1e-12);
        assert_eq!(result.table_name, "heron_cal");
    }
}
