//! # QPGF Error Model
//!
//! Calibrated per-gate error tables for the quantum error-count PGF toolkit.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qpgf_error_model // L2: ErrorModel (완료)
//!     ErrorTable // (종류, 큐빗) → 에러율 (완료)
//!         Presets // Eagle/Heron 전형값 (완료)
//!         Persistence // JSON 입출력 (완료)
//!     CsvLoader // 캘리브레이션 CSV (완료)
//!         ColumnMap // 열 → 게이트 종류 (완료)
//!         PairCells // "a_b:v;c_d:v" 파싱 (완료)
//!         Exclusion // 임계값 이상 제외 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qpgf_core::prelude::*;
//! use qpgf_error_model::prelude::*;
//!
//! let csv = "SX,CZ\n0.0002,0_1:0.003\n0.0004,1_2:0.005\n";
//! let loader = CsvLoader::new(
//!     [("SX".to_string(), GateKind::Sx), ("CZ".to_string(), GateKind::Cz)].into(),
//! )
//! .with_multi_qubit_column("CZ");
//!
//! let table = loader.load_str(csv, "device").unwrap();
//! let rate = table.lookup(GateKind::Cz, QubitSpan::Two(2, 1)).unwrap();
//! assert!((rate.value() - 0.005).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Error tables (Gantree: L2_ErrorModel → ErrorTable)
pub mod error_table;

/// CSV loading (Gantree: L2_ErrorModel → CsvLoader)
pub mod csv_loader;

// ============================================================================
// Re-exports
// ============================================================================

pub use csv_loader::CsvLoader;
pub use error_table::ErrorTable;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::csv_loader::CsvLoader;
    pub use crate::error_table::ErrorTable;
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================
