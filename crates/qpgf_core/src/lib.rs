//! # QPGF Core
//!
//! Core types, gates, circuits and resolved gate sequences for the
//! quantum error-count PGF toolkit.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qpgf_core // L0+L1: Foundation + Circuit (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // QubitId, Probability (완료)
//!         Constants // 수치/테이블 상수 (완료)
//!         Errors // QpgfError, QpgfWarning (완료)
//!     L1_Circuit // 회로 구조 (완료)
//!         Gate // Gate + GateKind (완료)
//!         GateOp // GateOp, QubitSpan, GateSequence (완료)
//!         Circuit // 회로 + QASM 파싱 (완료)
//!         CircuitBuilder // 빌더 패턴 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qpgf_core::prelude::*;
//!
//! let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).build();
//! assert_eq!(circuit.count_2q(), 1);
//!
//! let parsed = Circuit::from_qasm(&circuit.to_qasm()).unwrap();
//! assert_eq!(parsed.gates(), circuit.gates());
//! ```
//!
//! ## Resolved Sequences
//!
//! ```rust
//! use qpgf_core::prelude::*;
//!
//! let seq: GateSequence = vec![
//!     GateOp::single(GateKind::Sx, 0, 0.001).unwrap(),
//!     GateOp::pair(GateKind::Cz, 0, 1, 0.01).unwrap(),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(seq.touching(1).count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Quantum gates (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Resolved gate operations (Gantree: L1_Circuit → GateOp)
pub mod gate_op;

/// Circuit structure (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::CircuitBuilder;
pub use circuit::{parse_angle, Circuit};
pub use constants::{numeric, summary, table};
pub use error::{QpgfError, QpgfResult, QpgfWarning};
pub use gate::{Gate, GateKind};
pub use gate_op::{GateOp, GateSequence, QubitSpan};
pub use types::{Angle, ErrorRate, Probability, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qpgf_core::prelude::*;
    //! ```

    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::Circuit;
    pub use crate::constants::{numeric, summary, table};
    pub use crate::error::{QpgfError, QpgfResult, QpgfWarning};
    pub use crate::gate::{Gate, GateKind};
    pub use crate::gate_op::{GateOp, GateSequence, QubitSpan};
    pub use crate::types::{Angle, ErrorRate, Probability, QubitId};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
