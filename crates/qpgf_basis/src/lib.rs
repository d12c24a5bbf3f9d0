//! # QPGF Basis
//!
//! Maps logical circuits onto a hardware native basis and annotates every
//! resulting operation with its calibrated error rate.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qpgf_basis // L3: Basis (완료)
//!     HardwareTarget // Eagle, Heron (완료)
//!         NativeBasis // 네이티브 게이트 집합 (완료)
//!         DecompositionRules // H,Y,Z,S,T,CX,RY,U 분해 (완료)
//!     DecompositionStrategy // atomic | decomposed (완료)
//!     BasisResolver // Circuit + ErrorTable → GateSequence (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qpgf_basis::prelude::*;
//! use qpgf_core::prelude::*;
//! use qpgf_error_model::ErrorTable;
//!
//! let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).build();
//! let table = ErrorTable::ibm_heron_typical();
//!
//! let decomposed = BasisResolver::new(HardwareTarget::Heron, DecompositionStrategy::Decomposed)
//!     .resolve(&circuit, &table)
//!     .unwrap();
//! assert_eq!(decomposed.len(), 4); // RZ SX RZ CZ
//!
//! let atomic = BasisResolver::new(HardwareTarget::Heron, DecompositionStrategy::Atomic)
//!     .resolve(&circuit, &table)
//!     .unwrap();
//! assert_eq!(atomic.len(), 2); // H CX
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Hardware targets (Gantree: L3_Basis → HardwareTarget)
pub mod hardware;

/// Strategy switch (Gantree: L3_Basis → DecompositionStrategy)
pub mod strategy;

/// Resolver (Gantree: L3_Basis → BasisResolver)
pub mod resolver;

// ============================================================================
// Re-exports
// ============================================================================

pub use hardware::{HardwareTarget, EAGLE_BASIS, HERON_BASIS};
pub use resolver::{BasisResolver, ResolveStats};
pub use strategy::DecompositionStrategy;

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::hardware::HardwareTarget;
    pub use crate::resolver::BasisResolver;
    pub use crate::strategy::DecompositionStrategy;
}

// ============================================================================
// Integration Tests
// ============================================================================
