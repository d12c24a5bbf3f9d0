//! # QPGF Bench
//!
//! Circuit generators and benchmarks for the error-count engine.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qpgf_bench // L6: Benchmark (완료)
//!     CircuitGenerator // 회로 생성 (완료)
//!         vqe_h2_ansatz, sample, bell, ghz
//!         layered, random, scaling series
//!     BenchSuite // 벤치마크 (완료)
//!         atomic vs decomposed
//!         layer / qubit scaling
//!         statistics, markdown
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qpgf_bench::prelude::*;
//!
//! let mut suite = BenchSuite::with_seed(42);
//! let results = suite.run_quick().unwrap();
//!
//! println!("{}", BenchSuite::to_markdown(&results));
//! ```
//!
//! ## Circuit Generation
//!
//! ```rust
//! use qpgf_bench::prelude::*;
//!
//! let gen = CircuitGenerator::with_seed(42);
//!
//! let ghz = gen.ghz(5);
//! let layered = gen.large_test(8, 3);
//! let random = gen.random(5, 5);
//! assert_eq!(ghz.num_qubits(), 5);
//! assert!(layered.gate_count() > random.num_qubits());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Circuit generators (Gantree: L6_Benchmark → Generators)
pub mod generators;

/// Benchmark suite (Gantree: L6_Benchmark → BenchSuite)
pub mod suite;

// ============================================================================
// Re-exports
// ============================================================================

pub use generators::{CircuitGenerator, DEFAULT_LAYER_GATES};
pub use suite::{BenchSuite, BenchmarkResult, BenchmarkStatistics};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qpgf_bench::prelude::*;
    //! ```

    pub use crate::generators::{CircuitGenerator, DEFAULT_LAYER_GATES};
    pub use crate::suite::{BenchSuite, BenchmarkResult, BenchmarkStatistics};

    pub use qpgf_basis::{DecompositionStrategy, HardwareTarget};
    pub use qpgf_engine::EngineConfig;
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================
