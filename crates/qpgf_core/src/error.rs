//! Error types for QPGF
//!
//! Gantree: L0_Foundation → Errors
//!
//! Every public operation validates its inputs at the boundary and fails
//! fast with one of these variants. Nothing is clamped or retried.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for QPGF
/// Gantree: QpgfError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QpgfError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Probability value out of range [0, 1]
    /// Gantree: InvalidProbability(f64) // 확률 범위
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    /// PGF precondition violated (negative coefficient, bad normalization)
    /// Gantree: InvalidDistribution{reason} // 분포 검증
    #[error("Invalid distribution: {reason}")]
    InvalidDistribution { reason: String },

    /// Gate refers to a qubit beyond the declared register
    #[error("Gate references qubit {qubit} but circuit has only {num_qubits} qubits")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    /// Gate kind applied to the wrong number of qubits
    #[error("Gate {gate} expects {expected} qubit(s), got {found}")]
    ArityMismatch {
        gate: String,
        expected: usize,
        found: usize,
    },

    /// Invalid gate parameter
    #[error("Invalid gate parameter: {0}")]
    InvalidGateParameter(String),

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Invalid QASM format
    #[error("Invalid QASM: {0}")]
    InvalidQasm(String),

    /// Gate name not known to the parser or the target basis
    /// Gantree: UnsupportedGate(String) // 미지원 게이트
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Hardware target not known
    #[error("Unknown architecture: {0}")]
    UnknownArchitecture(String),

    /// Error table has no entry for a gate
    /// Gantree: MissingErrorRate{gate} // 에러율 없음
    #[error("Missing error rate for gate: {gate}")]
    MissingErrorRate { gate: String },

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for QPGF operations
/// Gantree: QpgfResult<T> // type alias
pub type QpgfResult<T> = Result<T, QpgfError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QpgfError {
    fn from(err: serde_json::Error) -> Self {
        QpgfError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QpgfError {
    fn from(err: std::io::Error) -> Self {
        QpgfError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QpgfError {
    /// Shorthand for [`QpgfError::InvalidDistribution`]
    pub fn invalid_distribution(reason: impl Into<String>) -> Self {
        QpgfError::InvalidDistribution {
            reason: reason.into(),
        }
    }

    /// Check if error is a numeric precondition violation
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            QpgfError::InvalidProbability(_)
                | QpgfError::InvalidDistribution { .. }
                | QpgfError::GateQubitMismatch { .. }
                | QpgfError::ArityMismatch { .. }
                | QpgfError::InvalidGateParameter(_)
        )
    }

    /// Check if error comes from external input (QASM, CSV, tables)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            QpgfError::InvalidQasm(_)
                | QpgfError::UnsupportedGate(_)
                | QpgfError::UnknownArchitecture(_)
                | QpgfError::MissingErrorRate { .. }
                | QpgfError::CsvError(_)
        )
    }
}

// ============================================================================
// Warnings
// ============================================================================

/// Non-fatal conditions reported alongside a result
/// Gantree: QpgfWarning // 경고
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QpgfWarning {
    /// The gate sequence was empty; the result is the certain-zero PGF
    EmptyInputWarning,
}

impl fmt::Display for QpgfWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QpgfWarning::EmptyInputWarning => {
                write!(f, "Empty gate sequence: nothing was computed")
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
