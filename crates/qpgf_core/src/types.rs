//! Core types for QPGF
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Type aliases and the validated error-rate wrapper used throughout
//! the QPGF system.

use crate::error::{QpgfError, QpgfResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Rotation angle in radians
/// Gantree: Angle // pub type Angle = f64
pub type Angle = f64;

// ============================================================================
// Probability (Validated Wrapper)
// ============================================================================

/// Probability value in range [0, 1]
///
/// This is the per-gate `ErrorRate`. A value outside the range is a
/// configuration error, so construction is fallible and deserialization
/// goes through the same check.
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

/// Error rate attached to one gate instance
pub type ErrorRate = Probability;

impl Probability {
    /// Create a new Probability with validation
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> QpgfResult<Self> {
        // NaN fails the range check as well
        if !(0.0..=1.0).contains(&value) {
            return Err(QpgfError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Get the probability value
    /// Gantree: value() -> f64 // 값 반환
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the complement (1 - p)
    /// Gantree: complement() -> f64 // 1-p
    #[inline]
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }

    /// Check for exactly zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Probability that at least one of several independent events occurs:
    /// `1 - Π(1 - p_i)`. An empty iterator gives zero.
    /// Gantree: any_of(iter) -> Self // 독립 합성
    pub fn any_of(rates: impl IntoIterator<Item = Probability>) -> Self {
        let survive: f64 = rates.into_iter().map(|p| p.complement()).product();
        Self((1.0 - survive).clamp(0.0, 1.0))
    }

    /// Zero probability
    pub const ZERO: Self = Self(0.0);

    /// Certainty (p = 1)
    pub const ONE: Self = Self(1.0);

    /// Half probability
    pub const HALF: Self = Self(0.5);
}

impl Default for Probability {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = QpgfError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_probability_valid() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(0.5).is_ok());
        assert!(Probability::new(1.0).is_ok());
    }

    #[test]
    fn test_probability_invalid() {
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(1.1).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn test_probability_complement() {
        let p = Probability::new(0.3).unwrap();
        assert_abs_diff_eq!(p.complement(), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_any_of() {
        let p = Probability::any_of([
            Probability::new(0.1).unwrap(),
            Probability::new(0.2).unwrap(),
        ]);
        // 1 - 0.9 * 0.8
        assert_abs_diff_eq!(p.value(), 0.28, epsilon = 1e-12);
        assert_eq!(Probability::any_of([]), Probability::ZERO);
    }

    #[test]
    fn test_serde_validates() {
        let p: Probability = serde_json::from_str("0.25").unwrap();
        assert_abs_diff_eq!(p.value(), 0.25);
        assert!(serde_json::from_str::<Probability>("1.5").is_err());
        assert_eq!(serde_json::to_string(&p).unwrap(), "0.25");
    }
}
