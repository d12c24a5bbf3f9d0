//! Engine configuration
//!
//! Gantree: L4_Engine → EngineConfig
//!
//! Knobs that choose *how* PGFs are multiplied. None of them change the
//! computed probabilities beyond floating-point tolerance.

use qpgf_core::{numeric, QpgfError, QpgfResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fold shape for multiplying many PGFs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReductionStrategy {
    /// Left fold in gate order
    Sequential,
    /// Balanced pairwise reduction
    #[default]
    Tree,
}

/// PGF engine configuration
/// Gantree: EngineConfig // 엔진 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Use direct convolution when the shorter operand is below this length
    pub fft_threshold: usize,

    /// Sum-to-one tolerance for input validation
    pub tolerance: f64,

    /// Renormalize a product whose sum drifts further than this
    pub renormalize_tolerance: f64,

    /// Fold shape
    pub reduction: ReductionStrategy,

    /// Compute per-qubit PGFs on the rayon pool
    pub parallel: bool,

    /// Skip p = 0 gates
    pub skip_zero_rates: bool,

    /// Drop trailing zero coefficients after each product
    pub trim_trailing_zeros: bool,
}

impl EngineConfig {
    // ========================================================================
    // Presets
    // ========================================================================

    /// Direct convolution only, sequential fold, single thread
    pub fn exact() -> Self {
        Self {
            fft_threshold: usize::MAX,
            reduction: ReductionStrategy::Sequential,
            parallel: false,
            ..Self::default()
        }
    }

    /// FFT for anything but tiny operands
    pub fn fast() -> Self {
        Self {
            fft_threshold: 16,
            ..Self::default()
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set FFT threshold
    pub fn with_fft_threshold(mut self, threshold: usize) -> Self {
        self.fft_threshold = threshold;
        self
    }

    /// Set validation tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set renormalization tolerance
    pub fn with_renormalize_tolerance(mut self, tolerance: f64) -> Self {
        self.renormalize_tolerance = tolerance;
        self
    }

    /// Set fold shape
    pub fn with_reduction(mut self, reduction: ReductionStrategy) -> Self {
        self.reduction = reduction;
        self
    }

    /// Enable or disable rayon
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable skipping p = 0 gates
    pub fn with_skip_zero_rates(mut self, skip: bool) -> Self {
        self.skip_zero_rates = skip;
        self
    }

    /// Enable or disable trailing-zero trimming
    pub fn with_trim_trailing_zeros(mut self, trim: bool) -> Self {
        self.trim_trailing_zeros = trim;
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> QpgfResult<()> {
        if self.fft_threshold == 0 {
            return Err(QpgfError::ConfigError("fft_threshold must be > 0".into()));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(QpgfError::ConfigError(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        if !(self.renormalize_tolerance >= 0.0 && self.renormalize_tolerance <= self.tolerance) {
            return Err(QpgfError::ConfigError(format!(
                "renormalize_tolerance must be in [0, tolerance], got {}",
                self.renormalize_tolerance
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fft_threshold: numeric::FFT_THRESHOLD,
            tolerance: numeric::SUM_TOLERANCE,
            renormalize_tolerance: numeric::RENORMALIZE_TOLERANCE,
            reduction: ReductionStrategy::Tree,
            parallel: true,
            skip_zero_rates: true,
            trim_trailing_zeros: true,
        }
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EngineConfig(fft>={}, {:?}, tol={:.0e}, parallel={})",
            self.fft_threshold, self.reduction, self.tolerance, self.parallel
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fft_threshold, 64);
        assert_eq!(config.reduction, ReductionStrategy::Tree);
    }

    #[test]
    fn test_presets() {
        let exact = EngineConfig::exact();
        assert!(exact.validate().is_ok());
        assert!(!exact.parallel);
        assert_eq!(exact.reduction, ReductionStrategy::Sequential);
        assert!(EngineConfig::fast().fft_threshold < EngineConfig::default().fft_threshold);
    }

    #[test]
    fn test_validation() {
        assert!(EngineConfig::default().with_fft_threshold(0).validate().is_err());
        assert!(EngineConfig::default().with_tolerance(0.0).validate().is_err());
        assert!(EngineConfig::default()
            .with_renormalize_tolerance(1e-3)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"parallel": false}"#).unwrap();
        assert!(!config.parallel);
        assert_eq!(config.fft_threshold, 64);
    }
}
