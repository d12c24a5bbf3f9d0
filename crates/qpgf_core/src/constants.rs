//! Constants for QPGF
//!
//! Gantree: L0_Foundation → Constants
//!
//! Numeric tolerances, convolution tuning and error-table defaults.

// ============================================================================
// Numeric Constants
// Gantree: numeric // 수치 상수
// ============================================================================

pub mod numeric {
    //! Tolerances for floating-point distribution checks

    /// Allowed deviation of a PGF's coefficient sum from 1
    /// Gantree: SUM_TOLERANCE: f64 = 1e-9
    pub const SUM_TOLERANCE: f64 = 1e-9;

    /// Drift of a convolution result's sum beyond which it is renormalized
    /// Gantree: RENORMALIZE_TOLERANCE: f64 = 1e-12
    pub const RENORMALIZE_TOLERANCE: f64 = 1e-12;

    /// Magnitude below which a negative coefficient is FFT round-off.
    /// Coefficients in (-NEGATIVE_EPS, 0) are flushed to zero after an
    /// inverse transform; anything lower is an upstream defect.
    pub const NEGATIVE_EPS: f64 = 1e-12;

    /// Below this length (of the shorter factor) direct convolution is used
    /// Gantree: FFT_THRESHOLD: usize = 64
    pub const FFT_THRESHOLD: usize = 64;

    /// Smallest power of two greater than or equal to `n` (1 for n = 0)
    #[inline]
    pub const fn next_pow_two(n: usize) -> usize {
        if n <= 1 {
            1
        } else {
            n.next_power_of_two()
        }
    }
}

// ============================================================================
// Error Table Constants
// Gantree: table // 에러 테이블 상수
// ============================================================================

pub mod table {
    //! Defaults for loading calibration error tables

    /// CSV values at or above this are treated as broken calibrations
    /// Gantree: EXCLUDE_THRESHOLD: f64 = 0.99
    pub const EXCLUDE_THRESHOLD: f64 = 0.99;

    /// Separator between entries in a multi-qubit CSV cell
    pub const PAIR_ENTRY_SEPARATOR: char = ';';

    /// Separator between a qubit pair and its value (`"3_4:0.01"`)
    pub const PAIR_VALUE_SEPARATOR: char = ':';

    /// Separator between the two qubits of a pair (`"3_4"`)
    pub const PAIR_QUBIT_SEPARATOR: char = '_';
}

// ============================================================================
// Summary Constants
// Gantree: summary // 요약 상수
// ============================================================================

pub mod summary {
    //! Defaults for distribution summaries

    /// Probabilities below this count as tail mass
    /// Gantree: DEFAULT_TAIL_THRESHOLD: f64 = 0.01
    pub const DEFAULT_TAIL_THRESHOLD: f64 = 0.01;
}

#[cfg(test)]
mod tests {
    use super::numeric::*;

    #[test]
    fn test_next_pow_two() {
        assert_eq!(next_pow_two(0), 1);
        assert_eq!(next_pow_two(1), 1);
        assert_eq!(next_pow_two(2), 2);
        assert_eq!(next_pow_two(3), 4);
        assert_eq!(next_pow_two(513), 1024);
        assert_eq!(next_pow_two(1024), 1024);
    }

    #[test]
    fn test_tolerances_ordered() {
        assert!(RENORMALIZE_TOLERANCE < SUM_TOLERANCE);
        assert!(NEGATIVE_EPS <= SUM_TOLERANCE);
    }
}
