//! Polynomial multiplication of coefficient sequences
//!
//! Gantree: L4_Engine → Convolution
//!
//! Two paths produce the same product within round-off:
//! - `direct_convolve`: O(n·m), exact up to summation order
//! - `fft_convolve`: O((n+m) log(n+m)), radix-2 transform over a
//!   power-of-two zero-padded buffer
//!
//! [`convolve`] picks a path by operand length, checks both operands are
//! distributions, flushes round-off negatives and renormalizes drift.

use crate::config::EngineConfig;
use crate::pgf::validate_coefficients;
use log::{trace, warn};
use num_complex::Complex;
use qpgf_core::{numeric, QpgfError, QpgfResult};
use std::f64::consts::PI;

// ============================================================================
// Direct Path
// ============================================================================

/// Quadratic convolution
/// Gantree: direct_convolve(a, b) -> Vec<f64> // 직접 합성곱
pub fn direct_convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

// ============================================================================
// FFT Path
// ============================================================================

/// Transform-based convolution
/// Gantree: fft_convolve(a, b) -> Vec<f64> // FFT 합성곱
pub fn fft_convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let out_len = a.len() + b.len() - 1;
    let size = numeric::next_pow_two(out_len);
    let twiddles = twiddle_table(size);

    let mut fa = padded(a, size);
    let mut fb = padded(b, size);
    fft_in_place(&mut fa, &twiddles, false);
    fft_in_place(&mut fb, &twiddles, false);

    for (x, y) in fa.iter_mut().zip(&fb) {
        *x = *x * *y;
    }
    fft_in_place(&mut fa, &twiddles, true);

    fa.iter().take(out_len).map(|c| c.re).collect()
}

fn padded(coeffs: &[f64], size: usize) -> Vec<Complex<f64>> {
    let mut buf = vec![Complex::new(0.0, 0.0); size];
    for (slot, &c) in buf.iter_mut().zip(coeffs) {
        slot.re = c;
    }
    buf
}

/// `exp(-2πi k / n)` for `k < n/2`
fn twiddle_table(n: usize) -> Vec<Complex<f64>> {
    (0..n / 2)
        .map(|k| Complex::from_polar(1.0, -2.0 * PI * k as f64 / n as f64))
        .collect()
}

/// Iterative radix-2 Cooley-Tukey; `buf.len()` must be a power of two
fn fft_in_place(buf: &mut [Complex<f64>], twiddles: &[Complex<f64>], inverse: bool) {
    let n = buf.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            buf.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let stride = n / len;
        for start in (0..n).step_by(len) {
            for k in 0..half {
                let w = twiddles[k * stride];
                let w = if inverse { w.conj() } else { w };
                let u = buf[start + k];
                let v = buf[start + k + half] * w;
                buf[start + k] = u + v;
                buf[start + k + half] = u - v;
            }
        }
        len <<= 1;
    }

    if inverse {
        let scale = 1.0 / n as f64;
        for c in buf.iter_mut() {
            *c *= scale;
        }
    }
}

// ============================================================================
// Checked Product
// ============================================================================

/// Which path a product took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolutionPath {
    /// Quadratic loop
    Direct,
    /// Radix-2 transform
    Fft,
}

/// Path chosen for operands of these lengths
pub fn choose_path(len_a: usize, len_b: usize, config: &EngineConfig) -> ConvolutionPath {
    if len_a.min(len_b) < config.fft_threshold {
        ConvolutionPath::Direct
    } else {
        ConvolutionPath::Fft
    }
}

/// Product of two distributions
///
/// Fails with `InvalidDistribution` if either operand has a negative
/// coefficient or does not sum to one within `config.tolerance`.
/// Gantree: convolve(a, b, config) -> Result<Vec<f64>> // 검증 합성곱
pub fn convolve(a: &[f64], b: &[f64], config: &EngineConfig) -> QpgfResult<Vec<f64>> {
    validate_coefficients(a, config.tolerance)?;
    validate_coefficients(b, config.tolerance)?;

    let path = choose_path(a.len(), b.len(), config);
    trace!("convolve {} x {} via {:?}", a.len(), b.len(), path);
    let mut out = match path {
        ConvolutionPath::Direct => direct_convolve(a, b),
        ConvolutionPath::Fft => fft_convolve(a, b),
    };

    clean_product(&mut out, config)?;
    Ok(out)
}

/// Flush round-off negatives and renormalize drift
fn clean_product(out: &mut [f64], config: &EngineConfig) -> QpgfResult<()> {
    for (k, c) in out.iter_mut().enumerate() {
        if *c < 0.0 {
            if *c >= -numeric::NEGATIVE_EPS {
                *c = 0.0;
            } else {
                return Err(QpgfError::invalid_distribution(format!(
                    "product coefficient {} is {}",
                    k, c
                )));
            }
        }
    }

    let sum: f64 = out.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return Err(QpgfError::invalid_distribution(format!(
            "product sums to {}",
            sum
        )));
    }
    let drift = (sum - 1.0).abs();
    if drift > config.renormalize_tolerance {
        if drift > config.tolerance {
            warn!("renormalizing product with drift {:e}", drift);
        }
        for c in out.iter_mut() {
            *c /= sum;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn binomial_like(n: usize) -> Vec<f64> {
        // Normalized, uneven weights
        let raw: Vec<f64> = (0..n).map(|k| 1.0 + ((k * 7) % 5) as f64).collect();
        let sum: f64 = raw.iter().sum();
        raw.into_iter().map(|x| x / sum).collect()
    }

    #[test]
    fn test_direct_small() {
        assert_eq!(direct_convolve(&[0.9, 0.1], &[0.8, 0.2]).len(), 3);
        let out = direct_convolve(&[0.9, 0.1], &[0.8, 0.2]);
        assert_abs_diff_eq!(out[0], 0.72, epsilon = 1e-15);
        assert_abs_diff_eq!(out[1], 0.26, epsilon = 1e-15);
        assert_abs_diff_eq!(out[2], 0.02, epsilon = 1e-15);
        assert!(direct_convolve(&[], &[1.0]).is_empty());
    }

    #[test]
    fn test_fft_matches_direct() {
        for &(n, m) in &[(1, 1), (2, 2), (3, 5), (8, 8), (64, 17), (513, 513)] {
            let a = binomial_like(n);
            let b = binomial_like(m);
            let direct = direct_convolve(&a, &b);
            let fft = fft_convolve(&a, &b);
            assert_eq!(direct.len(), fft.len());
            for (x, y) in direct.iter().zip(&fft) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_path_selection() {
        let config = EngineConfig::default();
        assert_eq!(choose_path(2, 1000, &config), ConvolutionPath::Direct);
        assert_eq!(choose_path(64, 64, &config), ConvolutionPath::Fft);
        assert_eq!(choose_path(1 << 20, 1 << 20, &EngineConfig::exact()), ConvolutionPath::Direct);
    }

    #[test]
    fn test_convolve_rejects_bad_input() {
        let config = EngineConfig::default();
        assert!(matches!(
            convolve(&[1.2, -0.2], &[1.0], &config),
            Err(QpgfError::InvalidDistribution { .. })
        ));
        assert!(matches!(
            convolve(&[0.5, 0.4], &[1.0], &config),
            Err(QpgfError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn test_clean_product() {
        let config = EngineConfig::default();
        let mut out = vec![0.5, -1e-15, 0.5 + 1e-10];
        clean_product(&mut out, &config).unwrap();
        assert_eq!(out[1], 0.0);
        assert_abs_diff_eq!(out.iter().sum::<f64>(), 1.0, epsilon = 1e-15);

        let mut bad = vec![1.1, -0.1];
        assert!(clean_product(&mut bad, &config).is_err());
    }
}
