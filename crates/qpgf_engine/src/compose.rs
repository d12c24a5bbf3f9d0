//! Independent composition
//!
//! Gantree: L4_Engine → Compose
//!
//! The PGF of a sum of independent error counts is the product of their
//! PGFs. `compose` multiplies two; `compose_all` folds many, either left to
//! right or as a balanced pairwise tree.

use crate::config::{EngineConfig, ReductionStrategy};
use crate::convolution::convolve;
use crate::pgf::Pgf;
use log::debug;
use qpgf_core::QpgfResult;
use rayon::prelude::*;

/// Product of two independent PGFs; support is the union
/// Gantree: compose(a, b, config) -> Result<Pgf> // 독립 합성
pub fn compose(a: &Pgf, b: &Pgf, config: &EngineConfig) -> QpgfResult<Pgf> {
    let coeffs = convolve(a.coefficients(), b.coefficients(), config)?;
    let support = a.support().union(b.support()).copied().collect();
    let mut product = Pgf::from_raw(coeffs, support);
    if config.trim_trailing_zeros {
        product.trim();
    }
    Ok(product)
}

/// Product of any number of PGFs; empty input gives the identity
/// Gantree: compose_all(pgfs, config) -> Result<Pgf> // 전체 합성
pub fn compose_all(pgfs: Vec<Pgf>, config: &EngineConfig) -> QpgfResult<Pgf> {
    match config.reduction {
        ReductionStrategy::Sequential => fold_sequential(pgfs, config),
        ReductionStrategy::Tree => fold_tree(pgfs, config),
    }
}

/// Left fold in input order
pub fn fold_sequential(pgfs: Vec<Pgf>, config: &EngineConfig) -> QpgfResult<Pgf> {
    let mut iter = pgfs.into_iter();
    let Some(first) = iter.next() else {
        return Ok(Pgf::identity());
    };
    first.validate(config.tolerance)?;
    iter.try_fold(first, |acc, next| compose(&acc, &next, config))
}

/// Balanced pairwise reduction; each level runs on rayon when enabled
pub fn fold_tree(pgfs: Vec<Pgf>, config: &EngineConfig) -> QpgfResult<Pgf> {
    let mut level = pgfs;
    let mut depth = 0usize;

    while level.len() > 1 {
        level = if config.parallel {
            level.par_chunks(2).map(|pair| combine_pair(pair, config)).collect::<QpgfResult<_>>()?
        } else {
            level.chunks(2).map(|pair| combine_pair(pair, config)).collect::<QpgfResult<_>>()?
        };
        depth += 1;
    }

    if depth > 0 {
        debug!("tree reduction finished after {} levels", depth);
    }
    match level.pop() {
        Some(pgf) => {
            pgf.validate(config.tolerance)?;
            Ok(pgf)
        }
        None => Ok(Pgf::identity()),
    }
}

fn combine_pair(pair: &[Pgf], config: &EngineConfig) -> QpgfResult<Pgf> {
    match pair {
        [a, b] => compose(a, b, config),
        [a] => Ok(a.clone()),
        _ => Ok(Pgf::identity()),
    }
}

// ============================================================================
// Tests
// ============================================================================
