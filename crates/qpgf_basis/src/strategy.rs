//! Decomposition strategy switch
//!
//! Gantree: L3_Basis → DecompositionStrategy

use qpgf_core::{QpgfError, QpgfResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How compound gates become error sources
///
/// - `Atomic`: one error source per logical gate, with the gate's calibrated
///   rate (or the combined rate of its native sub-gates).
/// - `Decomposed`: one error source per native sub-gate.
///
/// Gantree: DecompositionStrategy // 분해 전략
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionStrategy {
    /// One error source per compound gate
    Atomic,
    /// One error source per native sub-gate
    #[default]
    Decomposed,
}

impl DecompositionStrategy {
    /// Canonical lower-case name
    pub fn name(&self) -> &'static str {
        match self {
            DecompositionStrategy::Atomic => "atomic",
            DecompositionStrategy::Decomposed => "decomposed",
        }
    }

    /// Parse a strategy name; `unit` and `decompose` are accepted aliases
    pub fn parse(s: &str) -> QpgfResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" | "unit" => Ok(DecompositionStrategy::Atomic),
            "decomposed" | "decompose" => Ok(DecompositionStrategy::Decomposed),
            other => Err(QpgfError::ConfigError(format!(
                "unknown decomposition strategy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DecompositionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DecompositionStrategy {
    type Err = QpgfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
