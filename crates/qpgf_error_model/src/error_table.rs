//! Per-gate error tables
//!
//! Gantree: L2_ErrorModel → ErrorTable
//!
//! Maps (gate kind, qubit or qubit pair) to a calibrated error probability.
//! Lookups fall back from the most specific entry to the kind's default:
//! pair/qubit override first, then the kind-wide rate.

use log::trace;
use qpgf_core::{GateKind, Probability, QpgfError, QpgfResult, QubitId, QubitSpan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Calibrated error rates for one device
/// Gantree: ErrorTable // 에러 테이블
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ErrorTableRepr", into = "ErrorTableRepr")]
pub struct ErrorTable {
    /// Device or data-set name
    /// Gantree: name: String // 이름
    pub name: String,

    /// Kind-wide default rates
    /// Gantree: rates: BTreeMap<GateKind,Probability> // 기본 에러율
    rates: BTreeMap<GateKind, Probability>,

    /// Per-qubit overrides for single-qubit kinds
    qubit_rates: BTreeMap<(GateKind, QubitId), Probability>,

    /// Per-pair overrides for two-qubit kinds, keyed with the smaller qubit first
    pair_rates: BTreeMap<(GateKind, QubitId, QubitId), Probability>,
}

impl ErrorTable {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Same rate for every single-qubit kind and every two-qubit kind
    pub fn uniform(name: impl Into<String>, error_1q: Probability, error_2q: Probability) -> Self {
        let mut table = Self::new(name);
        for kind in GateKind::ALL {
            let rate = if kind.is_two_qubit() { error_2q } else { error_1q };
            table.set_rate(kind, rate);
        }
        table
    }

    /// Typical IBM Eagle rates for its native basis (RZ is virtual)
    /// Gantree: ibm_eagle_typical() -> Self // Eagle 전형
    pub fn ibm_eagle_typical() -> Self {
        Self::from_raw(
            "ibm_eagle_typical",
            &[
                (GateKind::Id, 2.5e-4),
                (GateKind::Rz, 0.0),
                (GateKind::Sx, 2.5e-4),
                (GateKind::X, 2.5e-4),
                (GateKind::Ecr, 7.5e-3),
            ],
        )
    }

    /// Typical IBM Heron rates for its native basis (RZ is virtual)
    /// Gantree: ibm_heron_typical() -> Self // Heron 전형
    pub fn ibm_heron_typical() -> Self {
        Self::from_raw(
            "ibm_heron_typical",
            &[
                (GateKind::Id, 2.0e-4),
                (GateKind::Rx, 2.0e-4),
                (GateKind::Rz, 0.0),
                (GateKind::Sx, 2.0e-4),
                (GateKind::X, 2.0e-4),
                (GateKind::Cz, 3.0e-3),
                (GateKind::Rzz, 3.5e-3),
            ],
        )
    }

    // Presets only carry literal rates that are in range
    fn from_raw(name: &str, entries: &[(GateKind, f64)]) -> Self {
        let mut table = Self::new(name);
        for &(kind, rate) in entries {
            if let Ok(p) = Probability::new(rate) {
                table.set_rate(kind, p);
            }
        }
        table
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Set the kind-wide rate
    /// Gantree: set_rate(kind, p) // 기본값 설정
    pub fn set_rate(&mut self, kind: GateKind, rate: Probability) {
        self.rates.insert(kind, rate);
    }

    /// Set a per-qubit override
    pub fn set_qubit_rate(&mut self, kind: GateKind, qubit: QubitId, rate: Probability) {
        self.qubit_rates.insert((kind, qubit), rate);
    }

    /// Set a per-pair override (operand order does not matter)
    pub fn set_pair_rate(&mut self, kind: GateKind, a: QubitId, b: QubitId, rate: Probability) {
        self.pair_rates.insert((kind, a.min(b), a.max(b)), rate);
    }

    /// Builder-style kind-wide rate from a raw value
    pub fn with_rate(mut self, kind: GateKind, rate: f64) -> QpgfResult<Self> {
        self.set_rate(kind, Probability::new(rate)?);
        Ok(self)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Kind-wide rate, if present
    pub fn rate(&self, kind: GateKind) -> Option<Probability> {
        self.rates.get(&kind).copied()
    }

    /// Check whether the kind has any rate at all
    pub fn contains(&self, kind: GateKind) -> bool {
        self.rates.contains_key(&kind)
    }

    /// Resolve the rate for a gate applied to `qubits`
    /// Gantree: lookup(kind, span) -> Result<Probability> // 에러율 조회
    pub fn lookup(&self, kind: GateKind, qubits: QubitSpan) -> QpgfResult<Probability> {
        let specific = match qubits {
            QubitSpan::One(q) => self.qubit_rates.get(&(kind, q)),
            QubitSpan::Two(a, b) => self.pair_rates.get(&(kind, a.min(b), a.max(b))),
        };

        if let Some(&rate) = specific {
            trace!("{} {}: calibrated override {}", kind, qubits, rate);
            return Ok(rate);
        }

        self.rate(kind).ok_or_else(|| QpgfError::MissingErrorRate {
            gate: kind.name().to_string(),
        })
    }

    /// Kinds with a kind-wide rate
    pub fn kinds(&self) -> impl Iterator<Item = GateKind> + '_ {
        self.rates.keys().copied()
    }

    /// Number of kind-wide rates
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if there are no kind-wide rates
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Number of qubit and pair overrides
    pub fn override_count(&self) -> usize {
        self.qubit_rates.len() + self.pair_rates.len()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QpgfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> QpgfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_json_path(path: impl AsRef<Path>) -> QpgfResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl fmt::Display for ErrorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorTable({}", self.name)?;
        for (kind, rate) in &self.rates {
            write!(f, ", {}={:.2e}", kind, rate.value())?;
        }
        if self.override_count() > 0 {
            write!(f, ", {} overrides", self.override_count())?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Serde Representation
// ============================================================================

/// Flat entry list; tuple-keyed maps cannot be JSON object keys
#[derive(Serialize, Deserialize)]
struct ErrorTableRepr {
    name: String,
    entries: Vec<ErrorEntry>,
}

#[derive(Serialize, Deserialize)]
struct ErrorEntry {
    gate: GateKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    qubits: Vec<QubitId>,
    rate: Probability,
}

impl From<ErrorTable> for ErrorTableRepr {
    fn from(table: ErrorTable) -> Self {
        let mut entries: Vec<ErrorEntry> = table
            .rates
            .iter()
            .map(|(&gate, &rate)| ErrorEntry {
                gate,
                qubits: Vec::new(),
                rate,
            })
            .collect();
        entries.extend(
            table
                .qubit_rates
                .iter()
                .map(|(&(gate, q), &rate)| ErrorEntry {
                    gate,
                    qubits: vec![q],
                    rate,
                }),
        );
        entries.extend(
            table
                .pair_rates
                .iter()
                .map(|(&(gate, a, b), &rate)| ErrorEntry {
                    gate,
                    qubits: vec![a, b],
                    rate,
                }),
        );
        Self {
            name: table.name,
            entries,
        }
    }
}

impl From<ErrorTableRepr> for ErrorTable {
    fn from(repr: ErrorTableRepr) -> Self {
        let mut table = ErrorTable::new(repr.name);
        for entry in repr.entries {
            match entry.qubits.as_slice() {
                [] => table.set_rate(entry.gate, entry.rate),
                [q] => table.set_qubit_rate(entry.gate, *q, entry.rate),
                [a, b, ..] => table.set_pair_rate(entry.gate, *a, *b, entry.rate),
            }
        }
        table
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(v: f64) -> Probability {
        Probability::new(v).unwrap()
    }

    #[test]
    fn test_lookup_default() {
        let table = ErrorTable::new("t").with_rate(GateKind::Sx, 0.001).unwrap();
        let rate = table.lookup(GateKind::Sx, QubitSpan::One(3)).unwrap();
        assert_abs_diff_eq!(rate.value(), 0.001);
    }

    #[test]
    fn test_lookup_missing() {
        let table = ErrorTable::new("t");
        assert!(matches!(
            table.lookup(GateKind::Cz, QubitSpan::Two(0, 1)),
            Err(QpgfError::MissingErrorRate { .. })
        ));
    }

    #[test]
    fn test_lookup_overrides() {
        let mut table = ErrorTable::uniform("t", p(0.001), p(0.01));
        table.set_qubit_rate(GateKind::X, 2, p(0.005));
        table.set_pair_rate(GateKind::Cz, 4, 3, p(0.05));

        assert_abs_diff_eq!(
            table.lookup(GateKind::X, QubitSpan::One(2)).unwrap().value(),
            0.005
        );
        assert_abs_diff_eq!(
            table.lookup(GateKind::X, QubitSpan::One(1)).unwrap().value(),
            0.001
        );
        // Pair overrides are symmetric
        assert_abs_diff_eq!(
            table.lookup(GateKind::Cz, QubitSpan::Two(3, 4)).unwrap().value(),
            0.05
        );
        assert_abs_diff_eq!(
            table.lookup(GateKind::Cz, QubitSpan::Two(0, 1)).unwrap().value(),
            0.01
        );
    }

    #[test]
    fn test_with_rate_validates() {
        assert!(matches!(
            ErrorTable::new("t").with_rate(GateKind::X, 1.5),
            Err(QpgfError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_presets_cover_native_bases() {
        let eagle = ErrorTable::ibm_eagle_typical();
        for kind in [GateKind::Id, GateKind::Rz, GateKind::Sx, GateKind::X, GateKind::Ecr] {
            assert!(eagle.contains(kind), "{}", kind);
        }
        let heron = ErrorTable::ibm_heron_typical();
        assert_eq!(heron.len(), 7);
        assert!(heron.rate(GateKind::Rz).unwrap().is_zero());
    }

    #[test]
    fn test_json_roundtrip_keeps_overrides() {
        let mut table = ErrorTable::ibm_heron_typical();
        table.set_qubit_rate(GateKind::Sx, 5, p(0.002));
        table.set_pair_rate(GateKind::Cz, 1, 2, p(0.02));

        let json = table.to_json().unwrap();
        let restored = ErrorTable::from_json(&json).unwrap();
        assert_eq!(table, restored);
        assert_eq!(restored.override_count(), 2);
    }

    #[test]
    fn test_json_rejects_bad_rate() {
        let json = r#"{"name":"bad","entries":[{"gate":"X","rate":2.0}]}"#;
        assert!(ErrorTable::from_json(json).is_err());
    }
}
