//! Hardware targets and decomposition rules
//!
//! Gantree: L3_Basis → HardwareTarget
//!
//! Each target has a native gate set and a rule table that rewrites the
//! remaining logical gates into native ones. Angles are carried through so
//! the rewritten circuit can be emitted as QASM.

use qpgf_core::{Gate, GateKind, QpgfError, QpgfResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt;
use std::str::FromStr;

/// IBM Eagle native basis
pub const EAGLE_BASIS: &[GateKind] = &[
    GateKind::Ecr,
    GateKind::Id,
    GateKind::Rz,
    GateKind::Sx,
    GateKind::X,
];

/// IBM Heron native basis
pub const HERON_BASIS: &[GateKind] = &[
    GateKind::Cz,
    GateKind::Id,
    GateKind::Rx,
    GateKind::Rz,
    GateKind::Rzz,
    GateKind::Sx,
    GateKind::X,
];

/// Supported hardware families
/// Gantree: HardwareTarget // 하드웨어 대상
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HardwareTarget {
    /// IBM Eagle (ECR-based)
    Eagle,
    /// IBM Heron (CZ-based)
    #[default]
    Heron,
}

impl HardwareTarget {
    /// All targets
    pub const ALL: [HardwareTarget; 2] = [HardwareTarget::Eagle, HardwareTarget::Heron];

    /// Canonical upper-case name
    pub fn name(&self) -> &'static str {
        match self {
            HardwareTarget::Eagle => "EAGLE",
            HardwareTarget::Heron => "HERON",
        }
    }

    /// Parse a target name (case-insensitive)
    /// Gantree: parse(s) -> Result<Self> // 이름 파싱
    pub fn parse(s: &str) -> QpgfResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EAGLE" => Ok(HardwareTarget::Eagle),
            "HERON" => Ok(HardwareTarget::Heron),
            other => Err(QpgfError::UnknownArchitecture(other.to_string())),
        }
    }

    /// Native gate kinds
    pub fn basis(&self) -> &'static [GateKind] {
        match self {
            HardwareTarget::Eagle => EAGLE_BASIS,
            HardwareTarget::Heron => HERON_BASIS,
        }
    }

    /// Check whether a kind runs natively
    pub fn is_native(&self, kind: GateKind) -> bool {
        self.basis().contains(&kind)
    }

    /// Check whether a kind is native or has a rewrite rule
    pub fn supports(&self, kind: GateKind) -> bool {
        self.is_native(kind) || self.has_rule(kind)
    }

    fn has_rule(&self, kind: GateKind) -> bool {
        matches!(
            kind,
            GateKind::H
                | GateKind::Y
                | GateKind::Z
                | GateKind::S
                | GateKind::T
                | GateKind::Cx
                | GateKind::Ry
                | GateKind::U
        )
    }

    /// Rewrite one gate into native gates
    ///
    /// Native gates come back unchanged as a single-element list.
    /// Gantree: decompose(&Gate) -> Result<Vec<Gate>> // 네이티브 분해
    pub fn decompose(&self, gate: &Gate) -> QpgfResult<Vec<Gate>> {
        if let Some(bad) = gate.params().into_iter().find(|a| !a.is_finite()) {
            return Err(QpgfError::InvalidGateParameter(format!(
                "{} has non-finite angle {}",
                gate.kind(),
                bad
            )));
        }

        if self.is_native(gate.kind()) {
            return Ok(vec![gate.clone()]);
        }

        let native = match (*self, gate) {
            // Shared single-qubit rules
            (_, Gate::H(q)) => vec![Gate::Rz(*q, PI), Gate::Sx(*q), Gate::Rz(*q, PI)],
            (_, Gate::Y(q)) => vec![Gate::Rz(*q, FRAC_PI_2), Gate::X(*q), Gate::Rz(*q, -FRAC_PI_2)],
            (_, Gate::Z(q)) => vec![Gate::Rz(*q, PI)],
            (_, Gate::S(q)) => vec![Gate::Rz(*q, FRAC_PI_2)],
            (_, Gate::T(q)) => vec![Gate::Rz(*q, FRAC_PI_4)],

            // Eagle
            (HardwareTarget::Eagle, Gate::Cx(c, t)) => vec![Gate::Ecr(*c, *t)],
            (HardwareTarget::Eagle, Gate::Ry(q, theta)) => vec![
                Gate::Rz(*q, FRAC_PI_2),
                Gate::Sx(*q),
                Gate::Rz(*q, *theta),
                Gate::Sx(*q),
                Gate::Rz(*q, -FRAC_PI_2),
            ],
            (HardwareTarget::Eagle, Gate::U(q, theta, phi, lambda)) => vec![
                Gate::Rz(*q, *phi),
                Gate::Rz(*q, FRAC_PI_2),
                Gate::Sx(*q),
                Gate::Rz(*q, *theta),
                Gate::Sx(*q),
                Gate::Rz(*q, -FRAC_PI_2),
                Gate::Rz(*q, *lambda),
            ],

            // Heron
            (HardwareTarget::Heron, Gate::Cx(c, t)) => vec![Gate::Cz(*c, *t)],
            (HardwareTarget::Heron, Gate::Ry(q, theta)) => vec![
                Gate::Rx(*q, FRAC_PI_2),
                Gate::Rz(*q, *theta),
                Gate::Rx(*q, -FRAC_PI_2),
            ],
            (HardwareTarget::Heron, Gate::U(q, theta, phi, lambda)) => vec![
                Gate::Rz(*q, *phi),
                Gate::Rx(*q, FRAC_PI_2),
                Gate::Rz(*q, *theta),
                Gate::Rx(*q, -FRAC_PI_2),
                Gate::Rz(*q, *lambda),
            ],

            (target, other) => {
                return Err(QpgfError::UnsupportedGate(format!(
                    "{} has no native form on {}",
                    other.kind(),
                    target
                )))
            }
        };

        Ok(native)
    }
}

impl fmt::Display for HardwareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HardwareTarget {
    type Err = QpgfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn kinds(gates: &[Gate]) -> Vec<GateKind> {
        gates.iter().map(Gate::kind).collect()
    }

    #[test]
    fn test_parse() {
        assert_eq!(HardwareTarget::parse("heron").unwrap(), HardwareTarget::Heron);
        assert_eq!("EAGLE".parse::<HardwareTarget>().unwrap(), HardwareTarget::Eagle);
        assert!(matches!(
            HardwareTarget::parse("falcon"),
            Err(QpgfError::UnknownArchitecture(_))
        ));
    }

    #[test]
    fn test_native_passthrough() {
        let gate = Gate::Rzz(0, 1, 0.3);
        assert_eq!(HardwareTarget::Heron.decompose(&gate).unwrap(), vec![gate]);
    }

    #[test]
    fn test_eagle_rules() {
        let eagle = HardwareTarget::Eagle;
        assert_eq!(
            kinds(&eagle.decompose(&Gate::Ry(0, 0.4)).unwrap()),
            vec![GateKind::Rz, GateKind::Sx, GateKind::Rz, GateKind::Sx, GateKind::Rz]
        );
        assert_eq!(eagle.decompose(&Gate::Cx(2, 1)).unwrap(), vec![Gate::Ecr(2, 1)]);
        assert_eq!(eagle.decompose(&Gate::U(0, 0.1, 0.2, 0.3)).unwrap().len(), 7);
        assert_eq!(
            kinds(&eagle.decompose(&Gate::H(0)).unwrap()),
            vec![GateKind::Rz, GateKind::Sx, GateKind::Rz]
        );
    }

    #[test]
    fn test_heron_rules() {
        let heron = HardwareTarget::Heron;
        assert_eq!(heron.decompose(&Gate::Cx(0, 1)).unwrap(), vec![Gate::Cz(0, 1)]);
        assert_eq!(heron.decompose(&Gate::U(0, 0.1, 0.2, 0.3)).unwrap().len(), 5);

        let ry = heron.decompose(&Gate::Ry(3, 0.7)).unwrap();
        assert_eq!(kinds(&ry), vec![GateKind::Rx, GateKind::Rz, GateKind::Rx]);
        match ry[1] {
            Gate::Rz(q, theta) => {
                assert_eq!(q, 3);
                assert_abs_diff_eq!(theta, 0.7);
            }
            ref other => panic!("unexpected {}", other),
        }
    }

    #[test]
    fn test_unsupported_and_bad_params() {
        assert!(matches!(
            HardwareTarget::Eagle.decompose(&Gate::Cz(0, 1)),
            Err(QpgfError::UnsupportedGate(_))
        ));
        assert!(matches!(
            HardwareTarget::Heron.decompose(&Gate::Ecr(0, 1)),
            Err(QpgfError::UnsupportedGate(_))
        ));
        assert!(matches!(
            HardwareTarget::Heron.decompose(&Gate::U(0, f64::NAN, 0.0, 0.0)),
            Err(QpgfError::InvalidGateParameter(_))
        ));
    }

    #[test]
    fn test_every_rule_lands_in_basis() {
        for target in HardwareTarget::ALL {
            for kind in GateKind::ALL.iter().filter(|k| target.supports(**k)) {
                let qubits: Vec<_> = (0..kind.arity()).collect();
                let params = vec![0.25; kind.num_params()];
                let gate = Gate::from_parts(*kind, &qubits, &params).unwrap();
                for sub in target.decompose(&gate).unwrap() {
                    assert!(target.is_native(sub.kind()), "{} {} -> {}", target, kind, sub);
                }
            }
        }
    }
}
