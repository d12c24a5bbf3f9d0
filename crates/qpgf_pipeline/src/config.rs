//! Integrated configuration for QPGF
//!
//! Gantree: L5_Integration → QpgfConfig
//!
//! One configuration for the whole path from calibration CSV to report:
//! which hardware to map onto, how compound gates become error sources,
//! how the engine multiplies, and how the CSV columns are read.

use log::debug;
use qpgf_basis::{BasisResolver, DecompositionStrategy, HardwareTarget};
use qpgf_core::{summary, table, GateKind, QpgfError, QpgfResult};
use qpgf_engine::EngineConfig;
use qpgf_error_model::{CsvLoader, ErrorTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// Unified QPGF configuration
/// Gantree: QpgfConfig // 통합 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QpgfConfig {
    // ========================================================================
    // Mapping
    // ========================================================================
    /// Hardware target
    pub hardware: HardwareTarget,

    /// Atomic or decomposed error sources
    pub strategy: DecompositionStrategy,

    // ========================================================================
    // Engine
    // ========================================================================
    /// Convolution and reduction settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Tail threshold for report summaries (`None` disables)
    pub tail_threshold: Option<f64>,

    // ========================================================================
    // Calibration CSV
    // ========================================================================
    /// CSV values at or above this are dropped
    pub exclude_threshold: f64,

    /// CSV column → gate kind
    pub column_map: BTreeMap<String, GateKind>,

    /// Columns holding `a_b:value` lists
    #[serde(default)]
    pub multi_qubit_columns: BTreeSet<String>,

    /// Column with the row's qubit index
    #[serde(default)]
    pub qubit_column: Option<String>,
}

impl QpgfConfig {
    // ========================================================================
    // Presets
    // ========================================================================

    /// Heron target, decomposed, Heron CSV columns
    pub fn heron() -> Self {
        Self::for_target(HardwareTarget::Heron)
    }

    /// Eagle target, decomposed, Eagle CSV columns
    pub fn eagle() -> Self {
        Self::for_target(HardwareTarget::Eagle)
    }

    /// Defaults for one target
    pub fn for_target(hardware: HardwareTarget) -> Self {
        let loader = match hardware {
            HardwareTarget::Eagle => CsvLoader::eagle(),
            HardwareTarget::Heron => CsvLoader::heron(),
        };
        Self {
            hardware,
            strategy: DecompositionStrategy::default(),
            engine: EngineConfig::default(),
            tail_threshold: Some(summary::DEFAULT_TAIL_THRESHOLD),
            exclude_threshold: table::EXCLUDE_THRESHOLD,
            column_map: loader.column_map,
            multi_qubit_columns: loader.multi_qubit_columns,
            qubit_column: loader.qubit_column,
        }
    }

    /// Atomic strategy on one target
    pub fn atomic(hardware: HardwareTarget) -> Self {
        Self::for_target(hardware).with_strategy(DecompositionStrategy::Atomic)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Switch hardware target and its CSV column preset
    pub fn with_hardware(self, hardware: HardwareTarget) -> Self {
        Self {
            strategy: self.strategy,
            engine: self.engine,
            tail_threshold: self.tail_threshold,
            exclude_threshold: self.exclude_threshold,
            ..Self::for_target(hardware)
        }
    }

    /// Set decomposition strategy
    pub fn with_strategy(mut self, strategy: DecompositionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set engine configuration
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Set tail threshold
    pub fn with_tail_threshold(mut self, threshold: Option<f64>) -> Self {
        self.tail_threshold = threshold;
        self
    }

    /// Set CSV exclusion threshold
    pub fn with_exclude_threshold(mut self, threshold: f64) -> Self {
        self.exclude_threshold = threshold;
        self
    }

    /// Map one more CSV column
    pub fn with_column(mut self, column: impl Into<String>, kind: GateKind) -> Self {
        self.column_map.insert(column.into(), kind);
        self
    }

    /// Mark a column as holding pair lists
    pub fn with_multi_qubit_column(mut self, column: impl Into<String>) -> Self {
        self.multi_qubit_columns.insert(column.into());
        self
    }

    /// Set the qubit index column
    pub fn with_qubit_column(mut self, column: impl Into<String>) -> Self {
        self.qubit_column = Some(column.into());
        self
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// CSV loader for this configuration
    pub fn to_csv_loader(&self) -> CsvLoader {
        CsvLoader {
            column_map: self.column_map.clone(),
            multi_qubit_columns: self.multi_qubit_columns.clone(),
            exclude_threshold: self.exclude_threshold,
            qubit_column: self.qubit_column.clone(),
        }
    }

    /// Resolver for this configuration
    pub fn to_resolver(&self) -> BasisResolver {
        BasisResolver::new(self.hardware, self.strategy)
    }

    /// Typical error table of the target, used when no calibration is given
    pub fn default_table(&self) -> ErrorTable {
        match self.hardware {
            HardwareTarget::Eagle => ErrorTable::ibm_eagle_typical(),
            HardwareTarget::Heron => ErrorTable::ibm_heron_typical(),
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> QpgfResult<()> {
        self.engine.validate()?;

        if !(self.exclude_threshold > 0.0) || !self.exclude_threshold.is_finite() {
            return Err(QpgfError::ConfigError(format!(
                "exclude_threshold must be positive, got {}",
                self.exclude_threshold
            )));
        }

        if let Some(t) = self.tail_threshold {
            if !(t > 0.0 && t <= 1.0) {
                return Err(QpgfError::ConfigError(format!(
                    "tail_threshold must be in (0, 1], got {}",
                    t
                )));
            }
        }

        if self.column_map.is_empty() {
            return Err(QpgfError::ConfigError("column_map is empty".into()));
        }

        for column in &self.multi_qubit_columns {
            match self.column_map.get(column) {
                Some(kind) if kind.is_two_qubit() => {}
                Some(kind) => {
                    return Err(QpgfError::ConfigError(format!(
                        "multi-qubit column '{}' maps to single-qubit gate {}",
                        column, kind
                    )))
                }
                None => {
                    return Err(QpgfError::ConfigError(format!(
                        "multi-qubit column '{}' is not in column_map",
                        column
                    )))
                }
            }
        }

        Ok(())
    }

    /// Check whether the configuration matches its target preset
    pub fn is_preset(&self) -> bool {
        let preset = Self::for_target(self.hardware);
        self.column_map == preset.column_map && self.multi_qubit_columns == preset.multi_qubit_columns
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QpgfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate JSON
    pub fn from_json(json: &str) -> QpgfResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_path(path: impl AsRef<Path>) -> QpgfResult<Self> {
        let path = path.as_ref();
        debug!("loading config from {}", path.display());
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Write to a JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> QpgfResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Default for QpgfConfig {
    fn default() -> Self {
        Self::heron()
    }
}

impl fmt::Display for QpgfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QPGF Configuration:")?;
        writeln!(f, "  Hardware: {}", self.hardware)?;
        writeln!(f, "  Strategy: {}", self.strategy)?;
        writeln!(f, "  Engine: {}", self.engine)?;
        match self.tail_threshold {
            Some(t) => writeln!(f, "  Tail threshold: {}", t)?,
            None => writeln!(f, "  Tail threshold: off")?,
        }
        write!(
            f,
            "  CSV: {} columns ({} multi-qubit), exclude >= {}",
            self.column_map.len(),
            self.multi_qubit_columns.len(),
            self.exclude_threshold
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
    fn test_presets() {
        let heron = QpgfConfig::heron();
        assert_eq!(heron.hardware, HardwareTarget::Heron);
        assert_eq!(heron.strategy, DecompositionStrategy::Decomposed);
        assert_eq!(heron.column_map["CZ"], GateKind::Cz);
        assert!(heron.multi_qubit_columns.contains("RZZ"));
        assert!(heron.validate().is_ok());

        let eagle = QpgfConfig::eagle();
        assert_eq!(eagle.column_map["ECR"], GateKind::Ecr);
        assert!(!eagle.column_map.contains_key("CZ"));
        assert!(eagle.is_preset());
    }

    #[test]
    fn test_with_hardware_keeps_engine_settings() {
        let config = QpgfConfig::heron()
            .with_strategy(DecompositionStrategy::Atomic)
            .with_engine(EngineConfig::exact())
            .with_hardware(HardwareTarget::Eagle);

        assert_eq!(config.hardware, HardwareTarget::Eagle);
        assert_eq!(config.strategy, DecompositionStrategy::Atomic);
        assert_eq!(config.engine, EngineConfig::exact());
        assert!(config.column_map.contains_key("ECR"));
    }

    #[test]
    fn test_validation() {
        assert!(QpgfConfig::heron().with_exclude_threshold(0.0).validate().is_err());
        assert!(QpgfConfig::heron().with_tail_threshold(Some(1.5)).validate().is_err());
        assert!(QpgfConfig::heron().with_tail_threshold(None).validate().is_ok());
        assert!(QpgfConfig::heron().with_multi_qubit_column("SX").validate().is_err());
        assert!(QpgfConfig::heron().with_multi_qubit_column("NOPE").validate().is_err());
        assert!(QpgfConfig::heron()
            .with_engine(EngineConfig::default().with_tolerance(2.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_custom_columns_not_preset() {
        let config = QpgfConfig::heron().with_column("sx_err", GateKind::Sx);
        assert!(!config.is_preset());
        let loader = config.to_csv_loader();
        assert_eq!(loader.column_map["sx_err"], GateKind::Sx);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = QpgfConfig::eagle()
            .with_qubit_column("Qubit")
            .with_tail_threshold(Some(0.05));
        let restored = QpgfConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let mut config = QpgfConfig::heron();
        config.exclude_threshold = -1.0;
        let json = serde_json::to_string(&config).unwrap();
        assert!(QpgfConfig::from_json(&json).is_err());
        assert!(QpgfConfig::from_json("{").is_err());
    }

    #[test]
    fn test_display() {
        let s = QpgfConfig::heron().to_string();
        assert!(s.contains("Hardware: HERON"));
        assert!(s.contains("Tail threshold: 0.01"));
    }
}
