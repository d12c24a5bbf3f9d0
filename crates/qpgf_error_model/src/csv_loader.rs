//! CSV calibration loading
//!
//! Gantree: L2_ErrorModel → CsvLoader
//!
//! Reads device calibration exports (one row per qubit) into an
//! [`ErrorTable`]. Each mapped column contributes samples to one gate kind;
//! the kind's default rate is the mean of its retained samples. Values at
//! or above the exclusion threshold are dropped as failed calibrations and
//! unparsable cells are skipped.
//!
//! Multi-qubit columns may hold cells like `"3_4:0.0071;3_2:0.0068"`. Every
//! value in such a cell is a sample for the kind, and a parsable `a_b` pair
//! also yields a per-pair override (averaged over repeats).

use crate::error_table::ErrorTable;
use log::{debug, trace};
use qpgf_core::{table, GateKind, Probability, QpgfError, QpgfResult, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Column mapping and filtering rules for a calibration CSV
/// Gantree: CsvLoader // CSV 로더
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvLoader {
    /// CSV column name → gate kind
    pub column_map: BTreeMap<String, GateKind>,

    /// Columns whose cells may hold `pair:value` lists
    pub multi_qubit_columns: BTreeSet<String>,

    /// Values `>=` this are ignored
    pub exclude_threshold: f64,

    /// Column holding the row's qubit index; enables per-qubit overrides
    pub qubit_column: Option<String>,
}

impl CsvLoader {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a loader from a column mapping
    pub fn new(column_map: BTreeMap<String, GateKind>) -> Self {
        Self {
            column_map,
            multi_qubit_columns: BTreeSet::new(),
            exclude_threshold: table::EXCLUDE_THRESHOLD,
            qubit_column: None,
        }
    }

    /// Loader for cleaned IBM Heron exports (columns named after the gates)
    pub fn heron() -> Self {
        Self::for_columns(
            &[
                GateKind::Id,
                GateKind::Rx,
                GateKind::Rz,
                GateKind::Sx,
                GateKind::X,
                GateKind::Cz,
                GateKind::Rzz,
            ],
            &["CZ", "RZZ"],
        )
    }

    /// Loader for cleaned IBM Eagle exports (columns named after the gates)
    pub fn eagle() -> Self {
        Self::for_columns(
            &[
                GateKind::Id,
                GateKind::Rz,
                GateKind::Sx,
                GateKind::X,
                GateKind::Ecr,
            ],
            &["ECR"],
        )
    }

    fn for_columns(kinds: &[GateKind], multi: &[&str]) -> Self {
        let column_map = kinds.iter().map(|k| (k.name().to_string(), *k)).collect();
        let mut loader = Self::new(column_map);
        loader.multi_qubit_columns = multi.iter().map(|c| c.to_string()).collect();
        loader
    }

    /// Set the exclusion threshold
    pub fn with_exclude_threshold(mut self, threshold: f64) -> Self {
        self.exclude_threshold = threshold;
        self
    }

    /// Mark a column as holding `pair:value` lists
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
    // Loading
    // ========================================================================

    /// Load a table from a CSV file
    /// Gantree: load_path(path) -> Result<ErrorTable> // 파일 로드
    pub fn load_path(&self, path: impl AsRef<Path>) -> QpgfResult<ErrorTable> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "csv".to_string());
        self.load_str(&text, &name)
    }

    /// Load a table from CSV text
    /// Gantree: load_str(text, name) -> Result<ErrorTable> // 텍스트 로드
    pub fn load_str(&self, text: &str, name: &str) -> QpgfResult<ErrorTable> {
        if !(self.exclude_threshold > 0.0) {
            return Err(QpgfError::ConfigError(format!(
                "exclude threshold must be positive, got {}",
                self.exclude_threshold
            )));
        }

        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| QpgfError::CsvError("empty input: no header row".into()))?;
        let header = split_record(header)?;

        let mapped: Vec<(usize, GateKind, bool)> = header
            .iter()
            .enumerate()
            .filter_map(|(i, col)| {
                self.column_map
                    .get(col)
                    .map(|&kind| (i, kind, self.multi_qubit_columns.contains(col)))
            })
            .collect();
        let qubit_index = self
            .qubit_column
            .as_ref()
            .and_then(|col| header.iter().position(|h| h == col));

        let mut samples = Accumulator::default();
        let mut qubit_samples = Accumulator::default();
        let mut pair_samples = Accumulator::default();
        let mut rows = 0usize;

        for line in lines {
            let record = split_record(line)?;
            rows += 1;
            let row_qubit: Option<QubitId> = qubit_index
                .and_then(|i| record.get(i))
                .and_then(|cell| cell.parse().ok());

            for &(i, kind, multi) in &mapped {
                let Some(cell) = record.get(i).map(String::as_str) else {
                    continue;
                };
                if cell.is_empty() {
                    continue;
                }

                if multi && (cell.contains(table::PAIR_VALUE_SEPARATOR) || cell.contains(table::PAIR_ENTRY_SEPARATOR)) {
                    for entry in cell.split(table::PAIR_ENTRY_SEPARATOR) {
                        let Some((pair, value)) = parse_pair_entry(entry) else {
                            trace!("skipping pair entry '{}' in {}", entry, kind);
                            continue;
                        };
                        if value < self.exclude_threshold {
                            samples.add((kind, 0, 0), value);
                            if let Some((a, b)) = pair {
                                pair_samples.add((kind, a.min(b), a.max(b)), value);
                            }
                        }
                    }
                } else {
                    match cell.parse::<f64>() {
                        Ok(value) if value < self.exclude_threshold => {
                            samples.add((kind, 0, 0), value);
                            if let (Some(q), false) = (row_qubit, kind.is_two_qubit()) {
                                qubit_samples.add((kind, q, 0), value);
                            }
                        }
                        Ok(_) => trace!("excluding {} value {}", kind, cell),
                        Err(_) => trace!("skipping unparsable {} cell '{}'", kind, cell),
                    }
                }
            }
        }

        let mut table = ErrorTable::new(name);
        for ((kind, _, _), mean) in samples.means() {
            table.set_rate(kind, Probability::new(mean)?);
        }
        for ((kind, q, _), mean) in qubit_samples.means() {
            table.set_qubit_rate(kind, q, Probability::new(mean)?);
        }
        for ((kind, a, b), mean) in pair_samples.means() {
            table.set_pair_rate(kind, a, b, Probability::new(mean)?);
        }

        debug!(
            "loaded {} rows into {} ({} kinds, {} overrides)",
            rows,
            name,
            table.len(),
            table.override_count()
        );
        Ok(table)
    }
}

impl ErrorTable {
    /// Load from CSV text with the given loader rules
    pub fn from_csv_str(text: &str, name: &str, loader: &CsvLoader) -> QpgfResult<Self> {
        loader.load_str(text, name)
    }

    /// Load from a CSV file with the given loader rules
    pub fn from_csv_path(path: impl AsRef<Path>, loader: &CsvLoader) -> QpgfResult<Self> {
        loader.load_path(path)
    }
}

// ============================================================================
// Parsing Helpers
// ============================================================================

type SampleKey = (GateKind, QubitId, QubitId);

/// Running sums for averaging
#[derive(Default)]
struct Accumulator {
    sums: BTreeMap<SampleKey, (f64, usize)>,
}

impl Accumulator {
    fn add(&mut self, key: SampleKey, value: f64) {
        let entry = self.sums.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    fn means(self) -> impl Iterator<Item = (SampleKey, f64)> {
        self.sums
            .into_iter()
            .map(|(key, (sum, n))| (key, sum / n as f64))
    }
}

/// `"3_4:0.0071"` → (Some((3, 4)), 0.0071); a malformed pair keeps the value
fn parse_pair_entry(entry: &str) -> Option<(Option<(QubitId, QubitId)>, f64)> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    let mut parts = entry.split(table::PAIR_VALUE_SEPARATOR);
    let (pair, value) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let value: f64 = value.trim().parse().ok()?;
    let pair = pair.trim().split_once(table::PAIR_QUBIT_SEPARATOR).and_then(|(a, b)| {
        Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
    });
    Some((pair, value))
}

/// Split one CSV record, honoring double-quoted fields and `""` escapes
fn split_record(line: &str) -> QpgfResult<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(QpgfError::CsvError(format!("unterminated quote in: {}", line)));
    }
    fields.push(field.trim().to_string());
    Ok(fields)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qpgf_core::QubitSpan;

    const HERON_CSV: &str = "\
Qubit,ID,RX,RZ,SX,X,CZ,RZZ
0,0.0002,0.0002,0,0.0002,0.0002,0_1:0.003;0_2:0.005,0_1:0.004
1,0.0004,0.0004,0,0.0004,0.0004,1_0:0.001,1
2,1.0,0.0006,0,0.0006,0.0006,,
";

    #[test]
    fn test_split_record_quotes() {
        let fields = split_record(r#"a, "b,c" ,"say ""hi""""#).unwrap();
        assert_eq!(fields, vec!["a", "b,c", r#"say "hi""#]);
        assert!(split_record("\"open").is_err());
    }

    #[test]
    fn test_parse_pair_entry() {
        assert_eq!(parse_pair_entry("3_4:0.01"), Some((Some((3, 4)), 0.01)));
        assert_eq!(parse_pair_entry("cz3:0.02"), Some((None, 0.02)));
        assert_eq!(parse_pair_entry("3_4"), None);
        assert_eq!(parse_pair_entry(""), None);
    }

    #[test]
    fn test_heron_means_and_exclusion() {
        let table = CsvLoader::heron().load_str(HERON_CSV, "heron").unwrap();

        // ID: 1.0 is excluded, mean of 0.0002 and 0.0004
        assert_abs_diff_eq!(table.rate(GateKind::Id).unwrap().value(), 0.0003, epsilon = 1e-12);
        // SX: mean of three rows
        assert_abs_diff_eq!(table.rate(GateKind::Sx).unwrap().value(), 0.0004, epsilon = 1e-12);
        // CZ: 0.003, 0.005, 0.001
        assert_abs_diff_eq!(table.rate(GateKind::Cz).unwrap().value(), 0.003, epsilon = 1e-12);
        // RZZ: plain "1" is excluded, only 0.004 remains
        assert_abs_diff_eq!(table.rate(GateKind::Rzz).unwrap().value(), 0.004, epsilon = 1e-12);
        assert!(table.rate(GateKind::Rz).unwrap().is_zero());
    }

    #[test]
    fn test_pair_overrides_average_repeats() {
        let table = CsvLoader::heron().load_str(HERON_CSV, "heron").unwrap();
        // 0_1 and 1_0 are the same pair
        let rate = table.lookup(GateKind::Cz, QubitSpan::Two(1, 0)).unwrap();
        assert_abs_diff_eq!(rate.value(), 0.002, epsilon = 1e-12);
        let rate = table.lookup(GateKind::Cz, QubitSpan::Two(0, 2)).unwrap();
        assert_abs_diff_eq!(rate.value(), 0.005, epsilon = 1e-12);
    }

    #[test]
    fn test_qubit_column_overrides() {
        let loader = CsvLoader::heron().with_qubit_column("Qubit");
        let table = loader.load_str(HERON_CSV, "heron").unwrap();
        let rate = table.lookup(GateKind::Sx, QubitSpan::One(2)).unwrap();
        assert_abs_diff_eq!(rate.value(), 0.0006, epsilon = 1e-12);
        // Qubit 2's ID value was excluded, so it falls back to the mean
        let rate = table.lookup(GateKind::Id, QubitSpan::One(2)).unwrap();
        assert_abs_diff_eq!(rate.value(), 0.0003, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_threshold_and_garbage() {
        let csv = "X,CZ\nabc,0_1:bad\n0.5,\n0.2,\n";
        let loader = CsvLoader::eagle()
            .with_exclude_threshold(0.4)
            .with_multi_qubit_column("CZ");
        let mut map = loader.column_map.clone();
        map.insert("CZ".into(), GateKind::Cz);
        let loader = CsvLoader { column_map: map, ..loader };

        let table = loader.load_str(csv, "t").unwrap();
        assert_abs_diff_eq!(table.rate(GateKind::X).unwrap().value(), 0.2);
        assert!(!table.contains(GateKind::Cz));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            CsvLoader::heron().load_str("", "t"),
            Err(QpgfError::CsvError(_))
        ));
        assert!(matches!(
            CsvLoader::heron().load_str("X\n-0.5\n", "t"),
            Err(QpgfError::InvalidProbability(_))
        ));
        assert!(matches!(
            CsvLoader::heron().with_exclude_threshold(0.0).load_str("X\n0.1\n", "t"),
            Err(QpgfError::ConfigError(_))
        ));
    }
}
