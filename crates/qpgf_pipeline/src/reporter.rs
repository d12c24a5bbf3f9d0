//! Distribution reporting
//!
//! Gantree: L5_Integration → Reporter
//!
//! Renders a [`DistributionReport`] for the plotting layer or a terminal.
//! CSV is long-form (`scope,qubit,k,probability`), one row per coefficient.

use crate::pipeline::PipelineResult;
use qpgf_core::{QpgfError, QpgfResult};
use qpgf_engine::{DistributionReport, Pgf, PgfSummary};
use std::fmt::{self, Write};
use std::path::Path;
use std::str::FromStr;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown tables
    Markdown,
    /// JSON
    Json,
    /// Long-form CSV
    Csv,
    /// Plain text summary
    Text,
}

impl ReportFormat {
    /// File extension
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Text => "txt",
        }
    }

    /// Guess from a file extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl FromStr for ReportFormat {
    type Err = QpgfError;

    fn from_str(s: &str) -> QpgfResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "txt" | "text" => Ok(ReportFormat::Text),
            other => Err(QpgfError::ConfigError(format!("unknown report format: {}", other))),
        }
    }
}

/// Distribution reporter
/// Gantree: Reporter // 결과 리포팅
pub struct Reporter;

impl Reporter {
    // ========================================================================
    // Format Converters
    // ========================================================================

    /// Generate report in specified format
    pub fn report(report: &DistributionReport, format: ReportFormat, tail: Option<f64>) -> String {
        match format {
            ReportFormat::Markdown => Self::to_markdown(report, tail),
            ReportFormat::Json => Self::to_json(report),
            ReportFormat::Csv => Self::to_csv(report),
            ReportFormat::Text => Self::to_text(report, tail),
        }
    }

    /// Write a report file; the format follows the extension
    pub fn write_to_path(
        report: &DistributionReport,
        path: impl AsRef<Path>,
        tail: Option<f64>,
    ) -> QpgfResult<()> {
        let path = path.as_ref();
        let format = ReportFormat::from_path(path).ok_or_else(|| {
            QpgfError::FileError(format!("no report format for {}", path.display()))
        })?;
        std::fs::write(path, Self::report(report, format, tail))?;
        Ok(())
    }

    /// Markdown summary table plus the global distribution
    pub fn to_markdown(report: &DistributionReport, tail: Option<f64>) -> String {
        render(|out| {
            writeln!(out, "# QPGF Error Distribution\n")?;
            for w in &report.warnings {
                writeln!(out, "> **Warning**: {}\n", w)?;
            }

            writeln!(out, "## Summary\n")?;
            writeln!(out, "| Scope | Mean | Std | Mode | Max P | Support | Tail |")?;
            writeln!(out, "|-------|------|-----|------|-------|---------|------|")?;
            markdown_row(out, "global", &report.global_summary(tail))?;
            for (q, s) in report.qubit_summaries(tail) {
                markdown_row(out, &format!("q{}", q), &s)?;
            }

            writeln!(out, "\n## Global Distribution\n")?;
            writeln!(out, "| k | P(k) | P(X <= k) |")?;
            writeln!(out, "|---|------|-----------|")?;
            for (k, p) in report.global.coefficients().iter().enumerate() {
                writeln!(out, "| {} | {:.6e} | {:.6} |", k, p, report.global.cdf(k))?;
            }
            Ok(())
        })
    }

    /// JSON report
    pub fn to_json(report: &DistributionReport) -> String {
        report.to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Long-form CSV: `global` rows first, then `qubit` rows by index
    pub fn to_csv(report: &DistributionReport) -> String {
        render(|out| {
            writeln!(out, "scope,qubit,k,probability")?;
            csv_rows(out, "global", None, &report.global)?;
            for (&q, pgf) in &report.per_qubit {
                csv_rows(out, "qubit", Some(q), pgf)?;
            }
            Ok(())
        })
    }

    /// Plain text summary
    pub fn to_text(report: &DistributionReport, tail: Option<f64>) -> String {
        render(|out| {
            writeln!(out, "QPGF Error Distribution")?;
            writeln!(out, "=======================\n")?;
            for w in &report.warnings {
                writeln!(out, "Warning: {}", w)?;
            }

            writeln!(out, "Global:")?;
            writeln!(out, "{}\n", indent(&report.global_summary(tail).to_string()))?;

            for (q, s) in report.qubit_summaries(tail) {
                writeln!(out, "Qubit {}:", q)?;
                writeln!(out, "{}\n", indent(&s.to_string()))?;
            }
            Ok(())
        })
    }

    // ========================================================================
    // Specialized Reports
    // ========================================================================

    /// Side-by-side comparison of pipeline runs (e.g. atomic vs decomposed)
    pub fn comparison_report(results: &[PipelineResult]) -> String {
        render(|out| {
            writeln!(out, "# QPGF Comparison Report\n")?;
            writeln!(
                out,
                "| Circuit | Target | Strategy | Ops | Mean | Std | P(0) | Tail | Time(us) |"
            )?;
            writeln!(
                out,
                "|---------|--------|----------|-----|------|-----|------|------|----------|"
            )?;
            for r in results {
                writeln!(
                    out,
                    "| {} | {} | {} | {} | {:.6} | {:.6} | {:.6} | {} | {} |",
                    r.circuit_name.as_deref().unwrap_or("-"),
                    r.hardware,
                    r.strategy,
                    r.stats.ops_emitted,
                    r.summary.mean,
                    r.summary.std_dev,
                    r.fault_free_probability(),
                    r.summary
                        .tail_prob
                        .map(|p| format!("{:.4}", p))
                        .unwrap_or_else(|| "-".to_string()),
                    r.timings.total_us
                )?;
            }
            Ok(())
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

// Writing into a String cannot fail
fn render(body: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    let _ = body(&mut out);
    out
}

fn markdown_row(out: &mut String, scope: &str, s: &PgfSummary) -> fmt::Result {
    writeln!(
        out,
        "| {} | {:.6} | {:.6} | {} | {:.6} | {} | {} |",
        scope,
        s.mean,
        s.std_dev,
        s.mode,
        s.max_prob,
        s.support,
        s.tail_prob.map(|p| format!("{:.4}", p)).unwrap_or_else(|| "-".to_string())
    )
}

fn csv_rows(out: &mut String, scope: &str, qubit: Option<usize>, pgf: &Pgf) -> fmt::Result {
    let qubit = qubit.map(|q| q.to_string()).unwrap_or_default();
    for (k, p) in pgf.coefficients().iter().enumerate() {
        writeln!(out, "{},{},{},{}", scope, qubit, k, p)?;
    }
    Ok(())
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("  {}", l)).collect::<Vec<_>>().join("\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qpgf_core::{GateKind, GateOp, GateSequence};
    use qpgf_engine::compute_report;

    fn sample_report() -> DistributionReport {
        compute_report(&GateSequence::from_ops(vec![
            GateOp::single(GateKind::Sx, 0, 0.1).unwrap(),
            GateOp::pair(GateKind::Cz, 0, 1, 0.2).unwrap(),
        ]))
        .unwrap()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::from_path("out/report.csv"), Some(ReportFormat::Csv));
        assert_eq!(ReportFormat::from_path("report"), None);
    }

    #[test]
    fn test_csv_rows() {
        let csv = Reporter::to_csv(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "scope,qubit,k,probability");
        // global 3 + q0 3 + q1 2
        assert_eq!(lines.len(), 1 + 3 + 3 + 2);
        assert!(lines[1].starts_with("global,,0,"));
        assert!(lines[4].starts_with("qubit,0,0,"));
        assert!(lines[7].starts_with("qubit,1,0,"));
    }

    #[test]
    fn test_markdown() {
        let md = Reporter::to_markdown(&sample_report(), Some(0.01));
        assert!(md.contains("# QPGF Error Distribution"));
        assert!(md.contains("| global |"));
        assert!(md.contains("| q1 |"));
        assert!(md.contains("| 2 |"));
    }

    #[test]
    fn test_text_and_warnings() {
        let report = compute_report(&GateSequence::new()).unwrap();
        let text = Reporter::to_text(&report, None);
        assert!(text.contains("Warning:"));
        assert!(text.contains("  Mean: 0.0000"));
        assert!(!text.contains("Qubit"));
    }

    #[test]
    fn test_json_parses_back() {
        let report = sample_report();
        let json = Reporter::report(&report, ReportFormat::Json, None);
        assert_eq!(DistributionReport::from_json(&json).unwrap(), report);
    }
}
