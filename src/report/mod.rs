//! Report generation with multiple output formats
//!
//! Formatters translate the domain report into external representations:
//! compiler-style one-line-per-violation text, a colored human-readable
//! listing grouped by file, and JSON for programmatic consumption.

use crate::domain::violations::{CheckReport, Severity, StyleError, StyleResult, Violation};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Supported output formats for check reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One violation per line: `file:line:col: code message`
    #[default]
    Text,
    /// Human-readable format with colors, grouping, and context
    Human,
    /// JSON format for programmatic consumption
    Json,
}

impl OutputFormat {
    /// Parse format from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["text", "human", "json"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to show the offending source line
    pub show_context: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_context: true,
            max_violations: None,
            min_severity: None,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
pub struct ReportFormatter {
    options: ReportOptions,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a check report in the specified format
    pub fn format_report(&self, report: &CheckReport, format: OutputFormat) -> StyleResult<String> {
        let filtered = self.filter_violations(&report.violations);

        match format {
            OutputFormat::Text => Ok(self.format_text(&filtered)),
            OutputFormat::Human => Ok(self.format_human(report, &filtered)),
            OutputFormat::Json => self.format_json(report, &filtered),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &CheckReport,
        format: OutputFormat,
        mut writer: W,
    ) -> StyleResult<()> {
        let formatted = self.format_report(report, format)?;
        writer
            .write_all(formatted.as_bytes())
            .map_err(|e| StyleError::Io { source: e })?;
        Ok(())
    }

    fn filter_violations<'a>(&self, violations: &'a [Violation]) -> Vec<&'a Violation> {
        let mut filtered: Vec<&Violation> = violations
            .iter()
            .filter(|v| match self.options.min_severity {
                Some(min) => v.severity >= min,
                None => true,
            })
            .collect();

        if let Some(max) = self.options.max_violations {
            filtered.truncate(max);
        }

        filtered
    }

    /// Compiler-style output, one violation per line
    fn format_text(&self, violations: &[&Violation]) -> String {
        let mut output = String::new();
        for violation in violations {
            output.push_str(&violation.format_display());
            output.push('\n');
        }
        output
    }

    fn format_human(&self, report: &CheckReport, violations: &[&Violation]) -> String {
        let mut output = String::new();

        if violations.is_empty() {
            if self.options.use_colors {
                output.push_str("\x1b[32mNo style violations found\x1b[0m\n");
            } else {
                output.push_str("No style violations found\n");
            }
            output.push_str(&self.format_summary(report));
            return output;
        }

        if self.options.use_colors {
            let color = if report.has_errors() { "31" } else { "33" };
            output.push_str(&format!("\x1b[{color}mStyle violations found\x1b[0m\n\n"));
        } else {
            output.push_str("Style violations found\n\n");
        }

        let mut by_file: BTreeMap<&Path, Vec<&Violation>> = BTreeMap::new();
        for violation in violations {
            by_file
                .entry(violation.file_path.as_path())
                .or_default()
                .push(violation);
        }

        for (file_path, file_violations) in by_file {
            output.push_str(&format!("{}\n", file_path.display()));

            for violation in file_violations {
                let severity_color = match violation.severity {
                    Severity::Error => "31",
                    Severity::Warning => "33",
                    Severity::Info => "36",
                };

                let position = match (violation.line_number, violation.column_number) {
                    (Some(line), Some(col)) => format!("{line}:{col}"),
                    (Some(line), None) => line.to_string(),
                    _ => "?".to_string(),
                };

                if self.options.use_colors {
                    output.push_str(&format!(
                        "  \x1b[2m{}\x1b[0m {} [\x1b[{}m{}\x1b[0m] {}\n",
                        position,
                        violation.code,
                        severity_color,
                        violation.severity.as_str(),
                        violation.message
                    ));
                } else {
                    output.push_str(&format!(
                        "  {} {} [{}] {}\n",
                        position,
                        violation.code,
                        violation.severity.as_str(),
                        violation.message
                    ));
                }

                if self.options.show_context {
                    if let Some(context) = &violation.context {
                        if self.options.use_colors {
                            output.push_str(&format!("    \x1b[2m| {context}\x1b[0m\n"));
                        } else {
                            output.push_str(&format!("    | {context}\n"));
                        }
                    }
                }
            }
            output.push('\n');
        }

        output.push_str(&self.format_summary(report));
        output
    }

    fn format_summary(&self, report: &CheckReport) -> String {
        let counts = &report.summary.violations_by_severity;
        format!(
            "{} file(s) checked in {}ms: {} error(s), {} warning(s), {} note(s)\n",
            report.summary.total_files,
            report.summary.execution_time_ms,
            counts.error,
            counts.warning,
            counts.info
        )
    }

    fn format_json(&self, report: &CheckReport, violations: &[&Violation]) -> StyleResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "code": v.code,
                    "severity": v.severity.as_str(),
                    "file_path": v.file_path.display().to_string(),
                    "line_number": v.line_number,
                    "column_number": v.column_number,
                    "message": v.message,
                    "context": v.context,
                    "detected_at": v.detected_at.to_rfc3339()
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "violations": json_violations,
            "summary": {
                "total_files": report.summary.total_files,
                "violations_by_severity": {
                    "error": report.summary.violations_by_severity.error,
                    "warning": report.summary.violations_by_severity.warning,
                    "info": report.summary.violations_by_severity.info
                },
                "execution_time_ms": report.summary.execution_time_ms,
                "checked_at": report.summary.checked_at.to_rfc3339()
            },
            "config_fingerprint": report.config_fingerprint
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| StyleError::config(format!("JSON serialization failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_report() -> CheckReport {
        let mut report = CheckReport::new();
        report.add_violation(
            Violation::new(
                "E701",
                Severity::Error,
                PathBuf::from("src/object.c"),
                "brace on same line as function declaration",
            )
            .with_position(3, 11)
            .with_context("int foo() {"),
        );
        report.add_violation(
            Violation::new(
                "E711",
                Severity::Warning,
                PathBuf::from("src/object.c"),
                "missing blank line after local variable declarations",
            )
            .with_position(7, 1),
        );
        report.set_files_checked(1);
        report
    }

    #[test]
    fn test_text_format() {
        let formatter = ReportFormatter::default();
        let output = formatter
            .format_report(&sample_report(), OutputFormat::Text)
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "src/object.c:3:11: E701 brace on same line as function declaration"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_human_format_without_colors() {
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: false,
            ..Default::default()
        });
        let output = formatter
            .format_report(&sample_report(), OutputFormat::Human)
            .unwrap();
        assert!(output.contains("src/object.c"));
        assert!(output.contains("3:11 E701 [error]"));
        assert!(output.contains("| int foo() {"));
        assert!(output.contains("1 error(s), 1 warning(s)"));
    }

    #[test]
    fn test_json_format_round_trips() {
        let formatter = ReportFormatter::default();
        let output = formatter
            .format_report(&sample_report(), OutputFormat::Json)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["violations"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["violations"][0]["code"], "E701");
        assert_eq!(parsed["summary"]["violations_by_severity"]["error"], 1);
    }

    #[test]
    fn test_min_severity_filter() {
        let formatter = ReportFormatter::new(ReportOptions {
            min_severity: Some(Severity::Error),
            ..Default::default()
        });
        let output = formatter
            .format_report(&sample_report(), OutputFormat::Text)
            .unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("E701"));
    }

    #[test]
    fn test_max_violations_limit() {
        let formatter = ReportFormatter::new(ReportOptions {
            max_violations: Some(1),
            ..Default::default()
        });
        let output = formatter
            .format_report(&sample_report(), OutputFormat::Text)
            .unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("sarif"), None);
    }
}
