//! Core domain models for style violations and check reports
//!
//! Violations are immutable once produced: a check creates one for a given
//! line, hands it to the aggregating report, and never touches it again.
//! The report acts as the aggregate root for a whole scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity levels for style violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages and suggestions
    Info,
    /// Warnings that should be addressed but don't block builds
    Warning,
    /// Errors that fail the check and produce a non-zero exit status
    Error,
}

impl Severity {
    /// Whether this severity level should cause the check to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A style violation detected on one source line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Short code identifying the check that produced this violation (e.g. "E701")
    pub code: String,
    /// Severity level of this violation
    pub severity: Severity,
    /// File path where the violation was found
    pub file_path: PathBuf,
    /// Line number (1-indexed) where the violation occurs
    pub line_number: Option<u32>,
    /// Column number (1-indexed) where the violation starts
    pub column_number: Option<u32>,
    /// Human-readable description of the violation
    pub message: String,
    /// Source line the violation was found on
    pub context: Option<String>,
    /// When this violation was detected
    pub detected_at: DateTime<Utc>,
}

impl Violation {
    /// Create a new violation
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        file_path: PathBuf,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            file_path,
            line_number: None,
            column_number: None,
            message: message.into(),
            context: None,
            detected_at: Utc::now(),
        }
    }

    /// Set line and column position (both 1-indexed)
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line_number = Some(line);
        self.column_number = Some(column);
        self
    }

    /// Add the source line the violation was found on
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Whether this violation fails the check
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Format violation as a single diagnostic line: `<file>:<line>:<column>: <code> <message>`
    pub fn format_display(&self) -> String {
        let location = match (self.line_number, self.column_number) {
            (Some(line), Some(col)) => format!(":{line}:{col}"),
            (Some(line), None) => format!(":{line}"),
            _ => String::new(),
        };

        format!(
            "{}{}: {} {}",
            self.file_path.display(),
            location,
            self.code,
            self.message
        )
    }
}

/// Summary statistics for a check report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Number of violations by severity level
    pub violations_by_severity: ViolationCounts,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when the scan was performed
    pub checked_at: DateTime<Utc>,
}

/// Count of violations by severity level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl ViolationCounts {
    /// Total number of violations across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    /// Whether there are any blocking violations
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Add a violation to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Complete check report containing all violations and scan metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// All violations found during the scan
    pub violations: Vec<Violation>,
    /// Summary statistics
    pub summary: CheckSummary,
    /// Configuration used for this scan
    pub config_fingerprint: Option<String>,
}

impl CheckReport {
    /// Create a new empty check report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            summary: CheckSummary {
                checked_at: Utc::now(),
                ..Default::default()
            },
            config_fingerprint: None,
        }
    }

    /// Add a violation to the report
    pub fn add_violation(&mut self, violation: Violation) {
        self.summary.violations_by_severity.add(violation.severity);
        self.violations.push(violation);
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether the report contains blocking violations (errors)
    pub fn has_errors(&self) -> bool {
        self.summary.violations_by_severity.has_blocking()
    }

    /// Get violations of a specific severity
    pub fn violations_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.severity == severity)
    }

    /// Set the number of files scanned
    pub fn set_files_checked(&mut self, count: usize) {
        self.summary.total_files = count;
    }

    /// Set the execution time
    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    /// Set the configuration fingerprint
    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: CheckReport) {
        for violation in other.violations {
            self.add_violation(violation);
        }
        self.summary.total_files += other.summary.total_files;
    }

    /// Sort violations by file path, line, and column for consistent output
    pub fn sort_violations(&mut self) {
        self.violations.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.line_number.unwrap_or(0).cmp(&b.line_number.unwrap_or(0)))
                .then_with(|| a.column_number.unwrap_or(0).cmp(&b.column_number.unwrap_or(0)))
                .then_with(|| a.code.cmp(&b.code))
        });
    }
}

impl Default for CheckReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur while running the checker
///
/// Style violations are never represented here: they are expected output,
/// collected into the report. These variants cover genuinely failed
/// operations such as unreadable files or broken configuration.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Path or line pattern compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// Scan failed for a specific file
    #[error("Scan error in {file}: {message}")]
    Scan { file: String, message: String },

    /// Check operation failed
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl StyleError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    /// Create a scan error
    pub fn scan(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Scan {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type for C Guardian operations
pub type StyleResult<T> = Result<T, StyleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_violation_creation() {
        let violation = Violation::new(
            "E701",
            Severity::Error,
            PathBuf::from("src/object.c"),
            "opening brace on function declaration line",
        );

        assert_eq!(violation.code, "E701");
        assert_eq!(violation.severity, Severity::Error);
        assert_eq!(violation.file_path, Path::new("src/object.c"));
        assert!(violation.is_blocking());
    }

    #[test]
    fn test_violation_with_position() {
        let violation = Violation::new(
            "E601",
            Severity::Warning,
            PathBuf::from("src/object.c"),
            "never use C++ style // comments",
        )
        .with_position(42, 15)
        .with_context("    x = 1; // increment");

        assert_eq!(violation.line_number, Some(42));
        assert_eq!(violation.column_number, Some(15));
        assert_eq!(
            violation.context,
            Some("    x = 1; // increment".to_string())
        );
        assert!(!violation.is_blocking());
    }

    #[test]
    fn test_violation_display_format() {
        let violation = Violation::new(
            "E704",
            Severity::Error,
            PathBuf::from("src/object.c"),
            "function closing brace not in column 1",
        )
        .with_position(10, 5);

        assert_eq!(
            violation.format_display(),
            "src/object.c:10:5: E704 function closing brace not in column 1"
        );
    }

    #[test]
    fn test_check_report() {
        let mut report = CheckReport::new();

        report.add_violation(Violation::new(
            "E701",
            Severity::Error,
            PathBuf::from("a.c"),
            "opening brace on function declaration line",
        ));

        report.add_violation(Violation::new(
            "E601",
            Severity::Warning,
            PathBuf::from("b.c"),
            "never use C++ style // comments",
        ));

        assert!(report.has_violations());
        assert!(report.has_errors());
        assert_eq!(report.summary.violations_by_severity.total(), 2);
        assert_eq!(report.summary.violations_by_severity.error, 1);
        assert_eq!(report.summary.violations_by_severity.warning, 1);
    }

    #[test]
    fn test_report_sorting() {
        let mut report = CheckReport::new();

        report.add_violation(
            Violation::new("E711", Severity::Error, PathBuf::from("b.c"), "m").with_position(3, 1),
        );
        report.add_violation(
            Violation::new("E711", Severity::Error, PathBuf::from("a.c"), "m").with_position(9, 1),
        );
        report.add_violation(
            Violation::new("E711", Severity::Error, PathBuf::from("a.c"), "m").with_position(2, 1),
        );

        report.sort_violations();

        assert_eq!(report.violations[0].file_path, Path::new("a.c"));
        assert_eq!(report.violations[0].line_number, Some(2));
        assert_eq!(report.violations[1].line_number, Some(9));
        assert_eq!(report.violations[2].file_path, Path::new("b.c"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Error.is_blocking());
        assert!(!Severity::Warning.is_blocking());
    }
}
