//! C Guardian - style checking for C source in the PEP 7 tradition
//!
//! The library layer wires together the scanning pipeline: a raw tokenizer
//! and comment-aware token filter feed logical-line checks, while physical
//! lines feed the stateful brace and declaration checks. Results flow into
//! a report that formatters render as text, colored output, or JSON.

pub mod checks;
pub mod config;
pub mod domain;
pub mod lexer;
pub mod report;
pub mod scanner;

// Re-export main types for convenient access
pub use domain::violations::{
    CheckReport, CheckSummary, Severity, StyleError, StyleResult, Violation,
};

pub use config::{CheckCategory, CheckConfig, CheckRule, ConfigBuilder};

pub use scanner::{CheckStats, ScanOptions, Scanner};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

use std::path::Path;

/// High-level style checker combining scanning and report formatting
pub struct StyleChecker {
    scanner: Scanner,
    formatter: ReportFormatter,
}

impl StyleChecker {
    /// Create a checker with the given configuration
    pub fn new_with_config(config: CheckConfig) -> StyleResult<Self> {
        Ok(Self {
            scanner: Scanner::new(config)?,
            formatter: ReportFormatter::default(),
        })
    }

    /// Create a checker with default configuration
    pub fn new() -> StyleResult<Self> {
        Self::new_with_config(CheckConfig::default())
    }

    /// Create a checker loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> StyleResult<Self> {
        let config = CheckConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set a custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Check a single file
    pub fn check_file<P: AsRef<Path>>(&self, file_path: P) -> StyleResult<CheckReport> {
        let violations = self.scanner.scan_file(file_path)?;

        let mut report = CheckReport::new();
        for violation in violations {
            report.add_violation(violation);
        }
        report.set_files_checked(1);
        report.sort_violations();

        Ok(report)
    }

    /// Check multiple files or directories
    pub fn check_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &ScanOptions,
    ) -> StyleResult<CheckReport> {
        self.scanner.scan_paths(paths, options)
    }

    /// Check an entire directory tree
    pub fn check_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &ScanOptions,
    ) -> StyleResult<CheckReport> {
        self.scanner.scan_directory(root, options)
    }

    /// Format a check report for output
    pub fn format_report(&self, report: &CheckReport, format: OutputFormat) -> StyleResult<String> {
        self.formatter.format_report(report, format)
    }

    /// Get statistics about the active check configuration
    pub fn check_stats(&self) -> CheckStats {
        self.scanner.check_stats()
    }
}

/// Convenience function to check files with default settings
pub fn check_files<P: AsRef<Path>>(files: &[P]) -> StyleResult<CheckReport> {
    let checker = StyleChecker::new()?;
    checker.check_paths(files, &ScanOptions::default())
}

/// Convenience function to check a directory with default settings
pub fn check_directory<P: AsRef<Path>>(directory: P) -> StyleResult<CheckReport> {
    let checker = StyleChecker::new()?;
    checker.check_directory(directory, &ScanOptions::default())
}

/// CI integration utilities
pub mod ci {
    use super::*;

    /// Gate a set of changed files before merge or commit
    ///
    /// Returns an error if any blocking violations are found, making it
    /// suitable as a one-call pre-commit or CI step.
    pub fn gate<P: AsRef<Path>>(modified_files: &[P]) -> StyleResult<()> {
        let report = check_files(modified_files)?;

        if report.has_errors() {
            let error_count = report.summary.violations_by_severity.error;
            return Err(StyleError::validation(format!(
                "Style gate failed: {} blocking violation{} found",
                error_count,
                if error_count == 1 { "" } else { "s" }
            )));
        }

        Ok(())
    }

    /// Strict check that fails on warnings as well as errors
    pub fn strict_gate<P: AsRef<Path>>(files: &[P]) -> StyleResult<CheckReport> {
        let checker = StyleChecker::new()?;
        let options = ScanOptions {
            fail_fast: true,
            ..Default::default()
        };
        let report = checker.check_paths(files, &options)?;

        if report.has_violations() {
            return Err(StyleError::validation(format!(
                "Strict style gate failed: {} violations found",
                report.violations.len()
            )));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CLEAN_SOURCE: &str = "\
int
check_status(int status)
{
    int result;

    result = status * 2;
    return result;
}
";

    #[test]
    fn test_checker_creation() {
        let checker = StyleChecker::new().unwrap();
        let stats = checker.check_stats();
        assert_eq!(stats.enabled_categories, 4);
        assert_eq!(stats.enabled_codes, 7);
    }

    #[test]
    fn test_clean_file_passes() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("clean.c");
        fs::write(&file, CLEAN_SOURCE).unwrap();

        let checker = StyleChecker::new().unwrap();
        let report = checker.check_file(&file).unwrap();
        assert!(!report.has_violations(), "{:?}", report.violations);
    }

    #[test]
    fn test_file_with_violations() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bad.c");
        fs::write(
            &file,
            "int check(int n) {\n    int x;\n    x = n;\n    return (x);\n    // doubled\n}\n",
        )
        .unwrap();

        let checker = StyleChecker::new().unwrap();
        let report = checker.check_file(&file).unwrap();
        // check_file sorts by position.
        let codes: Vec<&str> = report.violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["E701", "E711", "E602", "E601"]);
    }

    #[test]
    fn test_report_formatting() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bad.c");
        fs::write(&file, "// C++ comment\n").unwrap();

        let checker = StyleChecker::new().unwrap();
        let report = checker.check_file(&file).unwrap();

        let text = checker.format_report(&report, OutputFormat::Text).unwrap();
        assert!(text.contains("E601 never use C++ style // comments"));

        let json = checker.format_report(&report, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["violations"].is_array());
    }

    #[test]
    fn test_ci_gate() {
        let temp = TempDir::new().unwrap();
        let clean = temp.path().join("clean.c");
        let dirty = temp.path().join("dirty.c");
        fs::write(&clean, CLEAN_SOURCE).unwrap();
        fs::write(&dirty, "// not allowed\n").unwrap();

        assert!(ci::gate(&[&clean]).is_ok());
        assert!(ci::gate(&[&dirty]).is_err());
    }

    #[test]
    fn test_scan_order_does_not_matter() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.c");
        let b = temp.path().join("b.c");
        // a.c ends mid-function; b.c must still be judged on its own.
        fs::write(&a, "int broken(void)\n{\n    // oops\n    x = 1;\n").unwrap();
        fs::write(&b, CLEAN_SOURCE).unwrap();

        let checker = StyleChecker::new().unwrap();
        let forward = checker
            .check_paths(&[&a, &b], &ScanOptions::default())
            .unwrap();
        let reverse = checker
            .check_paths(&[&b, &a], &ScanOptions::default())
            .unwrap();
        assert_eq!(forward.violations.len(), reverse.violations.len());
        assert!(forward
            .violations
            .iter()
            .all(|v| v.file_path.ends_with("a.c")));
    }

    #[test]
    fn test_convenience_functions() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("clean.c");
        fs::write(&file, CLEAN_SOURCE).unwrap();

        let report = check_directory(temp.path()).unwrap();
        assert_eq!(report.summary.total_files, 1);
        assert!(!report.has_violations());
    }
}
