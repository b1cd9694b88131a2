//! Scan orchestration
//!
//! Coordinates path filtering, per-file checking, and result aggregation.
//! A fresh set of check instances is built for every file, so the stateful
//! checks never leak state between files and whole-file scans can run on
//! worker threads in any order.

pub mod logical;
pub mod path_filter;

pub use path_filter::PathFilter;

use crate::checks::{CheckMatch, FileChecks, PhysicalLine};
use crate::config::CheckConfig;
use crate::domain::violations::{CheckReport, StyleError, StyleResult, Violation};
use crate::lexer::{RawTokenizer, TokenFilter};
use logical::LogicalLines;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Orchestrates style checks over files and directory trees
pub struct Scanner {
    config: CheckConfig,
    path_filter: PathFilter,
}

/// Options for customizing scan behavior
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Whether to check files on worker threads
    pub parallel: bool,
    /// Maximum number of files to check
    pub max_files: Option<usize>,
    /// Whether to stop at the first file that fails to scan
    pub fail_fast: bool,
    /// Additional exclusion patterns for this scan only
    pub exclude_patterns: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_files: None,
            fail_fast: false,
            exclude_patterns: Vec::new(),
        }
    }
}

impl Scanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: CheckConfig) -> StyleResult<Self> {
        let ignore_file = if config.paths.ignore_file.as_deref() == Some("") {
            None
        } else {
            config.paths.ignore_file.clone()
        };

        let path_filter = PathFilter::new(config.paths.patterns.clone(), ignore_file)
            .map_err(|e| StyleError::config(format!("Failed to create path filter: {e}")))?;

        Ok(Self {
            config,
            path_filter,
        })
    }

    /// Create a scanner with default configuration
    pub fn with_defaults() -> StyleResult<Self> {
        Self::new(CheckConfig::default())
    }

    /// Check a single file and return its violations
    pub fn scan_file<P: AsRef<Path>>(&self, file_path: P) -> StyleResult<Vec<Violation>> {
        let file_path = file_path.as_ref();

        if !self.path_filter.should_check(file_path)? {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(file_path).map_err(|e| {
            StyleError::scan(
                file_path.display().to_string(),
                format!("Failed to read file: {e}"),
            )
        })?;

        Ok(self.scan_source(file_path, &content))
    }

    /// Run all enabled checks over one file's content
    pub fn scan_source(&self, file_path: &Path, content: &str) -> Vec<Violation> {
        // Fresh instances per file: the brace and declaration checks carry
        // state that must not survive into the next file.
        let mut checks = FileChecks::from_config(&self.config);
        let lines: Vec<&str> = content.lines().collect();
        let mut matches = Vec::new();

        for (idx, &text) in lines.iter().enumerate() {
            let line = PhysicalLine {
                number: idx as u32 + 1,
                text,
            };
            matches.extend(checks.check_physical_line(&line));
        }

        if checks.has_logical_checks() {
            let tokens = TokenFilter::new(RawTokenizer::new(content));
            for logical_line in LogicalLines::new(tokens) {
                matches.extend(checks.check_logical_line(&logical_line));
            }
        }

        matches
            .into_iter()
            .filter(|m| self.config.is_code_enabled(m.code))
            .map(|m| self.match_to_violation(file_path, &lines, m))
            .collect()
    }

    /// Translate an internal check match into a reportable violation
    ///
    /// Checks use 0-based columns; reported violations are 1-based.
    fn match_to_violation(
        &self,
        file_path: &Path,
        lines: &[&str],
        m: CheckMatch,
    ) -> Violation {
        let mut violation = Violation::new(
            m.code,
            self.config.severity_for(m.code),
            file_path.to_path_buf(),
            m.message,
        )
        .with_position(m.line, m.column + 1);

        let context = m
            .context
            .or_else(|| lines.get(m.line as usize - 1).map(|l| l.to_string()));
        if let Some(context) = context {
            violation = violation.with_context(context);
        }

        violation
    }

    /// Check multiple files or directories and return a complete report
    pub fn scan_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &ScanOptions,
    ) -> StyleResult<CheckReport> {
        let start_time = Instant::now();
        let mut report = CheckReport::new();

        let mut files_to_check = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_file() {
                files_to_check.push(path.to_path_buf());
            } else if path.is_dir() {
                files_to_check.extend(self.path_filter.find_files(path)?);
            }
        }

        if !options.exclude_patterns.is_empty() {
            let mut temp_filter = self.path_filter.clone();
            for pattern in &options.exclude_patterns {
                temp_filter.add_pattern(pattern.clone())?;
            }
            files_to_check = temp_filter.filter_paths(&files_to_check)?;
        }

        if let Some(max_files) = options.max_files {
            files_to_check.truncate(max_files);
        }

        let total_files = files_to_check.len();

        let violations = if options.parallel && files_to_check.len() > 1 {
            self.scan_files_parallel(&files_to_check, options)?
        } else {
            self.scan_files_sequential(&files_to_check, options)?
        };

        for violation in violations {
            report.add_violation(violation);
        }

        report.set_files_checked(total_files);
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());
        report.sort_violations();

        Ok(report)
    }

    fn scan_files_sequential(
        &self,
        files: &[PathBuf],
        options: &ScanOptions,
    ) -> StyleResult<Vec<Violation>> {
        let mut all_violations = Vec::new();

        for file_path in files {
            match self.scan_file(file_path) {
                Ok(violations) => all_violations.extend(violations),
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to check {}: {}", file_path.display(), e);
                }
            }
        }

        Ok(all_violations)
    }

    fn scan_files_parallel(
        &self,
        files: &[PathBuf],
        options: &ScanOptions,
    ) -> StyleResult<Vec<Violation>> {
        let results: Vec<(&PathBuf, StyleResult<Vec<Violation>>)> = files
            .par_iter()
            .map(|file_path| (file_path, self.scan_file(file_path)))
            .collect();

        let mut all_violations = Vec::new();
        for (file_path, result) in results {
            match result {
                Ok(violations) => all_violations.extend(violations),
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to check {}: {}", file_path.display(), e);
                }
            }
        }

        Ok(all_violations)
    }

    /// Check a directory tree and return a report
    pub fn scan_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &ScanOptions,
    ) -> StyleResult<CheckReport> {
        self.scan_paths(&[root.as_ref()], options)
    }

    /// Get configuration fingerprint for cache validation
    pub fn config_fingerprint(&self) -> String {
        self.config.fingerprint()
    }

    /// Summarize which categories and codes this scanner runs
    pub fn check_stats(&self) -> CheckStats {
        let mut enabled_categories = 0;
        let mut enabled_codes = 0;
        for category in self.config.checks.values() {
            if !category.enabled {
                continue;
            }
            enabled_categories += 1;
            enabled_codes += category.rules.iter().filter(|r| r.enabled).count();
        }

        CheckStats {
            total_categories: self.config.checks.len(),
            enabled_categories,
            enabled_codes,
        }
    }
}

/// Statistics about the active check configuration
#[derive(Debug, Clone)]
pub struct CheckStats {
    pub total_categories: usize,
    pub enabled_categories: usize,
    pub enabled_codes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scan(content: &str) -> Vec<Violation> {
        let scanner = Scanner::with_defaults().unwrap();
        scanner.scan_source(Path::new("test.c"), content)
    }

    fn codes(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.code.as_str()).collect()
    }

    #[test]
    fn test_clean_file_has_no_violations() {
        let violations = scan("int foo(void)\n{\n    int x;\n\n    x = 1;\n    return x;\n}\n");
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn test_brace_on_signature_line() {
        let violations = scan("int foo() {\n    return 0;\n}\n");
        assert_eq!(codes(&violations), vec!["E701"]);
        assert_eq!(violations[0].line_number, Some(1));
        // 0-based column 10 reported as 11.
        assert_eq!(violations[0].column_number, Some(11));
    }

    #[test]
    fn test_cpp_comment_and_return_parens() {
        let violations =
            scan("int foo(void)\n{\n    x = 0;\n    return (0);\n    // done\n}\n");
        assert_eq!(codes(&violations), vec!["E601", "E602"]);
        assert_eq!(violations[0].line_number, Some(5));
        assert_eq!(violations[1].line_number, Some(4));
    }

    #[test]
    fn test_context_carries_source_line() {
        let violations = scan("// bad comment\n");
        assert_eq!(violations[0].context.as_deref(), Some("// bad comment"));
    }

    #[test]
    fn test_disabled_code_is_filtered() {
        let mut config = CheckConfig::with_defaults();
        config.checks.get_mut("comments").unwrap().rules[0].enabled = false;
        let scanner = Scanner::new(config).unwrap();
        let violations = scanner.scan_source(Path::new("test.c"), "// bad comment\n");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_state_does_not_leak_between_files() {
        let scanner = Scanner::with_defaults().unwrap();
        // Leaves the brace machine mid-function when scanned.
        let first = scanner.scan_source(Path::new("a.c"), "int foo(void)\n");
        // A close brace at the start of a fresh file must not be treated
        // as the end of the previous file's function.
        let second = scanner.scan_source(Path::new("b.c"), "    x = 1;\n}\n");
        assert!(first.is_empty());
        assert!(second.iter().all(|v| v.code != "E704"), "{second:?}");
    }

    #[test]
    fn test_scan_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/good.c"), "int x;\n").unwrap();
        fs::write(root.join("src/bad.c"), "// nope\n").unwrap();
        fs::write(root.join("src/skip.txt"), "// not C\n").unwrap();

        let scanner = Scanner::with_defaults().unwrap();
        let report = scanner
            .scan_directory(root, &ScanOptions::default())
            .unwrap();
        assert_eq!(report.summary.total_files, 2);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].code, "E601");
    }

    #[test]
    fn test_fail_fast_surfaces_read_errors() {
        let scanner = Scanner::with_defaults().unwrap();
        let options = ScanOptions {
            fail_fast: true,
            parallel: false,
            ..Default::default()
        };
        let missing = PathBuf::from("does/not/exist.c");
        // A nonexistent path is neither file nor directory, so it is
        // silently skipped rather than failing the scan.
        let report = scanner.scan_paths(&[missing], &options).unwrap();
        assert_eq!(report.summary.total_files, 0);
    }

    #[test]
    fn test_scan_options_max_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.c"), "// one\n").unwrap();
        fs::write(root.join("b.c"), "// two\n").unwrap();

        let scanner = Scanner::with_defaults().unwrap();
        let options = ScanOptions {
            max_files: Some(1),
            parallel: false,
            ..Default::default()
        };
        let report = scanner.scan_directory(root, &options).unwrap();
        assert_eq!(report.summary.total_files, 1);
    }
}
