//! Style checks and the per-file check registry
//!
//! Every check implements one of two uniform contracts: "given this physical
//! line and your own state, return matches" or the same for an assembled
//! logical line. Checks never see the file path or severity; they produce
//! bare [`CheckMatch`]es which the scanner translates into violations at the
//! boundary.
//!
//! State is the whole point here: [`FunctionBraceChecker`] and
//! [`DeclarationBlankLineChecker`] remember what earlier lines looked like.
//! A [`FileChecks`] registry is therefore built fresh for every file scan so
//! nothing can leak between files, and scans of independent files stay
//! trivially parallelizable.

pub mod comments;
pub mod declarations;
pub mod function_braces;
pub mod returns;

pub use comments::SlashSlashCommentCheck;
pub use declarations::DeclarationBlankLineChecker;
pub use function_braces::FunctionBraceChecker;
pub use returns::ReturnParenCheck;

use crate::config::CheckConfig;
use crate::scanner::logical::LogicalLine;

/// One physical source line, as handed to line-based checks
#[derive(Debug, Clone, Copy)]
pub struct PhysicalLine<'a> {
    /// Line number, 1-based
    pub number: u32,
    /// Line text without the trailing newline
    pub text: &'a str,
}

/// A match found by a check; positions use 0-based columns internally
#[derive(Debug, Clone)]
pub struct CheckMatch {
    /// Violation code, e.g. "E701"
    pub code: &'static str,
    /// Line number, 1-based
    pub line: u32,
    /// Column, 0-based
    pub column: u32,
    /// Human-readable message
    pub message: String,
    /// Source line the match was found on
    pub context: Option<String>,
}

impl CheckMatch {
    fn on_line(code: &'static str, line: &PhysicalLine, column: u32, message: &str) -> Self {
        Self {
            code,
            line: line.number,
            column,
            message: message.to_string(),
            context: Some(line.text.trim_end().to_string()),
        }
    }
}

/// Contract for checks driven once per physical line, in file order
pub trait PhysicalLineCheck {
    /// Stable name for logging and diagnostics
    fn name(&self) -> &'static str;

    /// Inspect one line, updating internal state, and return any matches
    fn check_line(&mut self, line: &PhysicalLine) -> Vec<CheckMatch>;
}

/// Contract for checks driven once per assembled logical line
pub trait LogicalLineCheck {
    /// Stable name for logging and diagnostics
    fn name(&self) -> &'static str;

    /// Inspect one logical line and return any matches
    fn check_logical(&mut self, line: &LogicalLine) -> Vec<CheckMatch>;
}

/// The ordered check registry for a single file scan
///
/// Construction is the state-isolation boundary: every call to
/// [`FileChecks::from_config`] yields brand-new checker state.
pub struct FileChecks {
    physical: Vec<Box<dyn PhysicalLineCheck>>,
    logical: Vec<Box<dyn LogicalLineCheck>>,
}

impl FileChecks {
    /// Build a fresh registry with every check the configuration enables
    pub fn from_config(config: &CheckConfig) -> Self {
        let mut physical: Vec<Box<dyn PhysicalLineCheck>> = Vec::new();
        let mut logical: Vec<Box<dyn LogicalLineCheck>> = Vec::new();

        if config.category_enabled("comments") {
            physical.push(Box::new(SlashSlashCommentCheck::new()));
        }
        if config.category_enabled("function_braces") {
            physical.push(Box::new(FunctionBraceChecker::new()));
        }
        if config.category_enabled("declarations") {
            physical.push(Box::new(DeclarationBlankLineChecker::new()));
        }
        if config.category_enabled("returns") {
            logical.push(Box::new(ReturnParenCheck::new()));
        }

        tracing::debug!(
            "registry built: {} physical-line checks, {} logical-line checks",
            physical.len(),
            logical.len()
        );

        Self { physical, logical }
    }

    /// Run every physical-line check against one line
    pub fn check_physical_line(&mut self, line: &PhysicalLine) -> Vec<CheckMatch> {
        let mut matches = Vec::new();
        for check in &mut self.physical {
            matches.extend(check.check_line(line));
        }
        matches
    }

    /// Run every logical-line check against one assembled logical line
    pub fn check_logical_line(&mut self, line: &LogicalLine) -> Vec<CheckMatch> {
        let mut matches = Vec::new();
        for check in &mut self.logical {
            matches.extend(check.check_logical(line));
        }
        matches
    }

    /// Whether any logical-line checks are registered (lets the scanner skip
    /// tokenization entirely when none are)
    pub fn has_logical_checks(&self) -> bool {
        !self.logical.is_empty()
    }
}
