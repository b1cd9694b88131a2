//! Blank line after local variable declarations
//!
//! ANSI C wants declarations at the top of a block; this check wants one
//! blank line between the last declaration of a contiguous run and the first
//! statement. A two-state machine with no lookback past the previous line's
//! classification: a declaration-looking line arms it, a blank line
//! satisfies it, anything else while armed is a violation. Lines that merely
//! look like declarations (`return x;`) extend the run; that imprecision is
//! accepted.

use super::{CheckMatch, PhysicalLine, PhysicalLineCheck};
use regex::Regex;

/// Missing blank line after a run of local variable declarations
pub const MISSING_BLANK_AFTER_DECLARATIONS: &str = "E711";

/// Statement keywords that can open a line shaped like a declaration;
/// `return result;` must not read as `type name;`
const STATEMENT_KEYWORDS: &[&str] = &["return", "goto", "break", "continue", "else", "case"];

/// State machine requiring a blank line after declaration runs
pub struct DeclarationBlankLineChecker {
    /// A type-like word, one or more further words (the last being the
    /// variable name), an optional `=` initializer, terminated by `;`;
    /// the first word is captured for the keyword exclusion
    declaration: Regex,
    blank: Regex,
    inside_declaration_run: bool,
}

impl DeclarationBlankLineChecker {
    pub fn new() -> Self {
        Self {
            declaration: Regex::new(
                r"^\s*([A-Za-z_]\w*)(?:\s+\*{0,2}[A-Za-z_]\w*)+\s*(?:=[^;]*)?;\s*$",
            )
            .expect("declaration pattern is a valid regex"),
            blank: Regex::new(r"^\s*$").expect("blank line pattern is a valid regex"),
            inside_declaration_run: false,
        }
    }

    fn is_declaration(&self, text: &str) -> bool {
        match self.declaration.captures(text) {
            Some(caps) => !STATEMENT_KEYWORDS.contains(&&caps[1]),
            None => false,
        }
    }
}

impl Default for DeclarationBlankLineChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalLineCheck for DeclarationBlankLineChecker {
    fn name(&self) -> &'static str {
        "declarations"
    }

    fn check_line(&mut self, line: &PhysicalLine) -> Vec<CheckMatch> {
        if self.is_declaration(line.text) {
            // Possibly part of an ongoing run; never a violation by itself.
            self.inside_declaration_run = true;
            Vec::new()
        } else if self.blank.is_match(line.text) {
            // The required blank line was found.
            self.inside_declaration_run = false;
            Vec::new()
        } else if self.inside_declaration_run {
            self.inside_declaration_run = false;
            vec![CheckMatch::on_line(
                MISSING_BLANK_AFTER_DECLARATIONS,
                line,
                0,
                "missing blank line after local variable declarations",
            )]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(source: &str) -> Vec<CheckMatch> {
        let mut check = DeclarationBlankLineChecker::new();
        let mut matches = Vec::new();
        for (idx, text) in source.lines().enumerate() {
            let line = PhysicalLine {
                number: idx as u32 + 1,
                text,
            };
            matches.extend(check.check_line(&line));
        }
        matches
    }

    #[test]
    fn test_statement_right_after_declaration() {
        let matches = run("int foo()\n{\n    int x;\n    x = 1;\n}\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].code, MISSING_BLANK_AFTER_DECLARATIONS);
        assert_eq!(matches[0].line, 4);
    }

    #[test]
    fn test_blank_line_satisfies_the_run() {
        let matches = run("int foo()\n{\n    int x;\n\n    x = 1;\n}\n");
        assert!(matches.is_empty(), "unexpected: {matches:?}");
    }

    #[test]
    fn test_contiguous_declarations_are_one_run() {
        let matches = run("    int x;\n    int y;\n    char *name;\n\n    x = 1;\n");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_violation_reported_once_per_run() {
        let matches = run("    int x;\n    x = 1;\n    y = 2;\n");
        // Only the first statement after the run reports; the state clears.
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 2);
    }

    #[test]
    fn test_no_declarations_no_violation() {
        let matches = run("    x = 1;\n    y = 2;\n");
        assert!(matches.is_empty());
    }

    #[rstest]
    #[case("    int x;", true)]
    #[case("    int x = 1;", true)]
    #[case("    char *name;", true)]
    #[case("    struct spam s;", true)]
    #[case("    unsigned long total = 0;", true)]
    #[case("    x = 1;", false)]
    #[case("    foo(a);", false)]
    #[case("    return result;", false)]
    #[case("    goto error;", false)]
    #[case("}", false)]
    #[case("", false)]
    fn test_declaration_pattern(#[case] line: &str, #[case] matches: bool) {
        let check = DeclarationBlankLineChecker::new();
        assert_eq!(check.is_declaration(line), matches, "line: {line}");
    }

    #[test]
    fn test_return_does_not_extend_a_run() {
        let matches = run("    int x;\n\n    x = 1;\n    return x;\n}\n");
        assert!(matches.is_empty(), "unexpected: {matches:?}");
    }
}
