//! C++ style comment detection
//!
//! `//` comments are rejected outright. A crude guard avoids the most common
//! false positive: a `//` that appears after a `*` on the same line is
//! assumed to sit inside a `/* ... */` block comment and is not reported.
//! Occurrences inside string literals are still reported; that imprecision
//! is accepted.

use super::{CheckMatch, PhysicalLine, PhysicalLineCheck};
use regex::Regex;

/// C++ style `//` comment in C source
pub const CPP_STYLE_COMMENT: &str = "E601";

/// Stateless line check rejecting `//` comments
pub struct SlashSlashCommentCheck {
    /// `//` with nothing but non-`*` characters before it on the line
    comment: Regex,
}

impl SlashSlashCommentCheck {
    pub fn new() -> Self {
        Self {
            comment: Regex::new(r"^[^*]*//").expect("comment pattern is a valid regex"),
        }
    }
}

impl Default for SlashSlashCommentCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalLineCheck for SlashSlashCommentCheck {
    fn name(&self) -> &'static str {
        "comments"
    }

    fn check_line(&mut self, line: &PhysicalLine) -> Vec<CheckMatch> {
        if self.comment.is_match(line.text) {
            let column = line.text.find("//").unwrap_or(0) as u32;
            vec![CheckMatch::on_line(
                CPP_STYLE_COMMENT,
                line,
                column,
                "never use C++ style // comments",
            )]
        } else {
            Vec::new()
        }
    }
}
