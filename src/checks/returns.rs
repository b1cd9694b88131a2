//! Redundant parentheses around return values
//!
//! `return(x);` and `return (x);` both wrap the whole return value in a
//! parenthesis pair that does nothing. Working on logical lines makes the
//! shape easy to test: the statement must start `return (`, end `);`, and
//! the opening parenthesis must match the one directly before the
//! terminator. `return (a) + (b);` closes the first group early and is
//! legitimate.

use super::{CheckMatch, LogicalLineCheck};
use crate::lexer::TokenKind;
use crate::scanner::logical::LogicalLine;

/// Redundant parentheses around a return value
pub const RETURN_WITH_PARENS: &str = "E602";

/// Token-shape check for `return (...)` statements
pub struct ReturnParenCheck;

impl ReturnParenCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReturnParenCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl LogicalLineCheck for ReturnParenCheck {
    fn name(&self) -> &'static str {
        "returns"
    }

    fn check_logical(&mut self, line: &LogicalLine) -> Vec<CheckMatch> {
        let toks = &line.tokens;
        if toks.len() < 5 {
            // Shortest offender is `return ( x ) ;`.
            return Vec::new();
        }
        let last = toks.len() - 1;
        let shape = toks[0].kind == TokenKind::Name
            && toks[0].text == "return"
            && toks[1].is_operator("(")
            && toks[last].kind == TokenKind::LogicalEnd
            && toks[last - 1].is_operator(")");
        if !shape {
            return Vec::new();
        }

        // The open at toks[1] is redundant only if it stays open until the
        // close directly before the terminator.
        let mut depth = 0i32;
        for (idx, tok) in toks[1..last].iter().enumerate() {
            if tok.is_operator("(") {
                depth += 1;
            } else if tok.is_operator(")") {
                depth -= 1;
            }
            if depth == 0 && idx + 1 < last - 1 {
                return Vec::new();
            }
        }

        vec![CheckMatch {
            code: RETURN_WITH_PARENS,
            line: toks[1].position.line,
            column: toks[1].position.column,
            message: "return is not a function; omit the parentheses".to_string(),
            context: None,
        }]
    }
}
