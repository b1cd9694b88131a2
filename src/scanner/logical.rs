//! Logical line assembly
//!
//! Groups a repaired token stream into statements. A logical line is the
//! run of substantive tokens up to and including a `LogicalEnd` marker;
//! `Newline` and `BlankLine` markers inside the run are dropped, so a
//! statement spanning several physical lines still forms one logical line.
//! Tokens after the last `LogicalEnd` never form a line.

use crate::lexer::{Position, Token, TokenKind};

/// One statement's worth of tokens, terminator included
#[derive(Debug, Clone)]
pub struct LogicalLine {
    pub tokens: Vec<Token>,
}

impl LogicalLine {
    /// Physical line number of the first token
    pub fn number(&self) -> u32 {
        self.tokens.first().map(|t| t.position.line).unwrap_or(0)
    }

    /// Position of the first token
    pub fn position(&self) -> Position {
        self.tokens
            .first()
            .map(|t| t.position)
            .unwrap_or(Position { line: 0, column: 0 })
    }
}

/// Iterator adapter assembling tokens into [`LogicalLine`]s
pub struct LogicalLines<I> {
    input: I,
    pending: Vec<Token>,
}

impl<I> LogicalLines<I>
where
    I: Iterator<Item = Token>,
{
    pub fn new(input: I) -> Self {
        Self {
            input,
            pending: Vec::new(),
        }
    }
}

impl<I> Iterator for LogicalLines<I>
where
    I: Iterator<Item = Token>,
{
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        for token in self.input.by_ref() {
            match token.kind {
                TokenKind::LogicalEnd => {
                    self.pending.push(token);
                    return Some(LogicalLine {
                        tokens: std::mem::take(&mut self.pending),
                    });
                }
                TokenKind::Newline | TokenKind::BlankLine => {}
                _ => self.pending.push(token),
            }
        }
        // A partial statement with no terminator is dropped.
        self.pending.clear();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{RawTokenizer, TokenFilter};

    fn lines(source: &str) -> Vec<LogicalLine> {
        LogicalLines::new(TokenFilter::new(RawTokenizer::new(source))).collect()
    }

    fn texts(line: &LogicalLine) -> Vec<&str> {
        line.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_one_statement_per_line() {
        let lines = lines("x = 1;\ny = 2;\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(texts(&lines[0]), vec!["x", "=", "1", ";"]);
        assert_eq!(lines[0].number(), 1);
        assert_eq!(lines[1].number(), 2);
    }

    #[test]
    fn test_statement_spanning_physical_lines() {
        let lines = lines("x = foo(a,\n        b);\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(
            texts(&lines[0]),
            vec!["x", "=", "foo", "(", "a", ",", "b", ")", ";"]
        );
        assert_eq!(lines[0].number(), 1);
    }

    #[test]
    fn test_terminator_is_included() {
        let lines = lines("x = 1;\n");
        let last = lines[0].tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::LogicalEnd);
        assert_eq!(last.text, ";");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let lines = lines("x = 1;\n\n\ny = 2;\n");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_unterminated_tail_is_dropped() {
        let lines = lines("x = 1;\ny = 2\n");
        assert_eq!(lines.len(), 1);
    }
}
