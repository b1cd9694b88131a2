//! Lexical layer: raw tokens and the comment-repairing token filter
//!
//! `RawTokenizer` is a deliberately generic, language-agnostic lexer: it
//! knows names, numbers, string literals, operators, and physical newlines,
//! but it does NOT understand C's `/* ... */` comment syntax and does not
//! know that `;` terminates a C statement. Both gaps are repaired one layer
//! up by [`filter::TokenFilter`], which is where all cross-line token state
//! lives.

pub mod filter;

pub use filter::TokenFilter;

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Name,
    /// Numeric literal
    Number,
    /// String or character literal
    Str,
    /// Single punctuation character (`/` and `*` are separate tokens)
    Operator,
    /// End of a physical line
    Newline,
    /// End of a logical line; produced by the filter, never by the tokenizer
    LogicalEnd,
    /// A physical line that closed with no counted tokens on it; produced by
    /// the filter, never by the tokenizer
    BlankLine,
}

impl TokenKind {
    /// Whether this kind marks the end of a physical or logical line
    pub fn is_line_marker(self) -> bool {
        matches!(self, Self::Newline | Self::LogicalEnd | Self::BlankLine)
    }
}

/// Source position of a token: 1-based line, 0-based column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A lexical token: kind, literal text, and start position
///
/// Ownership is transient: each token is consumed by the filter and either
/// re-emitted (possibly with a rewritten kind) or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            position: Position { line, column },
        }
    }

    /// Whether this token is an operator with exactly the given text
    pub fn is_operator(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == text
    }
}

/// Lazy tokenizer over source text, producing tokens one at a time in
/// source order
pub struct RawTokenizer<'a> {
    rest: std::str::Chars<'a>,
    /// One char of lookahead, already removed from `rest`
    peeked: Option<char>,
    line: u32,
    column: u32,
    /// Set once the synthetic end-of-input newline has been produced
    finished: bool,
    /// Whether any token has been produced on the current physical line
    line_has_tokens: bool,
}

impl<'a> RawTokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            rest: source.chars(),
            peeked: None,
            line: 1,
            column: 0,
            finished: false,
            line_has_tokens: false,
        }
    }

    fn peek(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = self.rest.next();
        }
        self.peeked
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peeked.take().or_else(|| self.rest.next())?;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume a quoted literal starting at `quote`; an unterminated literal
    /// runs to the end of the physical line rather than aborting the scan
    fn take_quoted(&mut self, quote: char, text: &mut String) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
            text.push(ch);
            if ch == '\\' {
                if let Some(escaped) = self.peek() {
                    if escaped != '\n' {
                        self.bump();
                        text.push(escaped);
                    }
                }
            } else if ch == quote {
                break;
            }
        }
    }
}

impl Iterator for RawTokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let Some(ch) = self.peek() else {
                // A final line without a trailing newline still gets a
                // newline token so `;` at end of input is closed normally.
                if !self.finished {
                    self.finished = true;
                    if self.line_has_tokens {
                        return Some(Token::new(
                            TokenKind::Newline,
                            "\n",
                            self.line,
                            self.column,
                        ));
                    }
                }
                return None;
            };

            let line = self.line;
            let column = self.column;

            if ch == '\n' {
                self.bump();
                self.line_has_tokens = false;
                return Some(Token::new(TokenKind::Newline, "\n", line, column));
            }

            if ch.is_whitespace() {
                self.bump();
                continue;
            }

            self.line_has_tokens = true;

            if ch.is_ascii_alphabetic() || ch == '_' {
                let mut text = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        self.bump();
                        text.push(c);
                    } else {
                        break;
                    }
                }
                return Some(Token::new(TokenKind::Name, text, line, column));
            }

            if ch.is_ascii_digit() {
                let mut text = String::new();
                while let Some(c) = self.peek() {
                    // Good enough for 0x1F, 1.5e3, 10UL; this is a style
                    // checker, not a compiler front end.
                    if c.is_ascii_alphanumeric() || c == '.' {
                        self.bump();
                        text.push(c);
                    } else {
                        break;
                    }
                }
                return Some(Token::new(TokenKind::Number, text, line, column));
            }

            if ch == '"' || ch == '\'' {
                let mut text = String::new();
                self.bump();
                text.push(ch);
                self.take_quoted(ch, &mut text);
                return Some(Token::new(TokenKind::Str, text, line, column));
            }

            // Every other character is a one-character operator token; in
            // particular `/` and `*` come out separately, which is exactly
            // the misunderstanding the filter exists to repair.
            self.bump();
            return Some(Token::new(
                TokenKind::Operator,
                ch.to_string(),
                line,
                column,
            ));
        }
    }
}
