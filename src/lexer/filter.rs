//! Token stream filter repairing the raw tokenizer's view of C source
//!
//! The raw tokenizer emits `/` and `*` as unrelated operator tokens and has
//! no idea that `;` ends a C statement. This filter sits between the
//! tokenizer and logical-line assembly and fixes both, using exactly one
//! token of lookahead held in an explicit `previous` buffer:
//!
//! - `/` `*` opens a block comment, `*` `/` closes one (only while open);
//!   the trailing `/` of a closer is dropped so it cannot reappear as a
//!   standalone token downstream
//! - a `;` immediately followed by a newline is rewritten to
//!   [`TokenKind::LogicalEnd`]
//! - a line-end marker closing a line on which no tokens were counted is
//!   downgraded to [`TokenKind::BlankLine`], so comment-only and empty
//!   lines never read as empty statements downstream
//!
//! Tokens inside a block comment are still emitted (position-based checks
//! stay accurate) but are suppressed from the per-line token count. A
//! comment that never closes simply leaves the filter in the comment state
//! for the rest of the file; the scan degrades, it does not fail.
//!
//! All state is owned by the filter instance, which is constructed fresh
//! for every file scan; nothing leaks between files.

use super::{Token, TokenKind};

/// One-token-delay filter over a raw token stream
pub struct TokenFilter<I> {
    input: I,
    /// The buffered token awaiting release; rewrites apply here before the
    /// token ever leaves the filter
    previous: Option<Token>,
    inside_block_comment: bool,
    /// True for exactly one token after a `*/` pair was detected: the
    /// buffered `/` half must be discarded, not emitted
    pending_slash_skip: bool,
    /// Counted tokens on the line currently being read; resets whenever a
    /// line marker is released
    tokens_on_line: usize,
}

impl<I: Iterator<Item = Token>> TokenFilter<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            previous: None,
            inside_block_comment: false,
            pending_slash_skip: false,
            tokens_on_line: 0,
        }
    }

    /// Whether the filter is currently inside an (possibly unterminated)
    /// block comment
    pub fn inside_block_comment(&self) -> bool {
        self.inside_block_comment
    }

    /// Release a token downstream, maintaining the per-line token count
    fn release(&mut self, token: Token) -> Token {
        if token.kind.is_line_marker() {
            self.tokens_on_line = 0;
        } else if !self.inside_block_comment {
            self.tokens_on_line += 1;
        }
        token
    }
}

impl<I: Iterator<Item = Token>> Iterator for TokenFilter<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let Some(current) = self.input.next() else {
                // Input exhausted: flush the buffered token as-is.
                let last = self.previous.take()?;
                return Some(self.release(last));
            };

            if self.pending_slash_skip {
                // The buffer holds the spurious `/` half of a `*/` already
                // accounted for; drop it and buffer the incoming token.
                self.pending_slash_skip = false;
                self.previous = Some(current);
                continue;
            }

            let Some(mut previous) = self.previous.take() else {
                self.previous = Some(current);
                continue;
            };

            if previous.is_operator("/") && current.is_operator("*") {
                self.inside_block_comment = true;
            } else if self.inside_block_comment
                && previous.is_operator("*")
                && current.is_operator("/")
            {
                self.inside_block_comment = false;
                self.pending_slash_skip = true;
            } else if !self.inside_block_comment {
                if previous.is_operator(";") && current.kind == TokenKind::Newline {
                    // The tokenizer does not know `;` ends a C statement.
                    previous.kind = TokenKind::LogicalEnd;
                } else if previous.kind.is_line_marker() && self.tokens_on_line == 0 {
                    previous.kind = TokenKind::BlankLine;
                }
            }

            self.previous = Some(current);
            return Some(self.release(previous));
        }
    }
}
