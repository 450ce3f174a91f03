//! Token cursor.

use sift_diagnostic::ParseError;

use crate::lexer::{Token, TokenKind};

pub(crate) struct Cursor<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Cursor {
            source,
            tokens,
            pos: 0,
        }
    }

    #[inline]
    pub fn peek(&self) -> Option<TokenKind> {
        self.peek_at(0)
    }

    pub fn peek_token(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    #[inline]
    pub fn peek_at(&self, ahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| t.kind)
    }

    /// Current position, for [`Cursor::rewind`].
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn rewind(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).copied();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.tokens.get(self.pos) {
            Some(tok) if tok.kind == kind => {
                self.pos += 1;
                Ok(*tok)
            }
            _ => Err(self.unparsed()),
        }
    }

    /// True if the current and next tokens touch without whitespace.
    pub fn next_is_adjacent(&self) -> bool {
        match (self.tokens.get(self.pos), self.tokens.get(self.pos + 1)) {
            (Some(a), Some(b)) => a.end == b.start,
            _ => false,
        }
    }

    /// Byte offset of the current token, or the end of input.
    pub fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.source.len(), |t| t.start)
    }

    pub fn text(&self, tok: Token) -> &'src str {
        self.source.get(tok.start..tok.end).unwrap_or_default()
    }

    pub fn source_between(&self, start: usize, end: usize) -> &'src str {
        self.source.get(start..end).unwrap_or_default()
    }

    /// End offset of the last consumed token.
    pub fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|p| self.tokens.get(p))
            .map_or(0, |t| t.end)
    }

    /// Error for the input remaining at the cursor.
    pub fn unparsed(&self) -> ParseError {
        ParseError::unparsed(self.source, self.offset())
    }
}
