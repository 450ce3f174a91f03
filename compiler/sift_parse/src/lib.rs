//! Sift parser - source text to untyped bytecode.
//!
//! A logos tokenizer feeds a recursive descent parser that emits
//! [`Instruction`]s directly, without an intermediate syntax tree. Every
//! lambda-like sub-expression (generator body and source, call arguments,
//! index expressions, flatten and filter operands) becomes a nested block
//! ending in `Tup`, owned by the instruction that consumes it.
//!
//! The whole program is itself a sequence: value-producing expressions
//! separated by `,` or `;` are collected by a final `Tup`.

mod cursor;
mod grammar;
mod lexer;
mod literal;

use sift_diagnostic::ParseError;
use sift_ir::{Block, Instruction, StringInterner};

use cursor::Cursor;

pub use lexer::{lex, Token, TokenKind};

/// Parser state: a token cursor and the session's interner.
pub struct Parser<'src, 'i> {
    cursor: Cursor<'src>,
    interner: &'i mut StringInterner,
}

impl<'src, 'i> Parser<'src, 'i> {
    pub fn new(source: &'src str, interner: &'i mut StringInterner) -> Result<Self, ParseError> {
        let tokens = lex(source)?;
        Ok(Parser {
            cursor: Cursor::new(source, tokens),
            interner,
        })
    }

    /// Parse a complete program.
    pub fn program(mut self) -> Result<Block, ParseError> {
        let mut block = Block::new();
        self.sequence(&mut block)?;
        if !self.cursor.at_end() {
            return Err(self.cursor.unparsed());
        }
        block.push(Instruction::tuple(0));
        Ok(block)
    }
}

/// Parse `source` into an untyped block, interning names into `interner`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(source: &str, interner: &mut StringInterner) -> Result<Block, ParseError> {
    let block = Parser::new(source, interner)?.program()?;
    tracing::debug!(instructions = block.len(), "parsed");
    Ok(block)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
