//! Tokenizer.
//!
//! Numeric and string literals are lexed as raw slices; their values are
//! converted by the parser so that conversion failures can name the literal.

use logos::Logos;
use sift_diagnostic::ParseError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("[.")]
    ArrayOpen,
    #[token(".]")]
    ArrayClose,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("..")]
    DotDot,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("=")]
    Assign,
    #[token("<<")]
    RecOpen,
    #[token(">>")]
    RecClose,
    #[token("$")]
    Dollar,

    #[token("**")]
    StarStar,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("&&")]
    AmpAmp,
    #[token("&")]
    Amp,
    #[token("||")]
    PipePipe,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    /// `0x` hexadecimal, always unsigned.
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Hex,
    /// Digits with an optional `u` suffix.
    #[regex(r"[0-9]+u?")]
    UInt,
    /// Digits with a signed suffix `s`, `l` or `i`.
    #[regex(r"[0-9]+[sli]")]
    Int,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    #[regex(r#""([^"\\]|\\[\s\S])*""#)]
    #[regex(r"'([^'\\]|\\[\s\S])*'")]
    Str,

    #[token("@")]
    At,
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Ident,
}

impl TokenKind {
    pub fn is_number(self) -> bool {
        matches!(self, TokenKind::UInt | TokenKind::Int | TokenKind::Float)
    }

    /// Tokens that can open an operand, as opposed to continuing one.
    pub fn starts_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::At
                | TokenKind::UInt
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Hex
                | TokenKind::Str
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::ArrayOpen
                | TokenKind::LBrace
                | TokenKind::RecOpen
                | TokenKind::Dollar
                | TokenKind::Bang
                | TokenKind::Tilde
        )
    }

    /// Tokens that may follow a complete statement.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::ArrayClose
                | TokenKind::RBrace
                | TokenKind::Colon
                | TokenKind::Arrow
                | TokenKind::RecClose
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range in the source.
    pub start: usize,
    pub end: usize,
}

/// Tokenize `source`. An unrecognized character is reported as unparsed
/// input from that point on.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(kind) = lexer.next() {
        let span = lexer.span();
        match kind {
            Ok(kind) => tokens.push(Token {
                kind,
                start: span.start,
                end: span.end,
            }),
            Err(()) => return Err(ParseError::unparsed(source, span.start)),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
