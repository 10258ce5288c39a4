/*!
# Rust Language Module

This Rust module provides lexical analysis and parsing of the Phantom language.

*/

#[macro_use]
mod error;
mod lex;
mod parse;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use lex::Lexer;
pub use parse::parse;
pub use token::{Literal, Operator, Token, TokenKind, Word};

pub mod ast;

/// Byte range of a token in the source text.
pub type Column = std::ops::Range<usize>;

/// One-based line and column of a token.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Position {
        Position { line, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
