use std::fmt;

use crate::token::Token;

// ── LexError ──────────────────────────────────────────────────────────────

/// A lexical error in a YScript source file.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: u32,
    /// 1-based source column number where the error occurred.
    pub col: u32,
}

impl LexError {
    pub(crate) fn new(msg: impl Into<String>, line: u32, col: u32) -> Self {
        Self { message: msg.into(), line, col }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yscript lexer error at [{} , {}] :: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for LexError {}

// ── ParseError ────────────────────────────────────────────────────────────

/// A syntax error. The parser recovers from these and keeps collecting them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub col: u32,
}

impl ParseError {
    pub(crate) fn new(msg: impl Into<String>, line: u32, col: u32) -> Self {
        Self { message: msg.into(), line, col }
    }

    pub(crate) fn at(token: &Token, msg: impl Into<String>) -> Self {
        Self::new(msg, token.line, token.col)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yscript parser error at [{} , {}] :: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for ParseError {}

// ── BuildError ────────────────────────────────────────────────────────────

/// A semantic error raised while building the node graph. Always fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildError {
    pub message: String,
    pub line: u32,
    pub col: u32,
}

impl BuildError {
    pub(crate) fn at(token: &Token, msg: impl Into<String>) -> Self {
        Self { message: msg.into(), line: token.line, col: token.col }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node builder error at [{} , {}] :: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for BuildError {}

// ── Error ─────────────────────────────────────────────────────────────────

/// Any failure of the lex → parse → build pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    /// Every error collected by an aborted parse, in source order.
    Parse(Vec<ParseError>),
    Build(BuildError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(e) => e.fmt(f),
            Error::Build(e) => e.fmt(f),
            Error::Parse(errors) => {
                write!(f, "parse failed with {} error(s)", errors.len())?;
                for e in errors {
                    write!(f, "\n  {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Lex(e)
    }
}

impl From<BuildError> for Error {
    fn from(e: BuildError) -> Self {
        Error::Build(e)
    }
}
