use std::fmt::{Display, Error, Formatter};

use crate::lexer::{LexerError, Token};

#[derive(Debug, PartialEq, Clone)]
pub enum ParserError {
    ExpectedToken(Token, Token),
    UnexpectedToken(Token),
    SyntaxError(String),
}

impl ParserError {
    pub fn syntax_error(msg: impl Into<String>) -> Self {
        Self::SyntaxError(msg.into())
    }

    pub fn unsupported(what: &str) -> Self {
        Self::SyntaxError(format!("unsupported syntax: {what}"))
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            ParserError::ExpectedToken(expected, found) => {
                write!(f, "expected {expected}, found {found}")
            }
            ParserError::UnexpectedToken(token) => {
                write!(f, "invalid syntax: unexpected {token}")
            }
            ParserError::SyntaxError(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

/// A lexer or parser failure pinned to the source line where it happened.
#[derive(Debug, PartialEq, Clone)]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for SyntaxError {}

impl From<LexerError> for SyntaxError {
    fn from(e: LexerError) -> Self {
        Self::new(e.line(), e.to_string())
    }
}
