use std::fmt::{Display, Error, Formatter};

#[derive(Debug, PartialEq, Clone)]
pub enum LexerError {
    UnexpectedCharacter { ch: char, line: usize },
    UnterminatedString { line: usize },
    InvalidNumber { literal: String, line: usize },
    InconsistentDedent { line: usize },
    UnmatchedDelimiter { ch: char, line: usize },
    TooDeeplyNested { line: usize },
    Unsupported { what: &'static str, line: usize },
}

impl LexerError {
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { line, .. }
            | Self::UnterminatedString { line }
            | Self::InvalidNumber { line, .. }
            | Self::InconsistentDedent { line }
            | Self::UnmatchedDelimiter { line, .. }
            | Self::TooDeeplyNested { line }
            | Self::Unsupported { line, .. } => *line,
        }
    }
}

impl Display for LexerError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Self::UnexpectedCharacter { ch, .. } => write!(f, "invalid character '{ch}'"),
            Self::UnterminatedString { .. } => write!(f, "unterminated string literal"),
            Self::InvalidNumber { literal, .. } => write!(f, "invalid number literal '{literal}'"),
            Self::InconsistentDedent { .. } => {
                write!(f, "unindent does not match any outer indentation level")
            }
            Self::UnmatchedDelimiter { ch, .. } => write!(f, "unmatched '{ch}'"),
            Self::TooDeeplyNested { .. } => write!(f, "too many nested parentheses"),
            Self::Unsupported { what, .. } => write!(f, "{what} are not supported"),
        }
    }
}

pub type LexerResult<T> = Result<T, LexerError>;
