use std::fmt::{Display, Error, Formatter};

use crate::lexer::Token;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    IntegerDiv,
    Mod,
    Expo,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
}

impl BinOp {
    /// The operator behind an augmented assignment token such as `+=`.
    pub fn from_compound(token: &Token) -> Option<Self> {
        let op = match token {
            Token::PlusEquals => Self::Add,
            Token::MinusEquals => Self::Sub,
            Token::AsteriskEquals => Self::Mul,
            Token::SlashEquals => Self::Div,
            Token::DoubleSlashEquals => Self::IntegerDiv,
            Token::ModEquals => Self::Mod,
            Token::ExpoEquals => Self::Expo,
            Token::BitwiseAndEquals => Self::BitwiseAnd,
            Token::BitwiseOrEquals => Self::BitwiseOr,
            Token::BitwiseXorEquals => Self::BitwiseXor,
            Token::LeftShiftEquals => Self::LeftShift,
            Token::RightShiftEquals => Self::RightShift,
            _ => return None,
        };
        Some(op)
    }
}

impl TryFrom<&Token> for BinOp {
    type Error = ();

    fn try_from(token: &Token) -> Result<Self, Self::Error> {
        let op = match token {
            Token::Plus => Self::Add,
            Token::Minus => Self::Sub,
            Token::Asterisk => Self::Mul,
            Token::Slash => Self::Div,
            Token::DoubleSlash => Self::IntegerDiv,
            Token::Modulo => Self::Mod,
            Token::DoubleAsterisk => Self::Expo,
            Token::BitwiseAnd => Self::BitwiseAnd,
            Token::BitwiseOr => Self::BitwiseOr,
            Token::BitwiseXor => Self::BitwiseXor,
            Token::LeftShift => Self::LeftShift,
            Token::RightShift => Self::RightShift,
            _ => return Err(()),
        };
        Ok(op)
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IntegerDiv => "//",
            Self::Mod => "%",
            Self::Expo => "**",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitwiseNot,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let symbol = match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Not => "not",
            Self::BitwiseNot => "~",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CompareOp {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    NotIn,
    Is,
    IsNot,
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let symbol = match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Is => "is",
            Self::IsNot => "is not",
        };
        write!(f, "{symbol}")
    }
}
