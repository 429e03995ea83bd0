use std::fmt::{Display, Error, Formatter};

use crate::domain::Identifier;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Identifier(Identifier),
    Integer(i64),
    Float(f64),
    StringLiteral(String),
    /// The body of an f-string with escapes already resolved; `{...}` fields are left for the
    /// parser.
    FStringLiteral(String),

    Def,
    Class,
    Return,
    Lambda,
    If,
    Elif,
    Else,
    While,
    For,
    In,
    Break,
    Continue,
    Pass,
    Import,
    From,
    As,
    Global,
    Nonlocal,
    Raise,
    Try,
    Except,
    Finally,
    Assert,
    Del,
    And,
    Or,
    Not,
    Is,
    None,
    True,
    False,
    With,
    Yield,
    Async,
    Await,

    Plus,
    Minus,
    Asterisk,
    Slash,
    DoubleSlash,
    Modulo,
    DoubleAsterisk,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseNot,
    LeftShift,
    RightShift,

    Assign,
    PlusEquals,
    MinusEquals,
    AsteriskEquals,
    SlashEquals,
    DoubleSlashEquals,
    ModEquals,
    ExpoEquals,
    BitwiseAndEquals,
    BitwiseOrEquals,
    BitwiseXorEquals,
    LeftShiftEquals,
    RightShiftEquals,

    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Ellipsis,
    At,
    ReturnArrow,

    Newline,
    Indent,
    Dedent,
    Eof,
}

impl Token {
    pub fn keyword(word: &str) -> Option<Token> {
        let token = match word {
            "def" => Token::Def,
            "class" => Token::Class,
            "return" => Token::Return,
            "lambda" => Token::Lambda,
            "if" => Token::If,
            "elif" => Token::Elif,
            "else" => Token::Else,
            "while" => Token::While,
            "for" => Token::For,
            "in" => Token::In,
            "break" => Token::Break,
            "continue" => Token::Continue,
            "pass" => Token::Pass,
            "import" => Token::Import,
            "from" => Token::From,
            "as" => Token::As,
            "global" => Token::Global,
            "nonlocal" => Token::Nonlocal,
            "raise" => Token::Raise,
            "try" => Token::Try,
            "except" => Token::Except,
            "finally" => Token::Finally,
            "assert" => Token::Assert,
            "del" => Token::Del,
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "is" => Token::Is,
            "None" => Token::None,
            "True" => Token::True,
            "False" => Token::False,
            "with" => Token::With,
            "yield" => Token::Yield,
            "async" => Token::Async,
            "await" => Token::Await,
            _ => return None,
        };
        Some(token)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let text = match self {
            Token::Identifier(ident) => return write!(f, "'{ident}'"),
            Token::Integer(i) => return write!(f, "'{i}'"),
            Token::Float(x) => return write!(f, "'{x}'"),
            Token::StringLiteral(_) | Token::FStringLiteral(_) => "string literal",
            Token::Def => "def",
            Token::Class => "class",
            Token::Return => "return",
            Token::Lambda => "lambda",
            Token::If => "if",
            Token::Elif => "elif",
            Token::Else => "else",
            Token::While => "while",
            Token::For => "for",
            Token::In => "in",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Pass => "pass",
            Token::Import => "import",
            Token::From => "from",
            Token::As => "as",
            Token::Global => "global",
            Token::Nonlocal => "nonlocal",
            Token::Raise => "raise",
            Token::Try => "try",
            Token::Except => "except",
            Token::Finally => "finally",
            Token::Assert => "assert",
            Token::Del => "del",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::Is => "is",
            Token::None => "None",
            Token::True => "True",
            Token::False => "False",
            Token::With => "with",
            Token::Yield => "yield",
            Token::Async => "async",
            Token::Await => "await",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Asterisk => "*",
            Token::Slash => "/",
            Token::DoubleSlash => "//",
            Token::Modulo => "%",
            Token::DoubleAsterisk => "**",
            Token::BitwiseAnd => "&",
            Token::BitwiseOr => "|",
            Token::BitwiseXor => "^",
            Token::BitwiseNot => "~",
            Token::LeftShift => "<<",
            Token::RightShift => ">>",
            Token::Assign => "=",
            Token::PlusEquals => "+=",
            Token::MinusEquals => "-=",
            Token::AsteriskEquals => "*=",
            Token::SlashEquals => "/=",
            Token::DoubleSlashEquals => "//=",
            Token::ModEquals => "%=",
            Token::ExpoEquals => "**=",
            Token::BitwiseAndEquals => "&=",
            Token::BitwiseOrEquals => "|=",
            Token::BitwiseXorEquals => "^=",
            Token::LeftShiftEquals => "<<=",
            Token::RightShiftEquals => ">>=",
            Token::Equal => "==",
            Token::NotEqual => "!=",
            Token::LessThan => "<",
            Token::LessThanOrEqual => "<=",
            Token::GreaterThan => ">",
            Token::GreaterThanOrEqual => ">=",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Dot => ".",
            Token::Ellipsis => "...",
            Token::At => "@",
            Token::ReturnArrow => "->",
            Token::Newline => return write!(f, "newline"),
            Token::Indent => return write!(f, "indent"),
            Token::Dedent => return write!(f, "dedent"),
            Token::Eof => return write!(f, "end of file"),
        };
        write!(f, "'{text}'")
    }
}

/// A token plus the line it started on.
#[derive(Debug, PartialEq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

impl SpannedToken {
    pub fn new(token: Token, line: usize) -> Self {
        Self { token, line }
    }
}
