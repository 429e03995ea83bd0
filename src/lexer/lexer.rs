use tracing::trace;

use crate::{
    domain::{Identifier, Text},
    lexer::{LexerError, LexerResult, SpannedToken, Token},
};

const TAB_WIDTH: usize = 8;

/// Open brackets allowed at once, as in CPython's tokenizer.
const MAX_NESTING: usize = 200;

/// Turns source text into a flat token stream, resolving indentation into explicit
/// `Indent`/`Dedent` tokens along the way.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    indent_stack: Vec<usize>,
    /// Open `(`, `[` and `{`, innermost last. Newlines and indentation are insignificant while
    /// this is non-empty.
    delimiters: Vec<char>,
    at_line_start: bool,
    tokens: Vec<SpannedToken>,
}

impl Lexer {
    pub fn new(text: &Text) -> Self {
        Self {
            chars: text.as_str().chars().collect(),
            pos: 0,
            line: 1,
            indent_stack: vec![0],
            delimiters: vec![],
            at_line_start: true,
            tokens: vec![],
        }
    }

    pub fn tokenize(mut self) -> LexerResult<Vec<SpannedToken>> {
        while self.pos < self.chars.len() {
            if self.at_line_start && self.delimiters.is_empty() {
                self.at_line_start = false;
                self.handle_indentation()?;
                continue;
            }
            self.next_token()?;
        }

        if let Some(ch) = self.delimiters.last() {
            return Err(LexerError::UnmatchedDelimiter {
                ch: *ch,
                line: self.line,
            });
        }

        self.end_logical_line();
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.emit(Token::Dedent);
        }
        self.emit(Token::Eof);

        trace!(count = self.tokens.len(), "tokenized");
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn emit(&mut self, token: Token) {
        self.emit_at(token, self.line);
    }

    fn emit_at(&mut self, token: Token, line: usize) {
        self.tokens.push(SpannedToken::new(token, line));
    }

    /// Emit a `Newline` unless the previous token already closed the line.
    fn end_logical_line(&mut self) {
        match self.tokens.last() {
            None => {}
            Some(t) if matches!(t.token, Token::Newline | Token::Indent | Token::Dedent) => {}
            Some(_) => self.emit(Token::Newline),
        }
    }

    fn handle_indentation(&mut self) -> LexerResult<()> {
        let mut width = 0;
        while let Some(c) = self.peek() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                '\x0c' => width = 0,
                _ => break,
            }
            self.pos += 1;
        }

        // Blank and comment-only lines do not affect indentation.
        match self.peek() {
            None | Some('\n') | Some('#') | Some('\r') => return Ok(()),
            _ => {}
        }

        let current = self.indent_stack.last().copied().unwrap_or(0);
        if width > current {
            self.indent_stack.push(width);
            self.emit(Token::Indent);
        } else if width < current {
            while self.indent_stack.last().is_some_and(|top| *top > width) {
                self.indent_stack.pop();
                self.emit(Token::Dedent);
            }
            if self.indent_stack.last() != Some(&width) {
                return Err(LexerError::InconsistentDedent { line: self.line });
            }
        }

        Ok(())
    }

    fn next_token(&mut self) -> LexerResult<()> {
        let Some(c) = self.peek() else {
            return Ok(());
        };

        match c {
            '\n' => {
                if self.delimiters.is_empty() {
                    self.end_logical_line();
                    self.at_line_start = true;
                }
                self.advance();
            }
            ' ' | '\t' | '\r' | '\x0c' => {
                self.pos += 1;
            }
            '#' => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.pos += 1;
                }
            }
            '\\' => {
                self.pos += 1;
                if self.peek() == Some('\r') {
                    self.pos += 1;
                }
                if self.peek() != Some('\n') {
                    return Err(LexerError::UnexpectedCharacter {
                        ch: '\\',
                        line: self.line,
                    });
                }
                self.advance();
            }
            '\'' | '"' => self.string("")?,
            c if c.is_ascii_digit() => self.number()?,
            '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.number()?,
            c if c == '_' || c.is_alphabetic() => self.word()?,
            _ => self.operator()?,
        }

        Ok(())
    }

    fn word(&mut self) -> LexerResult<()> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c == '_' || c.is_alphanumeric())
        {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        if matches!(self.peek(), Some('\'') | Some('"')) && is_string_prefix(&word) {
            return self.string(&word.to_ascii_lowercase());
        }

        let token = match Token::keyword(&word) {
            Some(keyword) => keyword,
            None => match Identifier::new(word) {
                Some(ident) => Token::Identifier(ident),
                None => {
                    return Err(LexerError::UnexpectedCharacter {
                        ch: self.chars[start],
                        line: self.line,
                    })
                }
            },
        };
        self.emit(token);
        Ok(())
    }

    fn number(&mut self) -> LexerResult<()> {
        let start = self.pos;
        let line = self.line;

        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                while self
                    .peek()
                    .is_some_and(|c| c == '_' || c.is_ascii_alphanumeric())
                {
                    self.pos += 1;
                }
                let literal: String = self.chars[start..self.pos].iter().collect();
                let digits = literal[2..].replace('_', "");
                let value = i64::from_str_radix(&digits, radix)
                    .map_err(|_| LexerError::InvalidNumber { literal, line })?;
                self.emit_at(Token::Integer(value), line);
                return Ok(());
            }
        }

        let mut is_float = false;
        self.consume_digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            self.consume_digits();
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign_offset = usize::from(matches!(self.peek_at(1), Some('+') | Some('-')));
            if self
                .peek_at(1 + sign_offset)
                .is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                self.pos += 1 + sign_offset;
                self.consume_digits();
            }
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        if matches!(self.peek(), Some('j') | Some('J')) {
            return Err(LexerError::Unsupported {
                what: "complex literals",
                line,
            });
        }
        if self.peek().is_some_and(|c| c == '_' || c.is_alphabetic()) {
            return Err(LexerError::InvalidNumber { literal, line });
        }

        let digits = literal.replace('_', "");
        let token = if is_float {
            digits
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| LexerError::InvalidNumber { literal, line })?
        } else {
            if digits.len() > 1 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
                return Err(LexerError::InvalidNumber { literal, line });
            }
            digits
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| LexerError::InvalidNumber { literal, line })?
        };
        self.emit_at(token, line);
        Ok(())
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c == '_' || c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn string(&mut self, prefix: &str) -> LexerResult<()> {
        let line = self.line;
        if prefix.contains('b') {
            return Err(LexerError::Unsupported {
                what: "bytes literals",
                line,
            });
        }
        let raw = prefix.contains('r');
        let formatted = prefix.contains('f');

        let Some(quote) = self.advance() else {
            return Err(LexerError::UnterminatedString { line });
        };
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut value = String::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(LexerError::UnterminatedString { line });
            };

            if c == quote {
                if !triple {
                    break;
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    break;
                }
                value.push(c);
                continue;
            }

            match c {
                '\n' if !triple => return Err(LexerError::UnterminatedString { line }),
                '\\' if raw => {
                    value.push('\\');
                    if let Some(next) = self.advance() {
                        value.push(next);
                    }
                }
                '\\' => self.escape(&mut value, line)?,
                c => value.push(c),
            }
        }

        let token = if formatted {
            Token::FStringLiteral(value)
        } else {
            Token::StringLiteral(value)
        };
        self.emit_at(token, line);
        Ok(())
    }

    fn escape(&mut self, value: &mut String, line: usize) -> LexerResult<()> {
        let Some(c) = self.advance() else {
            return Err(LexerError::UnterminatedString { line });
        };

        match c {
            '\n' => {}
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            'a' => value.push('\x07'),
            'b' => value.push('\x08'),
            'f' => value.push('\x0c'),
            'v' => value.push('\x0b'),
            'x' => value.push(self.hex_escape(2, line)?),
            'u' => value.push(self.hex_escape(4, line)?),
            'U' => value.push(self.hex_escape(8, line)?),
            '\\' | '\'' | '"' => value.push(c),
            other => {
                value.push('\\');
                value.push(other);
            }
        }

        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, line: usize) -> LexerResult<char> {
        let end = self.pos + digits;
        if end > self.chars.len() {
            return Err(LexerError::UnterminatedString { line });
        }
        let literal: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;

        u32::from_str_radix(&literal, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or(LexerError::InvalidNumber { literal, line })
    }

    fn operator(&mut self) -> LexerResult<()> {
        let line = self.line;
        let c = self.peek().unwrap_or('\0');
        let next = self.peek_at(1);
        let third = self.peek_at(2);

        let (token, width) = match (c, next, third) {
            ('*', Some('*'), Some('=')) => (Token::ExpoEquals, 3),
            ('/', Some('/'), Some('=')) => (Token::DoubleSlashEquals, 3),
            ('<', Some('<'), Some('=')) => (Token::LeftShiftEquals, 3),
            ('>', Some('>'), Some('=')) => (Token::RightShiftEquals, 3),
            ('.', Some('.'), Some('.')) => (Token::Ellipsis, 3),
            ('*', Some('*'), _) => (Token::DoubleAsterisk, 2),
            ('/', Some('/'), _) => (Token::DoubleSlash, 2),
            ('<', Some('<'), _) => (Token::LeftShift, 2),
            ('>', Some('>'), _) => (Token::RightShift, 2),
            ('+', Some('='), _) => (Token::PlusEquals, 2),
            ('-', Some('='), _) => (Token::MinusEquals, 2),
            ('*', Some('='), _) => (Token::AsteriskEquals, 2),
            ('/', Some('='), _) => (Token::SlashEquals, 2),
            ('%', Some('='), _) => (Token::ModEquals, 2),
            ('&', Some('='), _) => (Token::BitwiseAndEquals, 2),
            ('|', Some('='), _) => (Token::BitwiseOrEquals, 2),
            ('^', Some('='), _) => (Token::BitwiseXorEquals, 2),
            ('=', Some('='), _) => (Token::Equal, 2),
            ('!', Some('='), _) => (Token::NotEqual, 2),
            ('<', Some('='), _) => (Token::LessThanOrEqual, 2),
            ('>', Some('='), _) => (Token::GreaterThanOrEqual, 2),
            ('-', Some('>'), _) => (Token::ReturnArrow, 2),
            ('+', _, _) => (Token::Plus, 1),
            ('-', _, _) => (Token::Minus, 1),
            ('*', _, _) => (Token::Asterisk, 1),
            ('/', _, _) => (Token::Slash, 1),
            ('%', _, _) => (Token::Modulo, 1),
            ('&', _, _) => (Token::BitwiseAnd, 1),
            ('|', _, _) => (Token::BitwiseOr, 1),
            ('^', _, _) => (Token::BitwiseXor, 1),
            ('~', _, _) => (Token::BitwiseNot, 1),
            ('=', _, _) => (Token::Assign, 1),
            ('<', _, _) => (Token::LessThan, 1),
            ('>', _, _) => (Token::GreaterThan, 1),
            (',', _, _) => (Token::Comma, 1),
            (':', Some('='), _) => {
                return Err(LexerError::Unsupported {
                    what: "assignment expressions",
                    line,
                })
            }
            (':', _, _) => (Token::Colon, 1),
            (';', _, _) => (Token::Semicolon, 1),
            ('.', _, _) => (Token::Dot, 1),
            ('@', _, _) => (Token::At, 1),
            ('(', _, _) => (Token::LParen, 1),
            ('[', _, _) => (Token::LBracket, 1),
            ('{', _, _) => (Token::LBrace, 1),
            (')', _, _) => (Token::RParen, 1),
            (']', _, _) => (Token::RBracket, 1),
            ('}', _, _) => (Token::RBrace, 1),
            (ch, _, _) => return Err(LexerError::UnexpectedCharacter { ch, line }),
        };

        match c {
            '(' | '[' | '{' => {
                if self.delimiters.len() >= MAX_NESTING {
                    return Err(LexerError::TooDeeplyNested { line });
                }
                self.delimiters.push(c)
            }
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if self.delimiters.pop() != Some(expected) {
                    return Err(LexerError::UnmatchedDelimiter { ch: c, line });
                }
            }
            _ => {}
        }

        self.pos += width;
        self.emit_at(token, line);
        Ok(())
    }
}

fn is_string_prefix(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "r" | "u" | "f" | "b" | "rf" | "fr" | "rb" | "br"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(&Text::new(input))
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn ident(name: &str) -> Token {
        Token::Identifier(Identifier::new(name).unwrap())
    }

    fn lex_error(input: &str) -> LexerError {
        Lexer::new(&Text::new(input)).tokenize().unwrap_err()
    }

    #[test]
    fn simple_assignment() {
        assert_eq!(
            tokens("x = 1 + 2.5"),
            vec![
                ident("x"),
                Token::Assign,
                Token::Integer(1),
                Token::Plus,
                Token::Float(2.5),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn indentation() {
        let input = "
def f(a):
    if a:
        return 1

    # comment
    return 2
x = 3
";
        assert_eq!(
            tokens(input),
            vec![
                Token::Def,
                ident("f"),
                Token::LParen,
                ident("a"),
                Token::RParen,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::If,
                ident("a"),
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Return,
                Token::Integer(1),
                Token::Newline,
                Token::Dedent,
                Token::Return,
                Token::Integer(2),
                Token::Newline,
                Token::Dedent,
                ident("x"),
                Token::Assign,
                Token::Integer(3),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn dedents_at_eof() {
        assert_eq!(
            tokens("if x:\n    y"),
            vec![
                Token::If,
                ident("x"),
                Token::Colon,
                Token::Newline,
                Token::Indent,
                ident("y"),
                Token::Newline,
                Token::Dedent,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn newlines_inside_brackets_are_ignored() {
        assert_eq!(
            tokens("a = [\n  1,\n    2,\n]\n"),
            vec![
                ident("a"),
                Token::Assign,
                Token::LBracket,
                Token::Integer(1),
                Token::Comma,
                Token::Integer(2),
                Token::Comma,
                Token::RBracket,
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn line_continuation() {
        assert_eq!(
            tokens("a = 1 + \\\n    2"),
            vec![
                ident("a"),
                Token::Assign,
                Token::Integer(1),
                Token::Plus,
                Token::Integer(2),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokens("0x1F 0o17 0b101 1_000 1e3 .5"),
            vec![
                Token::Integer(31),
                Token::Integer(15),
                Token::Integer(5),
                Token::Integer(1000),
                Token::Float(1000.0),
                Token::Float(0.5),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn strings() {
        assert_eq!(
            tokens(r#"'a\n' "b'c" r'\d' f"{x}!" '''multi
line'''"#),
            vec![
                Token::StringLiteral("a\n".into()),
                Token::StringLiteral("b'c".into()),
                Token::StringLiteral("\\d".into()),
                Token::FStringLiteral("{x}!".into()),
                Token::StringLiteral("multi\nline".into()),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            tokens("a **= b // c -> ... != ~d"),
            vec![
                ident("a"),
                Token::ExpoEquals,
                ident("b"),
                Token::DoubleSlash,
                ident("c"),
                Token::ReturnArrow,
                Token::Ellipsis,
                Token::NotEqual,
                Token::BitwiseNot,
                ident("d"),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tracks_lines() {
        let spanned = Lexer::new(&Text::new("a\n\n'''x\ny'''\nb"))
            .tokenize()
            .unwrap();
        let lines: Vec<_> = spanned
            .iter()
            .filter(|t| !matches!(t.token, Token::Newline | Token::Eof))
            .map(|t| t.line)
            .collect();
        assert_eq!(lines, vec![1, 3, 5]);
    }

    #[test]
    fn errors() {
        assert_eq!(
            lex_error("x = 'abc"),
            LexerError::UnterminatedString { line: 1 }
        );
        assert_eq!(
            lex_error("if x:\n        a\n    b"),
            LexerError::InconsistentDedent { line: 3 }
        );
        assert_eq!(
            lex_error("x = (1, 2"),
            LexerError::UnmatchedDelimiter { ch: '(', line: 1 }
        );
        assert_eq!(
            lex_error(&format!("x = {}1{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1))),
            LexerError::TooDeeplyNested { line: 1 }
        );
        assert_eq!(
            lex_error("x = 1 $ 2"),
            LexerError::UnexpectedCharacter { ch: '$', line: 1 }
        );
        assert_eq!(
            lex_error("x = 99999999999999999999"),
            LexerError::InvalidNumber {
                literal: "99999999999999999999".into(),
                line: 1
            }
        );
    }
}
