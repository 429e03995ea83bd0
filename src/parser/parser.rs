use tracing::trace;

use crate::{
    domain::{Identifier, Text},
    lexer::{Lexer, SpannedToken, Token},
    parser::{types::Ast, ParserError, SyntaxError, TokenBuffer},
};

mod block;
mod expr;
mod fstring;
mod import;
mod signature;
mod stmt;

/// Lex and parse a complete source text.
pub fn parse_text(text: &Text) -> Result<Ast, SyntaxError> {
    let tokens = Lexer::new(text).tokenize()?;
    let mut parser = Parser::new(tokens);
    parser
        .parse()
        .map_err(|e| SyntaxError::new(parser.line_number(), e.to_string()))
}

/// A recursive-descent parser for the supported subset of the Python grammar.
pub struct Parser {
    tokens: TokenBuffer,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser {
            tokens: TokenBuffer::new(tokens),
        }
    }

    /// Return the full AST. This will consume all the tokens.
    pub fn parse(&mut self) -> Result<Ast, ParserError> {
        let stmts = self.parse_statement_list_until(|tok| matches!(tok, Token::Eof))?;
        self.consume(&Token::Eof)?;
        Ok(stmts)
    }

    /// The line of the token the parser is looking at, which is where any error was found.
    pub fn line_number(&self) -> usize {
        self.tokens.line()
    }

    pub fn consume_newlines(&mut self) {
        while self.current_token() == &Token::Newline {
            self.consume_current();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current_token() == &Token::Eof
    }

    fn current_token(&self) -> &Token {
        self.tokens.peek(0)
    }

    fn peek_token(&self, offset: usize) -> &Token {
        self.tokens.peek(offset)
    }

    fn end_of_statement(&self) -> bool {
        matches!(
            self.current_token(),
            Token::Newline | Token::Semicolon | Token::Eof
        )
    }

    fn consume_current(&mut self) {
        trace!(token = ?self.current_token(), "consume");
        self.tokens.consume();
    }

    fn consume(&mut self, expected: &Token) -> Result<(), ParserError> {
        let current = self.current_token();
        if current != expected {
            return Err(ParserError::ExpectedToken(
                expected.clone(),
                current.clone(),
            ));
        }

        self.consume_current();
        Ok(())
    }

    fn consume_optional(&mut self, expected: &Token) -> bool {
        if self.current_token() == expected {
            self.consume_current();
            true
        } else {
            false
        }
    }

    /// Parse a `Token::Identifier` without any semantic analysis.
    fn parse_identifier(&mut self) -> Result<Identifier, ParserError> {
        match self.current_token().clone() {
            Token::Identifier(ident) => {
                self.consume_current();
                Ok(ident)
            }
            _ => Err(ParserError::syntax_error("invalid identifier")),
        }
    }

    fn parse_identifiers(&mut self) -> Result<Vec<Identifier>, ParserError> {
        let mut identifiers = vec![self.parse_identifier()?];
        while self.consume_optional(&Token::Comma) {
            identifiers.push(self.parse_identifier()?);
        }
        Ok(identifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_the_line() {
        let e = parse_text(&Text::new("x = 1\ny = (2 +\n)\n")).unwrap_err();
        assert_eq!(e.line, 3);

        let e = parse_text(&Text::new("x = 1\n\ny = 'open\n")).unwrap_err();
        assert_eq!(e, SyntaxError::new(3, "unterminated string literal"));
    }

    #[test]
    fn empty_source() {
        assert_eq!(parse_text(&Text::new("")).unwrap(), Ast::default());
        assert_eq!(
            parse_text(&Text::new("\n# only a comment\n\n")).unwrap(),
            Ast::default()
        );
    }

    #[test]
    fn deep_nesting() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        assert!(parse_text(&Text::new(&format!("x = {}\n", nested(150)))).is_ok());
        assert!(parse_text(&Text::new(&format!("x = {}\n", "not ".repeat(5000)))).is_err());
        assert!(parse_text(&Text::new(&format!("x = {}True\n", "not ".repeat(5000)))).is_ok());
        assert!(parse_text(&Text::new(&format!("x = {}1\n", "-".repeat(5000)))).is_ok());

        let e = parse_text(&Text::new(&format!("x = 1\ny = {}\n", nested(500)))).unwrap_err();
        assert_eq!(e, SyntaxError::new(2, "too many nested parentheses"));
    }
}
