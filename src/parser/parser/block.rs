use crate::{
    lexer::Token,
    parser::{
        types::{ast, Ast},
        Parser, ParserError,
    },
};

impl Parser {
    /// Parse the body following a `:`, either an indented block or the rest of the line.
    pub fn parse_block(&mut self) -> Result<Ast, ParserError> {
        if self.current_token() == &Token::Newline {
            self.consume_current();
            self.parse_indented_block()
        } else {
            self.parse_single_line_block()
        }
    }

    pub fn parse_statement_list_until<F>(&mut self, is_terminator: F) -> Result<Ast, ParserError>
    where
        F: Fn(&Token) -> bool,
    {
        let mut stmts = ast![];

        loop {
            self.consume_newlines();
            if is_terminator(self.current_token()) {
                break;
            }

            let stmt = self.parse_statement()?;
            let compound = stmt.kind.is_compound();
            stmts.push(stmt);

            if !compound {
                self.consume_statement_end()?;
            }
        }

        Ok(stmts)
    }

    /// After a simple statement, accept `;`, a newline, or the end of input.
    fn consume_statement_end(&mut self) -> Result<(), ParserError> {
        match self.current_token() {
            Token::Semicolon => {
                self.consume_current();
                self.consume_optional(&Token::Newline);
                Ok(())
            }
            Token::Newline => {
                self.consume_current();
                Ok(())
            }
            Token::Eof => Ok(()),
            other => Err(ParserError::UnexpectedToken(other.clone())),
        }
    }

    fn parse_indented_block(&mut self) -> Result<Ast, ParserError> {
        if self.current_token() != &Token::Indent {
            return Err(ParserError::syntax_error("expected an indented block"));
        }
        self.consume_current();

        let stmts = self.parse_statement_list_until(|tok| matches!(tok, Token::Dedent))?;
        self.consume(&Token::Dedent)?;

        Ok(stmts)
    }

    /// Support single-line functions, classes, or any blocks.
    ///
    /// Examples:
    /// def four(): return 4
    /// class Foo: pass
    /// if x: a = 1; b = 2
    fn parse_single_line_block(&mut self) -> Result<Ast, ParserError> {
        let mut stmts = ast![];

        loop {
            let stmt = self.parse_statement()?;
            if stmt.kind.is_compound() {
                return Err(ParserError::syntax_error("invalid syntax"));
            }
            stmts.push(stmt);

            if self.consume_optional(&Token::Semicolon) && !self.end_of_statement() {
                continue;
            }
            break;
        }

        if !self.consume_optional(&Token::Newline) && !self.is_finished() {
            return Err(ParserError::UnexpectedToken(self.current_token().clone()));
        }
        Ok(stmts)
    }
}
