use std::collections::HashSet;

use crate::{
    lexer::Token,
    parser::{
        types::{Param, Params},
        Parser, ParserError,
    },
};

impl Parser {
    /// Parse a parameter list up to (not including) `end_token`: `)` for `def`, `:` for
    /// `lambda`.
    pub fn parse_function_def_args(&mut self, end_token: Token) -> Result<Params, ParserError> {
        let mut params = Params::default();
        let mut seen = HashSet::new();
        let mut keyword_only = false;

        while self.current_token() != &end_token {
            if self.consume_optional(&Token::Slash) {
                // Positional-only marker. Every parameter is positional-or-keyword here.
            } else if self.consume_optional(&Token::Asterisk) {
                if keyword_only {
                    return Err(ParserError::syntax_error("* argument may appear only once"));
                }
                keyword_only = true;
                if matches!(self.current_token(), Token::Identifier(_)) {
                    let name = self.parse_identifier()?;
                    self.skip_annotation(&end_token)?;
                    params.args_var = Some(name);
                }
            } else if self.consume_optional(&Token::DoubleAsterisk) {
                let name = self.parse_identifier()?;
                self.skip_annotation(&end_token)?;
                params.kwargs_var = Some(name);
                self.consume_optional(&Token::Comma);
                break;
            } else {
                let arg = self.parse_identifier()?;
                self.skip_annotation(&end_token)?;

                let default = if self.consume_optional(&Token::Assign) {
                    Some(self.parse_simple_expr()?)
                } else {
                    None
                };

                if keyword_only {
                    params.kwonly.push(Param { arg, default });
                } else {
                    if default.is_none() && params.args.iter().any(|p| p.default.is_some()) {
                        return Err(ParserError::syntax_error(
                            "non-default argument follows default argument",
                        ));
                    }
                    params.args.push(Param { arg, default });
                }
            }

            if !self.consume_optional(&Token::Comma) {
                break;
            }
        }

        for name in params.names() {
            if !seen.insert(name.clone()) {
                return Err(ParserError::syntax_error(format!(
                    "duplicate argument '{name}' in function definition"
                )));
            }
        }

        Ok(params)
    }

    /// Parameter annotations are parsed and dropped. Lambdas have none since `:` ends them.
    fn skip_annotation(&mut self, end_token: &Token) -> Result<(), ParserError> {
        if end_token != &Token::Colon && self.consume_optional(&Token::Colon) {
            let _annotation = self.parse_simple_expr()?;
        }
        Ok(())
    }
}
