use tracing::trace;

use crate::{
    core::ensure_sufficient_stack,
    lexer::Token,
    parser::{
        types::{
            Ast, BinOp, ConditionalAst, ExceptHandler, Expr, FunctionDef, RaiseKind, Statement,
            StatementKind,
        },
        Parser, ParserError,
    },
};

impl Parser {
    pub fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        ensure_sufficient_stack(|| {
            let start_line = self.line_number();
            trace!(line = start_line, token = ?self.current_token(), "parse_statement");

            let stmt = match self.current_token() {
                Token::Del => self.parse_delete(),
                Token::Def | Token::At => self.parse_decorated_definition(),
                Token::Class => self.parse_class_definition(vec![]),
                Token::Assert => self.parse_assert(),
                Token::Return => self.parse_return(),
                Token::Pass => {
                    self.consume(&Token::Pass)?;
                    Ok(StatementKind::Pass)
                }
                Token::Break => {
                    self.consume(&Token::Break)?;
                    Ok(StatementKind::Break)
                }
                Token::Continue => {
                    self.consume(&Token::Continue)?;
                    Ok(StatementKind::Continue)
                }
                Token::Nonlocal => {
                    self.consume(&Token::Nonlocal)?;
                    let identifiers = self.parse_identifiers()?;
                    Ok(StatementKind::Nonlocal(identifiers))
                }
                Token::Global => {
                    self.consume(&Token::Global)?;
                    let identifiers = self.parse_identifiers()?;
                    Ok(StatementKind::Global(identifiers))
                }
                Token::If => self.parse_if_else(),
                Token::While => self.parse_while_loop(),
                Token::For => self.parse_for_in_loop(),
                Token::Import => self.parse_regular_import(),
                Token::From => self.parse_selective_import(),
                Token::Try => self.parse_try_except(),
                Token::Raise => self.parse_raise(),
                Token::With => Err(ParserError::unsupported("'with' statements")),
                Token::Async => Err(ParserError::unsupported("async functions")),
                Token::Yield => Err(ParserError::unsupported("'yield' (generators)")),
                _ => self.parse_statement_without_starting_keyword(),
            }?;

            Ok(Statement::new(start_line, stmt))
        })
    }

    fn parse_statement_without_starting_keyword(&mut self) -> Result<StatementKind, ParserError> {
        let left = self.parse_expr()?;

        if self.current_token() == &Token::Assign {
            let mut targets = vec![left];
            let right = loop {
                self.consume(&Token::Assign)?;
                let value = self.parse_expr()?;
                if self.current_token() == &Token::Assign {
                    targets.push(value);
                } else {
                    break value;
                }
            };

            for target in &targets {
                validate_target(target)?;
            }

            if targets.len() == 1 {
                Ok(StatementKind::Assignment {
                    left: targets.remove(0),
                    right,
                })
            } else {
                Ok(StatementKind::MultipleAssignment {
                    left: targets,
                    right,
                })
            }
        } else if self.current_token() == &Token::Colon && is_annotatable(&left) {
            // Annotations are parsed and dropped; a bare annotation binds nothing.
            self.consume(&Token::Colon)?;
            let _annotation = self.parse_simple_expr()?;
            if self.consume_optional(&Token::Assign) {
                let right = self.parse_expr()?;
                Ok(StatementKind::Assignment { left, right })
            } else {
                Ok(StatementKind::Pass)
            }
        } else if let Some(operator) = BinOp::from_compound(self.current_token()) {
            if !is_annotatable(&left) {
                return Err(ParserError::syntax_error(
                    "illegal expression for augmented assignment",
                ));
            }
            self.consume_current();

            let value = self.parse_expr()?;
            Ok(StatementKind::CompoundAssignment {
                operator,
                target: left,
                value,
            })
        } else {
            Ok(StatementKind::Expression(left))
        }
    }

    fn parse_delete(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::Del)?;
        let mut targets = vec![self.parse_simple_expr()?];
        while self.consume_optional(&Token::Comma) {
            if self.end_of_statement() {
                break;
            }
            targets.push(self.parse_simple_expr()?);
        }

        for target in &targets {
            validate_target(target).map_err(|_| ParserError::syntax_error("cannot delete"))?;
        }
        Ok(StatementKind::Delete(targets))
    }

    fn parse_assert(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::Assert)?;
        let condition = self.parse_simple_expr()?;
        let message = if self.consume_optional(&Token::Comma) {
            Some(self.parse_simple_expr()?)
        } else {
            None
        };
        Ok(StatementKind::Assert { condition, message })
    }

    fn parse_return(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::Return)?;
        if self.end_of_statement() {
            Ok(StatementKind::Return(None))
        } else {
            Ok(StatementKind::Return(Some(self.parse_expr()?)))
        }
    }

    fn parse_decorators(&mut self) -> Result<Vec<Expr>, ParserError> {
        let mut decorators = vec![];
        while self.consume_optional(&Token::At) {
            decorators.push(self.parse_simple_expr()?);
            self.consume(&Token::Newline)?;
        }
        Ok(decorators)
    }

    fn parse_decorated_definition(&mut self) -> Result<StatementKind, ParserError> {
        let decorators = self.parse_decorators()?;
        match self.current_token() {
            Token::Def => self.parse_function_definition(decorators),
            Token::Class => self.parse_class_definition(decorators),
            Token::Async => Err(ParserError::unsupported("async functions")),
            other => Err(ParserError::ExpectedToken(Token::Def, other.clone())),
        }
    }

    fn parse_function_definition(
        &mut self,
        decorators: Vec<Expr>,
    ) -> Result<StatementKind, ParserError> {
        self.consume(&Token::Def)?;
        let name = self.parse_identifier()?;

        self.consume(&Token::LParen)?;
        let params = self.parse_function_def_args(Token::RParen)?;
        self.consume(&Token::RParen)?;

        if self.consume_optional(&Token::ReturnArrow) {
            let _return_type = self.parse_simple_expr()?;
        }

        self.consume(&Token::Colon)?;
        let body = self.parse_block()?;

        Ok(StatementKind::FunctionDef(FunctionDef {
            name,
            params,
            body,
            decorators,
        }))
    }

    fn parse_class_definition(
        &mut self,
        decorators: Vec<Expr>,
    ) -> Result<StatementKind, ParserError> {
        self.consume(&Token::Class)?;
        let name = self.parse_identifier()?;

        let mut parents = vec![];
        if self.consume_optional(&Token::LParen) {
            while self.current_token() != &Token::RParen {
                if matches!(self.current_token(), Token::Identifier(_))
                    && self.peek_token(1) == &Token::Assign
                {
                    return Err(ParserError::unsupported("class keyword arguments"));
                }
                parents.push(self.parse_simple_expr()?);
                if !self.consume_optional(&Token::Comma) {
                    break;
                }
            }
            self.consume(&Token::RParen)?;
        }

        self.consume(&Token::Colon)?;
        let body = self.parse_block()?;

        Ok(StatementKind::ClassDef {
            name,
            parents,
            body,
            decorators,
        })
    }

    fn parse_conditional_ast(&mut self) -> Result<ConditionalAst, ParserError> {
        let condition = self.parse_simple_expr()?;
        self.consume(&Token::Colon)?;
        let ast = self.parse_block()?;
        Ok(ConditionalAst { condition, ast })
    }

    /// Parse the `else:` block of an if, loop, or try statement, if there is one.
    fn parse_else_block(&mut self) -> Result<Option<Ast>, ParserError> {
        if self.consume_optional(&Token::Else) {
            self.consume(&Token::Colon)?;
            Ok(Some(self.parse_block()?))
        } else {
            Ok(None)
        }
    }

    fn parse_if_else(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::If)?;
        let if_part = self.parse_conditional_ast()?;

        let mut elif_parts = vec![];
        while self.consume_optional(&Token::Elif) {
            elif_parts.push(self.parse_conditional_ast()?);
        }

        let else_part = self.parse_else_block()?;

        Ok(StatementKind::IfElse {
            if_part,
            elif_parts,
            else_part,
        })
    }

    fn parse_while_loop(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::While)?;
        let cond_ast = self.parse_conditional_ast()?;
        let else_part = self.parse_else_block()?;
        Ok(StatementKind::WhileLoop {
            cond_ast,
            else_part,
        })
    }

    fn parse_for_in_loop(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::For)?;
        let index = self.parse_target_list()?;
        validate_target(&index)?;
        self.consume(&Token::In)?;
        let iterable = self.parse_expr()?;
        self.consume(&Token::Colon)?;
        let body = self.parse_block()?;
        let else_part = self.parse_else_block()?;

        Ok(StatementKind::ForInLoop {
            index,
            iterable,
            body,
            else_part,
        })
    }

    fn parse_try_except(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::Try)?;
        self.consume(&Token::Colon)?;
        let try_block = self.parse_block()?;

        let mut handlers = vec![];
        while self.consume_optional(&Token::Except) {
            let kinds = if self.current_token() == &Token::Colon {
                None
            } else {
                Some(self.parse_simple_expr()?)
            };
            let alias = if self.consume_optional(&Token::As) {
                Some(self.parse_identifier()?)
            } else {
                None
            };
            self.consume(&Token::Colon)?;
            let block = self.parse_block()?;
            handlers.push(ExceptHandler {
                kinds,
                alias,
                block,
            });
        }

        if handlers.iter().rev().skip(1).any(|h| h.kinds.is_none()) {
            return Err(ParserError::syntax_error("default 'except:' must be last"));
        }

        let else_block = if handlers.is_empty() {
            None
        } else {
            self.parse_else_block()?
        };

        let finally_block = if self.consume_optional(&Token::Finally) {
            self.consume(&Token::Colon)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        if handlers.is_empty() && finally_block.is_none() {
            return Err(ParserError::syntax_error(
                "expected 'except' or 'finally' block",
            ));
        }

        Ok(StatementKind::TryExcept {
            try_block,
            handlers,
            else_block,
            finally_block,
        })
    }

    fn parse_raise(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::Raise)?;
        if self.end_of_statement() {
            return Ok(StatementKind::Raise(None));
        }

        let exception = self.parse_simple_expr()?;
        let cause = if self.consume_optional(&Token::From) {
            Some(self.parse_simple_expr()?)
        } else {
            None
        };
        Ok(StatementKind::Raise(Some(RaiseKind { exception, cause })))
    }
}

/// Targets which can also carry an annotation or an augmented assignment.
fn is_annotatable(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Variable(_) | Expr::MemberAccess { .. } | Expr::IndexAccess { .. }
    )
}

/// Reject assignment targets Python would reject at compile time.
pub(super) fn validate_target(expr: &Expr) -> Result<(), ParserError> {
    match expr {
        Expr::Variable(_)
        | Expr::MemberAccess { .. }
        | Expr::IndexAccess { .. }
        | Expr::SliceOperation { .. } => Ok(()),
        Expr::Tuple(items) | Expr::List(items) => items.iter().try_for_each(validate_target),
        e if e.is_literal() => Err(ParserError::syntax_error("cannot assign to literal")),
        Expr::FunctionCall { .. } => {
            Err(ParserError::syntax_error("cannot assign to function call"))
        }
        Expr::Lambda { .. } => Err(ParserError::syntax_error("cannot assign to lambda")),
        _ => Err(ParserError::syntax_error("cannot assign to expression")),
    }
}
