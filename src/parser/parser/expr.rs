use tracing::trace;

use crate::{
    core::ensure_sufficient_stack,
    lexer::Token,
    parser::{
        parser::{fstring::parse_fstring, stmt::validate_target},
        types::{
            BinOp, CallArgs, CompareOp, DictOperation, Expr, FStringPart, ForClause, LogicalOp,
            SliceParams, UnaryOp,
        },
        Parser, ParserError,
    },
};

impl Parser {
    /// Parse an expression in a context where tuples may be expected. A good option if you're not
    /// sure. By tuples here, we mean those that are not indicated by parentheses (those are
    /// handled by detecting a LParen in `parse_atom`).
    ///
    /// ```python
    /// 4, 5
    /// a = 4, 5
    /// a = 1,
    /// ```
    pub fn parse_expr(&mut self) -> Result<Expr, ParserError> {
        trace!("parse_expr");
        let left = self.parse_simple_expr()?;

        if self.current_token() != &Token::Comma {
            return Ok(left);
        }

        let mut items = vec![left];
        while self.consume_optional(&Token::Comma) {
            // A trailing comma, most often seen on a one-element tuple.
            if self.end_of_statement()
                || matches!(
                    self.current_token(),
                    Token::Assign | Token::RParen | Token::RBracket | Token::Colon
                )
            {
                break;
            }
            items.push(self.parse_simple_expr()?);
        }

        Ok(Expr::Tuple(items))
    }

    /// Parse an expression where open tuples are not expected. If you need to support this in a
    /// given context (i.e. a = 4, 5), try `parse_expr`.
    pub fn parse_simple_expr(&mut self) -> Result<Expr, ParserError> {
        ensure_sufficient_stack(|| {
            trace!("parse_simple_expr");
            if self.current_token() == &Token::Lambda {
                self.parse_lambda()
            } else {
                self.parse_ternary_expr()
            }
        })
    }

    fn parse_lambda(&mut self) -> Result<Expr, ParserError> {
        self.consume(&Token::Lambda)?;
        let params = self.parse_function_def_args(Token::Colon)?;
        self.consume(&Token::Colon)?;
        let body = self.parse_simple_expr()?;

        Ok(Expr::Lambda {
            params,
            body: Box::new(body),
        })
    }

    /// Python precedence, loosest first, maps onto the descent below:
    /// - conditional expression - `parse_ternary_expr`
    /// - `or`, `and`, `not` - `parse_or_expr`, `parse_and_expr`, `parse_not_expr`
    /// - comparisons, membership, identity - `parse_comparison`
    /// - `|`, `^`, `&` - `parse_bitwise_or` and friends
    /// - `<<`, `>>` - `parse_shift`
    /// - `+`, `-` - `parse_add_sub`
    /// - `*`, `/`, `//`, `%` - `parse_term`
    /// - unary `-`, `+`, `~` - `parse_unary`
    /// - `**` - `parse_power`
    /// - calls, attribute and index access - `parse_primary`
    fn parse_ternary_expr(&mut self) -> Result<Expr, ParserError> {
        trace!("parse_ternary_expr");
        let if_value = self.parse_or_expr()?;

        if self.consume_optional(&Token::If) {
            let condition = self.parse_or_expr()?;
            self.consume(&Token::Else)?;
            let else_value = self.parse_simple_expr()?;

            return Ok(Expr::TernaryOp {
                condition: Box::new(condition),
                if_value: Box::new(if_value),
                else_value: Box::new(else_value),
            });
        }

        Ok(if_value)
    }

    fn parse_or_expr(&mut self) -> Result<Expr, ParserError> {
        let mut left = self.parse_and_expr()?;
        while self.consume_optional(&Token::Or) {
            let right = self.parse_and_expr()?;
            left = Expr::LogicalOperation {
                left: Box::new(left),
                op: LogicalOp::Or,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, ParserError> {
        let mut left = self.parse_not_expr()?;
        while self.consume_optional(&Token::And) {
            let right = self.parse_not_expr()?;
            left = Expr::LogicalOperation {
                left: Box::new(left),
                op: LogicalOp::And,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not_expr(&mut self) -> Result<Expr, ParserError> {
        ensure_sufficient_stack(|| {
            if self.consume_optional(&Token::Not) {
                let right = self.parse_not_expr()?;
                return Ok(Expr::UnaryOperation {
                    op: UnaryOp::Not,
                    right: Box::new(right),
                });
            }
            self.parse_comparison()
        })
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParserError> {
        trace!("parse_comparison");
        let left = self.parse_bitwise_or()?;

        let mut ops = vec![];
        loop {
            let op = match (self.current_token(), self.peek_token(1)) {
                (Token::Equal, _) => CompareOp::Equals,
                (Token::NotEqual, _) => CompareOp::NotEquals,
                (Token::LessThan, _) => CompareOp::LessThan,
                (Token::LessThanOrEqual, _) => CompareOp::LessThanOrEqual,
                (Token::GreaterThan, _) => CompareOp::GreaterThan,
                (Token::GreaterThanOrEqual, _) => CompareOp::GreaterThanOrEqual,
                (Token::In, _) => CompareOp::In,
                (Token::Not, Token::In) => {
                    self.consume_current();
                    CompareOp::NotIn
                }
                (Token::Is, Token::Not) => {
                    self.consume_current();
                    CompareOp::IsNot
                }
                (Token::Is, _) => CompareOp::Is,
                _ => break,
            };
            self.consume_current();
            ops.push((op, self.parse_bitwise_or()?));
        }

        if ops.is_empty() {
            Ok(left)
        } else {
            Ok(Expr::ComparisonChain {
                left: Box::new(left),
                ops,
            })
        }
    }

    /// Shared loop for every left-associative binary operator level.
    fn parse_binary_level<F>(
        &mut self,
        operators: &[Token],
        mut next_level: F,
    ) -> Result<Expr, ParserError>
    where
        F: FnMut(&mut Self) -> Result<Expr, ParserError>,
    {
        let mut left = next_level(self)?;

        while operators.contains(self.current_token()) {
            let Ok(op) = BinOp::try_from(self.current_token()) else {
                break;
            };
            self.consume_current();
            let right = next_level(self)?;
            left = Expr::BinaryOperation {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_bitwise_or(&mut self) -> Result<Expr, ParserError> {
        self.parse_binary_level(&[Token::BitwiseOr], Self::parse_bitwise_xor)
    }

    fn parse_bitwise_xor(&mut self) -> Result<Expr, ParserError> {
        self.parse_binary_level(&[Token::BitwiseXor], Self::parse_bitwise_and)
    }

    fn parse_bitwise_and(&mut self) -> Result<Expr, ParserError> {
        self.parse_binary_level(&[Token::BitwiseAnd], Self::parse_shift)
    }

    fn parse_shift(&mut self) -> Result<Expr, ParserError> {
        self.parse_binary_level(&[Token::LeftShift, Token::RightShift], Self::parse_add_sub)
    }

    fn parse_add_sub(&mut self) -> Result<Expr, ParserError> {
        self.parse_binary_level(&[Token::Plus, Token::Minus], Self::parse_term)
    }

    fn parse_term(&mut self) -> Result<Expr, ParserError> {
        self.parse_binary_level(
            &[
                Token::Asterisk,
                Token::Slash,
                Token::DoubleSlash,
                Token::Modulo,
            ],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Expr, ParserError> {
        ensure_sufficient_stack(|| {
            let op = match self.current_token() {
                Token::Minus => UnaryOp::Minus,
                Token::Plus => UnaryOp::Plus,
                Token::BitwiseNot => UnaryOp::BitwiseNot,
                _ => return self.parse_power(),
            };
            self.consume_current();

            let right = self.parse_unary()?;
            Ok(Expr::UnaryOperation {
                op,
                right: Box::new(right),
            })
        })
    }

    /// `**` binds tighter than a unary operator on its left but looser on its right, so
    /// `-2 ** 2` is `-(2 ** 2)` and `2 ** -1` is allowed.
    fn parse_power(&mut self) -> Result<Expr, ParserError> {
        let base = self.parse_primary()?;

        if self.consume_optional(&Token::DoubleAsterisk) {
            let exponent = self.parse_unary()?;
            return Ok(Expr::BinaryOperation {
                left: Box::new(base),
                op: BinOp::Expo,
                right: Box::new(exponent),
            });
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_atom()?;

        loop {
            expr = match self.current_token() {
                Token::LParen => {
                    let args = self.parse_call_args()?;
                    Expr::FunctionCall {
                        callee: Box::new(expr),
                        args,
                    }
                }
                Token::Dot => {
                    self.consume_current();
                    let field = self.parse_identifier()?;
                    Expr::MemberAccess {
                        object: Box::new(expr),
                        field,
                    }
                }
                Token::LBracket => self.parse_subscript(expr)?,
                _ => break,
            };
        }

        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParserError> {
        ensure_sufficient_stack(|| {
            trace!(token = ?self.current_token(), "parse_atom");

            let expr = match self.current_token().clone() {
                Token::Identifier(ident) => Expr::Variable(ident),
                Token::Integer(i) => Expr::Integer(i),
                Token::Float(f) => Expr::Float(f),
                Token::True => Expr::Boolean(true),
                Token::False => Expr::Boolean(false),
                Token::None => Expr::None,
                Token::Ellipsis => Expr::Ellipsis,
                Token::StringLiteral(_) | Token::FStringLiteral(_) => {
                    return self.parse_string_literals()
                }
                Token::LParen => return self.parse_parenthesized(),
                Token::LBracket => return self.parse_list(),
                Token::LBrace => return self.parse_brace(),
                Token::Lambda => return self.parse_lambda(),
                Token::Yield => return Err(ParserError::unsupported("'yield' (generators)")),
                Token::Await => return Err(ParserError::unsupported("'await'")),
                Token::Asterisk => return Err(ParserError::unsupported("starred expressions")),
                other => return Err(ParserError::UnexpectedToken(other)),
            };
            self.consume_current();

            Ok(expr)
        })
    }

    /// Adjacent string literals are concatenated, f-strings included.
    fn parse_string_literals(&mut self) -> Result<Expr, ParserError> {
        let mut parts: Vec<FStringPart> = vec![];
        let mut formatted = false;

        loop {
            match self.current_token().clone() {
                Token::StringLiteral(s) => push_literal(&mut parts, s),
                Token::FStringLiteral(s) => {
                    formatted = true;
                    for part in parse_fstring(&s)? {
                        match part {
                            FStringPart::String(s) => push_literal(&mut parts, s),
                            expr => parts.push(expr),
                        }
                    }
                }
                _ => break,
            }
            self.consume_current();
        }

        if formatted {
            return Ok(Expr::FString(parts));
        }

        let text = parts
            .into_iter()
            .map(|p| match p {
                FStringPart::String(s) => s,
                FStringPart::Expr(_) => String::new(),
            })
            .collect();
        Ok(Expr::StringLiteral(text))
    }

    fn parse_parenthesized(&mut self) -> Result<Expr, ParserError> {
        self.consume(&Token::LParen)?;
        if self.consume_optional(&Token::RParen) {
            return Ok(Expr::Tuple(vec![]));
        }

        let first = self.parse_simple_expr()?;

        // Generator expressions are evaluated eagerly into a list.
        if self.current_token() == &Token::For {
            let clauses = self.parse_comprehension_clauses()?;
            self.consume(&Token::RParen)?;
            return Ok(Expr::ListComprehension {
                element: Box::new(first),
                clauses,
            });
        }

        if self.current_token() != &Token::Comma {
            self.consume(&Token::RParen)?;
            return Ok(first);
        }

        let mut items = vec![first];
        while self.consume_optional(&Token::Comma) {
            if self.current_token() == &Token::RParen {
                break;
            }
            items.push(self.parse_simple_expr()?);
        }
        self.consume(&Token::RParen)?;

        Ok(Expr::Tuple(items))
    }

    fn parse_list(&mut self) -> Result<Expr, ParserError> {
        self.consume(&Token::LBracket)?;
        if self.consume_optional(&Token::RBracket) {
            return Ok(Expr::List(vec![]));
        }

        let first = self.parse_simple_expr()?;
        if self.current_token() == &Token::For {
            let clauses = self.parse_comprehension_clauses()?;
            self.consume(&Token::RBracket)?;
            return Ok(Expr::ListComprehension {
                element: Box::new(first),
                clauses,
            });
        }

        let mut items = vec![first];
        while self.consume_optional(&Token::Comma) {
            if self.current_token() == &Token::RBracket {
                break;
            }
            items.push(self.parse_simple_expr()?);
        }
        self.consume(&Token::RBracket)?;

        Ok(Expr::List(items))
    }

    fn parse_brace(&mut self) -> Result<Expr, ParserError> {
        self.consume(&Token::LBrace)?;
        if self.consume_optional(&Token::RBrace) {
            return Ok(Expr::Dict(vec![]));
        }

        let first = self.parse_dict_operation()?;
        if let DictOperation::Pair(key, value) = &first {
            if self.current_token() == &Token::For {
                let clauses = self.parse_comprehension_clauses()?;
                self.consume(&Token::RBrace)?;
                return Ok(Expr::DictComprehension {
                    key: Box::new(key.clone()),
                    value: Box::new(value.clone()),
                    clauses,
                });
            }
        }

        let mut items = vec![first];
        while self.consume_optional(&Token::Comma) {
            if self.current_token() == &Token::RBrace {
                break;
            }
            items.push(self.parse_dict_operation()?);
        }
        self.consume(&Token::RBrace)?;

        Ok(Expr::Dict(items))
    }

    fn parse_dict_operation(&mut self) -> Result<DictOperation, ParserError> {
        if self.consume_optional(&Token::DoubleAsterisk) {
            return Ok(DictOperation::Unpack(self.parse_bitwise_or()?));
        }

        let key = self.parse_simple_expr()?;
        if self.current_token() != &Token::Colon {
            return Err(ParserError::unsupported("set literals"));
        }
        self.consume(&Token::Colon)?;
        let value = self.parse_simple_expr()?;
        Ok(DictOperation::Pair(key, value))
    }

    fn parse_comprehension_clauses(&mut self) -> Result<Vec<ForClause>, ParserError> {
        let mut clauses = vec![];

        while self.consume_optional(&Token::For) {
            let target = self.parse_target_list()?;
            validate_target(&target)?;
            self.consume(&Token::In)?;
            let iterable = self.parse_or_expr()?;

            let mut conditions = vec![];
            while self.consume_optional(&Token::If) {
                conditions.push(self.parse_or_expr()?);
            }

            clauses.push(ForClause {
                target,
                iterable,
                conditions,
            });
        }

        Ok(clauses)
    }

    /// The target of a `for` loop or comprehension. This stops short of comparisons so the `in`
    /// keyword is left for the caller.
    pub(super) fn parse_target_list(&mut self) -> Result<Expr, ParserError> {
        let first = self.parse_bitwise_or()?;
        if self.current_token() != &Token::Comma {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.consume_optional(&Token::Comma) {
            if self.current_token() == &Token::In {
                break;
            }
            items.push(self.parse_bitwise_or()?);
        }
        Ok(Expr::Tuple(items))
    }

    fn parse_call_args(&mut self) -> Result<CallArgs, ParserError> {
        self.consume(&Token::LParen)?;
        let mut args = CallArgs::default();

        while self.current_token() != &Token::RParen {
            match (self.current_token(), self.peek_token(1)) {
                (Token::Asterisk, _) => {
                    self.consume_current();
                    args.args_var = Some(Box::new(self.parse_simple_expr()?));
                }
                (Token::DoubleAsterisk, _) => {
                    self.consume_current();
                    args.kwargs_var = Some(Box::new(self.parse_simple_expr()?));
                }
                (Token::Identifier(_), Token::Assign) => {
                    let name = self.parse_identifier()?;
                    self.consume(&Token::Assign)?;
                    let value = self.parse_simple_expr()?;
                    args.kwargs.push((name, value));
                }
                _ => {
                    if !args.kwargs.is_empty() || args.kwargs_var.is_some() {
                        return Err(ParserError::syntax_error(
                            "positional argument follows keyword argument",
                        ));
                    }

                    let mut arg = self.parse_simple_expr()?;
                    if self.current_token() == &Token::For {
                        let clauses = self.parse_comprehension_clauses()?;
                        arg = Expr::ListComprehension {
                            element: Box::new(arg),
                            clauses,
                        };
                    }
                    args.args.push(arg);
                }
            }

            if !self.consume_optional(&Token::Comma) {
                break;
            }
        }
        self.consume(&Token::RParen)?;

        Ok(args)
    }

    fn parse_subscript(&mut self, object: Expr) -> Result<Expr, ParserError> {
        self.consume(&Token::LBracket)?;

        let start = if self.current_token() == &Token::Colon {
            None
        } else {
            Some(self.parse_simple_expr()?)
        };

        if self.consume_optional(&Token::Colon) {
            let stop = if matches!(self.current_token(), Token::Colon | Token::RBracket) {
                None
            } else {
                Some(Box::new(self.parse_simple_expr()?))
            };
            let step = if self.consume_optional(&Token::Colon)
                && self.current_token() != &Token::RBracket
            {
                Some(Box::new(self.parse_simple_expr()?))
            } else {
                None
            };
            self.consume(&Token::RBracket)?;

            return Ok(Expr::SliceOperation {
                object: Box::new(object),
                params: SliceParams {
                    start: start.map(Box::new),
                    stop,
                    step,
                },
            });
        }

        let first = start.ok_or_else(|| ParserError::syntax_error("invalid syntax"))?;
        let index = if self.current_token() == &Token::Comma {
            let mut items = vec![first];
            while self.consume_optional(&Token::Comma) {
                if self.current_token() == &Token::RBracket {
                    break;
                }
                items.push(self.parse_simple_expr()?);
            }
            Expr::Tuple(items)
        } else {
            first
        };
        self.consume(&Token::RBracket)?;

        Ok(Expr::IndexAccess {
            object: Box::new(object),
            index: Box::new(index),
        })
    }
}

fn push_literal(parts: &mut Vec<FStringPart>, s: String) {
    if let Some(FStringPart::String(last)) = parts.last_mut() {
        last.push_str(&s);
    } else if !s.is_empty() {
        parts.push(FStringPart::String(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::parser::{
        test_utils::*,
        types::{Conversion, ExprFormat, Param, Params},
    };

    #[test]
    fn precedence() {
        assert_expr_eq!(
            "1 + 2 * 3",
            bin_op!(int!(1), Add, bin_op!(int!(2), Mul, int!(3)))
        );
        assert_expr_eq!(
            "-2 ** 2",
            Expr::UnaryOperation {
                op: UnaryOp::Minus,
                right: Box::new(bin_op!(int!(2), Expo, int!(2))),
            }
        );
        assert_expr_eq!(
            "2 ** -1",
            bin_op!(
                int!(2),
                Expo,
                Expr::UnaryOperation {
                    op: UnaryOp::Minus,
                    right: Box::new(int!(1)),
                }
            )
        );
        assert_expr_eq!(
            "a | b & c",
            bin_op!(var!("a"), BitwiseOr, bin_op!(var!("b"), BitwiseAnd, var!("c")))
        );
    }

    #[test]
    fn logical_and_not() {
        assert_expr_eq!(
            "not a and b or c",
            Expr::LogicalOperation {
                left: Box::new(Expr::LogicalOperation {
                    left: Box::new(Expr::UnaryOperation {
                        op: UnaryOp::Not,
                        right: Box::new(var!("a")),
                    }),
                    op: LogicalOp::And,
                    right: Box::new(var!("b")),
                }),
                op: LogicalOp::Or,
                right: Box::new(var!("c")),
            }
        );
    }

    #[test]
    fn comparison_chain() {
        assert_expr_eq!(
            "1 < x <= 3",
            Expr::ComparisonChain {
                left: Box::new(int!(1)),
                ops: vec![
                    (CompareOp::LessThan, var!("x")),
                    (CompareOp::LessThanOrEqual, int!(3)),
                ],
            }
        );
        assert_expr_eq!(
            "a not in b",
            Expr::ComparisonChain {
                left: Box::new(var!("a")),
                ops: vec![(CompareOp::NotIn, var!("b"))],
            }
        );
        assert_expr_eq!(
            "a is not None",
            Expr::ComparisonChain {
                left: Box::new(var!("a")),
                ops: vec![(CompareOp::IsNot, Expr::None)],
            }
        );
    }

    #[test]
    fn ternary() {
        assert_expr_eq!(
            "a if cond else b",
            Expr::TernaryOp {
                condition: Box::new(var!("cond")),
                if_value: Box::new(var!("a")),
                else_value: Box::new(var!("b")),
            }
        );
    }

    #[test]
    fn calls_and_access() {
        assert_expr_eq!(
            "obj.method(1, *rest, key=2, **extra)[0]",
            Expr::IndexAccess {
                object: Box::new(Expr::FunctionCall {
                    callee: Box::new(Expr::MemberAccess {
                        object: Box::new(var!("obj")),
                        field: ident!("method"),
                    }),
                    args: CallArgs {
                        args: vec![int!(1)],
                        kwargs: vec![(ident!("key"), int!(2))],
                        args_var: Some(Box::new(var!("rest"))),
                        kwargs_var: Some(Box::new(var!("extra"))),
                    },
                }),
                index: Box::new(int!(0)),
            }
        );

        assert_eq!(
            expect_error!("f(a=1, 2)"),
            ParserError::syntax_error("positional argument follows keyword argument")
        );
    }

    #[test]
    fn slices() {
        assert_expr_eq!(
            "a[1:]",
            Expr::SliceOperation {
                object: Box::new(var!("a")),
                params: SliceParams {
                    start: Some(Box::new(int!(1))),
                    stop: None,
                    step: None,
                },
            }
        );
        assert_expr_eq!(
            "a[::-1]",
            Expr::SliceOperation {
                object: Box::new(var!("a")),
                params: SliceParams {
                    start: None,
                    stop: None,
                    step: Some(Box::new(Expr::UnaryOperation {
                        op: UnaryOp::Minus,
                        right: Box::new(int!(1)),
                    })),
                },
            }
        );
    }

    #[test]
    fn collections() {
        assert_expr_eq!("()", Expr::Tuple(vec![]));
        assert_expr_eq!("(1,)", Expr::Tuple(vec![int!(1)]));
        assert_expr_eq!("(1)", int!(1));
        assert_expr_eq!("[1, 2,]", Expr::List(vec![int!(1), int!(2)]));
        assert_expr_eq!(
            "{'a': 1, **rest}",
            Expr::Dict(vec![
                DictOperation::Pair(str!("a"), int!(1)),
                DictOperation::Unpack(var!("rest")),
            ])
        );
        assert_eq!(
            expect_error!("{1, 2}"),
            ParserError::unsupported("set literals")
        );
    }

    #[test]
    fn comprehensions() {
        assert_expr_eq!(
            "[x * 2 for x in xs if x]",
            Expr::ListComprehension {
                element: Box::new(bin_op!(var!("x"), Mul, int!(2))),
                clauses: vec![ForClause {
                    target: var!("x"),
                    iterable: var!("xs"),
                    conditions: vec![var!("x")],
                }],
            }
        );
        assert_expr_eq!(
            "{k: v for k, v in pairs}",
            Expr::DictComprehension {
                key: Box::new(var!("k")),
                value: Box::new(var!("v")),
                clauses: vec![ForClause {
                    target: Expr::Tuple(vec![var!("k"), var!("v")]),
                    iterable: var!("pairs"),
                    conditions: vec![],
                }],
            }
        );
        assert_expr_eq!(
            "sum(x for x in xs)",
            call!(
                var!("sum"),
                Expr::ListComprehension {
                    element: Box::new(var!("x")),
                    clauses: vec![ForClause {
                        target: var!("x"),
                        iterable: var!("xs"),
                        conditions: vec![],
                    }],
                }
            )
        );
    }

    #[test]
    fn lambda() {
        assert_expr_eq!(
            "lambda a, b=2: a + b",
            Expr::Lambda {
                params: Params {
                    args: vec![
                        Param {
                            arg: ident!("a"),
                            default: None,
                        },
                        Param {
                            arg: ident!("b"),
                            default: Some(int!(2)),
                        },
                    ],
                    ..Default::default()
                },
                body: Box::new(bin_op!(var!("a"), Add, var!("b"))),
            }
        );
    }

    #[test]
    fn strings() {
        assert_expr_eq!("'a' 'b'", str!("ab"));
        assert_expr_eq!(
            "'x = ' f'{x!r:>4}'",
            Expr::FString(vec![
                FStringPart::String("x = ".into()),
                FStringPart::Expr(ExprFormat {
                    expr: Box::new(var!("x")),
                    conversion: Some(Conversion::Repr),
                    spec: Some(">4".into()),
                }),
            ])
        );
    }
}
