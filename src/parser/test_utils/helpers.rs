macro_rules! expect_error {
    ($input:expr) => {
        match $crate::parser::test_utils::init($input).parse_all() {
            Ok(ast) => panic!("Expected a ParserError, got {:?}", ast),
            Err(e) => e,
        }
    };
}

macro_rules! parse {
    ($input:expr) => {
        match $crate::parser::test_utils::init($input).parse_all() {
            Err(e) => panic!("Parser error: {:?}", e),
            Ok(ast) => ast,
        }
    };
}

macro_rules! assert_ast_eq {
    ($input:expr, $expected:expr) => {
        pretty_assertions::assert_eq!(parse!($input), $expected);
    };
}

/// Compare the kind of the single statement in `$input`.
macro_rules! assert_stmt_eq {
    ($input:expr, $expected:expr) => {{
        let ast = parse!($input);
        assert_eq!(ast.len(), 1, "Expected one statement, got {:?}", ast);
        pretty_assertions::assert_eq!(ast.first().unwrap().kind, $expected);
    }};
}

/// Compare the expression of the single expression statement in `$input`.
macro_rules! assert_expr_eq {
    ($input:expr, $expected:expr) => {
        assert_stmt_eq!(
            $input,
            $crate::parser::types::StatementKind::Expression($expected)
        )
    };
}

macro_rules! ident {
    ($name:expr) => {
        $crate::domain::Identifier::new($name).unwrap()
    };
}

macro_rules! var {
    ($name:expr) => {
        $crate::parser::types::Expr::Variable(ident!($name))
    };
}

macro_rules! int {
    ($val:expr) => {
        $crate::parser::types::Expr::Integer($val)
    };
}

macro_rules! str {
    ($val:expr) => {
        $crate::parser::types::Expr::StringLiteral($val.to_string())
    };
}

macro_rules! bool {
    ($val:expr) => {
        $crate::parser::types::Expr::Boolean($val)
    };
}

macro_rules! bin_op {
    ($left:expr, $op:ident, $right:expr) => {
        $crate::parser::types::Expr::BinaryOperation {
            left: Box::new($left),
            op: $crate::parser::types::BinOp::$op,
            right: Box::new($right),
        }
    };
}

macro_rules! call {
    ($callee:expr $(, $arg:expr)* $(,)?) => {
        $crate::parser::types::Expr::FunctionCall {
            callee: Box::new($callee),
            args: $crate::parser::types::CallArgs {
                args: vec![$($arg),*],
                ..Default::default()
            },
        }
    };
}

macro_rules! stmt {
    ($kind:expr) => {
        $crate::parser::types::Statement::new(0, $kind)
    };
}

macro_rules! stmt_expr {
    ($expr:expr) => {
        stmt!($crate::parser::types::StatementKind::Expression($expr))
    };
}

macro_rules! stmt_assign {
    ($left:expr, $right:expr) => {
        stmt!($crate::parser::types::StatementKind::Assignment {
            left: $left,
            right: $right,
        })
    };
}

pub(crate) use assert_ast_eq;
pub(crate) use assert_expr_eq;
pub(crate) use assert_stmt_eq;
pub(crate) use bin_op;
pub(crate) use bool;
pub(crate) use call;
pub(crate) use expect_error;
pub(crate) use ident;
pub(crate) use int;
pub(crate) use parse;
pub(crate) use stmt;
pub(crate) use stmt_assign;
pub(crate) use stmt_expr;
pub(crate) use str;
pub(crate) use var;
