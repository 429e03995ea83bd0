use crate::{
    domain::Identifier,
    parser::types::{BinOp, CompareOp, LogicalOp, Params, UnaryOp},
};

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    None,
    Ellipsis,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    StringLiteral(String),
    FString(Vec<FStringPart>),
    Variable(Identifier),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict(Vec<DictOperation>),
    ListComprehension {
        element: Box<Expr>,
        clauses: Vec<ForClause>,
    },
    DictComprehension {
        key: Box<Expr>,
        value: Box<Expr>,
        clauses: Vec<ForClause>,
    },
    BinaryOperation {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    UnaryOperation {
        op: UnaryOp,
        right: Box<Expr>,
    },
    LogicalOperation {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    ComparisonChain {
        left: Box<Expr>,
        ops: Vec<(CompareOp, Expr)>,
    },
    TernaryOp {
        condition: Box<Expr>,
        if_value: Box<Expr>,
        else_value: Box<Expr>,
    },
    FunctionCall {
        callee: Box<Expr>,
        args: CallArgs,
    },
    MemberAccess {
        object: Box<Expr>,
        field: Identifier,
    },
    IndexAccess {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    SliceOperation {
        object: Box<Expr>,
        params: SliceParams,
    },
    Lambda {
        params: Params,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expr::None
                | Expr::Ellipsis
                | Expr::Boolean(_)
                | Expr::Integer(_)
                | Expr::Float(_)
                | Expr::StringLiteral(_)
                | Expr::FString(_)
        )
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct CallArgs {
    pub args: Vec<Expr>,
    pub kwargs: Vec<(Identifier, Expr)>,
    pub args_var: Option<Box<Expr>>,
    pub kwargs_var: Option<Box<Expr>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum DictOperation {
    Pair(Expr, Expr),
    Unpack(Expr),
}

#[derive(Debug, PartialEq, Clone)]
pub struct ForClause {
    pub target: Expr,
    pub iterable: Expr,
    pub conditions: Vec<Expr>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct SliceParams {
    pub start: Option<Box<Expr>>,
    pub stop: Option<Box<Expr>>,
    pub step: Option<Box<Expr>>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Conversion {
    Str,
    Repr,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ExprFormat {
    pub expr: Box<Expr>,
    pub conversion: Option<Conversion>,
    pub spec: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum FStringPart {
    String(String),
    Expr(ExprFormat),
}
