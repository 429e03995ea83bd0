mod ast;
mod expr;
mod ops;
mod params;
mod statement;

pub(crate) use ast::ast;
pub use ast::Ast;
pub use expr::{
    CallArgs, Conversion, DictOperation, Expr, ExprFormat, FStringPart, ForClause, SliceParams,
};
pub use ops::{BinOp, CompareOp, LogicalOp, UnaryOp};
pub use params::{Param, Params};
pub use statement::{
    ConditionalAst, ExceptHandler, FromImportItem, FromImportMode, FunctionDef, RaiseKind,
    RegularImport, Statement, StatementKind,
};
