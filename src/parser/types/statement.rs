use crate::{
    domain::{FromImportPath, Identifier, ModulePath},
    parser::types::{Ast, BinOp, Expr, Params},
};

#[derive(Debug, PartialEq, Clone)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(line: usize, kind: StatementKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ConditionalAst {
    pub condition: Expr,
    pub ast: Ast,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDef {
    pub name: Identifier,
    pub params: Params,
    pub body: Ast,
    pub decorators: Vec<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RegularImport {
    pub module_path: ModulePath,
    pub alias: Option<Identifier>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FromImportItem {
    pub identifier: Identifier,
    pub alias: Option<Identifier>,
}

impl FromImportItem {
    pub fn as_imported_symbol(&self) -> &Identifier {
        self.alias.as_ref().unwrap_or(&self.identifier)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum FromImportMode {
    All,
    List(Vec<FromImportItem>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct RaiseKind {
    pub exception: Expr,
    pub cause: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ExceptHandler {
    /// `None` for a bare `except:`.
    pub kinds: Option<Expr>,
    pub alias: Option<Identifier>,
    pub block: Ast,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StatementKind {
    Expression(Expr),
    Assignment {
        left: Expr,
        right: Expr,
    },
    /// `a = b = value`, targets in source order.
    MultipleAssignment {
        left: Vec<Expr>,
        right: Expr,
    },
    CompoundAssignment {
        operator: BinOp,
        target: Expr,
        value: Expr,
    },
    FunctionDef(FunctionDef),
    ClassDef {
        name: Identifier,
        parents: Vec<Expr>,
        body: Ast,
        decorators: Vec<Expr>,
    },
    Return(Option<Expr>),
    IfElse {
        if_part: ConditionalAst,
        elif_parts: Vec<ConditionalAst>,
        else_part: Option<Ast>,
    },
    WhileLoop {
        cond_ast: ConditionalAst,
        else_part: Option<Ast>,
    },
    ForInLoop {
        index: Expr,
        iterable: Expr,
        body: Ast,
        else_part: Option<Ast>,
    },
    Break,
    Continue,
    Pass,
    RegularImport(Vec<RegularImport>),
    SelectiveImport {
        import_path: FromImportPath,
        mode: FromImportMode,
    },
    Global(Vec<Identifier>),
    Nonlocal(Vec<Identifier>),
    Raise(Option<RaiseKind>),
    TryExcept {
        try_block: Ast,
        handlers: Vec<ExceptHandler>,
        else_block: Option<Ast>,
        finally_block: Option<Ast>,
    },
    Assert {
        condition: Expr,
        message: Option<Expr>,
    },
    Delete(Vec<Expr>),
}

impl StatementKind {
    /// Compound statements end with a block, which consumes its own line ending.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Self::FunctionDef(_)
                | Self::ClassDef { .. }
                | Self::IfElse { .. }
                | Self::WhileLoop { .. }
                | Self::ForInLoop { .. }
                | Self::TryExcept { .. }
        )
    }
}
