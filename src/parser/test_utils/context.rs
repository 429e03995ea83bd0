use crate::{
    domain::Text,
    lexer::Lexer,
    parser::{
        types::{Ast, ConditionalAst, ExceptHandler, FunctionDef, Statement, StatementKind},
        Parser, ParserError,
    },
};

pub struct ParseContext {
    text: Text,
}

impl ParseContext {
    pub fn new(text: &Text) -> Self {
        Self { text: text.clone() }
    }

    /// Parse the whole input, with every line number zeroed so trees built by hand compare
    /// equal.
    pub fn parse_all(&self) -> Result<Ast, ParserError> {
        let tokens = Lexer::new(&self.text)
            .tokenize()
            .map_err(|e| ParserError::syntax_error(e.to_string()))?;
        let mut parser = Parser::new(tokens);
        parser.parse().map(|ast| strip_lines(&ast))
    }
}

pub fn init(text: &str) -> ParseContext {
    ParseContext::new(&Text::new(text))
}

fn strip_lines(ast: &Ast) -> Ast {
    Ast::new(ast.iter().map(strip_statement).collect())
}

fn strip_conditional(c: &ConditionalAst) -> ConditionalAst {
    ConditionalAst {
        condition: c.condition.clone(),
        ast: strip_lines(&c.ast),
    }
}

fn strip_statement(stmt: &Statement) -> Statement {
    let kind = match &stmt.kind {
        StatementKind::FunctionDef(def) => StatementKind::FunctionDef(FunctionDef {
            body: strip_lines(&def.body),
            ..def.clone()
        }),
        StatementKind::ClassDef {
            name,
            parents,
            body,
            decorators,
        } => StatementKind::ClassDef {
            name: name.clone(),
            parents: parents.clone(),
            body: strip_lines(body),
            decorators: decorators.clone(),
        },
        StatementKind::IfElse {
            if_part,
            elif_parts,
            else_part,
        } => StatementKind::IfElse {
            if_part: strip_conditional(if_part),
            elif_parts: elif_parts.iter().map(strip_conditional).collect(),
            else_part: else_part.as_ref().map(strip_lines),
        },
        StatementKind::WhileLoop {
            cond_ast,
            else_part,
        } => StatementKind::WhileLoop {
            cond_ast: strip_conditional(cond_ast),
            else_part: else_part.as_ref().map(strip_lines),
        },
        StatementKind::ForInLoop {
            index,
            iterable,
            body,
            else_part,
        } => StatementKind::ForInLoop {
            index: index.clone(),
            iterable: iterable.clone(),
            body: strip_lines(body),
            else_part: else_part.as_ref().map(strip_lines),
        },
        StatementKind::TryExcept {
            try_block,
            handlers,
            else_block,
            finally_block,
        } => StatementKind::TryExcept {
            try_block: strip_lines(try_block),
            handlers: handlers
                .iter()
                .map(|h| ExceptHandler {
                    kinds: h.kinds.clone(),
                    alias: h.alias.clone(),
                    block: strip_lines(&h.block),
                })
                .collect(),
            else_block: else_block.as_ref().map(strip_lines),
            finally_block: finally_block.as_ref().map(strip_lines),
        },
        other => other.clone(),
    };
    Statement::new(0, kind)
}
