use std::{
    fmt::{Debug, Error, Formatter},
    sync::Arc,
};

use crate::{
    core::Container,
    domain::ModuleName,
    parser::types::{Ast, Expr, Params},
    treewalk::{
        types::{Class, Module},
        Scope, TreewalkValue,
    },
};

/// Shared with every call of the function, so a call never copies the syntax tree.
#[derive(Clone)]
pub enum FunctionBody {
    Block(Arc<Ast>),
    /// The single expression of a `lambda`.
    Expr(Arc<Expr>),
}

/// A function defined by `def` or `lambda`.
pub struct Function {
    pub name: String,
    pub params: Params,
    /// Evaluated default values, aligned with `params.args`.
    pub defaults: Vec<Option<TreewalkValue>>,
    /// Evaluated default values, aligned with `params.kwonly`.
    pub kwonly_defaults: Vec<Option<TreewalkValue>>,
    pub body: FunctionBody,
    /// The module whose globals this function sees.
    pub module: Container<Module>,
    /// Scopes of the enclosing functions, outermost first.
    pub enclosing: Vec<Container<Scope>>,
    /// The class whose body defined this function, used by zero-argument `super()`.
    pub defining_class: Option<Container<Class>>,
    pub line: usize,
}

impl Function {
    pub fn module_name(&self) -> ModuleName {
        self.module.borrow().name().clone()
    }

    /// The parameter list as Python's `inspect.signature` renders it, e.g.
    /// `(a, b=1, *args, c, **kwargs)`.
    pub fn signature(&self) -> String {
        self.signature_skipping(0)
    }

    /// Like [`Function::signature`], leaving out the first `skip` positional parameters. Used to
    /// hide `self` when rendering a class from its `__init__`.
    pub fn signature_skipping(&self, skip: usize) -> String {
        let render = |name: &str, default: &Option<TreewalkValue>| match default {
            Some(value) => format!("{name}={}", value.default_repr()),
            None => name.to_string(),
        };

        let mut parts: Vec<String> = self
            .params
            .args
            .iter()
            .zip(&self.defaults)
            .skip(skip)
            .map(|(p, d)| render(p.arg.as_str(), d))
            .collect();

        match &self.params.args_var {
            Some(args_var) => parts.push(format!("*{args_var}")),
            None if !self.params.kwonly.is_empty() => parts.push("*".into()),
            None => {}
        }
        parts.extend(
            self.params
                .kwonly
                .iter()
                .zip(&self.kwonly_defaults)
                .map(|(p, d)| render(p.arg.as_str(), d)),
        );
        if let Some(kwargs_var) = &self.params.kwargs_var {
            parts.push(format!("**{kwargs_var}"));
        }

        format!("({})", parts.join(", "))
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "<function {}>", self.name)
    }
}
