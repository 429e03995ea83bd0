use crate::{domain::Identifier, parser::types::Expr};

#[derive(Debug, PartialEq, Clone)]
pub struct Param {
    pub arg: Identifier,
    pub default: Option<Expr>,
}

/// A function or lambda signature.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Params {
    pub args: Vec<Param>,
    pub args_var: Option<Identifier>,
    /// Parameters after `*` or `*args`, which can only be passed by keyword.
    pub kwonly: Vec<Param>,
    pub kwargs_var: Option<Identifier>,
}

impl Params {
    pub fn names(&self) -> impl Iterator<Item = &Identifier> {
        self.args
            .iter()
            .map(|p| &p.arg)
            .chain(self.args_var.iter())
            .chain(self.kwonly.iter().map(|p| &p.arg))
            .chain(self.kwargs_var.iter())
    }
}
