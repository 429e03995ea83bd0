use std::fmt::{Debug, Error, Formatter};

use crate::treewalk::{utils::Args, TreewalkInterpreter, TreewalkResult, TreewalkValue};

pub type BuiltinFn = fn(&TreewalkInterpreter, Args) -> TreewalkResult<TreewalkValue>;

/// A function implemented in Rust. Methods on builtin types are `Builtin`s too, called with the
/// receiver as their first argument.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: BuiltinFn,
}

impl Builtin {
    pub fn new(name: &'static str, func: BuiltinFn) -> Self {
        Self { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
        (self.func)(interpreter, args)
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "<built-in function {}>", self.name)
    }
}
