use crate::treewalk::{
    types::Exception, DomainResult, TreewalkInterpreter, TreewalkResult,
};

/// Attach the current call stack to an [`Exception`], turning it into a raised one.
pub trait Raise<T> {
    fn raise(self, interpreter: &TreewalkInterpreter) -> TreewalkResult<T>;
}

impl<T> Raise<T> for DomainResult<T> {
    fn raise(self, interpreter: &TreewalkInterpreter) -> TreewalkResult<T> {
        self.map_err(|e| interpreter.raise(e))
    }
}

impl<T> Raise<T> for Exception {
    fn raise(self, interpreter: &TreewalkInterpreter) -> TreewalkResult<T> {
        Err(interpreter.raise(self))
    }
}
