mod builtins;
mod context;
mod environment;
mod format;
mod interpreter;
mod methods;
mod modules;
mod raised_error;
mod result;
mod scope;
#[cfg(test)]
pub mod test_utils;
pub mod types;
mod utils;
mod value;

pub use context::TreewalkContext;
pub use environment::Environment;
pub use interpreter::{ModuleLookup, TreewalkInterpreter, MAX_CALL_DEPTH};
pub use raised_error::RaisedException;
pub use scope::Scope;
pub use value::{Number, TreewalkValue};

/// An exception which has not been raised yet, so carries no call stack.
pub type DomainResult<T> = Result<T, types::Exception>;
pub type TreewalkResult<T> = Result<T, RaisedException>;
