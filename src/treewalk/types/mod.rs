mod builtin;
mod class;
mod dict;
mod exception;
mod function;
mod list;
mod method;
mod module;
mod object;
mod range;
mod super_type;
mod tuple;

pub use builtin::{Builtin, BuiltinFn};
pub use class::{builtin_classes, Class};
pub use dict::Dict;
pub use exception::Exception;
pub use function::{Function, FunctionBody};
pub use list::List;
pub use method::Method;
pub use module::Module;
pub use object::Object;
pub use range::Range;
pub use super_type::Super;
pub use tuple::Tuple;
