mod call_stack;
mod dunder;
mod error;
mod identifier;
mod import_path;
mod module_name;
mod origin;
mod resolver;
mod source;
mod text;
pub mod utils;
mod value;

pub use call_stack::{DebugCallStack, DebugStackFrame, ToDebugStackFrame};
pub use dunder::Dunder;
pub use error::{ExceptionKind, ScriptException};
pub use identifier::Identifier;
pub use import_path::{FromImportPath, ModulePath};
pub use module_name::ModuleName;
pub use origin::ModuleOrigin;
pub use resolver::{resolve_absolute_path, resolve_import_path, ImportResolutionError};
pub use source::Source;
pub use text::Text;
pub use value::{ObjectRef, Value};
