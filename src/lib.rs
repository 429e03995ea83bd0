//! Load Python source files from arbitrary filesystem paths, run them with an embedded
//! interpreter, and inspect or call what they define.
//!
//! ```no_run
//! use dynimport::{ModuleImporter, ModuleRegistry, Value};
//!
//! let registry = ModuleRegistry::new();
//! let importer = ModuleImporter::new(&registry);
//! let handle = importer.load("/srv/plugins/add.py")?;
//! let sum = importer.call(&handle, "add", vec![Value::Integer(3), Value::Integer(4)])?;
//! assert_eq!(sum, Value::Integer(7));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod domain;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod treewalk;

pub use domain::{ExceptionKind, ModuleName, ObjectRef, ScriptException, Value};
pub use loader::{
    Attribute, AttributeNotFoundError, CallError, CallableInfo, CallableKind,
    ExistingModulePolicy, FunctionRef, ImportOptions, ImporterError, LoadError, LoadErrorReason,
    ModuleHandle, ModuleImporter, ModuleRegistry, Namespace, NotCallableError, TypeDescriptor,
    RELOAD_ENV_VAR,
};
