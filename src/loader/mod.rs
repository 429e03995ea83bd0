//! Loading Python files from arbitrary paths into an explicit registry, and working with what
//! they define.

mod error;
mod handle;
mod importer;
mod namespace;
mod naming;
mod options;
mod registry;

pub use error::{
    AttributeNotFoundError, CallError, ImporterError, LoadError, LoadErrorReason,
    NotCallableError,
};
pub use handle::ModuleHandle;
pub use importer::ModuleImporter;
pub use namespace::{Attribute, CallableInfo, CallableKind, FunctionRef, Namespace, TypeDescriptor};
pub use naming::{derive_name, disambiguate, fnv1a, sanitize_segment};
pub use options::{ExistingModulePolicy, ImportOptions, RELOAD_ENV_VAR};
pub use registry::ModuleRegistry;
