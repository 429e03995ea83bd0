use std::{
    fmt::{Debug, Formatter, Result},
    path::{Path, PathBuf},
};

use crate::{core::Container, domain::ModuleName, treewalk::types::Module};

/// A loaded module: its derived name, the canonical path it was read from, and its namespace.
///
/// Clones share the namespace. A handle stays usable after its module is unloaded or reloaded;
/// it keeps the namespace it was created with.
#[derive(Clone)]
pub struct ModuleHandle {
    name: ModuleName,
    path: PathBuf,
    module: Container<Module>,
}

impl ModuleHandle {
    pub(crate) fn new(name: ModuleName, path: PathBuf, module: Container<Module>) -> Self {
        Self { name, path, module }
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn module(&self) -> &Container<Module> {
        &self.module
    }

    /// Whether both handles refer to the same execution of the same file.
    pub fn same_module(&self, other: &ModuleHandle) -> bool {
        self.module.same_identity(&other.module)
    }
}

impl Debug for ModuleHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("ModuleHandle")
            .field("name", &self.name.as_str())
            .field("path", &self.path)
            .finish()
    }
}
