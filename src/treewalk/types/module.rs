use std::{
    fmt::{Debug, Error, Formatter},
    path::PathBuf,
};

use crate::{
    domain::{DebugStackFrame, Dunder, ModuleName, ModuleOrigin, ToDebugStackFrame},
    treewalk::{Scope, TreewalkValue},
};

pub struct Module {
    name: ModuleName,
    package: ModuleName,
    origin: ModuleOrigin,
    scope: Scope,
}

impl Module {
    /// A module whose package is the parent of its dotted name.
    pub fn new(name: ModuleName, origin: ModuleOrigin) -> Self {
        let package = name.parent().unwrap_or_else(ModuleName::empty);
        let scope = init_scope(&name, &package, &origin);

        Self {
            name,
            package,
            origin,
            scope,
        }
    }

    pub fn new_builtin(name: &str) -> Self {
        Self::new(ModuleName::from_dotted(name), ModuleOrigin::Builtin)
    }

    pub fn new_empty(name: ModuleName) -> Self {
        Self::new(name, ModuleOrigin::Synthetic)
    }

    pub fn path(&self) -> PathBuf {
        self.origin.path()
    }

    pub fn origin(&self) -> &ModuleOrigin {
        &self.origin
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn package(&self) -> &ModuleName {
        &self.package
    }

    pub fn get(&self, name: &str) -> Option<TreewalkValue> {
        self.scope.get(name)
    }

    pub fn insert(&mut self, name: &str, value: TreewalkValue) {
        self.scope.insert(name, value);
    }

    pub fn delete(&mut self, name: &str) -> Option<TreewalkValue> {
        self.scope.delete(name)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

fn init_scope(module: &ModuleName, package: &ModuleName, origin: &ModuleOrigin) -> Scope {
    let mut scope = Scope::default();
    scope.insert(&Dunder::Name, TreewalkValue::Str(module.as_str()));

    let package_value = if package.is_empty() {
        TreewalkValue::None
    } else {
        TreewalkValue::Str(package.as_str())
    };
    scope.insert(&Dunder::Package, package_value);

    if let Some(path) = origin.file_path() {
        scope.insert(
            &Dunder::File,
            TreewalkValue::Str(path.to_string_lossy().into_owned()),
        );
    }

    scope
}

impl ToDebugStackFrame for Module {
    fn to_stack_frame(&self) -> DebugStackFrame {
        DebugStackFrame::new("<module>", self.path(), 1)
    }
}

impl Debug for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "<module '{}'>", self.name.as_str())
    }
}
