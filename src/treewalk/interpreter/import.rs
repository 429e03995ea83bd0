use tracing::debug;

use crate::{
    core::Container,
    domain::{resolve_absolute_path, resolve_import_path, FromImportPath, ModuleName},
    parser::types::{FromImportMode, RegularImport},
    treewalk::{
        modules,
        result::Raise,
        types::{Exception, Module},
        Environment, TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

impl TreewalkInterpreter<'_> {
    fn find_module(&self, name: &ModuleName) -> Option<Container<Module>> {
        modules::builtin_module(name).or_else(|| self.lookup.lookup_module(name))
    }

    fn import_module(&self, name: &ModuleName) -> TreewalkResult<Container<Module>> {
        match self.find_module(name) {
            Some(module) => {
                debug!(module = %name, "resolved import");
                Ok(module)
            }
            None => Exception::import_error(format!("No module named '{name}'")).raise(self),
        }
    }

    /// `import a.b.c` or `import a.b.c as d`.
    pub(super) fn import_regular(
        &self,
        import: &RegularImport,
        env: &Environment,
    ) -> TreewalkResult<()> {
        let name = resolve_absolute_path(&import.module_path);
        let module = self.import_module(&name)?;

        if let Some(alias) = &import.alias {
            env.store(alias, TreewalkValue::Module(module));
            return Ok(());
        }

        // Without an alias, `import a.b` binds `a`, through which `a.b` is reachable. Parents
        // which are not loaded themselves are stood in for by empty modules.
        let segments = name.segments();
        let mut child = TreewalkValue::Module(module);
        for depth in (1..segments.len()).rev() {
            let parent_name = ModuleName::from_segments(&segments[..depth]);
            let parent = self
                .find_module(&parent_name)
                .unwrap_or_else(|| Container::new(Module::new_empty(parent_name)));
            parent.borrow_mut().insert(&segments[depth], child);
            child = TreewalkValue::Module(parent);
        }
        if let Some(head) = segments.first() {
            env.store(head, child);
        }
        Ok(())
    }

    /// `from path import names` and `from path import *`.
    pub(super) fn import_from(
        &self,
        import_path: &FromImportPath,
        mode: &FromImportMode,
        env: &Environment,
    ) -> TreewalkResult<()> {
        let package = env.module().borrow().package().clone();
        let name = match resolve_import_path(import_path, &package) {
            Ok(name) => name,
            Err(e) => return Exception::import_error(e.message()).raise(self),
        };
        let module = self.import_module(&name)?;

        match mode {
            FromImportMode::All => {
                for (symbol, value) in self.public_names(&module)? {
                    env.store(&symbol, value);
                }
            }
            FromImportMode::List(items) => {
                for item in items {
                    let found = module.borrow().get(&item.identifier);
                    let value = match found {
                        Some(value) => value,
                        None => match self.find_module(&name.join([item.identifier.as_str()])) {
                            Some(submodule) => TreewalkValue::Module(submodule),
                            None => {
                                let location = match module.borrow().origin().file_path() {
                                    Some(path) => path.display().to_string(),
                                    None => "unknown location".to_string(),
                                };
                                return Exception::import_error(format!(
                                    "cannot import name '{}' from '{name}' ({location})",
                                    item.identifier
                                ))
                                .raise(self);
                            }
                        },
                    };
                    env.store(item.as_imported_symbol(), value);
                }
            }
        }
        Ok(())
    }

    /// The names `from module import *` binds: `__all__` when the module defines it, otherwise
    /// every name without a leading underscore.
    fn public_names(
        &self,
        module: &Container<Module>,
    ) -> TreewalkResult<Vec<(String, TreewalkValue)>> {
        let all = module.borrow().get("__all__");
        let Some(all) = all else {
            return Ok(module
                .borrow()
                .scope()
                .iter()
                .filter(|(name, _)| !name.starts_with('_'))
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect());
        };

        let mut names = vec![];
        for item in self.collect_items(&all)? {
            let TreewalkValue::Str(symbol) = item else {
                return Exception::type_error(format!(
                    "Item in {}.__all__ must be str, not {}",
                    module.borrow().name(),
                    item.type_name()
                ))
                .raise(self);
            };
            let value = module.borrow().get(&symbol);
            match value {
                Some(value) => names.push((symbol, value)),
                None => {
                    return Exception::attribute_error(format!(
                        "module '{}' has no attribute '{symbol}'",
                        module.borrow().name()
                    ))
                    .raise(self)
                }
            }
        }
        Ok(names)
    }
}
