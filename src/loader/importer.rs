use std::{
    env, fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    core::Container,
    domain::{ModuleName, ModuleOrigin, Source, Value},
    loader::{
        naming::{derive_name, disambiguate},
        namespace::is_bookkeeping,
        registry::RegistryState,
        AttributeNotFoundError, CallError, ExistingModulePolicy, ImportOptions, ImporterError,
        LoadError, LoadErrorReason, ModuleHandle, ModuleRegistry, Namespace, NotCallableError,
    },
    parser::parse_text,
    treewalk::{types::Module, TreewalkContext, TreewalkValue},
};

/// Loads Python files from arbitrary paths into a [`ModuleRegistry`] and works with the loaded
/// modules.
pub struct ModuleImporter<'a> {
    registry: &'a ModuleRegistry,
    options: ImportOptions,
}

impl<'a> ModuleImporter<'a> {
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        Self::with_options(registry, ImportOptions::default())
    }

    pub fn with_options(registry: &'a ModuleRegistry, options: ImportOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Load the file at `path`, relative paths being resolved against the working directory.
    ///
    /// The module body runs before anything is registered, so a failed load leaves the registry
    /// untouched. A path which is already registered is reused or reloaded, depending on
    /// [`ImportOptions::on_existing`].
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ModuleHandle, LoadError> {
        let requested = path.as_ref();
        let result = self.load_path(requested);
        if let Err(e) = &result {
            warn!(path = %e.path.display(), reason = %e.reason, "failed to load module");
        }
        result
    }

    fn load_path(&self, requested: &Path) -> Result<ModuleHandle, LoadError> {
        let (path, base) = self.resolve(requested)?;

        let name = {
            let state = self.registry.lock();
            let existing = state.get_by_path(&path).cloned();
            match existing {
                Some(existing) => {
                    drop(state);
                    return self.on_existing(existing);
                }
                None => available_name(&state, &path, &base)?,
            }
        };
        debug!(module = %name, path = %path.display(), "derived module name");

        let module = self.execute(name.clone(), &path)?;

        let mut state = self.registry.lock();
        if let Some(existing) = state.get_by_path(&path) {
            debug!(module = %existing.name(), "module was loaded concurrently");
            return Ok(existing.clone());
        }
        let name = match state.get(&name) {
            Some(other) if other.path() != path => disambiguate(&name, &path),
            _ => name,
        };
        let handle = ModuleHandle::new(name, path, module);
        state.insert(handle.clone());
        drop(state);

        info!(module = %handle.name(), path = %handle.path().display(), "loaded module");
        Ok(handle)
    }

    fn on_existing(&self, existing: ModuleHandle) -> Result<ModuleHandle, LoadError> {
        match self.options.get_on_existing() {
            ExistingModulePolicy::Reuse => {
                debug!(module = %existing.name(), "module already loaded");
                Ok(existing)
            }
            ExistingModulePolicy::Reload => self.reload(&existing),
        }
    }

    /// Validate `requested` and return its canonical path along with the canonical base folder.
    fn resolve(&self, requested: &Path) -> Result<(PathBuf, PathBuf), LoadError> {
        let absolute = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            env::current_dir()
                .map_err(|e| LoadError::new(requested, e.into()))?
                .join(requested)
        };
        let fail = |reason: LoadErrorReason| LoadError::new(&absolute, reason);

        let metadata = fs::metadata(&absolute).map_err(|e| fail(e.into()))?;
        if !metadata.is_file() {
            return Err(fail(LoadErrorReason::NotAFile));
        }
        if !self.options.accepts(&absolute) {
            return Err(fail(LoadErrorReason::UnsupportedExtension {
                expected: self.options.get_extensions().to_vec(),
            }));
        }
        let path = absolute.canonicalize().map_err(|e| fail(e.into()))?;

        let base = match self.options.get_base_folder() {
            Some(base) => base.canonicalize().map_err(|_| {
                fail(LoadErrorReason::OutsideBaseFolder {
                    base: base.to_path_buf(),
                })
            })?,
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        if !path.starts_with(&base) {
            return Err(fail(LoadErrorReason::OutsideBaseFolder { base }));
        }

        Ok((path, base))
    }

    /// Read, parse and run the file at `path` as a new module called `name`.
    fn execute(&self, name: ModuleName, path: &Path) -> Result<Container<Module>, LoadError> {
        let fail = |reason: LoadErrorReason| LoadError::new(path, reason);

        let source = Source::read(path).map_err(|e| fail(e.into()))?;
        let ast = parse_text(source.text()).map_err(|e| fail(LoadErrorReason::Syntax(e)))?;

        let module = Container::new(Module::new(name, ModuleOrigin::File(path.to_path_buf())));
        TreewalkContext::new(self.registry)
            .execute_module(&module, &ast)
            .map_err(|e| fail(LoadErrorReason::Execution(e)))?;
        Ok(module)
    }

    /// Run the module's file again into a fresh namespace, replacing the module registered for
    /// its path. On failure the registered module stays as it was.
    ///
    /// A handle whose name has since gone to a different file is registered under a suffixed
    /// name instead, leaving the other module in place.
    pub fn reload(&self, handle: &ModuleHandle) -> Result<ModuleHandle, LoadError> {
        let name = reload_name(&self.registry.lock(), handle);
        let module = self.execute(name.clone(), handle.path()).inspect_err(|e| {
            warn!(module = %name, reason = %e.reason, "failed to reload module");
        })?;

        let mut state = self.registry.lock();
        let current = reload_name(&state, handle);
        if current != name {
            debug!(module = %current, "module was renamed during reload");
        }
        let reloaded = ModuleHandle::new(current, handle.path().to_path_buf(), module);
        state.insert(reloaded.clone());
        drop(state);
        debug!(module = %reloaded.name(), "reloaded module");
        Ok(reloaded)
    }

    /// Remove the module from the registry. Returns whether it was registered.
    pub fn unload(&self, handle: &ModuleHandle) -> bool {
        let mut state = self.registry.lock();
        let registered = state
            .get(handle.name())
            .is_some_and(|current| current.path() == handle.path());
        if registered {
            state.remove(handle.name());
            info!(module = %handle.name(), "unloaded module");
        }
        registered
    }

    pub fn has_attribute(&self, handle: &ModuleHandle, name: &str) -> bool {
        self.lookup(handle, name).is_ok()
    }

    pub fn require_attribute(
        &self,
        handle: &ModuleHandle,
        name: &str,
    ) -> Result<(), AttributeNotFoundError> {
        self.lookup(handle, name).map(|_| ())
    }

    pub fn get_namespace(&self, handle: &ModuleHandle) -> Namespace {
        Namespace::new(handle.path(), handle.module())
    }

    pub fn call(
        &self,
        handle: &ModuleHandle,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, ImporterError> {
        self.call_with_kwargs(handle, name, args, vec![])
    }

    pub fn call_with_kwargs(
        &self,
        handle: &ModuleHandle,
        name: &str,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    ) -> Result<Value, ImporterError> {
        let callee = self.lookup(handle, name)?;
        if !callee.is_callable() {
            return Err(NotCallableError {
                module: handle.name().clone(),
                name: name.to_string(),
                type_name: callee.type_name(),
            }
            .into());
        }

        debug!(module = %handle.name(), function = name, "calling");
        TreewalkContext::new(self.registry)
            .call(&callee, args, kwargs)
            .map_err(|exception| {
                CallError {
                    module: handle.name().clone(),
                    name: name.to_string(),
                    exception,
                }
                .into()
            })
    }

    fn lookup(
        &self,
        handle: &ModuleHandle,
        name: &str,
    ) -> Result<TreewalkValue, AttributeNotFoundError> {
        let found = match is_bookkeeping(name) {
            true => None,
            false => handle.module().borrow().get(name),
        };
        found.ok_or_else(|| AttributeNotFoundError {
            module: handle.name().clone(),
            name: name.to_string(),
        })
    }
}

/// The name a reload of `handle` registers under: the name its path is registered with, else
/// its own name unless a different file holds that now.
fn reload_name(state: &RegistryState, handle: &ModuleHandle) -> ModuleName {
    if let Some(current) = state.get_by_path(handle.path()) {
        return current.name().clone();
    }
    match state.get(handle.name()) {
        Some(other) if other.path() != handle.path() => disambiguate(handle.name(), handle.path()),
        _ => handle.name().clone(),
    }
}

/// The derived name for `path`, suffixed when a different file already holds it.
fn available_name(
    state: &RegistryState,
    path: &Path,
    base: &Path,
) -> Result<ModuleName, LoadError> {
    let Some(name) = derive_name(path, base) else {
        return Err(LoadError::new(
            path,
            LoadErrorReason::OutsideBaseFolder {
                base: base.to_path_buf(),
            },
        ));
    };
    match state.get(&name) {
        Some(other) if other.path() != path => Ok(disambiguate(&name, path)),
        _ => Ok(name),
    }
}
