use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use parking_lot::{Mutex, MutexGuard};

use crate::{
    core::Container,
    domain::ModuleName,
    loader::ModuleHandle,
    treewalk::{types::Module, ModuleLookup},
};

#[derive(Default)]
pub(crate) struct RegistryState {
    by_name: HashMap<ModuleName, ModuleHandle>,
    by_path: HashMap<PathBuf, ModuleName>,
}

impl RegistryState {
    pub(crate) fn get(&self, name: &ModuleName) -> Option<&ModuleHandle> {
        self.by_name.get(name)
    }

    pub(crate) fn get_by_path(&self, path: &Path) -> Option<&ModuleHandle> {
        self.by_path.get(path).and_then(|name| self.by_name.get(name))
    }

    /// Register `handle`, replacing whatever was registered under its name or path.
    pub(crate) fn insert(&mut self, handle: ModuleHandle) {
        if let Some(previous) = self.by_name.get(handle.name()) {
            self.by_path.remove(previous.path());
        }
        if let Some(previous) = self.by_path.get(handle.path()).cloned() {
            self.by_name.remove(&previous);
        }
        self.by_path
            .insert(handle.path().to_path_buf(), handle.name().clone());
        self.by_name.insert(handle.name().clone(), handle);
    }

    pub(crate) fn remove(&mut self, name: &ModuleName) -> Option<ModuleHandle> {
        let handle = self.by_name.remove(name)?;
        self.by_path.remove(handle.path());
        Some(handle)
    }
}

/// The modules loaded so far, by derived name and by canonical path.
///
/// A name is registered at most once and so is a path. Loaded modules can `import` each other by
/// their registered names.
#[derive(Default)]
pub struct ModuleRegistry {
    state: Mutex<RegistryState>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every check-then-insert sequence runs under this guard.
    pub(crate) fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock()
    }

    pub fn len(&self) -> usize {
        self.lock().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().by_name.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock()
            .by_name
            .contains_key(&ModuleName::from_dotted(name))
    }

    pub fn get(&self, name: &str) -> Option<ModuleHandle> {
        self.lock().get(&ModuleName::from_dotted(name)).cloned()
    }

    /// `path` must be canonical, as the handles' paths are.
    pub fn get_by_path(&self, path: &Path) -> Option<ModuleHandle> {
        self.lock().get_by_path(path).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<ModuleName> {
        let mut names: Vec<ModuleName> = self.lock().by_name.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove(&self, name: &str) -> Option<ModuleHandle> {
        self.lock().remove(&ModuleName::from_dotted(name))
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.by_name.clear();
        state.by_path.clear();
    }
}

impl ModuleLookup for ModuleRegistry {
    fn lookup_module(&self, name: &ModuleName) -> Option<Container<Module>> {
        self.lock().get(name).map(|handle| handle.module().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModuleOrigin;

    fn handle(name: &str, path: &str) -> ModuleHandle {
        let name = ModuleName::from_dotted(name);
        let module = Module::new(name.clone(), ModuleOrigin::File(path.into()));
        ModuleHandle::new(name, path.into(), Container::new(module))
    }

    #[test]
    fn registers_by_name_and_path() {
        let registry = ModuleRegistry::new();
        assert!(registry.is_empty());

        registry.lock().insert(handle("pkg.a", "/src/pkg/a.py"));
        registry.lock().insert(handle("b", "/src/b.py"));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("pkg.a"));
        assert!(!registry.contains("pkg"));
        assert_eq!(
            registry.get_by_path(Path::new("/src/b.py")).map(|h| h.name().as_str()),
            Some("b".to_string())
        );
        assert_eq!(
            registry.names(),
            vec![ModuleName::from_dotted("b"), ModuleName::from_dotted("pkg.a")]
        );
        assert!(registry
            .lookup_module(&ModuleName::from_dotted("pkg.a"))
            .is_some());
    }

    #[test]
    fn replacing_keeps_both_indexes_consistent() {
        let registry = ModuleRegistry::new();
        registry.lock().insert(handle("a", "/src/a.py"));
        // The same path under a new name drops the old name.
        registry.lock().insert(handle("renamed", "/src/a.py"));

        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("a"));
        assert!(registry.get_by_path(Path::new("/src/a.py")).is_some());

        // The same name for a new path drops the old path.
        registry.lock().insert(handle("renamed", "/src/other.py"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get_by_path(Path::new("/src/a.py")).is_none());
    }

    #[test]
    fn removal() {
        let registry = ModuleRegistry::new();
        registry.lock().insert(handle("a", "/src/a.py"));
        registry.lock().insert(handle("b", "/src/b.py"));

        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.get_by_path(Path::new("/src/a.py")).is_none());

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModuleRegistry>();
        assert_send_sync::<ModuleHandle>();
    }
}
