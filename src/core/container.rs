use std::{fmt::Debug, sync::Arc};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, interior-mutable handle to interpreter state.
///
/// Every heap object the interpreter hands out (lists, dicts, modules, functions, objects) lives
/// behind a `Container` so that a loaded module can be held by the registry, by any number of
/// [`crate::loader::ModuleHandle`]s, and by other modules that imported it, across threads.
///
/// Read access is recursive: a thread already holding a read guard can take another one, which
/// happens when comparing a list against itself.
#[derive(Debug, Default)]
pub struct Container<T>(Arc<RwLock<T>>);

impl<T> Container<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    pub fn borrow(&self) -> RwLockReadGuard<'_, T> {
        self.0.read_recursive()
    }

    pub fn borrow_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Check whether two containers point at the same underlying object.
    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// A stable address for this object, used for identity hashing and default reprs.
    pub fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T> Clone for Container<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: PartialEq> PartialEq for Container<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other) || *self.borrow() == *other.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = Container::new(vec![1, 2]);
        let b = a.clone();
        b.borrow_mut().push(3);

        assert_eq!(*a.borrow(), vec![1, 2, 3]);
        assert!(a.same_identity(&b));
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn equality_falls_back_to_value() {
        let a = Container::new(4);
        let b = Container::new(4);

        assert_eq!(a, b);
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn nested_reads_do_not_block() {
        let a = Container::new(String::from("x"));
        let first = a.borrow();
        let second = a.borrow();
        assert_eq!(*first, *second);
    }
}
