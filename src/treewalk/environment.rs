use crate::{
    core::Container,
    treewalk::{
        types::{Exception, Function, Module},
        DomainResult, Scope, TreewalkValue,
    },
};

/// Where names resolve while executing a piece of code: the local scope (absent at module
/// level), the scopes of enclosing functions, and the module globals. Builtins are consulted by
/// the interpreter after all of these.
#[derive(Clone)]
pub struct Environment {
    locals: Option<Container<Scope>>,
    /// Outermost first.
    enclosing: Vec<Container<Scope>>,
    module: Container<Module>,
    function: Option<Container<Function>>,
    class_body: bool,
}

impl Environment {
    pub fn for_module(module: Container<Module>) -> Self {
        Self {
            locals: None,
            enclosing: vec![],
            module,
            function: None,
            class_body: false,
        }
    }

    pub fn for_function(function: &Container<Function>, locals: Scope) -> Self {
        let f = function.borrow();
        Self {
            locals: Some(Container::new(locals)),
            enclosing: f.enclosing.clone(),
            module: f.module.clone(),
            function: Some(function.clone()),
            class_body: false,
        }
    }

    /// The environment a class body executes in. Its scope becomes the class namespace and is
    /// not visible to functions defined inside it.
    pub fn for_class_body(&self, namespace: Container<Scope>) -> Self {
        Self {
            locals: Some(namespace),
            enclosing: self.captured_scopes(),
            module: self.module.clone(),
            function: self.function.clone(),
            class_body: true,
        }
    }

    /// A child scope for the loop variables of a comprehension.
    pub fn for_comprehension(&self) -> Self {
        Self {
            locals: Some(Container::new(Scope::default())),
            enclosing: self.captured_scopes(),
            module: self.module.clone(),
            function: self.function.clone(),
            class_body: false,
        }
    }

    /// The scopes a function defined here closes over.
    pub fn captured_scopes(&self) -> Vec<Container<Scope>> {
        let mut scopes = self.enclosing.clone();
        if let Some(locals) = &self.locals {
            if !self.class_body {
                scopes.push(locals.clone());
            }
        }
        scopes
    }

    pub fn module(&self) -> &Container<Module> {
        &self.module
    }

    pub fn function(&self) -> Option<&Container<Function>> {
        self.function.as_ref()
    }

    /// Resolve `name` without falling back to builtins.
    pub fn load(&self, name: &str) -> Option<TreewalkValue> {
        if let Some(locals) = &self.locals {
            let locals = locals.borrow();
            if locals.has_global(name) {
                return self.module.borrow().get(name);
            }
            if !locals.has_nonlocal(name) {
                if let Some(value) = locals.get(name) {
                    return Some(value);
                }
            }
        }

        self.enclosing
            .iter()
            .rev()
            .find_map(|scope| scope.borrow().get(name))
            .or_else(|| self.module.borrow().get(name))
    }

    pub fn store(&self, name: &str, value: TreewalkValue) {
        let Some(locals) = &self.locals else {
            self.module.borrow_mut().insert(name, value);
            return;
        };

        let (is_global, is_nonlocal) = {
            let locals = locals.borrow();
            (locals.has_global(name), locals.has_nonlocal(name))
        };

        if is_global {
            self.module.borrow_mut().insert(name, value);
        } else if is_nonlocal {
            if let Some(scope) = self.nonlocal_scope(name) {
                scope.borrow_mut().insert(name, value);
            }
        } else {
            locals.borrow_mut().insert(name, value);
        }
    }

    /// Remove a binding, returning whether it existed.
    pub fn delete(&self, name: &str) -> bool {
        let Some(locals) = &self.locals else {
            return self.module.borrow_mut().delete(name).is_some();
        };

        let (is_global, is_nonlocal) = {
            let locals = locals.borrow();
            (locals.has_global(name), locals.has_nonlocal(name))
        };

        if is_global {
            self.module.borrow_mut().delete(name).is_some()
        } else if is_nonlocal {
            self.nonlocal_scope(name)
                .is_some_and(|scope| scope.borrow_mut().delete(name).is_some())
        } else {
            locals.borrow_mut().delete(name).is_some()
        }
    }

    pub fn mark_global(&self, name: &str) {
        if let Some(locals) = &self.locals {
            locals.borrow_mut().mark_global(name);
        }
    }

    pub fn mark_nonlocal(&self, name: &str) -> DomainResult<()> {
        let Some(locals) = &self.locals else {
            return Err(Exception::syntax_error(
                "nonlocal declaration not allowed at module level",
            ));
        };
        if self.nonlocal_scope(name).is_none() {
            return Err(Exception::syntax_error(format!(
                "no binding for nonlocal '{name}' found"
            )));
        }
        locals.borrow_mut().mark_nonlocal(name);
        Ok(())
    }

    fn nonlocal_scope(&self, name: &str) -> Option<&Container<Scope>> {
        self.enclosing
            .iter()
            .rev()
            .find(|scope| scope.borrow().contains(name))
    }
}
