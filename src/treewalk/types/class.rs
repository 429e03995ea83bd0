use std::{
    collections::HashMap,
    fmt::{Debug, Error, Formatter},
    sync::OnceLock,
};

use crate::{
    core::Container,
    domain::{Dunder, ExceptionKind, ModuleName},
    treewalk::{
        types::{exception::base_exception_init, Builtin},
        Scope, TreewalkValue,
    },
};

/// A class object, either defined by a script or one of the builtin exception classes.
pub struct Class {
    pub name: String,
    pub module: ModuleName,
    pub bases: Vec<Container<Class>>,
    /// Ancestors in method resolution order, excluding the class itself.
    mro: Vec<Container<Class>>,
    pub attrs: Scope,
    /// The builtin exception this class is or derives from, if any.
    pub exception_kind: Option<ExceptionKind>,
    pub builtin: bool,
}

impl Class {
    pub fn new(
        name: impl Into<String>,
        module: ModuleName,
        bases: Vec<Container<Class>>,
        attrs: Scope,
    ) -> Self {
        let mut mro: Vec<Container<Class>> = vec![];
        for base in &bases {
            for class in base.linearization() {
                mro.retain(|c| !c.same_identity(&class));
                mro.push(class);
            }
        }
        let exception_kind = mro.iter().find_map(|c| c.borrow().exception_kind);

        Self {
            name: name.into(),
            module,
            bases,
            mro,
            attrs,
            exception_kind,
            builtin: false,
        }
    }

    fn new_builtin(
        name: &str,
        bases: Vec<Container<Class>>,
        exception_kind: Option<ExceptionKind>,
    ) -> Self {
        let mut class = Self::new(name, ModuleName::from_dotted("builtins"), bases, Scope::default());
        class.exception_kind = exception_kind;
        class.builtin = true;
        class
    }

    pub fn mro(&self) -> &[Container<Class>] {
        &self.mro
    }

    pub fn is_exception(&self) -> bool {
        self.exception_kind.is_some()
    }
}

impl Container<Class> {
    /// This class followed by its MRO.
    pub fn linearization(&self) -> Vec<Container<Class>> {
        let mut classes = vec![self.clone()];
        classes.extend(self.borrow().mro().iter().cloned());
        classes
    }

    /// Find `name` on this class or the first ancestor defining it.
    pub fn lookup(&self, name: &str) -> Option<TreewalkValue> {
        self.linearization()
            .iter()
            .find_map(|class| class.borrow().attrs.get(name))
    }

    /// Find `name` on the classes after `after` in the MRO of this class. This is how `super()`
    /// resolves attributes.
    pub fn lookup_after(&self, after: &Container<Class>, name: &str) -> Option<TreewalkValue> {
        self.linearization()
            .iter()
            .skip_while(|class| !class.same_identity(after))
            .skip(1)
            .find_map(|class| class.borrow().attrs.get(name))
    }

    pub fn is_subclass_of(&self, other: &Container<Class>) -> bool {
        if other.same_identity(&builtin_classes().object) {
            return true;
        }
        self.linearization().iter().any(|c| c.same_identity(other))
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "<class '{}'>", self.name)
    }
}

/// The classes every module shares: `object` and the exception hierarchy.
pub struct BuiltinClasses {
    pub object: Container<Class>,
    exceptions: HashMap<ExceptionKind, Container<Class>>,
}

impl BuiltinClasses {
    pub fn exception(&self, kind: ExceptionKind) -> Container<Class> {
        match self.exceptions.get(&kind) {
            Some(class) => class.clone(),
            None => unreachable!("every exception kind has a builtin class"),
        }
    }

    pub fn exceptions(&self) -> impl Iterator<Item = (&ExceptionKind, &Container<Class>)> {
        self.exceptions.iter()
    }
}

static BUILTIN_CLASSES: OnceLock<BuiltinClasses> = OnceLock::new();

pub fn builtin_classes() -> &'static BuiltinClasses {
    BUILTIN_CLASSES.get_or_init(|| {
        let object = Container::new(Class::new_builtin("object", vec![], None));
        let mut exceptions: HashMap<ExceptionKind, Container<Class>> = HashMap::new();

        // Parents come before their children in `ALL`.
        for kind in ExceptionKind::ALL {
            let bases = match kind.parent() {
                Some(parent) => vec![exceptions[&parent].clone()],
                None => vec![],
            };
            let mut class = Class::new_builtin(kind.name(), bases, Some(kind));
            if kind == ExceptionKind::BaseException {
                class.attrs.insert(
                    &Dunder::Init,
                    TreewalkValue::BuiltinFunction(Builtin::new("__init__", base_exception_init)),
                );
            }
            exceptions.insert(kind, Container::new(class));
        }

        BuiltinClasses { object, exceptions }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, bases: Vec<Container<Class>>) -> Container<Class> {
        Container::new(Class::new(name, ModuleName::main(), bases, Scope::default()))
    }

    fn names(classes: &[Container<Class>]) -> Vec<String> {
        classes.iter().map(|c| c.borrow().name.clone()).collect()
    }

    #[test]
    fn diamond_mro() {
        let a = class("A", vec![]);
        let b = class("B", vec![a.clone()]);
        let c = class("C", vec![a.clone()]);
        let d = class("D", vec![b.clone(), c.clone()]);

        assert_eq!(names(&d.linearization()), vec!["D", "B", "C", "A"]);
        assert!(d.is_subclass_of(&a));
        assert!(!a.is_subclass_of(&d));
    }

    #[test]
    fn lookup_follows_mro() {
        let a = class("A", vec![]);
        a.borrow_mut().attrs.insert("x", TreewalkValue::Int(1));
        let b = class("B", vec![a.clone()]);
        b.borrow_mut().attrs.insert("x", TreewalkValue::Int(2));

        assert_eq!(b.lookup("x"), Some(TreewalkValue::Int(2)));
        assert_eq!(b.lookup_after(&b, "x"), Some(TreewalkValue::Int(1)));
        assert_eq!(b.lookup("y"), None);
    }

    #[test]
    fn user_exceptions_inherit_their_kind() {
        let value_error = builtin_classes().exception(ExceptionKind::ValueError);
        let custom = class("BadInput", vec![value_error.clone()]);

        assert_eq!(custom.borrow().exception_kind, Some(ExceptionKind::ValueError));
        assert!(custom.is_subclass_of(&builtin_classes().exception(ExceptionKind::Exception)));
        assert!(custom.lookup(&Dunder::Init).is_some());
    }
}
