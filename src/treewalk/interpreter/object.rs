use crate::{
    core::Container,
    domain::{Dunder, ExceptionKind},
    treewalk::{
        methods,
        result::Raise,
        types::{builtin_classes, Class, Exception, Method, Object, Super, Tuple},
        utils::Args,
        TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

/// Functions found on a class become methods bound to the instance. Builtins stored on a script
/// class stay unbound, as they do in Python.
fn bind(receiver: &TreewalkValue, attr: TreewalkValue) -> TreewalkValue {
    match attr {
        TreewalkValue::Function(_) => {
            TreewalkValue::Method(Box::new(Method::new(receiver.clone(), attr)))
        }
        other => other,
    }
}

/// Like [`bind`], but also binds the builtin methods of builtin classes such as
/// `BaseException.__init__`, which `super()` reaches.
fn bind_super(receiver: &TreewalkValue, attr: TreewalkValue) -> TreewalkValue {
    match attr {
        TreewalkValue::BuiltinFunction(_) => {
            TreewalkValue::Method(Box::new(Method::new(receiver.clone(), attr)))
        }
        other => bind(receiver, other),
    }
}

impl TreewalkInterpreter<'_> {
    /// `value.name`.
    pub fn get_attr(&self, value: &TreewalkValue, name: &str) -> TreewalkResult<TreewalkValue> {
        let found = match value {
            TreewalkValue::Object(object) => self.get_object_attr(value, object, name),
            TreewalkValue::Class(class) => get_class_attr(class, name),
            TreewalkValue::Module(module) => module.borrow().get(name),
            TreewalkValue::Super(sup) => {
                let receiver_class = match &sup.receiver {
                    TreewalkValue::Object(object) => object.borrow().class.clone(),
                    TreewalkValue::Class(class) => class.clone(),
                    _ => sup.class.clone(),
                };
                let attr = receiver_class.lookup_after(&sup.class, name);
                attr.map(|attr| bind_super(&sup.receiver, attr))
            }
            TreewalkValue::Function(function) => {
                let function = function.borrow();
                match name {
                    "__name__" | "__qualname__" => Some(TreewalkValue::Str(function.name.clone())),
                    "__module__" => Some(TreewalkValue::Str(function.module_name().as_str())),
                    _ => None,
                }
            }
            TreewalkValue::BuiltinFunction(builtin) => match name {
                "__name__" | "__qualname__" => Some(TreewalkValue::Str(builtin.name().into())),
                _ => None,
            },
            TreewalkValue::Method(method) => match name {
                "__self__" => Some(method.receiver.clone()),
                "__func__" => Some(method.function.clone()),
                "__name__" => Some(TreewalkValue::Str(method.name())),
                _ => None,
            },
            _ => methods::lookup(value, name).map(|builtin| {
                bind_super(value, TreewalkValue::BuiltinFunction(builtin))
            }),
        };

        match found {
            Some(attr) => Ok(attr),
            None => Exception::attribute_error(missing_attribute(value, name)).raise(self),
        }
    }

    fn get_object_attr(
        &self,
        value: &TreewalkValue,
        object: &Container<Object>,
        name: &str,
    ) -> Option<TreewalkValue> {
        let (class, own) = {
            let object = object.borrow();
            (object.class.clone(), object.attrs.get(name))
        };
        if own.is_some() {
            return own;
        }
        if name == "__class__" {
            return Some(TreewalkValue::Class(class));
        }
        if let Some(attr) = class.lookup(name) {
            return Some(bind(value, attr));
        }
        if class.borrow().is_exception() && name == "__cause__" {
            return Some(TreewalkValue::None);
        }
        None
    }

    /// `value.name = attr`.
    pub fn set_attr(&self, value: &TreewalkValue, name: &str, attr: TreewalkValue) -> TreewalkResult<()> {
        match value {
            TreewalkValue::Object(object) => {
                object.borrow_mut().attrs.insert(name, attr);
            }
            TreewalkValue::Class(class) => {
                if class.borrow().builtin {
                    return Exception::type_error(format!(
                        "cannot set '{name}' attribute of immutable type '{}'",
                        class.borrow().name
                    ))
                    .raise(self);
                }
                class.borrow_mut().attrs.insert(name, attr);
            }
            TreewalkValue::Module(module) => module.borrow_mut().insert(name, attr),
            _ => {
                return Exception::attribute_error(format!(
                    "'{}' object attribute '{name}' is read-only",
                    value.type_name()
                ))
                .raise(self)
            }
        }
        Ok(())
    }

    /// `del value.name`.
    pub fn delete_attr(&self, value: &TreewalkValue, name: &str) -> TreewalkResult<()> {
        let removed = match value {
            TreewalkValue::Object(object) => object.borrow_mut().attrs.delete(name),
            TreewalkValue::Class(class) if !class.borrow().builtin => {
                class.borrow_mut().attrs.delete(name)
            }
            TreewalkValue::Module(module) => module.borrow_mut().delete(name),
            _ => None,
        };
        match removed {
            Some(_) => Ok(()),
            None => Exception::attribute_error(missing_attribute(value, name)).raise(self),
        }
    }

    /// Like `hasattr()`: only an `AttributeError` counts as absence.
    pub fn has_attr(&self, value: &TreewalkValue, name: &str) -> TreewalkResult<bool> {
        match self.get_attr(value, name) {
            Ok(_) => Ok(true),
            Err(raised) if raised.exception.kind == ExceptionKind::AttributeError => Ok(false),
            Err(raised) => Err(raised),
        }
    }

    /// Call a class: create an instance and run its `__init__`.
    pub fn instantiate(
        &self,
        class: &Container<Class>,
        args: Args,
    ) -> TreewalkResult<TreewalkValue> {
        let mut object = Object::new(class.clone());
        if class.borrow().is_exception() {
            object
                .attrs
                .insert("args", TreewalkValue::Tuple(Tuple::new(args.positional().to_vec())));
        }
        let instance = TreewalkValue::Object(Container::new(object));

        match class.lookup(&Dunder::Init) {
            Some(init) => {
                let result = self.call_value(&init, args.with_bound(instance.clone()))?;
                if result != TreewalkValue::None {
                    return Exception::type_error(format!(
                        "__init__() should return None, not '{}'",
                        result.type_name()
                    ))
                    .raise(self);
                }
            }
            None if !args.is_empty() => {
                return Exception::type_error(format!(
                    "{}() takes no arguments",
                    class.borrow().name
                ))
                .raise(self)
            }
            None => {}
        }

        Ok(instance)
    }

    /// `super(class, receiver)`.
    pub fn make_super(
        &self,
        class: Container<Class>,
        receiver: TreewalkValue,
    ) -> TreewalkResult<TreewalkValue> {
        let valid = match &receiver {
            TreewalkValue::Object(object) => {
                let receiver_class = object.borrow().class.clone();
                receiver_class.is_subclass_of(&class)
            }
            TreewalkValue::Class(receiver_class) => receiver_class.is_subclass_of(&class),
            _ => false,
        };
        if !valid {
            return Exception::type_error(
                "super(type, obj): obj must be an instance or subtype of type",
            )
            .raise(self);
        }
        Ok(TreewalkValue::Super(Box::new(Super::new(class, receiver))))
    }
}

fn get_class_attr(class: &Container<Class>, name: &str) -> Option<TreewalkValue> {
    match name {
        "__name__" | "__qualname__" => return Some(TreewalkValue::Str(class.borrow().name.clone())),
        "__mro__" => {
            let object = &builtin_classes().object;
            let mut mro = class.linearization();
            if !class.same_identity(object) {
                mro.push(object.clone());
            }
            return Some(TreewalkValue::new_tuple(
                mro.into_iter().map(TreewalkValue::Class).collect(),
            ));
        }
        "__bases__" => {
            let bases = class.borrow().bases.clone();
            let bases = if bases.is_empty() {
                vec![builtin_classes().object.clone()]
            } else {
                bases
            };
            return Some(TreewalkValue::new_tuple(
                bases.into_iter().map(TreewalkValue::Class).collect(),
            ));
        }
        _ => {}
    }
    class.lookup(name)
}

fn missing_attribute(value: &TreewalkValue, name: &str) -> String {
    match value {
        TreewalkValue::Class(class) => {
            format!("type object '{}' has no attribute '{name}'", class.borrow().name)
        }
        TreewalkValue::Module(module) => format!(
            "module '{}' has no attribute '{name}'",
            module.borrow().name().as_str()
        ),
        _ => format!("'{}' object has no attribute '{name}'", value.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use crate::treewalk::{test_utils::*, TreewalkValue};

    #[test]
    fn instance_and_class_attributes() {
        let run = run(
            "class Counter:\n    step = 2\n    def __init__(self):\n        self.count = 0\n    def bump(self):\n        self.count += self.step\n        return self\nc = Counter()\nc.bump().bump()\ncount = c.count\nshadow = Counter()\nshadow.step = 10\nclass_step = Counter.step\nname = Counter.__name__\nsame_class = c.__class__ is Counter\n",
        );
        assert_read_eq!(run, "count", TreewalkValue::Int(4));
        assert_read_eq!(run, "class_step", TreewalkValue::Int(2));
        assert_read_eq!(run, "name", TreewalkValue::Str("Counter".into()));
        assert_read_eq!(run, "same_class", TreewalkValue::Bool(true));
    }

    #[test]
    fn bound_methods_remember_their_receiver() {
        let run = run(
            "class A:\n    def get(self):\n        return self\na = A()\nm = a.get\nsame = m() is a and m.__self__ is a\nmethod_name = m.__name__\nupper = 'abc'.upper\nshouted = upper()\n",
        );
        assert_read_eq!(run, "same", TreewalkValue::Bool(true));
        assert_read_eq!(run, "method_name", TreewalkValue::Str("get".into()));
        assert_read_eq!(run, "shouted", TreewalkValue::Str("ABC".into()));
    }

    #[test]
    fn missing_attributes() {
        let e = run_expect_error("class A:\n    pass\nA().missing\n");
        assert_attribute_error!(e, "'A' object has no attribute 'missing'");
        let e = run_expect_error("class A:\n    pass\nA.missing\n");
        assert_attribute_error!(e, "type object 'A' has no attribute 'missing'");
        let e = run_expect_error("x = 5\nx.real\n");
        assert_attribute_error!(e, "'int' object has no attribute 'real'");

        let run = run("class A:\n    pass\nfound = hasattr(A(), 'nope'), hasattr('s', 'upper')\n");
        assert_read_repr!(run, "found", "(False, True)");
    }

    #[test]
    fn read_only_attributes() {
        let e = run_expect_error("x = 5\nx.attr = 1\n");
        assert_attribute_error!(e, "'int' object attribute 'attr' is read-only");
        let e = run_expect_error("ValueError.extra = 1\n");
        assert_type_error!(e, "cannot set 'extra' attribute of immutable type 'ValueError'");
    }

    #[test]
    fn deleting_attributes() {
        let run = run(
            "class A:\n    pass\na = A()\na.x = 1\ndel a.x\ngone = not hasattr(a, 'x')\n",
        );
        assert_read_eq!(run, "gone", TreewalkValue::Bool(true));

        let e = run_expect_error("class A:\n    pass\ndel A().x\n");
        assert_attribute_error!(e, "'A' object has no attribute 'x'");
    }

    #[test]
    fn instantiation() {
        let e = run_expect_error("class A:\n    pass\nA(1)\n");
        assert_type_error!(e, "A() takes no arguments");
        let e = run_expect_error("class A:\n    def __init__(self):\n        return 1\nA()\n");
        assert_type_error!(e, "__init__() should return None, not 'int'");

        let run = run("e = ValueError('bad', 2)\nargs = e.args\ncause = e.__cause__\n");
        assert_read_repr!(run, "args", "('bad', 2)");
        assert_read_eq!(run, "cause", TreewalkValue::None);
    }

    #[test]
    fn method_resolution_order() {
        let run = run(
            "class A:\n    def who(self):\n        return 'A'\nclass B(A):\n    def who(self):\n        return 'B' + super().who()\nclass C(A):\n    def who(self):\n        return 'C' + super().who()\nclass D(B, C):\n    def who(self):\n        return 'D' + super().who()\nresult = D().who()\nmro = [k.__name__ for k in D.__mro__]\nbases = [k.__name__ for k in A.__bases__]\n",
        );
        assert_read_eq!(run, "result", TreewalkValue::Str("DBCA".into()));
        assert_read_repr!(run, "mro", "['D', 'B', 'C', 'A', 'object']");
        assert_read_repr!(run, "bases", "['object']");
    }

    #[test]
    fn explicit_super() {
        let run = run(
            "class A:\n    def name(self):\n        return 'A'\nclass B(A):\n    def name(self):\n        return 'B'\nb = B()\nresult = super(B, b).name()\n",
        );
        assert_read_eq!(run, "result", TreewalkValue::Str("A".into()));

        let e = run_expect_error("class A:\n    pass\nclass B:\n    pass\nsuper(B, A())\n");
        assert_type_error!(e, "super(type, obj): obj must be an instance or subtype of type");
    }
}
