use crate::{
    core::Container,
    domain::{utils::quote_str, ExceptionKind},
    treewalk::{
        result::Raise,
        types::{builtin_classes, Object, Tuple},
        utils::Args,
        TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

/// A Python exception on the Rust side.
///
/// Exceptions raised by the interpreter itself start out without an `instance`; one is created
/// from the builtin class for `kind` when a script catches the exception with `except ... as e`.
/// Exceptions raised by a script always carry the instance it raised.
#[derive(Debug, Clone)]
pub struct Exception {
    pub kind: ExceptionKind,
    pub payload: Vec<TreewalkValue>,
    pub instance: Option<Container<Object>>,
}

impl PartialEq for Exception {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.payload == other.payload
    }
}

impl Exception {
    pub fn new(kind: ExceptionKind, payload: Vec<TreewalkValue>) -> Self {
        Self {
            kind,
            payload,
            instance: None,
        }
    }

    fn new_from_str(kind: ExceptionKind, msg: impl Into<String>) -> Self {
        Self::new(kind, vec![TreewalkValue::Str(msg.into())])
    }

    /// Wrap an instance of an exception class raised by a script.
    pub fn from_instance(kind: ExceptionKind, instance: Container<Object>) -> Self {
        let payload = match instance.borrow().attrs.get("args") {
            Some(TreewalkValue::Tuple(args)) => args.items().to_vec(),
            _ => vec![],
        };
        Self {
            kind,
            payload,
            instance: Some(instance),
        }
    }

    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::TypeError, msg)
    }

    pub fn value_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::ValueError, msg)
    }

    pub fn name_error(name: &str) -> Self {
        Self::new_from_str(
            ExceptionKind::NameError,
            format!("name '{name}' is not defined"),
        )
    }

    pub fn key_error(key: TreewalkValue) -> Self {
        Self::new(ExceptionKind::KeyError, vec![key])
    }

    pub fn index_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::IndexError, msg)
    }

    pub fn attribute_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::AttributeError, msg)
    }

    pub fn runtime_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::RuntimeError, msg)
    }

    pub fn recursion_error() -> Self {
        Self::new_from_str(
            ExceptionKind::RecursionError,
            "maximum recursion depth exceeded",
        )
    }

    pub fn import_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::ImportError, msg)
    }

    pub fn syntax_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::SyntaxError, msg)
    }

    pub fn div_by_zero_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::ZeroDivisionError, msg)
    }

    pub fn overflow_error(msg: impl Into<String>) -> Self {
        Self::new_from_str(ExceptionKind::OverflowError, msg)
    }

    pub fn assertion_error(payload: Vec<TreewalkValue>) -> Self {
        Self::new(ExceptionKind::AssertionError, payload)
    }

    pub fn type_error_must_inherit_base_exception() -> Self {
        Self::type_error("catching classes that do not inherit from BaseException is not allowed")
    }

    /// The message `str()` gives for a builtin exception with this payload.
    pub fn message(&self) -> String {
        match self.payload.as_slice() {
            [] => String::new(),
            [TreewalkValue::Str(s)] if self.kind != ExceptionKind::KeyError => s.clone(),
            [TreewalkValue::Str(s)] => quote_str(s),
            [single] => single.default_repr(),
            many => TreewalkValue::Tuple(Tuple::new(many.to_vec())).default_repr(),
        }
    }

    /// The class name the script sees.
    pub fn type_name(&self) -> String {
        match &self.instance {
            Some(instance) => instance.borrow().class_name(),
            None => self.kind.name().to_string(),
        }
    }

    /// The object a script binds with `except ... as e`.
    pub fn to_value(&self) -> TreewalkValue {
        if let Some(instance) = &self.instance {
            return TreewalkValue::Object(instance.clone());
        }

        let mut object = Object::new(builtin_classes().exception(self.kind));
        object.attrs.insert(
            "args",
            TreewalkValue::Tuple(Tuple::new(self.payload.clone())),
        );
        TreewalkValue::Object(Container::new(object))
    }
}

/// `BaseException.__init__`, which stores its arguments as `args`.
pub(crate) fn base_exception_init(
    interpreter: &TreewalkInterpreter,
    args: Args,
) -> TreewalkResult<TreewalkValue> {
    let (mut positional, _) = args.into_parts();
    if positional.is_empty() {
        return Exception::type_error("__init__() missing required argument 'self'")
            .raise(interpreter);
    }
    let receiver = positional.remove(0);
    match receiver {
        TreewalkValue::Object(object) => {
            object
                .borrow_mut()
                .attrs
                .insert("args", TreewalkValue::Tuple(Tuple::new(positional)));
            Ok(TreewalkValue::None)
        }
        other => Exception::type_error(format!(
            "descriptor '__init__' requires a 'BaseException' object but received a '{}'",
            other.type_name()
        ))
        .raise(interpreter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(Exception::value_error("bad").message(), "bad");
        assert_eq!(
            Exception::key_error(TreewalkValue::Str("k".into())).message(),
            "'k'"
        );
        assert_eq!(
            Exception::new(
                ExceptionKind::ValueError,
                vec![TreewalkValue::Int(1), TreewalkValue::Str("a".into())]
            )
            .message(),
            "(1, 'a')"
        );
        assert_eq!(Exception::assertion_error(vec![]).message(), "");
    }

    #[test]
    fn materializes_builtin_instances() {
        let e = Exception::type_error("nope");
        let TreewalkValue::Object(object) = e.to_value() else {
            panic!("expected an object");
        };
        assert_eq!(object.borrow().class_name(), "TypeError");
        assert_eq!(
            object.borrow().attrs.get("args"),
            Some(TreewalkValue::Tuple(Tuple::new(vec![TreewalkValue::Str(
                "nope".into()
            )])))
        );
        assert_eq!(e.type_name(), "TypeError");
    }
}
