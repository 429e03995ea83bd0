use std::fmt::{Debug, Error, Formatter};

use crate::{
    core::{floats_equal, Container},
    domain::{
        utils::{format_comma_separated_with, format_float, quote_str},
        ObjectRef, Value,
    },
    treewalk::{
        types::{
            Builtin, Class, Dict, Exception, Function, List, Method, Module, Object, Range,
            Super, Tuple,
        },
        utils::HashKey,
        DomainResult,
    },
};

#[derive(Clone)]
pub enum TreewalkValue {
    None,
    Ellipsis,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Container<List>),
    Tuple(Tuple),
    Dict(Container<Dict>),
    Range(Range),
    Function(Container<Function>),
    Method(Box<Method>),
    BuiltinFunction(Builtin),
    Class(Container<Class>),
    Object(Container<Object>),
    Module(Container<Module>),
    Super(Box<Super>),
}

/// Structural equality without running any script code. Instances compare by identity; the
/// interpreter layers `__eq__` on top of this.
impl PartialEq for TreewalkValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TreewalkValue::None, TreewalkValue::None) => true,
            (TreewalkValue::Ellipsis, TreewalkValue::Ellipsis) => true,
            (TreewalkValue::Str(a), TreewalkValue::Str(b)) => a == b,
            (TreewalkValue::List(a), TreewalkValue::List(b)) => a == b,
            (TreewalkValue::Tuple(a), TreewalkValue::Tuple(b)) => a == b,
            (TreewalkValue::Dict(a), TreewalkValue::Dict(b)) => a == b,
            (TreewalkValue::Range(a), TreewalkValue::Range(b)) => a == b,
            (TreewalkValue::Function(a), TreewalkValue::Function(b)) => a.same_identity(b),
            (TreewalkValue::Class(a), TreewalkValue::Class(b)) => a.same_identity(b),
            (TreewalkValue::Object(a), TreewalkValue::Object(b)) => a.same_identity(b),
            (TreewalkValue::Module(a), TreewalkValue::Module(b)) => a.same_identity(b),
            (TreewalkValue::BuiltinFunction(a), TreewalkValue::BuiltinFunction(b)) => {
                a.name() == b.name()
            }
            (TreewalkValue::Method(a), TreewalkValue::Method(b)) => {
                a.receiver.is(&b.receiver) && a.function == b.function
            }
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
                (Some(a), Some(b)) => floats_equal(a.as_f64(), b.as_f64()),
                _ => false,
            },
        }
    }
}

/// A numeric view of a value. Booleans are integers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl TreewalkValue {
    pub fn new_list(items: Vec<TreewalkValue>) -> Self {
        TreewalkValue::List(Container::new(List::new(items)))
    }

    pub fn new_tuple(items: Vec<TreewalkValue>) -> Self {
        TreewalkValue::Tuple(Tuple::new(items))
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            TreewalkValue::Int(i) => Some(Number::Int(*i)),
            TreewalkValue::Bool(b) => Some(Number::Int(*b as i64)),
            TreewalkValue::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    pub fn as_int(&self) -> DomainResult<i64> {
        match self {
            TreewalkValue::Int(i) => Ok(*i),
            TreewalkValue::Bool(b) => Ok(*b as i64),
            _ => Err(Exception::type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                self.type_name()
            ))),
        }
    }

    pub fn as_float(&self) -> DomainResult<f64> {
        match self.as_number() {
            Some(n) => Ok(n.as_f64()),
            None => Err(Exception::type_error(format!(
                "must be real number, not {}",
                self.type_name()
            ))),
        }
    }

    pub fn as_str(&self) -> DomainResult<&str> {
        match self {
            TreewalkValue::Str(s) => Ok(s),
            _ => Err(Exception::type_error(format!(
                "expected str, got {}",
                self.type_name()
            ))),
        }
    }

    pub fn as_hash_key(&self) -> DomainResult<HashKey> {
        Ok(match self {
            TreewalkValue::None => HashKey::None,
            TreewalkValue::Bool(b) => HashKey::Int(*b as i64),
            TreewalkValue::Int(i) => HashKey::Int(*i),
            TreewalkValue::Float(f) => HashKey::from_float(*f),
            TreewalkValue::Str(s) => HashKey::Str(s.clone()),
            TreewalkValue::Range(r) => HashKey::Range(r.start, r.stop, r.step),
            TreewalkValue::Tuple(t) => HashKey::Tuple(
                t.items()
                    .iter()
                    .map(TreewalkValue::as_hash_key)
                    .collect::<DomainResult<_>>()?,
            ),
            TreewalkValue::Function(f) => HashKey::Identity(f.address()),
            TreewalkValue::Class(c) => HashKey::Identity(c.address()),
            TreewalkValue::Object(o) => HashKey::Identity(o.address()),
            TreewalkValue::Module(m) => HashKey::Identity(m.address()),
            TreewalkValue::BuiltinFunction(b) => HashKey::Str(format!("<builtin {}>", b.name())),
            TreewalkValue::List(_)
            | TreewalkValue::Dict(_)
            | TreewalkValue::Ellipsis
            | TreewalkValue::Method(_)
            | TreewalkValue::Super(_) => {
                return Err(Exception::type_error(format!(
                    "unhashable type: '{}'",
                    self.type_name()
                )))
            }
        })
    }

    /// Check for object identity, as opposed to object value evaluated in `PartialEq` above.
    pub fn is(&self, other: &Self) -> bool {
        match (self, other) {
            (TreewalkValue::List(a), TreewalkValue::List(b)) => a.same_identity(b),
            (TreewalkValue::Dict(a), TreewalkValue::Dict(b)) => a.same_identity(b),
            (TreewalkValue::Tuple(a), TreewalkValue::Tuple(b)) => a.same_identity(b),
            (TreewalkValue::Bool(a), TreewalkValue::Bool(b)) => a == b,
            (TreewalkValue::Bool(_), _) | (_, TreewalkValue::Bool(_)) => false,
            (TreewalkValue::Int(a), TreewalkValue::Int(b)) => a == b,
            (TreewalkValue::Float(a), TreewalkValue::Float(b)) => a.to_bits() == b.to_bits(),
            (TreewalkValue::Int(_), TreewalkValue::Float(_))
            | (TreewalkValue::Float(_), TreewalkValue::Int(_)) => false,
            (TreewalkValue::Method(_), TreewalkValue::Method(_)) => false,
            (TreewalkValue::Super(_), TreewalkValue::Super(_)) => false,
            _ => self == other,
        }
    }

    /// The name `type(x).__name__` would give.
    pub fn type_name(&self) -> String {
        match self {
            TreewalkValue::None => "NoneType".into(),
            TreewalkValue::Ellipsis => "ellipsis".into(),
            TreewalkValue::Bool(_) => "bool".into(),
            TreewalkValue::Int(_) => "int".into(),
            TreewalkValue::Float(_) => "float".into(),
            TreewalkValue::Str(_) => "str".into(),
            TreewalkValue::List(_) => "list".into(),
            TreewalkValue::Tuple(_) => "tuple".into(),
            TreewalkValue::Dict(_) => "dict".into(),
            TreewalkValue::Range(_) => "range".into(),
            TreewalkValue::Function(_) => "function".into(),
            TreewalkValue::Method(m) => match m.function {
                TreewalkValue::BuiltinFunction(_) => "builtin_function_or_method".into(),
                _ => "method".into(),
            },
            TreewalkValue::BuiltinFunction(_) => "builtin_function_or_method".into(),
            TreewalkValue::Class(_) => "type".into(),
            TreewalkValue::Object(o) => o.borrow().class_name(),
            TreewalkValue::Module(_) => "module".into(),
            TreewalkValue::Super(_) => "super".into(),
        }
    }

    pub fn is_callable(&self) -> bool {
        match self {
            TreewalkValue::Function(_)
            | TreewalkValue::Method(_)
            | TreewalkValue::BuiltinFunction(_)
            | TreewalkValue::Class(_) => true,
            TreewalkValue::Object(o) => {
                let class = o.borrow().class.clone();
                class.lookup("__call__").is_some()
            }
            _ => false,
        }
    }

    /// A `repr()` which never runs script code, so user-defined `__repr__` methods are ignored.
    pub fn default_repr(&self) -> String {
        self.default_repr_inner(&mut vec![])
    }

    fn default_repr_inner(&self, seen: &mut Vec<usize>) -> String {
        match self {
            TreewalkValue::None => "None".into(),
            TreewalkValue::Ellipsis => "Ellipsis".into(),
            TreewalkValue::Bool(true) => "True".into(),
            TreewalkValue::Bool(false) => "False".into(),
            TreewalkValue::Int(i) => i.to_string(),
            TreewalkValue::Float(f) => format_float(*f),
            TreewalkValue::Str(s) => quote_str(s),
            TreewalkValue::List(l) => {
                if seen.contains(&l.address()) {
                    return "[...]".into();
                }
                seen.push(l.address());
                let items = l.borrow().items().to_vec();
                let repr = format!(
                    "[{}]",
                    format_comma_separated_with(&items, |i| i.default_repr_inner(seen))
                );
                seen.pop();
                repr
            }
            TreewalkValue::Tuple(t) if t.len() == 1 => {
                format!("({},)", t.items()[0].default_repr_inner(seen))
            }
            TreewalkValue::Tuple(t) => format!(
                "({})",
                format_comma_separated_with(t.items(), |i| i.default_repr_inner(seen))
            ),
            TreewalkValue::Dict(d) => {
                if seen.contains(&d.address()) {
                    return "{...}".into();
                }
                seen.push(d.address());
                let entries = d.borrow().entries().to_vec();
                let repr = format!(
                    "{{{}}}",
                    format_comma_separated_with(&entries, |(k, v)| format!(
                        "{}: {}",
                        k.default_repr_inner(seen),
                        v.default_repr_inner(seen)
                    ))
                );
                seen.pop();
                repr
            }
            TreewalkValue::Range(r) => r.to_string(),
            TreewalkValue::Function(f) => {
                format!("<function {} at {:#x}>", f.borrow().name, f.address())
            }
            TreewalkValue::Method(m) => match &m.function {
                TreewalkValue::BuiltinFunction(b) => format!(
                    "<built-in method {} of {} object>",
                    b.name(),
                    m.receiver.type_name()
                ),
                _ => format!(
                    "<bound method {} of {}>",
                    m.name(),
                    m.receiver.default_repr_inner(seen)
                ),
            },
            TreewalkValue::BuiltinFunction(b) => format!("<built-in function {}>", b.name()),
            TreewalkValue::Class(c) => {
                let class = c.borrow();
                if class.builtin {
                    format!("<class '{}'>", class.name)
                } else {
                    format!("<class '{}.{}'>", class.module.as_str(), class.name)
                }
            }
            TreewalkValue::Object(o) => {
                let (class, args) = {
                    let object = o.borrow();
                    (object.class.clone(), object.attrs.get("args"))
                };
                let class = class.borrow();
                if class.is_exception() {
                    let args = match args {
                        Some(TreewalkValue::Tuple(args)) => args,
                        _ => Tuple::default(),
                    };
                    let inner = match args.items() {
                        [single] => single.default_repr_inner(seen),
                        items => format_comma_separated_with(items, |i| i.default_repr_inner(seen)),
                    };
                    format!("{}({inner})", class.name)
                } else {
                    format!(
                        "<{}.{} object at {:#x}>",
                        class.module.as_str(),
                        class.name,
                        o.address()
                    )
                }
            }
            TreewalkValue::Module(m) => {
                let module = m.borrow();
                match module.origin().file_path() {
                    Some(path) => format!(
                        "<module '{}' from '{}'>",
                        module.name().as_str(),
                        path.display()
                    ),
                    None => format!("<module '{}' (built-in)>", module.name().as_str()),
                }
            }
            TreewalkValue::Super(s) => format!(
                "<super: <class '{}'>, <{} object>>",
                s.class.borrow().name,
                s.receiver.type_name()
            ),
        }
    }

    /// Convert a value coming in from the caller of a module.
    pub fn from_domain(value: Value) -> DomainResult<Self> {
        Ok(match value {
            Value::None => TreewalkValue::None,
            Value::Integer(i) => TreewalkValue::Int(i),
            Value::Float(f) => TreewalkValue::Float(f),
            Value::Str(s) => TreewalkValue::Str(s),
            Value::Boolean(b) => TreewalkValue::Bool(b),
            Value::List(items) => TreewalkValue::new_list(
                items
                    .into_iter()
                    .map(Self::from_domain)
                    .collect::<DomainResult<_>>()?,
            ),
            Value::Tuple(items) => TreewalkValue::new_tuple(
                items
                    .into_iter()
                    .map(Self::from_domain)
                    .collect::<DomainResult<_>>()?,
            ),
            Value::Dict(items) => {
                let items = items
                    .into_iter()
                    .map(|(k, v)| Ok((Self::from_domain(k)?, Self::from_domain(v)?)))
                    .collect::<DomainResult<_>>()?;
                TreewalkValue::Dict(Container::new(Dict::from_items(items)?))
            }
            Value::Object(object) => object.value().clone(),
        })
    }

    /// Convert a value for the caller of a module. Plain data is copied out; everything else,
    /// and any container which contains itself, is handed out as an [`ObjectRef`].
    pub fn to_domain(&self) -> Value {
        self.to_domain_inner(&mut vec![])
    }

    fn to_domain_inner(&self, seen: &mut Vec<usize>) -> Value {
        let address = match self {
            TreewalkValue::List(l) => Some(l.address()),
            TreewalkValue::Dict(d) => Some(d.address()),
            _ => None,
        };
        if let Some(address) = address {
            if seen.contains(&address) {
                return Value::Object(ObjectRef::new(self.clone()));
            }
            seen.push(address);
        }

        let value = match self {
            TreewalkValue::None => Value::None,
            TreewalkValue::Bool(b) => Value::Boolean(*b),
            TreewalkValue::Int(i) => Value::Integer(*i),
            TreewalkValue::Float(f) => Value::Float(*f),
            TreewalkValue::Str(s) => Value::Str(s.clone()),
            TreewalkValue::List(l) => {
                let items = l.borrow().items().to_vec();
                Value::List(items.iter().map(|i| i.to_domain_inner(seen)).collect())
            }
            TreewalkValue::Tuple(t) => {
                Value::Tuple(t.items().iter().map(|i| i.to_domain_inner(seen)).collect())
            }
            TreewalkValue::Dict(d) => {
                let entries = d.borrow().entries().to_vec();
                Value::Dict(
                    entries
                        .iter()
                        .map(|(k, v)| (k.to_domain_inner(seen), v.to_domain_inner(seen)))
                        .collect(),
                )
            }
            _ => Value::Object(ObjectRef::new(self.clone())),
        };

        if address.is_some() {
            seen.pop();
        }
        value
    }
}

impl Debug for TreewalkValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.default_repr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_equality() {
        assert_eq!(TreewalkValue::Int(1), TreewalkValue::Float(1.0));
        assert_eq!(TreewalkValue::Bool(true), TreewalkValue::Int(1));
        assert_ne!(TreewalkValue::Int(1), TreewalkValue::Str("1".into()));
        assert!(!TreewalkValue::Bool(true).is(&TreewalkValue::Int(1)));
    }

    #[test]
    fn identity() {
        let a = TreewalkValue::new_list(vec![]);
        let b = TreewalkValue::new_list(vec![]);
        assert_eq!(a, b);
        assert!(!a.is(&b));
        assert!(a.is(&a.clone()));
        assert!(TreewalkValue::None.is(&TreewalkValue::None));
    }

    #[test]
    fn reprs() {
        let value = TreewalkValue::new_list(vec![
            TreewalkValue::Int(1),
            TreewalkValue::Str("a".into()),
            TreewalkValue::new_tuple(vec![TreewalkValue::Float(2.0)]),
            TreewalkValue::None,
        ]);
        assert_eq!(value.default_repr(), "[1, 'a', (2.0,), None]");
    }

    #[test]
    fn self_containing_list() {
        let list = Container::new(List::default());
        list.borrow_mut()
            .append(TreewalkValue::List(list.clone()));
        let value = TreewalkValue::List(list);
        assert_eq!(value.default_repr(), "[[...]]");

        let Value::List(items) = value.to_domain() else {
            panic!("expected a list");
        };
        assert!(matches!(items[0], Value::Object(_)));
    }

    #[test]
    fn domain_round_trip() {
        let value = Value::Dict(vec![(
            Value::Str("k".into()),
            Value::List(vec![Value::Integer(1), Value::Boolean(false)]),
        )]);
        let converted = TreewalkValue::from_domain(value.clone()).unwrap();
        assert_eq!(converted.to_domain(), value);

        let bad = Value::Dict(vec![(Value::List(vec![]), Value::None)]);
        assert!(TreewalkValue::from_domain(bad).is_err());
    }
}
