use std::fmt::{Debug, Display, Formatter, Result};

use serde_json::{Map, Number, Value as Json};

use crate::{
    domain::utils::{format_comma_separated_with, format_float, quote_str},
    treewalk::TreewalkValue,
};

/// An engine-independent value passed into and returned from calls into a loaded module.
///
/// Plain data crosses the boundary by value. Everything else (functions, classes, instances,
/// modules) crosses as an [`ObjectRef`], which can be handed back into later calls unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Integer(i64),
    Float(f64),
    Str(String),
    Boolean(bool),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Object(ObjectRef),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Like Python's `repr()`.
    pub fn repr(&self) -> String {
        match self {
            Self::Str(s) => quote_str(s),
            _ => self.to_string(),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Self::None => Json::Null,
            Self::Integer(i) => Json::Number((*i).into()),
            Self::Float(f) => Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or_else(|| Json::String(format_float(*f))),
            Self::Str(s) => Json::String(s.clone()),
            Self::Boolean(b) => Json::Bool(*b),
            Self::List(items) | Self::Tuple(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Dict(items) => {
                let map: Map<String, Json> = items
                    .iter()
                    .map(|(k, v)| {
                        let key = match k {
                            Self::Str(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (key, v.to_json())
                    })
                    .collect();
                Json::Object(map)
            }
            Self::Object(o) => Json::String(o.to_string()),
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Dict(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(i) => write!(f, "{}", format_float(*i)),
            Value::Str(s) => write!(f, "{s}"),
            Value::Boolean(b) => match b {
                true => write!(f, "True"),
                false => write!(f, "False"),
            },
            Value::List(i) => {
                write!(f, "[{}]", format_comma_separated_with(i, Value::repr))
            }
            Value::Tuple(i) if i.len() == 1 => write!(f, "({},)", i[0].repr()),
            Value::Tuple(i) => {
                write!(f, "({})", format_comma_separated_with(i, Value::repr))
            }
            Value::Dict(i) => {
                let items =
                    format_comma_separated_with(i, |(k, v)| format!("{}: {}", k.repr(), v.repr()));
                write!(f, "{{{items}}}")
            }
            Value::Object(o) => write!(f, "{o}"),
        }
    }
}

/// An opaque handle on an interpreter object.
#[derive(Clone)]
pub struct ObjectRef(pub(crate) TreewalkValue);

impl ObjectRef {
    pub(crate) fn new(value: TreewalkValue) -> Self {
        Self(value)
    }

    pub(crate) fn value(&self) -> &TreewalkValue {
        &self.0
    }

    /// The Python type name of the referenced object, e.g. `function` or `Point`.
    pub fn type_name(&self) -> String {
        self.0.type_name()
    }

    pub fn is_callable(&self) -> bool {
        self.0.is_callable()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.is(&other.0)
    }
}

impl Debug for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "ObjectRef({})", self.0.default_repr())
    }
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.0.default_repr())
    }
}
