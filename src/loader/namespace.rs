use std::{
    fmt::{Display, Formatter, Result},
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    core::Container,
    domain::{Dunder, ModuleName, Value},
    treewalk::{
        types::{Class, Function, Module},
        TreewalkValue,
    },
};

const INDENT: &str = "    ";

/// Names every module gets from the loader rather than from its source.
pub(crate) fn is_bookkeeping(name: &str) -> bool {
    [Dunder::Name, Dunder::File, Dunder::Package]
        .iter()
        .any(|dunder| dunder.as_str() == name)
}

/// A function defined with `def` or `lambda`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRef {
    pub name: String,
    /// Rendered parameter list, e.g. `(a, b=1, *args, **kwargs)`.
    pub signature: String,
    /// The module whose source defined the function.
    pub module: ModuleName,
}

impl FunctionRef {
    fn new(name: &str, function: &Function) -> Self {
        Self {
            name: name.to_string(),
            signature: function.signature(),
            module: function.module_name(),
        }
    }
}

/// A class.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub name: String,
    pub module: ModuleName,
    pub bases: Vec<String>,
    /// The constructor's parameters, without `self`.
    pub signature: String,
    /// Script-defined methods, inherited ones included, sorted by name.
    pub methods: Vec<FunctionRef>,
}

impl TypeDescriptor {
    fn new(class: &Container<Class>) -> Self {
        let (name, module, bases) = {
            let class = class.borrow();
            let bases = class.bases.iter().map(|b| b.borrow().name.clone()).collect();
            (class.name.clone(), class.module.clone(), bases)
        };

        let mut methods: Vec<FunctionRef> = vec![];
        for ancestor in class.linearization() {
            let ancestor = ancestor.borrow();
            if ancestor.builtin {
                continue;
            }
            for (method_name, value) in ancestor.attrs.iter() {
                if methods.iter().any(|m| m.name == method_name) {
                    continue;
                }
                if let TreewalkValue::Function(function) = value {
                    methods.push(FunctionRef::new(method_name, &function.borrow()));
                }
            }
        }
        methods.sort_by(|a, b| a.name.cmp(&b.name));

        let signature = match class.lookup(&Dunder::Init) {
            Some(TreewalkValue::Function(init)) => init.borrow().signature_skipping(1),
            _ => "()".to_string(),
        };

        Self {
            name,
            module,
            bases,
            signature,
            methods,
        }
    }
}

/// One top-level name of a loaded module.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Function(FunctionRef),
    Type(TypeDescriptor),
    Value(Value),
}

impl Attribute {
    fn describe(value: &TreewalkValue) -> Self {
        match value {
            TreewalkValue::Function(function) => {
                let function = function.borrow();
                Attribute::Function(FunctionRef::new(&function.name, &function))
            }
            TreewalkValue::Class(class) => Attribute::Type(TypeDescriptor::new(class)),
            other => Attribute::Value(other.to_domain()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Attribute::Function(_) => "function",
            Attribute::Type(_) => "class",
            Attribute::Value(_) => "value",
        }
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Attribute::Function(_) | Attribute::Type(_) => true,
            Attribute::Value(Value::Object(object)) => object.is_callable(),
            Attribute::Value(_) => false,
        }
    }
}

/// The top-level names of a loaded module, in the order the source bound them.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    module: ModuleName,
    path: PathBuf,
    attributes: Vec<(String, Attribute)>,
}

impl Namespace {
    pub(crate) fn new(path: &Path, module: &Container<Module>) -> Self {
        let (name, entries) = {
            let module = module.borrow();
            let entries: Vec<(String, TreewalkValue)> = module
                .scope()
                .iter()
                .filter(|(name, _)| !is_bookkeeping(name))
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect();
            (module.name().clone(), entries)
        };

        Self {
            module: name,
            path: path.to_path_buf(),
            attributes: entries
                .iter()
                .map(|(name, value)| (name.clone(), Attribute::describe(value)))
                .collect(),
        }
    }

    pub fn module(&self) -> &ModuleName {
        &self.module
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, attribute)| attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(name, a)| (name.as_str(), a))
    }

    /// The functions and classes this module's own source defines, sorted by name, each class
    /// followed by its methods. Dunder names are always left out, `_private` ones unless
    /// `include_private` is set.
    pub fn callables(&self, include_private: bool) -> Vec<CallableInfo> {
        let visible =
            |name: &str| !name.starts_with("__") && (include_private || !name.starts_with('_'));

        let mut names: Vec<(&str, &Attribute)> =
            self.iter().filter(|(name, _)| visible(name)).collect();
        names.sort_by_key(|(name, _)| *name);

        let mut callables = vec![];
        for (name, attribute) in names {
            match attribute {
                Attribute::Function(function) if function.module == self.module => {
                    callables.push(CallableInfo::new(
                        name,
                        CallableKind::Function,
                        &function.signature,
                    ));
                }
                Attribute::Type(class) if class.module == self.module => {
                    callables.push(CallableInfo::new(name, CallableKind::Class, &class.signature));
                    callables.extend(
                        class
                            .methods
                            .iter()
                            .filter(|m| visible(&m.name) && m.module == self.module)
                            .map(|m| CallableInfo::new(&m.name, CallableKind::Method, &m.signature)),
                    );
                }
                _ => {}
            }
        }
        callables
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallableKind {
    Function,
    Class,
    Method,
}

/// One line of a callables listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallableInfo {
    pub name: String,
    pub kind: CallableKind,
    pub signature: String,
}

impl CallableInfo {
    fn new(name: &str, kind: CallableKind, signature: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            signature: signature.to_string(),
        }
    }
}

impl Display for CallableInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let indent = match self.kind {
            CallableKind::Method => INDENT,
            _ => "",
        };
        write!(f, "{indent}{}{}", self.name, self.signature)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        domain::{ModuleOrigin, Text},
        parser::parse_text,
        treewalk::TreewalkContext,
    };

    fn namespace_of(dependencies: &[(&str, &str)], source: &str) -> Namespace {
        let mut modules: HashMap<ModuleName, Container<Module>> = HashMap::new();
        let mut load = |name: &str, text: &str| {
            let module = Container::new(Module::new(
                ModuleName::from_dotted(name),
                ModuleOrigin::File(format!("/src/{name}.py").into()),
            ));
            let ast = parse_text(&Text::new(text)).unwrap();
            TreewalkContext::new(&modules).execute_module(&module, &ast).unwrap();
            modules.insert(ModuleName::from_dotted(name), module.clone());
            module
        };
        for (name, text) in dependencies {
            load(name, text);
        }
        let module = load("sample", source);
        Namespace::new(Path::new("/src/sample.py"), &module)
    }

    #[test]
    fn describes_top_level_names() {
        let ns = namespace_of(
            &[],
            "import math\nLIMIT = 3\ndef f(a, b=1, *rest, key, **extra):\n    pass\nclass Point:\n    def __init__(self, x, y=0):\n        pass\n",
        );

        assert_eq!(ns.names(), vec!["math", "LIMIT", "f", "Point"]);
        assert_eq!(ns.get("LIMIT"), Some(&Attribute::Value(Value::Integer(3))));
        assert!(!ns.contains("__name__"));

        let Some(Attribute::Function(f)) = ns.get("f") else {
            panic!("expected a function");
        };
        assert_eq!(f.signature, "(a, b=1, *rest, key, **extra)");

        let Some(Attribute::Type(point)) = ns.get("Point") else {
            panic!("expected a class");
        };
        assert_eq!(point.signature, "(x, y=0)");
        assert_eq!(ns.get("math").map(Attribute::kind), Some("value"));
        assert!(!ns.get("math").is_some_and(Attribute::is_callable));
    }

    #[test]
    fn lists_callables_like_a_source_outline() {
        let ns = namespace_of(
            &[("shared", "def helper():\n    pass\nclass Base:\n    def inherited(self):\n        pass\n")],
            "from shared import helper, Base\n\ndef zeta(x):\n    pass\n\ndef _private():\n    pass\n\nclass Shape(Base):\n    def __init__(self, sides):\n        pass\n    def area(self):\n        pass\n    def _cache(self):\n        pass\n\nnumber = 5\nalias = lambda v: v\n",
        );

        let lines: Vec<String> = ns.callables(false).iter().map(|c| c.to_string()).collect();
        pretty_assertions::assert_eq!(
            lines,
            vec!["Shape(sides)", "    area(self)", "alias(v)", "zeta(x)"]
        );

        let lines: Vec<String> = ns.callables(true).iter().map(|c| c.to_string()).collect();
        pretty_assertions::assert_eq!(
            lines,
            vec![
                "Shape(sides)",
                "    _cache(self)",
                "    area(self)",
                "_private()",
                "alias(v)",
                "zeta(x)",
            ]
        );
    }

    #[test]
    fn callables_serialize_with_their_kind() {
        let ns = namespace_of(&[], "class A:\n    def m(self):\n        pass\n");
        let json = serde_json::to_value(ns.callables(false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "A", "kind": "class", "signature": "()"},
                {"name": "m", "kind": "method", "signature": "(self)"},
            ])
        );
    }
}
