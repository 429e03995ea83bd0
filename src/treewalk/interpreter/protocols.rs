use crate::{
    core::ensure_sufficient_stack,
    domain::{
        utils::{format_comma_separated, format_float, quote_str},
        Dunder,
    },
    treewalk::{
        result::Raise,
        types::{Exception, Range},
        utils::Args,
        TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

/// A snapshot iterator over an iterable value.
pub enum ValueIter {
    Items(std::vec::IntoIter<TreewalkValue>),
    Range { next: i64, remaining: usize, step: i64 },
}

impl ValueIter {
    fn from_range(range: Range) -> Self {
        ValueIter::Range {
            next: range.start,
            remaining: range.len(),
            step: range.step,
        }
    }
}

impl Iterator for ValueIter {
    type Item = TreewalkValue;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ValueIter::Items(items) => items.next(),
            ValueIter::Range {
                next,
                remaining,
                step,
            } => {
                if *remaining == 0 {
                    return None;
                }
                let value = *next;
                *remaining -= 1;
                *next = next.wrapping_add(*step);
                Some(TreewalkValue::Int(value))
            }
        }
    }
}

impl TreewalkInterpreter<'_> {
    /// Find a method a script defined on the class of `value`, if `value` is an instance.
    fn user_method(&self, value: &TreewalkValue, name: &str) -> Option<TreewalkValue> {
        let TreewalkValue::Object(object) = value else {
            return None;
        };
        let class = object.borrow().class.clone();
        match class.lookup(name) {
            Some(method @ TreewalkValue::Function(_)) => Some(method),
            _ => None,
        }
    }

    fn call_user_method(
        &self,
        value: &TreewalkValue,
        method: TreewalkValue,
        args: Vec<TreewalkValue>,
    ) -> TreewalkResult<TreewalkValue> {
        self.call_value(&method, Args::new(args).with_bound(value.clone()))
    }

    /// Like Python's `str()`.
    pub fn str_of(&self, value: &TreewalkValue) -> TreewalkResult<String> {
        match value {
            TreewalkValue::Str(s) => Ok(s.clone()),
            TreewalkValue::Float(f) => Ok(format_float(*f)),
            TreewalkValue::Object(object) => {
                if let Some(method) = self.user_method(value, &Dunder::Str) {
                    let result = self.call_user_method(value, method, vec![])?;
                    return match result {
                        TreewalkValue::Str(s) => Ok(s),
                        other => Exception::type_error(format!(
                            "__str__ returned non-string (type {})",
                            other.type_name()
                        ))
                        .raise(self),
                    };
                }

                let kind = object.borrow().class.borrow().exception_kind;
                match kind {
                    Some(kind) => Ok(Exception::from_instance(kind, object.clone()).message()),
                    None => self.repr_of(value),
                }
            }
            _ => self.repr_of(value),
        }
    }

    /// Like Python's `repr()`.
    pub fn repr_of(&self, value: &TreewalkValue) -> TreewalkResult<String> {
        ensure_sufficient_stack(|| {
            let address = match value {
                TreewalkValue::List(l) => l.address(),
                TreewalkValue::Dict(d) => d.address(),
                TreewalkValue::Object(_) => {
                    if let Some(method) = self.user_method(value, &Dunder::Repr) {
                        let result = self.call_user_method(value, method, vec![])?;
                        return match result {
                            TreewalkValue::Str(s) => Ok(s),
                            other => Exception::type_error(format!(
                                "__repr__ returned non-string (type {})",
                                other.type_name()
                            ))
                            .raise(self),
                        };
                    }
                    return Ok(value.default_repr());
                }
                TreewalkValue::Tuple(t) => {
                    let items = self.repr_items(t.items())?;
                    return Ok(if t.len() == 1 {
                        format!("({items},)")
                    } else {
                        format!("({items})")
                    });
                }
                TreewalkValue::Str(s) => return Ok(quote_str(s)),
                _ => return Ok(value.default_repr()),
            };

            if self.repr_guard.borrow().contains(&address) {
                return Ok(match value {
                    TreewalkValue::List(_) => "[...]".into(),
                    _ => "{...}".into(),
                });
            }

            self.repr_guard.borrow_mut().push(address);
            let result = match value {
                TreewalkValue::List(l) => {
                    let items = l.borrow().items().to_vec();
                    self.repr_items(&items).map(|items| format!("[{items}]"))
                }
                TreewalkValue::Dict(d) => {
                    let entries = d.borrow().entries().to_vec();
                    entries
                        .iter()
                        .map(|(k, v)| Ok(format!("{}: {}", self.repr_of(k)?, self.repr_of(v)?)))
                        .collect::<TreewalkResult<Vec<_>>>()
                        .map(|entries| format!("{{{}}}", format_comma_separated(entries)))
                }
                _ => Ok(value.default_repr()),
            };
            self.repr_guard.borrow_mut().pop();
            result
        })
    }

    fn repr_items(&self, items: &[TreewalkValue]) -> TreewalkResult<String> {
        let items = items
            .iter()
            .map(|i| self.repr_of(i))
            .collect::<TreewalkResult<Vec<_>>>()?;
        Ok(format_comma_separated(items))
    }

    pub fn is_truthy(&self, value: &TreewalkValue) -> TreewalkResult<bool> {
        Ok(match value {
            TreewalkValue::None => false,
            TreewalkValue::Bool(b) => *b,
            TreewalkValue::Int(i) => *i != 0,
            TreewalkValue::Float(f) => *f != 0.0,
            TreewalkValue::Str(s) => !s.is_empty(),
            TreewalkValue::List(l) => !l.borrow().is_empty(),
            TreewalkValue::Tuple(t) => !t.is_empty(),
            TreewalkValue::Dict(d) => !d.borrow().is_empty(),
            TreewalkValue::Range(r) => !r.is_empty(),
            TreewalkValue::Object(_) => {
                if let Some(method) = self.user_method(value, "__bool__") {
                    return match self.call_user_method(value, method, vec![])? {
                        TreewalkValue::Bool(b) => Ok(b),
                        other => Exception::type_error(format!(
                            "__bool__ should return bool, returned {}",
                            other.type_name()
                        ))
                        .raise(self),
                    };
                }
                if self.user_method(value, &Dunder::Len).is_some() {
                    return Ok(self.len_of(value)? != 0);
                }
                true
            }
            _ => true,
        })
    }

    /// Like Python's `len()`.
    pub fn len_of(&self, value: &TreewalkValue) -> TreewalkResult<i64> {
        let len = match value {
            TreewalkValue::Str(s) => s.chars().count(),
            TreewalkValue::List(l) => l.borrow().len(),
            TreewalkValue::Tuple(t) => t.len(),
            TreewalkValue::Dict(d) => d.borrow().len(),
            TreewalkValue::Range(r) => r.len(),
            _ => {
                if let Some(method) = self.user_method(value, &Dunder::Len) {
                    let result = self.call_user_method(value, method, vec![])?;
                    return match result {
                        TreewalkValue::Int(i) if i >= 0 => Ok(i),
                        TreewalkValue::Int(_) => {
                            Exception::value_error("__len__() should return >= 0").raise(self)
                        }
                        other => Exception::type_error(format!(
                            "'{}' object cannot be interpreted as an integer",
                            other.type_name()
                        ))
                        .raise(self),
                    };
                }
                return Exception::type_error(format!(
                    "object of type '{}' has no len()",
                    value.type_name()
                ))
                .raise(self);
            }
        };
        Ok(len as i64)
    }

    /// Equality as `==` sees it, honoring a script-defined `__eq__`.
    pub fn values_equal(&self, a: &TreewalkValue, b: &TreewalkValue) -> TreewalkResult<bool> {
        ensure_sufficient_stack(|| {
            if let Some(method) = self.user_method(a, "__eq__") {
                let result = self.call_user_method(a, method, vec![b.clone()])?;
                return self.is_truthy(&result);
            }
            if let Some(method) = self.user_method(b, "__eq__") {
                let result = self.call_user_method(b, method, vec![a.clone()])?;
                return self.is_truthy(&result);
            }

            match (a, b) {
                (TreewalkValue::List(x), TreewalkValue::List(y)) => {
                    if x.same_identity(y) {
                        return Ok(true);
                    }
                    let x = x.borrow().items().to_vec();
                    let y = y.borrow().items().to_vec();
                    self.sequences_equal(&x, &y)
                }
                (TreewalkValue::Tuple(x), TreewalkValue::Tuple(y)) => {
                    self.sequences_equal(x.items(), y.items())
                }
                (TreewalkValue::Dict(x), TreewalkValue::Dict(y)) => {
                    if x.same_identity(y) {
                        return Ok(true);
                    }
                    let x = x.borrow().entries().to_vec();
                    let y = y.borrow().clone();
                    if x.len() != y.len() {
                        return Ok(false);
                    }
                    for (key, value) in &x {
                        match y.get(key).raise(self)? {
                            Some(other) if self.values_equal(value, &other)? => {}
                            _ => return Ok(false),
                        }
                    }
                    Ok(true)
                }
                _ => Ok(a == b),
            }
        })
    }

    fn sequences_equal(&self, x: &[TreewalkValue], y: &[TreewalkValue]) -> TreewalkResult<bool> {
        if x.len() != y.len() {
            return Ok(false);
        }
        for (a, b) in x.iter().zip(y) {
            if !self.values_equal(a, b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Like Python's `iter()`, except that the items are snapshotted up front.
    pub fn iterate(&self, value: &TreewalkValue) -> TreewalkResult<ValueIter> {
        let items = match value {
            TreewalkValue::List(l) => l.borrow().items().to_vec(),
            TreewalkValue::Tuple(t) => t.items().to_vec(),
            TreewalkValue::Str(s) => s.chars().map(|c| TreewalkValue::Str(c.into())).collect(),
            TreewalkValue::Dict(d) => d.borrow().keys(),
            TreewalkValue::Range(r) => return Ok(ValueIter::from_range(*r)),
            _ => {
                return Exception::type_error(format!(
                    "'{}' object is not iterable",
                    value.type_name()
                ))
                .raise(self)
            }
        };
        Ok(ValueIter::Items(items.into_iter()))
    }

    pub fn collect_items(&self, value: &TreewalkValue) -> TreewalkResult<Vec<TreewalkValue>> {
        Ok(self.iterate(value)?.collect())
    }

    /// The `in` operator.
    pub fn contains(&self, container: &TreewalkValue, item: &TreewalkValue) -> TreewalkResult<bool> {
        match container {
            TreewalkValue::Str(s) => match item {
                TreewalkValue::Str(needle) => Ok(s.contains(needle.as_str())),
                other => Exception::type_error(format!(
                    "'in <string>' requires string as left operand, not {}",
                    other.type_name()
                ))
                .raise(self),
            },
            TreewalkValue::Dict(d) => d.borrow().contains_key(item).raise(self),
            TreewalkValue::Range(r) => Ok(match item {
                TreewalkValue::Int(i) => r.contains(*i),
                TreewalkValue::Bool(b) => r.contains(*b as i64),
                TreewalkValue::Float(f) if f.fract() == 0.0 => r.contains(*f as i64),
                _ => false,
            }),
            TreewalkValue::List(_) | TreewalkValue::Tuple(_) => {
                for candidate in self.iterate(container)? {
                    if candidate.is(item) || self.values_equal(&candidate, item)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Exception::type_error(format!(
                "argument of type '{}' is not iterable",
                container.type_name()
            ))
            .raise(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::treewalk::{test_utils::*, TreewalkValue};

    #[test]
    fn str_and_repr() {
        assert_eval_eq!("str(1.0)", TreewalkValue::Str("1.0".into()));
        assert_eval_eq!("repr('it')", TreewalkValue::Str("'it'".into()));
        assert_eval_eq!("str(ValueError('bad'))", TreewalkValue::Str("bad".into()));
        assert_eval_eq!("repr(KeyError('k'))", TreewalkValue::Str("KeyError('k')".into()));
        assert_eval_eq!("repr((1,))", TreewalkValue::Str("(1,)".into()));

        let run = run(
            "class P:\n    def __repr__(self):\n        return 'P()'\nclass Q(P):\n    def __str__(self):\n        return 'q'\ns = str(P())\nnested = repr([P(), Q()])\nq = str(Q())\n",
        );
        assert_read_eq!(run, "s", TreewalkValue::Str("P()".into()));
        assert_read_eq!(run, "nested", TreewalkValue::Str("[P(), P()]".into()));
        assert_read_eq!(run, "q", TreewalkValue::Str("q".into()));

        let e = run_expect_error("class P:\n    def __str__(self):\n        return 1\nstr(P())\n");
        assert_type_error!(e, "__str__ returned non-string (type int)");
    }

    #[test]
    fn recursive_containers() {
        let run = run("a = [1]\na.append(a)\nd = {}\nd['self'] = d\nra = repr(a)\nrd = repr(d)\n");
        assert_read_eq!(run, "ra", TreewalkValue::Str("[1, [...]]".into()));
        assert_read_eq!(run, "rd", TreewalkValue::Str("{'self': {...}}".into()));
    }

    #[test]
    fn truthiness() {
        let run = run(
            "class Empty:\n    def __len__(self):\n        return 0\nclass No:\n    def __bool__(self):\n        return False\nclass Plain:\n    pass\nresult = [bool(Empty()), bool(No()), bool(Plain()), bool(range(0)), bool(0.0), bool('x')]\n",
        );
        assert_read_repr!(run, "result", "[False, False, True, False, False, True]");

        let e = run_expect_error("class B:\n    def __bool__(self):\n        return 1\nbool(B())\n");
        assert_type_error!(e, "__bool__ should return bool, returned int");
    }

    #[test]
    fn lengths() {
        assert_eval_eq!("len('héllo')", TreewalkValue::Int(5));
        assert_eval_eq!("len(range(0, 10, 3))", TreewalkValue::Int(4));

        let e = run_expect_error("len(5)\n");
        assert_type_error!(e, "object of type 'int' has no len()");
        let e = run_expect_error("class L:\n    def __len__(self):\n        return -1\nlen(L())\n");
        assert_value_error!(e, "__len__() should return >= 0");
    }

    #[test]
    fn equality() {
        assert_eval_eq!("[1, (2, 3)] == [1.0, (2, 3)]", TreewalkValue::Bool(true));
        assert_eval_eq!("{'a': [1]} == {'a': [1]}", TreewalkValue::Bool(true));
        assert_eval_eq!("{'a': 1} == {'a': 2}", TreewalkValue::Bool(false));

        let run = run(
            "class V:\n    def __init__(self, v):\n        self.v = v\n    def __eq__(self, other):\n        return self.v == other.v\nsame = V(1) == V(1)\nfound = V(2) in [V(1), V(2)]\n",
        );
        assert_read_eq!(run, "same", TreewalkValue::Bool(true));
        assert_read_eq!(run, "found", TreewalkValue::Bool(true));
    }

    #[test]
    fn membership() {
        assert_eval_eq!("3 in range(0, 10, 3)", TreewalkValue::Bool(true));
        assert_eval_eq!("4 in range(0, 10, 3)", TreewalkValue::Bool(false));
        assert_eval_eq!("'k' in {'k': 0}", TreewalkValue::Bool(true));

        let e = run_expect_error("1 in 'abc'\n");
        assert_type_error!(e, "'in <string>' requires string as left operand, not int");
        let e = run_expect_error("1 in 5\n");
        assert_type_error!(e, "argument of type 'int' is not iterable");
        let e = run_expect_error("for x in None:\n    pass\n");
        assert_type_error!(e, "'NoneType' object is not iterable");
    }
}
