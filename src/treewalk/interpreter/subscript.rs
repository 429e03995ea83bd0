use crate::{
    domain::utils::{normalize_index, slice_indices, wrap_negative},
    treewalk::{
        result::Raise,
        types::Exception,
        utils::Args,
        TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

/// Evaluated `[start:stop:step]` bounds. The step is never zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceBounds {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl SliceBounds {
    fn indices(&self, len: usize) -> Vec<usize> {
        slice_indices(self.start, self.stop, self.step, len)
    }

    fn is_contiguous(&self) -> bool {
        matches!(self.step, None | Some(1))
    }
}

impl TreewalkInterpreter<'_> {
    fn sequence_index(&self, kind: &str, index: &TreewalkValue) -> TreewalkResult<i64> {
        match index {
            TreewalkValue::Int(i) => Ok(*i),
            TreewalkValue::Bool(b) => Ok(*b as i64),
            other => Exception::type_error(format!(
                "{kind} indices must be integers or slices, not {}",
                other.type_name()
            ))
            .raise(self),
        }
    }

    /// Call a script-defined `__getitem__`-style method, if the value's class has one.
    fn call_item_method(
        &self,
        value: &TreewalkValue,
        name: &str,
        args: Vec<TreewalkValue>,
    ) -> Option<TreewalkResult<TreewalkValue>> {
        let TreewalkValue::Object(object) = value else {
            return None;
        };
        let class = object.borrow().class.clone();
        let method = class.lookup(name)?;
        Some(self.call_value(&method, Args::new(args).with_bound(value.clone())))
    }

    /// `value[index]`.
    pub fn get_item(
        &self,
        value: &TreewalkValue,
        index: &TreewalkValue,
    ) -> TreewalkResult<TreewalkValue> {
        match value {
            TreewalkValue::List(list) => {
                let index = self.sequence_index("list", index)?;
                list.borrow().getitem(index).raise(self)
            }
            TreewalkValue::Tuple(tuple) => {
                let index = self.sequence_index("tuple", index)?;
                tuple.getitem(index).raise(self)
            }
            TreewalkValue::Str(s) => {
                let index = self.sequence_index("string", index)?;
                let len = s.chars().count();
                match normalize_index(index, len).and_then(|i| s.chars().nth(i)) {
                    Some(c) => Ok(TreewalkValue::Str(c.to_string())),
                    None => Exception::index_error("string index out of range").raise(self),
                }
            }
            TreewalkValue::Range(range) => {
                let index = self.sequence_index("range", index)?;
                range.get(index).map(TreewalkValue::Int).raise(self)
            }
            TreewalkValue::Dict(dict) => {
                let found = dict.borrow().get(index).raise(self)?;
                match found {
                    Some(value) => Ok(value),
                    None => Exception::key_error(index.clone()).raise(self),
                }
            }
            _ => match self.call_item_method(value, "__getitem__", vec![index.clone()]) {
                Some(result) => result,
                None => Exception::type_error(format!(
                    "'{}' object is not subscriptable",
                    value.type_name()
                ))
                .raise(self),
            },
        }
    }

    /// `value[index] = item`.
    pub fn set_item(
        &self,
        value: &TreewalkValue,
        index: TreewalkValue,
        item: TreewalkValue,
    ) -> TreewalkResult<()> {
        match value {
            TreewalkValue::List(list) => {
                let index = self.sequence_index("list", &index)?;
                list.borrow_mut().setitem(index, item).raise(self)
            }
            TreewalkValue::Dict(dict) => dict.borrow_mut().insert(index, item).raise(self),
            _ => match self.call_item_method(value, "__setitem__", vec![index, item]) {
                Some(result) => result.map(|_| ()),
                None => Exception::type_error(format!(
                    "'{}' object does not support item assignment",
                    value.type_name()
                ))
                .raise(self),
            },
        }
    }

    /// `del value[index]`.
    pub fn delete_item(&self, value: &TreewalkValue, index: &TreewalkValue) -> TreewalkResult<()> {
        match value {
            TreewalkValue::List(list) => {
                let index = self.sequence_index("list", index)?;
                list.borrow_mut().delitem(index).raise(self)
            }
            TreewalkValue::Dict(dict) => {
                let removed = dict.borrow_mut().remove(index).raise(self)?;
                match removed {
                    Some(_) => Ok(()),
                    None => Exception::key_error(index.clone()).raise(self),
                }
            }
            _ => match self.call_item_method(value, "__delitem__", vec![index.clone()]) {
                Some(result) => result.map(|_| ()),
                None => Exception::type_error(format!(
                    "'{}' object doesn't support item deletion",
                    value.type_name()
                ))
                .raise(self),
            },
        }
    }

    /// `value[start:stop:step]`.
    pub fn get_slice(
        &self,
        value: &TreewalkValue,
        bounds: SliceBounds,
    ) -> TreewalkResult<TreewalkValue> {
        let pick = |items: &[TreewalkValue]| -> Vec<TreewalkValue> {
            bounds
                .indices(items.len())
                .into_iter()
                .map(|i| items[i].clone())
                .collect()
        };

        Ok(match value {
            TreewalkValue::List(list) => TreewalkValue::new_list(pick(list.borrow().items())),
            TreewalkValue::Tuple(tuple) => TreewalkValue::new_tuple(pick(tuple.items())),
            TreewalkValue::Str(s) => {
                let chars: Vec<char> = s.chars().collect();
                TreewalkValue::Str(
                    bounds
                        .indices(chars.len())
                        .into_iter()
                        .map(|i| chars[i])
                        .collect(),
                )
            }
            _ => {
                return Exception::type_error(format!(
                    "'{}' object is not subscriptable",
                    value.type_name()
                ))
                .raise(self)
            }
        })
    }

    /// `value[start:stop:step] = items`. Only lists support this.
    pub fn set_slice(
        &self,
        value: &TreewalkValue,
        bounds: SliceBounds,
        items: TreewalkValue,
    ) -> TreewalkResult<()> {
        let TreewalkValue::List(list) = value else {
            return Exception::type_error(format!(
                "'{}' object does not support item assignment",
                value.type_name()
            ))
            .raise(self);
        };

        let items = match self.collect_items(&items) {
            Ok(items) => items,
            Err(_) => return Exception::type_error("can only assign an iterable").raise(self),
        };

        let len = list.borrow().len();
        if bounds.is_contiguous() {
            let clamp = |i: i64| wrap_negative(i, len).clamp(0, len as i64) as usize;
            let start = bounds.start.map(clamp).unwrap_or(0);
            let stop = bounds.stop.map(clamp).unwrap_or(len).max(start);
            list.borrow_mut().splice(start, stop, items);
            return Ok(());
        }

        let indices = bounds.indices(len);
        if indices.len() != items.len() {
            return Exception::value_error(format!(
                "attempt to assign sequence of size {} to extended slice of size {}",
                items.len(),
                indices.len()
            ))
            .raise(self);
        }
        let mut list = list.borrow_mut();
        for (index, item) in indices.into_iter().zip(items) {
            list.setitem(index as i64, item).raise(self)?;
        }
        Ok(())
    }

    /// `del value[start:stop:step]`.
    pub fn delete_slice(&self, value: &TreewalkValue, bounds: SliceBounds) -> TreewalkResult<()> {
        let TreewalkValue::List(list) = value else {
            return Exception::type_error(format!(
                "'{}' object doesn't support item deletion",
                value.type_name()
            ))
            .raise(self);
        };

        let mut list = list.borrow_mut();
        let doomed = bounds.indices(list.len());
        let kept = list
            .items()
            .iter()
            .enumerate()
            .filter(|(i, _)| !doomed.contains(i))
            .map(|(_, item)| item.clone())
            .collect();
        list.set_items(kept);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::ExceptionKind,
        treewalk::{test_utils::*, TreewalkValue},
    };

    #[test]
    fn indexing() {
        assert_eval_eq!("[1, 2, 3][-1]", TreewalkValue::Int(3));
        assert_eval_eq!("'héllo'[1]", TreewalkValue::Str("é".into()));
        assert_eval_eq!("range(10, 0, -2)[1]", TreewalkValue::Int(8));
        assert_eval_eq!("{'a': 1}['a']", TreewalkValue::Int(1));
        assert_eval_eq!("(4, 5)[True]", TreewalkValue::Int(5));
    }

    #[test]
    fn indexing_errors() {
        let e = run_expect_error("[1][5]\n");
        assert_error!(e, ExceptionKind::IndexError, "list index out of range");
        let e = run_expect_error("'ab'[-3]\n");
        assert_error!(e, ExceptionKind::IndexError, "string index out of range");
        let e = run_expect_error("{'a': 1}['b']\n");
        assert_error!(e, ExceptionKind::KeyError, "'b'");
        let e = run_expect_error("[1]['0']\n");
        assert_type_error!(e, "list indices must be integers or slices, not str");
        let e = run_expect_error("x = 5\nx[0]\n");
        assert_type_error!(e, "'int' object is not subscriptable");
    }

    #[test]
    fn item_assignment_and_deletion() {
        let run = run(
            "items = [1, 2, 3]\nitems[0] = 10\ndel items[-1]\nd = {'a': 1}\nd['b'] = 2\ndel d['a']\n",
        );
        assert_read_repr!(run, "items", "[10, 2]");
        assert_read_repr!(run, "d", "{'b': 2}");

        let e = run_expect_error("t = (1,)\nt[0] = 2\n");
        assert_type_error!(e, "'tuple' object does not support item assignment");
        let e = run_expect_error("s = 'ab'\ndel s[0]\n");
        assert_type_error!(e, "'str' object doesn't support item deletion");
        let e = run_expect_error("d = {}\ndel d['k']\n");
        assert_error!(e, ExceptionKind::KeyError, "'k'");
    }

    #[test]
    fn slice_assignment() {
        let run = run(
            "a = [0, 1, 2, 3, 4]\na[1:3] = ['x']\nb = [0, 1, 2, 3]\nb[::2] = [8, 9]\nc = [0, 1, 2, 3, 4, 5]\ndel c[::2]\nd = [1, 2]\nd[5:] = (3,)\n",
        );
        assert_read_repr!(run, "a", "[0, 'x', 3, 4]");
        assert_read_repr!(run, "b", "[8, 1, 9, 3]");
        assert_read_repr!(run, "c", "[1, 3, 5]");
        assert_read_repr!(run, "d", "[1, 2, 3]");

        let e = run_expect_error("a = [0, 1, 2]\na[::2] = [1]\n");
        assert_value_error!(
            e,
            "attempt to assign sequence of size 1 to extended slice of size 2"
        );
        let e = run_expect_error("a = [0]\na[:] = 5\n");
        assert_type_error!(e, "can only assign an iterable");
    }

    #[test]
    fn script_defined_item_protocol() {
        let run = run(
            "class Grid:\n    def __init__(self):\n        self.cells = {}\n    def __getitem__(self, key):\n        return self.cells.get(key, '.')\n    def __setitem__(self, key, value):\n        self.cells[key] = value\n    def __delitem__(self, key):\n        del self.cells[key]\ng = Grid()\ng[(0, 1)] = '#'\nhit = g[(0, 1)]\ndel g[(0, 1)]\nmiss = g[(0, 1)]\n",
        );
        assert_read_eq!(run, "hit", TreewalkValue::Str("#".into()));
        assert_read_eq!(run, "miss", TreewalkValue::Str(".".into()));
    }
}
