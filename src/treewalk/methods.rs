//! Methods of the builtin `str`, `list` and `dict` types.
//!
//! Each method is a [`Builtin`] which receives its receiver as the first positional argument.

use crate::{
    core::Container,
    treewalk::{
        builtins::update_dict,
        format::format_value,
        result::Raise,
        types::{Builtin, BuiltinFn, Dict, Exception, List},
        utils::{check_args, Args},
        TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

const STR_METHODS: &[(&str, BuiltinFn)] = &[
    ("count", str_count),
    ("endswith", str_endswith),
    ("find", str_find),
    ("format", str_format),
    ("isalpha", str_isalpha),
    ("isdigit", str_isdigit),
    ("join", str_join),
    ("lower", str_lower),
    ("lstrip", str_lstrip),
    ("replace", str_replace),
    ("rstrip", str_rstrip),
    ("split", str_split),
    ("startswith", str_startswith),
    ("strip", str_strip),
    ("upper", str_upper),
];

const LIST_METHODS: &[(&str, BuiltinFn)] = &[
    ("append", list_append),
    ("clear", list_clear),
    ("copy", list_copy),
    ("count", list_count),
    ("extend", list_extend),
    ("index", list_index),
    ("insert", list_insert),
    ("pop", list_pop),
    ("remove", list_remove),
    ("reverse", list_reverse),
    ("sort", list_sort),
];

const DICT_METHODS: &[(&str, BuiltinFn)] = &[
    ("clear", dict_clear),
    ("copy", dict_copy),
    ("get", dict_get),
    ("items", dict_items),
    ("keys", dict_keys),
    ("pop", dict_pop),
    ("setdefault", dict_setdefault),
    ("update", dict_update),
    ("values", dict_values),
];

/// The unbound builtin method `name` of `value`'s type.
pub fn lookup(value: &TreewalkValue, name: &str) -> Option<Builtin> {
    let table = match value {
        TreewalkValue::Str(_) => STR_METHODS,
        TreewalkValue::List(_) => LIST_METHODS,
        TreewalkValue::Dict(_) => DICT_METHODS,
        _ => return None,
    };
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(name, func)| Builtin::new(*name, *func))
}

fn receiver_str(interpreter: &TreewalkInterpreter, args: &Args, method: &str) -> TreewalkResult<String> {
    match args.get_arg(0) {
        Some(TreewalkValue::Str(s)) => Ok(s.clone()),
        other => Exception::type_error(format!(
            "descriptor '{method}' requires a 'str' object but received a '{}'",
            other.map(TreewalkValue::type_name).unwrap_or_else(|| "NoneType".into())
        ))
        .raise(interpreter),
    }
}

fn receiver_list(
    interpreter: &TreewalkInterpreter,
    args: &Args,
    method: &str,
) -> TreewalkResult<Container<List>> {
    match args.get_arg(0) {
        Some(TreewalkValue::List(l)) => Ok(l.clone()),
        _ => Exception::type_error(format!(
            "descriptor '{method}' requires a 'list' object"
        ))
        .raise(interpreter),
    }
}

fn receiver_dict(
    interpreter: &TreewalkInterpreter,
    args: &Args,
    method: &str,
) -> TreewalkResult<Container<Dict>> {
    match args.get_arg(0) {
        Some(TreewalkValue::Dict(d)) => Ok(d.clone()),
        _ => Exception::type_error(format!(
            "descriptor '{method}' requires a 'dict' object"
        ))
        .raise(interpreter),
    }
}

/// Check the argument count of a method, not counting the receiver.
fn check_method_args(
    interpreter: &TreewalkInterpreter,
    args: &Args,
    name: &str,
    min: usize,
    max: usize,
) -> TreewalkResult<()> {
    let (mut positional, keyword) = args.clone().into_parts();
    if !positional.is_empty() {
        positional.remove(0);
    }
    let without_receiver = Args::new(positional).with_keywords(keyword);
    check_args(&without_receiver, name, min, max).raise(interpreter)
}

/// An optional string argument, where `None` means "not given".
fn optional_str(
    interpreter: &TreewalkInterpreter,
    value: Option<&TreewalkValue>,
) -> TreewalkResult<Option<String>> {
    match value {
        None | Some(TreewalkValue::None) => Ok(None),
        Some(TreewalkValue::Str(s)) => Ok(Some(s.clone())),
        Some(other) => Exception::type_error(format!(
            "must be str or None, not {}",
            other.type_name()
        ))
        .raise(interpreter),
    }
}

fn str_upper(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "upper", 0, 0)?;
    Ok(TreewalkValue::Str(receiver_str(interpreter, &args, "upper")?.to_uppercase()))
}

fn str_lower(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "lower", 0, 0)?;
    Ok(TreewalkValue::Str(receiver_str(interpreter, &args, "lower")?.to_lowercase()))
}

#[derive(Clone, Copy)]
enum Side {
    Both,
    Left,
    Right,
}

fn strip(interpreter: &TreewalkInterpreter, args: Args, name: &str, side: Side) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, name, 0, 1)?;
    let s = receiver_str(interpreter, &args, name)?;
    let chars = optional_str(interpreter, args.get_arg(1))?;
    let matches = |c: char| match &chars {
        Some(chars) => chars.contains(c),
        None => c.is_whitespace(),
    };
    let stripped = match side {
        Side::Both => s.trim_matches(matches),
        Side::Left => s.trim_start_matches(matches),
        Side::Right => s.trim_end_matches(matches),
    };
    Ok(TreewalkValue::Str(stripped.to_string()))
}

fn str_strip(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    strip(interpreter, args, "strip", Side::Both)
}

fn str_lstrip(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    strip(interpreter, args, "lstrip", Side::Left)
}

fn str_rstrip(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    strip(interpreter, args, "rstrip", Side::Right)
}

fn str_split(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "split", 0, 2)?;
    let s = receiver_str(interpreter, &args, "split")?;
    let sep = optional_str(interpreter, args.get_kwarg("sep").or(args.get_arg(1)))?;
    let maxsplit = match args.get_kwarg("maxsplit").or(args.get_arg(2)) {
        Some(n) => n.as_int().raise(interpreter)?,
        None => -1,
    };
    let limit = usize::try_from(maxsplit).ok();

    let parts: Vec<String> = match sep {
        Some(sep) if sep.is_empty() => {
            return Exception::value_error("empty separator").raise(interpreter)
        }
        Some(sep) => match limit {
            Some(limit) => s.splitn(limit + 1, sep.as_str()).map(String::from).collect(),
            None => s.split(sep.as_str()).map(String::from).collect(),
        },
        None => {
            let mut parts = vec![];
            let mut rest = s.trim_start();
            while !rest.is_empty() {
                if limit.is_some_and(|limit| parts.len() == limit) {
                    parts.push(rest.trim_end().to_string());
                    break;
                }
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                parts.push(rest[..end].to_string());
                rest = rest[end..].trim_start();
            }
            parts
        }
    };
    Ok(TreewalkValue::new_list(
        parts.into_iter().map(TreewalkValue::Str).collect(),
    ))
}

fn str_join(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "join", 1, 1)?;
    let sep = receiver_str(interpreter, &args, "join")?;
    let items = interpreter.collect_items(&args.get_arg_or_none(1))?;
    let mut parts = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            TreewalkValue::Str(s) => parts.push(s),
            other => {
                return Exception::type_error(format!(
                    "sequence item {index}: expected str instance, {} found",
                    other.type_name()
                ))
                .raise(interpreter)
            }
        }
    }
    Ok(TreewalkValue::Str(parts.join(&sep)))
}

/// The prefixes for `startswith`/`endswith`, which take a string or a tuple of strings.
fn affixes(interpreter: &TreewalkInterpreter, value: &TreewalkValue, method: &str) -> TreewalkResult<Vec<String>> {
    let invalid = |found: &TreewalkValue| {
        Exception::type_error(format!(
            "{method} first arg must be str or a tuple of str, not {}",
            found.type_name()
        ))
    };
    match value {
        TreewalkValue::Str(s) => Ok(vec![s.clone()]),
        TreewalkValue::Tuple(t) => t
            .items()
            .iter()
            .map(|item| match item {
                TreewalkValue::Str(s) => Ok(s.clone()),
                other => Err(invalid(other)),
            })
            .collect::<Result<_, _>>()
            .raise(interpreter),
        other => invalid(other).raise(interpreter),
    }
}

fn str_startswith(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "startswith", 1, 1)?;
    let s = receiver_str(interpreter, &args, "startswith")?;
    let prefixes = affixes(interpreter, &args.get_arg_or_none(1), "startswith")?;
    Ok(TreewalkValue::Bool(prefixes.iter().any(|p| s.starts_with(p.as_str()))))
}

fn str_endswith(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "endswith", 1, 1)?;
    let s = receiver_str(interpreter, &args, "endswith")?;
    let suffixes = affixes(interpreter, &args.get_arg_or_none(1), "endswith")?;
    Ok(TreewalkValue::Bool(suffixes.iter().any(|p| s.ends_with(p.as_str()))))
}

fn str_replace(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "replace", 2, 3)?;
    let s = receiver_str(interpreter, &args, "replace")?;
    let old = args.get_arg_or_none(1);
    let new = args.get_arg_or_none(2);
    let (old, new) = (old.as_str().raise(interpreter)?, new.as_str().raise(interpreter)?);
    let replaced = match args.get_arg(3) {
        Some(count) => match usize::try_from(count.as_int().raise(interpreter)?) {
            Ok(count) => s.replacen(old, new, count),
            Err(_) => s.replace(old, new),
        },
        None => s.replace(old, new),
    };
    Ok(TreewalkValue::Str(replaced))
}

fn str_find(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "find", 1, 1)?;
    let s = receiver_str(interpreter, &args, "find")?;
    let needle = args.get_arg_or_none(1);
    let needle = needle.as_str().raise(interpreter)?;
    let index = s
        .find(needle)
        .map(|byte| s[..byte].chars().count() as i64)
        .unwrap_or(-1);
    Ok(TreewalkValue::Int(index))
}

fn str_count(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "count", 1, 1)?;
    let s = receiver_str(interpreter, &args, "count")?;
    let needle = args.get_arg_or_none(1);
    let needle = needle.as_str().raise(interpreter)?;
    let count = if needle.is_empty() {
        s.chars().count() + 1
    } else {
        s.matches(needle).count()
    };
    Ok(TreewalkValue::Int(count as i64))
}

fn str_isdigit(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    let s = receiver_str(interpreter, &args, "isdigit")?;
    Ok(TreewalkValue::Bool(
        !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
    ))
}

fn str_isalpha(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    let s = receiver_str(interpreter, &args, "isalpha")?;
    Ok(TreewalkValue::Bool(
        !s.is_empty() && s.chars().all(char::is_alphabetic),
    ))
}

/// `str.format` with automatic (`{}`), positional (`{0}`) and keyword (`{name}`) fields, each
/// with an optional `!r`/`!s` conversion and format spec.
fn str_format(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    let template = receiver_str(interpreter, &args, "format")?;
    let positional = &args.positional()[1..];
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::new();
    let mut auto_index = 0;
    let mut i = 0;

    while i < chars.len() {
        match (chars[i], chars.get(i + 1)) {
            ('{', Some('{')) | ('}', Some('}')) => {
                out.push(chars[i]);
                i += 2;
            }
            ('}', _) => {
                return Exception::value_error("Single '}' encountered in format string")
                    .raise(interpreter)
            }
            ('{', _) => {
                let Some(close) = chars[i..].iter().position(|c| *c == '}') else {
                    return Exception::value_error("Single '{' encountered in format string")
                        .raise(interpreter);
                };
                let field: String = chars[i + 1..i + close].iter().collect();
                let (field, spec) = field.split_once(':').unwrap_or((field.as_str(), ""));
                let (field, conversion) = match field.split_once('!') {
                    Some((field, conversion)) => (field, Some(conversion)),
                    None => (field, None),
                };

                let index = if field.is_empty() {
                    auto_index += 1;
                    Some(auto_index - 1)
                } else {
                    field.parse::<usize>().ok()
                };
                let value = match index {
                    Some(index) => positional.get(index).ok_or_else(|| {
                        Exception::index_error(format!(
                            "Replacement index {index} out of range for positional args tuple"
                        ))
                    }),
                    None => args
                        .get_kwarg(field)
                        .ok_or_else(|| Exception::key_error(TreewalkValue::Str(field.to_string()))),
                };
                let value = value.raise(interpreter)?;

                let rendered = match conversion {
                    Some("r") => TreewalkValue::Str(interpreter.repr_of(value)?),
                    Some("s") => TreewalkValue::Str(interpreter.str_of(value)?),
                    Some(_) => {
                        return Exception::value_error("Unknown conversion specifier")
                            .raise(interpreter)
                    }
                    None => value.clone(),
                };
                out.push_str(&format_value(interpreter, &rendered, spec)?);
                i += close + 1;
            }
            (c, _) => {
                out.push(c);
                i += 1;
            }
        }
    }
    Ok(TreewalkValue::Str(out))
}

fn list_append(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "append", 1, 1)?;
    let list = receiver_list(interpreter, &args, "append")?;
    list.borrow_mut().append(args.get_arg_or_none(1));
    Ok(TreewalkValue::None)
}

fn list_extend(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "extend", 1, 1)?;
    let list = receiver_list(interpreter, &args, "extend")?;
    let items = interpreter.collect_items(&args.get_arg_or_none(1))?;
    list.borrow_mut().extend(items);
    Ok(TreewalkValue::None)
}

fn list_pop(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "pop", 0, 1)?;
    let list = receiver_list(interpreter, &args, "pop")?;
    let index = match args.get_arg(1) {
        Some(index) => Some(index.as_int().raise(interpreter)?),
        None => None,
    };
    let popped = list.borrow_mut().pop(index);
    popped.raise(interpreter)
}

fn list_insert(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "insert", 2, 2)?;
    let list = receiver_list(interpreter, &args, "insert")?;
    let index = args.get_arg_or_none(1).as_int().raise(interpreter)?;
    list.borrow_mut().insert(index, args.get_arg_or_none(2));
    Ok(TreewalkValue::None)
}

/// The position of the first item equal to `needle`.
fn position_of(
    interpreter: &TreewalkInterpreter,
    list: &Container<List>,
    needle: &TreewalkValue,
) -> TreewalkResult<Option<usize>> {
    let items = list.borrow().items().to_vec();
    for (index, item) in items.iter().enumerate() {
        if interpreter.values_equal(item, needle)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

fn list_index(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "index", 1, 1)?;
    let list = receiver_list(interpreter, &args, "index")?;
    let needle = args.get_arg_or_none(1);
    match position_of(interpreter, &list, &needle)? {
        Some(index) => Ok(TreewalkValue::Int(index as i64)),
        None => Exception::value_error(format!("{} is not in list", interpreter.repr_of(&needle)?))
            .raise(interpreter),
    }
}

fn list_remove(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "remove", 1, 1)?;
    let list = receiver_list(interpreter, &args, "remove")?;
    match position_of(interpreter, &list, &args.get_arg_or_none(1))? {
        Some(index) => {
            list.borrow_mut().delitem(index as i64).raise(interpreter)?;
            Ok(TreewalkValue::None)
        }
        None => Exception::value_error("list.remove(x): x not in list").raise(interpreter),
    }
}

fn list_count(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "count", 1, 1)?;
    let list = receiver_list(interpreter, &args, "count")?;
    let needle = args.get_arg_or_none(1);
    let items = list.borrow().items().to_vec();
    let mut count = 0;
    for item in &items {
        if interpreter.values_equal(item, &needle)? {
            count += 1;
        }
    }
    Ok(TreewalkValue::Int(count))
}

fn list_sort(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "sort", 0, 0)?;
    let list = receiver_list(interpreter, &args, "sort")?;
    let reverse = match args.get_kwarg("reverse") {
        Some(reverse) => interpreter.is_truthy(reverse)?,
        None => false,
    };
    let items = list.borrow().items().to_vec();
    let sorted = interpreter.sort_values(items, args.get_kwarg("key"), reverse)?;
    list.borrow_mut().set_items(sorted);
    Ok(TreewalkValue::None)
}

fn list_reverse(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "reverse", 0, 0)?;
    receiver_list(interpreter, &args, "reverse")?
        .borrow_mut()
        .reverse();
    Ok(TreewalkValue::None)
}

fn list_copy(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "copy", 0, 0)?;
    let list = receiver_list(interpreter, &args, "copy")?;
    let items = list.borrow().items().to_vec();
    Ok(TreewalkValue::new_list(items))
}

fn list_clear(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "clear", 0, 0)?;
    receiver_list(interpreter, &args, "clear")?
        .borrow_mut()
        .set_items(vec![]);
    Ok(TreewalkValue::None)
}

fn dict_get(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "get", 1, 2)?;
    let dict = receiver_dict(interpreter, &args, "get")?;
    let found = dict.borrow().get(&args.get_arg_or_none(1)).raise(interpreter)?;
    Ok(found.unwrap_or_else(|| args.get_arg_or_none(2)))
}

fn dict_keys(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "keys", 0, 0)?;
    let dict = receiver_dict(interpreter, &args, "keys")?;
    let keys = dict.borrow().keys();
    Ok(TreewalkValue::new_list(keys))
}

fn dict_values(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "values", 0, 0)?;
    let dict = receiver_dict(interpreter, &args, "values")?;
    let values = dict.borrow().values();
    Ok(TreewalkValue::new_list(values))
}

fn dict_items(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "items", 0, 0)?;
    let dict = receiver_dict(interpreter, &args, "items")?;
    let entries = dict.borrow().entries().to_vec();
    Ok(TreewalkValue::new_list(
        entries
            .into_iter()
            .map(|(k, v)| TreewalkValue::new_tuple(vec![k, v]))
            .collect(),
    ))
}

fn dict_pop(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "pop", 1, 2)?;
    let dict = receiver_dict(interpreter, &args, "pop")?;
    let key = args.get_arg_or_none(1);
    let removed = dict.borrow_mut().remove(&key).raise(interpreter)?;
    match (removed, args.get_arg(2)) {
        (Some(value), _) => Ok(value),
        (None, Some(default)) => Ok(default.clone()),
        (None, None) => Exception::key_error(key).raise(interpreter),
    }
}

fn dict_setdefault(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "setdefault", 1, 2)?;
    let dict = receiver_dict(interpreter, &args, "setdefault")?;
    let key = args.get_arg_or_none(1);
    let existing = dict.borrow().get(&key).raise(interpreter)?;
    if let Some(existing) = existing {
        return Ok(existing);
    }
    let default = args.get_arg_or_none(2);
    dict.borrow_mut()
        .insert(key, default.clone())
        .raise(interpreter)?;
    Ok(default)
}

fn dict_update(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "update", 0, 1)?;
    let dict = receiver_dict(interpreter, &args, "update")?;
    // The source may be this same dict, or a script object whose iteration reads it.
    let mut merged = dict.borrow().clone();
    if let Some(source) = args.get_arg(1) {
        update_dict(interpreter, &mut merged, source)?;
    }
    for (key, value) in args.keyword() {
        merged
            .insert(TreewalkValue::Str(key.clone()), value.clone())
            .raise(interpreter)?;
    }
    *dict.borrow_mut() = merged;
    Ok(TreewalkValue::None)
}

fn dict_copy(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "copy", 0, 0)?;
    let dict = receiver_dict(interpreter, &args, "copy")?;
    let copy = dict.borrow().clone();
    Ok(TreewalkValue::Dict(Container::new(copy)))
}

fn dict_clear(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_method_args(interpreter, &args, "clear", 0, 0)?;
    receiver_dict(interpreter, &args, "clear")?.borrow_mut().clear();
    Ok(TreewalkValue::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ExceptionKind, treewalk::test_utils::*};

    #[test]
    fn string_methods() {
        assert_eval_eq!("'Ab'.upper()", TreewalkValue::Str("AB".into()));
        assert_eval_eq!("'  x '.strip()", TreewalkValue::Str("x".into()));
        assert_eval_eq!("'xxhixx'.strip('x')", TreewalkValue::Str("hi".into()));
        assert_eval_eq!("'--a'.lstrip('-')", TreewalkValue::Str("a".into()));
        assert_eval_repr!("'a b  c'.split()", "['a', 'b', 'c']");
        assert_eval_repr!("'a,b,c'.split(',', 1)", "['a', 'b,c']");
        assert_eval_repr!("' a b c '.split(None, 1)", "['a', 'b c']");
        assert_eval_eq!("'-'.join(['a', 'b'])", TreewalkValue::Str("a-b".into()));
        assert_eval_eq!("'abc'.startswith(('x', 'a'))", TreewalkValue::Bool(true));
        assert_eval_eq!("'abc'.endswith('bc')", TreewalkValue::Bool(true));
        assert_eval_eq!("'aaa'.replace('a', 'b', 2)", TreewalkValue::Str("bba".into()));
        assert_eval_eq!("'héllo'.find('l')", TreewalkValue::Int(2));
        assert_eval_eq!("'abc'.find('z')", TreewalkValue::Int(-1));
        assert_eval_eq!("'banana'.count('an')", TreewalkValue::Int(2));
        assert_eval_eq!("'123'.isdigit()", TreewalkValue::Bool(true));
        assert_eval_eq!("''.isalpha()", TreewalkValue::Bool(false));

        let e = run_expect_error("'-'.join(['a', 1])");
        assert_type_error!(e, "sequence item 1: expected str instance, int found");
        let e = run_expect_error("'a'.split('')");
        assert_value_error!(e, "empty separator");
    }

    #[test]
    fn str_format() {
        assert_eval_eq!(
            "'{} and {}'.format(1, 'two')",
            TreewalkValue::Str("1 and two".into())
        );
        assert_eval_eq!(
            "'{1}{0}{name!r}'.format('a', 'b', name='c')",
            TreewalkValue::Str("ba'c'".into())
        );
        assert_eval_eq!(
            "'{:>5}|{:.2f}|{{}}'.format('x', 3.14159)",
            TreewalkValue::Str("    x|3.14|{}".into())
        );

        let e = run_expect_error("'{}{}'.format(1)");
        assert_error!(
            e,
            ExceptionKind::IndexError,
            "Replacement index 1 out of range for positional args tuple"
        );
    }

    #[test]
    fn list_methods() {
        let ctx = run(r#"
items = [3, 1, 2]
items.append(4)
items.extend((5, 6))
last = items.pop()
first = items.pop(0)
items.insert(0, 9)
items.remove(2)
position = items.index(4)
items.sort()
ones = [1, 1, 2].count(1)
copied = items.copy()
copied.reverse()
emptied = [1, 2]
emptied.clear()
"#);
        assert_read_repr!(ctx, "items", "[1, 4, 5, 9]");
        assert_read_eq!(ctx, "last", TreewalkValue::Int(6));
        assert_read_eq!(ctx, "first", TreewalkValue::Int(3));
        assert_read_eq!(ctx, "position", TreewalkValue::Int(2));
        assert_read_eq!(ctx, "ones", TreewalkValue::Int(2));
        assert_read_repr!(ctx, "copied", "[9, 5, 4, 1]");
        assert_read_repr!(ctx, "emptied", "[]");

        let e = run_expect_error("[1].remove(2)");
        assert_value_error!(e, "list.remove(x): x not in list");
        let e = run_expect_error("[].pop()");
        assert_error!(e, ExceptionKind::IndexError, "pop from empty list");
        let e = run_expect_error("[1].index(5)");
        assert_value_error!(e, "5 is not in list");
    }

    #[test]
    fn dict_methods() {
        let ctx = run(r#"
d = {'a': 1}
got = d.get('a')
missing = d.get('z', 0)
d.update({'b': 2}, c=3)
d.update([('d', 4)])
popped = d.pop('a')
fallback = d.pop('a', None)
default = d.setdefault('e', 5)
existing = d.setdefault('b', 100)
keys = d.keys()
values = d.values()
items = d.items()
"#);
        assert_read_eq!(ctx, "got", TreewalkValue::Int(1));
        assert_read_eq!(ctx, "missing", TreewalkValue::Int(0));
        assert_read_eq!(ctx, "popped", TreewalkValue::Int(1));
        assert_read_eq!(ctx, "fallback", TreewalkValue::None);
        assert_read_eq!(ctx, "default", TreewalkValue::Int(5));
        assert_read_eq!(ctx, "existing", TreewalkValue::Int(2));
        assert_read_repr!(ctx, "keys", "['b', 'c', 'd', 'e']");
        assert_read_repr!(ctx, "values", "[2, 3, 4, 5]");
        assert_read_repr!(ctx, "items", "[('b', 2), ('c', 3), ('d', 4), ('e', 5)]");

        let e = run_expect_error("{}.pop('k')");
        assert_error!(e, ExceptionKind::KeyError, "'k'");
    }
}
