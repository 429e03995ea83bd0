//! The functions and classes every module can reach without importing anything.

use std::{
    cmp::Ordering,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use crate::{
    core::Container,
    domain::ExceptionKind,
    parser::types::BinOp,
    treewalk::{
        format::format_value,
        interpreter::order,
        result::Raise,
        types::{builtin_classes, Builtin, BuiltinFn, Dict, Exception, Range},
        utils::{check_args, no_keywords, Args},
        DomainResult, TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

const FUNCTIONS: &[(&str, BuiltinFn)] = &[
    ("abs", abs),
    ("all", all),
    ("any", any),
    ("bool", bool),
    ("callable", callable),
    ("chr", chr),
    ("delattr", delattr),
    ("dict", dict),
    ("divmod", divmod),
    ("enumerate", enumerate),
    ("filter", filter),
    ("float", float),
    ("format", format),
    ("getattr", getattr),
    ("hasattr", hasattr),
    ("hash", hash),
    ("id", id),
    ("int", int),
    ("isinstance", isinstance),
    ("issubclass", issubclass),
    ("len", len),
    ("list", list),
    ("map", map),
    ("max", max),
    ("min", min),
    ("ord", ord),
    ("pow", pow),
    ("print", print),
    ("range", range),
    ("repr", repr),
    ("reversed", reversed),
    ("round", round),
    ("setattr", setattr),
    ("sorted", sorted),
    ("str", str),
    ("sum", sum),
    ("super", super_),
    ("tuple", tuple),
    ("type", type_),
    ("zip", zip),
];

/// Builtin functions which stand in for the builtin types in `isinstance` and `type()`.
const TYPE_CONSTRUCTORS: &[&str] = &[
    "bool", "dict", "float", "int", "list", "range", "str", "tuple",
];

/// Find a builtin by name.
pub fn lookup(name: &str) -> Option<TreewalkValue> {
    if let Some((name, func)) = FUNCTIONS.iter().find(|(n, _)| *n == name) {
        return Some(TreewalkValue::BuiltinFunction(Builtin::new(*name, *func)));
    }
    if name == "object" {
        return Some(TreewalkValue::Class(builtin_classes().object.clone()));
    }
    ExceptionKind::from_name(name)
        .map(|kind| TreewalkValue::Class(builtin_classes().exception(kind)))
}

fn arg(args: &Args, index: usize) -> TreewalkValue {
    args.get_arg_or_none(index)
}

fn print(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    let mut sep = " ".to_string();
    let mut end = "\n".to_string();
    for (name, value) in args.keyword() {
        let target = match name.as_str() {
            "sep" => &mut sep,
            "end" => &mut end,
            "flush" => continue,
            _ => {
                return Exception::type_error(format!(
                    "'{name}' is an invalid keyword argument for print()"
                ))
                .raise(interpreter)
            }
        };
        match value {
            TreewalkValue::None => {}
            TreewalkValue::Str(s) => *target = s.clone(),
            other => {
                return Exception::type_error(format!(
                    "{name} must be None or a string, not {}",
                    other.type_name()
                ))
                .raise(interpreter)
            }
        }
    }

    let parts = args
        .positional()
        .iter()
        .map(|value| interpreter.str_of(value))
        .collect::<TreewalkResult<Vec<_>>>()?;
    interpreter.write_output(&format!("{}{end}", parts.join(&sep)));
    Ok(TreewalkValue::None)
}

fn len(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "len", 1, 1).raise(interpreter)?;
    interpreter.len_of(&arg(&args, 0)).map(TreewalkValue::Int)
}

fn str(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    no_keywords(&args, "str").raise(interpreter)?;
    check_args(&args, "str", 0, 1).raise(interpreter)?;
    match args.get_arg(0) {
        Some(value) => interpreter.str_of(value).map(TreewalkValue::Str),
        None => Ok(TreewalkValue::Str(String::new())),
    }
}

fn repr(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "repr", 1, 1).raise(interpreter)?;
    interpreter.repr_of(&arg(&args, 0)).map(TreewalkValue::Str)
}

fn bool(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "bool", 0, 1).raise(interpreter)?;
    match args.get_arg(0) {
        Some(value) => interpreter.is_truthy(value).map(TreewalkValue::Bool),
        None => Ok(TreewalkValue::Bool(false)),
    }
}

/// Parse an integer literal the way `int(text, base)` does.
fn parse_int(text: &str, base: u32) -> DomainResult<i64> {
    let invalid = || {
        Exception::value_error(format!(
            "invalid literal for int() with base {base}: {}",
            crate::domain::utils::quote_str(text)
        ))
    };

    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let prefix = match base {
        16 => Some(["0x", "0X"]),
        8 => Some(["0o", "0O"]),
        2 => Some(["0b", "0B"]),
        _ => None,
    };
    let digits = prefix
        .and_then(|p| p.iter().find_map(|p| digits.strip_prefix(p)))
        .unwrap_or(digits);

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return Err(invalid());
    }
    let digits = digits.replace('_', "");

    let magnitude = i128::from_str_radix(&digits, base).map_err(|_| invalid())?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value)
        .map_err(|_| Exception::overflow_error("int too large to convert to a 64-bit integer"))
}

fn float_to_int(f: f64) -> DomainResult<i64> {
    if f.is_nan() {
        return Err(Exception::value_error("cannot convert float NaN to integer"));
    }
    if f.is_infinite() {
        return Err(Exception::overflow_error(
            "cannot convert float infinity to integer",
        ));
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(Exception::overflow_error(
            "int too large to convert to a 64-bit integer",
        ));
    }
    Ok(truncated as i64)
}

fn int(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "int", 0, 2).raise(interpreter)?;
    let base = match args.get_kwarg("base").or(args.get_arg(1)) {
        Some(base) => {
            let base = base.as_int().raise(interpreter)?;
            if !(2..=36).contains(&base) {
                return Exception::value_error("int() base must be >= 2 and <= 36")
                    .raise(interpreter);
            }
            Some(base as u32)
        }
        None => None,
    };

    let value = match (args.get_arg(0), base) {
        (None, _) => 0,
        (Some(TreewalkValue::Str(s)), base) => parse_int(s, base.unwrap_or(10)).raise(interpreter)?,
        (Some(_), Some(_)) => {
            return Exception::type_error("int() can't convert non-string with explicit base")
                .raise(interpreter)
        }
        (Some(TreewalkValue::Int(i)), None) => *i,
        (Some(TreewalkValue::Bool(b)), None) => *b as i64,
        (Some(TreewalkValue::Float(f)), None) => float_to_int(*f).raise(interpreter)?,
        (Some(other), None) => {
            return Exception::type_error(format!(
                "int() argument must be a string, a bytes-like object or a real number, not '{}'",
                other.type_name()
            ))
            .raise(interpreter)
        }
    };
    Ok(TreewalkValue::Int(value))
}

fn float(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "float", 0, 1).raise(interpreter)?;
    let value = match args.get_arg(0) {
        None => 0.0,
        Some(TreewalkValue::Str(s)) => {
            let cleaned = s.trim().replace('_', "");
            match cleaned.parse::<f64>() {
                Ok(f) if !s.trim().starts_with('_') => f,
                _ => {
                    return Exception::value_error(format!(
                        "could not convert string to float: {}",
                        crate::domain::utils::quote_str(s)
                    ))
                    .raise(interpreter)
                }
            }
        }
        Some(other) => match other.as_number() {
            Some(n) => n.as_f64(),
            None => {
                return Exception::type_error(format!(
                    "float() argument must be a string or a real number, not '{}'",
                    other.type_name()
                ))
                .raise(interpreter)
            }
        },
    };
    Ok(TreewalkValue::Float(value))
}

fn list(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "list", 0, 1).raise(interpreter)?;
    let items = match args.get_arg(0) {
        Some(iterable) => interpreter.collect_items(iterable)?,
        None => vec![],
    };
    Ok(TreewalkValue::new_list(items))
}

fn tuple(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "tuple", 0, 1).raise(interpreter)?;
    match args.get_arg(0) {
        Some(TreewalkValue::Tuple(t)) => Ok(TreewalkValue::Tuple(t.clone())),
        Some(iterable) => Ok(TreewalkValue::new_tuple(interpreter.collect_items(iterable)?)),
        None => Ok(TreewalkValue::new_tuple(vec![])),
    }
}

/// Merge a mapping or an iterable of pairs into `dict`, as `dict(source)` and `d.update(source)`
/// do.
pub(crate) fn update_dict(
    interpreter: &TreewalkInterpreter,
    dict: &mut Dict,
    source: &TreewalkValue,
) -> TreewalkResult<()> {
    if let TreewalkValue::Dict(other) = source {
        let entries = other.borrow().entries().to_vec();
        for (key, value) in entries {
            dict.insert(key, value).raise(interpreter)?;
        }
        return Ok(());
    }

    for (index, item) in interpreter.collect_items(source)?.into_iter().enumerate() {
        let pair = match interpreter.collect_items(&item) {
            Ok(pair) => pair,
            Err(_) => {
                return Exception::type_error(format!(
                    "cannot convert dictionary update sequence element #{index} to a sequence"
                ))
                .raise(interpreter)
            }
        };
        let [key, value]: [TreewalkValue; 2] = match pair.try_into() {
            Ok(pair) => pair,
            Err(pair) => {
                return Exception::value_error(format!(
                    "dictionary update sequence element #{index} has length {}; 2 is required",
                    pair.len()
                ))
                .raise(interpreter)
            }
        };
        dict.insert(key, value).raise(interpreter)?;
    }
    Ok(())
}

fn dict(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "dict", 0, 1).raise(interpreter)?;
    let mut dict = Dict::default();
    if let Some(source) = args.get_arg(0) {
        update_dict(interpreter, &mut dict, source)?;
    }
    for (key, value) in args.keyword() {
        dict.insert(TreewalkValue::Str(key.clone()), value.clone())
            .raise(interpreter)?;
    }
    Ok(TreewalkValue::Dict(Container::new(dict)))
}

fn range(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    no_keywords(&args, "range").raise(interpreter)?;
    check_args(&args, "range", 1, 3).raise(interpreter)?;
    let ints = args
        .positional()
        .iter()
        .map(TreewalkValue::as_int)
        .collect::<DomainResult<Vec<_>>>()
        .raise(interpreter)?;
    let range = match ints.as_slice() {
        [stop] => Range::new(0, *stop, 1),
        [start, stop] => Range::new(*start, *stop, 1),
        [start, stop, step] => Range::new(*start, *stop, *step),
        _ => unreachable!("arity was checked"),
    };
    range.map(TreewalkValue::Range).raise(interpreter)
}

fn is_instance_of(
    interpreter: &TreewalkInterpreter,
    value: &TreewalkValue,
    spec: &TreewalkValue,
) -> TreewalkResult<bool> {
    match spec {
        TreewalkValue::Class(class) => {
            if class.same_identity(&builtin_classes().object) {
                return Ok(true);
            }
            Ok(match value {
                TreewalkValue::Object(object) => {
                    let own = object.borrow().class.clone();
                    own.is_subclass_of(class)
                }
                _ => false,
            })
        }
        TreewalkValue::BuiltinFunction(builtin) if TYPE_CONSTRUCTORS.contains(&builtin.name()) => {
            let type_name = value.type_name();
            Ok(type_name == builtin.name() || (builtin.name() == "int" && type_name == "bool"))
        }
        TreewalkValue::BuiltinFunction(builtin) if builtin.name() == "type" => {
            Ok(matches!(value, TreewalkValue::Class(_)))
        }
        TreewalkValue::Tuple(specs) => {
            for spec in specs.items() {
                if is_instance_of(interpreter, value, spec)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        _ => Exception::type_error(
            "isinstance() arg 2 must be a type, a tuple of types, or a union",
        )
        .raise(interpreter),
    }
}

fn isinstance(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "isinstance", 2, 2).raise(interpreter)?;
    is_instance_of(interpreter, &arg(&args, 0), &arg(&args, 1)).map(TreewalkValue::Bool)
}

fn issubclass(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "issubclass", 2, 2).raise(interpreter)?;
    let TreewalkValue::Class(class) = arg(&args, 0) else {
        return Exception::type_error("issubclass() arg 1 must be a class").raise(interpreter);
    };
    let specs = match arg(&args, 1) {
        TreewalkValue::Tuple(t) => t.items().to_vec(),
        other => vec![other],
    };
    for spec in specs {
        match spec {
            TreewalkValue::Class(parent) if class.is_subclass_of(&parent) => {
                return Ok(TreewalkValue::Bool(true))
            }
            TreewalkValue::Class(_) => {}
            _ => {
                return Exception::type_error(
                    "issubclass() arg 2 must be a class, a tuple of classes, or a union",
                )
                .raise(interpreter)
            }
        }
    }
    Ok(TreewalkValue::Bool(false))
}

fn type_(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "type", 1, 1).raise(interpreter)?;
    let value = arg(&args, 0);
    let type_name = value.type_name();
    match &value {
        TreewalkValue::Object(object) => Ok(TreewalkValue::Class(object.borrow().class.clone())),
        TreewalkValue::Class(_) => Ok(lookup("type").unwrap_or(TreewalkValue::None)),
        _ if TYPE_CONSTRUCTORS.contains(&type_name.as_str()) => {
            Ok(lookup(&type_name).unwrap_or(TreewalkValue::None))
        }
        _ => Exception::type_error(format!(
            "type() of '{type_name}' objects is not supported"
        ))
        .raise(interpreter),
    }
}

fn callable(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "callable", 1, 1).raise(interpreter)?;
    Ok(TreewalkValue::Bool(arg(&args, 0).is_callable()))
}

fn attr_name(interpreter: &TreewalkInterpreter, value: &TreewalkValue, func: &str) -> TreewalkResult<String> {
    match value {
        TreewalkValue::Str(s) => Ok(s.clone()),
        other => Exception::type_error(format!(
            "{func}(): attribute name must be string, not '{}'",
            other.type_name()
        ))
        .raise(interpreter),
    }
}

fn hasattr(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "hasattr", 2, 2).raise(interpreter)?;
    let name = attr_name(interpreter, &arg(&args, 1), "hasattr")?;
    interpreter
        .has_attr(&arg(&args, 0), &name)
        .map(TreewalkValue::Bool)
}

fn getattr(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "getattr", 2, 3).raise(interpreter)?;
    let name = attr_name(interpreter, &arg(&args, 1), "getattr")?;
    match (interpreter.get_attr(&arg(&args, 0), &name), args.get_arg(2)) {
        (Err(raised), Some(default))
            if raised.exception.kind == ExceptionKind::AttributeError =>
        {
            Ok(default.clone())
        }
        (result, _) => result,
    }
}

fn setattr(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "setattr", 3, 3).raise(interpreter)?;
    let name = attr_name(interpreter, &arg(&args, 1), "setattr")?;
    interpreter.set_attr(&arg(&args, 0), &name, arg(&args, 2))?;
    Ok(TreewalkValue::None)
}

fn delattr(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "delattr", 2, 2).raise(interpreter)?;
    let name = attr_name(interpreter, &arg(&args, 1), "delattr")?;
    interpreter.delete_attr(&arg(&args, 0), &name)?;
    Ok(TreewalkValue::None)
}

fn abs(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "abs", 1, 1).raise(interpreter)?;
    match arg(&args, 0) {
        TreewalkValue::Int(i) => i
            .checked_abs()
            .map(TreewalkValue::Int)
            .ok_or_else(|| Exception::overflow_error("integer overflow"))
            .raise(interpreter),
        TreewalkValue::Bool(b) => Ok(TreewalkValue::Int(b as i64)),
        TreewalkValue::Float(f) => Ok(TreewalkValue::Float(f.abs())),
        other => Exception::type_error(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))
        .raise(interpreter),
    }
}

fn extremum(
    interpreter: &TreewalkInterpreter,
    args: Args,
    name: &str,
    wanted: Ordering,
) -> TreewalkResult<TreewalkValue> {
    let key = args.get_kwarg("key").cloned();
    let default = args.get_kwarg("default").cloned();
    let items = match args.positional() {
        [] => {
            return Exception::type_error(format!(
                "{name} expected at least 1 argument, got 0"
            ))
            .raise(interpreter)
        }
        [iterable] => interpreter.collect_items(iterable)?,
        many => many.to_vec(),
    };

    let key_of = |item: &TreewalkValue| match &key {
        Some(key) if *key != TreewalkValue::None => {
            interpreter.call_value(key, Args::new(vec![item.clone()]))
        }
        _ => Ok(item.clone()),
    };

    let mut items = items.into_iter();
    let Some(mut best) = items.next() else {
        return match default {
            Some(default) => Ok(default),
            None => Exception::value_error(format!("{name}() arg is an empty sequence"))
                .raise(interpreter),
        };
    };
    let mut best_key = key_of(&best)?;
    for item in items {
        let item_key = key_of(&item)?;
        if order(&item_key, &best_key).raise(interpreter)? == wanted {
            best = item;
            best_key = item_key;
        }
    }
    Ok(best)
}

fn min(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    extremum(interpreter, args, "min", Ordering::Less)
}

fn max(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    extremum(interpreter, args, "max", Ordering::Greater)
}

fn sum(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "sum", 1, 2).raise(interpreter)?;
    let start = args
        .get_kwarg("start")
        .or(args.get_arg(1))
        .cloned()
        .unwrap_or(TreewalkValue::Int(0));
    if matches!(start, TreewalkValue::Str(_)) {
        return Exception::type_error("sum() can't sum strings [use ''.join(seq) instead]")
            .raise(interpreter);
    }
    interpreter
        .collect_items(&arg(&args, 0))?
        .iter()
        .try_fold(start, |total, item| interpreter.binary_op(BinOp::Add, &total, item))
}

fn sorted(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "sorted", 1, 1).raise(interpreter)?;
    let items = interpreter.collect_items(&arg(&args, 0))?;
    let reverse = match args.get_kwarg("reverse") {
        Some(reverse) => interpreter.is_truthy(reverse)?,
        None => false,
    };
    let sorted = interpreter.sort_values(items, args.get_kwarg("key"), reverse)?;
    Ok(TreewalkValue::new_list(sorted))
}

fn enumerate(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "enumerate", 1, 2).raise(interpreter)?;
    let start = match args.get_kwarg("start").or(args.get_arg(1)) {
        Some(start) => start.as_int().raise(interpreter)?,
        None => 0,
    };
    let pairs = interpreter
        .collect_items(&arg(&args, 0))?
        .into_iter()
        .zip(start..)
        .map(|(item, index)| TreewalkValue::new_tuple(vec![TreewalkValue::Int(index), item]))
        .collect();
    Ok(TreewalkValue::new_list(pairs))
}

fn transpose(
    interpreter: &TreewalkInterpreter,
    iterables: &[TreewalkValue],
) -> TreewalkResult<Vec<Vec<TreewalkValue>>> {
    let columns = iterables
        .iter()
        .map(|iterable| interpreter.collect_items(iterable))
        .collect::<TreewalkResult<Vec<_>>>()?;
    let shortest = columns.iter().map(Vec::len).min().unwrap_or(0);
    Ok((0..shortest)
        .map(|row| columns.iter().map(|column| column[row].clone()).collect())
        .collect())
}

fn zip(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    no_keywords(&args, "zip").raise(interpreter)?;
    let rows = transpose(interpreter, args.positional())?;
    Ok(TreewalkValue::new_list(
        rows.into_iter().map(TreewalkValue::new_tuple).collect(),
    ))
}

fn map(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    if args.len() < 2 {
        return Exception::type_error("map() must have at least two arguments.")
            .raise(interpreter);
    }
    let func = arg(&args, 0);
    let rows = transpose(interpreter, &args.positional()[1..])?;
    let mapped = rows
        .into_iter()
        .map(|row| interpreter.call_value(&func, Args::new(row)))
        .collect::<TreewalkResult<Vec<_>>>()?;
    Ok(TreewalkValue::new_list(mapped))
}

fn filter(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "filter", 2, 2).raise(interpreter)?;
    let func = arg(&args, 0);
    let mut kept = vec![];
    for item in interpreter.collect_items(&arg(&args, 1))? {
        let verdict = match func {
            TreewalkValue::None => item.clone(),
            _ => interpreter.call_value(&func, Args::new(vec![item.clone()]))?,
        };
        if interpreter.is_truthy(&verdict)? {
            kept.push(item);
        }
    }
    Ok(TreewalkValue::new_list(kept))
}

fn any(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "any", 1, 1).raise(interpreter)?;
    for item in interpreter.iterate(&arg(&args, 0))? {
        if interpreter.is_truthy(&item)? {
            return Ok(TreewalkValue::Bool(true));
        }
    }
    Ok(TreewalkValue::Bool(false))
}

fn all(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "all", 1, 1).raise(interpreter)?;
    for item in interpreter.iterate(&arg(&args, 0))? {
        if !interpreter.is_truthy(&item)? {
            return Ok(TreewalkValue::Bool(false));
        }
    }
    Ok(TreewalkValue::Bool(true))
}

fn reversed(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "reversed", 1, 1).raise(interpreter)?;
    let value = arg(&args, 0);
    match value {
        TreewalkValue::List(_)
        | TreewalkValue::Tuple(_)
        | TreewalkValue::Str(_)
        | TreewalkValue::Range(_)
        | TreewalkValue::Dict(_) => {
            let mut items = interpreter.collect_items(&value)?;
            items.reverse();
            Ok(TreewalkValue::new_list(items))
        }
        other => Exception::type_error(format!(
            "'{}' object is not reversible",
            other.type_name()
        ))
        .raise(interpreter),
    }
}

fn round(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "round", 1, 2).raise(interpreter)?;
    let digits = match args.get_kwarg("ndigits").or(args.get_arg(1)) {
        None | Some(TreewalkValue::None) => None,
        Some(digits) => Some(digits.as_int().raise(interpreter)?),
    };

    match (arg(&args, 0), digits) {
        (TreewalkValue::Int(i), _) => Ok(TreewalkValue::Int(i)),
        (TreewalkValue::Bool(b), _) => Ok(TreewalkValue::Int(b as i64)),
        (TreewalkValue::Float(f), None) => float_to_int(f.round_ties_even())
            .map(TreewalkValue::Int)
            .raise(interpreter),
        (TreewalkValue::Float(f), Some(digits)) => {
            let scale = 10f64.powi(digits.clamp(-308, 308) as i32);
            let rounded = (f * scale).round_ties_even() / scale;
            Ok(TreewalkValue::Float(if rounded.is_finite() { rounded } else { f }))
        }
        (other, _) => Exception::type_error(format!(
            "type {} doesn't define __round__ method",
            other.type_name()
        ))
        .raise(interpreter),
    }
}

fn id(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "id", 1, 1).raise(interpreter)?;
    let value = arg(&args, 0);
    let address = match &value {
        TreewalkValue::List(c) => c.address(),
        TreewalkValue::Dict(c) => c.address(),
        TreewalkValue::Function(c) => c.address(),
        TreewalkValue::Class(c) => c.address(),
        TreewalkValue::Object(c) => c.address(),
        TreewalkValue::Module(c) => c.address(),
        _ => return hash_value(interpreter, &value).map(TreewalkValue::Int),
    };
    Ok(TreewalkValue::Int(address as i64))
}

fn hash_value(interpreter: &TreewalkInterpreter, value: &TreewalkValue) -> TreewalkResult<i64> {
    let key = value.as_hash_key().raise(interpreter)?;
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    Ok(hasher.finish() as i64)
}

fn hash(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "hash", 1, 1).raise(interpreter)?;
    match arg(&args, 0) {
        TreewalkValue::Int(i) => Ok(TreewalkValue::Int(i)),
        TreewalkValue::Bool(b) => Ok(TreewalkValue::Int(b as i64)),
        value => hash_value(interpreter, &value).map(TreewalkValue::Int),
    }
}

fn chr(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "chr", 1, 1).raise(interpreter)?;
    let code = arg(&args, 0).as_int().raise(interpreter)?;
    match u32::try_from(code).ok().and_then(char::from_u32) {
        Some(c) => Ok(TreewalkValue::Str(c.to_string())),
        None => Exception::value_error("chr() arg not in range(0x110000)").raise(interpreter),
    }
}

fn ord(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "ord", 1, 1).raise(interpreter)?;
    let value = arg(&args, 0);
    let s = value.as_str().raise(interpreter)?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(TreewalkValue::Int(c as i64)),
        _ => Exception::type_error(format!(
            "ord() expected a character, but string of length {} found",
            s.chars().count()
        ))
        .raise(interpreter),
    }
}

fn divmod(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "divmod", 2, 2).raise(interpreter)?;
    let (a, b) = (arg(&args, 0), arg(&args, 1));
    let quotient = interpreter.binary_op(BinOp::IntegerDiv, &a, &b)?;
    let remainder = interpreter.binary_op(BinOp::Mod, &a, &b)?;
    Ok(TreewalkValue::new_tuple(vec![quotient, remainder]))
}

fn pow(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "pow", 2, 3).raise(interpreter)?;
    let (base, exp) = (arg(&args, 0), arg(&args, 1));
    let Some(modulus) = args.get_arg(2) else {
        return interpreter.binary_op(BinOp::Expo, &base, &exp);
    };

    let (base, exp, modulus) = match (base.as_int(), exp.as_int(), modulus.as_int()) {
        (Ok(b), Ok(e), Ok(m)) => (b as i128, e, m as i128),
        _ => {
            return Exception::type_error(
                "pow() 3rd argument not allowed unless all arguments are integers",
            )
            .raise(interpreter)
        }
    };
    if modulus == 0 {
        return Exception::value_error("pow() 3rd argument cannot be 0").raise(interpreter);
    }
    if exp < 0 {
        return Exception::value_error("base is not invertible for the given modulus")
            .raise(interpreter);
    }

    let mut result = 1i128.rem_euclid(modulus);
    let mut base = base.rem_euclid(modulus);
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = (result * base).rem_euclid(modulus);
        }
        base = (base * base).rem_euclid(modulus);
        exp >>= 1;
    }
    // Python gives the result the sign of the modulus.
    if modulus < 0 && result > 0 {
        result += modulus;
    }
    Ok(TreewalkValue::Int(result as i64))
}

fn format(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "format", 1, 2).raise(interpreter)?;
    let spec = match args.get_arg(1) {
        Some(spec) => spec.as_str().raise(interpreter)?.to_string(),
        None => String::new(),
    };
    format_value(interpreter, &arg(&args, 0), &spec).map(TreewalkValue::Str)
}

fn super_(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "super", 0, 2).raise(interpreter)?;
    match (args.get_arg(0), args.get_arg(1)) {
        (Some(TreewalkValue::Class(class)), Some(receiver)) => {
            interpreter.make_super(class.clone(), receiver.clone())
        }
        (Some(_), Some(_)) => {
            Exception::type_error("super() argument 1 must be a type").raise(interpreter)
        }
        _ => Exception::runtime_error("super(): no arguments").raise(interpreter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treewalk::test_utils::*;

    #[test]
    fn int_parsing() {
        assert_eq!(parse_int(" 42 ", 10).unwrap(), 42);
        assert_eq!(parse_int("-0x1f", 16).unwrap(), -31);
        assert_eq!(parse_int("1_000", 10).unwrap(), 1000);
        assert_eq!(
            parse_int("abc", 10).unwrap_err().message(),
            "invalid literal for int() with base 10: 'abc'"
        );
        assert!(parse_int("1__0", 10).is_err());
    }

    #[test]
    fn conversions() {
        assert_eval_eq!("int('12')", TreewalkValue::Int(12));
        assert_eval_eq!("int(3.9)", TreewalkValue::Int(3));
        assert_eval_eq!("int('ff', 16)", TreewalkValue::Int(255));
        assert_eval_eq!("float('2.5')", TreewalkValue::Float(2.5));
        assert_eval_eq!("str(1.0)", TreewalkValue::Str("1.0".into()));
        assert_eval_eq!("bool([])", TreewalkValue::Bool(false));
        assert_eval_eq!("repr('a')", TreewalkValue::Str("'a'".into()));

        let e = run_expect_error("int('x')");
        assert_value_error!(e, "invalid literal for int() with base 10: 'x'");
        let e = run_expect_error("float('nope')");
        assert_value_error!(e, "could not convert string to float: 'nope'");
    }

    #[test]
    fn collections() {
        assert_eval_repr!("list(range(3))", "[0, 1, 2]");
        assert_eval_repr!("tuple('ab')", "('a', 'b')");
        assert_eval_repr!("dict([('a', 1)], b=2)", "{'a': 1, 'b': 2}");
        assert_eval_repr!("sorted([3, 1, 2], reverse=True)", "[3, 2, 1]");
        assert_eval_repr!("sorted(['bb', 'a'], key=len)", "['a', 'bb']");
        assert_eval_repr!("list(enumerate('ab', 1))", "[(1, 'a'), (2, 'b')]");
        assert_eval_repr!("list(zip([1, 2, 3], 'ab'))", "[(1, 'a'), (2, 'b')]");
        assert_eval_repr!("list(map(lambda x: x * 2, [1, 2]))", "[2, 4]");
        assert_eval_repr!("list(filter(None, [0, 1, '', 'x']))", "[1, 'x']");
        assert_eval_repr!("list(reversed([1, 2]))", "[2, 1]");

        let e = run_expect_error("dict([(1, 2, 3)])");
        assert_value_error!(
            e,
            "dictionary update sequence element #0 has length 3; 2 is required"
        );
    }

    #[test]
    fn numbers() {
        assert_eval_eq!("abs(-3)", TreewalkValue::Int(3));
        assert_eval_eq!("min(3, 1, 2)", TreewalkValue::Int(1));
        assert_eval_eq!("max([1, 5, 2])", TreewalkValue::Int(5));
        assert_eval_eq!("max([], default=7)", TreewalkValue::Int(7));
        assert_eval_eq!("sum([1, 2, 3], 10)", TreewalkValue::Int(16));
        assert_eval_eq!("round(2.5)", TreewalkValue::Int(2));
        assert_eval_eq!("round(3.5)", TreewalkValue::Int(4));
        assert_eval_eq!("round(2.675, 1)", TreewalkValue::Float(2.7));
        assert_eval_eq!("pow(3, 4, 5)", TreewalkValue::Int(1));
        assert_eval_repr!("divmod(-7, 2)", "(-4, 1)");
        assert_eval_eq!("ord('a')", TreewalkValue::Int(97));
        assert_eval_eq!("chr(98)", TreewalkValue::Str("b".into()));

        let e = run_expect_error("max([])");
        assert_value_error!(e, "max() arg is an empty sequence");
        let e = run_expect_error("sum(['a'], '')");
        assert_type_error!(e, "sum() can't sum strings [use ''.join(seq) instead]");
    }

    #[test]
    fn introspection() {
        let ctx = run(r#"
class A:
    pass

class B(A):
    def __init__(self):
        self.x = 1

b = B()
checks = [
    isinstance(b, A),
    isinstance(1, int),
    isinstance(True, int),
    isinstance('s', (int, str)),
    isinstance(b, object),
    issubclass(B, A),
    issubclass(A, B),
    hasattr(b, 'x'),
    hasattr(b, 'y'),
    callable(len),
    callable(b),
    type(b) is B,
    type(1) == int,
]
fallback = getattr(b, 'missing', 'default')
setattr(b, 'y', 2)
"#);
        assert_read_repr!(
            ctx,
            "checks",
            "[True, True, True, True, True, True, False, True, False, True, False, True, True]"
        );
        assert_read_eq!(ctx, "fallback", TreewalkValue::Str("default".into()));

        let e = run_expect_error("len(5)");
        assert_type_error!(e, "object of type 'int' has no len()");
        let e = run_expect_error("len()");
        assert_type_error!(e, "len() takes exactly 1 argument (0 given)");
    }

    #[test]
    fn print_with_separators() {
        let ctx = run("print('a', 1, None, sep='-', end='!')\nprint()");
        assert_eq!(ctx.output(), "a-1-None!\n");
    }
}
