use crate::{
    core::Container,
    treewalk::{
        types::{Dict, Exception, Function, Tuple},
        utils::Args,
        DomainResult, Scope, TreewalkValue,
    },
};

/// Bind call arguments to the parameters of `function`, producing its initial local scope.
pub fn bind_args(function: &Function, args: Args) -> DomainResult<Scope> {
    let params = &function.params;
    let name = &function.name;
    let (positional, keyword) = args.into_parts();

    let mut bound: Vec<Option<TreewalkValue>> = vec![None; params.args.len()];
    let mut kwonly: Vec<Option<TreewalkValue>> = vec![None; params.kwonly.len()];
    let mut extra_positional = vec![];
    let mut extra_keyword = Dict::default();

    let given = positional.len();
    for (index, value) in positional.into_iter().enumerate() {
        if index < bound.len() {
            bound[index] = Some(value);
        } else {
            extra_positional.push(value);
        }
    }

    if !extra_positional.is_empty() && params.args_var.is_none() {
        let expected = params.args.len();
        let with_defaults = params.args.iter().filter(|p| p.default.is_some()).count();
        let takes = if with_defaults == 0 {
            format!("{expected}")
        } else {
            format!("from {} to {expected}", expected - with_defaults)
        };
        let plural = if expected == 1 && with_defaults == 0 {
            ""
        } else {
            "s"
        };
        let verb = if given == 1 { "was" } else { "were" };
        return Err(Exception::type_error(format!(
            "{name}() takes {takes} positional argument{plural} but {given} {verb} given"
        )));
    }

    for (key, value) in keyword {
        if let Some(index) = params.args.iter().position(|p| p.arg.as_str() == key) {
            if bound[index].is_some() {
                return Err(Exception::type_error(format!(
                    "{name}() got multiple values for argument '{key}'"
                )));
            }
            bound[index] = Some(value);
        } else if let Some(index) = params.kwonly.iter().position(|p| p.arg.as_str() == key) {
            kwonly[index] = Some(value);
        } else if params.kwargs_var.is_some() {
            extra_keyword.insert(TreewalkValue::Str(key), value)?;
        } else {
            return Err(Exception::type_error(format!(
                "{name}() got an unexpected keyword argument '{key}'"
            )));
        }
    }

    let mut scope = Scope::default();

    let mut missing = vec![];
    for ((param, value), default) in params.args.iter().zip(bound).zip(&function.defaults) {
        match value.or_else(|| default.clone()) {
            Some(value) => {
                scope.insert(param.arg.as_str(), value);
            }
            None => missing.push(param.arg.as_str()),
        }
    }
    if !missing.is_empty() {
        return Err(missing_arguments(name, "positional", &missing));
    }

    for ((param, value), default) in params
        .kwonly
        .iter()
        .zip(kwonly)
        .zip(&function.kwonly_defaults)
    {
        match value.or_else(|| default.clone()) {
            Some(value) => {
                scope.insert(param.arg.as_str(), value);
            }
            None => missing.push(param.arg.as_str()),
        }
    }
    if !missing.is_empty() {
        return Err(missing_arguments(name, "keyword-only", &missing));
    }

    if let Some(args_var) = &params.args_var {
        scope.insert(
            args_var.as_str(),
            TreewalkValue::Tuple(Tuple::new(extra_positional)),
        );
    }
    if let Some(kwargs_var) = &params.kwargs_var {
        scope.insert(
            kwargs_var.as_str(),
            TreewalkValue::Dict(Container::new(extra_keyword)),
        );
    }

    Ok(scope)
}

fn missing_arguments(name: &str, kind: &str, missing: &[&str]) -> Exception {
    let quoted: Vec<String> = missing.iter().map(|m| format!("'{m}'")).collect();
    let listed = match quoted.as_slice() {
        [one] => one.clone(),
        [first, last] => format!("{first} and {last}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
        [] => String::new(),
    };
    let plural = if missing.len() == 1 { "" } else { "s" };
    Exception::type_error(format!(
        "{name}() missing {} required {kind} argument{plural}: {listed}",
        missing.len()
    ))
}
