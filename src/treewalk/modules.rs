//! Modules which exist without a file on disk.

use std::sync::OnceLock;

use crate::{
    core::Container,
    domain::ModuleName,
    treewalk::{
        result::Raise,
        types::{Builtin, BuiltinFn, Exception, Module},
        utils::{check_args, Args},
        TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

static SYS: OnceLock<Container<Module>> = OnceLock::new();
static MATH: OnceLock<Container<Module>> = OnceLock::new();

/// The builtin module called `name`, if there is one. Builtin modules are shared by every
/// interpreter in the process.
pub fn builtin_module(name: &ModuleName) -> Option<Container<Module>> {
    match name.as_str().as_str() {
        "sys" => Some(SYS.get_or_init(init_sys).clone()),
        "math" => Some(MATH.get_or_init(init_math).clone()),
        _ => None,
    }
}

fn init_sys() -> Container<Module> {
    let mut module = Module::new_builtin("sys");
    let str_list = |items: &[&str]| {
        TreewalkValue::new_list(
            items
                .iter()
                .map(|s| TreewalkValue::Str(s.to_string()))
                .collect(),
        )
    };

    module.insert("version", TreewalkValue::Str(format!("3.12.0 (dynimport {})", env!("CARGO_PKG_VERSION"))));
    module.insert(
        "version_info",
        TreewalkValue::new_tuple(vec![
            TreewalkValue::Int(3),
            TreewalkValue::Int(12),
            TreewalkValue::Int(0),
        ]),
    );
    module.insert("platform", TreewalkValue::Str(std::env::consts::OS.to_string()));
    module.insert("path", str_list(&[]));
    module.insert("argv", str_list(&[""]));
    module.insert("maxsize", TreewalkValue::Int(i64::MAX));
    Container::new(module)
}

const MATH_FUNCTIONS: &[(&str, BuiltinFn)] = &[
    ("ceil", ceil),
    ("cos", cos),
    ("exp", exp),
    ("fabs", fabs),
    ("floor", floor),
    ("gcd", gcd),
    ("isinf", isinf),
    ("isnan", isnan),
    ("log", log),
    ("pow", pow),
    ("sin", sin),
    ("sqrt", sqrt),
];

fn init_math() -> Container<Module> {
    let mut module = Module::new_builtin("math");
    module.insert("pi", TreewalkValue::Float(std::f64::consts::PI));
    module.insert("e", TreewalkValue::Float(std::f64::consts::E));
    module.insert("tau", TreewalkValue::Float(std::f64::consts::TAU));
    module.insert("inf", TreewalkValue::Float(f64::INFINITY));
    module.insert("nan", TreewalkValue::Float(f64::NAN));
    for (name, func) in MATH_FUNCTIONS {
        module.insert(name, TreewalkValue::BuiltinFunction(Builtin::new(*name, *func)));
    }
    Container::new(module)
}

fn float_arg(interpreter: &TreewalkInterpreter, args: &Args, index: usize) -> TreewalkResult<f64> {
    args.get_arg_or_none(index).as_float().raise(interpreter)
}

fn math_domain_error(interpreter: &TreewalkInterpreter) -> TreewalkResult<TreewalkValue> {
    Exception::value_error("math domain error").raise(interpreter)
}

/// Round toward an integer, keeping ints as they are.
fn round_with(
    interpreter: &TreewalkInterpreter,
    args: Args,
    name: &str,
    op: fn(f64) -> f64,
) -> TreewalkResult<TreewalkValue> {
    check_args(&args, name, 1, 1).raise(interpreter)?;
    if let TreewalkValue::Int(i) = args.get_arg_or_none(0) {
        return Ok(TreewalkValue::Int(i));
    }
    let f = op(float_arg(interpreter, &args, 0)?);
    if !f.is_finite() {
        return Exception::overflow_error("cannot convert float infinity to integer")
            .raise(interpreter);
    }
    Ok(TreewalkValue::Int(f as i64))
}

fn floor(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    round_with(interpreter, args, "floor", f64::floor)
}

fn ceil(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    round_with(interpreter, args, "ceil", f64::ceil)
}

fn unary(
    interpreter: &TreewalkInterpreter,
    args: Args,
    name: &str,
    op: fn(f64) -> f64,
) -> TreewalkResult<TreewalkValue> {
    check_args(&args, name, 1, 1).raise(interpreter)?;
    Ok(TreewalkValue::Float(op(float_arg(interpreter, &args, 0)?)))
}

fn fabs(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    unary(interpreter, args, "fabs", f64::abs)
}

fn sin(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    unary(interpreter, args, "sin", f64::sin)
}

fn cos(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    unary(interpreter, args, "cos", f64::cos)
}

fn exp(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "exp", 1, 1).raise(interpreter)?;
    let result = float_arg(interpreter, &args, 0)?.exp();
    if result.is_infinite() {
        return Exception::overflow_error("math range error").raise(interpreter);
    }
    Ok(TreewalkValue::Float(result))
}

fn sqrt(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "sqrt", 1, 1).raise(interpreter)?;
    let x = float_arg(interpreter, &args, 0)?;
    if x < 0.0 {
        return math_domain_error(interpreter);
    }
    Ok(TreewalkValue::Float(x.sqrt()))
}

fn log(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "log", 1, 2).raise(interpreter)?;
    let x = float_arg(interpreter, &args, 0)?;
    if x <= 0.0 {
        return math_domain_error(interpreter);
    }
    match args.get_arg(1) {
        Some(_) => {
            let base = float_arg(interpreter, &args, 1)?;
            if base <= 0.0 || base == 1.0 {
                return math_domain_error(interpreter);
            }
            Ok(TreewalkValue::Float(x.ln() / base.ln()))
        }
        None => Ok(TreewalkValue::Float(x.ln())),
    }
}

fn pow(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "pow", 2, 2).raise(interpreter)?;
    let (x, y) = (float_arg(interpreter, &args, 0)?, float_arg(interpreter, &args, 1)?);
    if x == 0.0 && y < 0.0 {
        return math_domain_error(interpreter);
    }
    let result = x.powf(y);
    if result.is_nan() && !x.is_nan() && !y.is_nan() {
        return math_domain_error(interpreter);
    }
    Ok(TreewalkValue::Float(result))
}

fn gcd(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    let mut result: i64 = 0;
    for value in args.positional() {
        let mut a = result.unsigned_abs();
        let mut b = value.as_int().raise(interpreter)?.unsigned_abs();
        while b != 0 {
            (a, b) = (b, a % b);
        }
        result = i64::try_from(a)
            .or_else(|_| Exception::overflow_error("integer overflow").raise(interpreter))?;
    }
    Ok(TreewalkValue::Int(result))
}

fn isnan(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "isnan", 1, 1).raise(interpreter)?;
    Ok(TreewalkValue::Bool(float_arg(interpreter, &args, 0)?.is_nan()))
}

fn isinf(interpreter: &TreewalkInterpreter, args: Args) -> TreewalkResult<TreewalkValue> {
    check_args(&args, "isinf", 1, 1).raise(interpreter)?;
    Ok(TreewalkValue::Bool(float_arg(interpreter, &args, 0)?.is_infinite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treewalk::test_utils::*;

    #[test]
    fn only_known_names_are_builtin() {
        assert!(builtin_module(&ModuleName::from_dotted("sys")).is_some());
        assert!(builtin_module(&ModuleName::from_dotted("os")).is_none());

        let a = builtin_module(&ModuleName::from_dotted("math")).unwrap();
        let b = builtin_module(&ModuleName::from_dotted("math")).unwrap();
        assert!(a.same_identity(&b));
    }

    #[test]
    fn math_functions() {
        let ctx = run(r#"
import math
from math import sqrt, floor

root = sqrt(16)
floored = floor(-2.5)
ceiled = math.ceil(2.1)
divisor = math.gcd(12, -18)
logged = math.log(8, 2)
flags = [math.isnan(math.nan), math.isinf(math.inf), math.isinf(1.0)]
"#);
        assert_read_eq!(ctx, "root", TreewalkValue::Float(4.0));
        assert_read_eq!(ctx, "floored", TreewalkValue::Int(-3));
        assert_read_eq!(ctx, "ceiled", TreewalkValue::Int(3));
        assert_read_eq!(ctx, "divisor", TreewalkValue::Int(6));
        assert_read_eq!(ctx, "logged", TreewalkValue::Float(3.0));
        assert_read_repr!(ctx, "flags", "[True, True, False]");

        let e = run_expect_error("import math\nmath.sqrt(-1)");
        assert_value_error!(e, "math domain error");
    }

    #[test]
    fn sys_attributes() {
        let ctx = run("import sys\nmajor = sys.version_info[0]\nbig = sys.maxsize > 2 ** 40");
        assert_read_eq!(ctx, "major", TreewalkValue::Int(3));
        assert_read_eq!(ctx, "big", TreewalkValue::Bool(true));
    }
}
