use std::sync::Arc;

use crate::{
    core::{ensure_sufficient_stack, Container},
    parser::types::{
        CallArgs, Conversion, DictOperation, Expr, ExprFormat, FStringPart, ForClause,
        LogicalOp, SliceParams,
    },
    treewalk::{
        builtins,
        format::format_value,
        interpreter::SliceBounds,
        result::Raise,
        types::{Dict, Exception, FunctionBody},
        utils::Args,
        Environment, TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

impl TreewalkInterpreter<'_> {
    pub fn evaluate_expr(&self, expr: &Expr, env: &Environment) -> TreewalkResult<TreewalkValue> {
        ensure_sufficient_stack(|| {
            match expr {
                Expr::None => Ok(TreewalkValue::None),
                Expr::Ellipsis => Ok(TreewalkValue::Ellipsis),
                Expr::Boolean(b) => Ok(TreewalkValue::Bool(*b)),
                Expr::Integer(i) => Ok(TreewalkValue::Int(*i)),
                Expr::Float(f) => Ok(TreewalkValue::Float(*f)),
                Expr::StringLiteral(s) => Ok(TreewalkValue::Str(s.clone())),
                Expr::FString(parts) => self.evaluate_fstring(parts, env),
                Expr::Variable(name) => self.load_name(name, env),
                Expr::List(items) => Ok(TreewalkValue::new_list(self.evaluate_exprs(items, env)?)),
                Expr::Tuple(items) => Ok(TreewalkValue::new_tuple(self.evaluate_exprs(items, env)?)),
                Expr::Dict(operations) => self.evaluate_dict(operations, env),
                Expr::ListComprehension { element, clauses } => {
                    let scope = env.for_comprehension();
                    let mut items = vec![];
                    self.run_clauses(clauses, &scope, &mut |env| {
                        items.push(self.evaluate_expr(element, env)?);
                        Ok(())
                    })?;
                    Ok(TreewalkValue::new_list(items))
                }
                Expr::DictComprehension {
                    key,
                    value,
                    clauses,
                } => {
                    let scope = env.for_comprehension();
                    let mut dict = Dict::default();
                    self.run_clauses(clauses, &scope, &mut |env| {
                        let key = self.evaluate_expr(key, env)?;
                        let value = self.evaluate_expr(value, env)?;
                        dict.insert(key, value).raise(self)
                    })?;
                    Ok(TreewalkValue::Dict(Container::new(dict)))
                }
                Expr::BinaryOperation { left, op, right } => {
                    let left = self.evaluate_expr(left, env)?;
                    let right = self.evaluate_expr(right, env)?;
                    self.binary_op(*op, &left, &right)
                }
                Expr::UnaryOperation { op, right } => {
                    let right = self.evaluate_expr(right, env)?;
                    self.unary_op(*op, &right)
                }
                Expr::LogicalOperation { left, op, right } => {
                    let left = self.evaluate_expr(left, env)?;
                    let truthy = self.is_truthy(&left)?;
                    match (op, truthy) {
                        (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(left),
                        _ => self.evaluate_expr(right, env),
                    }
                }
                Expr::ComparisonChain { left, ops } => {
                    let mut current = self.evaluate_expr(left, env)?;
                    for (op, right) in ops {
                        let right = self.evaluate_expr(right, env)?;
                        if !self.compare(*op, &current, &right)? {
                            return Ok(TreewalkValue::Bool(false));
                        }
                        current = right;
                    }
                    Ok(TreewalkValue::Bool(true))
                }
                Expr::TernaryOp {
                    condition,
                    if_value,
                    else_value,
                } => {
                    let condition = self.evaluate_expr(condition, env)?;
                    if self.is_truthy(&condition)? {
                        self.evaluate_expr(if_value, env)
                    } else {
                        self.evaluate_expr(else_value, env)
                    }
                }
                Expr::FunctionCall { callee, args } => self.evaluate_call(callee, args, env),
                Expr::MemberAccess { object, field } => {
                    let object = self.evaluate_expr(object, env)?;
                    self.get_attr(&object, field)
                }
                Expr::IndexAccess { object, index } => {
                    let object = self.evaluate_expr(object, env)?;
                    let index = self.evaluate_expr(index, env)?;
                    self.get_item(&object, &index)
                }
                Expr::SliceOperation { object, params } => {
                    let object = self.evaluate_expr(object, env)?;
                    let bounds = self.evaluate_slice(params, env)?;
                    self.get_slice(&object, bounds)
                }
                Expr::Lambda { params, body } => {
                    let line = self
                        .call_stack
                        .borrow()
                        .last()
                        .map(|frame| frame.line)
                        .unwrap_or_default();
                    let body = FunctionBody::Expr(Arc::new((**body).clone()));
                    let function = self.make_function("<lambda>", params, body, line, env)?;
                    Ok(TreewalkValue::Function(function))
                }
            }
        })
    }

    /// Resolve a name through the environment, then the builtins.
    pub fn load_name(&self, name: &str, env: &Environment) -> TreewalkResult<TreewalkValue> {
        match env.load(name).or_else(|| builtins::lookup(name)) {
            Some(value) => Ok(value),
            None => Exception::name_error(name).raise(self),
        }
    }

    fn evaluate_exprs(&self, exprs: &[Expr], env: &Environment) -> TreewalkResult<Vec<TreewalkValue>> {
        exprs.iter().map(|e| self.evaluate_expr(e, env)).collect()
    }

    fn evaluate_fstring(&self, parts: &[FStringPart], env: &Environment) -> TreewalkResult<TreewalkValue> {
        let mut out = String::new();
        for part in parts {
            match part {
                FStringPart::String(s) => out.push_str(s),
                FStringPart::Expr(ExprFormat {
                    expr,
                    conversion,
                    spec,
                }) => {
                    let value = self.evaluate_expr(expr, env)?;
                    let value = match conversion {
                        Some(Conversion::Str) => TreewalkValue::Str(self.str_of(&value)?),
                        Some(Conversion::Repr) => TreewalkValue::Str(self.repr_of(&value)?),
                        None => value,
                    };
                    let rendered = match spec {
                        Some(spec) => format_value(self, &value, spec)?,
                        None => self.str_of(&value)?,
                    };
                    out.push_str(&rendered);
                }
            }
        }
        Ok(TreewalkValue::Str(out))
    }

    fn evaluate_dict(
        &self,
        operations: &[DictOperation],
        env: &Environment,
    ) -> TreewalkResult<TreewalkValue> {
        let mut dict = Dict::default();
        for operation in operations {
            match operation {
                DictOperation::Pair(key, value) => {
                    let key = self.evaluate_expr(key, env)?;
                    let value = self.evaluate_expr(value, env)?;
                    dict.insert(key, value).raise(self)?;
                }
                DictOperation::Unpack(expr) => match self.evaluate_expr(expr, env)? {
                    TreewalkValue::Dict(other) => {
                        let entries = other.borrow().entries().to_vec();
                        for (key, value) in entries {
                            dict.insert(key, value).raise(self)?;
                        }
                    }
                    other => {
                        return Exception::type_error(format!(
                            "'{}' object is not a mapping",
                            other.type_name()
                        ))
                        .raise(self)
                    }
                },
            }
        }
        Ok(TreewalkValue::Dict(Container::new(dict)))
    }

    /// Run the `for ... in ... if ...` clauses of a comprehension, calling `emit` for every
    /// combination that passes the filters.
    fn run_clauses(
        &self,
        clauses: &[ForClause],
        env: &Environment,
        emit: &mut dyn FnMut(&Environment) -> TreewalkResult<()>,
    ) -> TreewalkResult<()> {
        let Some((clause, rest)) = clauses.split_first() else {
            return emit(env);
        };

        let iterable = self.evaluate_expr(&clause.iterable, env)?;
        'items: for item in self.iterate(&iterable)? {
            self.assign_target(&clause.target, item, env)?;
            for condition in &clause.conditions {
                let condition = self.evaluate_expr(condition, env)?;
                if !self.is_truthy(&condition)? {
                    continue 'items;
                }
            }
            self.run_clauses(rest, env, emit)?;
        }
        Ok(())
    }

    pub(super) fn evaluate_slice(
        &self,
        params: &SliceParams,
        env: &Environment,
    ) -> TreewalkResult<SliceBounds> {
        let bound = |expr: &Option<Box<Expr>>| -> TreewalkResult<Option<i64>> {
            let Some(expr) = expr else {
                return Ok(None);
            };
            match self.evaluate_expr(expr, env)? {
                TreewalkValue::None => Ok(None),
                TreewalkValue::Int(i) => Ok(Some(i)),
                TreewalkValue::Bool(b) => Ok(Some(b as i64)),
                _ => Exception::type_error(
                    "slice indices must be integers or None or have an __index__ method",
                )
                .raise(self),
            }
        };

        let bounds = SliceBounds {
            start: bound(&params.start)?,
            stop: bound(&params.stop)?,
            step: bound(&params.step)?,
        };
        if bounds.step == Some(0) {
            return Exception::value_error("slice step cannot be zero").raise(self);
        }
        Ok(bounds)
    }

    fn evaluate_call(
        &self,
        callee: &Expr,
        args: &CallArgs,
        env: &Environment,
    ) -> TreewalkResult<TreewalkValue> {
        if let Expr::Variable(name) = callee {
            if name.as_str() == "super" && *args == CallArgs::default() && env.load(name).is_none() {
                return self.zero_arg_super(env);
            }
        }

        let callee = self.evaluate_expr(callee, env)?;
        let args = self.evaluate_call_args(args, env)?;
        self.call_value(&callee, args)
    }

    fn evaluate_call_args(&self, args: &CallArgs, env: &Environment) -> TreewalkResult<Args> {
        let mut positional = self.evaluate_exprs(&args.args, env)?;
        if let Some(args_var) = &args.args_var {
            let extra = self.evaluate_expr(args_var, env)?;
            match self.collect_items(&extra) {
                Ok(items) => positional.extend(items),
                Err(_) => {
                    return Exception::type_error(format!(
                        "argument after * must be an iterable, not {}",
                        extra.type_name()
                    ))
                    .raise(self)
                }
            }
        }

        let mut keyword = args
            .kwargs
            .iter()
            .map(|(name, expr)| Ok((name.to_string(), self.evaluate_expr(expr, env)?)))
            .collect::<TreewalkResult<Vec<_>>>()?;
        if let Some(kwargs_var) = &args.kwargs_var {
            match self.evaluate_expr(kwargs_var, env)? {
                TreewalkValue::Dict(dict) => {
                    let entries = dict.borrow().entries().to_vec();
                    for (key, value) in entries {
                        let TreewalkValue::Str(key) = key else {
                            return Exception::type_error("keywords must be strings").raise(self);
                        };
                        if keyword.iter().any(|(k, _)| *k == key) {
                            return Exception::type_error(format!(
                                "got multiple values for keyword argument '{key}'"
                            ))
                            .raise(self);
                        }
                        keyword.push((key, value));
                    }
                }
                other => {
                    return Exception::type_error(format!(
                        "argument after ** must be a mapping, not {}",
                        other.type_name()
                    ))
                    .raise(self)
                }
            }
        }

        Ok(Args::new(positional).with_keywords(keyword))
    }

    /// `super()` inside a method: the class that defined the method, bound to its first
    /// argument.
    fn zero_arg_super(&self, env: &Environment) -> TreewalkResult<TreewalkValue> {
        let Some(function) = env.function() else {
            return Exception::runtime_error("super(): no arguments").raise(self);
        };
        let (class, first_param) = {
            let function = function.borrow();
            (
                function.defining_class.clone(),
                function.params.args.first().map(|p| p.arg.clone()),
            )
        };
        let Some(class) = class else {
            return Exception::runtime_error("super(): __class__ cell not found").raise(self);
        };
        let receiver = first_param.and_then(|name| env.load(&name));
        match receiver {
            Some(receiver) => self.make_super(class, receiver),
            None => Exception::runtime_error("super(): no arguments").raise(self),
        }
    }
}
