use std::sync::Arc;

use tracing::trace;

use crate::{
    core::{ensure_sufficient_stack, Container},
    parser::types::{
        Ast, BinOp, ConditionalAst, ExceptHandler, Expr, FunctionDef, Param, Params, RaiseKind,
        Statement, StatementKind,
    },
    treewalk::{
        result::Raise,
        types::{builtin_classes, Class, Exception, Function, FunctionBody},
        utils::Args,
        Environment, RaisedException, Scope, TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

/// How control leaves a block.
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return(TreewalkValue),
}

impl TreewalkInterpreter<'_> {
    /// A `return`, `break` or `continue` which escaped the construct it belongs to.
    pub(super) fn stray_flow(&self, flow: Flow) -> RaisedException {
        let message = match flow {
            Flow::Return(_) => "'return' outside function",
            Flow::Break => "'break' outside loop",
            Flow::Continue | Flow::Normal => "'continue' not properly in loop",
        };
        self.raise(Exception::syntax_error(message))
    }

    pub fn execute_block(&self, ast: &Ast, env: &Environment) -> TreewalkResult<Flow> {
        for statement in ast {
            match self.execute_statement(statement, env)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn execute_statement(&self, statement: &Statement, env: &Environment) -> TreewalkResult<Flow> {
        ensure_sufficient_stack(|| {
            self.set_line(statement.line);

            match &statement.kind {
                StatementKind::Expression(expr) => {
                    self.evaluate_expr(expr, env)?;
                }
                StatementKind::Assignment { left, right } => {
                    let value = self.evaluate_expr(right, env)?;
                    self.assign_target(left, value, env)?;
                }
                StatementKind::MultipleAssignment { left, right } => {
                    let value = self.evaluate_expr(right, env)?;
                    for target in left {
                        self.assign_target(target, value.clone(), env)?;
                    }
                }
                StatementKind::CompoundAssignment {
                    operator,
                    target,
                    value,
                } => self.compound_assign(*operator, target, value, env)?,
                StatementKind::FunctionDef(def) => self.define_function(def, statement.line, env)?,
                StatementKind::ClassDef {
                    name,
                    parents,
                    body,
                    decorators,
                } => self.define_class(name, parents, body, decorators, env)?,
                StatementKind::Return(expr) => {
                    let value = match expr {
                        Some(expr) => self.evaluate_expr(expr, env)?,
                        None => TreewalkValue::None,
                    };
                    return Ok(Flow::Return(value));
                }
                StatementKind::IfElse {
                    if_part,
                    elif_parts,
                    else_part,
                } => return self.execute_if(if_part, elif_parts, else_part.as_ref(), env),
                StatementKind::WhileLoop {
                    cond_ast,
                    else_part,
                } => return self.execute_while(cond_ast, else_part.as_ref(), env),
                StatementKind::ForInLoop {
                    index,
                    iterable,
                    body,
                    else_part,
                } => return self.execute_for(index, iterable, body, else_part.as_ref(), env),
                StatementKind::Break => return Ok(Flow::Break),
                StatementKind::Continue => return Ok(Flow::Continue),
                StatementKind::Pass => {}
                StatementKind::RegularImport(imports) => {
                    for import in imports {
                        self.import_regular(import, env)?;
                    }
                }
                StatementKind::SelectiveImport { import_path, mode } => {
                    self.import_from(import_path, mode, env)?
                }
                StatementKind::Global(names) => {
                    for name in names {
                        env.mark_global(name);
                    }
                }
                StatementKind::Nonlocal(names) => {
                    for name in names {
                        env.mark_nonlocal(name).raise(self)?;
                    }
                }
                StatementKind::Raise(kind) => return Err(self.execute_raise(kind.as_ref(), env)?),
                StatementKind::TryExcept {
                    try_block,
                    handlers,
                    else_block,
                    finally_block,
                } => {
                    return self.execute_try(
                        try_block,
                        handlers,
                        else_block.as_ref(),
                        finally_block.as_ref(),
                        env,
                    )
                }
                StatementKind::Assert { condition, message } => {
                    let condition = self.evaluate_expr(condition, env)?;
                    if !self.is_truthy(&condition)? {
                        let payload = match message {
                            Some(message) => vec![self.evaluate_expr(message, env)?],
                            None => vec![],
                        };
                        return Exception::assertion_error(payload).raise(self);
                    }
                }
                StatementKind::Delete(targets) => {
                    for target in targets {
                        self.delete_target(target, env)?;
                    }
                }
            }

            Ok(Flow::Normal)
        })
    }

    /// Bind `value` to an assignment target, unpacking tuples and lists.
    pub(super) fn assign_target(
        &self,
        target: &Expr,
        value: TreewalkValue,
        env: &Environment,
    ) -> TreewalkResult<()> {
        match target {
            Expr::Variable(name) => env.store(name, value),
            Expr::Tuple(targets) | Expr::List(targets) => {
                let items = match self.iterate(&value) {
                    Ok(items) => items.collect::<Vec<_>>(),
                    Err(_) => {
                        return Exception::type_error(format!(
                            "cannot unpack non-iterable {} object",
                            value.type_name()
                        ))
                        .raise(self)
                    }
                };
                let expected = targets.len();
                if items.len() > expected {
                    return Exception::value_error(format!(
                        "too many values to unpack (expected {expected})"
                    ))
                    .raise(self);
                }
                if items.len() < expected {
                    return Exception::value_error(format!(
                        "not enough values to unpack (expected {expected}, got {})",
                        items.len()
                    ))
                    .raise(self);
                }
                for (target, item) in targets.iter().zip(items) {
                    self.assign_target(target, item, env)?;
                }
            }
            Expr::MemberAccess { object, field } => {
                let object = self.evaluate_expr(object, env)?;
                self.set_attr(&object, field, value)?;
            }
            Expr::IndexAccess { object, index } => {
                let object = self.evaluate_expr(object, env)?;
                let index = self.evaluate_expr(index, env)?;
                self.set_item(&object, index, value)?;
            }
            Expr::SliceOperation { object, params } => {
                let object = self.evaluate_expr(object, env)?;
                let bounds = self.evaluate_slice(params, env)?;
                self.set_slice(&object, bounds, value)?;
            }
            _ => return Exception::syntax_error("cannot assign to expression").raise(self),
        }
        Ok(())
    }

    fn compound_assign(
        &self,
        op: BinOp,
        target: &Expr,
        value: &Expr,
        env: &Environment,
    ) -> TreewalkResult<()> {
        match target {
            Expr::Variable(name) => {
                let current = self.load_name(name, env)?;
                let value = self.evaluate_expr(value, env)?;
                let result = self.inplace_op(op, &current, &value)?;
                env.store(name, result);
            }
            Expr::MemberAccess { object, field } => {
                let object = self.evaluate_expr(object, env)?;
                let current = self.get_attr(&object, field)?;
                let value = self.evaluate_expr(value, env)?;
                let result = self.inplace_op(op, &current, &value)?;
                self.set_attr(&object, field, result)?;
            }
            Expr::IndexAccess { object, index } => {
                let object = self.evaluate_expr(object, env)?;
                let index = self.evaluate_expr(index, env)?;
                let current = self.get_item(&object, &index)?;
                let value = self.evaluate_expr(value, env)?;
                let result = self.inplace_op(op, &current, &value)?;
                self.set_item(&object, index, result)?;
            }
            _ => {
                return Exception::syntax_error(
                    "illegal expression for augmented assignment",
                )
                .raise(self)
            }
        }
        Ok(())
    }

    fn delete_target(&self, target: &Expr, env: &Environment) -> TreewalkResult<()> {
        match target {
            Expr::Variable(name) => {
                if !env.delete(name) {
                    return Exception::name_error(name).raise(self);
                }
            }
            Expr::Tuple(targets) | Expr::List(targets) => {
                for target in targets {
                    self.delete_target(target, env)?;
                }
            }
            Expr::MemberAccess { object, field } => {
                let object = self.evaluate_expr(object, env)?;
                self.delete_attr(&object, field)?;
            }
            Expr::IndexAccess { object, index } => {
                let object = self.evaluate_expr(object, env)?;
                let index = self.evaluate_expr(index, env)?;
                self.delete_item(&object, &index)?;
            }
            Expr::SliceOperation { object, params } => {
                let object = self.evaluate_expr(object, env)?;
                let bounds = self.evaluate_slice(params, env)?;
                self.delete_slice(&object, bounds)?;
            }
            _ => return Exception::syntax_error("cannot delete expression").raise(self),
        }
        Ok(())
    }

    /// Build a function object, evaluating its default values now.
    pub(super) fn make_function(
        &self,
        name: &str,
        params: &Params,
        body: FunctionBody,
        line: usize,
        env: &Environment,
    ) -> TreewalkResult<Container<Function>> {
        let evaluate_defaults = |params: &[Param]| {
            params
                .iter()
                .map(|p| {
                    p.default
                        .as_ref()
                        .map(|d| self.evaluate_expr(d, env))
                        .transpose()
                })
                .collect::<TreewalkResult<Vec<_>>>()
        };

        Ok(Container::new(Function {
            name: name.to_string(),
            params: params.clone(),
            defaults: evaluate_defaults(&params.args)?,
            kwonly_defaults: evaluate_defaults(&params.kwonly)?,
            body,
            module: env.module().clone(),
            enclosing: env.captured_scopes(),
            defining_class: None,
            line,
        }))
    }

    fn apply_decorators(
        &self,
        decorators: &[Expr],
        value: TreewalkValue,
        env: &Environment,
    ) -> TreewalkResult<TreewalkValue> {
        let decorators = decorators
            .iter()
            .map(|d| self.evaluate_expr(d, env))
            .collect::<TreewalkResult<Vec<_>>>()?;

        decorators.iter().rev().try_fold(value, |value, decorator| {
            self.call_value(decorator, Args::new(vec![value]))
        })
    }

    fn define_function(
        &self,
        def: &FunctionDef,
        line: usize,
        env: &Environment,
    ) -> TreewalkResult<()> {
        let body = FunctionBody::Block(Arc::new(def.body.clone()));
        let function = self.make_function(&def.name, &def.params, body, line, env)?;
        let value = self.apply_decorators(&def.decorators, TreewalkValue::Function(function), env)?;
        env.store(&def.name, value);
        Ok(())
    }

    fn define_class(
        &self,
        name: &str,
        parents: &[Expr],
        body: &Ast,
        decorators: &[Expr],
        env: &Environment,
    ) -> TreewalkResult<()> {
        let mut bases = vec![];
        for parent in parents {
            match self.evaluate_expr(parent, env)? {
                TreewalkValue::Class(class) => bases.push(class),
                other => {
                    return Exception::type_error(format!(
                        "bases must be types, not {}",
                        other.type_name()
                    ))
                    .raise(self)
                }
            }
        }

        let module_name = env.module().borrow().name().clone();
        let mut namespace = Scope::default();
        namespace.insert("__module__", TreewalkValue::Str(module_name.as_str()));
        let namespace = Container::new(namespace);

        let class_env = env.for_class_body(namespace.clone());
        match self.execute_block(body, &class_env)? {
            Flow::Normal => {}
            flow => return Err(self.stray_flow(flow)),
        }

        let attrs = namespace.borrow().clone();
        let class = Container::new(Class::new(name, module_name, bases, attrs));
        trace!(class = name, "defined class");

        let methods: Vec<_> = class
            .borrow()
            .attrs
            .iter()
            .filter_map(|(_, value)| match value {
                TreewalkValue::Function(f) => Some(f.clone()),
                _ => None,
            })
            .collect();
        for method in methods {
            let mut method = method.borrow_mut();
            if method.defining_class.is_none() {
                method.defining_class = Some(class.clone());
            }
        }

        let value = self.apply_decorators(decorators, TreewalkValue::Class(class), env)?;
        env.store(name, value);
        Ok(())
    }

    fn execute_if(
        &self,
        if_part: &ConditionalAst,
        elif_parts: &[ConditionalAst],
        else_part: Option<&Ast>,
        env: &Environment,
    ) -> TreewalkResult<Flow> {
        for part in std::iter::once(if_part).chain(elif_parts) {
            let condition = self.evaluate_expr(&part.condition, env)?;
            if self.is_truthy(&condition)? {
                return self.execute_block(&part.ast, env);
            }
        }
        match else_part {
            Some(ast) => self.execute_block(ast, env),
            None => Ok(Flow::Normal),
        }
    }

    fn execute_while(
        &self,
        cond_ast: &ConditionalAst,
        else_part: Option<&Ast>,
        env: &Environment,
    ) -> TreewalkResult<Flow> {
        loop {
            let condition = self.evaluate_expr(&cond_ast.condition, env)?;
            if !self.is_truthy(&condition)? {
                break;
            }
            match self.execute_block(&cond_ast.ast, env)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
        }
        match else_part {
            Some(ast) => self.execute_block(ast, env),
            None => Ok(Flow::Normal),
        }
    }

    fn execute_for(
        &self,
        index: &Expr,
        iterable: &Expr,
        body: &Ast,
        else_part: Option<&Ast>,
        env: &Environment,
    ) -> TreewalkResult<Flow> {
        let iterable = self.evaluate_expr(iterable, env)?;
        for item in self.iterate(&iterable)? {
            self.assign_target(index, item, env)?;
            match self.execute_block(body, env)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
        }
        match else_part {
            Some(ast) => self.execute_block(ast, env),
            None => Ok(Flow::Normal),
        }
    }

    /// Turn a raised value (a class or an instance) into an exception.
    fn to_exception(&self, value: TreewalkValue) -> TreewalkResult<Exception> {
        let value = match value {
            TreewalkValue::Class(class) if class.borrow().is_exception() => {
                self.instantiate(&class, Args::default())?
            }
            other => other,
        };
        if let TreewalkValue::Object(object) = &value {
            let kind = object.borrow().class.borrow().exception_kind;
            if let Some(kind) = kind {
                return Ok(Exception::from_instance(kind, object.clone()));
            }
        }
        Exception::type_error("exceptions must derive from BaseException").raise(self)
    }

    /// Produces the exception to propagate, or an error raised while evaluating the statement.
    fn execute_raise(
        &self,
        kind: Option<&RaiseKind>,
        env: &Environment,
    ) -> TreewalkResult<RaisedException> {
        let Some(RaiseKind { exception, cause }) = kind else {
            let active = self.handling.borrow().last().cloned();
            return match active {
                Some(raised) => Ok(raised),
                None => Exception::runtime_error("No active exception to reraise").raise(self),
            };
        };

        let value = self.evaluate_expr(exception, env)?;
        let exception = self.to_exception(value)?;

        if let Some(cause) = cause {
            let cause = match self.evaluate_expr(cause, env)? {
                TreewalkValue::None => TreewalkValue::None,
                value => match self.to_exception(value) {
                    Ok(cause) => cause.to_value(),
                    Err(_) => {
                        return Exception::type_error(
                            "exception causes must derive from BaseException",
                        )
                        .raise(self)
                    }
                },
            };
            if let Some(instance) = &exception.instance {
                instance.borrow_mut().attrs.insert("__cause__", cause);
            }
        }

        Ok(self.raise(exception))
    }

    fn execute_try(
        &self,
        try_block: &Ast,
        handlers: &[ExceptHandler],
        else_block: Option<&Ast>,
        finally_block: Option<&Ast>,
        env: &Environment,
    ) -> TreewalkResult<Flow> {
        let result = match self.execute_block(try_block, env) {
            Ok(Flow::Normal) => match else_block {
                Some(ast) => self.execute_block(ast, env),
                None => Ok(Flow::Normal),
            },
            Ok(flow) => Ok(flow),
            Err(raised) => self.handle_exception(raised, handlers, env),
        };

        if let Some(finally_block) = finally_block {
            // A `finally` which leaves by itself overrides whatever the try statement did.
            match self.execute_block(finally_block, env)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }

        result
    }

    fn handle_exception(
        &self,
        mut raised: RaisedException,
        handlers: &[ExceptHandler],
        env: &Environment,
    ) -> TreewalkResult<Flow> {
        for handler in handlers {
            let matches = match &handler.kinds {
                None => true,
                Some(kinds) => {
                    let kinds = self.evaluate_expr(kinds, env)?;
                    self.exception_matches(&raised.exception, &kinds)?
                }
            };
            if !matches {
                continue;
            }

            // Materialize the instance once so `raise` inside the handler re-raises this object.
            let value = raised.exception.to_value();
            if let TreewalkValue::Object(instance) = &value {
                raised.exception.instance = Some(instance.clone());
            }
            trace!(exception = %raised.exception.type_name(), "handling exception");

            if let Some(alias) = &handler.alias {
                env.store(alias, value);
            }
            self.handling.borrow_mut().push(raised);
            let result = self.execute_block(&handler.block, env);
            self.handling.borrow_mut().pop();
            if let Some(alias) = &handler.alias {
                env.delete(alias);
            }
            return result;
        }

        Err(raised)
    }

    fn exception_matches(
        &self,
        exception: &Exception,
        kinds: &TreewalkValue,
    ) -> TreewalkResult<bool> {
        match kinds {
            TreewalkValue::Class(class) => {
                if !class.borrow().is_exception() {
                    return Exception::type_error_must_inherit_base_exception().raise(self);
                }
                let raised_class = match &exception.instance {
                    Some(instance) => instance.borrow().class.clone(),
                    None => builtin_classes().exception(exception.kind),
                };
                Ok(raised_class.is_subclass_of(class))
            }
            TreewalkValue::Tuple(kinds) => {
                for kind in kinds.items() {
                    if self.exception_matches(exception, kind)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Exception::type_error_must_inherit_base_exception().raise(self),
        }
    }
}
