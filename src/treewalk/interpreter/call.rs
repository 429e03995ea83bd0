use crate::{
    core::{ensure_sufficient_stack, Container},
    domain::{DebugStackFrame, Dunder},
    treewalk::{
        interpreter::Flow,
        result::Raise,
        types::{Exception, Function, FunctionBody},
        utils::{bind_args, Args},
        Environment, TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

impl TreewalkInterpreter<'_> {
    /// Call any callable value.
    pub fn call_value(&self, callee: &TreewalkValue, args: Args) -> TreewalkResult<TreewalkValue> {
        ensure_sufficient_stack(|| {
            match callee {
                TreewalkValue::Function(function) => self.call_function(function, args),
                TreewalkValue::Method(method) => {
                    self.call_value(&method.function, args.with_bound(method.receiver.clone()))
                }
                TreewalkValue::BuiltinFunction(builtin) => builtin.call(self, args),
                TreewalkValue::Class(class) => self.instantiate(class, args),
                TreewalkValue::Object(object) => {
                    let class = object.borrow().class.clone();
                    match class.lookup(&Dunder::Call) {
                        Some(method) => self.call_value(&method, args.with_bound(callee.clone())),
                        None => self.not_callable(callee),
                    }
                }
                _ => self.not_callable(callee),
            }
        })
    }

    fn not_callable<T>(&self, callee: &TreewalkValue) -> TreewalkResult<T> {
        Exception::type_error(format!(
            "'{}' object is not callable",
            callee.type_name()
        ))
        .raise(self)
    }

    /// Run a script function in a fresh frame.
    pub fn call_function(
        &self,
        function: &Container<Function>,
        args: Args,
    ) -> TreewalkResult<TreewalkValue> {
        let (frame, body, scope) = {
            let f = function.borrow();
            let frame = DebugStackFrame::new(f.name.clone(), f.module.borrow().path(), f.line);
            (frame, f.body.clone(), bind_args(&f, args))
        };
        let scope = scope.raise(self)?;

        self.push_frame(frame)?;
        let env = Environment::for_function(function, scope);
        let result = match body {
            FunctionBody::Block(ast) => match self.execute_block(&ast, &env) {
                Ok(Flow::Normal) => Ok(TreewalkValue::None),
                Ok(Flow::Return(value)) => Ok(value),
                Ok(flow) => Err(self.stray_flow(flow)),
                Err(e) => Err(e),
            },
            FunctionBody::Expr(expr) => self.evaluate_expr(&expr, &env),
        };
        self.pop_frame();
        result
    }
}
