use crate::{
    core::Container,
    domain::{ScriptException, Value},
    parser::types::Ast,
    treewalk::{
        interpreter::ModuleLookup,
        types::{Exception, Module},
        utils::Args,
        RaisedException, TreewalkInterpreter, TreewalkValue,
    },
};

/// The entry point into the interpreter for code outside of it: runs module bodies and calls
/// script objects, converting [`Value`]s at the boundary.
pub struct TreewalkContext<'a> {
    interpreter: TreewalkInterpreter<'a>,
}

impl<'a> TreewalkContext<'a> {
    /// `lookup` resolves `import` statements which do not name a builtin module.
    pub fn new(lookup: &'a dyn ModuleLookup) -> Self {
        Self {
            interpreter: TreewalkInterpreter::new(lookup),
        }
    }

    /// Collect everything scripts `print` instead of writing it to stdout.
    pub fn with_output(self, output: Container<String>) -> Self {
        Self {
            interpreter: self.interpreter.with_output(output),
        }
    }

    pub fn execute_module(
        &self,
        module: &Container<Module>,
        ast: &Ast,
    ) -> Result<(), ScriptException> {
        self.interpreter
            .execute_module(module, ast)
            .map_err(|e| self.interpreter.to_script_exception(&e))
    }

    /// Call `callee` with arguments from outside the interpreter.
    pub fn call(
        &self,
        callee: &TreewalkValue,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    ) -> Result<Value, ScriptException> {
        let detach = |e: RaisedException| self.interpreter.to_script_exception(&e);
        let raise = |e: Exception| detach(self.interpreter.raise(e));

        let positional = args
            .into_iter()
            .map(TreewalkValue::from_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(raise)?;
        let keyword = kwargs
            .into_iter()
            .map(|(name, value)| TreewalkValue::from_domain(value).map(|value| (name, value)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(raise)?;

        self.interpreter
            .call_value(callee, Args::new(positional).with_keywords(keyword))
            .map(|value| value.to_domain())
            .map_err(detach)
    }
}
