use std::cell::RefCell;

use tracing::trace;

use crate::{
    core::Container,
    domain::{DebugCallStack, DebugStackFrame, ModuleName, ScriptException, ToDebugStackFrame},
    parser::types::Ast,
    treewalk::{
        types::{Exception, Module},
        Environment, RaisedException, TreewalkResult,
    },
};

mod call;
mod expr;
mod import;
mod object;
mod operators;
mod protocols;
mod stmt;
mod subscript;

pub use operators::order;
pub use subscript::SliceBounds;
use stmt::Flow;

/// Deepest nesting of script function calls before `RecursionError` is raised. Matches
/// CPython's default recursion limit.
pub const MAX_CALL_DEPTH: usize = 1000;

/// Resolves `import` statements against modules loaded outside the interpreter.
pub trait ModuleLookup {
    fn lookup_module(&self, name: &ModuleName) -> Option<Container<Module>>;
}

impl ModuleLookup for std::collections::HashMap<ModuleName, Container<Module>> {
    fn lookup_module(&self, name: &ModuleName) -> Option<Container<Module>> {
        self.get(name).cloned()
    }
}

pub struct TreewalkInterpreter<'a> {
    lookup: &'a dyn ModuleLookup,
    call_stack: RefCell<Vec<DebugStackFrame>>,
    /// Exceptions being handled by an enclosing `except` block, innermost last. A bare `raise`
    /// re-raises the last one.
    handling: RefCell<Vec<RaisedException>>,
    /// When set, `print` appends here instead of writing to stdout.
    output: Option<Container<String>>,
    /// Containers whose `repr` is being computed, to render cycles as `[...]`.
    repr_guard: RefCell<Vec<usize>>,
}

impl<'a> TreewalkInterpreter<'a> {
    pub fn new(lookup: &'a dyn ModuleLookup) -> Self {
        Self {
            lookup,
            call_stack: RefCell::new(vec![]),
            handling: RefCell::new(vec![]),
            output: None,
            repr_guard: RefCell::new(vec![]),
        }
    }

    /// Capture everything the script prints into `output`.
    pub fn with_output(mut self, output: Container<String>) -> Self {
        self.output = Some(output);
        self
    }

    /// Run `ast` as the body of `module`.
    pub fn execute_module(&self, module: &Container<Module>, ast: &Ast) -> TreewalkResult<()> {
        trace!(module = %module.borrow().name().as_str(), "executing module body");
        let frame = module.borrow().to_stack_frame();
        self.push_frame(frame)?;

        let env = Environment::for_module(module.clone());
        let result = self.execute_block(ast, &env);
        let result = match result {
            Ok(Flow::Normal) => Ok(()),
            Ok(flow) => Err(self.stray_flow(flow)),
            Err(e) => Err(e),
        };

        self.pop_frame();
        result
    }

    pub fn raise(&self, exception: Exception) -> RaisedException {
        RaisedException::new(self.debug_call_stack(), exception)
    }

    pub fn debug_call_stack(&self) -> DebugCallStack {
        DebugCallStack::new(self.call_stack.borrow().clone())
    }

    /// Detach an escaped exception from the interpreter, rendering its message with the
    /// script's own `__str__` if it defines one.
    pub fn to_script_exception(&self, raised: &RaisedException) -> ScriptException {
        let exception = &raised.exception;
        let message = self
            .str_of(&exception.to_value())
            .unwrap_or_else(|_| exception.message());
        ScriptException::new(
            exception.kind,
            exception.type_name(),
            message,
            raised.debug_call_stack.clone(),
        )
    }

    fn push_frame(&self, frame: DebugStackFrame) -> TreewalkResult<()> {
        if self.call_stack.borrow().len() >= MAX_CALL_DEPTH {
            return Err(self.raise(Exception::recursion_error()));
        }
        trace!(name = %frame.name, "pushing frame");
        self.call_stack.borrow_mut().push(frame);
        Ok(())
    }

    fn pop_frame(&self) {
        if let Some(frame) = self.call_stack.borrow_mut().pop() {
            trace!(name = %frame.name, "popping frame");
        }
    }

    fn set_line(&self, line: usize) {
        if let Some(frame) = self.call_stack.borrow_mut().last_mut() {
            frame.line = line;
        }
    }

    pub(crate) fn write_output(&self, text: &str) {
        match &self.output {
            Some(output) => output.borrow_mut().push_str(text),
            None => print!("{text}"),
        }
    }
}
