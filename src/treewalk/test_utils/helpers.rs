use std::collections::HashMap;

use crate::{
    core::Container,
    domain::{ModuleName, ModuleOrigin, Text},
    parser::parse_text,
    treewalk::{
        types::{Exception, Module},
        TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

/// A module which ran to completion, with everything it printed.
pub struct TestRun {
    module: Container<Module>,
    output: Container<String>,
}

impl TestRun {
    pub fn read(&self, name: &str) -> Option<TreewalkValue> {
        self.module.borrow().get(name)
    }

    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }
}

fn new_module(name: &str) -> Container<Module> {
    Container::new(Module::new(
        ModuleName::from_dotted(name),
        ModuleOrigin::File(format!("/test/{}.py", name.replace('.', "/")).into()),
    ))
}

fn execute(
    modules: &HashMap<ModuleName, Container<Module>>,
    module: &Container<Module>,
    source: &str,
    output: &Container<String>,
) -> TreewalkResult<()> {
    let ast = match parse_text(&Text::new(source)) {
        Ok(ast) => ast,
        Err(e) => panic!("Parser error: {e}"),
    };
    TreewalkInterpreter::new(modules)
        .with_output(output.clone())
        .execute_module(module, &ast)
}

/// Run `source` as a module named `main`, after running each of `dependencies` as a module it
/// can import.
pub fn try_run_with_modules(
    dependencies: &[(&str, &str)],
    source: &str,
) -> TreewalkResult<TestRun> {
    let mut modules = HashMap::new();
    let output = Container::new(String::new());
    for (name, text) in dependencies {
        let module = new_module(name);
        execute(&modules, &module, text, &output)?;
        modules.insert(ModuleName::from_dotted(name), module);
    }

    let module = new_module("main");
    execute(&modules, &module, source, &output)?;
    Ok(TestRun { module, output })
}

pub fn try_run(source: &str) -> TreewalkResult<TestRun> {
    try_run_with_modules(&[], source)
}

pub fn run(source: &str) -> TestRun {
    match try_run(source) {
        Ok(run) => run,
        Err(e) => panic!("Interpreter error: {:?}", e.exception),
    }
}

pub fn run_with_modules(dependencies: &[(&str, &str)], source: &str) -> TestRun {
    match try_run_with_modules(dependencies, source) {
        Ok(run) => run,
        Err(e) => panic!("Interpreter error: {:?}", e.exception),
    }
}

pub fn run_expect_error(source: &str) -> Exception {
    match try_run(source) {
        Ok(_) => panic!("Expected an exception"),
        Err(e) => e.exception,
    }
}

/// Evaluate a single expression.
pub fn eval(expr: &str) -> TreewalkValue {
    read(&run(&format!("__eval__ = {expr}\n")), "__eval__")
}

pub fn read(run: &TestRun, name: &str) -> TreewalkValue {
    match run.read(name) {
        Some(value) => value,
        None => panic!("Name '{name}' is not defined"),
    }
}
