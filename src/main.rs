use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use dynimport::{
    core::log::init_tracing, ImportOptions, ImporterError, LoadErrorReason, ModuleImporter,
    ModuleRegistry, ScriptException, Value,
};

#[derive(Parser)]
#[command(name = "dynimport", version, about = "Load a Python file from any path and use it")]
struct Cli {
    /// Log what the loader does to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the functions and classes a file defines, with their signatures.
    Callables {
        file: PathBuf,
        #[arg(long)]
        include_private: bool,
        /// Folder module names are derived relative to.
        #[arg(long)]
        base: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// List the top-level names a file binds, with their kind.
    Names {
        file: PathBuf,
        #[arg(long)]
        base: Option<PathBuf>,
    },
    /// Call a top-level function or class. Arguments are JSON literals, or plain strings.
    Call {
        file: PathBuf,
        name: String,
        args: Vec<String>,
        #[arg(long)]
        base: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    fn base(&self) -> Option<&PathBuf> {
        match self {
            Command::Callables { base, .. }
            | Command::Names { base, .. }
            | Command::Call { base, .. } => base.as_ref(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "warn" });

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), ImporterError> {
    let mut options = ImportOptions::from_env();
    if let Some(base) = command.base() {
        options = options.base_folder(base);
    }
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::with_options(&registry, options);

    match command {
        Command::Callables {
            file,
            include_private,
            json,
            ..
        } => {
            let handle = importer.load(&file)?;
            let callables = importer.get_namespace(&handle).callables(include_private);
            if json {
                println!("{}", to_json_string(&callables));
            } else {
                for callable in callables {
                    println!("{callable}");
                }
            }
        }
        Command::Names { file, .. } => {
            let handle = importer.load(&file)?;
            for (name, attribute) in importer.get_namespace(&handle).iter() {
                println!("{name}\t{}", attribute.kind());
            }
        }
        Command::Call {
            file,
            name,
            args,
            json,
            ..
        } => {
            let handle = importer.load(&file)?;
            let args = args.iter().map(|arg| parse_arg(arg)).collect();
            let result = importer.call(&handle, &name, args)?;
            if json {
                println!("{}", to_json_string(&result.to_json()));
            } else {
                println!("{}", result.repr());
            }
        }
    }
    Ok(())
}

/// A JSON literal, or the argument itself as a string.
fn parse_arg(arg: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(arg)
        .map(Value::from)
        .unwrap_or_else(|_| Value::Str(arg.to_string()))
}

fn to_json_string<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("\"<unserializable: {e}>\""))
}

fn report(e: &ImporterError) {
    eprintln!("error: {e}");
    if let Some(exception) = raised(e) {
        eprint!("{}", exception.traceback);
    }
}

fn raised(e: &ImporterError) -> Option<&ScriptException> {
    match e {
        ImporterError::Load(load) => match &load.reason {
            LoadErrorReason::Execution(exception) => Some(exception),
            _ => None,
        },
        ImporterError::Call(call) => Some(&call.exception),
        _ => None,
    }
}
