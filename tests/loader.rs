use std::{
    fs,
    path::{Path, PathBuf},
    thread,
};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use dynimport::{
    Attribute, ExceptionKind, ExistingModulePolicy, ImportOptions, ImporterError,
    LoadErrorReason, ModuleImporter, ModuleRegistry, Value,
};

fn write(dir: &Path, relative: &str, source: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, source).unwrap();
    path
}

const TOOLS: &str = r#"
LIMIT = 10

def add(a, b):
    return a + b

def scale(value, factor=2, *, offset=0):
    return value * factor + offset

def fail(message):
    raise ValueError(message)

class Rect:
    def __init__(self, w, h):
        self.w = w
        self.h = h

    def area(self):
        return self.w * self.h

def area_of(rect):
    return rect.area()
"#;

#[test]
fn loads_a_file_and_exposes_its_namespace() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "tools.py", TOOLS);
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let handle = importer.load(&path).unwrap();
    assert_eq!(handle.name().as_str(), "tools");
    assert_eq!(handle.path(), path.canonicalize().unwrap());
    assert!(registry.contains("tools"));

    let namespace = importer.get_namespace(&handle);
    assert_eq!(
        namespace.names(),
        vec!["LIMIT", "add", "scale", "fail", "Rect", "area_of"]
    );
    assert_eq!(
        namespace.get("LIMIT"),
        Some(&Attribute::Value(Value::Integer(10)))
    );
    let Some(Attribute::Type(rect)) = namespace.get("Rect") else {
        panic!("expected Rect to be a class");
    };
    assert_eq!(rect.signature, "(w, h)");
    assert_eq!(
        rect.methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        vec!["__init__", "area"]
    );
}

#[test]
fn attribute_checks() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "tools.py", TOOLS);
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);
    let handle = importer.load(&path).unwrap();

    assert!(importer.has_attribute(&handle, "add"));
    assert!(!importer.has_attribute(&handle, "subtract"));
    assert!(!importer.has_attribute(&handle, "__name__"));

    assert!(importer.require_attribute(&handle, "LIMIT").is_ok());
    let e = importer.require_attribute(&handle, "subtract").unwrap_err();
    assert_eq!(e.to_string(), "module 'tools' has no attribute 'subtract'");
}

#[test]
fn calls_functions_and_classes() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "tools.py", TOOLS);
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);
    let handle = importer.load(&path).unwrap();

    let sum = importer
        .call(&handle, "add", vec![Value::Integer(3), Value::Integer(4)])
        .unwrap();
    assert_eq!(sum, Value::Integer(7));

    let joined = importer
        .call(&handle, "add", vec![Value::from("ab"), Value::from("cd")])
        .unwrap();
    assert_eq!(joined, Value::Str("abcd".into()));

    let scaled = importer
        .call_with_kwargs(
            &handle,
            "scale",
            vec![Value::Integer(5)],
            vec![
                ("factor".into(), Value::Integer(3)),
                ("offset".into(), Value::Integer(1)),
            ],
        )
        .unwrap();
    assert_eq!(scaled, Value::Integer(16));

    // Instances cross the boundary as opaque references and can be passed back in.
    let rect = importer
        .call(&handle, "Rect", vec![Value::Integer(2), Value::Integer(3)])
        .unwrap();
    let Value::Object(object) = &rect else {
        panic!("expected an object, got {rect:?}");
    };
    assert_eq!(object.type_name(), "Rect");
    let area = importer.call(&handle, "area_of", vec![rect]).unwrap();
    assert_eq!(area, Value::Integer(6));
}

#[test]
fn call_failures() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "tools.py", TOOLS);
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);
    let handle = importer.load(&path).unwrap();

    let e = importer.call(&handle, "missing", vec![]).unwrap_err();
    assert!(matches!(e, ImporterError::AttributeNotFound(_)), "{e:?}");

    let e = importer.call(&handle, "LIMIT", vec![]).unwrap_err();
    let ImporterError::NotCallable(e) = e else {
        panic!("expected NotCallable, got {e:?}");
    };
    assert_eq!(e.type_name, "int");
    assert_eq!(e.to_string(), "'tools.LIMIT' is not callable ('int' object)");

    let e = importer
        .call(&handle, "fail", vec![Value::from("bad input")])
        .unwrap_err();
    let ImporterError::Call(e) = e else {
        panic!("expected a CallError, got {e:?}");
    };
    assert_eq!(e.exception.kind, ExceptionKind::ValueError);
    assert_eq!(e.exception.message, "bad input");
    assert!(e.exception.render_traceback().ends_with("ValueError: bad input"));

    let e = importer.call(&handle, "add", vec![Value::Integer(1)]).unwrap_err();
    let ImporterError::Call(e) = e else {
        panic!("expected a CallError, got {e:?}");
    };
    assert_eq!(e.exception.kind, ExceptionKind::TypeError);
}

#[test]
fn invalid_paths_leave_the_registry_untouched() {
    let dir = TempDir::new().unwrap();
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let e = importer.load(dir.path().join("absent.py")).unwrap_err();
    assert!(matches!(e.reason, LoadErrorReason::NotFound), "{e}");

    fs::create_dir(dir.path().join("folder.py")).unwrap();
    let e = importer.load(dir.path().join("folder.py")).unwrap_err();
    assert!(matches!(e.reason, LoadErrorReason::NotAFile), "{e}");

    let text = write(dir.path(), "notes.txt", "x = 1\n");
    let e = importer.load(&text).unwrap_err();
    assert!(
        matches!(e.reason, LoadErrorReason::UnsupportedExtension { .. }),
        "{e}"
    );

    assert!(registry.is_empty());
}

#[test]
fn broken_sources_leave_the_registry_untouched() {
    let dir = TempDir::new().unwrap();
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let path = write(dir.path(), "broken.py", "def f(:\n    pass\n");
    let e = importer.load(&path).unwrap_err();
    let LoadErrorReason::Syntax(syntax) = &e.reason else {
        panic!("expected a syntax error, got {e}");
    };
    assert_eq!(syntax.line, 1);

    let path = write(dir.path(), "raises.py", "x = 1\nraise KeyError('boom')\n");
    let e = importer.load(&path).unwrap_err();
    let LoadErrorReason::Execution(exception) = &e.reason else {
        panic!("expected an execution error, got {e}");
    };
    assert_eq!(exception.kind, ExceptionKind::KeyError);

    assert!(registry.is_empty());
}

#[test]
fn names_follow_the_base_folder() {
    let dir = TempDir::new().unwrap();
    let nested = write(dir.path(), "pkg/sub/mod.py", "VALUE = 1\n");
    let registry = ModuleRegistry::new();
    let importer =
        ModuleImporter::with_options(&registry, ImportOptions::new().base_folder(dir.path()));

    let handle = importer.load(&nested).unwrap();
    assert_eq!(handle.name().as_str(), "pkg.sub.mod");

    let elsewhere = TempDir::new().unwrap();
    let outside = write(elsewhere.path(), "other.py", "VALUE = 2\n");
    let e = importer.load(&outside).unwrap_err();
    assert!(
        matches!(e.reason, LoadErrorReason::OutsideBaseFolder { .. }),
        "{e}"
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn same_file_name_in_different_folders() {
    let dir = TempDir::new().unwrap();
    let first = write(dir.path(), "a/util.py", "WHO = 'a'\n");
    let second = write(dir.path(), "b/util.py", "WHO = 'b'\n");
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let first = importer.load(&first).unwrap();
    let second = importer.load(&second).unwrap();

    assert_eq!(first.name().as_str(), "util");
    let suffixed = second.name().as_str();
    assert!(suffixed.starts_with("util__"), "{suffixed}");
    assert_eq!(suffixed.len(), "util__".len() + 8);
    assert_eq!(registry.len(), 2);

    assert_eq!(
        importer.get_namespace(&second).get("WHO"),
        Some(&Attribute::Value(Value::Str("b".into())))
    );
}

#[test]
fn loading_twice_reuses_or_reloads() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "counter.py", "COUNT = 1\n");
    let registry = ModuleRegistry::new();

    let importer = ModuleImporter::new(&registry);
    let first = importer.load(&path).unwrap();
    let again = importer.load(&path).unwrap();
    assert!(first.same_module(&again));

    fs::write(&path, "COUNT = 2\n").unwrap();
    let reloading = ModuleImporter::with_options(
        &registry,
        ImportOptions::new().on_existing(ExistingModulePolicy::Reload),
    );
    let reloaded = reloading.load(&path).unwrap();
    assert!(!first.same_module(&reloaded));
    assert_eq!(reloaded.name(), first.name());
    assert_eq!(registry.len(), 1);

    // The old handle keeps the namespace it was created with.
    assert_eq!(
        importer.get_namespace(&first).get("COUNT"),
        Some(&Attribute::Value(Value::Integer(1)))
    );
    assert_eq!(
        importer.get_namespace(&reloaded).get("COUNT"),
        Some(&Attribute::Value(Value::Integer(2)))
    );
}

#[test]
fn failed_reload_keeps_the_registered_module() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "mod.py", "VALUE = 1\n");
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);
    let handle = importer.load(&path).unwrap();

    fs::write(&path, "VALUE = \n").unwrap();
    assert!(importer.reload(&handle).is_err());

    let registered = registry.get("mod").unwrap();
    assert!(registered.same_module(&handle));
}

#[test]
fn reloading_a_handle_whose_name_was_taken() {
    let dir = TempDir::new().unwrap();
    let first = write(dir.path(), "a/util.py", "WHO = 'a'\n");
    let second = write(dir.path(), "b/util.py", "WHO = 'b'\n");
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let stale = importer.load(&first).unwrap();
    assert!(importer.unload(&stale));
    let other = importer.load(&second).unwrap();
    assert_eq!(other.name().as_str(), "util");

    let reloaded = importer.reload(&stale).unwrap();
    assert!(reloaded.name().as_str().starts_with("util__"), "{}", reloaded.name());
    assert_eq!(registry.len(), 2);

    let registered = registry.get("util").unwrap();
    assert!(registered.same_module(&other));
    assert!(registry.get_by_path(other.path()).unwrap().same_module(&other));
    assert!(registry.get_by_path(stale.path()).unwrap().same_module(&reloaded));
    assert_eq!(
        importer.get_namespace(&reloaded).get("WHO"),
        Some(&Attribute::Value(Value::Str("a".into())))
    );
}

#[test]
fn reloading_keeps_the_registered_name_of_the_path() {
    let dir = TempDir::new().unwrap();
    let first = write(dir.path(), "a/util.py", "WHO = 'a'\n");
    let second = write(dir.path(), "b/util.py", "WHO = 'b'\n");
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let a = importer.load(&first).unwrap();
    let b = importer.load(&second).unwrap();
    let suffixed = b.name().clone();

    let reloaded = importer.reload(&b).unwrap();
    assert_eq!(reloaded.name(), &suffixed);
    assert_eq!(registry.len(), 2);
    assert!(registry.get("util").unwrap().same_module(&a));
    assert!(registry.get(&suffixed.as_str()).unwrap().same_module(&reloaded));

    // Once a is unloaded, reloading it again takes back the plain name.
    assert!(importer.unload(&a));
    let again = importer.reload(&a).unwrap();
    assert_eq!(again.name().as_str(), "util");
    assert_eq!(registry.len(), 2);
}

#[test]
fn deep_recursion_in_a_loaded_module() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "deep.py",
        "def depth(n):\n    if n == 0:\n        return 0\n    return depth(n - 1) + 1\n",
    );
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);
    let handle = importer.load(&path).unwrap();

    let result = importer.call(&handle, "depth", vec![Value::Integer(900)]).unwrap();
    assert_eq!(result, Value::Integer(900));

    let e = importer
        .call(&handle, "depth", vec![Value::Integer(100_000)])
        .unwrap_err();
    let ImporterError::Call(e) = e else {
        panic!("expected a CallError, got {e:?}");
    };
    assert_eq!(e.exception.kind, ExceptionKind::RecursionError);
}

#[test]
fn deeply_nested_sources() {
    let dir = TempDir::new().unwrap();
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let nested = format!("VALUE = {}1{}\n", "(".repeat(150), ")".repeat(150));
    let handle = importer.load(write(dir.path(), "nested.py", &nested)).unwrap();
    assert_eq!(
        importer.get_namespace(&handle).get("VALUE"),
        Some(&Attribute::Value(Value::Integer(1)))
    );

    let chained = format!("VALUE = {}True\n", "not ".repeat(5000));
    let handle = importer.load(write(dir.path(), "chained.py", &chained)).unwrap();
    assert_eq!(
        importer.get_namespace(&handle).get("VALUE"),
        Some(&Attribute::Value(Value::Boolean(true)))
    );

    let too_deep = format!("VALUE = {}1{}\n", "[".repeat(1000), "]".repeat(1000));
    let e = importer
        .load(write(dir.path(), "too_deep.py", &too_deep))
        .unwrap_err();
    let LoadErrorReason::Syntax(syntax) = &e.reason else {
        panic!("expected a syntax error, got {e}");
    };
    assert_eq!(syntax.message, "too many nested parentheses");
    assert_eq!(registry.len(), 2);
}

#[test]
fn unloading() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "mod.py", "VALUE = 1\n");
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let handle = importer.load(&path).unwrap();
    assert!(importer.unload(&handle));
    assert!(!importer.unload(&handle));
    assert!(registry.is_empty());

    // The handle still works after unloading.
    assert!(importer.has_attribute(&handle, "VALUE"));

    let fresh = importer.load(&path).unwrap();
    assert!(!fresh.same_module(&handle));
}

#[test]
fn loaded_modules_can_import_each_other() {
    let dir = TempDir::new().unwrap();
    let helpers = write(dir.path(), "helpers.py", "def double(x):\n    return x * 2\n");
    let app = write(
        dir.path(),
        "app.py",
        "import helpers\nfrom helpers import double\n\ndef quadruple(x):\n    return helpers.double(double(x))\n",
    );
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    importer.load(&helpers).unwrap();
    let app = importer.load(&app).unwrap();
    let result = importer.call(&app, "quadruple", vec![Value::Integer(5)]).unwrap();
    assert_eq!(result, Value::Integer(20));

    // `double` came from helpers, so it is not part of app's own outline.
    let callables: Vec<String> = importer
        .get_namespace(&app)
        .callables(false)
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(callables, vec!["quadruple(x)"]);
}

#[test]
fn unregistered_imports_fail_the_load() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "app.py", "import helpers\n");
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let e = importer.load(&path).unwrap_err();
    let LoadErrorReason::Execution(exception) = &e.reason else {
        panic!("expected an execution error, got {e}");
    };
    assert_eq!(exception.kind, ExceptionKind::ImportError);
    assert!(registry.is_empty());
}

#[test]
fn concurrent_loads_register_one_module() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "shared.py", TOOLS);
    let registry = ModuleRegistry::new();
    let importer = ModuleImporter::new(&registry);

    let handles: Vec<_> = thread::scope(|s| {
        let workers: Vec<_> = (0..8).map(|_| s.spawn(|| importer.load(&path))).collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap().unwrap())
            .collect()
    });

    assert_eq!(registry.len(), 1);
    let registered = registry.get("shared").unwrap();
    assert!(handles.iter().all(|h| h.same_module(&registered)));

    let sum = importer
        .call(&registered, "add", vec![Value::Integer(1), Value::Integer(2)])
        .unwrap();
    assert_eq!(sum, Value::Integer(3));
}
