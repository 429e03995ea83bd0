use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{
    domain::{ModuleName, ScriptException},
    parser::SyntaxError,
};

/// A file could not be turned into a registered module. The registry is left as it was.
#[derive(Debug, Error)]
#[error("cannot load '{}': {reason}", .path.display())]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub reason: LoadErrorReason,
}

impl LoadError {
    pub fn new(path: impl Into<PathBuf>, reason: LoadErrorReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadErrorReason {
    #[error("no such file")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("not a file")]
    NotAFile,

    #[error("unsupported extension, expected one of: {}", .expected.join(", "))]
    UnsupportedExtension { expected: Vec<String> },

    #[error("outside of the base folder '{}'", .base.display())]
    OutsideBaseFolder { base: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    /// The lexer or parser rejected the source.
    #[error("syntax error at {0}")]
    Syntax(SyntaxError),

    /// The module body raised an exception.
    #[error("module body raised {0}")]
    Execution(ScriptException),
}

impl From<io::Error> for LoadErrorReason {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("module '{module}' has no attribute '{name}'")]
pub struct AttributeNotFoundError {
    pub module: ModuleName,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{module}.{name}' is not callable ('{type_name}' object)")]
pub struct NotCallableError {
    pub module: ModuleName,
    pub name: String,
    pub type_name: String,
}

/// The callee raised an exception.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("calling '{module}.{name}' raised {exception}")]
pub struct CallError {
    pub module: ModuleName,
    pub name: String,
    #[source]
    pub exception: ScriptException,
}

#[derive(Debug, Error)]
pub enum ImporterError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    AttributeNotFound(#[from] AttributeNotFoundError),

    #[error(transparent)]
    NotCallable(#[from] NotCallableError),

    #[error(transparent)]
    Call(#[from] CallError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DebugCallStack, ExceptionKind};

    #[test]
    fn io_errors_are_classified() {
        let reason = LoadErrorReason::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(reason, LoadErrorReason::NotFound));
        let reason = LoadErrorReason::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(reason, LoadErrorReason::PermissionDenied));
        let reason = LoadErrorReason::from(io::Error::from(io::ErrorKind::InvalidData));
        assert!(matches!(reason, LoadErrorReason::Io(_)));
    }

    #[test]
    fn messages() {
        let e = LoadError::new(
            "/tmp/a.txt",
            LoadErrorReason::UnsupportedExtension {
                expected: vec!["py".into(), "pyw".into()],
            },
        );
        assert_eq!(
            e.to_string(),
            "cannot load '/tmp/a.txt': unsupported extension, expected one of: py, pyw"
        );

        let e = LoadError::new("/tmp/a.py", LoadErrorReason::Syntax(SyntaxError::new(3, "oops")));
        assert_eq!(e.to_string(), "cannot load '/tmp/a.py': syntax error at line 3: oops");

        let e = ImporterError::from(CallError {
            module: ModuleName::from_dotted("tools"),
            name: "f".into(),
            exception: ScriptException::new(
                ExceptionKind::ValueError,
                "ValueError",
                "bad",
                DebugCallStack::default(),
            ),
        });
        assert_eq!(e.to_string(), "calling 'tools.f' raised ValueError: bad");
    }
}
