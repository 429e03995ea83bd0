use std::fmt::{Display, Error, Formatter};

use crate::domain::DebugCallStack;

/// The builtin exception classes known to the interpreter. Every exception raised by a script,
/// including instances of user-defined subclasses, resolves to one of these.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ExceptionKind {
    BaseException,
    Exception,
    ArithmeticError,
    ZeroDivisionError,
    OverflowError,
    LookupError,
    KeyError,
    IndexError,
    ValueError,
    TypeError,
    NameError,
    AttributeError,
    RuntimeError,
    NotImplementedError,
    RecursionError,
    AssertionError,
    ImportError,
    SyntaxError,
    StopIteration,
}

impl ExceptionKind {
    pub const ALL: [ExceptionKind; 19] = [
        Self::BaseException,
        Self::Exception,
        Self::ArithmeticError,
        Self::ZeroDivisionError,
        Self::OverflowError,
        Self::LookupError,
        Self::KeyError,
        Self::IndexError,
        Self::ValueError,
        Self::TypeError,
        Self::NameError,
        Self::AttributeError,
        Self::RuntimeError,
        Self::NotImplementedError,
        Self::RecursionError,
        Self::AssertionError,
        Self::ImportError,
        Self::SyntaxError,
        Self::StopIteration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::BaseException => "BaseException",
            Self::Exception => "Exception",
            Self::ArithmeticError => "ArithmeticError",
            Self::ZeroDivisionError => "ZeroDivisionError",
            Self::OverflowError => "OverflowError",
            Self::LookupError => "LookupError",
            Self::KeyError => "KeyError",
            Self::IndexError => "IndexError",
            Self::ValueError => "ValueError",
            Self::TypeError => "TypeError",
            Self::NameError => "NameError",
            Self::AttributeError => "AttributeError",
            Self::RuntimeError => "RuntimeError",
            Self::NotImplementedError => "NotImplementedError",
            Self::RecursionError => "RecursionError",
            Self::AssertionError => "AssertionError",
            Self::ImportError => "ImportError",
            Self::SyntaxError => "SyntaxError",
            Self::StopIteration => "StopIteration",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// The direct base class in the builtin hierarchy.
    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::BaseException => None,
            Self::Exception => Some(Self::BaseException),
            Self::ZeroDivisionError | Self::OverflowError => Some(Self::ArithmeticError),
            Self::KeyError | Self::IndexError => Some(Self::LookupError),
            Self::NotImplementedError | Self::RecursionError => Some(Self::RuntimeError),
            _ => Some(Self::Exception),
        }
    }

    pub fn is_subclass_of(&self, other: &ExceptionKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == *other {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

impl Display for ExceptionKind {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.name())
    }
}

/// An exception that escaped a script, detached from the interpreter which raised it.
#[derive(Debug, PartialEq, Clone)]
pub struct ScriptException {
    pub kind: ExceptionKind,
    /// The class name as the script sees it. Differs from `kind` for user-defined subclasses.
    pub type_name: String,
    pub message: String,
    pub traceback: DebugCallStack,
}

impl ScriptException {
    pub fn new(
        kind: ExceptionKind,
        type_name: impl Into<String>,
        message: impl Into<String>,
        traceback: DebugCallStack,
    ) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            message: message.into(),
            traceback,
        }
    }

    /// The full report, traceback first, in the layout Python prints for uncaught exceptions.
    pub fn render_traceback(&self) -> String {
        format!("{}{}", self.traceback, self)
    }
}

impl Display for ScriptException {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        if self.message.is_empty() {
            write!(f, "{}", self.type_name)
        } else {
            write!(f, "{}: {}", self.type_name, self.message)
        }
    }
}

impl std::error::Error for ScriptException {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy() {
        assert!(ExceptionKind::KeyError.is_subclass_of(&ExceptionKind::LookupError));
        assert!(ExceptionKind::KeyError.is_subclass_of(&ExceptionKind::BaseException));
        assert!(ExceptionKind::RecursionError.is_subclass_of(&ExceptionKind::RuntimeError));
        assert!(!ExceptionKind::ValueError.is_subclass_of(&ExceptionKind::LookupError));
        assert!(!ExceptionKind::Exception.is_subclass_of(&ExceptionKind::ValueError));
    }

    #[test]
    fn names_round_trip() {
        for kind in ExceptionKind::ALL {
            assert_eq!(ExceptionKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ExceptionKind::from_name("Nope"), None);
    }

    #[test]
    fn display() {
        let e = ScriptException::new(
            ExceptionKind::ValueError,
            "BadInput",
            "nope",
            DebugCallStack::default(),
        );
        assert_eq!(e.to_string(), "BadInput: nope");
        assert_eq!(e.render_traceback(), "BadInput: nope");

        let e = ScriptException::new(
            ExceptionKind::AssertionError,
            "AssertionError",
            "",
            DebugCallStack::default(),
        );
        assert_eq!(e.to_string(), "AssertionError");
    }
}
