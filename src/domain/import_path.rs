use std::fmt::{Display, Error, Formatter};

use crate::domain::Identifier;

/// A dotted module path exactly as written in an `import` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulePath(Vec<Identifier>);

impl ModulePath {
    pub fn new(segments: Vec<Identifier>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[Identifier] {
        &self.0
    }

    pub fn segments_as_str(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.as_str()).collect()
    }

    pub fn head(&self) -> Option<&Identifier> {
        self.0.first()
    }
}

impl Display for ModulePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.segments_as_str().join("."))
    }
}

/// The module part of a `from ... import ...` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum FromImportPath {
    Absolute(ModulePath),
    /// Leading dot count plus whatever follows the dots (possibly nothing).
    Relative(usize, ModulePath),
}

impl Display for FromImportPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Self::Absolute(path) => write!(f, "{path}"),
            Self::Relative(levels, path) => write!(f, "{}{}", ".".repeat(*levels), path),
        }
    }
}
