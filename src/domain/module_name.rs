use std::fmt::{Display, Error, Formatter};

use crate::domain::Dunder;

/// An absolute, dotted module name.
///
/// File-backed modules get theirs from the loader's name derivation; builtin modules use their
/// fixed names. The empty name stands for "no package".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(Vec<String>);

impl ModuleName {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn empty() -> Self {
        Self(vec![])
    }

    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        Self::new(segments.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn from_dotted(s: &str) -> Self {
        if s.is_empty() {
            return Self::empty();
        }
        Self::new(s.split('.').map(|s| s.to_string()).collect())
    }

    pub fn main() -> Self {
        Self::from_segments(&[Dunder::Main])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> String {
        self.0.join(".")
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn parent(&self) -> Option<ModuleName> {
        self.strip_last(1)
    }

    /// Removes `n` segments from the end of the module name.
    ///
    /// Returns `None` if removing `n` segments would underflow or erase the module name entirely.
    pub fn strip_last(&self, n: usize) -> Option<ModuleName> {
        if n >= self.0.len() {
            return None;
        }

        let new_len = self.0.len() - n;
        Some(ModuleName(self.0[..new_len].to_vec()))
    }

    /// Joins additional segments onto the module name (used for relative imports).
    pub fn join<I>(&self, tail: I) -> ModuleName
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut segments = self.0.clone();
        for s in tail {
            segments.push(s.as_ref().to_string());
        }
        ModuleName(segments)
    }

    /// Appends `suffix` to the last segment, `a.b` + `__x` giving `a.b__x`.
    pub fn with_suffix(&self, suffix: &str) -> ModuleName {
        let mut segments = self.0.clone();
        match segments.last_mut() {
            Some(last) => last.push_str(suffix),
            None => segments.push(suffix.to_string()),
        }
        ModuleName(segments)
    }
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}
