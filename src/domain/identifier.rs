use std::{
    fmt::{Display, Error, Formatter},
    ops::Deref,
};

/// A syntactically valid Python identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if Self::is_valid(&name) {
            Some(Self(name))
        } else {
            None
        }
    }

    pub fn is_valid(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c == '_' || c.is_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c == '_' || c.is_alphanumeric())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_dunder(&self) -> bool {
        self.0.len() > 4 && self.0.starts_with("__") && self.0.ends_with("__")
    }
}

impl Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}

impl From<&Identifier> for String {
    fn from(value: &Identifier) -> Self {
        value.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_names() {
        assert!(Identifier::new("foo").is_some());
        assert!(Identifier::new("_bar2").is_some());
        assert!(Identifier::new("ünïcode").is_some());
        assert!(Identifier::new("2fast").is_none());
        assert!(Identifier::new("a-b").is_none());
        assert!(Identifier::new("").is_none());
    }

    #[test]
    fn detects_dunders() {
        assert!(Identifier::new("__init__").unwrap().is_dunder());
        assert!(!Identifier::new("__").unwrap().is_dunder());
        assert!(!Identifier::new("_private").unwrap().is_dunder());
    }
}
