use std::ops::Deref;

/// The double-underscore names the interpreter itself looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dunder {
    Name,
    File,
    Package,
    Init,
    Str,
    Repr,
    Len,
    Call,
    Main,
}

impl Dunder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "__name__",
            Self::File => "__file__",
            Self::Package => "__package__",
            Self::Init => "__init__",
            Self::Str => "__str__",
            Self::Repr => "__repr__",
            Self::Len => "__len__",
            Self::Call => "__call__",
            Self::Main => "__main__",
        }
    }
}

impl Deref for Dunder {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Dunder {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Dunder> for String {
    fn from(value: Dunder) -> Self {
        value.as_str().to_string()
    }
}
