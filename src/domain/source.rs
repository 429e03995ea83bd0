use std::{
    io,
    path::{Path, PathBuf},
};

use crate::domain::Text;

/// A Python source file: where it lives and what it says.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Source {
    path: PathBuf,
    text: Text,
}

impl Source {
    /// Reads the file at `path`, which the caller has already canonicalised.
    pub fn read(path: &Path) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_path_buf(), Text::new(&text)))
    }

    pub fn new(path: PathBuf, text: Text) -> Self {
        Self { path, text }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn into_parts(self) -> (PathBuf, Text) {
        (self.path, self.text)
    }
}
