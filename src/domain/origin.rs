use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Clone)]
pub enum ModuleOrigin {
    File(PathBuf),
    Builtin,
    Synthetic,
}

impl ModuleOrigin {
    pub fn path(&self) -> PathBuf {
        match self {
            ModuleOrigin::File(p) => p.to_path_buf(),
            ModuleOrigin::Builtin => PathBuf::from("<builtin>"),
            ModuleOrigin::Synthetic => PathBuf::from("<synthetic>"),
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            ModuleOrigin::File(p) => Some(p),
            _ => None,
        }
    }

    pub fn path_str(&self) -> String {
        self.path().to_string_lossy().into_owned()
    }
}
