use crate::domain::{FromImportPath, ModuleName, ModulePath};

#[derive(Debug, PartialEq)]
pub enum ImportResolutionError {
    NoParentPackage,
    BeyondTopLevel,
}

impl ImportResolutionError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoParentPackage => "attempted relative import with no known parent package",
            Self::BeyondTopLevel => "attempted relative import beyond top-level package",
        }
    }
}

pub fn resolve_import_path(
    import_path: &FromImportPath,
    current_package: &ModuleName,
) -> Result<ModuleName, ImportResolutionError> {
    match import_path {
        FromImportPath::Absolute(mp) => Ok(resolve_absolute_path(mp)),
        FromImportPath::Relative(levels, tail) => {
            if current_package.is_empty() {
                return Err(ImportResolutionError::NoParentPackage);
            }

            // One leading dot names the current package; each further dot walks one level up.
            let base = current_package
                .strip_last(*levels - 1)
                .ok_or(ImportResolutionError::BeyondTopLevel)?;
            Ok(base.join(tail.segments_as_str()))
        }
    }
}

pub fn resolve_absolute_path(module_path: &ModulePath) -> ModuleName {
    ModuleName::from_segments(&module_path.segments_as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Identifier;

    fn path(segments: &[&str]) -> ModulePath {
        ModulePath::new(
            segments
                .iter()
                .map(|s| Identifier::new(*s).unwrap())
                .collect(),
        )
    }

    #[test]
    fn absolute() {
        let resolved = resolve_import_path(
            &FromImportPath::Absolute(path(&["a", "b"])),
            &ModuleName::empty(),
        );
        assert_eq!(resolved, Ok(ModuleName::from_dotted("a.b")));
    }

    #[test]
    fn relative_within_package() {
        let package = ModuleName::from_dotted("tools.sub");
        let resolved = resolve_import_path(&FromImportPath::Relative(1, path(&["x"])), &package);
        assert_eq!(resolved, Ok(ModuleName::from_dotted("tools.sub.x")));

        let resolved = resolve_import_path(&FromImportPath::Relative(2, path(&["y"])), &package);
        assert_eq!(resolved, Ok(ModuleName::from_dotted("tools.y")));
    }

    #[test]
    fn relative_errors() {
        let resolved = resolve_import_path(
            &FromImportPath::Relative(1, path(&["x"])),
            &ModuleName::empty(),
        );
        assert_eq!(resolved, Err(ImportResolutionError::NoParentPackage));

        let resolved = resolve_import_path(
            &FromImportPath::Relative(3, path(&["x"])),
            &ModuleName::from_dotted("a.b"),
        );
        assert_eq!(resolved, Err(ImportResolutionError::BeyondTopLevel));
    }
}
