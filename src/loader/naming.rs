use std::path::{Component, Path};

use crate::domain::ModuleName;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Turn one path segment into a valid Python identifier.
pub fn sanitize_segment(segment: &str) -> String {
    let mut identifier: String = segment
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if identifier.chars().next().map_or(true, |c| c.is_numeric()) {
        identifier.insert(0, '_');
    }
    identifier
}

/// The module name of `path` relative to `base`: the extension is dropped and every directory
/// becomes a package segment. Both paths must be canonical, with `path` inside `base`.
pub fn derive_name(path: &Path, base: &Path) -> Option<ModuleName> {
    let relative = path.strip_prefix(base).ok()?;
    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(|parent| parent.components())
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(sanitize_segment(&segment.to_string_lossy())),
            _ => None,
        })
        .collect();
    segments.push(sanitize_segment(&relative.file_stem()?.to_string_lossy()));
    Some(ModuleName::new(segments))
}

/// The name used when `name` is already taken by a file at a different path.
pub fn disambiguate(name: &ModuleName, path: &Path) -> ModuleName {
    let hash = fnv1a(path.to_string_lossy().as_bytes());
    name.with_suffix(&format!("__{hash:08x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn sanitizes_segments() {
        assert_eq!(sanitize_segment("my-module"), "my_module");
        assert_eq!(sanitize_segment("2fast"), "_2fast");
        assert_eq!(sanitize_segment("a b.c"), "a_b_c");
        assert_eq!(sanitize_segment(""), "_");
        assert_eq!(sanitize_segment("already_ok"), "already_ok");
    }

    #[test]
    fn names_from_paths() {
        let base = Path::new("/root/someFolder");
        assert_eq!(
            derive_name(Path::new("/root/someFolder/someSubfolder/myModule.py"), base),
            Some(ModuleName::from_dotted("someSubfolder.myModule"))
        );
        assert_eq!(
            derive_name(Path::new("/root/someFolder/top.py"), base),
            Some(ModuleName::from_dotted("top"))
        );
        assert_eq!(
            derive_name(Path::new("/root/someFolder/1st-try/data set.py"), base),
            Some(ModuleName::from_dotted("_1st_try.data_set"))
        );
        assert_eq!(derive_name(Path::new("/elsewhere/x.py"), base), None);
    }

    #[test]
    fn disambiguation_is_stable() {
        let name = ModuleName::from_dotted("pkg.util");
        let first = disambiguate(&name, Path::new("/a/util.py"));
        let again = disambiguate(&name, Path::new("/a/util.py"));
        let other = disambiguate(&name, Path::new("/b/util.py"));

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(first.head(), Some("pkg"));
        let tail = first.tail().unwrap_or_default();
        assert!(tail.starts_with("util__"));
        assert_eq!(tail.len(), "util__".len() + 8);
    }
}
