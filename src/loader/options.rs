use std::path::{Path, PathBuf};

/// Set to `1`, `true`, `yes` or `on` to re-execute modules which are loaded again.
pub const RELOAD_ENV_VAR: &str = "DYNIMPORT_RELOAD";

/// What `load` does with a path whose module is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingModulePolicy {
    /// Hand back the registered module without running it again.
    #[default]
    Reuse,
    /// Run the file again into a fresh namespace under the same name.
    Reload,
}

impl ExistingModulePolicy {
    fn from_flag(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Self::Reload,
            _ => Self::Reuse,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    base_folder: Option<PathBuf>,
    extensions: Vec<String>,
    on_existing: ExistingModulePolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            base_folder: None,
            extensions: vec!["py".to_string()],
            on_existing: ExistingModulePolicy::default(),
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the reload policy taken from [`RELOAD_ENV_VAR`].
    pub fn from_env() -> Self {
        let on_existing = std::env::var(RELOAD_ENV_VAR)
            .map(|value| ExistingModulePolicy::from_flag(&value))
            .unwrap_or_default();
        Self::default().on_existing(on_existing)
    }

    /// Modules are named after their path relative to this folder, and files outside of it are
    /// refused. Without one, each file is named relative to its own directory.
    pub fn base_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.base_folder = Some(folder.into());
        self
    }

    /// File extensions accepted by `load`, without the leading dot.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn on_existing(mut self, policy: ExistingModulePolicy) -> Self {
        self.on_existing = policy;
        self
    }

    pub fn get_base_folder(&self) -> Option<&Path> {
        self.base_folder.as_deref()
    }

    pub fn get_extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn get_on_existing(&self) -> ExistingModulePolicy {
        self.on_existing
    }

    pub(crate) fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|accepted| accepted == e))
    }
}
