use std::env;
use std::path::PathBuf;

/// Snippet store configuration.
///
/// Reads from the `PROMPTFORGE_SNIPPETS` environment variable, falling back
/// to `snippets.json` in the promptforge data directory when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the JSON snippet file.
    pub path: PathBuf,
}

impl StoreConfig {
    /// Environment variable that overrides the snippet file location.
    pub const ENV_VAR: &str = "PROMPTFORGE_SNIPPETS";

    /// File name used inside the data directory.
    pub const FILE_NAME: &str = "snippets.json";

    /// Build a config from the environment.
    ///
    /// Priority: `PROMPTFORGE_SNIPPETS` env var, then [`Self::default_path`].
    pub fn from_env() -> Self {
        let path = env::var_os(Self::ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        Self { path }
    }

    /// Build a config from an explicit path (useful for tests and CLI flags).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default snippet file: `$XDG_DATA_HOME/promptforge/snippets.json`, or
    /// `~/.local/share/promptforge/snippets.json`.
    pub fn default_path() -> PathBuf {
        data_dir().join(Self::FILE_NAME)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Return the promptforge data directory.
///
/// Always uses XDG layout rather than the platform-specific
/// `dirs::data_dir()`, so macOS users find files next to their config.
pub fn data_dir() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("promptforge");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("promptforge")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_new() {
        let cfg = StoreConfig::new("/tmp/snips.json");
        assert_eq!(cfg.path, PathBuf::from("/tmp/snips.json"));
    }

    #[test]
    fn default_path_ends_with_expected_filename() {
        let path = StoreConfig::default_path();
        assert!(
            path.ends_with("promptforge/snippets.json"),
            "unexpected default path: {}",
            path.display()
        );
    }
}
