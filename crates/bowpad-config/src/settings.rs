//! Where the cascade finds its sources and how strictly it treats them.
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::path_overrides::DEFAULT_PATH_OVERRIDE_CAPACITY;

/// Bundled default lexer and language configuration.
pub const DEFAULT_LEXSTYLES: &str = include_str!("../resources/lexstyles.ini");

/// Extension of plugin configuration files in the data directory.
const DEFAULT_PLUGIN_EXTENSION: &str = "bplex";

/// File name of the writable user layer inside the data directory.
const DEFAULT_USER_FILE_NAME: &str = "userconfig";

/// Settings for loading the configuration cascade.
#[derive(Debug, Clone)]
pub struct CascadeSettings {
    /// Directory scanned for plugin files and holding the user file.
    pub data_dir: PathBuf,
    /// Plugin file extension, compared case-insensitively.
    pub plugin_extension: String,
    pub user_file_name: String,
    /// Cap of the explicit per-path override list.
    pub max_path_overrides: usize,
    /// Text of the bundled defaults layer. Empty means no bundled layer.
    pub bundled: Cow<'static, str>,
    /// Fire debug assertions on malformed values instead of only logging.
    pub strict: bool,
}

impl Default for CascadeSettings {
    fn default() -> Self {
        Self::with_data_dir(resolve_data_dir())
    }
}

impl CascadeSettings {
    /// Default settings rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            plugin_extension: DEFAULT_PLUGIN_EXTENSION.to_string(),
            user_file_name: DEFAULT_USER_FILE_NAME.to_string(),
            max_path_overrides: DEFAULT_PATH_OVERRIDE_CAPACITY,
            bundled: Cow::Borrowed(DEFAULT_LEXSTYLES),
            strict: cfg!(debug_assertions),
        }
    }

    /// Replaces the bundled layer, mostly useful for tests and embedders.
    pub fn with_bundled(mut self, bundled: impl Into<Cow<'static, str>>) -> Self {
        self.bundled = bundled.into();
        self
    }

    /// Location of the user configuration file inside the data directory.
    pub fn user_file_path(&self) -> PathBuf {
        self.data_dir.join(&self.user_file_name)
    }
}

/// Resolves the data directory path.
///
/// Resolution order:
/// 1. `BOWPAD_DATA_DIR` environment variable
/// 2. the per-user data directory joined with `BowPad`
/// 3. `.data/` directory next to the executable
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BOWPAD_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Some(dir) = dirs::data_dir() {
        return dir.join("BowPad");
    }
    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
    exe.parent().unwrap_or(Path::new(".")).join(".data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = CascadeSettings::with_data_dir("/tmp/bp");
        assert_eq!(s.plugin_extension, "bplex");
        assert_eq!(s.max_path_overrides, 100);
        assert_eq!(s.user_file_path(), PathBuf::from("/tmp/bp").join("userconfig"));
        assert!(!s.bundled.is_empty());
    }

    #[test]
    fn test_with_bundled_replaces_text() {
        let s = CascadeSettings::with_data_dir("/tmp/bp").with_bundled("[language]\n");
        assert_eq!(s.bundled, "[language]\n");
    }

    #[test]
    fn test_resolve_data_dir_with_env_var() {
        let previous = std::env::var("BOWPAD_DATA_DIR").ok();
        std::env::set_var("BOWPAD_DATA_DIR", "/custom/path");
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/custom/path"));
        match previous {
            Some(val) => std::env::set_var("BOWPAD_DATA_DIR", val),
            None => std::env::remove_var("BOWPAD_DATA_DIR"),
        }
    }
}
