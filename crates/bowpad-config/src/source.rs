//! Configuration sources and their discovery.
use std::path::{Path, PathBuf};

use crate::ini::IniDocument;
use crate::settings::CascadeSettings;

/// Where a source came from. The order of variants is the cascade order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    Bundled,
    Plugin(PathBuf),
    User(PathBuf),
}

/// One parsed layer of the cascade.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub origin: SourceOrigin,
    pub doc: IniDocument,
}

impl ConfigSource {
    pub fn bundled(text: &str) -> Self {
        Self {
            origin: SourceOrigin::Bundled,
            doc: IniDocument::parse(text),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self.origin, SourceOrigin::User(_))
    }
}

/// Collects the sources in cascade order: bundled defaults, plugin files
/// from the data directory (sorted by file name), then the user file.
///
/// Unreadable files are skipped. A missing user file simply means there
/// is no user layer.
pub fn discover_sources(settings: &CascadeSettings) -> Vec<ConfigSource> {
    let mut sources = Vec::new();
    if !settings.bundled.is_empty() {
        sources.push(ConfigSource::bundled(&settings.bundled));
    }

    for path in plugin_files(&settings.data_dir, &settings.plugin_extension) {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!("Loaded plugin configuration {}", path.display());
                sources.push(ConfigSource {
                    origin: SourceOrigin::Plugin(path),
                    doc: IniDocument::parse(&text),
                });
            }
            Err(e) => tracing::warn!("Failed to read plugin configuration {}: {e}", path.display()),
        }
    }

    let user_path = settings.user_file_path();
    if user_path.is_file() {
        match std::fs::read_to_string(&user_path) {
            Ok(text) => sources.push(ConfigSource {
                origin: SourceOrigin::User(user_path),
                doc: IniDocument::parse(&text),
            }),
            Err(e) => tracing::warn!("Ignoring unreadable user configuration {}: {e}", user_path.display()),
        }
    }
    sources
}

fn plugin_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("No plugin directory at {}: {e}", dir.display());
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .collect();
    files.sort();
    files
}
