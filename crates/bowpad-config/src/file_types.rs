//! File-type filter list for open/save pickers.
use serde::Serialize;

pub const ALL_FILES_NAME: &str = "All files";
pub const ALL_FILES_PATTERN: &str = "*.*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileType {
    /// Display name, e.g. "Python file".
    pub name: String,
    /// `;`-separated glob list, e.g. "*.py;*.pyw".
    pub pattern: String,
}

impl FileType {
    /// The first extension of the pattern, without the `*.` prefix.
    pub fn first_extension(&self) -> Option<&str> {
        let first = self.pattern.split(';').next()?;
        let ext = first.strip_prefix("*.").unwrap_or(first);
        (!ext.is_empty()).then_some(ext)
    }
}

/// Display name used for a language's filter entry.
pub fn filter_name_for_language(language: &str) -> String {
    format!("{language} file")
}

/// Collects filter entries, deduplicated by name with the latest entry winning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTypesBuilder {
    entries: Vec<FileType>,
}

impl FileTypesBuilder {
    pub fn register(&mut self, language: &str, extensions: &[&str]) {
        if extensions.is_empty() {
            return;
        }
        let name = filter_name_for_language(language);
        let pattern = extensions
            .iter()
            .map(|e| format!("*.{e}"))
            .collect::<Vec<_>>()
            .join(";");
        self.entries.retain(|ft| ft.name != name);
        self.entries.push(FileType { name, pattern });
    }

    /// Sorts case-insensitively by name and pins "All files" first.
    pub fn finish(mut self) -> Vec<FileType> {
        self.entries.sort_by_key(|ft| ft.name.to_lowercase());
        let mut out = Vec::with_capacity(self.entries.len() + 1);
        out.push(FileType {
            name: ALL_FILES_NAME.to_string(),
            pattern: ALL_FILES_PATTERN.to_string(),
        });
        out.extend(self.entries);
        out
    }
}
