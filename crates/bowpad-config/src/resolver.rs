//! Resolving a document to a language name.
use crate::cascade::{file_extension, file_name};
use crate::lex_styles::LexStyles;

/// Language used when nothing else matches.
pub const FALLBACK_LANGUAGE: &str = "Text";

impl LexStyles {
    /// Language derived from `path` alone: explicit path override, then the
    /// exact file name, then the extension map, then the auto-extension map.
    ///
    /// A path override hit is promoted to most recently used.
    pub fn language_for_path(&mut self, path: &str) -> Option<String> {
        if let Some(lang) = self.state.path_overrides.touch(path) {
            return Some(lang);
        }

        let name = file_name(path);
        if let Some(lang) = self.state.file_lang.get(&name.to_ascii_lowercase()) {
            return Some(lang.clone());
        }

        let ext = file_extension(path);
        if ext.is_empty() {
            return None;
        }
        if let Some((_, lang)) = self
            .state
            .ext_lang
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        {
            return Some(lang.clone());
        }
        self.state
            .auto_ext_lang
            .get(&ext.to_ascii_lowercase())
            .cloned()
    }

    /// Language of a document.
    ///
    /// `first_line` is only called when content sniffing is needed. When the
    /// path's extension is listed by a detection rule, sniffing runs first
    /// and the path-derived language becomes the fallback.
    pub fn language_for_document(
        &mut self,
        path: Option<&str>,
        first_line: impl FnOnce() -> String,
    ) -> String {
        let Some(path) = path.filter(|p| !p.is_empty()) else {
            return self
                .sniff_language(&first_line())
                .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());
        };

        let ext = file_extension(path);
        let claimed = !ext.is_empty()
            && self
                .state
                .detection_rules
                .iter()
                .any(|rule| rule.claims_extension(ext));

        let by_path = self.language_for_path(path);
        if let Some(lang) = &by_path {
            if !claimed {
                return lang.clone();
            }
        }

        self.sniff_language(&first_line())
            .or(by_path)
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
    }

    /// First detection rule matching `line`, in registration order.
    pub fn sniff_language(&self, line: &str) -> Option<String> {
        self.state
            .detection_rules
            .iter()
            .find(|rule| rule.matches(line))
            .map(|rule| rule.language.clone())
    }

    /// Records the user's language choice for `path` and persists it.
    ///
    /// An extension no explicit mapping claims gets `language` as its new
    /// auto-extension default. Otherwise only this one path is overridden.
    pub fn set_lang_for_path(&mut self, path: &str, language: &str) {
        if self.language_for_path(path).as_deref() == Some(language) {
            return;
        }

        let ext = file_extension(path).to_ascii_lowercase();
        if !ext.is_empty() {
            let claimed = self
                .state
                .ext_lang
                .iter()
                .any(|(e, _)| e.eq_ignore_ascii_case(&ext));
            if !claimed {
                self.state.auto_ext_lang.insert(ext, language.to_string());
                self.persist_user_data();
                return;
            }
            self.state.auto_ext_lang.remove(&ext);
        }

        self.state.path_overrides.insert(path, language);
        self.persist_user_data();
    }

    fn persist_user_data(&mut self) {
        if let Err(e) = self.save_user_data() {
            tracing::warn!("Failed to save language preference: {e:#}");
        }
    }
}
