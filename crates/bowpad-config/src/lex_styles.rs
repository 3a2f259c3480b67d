//! The process-wide lexer/language context object.
use std::collections::BTreeMap;

use regex::Regex;

use crate::cascade::{merge_sources, CascadeState};
use crate::file_types::{filter_name_for_language, FileType};
use crate::language::LanguageProfile;
use crate::lexer::{LexerId, LexerProfile};
use crate::settings::CascadeSettings;
use crate::source::discover_sources;
use crate::values::Diagnostics;

static EMPTY_LEXER: LexerProfile = LexerProfile {
    id: 0,
    name: String::new(),
    styles: BTreeMap::new(),
    properties: BTreeMap::new(),
    annotations: BTreeMap::new(),
};

static EMPTY_KEYWORDS: BTreeMap<i32, String> = BTreeMap::new();

/// A compiled `annN_regex` pattern and its display text.
#[derive(Debug, Clone)]
struct CompiledAnnotation {
    regex: Regex,
    text: String,
}

/// The default extension to offer when saving a document of some language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultExtension {
    pub extension: String,
    /// Index into [`LexStyles::file_types`] when the extension came from
    /// the filter list rather than the user layer.
    pub filter_index: Option<usize>,
}

/// Merged lexer and language configuration.
///
/// Construct one at startup and hand references to every consumer. All
/// reads are served from memory; [`LexStyles::reload`] and
/// [`LexStyles::reset_user_data`] rebuild everything from disk.
#[derive(Debug)]
pub struct LexStyles {
    pub(crate) settings: CascadeSettings,
    pub(crate) state: CascadeState,
    annotations: BTreeMap<LexerId, Vec<CompiledAnnotation>>,
}

impl LexStyles {
    /// Loads the cascade described by `settings`.
    pub fn new(settings: CascadeSettings) -> Self {
        let mut styles = Self {
            settings,
            state: CascadeState::default(),
            annotations: BTreeMap::new(),
        };
        styles.load();
        styles
    }

    /// Settings the cascade was loaded with.
    pub fn settings(&self) -> &CascadeSettings {
        &self.settings
    }

    fn load(&mut self) {
        let sources = discover_sources(&self.settings);
        let diag = Diagnostics::new(self.settings.strict);
        self.state = merge_sources(&sources, self.settings.max_path_overrides, &diag);
        self.annotations = compile_annotations(&self.state.lexers);
    }

    /// Drops all merged state and loads every source again.
    pub fn reload(&mut self) {
        self.load();
    }

    /// Discards in-memory user changes by re-reading the user file along
    /// with every other source.
    pub fn reset_user_data(&mut self) {
        self.load();
    }

    // ── languages ──

    /// All language names, sorted.
    pub fn languages(&self) -> Vec<&str> {
        self.state.languages.keys().map(String::as_str).collect()
    }

    /// Language names not in the hidden set, sorted.
    pub fn visible_languages(&self) -> Vec<&str> {
        self.state
            .languages
            .keys()
            .filter(|lang| !self.state.hidden_langs.contains(*lang))
            .map(String::as_str)
            .collect()
    }

    /// Whether `lang` is in the hidden set.
    pub fn is_language_hidden(&self, lang: &str) -> bool {
        self.state.hidden_langs.contains(lang)
    }

    /// Merged profile of `lang`, if it is known.
    pub fn language_data(&self, lang: &str) -> Option<&LanguageProfile> {
        self.state.languages.get(lang)
    }

    /// Mutable access to the merged profile of `lang`.
    pub fn language_data_mut(&mut self, lang: &str) -> Option<&mut LanguageProfile> {
        self.state.languages.get_mut(lang)
    }

    /// Keyword lists of `lang`, with the user-function list regenerated first.
    pub fn keywords_for_lang(&mut self, lang: &str) -> &BTreeMap<i32, String> {
        match self.state.languages.get_mut(lang) {
            Some(profile) => {
                profile.regenerate_user_keywords();
                &profile.keywords
            }
            None => &EMPTY_KEYWORDS,
        }
    }

    /// Keyword lists of the first language (by name) bound to `lexer`.
    pub fn keywords_for_lexer(&mut self, lexer: LexerId) -> &BTreeMap<i32, String> {
        match self.state.languages.values_mut().find(|p| p.lexer == lexer) {
            Some(profile) => {
                profile.regenerate_user_keywords();
                &profile.keywords
            }
            None => &EMPTY_KEYWORDS,
        }
    }

    /// Adds a name to the user-function keyword list of `lang`.
    ///
    /// Returns `false` when the language is unknown, has no such list, or
    /// already holds the name.
    pub fn add_user_function_for_lang(&mut self, lang: &str, name: &str) -> bool {
        self.state
            .languages
            .get_mut(lang)
            .is_some_and(|p| p.add_user_function(name))
    }

    /// Line comment marker of `lang`, or `""`.
    pub fn comment_line_for_lang(&self, lang: &str) -> &str {
        self.language_data(lang).map_or("", |p| p.comment_line.as_str())
    }

    /// Opening block comment marker of `lang`, or `""`.
    pub fn comment_stream_start_for_lang(&self, lang: &str) -> &str {
        self.language_data(lang)
            .map_or("", |p| p.comment_stream_start.as_str())
    }

    /// Closing block comment marker of `lang`, or `""`.
    pub fn comment_stream_end_for_lang(&self, lang: &str) -> &str {
        self.language_data(lang)
            .map_or("", |p| p.comment_stream_end.as_str())
    }

    /// Whether line comments go in column 0 rather than at the indentation.
    pub fn comment_line_at_start_for_lang(&self, lang: &str) -> bool {
        self.language_data(lang)
            .is_some_and(|p| p.comment_line_at_start)
    }

    /// Pattern used to list the functions of a `lang` document.
    pub fn function_regex_for_lang(&self, lang: &str) -> &str {
        self.language_data(lang).map_or("", |p| p.function_regex.as_str())
    }

    pub fn function_regex_sort_for_lang(&self, lang: &str) -> i32 {
        self.language_data(lang).map_or(0, |p| p.function_regex_sort)
    }

    /// Strings trimmed from every function name match.
    pub fn function_regex_trim_for_lang(&self, lang: &str) -> &[String] {
        self.language_data(lang)
            .map(|p| p.function_regex_trim.as_slice())
            .unwrap_or_default()
    }

    // ── lexers ──

    /// The lexer bound to `lang`, or an empty profile when either is unknown.
    pub fn lexer_data_for_lang(&self, lang: &str) -> &LexerProfile {
        self.language_data(lang)
            .map_or(&EMPTY_LEXER, |p| self.lexer_data_for_lexer(p.lexer))
    }

    /// The profile of `lexer`, or an empty one with id 0.
    pub fn lexer_data_for_lexer(&self, lexer: LexerId) -> &LexerProfile {
        self.state.lexers.get(&lexer).unwrap_or(&EMPTY_LEXER)
    }

    /// First language (by name) bound to `lexer`, or `""`.
    pub fn language_for_lexer(&self, lexer: LexerId) -> &str {
        self.state
            .languages
            .iter()
            .find(|(_, p)| p.lexer == lexer)
            .map_or("", |(name, _)| name.as_str())
    }

    /// Display texts of every annotation of `lang`'s lexer matching `text`.
    pub fn annotations_for(&self, lang: &str, text: &str) -> Vec<&str> {
        let Some(profile) = self.language_data(lang) else {
            return Vec::new();
        };
        self.annotations
            .get(&profile.lexer)
            .map(|list| {
                list.iter()
                    .filter(|a| a.regex.is_match(text))
                    .map(|a| a.text.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    // ── extensions and filters ──

    /// `;`-joined user-layer extensions of `lang`.
    pub fn user_extensions_for_language(&self, lang: &str) -> String {
        self.state
            .user_ext_lang
            .iter()
            .filter(|(_, l)| l.as_str() == lang)
            .map(|(ext, _)| ext.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// A user extension of `lang` if one exists, otherwise the first
    /// extension of its filter entry.
    pub fn default_extension_for_language(&self, lang: &str) -> Option<DefaultExtension> {
        if let Some((ext, _)) = self.state.user_ext_lang.iter().find(|(_, l)| l.as_str() == lang) {
            return Some(DefaultExtension {
                extension: ext.clone(),
                filter_index: None,
            });
        }
        let name = filter_name_for_language(lang);
        let (index, entry) = self
            .state
            .file_types
            .iter()
            .enumerate()
            .find(|(_, ft)| ft.name == name)?;
        Some(DefaultExtension {
            extension: entry.first_extension()?.to_string(),
            filter_index: Some(index),
        })
    }

    /// The picker filter list, "All files" first.
    pub fn file_types(&self) -> &[FileType] {
        &self.state.file_types
    }
}

fn compile_annotations(lexers: &BTreeMap<LexerId, LexerProfile>) -> BTreeMap<LexerId, Vec<CompiledAnnotation>> {
    let mut out = BTreeMap::new();
    for (id, profile) in lexers {
        let compiled: Vec<CompiledAnnotation> = profile
            .annotations
            .iter()
            .filter_map(|(pattern, text)| match Regex::new(pattern) {
                Ok(regex) => Some(CompiledAnnotation {
                    regex,
                    text: text.clone(),
                }),
                Err(e) => {
                    tracing::warn!("Skipping invalid annotation pattern {pattern:?} of lexer {id}: {e}");
                    None
                }
            })
            .collect();
        if !compiled.is_empty() {
            out.insert(*id, compiled);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn bundled_only() -> (tempfile::TempDir, LexStyles) {
        let dir = tempfile::tempdir().unwrap();
        let styles = LexStyles::new(CascadeSettings::with_data_dir(dir.path()));
        (dir, styles)
    }

    #[test]
    fn test_bundled_python_example() {
        let (_dir, styles) = bundled_only();
        let lexer = styles.lexer_data_for_lang("Python");
        assert_eq!(lexer.id, 2);
        let style0 = lexer.style(0).unwrap();
        assert_eq!(style0.foreground, Rgb::new(0, 0, 0));
        assert_eq!(style0.font_name, "Consolas");
        assert_eq!(style0.font_size, 10);
    }

    #[test]
    fn test_reload_twice_yields_identical_state() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bplex"), "[language]\nPython=pyi\n[hiddenLangs]\nJava=1\n").unwrap();
        std::fs::write(
            dir.path().join("userconfig"),
            "[autolanguage]\nBash=conf\n[pathlanguage]\n000=/x/y.txt*Python\n",
        )
        .unwrap();
        let mut styles = LexStyles::new(CascadeSettings::with_data_dir(dir.path()));
        styles.reload();
        let first = styles.state.clone();
        styles.reload();
        assert_eq!(styles.state, first);
        assert_eq!(styles.state.detection_rules.len(), 10);
    }

    #[test]
    fn test_unknown_language_gets_empty_sentinels() {
        let (_dir, mut styles) = bundled_only();
        assert!(styles.lexer_data_for_lang("Cobol").styles.is_empty());
        assert!(styles.lexer_data_for_lexer(999).styles.is_empty());
        assert!(styles.keywords_for_lang("Cobol").is_empty());
        assert_eq!(styles.comment_line_for_lang("Cobol"), "");
        assert!(!styles.comment_line_at_start_for_lang("Cobol"));
        assert_eq!(styles.function_regex_sort_for_lang("Cobol"), 0);
        assert!(styles.function_regex_trim_for_lang("Cobol").is_empty());
        assert_eq!(styles.language_for_lexer(999), "");
    }

    #[test]
    fn test_comment_and_function_accessors() {
        let (_dir, styles) = bundled_only();
        assert_eq!(styles.comment_line_for_lang("Python"), "#");
        assert_eq!(styles.comment_stream_start_for_lang("Html"), "<!--");
        assert_eq!(styles.comment_stream_end_for_lang("C/C++"), "*/");
        assert!(styles.comment_line_at_start_for_lang("Bash"));
        assert_eq!(styles.function_regex_for_lang("Python"), "^\\s*def\\s+(\\w+)\\s*\\(");
        assert_eq!(styles.function_regex_trim_for_lang("Python"), ["(", ":"]);
    }

    #[test]
    fn test_language_for_lexer_uses_name_order() {
        let (_dir, styles) = bundled_only();
        assert_eq!(styles.language_for_lexer(3), "C/C++");
        assert_eq!(styles.lexer_data_for_lang("Java").id, 3);
    }

    #[test]
    fn test_user_functions_regenerate_keywords() {
        let (_dir, mut styles) = bundled_only();
        assert!(styles.add_user_function_for_lang("Python", "my_helper"));
        assert!(!styles.add_user_function_for_lang("Python", "my_helper"));
        assert!(!styles.add_user_function_for_lang("Xml", "nope"));
        let keywords = styles.keywords_for_lang("Python");
        assert_eq!(keywords.get(&2).map(String::as_str), Some("my_helper "));
    }

    #[test]
    fn test_annotations_match_text() {
        let (_dir, styles) = bundled_only();
        assert_eq!(styles.annotations_for("Python", "# TODO: fix"), vec!["open task"]);
        assert!(styles.annotations_for("Python", "nothing here").is_empty());
        assert!(styles.annotations_for("Xml", "TODO").is_empty());
    }

    #[test]
    fn test_default_extension_from_filter_list() {
        let (_dir, styles) = bundled_only();
        let ext = styles.default_extension_for_language("Python").unwrap();
        assert_eq!(ext.extension, "py");
        let index = ext.filter_index.unwrap();
        assert_eq!(styles.file_types()[index].name, "Python file");
        assert!(styles.default_extension_for_language("Cobol").is_none());
    }

    #[test]
    fn test_file_types_pinned_and_sorted() {
        let (_dir, styles) = bundled_only();
        let names: Vec<_> = styles.file_types().iter().map(|ft| ft.name.as_str()).collect();
        assert_eq!(names[0], "All files");
        let mut rest = names[1..].to_vec();
        rest.sort_by_key(|n| n.to_lowercase());
        assert_eq!(rest, names[1..]);
    }
}
