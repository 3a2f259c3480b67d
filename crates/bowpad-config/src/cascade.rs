//! Merges the ordered configuration sources into lexer and language maps.
//!
//! The merge runs pass by pass over all sources: variables first, then
//! lexers, then the language mappings and `lang_<name>` details. Every pass
//! reads the sources immutably and folds them into a fresh [`CascadeState`].
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::file_types::{FileType, FileTypesBuilder};
use crate::ini::IniDocument;
use crate::language::{builtin_detection_rules, DetectionRule, LanguageProfile};
use crate::lexer::{LexerId, LexerProfile, UserLexerOverlay};
use crate::path_overrides::PathOverrides;
use crate::source::ConfigSource;
use crate::style::StyleEntry;
use crate::values::{
    expand_variables, parse_int, split_list, strip_prefix_ci, strip_tilde, Diagnostics, Variables,
};

const SECTION_VARIABLES: &str = "variables";
const SECTION_LEXERS: &str = "lexers";
pub(crate) const SECTION_FILE_LANGUAGE: &str = "filelanguage";
pub(crate) const SECTION_AUTO_LANGUAGE: &str = "autolanguage";
pub(crate) const SECTION_PATH_LANGUAGE: &str = "pathlanguage";
pub(crate) const SECTION_LANGUAGE: &str = "language";
pub(crate) const SECTION_HIDDEN_LANGS: &str = "hiddenLangs";
const LANG_SECTION_PREFIX: &str = "lang_";

/// Everything one load cycle produces.
///
/// Extension and file-name keys are stored lowercased; language names keep
/// their case. The `shipped_*` fields are snapshots taken right before the
/// user layer was merged, used to decide which user values are worth saving.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct CascadeState {
    pub lexers: BTreeMap<LexerId, LexerProfile>,
    pub shipped_lexers: BTreeMap<LexerId, LexerProfile>,
    pub user_lexers: BTreeMap<LexerId, UserLexerOverlay>,
    /// Lexer id to the section name that declares it.
    pub lexer_sections: BTreeMap<LexerId, String>,
    pub languages: BTreeMap<String, LanguageProfile>,
    /// Extension multimap in insertion order.
    pub ext_lang: Vec<(String, String)>,
    pub shipped_ext_lang: Vec<(String, String)>,
    pub user_ext_lang: BTreeMap<String, String>,
    pub file_lang: BTreeMap<String, String>,
    pub auto_ext_lang: BTreeMap<String, String>,
    pub shipped_auto_ext_lang: BTreeMap<String, String>,
    pub path_overrides: PathOverrides,
    pub detection_rules: Vec<DetectionRule>,
    pub hidden_langs: BTreeSet<String>,
    pub shipped_hidden: BTreeSet<String>,
    pub file_types: Vec<FileType>,
}

/// Runs every merge pass over `sources`, which must already be in cascade order.
pub(crate) fn merge_sources(
    sources: &[ConfigSource],
    max_path_overrides: usize,
    diag: &Diagnostics,
) -> CascadeState {
    let vars = collect_variables(sources);
    let mut state = CascadeState {
        path_overrides: PathOverrides::with_capacity(max_path_overrides),
        detection_rules: builtin_detection_rules(),
        ..CascadeState::default()
    };
    let lang_lexers = merge_lexers(&mut state, sources, &vars, diag);
    let mut filters = FileTypesBuilder::default();
    merge_languages(&mut state, sources, &vars, &lang_lexers, &mut filters, diag);
    state.file_types = filters.finish();
    tracing::debug!(
        "Merged {} sources into {} lexers and {} languages",
        sources.len(),
        state.lexers.len(),
        state.languages.len()
    );
    state
}

fn collect_variables(sources: &[ConfigSource]) -> Variables {
    let mut vars = Variables::new();
    for source in sources {
        if let Some(section) = source.doc.section(SECTION_VARIABLES) {
            for (name, value) in section.iter() {
                vars.insert(format!("$({name})"), value.to_string());
            }
        }
    }
    vars
}

/// Lexer pass. Returns the language → lexer id bindings from `[lexers]`.
fn merge_lexers(
    state: &mut CascadeState,
    sources: &[ConfigSource],
    vars: &Variables,
    diag: &Diagnostics,
) -> HashMap<String, LexerId> {
    let mut lang_lexers = HashMap::new();
    let mut shipped = None;

    for source in sources {
        if source.is_user() && shipped.is_none() {
            shipped = Some(state.lexers.clone());
        }
        let doc = &source.doc;

        for section in doc.keys(SECTION_LEXERS) {
            match doc.get(section, "Lexer") {
                Some(raw) => {
                    if let Some(id) = parse_int(raw, false, diag, section, "Lexer") {
                        state.lexer_sections.insert(id, section.to_string());
                    }
                }
                None => tracing::debug!("Lexer section [{section}] has no Lexer= id"),
            }
        }

        // Known sections accumulate across sources, so a later layer can
        // override a lexer without redeclaring it in [lexers].
        let known: Vec<String> = state.lexer_sections.values().cloned().collect();
        for section in &known {
            let Some(raw) = doc.get(section, "Lexer").filter(|v| !v.is_empty()) else {
                continue;
            };
            let Some(id) = parse_int(raw, false, diag, section, "Lexer") else {
                continue;
            };

            if let Some(served) = doc.get(SECTION_LEXERS, section) {
                let served = expand_variables(served, vars, diag);
                for lang in split_list(&served, &[';']) {
                    lang_lexers.insert(lang.to_string(), id);
                }
            }

            let mut profile = state
                .lexers
                .remove(&id)
                .unwrap_or_else(|| LexerProfile::new(id));
            profile.id = id;
            let mut overlay = UserLexerOverlay::new(id);
            apply_lexer_section(&mut profile, &mut overlay, doc, section, vars, diag);
            if profile.name.is_empty() {
                profile.name = section.clone();
            }
            state.lexers.insert(id, profile);
            if source.is_user() {
                state.user_lexers.insert(id, overlay);
            }
        }
    }

    state.shipped_lexers = shipped.unwrap_or_else(|| state.lexers.clone());
    lang_lexers
}

fn apply_lexer_section(
    profile: &mut LexerProfile,
    overlay: &mut UserLexerOverlay,
    doc: &IniDocument,
    section: &str,
    vars: &Variables,
    diag: &Diagnostics,
) {
    let Some(entries) = doc.section(section) else {
        return;
    };
    let mut annotations: BTreeMap<i32, (Option<&str>, Option<&str>)> = BTreeMap::new();

    for (key, value) in entries.iter() {
        if let Some(index) = strip_prefix_ci(key, "Style") {
            let Some(index) = parse_int(index, false, diag, section, key) else {
                continue;
            };
            let expanded = expand_variables(value, vars, diag);
            let style = StyleEntry::parse(&expanded, diag, section, key);
            profile.styles.insert(index, style.clone());
            overlay.styles.insert(index, Some(style));
        } else if let Some(name) = strip_prefix_ci(key, "Prop_") {
            profile.properties.insert(name.to_string(), value.to_string());
        } else if key.eq_ignore_ascii_case("LexerName") {
            profile.name = value.to_string();
        } else if let Some(rest) = strip_prefix_ci(key, "ann") {
            match parse_annotation_key(rest) {
                Some((n, AnnotationField::Regex)) => annotations.entry(n).or_default().0 = Some(value),
                Some((n, AnnotationField::Text)) => annotations.entry(n).or_default().1 = Some(value),
                None => diag.malformed(section, key, value),
            }
        }
    }

    for (n, pair) in annotations {
        match pair {
            (Some(pattern), Some(text)) => {
                profile.annotations.insert(pattern.to_string(), text.to_string());
            }
            _ => tracing::warn!("Incomplete annotation ann{n} in [{section}]"),
        }
    }
}

enum AnnotationField {
    Regex,
    Text,
}

/// Splits `<N>_regex`, `<N>regex`, `<N>_text` or `<N>text`.
fn parse_annotation_key(rest: &str) -> Option<(i32, AnnotationField)> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let n = rest[..digits].parse().ok()?;
    let field = rest[digits..].trim_start_matches('_');
    if field.eq_ignore_ascii_case("regex") {
        Some((n, AnnotationField::Regex))
    } else if field.eq_ignore_ascii_case("text") {
        Some((n, AnnotationField::Text))
    } else {
        None
    }
}

/// Language mapping and detail passes.
fn merge_languages(
    state: &mut CascadeState,
    sources: &[ConfigSource],
    vars: &Variables,
    lang_lexers: &HashMap<String, LexerId>,
    filters: &mut FileTypesBuilder,
    diag: &Diagnostics,
) {
    let mut shipped_taken = false;

    for source in sources {
        let doc = &source.doc;
        let user = source.is_user();
        if user && !shipped_taken {
            state.shipped_ext_lang = state.ext_lang.clone();
            state.shipped_auto_ext_lang = state.auto_ext_lang.clone();
            state.shipped_hidden = state.hidden_langs.clone();
            shipped_taken = true;
        }

        if let Some(section) = doc.section(SECTION_FILE_LANGUAGE) {
            for (lang, value) in section.iter() {
                let files = expand_variables(value, vars, diag);
                for file in split_list(&files, &[';']) {
                    state
                        .file_lang
                        .insert(file_name(file).to_ascii_lowercase(), lang.to_string());
                }
            }
        }

        if let Some(section) = doc.section(SECTION_AUTO_LANGUAGE) {
            for (lang, value) in section.iter() {
                let exts = expand_variables(value, vars, diag);
                for ext in split_list(&exts, &[';']) {
                    state
                        .auto_ext_lang
                        .insert(ext.to_ascii_lowercase(), lang.to_string());
                }
            }
        }

        if user {
            if let Some(section) = doc.section(SECTION_PATH_LANGUAGE) {
                for (key, value) in section.iter() {
                    match value.split_once('*') {
                        Some((path, lang)) => state.path_overrides.push_oldest(path, lang),
                        None => diag.malformed(SECTION_PATH_LANGUAGE, key, value),
                    }
                }
            }
        }

        if let Some(section) = doc.section(SECTION_LANGUAGE) {
            for (lang, value) in section.iter() {
                let exts = expand_variables(value, vars, diag);
                let mut filter_exts = Vec::new();
                for ext in split_list(&exts, &[';']) {
                    let key = ext.to_ascii_lowercase();
                    state.ext_lang.push((key.clone(), lang.to_string()));
                    if user {
                        state.user_ext_lang.insert(key, lang.to_string());
                    } else {
                        filter_exts.push(ext);
                    }
                }
                filters.register(lang, &filter_exts);

                let profile = state.languages.entry(lang.to_string()).or_default();
                if let Some(&id) = lang_lexers.get(lang) {
                    profile.lexer = id;
                }
                let section_name = format!("{LANG_SECTION_PREFIX}{lang}");
                apply_language_section(profile, &mut state.detection_rules, doc, &section_name, lang, diag);
            }
        }

        if let Some(section) = doc.section(SECTION_HIDDEN_LANGS) {
            for (lang, value) in section.iter() {
                if value.trim() == "0" {
                    state.hidden_langs.remove(lang);
                } else {
                    state.hidden_langs.insert(lang.to_string());
                }
            }
        }
    }

    if !shipped_taken {
        state.shipped_ext_lang = state.ext_lang.clone();
        state.shipped_auto_ext_lang = state.auto_ext_lang.clone();
        state.shipped_hidden = state.hidden_langs.clone();
    }
}

fn apply_language_section(
    profile: &mut LanguageProfile,
    rules: &mut Vec<DetectionRule>,
    doc: &IniDocument,
    section_name: &str,
    lang: &str,
    diag: &Diagnostics,
) {
    let Some(section) = doc.section(section_name) else {
        return;
    };
    let detection_exts: Vec<String> = section
        .get("DetectionStringExts")
        .map(|v| split_list(v, &[';']).map(str::to_string).collect())
        .unwrap_or_default();

    for (key, value) in section.iter() {
        if let Some(index) = strip_prefix_ci(key, "keywords") {
            if let Some(index) = parse_int(index, false, diag, section_name, key) {
                profile.keywords.insert(index, value.to_string());
            }
        } else if key.eq_ignore_ascii_case("CommentLine") {
            profile.comment_line = strip_tilde(value).to_string();
        } else if key.eq_ignore_ascii_case("CommentStreamStart") {
            profile.comment_stream_start = strip_tilde(value).to_string();
        } else if key.eq_ignore_ascii_case("CommentStreamEnd") {
            profile.comment_stream_end = strip_tilde(value).to_string();
        } else if key.eq_ignore_ascii_case("CommentLineAtStart") {
            if let Some(v) = parse_int(value, false, diag, section_name, key) {
                profile.comment_line_at_start = v != 0;
            }
        } else if key.eq_ignore_ascii_case("FunctionRegex") {
            profile.function_regex = strip_tilde(value).to_string();
        } else if key.eq_ignore_ascii_case("FunctionRegexSort") {
            if let Some(v) = parse_int(value, false, diag, section_name, key) {
                profile.function_regex_sort = v;
            }
        } else if key.eq_ignore_ascii_case("FunctionRegexTrim") {
            profile.function_regex_trim = split_list(strip_tilde(value), &[','])
                .map(str::to_string)
                .collect();
        } else if key.eq_ignore_ascii_case("AutoCompleteRegex") {
            profile.auto_complete_regex = value.to_string();
        } else if key.eq_ignore_ascii_case("UserFunctions") {
            if let Some(v) = parse_int(value, false, diag, section_name, key) {
                profile.user_functions = v;
            }
        } else if key.eq_ignore_ascii_case("autocompletion") {
            profile.autocompletion = value.to_string();
        } else if let Some(sign) = strip_prefix_ci(key, "DetectionString") {
            if sign == "+" || sign == "-" {
                if let Some(mut rule) = DetectionRule::from_tagged(&format!("{sign}{lang}"), value) {
                    rule.extensions = detection_exts.clone();
                    rules.push(rule);
                }
            } else if !sign.eq_ignore_ascii_case("Exts") {
                diag.malformed(section_name, key, value);
            }
        }
    }
}

/// The last path component, splitting on both separator styles.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// The text after the last `.` of the file name, or `""`.
pub(crate) fn file_extension(path: &str) -> &str {
    let name = file_name(path);
    name.rfind('.').map(|i| &name[i + 1..]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::source::SourceOrigin;
    use std::path::PathBuf;

    fn bundled(text: &str) -> ConfigSource {
        ConfigSource::bundled(text)
    }

    fn plugin(text: &str) -> ConfigSource {
        ConfigSource {
            origin: SourceOrigin::Plugin(PathBuf::from("plugin.bplex")),
            doc: IniDocument::parse(text),
        }
    }

    fn user(text: &str) -> ConfigSource {
        ConfigSource {
            origin: SourceOrigin::User(PathBuf::from("userconfig")),
            doc: IniDocument::parse(text),
        }
    }

    fn merge(sources: &[ConfigSource]) -> CascadeState {
        merge_sources(sources, 100, &Diagnostics::new(false))
    }

    const BASE: &str = "\
[variables]
bg=FFFFFF
[lexers]
pythonlexer=Python;$(extra)
[pythonlexer]
Lexer=2
Style0=Default;000000;$(bg);Consolas;0;10
Style1=Comment;008000;$(bg);;2;
Prop_fold=1
ann1_regex=TODO
ann1_text=open task
[language]
Python=py;pyw
[lang_Python]
keywords1=def class
CommentLine=# ~
FunctionRegexTrim=(,:~
";

    // ── paths ──

    #[test]
    fn test_file_name_and_extension() {
        assert_eq!(file_name("C:\\dir/sub\\x.tar.gz"), "x.tar.gz");
        assert_eq!(file_extension("C:\\dir\\x.tar.gz"), "gz");
        assert_eq!(file_extension("/home/u/Makefile"), "");
        assert_eq!(file_extension("/home/u.d/Makefile"), "");
        assert_eq!(file_extension(".bashrc"), "bashrc");
    }

    // ── lexers ──

    #[test]
    fn test_variables_expand_in_styles_and_lexer_lists() {
        let extra = plugin("[variables]\nextra=Cython\n");
        let state = merge(&[bundled(BASE), extra]);
        let profile = &state.lexers[&2];
        assert_eq!(profile.name, "pythonlexer");
        assert_eq!(profile.style(0).unwrap().background, Rgb::WHITE);
        assert_eq!(profile.properties.get("fold").map(String::as_str), Some("1"));
        assert_eq!(profile.annotations.get("TODO").map(String::as_str), Some("open task"));
        assert_eq!(state.lexer_sections.get(&2).map(String::as_str), Some("pythonlexer"));
    }

    #[test]
    fn test_later_layer_overrides_single_style() {
        let override_src = plugin("[pythonlexer]\nLexer=2\nStyle1=Comment;FF0000;FFFFFF;;0;\n");
        let state = merge(&[bundled(BASE), override_src]);
        let profile = &state.lexers[&2];
        assert_eq!(profile.style(1).unwrap().foreground, Rgb::from_u32(0xFF0000));
        assert_eq!(profile.style(0).unwrap().font_name, "Consolas");
        assert!(state.user_lexers.is_empty());
    }

    #[test]
    fn test_user_layer_fills_sparse_overlay() {
        let user_src = user("[pythonlexer]\nLexer=2\nStyle0=Default;112233;FFFFFF;Consolas;0;10\n");
        let state = merge(&[bundled(BASE), user_src]);
        let overlay = &state.user_lexers[&2];
        assert_eq!(overlay.styles.len(), 1);
        assert_eq!(overlay.get(0).unwrap().foreground, Rgb::from_u32(0x112233));
        assert_eq!(state.lexers[&2].style(0).unwrap().foreground, Rgb::from_u32(0x112233));
        assert_eq!(state.shipped_lexers[&2].style(0).unwrap().foreground, Rgb::BLACK);
    }

    // ── languages ──

    #[test]
    fn test_language_binding_and_details() {
        let state = merge(&[bundled(BASE)]);
        let python = &state.languages["Python"];
        assert_eq!(python.lexer, 2);
        assert_eq!(python.keywords.get(&1).map(String::as_str), Some("def class"));
        assert_eq!(python.comment_line, "# ");
        assert_eq!(python.function_regex_trim, vec!["(", ":"]);
        assert_eq!(
            state.ext_lang,
            vec![("py".to_string(), "Python".to_string()), ("pyw".to_string(), "Python".to_string())]
        );
        assert_eq!(state.file_types[1].pattern, "*.py;*.pyw");
    }

    #[test]
    fn test_redefinition_keeps_unmentioned_fields() {
        let more = plugin("[language]\nPython=pyi\n[lang_Python]\nCommentStreamStart=\"\"\"\n");
        let state = merge(&[bundled(BASE), more]);
        let python = &state.languages["Python"];
        assert_eq!(python.comment_line, "# ");
        assert_eq!(python.comment_stream_start, "\"\"\"");
        assert_eq!(state.file_types.len(), 2);
        assert_eq!(state.file_types[1].pattern, "*.pyi");
    }

    #[test]
    fn test_user_extensions_skip_filter_list() {
        let user_src = user("[language]\nPython=pyx\n");
        let state = merge(&[bundled(BASE), user_src]);
        assert_eq!(state.user_ext_lang.get("pyx").map(String::as_str), Some("Python"));
        assert_eq!(state.file_types[1].pattern, "*.py;*.pyw");
        assert_eq!(state.shipped_ext_lang.len(), 2);
        assert_eq!(state.ext_lang.len(), 3);
    }

    #[test]
    fn test_path_language_reads_user_layer_only() {
        let shipped = plugin("[pathlanguage]\n000=C:\\a.txt*Python\n");
        let user_src = user("[pathlanguage]\n000=C:\\b.txt*Python\n001=C:\\c.txt*Text\n");
        let state = merge(&[bundled(BASE), shipped, user_src]);
        let paths: Vec<_> = state.path_overrides.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["C:\\b.txt", "C:\\c.txt"]);
    }

    #[test]
    fn test_detection_rules_follow_builtins() {
        let src = plugin(
            "[language]\nPython=py\n[lang_Python]\nDetectionString-=#!/usr/bin/env python\nDetectionStringExts=cgi;txt\n",
        );
        let state = merge(&[bundled(BASE), src]);
        let last = state.detection_rules.last().unwrap();
        assert_eq!(state.detection_rules.len(), builtin_detection_rules().len() + 1);
        assert_eq!(last.language, "Python");
        assert_eq!(last.extensions, vec!["cgi", "txt"]);
        assert!(last.matches("#!/usr/bin/env python3"));
    }

    #[test]
    fn test_hidden_langs_can_be_revoked() {
        let shipped = plugin("[hiddenLangs]\nPython=1\nText=1\n");
        let user_src = user("[hiddenLangs]\nText=0\n");
        let state = merge(&[bundled(BASE), shipped, user_src]);
        assert!(state.hidden_langs.contains("Python"));
        assert!(!state.hidden_langs.contains("Text"));
        assert!(state.shipped_hidden.contains("Text"));
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let src = plugin("[pythonlexer]\nLexer=2\nStyleX=Broken;000000;FFFFFF;;0;\n[language]\nPython=py\n[lang_Python]\nUserFunctions=two\n");
        let state = merge(&[bundled(BASE), src]);
        assert_eq!(state.lexers[&2].styles.len(), 2);
        assert_eq!(state.languages["Python"].user_functions, 0);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let sources = [bundled(BASE), plugin("[language]\nText=txt\n"), user("[autolanguage]\nPython=cfg\n")];
        assert_eq!(merge(&sources), merge(&sources));
    }
}
