//! User-layer edits and their persistence to the user file.
use std::collections::BTreeMap;

use anyhow::Context;

use crate::cascade::{
    SECTION_AUTO_LANGUAGE, SECTION_HIDDEN_LANGS, SECTION_LANGUAGE, SECTION_PATH_LANGUAGE,
};
use crate::color::Rgb;
use crate::ini::IniDocument;
use crate::lex_styles::LexStyles;
use crate::lexer::{LexerId, UserLexerOverlay};
use crate::style::{FontStyle, StyleEntry, StyleIndex};
use crate::values::split_list;

impl LexStyles {
    /// Overrides the foreground color of one style in the user layer.
    pub fn set_user_foreground(&mut self, lexer: LexerId, style: StyleIndex, color: Rgb) {
        self.edit_user_style(lexer, style, |s| s.foreground = color);
    }

    /// Overrides the background color of one style in the user layer.
    pub fn set_user_background(&mut self, lexer: LexerId, style: StyleIndex, color: Rgb) {
        self.edit_user_style(lexer, style, |s| s.background = color);
    }

    /// Overrides the font name of one style in the user layer.
    pub fn set_user_font(&mut self, lexer: LexerId, style: StyleIndex, font: &str) {
        self.edit_user_style(lexer, style, |s| s.font_name = font.to_string());
    }

    /// Overrides the font size of one style in the user layer.
    pub fn set_user_font_size(&mut self, lexer: LexerId, style: StyleIndex, size: i32) {
        self.edit_user_style(lexer, style, |s| s.font_size = size);
    }

    /// Overrides the bold/italic/underline flags of one style.
    pub fn set_user_font_style(&mut self, lexer: LexerId, style: StyleIndex, font_style: FontStyle) {
        self.edit_user_style(lexer, style, |s| s.font_style = font_style);
    }

    /// Starts from the active override or the effective style and stores
    /// the edited copy in both the overlay and the effective profile.
    fn edit_user_style(&mut self, lexer: LexerId, style: StyleIndex, edit: impl FnOnce(&mut StyleEntry)) {
        let overlay = self
            .state
            .user_lexers
            .entry(lexer)
            .or_insert_with(|| UserLexerOverlay::new(lexer));
        let mut entry = overlay
            .get(style)
            .cloned()
            .or_else(|| {
                self.state
                    .lexers
                    .get(&lexer)
                    .and_then(|p| p.style(style))
                    .cloned()
            })
            .unwrap_or_default();
        edit(&mut entry);
        overlay.styles.insert(style, Some(entry.clone()));
        if let Some(profile) = self.state.lexers.get_mut(&lexer) {
            profile.styles.insert(style, entry);
        }
    }

    /// Drops the user override of one style, restoring the shipped value.
    pub fn reset_user_style(&mut self, lexer: LexerId, style: StyleIndex) {
        if let Some(overlay) = self.state.user_lexers.get_mut(&lexer) {
            overlay.styles.insert(style, None);
        }
        let shipped = self
            .state
            .shipped_lexers
            .get(&lexer)
            .and_then(|p| p.style(style))
            .cloned();
        if let Some(profile) = self.state.lexers.get_mut(&lexer) {
            match shipped {
                Some(entry) => profile.styles.insert(style, entry),
                None => profile.styles.remove(&style),
            };
        }
    }

    /// Whether the user overlay holds an override for this style.
    pub fn is_user_overridden(&self, lexer: LexerId, style: StyleIndex) -> bool {
        self.state
            .user_lexers
            .get(&lexer)
            .is_some_and(|o| o.get(style).is_some())
    }

    /// Replaces the user extension list of `lang`.
    pub fn set_user_ext(&mut self, extensions: &str, lang: &str) {
        self.state.user_ext_lang.retain(|_, l| l != lang);
        for ext in split_list(extensions, &[';', ' ', ',']) {
            self.state
                .user_ext_lang
                .insert(ext.to_ascii_lowercase(), lang.to_string());
        }
    }

    /// Hides or shows `lang` in language pickers; saved with the user data.
    pub fn set_language_hidden(&mut self, lang: &str, hidden: bool) {
        if hidden {
            self.state.hidden_langs.insert(lang.to_string());
        } else {
            self.state.hidden_langs.remove(lang);
        }
    }

    /// Writes the user layer and reloads everything from disk.
    ///
    /// Only values that differ from the merged non-user layers are written.
    /// Other sections already present in the user file are kept.
    pub fn save_user_data(&mut self) -> anyhow::Result<()> {
        let path = self.settings.user_file_path();
        let mut ini = if path.is_file() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            IniDocument::parse(&text)
        } else {
            IniDocument::new()
        };

        self.write_style_overrides(&mut ini);
        self.write_language_overrides(&mut ini);

        std::fs::create_dir_all(&self.settings.data_dir).with_context(|| {
            format!("Failed to create data directory {}", self.settings.data_dir.display())
        })?;
        std::fs::write(&path, ini.to_string())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Saved user configuration to {}", path.display());

        self.reset_user_data();
        Ok(())
    }

    fn write_style_overrides(&self, ini: &mut IniDocument) {
        let state = &self.state;
        for (id, overlay) in &state.user_lexers {
            if *id == 0 {
                continue;
            }
            let Some(section) = state.lexer_sections.get(id) else {
                tracing::warn!("No section known for lexer {id}; its user styles are not saved");
                continue;
            };
            ini.remove_section(section);

            let shipped = state.shipped_lexers.get(id);
            let mut overrides = overlay.effective_overrides(shipped).peekable();
            if overrides.peek().is_none() {
                continue;
            }
            ini.set(section, "Lexer", &id.to_string());
            for (index, entry) in overrides {
                let mut entry = entry.clone();
                if entry.name.is_empty() {
                    if let Some(default) = shipped.and_then(|p| p.style(index)) {
                        entry.name = default.name.clone();
                    }
                }
                ini.set(section, &format!("Style{index}"), &entry.to_config_value());
            }
        }
    }

    fn write_language_overrides(&self, ini: &mut IniDocument) {
        let state = &self.state;

        ini.remove_section(SECTION_LANGUAGE);
        let user_exts = group_by_language(state.user_ext_lang.iter().filter(|(ext, lang)| {
            !state
                .shipped_ext_lang
                .iter()
                .any(|(e, l)| e == *ext && l == *lang)
        }));
        for (lang, exts) in user_exts {
            ini.set(SECTION_LANGUAGE, lang, &exts.join(";"));
        }

        ini.remove_section(SECTION_AUTO_LANGUAGE);
        let auto_exts = group_by_language(
            state
                .auto_ext_lang
                .iter()
                .filter(|(ext, lang)| state.shipped_auto_ext_lang.get(*ext) != Some(*lang)),
        );
        for (lang, exts) in auto_exts {
            ini.set(SECTION_AUTO_LANGUAGE, lang, &exts.join(";"));
        }

        ini.remove_section(SECTION_PATH_LANGUAGE);
        for (i, (path, lang)) in state.path_overrides.iter().enumerate() {
            ini.set(SECTION_PATH_LANGUAGE, &format!("{i:03}"), &format!("{path}*{lang}"));
        }

        ini.remove_section(SECTION_HIDDEN_LANGS);
        for lang in state.hidden_langs.difference(&state.shipped_hidden) {
            ini.set(SECTION_HIDDEN_LANGS, lang, "1");
        }
        for lang in state.shipped_hidden.difference(&state.hidden_langs) {
            ini.set(SECTION_HIDDEN_LANGS, lang, "0");
        }
    }
}

fn group_by_language<'a>(
    pairs: impl Iterator<Item = (&'a String, &'a String)>,
) -> BTreeMap<&'a str, Vec<&'a str>> {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (ext, lang) in pairs {
        grouped.entry(lang.as_str()).or_default().push(ext.as_str());
    }
    grouped
}
