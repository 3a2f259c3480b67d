//! Command implementations, writing their output to any `Write`.
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bowpad_config::LexStyles;

use crate::first_line;

/// Prints the language BowPad would pick for `path`.
pub fn resolve(styles: &mut LexStyles, path: &Path, out: &mut impl Write) -> Result<()> {
    let path_str = path.to_string_lossy();
    let language = styles.language_for_document(Some(&*path_str), || {
        first_line::read_first_line(path).unwrap_or_else(|e| {
            tracing::debug!("No content to sniff: {e:#}");
            String::new()
        })
    });
    writeln!(out, "{language}")?;
    Ok(())
}

/// Prints the style table of the lexer bound to `lang`.
pub fn styles(styles: &LexStyles, lang: &str, json: bool, out: &mut impl Write) -> Result<()> {
    if styles.language_data(lang).is_none() {
        bail!("unknown language: {lang}");
    }
    let lexer = styles.lexer_data_for_lang(lang);
    if json {
        serde_json::to_writer_pretty(&mut *out, lexer).context("failed to serialize styles")?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "{} (lexer {})", lexer.name, lexer.id)?;
    for (index, style) in &lexer.styles {
        writeln!(out, "Style{index}={}", style.to_config_value())?;
    }
    Ok(())
}

/// Records `lang` as the language of `path` and persists it.
pub fn set_lang(styles: &mut LexStyles, path: &str, lang: &str, out: &mut impl Write) -> Result<()> {
    if styles.language_data(lang).is_none() {
        bail!("unknown language: {lang}");
    }
    styles.set_lang_for_path(path, lang);
    writeln!(out, "{path}: {lang}")?;
    Ok(())
}

/// Prints language names, one per line.
pub fn languages(styles: &LexStyles, all: bool, out: &mut impl Write) -> Result<()> {
    let names = if all {
        styles.languages()
    } else {
        styles.visible_languages()
    };
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Prints the open/save dialog filters as `name\tpattern`.
pub fn filters(styles: &LexStyles, out: &mut impl Write) -> Result<()> {
    for ft in styles.file_types() {
        writeln!(out, "{}\t{}", ft.name, ft.pattern)?;
    }
    Ok(())
}
