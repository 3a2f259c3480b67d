//! Style entries: one record per lexer style index.
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::values::{parse_int, Diagnostics};

bitflags! {
    /// Font style flags as written in the fifth style field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontStyle: u32 {
        const BOLD = 1;
        const ITALIC = 2;
        const UNDERLINE = 4;
    }
}

/// Style index within a lexer, as used by the editing widget.
pub type StyleIndex = i32;

/// Display attributes of one lexer style.
///
/// Compared by full structural equality; that comparison decides whether a
/// user override differs from the shipped default and must be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub name: String,
    pub foreground: Rgb,
    pub background: Rgb,
    pub font_name: String,
    pub font_style: FontStyle,
    /// Point size; 0 inherits the default size.
    pub font_size: i32,
    pub eol_filled: bool,
}

impl Default for StyleEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            font_name: String::new(),
            font_style: FontStyle::empty(),
            font_size: 0,
            eol_filled: false,
        }
    }
}

impl StyleEntry {
    /// Parses `name;fg;bg;font;fontstyle;fontsize[;overridebg][;eolfilled]`.
    ///
    /// Variables must already be expanded. Fields are positional, so empty
    /// fields keep their slot and leave the default in place. The optional
    /// seventh field replaces the background, which lets a style take its
    /// colors from a variable and still override only the background. Any
    /// non-empty eighth field turns on EOL filling.
    pub(crate) fn parse(value: &str, diag: &Diagnostics, section: &str, key: &str) -> Self {
        let mut style = Self::default();
        let mut fields: Vec<&str> = value.split(';').collect();
        if fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        for (i, field) in fields.into_iter().enumerate() {
            match i {
                0 => {
                    if field.contains(',') {
                        diag.malformed(section, key, value);
                    }
                    style.name = field.to_string();
                }
                1 | 2 | 6 => {
                    if let Some(color) = Rgb::from_hex(field) {
                        if i == 1 {
                            style.foreground = color;
                        } else {
                            style.background = color;
                        }
                    } else if !field.trim().is_empty() {
                        diag.malformed(section, key, value);
                    }
                }
                3 => style.font_name = field.to_string(),
                4 => {
                    if let Some(flags) = parse_int(field, true, diag, section, key) {
                        style.font_style = FontStyle::from_bits_truncate(flags as u32);
                    }
                }
                5 => {
                    if let Some(size) = parse_int(field, true, diag, section, key) {
                        style.font_size = size;
                    }
                }
                7 => style.eol_filled = !field.trim().is_empty(),
                _ => {}
            }
        }
        style
    }

    /// Formats the entry in the same positional form [`StyleEntry::parse`] reads.
    ///
    /// A font size of 0 is written as an empty field. The override and
    /// EOL fields are only emitted when EOL filling is on.
    pub fn to_config_value(&self) -> String {
        let size = if self.font_size == 0 {
            String::new()
        } else {
            self.font_size.to_string()
        };
        let mut v = format!(
            "{};{};{};{};{};{}",
            self.name,
            self.foreground.to_hex(),
            self.background.to_hex(),
            self.font_name,
            self.font_style.bits(),
            size
        );
        if self.eol_filled {
            v.push_str(";;1");
        }
        v
    }
}
