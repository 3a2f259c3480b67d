//! Lexer profiles and the sparse user overlay.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::style::{StyleEntry, StyleIndex};

/// Numeric lexer id, matching the editing widget's lexer numbering.
pub type LexerId = i32;

/// The full style table of one lexer plus its properties and annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexerProfile {
    pub id: LexerId,
    /// Display name from `LexerName=`; falls back to the section name.
    pub name: String,
    pub styles: BTreeMap<StyleIndex, StyleEntry>,
    /// `Prop_<name>` values, UTF-8, ordered by name.
    pub properties: BTreeMap<String, String>,
    /// Regex pattern to annotation display text.
    pub annotations: BTreeMap<String, String>,
}

impl LexerProfile {
    pub fn new(id: LexerId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Style entry at `index`, if the lexer defines one.
    pub fn style(&self, index: StyleIndex) -> Option<&StyleEntry> {
        self.styles.get(&index)
    }
}

/// User-layer overrides for one lexer.
///
/// `Some` holds an overridden style, `None` marks a style explicitly reset
/// to the shipped default. Indices that are absent were never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserLexerOverlay {
    pub id: LexerId,
    pub styles: BTreeMap<StyleIndex, Option<StyleEntry>>,
}

impl UserLexerOverlay {
    pub fn new(id: LexerId) -> Self {
        Self {
            id,
            styles: BTreeMap::new(),
        }
    }

    /// The override for `index`, if one is active.
    pub fn get(&self, index: StyleIndex) -> Option<&StyleEntry> {
        self.styles.get(&index).and_then(Option::as_ref)
    }

    /// Overrides that differ from `shipped`, i.e. the entries worth persisting.
    pub fn effective_overrides<'a>(
        &'a self,
        shipped: Option<&'a LexerProfile>,
    ) -> impl Iterator<Item = (StyleIndex, &'a StyleEntry)> + 'a {
        self.styles.iter().filter_map(move |(index, entry)| {
            let entry = entry.as_ref()?;
            let default = shipped.and_then(|p| p.style(*index));
            (default != Some(entry)).then_some((*index, entry))
        })
    }
}
