//! Minimal INI document used by every configuration source.
//!
//! Section and key lookups are ASCII case-insensitive; the original
//! spelling and file order are preserved for iteration and writing.
//! Duplicate keys keep the position of the first occurrence and the value
//! of the last one.
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    name: String,
    entries: IndexMap<String, (String, String)>,
}

impl IniSection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(|(_, v)| v.as_str())
    }

    /// Keys in file order, in their original spelling.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(k, _)| k.as_str())
    }

    /// `(key, value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.values().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn set(&mut self, key: &str, value: &str) {
        let slot = self
            .entries
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| (key.to_string(), String::new()));
        slot.1 = value.to_string();
    }

    fn remove(&mut self, key: &str) -> bool {
        self.entries.shift_remove(&key.to_ascii_lowercase()).is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: IndexMap<String, IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses INI text. Lines that are neither comments, section headers
    /// nor `key=value` pairs are ignored.
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::new();
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut current = String::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(header) = line.strip_prefix('[') {
                if let Some(name) = header.strip_suffix(']') {
                    current = name.trim().to_string();
                    doc.section_entry(&current);
                    continue;
                }
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                doc.set(&current, key, value.trim());
            }
        }
        doc
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.get(&name.to_ascii_lowercase())
    }

    pub fn sections(&self) -> impl Iterator<Item = &IniSection> {
        self.sections.values()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Keys of `section` in file order; empty when the section is absent.
    pub fn keys<'a>(&'a self, section: &str) -> Vec<&'a str> {
        self.section(section)
            .map(|s| s.keys().collect())
            .unwrap_or_default()
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.section_entry(section).set(key, value);
    }

    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        self.sections
            .get_mut(&section.to_ascii_lowercase())
            .is_some_and(|s| s.remove(key))
    }

    pub fn remove_section(&mut self, section: &str) -> bool {
        self.sections
            .shift_remove(&section.to_ascii_lowercase())
            .is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(IniSection::is_empty)
    }

    fn section_entry(&mut self, name: &str) -> &mut IniSection {
        self.sections
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| IniSection::new(name))
    }
}

impl std::fmt::Display for IniDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for section in self.sections.values() {
            if section.is_empty() && section.name.is_empty() {
                continue;
            }
            if !first {
                writeln!(f)?;
            }
            first = false;
            if !section.name.is_empty() {
                writeln!(f, "[{}]", section.name)?;
            }
            for (key, value) in section.iter() {
                writeln!(f, "{key}={value}")?;
            }
        }
        Ok(())
    }
}
