//! Bounded most-recent-first list of per-path language overrides.
use std::collections::VecDeque;

/// Cap used when no other capacity is configured.
pub const DEFAULT_PATH_OVERRIDE_CAPACITY: usize = 100;

/// Explicit path → language overrides.
///
/// Paths compare case-insensitively. The front of the list is the most
/// recently used entry; inserting beyond the capacity evicts from the back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOverrides {
    entries: VecDeque<(String, String)>,
    capacity: usize,
}

impl Default for PathOverrides {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_PATH_OVERRIDE_CAPACITY)
    }
}

impl PathOverrides {
    /// Creates an empty list that keeps at most `capacity` paths.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records `path` as the most recent override.
    pub fn insert(&mut self, path: &str, language: &str) {
        self.remove(path);
        self.entries.push_front((path.to_string(), language.to_string()));
        self.entries.truncate(self.capacity);
    }

    /// Appends an entry as the least recent one, used when loading the
    /// persisted list. A duplicate path keeps its earlier, more recent slot.
    pub fn push_oldest(&mut self, path: &str, language: &str) {
        if self.position(path).is_some() || self.entries.len() >= self.capacity {
            return;
        }
        self.entries.push_back((path.to_string(), language.to_string()));
    }

    /// Looks up `path` without touching recency.
    pub fn peek(&self, path: &str) -> Option<&str> {
        self.position(path).map(|i| self.entries[i].1.as_str())
    }

    /// Looks up `path` and moves it to the front.
    pub fn touch(&mut self, path: &str) -> Option<String> {
        let i = self.position(path)?;
        let entry = self.entries.remove(i)?;
        let language = entry.1.clone();
        self.entries.push_front(entry);
        Some(language)
    }

    /// Forgets the override for `path`, returning its language.
    pub fn remove(&mut self, path: &str) -> Option<String> {
        let i = self.position(path)?;
        self.entries.remove(i).map(|(_, lang)| lang)
    }

    /// `(path, language)` pairs, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, l)| (p.as_str(), l.as_str()))
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(p, _)| p.eq_ignore_ascii_case(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_most_recent_first() {
        let mut po = PathOverrides::default();
        po.insert("a", "Python");
        po.insert("b", "Text");
        let paths: Vec<_> = po.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["b", "a"]);
    }

    #[test]
    fn test_reinsert_replaces_case_insensitively() {
        let mut po = PathOverrides::default();
        po.insert("C:\\Foo.txt", "Python");
        po.insert("c:\\foo.TXT", "Text");
        assert_eq!(po.len(), 1);
        assert_eq!(po.peek("C:\\FOO.TXT"), Some("Text"));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut po = PathOverrides::default();
        for i in 0..101 {
            po.insert(&format!("file{i}"), "Text");
        }
        assert_eq!(po.len(), 100);
        assert!(po.peek("file0").is_none());
        assert!(po.peek("file1").is_some());
        assert_eq!(po.iter().next().map(|(p, _)| p), Some("file100"));
    }

    #[test]
    fn test_touch_promotes() {
        let mut po = PathOverrides::with_capacity(3);
        po.insert("a", "A");
        po.insert("b", "B");
        po.insert("c", "C");
        assert_eq!(po.touch("A").as_deref(), Some("A"));
        let paths: Vec<_> = po.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "c", "b"]);
        // "b" is now the oldest
        po.insert("d", "D");
        assert!(po.peek("b").is_none());
    }

    #[test]
    fn test_push_oldest_preserves_file_order() {
        let mut po = PathOverrides::with_capacity(2);
        po.push_oldest("first", "A");
        po.push_oldest("second", "B");
        po.push_oldest("third", "C");
        po.push_oldest("FIRST", "Z");
        let items: Vec<_> = po.iter().collect();
        assert_eq!(items, vec![("first", "A"), ("second", "B")]);
    }
}
