//! Per-category line colors shown in the overview strip.
use std::collections::BTreeMap;

use bowpad_config::Rgb;
use serde::{Deserialize, Serialize};

use crate::projection::LineMapper;

/// Kinds of line annotations, one overview column each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Bookmark = 1,
    SelectionMatch = 2,
    SearchMatch = 3,
}

impl Category {
    /// All categories in column order.
    pub const ALL: [Category; 3] = [Category::Bookmark, Category::SelectionMatch, Category::SearchMatch];

    /// Number of categories; the overview has one column per category.
    pub const COUNT: usize = Self::ALL.len();

    /// Parses the numeric id. `0` is the "every category" sentinel and is
    /// not a category itself.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| *c as u8 == id)
    }

    /// Zero-based column index.
    pub fn column(self) -> usize {
        self as usize - 1
    }
}

/// Document-line colors per category plus their visible-line projection.
///
/// The projection is recomputed lazily: every mutation that changes the
/// data sets `dirty`, and [`LineAnnotationIndex::recalculate`] rebuilds
/// the visible maps only when it is set.
#[derive(Debug, Clone, Default)]
pub struct LineAnnotationIndex {
    lines: [BTreeMap<usize, Rgb>; Category::COUNT],
    visible: [BTreeMap<usize, Rgb>; Category::COUNT],
    total_lines: usize,
    visible_lines: usize,
    dirty: bool,
}

impl LineAnnotationIndex {
    /// Creates an empty, clean index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the visible maps are stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Inserts or recolors a line.
    pub fn add_line_color(&mut self, category: Category, line: usize, color: Rgb) {
        let previous = self.lines[category.column()].insert(line, color);
        if previous != Some(color) {
            self.dirty = true;
        }
    }

    /// Removes the color of `line` in `category`, if any.
    pub fn remove_line(&mut self, category: Category, line: usize) {
        if self.lines[category.column()].remove(&line).is_some() {
            self.dirty = true;
        }
    }

    /// Clears one category, or every category for `None`.
    ///
    /// When anything was removed, all visible maps are dropped at once.
    pub fn clear(&mut self, category: Option<Category>) {
        match category {
            Some(c) => {
                let map = &mut self.lines[c.column()];
                if !map.is_empty() {
                    map.clear();
                    self.dirty = true;
                }
            }
            None => {
                for map in &mut self.lines {
                    if !map.is_empty() {
                        map.clear();
                        self.dirty = true;
                    }
                }
            }
        }
        if self.dirty {
            for map in &mut self.visible {
                map.clear();
            }
        }
    }

    /// Clears by numeric id, where `0` means every category.
    pub fn clear_id(&mut self, id: u8) {
        if id == 0 {
            self.clear(None);
        } else if let Some(category) = Category::from_id(id) {
            self.clear(Some(category));
        } else {
            tracing::debug!("Ignoring clear for unknown annotation category {id}");
        }
    }

    /// Sets the document length used to size the overview.
    pub fn set_total_lines(&mut self, lines: usize) {
        if self.total_lines != lines {
            self.dirty = true;
        }
        self.total_lines = lines;
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Call after folding or wrapping changed which lines are visible.
    pub fn visible_lines_changed(&mut self) {
        self.dirty = true;
    }

    /// Visible line count of the last recalculation.
    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    /// Rebuilds the visible maps through `mapper` if anything changed.
    ///
    /// Several document lines that land on the same visible line collapse
    /// into one entry; the highest document line's color wins.
    pub fn recalculate(&mut self, mapper: &impl LineMapper) {
        if !self.dirty {
            return;
        }
        for (lines, visible) in self.lines.iter().zip(self.visible.iter_mut()) {
            visible.clear();
            for (&line, &color) in lines {
                visible.insert(mapper.visible_from_doc_line(line), color);
            }
        }
        self.visible_lines = mapper.visible_from_doc_line(self.total_lines);
        self.dirty = false;
    }

    /// Color of a document line in `category`.
    pub fn line_color(&self, category: Category, line: usize) -> Option<Rgb> {
        self.lines[category.column()].get(&line).copied()
    }

    /// `(visible line, color)` pairs in ascending order, as of the last
    /// recalculation.
    pub fn visible_entries(&self, category: Category) -> impl Iterator<Item = (usize, Rgb)> + '_ {
        self.visible[category.column()].iter().map(|(&l, &c)| (l, c))
    }

    /// Number of colored document lines in `category`.
    pub fn len(&self, category: Category) -> usize {
        self.lines[category.column()].len()
    }

    /// True when no category has any line.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(BTreeMap::is_empty)
    }
}
