//! Document line to visible line projection.
//!
//! The editing widget owns the real fold and wrap state; the overview only
//! needs its "visible line from document line" answer, abstracted here as
//! [`LineMapper`]. [`VisibleLineMap`] is a ready-made mapper built from
//! per-line display heights.

/// Maps a document line to the first visible line it occupies.
///
/// Must be monotonic. Lines at or beyond the document end map to the total
/// visible line count.
pub trait LineMapper {
    fn visible_from_doc_line(&self, doc_line: usize) -> usize;
}

impl<F> LineMapper for F
where
    F: Fn(usize) -> usize,
{
    fn visible_from_doc_line(&self, doc_line: usize) -> usize {
        self(doc_line)
    }
}

/// Identity projection for documents without folds or wrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLines;

impl LineMapper for IdentityLines {
    fn visible_from_doc_line(&self, doc_line: usize) -> usize {
        doc_line
    }
}

/// Precomputed projection for one fold/wrap state.
///
/// `heights[i]` is how many visible rows document line `i` occupies: 0 for
/// a line hidden inside a collapsed fold, more than 1 for a wrapped line.
/// A hidden line maps onto the row of the nearest visible line above it,
/// which is its fold header.
#[derive(Debug, Clone, Default)]
pub struct VisibleLineMap {
    /// `rows[i]` = visible row of document line `i`; for a hidden line
    /// this is the first row of its fold header.
    rows: Vec<usize>,
    total_visible: usize,
}

impl VisibleLineMap {
    /// Builds a map from per-line row counts.
    pub fn from_heights(heights: &[usize]) -> Self {
        let mut rows = Vec::with_capacity(heights.len());
        let mut cumulative = 0usize;
        // a hidden run before any visible line maps to row 0
        let mut header_row = 0usize;
        for &h in heights {
            if h == 0 {
                rows.push(header_row);
            } else {
                header_row = cumulative;
                rows.push(cumulative);
            }
            cumulative += h;
        }
        Self {
            rows,
            total_visible: cumulative,
        }
    }

    /// Builds a map for `total_lines` lines where each `(header, last)`
    /// range has its lines after `header` up to `last` collapsed.
    pub fn with_folds(total_lines: usize, folds: &[(usize, usize)]) -> Self {
        let mut heights = vec![1usize; total_lines];
        for &(header, last) in folds {
            let end = last.min(total_lines.saturating_sub(1));
            for h in heights.iter_mut().take(end + 1).skip(header + 1) {
                *h = 0;
            }
        }
        Self::from_heights(&heights)
    }

    /// Visible rows in the whole document.
    pub fn total_visible(&self) -> usize {
        self.total_visible
    }

    pub fn doc_lines(&self) -> usize {
        self.rows.len()
    }
}

impl LineMapper for VisibleLineMap {
    fn visible_from_doc_line(&self, doc_line: usize) -> usize {
        self.rows
            .get(doc_line)
            .copied()
            .unwrap_or(self.total_visible)
    }
}
