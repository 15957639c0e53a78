use alloc::vec::Vec;
use core::ops::Range;

/// Identity of a data item. Items are owned by the loading collaborator; the grid only reads it.
pub type RowId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

/// A materialized row slot: data index plus its absolute position on the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowItem {
    pub index: usize,
    /// Offset from the top of the scrollable area, in pixels.
    pub offset: f64,
    pub size: f64,
}

impl WindowItem {
    pub fn end(&self) -> f64 {
        self.offset + self.size
    }
}

/// The contiguous range of item indexes to materialize for one render pass.
///
/// A `Window` is derived and ephemeral: it is recomputed on every scroll/resize/data-length
/// change and carries no identity across renders.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub start_index: usize,
    pub end_index: usize, // inclusive
    /// Number of items in the list the window was computed for.
    pub item_count: usize,
    pub row_height: f64,
    /// Height of the whole scrollable area (`item_count * row_height`).
    pub total_extent: f64,
}

impl Window {
    pub fn empty(row_height: f64) -> Self {
        Self {
            start_index: 0,
            end_index: 0,
            item_count: 0,
            row_height,
            total_extent: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    pub fn len(&self) -> usize {
        self.indexes().len()
    }

    /// The materialized indexes as a half-open range.
    pub fn indexes(&self) -> Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        self.start_index..self.end_index + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indexes().contains(&index)
    }

    /// Iterates over the materialized items without allocating.
    pub fn items(self) -> impl Iterator<Item = WindowItem> {
        let row_height = self.row_height;
        self.indexes().map(move |index| WindowItem {
            index,
            offset: index as f64 * row_height,
            size: row_height,
        })
    }

    pub fn for_each_item(&self, mut f: impl FnMut(WindowItem)) {
        for item in self.items() {
            f(item);
        }
    }

    /// Collects the materialized items into `out` (clears `out` first).
    pub fn collect_items(&self, out: &mut Vec<WindowItem>) {
        out.clear();
        out.reserve(self.len());
        out.extend(self.items());
    }

    /// Empty space above the first materialized row, for renderers that use spacer elements
    /// instead of absolute positioning.
    pub fn padding_before(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.start_index as f64 * self.row_height
    }

    /// Empty space below the last materialized row.
    pub fn padding_after(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let after = self.item_count - (self.end_index + 1);
        after as f64 * self.row_height
    }
}
