use crate::{Align, ConfigError, Window, compute_window};

/// A lightweight, serializable snapshot of the scroll container's geometry.
///
/// The orchestrating controller keeps only the latest value (last write wins); every window is
/// recomputed from it, so no stale recomputation is ever applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub height: f64,
    pub scroll_offset: f64,
}

impl Viewport {
    pub fn new(height: f64, scroll_offset: f64) -> Self {
        Self {
            height,
            scroll_offset,
        }
    }

    /// The largest meaningful scroll offset for a list of `total_extent` pixels.
    pub fn max_scroll_offset(&self, total_extent: f64) -> f64 {
        (total_extent - self.height).max(0.0)
    }

    pub fn clamp(self, total_extent: f64) -> Self {
        let max = self.max_scroll_offset(total_extent);
        let scroll_offset = if self.scroll_offset.is_nan() {
            0.0
        } else {
            self.scroll_offset.clamp(0.0, max)
        };
        Self {
            height: self.height,
            scroll_offset,
        }
    }

    pub fn window(
        &self,
        item_count: usize,
        row_height: f64,
        overscan: usize,
    ) -> Result<Window, ConfigError> {
        compute_window(
            item_count,
            self.scroll_offset,
            self.height,
            row_height,
            overscan,
        )
    }

    /// Computes the scroll offset that brings row `index` into view.
    ///
    /// Returns the clamped offset; the caller applies it to its scroll container.
    pub fn scroll_to_index_offset(
        &self,
        index: usize,
        item_count: usize,
        row_height: f64,
        align: Align,
    ) -> f64 {
        if item_count == 0 {
            return 0.0;
        }
        let index = index.min(item_count - 1);
        let start = index as f64 * row_height;
        let end = start + row_height;
        let view = self.height;

        let target = match align {
            Align::Start => start,
            Align::End => end - view,
            Align::Center => start + row_height / 2.0 - view / 2.0,
            Align::Auto => {
                let cur = self.scroll_offset;
                if start >= cur && end <= cur + view {
                    cur
                } else if start < cur {
                    start
                } else {
                    end - view
                }
            }
        };

        let total = item_count as f64 * row_height;
        Self::new(view, target).clamp(total).scroll_offset
    }
}
