use crate::{ConfigError, Window};

/// Computes the contiguous range of item indexes to materialize.
///
/// - `first_visible = floor(scroll_offset / row_height)`, clamped to the last item.
/// - `visible_count = ceil(viewport_height / row_height)`.
/// - the range is `[first_visible - overscan, first_visible + visible_count + overscan]`,
///   clamped to `[0, item_count - 1]`.
///
/// This is a pure function of its inputs: rapid scroll/resize sequences can call it on every
/// event and always get a correct window. Work is O(1); iterating the returned window is
/// O(window size).
///
/// Negative or NaN scroll offsets are treated as `0`. An empty list yields an empty window with
/// a `total_extent` of `0`; callers should render an explicit empty state for it.
pub fn compute_window(
    item_count: usize,
    scroll_offset: f64,
    viewport_height: f64,
    row_height: f64,
    overscan: usize,
) -> Result<Window, ConfigError> {
    if !(row_height.is_finite() && row_height > 0.0) {
        gwarn!(row_height, "compute_window: invalid row height");
        return Err(ConfigError::InvalidRowHeight(row_height));
    }
    if !(viewport_height.is_finite() && viewport_height >= 0.0) {
        gwarn!(viewport_height, "compute_window: invalid viewport height");
        return Err(ConfigError::InvalidViewportHeight(viewport_height));
    }
    if item_count == 0 {
        return Ok(Window::empty(row_height));
    }

    let last = item_count - 1;
    let scroll_offset = if scroll_offset.is_nan() {
        0.0
    } else {
        scroll_offset.max(0.0)
    };

    // Float → usize casts saturate, so huge offsets land on `last` after the clamp.
    let first_visible = ((scroll_offset / row_height).floor() as usize).min(last);
    let visible_count = (viewport_height / row_height).ceil() as usize;

    let start_index = first_visible.saturating_sub(overscan);
    let end_index = first_visible
        .saturating_add(visible_count)
        .saturating_add(overscan)
        .min(last);

    gtrace!(
        item_count,
        scroll_offset,
        start_index,
        end_index,
        "compute_window"
    );

    Ok(Window {
        start_index,
        end_index,
        item_count,
        row_height,
        total_extent: item_count as f64 * row_height,
    })
}
