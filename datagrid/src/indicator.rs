use alloc::format;
use alloc::string::String;

use crate::Window;

/// Formats the "rows X-Y of Z" scroll indicator label.
///
/// Returns `None` when there are no rows. The upper bound is clamped to `total_rows`, so a
/// window computed against a longer list never overstates the position.
pub fn compute_label(window: &Window, total_rows: usize) -> Option<String> {
    if total_rows == 0 {
        return None;
    }
    let first = window.start_index.saturating_add(1).min(total_rows);
    let last = window.end_index.saturating_add(1).min(total_rows);
    Some(format!("rows {first}-{last} of {total_rows}"))
}
