use crate::Window;

/// Incremental loading progress, as reported by the external loading collaborator.
///
/// The grid only reads it: to decide when to ask for more rows and to render counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadState {
    pub items_loaded: usize,
    /// Total number of items on the server, when known.
    pub total_items_known: Option<usize>,
    pub has_more: bool,
    pub is_fetching_more: bool,
}

impl LoadState {
    pub fn should_request_more(&self, window: &Window, scroll_threshold_rows: usize) -> bool {
        should_request_more(
            window,
            self.items_loaded,
            self.has_more,
            self.is_fetching_more,
            scroll_threshold_rows,
        )
    }

    /// The best known row total: the server total if reported, else what has been loaded.
    pub fn total_rows(&self) -> usize {
        self.total_items_known.unwrap_or(self.items_loaded)
    }
}

/// Decides whether the window has come close enough to the end of the loaded rows to fetch the
/// next page.
///
/// Returns `true` iff `has_more && !is_fetching_more &&
/// window.end_index >= item_count - 1 - scroll_threshold_rows`.
///
/// This function holds no state. Callers must evaluate it once per window recomputation and set
/// their `is_fetching_more` flag before the next evaluation, so at most one fetch is in flight.
pub fn should_request_more(
    window: &Window,
    item_count: usize,
    has_more: bool,
    is_fetching_more: bool,
    scroll_threshold_rows: usize,
) -> bool {
    if !has_more {
        return false;
    }
    if is_fetching_more {
        gtrace!(
            end_index = window.end_index,
            "load-more suppressed: fetch in flight"
        );
        return false;
    }
    let trigger = item_count.saturating_sub(1).saturating_sub(scroll_threshold_rows);
    let hit = window.end_index >= trigger;
    if hit {
        gdebug!(
            end_index = window.end_index,
            item_count,
            scroll_threshold_rows,
            "load-more requested"
        );
    }
    hit
}
