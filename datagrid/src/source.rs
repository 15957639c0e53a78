use alloc::vec::Vec;

use crate::QueryParams;

/// A request for one page, tagged with the query epoch it was issued for.
///
/// The data source echoes the request back with its result; the grid drops results whose epoch
/// is no longer current instead of cancelling in-flight requests.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    pub epoch: u64,
    pub query: QueryParams,
}

/// One page of rows returned by a data source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page<R> {
    pub items: Vec<R>,
    /// 1-based.
    pub current_page: usize,
    pub total_pages: usize,
    pub total_item_count: usize,
}

impl<R> Page<R> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
            total_item_count: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}
