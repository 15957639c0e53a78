use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{FetchError, RowId};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// How the grid materializes rows. Fixed for the lifetime of a mounted grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderMode {
    /// One page at a time with pagination controls.
    #[default]
    Paged,
    /// All accumulated pages rendered as a plain list.
    Incremental,
    /// Accumulated pages rendered through the viewport window.
    Windowed,
}

impl RenderMode {
    pub fn is_incremental(self) -> bool {
        matches!(self, Self::Incremental | Self::Windowed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterOp {
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    GreaterThan,
    LessThan,
}

/// One condition of the advanced filter builder. Evaluated by the data source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterRule {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterState {
    /// Free-text search, applied after the debounce period.
    pub text: String,
    pub rules: Vec<FilterRule>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.rules.is_empty()
    }
}

/// Everything a data source needs to produce a page.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryParams {
    /// 1-based page number. Incremental modes always start at 1.
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<SortState>,
    pub filter: FilterState,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    /// Rows are available. `fetching_more` never hides rendered rows.
    Ready {
        fetching_more: bool,
    },
    Error(FetchError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableAction {
    SetSort(Option<SortState>),
    /// Cycles a column through ascending, descending and unsorted.
    ToggleSort(String),
    /// The debounced free-text filter.
    SetFilterText(String),
    SetFilterRules(Vec<FilterRule>),
    ClearFilters,
    SetPage(usize),
    SetPageSize(usize),
    /// Discards accumulated data and loads the current query again.
    Refresh,
    /// The server data changed (e.g. after a delete). Paged grids reload the current page in
    /// the background; incremental grids restart from empty.
    Invalidate,
    LoadStarted,
    LoadSucceeded,
    LoadFailed(FetchError),
    FetchMoreStarted,
    FetchMoreFinished,
    FetchMoreFailed(FetchError),
    DeleteStarted(RowId),
    DeleteFinished(RowId),
}

/// The full sort/filter/pagination/loading state of one grid.
///
/// All transitions go through [`reduce`], so observers never see a state where, say, the sort
/// changed but the page was not reset yet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableState {
    pub mode: RenderMode,
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<SortState>,
    pub filter: FilterState,
    /// Bumped whenever the query changes. Responses for an older epoch are stale.
    pub epoch: u64,
    pub phase: LoadPhase,
    /// The last failed "fetch more", shown inline below the rendered rows.
    pub fetch_more_error: Option<FetchError>,
    /// Rows with a delete request in flight.
    pub deleting: BTreeSet<RowId>,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(RenderMode::Paged, DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn new(mode: RenderMode, page_size: usize) -> Self {
        Self {
            mode,
            page: 1,
            page_size: page_size.max(1),
            sort: None,
            filter: FilterState::default(),
            epoch: 0,
            phase: LoadPhase::Idle,
            fetch_more_error: None,
            deleting: BTreeSet::new(),
        }
    }

    pub fn with_sort(mut self, sort: Option<SortState>) -> Self {
        self.sort = sort;
        self
    }

    pub fn query(&self) -> QueryParams {
        QueryParams {
            page: self.page,
            page_size: self.page_size,
            sort: self.sort.clone(),
            filter: self.filter.clone(),
        }
    }

    pub fn is_deleting(&self, id: RowId) -> bool {
        self.deleting.contains(&id)
    }

    pub fn sort_direction(&self, key: &str) -> Option<SortDirection> {
        self.sort
            .as_ref()
            .filter(|s| s.key == key)
            .map(|s| s.direction)
    }

    pub fn is_fetching_more(&self) -> bool {
        matches!(
            self.phase,
            LoadPhase::Ready {
                fetching_more: true
            }
        )
    }

    /// A new query: first page, fresh accumulation, loading.
    fn restart(&mut self) {
        self.page = 1;
        self.epoch = self.epoch.wrapping_add(1);
        self.phase = LoadPhase::Loading;
        self.fetch_more_error = None;
    }
}

/// Computes the next state. Pure; equal values are no-ops and do not start a new query.
pub fn reduce(mut state: TableState, action: TableAction) -> TableState {
    match action {
        TableAction::SetSort(sort) => {
            if state.sort != sort {
                state.sort = sort;
                state.restart();
            }
        }
        TableAction::ToggleSort(key) => {
            let next = match state.sort_direction(&key) {
                None => Some(SortState::asc(key)),
                Some(SortDirection::Asc) => Some(SortState::desc(key)),
                Some(SortDirection::Desc) => None,
            };
            state.sort = next;
            state.restart();
        }
        TableAction::SetFilterText(text) => {
            if state.filter.text != text {
                state.filter.text = text;
                state.restart();
            }
        }
        TableAction::SetFilterRules(rules) => {
            if state.filter.rules != rules {
                state.filter.rules = rules;
                state.restart();
            }
        }
        TableAction::ClearFilters => {
            if !state.filter.is_empty() {
                state.filter = FilterState::default();
                state.restart();
            }
        }
        TableAction::SetPage(page) => {
            if page >= 1 && page != state.page && !state.mode.is_incremental() {
                state.page = page;
                state.epoch = state.epoch.wrapping_add(1);
                state.phase = LoadPhase::Loading;
            }
        }
        TableAction::SetPageSize(page_size) => {
            if page_size >= 1 && page_size != state.page_size {
                state.page_size = page_size;
                state.restart();
            }
        }
        TableAction::Refresh => state.restart(),
        TableAction::Invalidate => {
            // Rows already shown stay up while the data reloads in the background.
            state.epoch = state.epoch.wrapping_add(1);
            if state.mode.is_incremental() {
                state.fetch_more_error = None;
                if let LoadPhase::Ready { .. } = state.phase {
                    state.phase = LoadPhase::Ready {
                        fetching_more: false,
                    };
                }
            }
        }
        TableAction::LoadStarted => {
            state.phase = LoadPhase::Loading;
            state.fetch_more_error = None;
        }
        TableAction::LoadSucceeded => {
            state.phase = LoadPhase::Ready {
                fetching_more: false,
            };
        }
        TableAction::LoadFailed(err) => {
            state.phase = LoadPhase::Error(err);
        }
        TableAction::FetchMoreStarted => {
            if let LoadPhase::Ready { .. } = state.phase {
                state.phase = LoadPhase::Ready {
                    fetching_more: true,
                };
                state.fetch_more_error = None;
            }
        }
        TableAction::FetchMoreFinished => {
            if let LoadPhase::Ready { .. } = state.phase {
                state.phase = LoadPhase::Ready {
                    fetching_more: false,
                };
            }
        }
        TableAction::FetchMoreFailed(err) => {
            if let LoadPhase::Ready { .. } = state.phase {
                state.phase = LoadPhase::Ready {
                    fetching_more: false,
                };
            }
            state.fetch_more_error = Some(err);
        }
        TableAction::DeleteStarted(id) => {
            state.deleting.insert(id);
        }
        TableAction::DeleteFinished(id) => {
            state.deleting.remove(&id);
        }
    }
    state
}
