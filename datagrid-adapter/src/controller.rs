use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use datagrid::{
    Align, ColumnSet, ConfigError, FetchError, FilterRule, LoadPhase, LoadState, Page, PageRequest,
    RenderMode, RenderOptions, Row, RowFragment, RowId, SavedView, SortDirection, SortState,
    TableAction, TableState, ValidationErrors, ViewDraft, ViewError, ViewId, ViewStore, Viewport,
    VirtualizationConfig, Window, WindowItem, compute_label, reduce, render_row,
};

use crate::{
    DEFAULT_INDICATOR_QUIET_MS, Debouncer, LoadOutcome, Loader, PrefetchContext, ScrollIndicator,
};

/// Quiet period after the last filter keystroke before the filter applies.
pub const DEFAULT_FILTER_DEBOUNCE_MS: u64 = 300;

/// Configuration for [`DataTable`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataTableOptions {
    pub mode: RenderMode,
    pub page_size: usize,
    pub virtualization: VirtualizationConfig,
    pub filter_debounce_ms: u64,
    pub indicator_quiet_ms: u64,
    /// Maximum displayed characters per cell; `0` disables truncation.
    pub truncate_at: usize,
    pub row_clickable: bool,
    pub show_actions: bool,
    /// Stop accumulating once this many rows are loaded (incremental modes).
    pub max_items: Option<usize>,
    /// Saved views and export file names are keyed by this tag.
    pub entity_type: String,
    pub initial_sort: Option<SortState>,
}

impl DataTableOptions {
    pub fn new(mode: RenderMode, entity_type: impl Into<String>) -> Self {
        Self {
            mode,
            page_size: datagrid::DEFAULT_PAGE_SIZE,
            virtualization: VirtualizationConfig::default(),
            filter_debounce_ms: DEFAULT_FILTER_DEBOUNCE_MS,
            indicator_quiet_ms: DEFAULT_INDICATOR_QUIET_MS,
            truncate_at: datagrid::DEFAULT_TRUNCATE_AT,
            row_clickable: false,
            show_actions: true,
            max_items: None,
            entity_type: entity_type.into(),
            initial_sort: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_virtualization(mut self, virtualization: VirtualizationConfig) -> Self {
        self.virtualization = virtualization;
        self
    }

    pub fn with_filter_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.filter_debounce_ms = delay_ms;
        self
    }

    pub fn with_indicator_quiet_ms(mut self, quiet_ms: u64) -> Self {
        self.indicator_quiet_ms = quiet_ms;
        self
    }

    pub fn with_truncate_at(mut self, truncate_at: usize) -> Self {
        self.truncate_at = truncate_at;
        self
    }

    pub fn with_row_clickable(mut self, row_clickable: bool) -> Self {
        self.row_clickable = row_clickable;
        self
    }

    pub fn with_show_actions(mut self, show_actions: bool) -> Self {
        self.show_actions = show_actions;
        self
    }

    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_initial_sort(mut self, sort: Option<SortState>) -> Self {
        self.initial_sort = sort;
        self
    }
}

/// Work the host must perform on behalf of the grid.
///
/// Results come back through [`DataTable::page_loaded`] and [`DataTable::delete_finished`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FetchPage(PageRequest),
    Delete(RowId),
    /// Fire-and-forget prefetch of a row's detail view.
    Prefetch(RowId),
}

/// A delete waiting for user confirmation. Pass it to [`DataTable::confirm_delete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: RowId,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub width: Option<f64>,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pagination {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowsView {
    pub header: Vec<HeaderCell>,
    pub rows: Vec<RowFragment>,
    /// Height of the scrollable area.
    pub total_extent: f64,
    /// "rows X-Y of Z", windowed mode only.
    pub label: Option<String>,
    pub indicator_visible: bool,
    pub pagination: Option<Pagination>,
    pub fetching_more: bool,
    pub has_more: bool,
    pub fetch_more_error: Option<String>,
    pub delete_error: Option<String>,
}

/// What the host should draw for the current state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableView {
    Loading,
    /// Shown with a retry button wired to [`DataTable::retry`].
    Error { message: String },
    Empty,
    Rows(RowsView),
}

#[derive(Clone, Debug)]
enum Data<R> {
    Paged(Option<Page<R>>),
    Incremental(Loader<R>),
}

/// A framework-neutral data grid controller.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `mount` once, then `on_viewport` / `on_scroll` / setters when UI events occur
/// - `tick(now_ms)` from a timer (filter debounce and scroll indicator)
/// - `page_loaded` / `delete_finished` when remote calls complete
///
/// Every event returns the [`Command`]s the host must run. `render` turns the current state into
/// a [`TableView`].
#[derive(Clone, Debug)]
pub struct DataTable<R> {
    options: DataTableOptions,
    columns: ColumnSet<R>,
    state: TableState,
    data: Data<R>,
    viewport: Viewport,
    filter: Debouncer<String>,
    indicator: ScrollIndicator,
    prefetch: PrefetchContext,
    delete_error: Option<(RowId, FetchError)>,
    mounted: bool,
}

impl<R: Row> DataTable<R> {
    pub fn new(options: DataTableOptions, columns: ColumnSet<R>) -> Result<Self, ConfigError> {
        options.virtualization.validate()?;
        if options.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        let state = TableState::new(options.mode, options.page_size)
            .with_sort(options.initial_sort.clone());
        let data = if options.mode.is_incremental() {
            Data::Incremental(Loader::new(options.max_items))
        } else {
            Data::Paged(None)
        };
        let v = options.virtualization;
        adebug!(mode = ?options.mode, page_size = options.page_size, "DataTable::new");
        Ok(Self {
            viewport: Viewport::new(v.container_height, 0.0),
            filter: Debouncer::new(options.filter_debounce_ms),
            indicator: ScrollIndicator::new(
                v.show_scroll_indicator && options.mode == RenderMode::Windowed,
                options.indicator_quiet_ms,
            ),
            prefetch: PrefetchContext::new(state.epoch),
            delete_error: None,
            mounted: false,
            options,
            columns,
            state,
            data,
        })
    }

    pub fn options(&self) -> &DataTableOptions {
        &self.options
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The scroll offset the host's container should show. Reset to `0` on every new query.
    pub fn scroll_offset(&self) -> f64 {
        self.viewport.scroll_offset
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Starts the grid and requests the first page.
    pub fn mount(&mut self) -> Vec<Command> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        self.dispatch(TableAction::LoadStarted);
        self.fetch_current()
    }

    /// Cancels the filter debounce and the indicator timer. Later events are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.filter.cancel();
        self.indicator.cancel();
    }

    /// Applies `action` and returns whether it started a new query.
    fn dispatch(&mut self, action: TableAction) -> bool {
        let epoch = self.state.epoch;
        self.state = reduce(mem::take(&mut self.state), action);
        let restarted = self.state.epoch != epoch;
        if restarted {
            self.prefetch.reset(self.state.epoch);
        }
        restarted
    }

    fn fetch_current(&mut self) -> Vec<Command> {
        let epoch = self.state.epoch;
        let query = self.state.query();
        let request = match &mut self.data {
            Data::Paged(_) => PageRequest { epoch, query },
            Data::Incremental(loader) => loader.refetch(epoch, query),
        };
        vec![Command::FetchPage(request)]
    }

    fn restart(&mut self, action: TableAction) -> Vec<Command> {
        if !self.dispatch(action) || !self.mounted {
            return Vec::new();
        }
        self.viewport.scroll_offset = 0.0;
        self.fetch_current()
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) -> Vec<Command> {
        self.restart(TableAction::SetSort(sort))
    }

    /// Cycles the sort of a sortable column: ascending, descending, unsorted.
    pub fn toggle_sort(&mut self, key: &str) -> Vec<Command> {
        if !self.columns.get(key).is_some_and(|c| c.sortable) {
            return Vec::new();
        }
        self.restart(TableAction::ToggleSort(key.to_string()))
    }

    /// Schedules the free-text filter. It applies after the debounce period, from `tick`.
    pub fn set_filter_text(&mut self, text: impl Into<String>, now_ms: u64) {
        if !self.mounted {
            return;
        }
        self.filter.schedule(text.into(), now_ms);
    }

    /// The text typed but not applied yet.
    pub fn pending_filter_text(&self) -> Option<&str> {
        self.filter.pending().map(String::as_str)
    }

    pub fn set_filter_rules(&mut self, rules: Vec<FilterRule>) -> Vec<Command> {
        self.restart(TableAction::SetFilterRules(rules))
    }

    pub fn clear_filters(&mut self) -> Vec<Command> {
        self.filter.cancel();
        self.restart(TableAction::ClearFilters)
    }

    pub fn set_page(&mut self, page: usize) -> Vec<Command> {
        self.restart(TableAction::SetPage(page))
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Vec<Command> {
        self.restart(TableAction::SetPageSize(page_size))
    }

    /// Reloads from the first page.
    pub fn refresh(&mut self) -> Vec<Command> {
        self.restart(TableAction::Refresh)
    }

    /// Advances timers: applies a due filter and hides the scroll indicator after its quiet
    /// period.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Command> {
        if !self.mounted {
            return Vec::new();
        }
        self.indicator.tick(now_ms);
        match self.filter.poll(now_ms) {
            Some(text) => self.restart(TableAction::SetFilterText(text)),
            None => Vec::new(),
        }
    }

    pub fn on_viewport(&mut self, height: f64) -> Vec<Command> {
        if !(height.is_finite() && height >= 0.0) {
            awarn!(height, "ignoring invalid viewport height");
            return Vec::new();
        }
        self.viewport.height = height;
        self.maybe_load_more()
    }

    /// Records the latest scroll offset (last write wins) and evaluates load-more once.
    pub fn on_scroll(&mut self, scroll_offset: f64, now_ms: u64) -> Vec<Command> {
        if !self.mounted {
            return Vec::new();
        }
        self.viewport.scroll_offset = scroll_offset;
        self.indicator.on_scroll(now_ms);
        self.maybe_load_more()
    }

    pub fn on_row_hover(&mut self, id: RowId) -> Vec<Command> {
        if self.mounted && self.prefetch.on_hover(self.state.epoch, id) {
            vec![Command::Prefetch(id)]
        } else {
            Vec::new()
        }
    }

    fn row_height(&self) -> f64 {
        self.options.virtualization.row_height
    }

    /// The window over the loaded rows for the current viewport.
    pub fn window(&self) -> Window {
        let v = &self.options.virtualization;
        // Row height was validated in `new` and viewport heights in `on_viewport`.
        self.viewport
            .window(self.rows().len(), v.row_height, v.overscan)
            .unwrap_or_else(|_| Window::empty(v.row_height))
    }

    /// Scrolls loaded row `index` into view and returns the offset the host's scroll container
    /// should apply. The container's scroll event comes back through [`Self::on_scroll`].
    pub fn scroll_to_row(&mut self, index: usize, align: Align) -> f64 {
        let offset = self.viewport.scroll_to_index_offset(
            index,
            self.rows().len(),
            self.row_height(),
            align,
        );
        self.viewport.scroll_offset = offset;
        offset
    }

    fn maybe_load_more(&mut self) -> Vec<Command> {
        if !self.mounted || !matches!(self.state.phase, LoadPhase::Ready { .. }) {
            return Vec::new();
        }
        let window = self.window();
        let threshold = self.options.virtualization.scroll_threshold_rows;
        let Data::Incremental(loader) = &mut self.data else {
            return Vec::new();
        };
        if !loader.load_state().should_request_more(&window, threshold) {
            return Vec::new();
        }
        let Some(request) = loader.begin_next_page() else {
            return Vec::new();
        };
        self.dispatch(TableAction::FetchMoreStarted);
        vec![Command::FetchPage(request)]
    }

    /// Applies the result of a [`Command::FetchPage`]. Results for an older query are dropped.
    pub fn page_loaded(
        &mut self,
        request: PageRequest,
        result: Result<Page<R>, FetchError>,
    ) -> Vec<Command> {
        if !self.mounted {
            return Vec::new();
        }
        let action = match &mut self.data {
            Data::Paged(current) => {
                if request.epoch != self.state.epoch {
                    adebug!(
                        request_epoch = request.epoch,
                        epoch = self.state.epoch,
                        "dropping stale page"
                    );
                    return Vec::new();
                }
                match result {
                    Ok(page) => {
                        let past_end = page.items.is_empty()
                            && page.current_page > 1
                            && page.total_pages < page.current_page;
                        let last_page = page.total_pages.max(1);
                        *current = Some(page);
                        if past_end {
                            // The page emptied (e.g. its last row was deleted); step back.
                            self.dispatch(TableAction::LoadSucceeded);
                            return self.set_page(last_page);
                        }
                        TableAction::LoadSucceeded
                    }
                    Err(err) => TableAction::LoadFailed(err),
                }
            }
            Data::Incremental(loader) => match loader.page_loaded(&request, result) {
                LoadOutcome::FirstPage => TableAction::LoadSucceeded,
                LoadOutcome::NextPage => TableAction::FetchMoreFinished,
                LoadOutcome::FirstPageFailed(err) => TableAction::LoadFailed(err),
                LoadOutcome::NextPageFailed(err) => TableAction::FetchMoreFailed(err),
                LoadOutcome::Stale => return Vec::new(),
            },
        };
        // A failed next page waits for `retry` or the next scroll.
        let failed = matches!(action, TableAction::FetchMoreFailed(_));
        self.dispatch(action);
        if failed {
            return Vec::new();
        }
        self.maybe_load_more()
    }

    /// Re-issues the failed fetch: the whole query after a load error, or the next page after a
    /// failed load-more.
    pub fn retry(&mut self) -> Vec<Command> {
        if !self.mounted {
            return Vec::new();
        }
        if let LoadPhase::Error(_) = self.state.phase {
            self.dispatch(TableAction::LoadStarted);
            return self.fetch_current();
        }
        if self.state.fetch_more_error.is_none() {
            return Vec::new();
        }
        let Data::Incremental(loader) = &mut self.data else {
            return Vec::new();
        };
        let Some(request) = loader.begin_next_page() else {
            return Vec::new();
        };
        self.dispatch(TableAction::FetchMoreStarted);
        vec![Command::FetchPage(request)]
    }

    /// The rows currently loaded: the current page, or everything accumulated so far.
    pub fn rows(&self) -> &[R] {
        match &self.data {
            Data::Paged(Some(page)) => &page.items,
            Data::Paged(None) => &[],
            Data::Incremental(loader) => loader.items(),
        }
    }

    pub fn load_state(&self) -> LoadState {
        match &self.data {
            Data::Paged(page) => LoadState {
                items_loaded: page.as_ref().map_or(0, |p| p.items.len()),
                total_items_known: page.as_ref().map(|p| p.total_item_count),
                has_more: false,
                is_fetching_more: false,
            },
            Data::Incremental(loader) => loader.load_state(),
        }
    }

    /// Asks to delete a loaded row. The host shows a confirmation and then calls
    /// [`Self::confirm_delete`].
    pub fn request_delete(&self, id: RowId) -> Option<PendingDelete> {
        if self.state.is_deleting(id) || !self.rows().iter().any(|r| r.id() == id) {
            return None;
        }
        Some(PendingDelete { id })
    }

    /// Marks the row busy and emits the delete.
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> Vec<Command> {
        if !self.mounted || self.state.is_deleting(pending.id) {
            return Vec::new();
        }
        self.delete_error = None;
        self.dispatch(TableAction::DeleteStarted(pending.id));
        vec![Command::Delete(pending.id)]
    }

    /// Applies the outcome of a [`Command::Delete`].
    ///
    /// On success the row is not removed locally; the data is refetched in the background,
    /// without resetting the scroll position, and the row disappears with it. On failure the row
    /// stays and its actions are enabled again.
    pub fn delete_finished(&mut self, id: RowId, result: Result<(), FetchError>) -> Vec<Command> {
        if !self.mounted {
            return Vec::new();
        }
        self.dispatch(TableAction::DeleteFinished(id));
        match result {
            Ok(()) => {
                self.dispatch(TableAction::Invalidate);
                let epoch = self.state.epoch;
                let query = self.state.query();
                let request = match &mut self.data {
                    Data::Paged(_) => PageRequest { epoch, query },
                    Data::Incremental(loader) => loader.revalidate(epoch, query),
                };
                vec![Command::FetchPage(request)]
            }
            Err(err) => {
                awarn!(id, "delete failed");
                self.delete_error = Some((id, err));
                Vec::new()
            }
        }
    }

    pub fn toggle_column(&mut self, key: &str) -> Option<bool> {
        self.columns.toggle_visibility(key)
    }

    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Option<bool> {
        self.columns.set_visibility(key, visible)
    }

    pub fn move_column(&mut self, key: &str, position: usize) -> bool {
        self.columns.move_column(key, position)
    }

    pub fn resize_column(&mut self, key: &str, width: f64) -> Option<f64> {
        self.columns.resize(key, width)
    }

    pub fn reset_columns(&mut self) {
        self.columns.reset();
    }

    /// Applies a saved view's column visibility. Views of another entity type are ignored.
    pub fn apply_view(&mut self, view: &SavedView) -> bool {
        if view.entity_type != self.options.entity_type {
            return false;
        }
        self.columns.apply_visible_keys(&view.columns)
    }

    /// Applies the entity's default view, if one is set.
    pub fn apply_default_view(&mut self, store: &impl ViewStore) -> Result<bool, ViewError> {
        match store.default_view(&self.options.entity_type)? {
            Some(view) => Ok(self.apply_view(&view)),
            None => Ok(false),
        }
    }

    /// A draft capturing the current column visibility, for the "save view" form.
    pub fn view_draft(&self, name: impl Into<String>) -> ViewDraft {
        ViewDraft::new(name, self.columns.visible_keys())
    }

    pub fn validate_view(
        &self,
        draft: &ViewDraft,
        existing: &[SavedView],
        editing: Option<ViewId>,
    ) -> Result<(), ValidationErrors> {
        draft.validate(&self.columns.keys(), existing, editing)
    }

    /// Exports the loaded rows with the visible columns, in display order.
    pub fn export_csv(&self) -> String {
        datagrid::export_csv(&self.columns.visible(), self.rows())
    }

    pub fn export_filename_on(&self, explicit: Option<&str>, date: chrono::NaiveDate) -> String {
        datagrid::export_filename(&self.options.entity_type, explicit, date)
    }

    /// The export file name, dated with the local calendar day.
    #[cfg(feature = "std")]
    pub fn export_filename(&self, explicit: Option<&str>) -> String {
        self.export_filename_on(explicit, chrono::Local::now().date_naive())
    }

    pub fn render(&self) -> TableView {
        let fetching_more = match &self.state.phase {
            LoadPhase::Idle | LoadPhase::Loading => return TableView::Loading,
            LoadPhase::Error(err) => {
                return TableView::Error {
                    message: err.message().to_string(),
                };
            }
            LoadPhase::Ready { fetching_more } => *fetching_more,
        };

        let rows = self.rows();
        if rows.is_empty() {
            return TableView::Empty;
        }

        let visible = self.columns.visible();
        let header = visible
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.label.clone(),
                width: c.width,
                sortable: c.sortable,
                sort: self.state.sort_direction(&c.key),
            })
            .collect();

        let base = RenderOptions {
            truncate_at: self.options.truncate_at,
            row_clickable: self.options.row_clickable,
            show_actions: self.options.show_actions,
            busy: false,
        };
        let render_slot = |slot: WindowItem| {
            let row = &rows[slot.index];
            let opts = RenderOptions {
                busy: self.state.is_deleting(row.id()),
                ..base
            };
            render_row(row, slot, &visible, opts)
        };

        let row_height = self.row_height();
        let load = self.load_state();
        let (fragments, total_extent, label) = if self.options.mode == RenderMode::Windowed {
            let window = self.window();
            let label = if self.options.virtualization.show_scroll_indicator {
                compute_label(&window, load.total_rows())
            } else {
                None
            };
            let fragments = window.items().map(render_slot).collect();
            (fragments, window.total_extent, label)
        } else {
            let fragments = (0..rows.len())
                .map(|index| {
                    render_slot(WindowItem {
                        index,
                        offset: index as f64 * row_height,
                        size: row_height,
                    })
                })
                .collect();
            (fragments, rows.len() as f64 * row_height, None)
        };

        let pagination = match &self.data {
            Data::Paged(Some(page)) => Some(Pagination {
                page: page.current_page,
                total_pages: page.total_pages,
                total_items: page.total_item_count,
                page_size: self.state.page_size,
            }),
            _ => None,
        };

        TableView::Rows(RowsView {
            header,
            rows: fragments,
            total_extent,
            label,
            indicator_visible: self.indicator.is_visible(),
            pagination,
            fetching_more,
            has_more: load.has_more,
            fetch_more_error: self
                .state
                .fetch_more_error
                .as_ref()
                .map(|e| e.message().to_string()),
            delete_error: self
                .delete_error
                .as_ref()
                .map(|(_, e)| e.message().to_string()),
        })
    }
}
