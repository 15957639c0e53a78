//! A headless data-grid engine.
//!
//! For time-driven adapter utilities (debounced filters, scroll indicator timers, incremental
//! loading and the orchestrating controller), see the `datagrid-adapter` crate.
//!
//! This crate holds the pure parts of a data grid: the viewport windowing calculator, the
//! incremental load-more rule, the "rows X-Y of Z" label, column state, row rendering into
//! positioned fragments, CSV export, the sort/filter/pagination reducer and saved column views.
//!
//! It is UI-agnostic. A web/TUI/GUI layer is expected to provide:
//! - viewport height and scroll offset
//! - the accumulated rows (owned by an external loading collaborator)
//! - results of remote calls, fed back as plain values
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod column;
mod config;
mod csv;
mod error;
mod indicator;
mod load;
mod row;
mod source;
mod state;
mod table;
mod types;
mod value;
mod views;
mod window;

#[cfg(test)]
mod tests;

pub use column::{CellRenderer, ColumnDef, ColumnSet, TextAccessor};
pub use config::{
    DEFAULT_CONTAINER_HEIGHT, DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, DEFAULT_SCROLL_THRESHOLD_ROWS,
    VirtualizationConfig, VirtualizationOverrides,
};
pub use csv::{escape_field, export_csv, export_filename};
pub use error::{ConfigError, FetchError, ValidationErrors, ViewError};
pub use indicator::compute_label;
pub use load::{LoadState, should_request_more};
pub use row::{
    CellFragment, ClickTarget, DEFAULT_TRUNCATE_AT, RenderOptions, RowCommand, RowFragment,
    render_row,
};
pub use source::{Page, PageRequest};
pub use state::Viewport;
pub use table::{
    DEFAULT_PAGE_SIZE, FilterOp, FilterRule, FilterState, LoadPhase, QueryParams, RenderMode,
    SortDirection, SortState, TableAction, TableState, reduce,
};
pub use types::{Align, RowId, Window, WindowItem};
pub use value::{CellValue, PLACEHOLDER, Row, lookup_path, resolve_path};
pub use views::{MAX_VIEW_NAME_LEN, MemoryViewStore, SavedView, ViewDraft, ViewId, ViewStore};
pub use window::compute_window;
