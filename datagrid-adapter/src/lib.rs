//! Adapter utilities for the `datagrid` crate.
//!
//! The `datagrid` crate is UI-agnostic and holds the pure math and state. This crate provides
//! the time- and IO-shaped pieces a grid needs, still framework-neutral:
//!
//! - A cancellable debouncer (filter input) and the scroll indicator's hide timer
//! - The incremental loader that accumulates pages and drops stale results
//! - Hover prefetch bookkeeping
//! - [`DataTable`], the controller that wires them together
//!
//! Nothing here spawns tasks or reads a clock on its own. Adapters call `tick(now_ms)` from a
//! timer, perform the emitted [`Command`]s and feed results back as plain values.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod debounce;
mod indicator;
mod loader;
mod prefetch;


pub use controller::{
    Command, DEFAULT_FILTER_DEBOUNCE_MS, DataTable, DataTableOptions, HeaderCell, Pagination,
    PendingDelete, RowsView, TableView,
};
pub use debounce::Debouncer;
pub use indicator::{DEFAULT_INDICATOR_QUIET_MS, ScrollIndicator};
pub use loader::{LoadOutcome, Loader};
pub use prefetch::PrefetchContext;
