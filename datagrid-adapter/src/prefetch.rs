use alloc::collections::BTreeSet;

use datagrid::RowId;

/// Tracks which rows have had their detail view prefetched for the current query.
///
/// Owned by the grid controller and reset whenever the query epoch changes, so hover prefetches
/// never leak across queries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefetchContext {
    epoch: u64,
    requested: BTreeSet<RowId>,
}

impl PrefetchContext {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            requested: BTreeSet::new(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn reset(&mut self, epoch: u64) {
        self.epoch = epoch;
        self.requested.clear();
    }

    /// Returns `true` the first time `id` is hovered within `epoch`.
    pub fn on_hover(&mut self, epoch: u64, id: RowId) -> bool {
        if epoch != self.epoch {
            self.reset(epoch);
        }
        self.requested.insert(id)
    }
}
