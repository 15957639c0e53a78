use alloc::vec::Vec;

use datagrid::{FetchError, LoadState, Page, PageRequest, QueryParams};

/// What a page result did to the accumulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    FirstPage,
    NextPage,
    FirstPageFailed(FetchError),
    NextPageFailed(FetchError),
    /// The result belongs to an older query or an unexpected page and was dropped.
    Stale,
}

/// Accumulates successive pages of one query into a single growing list.
///
/// This is the incremental-loading collaborator: it alone mutates the accumulated rows and the
/// load flags. The grid reads them through [`Loader::items`] and [`Loader::load_state`].
///
/// `begin_next_page` sets the fetching flag before returning the request, so a second call
/// (or a load-more evaluation) before the result arrives never issues a duplicate fetch.
#[derive(Clone, Debug)]
pub struct Loader<R> {
    epoch: u64,
    query: Option<QueryParams>,
    items: Vec<R>,
    next_page: usize,
    in_flight: Option<usize>,
    has_next_page: bool,
    total_item_count: Option<usize>,
    max_items: Option<usize>,
    error: Option<FetchError>,
}

impl<R> Loader<R> {
    pub fn new(max_items: Option<usize>) -> Self {
        Self {
            epoch: 0,
            query: None,
            items: Vec::new(),
            next_page: 1,
            in_flight: None,
            has_next_page: false,
            total_item_count: None,
            max_items,
            error: None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn is_loading_first_page(&self) -> bool {
        self.in_flight == Some(1)
    }

    pub fn is_fetching_next_page(&self) -> bool {
        matches!(self.in_flight, Some(p) if p > 1)
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn total_item_count(&self) -> Option<usize> {
        self.total_item_count
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn load_state(&self) -> LoadState {
        LoadState {
            items_loaded: self.items.len(),
            total_items_known: self.total_item_count,
            has_more: self.has_next_page,
            is_fetching_more: self.in_flight.is_some(),
        }
    }

    /// Restarts from empty for `query` and returns the first-page request.
    ///
    /// Any request still in flight for an older epoch becomes stale.
    pub fn refetch(&mut self, epoch: u64, query: QueryParams) -> PageRequest {
        self.epoch = epoch;
        self.items.clear();
        self.next_page = 1;
        self.has_next_page = false;
        self.total_item_count = None;
        self.error = None;
        self.query = Some(query.clone());
        self.request(query, 1)
    }

    /// Reloads `query` from the first page while the current items stay readable.
    ///
    /// The accumulation is replaced when the first page arrives. Load-more stays suppressed
    /// until then, since a request is in flight.
    pub fn revalidate(&mut self, epoch: u64, query: QueryParams) -> PageRequest {
        self.epoch = epoch;
        self.error = None;
        self.query = Some(query.clone());
        self.request(query, 1)
    }

    /// Starts fetching the next page, unless one is already in flight or nothing is left.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || !self.has_next_page {
            atrace!(epoch = self.epoch, "begin_next_page: nothing to do");
            return None;
        }
        let query = self.query.clone()?;
        Some(self.request(query, self.next_page))
    }

    fn request(&mut self, mut query: QueryParams, page: usize) -> PageRequest {
        self.in_flight = Some(page);
        query.page = page;
        PageRequest {
            epoch: self.epoch,
            query,
        }
    }

    /// Applies the result of `request`.
    ///
    /// On failure the fetching flag is cleared and `has_next_page` is left as it was, so a later
    /// scroll can retry.
    pub fn page_loaded(
        &mut self,
        request: &PageRequest,
        result: Result<Page<R>, FetchError>,
    ) -> LoadOutcome {
        if request.epoch != self.epoch || self.in_flight != Some(request.query.page) {
            adebug!(
                request_epoch = request.epoch,
                epoch = self.epoch,
                page = request.query.page,
                "dropping stale page"
            );
            return LoadOutcome::Stale;
        }
        self.in_flight = None;
        let first = request.query.page == 1;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                awarn!(page = request.query.page, "page fetch failed");
                self.error = Some(err.clone());
                return if first {
                    LoadOutcome::FirstPageFailed(err)
                } else {
                    LoadOutcome::NextPageFailed(err)
                };
            }
        };

        self.error = None;
        self.has_next_page = page.has_next() && !page.items.is_empty();
        self.total_item_count = Some(page.total_item_count);
        self.next_page = page.current_page.saturating_add(1);
        if first {
            self.items.clear();
        }
        self.items.extend(page.items);
        if let Some(max) = self.max_items {
            if self.items.len() >= max {
                self.items.truncate(max);
                self.has_next_page = false;
            }
        }

        if first {
            LoadOutcome::FirstPage
        } else {
            LoadOutcome::NextPage
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn query() -> QueryParams {
        datagrid::TableState::new(datagrid::RenderMode::Incremental, 2).query()
    }

    fn page(items: Vec<u32>, current_page: usize) -> Page<u32> {
        Page {
            items,
            current_page,
            total_pages: 3,
            total_item_count: 6,
        }
    }

    #[test]
    fn accumulates_pages_one_at_a_time() {
        let mut l = Loader::new(None);
        let first = l.refetch(1, query());
        assert!(l.is_loading_first_page());
        assert_eq!(l.begin_next_page(), None);
        let outcome = l.page_loaded(&first, Ok(page(vec![1, 2], 1)));
        assert_eq!(outcome, LoadOutcome::FirstPage);

        let next = l.begin_next_page().unwrap();
        assert_eq!(next.query.page, 2);
        assert!(l.is_fetching_next_page());
        assert_eq!(l.begin_next_page(), None);
        let outcome = l.page_loaded(&next, Ok(page(vec![3, 4], 2)));
        assert_eq!(outcome, LoadOutcome::NextPage);
        assert_eq!(l.items(), [1, 2, 3, 4]);
        assert!(l.has_next_page());
    }

    #[test]
    fn drops_results_of_older_epochs() {
        let mut l = Loader::new(None);
        let old = l.refetch(1, query());
        let current = l.refetch(2, query());
        let outcome = l.page_loaded(&old, Ok(page(vec![9], 1)));
        assert_eq!(outcome, LoadOutcome::Stale);
        let outcome = l.page_loaded(&current, Ok(page(vec![1], 1)));
        assert_eq!(outcome, LoadOutcome::FirstPage);
        assert_eq!(l.items(), [1]);
    }

    #[test]
    fn revalidate_keeps_items_until_the_first_page_lands() {
        let mut l = Loader::new(None);
        let first = l.refetch(1, query());
        l.page_loaded(&first, Ok(page(vec![1, 2], 1)));
        let next = l.begin_next_page().unwrap();
        l.page_loaded(&next, Ok(page(vec![3, 4], 2)));

        let again = l.revalidate(2, query());
        assert_eq!(again.query.page, 1);
        assert_eq!(l.items(), [1, 2, 3, 4]);
        assert!(l.load_state().is_fetching_more);
        assert_eq!(l.begin_next_page(), None);

        let outcome = l.page_loaded(&again, Ok(page(vec![1, 3], 1)));
        assert_eq!(outcome, LoadOutcome::FirstPage);
        assert_eq!(l.items(), [1, 3]);
    }
}
