use crate::browse::fetch::{FetchController, FetchState};
use crate::browse::pagination::{clamp_page, paginate, total_pages, ResultPage, PAGE_SIZE};
use crate::catalog::traits::PropertyService;
use crate::catalog::types::FilterQuery;
use crate::models::Property;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub page: ResultPage<Property>,
    pub loading: bool,
    pub error: Option<String>,
    /// Fetched successfully, nothing matched
    pub show_no_results: bool,
    pub total_count: usize,
}

impl PageView {
    /// "Page 1 of 3 - 3 of 7 properties"
    pub fn summary(&self) -> String {
        format!(
            "Page {} of {} - {} of {} properties",
            self.page.page_number,
            self.page.total_pages,
            self.page.items.len(),
            self.total_count
        )
    }

    /// Pagination controls are only offered with more than one page
    pub fn has_pagination(&self) -> bool {
        !self.loading && self.page.total_pages > 1
    }
}

/// Holds the settled filters and the current page, and derives what to show
pub struct CatalogPage<S: ?Sized> {
    fetch: FetchController<S>,
    query: FilterQuery,
    page_number: usize,
    page_size: usize,
    seen_generation: u64,
}

impl<S> CatalogPage<S>
where
    S: PropertyService + ?Sized + 'static,
{
    pub fn new(service: Arc<S>) -> Self {
        Self::with_page_size(service, PAGE_SIZE)
    }

    pub fn with_page_size(service: Arc<S>, page_size: usize) -> Self {
        Self {
            fetch: FetchController::new(service),
            query: FilterQuery::default(),
            page_number: 1,
            page_size,
            seen_generation: 0,
        }
    }

    /// Issue the first fetch with the initial filters
    pub fn start(&mut self) -> Option<JoinHandle<()>> {
        self.fetch.submit(self.query.clone())
    }

    /// Replace the settled filters, resetting to page 1 on a text change
    pub fn on_filters_change(&mut self, query: FilterQuery) -> Option<JoinHandle<()>> {
        if query.text_differs(&self.query) && self.page_number != 1 {
            info!("Text filters changed, back to page 1");
            self.page_number = 1;
        }
        self.query = query;
        self.fetch.submit(self.query.clone())
    }

    /// Move to `page` if the pagination control could offer it
    pub fn on_page_change(&mut self, page: usize) -> bool {
        let available = total_pages(self.fetch.snapshot().data.len(), self.page_size);
        if (1..=available).contains(&page) {
            debug!("Page {} of {}", page, available);
            self.page_number = page;
            true
        } else {
            warn!("Ignoring page {} (only {} available)", page, available);
            false
        }
    }

    pub fn refetch(&self) -> Option<JoinHandle<()>> {
        self.fetch.refetch()
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn fetch(&self) -> &FetchController<S> {
        &self.fetch
    }

    /// Derive the current view, re-clamping the page after a new result
    pub fn view(&mut self) -> PageView {
        let state = self.fetch.snapshot();
        self.reclamp(&state);

        PageView {
            page: paginate(&state.data, self.page_number, self.page_size),
            loading: state.loading,
            show_no_results: !state.loading && state.fetched && state.data.is_empty(),
            total_count: state.data.len(),
            error: state.error,
        }
    }

    fn reclamp(&mut self, state: &FetchState) {
        if state.generation == self.seen_generation {
            return;
        }
        self.seen_generation = state.generation;

        let pages = total_pages(state.data.len(), self.page_size);
        let clamped = clamp_page(self.page_number, pages);
        if clamped != self.page_number {
            debug!("Result shrank to {} pages, page {} -> {}", pages, self.page_number, clamped);
            self.page_number = clamped;
        }
    }
}
