//! Client-side browsing core: filters, debounce, fetch, pagination

pub mod debounce;
pub mod fetch;
pub mod filters;
pub mod page;
pub mod pagination;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use debounce::{debounce, Debouncer, FILTER_DEBOUNCE};
pub use fetch::{FetchController, FetchState, FetchStatus};
pub use filters::{FilterEdit, FilterForm};
pub use page::{CatalogPage, PageView};
pub use pagination::{paginate, ResultPage, PAGE_SIZE};
pub use session::BrowseSession;
