use crate::browse::debounce::{debounce, Debouncer};
use crate::browse::filters::{FilterEdit, FilterForm};
use crate::browse::page::{CatalogPage, PageView};
use crate::catalog::traits::PropertyService;
use crate::catalog::types::FilterQuery;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// Wires raw filter edits through the debouncer into a [`CatalogPage`]
pub struct BrowseSession<S: ?Sized> {
    form: FilterForm,
    edits: mpsc::Sender<FilterQuery>,
    settled: mpsc::Receiver<FilterQuery>,
    page: CatalogPage<S>,
}

impl<S> BrowseSession<S>
where
    S: PropertyService + ?Sized + 'static,
{
    /// Start a session and its initial fetch
    pub fn start(service: Arc<S>, delay: Duration) -> (Self, Option<JoinHandle<()>>) {
        let mut page = CatalogPage::new(service);
        let form = FilterForm::default();

        let (edits, edits_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (settled_tx, settled) = mpsc::channel(CHANNEL_CAPACITY);
        let debouncer = Debouncer::new(delay).with_initial(form.to_query());
        tokio::spawn(debounce(edits_rx, settled_tx, debouncer));

        let initial = page.start();
        (
            Self {
                form,
                edits,
                settled,
                page,
            },
            initial,
        )
    }

    /// Apply a raw edit; the fetch follows once the edit settles
    pub async fn edit(&mut self, edit: FilterEdit) {
        self.form.apply(edit);
        if self.edits.send(self.form.to_query()).await.is_err() {
            debug!("Debounce task gone, dropping edit");
        }
    }

    /// Next settled filter value, waiting for it if needed
    pub async fn next_settled(&mut self) -> Option<FilterQuery> {
        self.settled.recv().await
    }

    /// Hand a settled filter value to the page
    pub fn apply_settled(&mut self, query: FilterQuery) -> Option<JoinHandle<()>> {
        self.page.on_filters_change(query)
    }

    pub fn form(&self) -> &FilterForm {
        &self.form
    }

    pub fn page(&mut self) -> &mut CatalogPage<S> {
        &mut self.page
    }

    pub fn view(&mut self) -> PageView {
        self.page.view()
    }
}
