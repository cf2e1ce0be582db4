//! Async fetch lifecycle for the property collection
//!
//! Every request is tagged with a sequence number. Only the response to
//! the most recently issued request may change the published state; late
//! answers to superseded queries are dropped on arrival.

use crate::catalog::traits::PropertyService;
use crate::catalog::types::FilterQuery;
use crate::models::Property;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Failure,
}

/// Observable state of the fetch controller
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState {
    pub status: FetchStatus,
    /// True exactly while the latest request is in flight
    pub loading: bool,
    /// Message from the latest request, if it failed
    pub error: Option<String>,
    /// Last successfully fetched collection
    pub data: Vec<Property>,
    /// Whether any request has succeeded yet
    pub fetched: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Bumped on every committed success
    pub generation: u64,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            loading: false,
            error: None,
            data: Vec::new(),
            fetched: false,
            fetched_at: None,
            generation: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Requests {
    latest: u64,
    last_query: Option<FilterQuery>,
}

/// Owns the loading/error/data lifecycle for one filter query at a time
pub struct FetchController<S: ?Sized> {
    service: Arc<S>,
    requests: Arc<Mutex<Requests>>,
    state: Arc<watch::Sender<FetchState>>,
}

impl<S: ?Sized> Clone for FetchController<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            requests: Arc::clone(&self.requests),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> FetchController<S>
where
    S: PropertyService + ?Sized + 'static,
{
    pub fn new(service: Arc<S>) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            service,
            requests: Arc::new(Mutex::new(Requests::default())),
            state: Arc::new(state),
        }
    }

    /// Fetch for `query` unless it equals the query already requested
    pub fn submit(&self, query: FilterQuery) -> Option<JoinHandle<()>> {
        let mut requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());
        if requests.last_query.as_ref() == Some(&query) {
            debug!("Filter query unchanged, not refetching");
            return None;
        }
        Some(self.issue(&mut requests, query))
    }

    /// Repeat the most recent query
    pub fn refetch(&self) -> Option<JoinHandle<()>> {
        let mut requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());
        let query = requests.last_query.clone()?;
        Some(self.issue(&mut requests, query))
    }

    pub fn snapshot(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    pub fn last_query(&self) -> Option<FilterQuery> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_query
            .clone()
    }

    /// Wait until no request is in flight
    pub async fn settled(&self) -> FetchState {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(|s| !s.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        };
        state
    }

    fn issue(&self, requests: &mut Requests, query: FilterQuery) -> JoinHandle<()> {
        requests.latest += 1;
        requests.last_query = Some(query.clone());
        let seq = requests.latest;

        self.state.send_modify(|s| {
            s.status = FetchStatus::Loading;
            s.loading = true;
            s.error = None;
        });
        info!("Fetching properties (request #{})", seq);

        let service = Arc::clone(&self.service);
        let shared = Arc::clone(&self.requests);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let result = service.list(&query).await;

            // commit under the lock: no newer request may start between check and publish
            let requests = shared.lock().unwrap_or_else(|e| e.into_inner());
            if requests.latest != seq {
                debug!(
                    "Discarding stale response for request #{} (latest is #{})",
                    seq, requests.latest
                );
                return;
            }

            match result {
                Ok(data) => {
                    info!("Request #{} returned {} properties", seq, data.len());
                    state.send_modify(|s| {
                        s.status = FetchStatus::Success;
                        s.loading = false;
                        s.error = None;
                        s.data = data;
                        s.fetched = true;
                        s.fetched_at = Some(Utc::now());
                        s.generation += 1;
                    });
                }
                Err(err) => {
                    let message = err.user_message();
                    warn!("Request #{} failed: {}", seq, message);
                    state.send_modify(|s| {
                        s.status = FetchStatus::Failure;
                        s.loading = false;
                        s.error = Some(message);
                    });
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::testing::{numbered, ScriptedService};
    use std::time::Duration;

    fn by_name(name: &str) -> FilterQuery {
        FilterQuery {
            name: Some(name.to_string()),
            ..FilterQuery::default()
        }
    }

    #[tokio::test]
    async fn success_moves_from_loading_to_data() {
        let service = Arc::new(ScriptedService::new(numbered("Casa", 4)));
        let controller = FetchController::new(Arc::clone(&service));
        assert_eq!(controller.snapshot().status, FetchStatus::Idle);

        let handle = controller.submit(by_name("Casa")).unwrap();
        let state = controller.snapshot();
        assert!(state.loading);
        assert_eq!(state.status, FetchStatus::Loading);

        handle.await.unwrap();
        let state = controller.snapshot();
        assert!(!state.loading);
        assert_eq!(state.status, FetchStatus::Success);
        assert_eq!(state.data.len(), 4);
        assert!(state.fetched);
        assert!(state.fetched_at.is_some());
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn failure_keeps_previous_data() {
        let service = Arc::new(ScriptedService::new(numbered("Casa", 2)));
        service.fail_for("broken");
        let controller = FetchController::new(Arc::clone(&service));

        controller.submit(by_name("Casa")).unwrap().await.unwrap();
        controller.submit(by_name("broken")).unwrap().await.unwrap();

        let state = controller.snapshot();
        assert_eq!(state.status, FetchStatus::Failure);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("backend exploded"));
        assert_eq!(state.data.len(), 2);
    }

    #[tokio::test]
    async fn new_request_clears_previous_error() {
        let service = Arc::new(ScriptedService::new(numbered("Casa", 1)));
        service.fail_for("broken");
        let controller = FetchController::new(Arc::clone(&service));

        controller.submit(by_name("broken")).unwrap().await.unwrap();
        assert!(controller.snapshot().error.is_some());

        let handle = controller.submit(by_name("Casa")).unwrap();
        assert_eq!(controller.snapshot().error, None);
        handle.await.unwrap();
        assert_eq!(controller.snapshot().status, FetchStatus::Success);
    }

    #[tokio::test]
    async fn equal_query_is_not_refetched() {
        let service = Arc::new(ScriptedService::new(numbered("Casa", 1)));
        let controller = FetchController::new(Arc::clone(&service));

        controller.submit(by_name("Casa")).unwrap().await.unwrap();
        assert!(controller.submit(by_name("Casa")).is_none());
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn refetch_repeats_last_query() {
        let service = Arc::new(ScriptedService::new(numbered("Casa", 1)));
        let controller = FetchController::new(Arc::clone(&service));
        assert!(controller.refetch().is_none());

        controller.submit(by_name("Casa")).unwrap().await.unwrap();
        controller.refetch().unwrap().await.unwrap();

        assert_eq!(service.calls(), vec![by_name("Casa"), by_name("Casa")]);
        assert_eq!(controller.snapshot().generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_response_is_discarded() {
        let mut listings = numbered("Casa", 5);
        listings.extend(numbered("Loft", 2));
        let service = Arc::new(ScriptedService::new(listings));
        service.delay_for("Casa", Duration::from_millis(500));
        service.delay_for("Loft", Duration::from_millis(100));
        let controller = FetchController::new(Arc::clone(&service));

        let slow = controller.submit(by_name("Casa")).unwrap();
        let fast = controller.submit(by_name("Loft")).unwrap();

        fast.await.unwrap();
        assert_eq!(controller.snapshot().data.len(), 2);

        slow.await.unwrap();
        let state = controller.snapshot();
        assert_eq!(state.data.len(), 2);
        assert!(state.data.iter().all(|p| p.name.starts_with("Loft")));
        assert_eq!(state.generation, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_failure_is_discarded() {
        let service = Arc::new(ScriptedService::new(numbered("Loft", 3)));
        service.fail_for("broken");
        service.delay_for("broken", Duration::from_millis(500));
        let controller = FetchController::new(Arc::clone(&service));

        let slow = controller.submit(by_name("broken")).unwrap();
        let fast = controller.submit(by_name("Loft")).unwrap();
        fast.await.unwrap();
        slow.await.unwrap();

        let state = controller.snapshot();
        assert_eq!(state.status, FetchStatus::Success);
        assert_eq!(state.error, None);
        assert_eq!(state.data.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_waits_for_in_flight_request() {
        let service = Arc::new(ScriptedService::new(numbered("Casa", 2)));
        service.delay_for("Casa", Duration::from_millis(300));
        let controller = FetchController::new(Arc::clone(&service));

        let _handle = controller.submit(by_name("Casa")).unwrap();
        let state = controller.settled().await;
        assert_eq!(state.status, FetchStatus::Success);
        assert_eq!(state.data.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stays_loading_while_newest_request_is_in_flight() {
        let service = Arc::new(ScriptedService::new(numbered("Casa", 1)));
        service.delay_for("Loft", Duration::from_millis(500));
        let controller = FetchController::new(Arc::clone(&service));

        let fast = controller.submit(by_name("Casa")).unwrap();
        let slow = controller.submit(by_name("Loft")).unwrap();
        fast.await.unwrap();
        assert!(controller.snapshot().loading);

        slow.await.unwrap();
        assert!(!controller.settled().await.loading);
    }
}
