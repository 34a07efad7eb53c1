use crate::api::{AdminApi, ApiError, PageRequest, PageResult};
use crate::controllers::view::{PageView, Searchable};
use crate::models::{Broker, Listing, Session};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Resource collections the admin can page through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Brokers,
    Listings,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Brokers => "brokers",
            ResourceKind::Listings => "listings",
        }
    }
}

/// An item type that can be fetched a page at a time
#[async_trait]
pub trait Resource: Searchable + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    async fn fetch_page(
        api: &dyn AdminApi,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Self>, ApiError>;
}

#[async_trait]
impl Resource for Broker {
    const KIND: ResourceKind = ResourceKind::Brokers;

    async fn fetch_page(
        api: &dyn AdminApi,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Self>, ApiError> {
        api.list_brokers(session, request).await
    }
}

#[async_trait]
impl Resource for Listing {
    const KIND: ResourceKind = ResourceKind::Listings;

    async fn fetch_page(
        api: &dyn AdminApi,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Self>, ApiError> {
        api.list_listings(session, request).await
    }
}

/// Observable state of one resource list
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    /// Most recently issued request
    pub request: Option<PageRequest>,
    pub loading: bool,
    /// User-facing message of the last failed fetch
    pub error: Option<String>,
    /// Last page applied, unfiltered
    pub page: Option<PageResult<T>>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            request: None,
            loading: false,
            error: None,
            page: None,
        }
    }
}

impl<T: Searchable + Clone> FetchState<T> {
    /// Loaded page with the current request's filters applied
    pub fn view(&self) -> Option<PageView<T>> {
        let page = self.page.as_ref()?;
        let filters = self
            .request
            .as_ref()
            .map(|r| r.filters.clone())
            .unwrap_or_default();
        Some(PageView::new(page, &filters))
    }
}

/// Issues paginated reads for one resource kind and publishes the outcome.
///
/// Every fetch takes a ticket in issue order. Only the holder of the most
/// recently issued ticket may write the shared state, so a slow response to
/// an older request never replaces the result of a newer one.
pub struct ListFetchController<T: Resource> {
    api: Arc<dyn AdminApi>,
    issued: AtomicU64,
    state: watch::Sender<FetchState<T>>,
}

impl<T: Resource> ListFetchController<T> {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            api,
            issued: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    pub fn current_request(&self) -> Option<PageRequest> {
        self.state.borrow().request.clone()
    }

    /// Fetch one page and publish it if no newer request was issued meanwhile.
    ///
    /// The result is always returned to the caller, superseded or not.
    pub async fn fetch_page(
        &self,
        session: &Session,
        request: PageRequest,
    ) -> Result<PageResult<T>, ApiError> {
        if request.page_number == 0 {
            return Err(ApiError::Validation("Page number must be at least 1".to_string()));
        }
        if request.page_size == 0 {
            return Err(ApiError::Validation("Page size must be positive".to_string()));
        }

        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Fetching {} page {} (ticket {})",
            T::KIND.label(),
            request.page_number,
            ticket
        );

        let issued_request = request.clone();
        self.state.send_modify(|state| {
            state.request = Some(issued_request);
            state.loading = true;
            state.error = None;
        });

        let mut guard = LoadingGuard {
            ticket,
            issued: &self.issued,
            state: &self.state,
            settled: false,
        };

        let result = T::fetch_page(self.api.as_ref(), session, &request).await;

        let applied = guard.settle(|state| match &result {
            Ok(page) => {
                state.page = Some(page.clone());
                state.error = None;
            }
            Err(e) => {
                state.error = Some(e.user_message());
            }
        });

        if !applied {
            debug!(
                "Discarding superseded {} response (ticket {})",
                T::KIND.label(),
                ticket
            );
        } else if let Err(e) = &result {
            warn!("Failed to fetch {}: {}", T::KIND.label(), e);
        }

        result
    }

    /// Move to `request`, re-running the fetch only when the server page
    /// changes. A filter-only change re-derives the view from the cached page.
    pub async fn set_request(
        &self,
        session: &Session,
        request: PageRequest,
    ) -> Result<PageResult<T>, ApiError> {
        let cached = {
            let state = self.state.borrow();
            // a cancelled fetch leaves `request` ahead of `page`, so the page
            // itself must match the server page being asked for
            match (&state.request, &state.page) {
                (Some(current), Some(page))
                    if !state.loading
                        && state.error.is_none()
                        && current.same_server_page(&request)
                        && page.page_number == request.page_number
                        && page.page_size == request.page_size =>
                {
                    Some(page.clone())
                }
                _ => None,
            }
        };

        match cached {
            Some(page) => {
                self.state.send_if_modified(|state| {
                    if state.request.as_ref() == Some(&request) {
                        return false;
                    }
                    state.request = Some(request);
                    true
                });
                Ok(page)
            }
            None => self.fetch_page(session, request).await,
        }
    }

    /// Re-run the active request, bypassing the cached page.
    pub async fn refresh(&self, session: &Session) -> Result<PageResult<T>, ApiError> {
        let request = self
            .current_request()
            .ok_or_else(|| ApiError::Validation("No page has been requested yet".to_string()))?;
        self.fetch_page(session, request).await
    }
}

impl ListFetchController<Listing> {
    /// Look up a listing on the currently loaded page
    pub fn cached_listing(&self, id: &str) -> Option<Listing> {
        self.state
            .borrow()
            .page
            .as_ref()
            .and_then(|page| page.items.iter().find(|l| l.id == id).cloned())
    }
}

/// Clears the loading flag on every exit path of the latest fetch,
/// including cancellation.
struct LoadingGuard<'a, T> {
    ticket: u64,
    issued: &'a AtomicU64,
    state: &'a watch::Sender<FetchState<T>>,
    settled: bool,
}

impl<T> LoadingGuard<'_, T> {
    fn is_latest(&self) -> bool {
        self.issued.load(Ordering::SeqCst) == self.ticket
    }

    /// Apply `update` if this ticket is still the latest. Returns whether it was.
    fn settle(&mut self, update: impl FnOnce(&mut FetchState<T>)) -> bool {
        self.settled = true;
        let mut applied = false;
        self.state.send_if_modified(|state| {
            if !self.is_latest() {
                return false;
            }
            update(state);
            state.loading = false;
            applied = true;
            true
        });
        applied
    }
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.state.send_if_modified(|state| {
            if !self.is_latest() || !state.loading {
                return false;
            }
            state.loading = false;
            true
        });
    }
}
