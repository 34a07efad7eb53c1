use crate::api::{AdminApi, ApiError};
use crate::controllers::list_fetch::ListFetchController;
use crate::models::{Decision, Listing, Session};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Approves or rejects listings and refreshes the listings page afterwards.
///
/// Nothing is patched locally: the new status becomes visible through a
/// refetch of the active page.
pub struct MutationController {
    api: Arc<dyn AdminApi>,
    listings: Arc<ListFetchController<Listing>>,
    in_flight: Mutex<HashMap<String, usize>>,
}

impl MutationController {
    pub fn new(api: Arc<dyn AdminApi>, listings: Arc<ListFetchController<Listing>>) -> Self {
        Self {
            api,
            listings,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a status change for `id` is running; row controls should be
    /// disabled meanwhile.
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.ids().contains_key(id)
    }

    pub async fn approve(&self, session: &Session, id: &str) -> Result<(), ApiError> {
        self.set_listing_status(session, id, Decision::Approved).await
    }

    pub async fn reject(&self, session: &Session, id: &str) -> Result<(), ApiError> {
        self.set_listing_status(session, id, Decision::Rejected).await
    }

    pub async fn set_listing_status(
        &self,
        session: &Session,
        id: &str,
        decision: Decision,
    ) -> Result<(), ApiError> {
        if let Some(listing) = self.listings.cached_listing(id) {
            if !listing.admin_status.can_transition_to(decision) {
                return Err(ApiError::Validation(format!(
                    "Listing is already {}",
                    listing.admin_status
                )));
            }
        }

        {
            let _in_flight = InFlight::enter(self, id);
            self.api.set_listing_status(session, id, decision).await?;
        }
        info!("Listing {} set to {:?}, refreshing page", id, decision);

        if self.listings.current_request().is_some() {
            if let Err(e) = self.listings.refresh(session).await {
                // the status change itself succeeded; the list shows its own error
                warn!("Refresh after status change failed: {}", e);
            }
        }

        Ok(())
    }

    fn ids(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Counts one running status change for an id; overlapping changes to the
/// same listing keep it marked until the last one finishes.
struct InFlight<'a> {
    controller: &'a MutationController,
    id: String,
}

impl<'a> InFlight<'a> {
    fn enter(controller: &'a MutationController, id: &str) -> Self {
        *controller.ids().entry(id.to_string()).or_insert(0) += 1;
        Self {
            controller,
            id: id.to_string(),
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut ids = self.controller.ids();
        if let Some(count) = ids.get_mut(&self.id) {
            *count -= 1;
            if *count == 0 {
                ids.remove(&self.id);
            }
        }
    }
}
