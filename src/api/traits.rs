use crate::api::error::ApiError;
use crate::api::types::{PageRequest, PageResult};
use crate::models::{Broker, Decision, Listing, Session};
use async_trait::async_trait;

/// Successful login as reported by the server, before any role check
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub role: String,
}

/// Remote brokerage API consumed by the controllers
///
/// Implementations only translate calls into requests; ordering, caching and
/// role checks live in the controllers.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError>;

    async fn list_brokers(
        &self,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Broker>, ApiError>;

    async fn list_listings(
        &self,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Listing>, ApiError>;

    async fn set_listing_status(
        &self,
        session: &Session,
        id: &str,
        decision: Decision,
    ) -> Result<(), ApiError>;
}
