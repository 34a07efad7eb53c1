use crate::api::error::{ApiError, ResponseExt};
use crate::api::traits::{AdminApi, LoginGrant};
use crate::api::types::{PageRequest, PageResult};
use crate::api::wire::{BrokersData, Envelope, ListingsData, LoginData, LoginRequest, StatusUpdate};
use crate::models::{Broker, Decision, Listing, Session};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const LOGIN_PATH: &str = "/api/v1/auth/login";
const BROKERS_PATH: &str = "/api/v1/brokers";
const LISTINGS_PATH: &str = "/api/v1/admin/listings";

/// reqwest-backed implementation of the remote brokerage API
#[derive(Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: String,
}

impl HttpAdminApi {
    /// Create a client for `base_url` with the default 30 second timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("urbantap-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        anyhow::ensure!(!base_url.is_empty(), "API base URL must not be empty");

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer credential, refusing to send without one.
    fn authorized(
        &self,
        request: RequestBuilder,
        session: &Session,
    ) -> Result<RequestBuilder, ApiError> {
        if session.token.trim().is_empty() {
            return Err(ApiError::Unauthorized(
                "Authorization token not found".to_string(),
            ));
        }
        Ok(request.bearer_auth(&session.token))
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Unable to decode {} response: {}", what, e);
            ApiError::Decode(format!("{}: {}", what, e))
        })
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_api_error("Login failed")
            .await?;

        let envelope: Envelope<LoginData> = Self::decode(response, "login").await?;
        debug!("Login accepted with role {}", envelope.data.user.role);

        Ok(LoginGrant {
            token: envelope.data.token,
            role: envelope.data.user.role,
        })
    }

    #[tracing::instrument(skip(self, session))]
    async fn list_brokers(
        &self,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Broker>, ApiError> {
        let builder = self
            .client
            .get(self.url(BROKERS_PATH))
            .query(&[("page", request.page_number), ("page_size", request.page_size)]);

        let response = self
            .authorized(builder, session)?
            .send()
            .await
            .map_api_error("Failed to fetch brokers")
            .await?;

        let envelope: Envelope<BrokersData> = Self::decode(response, "brokers").await?;
        let total = envelope.data.pagination.total;
        let brokers: Vec<Broker> = envelope.data.brokers.into_iter().map(Broker::from).collect();

        info!(
            "Fetched {} brokers (page {}, total {})",
            brokers.len(),
            request.page_number,
            total
        );

        Ok(PageResult::new(
            brokers,
            request.page_number,
            request.page_size,
            total,
        ))
    }

    #[tracing::instrument(skip(self, session))]
    async fn list_listings(
        &self,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Listing>, ApiError> {
        let builder = self
            .client
            .get(self.url(LISTINGS_PATH))
            .query(&[("page", request.page_number), ("page_size", request.page_size)]);

        let response = self
            .authorized(builder, session)?
            .send()
            .await
            .map_api_error("Failed to fetch data")
            .await?;

        let envelope: Envelope<ListingsData> = Self::decode(response, "listings").await?;
        let total = envelope.data.pagination.total;
        let listings: Vec<Listing> = envelope
            .data
            .listings
            .into_iter()
            .map(Listing::from)
            .collect();

        info!(
            "Fetched {} listings (page {}, total {})",
            listings.len(),
            request.page_number,
            total
        );

        Ok(PageResult::new(
            listings,
            request.page_number,
            request.page_size,
            total,
        ))
    }

    #[tracing::instrument(skip(self, session))]
    async fn set_listing_status(
        &self,
        session: &Session,
        id: &str,
        decision: Decision,
    ) -> Result<(), ApiError> {
        let builder = self
            .client
            .put(self.url(&format!("{}/{}/status", LISTINGS_PATH, id)))
            .json(&StatusUpdate {
                status: decision.into(),
            });

        self.authorized(builder, session)?
            .send()
            .await
            .map_api_error("Failed to update status")
            .await?;

        info!("Listing {} marked {:?}", id, decision);
        Ok(())
    }
}
