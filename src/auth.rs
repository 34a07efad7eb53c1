use crate::api::{AdminApi, ApiError};
use crate::models::{Role, Session};
use crate::session::TokenStore;
use crate::validation::validate_credentials;
use std::sync::Arc;
use tracing::{info, warn};

pub const ACCESS_DENIED: &str = "Access denied. Admins only.";
pub const NOT_LOGGED_IN: &str = "You must be logged in.";

/// Views the gate knows how to route between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Listings,
    Brokers,
}

impl Route {
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Listings | Route::Brokers)
    }
}

/// What the presentation layer should do for a requested route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the protected view with this session
    Render(Session),
    /// Render the login form
    ShowLogin,
    /// Render nothing and navigate elsewhere
    Redirect(Route),
}

/// Decides who may see what, and owns login and logout
#[derive(Clone)]
pub struct AuthGate {
    api: Arc<dyn AdminApi>,
    store: Arc<dyn TokenStore>,
}

impl AuthGate {
    pub fn new(api: Arc<dyn AdminApi>, store: Arc<dyn TokenStore>) -> Self {
        Self { api, store }
    }

    /// Session restored from the token store. Only admin tokens are ever
    /// persisted, so a stored token carries the admin role.
    pub async fn session(&self) -> Result<Option<Session>, ApiError> {
        Ok(self
            .store
            .token()
            .await?
            .map(|token| Session::new(token, Role::Admin)))
    }

    pub async fn resolve(&self, route: Route) -> Result<GateDecision, ApiError> {
        let decision = match (self.session().await?, route) {
            (None, Route::Login) => GateDecision::ShowLogin,
            (None, _) => GateDecision::Redirect(Route::Login),
            (Some(_), Route::Root) => GateDecision::Redirect(Route::Listings),
            (Some(_), Route::Login) => GateDecision::ShowLogin,
            (Some(session), _) => GateDecision::Render(session),
        };
        Ok(decision)
    }

    /// Session for a protected view, or the error that prompts a login.
    pub async fn require_session(&self) -> Result<Session, ApiError> {
        self.session()
            .await?
            .ok_or_else(|| ApiError::Unauthorized(NOT_LOGGED_IN.to_string()))
    }

    /// Validate, authenticate, check the role, and persist the token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        validate_credentials(email, password)?;

        let grant = self.api.login(email.trim(), password).await?;

        if Role::from_wire(&grant.role) != Role::Admin {
            warn!("Rejected login for non-admin role {:?}", grant.role);
            return Err(ApiError::Unauthorized(ACCESS_DENIED.to_string()));
        }

        self.store.set_token(&grant.token).await?;
        info!("Admin session started");

        Ok(Session::new(grant.token, Role::Admin))
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.store.clear().await?;
        info!("Session cleared");
        Ok(())
    }

    /// React to a failed request. Authorization failures end the session and
    /// send the user back to login; anything else stays on the current view.
    pub async fn handle_failure(&self, error: &ApiError) -> Result<Option<Route>, ApiError> {
        if !error.is_authorization() {
            return Ok(None);
        }
        warn!("Authorization failed, clearing session: {}", error);
        self.store.clear().await?;
        Ok(Some(Route::Login))
    }
}
