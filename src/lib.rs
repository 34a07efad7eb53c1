//! Admin console for the Urbantap brokerage platform: login, broker and
//! listing browsing, and listing review against the remote API.

pub mod api;
pub mod auth;
pub mod config;
pub mod controllers;
pub mod models;
pub mod session;
pub mod validation;

pub use api::{AdminApi, ApiError, HttpAdminApi, PageFilters, PageRequest, PageResult};
pub use auth::{AuthGate, GateDecision, Route};
pub use config::AppConfig;
pub use controllers::{ListFetchController, MutationController, PageView, ResourceKind};
pub use models::{AdminStatus, Broker, Company, Decision, Listing, Role, Session};
pub use session::{FileTokenStore, MemoryTokenStore, TokenStore};
