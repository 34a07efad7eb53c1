#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use urbantap_admin::api::LoginGrant;
use urbantap_admin::models::{Location, PriceRange};
use urbantap_admin::{
    AdminApi, AdminStatus, ApiError, Broker, Company, Decision, Listing, PageRequest, PageResult,
    Role, Session,
};

pub fn admin_session() -> Session {
    Session::new("test-token", Role::Admin)
}

pub fn broker(n: usize) -> Broker {
    Broker {
        id: format!("b-{}", n),
        name: format!("Broker {}", n),
        email: Some(format!("broker{}@acme.test", n)),
        status: Some("Active".to_string()),
        ..Default::default()
    }
}

pub fn listing(id: &str, broker_name: &str, listing_type: &str) -> Listing {
    Listing {
        id: id.to_string(),
        title: format!("Listing {}", id),
        description: String::new(),
        images: vec![],
        price_range: PriceRange { min: 1.0, max: 2.0 },
        sq_ft: 800.0,
        listing_type: listing_type.to_string(),
        category: "villa".to_string(),
        looking_for: false,
        rental_frequency: None,
        bedrooms: None,
        bathrooms: None,
        furnished: None,
        location: Location {
            city: "Dubai".to_string(),
            address: "Palm".to_string(),
        },
        amenities: vec![],
        project_age: None,
        payment_plan: None,
        sale_type: None,
        admin_status: AdminStatus::Pending,
        created_at: None,
        broker: Broker {
            name: broker_name.to_string(),
            ..Default::default()
        },
        company: Company::default(),
    }
}

/// In-memory stand-in for the remote API.
///
/// Pages can be held back with [`ScriptedApi::hold_page`] to control the
/// order in which responses complete.
#[derive(Default)]
pub struct ScriptedApi {
    pub brokers: Mutex<Vec<Broker>>,
    pub listings: Mutex<Vec<Listing>>,
    pub login_role: Mutex<String>,
    pub login_failure: Mutex<Option<(u16, String)>>,
    pub status_failure: Mutex<Option<(u16, String)>>,
    pub unauthorized: Mutex<bool>,
    calls: Mutex<Vec<String>>,
    holds: Mutex<HashMap<u32, Arc<Notify>>>,
    status_hold: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        let api = Self::default();
        *api.login_role.lock().unwrap() = "ADMIN".to_string();
        Arc::new(api)
    }

    pub fn with_listings(listings: Vec<Listing>) -> Arc<Self> {
        let api = Self::new();
        *api.listings.lock().unwrap() = listings;
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Block responses for `page` until the returned handle is notified.
    pub fn hold_page(&self, page: u32) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.holds.lock().unwrap().insert(page, notify.clone());
        notify
    }

    /// Block status changes until the returned handle is notified.
    pub fn hold_status(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.status_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn wait_for_release(&self, page: u32) {
        let hold = self.holds.lock().unwrap().get(&page).cloned();
        if let Some(hold) = hold {
            hold.notified().await;
        }
    }

    fn check_token(&self, session: &Session) -> Result<(), ApiError> {
        if *self.unauthorized.lock().unwrap() || session.token.is_empty() {
            return Err(ApiError::Unauthorized("Invalid or expired token".to_string()));
        }
        Ok(())
    }

    fn slice<T: Clone>(all: &[T], request: &PageRequest) -> PageResult<T> {
        let start = ((request.page_number - 1) * request.page_size) as usize;
        let items = all
            .iter()
            .skip(start)
            .take(request.page_size as usize)
            .cloned()
            .collect();
        PageResult::new(items, request.page_number, request.page_size, all.len() as u64)
    }
}

#[async_trait]
impl AdminApi for ScriptedApi {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginGrant, ApiError> {
        self.record(format!("login {}", email));
        if let Some((status, message)) = self.login_failure.lock().unwrap().clone() {
            return Err(ApiError::Server { status, message });
        }
        Ok(LoginGrant {
            token: format!("token-for-{}", email),
            role: self.login_role.lock().unwrap().clone(),
        })
    }

    async fn list_brokers(
        &self,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Broker>, ApiError> {
        self.record(format!(
            "brokers page={} size={}",
            request.page_number, request.page_size
        ));
        self.check_token(session)?;
        self.wait_for_release(request.page_number).await;
        let all = self.brokers.lock().unwrap().clone();
        Ok(Self::slice(&all, request))
    }

    async fn list_listings(
        &self,
        session: &Session,
        request: &PageRequest,
    ) -> Result<PageResult<Listing>, ApiError> {
        self.record(format!(
            "listings page={} size={}",
            request.page_number, request.page_size
        ));
        self.check_token(session)?;
        self.wait_for_release(request.page_number).await;
        let all = self.listings.lock().unwrap().clone();
        Ok(Self::slice(&all, request))
    }

    async fn set_listing_status(
        &self,
        session: &Session,
        id: &str,
        decision: Decision,
    ) -> Result<(), ApiError> {
        self.record(format!("status {} {:?}", id, decision));
        self.check_token(session)?;
        let hold = self.status_hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        if let Some((status, message)) = self.status_failure.lock().unwrap().clone() {
            return Err(ApiError::Server { status, message });
        }
        let mut listings = self.listings.lock().unwrap();
        match listings.iter_mut().find(|l| l.id == id) {
            Some(listing) => {
                listing.admin_status = decision.into();
                Ok(())
            }
            None => Err(ApiError::Server {
                status: 404,
                message: "Listing not found".to_string(),
            }),
        }
    }
}
