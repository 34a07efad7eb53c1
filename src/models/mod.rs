use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role attached to an authenticated user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Admin,
    Other,
}

impl Role {
    /// Roles arrive as free-form strings; "ADMIN" and "admin" are both accepted.
    pub fn from_wire(role: &str) -> Self {
        if role.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Other
        }
    }
}

/// Authenticated session threaded through every controller call
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub role: Role,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Company a broker works for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Company {
    pub id: Option<String>,
    pub name: String,
}

/// Broker as projected by the server; read-only on the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Broker {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub profile_pic: Option<String>,
    pub company: Option<Company>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Review state of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AdminStatus {
    #[serde(alias = "pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "approved", alias = "APPROVED")]
    Approved,
    #[serde(alias = "rejected", alias = "REJECTED")]
    Rejected,
}

impl AdminStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminStatus::Pending => "Pending",
            AdminStatus::Approved => "Approved",
            AdminStatus::Rejected => "Rejected",
        }
    }

    pub fn can_transition_to(&self, decision: Decision) -> bool {
        *self == AdminStatus::Pending && AdminStatus::from(decision) != *self
    }
}

impl fmt::Display for AdminStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target state of an admin review
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Decision {
    Approved,
    Rejected,
}

impl From<Decision> for AdminStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => AdminStatus::Approved,
            Decision::Rejected => AdminStatus::Rejected,
        }
    }
}

/// Asking price bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Location information for a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Location {
    pub city: String,
    pub address: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.address)
    }
}

/// Property listing submitted by a broker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub price_range: PriceRange,
    pub sq_ft: f64,
    pub listing_type: String,
    pub category: String,
    pub looking_for: bool,
    pub rental_frequency: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub furnished: Option<String>,
    pub location: Location,
    pub amenities: Vec<String>,
    pub project_age: Option<f64>,
    pub payment_plan: Option<String>,
    pub sale_type: Option<String>,
    pub admin_status: AdminStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub broker: Broker,
    pub company: Company,
}

impl Listing {
    /// Labelled rows of the listing detail view.
    pub fn detail_lines(&self) -> Vec<(&'static str, String)> {
        fn or_na(value: Option<&str>) -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.to_string(),
                _ => "N/A".to_string(),
            }
        }

        // enum-like values such as `residential_apartment`
        fn humanized(value: Option<&str>) -> String {
            or_na(value).replace('_', " ")
        }

        vec![
            ("Title", self.title.clone()),
            ("Description", self.description.clone()),
            ("Type", self.listing_type.clone()),
            ("Category", self.category.replace('_', " ")),
            ("Price Range", self.price_range.to_string()),
            ("Size", format!("{} sq ft", self.sq_ft)),
            ("Bedrooms", humanized(self.bedrooms.as_deref())),
            ("Bathrooms", humanized(self.bathrooms.as_deref())),
            ("Furnished", or_na(self.furnished.as_deref())),
            ("Location", self.location.to_string()),
            (
                "Project Age",
                self.project_age
                    .map(|age| format!("{} years", age))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Payment Plan", humanized(self.payment_plan.as_deref())),
            ("Sale Type", or_na(self.sale_type.as_deref())),
            ("Broker", self.broker.name.clone()),
            ("Company", self.company.name.clone()),
            ("Email", or_na(self.broker.email.as_deref())),
            ("Phone", or_na(self.broker.phone.as_deref())),
            ("Status", self.admin_status.to_string()),
            (
                "Created At",
                self.created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
        ]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn broker(id: &str, name: &str) -> Broker {
        Broker {
            id: id.to_string(),
            name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
            status: Some("Active".to_string()),
            ..Default::default()
        }
    }

    pub fn listing(id: &str, broker_name: &str, listing_type: &str, status: AdminStatus) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {}", id),
            description: "Two bedroom apartment".to_string(),
            images: vec![],
            price_range: PriceRange {
                min: 100_000.0,
                max: 150_000.0,
            },
            sq_ft: 950.0,
            listing_type: listing_type.to_string(),
            category: "residential_apartment".to_string(),
            looking_for: false,
            rental_frequency: None,
            bedrooms: Some("2_bedrooms".to_string()),
            bathrooms: None,
            furnished: Some("Furnished".to_string()),
            location: Location {
                city: "Dubai".to_string(),
                address: "Marina Walk".to_string(),
            },
            amenities: vec!["Pool".to_string()],
            project_age: Some(3.0),
            payment_plan: None,
            sale_type: Some("Primary".to_string()),
            admin_status: status,
            created_at: None,
            broker: broker(&format!("b-{}", id), broker_name),
            company: Company {
                id: None,
                name: "Acme Realty".to_string(),
            },
        }
    }
}
