//! JSON shapes exchanged with the remote API and their conversion into
//! domain models.

use crate::models::{AdminStatus, Broker, Company, Listing, Location, PriceRange};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: AdminStatus,
}

/// Common `{status, message, data}` envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PaginationDto {
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u64,
}

#[derive(Debug, Deserialize)]
pub struct BrokersData {
    #[serde(default)]
    pub brokers: Vec<BrokerDto>,
    #[serde(default)]
    pub pagination: PaginationDto,
}

#[derive(Debug, Deserialize)]
pub struct ListingsData {
    #[serde(default)]
    pub listings: Vec<ListingEntryDto>,
    #[serde(default)]
    pub pagination: PaginationDto,
}

#[derive(Debug, Deserialize)]
pub struct ListingEntryDto {
    pub listing: ListingDto,
    #[serde(default)]
    pub broker: Option<BrokerDto>,
    #[serde(default)]
    pub company: Option<CompanyDto>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CompanyDto {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Brokers come camelCase from the brokers endpoint and snake_case when
/// embedded in a listing.
#[derive(Debug, Deserialize, Default)]
pub struct BrokerDto {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "countryCode")]
    pub country_code: Option<String>,
    #[serde(default, alias = "wNumber")]
    pub w_number: Option<String>,
    #[serde(default, alias = "profilePic")]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub company: Option<CompanyDto>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListingDto {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub sq_ft: f64,
    #[serde(default, rename = "type")]
    pub listing_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub looking_for: bool,
    #[serde(default)]
    pub rental_frequency: Option<String>,
    #[serde(default)]
    pub no_of_bedrooms: Option<String>,
    #[serde(default)]
    pub no_of_bathrooms: Option<String>,
    #[serde(default)]
    pub furnished: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub project_age: Option<f64>,
    #[serde(default)]
    pub payment_plan: Option<String>,
    #[serde(default)]
    pub sale_type: Option<String>,
    #[serde(default)]
    pub admin_status: Option<AdminStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Ids are strings on most endpoints but some backends send numbers.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

impl From<CompanyDto> for Company {
    fn from(dto: CompanyDto) -> Self {
        Company {
            id: dto.id,
            name: dto.name,
        }
    }
}

impl From<BrokerDto> for Broker {
    fn from(dto: BrokerDto) -> Self {
        let phone = dto.phone.filter(|p| !p.is_empty()).or_else(|| {
            dto.w_number
                .as_ref()
                .map(|number| format!("{}{}", dto.country_code.as_deref().unwrap_or(""), number))
        });

        Broker {
            id: dto.id.unwrap_or_default(),
            name: dto.name,
            email: dto.email,
            phone,
            country_code: dto.country_code,
            profile_pic: dto.profile_pic,
            company: dto.company.map(Company::from),
            status: dto.status,
            created_at: dto.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

impl From<ListingEntryDto> for Listing {
    fn from(entry: ListingEntryDto) -> Self {
        let dto = entry.listing;
        let company = entry.company.map(Company::from).unwrap_or_default();
        let mut broker = entry.broker.map(Broker::from).unwrap_or_default();
        if broker.company.is_none() && !company.name.is_empty() {
            broker.company = Some(company.clone());
        }

        let mut images: Vec<String> = dto.image.into_iter().filter(|i| !i.is_empty()).collect();
        for url in dto.image_urls.unwrap_or_default() {
            if !images.contains(&url) {
                images.push(url);
            }
        }

        Listing {
            id: dto.id.unwrap_or_default(),
            title: dto.title,
            description: dto.description,
            images,
            price_range: PriceRange {
                min: dto.min_price,
                max: dto.max_price,
            },
            sq_ft: dto.sq_ft,
            listing_type: dto.listing_type,
            category: dto.category,
            looking_for: dto.looking_for,
            rental_frequency: dto.rental_frequency,
            bedrooms: dto.no_of_bedrooms,
            bathrooms: dto.no_of_bathrooms,
            furnished: dto.furnished,
            location: Location {
                city: dto.city,
                address: dto.address,
            },
            amenities: dto.amenities.unwrap_or_default(),
            project_age: dto.project_age,
            payment_plan: dto.payment_plan,
            sale_type: dto.sale_type,
            admin_status: dto.admin_status.unwrap_or(AdminStatus::Pending),
            created_at: dto.created_at.as_deref().and_then(parse_timestamp),
            broker,
            company,
        }
    }
}
