pub mod client;
pub mod error;
pub mod traits;
pub mod types;
pub mod wire;

pub use client::HttpAdminApi;
pub use error::ApiError;
pub use traits::{AdminApi, LoginGrant};
pub use types::{PageFilters, PageRequest, PageResult};
