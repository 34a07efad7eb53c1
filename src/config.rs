//! Runtime configuration: an optional `urbantap-admin.toml` overlaid by
//! `URBANTAP_*` environment variables (`URBANTAP_API__BASE_URL`, ...).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the bearer token
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_brokers_page_size")]
    pub brokers_page_size: u32,

    #[serde(default = "default_listings_page_size")]
    pub listings_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            brokers_page_size: default_brokers_page_size(),
            listings_page_size: default_listings_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".urbantap-admin").join("session.json")
}

fn default_brokers_page_size() -> u32 {
    10
}

fn default_listings_page_size() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from `urbantap-admin.toml` (optional) and the environment
    pub fn load() -> anyhow::Result<Self> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name("urbantap-admin").required(false)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> anyhow::Result<Self> {
        let settings = builder
            .add_source(
                config::Environment::with_prefix("URBANTAP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.api.base_url.trim().is_empty(),
            "api.base_url must be set (URBANTAP_API__BASE_URL)"
        );
        anyhow::ensure!(
            self.pagination.brokers_page_size > 0 && self.pagination.listings_page_size > 0,
            "page sizes must be positive"
        );
        Ok(())
    }
}
