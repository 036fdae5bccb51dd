//! Configuration types

use serde::{Deserialize, Serialize};

use crate::common::errors::{FeedError, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Selling-partner API settings
    #[serde(default)]
    pub spapi: SpApiConfig,
    /// Status polling schedule
    #[serde(default)]
    pub poll: PollSettings,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Selling-partner API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SpApiConfig {
    /// Region code used to derive the endpoint (na, eu, fe)
    #[serde(default = "default_region")]
    pub region: String,
    /// Explicit base URL; overrides the region-derived one
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Seller id written into the feed header
    #[serde(default)]
    pub seller_id: String,
    /// Marketplaces the feed applies to
    #[serde(default = "default_marketplace_ids")]
    pub marketplace_ids: Vec<String>,
    /// LWA access token; refreshed outside this crate
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for SpApiConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            seller_id: String::new(),
            marketplace_ids: default_marketplace_ids(),
            access_token: None,
        }
    }
}

impl std::fmt::Debug for SpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpApiConfig")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("seller_id", &self.seller_id)
            .field("marketplace_ids", &self.marketplace_ids)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SpApiConfig {
    /// Resolve and validate the API base URL
    pub fn base_url(&self) -> Result<String> {
        let raw = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => match self.region.to_lowercase().as_str() {
                region @ ("na" | "eu" | "fe") => {
                    format!("https://sellingpartnerapi-{}.amazon.com", region)
                }
                other => {
                    return Err(FeedError::Configuration(format!("unknown region: {}", other)));
                }
            },
        };

        let parsed = url::Url::parse(&raw)
            .map_err(|e| FeedError::Configuration(format!("invalid endpoint {}: {}", raw, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FeedError::Configuration(format!("unsupported endpoint scheme: {}", raw)));
        }
        Ok(raw.trim_end_matches('/').to_string())
    }

    /// Seller id, required for building a feed
    pub fn require_seller_id(&self) -> Result<&str> {
        if self.seller_id.trim().is_empty() {
            return Err(FeedError::Configuration("seller_id is not set".to_string()));
        }
        Ok(&self.seller_id)
    }
}

fn default_region() -> String {
    "na".to_string()
}

fn default_marketplace_ids() -> Vec<String> {
    vec!["ATVPDKIKX0DER".to_string()]
}

/// Status polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Delay before the first poll in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Longest delay between polls in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// Maximum number of status requests
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Overall deadline in seconds (unset = attempts only)
    #[serde(default)]
    pub deadline_seconds: Option<u64>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            max_attempts: default_max_attempts(),
            deadline_seconds: None,
        }
    }
}

fn default_initial_delay() -> u64 {
    5000
}

fn default_max_delay() -> u64 {
    60_000
}

fn default_max_attempts() -> u32 {
    20
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
