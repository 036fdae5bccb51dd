//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{FeedError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. `SPAPI_*` environment variables (seller id, token, endpoint, region)
/// 2. Environment variables prefixed with `APP_`, nested with `__`
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // APP__SPAPI__SELLER_ID, APP__POLL__MAX_ATTEMPTS, ...
    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| FeedError::Configuration(e.to_string()))?;

    let mut app: AppConfig = config
        .try_deserialize()
        .map_err(|e| FeedError::Configuration(e.to_string()))?;

    apply_spapi_env(&mut app, |key| std::env::var(key).ok());
    Ok(app)
}

/// Overlay the flat `SPAPI_*` variables
fn apply_spapi_env(app: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(seller_id) = lookup("SPAPI_SELLER_ID") {
        app.spapi.seller_id = seller_id;
    }
    if let Some(token) = lookup("SPAPI_ACCESS_TOKEN") {
        app.spapi.access_token = Some(token);
    }
    if let Some(endpoint) = lookup("SPAPI_ENDPOINT") {
        app.spapi.endpoint = Some(endpoint);
    }
    if let Some(region) = lookup("SPAPI_REGION") {
        app.spapi.region = region;
    }
    if let Some(marketplaces) = lookup("SPAPI_MARKETPLACE_IDS") {
        app.spapi.marketplace_ids = marketplaces
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_spapi_env_overlay() {
        let vars: HashMap<&str, &str> = [
            ("SPAPI_SELLER_ID", "A1SELLER"),
            ("SPAPI_ACCESS_TOKEN", "Atza|tok"),
            ("SPAPI_MARKETPLACE_IDS", "ATVPDKIKX0DER, A2EUQ1WTGCTBG2,"),
        ]
        .into_iter()
        .collect();

        let mut app = AppConfig::default();
        apply_spapi_env(&mut app, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(app.spapi.seller_id, "A1SELLER");
        assert_eq!(app.spapi.access_token.as_deref(), Some("Atza|tok"));
        assert_eq!(
            app.spapi.marketplace_ids,
            vec!["ATVPDKIKX0DER".to_string(), "A2EUQ1WTGCTBG2".to_string()]
        );
        assert_eq!(app.spapi.region, "na");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let app = load_config(Some("does-not-exist.toml")).unwrap();
        assert_eq!(app.poll.max_attempts, 20);
        assert_eq!(app.settings.log_level, "info");
    }
}
