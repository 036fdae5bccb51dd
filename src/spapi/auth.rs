//! Access-token handling for feeds API requests

use crate::common::errors::{FeedError, Result};

/// Credentials passed into every remote call
///
/// Token acquisition and refresh happen elsewhere; a refreshed token means
/// a new `RequestContext`, never a mutated one.
#[derive(Clone)]
pub struct RequestContext {
    access_token: String,
}

impl RequestContext {
    /// Create a context from an LWA access token
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(FeedError::Configuration("access token is empty".to_string()));
        }
        Ok(Self { access_token })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Add authorization headers to a reqwest RequestBuilder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.access_token)
            .header("x-amz-access-token", &self.access_token)
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
