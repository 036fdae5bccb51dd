//! REST client for the selling-partner feeds API

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};

use super::auth::RequestContext;
use super::messages::*;
use crate::common::errors::{FeedError, Result};
use crate::common::traits::FeedsApi;
use crate::common::types::{
    Feed, FeedDocument, FeedDocumentDownload, FeedList, FeedSubmission, GetFeedsParams,
};

/// Path prefix of the feeds API version in use
const FEEDS_PATH: &str = "/feeds/2021-06-30";

/// REST client for the feeds API
///
/// Holds no credentials; each call takes a `RequestContext`.
#[derive(Debug, Clone)]
pub struct FeedsRestClient {
    /// HTTP client
    client: Client,
    /// Regional API base URL
    base_url: String,
}

impl FeedsRestClient {
    /// Create a new REST client
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, FEEDS_PATH, path)
    }
}

/// Turn a non-success response into a step-specific error message
async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("server returned status {}: {}", status, describe_error_body(&body))
}

#[async_trait]
impl FeedsApi for FeedsRestClient {
    #[instrument(skip(self, ctx))]
    async fn create_feed_document(
        &self,
        ctx: &RequestContext,
        content_type: &str,
    ) -> Result<FeedDocument> {
        let url = self.url("/documents");
        debug!("Creating feed document at: {}", url);

        let body = CreateFeedDocumentRequest {
            content_type: content_type.to_string(),
        };
        let response = ctx
            .apply_to_request(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| FeedError::DocumentCreation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::DocumentCreation(failure_message(response).await));
        }

        let document: CreateFeedDocumentResponse = response
            .json()
            .await
            .map_err(|e| FeedError::DocumentCreation(format!("invalid response body: {}", e)))?;
        document.into_document()
    }

    #[instrument(skip(self, upload_url, content), fields(bytes = content.len()))]
    async fn upload_feed_data(
        &self,
        upload_url: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<()> {
        // Pre-signed destination: no API authorization headers
        let response = self
            .client
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await
            .map_err(|e| FeedError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::Upload(failure_message(response).await));
        }
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    async fn create_feed(
        &self,
        ctx: &RequestContext,
        feed_type: &str,
        marketplace_ids: &[String],
        document_id: &str,
    ) -> Result<FeedSubmission> {
        let url = self.url("/feeds");
        debug!("Creating feed at: {}", url);

        let body = CreateFeedRequest {
            feed_type: feed_type.to_string(),
            marketplace_ids: marketplace_ids.to_vec(),
            input_feed_document: document_id.to_string(),
        };
        let response = ctx
            .apply_to_request(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| FeedError::FeedCreation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::FeedCreation(failure_message(response).await));
        }

        let created: CreateFeedResponse = response
            .json()
            .await
            .map_err(|e| FeedError::FeedCreation(format!("invalid response body: {}", e)))?;
        created.into_submission()
    }

    #[instrument(skip(self, ctx))]
    async fn get_feed(&self, ctx: &RequestContext, feed_id: &str) -> Result<Feed> {
        let url = self.url(&format!("/feeds/{}", feed_id));
        debug!("Fetching feed from: {}", url);

        let response = ctx
            .apply_to_request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| FeedError::StatusPoll(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::StatusPoll(failure_message(response).await));
        }

        let feed: FeedResponse = response
            .json()
            .await
            .map_err(|e| FeedError::StatusPoll(format!("invalid response body: {}", e)))?;
        feed.into_feed(feed_id)
    }

    #[instrument(skip(self, ctx))]
    async fn cancel_feed(&self, ctx: &RequestContext, feed_id: &str) -> Result<()> {
        let url = self.url(&format!("/feeds/{}", feed_id));
        debug!("Cancelling feed at: {}", url);

        let response = ctx
            .apply_to_request(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| FeedError::FeedCancellation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::FeedCancellation(failure_message(response).await));
        }
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    async fn get_feed_document(
        &self,
        ctx: &RequestContext,
        document_id: &str,
    ) -> Result<FeedDocumentDownload> {
        let url = self.url(&format!("/documents/{}", document_id));
        debug!("Fetching feed document from: {}", url);

        let response = ctx
            .apply_to_request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| FeedError::DocumentRetrieval(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::DocumentRetrieval(failure_message(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::DocumentRetrieval(format!("invalid response body: {}", e)))
    }

    #[instrument(skip(self, ctx))]
    async fn get_feeds(&self, ctx: &RequestContext, params: &GetFeedsParams) -> Result<FeedList> {
        let url = self.url("/feeds");
        debug!("Listing feeds from: {}", url);

        let response = ctx
            .apply_to_request(self.client.get(&url).query(&params.to_query()))
            .send()
            .await
            .map_err(|e| FeedError::FeedListing(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::FeedListing(failure_message(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::FeedListing(format!("invalid response body: {}", e)))
    }
}
