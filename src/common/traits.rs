//! Trait definitions for the feeds boundary

use async_trait::async_trait;

use super::errors::Result;
use super::types::{
    Feed, FeedDocument, FeedDocumentDownload, FeedList, FeedSubmission, GetFeedsParams,
};
use crate::spapi::auth::RequestContext;

/// Remote operations of the marketplace feeds API
///
/// The orchestrator only talks to the platform through this trait, so the
/// HTTP client can be swapped for a mock in tests. Every call receives the
/// caller's `RequestContext`; implementations never hold on to tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedsApi: Send + Sync {
    /// Reserve an upload slot for content of the given MIME type
    ///
    /// Fails with `DocumentCreation` if the response carries no upload destination.
    async fn create_feed_document(
        &self,
        ctx: &RequestContext,
        content_type: &str,
    ) -> Result<FeedDocument>;

    /// Place raw content at a document's upload destination
    ///
    /// Anything other than a success status is an `Upload` error.
    async fn upload_feed_data(
        &self,
        upload_url: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<()>;

    /// Create a feed that references an uploaded document
    async fn create_feed(
        &self,
        ctx: &RequestContext,
        feed_type: &str,
        marketplace_ids: &[String],
        document_id: &str,
    ) -> Result<FeedSubmission>;

    /// Look up a feed by id
    async fn get_feed(&self, ctx: &RequestContext, feed_id: &str) -> Result<Feed>;

    /// Ask the platform to cancel a feed that has not started processing
    async fn cancel_feed(&self, ctx: &RequestContext, feed_id: &str) -> Result<()>;

    /// Fetch the download descriptor of a feed document (e.g. a processing report)
    async fn get_feed_document(
        &self,
        ctx: &RequestContext,
        document_id: &str,
    ) -> Result<FeedDocumentDownload>;

    /// List feeds matching the given filters
    async fn get_feeds(&self, ctx: &RequestContext, params: &GetFeedsParams) -> Result<FeedList>;
}
