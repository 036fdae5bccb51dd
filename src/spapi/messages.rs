//! Wire-level request and response bodies of the feeds API
//!
//! Responses are decoded leniently (every field optional) and then checked,
//! so that a missing field becomes a step-specific error instead of a
//! generic JSON failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::errors::{FeedError, Result};
use crate::common::types::{Feed, FeedDocument, FeedSubmission, ProcessingStatus};

/// Feed type used for listings updates
pub const JSON_LISTINGS_FEED: &str = "JSON_LISTINGS_FEED";

/// Body of the create-document request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedDocumentRequest {
    pub content_type: String,
}

/// Nested upload destination some gateways return
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadDestination {
    #[serde(default)]
    pub url: Option<String>,
}

/// Response of the create-document request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedDocumentResponse {
    #[serde(default)]
    pub feed_document_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub upload_destination: Option<UploadDestination>,
}

impl CreateFeedDocumentResponse {
    /// Check that both the document id and an upload destination are present
    pub fn into_document(self) -> Result<FeedDocument> {
        let upload_url = self
            .url
            .or_else(|| self.upload_destination.and_then(|d| d.url))
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                FeedError::DocumentCreation("response has no upload destination".to_string())
            })?;

        let document_id = self
            .feed_document_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                FeedError::DocumentCreation("response has no feedDocumentId".to_string())
            })?;

        Ok(FeedDocument {
            document_id,
            upload_url,
        })
    }
}

/// Body of the create-feed request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedRequest {
    pub feed_type: String,
    pub marketplace_ids: Vec<String>,
    pub input_feed_document: String,
}

/// Response of the create-feed request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedResponse {
    #[serde(default)]
    pub feed_id: Option<String>,
}

impl CreateFeedResponse {
    pub fn into_submission(self) -> Result<FeedSubmission> {
        match self.feed_id {
            Some(feed_id) if !feed_id.is_empty() => Ok(FeedSubmission { feed_id }),
            _ => Err(FeedError::FeedCreation("response has no feedId".to_string())),
        }
    }
}

/// Feed-by-id response before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    #[serde(default)]
    pub feed_id: Option<String>,
    #[serde(default)]
    pub feed_type: Option<String>,
    #[serde(default)]
    pub marketplace_ids: Option<Vec<String>>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub processing_status: Option<String>,
    #[serde(default)]
    pub processing_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub processing_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result_feed_document_id: Option<String>,
}

impl FeedResponse {
    /// Require a processing status; the feed id falls back to the one requested
    pub fn into_feed(self, requested_id: &str) -> Result<Feed> {
        let status = self
            .processing_status
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                FeedError::StatusPoll(format!(
                    "response for feed {} has no processingStatus",
                    requested_id
                ))
            })?;

        Ok(Feed {
            feed_id: self.feed_id.unwrap_or_else(|| requested_id.to_string()),
            feed_type: self.feed_type,
            marketplace_ids: self.marketplace_ids.unwrap_or_default(),
            created_time: self.created_time,
            processing_status: ProcessingStatus::from(status),
            processing_start_time: self.processing_start_time,
            processing_end_time: self.processing_end_time,
            result_feed_document_id: self.result_feed_document_id,
        })
    }
}

/// Error entry in an error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Error response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorList {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

/// Render a failed response body for an error message
///
/// Structured error lists are flattened to `CODE: message`; anything else
/// is returned as-is.
pub fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ErrorList>(body) {
        Ok(list) if !list.errors.is_empty() => list
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.to_string(),
    }
}
