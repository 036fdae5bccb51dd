//! Error types for the feed pipeline

use thiserror::Error;

use super::types::ProcessingStatus;

/// Result type alias using our FeedError
pub type Result<T> = std::result::Result<T, FeedError>;

/// Main error type for feed operations
///
/// Every remote step has its own variant so a caller can tell exactly
/// where a submission stopped. None of them are retried.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Document slot could not be created, or the response had no upload destination
    #[error("Feed document creation failed: {0}")]
    DocumentCreation(String),

    /// Upload to the document destination did not report success
    #[error("Feed data upload failed: {0}")]
    Upload(String),

    /// Feed creation failed or the response had no feed id
    #[error("Feed creation failed: {0}")]
    FeedCreation(String),

    /// Status request failed or the response had no processing status
    #[error("Feed status poll failed: {0}")]
    StatusPoll(String),

    /// The remote side finished the feed with CANCELLED or FATAL
    #[error("Feed {feed_id} finished with status {status}")]
    FeedProcessingFailed {
        feed_id: String,
        status: ProcessingStatus,
    },

    /// Polling budget ran out before the feed reached a terminal status
    #[error("Feed {feed_id} still not finished after {attempts} polls")]
    PollTimeout { feed_id: String, attempts: u32 },

    /// The caller cancelled an in-progress wait
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Feed cancellation request failed
    #[error("Feed cancellation failed: {0}")]
    FeedCancellation(String),

    /// Feed document lookup failed
    #[error("Feed document retrieval failed: {0}")]
    DocumentRetrieval(String),

    /// Feed listing failed
    #[error("Feed listing failed: {0}")]
    FeedListing(String),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
