//! End-to-end feed submission and status polling

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

use super::payload::{FeedPayloadBuilder, FEED_CONTENT_TYPE};
use crate::common::errors::{FeedError, Result};
use crate::common::traits::FeedsApi;
use crate::common::types::{
    Feed, FeedDocumentDownload, FeedSubmission, ProcessingStatus, ProductUpdate,
};
use crate::config::types::PollSettings;
use crate::spapi::auth::RequestContext;
use crate::spapi::messages::JSON_LISTINGS_FEED;

/// Progress of one submission attempt
///
/// Strictly linear; a failure at any step ends the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Init,
    DocumentCreated,
    DataUploaded,
    FeedSubmitted,
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionState::Init => write!(f, "INIT"),
            SubmissionState::DocumentCreated => write!(f, "DOCUMENT_CREATED"),
            SubmissionState::DataUploaded => write!(f, "DATA_UPLOADED"),
            SubmissionState::FeedSubmitted => write!(f, "FEED_SUBMITTED"),
        }
    }
}

/// Backoff schedule for status polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before the first poll
    pub initial_delay: Duration,
    /// Upper bound for any single wait
    pub max_delay: Duration,
    /// Number of status requests before giving up
    pub max_attempts: u32,
    /// Overall time limit, measured from the start of the wait
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            max_attempts: 20,
            deadline: None,
        }
    }
}

impl From<&PollSettings> for PollPolicy {
    fn from(settings: &PollSettings) -> Self {
        Self {
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            max_attempts: settings.max_attempts,
            deadline: settings.deadline_seconds.map(Duration::from_secs),
        }
    }
}

impl PollPolicy {
    /// Delay before the given 1-based attempt: doubling from `initial_delay`, capped at `max_delay`
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

/// Resolves once the watch value becomes `true`; never if the sender goes away
async fn cancellation(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Drives a batch through document creation, upload and feed creation
///
/// One blocking remote call per step, no retries. Polling is separate and
/// caller-invoked.
pub struct FeedSubmissionOrchestrator<A: FeedsApi> {
    api: A,
    builder: FeedPayloadBuilder,
    poll: PollPolicy,
}

impl<A: FeedsApi> FeedSubmissionOrchestrator<A> {
    pub fn new(api: A, builder: FeedPayloadBuilder) -> Self {
        Self {
            api,
            builder,
            poll: PollPolicy::default(),
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Get a reference to the underlying API client
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    /// Submit a batch of product updates as one JSON listings feed
    ///
    /// # Arguments
    /// * `ctx` - Credentials for this call
    /// * `products` - The batch; becomes one message per record
    /// * `marketplace_ids` - Passed to feed creation unmodified
    ///
    /// # Errors
    /// `DocumentCreation`, `Upload` or `FeedCreation`, depending on the
    /// step that failed. A failed upload needs a fresh document.
    #[instrument(skip(self, ctx, products), fields(products = products.len()))]
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        products: &[ProductUpdate],
        marketplace_ids: &[String],
    ) -> Result<FeedSubmission> {
        let mut state = SubmissionState::Init;
        let result = self.run_submission(ctx, products, marketplace_ids, &mut state).await;

        if let Err(e) = &result {
            warn!("Feed submission stopped after {}: {}", state, e);
        }
        result
    }

    async fn run_submission(
        &self,
        ctx: &RequestContext,
        products: &[ProductUpdate],
        marketplace_ids: &[String],
        state: &mut SubmissionState,
    ) -> Result<FeedSubmission> {
        let content = self.builder.build_bytes(products)?;

        let document = self.api.create_feed_document(ctx, FEED_CONTENT_TYPE).await?;
        *state = SubmissionState::DocumentCreated;
        info!(document_id = %document.document_id, "{}", state);

        let size = content.len();
        self.api
            .upload_feed_data(&document.upload_url, FEED_CONTENT_TYPE, content)
            .await?;
        *state = SubmissionState::DataUploaded;
        info!(document_id = %document.document_id, bytes = size, "{}", state);

        let submission = self
            .api
            .create_feed(ctx, JSON_LISTINGS_FEED, marketplace_ids, &document.document_id)
            .await?;
        *state = SubmissionState::FeedSubmitted;
        info!(feed_id = %submission.feed_id, "{}", state);

        Ok(submission)
    }

    /// Current processing status of a feed
    #[instrument(skip(self, ctx))]
    pub async fn get_feed_status(
        &self,
        ctx: &RequestContext,
        feed_id: &str,
    ) -> Result<ProcessingStatus> {
        Ok(self.api.get_feed(ctx, feed_id).await?.processing_status)
    }

    /// Full feed details
    pub async fn get_feed(&self, ctx: &RequestContext, feed_id: &str) -> Result<Feed> {
        self.api.get_feed(ctx, feed_id).await
    }

    /// Cancel a feed that has not started processing
    pub async fn cancel_feed(&self, ctx: &RequestContext, feed_id: &str) -> Result<()> {
        self.api.cancel_feed(ctx, feed_id).await
    }

    /// Download descriptor of the processing report, once the feed has one
    pub async fn processing_report(
        &self,
        ctx: &RequestContext,
        feed: &Feed,
    ) -> Result<Option<FeedDocumentDownload>> {
        match &feed.result_feed_document_id {
            Some(document_id) => Ok(Some(self.api.get_feed_document(ctx, document_id).await?)),
            None => Ok(None),
        }
    }

    /// Poll until the feed reaches a terminal status
    ///
    /// Waits with exponential backoff before each poll. Sending `true` on
    /// the cancel channel interrupts a wait; a status request already in
    /// flight runs to completion.
    ///
    /// # Returns
    /// The feed once it is DONE.
    ///
    /// # Errors
    /// * `FeedProcessingFailed` - remote reported CANCELLED or FATAL
    /// * `PollTimeout` - attempts or deadline exhausted
    /// * `Cancelled` - caller cancelled
    /// * `StatusPoll` - a status request failed
    #[instrument(skip(self, ctx, cancel))]
    pub async fn wait_for_completion(
        &self,
        ctx: &RequestContext,
        feed_id: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<Feed> {
        let started = Instant::now();

        for attempt in 1..=self.poll.max_attempts {
            let delay = self.poll.delay_before(attempt);

            if let Some(deadline) = self.poll.deadline {
                if started.elapsed() + delay > deadline {
                    return Err(FeedError::PollTimeout {
                        feed_id: feed_id.to_string(),
                        attempts: attempt - 1,
                    });
                }
            }

            tokio::select! {
                biased;
                _ = cancellation(&mut cancel) => {
                    return Err(FeedError::Cancelled(format!("waiting for feed {}", feed_id)));
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let feed = self.api.get_feed(ctx, feed_id).await?;
            info!(attempt, status = %feed.processing_status, "Polled feed {}", feed_id);

            if feed.processing_status.is_failure() {
                warn!("Feed {} ended with {}", feed_id, feed.processing_status);
                return Err(FeedError::FeedProcessingFailed {
                    feed_id: feed_id.to_string(),
                    status: feed.processing_status,
                });
            }
            if feed.processing_status.is_terminal() {
                return Ok(feed);
            }
        }

        Err(FeedError::PollTimeout {
            feed_id: feed_id.to_string(),
            attempts: self.poll.max_attempts,
        })
    }
}
