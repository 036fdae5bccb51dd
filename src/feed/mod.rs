//! Feed construction and submission
//!
//! Product updates flow one way: records -> envelope bytes -> uploaded
//! document -> submitted feed -> polled status.

pub mod orchestrator;
pub mod payload;
pub mod pricing;

pub use orchestrator::{FeedSubmissionOrchestrator, PollPolicy, SubmissionState};
pub use payload::{FeedEnvelope, FeedPayloadBuilder, FEED_CONTENT_TYPE};
pub use pricing::{PricingTierCalculator, QuantityDiscountTier};
