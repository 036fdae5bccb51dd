//! Listings Feed Library
//!
//! Builds JSON listings feeds from batches of price, inventory and
//! quantity-discount updates, and submits them through the selling-partner
//! feeds API.

pub mod common;
pub mod config;
pub mod feed;
pub mod spapi;

// Re-export commonly used types
pub use common::errors::{FeedError, Result};
pub use common::traits::FeedsApi;
pub use common::types::{
    DiscountTier, Feed, FeedDocument, FeedDocumentDownload, FeedList, FeedSubmission,
    GetFeedsParams, ProcessingStatus, ProductUpdate, QuantityPriceType,
};
pub use config::types::AppConfig;
pub use feed::{
    FeedEnvelope, FeedPayloadBuilder, FeedSubmissionOrchestrator, PollPolicy, PricingTierCalculator,
    QuantityDiscountTier, SubmissionState,
};
pub use spapi::{FeedsRestClient, RequestContext};
