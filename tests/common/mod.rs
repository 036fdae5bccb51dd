//! Common test utilities and fixtures

#![allow(dead_code)]

use listings_feed::{DiscountTier, ProductUpdate, QuantityPriceType, RequestContext};
use rust_decimal_macros::dec;

pub const SELLER_ID: &str = "A1TESTSELLER";
pub const US_MARKETPLACE: &str = "ATVPDKIKX0DER";
pub const TOKEN: &str = "Atza|test-token";

pub fn ctx() -> RequestContext {
    RequestContext::new(TOKEN).expect("valid token")
}

/// Scenario product: one tier at 28.99 against a 29.99 base price
pub fn tiered_product(price_type: QuantityPriceType) -> ProductUpdate {
    ProductUpdate::new("X-1")
        .with_price(dec!(29.99))
        .with_discounts(price_type, vec![DiscountTier::new(10, dec!(28.99))])
}

/// A fully populated product
pub fn full_product(sku: &str) -> ProductUpdate {
    ProductUpdate::new(sku)
        .with_price(dec!(29.99))
        .with_price_bounds(dec!(25.00), dec!(35.00))
        .with_business_price(dec!(27.99))
        .with_quantity(100)
        .with_handling_time(2)
        .with_discounts(
            QuantityPriceType::FixedAmount,
            vec![
                DiscountTier::new(10, dec!(28.99)),
                DiscountTier::new(50, dec!(27.99)),
                DiscountTier::new(100, dec!(26.99)),
            ],
        )
}

/// Sample API responses for testing
pub mod api_responses {
    pub const FEED_IN_PROGRESS: &str = r#"{
        "feedId": "50014019726",
        "feedType": "JSON_LISTINGS_FEED",
        "marketplaceIds": ["ATVPDKIKX0DER"],
        "createdTime": "2026-10-16T10:00:00Z",
        "processingStatus": "IN_PROGRESS",
        "processingStartTime": "2026-10-16T10:00:05Z"
    }"#;

    pub const FEED_DONE: &str = r#"{
        "feedId": "50014019726",
        "feedType": "JSON_LISTINGS_FEED",
        "marketplaceIds": ["ATVPDKIKX0DER"],
        "createdTime": "2026-10-16T10:00:00Z",
        "processingStatus": "DONE",
        "processingStartTime": "2026-10-16T10:00:05Z",
        "processingEndTime": "2026-10-16T10:02:00Z",
        "resultFeedDocumentId": "amzn1.tortuga.4.na.report"
    }"#;

    pub const ERROR_LIST: &str = r#"{
        "errors": [{"code": "InvalidInput", "message": "Invalid marketplace id"}]
    }"#;
}
