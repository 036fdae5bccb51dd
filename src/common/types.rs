//! Catalog and feed types shared by the builder, client and orchestrator

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a quantity tier expresses its reduction
///
/// Parsing ignores case, so `percent_off` and `Percent_Off` both work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum QuantityPriceType {
    /// Absolute amount off the base price
    #[default]
    FixedAmount,
    /// Percentage off the base price
    PercentOff,
}

impl std::str::FromStr for QuantityPriceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FIXED_AMOUNT" => Ok(QuantityPriceType::FixedAmount),
            "PERCENT_OFF" => Ok(QuantityPriceType::PercentOff),
            _ => Err(format!("unknown quantity price type: {}", s)),
        }
    }
}

impl TryFrom<String> for QuantityPriceType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for QuantityPriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantityPriceType::FixedAmount => write!(f, "FIXED_AMOUNT"),
            QuantityPriceType::PercentOff => write!(f, "PERCENT_OFF"),
        }
    }
}

/// One quantity discount entry as supplied by the caller
///
/// Tiers are numbered by their position in the input, not by
/// `quantity_lower_bound`; unordered or overlapping bounds are passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub quantity_lower_bound: u32,
    /// Unit price once the tier applies; falls back to the base price
    #[serde(default)]
    pub quantity_price: Option<Decimal>,
}

impl DiscountTier {
    pub fn new(quantity_lower_bound: u32, quantity_price: Decimal) -> Self {
        Self {
            quantity_lower_bound,
            quantity_price: Some(quantity_price),
        }
    }
}

/// A single listing update in a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub sku: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, alias = "minimum_seller_allowed_price")]
    pub minimum_price: Option<Decimal>,
    #[serde(default, alias = "maximum_seller_allowed_price")]
    pub maximum_price: Option<Decimal>,
    #[serde(default)]
    pub business_price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Days before the item ships
    #[serde(default)]
    pub handling_time: Option<u32>,
    #[serde(default)]
    pub quantity_discounts: Vec<DiscountTier>,
    #[serde(default)]
    pub quantity_price_type: QuantityPriceType,
}

impl ProductUpdate {
    /// Create an update that only names the SKU
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            ..Default::default()
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_price_bounds(mut self, minimum: Decimal, maximum: Decimal) -> Self {
        self.minimum_price = Some(minimum);
        self.maximum_price = Some(maximum);
        self
    }

    pub fn with_business_price(mut self, business_price: Decimal) -> Self {
        self.business_price = Some(business_price);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_handling_time(mut self, days: u32) -> Self {
        self.handling_time = Some(days);
        self
    }

    pub fn with_discounts(
        mut self,
        price_type: QuantityPriceType,
        tiers: Vec<DiscountTier>,
    ) -> Self {
        self.quantity_price_type = price_type;
        self.quantity_discounts = tiers;
        self
    }
}

/// Single-use upload slot handed out by the feeds API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub document_id: String,
    pub upload_url: String,
}

/// Result of a successful feed creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSubmission {
    pub feed_id: String,
}

/// Processing status reported by the remote side
///
/// Values we do not know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessingStatus {
    InQueue,
    InProgress,
    Done,
    Cancelled,
    Fatal,
    Other(String),
}

impl ProcessingStatus {
    /// No further transitions will happen on the remote side
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProcessingStatus::Done | ProcessingStatus::Cancelled | ProcessingStatus::Fatal
        )
    }

    /// Terminal, but the feed was not processed
    pub fn is_failure(&self) -> bool {
        matches!(self, ProcessingStatus::Cancelled | ProcessingStatus::Fatal)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProcessingStatus::InQueue => "IN_QUEUE",
            ProcessingStatus::InProgress => "IN_PROGRESS",
            ProcessingStatus::Done => "DONE",
            ProcessingStatus::Cancelled => "CANCELLED",
            ProcessingStatus::Fatal => "FATAL",
            ProcessingStatus::Other(s) => s,
        }
    }
}

impl From<String> for ProcessingStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "IN_QUEUE" => ProcessingStatus::InQueue,
            "IN_PROGRESS" => ProcessingStatus::InProgress,
            "DONE" => ProcessingStatus::Done,
            "CANCELLED" => ProcessingStatus::Cancelled,
            "FATAL" => ProcessingStatus::Fatal,
            _ => ProcessingStatus::Other(value),
        }
    }
}

impl From<ProcessingStatus> for String {
    fn from(status: ProcessingStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full feed details from a feed-by-id lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub feed_id: String,
    #[serde(default)]
    pub feed_type: Option<String>,
    #[serde(default)]
    pub marketplace_ids: Vec<String>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub processing_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub processing_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result_feed_document_id: Option<String>,
}

/// Download descriptor for a processing report or other feed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDocumentDownload {
    pub feed_document_id: String,
    pub url: String,
    #[serde(default)]
    pub compression_algorithm: Option<String>,
}

/// Filters for listing feeds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetFeedsParams {
    pub feed_types: Vec<String>,
    pub marketplace_ids: Vec<String>,
    pub processing_statuses: Vec<ProcessingStatus>,
    pub page_size: Option<u32>,
    pub next_token: Option<String>,
}

impl GetFeedsParams {
    /// Query pairs in the form the feeds endpoint expects
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if !self.feed_types.is_empty() {
            query.push(("feedTypes", self.feed_types.join(",")));
        }
        if !self.marketplace_ids.is_empty() {
            query.push(("marketplaceIds", self.marketplace_ids.join(",")));
        }
        if !self.processing_statuses.is_empty() {
            let statuses: Vec<&str> =
                self.processing_statuses.iter().map(|s| s.as_str()).collect();
            query.push(("processingStatuses", statuses.join(",")));
        }
        if let Some(size) = self.page_size {
            query.push(("pageSize", size.to_string()));
        }
        if let Some(token) = &self.next_token {
            query.push(("nextToken", token.clone()));
        }
        query
    }
}

/// One page of feeds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedList {
    #[serde(default)]
    pub feeds: Vec<Feed>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_round_trip_keeps_unknown_values() {
        let status: ProcessingStatus = serde_json::from_str("\"IN_QUEUE\"").unwrap();
        assert_eq!(status, ProcessingStatus::InQueue);

        let status: ProcessingStatus = serde_json::from_str("\"ON_HOLD\"").unwrap();
        assert_eq!(status, ProcessingStatus::Other("ON_HOLD".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"ON_HOLD\"");
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ProcessingStatus::Done.is_terminal());
        assert!(!ProcessingStatus::Done.is_failure());
        assert!(ProcessingStatus::Fatal.is_failure());
        assert!(ProcessingStatus::Cancelled.is_failure());
        assert!(!ProcessingStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_product_deserializes_numbers_and_defaults() {
        let json = r#"{
            "sku": "SKU-1",
            "price": 29.99,
            "minimum_seller_allowed_price": "25.00",
            "quantity": 100,
            "quantity_discounts": [{"quantity_lower_bound": 10}]
        }"#;
        let product: ProductUpdate = serde_json::from_str(json).unwrap();

        assert_eq!(product.price, Some(dec!(29.99)));
        assert_eq!(product.minimum_price, Some(dec!(25.00)));
        assert_eq!(product.maximum_price, None);
        assert_eq!(product.quantity, Some(100));
        assert_eq!(product.quantity_price_type, QuantityPriceType::FixedAmount);
        assert_eq!(product.quantity_discounts[0].quantity_price, None);
    }

    #[test]
    fn test_price_type_ignores_case() {
        for raw in ["\"percent_off\"", "\"Percent_Off\"", "\"PERCENT_OFF\""] {
            let t: QuantityPriceType = serde_json::from_str(raw).unwrap();
            assert_eq!(t, QuantityPriceType::PercentOff);
            assert_eq!(t.to_string(), "PERCENT_OFF");
        }

        let t: QuantityPriceType = serde_json::from_str("\"fixed_Amount\"").unwrap();
        assert_eq!(t, QuantityPriceType::FixedAmount);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"FIXED_AMOUNT\"");
    }

    #[test]
    fn test_price_type_rejects_unknown_value() {
        let err = serde_json::from_str::<QuantityPriceType>("\"HALF_OFF\"").unwrap_err();
        assert!(err.to_string().contains("unknown quantity price type"));
    }

    #[test]
    fn test_feed_params_query() {
        let params = GetFeedsParams {
            feed_types: vec!["JSON_LISTINGS_FEED".to_string()],
            processing_statuses: vec![ProcessingStatus::Done, ProcessingStatus::Fatal],
            page_size: Some(10),
            ..Default::default()
        };
        let query = params.to_query();
        assert_eq!(
            query,
            vec![
                ("feedTypes", "JSON_LISTINGS_FEED".to_string()),
                ("processingStatuses", "DONE,FATAL".to_string()),
                ("pageSize", "10".to_string()),
            ]
        );
    }
}
