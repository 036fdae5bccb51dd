//! JSON listings feed envelope and its builder
//!
//! Attributes are fixed-schema structs with optional fields; an absent
//! field is skipped on serialization, so the output only carries what the
//! caller supplied. Field order follows struct order, which keeps the
//! serialized envelope stable for identical input.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::pricing::{PricingTierCalculator, QuantityDiscountTier};
use crate::common::errors::Result;
use crate::common::types::{ProductUpdate, QuantityPriceType};

/// MIME type of the serialized envelope
pub const FEED_CONTENT_TYPE: &str = "application/json";

const FEED_VERSION: &str = "2.0";
const ISSUE_LOCALE: &str = "en_US";
const OPERATION_UPDATE: &str = "UPDATE";
const PRODUCT_TYPE: &str = "PRODUCT";
const REQUIREMENTS_LISTING: &str = "LISTING";
const CONDITION_NEW: &str = "new_new";
const CURRENCY_USD: &str = "USD";
const DEFAULT_FULFILLMENT_CHANNEL: &str = "DEFAULT";

/// Complete feed document body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEnvelope {
    pub header: FeedHeader,
    pub messages: Vec<FeedMessage>,
}

impl FeedEnvelope {
    /// Serialize to the bytes that get uploaded
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedHeader {
    pub seller_id: String,
    pub version: String,
    pub issue_locale: String,
}

/// One listing update inside the envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMessage {
    /// 1-based position in the envelope
    pub message_id: u32,
    pub sku: String,
    pub operation_type: String,
    pub product_type: String,
    pub requirements: String,
    pub attributes: ListingAttributes,
}

/// Single `{"value": ...}` attribute entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeValue<T> {
    pub value: T,
}

impl<T> AttributeValue<T> {
    pub fn list(value: T) -> Vec<Self> {
        vec![Self { value }]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingAttributes {
    pub condition_type: Vec<AttributeValue<String>>,
    pub purchasable_offer: Vec<PurchasableOffer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_availability: Option<Vec<FulfillmentAvailability>>,
}

/// Price entry wrapped in a one-element schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSchedule {
    pub schedule: Vec<ScheduledPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledPrice {
    #[serde(with = "rust_decimal::serde::float")]
    pub value_with_tax: Decimal,
}

impl PriceSchedule {
    /// `[{"schedule": [{"value_with_tax": price}]}]`
    pub fn single(price: Decimal) -> Vec<Self> {
        vec![Self {
            schedule: vec![ScheduledPrice { value_with_tax: price }],
        }]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchasableOffer {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_price: Option<Vec<PriceSchedule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_seller_allowed_price: Option<Vec<PriceSchedule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_seller_allowed_price: Option<Vec<PriceSchedule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_price: Option<Vec<PriceSchedule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_discount_type: Option<Vec<AttributeValue<QuantityPriceType>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_discount: Option<Vec<QuantityDiscountTier>>,
}

impl PurchasableOffer {
    fn from_product(product: &ProductUpdate) -> Self {
        let mut offer = Self {
            currency: CURRENCY_USD.to_string(),
            our_price: product.price.map(PriceSchedule::single),
            minimum_seller_allowed_price: product.minimum_price.map(PriceSchedule::single),
            maximum_seller_allowed_price: product.maximum_price.map(PriceSchedule::single),
            business_price: product.business_price.map(PriceSchedule::single),
            quantity_discount_type: None,
            quantity_discount: None,
        };

        if !product.quantity_discounts.is_empty() {
            let discount_type = product.quantity_price_type;
            offer.quantity_discount_type = Some(AttributeValue::list(discount_type));
            offer.quantity_discount = Some(PricingTierCalculator::tiers(
                product.price,
                discount_type,
                &product.quantity_discounts,
            ));
        }

        offer
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FulfillmentAvailability {
    pub fulfillment_channel_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time_to_ship_max_days: Option<u32>,
}

impl FulfillmentAvailability {
    /// Only built when the product carries inventory or handling time
    fn from_product(product: &ProductUpdate) -> Option<Self> {
        if product.quantity.is_none() && product.handling_time.is_none() {
            return None;
        }
        Some(Self {
            fulfillment_channel_code: DEFAULT_FULFILLMENT_CHANNEL.to_string(),
            quantity: product.quantity,
            lead_time_to_ship_max_days: product.handling_time,
        })
    }
}

impl ListingAttributes {
    pub fn from_product(product: &ProductUpdate) -> Self {
        Self {
            condition_type: AttributeValue::list(CONDITION_NEW.to_string()),
            purchasable_offer: vec![PurchasableOffer::from_product(product)],
            fulfillment_availability: FulfillmentAvailability::from_product(product)
                .map(|f| vec![f]),
        }
    }
}

/// Assembles product updates into a feed envelope
///
/// Performs no I/O. SKU uniqueness is not checked; every input record
/// becomes exactly one message.
#[derive(Debug, Clone)]
pub struct FeedPayloadBuilder {
    seller_id: String,
}

impl FeedPayloadBuilder {
    pub fn new(seller_id: impl Into<String>) -> Self {
        Self {
            seller_id: seller_id.into(),
        }
    }

    pub fn seller_id(&self) -> &str {
        &self.seller_id
    }

    /// Build the envelope, numbering messages 1..N in input order
    pub fn build(&self, products: &[ProductUpdate]) -> FeedEnvelope {
        let messages = products
            .iter()
            .zip(1u32..)
            .map(|(product, message_id)| FeedMessage {
                message_id,
                sku: product.sku.clone(),
                operation_type: OPERATION_UPDATE.to_string(),
                product_type: PRODUCT_TYPE.to_string(),
                requirements: REQUIREMENTS_LISTING.to_string(),
                attributes: ListingAttributes::from_product(product),
            })
            .collect::<Vec<_>>();

        debug!("Built feed envelope with {} messages", messages.len());

        FeedEnvelope {
            header: FeedHeader {
                seller_id: self.seller_id.clone(),
                version: FEED_VERSION.to_string(),
                issue_locale: ISSUE_LOCALE.to_string(),
            },
            messages,
        }
    }

    /// Build and serialize in one step
    pub fn build_bytes(&self, products: &[ProductUpdate]) -> Result<Vec<u8>> {
        self.build(products).to_json_bytes()
    }
}
