use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::common::types::{DiscountTier, QuantityPriceType};

/// A quantity discount tier as it appears in the feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityDiscountTier {
    /// 1-based position of the tier in the input sequence
    pub quantity_tier: u32,
    pub quantity_discount_type: QuantityPriceType,
    pub quantity_lower_bound: u32,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_amount: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percent: Option<Decimal>,
}

impl QuantityDiscountTier {
    /// The computed discount, whichever field the type populates
    pub fn discount(&self) -> Decimal {
        self.discount_amount
            .or(self.discount_percent)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Largest percentage a tier can take off
const MAX_DISCOUNT_PERCENT: Decimal = dec!(100);

/// Tier discount math
///
/// Pure functions; every input is normalized before computing so there
/// are no error cases. Discounts are clamped at zero: a tier priced above
/// the base price gives no discount rather than a surcharge. Arithmetic
/// that would overflow saturates instead: amounts at `Decimal::MAX`,
/// percentages at 100.
pub struct PricingTierCalculator;

impl PricingTierCalculator {
    /// Absolute discount: `max(0, base - tier)`
    pub fn discount_amount(base_price: Decimal, tier_price: Decimal) -> Decimal {
        match base_price.checked_sub(tier_price) {
            Some(difference) => difference.max(Decimal::ZERO),
            None if base_price > tier_price => Decimal::MAX,
            None => Decimal::ZERO,
        }
    }

    /// Percentage discount: `(base - tier) / base * 100` clamped to
    /// `0..=100`, or 0 when the base price is not positive
    pub fn discount_percent(base_price: Decimal, tier_price: Decimal) -> Decimal {
        if base_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let difference = match base_price.checked_sub(tier_price) {
            Some(difference) if difference > Decimal::ZERO => difference,
            Some(_) => return Decimal::ZERO,
            // Only a hugely negative tier price gets here
            None => return MAX_DISCOUNT_PERCENT,
        };

        difference
            .checked_div(base_price)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .map_or(MAX_DISCOUNT_PERCENT, |percent| percent.min(MAX_DISCOUNT_PERCENT))
    }

    /// Build the feed record for one tier
    ///
    /// # Arguments
    /// * `quantity_tier` - 1-based tier number
    /// * `base_price` - The product's price; absent is treated as 0
    /// * `discount_type` - Which discount field to populate
    /// * `tier` - The caller's tier; an absent tier price means "same as base"
    pub fn tier(
        quantity_tier: u32,
        base_price: Option<Decimal>,
        discount_type: QuantityPriceType,
        tier: &DiscountTier,
    ) -> QuantityDiscountTier {
        let base_price = base_price.unwrap_or(Decimal::ZERO);
        let tier_price = tier.quantity_price.unwrap_or(base_price);

        let (discount_amount, discount_percent) = match discount_type {
            QuantityPriceType::FixedAmount => {
                (Some(Self::discount_amount(base_price, tier_price)), None)
            }
            QuantityPriceType::PercentOff => {
                (None, Some(Self::discount_percent(base_price, tier_price)))
            }
        };

        QuantityDiscountTier {
            quantity_tier,
            quantity_discount_type: discount_type,
            quantity_lower_bound: tier.quantity_lower_bound,
            discount_amount,
            discount_percent,
        }
    }

    /// Build records for every tier, numbered 1..N in input order
    pub fn tiers(
        base_price: Option<Decimal>,
        discount_type: QuantityPriceType,
        tiers: &[DiscountTier],
    ) -> Vec<QuantityDiscountTier> {
        tiers
            .iter()
            .zip(1u32..)
            .map(|(tier, number)| Self::tier(number, base_price, discount_type, tier))
            .collect()
    }
}
