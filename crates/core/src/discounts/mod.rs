//! Discounts
//!
//! Monetary discount computation for coupons. Amounts are decimals rounded to
//! two places, so there is no NaN or float drift to guard against.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places monetary amounts are rounded to.
pub const MONEY_SCALE: u32 = 2;

/// How a coupon's value is applied to an order subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `value` percent of the subtotal, optionally capped.
    Percentage,

    /// A flat amount, never more than the subtotal.
    Fixed,
}

impl DiscountType {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a discount type string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown discount type: {0}")]
pub struct UnknownDiscountType(pub String);

impl FromStr for DiscountType {
    type Err = UnknownDiscountType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(UnknownDiscountType(other.to_string())),
        }
    }
}

/// The discount-bearing part of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountTerms {
    /// Percentage or fixed amount.
    pub discount_type: DiscountType,

    /// Percentage points for percentage coupons, an amount for fixed ones.
    pub value: Decimal,

    /// Upper bound on a percentage discount. Ignored for fixed coupons.
    pub max_amount: Option<Decimal>,
}

impl DiscountTerms {
    /// Percentage discount without a cap.
    #[must_use]
    pub const fn percentage(value: Decimal) -> Self {
        Self {
            discount_type: DiscountType::Percentage,
            value,
            max_amount: None,
        }
    }

    /// Percentage discount capped at `max_amount`.
    #[must_use]
    pub const fn capped_percentage(value: Decimal, max_amount: Decimal) -> Self {
        Self {
            discount_type: DiscountType::Percentage,
            value,
            max_amount: Some(max_amount),
        }
    }

    /// Flat amount off.
    #[must_use]
    pub const fn fixed(value: Decimal) -> Self {
        Self {
            discount_type: DiscountType::Fixed,
            value,
            max_amount: None,
        }
    }
}

/// Round a monetary amount to [`MONEY_SCALE`] places, midpoints away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculate the discount a coupon grants on `subtotal`.
///
/// Percentage coupons take `value` percent of the subtotal and are then
/// limited by `max_amount` when one is set. Fixed coupons take `value` but
/// never more than the subtotal. The result is rounded to two places and is
/// always within `0..=subtotal`; a negative subtotal is treated as zero.
#[must_use]
pub fn calculate_discount(terms: &DiscountTerms, subtotal: Decimal) -> Decimal {
    let subtotal = subtotal.max(Decimal::ZERO);

    let discount = match terms.discount_type {
        DiscountType::Percentage => {
            let raw = subtotal.saturating_mul(terms.value) / Decimal::ONE_HUNDRED;

            terms.max_amount.map_or(raw, |cap| raw.min(cap))
        }
        DiscountType::Fixed => terms.value.min(subtotal),
    };

    // Rounding may not push the discount past what the order is worth.
    let ceiling = subtotal.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero);

    round_money(discount.max(Decimal::ZERO)).min(ceiling)
}
