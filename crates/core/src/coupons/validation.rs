//! Coupon Validation
//!
//! The one place that decides whether a coupon applies to an order. Checks
//! run in a fixed order and stop at the first failure.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    coupons::{Coupon, CouponCode},
    discounts::{DiscountType, calculate_discount, round_money},
};

/// Why a coupon was turned down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No live coupon carries the code.
    #[error("Coupon not found")]
    NotFound,

    /// The coupon has been switched off.
    #[error("Coupon is inactive")]
    Inactive,

    /// `now` is before the start date.
    #[error("Coupon is not yet valid")]
    NotStarted,

    /// `now` is after the end date.
    #[error("Coupon has expired")]
    Expired,

    /// Every allowed redemption has been used.
    #[error("Coupon usage limit reached")]
    UsageLimitReached,

    /// The order subtotal is under the coupon's minimum.
    #[error("Minimum order amount {:.2} required", rounded(.minimum))]
    BelowMinimum {
        /// The coupon's minimum order amount.
        minimum: Decimal,
    },
}

fn rounded(amount: &Decimal) -> Decimal {
    round_money(*amount)
}

impl Rejection {
    /// Stable machine-readable identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Inactive => "inactive",
            Self::NotStarted => "not_started",
            Self::Expired => "expired",
            Self::UsageLimitReached => "usage_limit_reached",
            Self::BelowMinimum { .. } => "below_minimum",
        }
    }
}

/// What an accepted coupon is worth on this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSummary {
    /// Normalised coupon code.
    pub code: CouponCode,

    /// Percentage or fixed.
    pub discount_type: DiscountType,

    /// Configured value (percent points or amount).
    pub discount_value: Decimal,

    /// Discount computed for the subtotal.
    pub discount: Decimal,
}

/// Outcome of validating a coupon against an order subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponValidation {
    /// The coupon applies.
    Accepted(CouponSummary),

    /// The coupon does not apply.
    Rejected(Rejection),
}

impl CouponValidation {
    /// `true` for [`CouponValidation::Accepted`].
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Convert into a `Result`, treating rejection as the error.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason when the coupon was not accepted.
    pub fn into_result(self) -> Result<CouponSummary, Rejection> {
        match self {
            Self::Accepted(summary) => Ok(summary),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Validate a looked-up coupon against an order.
///
/// `coupon` is the result of looking up the uppercased code among coupons
/// that are not deleted. Start and end dates are both inclusive.
#[must_use]
pub fn validate_coupon(
    coupon: Option<&Coupon>,
    subtotal: Decimal,
    now: Timestamp,
) -> CouponValidation {
    match check(coupon, subtotal, now) {
        Ok(coupon) => CouponValidation::Accepted(CouponSummary {
            code: coupon.code.clone(),
            discount_type: coupon.terms.discount.discount_type,
            discount_value: coupon.terms.discount.value,
            discount: calculate_discount(&coupon.terms.discount, subtotal),
        }),
        Err(rejection) => CouponValidation::Rejected(rejection),
    }
}

fn check(coupon: Option<&Coupon>, subtotal: Decimal, now: Timestamp) -> Result<&Coupon, Rejection> {
    let coupon = coupon.ok_or(Rejection::NotFound)?;
    let terms = &coupon.terms;

    if !terms.is_active {
        return Err(Rejection::Inactive);
    }

    if now < terms.starts_at {
        return Err(Rejection::NotStarted);
    }

    if now > terms.ends_at {
        return Err(Rejection::Expired);
    }

    if terms
        .usage_limit
        .is_some_and(|limit| coupon.current_usage >= limit)
    {
        return Err(Rejection::UsageLimitReached);
    }

    if subtotal < terms.min_order_amount {
        return Err(Rejection::BelowMinimum {
            minimum: terms.min_order_amount,
        });
    }

    Ok(coupon)
}
