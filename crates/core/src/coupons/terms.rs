//! Coupon Terms

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::discounts::{DiscountTerms, DiscountType};

/// Reasons a set of coupon terms cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponTermsError {
    /// `discount_value` below zero.
    #[error("discount value must not be negative")]
    NegativeDiscountValue,

    /// Percentage coupons above 100%.
    #[error("percentage discount must not exceed 100")]
    PercentageOverHundred,

    /// `max_discount_amount` below zero.
    #[error("maximum discount amount must not be negative")]
    NegativeMaxDiscount,

    /// `min_order_amount` below zero.
    #[error("minimum order amount must not be negative")]
    NegativeMinOrderAmount,

    /// A usage limit of zero could never be redeemed.
    #[error("usage limit must be at least 1")]
    ZeroUsageLimit,

    /// Per-customer limit of zero could never be redeemed.
    #[error("usage per customer must be at least 1")]
    ZeroUsagePerCustomer,

    /// `ends_at` must be strictly after `starts_at`.
    #[error("end date must be after start date")]
    InvalidValidityWindow,
}

/// Everything about a coupon that decides whether and how much it discounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponTerms {
    /// Discount type, value and cap.
    pub discount: DiscountTerms,

    /// Smallest subtotal the coupon applies to.
    pub min_order_amount: Decimal,

    /// Total redemptions allowed, unlimited when `None`.
    pub usage_limit: Option<u32>,

    /// Redemptions allowed per customer.
    pub usage_per_customer: u32,

    /// First instant the coupon is valid (inclusive).
    pub starts_at: Timestamp,

    /// Last instant the coupon is valid (inclusive).
    pub ends_at: Timestamp,

    /// Switched off coupons are rejected regardless of dates.
    pub is_active: bool,
}

impl CouponTerms {
    /// Check the terms are internally consistent.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), CouponTermsError> {
        if self.discount.value < Decimal::ZERO {
            return Err(CouponTermsError::NegativeDiscountValue);
        }

        if self.discount.discount_type == DiscountType::Percentage
            && self.discount.value > Decimal::ONE_HUNDRED
        {
            return Err(CouponTermsError::PercentageOverHundred);
        }

        if self
            .discount
            .max_amount
            .is_some_and(|cap| cap < Decimal::ZERO)
        {
            return Err(CouponTermsError::NegativeMaxDiscount);
        }

        if self.min_order_amount < Decimal::ZERO {
            return Err(CouponTermsError::NegativeMinOrderAmount);
        }

        if self.usage_limit == Some(0) {
            return Err(CouponTermsError::ZeroUsageLimit);
        }

        if self.usage_per_customer == 0 {
            return Err(CouponTermsError::ZeroUsagePerCustomer);
        }

        if self.ends_at <= self.starts_at {
            return Err(CouponTermsError::InvalidValidityWindow);
        }

        Ok(())
    }
}
