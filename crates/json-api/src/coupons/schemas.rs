//! Coupon request and response bodies.

use bazaar::{
    coupons::CouponTerms,
    discounts::{DiscountTerms, DiscountType},
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::coupons::{
    data::{CouponApplicability, CouponUpdate},
    records::CouponRecord,
};

use crate::extensions::*;

const fn default_usage_per_customer() -> u32 {
    1
}

const fn default_active() -> bool {
    true
}

/// Editable coupon fields, shared by create and update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponPayload {
    pub description: Option<String>,

    /// `percentage` or `fixed`
    pub discount_type: String,

    /// Percentage points or flat amount
    #[salvo(schema(value_type = f64))]
    pub discount_value: Decimal,

    /// Cap on percentage discounts
    #[salvo(schema(value_type = Option<f64>))]
    pub max_discount_amount: Option<Decimal>,

    #[serde(default)]
    #[salvo(schema(value_type = f64))]
    pub min_order_amount: Decimal,

    /// Total redemptions allowed; unlimited when omitted
    pub usage_limit: Option<u32>,

    #[serde(default = "default_usage_per_customer")]
    pub usage_per_customer: u32,

    /// RFC 3339 start of the validity window, inclusive
    pub start_date: String,

    /// RFC 3339 end of the validity window, inclusive
    pub end_date: String,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub applicable_categories: Vec<String>,

    #[serde(default)]
    pub excluded_categories: Vec<String>,

    #[serde(default)]
    pub applicable_products: Vec<String>,

    #[serde(default)]
    pub excluded_products: Vec<String>,

    #[serde(default)]
    pub restrict_to_new_customers: bool,

    #[serde(default)]
    pub applicable_customers: Vec<String>,
}

impl CouponPayload {
    /// Parse the discount and validity fields.
    pub(crate) fn terms(&self) -> Result<CouponTerms, StatusError> {
        let discount_type = self.discount_type.parse::<DiscountType>().or_400()?;

        Ok(CouponTerms {
            discount: DiscountTerms {
                discount_type,
                value: self.discount_value,
                max_amount: self.max_discount_amount,
            },
            min_order_amount: self.min_order_amount,
            usage_limit: self.usage_limit,
            usage_per_customer: self.usage_per_customer,
            starts_at: parse_timestamp(&self.start_date, "startDate")?,
            ends_at: parse_timestamp(&self.end_date, "endDate")?,
            is_active: self.is_active,
        })
    }

    pub(crate) fn applicability(&self) -> CouponApplicability {
        CouponApplicability {
            applicable_categories: self.applicable_categories.clone(),
            excluded_categories: self.excluded_categories.clone(),
            applicable_products: self.applicable_products.clone(),
            excluded_products: self.excluded_products.clone(),
            restrict_to_new_customers: self.restrict_to_new_customers,
            applicable_customers: self.applicable_customers.clone(),
        }
    }

    pub(crate) fn into_update(self) -> Result<CouponUpdate, StatusError> {
        Ok(CouponUpdate {
            terms: self.terms()?,
            applicability: self.applicability(),
            description: self.description,
        })
    }
}

fn parse_timestamp(value: &str, field: &str) -> Result<Timestamp, StatusError> {
    value.parse::<Timestamp>().map_err(|_ignored| {
        StatusError::bad_request().brief(format!("{field} must be an RFC 3339 timestamp"))
    })
}

/// Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponResponse {
    pub uuid: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: String,
    #[salvo(schema(value_type = f64))]
    pub discount_value: Decimal,
    #[salvo(schema(value_type = Option<f64>))]
    pub max_discount_amount: Option<Decimal>,
    #[salvo(schema(value_type = f64))]
    pub min_order_amount: Decimal,
    pub usage_limit: Option<u32>,
    pub usage_per_customer: u32,
    pub current_usage: u32,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub applicable_categories: Vec<String>,
    pub excluded_categories: Vec<String>,
    pub applicable_products: Vec<String>,
    pub excluded_products: Vec<String>,
    pub restrict_to_new_customers: bool,
    pub applicable_customers: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CouponRecord> for CouponResponse {
    fn from(record: CouponRecord) -> Self {
        let terms = record.coupon.terms;
        let applicability = record.applicability;

        CouponResponse {
            uuid: record.uuid.into(),
            code: record.coupon.code.as_str().to_string(),
            description: record.description,
            discount_type: terms.discount.discount_type.as_str().to_string(),
            discount_value: terms.discount.value,
            max_discount_amount: terms.discount.max_amount,
            min_order_amount: terms.min_order_amount,
            usage_limit: terms.usage_limit,
            usage_per_customer: terms.usage_per_customer,
            current_usage: record.coupon.current_usage,
            start_date: terms.starts_at.to_string(),
            end_date: terms.ends_at.to_string(),
            is_active: terms.is_active,
            applicable_categories: applicability.applicable_categories,
            excluded_categories: applicability.excluded_categories,
            applicable_products: applicability.applicable_products,
            excluded_products: applicability.excluded_products,
            restrict_to_new_customers: applicability.restrict_to_new_customers,
            applicable_customers: applicability.applicable_customers,
            created_at: record.created_at.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use bazaar::coupons::{Coupon, CouponCode};
    use bazaar_app::domain::coupons::records::CouponUuid;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    use super::*;

    pub(crate) fn make_coupon(uuid: CouponUuid, code: CouponCode) -> CouponRecord {
        CouponRecord {
            uuid,
            description: None,
            coupon: Coupon {
                code,
                terms: CouponTerms {
                    discount: DiscountTerms::capped_percentage(dec!(10), dec!(500)),
                    min_order_amount: Decimal::ZERO,
                    usage_limit: Some(100),
                    usage_per_customer: 1,
                    starts_at: Timestamp::UNIX_EPOCH,
                    ends_at: Timestamp::MAX,
                    is_active: true,
                },
                current_usage: 0,
            },
            applicability: CouponApplicability::default(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    pub(crate) fn coupon_json() -> Value {
        json!({
            "discountType": "percentage",
            "discountValue": 10,
            "maxDiscountAmount": 500,
            "usageLimit": 100,
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-12-31T23:59:59Z",
        })
    }
}
