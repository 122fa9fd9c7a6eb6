//! Validate Coupon Handler

use std::sync::Arc;

use bazaar::coupons::{CouponCode, CouponSummary, CouponValidation, Rejection};
use rust_decimal::Decimal;
use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    coupons::errors::into_status_error, extensions::*, observability::record_coupon_validation,
    state::State,
};

/// Validate Coupon Request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateCouponRequest {
    pub code: String,

    #[salvo(schema(value_type = f64))]
    pub order_subtotal: Decimal,
}

/// The coupon an order would receive.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppliedCoupon {
    pub code: String,
    pub discount_type: String,
    #[salvo(schema(value_type = f64))]
    pub discount_value: Decimal,
    #[salvo(schema(value_type = f64))]
    pub discount: Decimal,
}

impl From<CouponSummary> for AppliedCoupon {
    fn from(summary: CouponSummary) -> Self {
        AppliedCoupon {
            code: summary.code.as_str().to_string(),
            discount_type: summary.discount_type.as_str().to_string(),
            discount_value: summary.discount_value,
            discount: summary.discount,
        }
    }
}

/// Validate Coupon Response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateCouponResponse {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<AppliedCoupon>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<CouponValidation> for ValidateCouponResponse {
    fn from(validation: CouponValidation) -> Self {
        match validation {
            CouponValidation::Accepted(summary) => ValidateCouponResponse {
                valid: true,
                coupon: Some(summary.into()),
                error: None,
            },
            CouponValidation::Rejected(rejection) => ValidateCouponResponse {
                valid: false,
                coupon: None,
                error: Some(rejection.to_string()),
            },
        }
    }
}

/// Validate Coupon Handler
///
/// Checks a code against an order subtotal. Rejected coupons still return 200
/// with `valid: false` and the reason.
#[endpoint(
    tags("coupons"),
    summary = "Validate Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Validation outcome"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<ValidateCouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    // A code no coupon could carry is simply unknown.
    let validation = match CouponCode::parse(&request.code) {
        Ok(code) => state
            .app
            .coupons
            .validate_coupon(code, request.order_subtotal)
            .await
            .map_err(into_status_error)?,
        Err(_) => CouponValidation::Rejected(Rejection::NotFound),
    };

    record_coupon_validation(match &validation {
        CouponValidation::Accepted(_) => "accepted",
        CouponValidation::Rejected(rejection) => rejection.as_str(),
    });

    Ok(Json(validation.into()))
}
