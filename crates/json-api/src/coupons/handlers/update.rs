//! Update Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    coupons::{
        errors::into_status_error,
        schemas::{CouponPayload, CouponResponse},
    },
    extensions::*,
    state::State,
};

/// Coupon Update Handler
///
/// Replaces the coupon's editable fields. The code and usage counter are kept.
#[endpoint(
    tags("coupons"),
    summary = "Update Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Coupon updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "coupons.update",
    skip(coupon, json, depot),
    fields(coupon_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    json: JsonBody<CouponPayload>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let coupon = coupon.into_inner();
    let update = json.into_inner().into_update()?;

    tracing::Span::current().record("coupon_uuid", tracing::field::display(coupon));

    let updated = state
        .app
        .coupons
        .update_coupon(coupon.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}
