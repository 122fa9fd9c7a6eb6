//! Create Order Handler

use std::sync::Arc;

use bazaar::coupons::CouponCode;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::orders::{data::NewOrder, records::OrderUuid};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        schemas::{CustomerBody, LineItemBody, OrderResponse},
    },
    state::State,
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    pub customer_info: CustomerBody,

    pub items: Vec<LineItemBody>,

    /// Coupon to redeem; blank is treated as none
    #[serde(default)]
    pub coupon_code: Option<String>,

    /// Note from the customer, recorded under their email
    #[serde(default)]
    pub customer_note: Option<String>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, StatusError> {
        let coupon_code = self
            .coupon_code
            .filter(|code| !code.trim().is_empty())
            .map(|code| CouponCode::parse(&code))
            .transpose()
            .or_400()?;

        Ok(NewOrder {
            uuid: OrderUuid::new(),
            customer: self.customer_info.into(),
            items: self.items.into_iter().map(Into::into).collect(),
            coupon_code,
            customer_note: self.customer_note,
        })
    }
}

/// Create Order Handler
///
/// Prices the order, redeems its coupon and assigns an order number.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Order number unavailable"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon rejected"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.create", skip(json, depot, res), err)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = json.into_inner().into_new_order()?;

    let created = state
        .app
        .orders
        .create_order(order)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", created.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}
