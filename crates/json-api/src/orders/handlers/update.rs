//! Update Order Handler

use std::sync::Arc;

use bazaar::orders::StatusPatch;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::orders::{data::OrderPatch, records::OrderUpdate};

use crate::{
    extensions::*,
    observability::record_order_change,
    orders::{
        errors::into_status_error,
        schemas::{ChangeResponse, OrderResponse, TrackingBody, parse_payment_status, parse_status},
    },
    state::State,
};

const DEFAULT_AUTHOR: &str = "admin";

/// Update Order Request
///
/// Every field is optional; only the ones sent are applied.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateOrderRequest {
    /// New fulfilment status
    pub status: Option<String>,

    /// New payment status; `paid` is accepted for `completed`
    pub payment_status: Option<String>,

    /// Tracking fields merged into the current ones
    pub tracking_info: Option<TrackingBody>,

    /// Internal note appended to the admin notes
    pub admin_note: Option<String>,

    /// Author of the admin note
    pub updated_by: Option<String>,
}

impl UpdateOrderRequest {
    fn into_patch(self) -> Result<OrderPatch, StatusError> {
        Ok(OrderPatch {
            changes: StatusPatch {
                status: self.status.as_deref().map(parse_status).transpose()?,
                payment_status: self
                    .payment_status
                    .as_deref()
                    .map(parse_payment_status)
                    .transpose()?,
                tracking: self
                    .tracking_info
                    .map(TrackingBody::into_tracking)
                    .transpose()?,
                admin_note: self.admin_note,
            },
            updated_by: self
                .updated_by
                .filter(|author| !author.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        })
    }
}

/// Update Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateOrderResponse {
    pub order: OrderResponse,
    pub message: String,
    pub changes: ChangeResponse,
    /// Customer notifications queued by this update
    pub notifications: Vec<String>,
}

impl From<OrderUpdate> for UpdateOrderResponse {
    fn from(update: OrderUpdate) -> Self {
        UpdateOrderResponse {
            notifications: update
                .change
                .notification_kinds()
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            changes: update.change.into(),
            order: update.order.into(),
            message: "Order updated successfully".to_string(),
        }
    }
}

/// Update Order Handler
///
/// Applies status, payment and tracking changes and notifies the customer
/// about whatever actually changed.
#[endpoint(
    tags("orders"),
    summary = "Update Order",
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Transition not allowed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<UpdateOrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = order.into_inner();
    let patch = json.into_inner().into_patch()?;

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let update = state
        .app
        .orders
        .update_order(order.into(), patch)
        .await
        .map_err(into_status_error)?;

    record_order_change(&update.change);

    Ok(Json(update.into()))
}
