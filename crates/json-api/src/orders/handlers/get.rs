//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, schemas::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Returns the order with both note lists.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use bazaar::orders::NoteKind;
    use jiff::Timestamp;
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazaar_app::domain::orders::{MockOrdersService, OrdersServiceError, records::OrderUuid};

    use crate::{orders::schemas::fixtures::make_order, test_helpers::orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_order_success() -> TestResult {
        let uuid = OrderUuid::new();
        let mut order = make_order(uuid);

        order.lifecycle.notes.append(
            NoteKind::Customer,
            "Leave at the door",
            "ada@example.com",
            Timestamp::UNIX_EPOCH,
        )?;

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(order));

        let response: OrderResponse = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.order_number, "ORD-20260301-ABC123");
        assert_eq!(response.status, "pending");
        assert_eq!(response.total, dec!(180));
        assert!(response.admin_notes.is_empty());
        assert_eq!(
            response.customer_notes.first().map(|note| note.text.as_str()),
            Some("Leave at the door")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_not_found_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
