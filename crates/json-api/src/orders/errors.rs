//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use bazaar_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::OrderNumberExhausted => {
            StatusError::conflict().brief("Could not allocate a unique order number")
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        error @ (OrdersServiceError::MissingCustomerDetail(_)
        | OrdersServiceError::InvalidOrder(_)
        | OrdersServiceError::InvalidNote(_)) => {
            StatusError::bad_request().brief(error.to_string())
        }
        error @ (OrdersServiceError::CouponRejected(_)
        | OrdersServiceError::InvalidTransition(_)) => {
            StatusError::unprocessable_entity().brief(error.to_string())
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error().detail(source.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use bazaar::{
        coupons::Rejection,
        orders::{OrderStatus, TransitionError},
    };
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn rejections_are_unprocessable() {
        let error = into_status_error(OrdersServiceError::CouponRejected(Rejection::Expired));

        assert_eq!(error.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.brief, "Coupon has expired");

        let error = into_status_error(OrdersServiceError::InvalidTransition(
            TransitionError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending,
            },
        ));

        assert_eq!(error.code, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_customer_detail_is_bad_request() {
        let error = into_status_error(OrdersServiceError::MissingCustomerDetail("email"));

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "customer email is required");
    }

    #[test]
    fn storage_failures_carry_the_source_message() {
        let error = into_status_error(OrdersServiceError::Sql(sqlx::Error::Protocol(
            "connection reset".to_string(),
        )));

        assert_eq!(error.code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            error
                .detail
                .is_some_and(|detail| detail.contains("connection reset")),
            "500 should describe the storage failure"
        );
    }
}
