//! Get Coupon Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    coupons::{errors::into_status_error, schemas::CouponResponse},
    extensions::*,
    state::State,
};

/// Get Coupon Handler
///
/// Returns a coupon that has not been deleted.
#[endpoint(
    tags("coupons"),
    summary = "Get Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Coupon found"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
    ),
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let coupon = state
        .app
        .coupons
        .get_coupon(coupon.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}

#[cfg(test)]
mod tests {
    use bazaar::coupons::CouponCode;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazaar_app::domain::coupons::{
        CouponsServiceError, MockCouponsService, records::CouponUuid,
    };

    use crate::{coupons::schemas::fixtures::make_coupon, test_helpers::coupons_service};

    use super::*;

    fn make_service(coupons: MockCouponsService) -> Service {
        coupons_service(coupons, Router::with_path("coupons/{coupon}").get(handler))
    }

    #[tokio::test]
    async fn test_get_coupon_success() -> TestResult {
        let uuid = CouponUuid::new();
        let coupon = make_coupon(uuid, CouponCode::parse("SAVE10")?);

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_get_coupon()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(coupon));

        let response: CouponResponse =
            TestClient::get(format!("http://example.com/coupons/{uuid}"))
                .send(&make_service(coupons))
                .await
                .take_json()
                .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.code, "SAVE10");
        assert_eq!(response.usage_limit, Some(100));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_coupon_not_found_returns_404() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_get_coupon()
            .once()
            .return_once(|_| Err(CouponsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/coupons/{}", Uuid::now_v7()))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
