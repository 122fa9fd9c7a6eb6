//! Create Coupon Handler

use std::sync::Arc;

use bazaar::coupons::CouponCode;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::coupons::{data::NewCoupon, records::CouponUuid};

use crate::{
    coupons::{
        errors::into_status_error,
        schemas::{CouponPayload, CouponResponse},
    },
    extensions::*,
    state::State,
};

/// Create Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCouponRequest {
    /// Coupon code; stored uppercased
    pub code: String,

    #[serde(flatten)]
    pub coupon: CouponPayload,
}

impl CreateCouponRequest {
    fn into_new_coupon(self) -> Result<NewCoupon, StatusError> {
        Ok(NewCoupon {
            uuid: CouponUuid::new(),
            code: CouponCode::parse(&self.code).or_400()?,
            terms: self.coupon.terms()?,
            applicability: self.coupon.applicability(),
            description: self.coupon.description,
        })
    }
}

/// Create Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Create Coupon",
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon created"),
        (status_code = StatusCode::CONFLICT, description = "Coupon code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let coupon = json.into_inner().into_new_coupon()?;

    let created = state
        .app
        .coupons
        .create_coupon(coupon)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/coupons/{}", created.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}

#[cfg(test)]
mod tests {
    use bazaar::coupons::CouponTermsError;
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use bazaar_app::domain::coupons::{CouponsServiceError, MockCouponsService};

    use crate::{
        coupons::schemas::fixtures::{coupon_json, make_coupon},
        test_helpers::coupons_service,
    };

    use super::*;

    fn make_service(coupons: MockCouponsService) -> Service {
        coupons_service(coupons, Router::with_path("coupons").post(handler))
    }

    fn request(code: &str) -> Value {
        let mut body = coupon_json();

        if let Some(fields) = body.as_object_mut() {
            fields.insert("code".to_string(), Value::from(code));
        }

        body
    }

    #[tokio::test]
    async fn test_create_coupon_success() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .withf(|new| {
                new.code.as_str() == "SAVE10"
                    && new.terms.discount.value == dec!(10)
                    && new.terms.discount.max_amount == Some(dec!(500))
                    && new.terms.usage_limit == Some(100)
                    && new.terms.is_active
            })
            .return_once(|new| Ok(make_coupon(new.uuid, new.code)));

        let mut res = TestClient::post("http://example.com/coupons")
            .json(&request("save10"))
            .send(&make_service(coupons))
            .await;

        let body: CouponResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/coupons/{}", body.uuid).as_str()));
        assert_eq!(body.code, "SAVE10");
        assert_eq!(body.discount_type, "percentage");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_conflict_returns_409() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .return_once(|_| Err(CouponsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/coupons")
            .json(&request("SAVE10"))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_invalid_terms_returns_400() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .return_once(|_| {
                Err(CouponsServiceError::InvalidTerms(
                    CouponTermsError::InvalidValidityWindow,
                ))
            });

        let res = TestClient::post("http://example.com/coupons")
            .json(&request("SAVE10"))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_rejects_malformed_code() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_create_coupon().never();

        let res = TestClient::post("http://example.com/coupons")
            .json(&request("NOT A CODE!"))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_rejects_unknown_discount_type() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_create_coupon().never();

        let mut body = request("SAVE10");

        if let Some(fields) = body.as_object_mut() {
            fields.insert("discountType".to_string(), Value::from("bogo"));
        }

        let res = TestClient::post("http://example.com/coupons")
            .json(&body)
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
