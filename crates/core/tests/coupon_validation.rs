//! Coupon validation scenarios

use bazaar::{
    coupons::{Coupon, CouponCode, CouponTerms, CouponValidation, Rejection, validate_coupon},
    discounts::{DiscountTerms, DiscountType},
};
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use testresult::TestResult;

fn now() -> Timestamp {
    Timestamp::UNIX_EPOCH + SignedDuration::from_hours(24 * 500)
}

fn coupon(code: &str, discount: DiscountTerms) -> Result<Coupon, testresult::TestError> {
    Ok(Coupon {
        code: CouponCode::parse(code)?,
        terms: CouponTerms {
            discount,
            min_order_amount: Decimal::ZERO,
            usage_limit: None,
            usage_per_customer: 1,
            starts_at: now() - SignedDuration::from_hours(24),
            ends_at: now() + SignedDuration::from_hours(24),
            is_active: true,
        },
        current_usage: 0,
    })
}

fn rejection(validation: CouponValidation) -> Option<Rejection> {
    match validation {
        CouponValidation::Accepted(_) => None,
        CouponValidation::Rejected(rejection) => Some(rejection),
    }
}

#[test]
fn save10_is_capped_at_500() -> TestResult {
    let coupon = coupon("SAVE10", DiscountTerms::capped_percentage(dec!(10), dec!(500)))?;

    let summary = validate_coupon(Some(&coupon), dec!(10000), now()).into_result()?;

    assert_eq!(summary.discount, dec!(500));
    assert_eq!(summary.discount_type, DiscountType::Percentage);

    Ok(())
}

#[test]
fn flat50_never_exceeds_subtotal() -> TestResult {
    let coupon = coupon("FLAT50", DiscountTerms::fixed(dec!(50)))?;

    let summary = validate_coupon(Some(&coupon), dec!(30), now()).into_result()?;

    assert_eq!(summary.discount, dec!(30));

    Ok(())
}

#[test]
fn future_start_is_not_yet_valid() -> TestResult {
    let mut coupon = coupon("LATER", DiscountTerms::fixed(dec!(5)))?;
    coupon.terms.starts_at = now() + SignedDuration::from_secs(1);
    coupon.terms.ends_at = now() + SignedDuration::from_hours(1);

    let rejected = rejection(validate_coupon(Some(&coupon), dec!(100), now()));

    assert_eq!(rejected, Some(Rejection::NotStarted));
    assert_eq!(
        rejected.as_ref().map(ToString::to_string),
        Some("Coupon is not yet valid".to_string())
    );

    Ok(())
}

#[test]
fn past_end_has_expired() -> TestResult {
    let mut coupon = coupon("GONE", DiscountTerms::fixed(dec!(5)))?;
    coupon.terms.starts_at = now() - SignedDuration::from_hours(2);
    coupon.terms.ends_at = now() - SignedDuration::from_secs(1);

    assert_eq!(
        rejection(validate_coupon(Some(&coupon), dec!(100), now())),
        Some(Rejection::Expired)
    );

    Ok(())
}

#[test]
fn validity_window_bounds_are_inclusive() -> TestResult {
    let mut coupon = coupon("EDGE", DiscountTerms::fixed(dec!(5)))?;
    coupon.terms.starts_at = now();
    coupon.terms.ends_at = now() + SignedDuration::from_hours(1);

    assert!(validate_coupon(Some(&coupon), dec!(100), coupon.terms.starts_at).is_accepted());
    assert!(validate_coupon(Some(&coupon), dec!(100), coupon.terms.ends_at).is_accepted());

    Ok(())
}

#[test]
fn usage_limit_is_reached_at_the_limit() -> TestResult {
    let mut coupon = coupon("LIMITED", DiscountTerms::percentage(dec!(5)))?;
    coupon.terms.usage_limit = Some(3);

    coupon.current_usage = 2;
    assert!(validate_coupon(Some(&coupon), dec!(100), now()).is_accepted());

    coupon.current_usage = 3;
    assert_eq!(
        rejection(validate_coupon(Some(&coupon), dec!(100), now())),
        Some(Rejection::UsageLimitReached)
    );

    Ok(())
}

#[test]
fn minimum_order_amount_is_enforced() -> TestResult {
    let mut coupon = coupon("BIGSPEND", DiscountTerms::fixed(dec!(10)))?;
    coupon.terms.min_order_amount = dec!(75.00);

    let rejected = rejection(validate_coupon(Some(&coupon), dec!(74.99), now()));

    assert_eq!(
        rejected.as_ref().map(ToString::to_string),
        Some("Minimum order amount 75.00 required".to_string())
    );
    assert!(validate_coupon(Some(&coupon), dec!(75), now()).is_accepted());

    Ok(())
}

#[test]
fn inactive_coupon_is_rejected() -> TestResult {
    let mut coupon = coupon("PAUSED", DiscountTerms::fixed(dec!(10)))?;
    coupon.terms.is_active = false;

    assert_eq!(
        rejection(validate_coupon(Some(&coupon), dec!(100), now())),
        Some(Rejection::Inactive)
    );

    Ok(())
}

#[test]
fn lookup_miss_is_not_found() {
    assert_eq!(
        rejection(validate_coupon(None, dec!(100), now())).as_ref().map(ToString::to_string),
        Some("Coupon not found".to_string())
    );
}
