//! Coupons Data

use bazaar::coupons::{CouponCode, CouponTerms};

use crate::domain::coupons::records::CouponUuid;

/// Where and to whom a coupon may apply.
///
/// Stored with the coupon for storefront display; validation does not
/// consult it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponApplicability {
    pub applicable_categories: Vec<String>,
    pub excluded_categories: Vec<String>,
    pub applicable_products: Vec<String>,
    pub excluded_products: Vec<String>,
    pub restrict_to_new_customers: bool,
    pub applicable_customers: Vec<String>,
}

/// New Coupon Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: CouponCode,
    pub description: Option<String>,
    pub terms: CouponTerms,
    pub applicability: CouponApplicability,
}

/// Coupon Update Data
///
/// Replaces every editable field. The code and usage counter are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponUpdate {
    pub description: Option<String>,
    pub terms: CouponTerms,
    pub applicability: CouponApplicability,
}
