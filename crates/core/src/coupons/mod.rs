//! Coupons

pub mod code;
pub mod terms;
pub mod validation;

pub use code::{CouponCode, CouponCodeError, MAX_CODE_LENGTH};
pub use terms::{CouponTerms, CouponTermsError};
pub use validation::{CouponSummary, CouponValidation, Rejection, validate_coupon};

/// A coupon as seen by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    /// Normalised code.
    pub code: CouponCode,

    /// Discount and eligibility terms.
    pub terms: CouponTerms,

    /// Redemptions so far.
    pub current_usage: u32,
}
