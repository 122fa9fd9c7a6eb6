//! Coupon Records

use bazaar::coupons::Coupon;
use jiff::Timestamp;

use crate::{domain::coupons::data::CouponApplicability, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub description: Option<String>,
    pub coupon: Coupon,
    pub applicability: CouponApplicability,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl CouponRecord {
    /// Soft-deleted coupons keep their row so the code stays reserved.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
