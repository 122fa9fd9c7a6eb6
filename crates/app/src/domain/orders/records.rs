//! Order Records

use bazaar::{
    coupons::CouponCode,
    orders::{LineItem, OrderLifecycle, OrderTotals, StatusChange},
};
use jiff::Timestamp;

use crate::{
    domain::orders::{data::CustomerInfo, number::OrderNumber},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub customer: CustomerInfo,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub coupon_code: Option<CouponCode>,
    pub lifecycle: OrderLifecycle,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An order after a status update, with what the update changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub order: OrderRecord,
    pub change: StatusChange,
}
