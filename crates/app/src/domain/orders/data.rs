//! Orders Data

use bazaar::{
    coupons::CouponCode,
    orders::{LineItem, NoteKind, StatusPatch},
};
use serde::{Deserialize, Serialize};

use crate::domain::orders::records::OrderUuid;

/// Delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// Who placed the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub customer: CustomerInfo,
    pub items: Vec<LineItem>,
    pub coupon_code: Option<CouponCode>,
    pub customer_note: Option<String>,
}

/// Order Patch Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPatch {
    pub changes: StatusPatch,
    pub updated_by: String,
}

/// New Note Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub kind: NoteKind,
    pub text: String,
    pub created_by: String,
}
